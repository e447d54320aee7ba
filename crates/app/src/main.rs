use std::fmt;
use std::io::{self, BufRead, Write};

use api::RestConfig;
use services::{AppServices, Clock, SessionError, SessionWorkflow};
use storypath_core::geo::GeoPoint;
use storypath_core::model::{DisplayMode, LocationId, ProjectId};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidProjectId { raw: String },
    MissingBaseUrl,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidProjectId { raw } => write!(f, "invalid --project value: {raw}"),
            ArgsError::MissingBaseUrl => {
                write!(f, "STORYPATH_BASE_URL is not set; point it at the backend")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- projects");
    eprintln!("  cargo run -p app -- hunt --project <id> [--participant <name>]");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  STORYPATH_BASE_URL     backend endpoint (required)");
    eprintln!("  STORYPATH_API_KEY      bearer token (optional)");
    eprintln!("  STORYPATH_PARTICIPANT  default participant name");
    eprintln!();
    eprintln!("Hunt commands (stdin):");
    eprintln!("  qr <scanned text>      feed a scanned QR payload");
    eprintln!("  pos <lat> <lon>        feed a device position update");
    eprintln!("  show <location id>     display content of a visited location");
    eprintln!("  status                 points and visited locations");
    eprintln!("  quit                   end the session");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Projects,
    Hunt,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "projects" => Some(Self::Projects),
            "hunt" => Some(Self::Hunt),
            _ => None,
        }
    }
}

struct HuntArgs {
    project_id: ProjectId,
    participant: String,
}

impl HuntArgs {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut project_id = None;
        let mut participant = std::env::var("STORYPATH_PARTICIPANT")
            .ok()
            .unwrap_or_else(|| "unknown".into());

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--project" => {
                    let value = require_value(args, "--project")?;
                    let parsed: u64 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidProjectId { raw: value.clone() })?;
                    project_id = Some(ProjectId::new(parsed));
                }
                "--participant" => {
                    participant = require_value(args, "--participant")?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let project_id = project_id.ok_or(ArgsError::MissingValue { flag: "--project" })?;
        Ok(Self {
            project_id,
            participant,
        })
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None | Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            io::Error::new(io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };
    argv.remove(0);

    let config = RestConfig::from_env().ok_or(ArgsError::MissingBaseUrl)?;
    let services = AppServices::new_rest(config, Clock::default_clock());

    match cmd {
        Command::Projects => list_projects(&services).await,
        Command::Hunt => {
            let mut iter = argv.into_iter();
            let args = HuntArgs::parse(&mut iter).map_err(|e| {
                eprintln!("{e}");
                print_usage();
                e
            })?;
            hunt(&services, args).await
        }
    }
}

async fn list_projects(services: &AppServices) -> Result<(), Box<dyn std::error::Error>> {
    let published = services.projects().list_published().await?;
    if published.is_empty() {
        println!("No published projects yet.");
        return Ok(());
    }

    for project in published {
        let participants = services
            .projects()
            .project_participants(project.id())
            .await
            .unwrap_or(0);
        println!(
            "{}  {}  (participants: {participants})",
            project.id(),
            project.title()
        );
    }
    Ok(())
}

async fn hunt(
    services: &AppServices,
    args: HuntArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut workflow = services
        .start_session(args.project_id, args.participant)
        .await?;

    print_project_home(&workflow);

    let stdin = io::stdin();
    let mut out = io::stdout();
    loop {
        print!("> ");
        out.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let line = line.trim();
        let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
        match verb {
            "qr" => handle_qr(&mut workflow, rest).await,
            "pos" => handle_pos(&mut workflow, rest).await,
            "show" => handle_show(&workflow, rest),
            "status" => print_status(&workflow),
            "quit" | "exit" => break,
            "" => {}
            other => eprintln!("unknown command: {other}"),
        }
    }

    // Session state is deliberately discarded here; nothing persists.
    Ok(())
}

fn print_project_home(workflow: &SessionWorkflow) {
    let session = workflow.session();
    let project = session.project();
    println!("== {} ==", project.title());
    println!("{}", project.instructions());
    match project.homescreen_display() {
        DisplayMode::InitialClue if !project.initial_clue().is_empty() => {
            println!("Initial clue: {}", project.initial_clue());
        }
        DisplayMode::AllLocations => {
            println!("Locations:");
            for location in session.locations() {
                println!("  - {}", location.name());
            }
        }
        _ => {}
    }
    print_status(workflow);
}

async fn handle_qr(workflow: &mut SessionWorkflow, scanned: &str) {
    match workflow.handle_qr_scan(scanned).await {
        Ok(None) => println!("No location id in that code."),
        Ok(Some(outcome)) if outcome.newly_visited => {
            println!("Unlocked location {}!", outcome.location_id);
            print_status(workflow);
        }
        Ok(Some(outcome)) => {
            println!("Location {} was already unlocked.", outcome.location_id);
        }
        Err(err) => report(&err),
    }
}

async fn handle_pos(workflow: &mut SessionWorkflow, rest: &str) {
    let coords: Vec<&str> = rest.split_whitespace().collect();
    let parsed = match coords.as_slice() {
        [lat, lon] => lat
            .parse::<f64>()
            .and_then(|lat| lon.parse::<f64>().map(|lon| GeoPoint::new(lat, lon)))
            .ok(),
        _ => None,
    };
    let Some(origin) = parsed else {
        eprintln!("usage: pos <lat> <lon>");
        return;
    };

    match workflow.handle_position_update(origin).await {
        Ok(outcome) => {
            if let Some(nearest) = outcome.ranked.first() {
                println!(
                    "Nearest: {} ({:.0} m){}",
                    nearest.name,
                    nearest.distance_meters,
                    if nearest.nearby { ", within 100 metres!" } else { "" }
                );
            }
            for unlock in &outcome.unlocked {
                if unlock.newly_visited {
                    println!("Unlocked location {}!", unlock.location_id);
                }
            }
            if !outcome.unlocked.is_empty() {
                print_status(workflow);
            }
        }
        Err(err) => report(&err),
    }
}

fn handle_show(workflow: &SessionWorkflow, rest: &str) {
    let Ok(id) = rest.trim().parse::<LocationId>() else {
        eprintln!("usage: show <location id>");
        return;
    };
    match workflow.session().select_displayed(id) {
        Ok(location) => {
            println!("-- {} --", location.name());
            println!("{}", location.content());
            if let Some(clue) = location.clue() {
                println!("Clue for next location: {clue}");
            }
        }
        Err(err) => report(&err),
    }
}

fn print_status(workflow: &SessionWorkflow) {
    let session = workflow.session();
    if session.project().participant_scoring().is_scored() {
        println!("Points: {}/{}", session.score(), session.total_score());
    }
    println!(
        "Locations visited: {}/{}",
        session.visit_count(),
        session.location_count()
    );
    let visited = session.visited_locations();
    if !visited.is_empty() {
        let names: Vec<&str> = visited.iter().map(|l| l.name()).collect();
        println!("Visited: {}", names.join(", "));
    }
}

/// Transient notice for recoverable failures; the user can retry.
fn report(err: &SessionError) {
    tracing::warn!(error = %err, "operation failed");
    eprintln!("error: {err} (you can try again)");
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
