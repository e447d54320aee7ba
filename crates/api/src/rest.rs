use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use storypath_core::model::{
    Location, LocationId, NewTrackingRecord, Project, ProjectId, TrackingRecord,
};

use crate::error::ApiError;
use crate::repository::{LocationRepository, ProjectRepository, TrackingRepository};

/// Connection settings for the StoryPath REST backend.
#[derive(Clone, Debug)]
pub struct RestConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl RestConfig {
    /// Read the backend endpoint from `STORYPATH_BASE_URL` and the optional
    /// bearer token from `STORYPATH_API_KEY`.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("STORYPATH_BASE_URL").ok()?;
        if base_url.trim().is_empty() {
            return None;
        }
        let api_key = env::var("STORYPATH_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        Some(Self { base_url, api_key })
    }
}

/// Client for the PostgREST-style StoryPath backend.
///
/// Every resource endpoint returns a JSON array, including single-row
/// lookups; `?column=eq.value` filters rows server-side.
#[derive(Clone)]
pub struct RestClient {
    client: Client,
    config: RestConfig,
}

/// Row shape of the participant-count views.
#[derive(Debug, Deserialize)]
struct ParticipantCountRow {
    number_participants: Option<u64>,
}

impl RestClient {
    #[must_use]
    pub fn new(config: RestConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn url(&self, path_and_query: &str) -> String {
        format!(
            "{}/{path_and_query}",
            self.config.base_url.trim_end_matches('/')
        )
    }

    async fn get_rows<T: DeserializeOwned>(
        &self,
        path_and_query: &str,
    ) -> Result<Vec<T>, ApiError> {
        let url = self.url(path_and_query);
        tracing::debug!(%url, "GET");

        let mut request = self.client.get(&url);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status()));
        }

        Ok(response.json().await?)
    }

    async fn first_row<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T, ApiError> {
        self.get_rows(path_and_query)
            .await?
            .into_iter()
            .next()
            .ok_or(ApiError::NotFound)
    }

    async fn count_row(&self, path_and_query: &str) -> Result<u64, ApiError> {
        let rows: Vec<ParticipantCountRow> = self.get_rows(path_and_query).await?;
        Ok(rows
            .into_iter()
            .next()
            .and_then(|row| row.number_participants)
            .unwrap_or(0))
    }
}

#[async_trait]
impl ProjectRepository for RestClient {
    async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.get_rows("project").await
    }

    async fn get_project(&self, id: ProjectId) -> Result<Project, ApiError> {
        self.first_row(&format!("project?id=eq.{id}")).await
    }

    async fn participant_count(&self, id: ProjectId) -> Result<u64, ApiError> {
        self.count_row(&format!("project_participant_counts?project_id=eq.{id}"))
            .await
    }
}

#[async_trait]
impl LocationRepository for RestClient {
    async fn list_locations(&self, project_id: ProjectId) -> Result<Vec<Location>, ApiError> {
        self.get_rows(&format!("location?project_id=eq.{project_id}"))
            .await
    }

    async fn get_location(&self, id: LocationId) -> Result<Location, ApiError> {
        self.first_row(&format!("location?id=eq.{id}")).await
    }

    async fn participant_count(&self, id: LocationId) -> Result<u64, ApiError> {
        self.count_row(&format!(
            "location_participant_counts?location_id=eq.{id}"
        ))
        .await
    }
}

#[async_trait]
impl TrackingRepository for RestClient {
    async fn list_tracking(&self) -> Result<Vec<TrackingRecord>, ApiError> {
        self.get_rows("tracking").await
    }

    async fn create_tracking(
        &self,
        record: NewTrackingRecord,
    ) -> Result<TrackingRecord, ApiError> {
        let url = self.url("tracking");
        tracing::debug!(%url, "POST");

        let mut request = self
            .client
            .post(&url)
            .header("Prefer", "return=representation")
            .json(&record);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status()));
        }

        let mut created: Vec<TrackingRecord> = response.json().await?;
        if created.is_empty() {
            return Err(ApiError::EmptyResponse);
        }
        Ok(created.remove(0))
    }
}
