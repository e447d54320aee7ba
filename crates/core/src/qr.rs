use crate::model::LocationId;

const ID_MARKER: &str = "Location ID: ";

/// Extracts a location id from scanned QR text.
///
/// Recognizes the literal pattern `Location ID: <digits>` anywhere in the
/// string and returns the digit run as the identifier. Returns `None` when
/// the pattern is absent; callers must treat that as "no identifier found".
/// There is no checksum or format validation beyond the marker; any text
/// containing the literal substring is accepted.
#[must_use]
pub fn decode_location_id(scanned: &str) -> Option<LocationId> {
    let start = scanned.find(ID_MARKER)? + ID_MARKER.len();
    let digits: &str = {
        let rest = &scanned[start..];
        let end = rest
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map_or(rest.len(), |(i, _)| i);
        &rest[..end]
    };
    if digits.is_empty() {
        return None;
    }
    digits.parse::<u64>().ok().map(LocationId::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_id_embedded_in_text() {
        assert_eq!(
            decode_location_id("Welcome! Location ID: 42 end"),
            Some(LocationId::new(42))
        );
    }

    #[test]
    fn extracts_id_at_end_of_text() {
        assert_eq!(
            decode_location_id("Location ID: 7"),
            Some(LocationId::new(7))
        );
    }

    #[test]
    fn absent_pattern_yields_none() {
        assert_eq!(decode_location_id("no id here"), None);
        assert_eq!(decode_location_id(""), None);
    }

    #[test]
    fn marker_without_digits_yields_none() {
        assert_eq!(decode_location_id("Location ID: abc"), None);
        assert_eq!(decode_location_id("Location ID: "), None);
    }

    #[test]
    fn stops_at_first_non_digit() {
        assert_eq!(
            decode_location_id("Location ID: 12x34"),
            Some(LocationId::new(12))
        );
    }

    #[test]
    fn overflowing_digit_run_yields_none() {
        assert_eq!(decode_location_id("Location ID: 99999999999999999999999"), None);
    }
}
