//! Request input validation.
//!
//! Wire values are turned into native ones here, before anything reaches the
//! ledger. The ledger itself never sees a malformed timestamp.

use chrono::{DateTime, NaiveDateTime, Utc};
use points_ledger::Points;
use serde::Deserialize;
use thiserror::Error;

/// Timestamp validation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid timestamp: {0}. Timestamp must be in form of YYYY-MM-DDTHH:MM:SSZ")]
pub struct TimestampError(pub String);

/// Naive layouts accepted when the client omits an offset; read as UTC
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an earn timestamp
///
/// Accepts RFC 3339 (`2020-11-02T14:00:00Z`, `2020-11-02T16:00:00+02:00`)
/// and offset-less `2020-11-02T14:00:00`, which is taken to be UTC.
///
/// # Example
///
/// ```
/// use points_server::validation::parse_timestamp;
///
/// let ts = parse_timestamp("2020-11-02T14:00:00Z").unwrap();
/// assert_eq!(ts.to_rfc3339(), "2020-11-02T14:00:00+00:00");
/// assert!(parse_timestamp("yesterday").is_err());
/// ```
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, TimestampError> {
    let trimmed = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| TimestampError(raw.to_string()))
}

/// Points as sent by clients: a JSON integer or an integer string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PointsField {
    Number(Points),
    Text(String),
}

impl PointsField {
    /// Resolve to an integer, `None` if the text is not one
    pub fn value(&self) -> Option<Points> {
        match self {
            PointsField::Number(points) => Some(*points),
            PointsField::Text(text) => text.trim().parse().ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_utc_timestamp() {
        assert_eq!(
            parse_timestamp("2020-11-02T14:00:00Z"),
            Ok(Utc.with_ymd_and_hms(2020, 11, 2, 14, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_offset_timestamp_normalizes_to_utc() {
        assert_eq!(
            parse_timestamp("2020-11-02T16:00:00+02:00"),
            Ok(Utc.with_ymd_and_hms(2020, 11, 2, 14, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_naive_timestamp_as_utc() {
        assert_eq!(
            parse_timestamp("2020-11-02T14:00:00"),
            Ok(Utc.with_ymd_and_hms(2020, 11, 2, 14, 0, 0).unwrap())
        );
        assert_eq!(
            parse_timestamp("2020-11-02 14:00:00.250")
                .unwrap()
                .timestamp_millis()
                % 1000,
            250
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for raw in ["", "not a date", "2020-13-02T14:00:00Z", "2020-11-02", "14:00"] {
            let err = parse_timestamp(raw).unwrap_err();
            assert_eq!(err, TimestampError(raw.to_string()));
        }
    }

    #[test]
    fn test_timestamp_error_message() {
        let err = TimestampError("noon".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid timestamp: noon. Timestamp must be in form of YYYY-MM-DDTHH:MM:SSZ"
        );
    }

    #[test]
    fn test_points_field_accepts_numbers_and_numeric_text() {
        let number: PointsField = serde_json::from_str("300").unwrap();
        let text: PointsField = serde_json::from_str("\" 300 \"").unwrap();
        let negative: PointsField = serde_json::from_str("-200").unwrap();
        let garbage: PointsField = serde_json::from_str("\"lots\"").unwrap();

        assert_eq!(number.value(), Some(300));
        assert_eq!(text.value(), Some(300));
        assert_eq!(negative.value(), Some(-200));
        assert_eq!(garbage.value(), None);
        assert!(serde_json::from_str::<PointsField>("1.5").is_err());
    }
}
