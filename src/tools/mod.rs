//! MCP tool implementations
//!
//! Plain functions over the tracker. Each returns a serializable response
//! or a user-facing error message.

pub mod activity;
pub mod charts;
pub mod dashboard;
pub mod days;
pub mod food_items;
pub mod lookup;
pub mod status;

use chrono::{Local, NaiveDate};

use crate::tracker::TrackerError;

/// The local calendar date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a `YYYY-MM-DD` tool argument; `None` means today
pub fn parse_date(date: Option<&str>) -> Result<NaiveDate, String> {
    match date.map(str::trim).filter(|d| !d.is_empty()) {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .map_err(|e| format!("Invalid date '{}' (expected YYYY-MM-DD): {}", d, e)),
        None => Ok(today()),
    }
}

/// Message for a failed tracker operation. Lookup failures other than a
/// missing key collapse to the retry prompt.
pub fn error_message(e: TrackerError) -> String {
    match e {
        TrackerError::Lookup(lookup) => lookup.user_message(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::{LookupError, RETRY_MESSAGE};

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date(Some("2024-02-29")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(parse_date(None).unwrap(), today());
        assert_eq!(parse_date(Some("  ")).unwrap(), today());
        assert!(parse_date(Some("2023-02-29")).is_err());
        assert!(parse_date(Some("05/10/2024")).is_err());
    }

    #[test]
    fn test_error_message() {
        let parse = TrackerError::Lookup(LookupError::Parse("garbage".into()));
        assert_eq!(error_message(parse), RETRY_MESSAGE);
        assert_eq!(
            error_message(TrackerError::validation("name required")),
            "name required"
        );
    }
}
