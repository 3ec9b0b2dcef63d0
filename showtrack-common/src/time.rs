//! Timestamp utilities

use chrono::{DateTime, SecondsFormat, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Text form stored in TIMESTAMP columns (RFC 3339, millisecond precision)
pub fn to_db_text(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800);
    }

    #[test]
    fn test_db_text_round_trips_through_rfc3339() {
        let t = Utc.with_ymd_and_hms(2024, 3, 9, 12, 30, 5).unwrap();
        let text = to_db_text(t);
        assert_eq!(text, "2024-03-09T12:30:05.000Z");

        let parsed = DateTime::parse_from_rfc3339(&text).unwrap().with_timezone(&Utc);
        assert_eq!(parsed, t);
    }
}
