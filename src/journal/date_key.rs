use chrono::{DateTime, NaiveDate, Utc};

pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Canonical `YYYY-MM-DD` key of the UTC calendar day containing `timestamp`.
pub fn day_key(timestamp: DateTime<Utc>) -> String {
    timestamp.format(DAY_KEY_FORMAT).to_string()
}

pub fn parse_day_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key.trim(), DAY_KEY_FORMAT).ok()
}
