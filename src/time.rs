use std::time::{SystemTime, UNIX_EPOCH};
use chrono::{DateTime, Utc};

/// The datetime format used for requests and responses.
pub type ServerTime = DateTime<Utc>;

/// Converts a unix timestamp to a [`DateTime`].
pub fn timestamp_to_server_time(timestamp: i64) -> ServerTime {
    DateTime::from_timestamp(
        timestamp,
        0,
    ).unwrap_or_default()
}

/// Gets current time.
pub fn get_server_time_now() -> ServerTime {
    ServerTime::from(SystemTime::now())
}

/// Gets the current unix timestamp.
pub fn get_system_time() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        .unwrap_or_default()
}
