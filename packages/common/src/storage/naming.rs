use chrono::{DateTime, Utc};

/// Build an object name of the form `{prefix}/{unix_nanos}_{filename}`.
///
/// The nanosecond timestamp keeps names unique across uploads of files that
/// share an original filename.
pub fn object_name(prefix: &str, filename: &str, at: DateTime<Utc>) -> String {
    let nanos = at
        .timestamp_nanos_opt()
        .unwrap_or_else(|| at.timestamp_micros().saturating_mul(1_000));
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        format!("{nanos}_{filename}")
    } else {
        format!("{prefix}/{nanos}_{filename}")
    }
}
