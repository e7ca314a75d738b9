//! JST timestamp rendering shared by the state file and notifications.

use chrono::{DateTime, FixedOffset, Utc};

/// Timestamp layout used everywhere a time is persisted or displayed.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const JST_OFFSET_SECS: i32 = 9 * 3600;

/// Current wall-clock time in JST (UTC+9).
pub fn now_jst() -> DateTime<FixedOffset> {
    let jst = FixedOffset::east_opt(JST_OFFSET_SECS).expect("JST offset");
    Utc::now().with_timezone(&jst)
}

/// Current JST time formatted as `YYYY-MM-DD HH:MM:SS`.
pub fn timestamp() -> String {
    now_jst().format(TIMESTAMP_FORMAT).to_string()
}
