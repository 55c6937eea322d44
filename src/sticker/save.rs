use chrono::{DateTime, Local};

pub const STICKER_EXTENSION: &str = "png";

/// File name for a sticker produced at `now`: milliseconds since the epoch.
pub fn sticker_file_name(now: DateTime<Local>) -> String {
    format!("{}.{}", now.timestamp_millis(), STICKER_EXTENSION)
}
