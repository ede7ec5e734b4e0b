//! Time helpers.

use chrono::Utc;

/// Current Unix timestamp in seconds.
pub fn unix_now() -> u64 {
    Utc::now().timestamp().max(0) as u64
}
