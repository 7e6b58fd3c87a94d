//! Epoch day bucketing.
//!
//! A "day" is a fixed 86,400,000 ms bucket counted from the Unix epoch, not
//! a local calendar day. Entries logged late in the evening east of UTC (or
//! early in the morning west of it) land in the neighbouring bucket. Kept
//! as-is so stored histories analyse the same way across versions.

use super::types::InsightsError;

pub const DAY_MS: i64 = 86_400_000;

/// Risk scoring looks back this many days.
pub const RISK_WINDOW_DAYS: i64 = 7;

/// `floor(timestamp_ms / DAY_MS)`.
pub fn day_id(timestamp_ms: i64) -> i64 {
    timestamp_ms.div_euclid(DAY_MS)
}

/// First instant (inclusive) of the risk window ending at `now_ms`.
pub(crate) fn risk_window_start(now_ms: i64) -> Result<i64, InsightsError> {
    now_ms
        .checked_sub(RISK_WINDOW_DAYS * DAY_MS)
        .ok_or(InsightsError::WindowUnderflow(now_ms))
}
