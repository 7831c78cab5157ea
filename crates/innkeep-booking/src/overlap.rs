//! Half-open interval arithmetic shared by the conflict engine and
//! analytics.
//!
//! Every date range in the system is `[start, end)`: the end instant
//! is exclusive, so back-to-back bookings that meet at a boundary do
//! not conflict.

use chrono::{DateTime, Utc};

/// Milliseconds per billable night.
pub const MS_PER_DAY: i64 = 86_400_000;

/// Symmetric overlap test for two half-open intervals.
///
/// `[a_start, a_end)` and `[b_start, b_end)` intersect iff
/// `a_start < b_end && b_start < a_end`. A shared boundary
/// (`a_end == b_start`) is not an overlap.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Intersection of two half-open intervals, or `None` when empty.
pub fn clamp(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = a_start.max(b_start);
    let end = a_end.min(b_end);
    (start < end).then_some((start, end))
}

/// Number of billable nights in `[start, end)`: duration in
/// milliseconds divided by one day, rounded up. Zero for empty or
/// inverted ranges.
pub fn nights(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let ms = (end - start).num_milliseconds();
    if ms <= 0 {
        return 0;
    }
    (ms + MS_PER_DAY - 1) / MS_PER_DAY
}
