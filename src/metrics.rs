//! Derived progress metrics.
//!
//! Pure functions over slices of committee state, recomputed on every
//! read. Rounding is half-up, done in integer arithmetic.

use crate::model::MinistryResult;

/// Share of visible ministries that have a result, as a rounded percentage.
///
/// Zero when nothing is visible. `finalized` is clamped to `visible`.
pub fn completion_percentage(finalized: usize, visible: usize) -> u32 {
    if visible == 0 {
        return 0;
    }
    let finalized = finalized.min(visible) as u64;
    let visible = visible as u64;
    let percent = (200 * finalized + visible) / (2 * visible);
    u32::try_from(percent).unwrap_or(100)
}

/// Projected seconds to finish the remaining visible ministries.
///
/// The projection is the mean elapsed time of every result so far
/// (closed-without-candidates rounds included) times the number of
/// visible ministries still without a result. Zero when there are no
/// results yet or nothing is visible.
pub fn estimated_remaining_seconds(
    results: &[MinistryResult],
    finalized: usize,
    visible: usize,
) -> u64 {
    if results.is_empty() || visible == 0 {
        return 0;
    }
    let total: u64 = results.iter().map(|r| r.elapsed_seconds).sum();
    let count = results.len() as u64;
    let remaining = visible.saturating_sub(finalized) as u64;
    (2 * total * remaining + count) / (2 * count)
}

/// Formats seconds as `"{h}h {m}min {s}s"`, dropping the hours when zero.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}h {minutes}min {secs}s")
    } else {
        format!("{minutes}min {secs}s")
    }
}
