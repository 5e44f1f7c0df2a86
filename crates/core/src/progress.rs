//! Percentage helpers for progress bars and dashboards.

/// `round(100 * matches / total)`, or 0 when there is nothing to count.
///
/// Halves round away from zero, matching `Math.round` for the non-negative
/// inputs used here.
pub fn completion_percent(matches: u32, total: u32) -> i32 {
    if total == 0 {
        return 0;
    }
    ((f64::from(matches) * 100.0) / f64::from(total)).round() as i32
}

/// Rounded mean of a set of percentages, 0 for an empty set.
pub fn average_percent(values: impl IntoIterator<Item = i32>) -> i32 {
    let (sum, count) = values
        .into_iter()
        .fold((0i64, 0i64), |(s, c), v| (s + i64::from(v), c + 1));
    if count == 0 {
        return 0;
    }
    (sum as f64 / count as f64).round() as i32
}
