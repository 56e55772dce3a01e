/// Lowest rating the backend accepts.
pub const RATING_MIN: i64 = 0;
/// Highest rating the backend accepts.
pub const RATING_MAX: i64 = 10;

pub fn rating_in_range(rating: i64) -> bool {
    (RATING_MIN..=RATING_MAX).contains(&rating)
}

/// Parse a rating as typed into a number field, rounding to the nearest integer.
///
/// Out-of-range values are returned as-is; bounds are only enforced when the
/// draft is validated. Returns `None` for empty or non-numeric input.
pub fn parse_rating_input(input: &str) -> Option<i64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value: f64 = trimmed.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    // Half-up like a number input (2.5 -> 3, -0.5 -> 0)
    Some((value + 0.5).floor() as i64)
}
