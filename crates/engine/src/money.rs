use crate::EngineError;

/// Rounds a monetary value to cents, half away from zero.
///
/// Amounts stay `f64` end to end because the upstream wire format carries
/// them that way; this is the only rounding applied anywhere in the core.
#[must_use]
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Parses a user-entered amount into a non-negative value rounded to cents.
///
/// Accepts `.` or `,` as decimal separator and at most two fractional
/// digits. Negative amounts are rejected.
///
/// # Examples
///
/// ```rust
/// use engine::parse_amount;
///
/// assert_eq!(parse_amount("10").unwrap(), 10.0);
/// assert_eq!(parse_amount("10,5").unwrap(), 10.5);
/// assert!(parse_amount("12.345").is_err());
/// ```
pub fn parse_amount(input: &str) -> Result<f64, EngineError> {
    let empty = || EngineError::InvalidAmount("empty amount".to_string());
    let invalid = || EngineError::InvalidAmount("invalid amount".to_string());

    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(empty());
    }
    if trimmed.starts_with('-') {
        return Err(EngineError::InvalidAmount(
            "amount must not be negative".to_string(),
        ));
    }
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return Err(empty());
    }

    let normalized = trimmed.replace(',', ".");
    let mut parts = normalized.split('.');
    let units = parts.next().ok_or_else(invalid)?;
    let fraction = parts.next();
    if parts.next().is_some() {
        return Err(invalid());
    }

    if units.is_empty() || !units.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if let Some(frac) = fraction {
        if !frac.is_empty() && !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if frac.len() > 2 {
            return Err(EngineError::InvalidAmount(
                "too many decimals".to_string(),
            ));
        }
    }

    normalized
        .parse::<f64>()
        .map(round_to_cents)
        .map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!(parse_amount("10").unwrap(), 10.0);
        assert_eq!(parse_amount("10.5").unwrap(), 10.5);
        assert_eq!(parse_amount("10,50").unwrap(), 10.5);
        assert_eq!(parse_amount("  2.30 ").unwrap(), 2.3);
        assert_eq!(parse_amount("0").unwrap(), 0.0);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(parse_amount("").is_err());
        assert!(parse_amount("   ").is_err());
        assert!(parse_amount("-1").is_err());
        assert!(parse_amount("12.345").is_err());
        assert!(parse_amount("1.2.3").is_err());
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn rounds_half_away_from_zero_at_the_cent() {
        assert_eq!(round_to_cents(0.125), 0.13);
        assert_eq!(round_to_cents(1.018), 1.02);
        assert_eq!(round_to_cents(2.0), 2.0);
        assert_eq!(round_to_cents(0.004), 0.0);
    }
}
