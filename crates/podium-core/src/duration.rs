//! Coercion of user-entered durations.
//!
//! Durations come from free text inputs. Anything that is not a finite,
//! non-negative number becomes 0 minutes before it reaches the document,
//! so the resolver's running clock never sees garbage.

/// Parse a duration in minutes from user input.
///
/// Surrounding whitespace is ignored and fractional minutes are floored.
/// Non-numeric, negative, `NaN` or infinite input yields 0. Values above
/// `u32::MAX` saturate.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn parse_duration_minutes(input: &str) -> u32 {
    let Ok(value) = input.trim().parse::<f64>() else {
        return 0;
    };
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    // `as` saturates for out-of-range floats.
    value.floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_numbers() {
        assert_eq!(parse_duration_minutes("45"), 45);
        assert_eq!(parse_duration_minutes(" 30 "), 30);
        assert_eq!(parse_duration_minutes("0"), 0);
    }

    #[test]
    fn fractions_are_floored() {
        assert_eq!(parse_duration_minutes("12.9"), 12);
        assert_eq!(parse_duration_minutes("0.5"), 0);
    }

    #[test]
    fn garbage_becomes_zero() {
        assert_eq!(parse_duration_minutes(""), 0);
        assert_eq!(parse_duration_minutes("abc"), 0);
        assert_eq!(parse_duration_minutes("NaN"), 0);
        assert_eq!(parse_duration_minutes("inf"), 0);
        assert_eq!(parse_duration_minutes("-15"), 0);
        assert_eq!(parse_duration_minutes("20 min"), 0);
    }

    #[test]
    fn huge_values_saturate() {
        assert_eq!(parse_duration_minutes("1e20"), u32::MAX);
    }
}
