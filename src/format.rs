//! Presentation helpers for token amounts, timestamps and addresses.

use bigdecimal::{BigDecimal, RoundingMode};
use chrono::DateTime;
use num_traits::{Signed, Zero};

/// Fractional digits for amounts with magnitude >= 1.
pub const WHOLE_PRECISION: i64 = 6;
/// Fractional digits for amounts with magnitude in (0, 1).
pub const FRACTION_PRECISION: i64 = 12;

/// Render a subgraph decimal string.
///
/// Empty input and exact zero render as `"0"`. Input that does not parse as a
/// decimal, or whose exponent is out of range, is returned unchanged.
pub fn format_token_amount(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "0".to_string();
    }
    match crate::models::parse_decimal(trimmed) {
        Some(value) => format_decimal(&value),
        None => raw.to_string(),
    }
}

/// Render a computed amount with the same precision rule as [`format_token_amount`].
pub fn format_decimal(value: &BigDecimal) -> String {
    if value.is_zero() {
        return "0".to_string();
    }
    let scale = if value.abs() >= BigDecimal::from(1) {
        WHOLE_PRECISION
    } else {
        FRACTION_PRECISION
    };
    fixed_point(value, scale)
}

/// Plain (non-scientific) rendering with exactly `scale` fractional digits.
fn fixed_point(value: &BigDecimal, scale: i64) -> String {
    let rounded = value.with_scale_round(scale, RoundingMode::HalfUp);
    let (digits, exponent) = rounded.as_bigint_and_exponent();
    debug_assert_eq!(exponent, scale);

    let negative = digits.is_negative();
    let mut text = digits.abs().to_string();
    let scale = scale as usize;
    if text.len() <= scale {
        text = format!("{}{}", "0".repeat(scale + 1 - text.len()), text);
    }
    let (int_part, frac_part) = text.split_at(text.len() - scale);
    let sign = if negative { "-" } else { "" };
    if scale == 0 {
        format!("{sign}{int_part}")
    } else {
        format!("{sign}{int_part}.{frac_part}")
    }
}

/// USD figure with two decimals, e.g. `"1234.5"` -> `"$1234.50"`.
pub fn format_usd(raw: &str) -> String {
    let value = crate::models::parse_amount(raw);
    format!("${}", fixed_point(&value, 2))
}

/// `YYYY-MM-DD HH:MM:SS UTC` for a unix timestamp in seconds.
pub fn format_timestamp(unix_secs: i64) -> String {
    DateTime::from_timestamp(unix_secs, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| unix_secs.to_string())
}

/// `0x1234…abcd` for long hex addresses, unchanged otherwise.
pub fn short_address(address: &str) -> String {
    if address.len() <= 12 || !address.is_ascii() {
        return address.to_string();
    }
    format!("{}…{}", &address[..6], &address[address.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_empty_render_as_zero() {
        assert_eq!(format_token_amount(""), "0");
        assert_eq!(format_token_amount("   "), "0");
        assert_eq!(format_token_amount("0"), "0");
        assert_eq!(format_token_amount("0.000"), "0");
        assert_eq!(format_token_amount("-0"), "0");
    }

    #[test]
    fn whole_amounts_get_six_places() {
        assert_eq!(format_token_amount("2"), "2.000000");
        assert_eq!(format_token_amount("1"), "1.000000");
        assert_eq!(format_token_amount("1234.5678901234"), "1234.567890");
        assert_eq!(format_token_amount("-3.25"), "-3.250000");
    }

    #[test]
    fn fractional_amounts_get_twelve_places() {
        assert_eq!(format_token_amount("0.0000000001"), "0.000000000100");
        assert_eq!(format_token_amount("0.5"), "0.500000000000");
        assert_eq!(format_token_amount("-0.25"), "-0.250000000000");
    }

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(format_token_amount("1.0000005"), "1.000001");
        assert_eq!(format_token_amount("0.0000000000005"), "0.000000000001");
    }

    #[test]
    fn nonzero_input_never_renders_bare_zero() {
        for raw in ["0.0000000000001", "999999999.9999999", "0.1", "10"] {
            assert_ne!(format_token_amount(raw), "0", "input {raw}");
        }
    }

    #[test]
    fn unparseable_input_is_passed_through() {
        assert_eq!(format_token_amount("n/a"), "n/a");
    }

    #[test]
    fn runaway_exponents_are_passed_through() {
        assert_eq!(format_token_amount("1e1000000000"), "1e1000000000");
        assert_eq!(format_token_amount("1e-1000000000"), "1e-1000000000");
        assert_eq!(format_token_amount("2.5e1"), "25.000000");
    }

    #[test]
    fn usd_and_timestamp_helpers() {
        assert_eq!(format_usd("1234.5"), "$1234.50");
        assert_eq!(format_usd(""), "$0.00");
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00 UTC");
        assert_eq!(
            short_address("0x88e6a0c2ddd26feeb64f039a2c41296fcb3f5640"),
            "0x88e6…5640"
        );
        assert_eq!(short_address("0xA"), "0xA");
    }
}
