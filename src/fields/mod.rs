//! Defensive parsing of raw price/discount text
//!
//! Listing pages routinely omit price or discount markup for unreleased or
//! non-discounted items, and the surrounding text carries currency symbols,
//! thousands separators, and sale labels. The parsers here are total: they
//! never fail, and degrade to zero on empty or non-numeric input.
//!
//! The `*_value` variants return `None` where the `parse_*` functions would
//! return zero, so callers that care can tell a parse failure apart from a
//! genuinely zero-priced item.

use rust_decimal::Decimal;

/// Parses a price string, returning `None` when nothing numeric remains.
///
/// Strips everything except ASCII digits and the decimal point, so
/// `"$1,234.50"` parses as `1234.50`.
pub fn price_value(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

/// Parses a price string, returning zero on empty or non-numeric input.
pub fn parse_price(text: &str) -> Decimal {
    price_value(text).unwrap_or_default()
}

/// Parses a discount percentage, returning `None` when nothing numeric
/// remains after stripping.
///
/// Removes the given textual prefix (e.g. a "Sale" label), then every
/// non-digit character, so `"Sale-25%"` with prefix `"Sale"` parses as 25.
/// Values above 100 are clamped, keeping the percentage in `[0, 100]`.
pub fn discount_value(text: &str, prefix_to_strip: &str) -> Option<u8> {
    let stripped = if prefix_to_strip.is_empty() {
        text
    } else {
        text.strip_prefix(prefix_to_strip).unwrap_or(text)
    };
    let digits: String = stripped.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<u32>().ok().map(|v| v.min(100) as u8)
}

/// Parses a discount percentage, returning zero on empty or non-numeric
/// input.
pub fn parse_discount(text: &str, prefix_to_strip: &str) -> u8 {
    discount_value(text, prefix_to_strip).unwrap_or(0)
}
