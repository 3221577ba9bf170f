//! Functions to construct [`Integer`]s, [`Rational`]s and [`Float`]s from various types.

use rug::{ops::Pow, Assign, Float, Integer, Rational};

/// The number of bits of precision to use when computing values numerically.
pub const PRECISION: u32 = 1 << 9;

/// Creates an [`Integer`] with the given value.
pub fn int<T>(n: T) -> Integer
where
    Integer: From<T>,
{
    Integer::from(n)
}

/// Creates a [`Rational`] with the given value.
pub fn rat<T>(n: T) -> Rational
where
    Rational: From<T>,
{
    Rational::from(n)
}

/// Creates a [`Float`] with the given value.
pub fn float<T>(n: T) -> Float
where
    Float: Assign<T>,
{
    Float::with_val(PRECISION, n)
}

/// Converts a decimal literal, such as `16`, `3.25`, `.5` or `-1.5`, into the exact [`Rational`]
/// it denotes.
///
/// Returns [`None`] if the string is not a plain decimal number.
pub fn rational_from_decimal(s: &str) -> Option<Rational> {
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }

    let numerator = Integer::from_str_radix(&format!("0{}{}", whole, fraction), 10).ok()?;
    let denominator = Integer::from(10).pow(u32::try_from(fraction.len()).ok()?);
    let value = Rational::from((numerator, denominator));
    Some(if negative { -value } else { value })
}

/// Converts a finite [`f64`] into the [`Rational`] matching its shortest decimal representation,
/// so `0.1` becomes exactly `1/10` rather than the nearest binary fraction.
///
/// Returns [`None`] for infinite and NaN values.
pub fn rational_from_f64(value: f64) -> Option<Rational> {
    if !value.is_finite() {
        return None;
    }
    rational_from_decimal(&value.to_string())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn decimals_are_exact() {
        assert_eq!(rational_from_decimal("16"), Some(rat(16)));
        assert_eq!(rational_from_decimal("0.5"), Some(rat((1, 2))));
        assert_eq!(rational_from_decimal(".25"), Some(rat((1, 4))));
        assert_eq!(rational_from_decimal("3."), Some(rat(3)));
        assert_eq!(rational_from_decimal("-1.5"), Some(rat((-3, 2))));
        assert_eq!(rational_from_decimal("."), None);
        assert_eq!(rational_from_decimal("1e5"), None);
    }

    #[test]
    fn f64_uses_shortest_decimal() {
        assert_eq!(rational_from_f64(0.1), Some(rat((1, 10))));
        assert_eq!(rational_from_f64(-2.0), Some(rat(-2)));
        assert_eq!(rational_from_f64(f64::INFINITY), None);
        assert_eq!(rational_from_f64(f64::NAN), None);
    }
}
