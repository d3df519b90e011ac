//! Clean-or-default helpers applied wherever a number enters the system.
//!
//! Every numeric ingestion point (statement cells, the state file, command line
//! amounts) goes through these functions, so malformed input always degrades to
//! `0.0` instead of failing.
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// Parses a locale formatted number such as `"₹ 1,23,456.70"` or `"-4.5%"`.
///
/// Currency symbols, percent signs, whitespace and thousands separators are
/// stripped first. Like a lenient float parser the longest numeric prefix is
/// used, so `"12.5 (approx)"` yields `12.5`. Anything else cleans to `0.0`.
pub fn clean_number(input: &str) -> f64 {
    let stripped: String = input.chars().filter(|c| !is_noise(*c)).collect();
    leading_number(&stripped).unwrap_or(0.0)
}

fn is_noise(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | '%' | '₹' | '$' | '€' | '£' | '¥')
}

fn leading_number(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let mut seen_digit = false;
    let mut seen_dot = false;
    while let Some(&b) = bytes.get(end) {
        match b {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    if !seen_digit {
        return None;
    }

    // Optional exponent, only taken when it has digits
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Maps NaN and infinities to `0.0`.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Coerces a monetary amount that must be non-negative.
pub fn coerce_amount(value: f64) -> f64 {
    finite_or_zero(value).max(0.0)
}

/// Rounds half away from zero to the given number of decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Serde adapter accepting a number, a numeric string, or null.
///
/// Strings are run through [`clean_number`]; null and any other shape
/// deserialize to `0.0`.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Number(f64),
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Option::<Lenient>::deserialize(deserializer)? {
        Some(Lenient::Number(n)) => finite_or_zero(n),
        Some(Lenient::Text(s)) => clean_number(&s),
        Some(Lenient::Other(_)) | None => 0.0,
    })
}

/// Like [`deserialize_lenient`], for amounts that must not be negative.
pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_lenient(deserializer).map(coerce_amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_number_strips_locale_formatting() {
        assert_eq!(clean_number("₹ 12,000"), 12000.0);
        assert_eq!(clean_number("1,23,456.78"), 123456.78);
        assert_eq!(clean_number("10%"), 10.0);
        assert_eq!(clean_number(" -4.25 % "), -4.25);
        assert_eq!(clean_number("$1,000.50"), 1000.5);
        assert_eq!(clean_number("50\u{a0}000"), 50000.0);
    }

    #[test]
    fn test_clean_number_defaults_to_zero() {
        assert_eq!(clean_number(""), 0.0);
        assert_eq!(clean_number("InvalidNumber"), 0.0);
        assert_eq!(clean_number("-"), 0.0);
        assert_eq!(clean_number("."), 0.0);
        assert_eq!(clean_number("NaN"), 0.0);
    }

    #[test]
    fn test_clean_number_uses_numeric_prefix() {
        assert_eq!(clean_number("12.5 (approx)"), 12.5);
        assert_eq!(clean_number("1.2.3"), 1.2);
        assert_eq!(clean_number("1e3"), 1000.0);
        assert_eq!(clean_number("7e"), 7.0);
        assert_eq!(clean_number(".5"), 0.5);
    }

    #[test]
    fn test_coerce_amount() {
        assert_eq!(coerce_amount(2500.0), 2500.0);
        assert_eq!(coerce_amount(-10.0), 0.0);
        assert_eq!(coerce_amount(f64::NAN), 0.0);
        assert_eq!(coerce_amount(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(14.004, 2), 14.0);
        assert_eq!(round_to(33.333_333, 1), 33.3);
        assert_eq!(round_to(66.666_666, 1), 66.7);
        assert_eq!(round_to(2.5, 0), 3.0);
    }

    #[derive(Deserialize)]
    struct Amount {
        #[serde(default, deserialize_with = "deserialize_lenient")]
        value: f64,
    }

    #[test]
    fn test_deserialize_lenient_shapes() {
        let parse = |yaml: &str| serde_yaml::from_str::<Amount>(yaml).unwrap().value;

        assert_eq!(parse("value: 20000"), 20000.0);
        assert_eq!(parse("value: 12.5"), 12.5);
        assert_eq!(parse("value: \"₹ 5,000\""), 5000.0);
        assert_eq!(parse("value: \"abc\""), 0.0);
        assert_eq!(parse("value: null"), 0.0);
        assert_eq!(parse("value: [1, 2]"), 0.0);
        assert_eq!(parse("{}"), 0.0);
    }

    #[derive(Deserialize)]
    struct Holding {
        #[serde(default, deserialize_with = "deserialize_amount")]
        value: f64,
    }

    #[test]
    fn test_deserialize_amount_clamps_negatives() {
        let parse = |yaml: &str| serde_yaml::from_str::<Holding>(yaml).unwrap().value;

        assert_eq!(parse("value: -500"), 0.0);
        assert_eq!(parse("value: \"-1,200\""), 0.0);
        assert_eq!(parse("value: \"₹ 5,000\""), 5000.0);
        assert_eq!(parse("value: .nan"), 0.0);
    }
}
