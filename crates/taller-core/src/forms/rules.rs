//! Field rules shared by the forms.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Local part, `@`, dot-separated labels, alphabetic TLD.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("valid email regex")
});

/// Length in characters, not bytes.
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

pub fn has_min_chars(value: &str, min: usize) -> bool {
    char_len(value) >= min
}

pub fn is_email(value: &str) -> bool {
    !value.starts_with('.') && !value.contains("..") && EMAIL_RE.is_match(value)
}

/// Treats an empty optional text field as absent.
pub fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// A field that accepts either typed text or a number.
#[derive(Debug, Clone, PartialEq)]
pub enum NumberOrText {
    Text(String),
    Number(f64),
}

impl NumberOrText {
    /// Numeric value with JavaScript `Number()` semantics; NaN when unparseable.
    pub fn to_number(&self) -> f64 {
        match self {
            NumberOrText::Number(n) => *n,
            NumberOrText::Text(s) => parse_number(s),
        }
    }

    pub fn is_empty_text(&self) -> bool {
        matches!(self, NumberOrText::Text(s) if s.is_empty())
    }

    /// Transport form: text as entered, numbers like JavaScript `String(n)`.
    pub fn normalized(&self) -> String {
        match self {
            NumberOrText::Text(s) => s.clone(),
            NumberOrText::Number(n) => format_number(*n),
        }
    }
}

impl Default for NumberOrText {
    fn default() -> Self {
        NumberOrText::Text(String::new())
    }
}

impl From<&str> for NumberOrText {
    fn from(value: &str) -> Self {
        NumberOrText::Text(value.to_string())
    }
}

impl From<String> for NumberOrText {
    fn from(value: String) -> Self {
        NumberOrText::Text(value)
    }
}

impl From<f64> for NumberOrText {
    fn from(value: f64) -> Self {
        NumberOrText::Number(value)
    }
}

impl From<u32> for NumberOrText {
    fn from(value: u32) -> Self {
        NumberOrText::Number(f64::from(value))
    }
}

impl fmt::Display for NumberOrText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.normalized())
    }
}

/// Parses text the way JavaScript `Number()` does for the inputs a form sees:
/// surrounding whitespace ignored, empty means zero, `0x`/`0o`/`0b` prefixes,
/// decimal literals with optional exponent.
#[allow(clippy::cast_precision_loss)]
pub fn parse_number(text: &str) -> f64 {
    let s = text.trim();
    if s.is_empty() {
        return 0.0;
    }

    let radix = match s.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return u64::from_str_radix(&s[2..], radix).map_or(f64::NAN, |n| n as f64);
    }

    if s.trim_start_matches(['+', '-']) == "Infinity" {
        return if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    // Rust also accepts "inf" and "nan"; JavaScript does not.
    if !s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return f64::NAN;
    }
    s.parse().unwrap_or(f64::NAN)
}

/// Formats a number like JavaScript `String(n)`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let abs = n.abs();
    if (1e-6..1e21).contains(&abs) {
        return format!("{n}");
    }

    // Exponent form: Rust prints `1e21`, JavaScript `1e+21`.
    let exp = format!("{n:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_chars_counts_characters() {
        assert!(has_min_chars("Ñu", 2));
        assert!(!has_min_chars("Ñ", 2));
        assert!(has_min_chars("  ", 2));
    }

    #[test]
    fn test_email_accepts_common_addresses() {
        assert!(is_email("maria@example.com"));
        assert!(is_email("first.last+tag@mail.example.co"));
        assert!(is_email("o'neil@example.org"));
    }

    #[test]
    fn test_email_rejects_malformed() {
        for bad in [
            "",
            "maria",
            "maria@",
            "@example.com",
            "maria@example",
            "maria@example.c",
            ".maria@example.com",
            "ma..ria@example.com",
            "maria.@example.com",
            "maria @example.com",
        ] {
            assert!(!is_email(bad), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_parse_number_follows_js() {
        assert_eq!(parse_number("5"), 5.0);
        assert_eq!(parse_number(" 2.5 "), 2.5);
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number("   "), 0.0);
        assert_eq!(parse_number("1e3"), 1000.0);
        assert_eq!(parse_number("0x10"), 16.0);
        assert_eq!(parse_number("-1"), -1.0);
        assert!(parse_number("abc").is_nan());
        assert!(parse_number("inf").is_nan());
        assert!(parse_number("5kg").is_nan());
        assert!(parse_number(".").is_nan());
        assert!(parse_number("Infinity").is_infinite());
    }

    #[test]
    fn test_format_number_follows_js() {
        assert_eq!(format_number(5.0), "5");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.1), "0.1");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1e-7), "1e-7");
    }

    #[test]
    fn test_normalized_keeps_text_as_entered() {
        assert_eq!(NumberOrText::from("05").normalized(), "05");
        assert_eq!(NumberOrText::from(5_u32).normalized(), "5");
        assert_eq!(NumberOrText::from(2.5).normalized(), "2.5");
    }
}
