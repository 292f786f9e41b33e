//! Locale-aware number formatting.
//!
//! The dashboard host owns the user's locale; it tells us which number
//! format to use and we render numbers the same way the rest of the
//! dashboard does.

use serde::{Deserialize, Serialize};

/// The host's `number_format` user setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberFormat {
    /// Follow the UI language.
    #[default]
    Language,
    /// Follow the browser locale. We only know the UI language, so this
    /// formats like `Language`.
    System,
    /// `1,234.5`
    CommaDecimal,
    /// `1.234,5`
    DecimalComma,
    /// `1 234,5`
    SpaceComma,
    /// `1’234.5`
    QuoteDecimal,
    /// `1234.5`
    None,
    /// Settings added by newer hosts.
    #[serde(other)]
    Unrecognized,
}

/// Fraction digit bounds, mirroring `Intl.NumberFormat` options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatOptions {
    pub min_fraction_digits: Option<u8>,
    pub max_fraction_digits: Option<u8>,
}

impl FormatOptions {
    /// Exactly `digits` fraction digits.
    pub fn fixed(digits: u8) -> Self {
        Self {
            min_fraction_digits: Some(digits),
            max_fraction_digits: Some(digits),
        }
    }
}

/// Formatting service consumed by the derivation layer.
pub trait NumberFormatter {
    /// Format `value` for display.
    fn format(&self, value: f64, options: FormatOptions) -> String;

    /// Read back a number this formatter produced (or any prefix of one).
    fn parse(&self, text: &str) -> Option<f64>;
}

/// Group separator used by `space_comma` and space-grouping languages.
const NBSP: char = '\u{a0}';

/// Languages whose default number format is `1.234,5`.
const DECIMAL_COMMA_LANGUAGES: &[&str] = &["de", "es", "it", "nl", "pt", "da", "id", "tr", "ro", "el"];

/// Languages whose default number format is `1 234,5`.
const SPACE_COMMA_LANGUAGES: &[&str] = &["fr", "ru", "sv", "nb", "fi", "cs", "pl", "uk", "sk", "hu"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Separators {
    group: Option<char>,
    decimal: char,
}

/// [`NumberFormatter`] driven by the host's number format setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleFormatter {
    separators: Separators,
}

impl Default for LocaleFormatter {
    fn default() -> Self {
        Self::new(NumberFormat::Language, "en")
    }
}

impl LocaleFormatter {
    pub fn new(format: NumberFormat, language: &str) -> Self {
        let format = match format {
            NumberFormat::Language | NumberFormat::System | NumberFormat::Unrecognized => language_format(language),
            other => other,
        };
        let separators = match format {
            NumberFormat::DecimalComma => Separators { group: Some('.'), decimal: ',' },
            NumberFormat::SpaceComma => Separators { group: Some(NBSP), decimal: ',' },
            NumberFormat::QuoteDecimal => Separators { group: Some('\u{2019}'), decimal: '.' },
            NumberFormat::None => Separators { group: None, decimal: '.' },
            NumberFormat::CommaDecimal
            | NumberFormat::Language
            | NumberFormat::System
            | NumberFormat::Unrecognized => Separators { group: Some(','), decimal: '.' },
        };
        Self { separators }
    }
}

fn language_format(language: &str) -> NumberFormat {
    let primary = language.split(['-', '_']).next().unwrap_or("").to_ascii_lowercase();
    if DECIMAL_COMMA_LANGUAGES.contains(&primary.as_str()) {
        NumberFormat::DecimalComma
    } else if SPACE_COMMA_LANGUAGES.contains(&primary.as_str()) {
        NumberFormat::SpaceComma
    } else {
        NumberFormat::CommaDecimal
    }
}

impl NumberFormatter for LocaleFormatter {
    fn format(&self, value: f64, options: FormatOptions) -> String {
        if !value.is_finite() {
            return value.to_string();
        }

        // Integers show no fraction unless a minimum is asked for; anything
        // else gets up to three digits like Intl's default.
        let default_max = if value.fract() == 0.0 { 0 } else { 3 };
        let max = options.max_fraction_digits.unwrap_or(default_max) as usize;
        let min = (options.min_fraction_digits.unwrap_or(0) as usize).min(max);

        let rounded = format!("{:.*}", max, value.abs());
        let (int_part, frac_part) = match rounded.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (rounded.as_str(), ""),
        };

        let mut frac = frac_part.to_string();
        while frac.len() > min && frac.ends_with('0') {
            frac.pop();
        }

        let mut out = String::new();
        let negative = value < 0.0 && (int_part.bytes().any(|b| b != b'0') || frac.bytes().any(|b| b != b'0'));
        if negative {
            out.push('-');
        }
        out.push_str(&group_digits(int_part, self.separators.group));
        if !frac.is_empty() {
            out.push(self.separators.decimal);
            out.push_str(&frac);
        }
        out
    }

    fn parse(&self, text: &str) -> Option<f64> {
        let normalized: String = text
            .chars()
            .filter(|c| Some(*c) != self.separators.group && *c != '\u{202f}')
            .map(|c| if c == self.separators.decimal { '.' } else { c })
            .collect();
        parse_leading_float(&normalized)
    }
}

fn group_digits(digits: &str, separator: Option<char>) -> String {
    let Some(separator) = separator else {
        return digits.to_string();
    };
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

/// Parse the longest leading decimal number in `text`, ignoring leading
/// whitespace. `"42%"` reads as 42, `"abc"` as nothing.
pub fn parse_leading_float(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start || digits > 0 {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    // Optional exponent, only if it has digits.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    text[..end].parse::<f64>().ok()
}

/// Text of a sensor value control: one fraction digit plus the unit.
/// Non-numeric states such as `unavailable` pass through as they are, and
/// an empty state shows `-`.
pub fn format_sensor_value(
    state: &str,
    unit: Option<&str>,
    formatter: &dyn NumberFormatter,
) -> String {
    let value = match state.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => formatter.format(value, FormatOptions::fixed(1)),
        _ if state.is_empty() => "-".to_string(),
        _ => state.to_string(),
    };
    match unit {
        Some(unit) => format!("{value} {unit}"),
        None => value,
    }
}

/// Append a unit the way the host does: no space before `%` and `°`.
pub fn with_unit(value: &str, unit: Option<&str>) -> String {
    match unit {
        Some(unit) if unit == "%" || unit == "°" => format!("{value}{unit}"),
        Some(unit) if !unit.is_empty() => format!("{value} {unit}"),
        _ => value.to_string(),
    }
}
