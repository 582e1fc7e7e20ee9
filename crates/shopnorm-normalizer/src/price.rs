//! Locale-tolerant price parsing.
//!
//! Display prices arrive as `"$149.99"`, `"1.499,99 €"`, `"12,50"`,
//! `"US $1,234.56"`. The rules below decide which separator is the decimal
//! point; everything else is grouping.

use std::sync::LazyLock;

use regex::Regex;

const CURRENCY_SYMBOLS: [char; 6] = ['€', '$', '£', '¥', '₹', '₽'];

static CURRENCY_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)EUR|USD|GBP").expect("valid regex"));

/// `1.499,99`, `12,50`, `1 234,56`: dot or space grouping with a two-digit
/// comma decimal.
static EUROPEAN_GROUPED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,3}([.\s]\d{3})*,\d{2}$").expect("valid regex"));

/// `1.234.567`: dots only as thousands grouping.
static DOT_GROUPED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,3}(\.\d{3})+$").expect("valid regex"));

/// `1,234,567`: commas only as thousands grouping.
static COMMA_GROUPED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,3}(,\d{3})+$").expect("valid regex"));

static LEADING_FLOAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").expect("valid regex")
});

static CURRENCY_CODE_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(EUR|USD|GBP|JPY|INR|CAD|AUD|CNY|CHF|RUB)\b").expect("valid regex")
});

/// Parses a display price into a non-negative amount.
///
/// Total: text with no recoverable number, negative amounts, and non-finite
/// results all yield `0.0`.
#[must_use]
pub fn parse_price(raw: &str) -> f64 {
    let without_codes = CURRENCY_CODE_RE.replace_all(raw, "");
    let compact: String = without_codes
        .chars()
        .filter(|c| !CURRENCY_SYMBOLS.contains(c) && !c.is_whitespace())
        .collect();

    let numeric = compact.trim_start_matches(|c: char| {
        !(c.is_ascii_digit() || matches!(c, '.' | ',' | '+' | '-'))
    });

    let decimal = to_decimal_notation(leading_amount(numeric));
    let Some(literal) = LEADING_FLOAT_RE.find(&decimal) else {
        return 0.0;
    };

    literal
        .as_str()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
        .unwrap_or(0.0)
}

/// The first amount of `numeric`; a range such as `12.99-15.99` ends at the
/// dash.
fn leading_amount(numeric: &str) -> &str {
    let end = numeric
        .char_indices()
        .find(|&(i, c)| {
            !(c.is_ascii_digit() || matches!(c, '.' | ',') || (i == 0 && matches!(c, '+' | '-')))
        })
        .map_or(numeric.len(), |(i, _)| i);
    &numeric[..end]
}

/// Rewrites grouping/decimal separators so `.` is the only decimal point.
fn to_decimal_notation(s: &str) -> String {
    if EUROPEAN_GROUPED_RE.is_match(s) {
        return s.replace('.', "").replace(',', ".");
    }

    let commas = s.matches(',').count();
    let dots = s.matches('.').count();

    match (commas, dots) {
        (0, 0) | (0, 1) => s.to_string(),
        (0, _) if DOT_GROUPED_RE.is_match(s) => s.replace('.', ""),
        (0, _) => s.to_string(),
        (1, 0) => s.replace(',', "."),
        (_, 0) if COMMA_GROUPED_RE.is_match(s) => s.replace(',', ""),
        (_, 0) => s.replacen(',', ".", 1),
        _ => {
            let last_comma = s.rfind(',').unwrap_or(0);
            let last_dot = s.rfind('.').unwrap_or(0);
            if last_dot > last_comma {
                s.replace(',', "")
            } else {
                s.replace('.', "").replace(',', ".")
            }
        }
    }
}

/// ISO 4217 code implied by a display price, if any.
///
/// Looks for a currency symbol first (`C$`/`CA$` and `A$`/`AU$` before plain
/// `$`), then for an upper-case three-letter code.
#[must_use]
pub fn detect_currency(raw: &str) -> Option<&'static str> {
    if raw.contains("CA$") || raw.contains("C$") {
        return Some("CAD");
    }
    if raw.contains("AU$") || raw.contains("A$") {
        return Some("AUD");
    }

    let from_symbol = raw.chars().find_map(|c| match c {
        '€' => Some("EUR"),
        '$' => Some("USD"),
        '£' => Some("GBP"),
        '¥' => Some("JPY"),
        '₹' => Some("INR"),
        '₽' => Some("RUB"),
        _ => None,
    });
    if from_symbol.is_some() {
        return from_symbol;
    }

    let caps = CURRENCY_CODE_WORD_RE.captures(raw)?;
    match caps.get(1)?.as_str() {
        "EUR" => Some("EUR"),
        "USD" => Some("USD"),
        "GBP" => Some("GBP"),
        "JPY" => Some("JPY"),
        "INR" => Some("INR"),
        "CAD" => Some("CAD"),
        "AUD" => Some("AUD"),
        "CNY" => Some("CNY"),
        "CHF" => Some("CHF"),
        "RUB" => Some("RUB"),
        _ => None,
    }
}

#[cfg(test)]
#[path = "price_test.rs"]
mod tests;
