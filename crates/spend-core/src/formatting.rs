use serde::Serialize;

// ── Numbers ───────────────────────────────────────────────────────────────────

/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use spend_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by a relative epsilon so exact binary midpoints round up.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let frac_part = rounded - rounded.trunc();

    let grouped = group_thousands(&integer_part.to_string());

    let result = if decimals == 0 {
        grouped
    } else {
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        // `frac_str` looks like "0.50"; keep ".50".
        format!("{}{}", grouped, &frac_str[1..])
    };

    if negative && rounded != 0.0 {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format a magnitude the way amounts appear in reports: thousands separators,
/// at most two decimals, trailing zeros dropped.
///
/// # Examples
///
/// ```
/// use spend_core::formatting::format_amount;
///
/// assert_eq!(format_amount(150.0), "150");
/// assert_eq!(format_amount(25.5), "25.5");
/// assert_eq!(format_amount(7.0967), "7.1");
/// assert_eq!(format_amount(1000.0), "1,000");
/// ```
pub fn format_amount(value: f64) -> String {
    let fixed = format_number(value, 2);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}

// ── Currencies ────────────────────────────────────────────────────────────────

/// A selectable display currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Currency {
    /// ISO 4217 code, e.g. `"USD"`.
    pub code: &'static str,
    /// Narrow symbol used when rendering amounts.
    pub symbol: &'static str,
    pub name: &'static str,
}

/// Currencies offered by the tracker.
pub const CURRENCIES: &[Currency] = &[
    Currency { code: "EGP", symbol: "E£", name: "Egyptian Pound" },
    Currency { code: "USD", symbol: "$", name: "US Dollar" },
    Currency { code: "EUR", symbol: "€", name: "Euro" },
    Currency { code: "GBP", symbol: "£", name: "British Pound" },
    Currency { code: "JPY", symbol: "¥", name: "Japanese Yen" },
    Currency { code: "CAD", symbol: "C$", name: "Canadian Dollar" },
    Currency { code: "AUD", symbol: "A$", name: "Australian Dollar" },
    Currency { code: "CHF", symbol: "CHF", name: "Swiss Franc" },
    Currency { code: "INR", symbol: "₹", name: "Indian Rupee" },
];

/// Currency used when none is configured.
pub const DEFAULT_CURRENCY_CODE: &str = "USD";

impl Currency {
    /// Case-insensitive lookup by ISO code.
    pub fn lookup(code: &str) -> Option<&'static Currency> {
        let wanted = code.trim();
        CURRENCIES
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(wanted))
    }
}

/// Renders an amount in a currency as an opaque display string.
///
/// Reports only ever embed the output; they never parse it back.
pub trait CurrencyFormatter {
    fn format(&self, amount: f64, currency_code: &str) -> String;
}

/// Default formatter: narrow symbol prefix, e.g. `$1,234.5`, `-E£50`.
///
/// Unknown codes render as `XYZ 1,000`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymbolFormatter;

impl CurrencyFormatter for SymbolFormatter {
    fn format(&self, amount: f64, currency_code: &str) -> String {
        let body = format_amount(amount.abs());
        let sign = if amount < 0.0 && body != "0" { "-" } else { "" };
        match Currency::lookup(currency_code) {
            Some(currency) => format!("{}{}{}", sign, currency.symbol, body),
            None => format!(
                "{}{} {}",
                sign,
                currency_code.trim().to_uppercase(),
                body
            ),
        }
    }
}

/// Format with an explicit sign: `+` for zero and gains, `-` for losses.
///
/// The sign follows the rendered text, so float noise that rounds to zero
/// reads `+$0`.
pub fn format_signed<F: CurrencyFormatter + ?Sized>(
    formatter: &F,
    amount: f64,
    currency_code: &str,
) -> String {
    let formatted = formatter.format(amount, currency_code);
    if formatted.starts_with('-') {
        formatted
    } else {
        format!("+{}", formatted)
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
