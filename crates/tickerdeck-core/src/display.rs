//! en-US number formatting for stock cards.
//!
//! Rounding is done on the shortest decimal representation of the value, so
//! `98.765` rounds to `98.77` the way a reader expects rather than to the
//! nearest binary neighbour.

/// `$1,234.50`, `-$98.77`.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let digits = round_fixed(value.abs(), 2);
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}${}", digits.render(2))
}

/// Percentage points with two decimals: `5.0` becomes `5.00%`.
pub fn format_percentage(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let digits = round_fixed(value.abs(), 2);
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{}%", digits.render(2))
}

/// Card-style change: `+$5.36` for gains (zero included), `-$55.44` otherwise.
pub fn format_change(change: f64) -> String {
    let sign = if change >= 0.0 { "+" } else { "" };
    format!("{sign}{}", format_currency(change))
}

/// Card-style change percent: `+1.00%`, `-7.90%`.
pub fn format_change_percent(change_percent: f64) -> String {
    let sign = if change_percent >= 0.0 { "+" } else { "" };
    format!("{sign}{}", format_percentage(change_percent))
}

/// Grouped integer part, up to three significant fraction digits.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let digits = round_fixed(value.abs(), 3);
    let rendered = digits.render_trimmed(3);
    let sign = if value < 0.0 && rendered != "0" { "-" } else { "" };
    format!("{sign}{rendered}")
}

/// Unsigned decimal rounded half away from zero to a fixed scale.
struct FixedDigits {
    integer: Vec<u8>,
    fraction: Vec<u8>,
}

impl FixedDigits {
    fn render(&self, scale: usize) -> String {
        let mut out = group_thousands(&self.integer);
        if scale > 0 {
            out.push('.');
            out.extend(self.fraction.iter().map(|d| char::from(b'0' + d)));
        }
        out
    }

    fn render_trimmed(&self, scale: usize) -> String {
        let keep = self
            .fraction
            .iter()
            .rposition(|d| *d != 0)
            .map_or(0, |idx| idx + 1)
            .min(scale);
        let mut out = group_thousands(&self.integer);
        if keep > 0 {
            out.push('.');
            out.extend(self.fraction[..keep].iter().map(|d| char::from(b'0' + d)));
        }
        out
    }
}

fn round_fixed(value: f64, scale: usize) -> FixedDigits {
    // Display for f64 never uses exponent notation.
    let repr = value.to_string();
    let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr.as_str(), ""));

    let mut integer: Vec<u8> = int_part.bytes().map(|b| b - b'0').collect();
    let mut fraction: Vec<u8> = frac_part.bytes().map(|b| b - b'0').collect();

    let round_up = fraction.get(scale).is_some_and(|d| *d >= 5);
    fraction.resize(scale, 0);

    if round_up {
        let mut carry = true;
        for digit in fraction.iter_mut().rev().chain(integer.iter_mut().rev()) {
            if *digit == 9 {
                *digit = 0;
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            integer.insert(0, 1);
        }
    }

    FixedDigits { integer, fraction }
}

fn group_thousands(digits: &[u8]) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, digit) in digits.iter().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(char::from(b'0' + digit));
    }
    out
}
