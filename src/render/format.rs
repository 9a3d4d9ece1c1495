//! Number and time formatting for display. Anything non-finite renders as zero.

/// Thousands-grouped with up to three fraction digits: `1234567.5` → `1,234,567.5`.
#[must_use]
pub fn number(value: f64) -> String {
    if !value.is_finite() || value == 0.0 {
        return "0".to_string();
    }

    let formatted = format!("{:.3}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');
    if int_part == "0" && frac.is_empty() {
        return "0".to_string();
    }

    let mut out = String::with_capacity(formatted.len() + int_part.len() / 3 + 1);
    if value < 0.0 {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[must_use]
pub fn fixed(value: f64, decimals: usize) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    format!("{value:.decimals$}")
}

/// Two decimals with a percent sign; the value is already a percentage.
#[must_use]
pub fn percent(value: f64) -> String {
    format!("{}%", fixed(value, 2))
}

#[must_use]
pub fn currency(value: f64) -> String {
    format!("¥{}", fixed(value, 2))
}

/// `part / total` as a one-decimal percentage, `0` when `total` is not positive.
#[must_use]
pub fn share(part: f64, total: f64) -> String {
    if total > 0.0 { fixed(part / total * 100.0, 1) } else { "0".to_string() }
}

/// Time-of-day portion of an ISO-8601 timestamp, without fractional seconds.
#[must_use]
pub fn time_of_day(timestamp: &str) -> String {
    let Some((_, time)) = timestamp.split_once('T').or_else(|| timestamp.split_once(' ')) else {
        return timestamp.to_string();
    };
    let end = time.find(|c: char| !(c.is_ascii_digit() || c == ':')).unwrap_or(time.len());
    time[..end].to_string()
}
