use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub title: String,
    pub value: String,
    pub sub: Option<String>,
}

impl StatCard {
    #[must_use]
    pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self { title: title.into(), value: value.into(), sub: None }
    }

    #[must_use]
    pub fn sub(mut self, sub: impl Into<String>) -> Self {
        self.sub = Some(sub.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Info,
    Warning,
    Error,
}

#[must_use]
pub fn alert(kind: AlertKind, message: &str) -> String {
    let icon = match kind {
        AlertKind::Success => "✅",
        AlertKind::Info => "ℹ️",
        AlertKind::Warning => "⚠️",
        AlertKind::Error => "❌",
    };
    format!("{icon} {message}\n")
}

#[must_use]
pub fn heading(title: &str) -> String {
    format!("== {title} ==\n")
}

/// Terminal column width: East Asian wide characters and emoji take two cells.
#[must_use]
pub fn display_width(text: &str) -> usize {
    text.chars().map(|c| if is_wide(c) { 2 } else { 1 }).sum()
}

const fn is_wide(c: char) -> bool {
    matches!(c as u32,
        0x1100..=0x115F
        | 0x2E80..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
        | 0x1F300..=0x1FAFF)
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(text));
    format!("{text}{}", " ".repeat(fill))
}

/// One card per line: title, value and optional caption in aligned columns.
#[must_use]
pub fn cards(cards: &[StatCard]) -> String {
    let title_w = cards.iter().map(|c| display_width(&c.title)).max().unwrap_or(0);
    let value_w = cards.iter().map(|c| display_width(&c.value)).max().unwrap_or(0);

    let mut out = String::new();
    for card in cards {
        let line = match &card.sub {
            Some(sub) => format!("  {}  {}  {sub}", pad(&card.title, title_w), pad(&card.value, value_w)),
            None => format!("  {}  {}", pad(&card.title, title_w), card.value),
        };
        let _ = writeln!(out, "{}", line.trim_end());
    }
    out
}

#[must_use]
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(display_width(cell));
            }
        }
    }

    let mut out = render_row(headers.iter().copied(), &widths);
    let rule = widths.iter().map(|&w| "-".repeat(w)).collect::<Vec<_>>().join("-+-");
    let _ = writeln!(out, "  {rule}");
    for row in rows {
        out.push_str(&render_row(row.iter().map(String::as_str), &widths));
    }
    out
}

fn render_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let line = cells.zip(widths).map(|(cell, &w)| pad(cell, w)).collect::<Vec<_>>().join(" | ");
    format!("  {}\n", line.trim_end())
}

/// Horizontal bar filled in proportion to `fraction` (clamped to `[0, 1]`), captioned with one decimal.
#[must_use]
pub fn confidence_bar(fraction: f64, width: usize) -> String {
    let fraction = if fraction.is_finite() { fraction.clamp(0.0, 1.0) } else { 0.0 };
    let width = width.max(1);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = ((fraction * width as f64).round() as usize).min(width);
    format!("[{}{}] {:.1}%", "█".repeat(filled), "░".repeat(width - filled), fraction * 100.0)
}
