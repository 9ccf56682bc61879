use ratatui::layout::Alignment;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Wrap};

use crate::theme;

pub(crate) fn wrapped_paragraph<'a, T>(text: T) -> Paragraph<'a>
where
    T: Into<Text<'a>>,
{
    Paragraph::new(text).wrap(Wrap { trim: false })
}

pub(crate) fn key_hint_paragraph<'a, T>(text: T) -> Paragraph<'a>
where
    T: Into<Text<'a>>,
{
    wrapped_paragraph(text).alignment(Alignment::Center)
}

/// Height of a bordered key hint block, growing when the hint wraps.
pub(crate) fn key_hint_height(total_width: u16, text: &str) -> u16 {
    let content_width = usize::from(total_width.saturating_sub(2).max(1));
    let lines: usize = text
        .split('\n')
        .map(|line| line.chars().count().div_ceil(content_width).max(1))
        .sum();
    u16::try_from(lines)
        .unwrap_or(u16::MAX)
        .saturating_add(2)
        .max(3)
}

pub(crate) fn compact_hint<'a>(
    width: u16,
    full: &'a str,
    medium: &'a str,
    compact: &'a str,
) -> &'a str {
    if width >= 100 {
        full
    } else if width >= 70 {
        medium
    } else {
        compact
    }
}

pub(crate) fn focus_line(message: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(message.into(), theme::focus_prompt()))
}

pub(crate) fn secondary_line(message: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(message.into(), theme::secondary_text()))
}
