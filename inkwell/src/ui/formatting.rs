use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
};

use super::theme::ThemeColors;

/// `January 2, 2025`, used for post dates
pub fn format_post_date(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%B %-d, %Y").to_string()
}

/// Wrap body text to `max_width`, indenting each line and highlighting
/// `@mentions`.
pub fn format_body(content: &str, theme: &ThemeColors, max_width: usize, indent: usize) -> Vec<Line<'static>> {
    let wrap_width = max_width.saturating_sub(indent).max(8);
    let pad = " ".repeat(indent);
    let mut lines = vec![];

    for line in content.lines() {
        if line.trim().is_empty() {
            lines.push(Line::from(""));
            continue;
        }
        for wrapped in textwrap::wrap(line, wrap_width) {
            let mut spans = vec![Span::raw(pad.clone())];
            for (i, word) in wrapped.split(' ').enumerate() {
                if i > 0 {
                    spans.push(Span::raw(" "));
                }
                spans.push(styled_word(word, theme));
            }
            lines.push(Line::from(spans));
        }
    }

    if lines.is_empty() {
        lines.push(Line::from(""));
    }
    lines
}

fn styled_word(word: &str, theme: &ThemeColors) -> Span<'static> {
    if word.starts_with('@') && word.len() > 1 {
        Span::styled(
            word.to_string(),
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(word.to_string(), Style::default().fg(theme.text))
    }
}

/// First `max_chars` characters of `text` on one line, with an ellipsis when cut
pub fn truncate(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let cut: String = flat.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", cut.trim_end())
}

/// Rect of the given percentage size centred in `area`
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::theme_for;
    use chrono::TimeZone;
    use inkwell_types::ColorScheme;

    #[test]
    fn test_post_date() {
        let date = Utc.with_ymd_and_hms(2025, 1, 2, 15, 0, 0).unwrap();
        assert_eq!(format_post_date(&date), "January 2, 2025");
    }

    #[test]
    fn test_body_wraps_and_indents() {
        let theme = theme_for(ColorScheme::Default);
        let lines = format_body("one two three four five six", &theme, 14, 2);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.width() <= 14);
            assert_eq!(line.spans[0].content, "  ");
        }
    }

    #[test]
    fn test_mentions_are_highlighted() {
        let theme = theme_for(ColorScheme::Default);
        let lines = format_body("@bob hi", &theme, 40, 0);
        let mention = &lines[0].spans[1];
        assert_eq!(mention.content, "@bob");
        assert!(mention.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a  b\nc", 10), "a b c");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
    }
}
