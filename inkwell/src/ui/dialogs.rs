use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::formatting::centered_rect;
use super::theme::ThemeColors;

const SHORTCUTS: &[(&str, &str)] = &[
    ("h / p / a", "Home, Profile, About"),
    ("l / R / L", "Log in, Register, Log out"),
    ("j / k", "Move selection"),
    ("Enter", "Open post"),
    ("c", "Write a comment"),
    ("r", "Reply to selected comment"),
    ("x", "Cancel reply"),
    ("s / Ctrl+S", "Post comment"),
    ("PgUp / PgDn", "Scroll post"),
    ("e / D", "Edit profile, delete account"),
    ("t", "Cycle colour scheme"),
    ("Esc", "Back"),
    ("q", "Quit"),
];

pub fn render_help(frame: &mut Frame, area: Rect, theme: &ThemeColors) {
    let rect = centered_rect(60, 70, area);
    frame.render_widget(Clear, rect);

    let mut lines = vec![Line::from("")];
    for (keys, action) in SHORTCUTS {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:<14}", keys),
                Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
            ),
            Span::styled(*action, Style::default().fg(theme.text)),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Press ? or Esc to close",
        Style::default().fg(theme.text_dim),
    )));

    frame.render_widget(
        Paragraph::new(lines)
            .style(Style::default().bg(theme.background))
            .block(
                Block::default()
                    .title(" Keyboard Shortcuts ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.accent)),
            ),
        rect,
    );
}

pub fn render_delete_confirmation(frame: &mut Frame, area: Rect, theme: &ThemeColors) {
    let rect = centered_rect(50, 25, area);
    frame.render_widget(Clear, rect);

    let body = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Delete this account? This cannot be undone.",
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("y: delete   n: keep", Style::default().fg(theme.text))),
    ];
    frame.render_widget(
        Paragraph::new(body)
            .alignment(Alignment::Center)
            .style(Style::default().bg(theme.background))
            .block(
                Block::default()
                    .title(" Delete Account ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.error)),
            ),
        rect,
    );
}
