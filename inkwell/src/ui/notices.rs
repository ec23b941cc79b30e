use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::formatting::centered_rect;
use super::theme::ThemeColors;
use crate::notify::{Notice, NoticeKind, Notifications};

const TOAST_WIDTH: u16 = 44;

/// Auto-dismissing notices stacked in the top-right corner
pub fn render_toasts(frame: &mut Frame, notices: &Notifications, area: Rect, theme: &ThemeColors) {
    let width = TOAST_WIDTH.min(area.width.saturating_sub(2));
    let inner_width = width.saturating_sub(2).max(1) as usize;
    let mut y = area.y + 1;

    for notice in notices.iter().filter(|n| n.kind != NoticeKind::Blocking) {
        let lines: Vec<Line> = notice
            .message
            .lines()
            .flat_map(|line| textwrap::wrap(line, inner_width))
            .map(|line| Line::from(line.into_owned()))
            .collect();
        let height = lines.len() as u16 + 2;
        if y + height > area.bottom() {
            break;
        }

        let color = match notice.kind {
            NoticeKind::Success => theme.success,
            _ => theme.error,
        };
        let rect = Rect {
            x: area.right().saturating_sub(width + 1),
            y,
            width,
            height,
        };
        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(lines)
                .style(Style::default().fg(color).bg(theme.background))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(color)),
                ),
            rect,
        );
        y += height;
    }
}

/// Modal notice that waits for Enter or Esc
pub fn render_blocking_notice(frame: &mut Frame, notice: &Notice, area: Rect, theme: &ThemeColors) {
    let rect = centered_rect(50, 25, area);
    frame.render_widget(Clear, rect);

    let body = vec![
        Line::from(""),
        Line::from(Span::styled(
            notice.message.clone(),
            Style::default().fg(theme.warning).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter to continue",
            Style::default().fg(theme.text_dim),
        )),
    ];
    frame.render_widget(
        Paragraph::new(body)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .style(Style::default().bg(theme.background))
            .block(
                Block::default()
                    .title(" Notice ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.warning)),
            ),
        rect,
    );
}
