use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_textarea::TextArea;

use super::formatting::format_body;
use super::theme::ThemeColors;
use crate::app::PostFocus;
use crate::media::Avatar;
use crate::thread::{CommentView, ThreadBody, ThreadView, EMPTY_THREAD};

const COMPOSER_HEIGHT: u16 = 6;

/// Comment count header, composer, then the comment list
pub fn render_thread(
    frame: &mut Frame,
    area: Rect,
    view: &ThreadView,
    composer: &mut TextArea<'static>,
    focus: PostFocus,
    selected: usize,
    theme: &ThemeColors,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(COMPOSER_HEIGHT), Constraint::Min(3)])
        .split(area);

    render_composer(frame, chunks[0], view, composer, focus, theme);

    let block = Block::default()
        .title(format!(" Comments ({}) ", view.count))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));
    let inner_width = chunks[1].width.saturating_sub(2) as usize;

    let lines = match &view.body {
        ThreadBody::Loading => vec![Line::from(Span::styled(
            "Loading comments...",
            Style::default().fg(theme.text_dim),
        ))],
        ThreadBody::Empty => vec![
            Line::from(""),
            Line::from(Span::styled(
                EMPTY_THREAD,
                Style::default().fg(theme.accent).add_modifier(Modifier::ITALIC),
            )),
        ],
        ThreadBody::Comments(comments) => comment_lines(comments, selected, inner_width, theme),
    };

    // Keep the selected comment in view
    let offset = match &view.body {
        ThreadBody::Comments(comments) => selected_offset(comments, selected, inner_width),
        _ => 0,
    };
    let visible = chunks[1].height.saturating_sub(2);
    let scroll = offset.saturating_sub(visible / 3);

    frame.render_widget(Paragraph::new(lines).block(block).scroll((scroll, 0)), chunks[1]);
}

fn render_composer(
    frame: &mut Frame,
    area: Rect,
    view: &ThreadView,
    composer: &mut TextArea<'static>,
    focus: PostFocus,
    theme: &ThemeColors,
) {
    let composer_view = &view.composer;
    let title = match &composer_view.replying_to {
        Some(author) => format!(" Replying to {} (x to cancel) ", author),
        None => " New comment ".to_string(),
    };

    if !composer_view.enabled {
        let disabled = Paragraph::new(Span::styled(
            composer_view.placeholder,
            Style::default().fg(theme.text_dim).add_modifier(Modifier::ITALIC),
        ))
        .block(
            Block::default()
                .title(" Comments are for members ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.text_dim)),
        );
        frame.render_widget(disabled, area);
        return;
    }

    let focused = focus == PostFocus::Composer;
    let border = if focused { theme.accent } else { theme.border };
    let submit_style = if composer_view.can_submit {
        Style::default().fg(theme.success).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text_dim)
    };

    composer.set_placeholder_text(composer_view.placeholder);
    composer.set_placeholder_style(Style::default().fg(theme.text_dim));
    composer.set_style(Style::default().fg(theme.text));
    composer.set_cursor_line_style(Style::default());
    composer.set_cursor_style(if focused {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    });
    composer.set_block(
        Block::default()
            .title(title)
            .title_bottom(Line::from(Span::styled(
                format!(" [{}] ", composer_view.submit_label),
                submit_style,
            )))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(&*composer, area);
}

fn avatar_span(avatar: &Avatar, theme: &ThemeColors) -> Span<'static> {
    match avatar {
        Avatar::Image(_) => Span::styled("[*]", Style::default().fg(theme.accent)),
        Avatar::Initial { letter, known } => {
            let color = if *known { theme.primary } else { theme.text_dim };
            Span::styled(
                format!("[{}]", letter),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )
        }
    }
}

fn comment_header(comment: &CommentView, selected: bool, theme: &ThemeColors, indent: &str) -> Line<'static> {
    let marker = if selected { "> " } else { "  " };
    let mut spans = vec![
        Span::styled(format!("{}{}", indent, marker), Style::default().fg(theme.accent)),
        avatar_span(&comment.avatar, theme),
        Span::raw(" "),
        Span::styled(
            comment.author.clone(),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {}", comment.date), Style::default().fg(theme.text_dim)),
    ];
    if comment.is_reply_target {
        spans.push(Span::styled("  (replying)", Style::default().fg(theme.warning)));
    }
    Line::from(spans)
}

fn comment_lines(
    comments: &[CommentView],
    selected: usize,
    width: usize,
    theme: &ThemeColors,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (index, comment) in comments.iter().enumerate() {
        let is_selected = index == selected;
        lines.push(comment_header(comment, is_selected, theme, ""));
        lines.extend(format_body(&comment.content, theme, width, 6));

        if let Some(label) = &comment.reply_label {
            lines.push(Line::from(Span::styled(
                format!("      {}", label),
                Style::default().fg(theme.secondary),
            )));
            for reply in &comment.replies {
                lines.push(comment_header(reply, false, theme, "    "));
                lines.extend(format_body(&reply.content, theme, width, 10));
            }
        }
        lines.push(Line::from(""));
    }
    lines
}

/// Line index where the selected comment starts
fn selected_offset(comments: &[CommentView], selected: usize, width: usize) -> u16 {
    let theme = super::theme::theme_for(Default::default());
    let lines: usize = comments
        .iter()
        .take(selected)
        .map(|c| comment_lines(std::slice::from_ref(c), usize::MAX, width, &theme).len())
        .sum();
    lines.min(u16::MAX as usize) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::theme_for;
    use inkwell_types::ColorScheme;

    fn view(id: &str, replies: usize) -> CommentView {
        CommentView {
            id: id.to_string(),
            author: "bob".to_string(),
            date: "Mar 5, 2025".to_string(),
            content: "hello there".to_string(),
            avatar: Avatar::Initial { letter: 'B', known: true },
            reply_label: (replies > 0).then(|| format!("{} Replies", replies)),
            replies: (0..replies).map(|i| view(&format!("{}-{}", id, i), 0)).collect(),
            is_reply_target: false,
        }
    }

    #[test]
    fn test_replies_are_listed_under_count() {
        let theme = theme_for(ColorScheme::Default);
        let lines = comment_lines(&[view("c1", 2)], 0, 60, &theme);
        let text: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        assert!(text[0].starts_with("> [B] bob"));
        assert!(text.iter().any(|l| l.trim() == "2 Replies"));
        assert_eq!(text.iter().filter(|l| l.contains("bob  Mar 5, 2025")).count(), 3);
    }

    #[test]
    fn test_selected_offset_skips_earlier_comments() {
        let comments = [view("c1", 0), view("c2", 1)];
        assert_eq!(selected_offset(&comments, 0, 60), 0);
        // header, body, spacer
        assert_eq!(selected_offset(&comments, 1, 60), 3);
    }
}
