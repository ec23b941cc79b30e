use inkwell_types::{ContentBlock, Post};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::comments::render_thread;
use super::formatting::{format_body, format_post_date, truncate};
use super::theme::ThemeColors;
use crate::app::{App, FormState, InputMode};
use crate::media::resolve_media_url;

const PREVIEW_CHARS: usize = 140;

fn panel<'a>(title: &'a str, theme: &ThemeColors) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
}

fn status_lines(message: &str, color: ratatui::style::Color) -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
    ]
}

pub fn render_home(frame: &mut Frame, app: &mut App, area: Rect, theme: &ThemeColors) {
    let block = panel(" Latest Posts ", theme);

    if app.home.loading && app.home.posts.is_empty() {
        let loading = Paragraph::new(status_lines("Loading posts...", theme.warning))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(loading, area);
        return;
    }
    if let Some(error) = &app.home.error {
        let mut lines = status_lines(error, theme.error);
        lines.push(Line::from(Span::styled(
            "Press h to retry",
            Style::default().fg(theme.text_dim),
        )));
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center).block(block), area);
        return;
    }
    if app.home.posts.is_empty() {
        let empty = Paragraph::new(status_lines("There are no posts yet.", theme.text_dim))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let origin = app.api.origin().to_string();
    let width = area.width.saturating_sub(6) as usize;
    let items: Vec<ListItem> = app
        .home
        .posts
        .iter()
        .map(|post| ListItem::new(post_card(post, &origin, width, theme)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(theme.highlight_bg))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, &mut app.home.list_state);
}

fn post_card(post: &Post, origin: &str, width: usize, theme: &ThemeColors) -> Vec<Line<'static>> {
    let preview = match post.preview_text() {
        Some(text) if !text.trim().is_empty() => truncate(text, PREVIEW_CHARS.min(width.max(12))),
        _ => "No content".to_string(),
    };
    let mut lines = vec![
        Line::from(Span::styled(
            post.title.clone(),
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format_post_date(&post.created_at),
            Style::default().fg(theme.text_dim),
        )),
        Line::from(Span::styled(preview, Style::default().fg(theme.text))),
    ];
    if let Some(image) = post.featured_image() {
        lines.push(Line::from(Span::styled(
            format!("[cover] {}", resolve_media_url(origin, &image.url)),
            Style::default().fg(theme.secondary),
        )));
    }
    lines.push(Line::from(""));
    lines
}

pub fn render_post_detail(frame: &mut Frame, app: &mut App, area: Rect, theme: &ThemeColors) {
    let origin = app.api.origin().to_string();
    let Some(detail) = app.post_detail.as_mut() else {
        frame.render_widget(
            Paragraph::new(status_lines("No post selected", theme.text_dim))
                .alignment(Alignment::Center)
                .block(panel(" Post ", theme)),
            area,
        );
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let lines = if detail.loading && detail.post.is_none() {
        status_lines("Loading post...", theme.warning)
    } else if let Some(error) = &detail.error {
        status_lines(error, theme.error)
    } else if let Some(post) = &detail.post {
        post_body(post, &origin, chunks[0].width.saturating_sub(2) as usize, theme)
    } else {
        vec![]
    };
    frame.render_widget(
        Paragraph::new(lines)
            .block(panel(" Post ", theme))
            .scroll((detail.scroll, 0)),
        chunks[0],
    );

    let view = detail.thread.view(&app.session, &origin);
    render_thread(
        frame,
        chunks[1],
        &view,
        &mut detail.composer,
        detail.focus,
        detail.selected_comment,
        theme,
    );
}

fn post_body(post: &Post, origin: &str, width: usize, theme: &ThemeColors) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            post.title.clone(),
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format_post_date(&post.created_at),
            Style::default().fg(theme.text_dim),
        )),
        Line::from(""),
    ];

    for block in &post.content {
        match block {
            ContentBlock::Paragraph { content, .. } => {
                lines.extend(format_body(content.as_deref().unwrap_or_default(), theme, width, 0));
                lines.push(Line::from(""));
            }
            // Image blocks whose id is not in the post's images are skipped
            ContentBlock::Image { id } => {
                if let Some(image) = id.as_deref().and_then(|id| post.image_by_id(id)) {
                    lines.push(Line::from(Span::styled(
                        format!("[image] {}", resolve_media_url(origin, &image.url)),
                        Style::default().fg(theme.secondary),
                    )));
                    lines.push(Line::from(""));
                }
            }
        }
    }
    lines
}

pub fn render_profile(frame: &mut Frame, app: &mut App, area: Rect, theme: &ThemeColors) {
    let typing = app.input_mode == InputMode::Typing;
    let profile = &mut app.profile;

    if profile.editing {
        let title = if profile.saving { " Saving... " } else { " Edit Profile " };
        render_form(frame, &mut profile.form, area, title, typing, theme);
        return;
    }

    let block = panel(" Profile ", theme);
    if profile.loading && profile.user.is_none() {
        frame.render_widget(
            Paragraph::new(status_lines("Loading profile...", theme.warning))
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
        return;
    }
    if let Some(error) = &profile.error {
        frame.render_widget(
            Paragraph::new(status_lines(error, theme.error))
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
        return;
    }
    let Some(user) = &profile.user else {
        frame.render_widget(Paragraph::new("").block(block), area);
        return;
    };

    let label = |text: &'static str| Span::styled(format!("{:<10}", text), Style::default().fg(theme.text_dim));
    let value = |text: String| Span::styled(text, Style::default().fg(theme.text));
    let mut lines = vec![
        Line::from(Span::styled(
            if user.name.is_empty() { user.username.clone() } else { user.name.clone() },
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![label("Username"), value(format!("@{}", user.username))]),
        Line::from(vec![label("Email"), value(user.email.clone())]),
        Line::from(vec![label("Role"), value(user.role().as_str().to_string())]),
    ];
    if let Some(url) = user.profile_pic_url.as_deref().filter(|u| !u.is_empty()) {
        lines.push(Line::from(vec![
            label("Picture"),
            Span::styled(resolve_media_url(app.api.origin(), url), Style::default().fg(theme.secondary)),
        ]));
    }
    lines.push(Line::from(""));
    match user.bio.as_deref().filter(|b| !b.trim().is_empty()) {
        Some(bio) => lines.extend(format_body(bio, theme, area.width.saturating_sub(2) as usize, 0)),
        None => lines.push(Line::from(Span::styled(
            "No bio yet.",
            Style::default().fg(theme.text_dim).add_modifier(Modifier::ITALIC),
        ))),
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("e: edit profile", Style::default().fg(theme.accent))));
    if user.is_admin() {
        lines.push(Line::from(Span::styled(
            "D: delete this account",
            Style::default().fg(theme.error),
        )));
    }

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
        area,
    );
}

pub fn render_login(frame: &mut Frame, app: &mut App, area: Rect, theme: &ThemeColors) {
    let typing = app.input_mode == InputMode::Typing;
    let title = if app.login.form.submitting { " Logging in... " } else { " Log In " };
    render_form(frame, &mut app.login.form, area, title, typing, theme);
}

pub fn render_register(frame: &mut Frame, app: &mut App, area: Rect, theme: &ThemeColors) {
    let typing = app.input_mode == InputMode::Typing;
    let title = if app.register.form.submitting { " Creating account... " } else { " Register " };
    render_form(frame, &mut app.register.form, area, title, typing, theme);
}

/// Stacked single-line inputs with the inline error underneath
fn render_form(
    frame: &mut Frame,
    form: &mut FormState,
    area: Rect,
    title: &str,
    typing: bool,
    theme: &ThemeColors,
) {
    let outer = panel(title, theme);
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let mut constraints: Vec<Constraint> = form.fields.iter().map(|_| Constraint::Length(3)).collect();
    constraints.push(Constraint::Min(1));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let focused = form.focused;
    for (index, field) in form.fields.iter_mut().enumerate() {
        let active = index == focused;
        let border = if active { theme.accent } else { theme.border };
        field.input.set_block(
            Block::default()
                .title(field.label)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        );
        field.input.set_cursor_line_style(Style::default());
        field.input.set_cursor_style(if active && typing {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        });
        frame.render_widget(&field.input, rows[index]);
    }

    let footer = match &form.error {
        Some(error) => Line::from(Span::styled(error.clone(), Style::default().fg(theme.error))),
        None if !typing => Line::from(Span::styled(
            "Press Enter to start typing",
            Style::default().fg(theme.text_dim),
        )),
        None => Line::from(""),
    };
    if let Some(last) = rows.last() {
        frame.render_widget(Paragraph::new(footer).wrap(Wrap { trim: true }), *last);
    }
}

pub fn render_about(frame: &mut Frame, area: Rect, theme: &ThemeColors) {
    let lines = vec![
        Line::from(Span::styled(
            "Inkwell",
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "A terminal reader for the Inkwell blogging platform.",
            Style::default().fg(theme.text),
        )),
        Line::from(Span::styled(
            "Browse posts, follow the discussion and join in once you log in.",
            Style::default().fg(theme.text),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Version {}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(theme.text_dim),
        )),
        Line::from(Span::styled("Press ? for keyboard shortcuts", Style::default().fg(theme.text_dim))),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(panel(" About ", theme)),
        area,
    );
}
