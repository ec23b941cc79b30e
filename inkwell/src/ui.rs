pub mod theme;
mod comments;
mod dialogs;
mod formatting;
mod notices;
mod screens;

pub use self::render_main::render;

mod render_main {
    use ratatui::{
        layout::{Alignment, Constraint, Direction, Layout, Rect},
        style::{Modifier, Style},
        text::{Line, Span},
        widgets::{Block, Borders, Clear, Paragraph},
        Frame,
    };

    use super::dialogs::{render_delete_confirmation, render_help};
    use super::notices::{render_blocking_notice, render_toasts};
    use super::screens;
    use super::theme::{get_theme_colors, ThemeColors};
    use crate::app::{App, InputMode, PostFocus, Screen};
    use crate::auth::SessionState;
    use crate::log_rendering;

    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 20;

    /// Render the UI
    pub fn render(app: &mut App, frame: &mut Frame) {
        let area = frame.area();
        let theme = get_theme_colors(app);
        log_rendering!(app.log_config, "render {:?} {}x{}", app.screen, area.width, area.height);

        frame.render_widget(Clear, area);
        frame.render_widget(Block::default().style(Style::default().bg(theme.background)), area);

        if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
            render_too_small(frame, area, &theme);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(1),
            ])
            .split(area);

        render_header(frame, app, chunks[0], &theme);
        match app.screen {
            Screen::Home => screens::render_home(frame, app, chunks[1], &theme),
            Screen::PostDetail => screens::render_post_detail(frame, app, chunks[1], &theme),
            Screen::Profile => screens::render_profile(frame, app, chunks[1], &theme),
            Screen::Login => screens::render_login(frame, app, chunks[1], &theme),
            Screen::Register => screens::render_register(frame, app, chunks[1], &theme),
            Screen::About => screens::render_about(frame, chunks[1], &theme),
        }
        render_footer(frame, app, chunks[2], &theme);

        render_toasts(frame, &app.notices, area, &theme);
        if app.profile.confirm_delete {
            render_delete_confirmation(frame, area, &theme);
        }
        if app.show_help {
            render_help(frame, area, &theme);
        }
        if let Some(notice) = app.notices.blocking_notice() {
            render_blocking_notice(frame, notice, area, &theme);
        }
    }

    fn render_too_small(frame: &mut Frame, area: Rect, theme: &ThemeColors) {
        let warning = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Terminal Too Small",
                Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("Minimum size: {}x{}", MIN_WIDTH, MIN_HEIGHT),
                Style::default().fg(theme.text),
            )),
            Line::from(Span::styled(
                format!("Current size: {}x{}", area.width, area.height),
                Style::default().fg(theme.warning),
            )),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.error)),
        );
        frame.render_widget(warning, area);
    }

    fn render_header(frame: &mut Frame, app: &App, area: Rect, theme: &ThemeColors) {
        let screens = [
            (Screen::Home, "h"),
            (Screen::Profile, "p"),
            (Screen::About, "a"),
        ];
        let mut spans = vec![Span::styled(
            " Inkwell ",
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
        )];
        for (screen, key) in screens {
            let active = app.screen == screen
                || (screen == Screen::Home && app.screen == Screen::PostDetail);
            let style = if active {
                Style::default()
                    .fg(theme.accent)
                    .bg(theme.highlight_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text_dim)
            };
            spans.push(Span::raw(" "));
            spans.push(Span::styled(format!("[{}] {}", key, screen.title()), style));
        }

        let who = match app.session.state() {
            SessionState::Unknown => Span::styled("checking session...", Style::default().fg(theme.text_dim)),
            SessionState::Anonymous => Span::styled(
                "not logged in ([l] login, [R] register)",
                Style::default().fg(theme.text_dim),
            ),
            SessionState::Authenticated(user) => Span::styled(
                format!("@{}{}", user.username, if user.is_admin() { " (admin)" } else { "" }),
                Style::default().fg(theme.success),
            ),
        };
        spans.push(Span::raw("   "));
        spans.push(who);

        let header = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        );
        frame.render_widget(header, area);
    }

    fn render_footer(frame: &mut Frame, app: &App, area: Rect, theme: &ThemeColors) {
        let hint = match (app.screen, app.input_mode) {
            (Screen::PostDetail, InputMode::Typing) => "Ctrl+S: post | Esc: stop typing",
            (Screen::PostDetail, InputMode::Navigation) => {
                match app.post_detail.as_ref().map(|d| d.focus) {
                    Some(PostFocus::Composer) => "s: post | x: cancel reply | Esc: back",
                    _ => "j/k: select | r: reply | c: comment | x: cancel reply | s: post | Esc: back",
                }
            }
            (Screen::Login | Screen::Register, InputMode::Typing) => {
                "Tab: next field | Enter: submit on last field | Esc: back"
            }
            (Screen::Profile, InputMode::Typing) => "Tab: next field | Ctrl+S: save | Esc: cancel",
            (Screen::Profile, _) => "e: edit | D: delete account (admin) | L: log out | Esc: back",
            (Screen::Home, _) => "j/k: select | Enter: open | t: theme | ?: help | q: quit",
            _ => "?: help | q: quit",
        };
        frame.render_widget(
            Paragraph::new(Span::styled(hint, Style::default().fg(theme.text_dim))),
            area,
        );
    }
}
