use crate::app::state::{App, FormState, InputMode, PostFocus, Screen};
use crate::log_key_event;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.kind != KeyEventKind::Press {
        return Ok(());
    }
    log_key_event!(app.log_config, "{:?} on {:?} ({:?})", key.code, app.screen, app.input_mode);

    // Priority 1: blocking notice swallows everything until dismissed
    if app.notices.has_blocking() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            app.notices.dismiss_blocking();
        }
        return Ok(());
    }

    // Priority 2: help modal
    if app.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
            app.toggle_help();
        }
        return Ok(());
    }

    // Priority 3: delete confirmation
    if app.profile.confirm_delete {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_delete_account(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.profile.confirm_delete = false
            }
            _ => {}
        }
        return Ok(());
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return Ok(());
    }

    match app.input_mode {
        InputMode::Typing => handle_typing(app, key),
        InputMode::Navigation => handle_navigation(app, key),
    }
    Ok(())
}

fn is_save_chord(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL)
}

fn handle_typing(app: &mut App, key: KeyEvent) {
    match app.screen {
        Screen::PostDetail => {
            if key.code == KeyCode::Esc {
                app.leave_composer();
            } else if is_save_chord(&key) {
                app.submit_comment();
            } else if let Some(detail) = app.post_detail.as_mut() {
                detail.composer.input(key);
            }
        }
        Screen::Login => {
            if key.code == KeyCode::Esc {
                app.go_back();
            } else if form_key(&mut app.login.form, key) {
                app.submit_login();
            }
        }
        Screen::Register => {
            if key.code == KeyCode::Esc {
                app.go_back();
            } else if form_key(&mut app.register.form, key) {
                app.submit_register();
            }
        }
        Screen::Profile if app.profile.editing => {
            if key.code == KeyCode::Esc {
                app.cancel_profile_edit();
            } else if is_save_chord(&key) || form_key(&mut app.profile.form, key) {
                app.save_profile();
            }
        }
        _ => app.input_mode = InputMode::Navigation,
    }
}

/// Move between fields or type into one. Returns true when the form
/// should be submitted.
fn form_key(form: &mut FormState, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.previous_field(),
        KeyCode::Enter if form.is_last_field() => return true,
        KeyCode::Enter => form.next_field(),
        _ => {
            if let Some(input) = form.focused_input_mut() {
                input.input(key);
            }
        }
    }
    false
}

fn handle_navigation(app: &mut App, key: KeyEvent) {
    if handle_screen_key(app, key) {
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('?') => app.toggle_help(),
        KeyCode::Char('h') => app.navigate(Screen::Home),
        KeyCode::Char('p') => app.navigate(Screen::Profile),
        KeyCode::Char('l') => app.navigate(Screen::Login),
        KeyCode::Char('R') => app.navigate(Screen::Register),
        KeyCode::Char('a') => app.navigate(Screen::About),
        KeyCode::Char('L') => app.logout(),
        KeyCode::Char('t') => app.cycle_color_scheme(),
        KeyCode::Esc => app.go_back(),
        _ => {}
    }
}

/// Keys that mean something on the current screen. Returns true if handled.
fn handle_screen_key(app: &mut App, key: KeyEvent) -> bool {
    match app.screen {
        Screen::Home => match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                app.home.select_next();
                true
            }
            KeyCode::Char('k') | KeyCode::Up => {
                app.home.select_previous();
                true
            }
            KeyCode::Enter => {
                if let Some(post_id) = app.home.selected_post().map(|p| p.id.clone()) {
                    app.open_post(&post_id);
                }
                true
            }
            _ => false,
        },
        Screen::PostDetail => handle_post_detail_key(app, key),
        Screen::Profile => match key.code {
            KeyCode::Char('e') => {
                app.start_profile_edit();
                true
            }
            KeyCode::Char('D') => {
                app.request_delete_account();
                true
            }
            _ => false,
        },
        Screen::Login | Screen::Register => match key.code {
            KeyCode::Enter | KeyCode::Char('i') => {
                app.input_mode = InputMode::Typing;
                true
            }
            _ => false,
        },
        Screen::About => false,
    }
}

fn handle_post_detail_key(app: &mut App, key: KeyEvent) -> bool {
    let Some(detail) = app.post_detail.as_mut() else {
        return false;
    };
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            let last = detail.thread.comments().len().saturating_sub(1);
            detail.selected_comment = (detail.selected_comment + 1).min(last);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            detail.selected_comment = detail.selected_comment.saturating_sub(1);
        }
        KeyCode::PageDown => detail.scroll = detail.scroll.saturating_add(5),
        KeyCode::PageUp => detail.scroll = detail.scroll.saturating_sub(5),
        KeyCode::Char('r') => app.reply_to_selected(),
        KeyCode::Char('c') | KeyCode::Char('i') => app.focus_composer(),
        KeyCode::Char('x') => app.cancel_reply(),
        KeyCode::Char('s') => app.submit_comment(),
        KeyCode::Esc if detail.focus == PostFocus::Composer => {
            detail.focus = PostFocus::Comments;
        }
        _ => return false,
    }
    true
}
