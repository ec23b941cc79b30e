use std::sync::Arc;
use std::time::Instant;

use inkwell_types::{LoginCredentials, ProfileUpdate};
use tokio::sync::mpsc::UnboundedSender;

use crate::api::BlogApi;
use crate::auth::SessionProvider;
use crate::config::{ConfigManager, UserPreferences};
use crate::logging::LogConfig;
use crate::notify::Notifications;
use crate::{log_api_call, log_comments, log_debug};

pub mod handlers;
pub mod messages;
pub mod state;
mod tasks;

pub use messages::AppMessage;
pub use state::*;
pub use tasks::save_profile_request;

pub const ERROR_LOADING_POSTS: &str = "Error loading posts";
pub const ERROR_LOADING_POST: &str = "Error loading post";
pub const LOGIN_TO_VIEW_PROFILE: &str = "You need to log in to view your profile.";

impl App {
    pub fn new(
        api: Arc<dyn BlogApi>,
        tx: UnboundedSender<AppMessage>,
        session: SessionProvider,
        config_manager: Option<ConfigManager>,
        log_config: LogConfig,
    ) -> Self {
        let color_scheme = config_manager
            .as_ref()
            .and_then(|manager| match manager.load_preferences() {
                Ok(prefs) => Some(prefs.color_scheme),
                Err(e) => {
                    log::warn!("Ignoring unreadable preferences: {:#}", e);
                    None
                }
            })
            .unwrap_or_default();

        Self {
            running: true,
            screen: Screen::Home,
            api,
            tx,
            session,
            notices: Notifications::new(),
            home: HomeState::default(),
            post_detail: None,
            login: LoginState::new(),
            register: RegisterState::new(),
            profile: ProfileState::new(),
            input_mode: InputMode::Navigation,
            show_help: false,
            color_scheme,
            config_manager,
            log_config,
        }
    }

    /// Restore any saved session, probe it, and show the home screen
    pub fn start(&mut self) {
        self.session.restore(self.api.as_ref());
        self.session.begin();
        log_api_call!(self.log_config, "GET /auth/me");
        tasks::probe_session(self.api.clone(), self.tx.clone());
        self.navigate(Screen::Home);
    }

    pub fn quit(&mut self) {
        if let Some(detail) = self.post_detail.as_mut() {
            detail.thread.unmount();
        }
        self.running = false;
    }

    pub fn tick(&mut self, now: Instant) {
        self.notices.clear_expired(now);
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn cycle_color_scheme(&mut self) {
        self.color_scheme = self.color_scheme.next();
        if let Some(manager) = &self.config_manager {
            let prefs = UserPreferences {
                color_scheme: self.color_scheme,
            };
            if let Err(e) = manager.save_preferences(&prefs) {
                log::warn!("Failed to save preferences: {:#}", e);
            }
        }
    }

    // Navigation

    pub fn navigate(&mut self, screen: Screen) {
        if self.screen == Screen::PostDetail && screen != Screen::PostDetail {
            self.close_post();
        }
        self.input_mode = InputMode::Navigation;
        log_debug!(self.log_config, "navigate {:?} -> {:?}", self.screen, screen);

        match screen {
            Screen::Home => {
                self.screen = Screen::Home;
                self.load_posts();
            }
            Screen::Login if self.session.user().is_some() => {
                self.screen = Screen::Home;
                self.load_posts();
            }
            Screen::Login => {
                self.login = LoginState::new();
                self.screen = Screen::Login;
                self.input_mode = InputMode::Typing;
            }
            Screen::Register => {
                self.register = RegisterState::new();
                self.screen = Screen::Register;
                self.input_mode = InputMode::Typing;
            }
            Screen::Profile => match self.session.user().map(|u| u.id.clone()) {
                Some(user_id) => {
                    self.screen = Screen::Profile;
                    self.load_profile(user_id);
                }
                None => {
                    self.notices.error_text(LOGIN_TO_VIEW_PROFILE);
                    self.navigate(Screen::Login);
                }
            },
            Screen::PostDetail | Screen::About => self.screen = screen,
        }
    }

    /// Esc on a screen with nothing else to close
    pub fn go_back(&mut self) {
        match self.screen {
            Screen::Home => {}
            Screen::Register => self.navigate(Screen::Login),
            _ => self.navigate(Screen::Home),
        }
    }

    fn load_posts(&mut self) {
        if self.home.loading {
            return;
        }
        self.home.loading = true;
        self.home.error = None;
        log_api_call!(self.log_config, "GET /posts");
        tasks::load_posts(self.api.clone(), self.tx.clone());
    }

    // Post detail

    pub fn open_post(&mut self, post_id: &str) {
        if self.screen == Screen::PostDetail {
            self.close_post();
        }
        let mut detail = PostDetailState::new(post_id);

        if post_id.trim().is_empty() {
            detail.error = Some(crate::thread::INVALID_POST_ID.to_string());
        } else {
            detail.loading = true;
            log_api_call!(self.log_config, "GET /posts/{}", post_id);
            tasks::load_post(
                self.api.clone(),
                self.tx.clone(),
                post_id.to_string(),
                detail.thread.child_token(),
            );
        }

        self.post_detail = Some(detail);
        self.screen = Screen::PostDetail;
        self.input_mode = InputMode::Navigation;
        self.load_comments();
    }

    fn close_post(&mut self) {
        if let Some(mut detail) = self.post_detail.take() {
            log_comments!(self.log_config, "unmounting thread for {}", detail.post_id);
            detail.thread.unmount();
        }
    }

    pub fn load_comments(&mut self) {
        let Some(detail) = self.post_detail.as_mut() else {
            return;
        };
        if let Some(ticket) = detail.thread.begin_load(&mut self.notices) {
            log_api_call!(self.log_config, "GET /comments/post/{} (#{})", ticket.post_id, ticket.seq);
            tasks::load_comments(
                self.api.clone(),
                self.tx.clone(),
                ticket,
                detail.thread.child_token(),
            );
        }
    }

    pub fn submit_comment(&mut self) {
        let Some(detail) = self.post_detail.as_mut() else {
            return;
        };
        let draft = detail.composer_text();
        detail.thread.set_draft(draft);
        if let Some(request) = detail.thread.prepare_submit(&self.session, &mut self.notices) {
            log_api_call!(self.log_config, "POST /comments (reply: {})", request.parent_id.is_some());
            tasks::submit_comment(
                self.api.clone(),
                self.tx.clone(),
                request,
                detail.thread.child_token(),
            );
        }
        if self.notices.has_blocking() {
            self.input_mode = InputMode::Navigation;
        }
    }

    pub fn reply_to_selected(&mut self) {
        let Some(detail) = self.post_detail.as_mut() else {
            return;
        };
        let Some(comment_id) = detail.selected_comment_id().map(str::to_string) else {
            return;
        };
        if detail.thread.begin_reply(&comment_id) {
            detail.sync_composer_from_thread();
            if self.session.user().is_some() {
                detail.focus = PostFocus::Composer;
                self.input_mode = InputMode::Typing;
            }
        }
    }

    pub fn cancel_reply(&mut self) {
        if let Some(detail) = self.post_detail.as_mut() {
            detail.thread.cancel_reply();
            detail.sync_composer_from_thread();
        }
    }

    /// Move into the composer; it stays closed without a session user
    pub fn focus_composer(&mut self) {
        let Some(detail) = self.post_detail.as_mut() else {
            return;
        };
        if self.session.user().is_none() {
            self.notices.blocking(crate::thread::LOGIN_REQUIRED);
            return;
        }
        detail.focus = PostFocus::Composer;
        self.input_mode = InputMode::Typing;
    }

    pub fn leave_composer(&mut self) {
        if let Some(detail) = self.post_detail.as_mut() {
            let draft = detail.composer_text();
            detail.thread.set_draft(draft);
            detail.focus = PostFocus::Comments;
        }
        self.input_mode = InputMode::Navigation;
    }

    // Session

    pub fn submit_login(&mut self) {
        if self.login.form.submitting {
            return;
        }
        let credentials = LoginCredentials {
            email: self.login.form.value(LoginState::EMAIL).trim().to_string(),
            password: self.login.form.value(LoginState::PASSWORD),
        };
        self.login.form.submitting = true;
        self.login.form.error = None;
        self.session.begin();
        log_api_call!(self.log_config, "POST /auth/login");
        tasks::login(self.api.clone(), self.tx.clone(), credentials);
    }

    pub fn logout(&mut self) {
        if self.session.user().is_none() || self.session.is_busy() {
            return;
        }
        self.session.begin();
        log_api_call!(self.log_config, "POST /auth/logout");
        tasks::logout(self.api.clone(), self.tx.clone());
    }

    pub fn submit_register(&mut self) {
        if self.register.form.submitting {
            return;
        }
        match self.register.validate() {
            Ok(data) => {
                self.register.form.submitting = true;
                self.register.form.error = None;
                log_api_call!(self.log_config, "POST /users");
                tasks::register(self.api.clone(), self.tx.clone(), data);
            }
            Err(message) => self.register.form.error = Some(message),
        }
    }

    // Profile

    fn load_profile(&mut self, user_id: String) {
        self.profile.loading = true;
        self.profile.editing = false;
        self.profile.confirm_delete = false;
        log_api_call!(self.log_config, "GET /users/{}", user_id);
        tasks::load_profile(self.api.clone(), self.tx.clone(), user_id);
    }

    pub fn start_profile_edit(&mut self) {
        if self.profile.user.is_some() {
            self.profile.start_editing();
            self.input_mode = InputMode::Typing;
        }
    }

    pub fn cancel_profile_edit(&mut self) {
        self.profile.editing = false;
        self.input_mode = InputMode::Navigation;
    }

    pub fn save_profile(&mut self) {
        let Some(user) = self.profile.user.as_ref() else {
            return;
        };
        if self.profile.saving {
            return;
        }
        let form = &self.profile.form;
        let bio = form.value(ProfileState::BIO).trim().to_string();
        let update = ProfileUpdate {
            name: form.value(ProfileState::NAME).trim().to_string(),
            username: form.value(ProfileState::USERNAME).trim().to_string(),
            email: form.value(ProfileState::EMAIL).trim().to_string(),
            bio: (!bio.is_empty()).then_some(bio),
            profile_pic_id: user.profile_pic_id.clone(),
        };
        let user_id = user.id.clone();
        let previous_picture = user.profile_pic_id.clone();
        let picture_path = self.profile.picture_path();

        self.profile.saving = true;
        log_api_call!(self.log_config, "PUT /users/{}", user_id);
        tasks::save_profile(
            self.api.clone(),
            self.tx.clone(),
            user_id,
            update,
            previous_picture,
            picture_path,
        );
    }

    /// Ask for confirmation; the action is only offered to admins
    pub fn request_delete_account(&mut self) {
        if self.session.is_admin() && self.profile.user.is_some() {
            self.profile.confirm_delete = true;
        }
    }

    pub fn confirm_delete_account(&mut self) {
        self.profile.confirm_delete = false;
        let Some(user_id) = self.profile.user.as_ref().map(|u| u.id.clone()) else {
            return;
        };
        if !self.session.is_admin() {
            return;
        }
        log_api_call!(self.log_config, "DELETE /users/{}", user_id);
        tasks::delete_account(self.api.clone(), self.tx.clone(), user_id);
    }

    // Task results

    pub fn handle_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::SessionProbed(result) => self.session.apply_probe(result),
            AppMessage::LoggedIn(result) => {
                self.login.form.submitting = false;
                match self.session.apply_login(self.api.as_ref(), result) {
                    Ok(()) => {
                        if self.screen == Screen::Login {
                            self.navigate(Screen::Home);
                        }
                    }
                    Err(e) => self.notices.error(&e),
                }
            }
            AppMessage::LoggedOut(result) => match self.session.apply_logout(result) {
                Ok(()) => {
                    if self.screen == Screen::Profile {
                        self.navigate(Screen::Home);
                    }
                }
                Err(e) => self.notices.error(&e),
            },
            AppMessage::PostsLoaded(result) => {
                self.home.loading = false;
                match result {
                    Ok(posts) => {
                        self.home.posts = posts;
                        let selected = (!self.home.posts.is_empty()).then_some(0);
                        self.home.list_state.select(selected);
                    }
                    Err(e) => {
                        log::warn!("Failed to load posts: {}", e);
                        self.home.error = Some(ERROR_LOADING_POSTS.to_string());
                    }
                }
            }
            AppMessage::PostLoaded { post_id, result } => {
                let Some(detail) = self.post_detail.as_mut() else {
                    return;
                };
                if detail.post_id != post_id || !detail.thread.is_mounted() {
                    return;
                }
                detail.loading = false;
                match result {
                    Ok(post) => detail.post = Some(post),
                    Err(e) if e.is_cancelled() => {}
                    Err(e) => {
                        log::warn!("Failed to load post {}: {}", post_id, e);
                        detail.error = Some(ERROR_LOADING_POST.to_string());
                    }
                }
            }
            AppMessage::CommentsLoaded { ticket, result } => {
                if let Some(detail) = self.post_detail.as_mut() {
                    detail.thread.apply_loaded(&ticket, result, &mut self.notices);
                    detail.clamp_selection();
                }
            }
            AppMessage::CommentSubmitted { request, result } => {
                let Some(detail) = self.post_detail.as_mut() else {
                    return;
                };
                let reload = detail
                    .thread
                    .apply_submitted(&request, result, &mut self.notices);
                if reload {
                    detail.sync_composer_from_thread();
                    detail.focus = PostFocus::Comments;
                    self.input_mode = InputMode::Navigation;
                    self.load_comments();
                }
            }
            AppMessage::Registered(result) => {
                self.register.form.submitting = false;
                match result {
                    Ok(_) => {
                        self.notices.success("Account created. Please log in.");
                        self.navigate(Screen::Login);
                    }
                    Err(e) => {
                        log::info!("Registration failed: {}", e);
                        let message = e.body_field("message").unwrap_or(REGISTER_FAILED);
                        self.register.form.error = Some(message.to_string());
                    }
                }
            }
            AppMessage::ProfileLoaded { user_id, result } => {
                if self.session.user().map(|u| u.id.as_str()) != Some(user_id.as_str()) {
                    return;
                }
                self.profile.loading = false;
                match result {
                    Ok(user) => self.profile.set_user(user),
                    Err(e) => self.profile.error = Some(e.user_message()),
                }
            }
            AppMessage::ProfileSaved(result) => {
                self.profile.saving = false;
                match result {
                    Ok(user) => {
                        self.profile.set_user(user);
                        self.profile.editing = false;
                        self.input_mode = InputMode::Navigation;
                        self.notices.success(PROFILE_UPDATED);
                        // Refresh the session user so the new name shows everywhere
                        self.session.begin();
                        tasks::probe_session(self.api.clone(), self.tx.clone());
                    }
                    Err(e) => self.notices.error(&e),
                }
            }
            AppMessage::AccountDeleted(result) => match result {
                Ok(()) => {
                    self.session.clear();
                    self.profile = ProfileState::new();
                    self.notices.success(ACCOUNT_DELETED);
                    self.navigate(Screen::Home);
                }
                Err(e) => self.notices.error(&e),
            },
        }
    }
}
