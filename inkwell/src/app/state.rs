use std::sync::Arc;

use inkwell_types::{ColorScheme, Post, PostId, RegisterData, User};
use ratatui::widgets::ListState;
use tokio::sync::mpsc::UnboundedSender;
use tui_textarea::TextArea;

use crate::api::BlogApi;
use crate::auth::SessionProvider;
use crate::config::ConfigManager;
use crate::logging::LogConfig;
use crate::notify::Notifications;
use crate::thread::CommentThread;

use super::messages::AppMessage;

/// Main application state
pub struct App {
    pub running: bool,
    pub screen: Screen,
    pub api: Arc<dyn BlogApi>,
    pub tx: UnboundedSender<AppMessage>,
    pub session: SessionProvider,
    pub notices: Notifications,
    pub home: HomeState,
    pub post_detail: Option<PostDetailState>,
    pub login: LoginState,
    pub register: RegisterState,
    pub profile: ProfileState,
    pub input_mode: InputMode,
    pub show_help: bool,
    pub color_scheme: ColorScheme,
    pub config_manager: Option<ConfigManager>,
    pub log_config: LogConfig,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Navigation, // Browsing content, shortcuts active
    Typing,     // In text input, shortcuts disabled
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    PostDetail,
    Profile,
    Login,
    Register,
    About,
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Home => "Home",
            Screen::PostDetail => "Post",
            Screen::Profile => "Profile",
            Screen::Login => "Login",
            Screen::Register => "Register",
            Screen::About => "About",
        }
    }
}

/// Home screen: list of post cards
#[derive(Default)]
pub struct HomeState {
    pub posts: Vec<Post>,
    pub loading: bool,
    pub error: Option<String>,
    pub list_state: ListState,
}

impl HomeState {
    pub fn selected_post(&self) -> Option<&Post> {
        self.list_state.selected().and_then(|i| self.posts.get(i))
    }

    pub fn select_next(&mut self) {
        if self.posts.is_empty() {
            return;
        }
        let next = match self.list_state.selected() {
            Some(i) => (i + 1).min(self.posts.len() - 1),
            None => 0,
        };
        self.list_state.select(Some(next));
    }

    pub fn select_previous(&mut self) {
        if self.posts.is_empty() {
            return;
        }
        let previous = self.list_state.selected().map(|i| i.saturating_sub(1)).unwrap_or(0);
        self.list_state.select(Some(previous));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFocus {
    Comments,
    Composer,
}

/// A single post with its comment thread mounted
pub struct PostDetailState {
    pub post_id: PostId,
    pub post: Option<Post>,
    pub loading: bool,
    pub error: Option<String>,
    pub thread: CommentThread,
    pub composer: TextArea<'static>,
    pub focus: PostFocus,
    /// Index into the thread's top-level comments
    pub selected_comment: usize,
    pub scroll: u16,
}

impl PostDetailState {
    pub fn new(post_id: impl Into<PostId>) -> Self {
        let post_id = post_id.into();
        Self {
            thread: CommentThread::new(post_id.clone()),
            post_id,
            post: None,
            loading: false,
            error: None,
            composer: TextArea::default(),
            focus: PostFocus::Comments,
            selected_comment: 0,
            scroll: 0,
        }
    }

    pub fn selected_comment_id(&self) -> Option<&str> {
        self.thread
            .comments()
            .get(self.selected_comment)
            .map(|c| c.id.as_str())
    }

    pub fn composer_text(&self) -> String {
        self.composer.lines().join("\n")
    }

    /// Replace the composer contents with the thread's draft
    pub fn sync_composer_from_thread(&mut self) {
        let draft = self.thread.draft();
        if self.composer_text() == draft {
            return;
        }
        let lines: Vec<String> = if draft.is_empty() {
            vec![String::new()]
        } else {
            draft.split('\n').map(str::to_string).collect()
        };
        self.composer = TextArea::new(lines);
        self.composer
            .move_cursor(tui_textarea::CursorMove::Bottom);
        self.composer.move_cursor(tui_textarea::CursorMove::End);
    }

    pub fn clamp_selection(&mut self) {
        let len = self.thread.comments().len();
        self.selected_comment = self.selected_comment.min(len.saturating_sub(1));
    }
}

/// One labelled text input
pub struct FormField {
    pub label: &'static str,
    pub input: TextArea<'static>,
}

impl FormField {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            input: TextArea::default(),
        }
    }

    pub fn secret(label: &'static str) -> Self {
        let mut input = TextArea::default();
        input.set_mask_char('*');
        Self { label, input }
    }

    pub fn with_value(label: &'static str, value: &str) -> Self {
        Self {
            label,
            input: TextArea::new(vec![value.to_string()]),
        }
    }

    pub fn value(&self) -> String {
        self.input.lines().join("\n")
    }
}

/// Fields plus focus, shared by the login, register and profile forms
pub struct FormState {
    pub fields: Vec<FormField>,
    pub focused: usize,
    pub submitting: bool,
    pub error: Option<String>,
}

impl FormState {
    pub fn new(fields: Vec<FormField>) -> Self {
        Self {
            fields,
            focused: 0,
            submitting: false,
            error: None,
        }
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + 1) % self.fields.len();
        }
    }

    pub fn previous_field(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
        }
    }

    pub fn is_last_field(&self) -> bool {
        self.focused + 1 == self.fields.len()
    }

    pub fn focused_input_mut(&mut self) -> Option<&mut TextArea<'static>> {
        self.fields.get_mut(self.focused).map(|f| &mut f.input)
    }

    pub fn value(&self, index: usize) -> String {
        self.fields.get(index).map(FormField::value).unwrap_or_default()
    }

    pub fn set_value(&mut self, index: usize, value: &str) {
        if let Some(field) = self.fields.get_mut(index) {
            let mask = field.input.mask_char();
            field.input = TextArea::new(vec![value.to_string()]);
            if let Some(mask) = mask {
                field.input.set_mask_char(mask);
            }
        }
    }
}

pub struct LoginState {
    pub form: FormState,
}

impl LoginState {
    pub const EMAIL: usize = 0;
    pub const PASSWORD: usize = 1;

    pub fn new() -> Self {
        Self {
            form: FormState::new(vec![FormField::new("Email"), FormField::secret("Password")]),
        }
    }
}

impl Default for LoginState {
    fn default() -> Self {
        Self::new()
    }
}

pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match";
pub const REGISTER_FAILED: &str = "Error registering user";

pub struct RegisterState {
    pub form: FormState,
}

impl RegisterState {
    pub const NAME: usize = 0;
    pub const USERNAME: usize = 1;
    pub const EMAIL: usize = 2;
    pub const PASSWORD: usize = 3;
    pub const CONFIRM: usize = 4;

    pub fn new() -> Self {
        Self {
            form: FormState::new(vec![
                FormField::new("Name"),
                FormField::new("Username"),
                FormField::new("Email"),
                FormField::secret("Password"),
                FormField::secret("Confirm Password"),
            ]),
        }
    }

    /// Build the registration body, or the inline error to show instead
    pub fn validate(&self) -> Result<RegisterData, String> {
        let password = self.form.value(Self::PASSWORD);
        let confirm_password = self.form.value(Self::CONFIRM);
        if password != confirm_password {
            return Err(PASSWORDS_DO_NOT_MATCH.to_string());
        }
        Ok(RegisterData {
            name: self.form.value(Self::NAME).trim().to_string(),
            username: self.form.value(Self::USERNAME).trim().to_string(),
            email: self.form.value(Self::EMAIL).trim().to_string(),
            password,
            confirm_password,
        })
    }
}

impl Default for RegisterState {
    fn default() -> Self {
        Self::new()
    }
}

pub const PROFILE_UPDATED: &str = "Profile updated successfully.";
pub const ACCOUNT_DELETED: &str = "Your account has been deleted.";

/// Profile screen for the session user
pub struct ProfileState {
    pub user: Option<User>,
    pub loading: bool,
    pub error: Option<String>,
    pub editing: bool,
    pub form: FormState,
    pub saving: bool,
    pub confirm_delete: bool,
}

impl ProfileState {
    pub const NAME: usize = 0;
    pub const USERNAME: usize = 1;
    pub const EMAIL: usize = 2;
    pub const BIO: usize = 3;
    pub const PICTURE: usize = 4;

    pub fn new() -> Self {
        Self {
            user: None,
            loading: false,
            error: None,
            editing: false,
            form: Self::form_for(None),
            saving: false,
            confirm_delete: false,
        }
    }

    fn form_for(user: Option<&User>) -> FormState {
        let value = |f: fn(&User) -> String| user.map(f).unwrap_or_default();
        FormState::new(vec![
            FormField::with_value("Name", &value(|u| u.name.clone())),
            FormField::with_value("Username", &value(|u| u.username.clone())),
            FormField::with_value("Email", &value(|u| u.email.clone())),
            FormField::with_value("Bio", &value(|u| u.bio.clone().unwrap_or_default())),
            FormField::new("New picture (file path)"),
        ])
    }

    /// Show a freshly loaded or saved user and reset the form to it
    pub fn set_user(&mut self, user: User) {
        self.form = Self::form_for(Some(&user));
        self.user = Some(user);
        self.loading = false;
        self.error = None;
    }

    pub fn start_editing(&mut self) {
        self.form = Self::form_for(self.user.as_ref());
        self.editing = true;
    }

    pub fn picture_path(&self) -> Option<String> {
        let path = self.form.value(Self::PICTURE).trim().to_string();
        (!path.is_empty()).then_some(path)
    }
}

impl Default for ProfileState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(form: &mut FormState, values: &[&str]) {
        for (i, value) in values.iter().enumerate() {
            form.set_value(i, value);
        }
    }

    #[test]
    fn test_register_password_mismatch() {
        let mut register = RegisterState::new();
        fill(&mut register.form, &["Ann", "ann", "ann@x.com", "secret1", "secret2"]);
        assert_eq!(register.validate().unwrap_err(), PASSWORDS_DO_NOT_MATCH);

        register.form.set_value(RegisterState::CONFIRM, "secret1");
        let data = register.validate().unwrap();
        assert_eq!(data.username, "ann");
        assert_eq!(data.confirm_password, "secret1");
    }

    #[test]
    fn test_secret_fields_stay_masked() {
        let mut login = LoginState::new();
        login.form.set_value(LoginState::PASSWORD, "pw");
        assert_eq!(login.form.fields[LoginState::PASSWORD].input.mask_char(), Some('*'));
        assert_eq!(login.form.value(LoginState::PASSWORD), "pw");
    }

    #[test]
    fn test_form_focus_wraps() {
        let mut form = LoginState::new().form;
        form.previous_field();
        assert_eq!(form.focused, 1);
        assert!(form.is_last_field());
        form.next_field();
        assert_eq!(form.focused, 0);
    }

    #[test]
    fn test_home_selection_is_clamped() {
        let mut home = HomeState::default();
        home.select_next();
        assert_eq!(home.list_state.selected(), None);

        home.posts = vec![
            crate::api::testing::post("p1", "One"),
            crate::api::testing::post("p2", "Two"),
        ];
        home.select_next();
        home.select_next();
        home.select_next();
        assert_eq!(home.selected_post().map(|p| p.id.as_str()), Some("p2"));
        home.select_previous();
        home.select_previous();
        assert_eq!(home.selected_post().map(|p| p.id.as_str()), Some("p1"));
    }

    #[test]
    fn test_composer_follows_thread_draft() {
        let mut detail = PostDetailState::new("p1");
        detail.thread.set_draft("@bob hi");
        detail.sync_composer_from_thread();
        assert_eq!(detail.composer_text(), "@bob hi");

        detail.thread.cancel_reply();
        detail.sync_composer_from_thread();
        assert_eq!(detail.composer_text(), "");
    }
}
