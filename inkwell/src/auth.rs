use inkwell_types::{LoginCredentials, MeResponse, User};

use crate::api::{ApiError, ApiResult, BlogApi};
use crate::session::SessionStore;

/// Who is using the client right now.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Startup, before the first probe resolves
    Unknown,
    Authenticated(User),
    Anonymous,
}

/// Holds the session user and drives its lifecycle.
///
/// `Unknown -> Authenticated | Anonymous` through `probe`, then `login` and
/// `logout` move between the two resolved states. Each transition replaces
/// `state` in a single assignment. The provider is owned by the app and
/// handed to whatever needs the current user.
///
/// Every async operation also has a `begin_*`/`apply_*` pair so the UI can
/// run the request on a background task and apply the result later.
#[derive(Debug)]
pub struct SessionProvider {
    state: SessionState,
    busy: bool,
    store: Option<SessionStore>,
}

impl SessionProvider {
    pub fn new(store: Option<SessionStore>) -> Self {
        Self {
            state: SessionState::Unknown,
            busy: false,
            store,
        }
    }

    /// Provider that never touches the disk
    pub fn in_memory() -> Self {
        Self::new(None)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        match &self.state {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.user().map(User::is_admin).unwrap_or(false)
    }

    pub fn is_resolved(&self) -> bool {
        self.state != SessionState::Unknown
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Load saved cookies into the API client's jar before the first probe.
    pub fn restore(&self, api: &dyn BlogApi) {
        let Some(store) = &self.store else {
            return;
        };
        match store.load() {
            Ok(Some(cookies)) => {
                log::info!(target: "session", "Restoring saved session");
                api.restore_session(&cookies);
            }
            Ok(None) => log::debug!(target: "session", "No saved session"),
            Err(e) => log::warn!(target: "session", "Could not read saved session: {:#}", e),
        }
    }

    /// Mark a session request as in flight
    pub fn begin(&mut self) {
        self.busy = true;
    }

    /// Only a 401 or an empty `me` signs a known user out; other failures
    /// keep an authenticated state and resolve `Unknown` to `Anonymous`.
    pub fn apply_probe(&mut self, result: ApiResult<MeResponse>) {
        self.busy = false;
        if let (Err(e), SessionState::Authenticated(user)) = (&result, &self.state) {
            if !e.is_unauthorized() {
                log::warn!(target: "session", "Session probe failed, keeping {}: {}", user.username, e);
                return;
            }
        }
        self.state = match result {
            Ok(MeResponse { user: Some(user) }) => {
                log::info!(target: "session", "Session user: {}", user.username);
                SessionState::Authenticated(user)
            }
            Ok(MeResponse { user: None }) => SessionState::Anonymous,
            Err(e) if e.is_unauthorized() => {
                self.forget_saved_session();
                SessionState::Anonymous
            }
            Err(e) => {
                log::warn!(target: "session", "Session probe failed: {}", e);
                SessionState::Anonymous
            }
        };
    }

    pub async fn probe(&mut self, api: &dyn BlogApi) {
        self.begin();
        let result = api.me().await;
        self.apply_probe(result);
    }

    /// Apply the outcome of `POST /auth/login` followed by `GET /auth/me`.
    ///
    /// A failed login leaves the state alone and hands the error back. A
    /// login the server accepted but whose probe fails is reported as an
    /// error too, with the state resolved from the probe.
    pub fn apply_login(&mut self, api: &dyn BlogApi, result: ApiResult<MeResponse>) -> ApiResult<()> {
        self.busy = false;
        let me = match result {
            Ok(me) => me,
            Err(e) => {
                log::info!(target: "session", "Login failed: {}", e);
                return Err(e);
            }
        };

        match me.user {
            Some(user) => {
                log::info!(target: "session", "Logged in as {}", user.username);
                self.state = SessionState::Authenticated(user);
                self.persist(api);
                Ok(())
            }
            None => {
                self.state = SessionState::Anonymous;
                Err(ApiError::from("Login succeeded but no session was established"))
            }
        }
    }

    pub async fn login(&mut self, api: &dyn BlogApi, credentials: &LoginCredentials) -> ApiResult<()> {
        self.begin();
        let result = login_request(api, credentials).await;
        self.apply_login(api, result)
    }

    pub fn apply_logout(&mut self, result: ApiResult<()>) -> ApiResult<()> {
        self.busy = false;
        match result {
            Ok(()) => {
                log::info!(target: "session", "Logged out");
                self.state = SessionState::Anonymous;
                self.forget_saved_session();
                Ok(())
            }
            Err(e) => {
                log::warn!(target: "session", "Logout failed: {}", e);
                Err(e)
            }
        }
    }

    pub async fn logout(&mut self, api: &dyn BlogApi) -> ApiResult<()> {
        self.begin();
        let result = api.logout().await;
        self.apply_logout(result)
    }

    /// Drop the session after the account behind it was deleted
    pub fn clear(&mut self) {
        self.state = SessionState::Anonymous;
        self.forget_saved_session();
    }

    fn persist(&self, api: &dyn BlogApi) {
        let (Some(store), Some(cookies)) = (&self.store, api.session_cookies()) else {
            return;
        };
        if let Err(e) = store.save(&cookies) {
            log::warn!(target: "session", "Could not save session: {:#}", e);
        }
    }

    fn forget_saved_session(&self) {
        if let Some(store) = &self.store {
            if let Err(e) = store.delete() {
                log::warn!(target: "session", "Could not delete saved session: {:#}", e);
            }
        }
    }
}

/// `POST /auth/login` then `GET /auth/me`, as one request for a background task
pub async fn login_request(api: &dyn BlogApi, credentials: &LoginCredentials) -> ApiResult<MeResponse> {
    api.login(credentials).await?;
    api.me().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{user, FakeApi};
    use serde_json::json;
    use tempfile::TempDir;

    fn credentials() -> LoginCredentials {
        LoginCredentials {
            email: "alice@example.com".to_string(),
            password: "hunter22".to_string(),
        }
    }

    #[tokio::test]
    async fn test_probe_with_user_authenticates() {
        let api = FakeApi::default();
        *api.me.lock().unwrap() = Some(user("u1", "alice"));

        let mut session = SessionProvider::in_memory();
        assert!(!session.is_resolved());
        session.probe(&api).await;

        assert!(session.is_resolved());
        assert_eq!(session.user().map(|u| u.username.as_str()), Some("alice"));
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_probe_unauthorized_is_anonymous() {
        let api = FakeApi::default();
        *api.me_failure.lock().unwrap() = Some((401, json!({ "message": "Unauthorized" })));

        let mut session = SessionProvider::in_memory();
        session.probe(&api).await;
        assert_eq!(session.state(), &SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_probe_server_error_is_anonymous() {
        let api = FakeApi::default();
        *api.me_failure.lock().unwrap() = Some((500, json!({})));

        let mut session = SessionProvider::in_memory();
        session.probe(&api).await;
        assert_eq!(session.state(), &SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_server_error_keeps_signed_in_user() {
        let api = FakeApi::default();
        *api.me.lock().unwrap() = Some(user("u1", "alice"));
        let mut session = SessionProvider::in_memory();
        session.probe(&api).await;

        *api.me_failure.lock().unwrap() = Some((503, json!({})));
        session.probe(&api).await;
        assert_eq!(session.user().map(|u| u.username.as_str()), Some("alice"));
        assert!(!session.is_busy());

        *api.me_failure.lock().unwrap() = Some((401, json!({})));
        session.probe(&api).await;
        assert_eq!(session.state(), &SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_login_then_logout() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::at(temp_dir.path().join("session"));
        let api = FakeApi::default();
        *api.me.lock().unwrap() = Some(user("u1", "alice"));

        let mut session = SessionProvider::new(Some(store.clone()));
        session.login(&api, &credentials()).await.unwrap();
        assert!(session.user().is_some());
        assert_eq!(store.load().unwrap(), Some("sid=fake-session".to_string()));

        session.logout(&api).await.unwrap();
        assert_eq!(session.state(), &SessionState::Anonymous);
        assert_eq!(store.load().unwrap(), None);
    }

    #[tokio::test]
    async fn test_failed_login_keeps_state() {
        let api = FakeApi::default();
        *api.login_failure.lock().unwrap() = Some((401, json!({ "error": "Invalid credentials" })));

        let mut session = SessionProvider::in_memory();
        session.probe(&api).await;
        let err = session.login(&api, &credentials()).await.unwrap_err();

        assert_eq!(err.user_message(), "Invalid credentials");
        assert_eq!(session.state(), &SessionState::Anonymous);
        assert_eq!(api.call_count("GET /auth/me"), 1);
    }

    #[tokio::test]
    async fn test_failed_logout_keeps_user() {
        let api = FakeApi::default();
        *api.me.lock().unwrap() = Some(user("u1", "alice"));
        *api.logout_failure.lock().unwrap() = Some((500, json!({})));

        let mut session = SessionProvider::in_memory();
        session.probe(&api).await;
        assert!(session.logout(&api).await.is_err());
        assert!(session.user().is_some());
    }

    #[tokio::test]
    async fn test_restore_loads_cookies_into_client() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::at(temp_dir.path().join("session"));
        store.save("sid=saved").unwrap();

        let api = FakeApi::default();
        SessionProvider::new(Some(store)).restore(&api);
        assert_eq!(api.session_cookies(), Some("sid=saved".to_string()));
    }

    #[test]
    fn test_admin_role() {
        let mut session = SessionProvider::in_memory();
        let mut admin = user("u1", "root");
        admin.role_name = Some("admin".to_string());
        session.apply_probe(Ok(MeResponse { user: Some(admin) }));
        assert!(session.is_admin());

        session.clear();
        assert!(!session.is_admin());
    }
}
