use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::api::ApiError;

pub const SUCCESS_TTL: Duration = Duration::from_secs(4);
pub const ERROR_TTL: Duration = Duration::from_secs(5);

/// Notices kept on screen at once; older ones are dropped first
const MAX_NOTICES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    /// Modal notice that stays until the user dismisses it
    Blocking,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub raised_at: Instant,
    pub ttl: Option<Duration>,
}

impl Notice {
    fn new(kind: NoticeKind, message: impl Into<String>, ttl: Option<Duration>) -> Self {
        Self {
            kind,
            message: message.into(),
            raised_at: Instant::now(),
            ttl,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        match self.ttl {
            Some(ttl) => now.saturating_duration_since(self.raised_at) >= ttl,
            None => false,
        }
    }
}

/// Stack of user-facing notices drawn over the current screen.
#[derive(Debug, Default)]
pub struct Notifications {
    notices: VecDeque<Notice>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Notice::new(NoticeKind::Success, message, Some(SUCCESS_TTL)));
    }

    /// Show the messages extracted from an API failure
    pub fn error(&mut self, error: &ApiError) {
        if error.is_cancelled() {
            return;
        }
        self.error_text(error.user_message());
    }

    pub fn error_text(&mut self, message: impl Into<String>) {
        self.push(Notice::new(NoticeKind::Error, message, Some(ERROR_TTL)));
    }

    pub fn blocking(&mut self, message: impl Into<String>) {
        self.push(Notice::new(NoticeKind::Blocking, message, None));
    }

    fn push(&mut self, notice: Notice) {
        log::debug!(target: "general", "notice {:?}: {}", notice.kind, notice.message);
        self.notices.push_back(notice);
        while self.notices.len() > MAX_NOTICES {
            // Never drop a blocking notice to make room
            match self.notices.iter().position(|n| n.kind != NoticeKind::Blocking) {
                Some(index) => {
                    self.notices.remove(index);
                }
                None => break,
            }
        }
    }

    pub fn clear_expired(&mut self, now: Instant) {
        self.notices.retain(|n| !n.is_expired(now));
    }

    /// Dismiss the oldest blocking notice. Returns true if one was removed.
    pub fn dismiss_blocking(&mut self) -> bool {
        match self
            .notices
            .iter()
            .position(|n| n.kind == NoticeKind::Blocking)
        {
            Some(index) => {
                self.notices.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn has_blocking(&self) -> bool {
        self.notices.iter().any(|n| n.kind == NoticeKind::Blocking)
    }

    pub fn blocking_notice(&self) -> Option<&Notice> {
        self.notices.iter().find(|n| n.kind == NoticeKind::Blocking)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.notices.back()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_uses_extracted_message() {
        let mut notices = Notifications::new();
        notices.error(&ApiError::Response {
            status: 400,
            body: json!({ "errors": [{ "msg": "too long" }] }),
        });

        let notice = notices.latest().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.message, "too long");
        assert_eq!(notice.ttl, Some(ERROR_TTL));
    }

    #[test]
    fn test_cancelled_requests_are_silent() {
        let mut notices = Notifications::new();
        notices.error(&ApiError::Cancelled);
        assert!(notices.is_empty());
    }

    #[test]
    fn test_expiry() {
        let mut notices = Notifications::new();
        notices.success("Comment posted!");
        notices.error_text("boom");
        notices.blocking("You need to log in to comment.");

        let start = notices.iter().map(|n| n.raised_at).min().unwrap();
        notices.clear_expired(start + Duration::from_millis(4500));
        assert_eq!(notices.len(), 2);

        notices.clear_expired(start + Duration::from_secs(60));
        assert_eq!(notices.len(), 1);
        assert!(notices.has_blocking());
    }

    #[test]
    fn test_dismiss_blocking() {
        let mut notices = Notifications::new();
        assert!(!notices.dismiss_blocking());

        notices.blocking("You need to log in to comment.");
        notices.success("ok");
        assert_eq!(
            notices.blocking_notice().map(|n| n.message.as_str()),
            Some("You need to log in to comment.")
        );
        assert!(notices.dismiss_blocking());
        assert!(!notices.has_blocking());
        assert_eq!(notices.len(), 1);
    }

    #[test]
    fn test_stack_is_bounded() {
        let mut notices = Notifications::new();
        notices.blocking("stay");
        for i in 0..10 {
            notices.success(format!("n{}", i));
        }
        assert_eq!(notices.len(), MAX_NOTICES);
        assert!(notices.has_blocking());
        assert_eq!(notices.latest().unwrap().message, "n9");
    }
}
