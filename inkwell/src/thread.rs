//! Comment thread for a single post: fetch, render model, reply and submit.

use chrono::{DateTime, Utc};
use inkwell_types::{Comment, CommentId, NewComment, PostId};
use tokio_util::sync::CancellationToken;

use crate::api::{with_cancel, ApiResult, BlogApi};
use crate::auth::SessionProvider;
use crate::media::Avatar;
use crate::notify::Notifications;

/// Author name shown when a comment has no user attached
pub const ANONYMOUS: &str = "Anonymous";
pub const LOGIN_REQUIRED: &str = "You need to log in to comment.";
pub const COMMENT_POSTED: &str = "Comment posted!";
pub const REPLY_POSTED: &str = "Reply posted!";
pub const INVALID_POST_ID: &str = "Invalid post ID";

pub const PLACEHOLDER_ENABLED: &str = "Share your thoughts...";
pub const PLACEHOLDER_DISABLED: &str = "Log in to post a comment...";
pub const EMPTY_THREAD: &str = "Be the first to comment!";

/// Comments for one post, plus the draft being composed for it.
///
/// `comments` is always the last snapshot the server returned; after a
/// successful submit the whole list is fetched again. Requests started for
/// this thread race against `cancel`, which `unmount` fires when the post
/// view is left.
#[derive(Debug)]
pub struct CommentThread {
    post_id: PostId,
    comments: Vec<Comment>,
    loading: bool,
    posting: bool,
    draft: String,
    reply_target: Option<CommentId>,
    /// Sequence number of the most recent fetch
    load_seq: u64,
    cancel: CancellationToken,
}

/// One fetch of the comment list. Only the newest ticket's result is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub post_id: PostId,
    pub seq: u64,
}

impl CommentThread {
    pub fn new(post_id: impl Into<PostId>) -> Self {
        Self {
            post_id: post_id.into(),
            comments: Vec::new(),
            loading: false,
            posting: false,
            draft: String::new(),
            reply_target: None,
            load_seq: 0,
            cancel: CancellationToken::new(),
        }
    }

    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_posting(&self) -> bool {
        self.posting
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn reply_target(&self) -> Option<&str> {
        self.reply_target.as_deref()
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    // Loading

    /// Start a fetch. Returns the ticket to request with, or None when there
    /// is nothing to fetch.
    pub fn begin_load(&mut self, notices: &mut Notifications) -> Option<LoadTicket> {
        if !self.is_mounted() {
            return None;
        }
        if self.post_id.trim().is_empty() {
            notices.error_text(INVALID_POST_ID);
            return None;
        }
        self.loading = true;
        self.load_seq += 1;
        Some(LoadTicket {
            post_id: self.post_id.clone(),
            seq: self.load_seq,
        })
    }

    /// Apply a fetch result. Failures keep the previous list; results of a
    /// fetch superseded by a newer one are dropped.
    pub fn apply_loaded(
        &mut self,
        ticket: &LoadTicket,
        result: ApiResult<Vec<Comment>>,
        notices: &mut Notifications,
    ) {
        let post_id = ticket.post_id.as_str();
        if !self.accepts(post_id) {
            log::debug!(target: "comments", "Dropping late comment list for {}", post_id);
            return;
        }
        if ticket.seq != self.load_seq {
            log::debug!(target: "comments", "Dropping stale comment list #{} for {}", ticket.seq, post_id);
            return;
        }
        self.loading = false;
        match result {
            Ok(comments) => {
                log::debug!(target: "comments", "Loaded {} comments for {}", comments.len(), post_id);
                self.comments = comments;
            }
            Err(e) => {
                log::warn!(target: "comments", "Failed to load comments for {}: {}", post_id, e);
                notices.error(&e);
            }
        }
    }

    pub async fn load(&mut self, api: &dyn BlogApi, notices: &mut Notifications) {
        let Some(ticket) = self.begin_load(notices) else {
            return;
        };
        let token = self.child_token();
        let result = with_cancel(&token, api.comments_for_post(&ticket.post_id)).await;
        self.apply_loaded(&ticket, result, notices);
    }

    // Replying

    /// Target a loaded top-level comment and seed the draft with a mention.
    ///
    /// Returns false, changing nothing, when `comment_id` is not a top-level
    /// comment of this thread.
    pub fn begin_reply(&mut self, comment_id: &str) -> bool {
        let Some(target) = self.comments.iter().find(|c| c.id == comment_id) else {
            return false;
        };
        let author = target.author_username().unwrap_or(ANONYMOUS);
        self.draft = format!("@{} ", author);
        self.reply_target = Some(target.id.clone());
        true
    }

    pub fn cancel_reply(&mut self) {
        self.reply_target = None;
        self.draft.clear();
    }

    // Submitting

    /// Build the create request for the current draft.
    ///
    /// Without a session user this raises the blocking login notice. An
    /// empty draft or a submit already in flight yields None with no state
    /// change.
    pub fn prepare_submit(
        &mut self,
        session: &SessionProvider,
        notices: &mut Notifications,
    ) -> Option<NewComment> {
        if self.posting || !self.is_mounted() {
            return None;
        }
        let Some(user) = session.user() else {
            notices.blocking(LOGIN_REQUIRED);
            return None;
        };
        let content = self.draft.trim();
        if content.is_empty() {
            return None;
        }

        self.posting = true;
        Some(NewComment {
            post_id: self.post_id.clone(),
            content: content.to_string(),
            user_id: user.id.clone(),
            parent_id: self.reply_target.clone(),
        })
    }

    /// Apply a create result. Returns true when the thread should be
    /// fetched again.
    pub fn apply_submitted(
        &mut self,
        request: &NewComment,
        result: ApiResult<Comment>,
        notices: &mut Notifications,
    ) -> bool {
        if !self.accepts(&request.post_id) {
            log::debug!(target: "comments", "Dropping late submit result for {}", request.post_id);
            return false;
        }
        self.posting = false;
        match result {
            Ok(created) => {
                log::info!(target: "comments", "Created comment {} on {}", created.id, request.post_id);
                self.draft.clear();
                self.reply_target = None;
                notices.success(if request.parent_id.is_some() {
                    REPLY_POSTED
                } else {
                    COMMENT_POSTED
                });
                true
            }
            Err(e) => {
                log::warn!(target: "comments", "Failed to post comment: {}", e);
                notices.error(&e);
                false
            }
        }
    }

    pub async fn submit(
        &mut self,
        api: &dyn BlogApi,
        session: &SessionProvider,
        notices: &mut Notifications,
    ) {
        let Some(request) = self.prepare_submit(session, notices) else {
            return;
        };
        let token = self.child_token();
        let result = with_cancel(&token, api.create_comment(&request)).await;
        if self.apply_submitted(&request, result, notices) {
            self.load(api, notices).await;
        }
    }

    // Lifecycle

    /// Cancel everything in flight; later results are ignored
    pub fn unmount(&mut self) {
        self.cancel.cancel();
        self.loading = false;
        self.posting = false;
    }

    pub fn is_mounted(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Token for a request started on behalf of this thread
    pub fn child_token(&self) -> CancellationToken {
        self.cancel.child_token()
    }

    fn accepts(&self, post_id: &str) -> bool {
        self.is_mounted() && self.post_id == post_id
    }

    // Render model

    pub fn view(&self, session: &SessionProvider, origin: &str) -> ThreadView {
        let enabled = session.user().is_some();
        let submit_label = if self.posting {
            "Posting..."
        } else if self.reply_target.is_some() {
            "Post Reply"
        } else {
            "Post Comment"
        };
        let replying_to = self
            .reply_target
            .as_deref()
            .and_then(|id| self.comments.iter().find(|c| c.id == id))
            .map(|c| c.author_username().unwrap_or(ANONYMOUS).to_string());

        let composer = ComposerView {
            enabled,
            placeholder: if enabled {
                PLACEHOLDER_ENABLED
            } else {
                PLACEHOLDER_DISABLED
            },
            submit_label,
            can_submit: enabled && !self.posting && !self.draft.trim().is_empty(),
            replying_to,
        };

        let body = if self.loading {
            ThreadBody::Loading
        } else if self.comments.is_empty() {
            ThreadBody::Empty
        } else {
            ThreadBody::Comments(
                self.comments
                    .iter()
                    .map(|c| CommentView::new(c, origin, self.reply_target.as_deref()))
                    .collect(),
            )
        };

        ThreadView {
            count: self.comments.len(),
            composer,
            body,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThreadView {
    pub count: usize,
    pub composer: ComposerView,
    pub body: ThreadBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComposerView {
    /// False hides input entirely, not just the submit action
    pub enabled: bool,
    pub placeholder: &'static str,
    pub submit_label: &'static str,
    pub can_submit: bool,
    pub replying_to: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ThreadBody {
    Loading,
    Empty,
    Comments(Vec<CommentView>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommentView {
    pub id: CommentId,
    pub author: String,
    pub date: String,
    pub content: String,
    pub avatar: Avatar,
    /// `"{n} Replies"`, only when there are replies
    pub reply_label: Option<String>,
    pub replies: Vec<CommentView>,
    pub is_reply_target: bool,
}

impl CommentView {
    fn new(comment: &Comment, origin: &str, reply_target: Option<&str>) -> Self {
        let replies: Vec<CommentView> = comment
            .replies
            .iter()
            .map(|reply| CommentView::leaf(reply, origin, false))
            .collect();

        CommentView {
            reply_label: (!replies.is_empty()).then(|| format!("{} Replies", replies.len())),
            replies,
            ..CommentView::leaf(comment, origin, reply_target == Some(comment.id.as_str()))
        }
    }

    fn leaf(comment: &Comment, origin: &str, is_reply_target: bool) -> Self {
        CommentView {
            id: comment.id.clone(),
            author: comment.author_username().unwrap_or(ANONYMOUS).to_string(),
            date: format_comment_date(&comment.created_at),
            content: comment.content.clone(),
            avatar: Avatar::for_author(origin, comment),
            reply_label: None,
            replies: Vec::new(),
            is_reply_target,
        }
    }
}

/// `Mar 5, 2025`
pub fn format_comment_date(date: &DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}
