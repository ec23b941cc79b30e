use inkwell_types::{Comment, MeResponse, NewComment, Post, PostId, User, UserId};
use serde_json::Value;

use crate::api::ApiResult;
use crate::thread::LoadTicket;

/// Results sent back from background request tasks to the UI loop.
#[derive(Debug)]
pub enum AppMessage {
    SessionProbed(ApiResult<MeResponse>),
    LoggedIn(ApiResult<MeResponse>),
    LoggedOut(ApiResult<()>),
    PostsLoaded(ApiResult<Vec<Post>>),
    PostLoaded {
        post_id: PostId,
        result: ApiResult<Post>,
    },
    CommentsLoaded {
        ticket: LoadTicket,
        result: ApiResult<Vec<Comment>>,
    },
    CommentSubmitted {
        request: NewComment,
        result: ApiResult<Comment>,
    },
    Registered(ApiResult<Value>),
    ProfileLoaded {
        user_id: UserId,
        result: ApiResult<User>,
    },
    ProfileSaved(ApiResult<User>),
    AccountDeleted(ApiResult<()>),
}
