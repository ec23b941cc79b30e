#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use inkwell::api::{ApiError, ApiResult, BlogApi, ImageUpload};
use inkwell::auth::SessionProvider;
use inkwell_types::*;
use serde_json::{json, Value};

pub const ORIGIN: &str = "https://blog.example.com";

pub fn comment(id: &str, author: Option<&str>, content: &str) -> Comment {
    Comment {
        id: id.to_string(),
        content: content.to_string(),
        post_id: "p1".to_string(),
        user_id: "u1".to_string(),
        parent_id: None,
        created_at: Utc.with_ymd_and_hms(2025, 3, 5, 10, 0, 0).unwrap(),
        user: author.map(|name| CommentAuthor {
            username: Some(name.to_string()),
            profile_pic: None,
        }),
        replies: vec![],
    }
}

pub fn user(id: &str, username: &str) -> User {
    User {
        id: id.to_string(),
        name: username.to_string(),
        username: username.to_string(),
        email: format!("{}@example.com", username),
        bio: None,
        profile_pic_id: None,
        profile_pic_url: None,
        role_id: None,
        role_name: None,
    }
}

/// Session provider already holding `user`
pub fn signed_in(user: User) -> SessionProvider {
    let mut session = SessionProvider::in_memory();
    session.apply_probe(Ok(MeResponse { user: Some(user) }));
    session
}

/// Comment endpoints backed by a vector; everything else is unused here
#[derive(Default)]
pub struct StubApi {
    pub comments: Mutex<Vec<Comment>>,
    pub created: Mutex<Vec<NewComment>>,
    pub fetches: Mutex<usize>,
    pub create_failure: Mutex<Option<(u16, Value)>>,
}

impl StubApi {
    pub fn with_comments(comments: Vec<Comment>) -> Self {
        let api = Self::default();
        *api.comments.lock().unwrap() = comments;
        api
    }

    pub fn fail_create(&self, status: u16, body: Value) {
        *self.create_failure.lock().unwrap() = Some((status, body));
    }

    pub fn fetch_count(&self) -> usize {
        *self.fetches.lock().unwrap()
    }
}

fn unused<T>() -> ApiResult<T> {
    Err(ApiError::Response {
        status: 501,
        body: json!({ "message": "not implemented" }),
    })
}

#[async_trait]
impl BlogApi for StubApi {
    fn origin(&self) -> &str {
        ORIGIN
    }

    async fn comments_for_post(&self, _post_id: &str) -> ApiResult<Vec<Comment>> {
        *self.fetches.lock().unwrap() += 1;
        Ok(self.comments.lock().unwrap().clone())
    }

    async fn create_comment(&self, request: &NewComment) -> ApiResult<Comment> {
        if let Some((status, body)) = self.create_failure.lock().unwrap().clone() {
            return Err(ApiError::Response { status, body });
        }
        self.created.lock().unwrap().push(request.clone());

        let mut created = comment(
            &format!("new-{}", self.created.lock().unwrap().len()),
            Some("poster"),
            &request.content,
        );
        created.parent_id = request.parent_id.clone();

        let mut comments = self.comments.lock().unwrap();
        match &request.parent_id {
            Some(parent) => {
                if let Some(target) = comments.iter_mut().find(|c| &c.id == parent) {
                    target.replies.push(created.clone());
                }
            }
            None => comments.push(created.clone()),
        }
        Ok(created)
    }

    async fn delete_comment(&self, _comment_id: &str) -> ApiResult<()> {
        unused()
    }

    async fn posts(&self) -> ApiResult<Vec<Post>> {
        unused()
    }

    async fn posts_page(&self, _page: u32, _limit: u32) -> ApiResult<Vec<Post>> {
        unused()
    }

    async fn post(&self, _post_id: &str) -> ApiResult<Post> {
        unused()
    }

    async fn posts_by_user(&self, _user_id: &str) -> ApiResult<Vec<Post>> {
        unused()
    }

    async fn login(&self, _credentials: &LoginCredentials) -> ApiResult<()> {
        unused()
    }

    async fn me(&self) -> ApiResult<MeResponse> {
        Ok(MeResponse { user: None })
    }

    async fn logout(&self) -> ApiResult<()> {
        Ok(())
    }

    async fn register(&self, _data: &RegisterData) -> ApiResult<Value> {
        unused()
    }

    async fn user(&self, _user_id: &str) -> ApiResult<User> {
        unused()
    }

    async fn update_user(&self, _user_id: &str, _update: &ProfileUpdate) -> ApiResult<User> {
        unused()
    }

    async fn delete_user(&self, _user_id: &str) -> ApiResult<()> {
        unused()
    }

    async fn upload_image(&self, _upload: ImageUpload) -> ApiResult<UploadedImage> {
        unused()
    }

    async fn delete_image(&self, _image_id: &str) -> ApiResult<()> {
        unused()
    }
}
