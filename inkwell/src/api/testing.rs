//! In-memory `BlogApi` used by unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use inkwell_types::*;
use serde_json::{json, Value};

use super::{ApiError, ApiResult, BlogApi, ImageUpload};

pub(crate) fn comment(id: &str, author: Option<&str>) -> Comment {
    Comment {
        id: id.to_string(),
        content: format!("content of {}", id),
        post_id: "p1".to_string(),
        user_id: format!("user-{}", author.unwrap_or("anon")),
        parent_id: None,
        created_at: Utc.with_ymd_and_hms(2025, 3, 5, 10, 0, 0).unwrap(),
        user: author.map(|name| CommentAuthor {
            username: Some(name.to_string()),
            profile_pic: None,
        }),
        replies: Vec::new(),
    }
}

pub(crate) fn user(id: &str, username: &str) -> User {
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

pub(crate) fn post(id: &str, title: &str) -> Post {
    Post {
        id: id.to_string(),
        title: title.to_string(),
        content: vec![ContentBlock::Paragraph {
            id: Some("b1".to_string()),
            content: Some(format!("{} body", title)),
        }],
        created_at: Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap(),
        images: Vec::new(),
    }
}

/// A failure the fake should produce, as (status, body)
pub(crate) type Failure = (u16, Value);

fn fail<T>(failure: &Option<Failure>) -> Option<ApiResult<T>> {
    failure.as_ref().map(|(status, body)| {
        Err(ApiError::Response {
            status: *status,
            body: body.clone(),
        })
    })
}

#[derive(Default)]
pub(crate) struct FakeApi {
    pub comments: Mutex<Vec<Comment>>,
    pub posts: Mutex<Vec<Post>>,
    pub users: Mutex<Vec<User>>,
    pub me: Mutex<Option<User>>,
    pub list_failure: Mutex<Option<Failure>>,
    pub create_failure: Mutex<Option<Failure>>,
    pub login_failure: Mutex<Option<Failure>>,
    pub me_failure: Mutex<Option<Failure>>,
    pub logout_failure: Mutex<Option<Failure>>,
    pub register_failure: Mutex<Option<Failure>>,
    pub created: Mutex<Vec<NewComment>>,
    pub calls: Mutex<Vec<String>>,
    pub cookies: Mutex<Option<String>>,
}

impl FakeApi {
    pub fn with_comments(comments: Vec<Comment>) -> Self {
        let api = Self::default();
        *api.comments.lock().unwrap() = comments;
        api
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl BlogApi for FakeApi {
    fn origin(&self) -> &str {
        "https://api.x.com"
    }

    async fn comments_for_post(&self, post_id: &str) -> ApiResult<Vec<Comment>> {
        self.record(format!("GET /comments/post/{}", post_id));
        if let Some(err) = fail(&self.list_failure.lock().unwrap()) {
            return err;
        }
        Ok(self.comments.lock().unwrap().clone())
    }

    async fn create_comment(&self, new: &NewComment) -> ApiResult<Comment> {
        self.record("POST /comments".to_string());
        if let Some(err) = fail(&self.create_failure.lock().unwrap()) {
            return err;
        }
        self.created.lock().unwrap().push(new.clone());

        let count = self.created.lock().unwrap().len();
        let mut created = comment(&format!("new-{}", count), Some("poster"));
        created.content = new.content.clone();
        created.post_id = new.post_id.clone();
        created.user_id = new.user_id.clone();
        created.parent_id = new.parent_id.clone();

        let mut comments = self.comments.lock().unwrap();
        match &new.parent_id {
            Some(parent) => {
                if let Some(target) = comments.iter_mut().find(|c| &c.id == parent) {
                    target.replies.push(created.clone());
                }
            }
            None => comments.push(created.clone()),
        }
        Ok(created)
    }

    async fn delete_comment(&self, comment_id: &str) -> ApiResult<()> {
        self.record(format!("DELETE /comments/{}", comment_id));
        self.comments.lock().unwrap().retain(|c| c.id != comment_id);
        Ok(())
    }

    async fn posts(&self) -> ApiResult<Vec<Post>> {
        self.record("GET /posts".to_string());
        Ok(self.posts.lock().unwrap().clone())
    }

    async fn posts_page(&self, page: u32, limit: u32) -> ApiResult<Vec<Post>> {
        self.record(format!("GET /posts?page={}&limit={}", page, limit));
        let posts = self.posts.lock().unwrap();
        let start = (page.saturating_sub(1) * limit) as usize;
        Ok(posts.iter().skip(start).take(limit as usize).cloned().collect())
    }

    async fn post(&self, post_id: &str) -> ApiResult<Post> {
        self.record(format!("GET /posts/{}", post_id));
        self.posts
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == post_id)
            .cloned()
            .ok_or_else(|| ApiError::Response {
                status: 404,
                body: json!({ "message": "Post not found" }),
            })
    }

    async fn posts_by_user(&self, user_id: &str) -> ApiResult<Vec<Post>> {
        self.record(format!("GET /posts/user/{}", user_id));
        Ok(Vec::new())
    }

    async fn login(&self, credentials: &LoginCredentials) -> ApiResult<()> {
        self.record(format!("POST /auth/login {}", credentials.email));
        if let Some(err) = fail(&self.login_failure.lock().unwrap()) {
            return err;
        }
        *self.cookies.lock().unwrap() = Some("sid=fake-session".to_string());
        Ok(())
    }

    async fn me(&self) -> ApiResult<MeResponse> {
        self.record("GET /auth/me".to_string());
        if let Some(err) = fail(&self.me_failure.lock().unwrap()) {
            return err;
        }
        Ok(MeResponse {
            user: self.me.lock().unwrap().clone(),
        })
    }

    async fn logout(&self) -> ApiResult<()> {
        self.record("POST /auth/logout".to_string());
        if let Some(err) = fail(&self.logout_failure.lock().unwrap()) {
            return err;
        }
        *self.cookies.lock().unwrap() = None;
        Ok(())
    }

    fn session_cookies(&self) -> Option<String> {
        self.cookies.lock().unwrap().clone()
    }

    fn restore_session(&self, cookies: &str) {
        *self.cookies.lock().unwrap() = Some(cookies.to_string());
    }

    async fn register(&self, data: &RegisterData) -> ApiResult<Value> {
        self.record(format!("POST /users {}", data.username));
        if let Some(err) = fail(&self.register_failure.lock().unwrap()) {
            return err;
        }
        Ok(json!({ "id": "new-user", "username": data.username }))
    }

    async fn user(&self, user_id: &str) -> ApiResult<User> {
        self.record(format!("GET /users/{}", user_id));
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or_else(|| ApiError::Response {
                status: 404,
                body: json!({ "error": "User not found" }),
            })
    }

    async fn update_user(&self, user_id: &str, update: &ProfileUpdate) -> ApiResult<User> {
        self.record(format!("PUT /users/{}", user_id));
        let mut users = self.users.lock().unwrap();
        let existing = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| ApiError::from("User not found"))?;
        existing.name = update.name.clone();
        existing.username = update.username.clone();
        existing.email = update.email.clone();
        existing.bio = update.bio.clone();
        existing.profile_pic_id = update.profile_pic_id.clone();
        Ok(existing.clone())
    }

    async fn delete_user(&self, user_id: &str) -> ApiResult<()> {
        self.record(format!("DELETE /users/{}", user_id));
        self.users.lock().unwrap().retain(|u| u.id != user_id);
        Ok(())
    }

    async fn upload_image(&self, upload: ImageUpload) -> ApiResult<UploadedImage> {
        self.record(format!("POST /images {} {}", upload.kind.as_str(), upload.file_name));
        Ok(UploadedImage {
            image_id: "img-new".to_string(),
            image_url: format!("/uploads/{}", upload.file_name),
        })
    }

    async fn delete_image(&self, image_id: &str) -> ApiResult<()> {
        self.record(format!("DELETE /images/{}", image_id));
        Ok(())
    }
}
