mod client;
mod error;
#[cfg(test)]
pub(crate) mod testing;

use std::future::Future;

use async_trait::async_trait;
use inkwell_types::*;
use tokio_util::sync::CancellationToken;

pub use client::{ApiClient, DEFAULT_API_URL};
pub use error::{ApiError, ApiResult, FieldError, FALLBACK_MESSAGE};

/// File to send to `POST /images`
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub kind: ImageKind,
}

/// Everything the client asks of the blog backend.
///
/// `ApiClient` is the HTTP implementation; screens and the comment thread
/// only ever see this trait.
#[async_trait]
pub trait BlogApi: Send + Sync {
    /// Base origin used to resolve relative image paths
    fn origin(&self) -> &str;

    async fn comments_for_post(&self, post_id: &str) -> ApiResult<Vec<Comment>>;
    async fn create_comment(&self, comment: &NewComment) -> ApiResult<Comment>;
    async fn delete_comment(&self, comment_id: &str) -> ApiResult<()>;

    async fn posts(&self) -> ApiResult<Vec<Post>>;
    async fn posts_page(&self, page: u32, limit: u32) -> ApiResult<Vec<Post>>;
    async fn post(&self, post_id: &str) -> ApiResult<Post>;
    async fn posts_by_user(&self, user_id: &str) -> ApiResult<Vec<Post>>;

    async fn login(&self, credentials: &LoginCredentials) -> ApiResult<()>;
    async fn me(&self) -> ApiResult<MeResponse>;
    async fn logout(&self) -> ApiResult<()>;

    /// Cookie header currently held for the origin, if any
    fn session_cookies(&self) -> Option<String> {
        None
    }

    /// Load previously saved cookies back into the jar
    fn restore_session(&self, _cookies: &str) {}

    async fn register(&self, data: &RegisterData) -> ApiResult<serde_json::Value>;
    async fn user(&self, user_id: &str) -> ApiResult<User>;
    async fn update_user(&self, user_id: &str, update: &ProfileUpdate) -> ApiResult<User>;
    async fn delete_user(&self, user_id: &str) -> ApiResult<()>;

    async fn upload_image(&self, upload: ImageUpload) -> ApiResult<UploadedImage>;
    async fn delete_image(&self, image_id: &str) -> ApiResult<()>;
}

/// Race a request against its cancellation token.
///
/// Resolves to `ApiError::Cancelled` as soon as the token fires; the
/// request future is dropped at that point.
pub async fn with_cancel<T, F>(token: &CancellationToken, request: F) -> ApiResult<T>
where
    F: Future<Output = ApiResult<T>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(ApiError::Cancelled),
        result = request => result,
    }
}
