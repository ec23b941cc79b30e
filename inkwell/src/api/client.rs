use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{ApiError, ApiResult, BlogApi, ImageUpload};
use inkwell_types::*;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// HTTP client for the blog backend. Every request carries the cookie jar,
/// which holds the server-issued session cookie.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    origin: Url,
    jar: Arc<Jar>,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        let base_url = sanitize_base_url(base_url.into())?;
        let origin = Url::parse(&base_url)
            .map_err(|e| ApiError::Message(format!("Invalid API URL {}: {}", base_url, e)))?;
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(jar.clone())
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            client,
            base_url,
            origin,
            jar,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Helper to handle API responses
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> ApiResult<T> {
        let response = check_status(response).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Helper for endpoints whose body we don't need
    async fn handle_empty(&self, response: reqwest::Response) -> ApiResult<()> {
        check_status(response).await?;
        Ok(())
    }
}

/// Turn a non-2xx response into `ApiError::Response`, keeping the body for
/// message extraction.
async fn check_status(response: reqwest::Response) -> ApiResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response.text().await.unwrap_or_default();
    let body = error_body(status.as_u16(), error_text);

    log::debug!(target: "api_calls", "{} response body: {}", status.as_u16(), body);

    Err(ApiError::Response {
        status: status.as_u16(),
        body,
    })
}

/// JSON bodies are parsed; anything else is kept as text, with HTML error
/// pages (e.g. from nginx) replaced by a short hint.
fn error_body(status: u16, error_text: String) -> Value {
    match serde_json::from_str::<Value>(&error_text) {
        Ok(value) => value,
        Err(_) if error_text.contains("<html") || error_text.contains("<!DOCTYPE") => Value::String(
            format!("Server returned {} error. Please check the API URL.", status),
        ),
        Err(_) => Value::String(error_text),
    }
}

fn sanitize_base_url(mut base: String) -> ApiResult<String> {
    base = base.trim().to_string();
    if base.is_empty() {
        return Err(ApiError::Message("API URL cannot be empty".to_string()));
    }
    if !base.starts_with("http://") && !base.starts_with("https://") {
        base = format!("http://{base}");
    }
    // Remove trailing slash for consistency
    while base.ends_with('/') {
        base.pop();
    }
    Ok(base)
}

fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

#[async_trait]
impl BlogApi for ApiClient {
    fn origin(&self) -> &str {
        &self.base_url
    }

    // Comment endpoints

    async fn comments_for_post(&self, post_id: &str) -> ApiResult<Vec<Comment>> {
        let url = self.url(&format!("/comments/post/{}", segment(post_id)));
        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    async fn create_comment(&self, comment: &NewComment) -> ApiResult<Comment> {
        let url = self.url("/comments");
        let response = self.client.post(&url).json(comment).send().await?;
        self.handle_response(response).await
    }

    async fn delete_comment(&self, comment_id: &str) -> ApiResult<()> {
        let url = self.url(&format!("/comments/{}", segment(comment_id)));
        let response = self.client.delete(&url).send().await?;
        self.handle_empty(response).await
    }

    // Post endpoints

    async fn posts(&self) -> ApiResult<Vec<Post>> {
        let response = self.client.get(self.url("/posts")).send().await?;
        self.handle_response(response).await
    }

    async fn posts_page(&self, page: u32, limit: u32) -> ApiResult<Vec<Post>> {
        let url = self.url(&format!("/posts?page={}&limit={}", page, limit));
        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    async fn post(&self, post_id: &str) -> ApiResult<Post> {
        let url = self.url(&format!("/posts/{}", segment(post_id)));
        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    async fn posts_by_user(&self, user_id: &str) -> ApiResult<Vec<Post>> {
        let url = self.url(&format!("/posts/user/{}", segment(user_id)));
        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    // Authentication endpoints

    async fn login(&self, credentials: &LoginCredentials) -> ApiResult<()> {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(credentials)
            .send()
            .await?;
        self.handle_empty(response).await
    }

    async fn me(&self) -> ApiResult<MeResponse> {
        let response = self.client.get(self.url("/auth/me")).send().await?;
        self.handle_response(response).await
    }

    async fn logout(&self) -> ApiResult<()> {
        let response = self.client.post(self.url("/auth/logout")).send().await?;
        self.handle_empty(response).await
    }

    fn session_cookies(&self) -> Option<String> {
        self.jar
            .cookies(&self.origin)
            .and_then(|header| header.to_str().ok().map(str::to_string))
            .filter(|cookies| !cookies.is_empty())
    }

    fn restore_session(&self, cookies: &str) {
        for cookie in cookies.split(';').map(str::trim).filter(|c| !c.is_empty()) {
            self.jar.add_cookie_str(cookie, &self.origin);
        }
    }

    // User endpoints

    async fn register(&self, data: &RegisterData) -> ApiResult<Value> {
        let response = self.client.post(self.url("/users")).json(data).send().await?;
        self.handle_response(response).await
    }

    async fn user(&self, user_id: &str) -> ApiResult<User> {
        let url = self.url(&format!("/users/{}", segment(user_id)));
        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    async fn update_user(&self, user_id: &str, update: &ProfileUpdate) -> ApiResult<User> {
        let url = self.url(&format!("/users/{}", segment(user_id)));
        let response = self.client.put(&url).json(update).send().await?;
        self.handle_response(response).await
    }

    async fn delete_user(&self, user_id: &str) -> ApiResult<()> {
        let url = self.url(&format!("/users/{}", segment(user_id)));
        let response = self.client.delete(&url).send().await?;
        self.handle_empty(response).await
    }

    // Image endpoints

    async fn upload_image(&self, upload: ImageUpload) -> ApiResult<UploadedImage> {
        let part = Part::bytes(upload.bytes).file_name(upload.file_name);
        let form = Form::new()
            .part("image", part)
            .text("type", upload.kind.as_str());
        let response = self
            .client
            .post(self.url("/images"))
            .multipart(form)
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn delete_image(&self, image_id: &str) -> ApiResult<()> {
        let url = self.url(&format!("/images/{}", segment(image_id)));
        let response = self.client.delete(&url).send().await?;
        self.handle_empty(response).await
    }
}
