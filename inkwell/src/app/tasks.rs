use std::path::Path;
use std::sync::Arc;

use inkwell_types::{ImageKind, LoginCredentials, NewComment, ProfileUpdate, RegisterData, User};
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::api::{with_cancel, ApiError, ApiResult, BlogApi, ImageUpload};
use crate::auth::login_request;
use crate::thread::LoadTicket;

use super::messages::AppMessage;

pub type Api = Arc<dyn BlogApi>;
pub type Tx = UnboundedSender<AppMessage>;

fn send(tx: &Tx, message: AppMessage) {
    if tx.send(message).is_err() {
        log::error!("UI loop has gone away, dropping task result");
    }
}

pub fn probe_session(api: Api, tx: Tx) {
    tokio::spawn(async move {
        let result = api.me().await;
        send(&tx, AppMessage::SessionProbed(result));
    });
}

pub fn login(api: Api, tx: Tx, credentials: LoginCredentials) {
    tokio::spawn(async move {
        let result = login_request(api.as_ref(), &credentials).await;
        send(&tx, AppMessage::LoggedIn(result));
    });
}

pub fn logout(api: Api, tx: Tx) {
    tokio::spawn(async move {
        let result = api.logout().await;
        send(&tx, AppMessage::LoggedOut(result));
    });
}

pub fn load_posts(api: Api, tx: Tx) {
    tokio::spawn(async move {
        let result = api.posts().await;
        send(&tx, AppMessage::PostsLoaded(result));
    });
}

pub fn load_post(api: Api, tx: Tx, post_id: String, token: CancellationToken) {
    tokio::spawn(async move {
        let result = with_cancel(&token, api.post(&post_id)).await;
        send(&tx, AppMessage::PostLoaded { post_id, result });
    });
}

pub fn load_comments(api: Api, tx: Tx, ticket: LoadTicket, token: CancellationToken) {
    tokio::spawn(async move {
        let result = with_cancel(&token, api.comments_for_post(&ticket.post_id)).await;
        send(&tx, AppMessage::CommentsLoaded { ticket, result });
    });
}

pub fn submit_comment(api: Api, tx: Tx, request: NewComment, token: CancellationToken) {
    tokio::spawn(async move {
        let result = with_cancel(&token, api.create_comment(&request)).await;
        send(&tx, AppMessage::CommentSubmitted { request, result });
    });
}

pub fn register(api: Api, tx: Tx, data: RegisterData) {
    tokio::spawn(async move {
        let result = api.register(&data).await;
        send(&tx, AppMessage::Registered(result));
    });
}

pub fn load_profile(api: Api, tx: Tx, user_id: String) {
    tokio::spawn(async move {
        let result = api.user(&user_id).await;
        send(&tx, AppMessage::ProfileLoaded { user_id, result });
    });
}

pub fn save_profile(
    api: Api,
    tx: Tx,
    user_id: String,
    update: ProfileUpdate,
    previous_picture: Option<String>,
    picture_path: Option<String>,
) {
    tokio::spawn(async move {
        let result = save_profile_request(
            api.as_ref(),
            &user_id,
            update,
            previous_picture.as_deref(),
            picture_path.as_deref(),
        )
        .await;
        send(&tx, AppMessage::ProfileSaved(result));
    });
}

pub fn delete_account(api: Api, tx: Tx, user_id: String) {
    tokio::spawn(async move {
        let result = api.delete_user(&user_id).await;
        send(&tx, AppMessage::AccountDeleted(result));
    });
}

/// Replace the profile picture when a new one is given, then save the profile.
///
/// The old picture is removed before the new one is uploaded.
pub async fn save_profile_request(
    api: &dyn BlogApi,
    user_id: &str,
    mut update: ProfileUpdate,
    previous_picture: Option<&str>,
    picture_path: Option<&str>,
) -> ApiResult<User> {
    if let Some(path) = picture_path {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ApiError::Message(format!("Could not read {}: {}", path, e)))?;
        let file_name = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "picture".to_string());

        if let Some(old) = previous_picture {
            api.delete_image(old).await?;
        }

        let uploaded = api
            .upload_image(ImageUpload {
                file_name,
                bytes,
                kind: ImageKind::Profile,
            })
            .await?;
        update.profile_pic_id = Some(uploaded.image_id);
    }

    api.update_user(user_id, &update).await
}
