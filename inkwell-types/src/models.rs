use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{ImageKind, Role};

pub type PostId = String;
pub type CommentId = String;
pub type UserId = String;
pub type ImageId = String;

// Custom serde module for DateTime to ensure RFC3339 string format
mod datetime_format {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<DateTime<Utc>>().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_pic_id: Option<ImageId>,
    #[serde(default)]
    pub profile_pic_url: Option<String>,
    #[serde(default)]
    pub role_id: Option<String>,
    #[serde(default)]
    pub role_name: Option<String>,
}

impl User {
    pub fn role(&self) -> Role {
        self.role_name
            .as_deref()
            .map(Role::parse)
            .unwrap_or(Role::Plain)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Role::Admin
    }
}

/// Uploaded image attached to a post, comment or profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: ImageId,
    pub url: String,
    #[serde(default)]
    pub original_name: String,
    #[serde(rename = "type")]
    pub kind: ImageKind,
}

/// One block of a post body. Image blocks point at an entry of `Post::images` by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Paragraph {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        content: Option<String>,
    },
    Image {
        #[serde(default)]
        id: Option<ImageId>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub title: String,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub images: Vec<Image>,
}

impl Post {
    /// Text of the first paragraph block, used for previews
    pub fn preview_text(&self) -> Option<&str> {
        self.content.iter().find_map(|block| match block {
            ContentBlock::Paragraph { content, .. } => content.as_deref(),
            ContentBlock::Image { .. } => None,
        })
    }

    pub fn featured_image(&self) -> Option<&Image> {
        self.images.first()
    }

    pub fn image_by_id(&self, id: &str) -> Option<&Image> {
        self.images.iter().find(|image| image.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfilePic {
    pub url: String,
}

/// Author summary embedded in every comment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentAuthor {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub profile_pic: Option<ProfilePic>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub content: String,
    pub post_id: PostId,
    pub user_id: UserId,
    /// Parent comment for replies (None for top-level comments)
    #[serde(default)]
    pub parent_id: Option<CommentId>,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub user: Option<CommentAuthor>,
    /// One level of replies, as returned by the server
    #[serde(default)]
    pub replies: Vec<Comment>,
}

impl Comment {
    pub fn author_username(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.username.as_deref())
    }

    pub fn author_picture(&self) -> Option<&str> {
        self.user
            .as_ref()
            .and_then(|u| u.profile_pic.as_ref())
            .map(|pic| pic.url.as_str())
    }

    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

// Request/Response types for API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterData {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub post_id: PostId,
    pub content: String,
    pub user_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CommentId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: String,
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub profile_pic_id: Option<ImageId>,
}

impl From<&User> for ProfileUpdate {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            bio: user.bio.clone(),
            profile_pic_id: user.profile_pic_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    #[serde(alias = "id")]
    pub image_id: ImageId,
    #[serde(alias = "url")]
    pub image_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_comment_with_replies_from_wire() {
        let raw = json!({
            "id": "c1",
            "content": "Great read",
            "postId": "p1",
            "userId": "u1",
            "createdAt": "2025-03-05T10:00:00.000Z",
            "user": { "username": "alice", "profilePic": { "url": "/uploads/a.png" } },
            "replies": [{
                "id": "c2",
                "content": "Agreed",
                "postId": "p1",
                "userId": "u2",
                "parentId": "c1",
                "createdAt": "2025-03-05T11:00:00.000Z",
                "user": null
            }]
        });

        let comment: Comment = serde_json::from_value(raw).unwrap();
        assert_eq!(comment.author_username(), Some("alice"));
        assert_eq!(comment.author_picture(), Some("/uploads/a.png"));
        assert!(!comment.is_reply());
        assert_eq!(comment.replies.len(), 1);
        assert!(comment.replies[0].is_reply());
        assert_eq!(comment.replies[0].author_username(), None);
        assert!(comment.replies[0].replies.is_empty());
    }

    #[test]
    fn test_new_comment_omits_missing_parent() {
        let body = NewComment {
            post_id: "p1".to_string(),
            content: "hi".to_string(),
            user_id: "u1".to_string(),
            parent_id: None,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value, json!({ "postId": "p1", "content": "hi", "userId": "u1" }));
    }

    #[test]
    fn test_post_content_blocks() {
        let raw = json!({
            "id": "p1",
            "title": "Hello",
            "createdAt": "2025-01-02T00:00:00Z",
            "content": [
                { "type": "image", "id": "img1" },
                { "type": "paragraph", "id": "b2", "content": "First words" }
            ],
            "images": [
                { "id": "img1", "url": "/uploads/cover.jpg", "originalName": "cover.jpg", "type": "POST" }
            ]
        });

        let post: Post = serde_json::from_value(raw).unwrap();
        assert_eq!(post.preview_text(), Some("First words"));
        assert_eq!(post.featured_image().map(|i| i.kind), Some(ImageKind::Post));
        assert!(post.image_by_id("img1").is_some());
        assert!(post.image_by_id("missing").is_none());
    }

    #[test]
    fn test_user_role() {
        let mut user: User = serde_json::from_value(json!({
            "id": "u1",
            "username": "root",
            "roleName": "admin"
        }))
        .unwrap();
        assert!(user.is_admin());

        user.role_name = Some("member".to_string());
        assert_eq!(user.role(), Role::Plain);

        user.role_name = None;
        assert!(!user.is_admin());
    }

    #[test]
    fn test_uploaded_image_aliases() {
        let a: UploadedImage =
            serde_json::from_value(json!({ "imageId": "i1", "imageUrl": "/u/1.png" })).unwrap();
        let b: UploadedImage =
            serde_json::from_value(json!({ "id": "i1", "url": "/u/1.png" })).unwrap();
        assert_eq!(a, b);
    }
}
