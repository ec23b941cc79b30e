use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Shown when nothing better can be extracted from a failure
pub const FALLBACK_MESSAGE: &str = "An unexpected error occurred";

/// Field-level validation message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(default)]
    pub field: Option<String>,
    pub msg: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            msg: msg.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Request failed with status code {status}")]
    Response { status: u16, body: Value },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Message(String),

    #[error("Request cancelled")]
    Cancelled,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Response { status, .. } => Some(*status),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }

    /// String field of a JSON error body, if the server sent one
    pub fn body_field(&self, key: &str) -> Option<&str> {
        match self {
            ApiError::Response { body, .. } => body.get(key).and_then(Value::as_str),
            _ => None,
        }
    }

    /// Resolve the messages worth showing to the user.
    ///
    /// Priority: explicit validation array, `errors` array in the body,
    /// `error` string in the body, `message` string in the body, the
    /// error's own message, then the fallback.
    pub fn messages(&self) -> Vec<String> {
        match self {
            ApiError::Validation(errors) if !errors.is_empty() => {
                errors.iter().map(|e| e.msg.clone()).collect()
            }
            ApiError::Validation(_) => vec![FALLBACK_MESSAGE.to_string()],
            ApiError::Response { body, .. } => {
                if let Some(items) = body.get("errors").and_then(Value::as_array) {
                    if !items.is_empty() {
                        return items.iter().map(error_item_message).collect();
                    }
                }
                if let Some(error) = self.body_field("error") {
                    return vec![error.to_string()];
                }
                if let Some(message) = self.body_field("message") {
                    return vec![message.to_string()];
                }
                // Non-JSON bodies are kept as text by the client
                match body.as_str().map(str::trim) {
                    Some(text) if !text.is_empty() => vec![text.to_string()],
                    _ => vec![self.to_string()],
                }
            }
            ApiError::Message(text) if text.trim().is_empty() => {
                vec![FALLBACK_MESSAGE.to_string()]
            }
            other => vec![other.to_string()],
        }
    }

    /// All resolved messages as one notice body
    pub fn user_message(&self) -> String {
        self.messages().join("\n")
    }
}

impl From<Vec<FieldError>> for ApiError {
    fn from(errors: Vec<FieldError>) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<String> for ApiError {
    fn from(message: String) -> Self {
        ApiError::Message(message)
    }
}

impl From<&str> for ApiError {
    fn from(message: &str) -> Self {
        ApiError::Message(message.to_string())
    }
}

fn error_item_message(item: &Value) -> String {
    ["msg", "message", "error"]
        .iter()
        .find_map(|key| item.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .or_else(|| item.as_str().map(str::to_string))
        .unwrap_or_else(|| item.to_string())
}
