//! Chat-completion wire types.

use serde::{Deserialize, Serialize};

/// Answer used when the response carries no extractable text.
pub const NO_CONTENT_PLACEHOLDER: &str = "Unable to get reply content";

/// Request body.
#[derive(Debug, Serialize)]
pub struct ApiRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<ApiMessage>,
}

#[derive(Debug, Serialize)]
pub struct ApiMessage {
    pub role: String,
    pub content: String,
}

impl ApiRequest {
    pub fn user(model: &str, max_tokens: u32, content: String) -> Self {
        Self {
            model: model.to_string(),
            max_tokens,
            messages: vec![ApiMessage {
                role: "user".to_string(),
                content,
            }],
        }
    }
}

/// Response body. Everything is optional; the service may return either the
/// chat shape or the legacy text-completion shape.
#[derive(Debug, Default, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ResponseMessage>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ApiResponse {
    /// Text of the first choice: `message.content`, else `text`, else the
    /// placeholder.
    pub fn into_answer(self) -> String {
        let Some(first) = self.choices.into_iter().next() else {
            return NO_CONTENT_PLACEHOLDER.to_string();
        };

        first
            .message
            .and_then(|m| m.content)
            .or(first.text)
            .unwrap_or_else(|| NO_CONTENT_PLACEHOLDER.to_string())
    }
}
