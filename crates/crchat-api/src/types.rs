use crchat_types::{ChatTurn, EndpointConfig, Role, SamplingOptions};
use serde::{Deserialize, Serialize};

use crate::ApiError;

/// Message as sent to `/api/chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: Role,
    pub content: String,
}

/// Body of a non-streaming `/api/chat` request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    pub stream: bool,
    pub options: SamplingOptions,
}

impl ChatRequest {
    /// System prompt (when set) followed by every turn of the conversation
    pub fn for_conversation(config: &EndpointConfig, turns: &[ChatTurn], options: SamplingOptions) -> Self {
        let mut messages = Vec::with_capacity(turns.len() + 1);
        if !config.system_prompt.is_empty() {
            messages.push(WireMessage {
                role: Role::System,
                content: config.system_prompt.clone(),
            });
        }
        messages.extend(turns.iter().map(|turn| WireMessage {
            role: turn.role(),
            content: turn.content().to_string(),
        }));

        Self {
            model: config.model_name.clone(),
            messages,
            stream: false,
            options,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub message: Option<ReplyMessage>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReplyMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// The assistant text, or a format error when it is missing or empty
    pub fn into_content(self) -> Result<String, ApiError> {
        if let Some(error) = self.error {
            return Err(ApiError::ResponseFormat(error));
        }
        match self.message.and_then(|m| m.content) {
            Some(content) if !content.is_empty() => Ok(content),
            _ => Err(ApiError::ResponseFormat("missing message.content".to_string())),
        }
    }
}

/// Body of `/api/tags`
#[derive(Debug, Default, Deserialize)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<ModelSummary>,
}

/// One locally available model
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelSummary {
    pub name: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub modified_at: Option<String>,
}
