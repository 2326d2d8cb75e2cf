//! Core types for crchat
//!
//! Shared by the formatter, the Ollama client, the session controller and
//! both front-ends.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Constants
// ============================================================================

/// Default Ollama server location
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Model used until the user picks one
pub const DEFAULT_MODEL: &str = "llama3.2";

/// System prompt used until the user saves their own
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant. Please provide accurate and concise responses.";

/// System prompt stored when the user saves an empty one
pub const FALLBACK_SYSTEM_PROMPT: &str = "You are a helpful AI assistant.";

/// Key under which the serialized `EndpointConfig` is stored
pub const CONFIG_STORAGE_KEY: &str = "crchat-config";

// ============================================================================
// Conversation Types
// ============================================================================

/// Author of a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    /// Wire name used by the chat API
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }

    /// Label used in exported transcripts
    pub fn transcript_label(&self) -> &'static str {
        match self {
            Role::User => "User",
            _ => "Assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message in the conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    role: Role,
    content: String,
    created_at: DateTime<Local>,
}

impl ChatTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self::with_timestamp(role, content, Local::now())
    }

    pub fn with_timestamp(role: Role, content: impl Into<String>, created_at: DateTime<Local>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }
}

/// Append-only ordered list of turns, cleared wholesale
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    turns: Vec<ChatTurn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn and return its index
    pub fn push(&mut self, turn: ChatTurn) -> usize {
        self.turns.push(turn);
        self.turns.len() - 1
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn get(&self, index: usize) -> Option<&ChatTurn> {
        self.turns.get(index)
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

// ============================================================================
// Endpoint Configuration
// ============================================================================

/// Where to reach the model server and how to prompt it.
///
/// Persisted as one flat JSON record. Keys missing from a stored record take
/// their default value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EndpointConfig {
    #[serde(rename = "ollamaUrl", alias = "baseUrl")]
    pub base_url: String,
    pub model_name: String,
    pub system_prompt: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model_name: DEFAULT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

/// Sampling parameters sent with every chat request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            top_k: 40,
        }
    }
}

/// Result of the last interaction with the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    Connected,
    #[default]
    Disconnected,
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Connected => "Connected",
            ConnectionStatus::Disconnected => "Disconnected",
        }
    }
}
