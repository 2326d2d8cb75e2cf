//! # crchat-api
//!
//! The two Ollama endpoints the chat client needs:
//!
//! - `POST /api/chat` with `stream: false`, answered by one `message.content`
//! - `GET /api/tags`, used as a connectivity check
//!
//! Front-ends talk to the server through the [`ChatBackend`] trait. The
//! default `client` feature provides [`OllamaClient`] on top of `reqwest`.

pub mod error;
pub mod types;

#[cfg(feature = "client")]
pub mod client;

use async_trait::async_trait;

pub use error::ApiError;
pub use types::{ChatRequest, ChatResponse, ModelSummary, ReplyMessage, TagsResponse, WireMessage};

#[cfg(feature = "client")]
pub use client::OllamaClient;

/// Path of the chat endpoint
pub const CHAT_PATH: &str = "/api/chat";
/// Path of the model-listing endpoint
pub const TAGS_PATH: &str = "/api/tags";

/// Join a base URL and an endpoint path
pub fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Transport to the model server.
///
/// Futures are not required to be `Send`: the client runs on a single
/// thread, and the browser transport cannot be `Send`.
#[async_trait(?Send)]
pub trait ChatBackend {
    /// Send one chat request and return the assistant's reply text
    async fn chat(&self, base_url: &str, request: &ChatRequest) -> Result<String, ApiError>;

    /// List the models the server has available
    async fn list_models(&self, base_url: &str) -> Result<Vec<ModelSummary>, ApiError>;
}
