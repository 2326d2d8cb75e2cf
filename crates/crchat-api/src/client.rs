use async_trait::async_trait;

use crate::{endpoint_url, ApiError, ChatBackend, ChatRequest, ChatResponse, ModelSummary, TagsResponse, CHAT_PATH, TAGS_PATH};

/// Ollama client over `reqwest`. No timeout is configured.
#[derive(Debug, Clone, Default)]
pub struct OllamaClient {
    client: reqwest::Client,
}

impl OllamaClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        log::debug!("Ollama error body: {}", body);
        Err(ApiError::Status {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        })
    }
}

#[async_trait(?Send)]
impl ChatBackend for OllamaClient {
    async fn chat(&self, base_url: &str, request: &ChatRequest) -> Result<String, ApiError> {
        let url = endpoint_url(base_url, CHAT_PATH);
        log::debug!(
            "POST {} model={} messages={}",
            url,
            request.model,
            request.messages.len()
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let text = response.text().await?;
        let chat_response: ChatResponse =
            serde_json::from_str(&text).map_err(|e| ApiError::ResponseFormat(e.to_string()))?;
        let content = chat_response.into_content()?;

        log::debug!("Received {} bytes of assistant content", content.len());
        Ok(content)
    }

    async fn list_models(&self, base_url: &str) -> Result<Vec<ModelSummary>, ApiError> {
        let url = endpoint_url(base_url, TAGS_PATH);
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Content-Type", "application/json")
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let text = response.text().await?;
        let tags: TagsResponse =
            serde_json::from_str(&text).map_err(|e| ApiError::ResponseFormat(e.to_string()))?;
        Ok(tags.models)
    }
}
