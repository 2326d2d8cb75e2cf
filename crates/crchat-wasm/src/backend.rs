use async_trait::async_trait;
use crchat_api::{endpoint_url, ApiError, ChatBackend, ChatRequest, ChatResponse, ModelSummary, TagsResponse, CHAT_PATH, TAGS_PATH};
use gloo_net::http::{Request, Response};

/// Ollama client on the browser's `fetch`
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserBackend;

fn transport(e: gloo_net::Error) -> ApiError {
    ApiError::Transport(e.to_string())
}

fn check_status(response: &Response) -> Result<(), ApiError> {
    if response.ok() {
        return Ok(());
    }
    let reason = match response.status_text() {
        text if text.is_empty() => "Request failed".to_string(),
        text => text,
    };
    Err(ApiError::Status {
        status: response.status(),
        reason,
    })
}

#[async_trait(?Send)]
impl ChatBackend for BrowserBackend {
    async fn chat(&self, base_url: &str, request: &ChatRequest) -> Result<String, ApiError> {
        let url = endpoint_url(base_url, CHAT_PATH);
        log::debug!("POST {}", url);

        let response = Request::post(&url)
            .json(request)
            .map_err(transport)?
            .send()
            .await
            .map_err(transport)?;
        check_status(&response)?;

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ApiError::ResponseFormat(e.to_string()))?;
        body.into_content()
    }

    async fn list_models(&self, base_url: &str) -> Result<Vec<ModelSummary>, ApiError> {
        let url = endpoint_url(base_url, TAGS_PATH);
        log::debug!("GET {}", url);

        let response = Request::get(&url).send().await.map_err(transport)?;
        check_status(&response)?;

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| ApiError::ResponseFormat(e.to_string()))?;
        Ok(tags.models)
    }
}
