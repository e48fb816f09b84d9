//! Direct completion strategy.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use searchlens_protocols::error::AnswerError;
use searchlens_protocols::provider::{AnswerProvider, AssumeOnline, Connectivity};
use searchlens_protocols::types::{
    ExtensionConfig, ProviderKind, ResponsePayload, SearchRequest,
};
use searchlens_protocols::CancellationToken;

use crate::api::{ApiRequest, ApiResponse};

pub const DEFAULT_ENDPOINT: &str = "https://api.siliconflow.cn/v1/chat/completions";

/// Response headers never written to the log.
const SENSITIVE_HEADERS: &[&str] = &["authorization", "set-cookie", "cookie"];

/// Endpoint and transport options.
#[derive(Debug, Clone)]
pub struct CompletionOptions {
    pub endpoint: String,
    /// Per-request timeout. `None` waits for as long as the service takes.
    pub request_timeout: Option<Duration>,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout: None,
        }
    }
}

/// Answers a query with one POST to a chat-completion endpoint.
pub struct DirectCompletionProvider {
    options: CompletionOptions,
    connectivity: Arc<dyn Connectivity>,
    client: reqwest::Client,
}

impl DirectCompletionProvider {
    pub fn new(options: CompletionOptions) -> Self {
        Self {
            options,
            connectivity: Arc::new(AssumeOnline),
            client: reqwest::Client::new(),
        }
    }

    /// Use `connectivity` as the offline preflight.
    pub fn with_connectivity(mut self, connectivity: Arc<dyn Connectivity>) -> Self {
        self.connectivity = connectivity;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.options.endpoint
    }

    /// Run the full request and return the extracted answer text.
    pub async fn complete(&self, prompt: String, config: &ExtensionConfig) -> Result<String, AnswerError> {
        if !self.connectivity.is_online().await {
            return Err(AnswerError::Offline);
        }

        let body = ApiRequest::user(&config.model, config.max_tokens, prompt);
        info!("Sending completion request to {}", self.options.endpoint);
        debug!(
            "Request headers: Authorization: Bearer {}, Content-Type: application/json",
            config.redacted_token()
        );
        debug!("Request body: model={}, max_tokens={}", body.model, body.max_tokens);

        let mut request = self
            .client
            .post(&self.options.endpoint)
            .header("Authorization", format!("Bearer {}", config.auth_token))
            .header("Content-Type", "application/json")
            .json(&body);
        if let Some(timeout) = self.options.request_timeout {
            request = request.timeout(timeout);
        }

        let started = Instant::now();
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        info!(
            "Completion response {} after {} ms",
            status.as_u16(),
            started.elapsed().as_millis()
        );
        log_headers(response.headers());

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Completion service returned {}: {}", status.as_u16(), body);
            return Err(AnswerError::HttpStatus {
                code: status.as_u16(),
                body,
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.contains("application/json") {
            let body = response.text().await.unwrap_or_default();
            debug!("Non-JSON response body: {}", body);
            let shown: &str = if content_type.is_empty() { "unknown type" } else { &content_type };
            return Err(AnswerError::MalformedResponse(format!(
                "Expected JSON response but got {}",
                shown
            )));
        }

        let text = response.text().await.map_err(map_transport_error)?;
        let parsed: ApiResponse = serde_json::from_str(&text)
            .map_err(|e| AnswerError::MalformedResponse(e.to_string()))?;
        let answer = parsed.into_answer();
        debug!("Extracted answer ({} chars)", answer.chars().count());
        Ok(answer)
    }

    /// Send a minimal greeting with the configured model and token.
    pub async fn probe(&self, config: &ExtensionConfig) -> Result<String, AnswerError> {
        self.complete("hello".to_string(), config).await
    }
}

fn map_transport_error(e: reqwest::Error) -> AnswerError {
    if e.is_timeout() {
        AnswerError::Timeout(e.to_string())
    } else {
        AnswerError::NetworkFailure(e.to_string())
    }
}

fn log_headers(headers: &reqwest::header::HeaderMap) {
    for (name, value) in headers {
        let name = name.as_str();
        if SENSITIVE_HEADERS.iter().any(|s| name.contains(s)) {
            continue;
        }
        debug!("Response header {}: {}", name, value.to_str().unwrap_or("<binary>"));
    }
}

#[async_trait]
impl AnswerProvider for DirectCompletionProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Direct
    }

    async fn answer(
        &self,
        request: &SearchRequest,
        config: &ExtensionConfig,
        cancel: &CancellationToken,
    ) -> ResponsePayload {
        let prompt = config.compose_prompt(&request.query);

        let result = tokio::select! {
            result = self.complete(prompt, config) => result,
            _ = cancel.cancelled() => Err(AnswerError::Unknown("request cancelled".to_string())),
        };

        match result {
            Ok(text) => ResponsePayload::answer(text),
            Err(e) => {
                warn!("Completion for request {} failed: {}", request.id, e);
                ResponsePayload::error(e.user_message())
            }
        }
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
