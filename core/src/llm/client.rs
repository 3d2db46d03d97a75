//! HTTP client for OpenAI-compatible chat completion endpoints
//!
//! The Hugging Face router speaks the OpenAI chat completions protocol,
//! so one client covers the default setup and any self-hosted
//! compatible endpoint reachable through `base_url`.

use reqwest::{
    header::{HeaderMap, AUTHORIZATION, CONTENT_TYPE},
    Client as HttpClient, StatusCode,
};

use async_trait::async_trait;

use super::{chat::ChatRequest, chat::ChatResponse, ModelBackend, ModelConfig};
use crate::error::{Error, Result};

/// Chat completion client for the Hugging Face router
pub struct HfClient {
    config: ModelConfig,
    http_client: HttpClient,
}

impl HfClient {
    /// Create a new client
    pub fn new(config: ModelConfig) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::backend(format!("failed to build HTTP client: {}", e)))?;

        Ok(HfClient {
            config,
            http_client,
        })
    }

    /// Get the model identifier
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Build headers for API requests
    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            "application/json"
                .parse()
                .map_err(|_| Error::backend("invalid content-type header"))?,
        );
        if let Some(token) = &self.config.token {
            if !token.is_empty() {
                headers.insert(
                    AUTHORIZATION,
                    format!("Bearer {}", token)
                        .parse()
                        .map_err(|_| Error::backend("credential is not a valid header value"))?,
                );
            }
        }
        Ok(headers)
    }
}

#[async_trait]
impl ModelBackend for HfClient {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/chat/completions", self.config.base_url);

        let mut body = request.clone();
        if body.max_tokens.is_none() {
            body.max_tokens = self.config.max_tokens;
        }
        if body.temperature.is_none() {
            body.temperature = self.config.temperature;
        }

        tracing::debug!(model = %body.model, messages = body.messages.len(), "sending chat request");

        let response = self
            .http_client
            .post(&url)
            .headers(self.build_headers()?)
            .json(&body)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let parsed: ChatResponse = response
                    .json()
                    .await
                    .map_err(|e| Error::backend(format!("failed to parse response: {}", e)))?;
                Ok(parsed)
            }
            StatusCode::UNAUTHORIZED => Err(Error::Provider {
                status: 401,
                message: "authentication failed, check your credential".to_string(),
            }),
            StatusCode::TOO_MANY_REQUESTS => Err(Error::Provider {
                status: 429,
                message: "rate limit exceeded".to_string(),
            }),
            status => {
                let error_body: Option<serde_json::Value> = response.json().await.ok();
                let message = error_body
                    .as_ref()
                    .and_then(|v| v.get("error").and_then(|e| e.get("message")))
                    .and_then(|v| v.as_str())
                    .unwrap_or("unknown error")
                    .to_string();
                Err(Error::Provider {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_with_token() {
        let config = ModelConfig::new("m", Some("hf_abc".to_string()));
        let client = HfClient::new(config).unwrap();
        let headers = client.build_headers().unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer hf_abc");
    }

    #[test]
    fn test_headers_without_token() {
        let config = ModelConfig::new("m", None);
        let client = HfClient::new(config).unwrap();
        let headers = client.build_headers().unwrap();
        assert!(headers.get(AUTHORIZATION).is_none());
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }
}
