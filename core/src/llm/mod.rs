//! LLM client module
//!
//! Chat completion types and an HTTP client for the Hugging Face router's
//! OpenAI-compatible API. The [`ModelBackend`] trait is the seam between
//! the agent loop and the network: production code uses [`HfClient`],
//! tests substitute a scripted backend.

pub mod chat;
pub mod client;
#[cfg(test)]
pub mod testing;

pub use chat::{ChatMessage, ChatRequest, ChatResponse, Choice, MessageRole, Usage};
pub use client::HfClient;

use async_trait::async_trait;

use crate::error::Result;

/// Base URL of the Hugging Face inference router
pub const HF_ROUTER_BASE_URL: &str = "https://router.huggingface.co/v1";

/// A chat-completion capable model backend.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Send a chat request and get the full response
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse>;
}

/// Connection settings for a model backend
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// API endpoint base URL
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// Bearer credential, if the endpoint requires one
    pub token: Option<String>,
    /// Maximum tokens in a response
    pub max_tokens: Option<u32>,
    /// Temperature for sampling (0.0 - 2.0)
    pub temperature: Option<f32>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl ModelConfig {
    /// Create a config for the Hugging Face router
    pub fn new(model: impl Into<String>, token: Option<String>) -> Self {
        ModelConfig {
            base_url: HF_ROUTER_BASE_URL.to_string(),
            model: model.into(),
            token,
            max_tokens: Some(4096),
            temperature: Some(0.7),
            timeout_seconds: 300,
        }
    }

    /// Override the endpoint base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set maximum response tokens
    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    /// Set temperature
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp.clamp(0.0, 2.0));
        self
    }
}
