//! Scripted model backend for tests
//!
//! Plays back a fixed sequence of responses and records every request it
//! receives, so agent-loop tests can assert on both sides of the
//! conversation without a network.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::chat::{ChatMessage, ChatRequest, ChatResponse, Choice};
use super::ModelBackend;
use crate::error::{Error, Result};

/// Build a ChatResponse carrying a single assistant message
pub fn assistant_response(content: impl Into<String>) -> ChatResponse {
    ChatResponse {
        id: "test".to_string(),
        model: "test-model".to_string(),
        choices: vec![Choice {
            index: 0,
            message: ChatMessage::assistant(content),
            finish_reason: Some("stop".to_string()),
        }],
        usage: None,
    }
}

/// A backend that replays a script of responses in order
pub struct ScriptedBackend {
    script: Mutex<VecDeque<Result<ChatResponse>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedBackend {
    pub fn new(script: Vec<Result<ChatResponse>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Convenience: a script of plain assistant replies
    pub fn replies(contents: &[&str]) -> Self {
        Self::new(
            contents
                .iter()
                .map(|c| Ok(assistant_response(*c)))
                .collect(),
        )
    }

    /// Requests seen so far, in order
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelBackend for ScriptedBackend {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::backend("scripted backend exhausted")))
    }
}
