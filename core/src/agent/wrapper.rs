//! Agent wrapper
//!
//! The single public entry point: build a configured agent once, then
//! `ask` questions against it. The wrapper owns no logic of its own.
//! It forwards the question to the runtime verbatim, returns the answer
//! verbatim, and logs truncated previews of both. Whatever the runtime
//! raises reaches the caller unchanged.

use std::sync::Arc;

use async_trait::async_trait;

use crate::agent::core::Agent;
use crate::agent::tools;
use crate::config::Config;
use crate::error::Result;
use crate::llm::{HfClient, ModelConfig};

/// The run loop behind the wrapper.
///
/// Production code uses [`Agent`]; tests substitute stubs to observe the
/// forwarding contract.
#[async_trait]
pub trait AgentRuntime: Send {
    /// Answer a question, possibly invoking tools along the way
    async fn run(&mut self, question: &str) -> Result<String>;
}

#[async_trait]
impl AgentRuntime for Agent {
    async fn run(&mut self, question: &str) -> Result<String> {
        Agent::run(self, question).await
    }
}

/// A configured question-answering agent.
///
/// Constructed once from a validated [`Config`]; immutable configuration
/// thereafter. `ask` takes `&mut self`, so concurrent calls on one
/// wrapper are ruled out at compile time; use one wrapper per caller.
pub struct AgentWrapper {
    runtime: Box<dyn AgentRuntime>,
}

impl std::fmt::Debug for AgentWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentWrapper").finish_non_exhaustive()
    }
}

impl AgentWrapper {
    /// Build the wrapper: validate the configuration, construct the
    /// model client and the fixed tool set, and assemble the agent.
    ///
    /// Fails with a configuration error when the credential is missing
    /// or the tool set is invalid, before any `ask` is possible.
    pub fn initialize(config: &Config) -> Result<Self> {
        config.validate()?;

        let model_config = ModelConfig::new(config.model_id.clone(), config.token.clone())
            .with_base_url(config.base_url.clone());
        let backend = HfClient::new(model_config)?;
        let registry = tools::default_registry(&config.search)?;
        let tool_count = registry.len();
        let agent = Agent::new(Arc::new(backend), registry, config);

        tracing::info!(model = %config.model_id, tools = tool_count, "agent wrapper initialized");
        Ok(Self {
            runtime: Box::new(agent),
        })
    }

    /// Build a wrapper over a custom runtime.
    pub fn with_runtime(runtime: Box<dyn AgentRuntime>) -> Self {
        Self { runtime }
    }

    /// Forward a question to the agent and return its answer.
    pub async fn ask(&mut self, question: &str) -> Result<String> {
        tracing::info!(
            "agent received question (first 50 chars): {}...",
            preview(question, 50)
        );

        let answer = self.runtime.run(question).await?;

        tracing::info!("agent returning answer: {}", preview(&answer, 200));
        Ok(answer)
    }
}

/// Char-safe prefix for log previews
fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
