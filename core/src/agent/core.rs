//! Agent step loop
//!
//! A plain ReAct loop: the model is prompted with the tool set and the
//! Thought/Action/Action Input/Observation protocol, tool calls are
//! executed between steps, and every `planning_interval` execution
//! steps the model is asked to restate its plan before continuing.

use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::agent::tool::ToolRegistry;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::llm::{ChatMessage, ChatRequest, ModelBackend};

lazy_static! {
    static ref ACTION_RE: Regex = Regex::new(r"(?m)^Action:\s*(.+)$").unwrap();
    static ref ACTION_INPUT_RE: Regex = Regex::new(r"(?m)^Action Input:\s*(.+)$").unwrap();
    static ref FINAL_ANSWER_RE: Regex = Regex::new(r"(?im)^\s*final answer:\s*(.*)$").unwrap();
}

const PLANNING_PROMPT: &str = "Pause and review your progress: briefly list the facts you have \
    gathered so far, then the remaining steps needed to answer the original question. Do not \
    call a tool in this reply.";

/// The agent that manages the step loop.
pub struct Agent {
    backend: Arc<dyn ModelBackend>,
    tools: ToolRegistry,
    model: String,
    instructions: Option<String>,
    authorized_imports: Vec<String>,
    max_steps: usize,
    planning_interval: usize,

    // Conversation state, reset per question
    history: Vec<ChatMessage>,
}

impl Agent {
    /// Create a new agent over the given backend and tool set.
    pub fn new(backend: Arc<dyn ModelBackend>, tools: ToolRegistry, config: &Config) -> Self {
        Self {
            backend,
            tools,
            model: config.model_id.clone(),
            instructions: config.effective_instructions().map(String::from),
            authorized_imports: config.agent.authorized_imports.clone(),
            max_steps: config.agent.max_steps,
            planning_interval: config.agent.planning_interval,
            history: Vec::new(),
        }
    }

    /// Reset conversation state for a new question.
    fn reset(&mut self, question: &str) {
        self.history = vec![
            ChatMessage::system(self.generate_system_prompt()),
            ChatMessage::user(question),
        ];
    }

    /// Answer a question, driving the model through tool calls until it
    /// produces a final answer or the step limit is reached.
    pub async fn run(&mut self, question: &str) -> Result<String> {
        self.reset(question);
        let mut steps = 0usize;

        loop {
            if steps >= self.max_steps {
                return Err(Error::backend(format!(
                    "maximum step limit ({}) reached without a final answer",
                    self.max_steps
                )));
            }

            if steps > 0 && steps % self.planning_interval == 0 {
                self.planning_step().await?;
            }
            steps += 1;

            let request = ChatRequest::new(self.model.clone(), self.history.clone());
            let response = self.backend.chat(&request).await?;
            let content = response.content();
            tracing::trace!(step = steps, reply = %content, "model reply");

            if let Some(answer) = extract_final_answer(&content) {
                self.history.push(ChatMessage::assistant(content.clone()));
                return Ok(answer);
            }

            if let Some((tool_name, raw_args)) = extract_action(&content) {
                self.history.push(ChatMessage::assistant(content.clone()));
                let observation = self.execute_tool(&tool_name, &raw_args).await;
                tracing::debug!(tool = %tool_name, step = steps, "tool observation recorded");
                self.history
                    .push(ChatMessage::user(format!("Observation: {}", observation)));
                continue;
            }

            // Neither an action nor a final-answer marker: the reply is
            // the answer.
            self.history.push(ChatMessage::assistant(content.clone()));
            return Ok(content);
        }
    }

    /// Ask the model to restate facts and plan; the reply joins the
    /// history as an assistant message.
    async fn planning_step(&mut self) -> Result<()> {
        let mut messages = self.history.clone();
        messages.push(ChatMessage::user(PLANNING_PROMPT));

        let request = ChatRequest::new(self.model.clone(), messages);
        let response = self.backend.chat(&request).await?;
        let plan = response.content();

        if !plan.trim().is_empty() {
            tracing::debug!("planning step completed");
            self.history
                .push(ChatMessage::assistant(format!("Updated plan:\n{}", plan.trim())));
        }
        Ok(())
    }

    /// Run one tool call; failures become observation text so the model
    /// can change course.
    async fn execute_tool(&self, name: &str, raw_args: &str) -> String {
        match self.tools.get(name) {
            Some(tool) => match tool.call(parse_action_args(raw_args)).await {
                Ok(output) => output,
                Err(e) => format!("Error: {}", e),
            },
            None => format!(
                "Error: tool '{}' not found. Available tools: {}",
                name,
                self.tools.names().join(", ")
            ),
        }
    }

    /// Generate the system prompt with instructions, tools, and protocol.
    fn generate_system_prompt(&self) -> String {
        let mut tools_desc = String::new();
        for tool in self.tools.iter() {
            tools_desc.push_str(&format!(
                "- {}: {}\n  Arguments: {}\n",
                tool.name(),
                tool.description(),
                tool.parameters()
            ));
        }

        let imports = if self.authorized_imports.is_empty() {
            String::new()
        } else {
            format!(
                "When a step calls for a helper code snippet, you may import only: {}.\n\n",
                self.authorized_imports.join(", ")
            )
        };

        let instructions = self.instructions.as_deref().unwrap_or(
            "You are a helpful assistant that answers questions using the available tools.",
        );

        format!(
            "{}\n\n\
            # Operational protocol\n\
            You have access to the following tools:\n\n\
            {}\n\
            Use the following format:\n\n\
            Question: the input question you must answer\n\
            Thought: you should always think about what to do\n\
            Action: the action to take, one of [{}]\n\
            Action Input: the arguments for the action, as a JSON object when the tool takes named arguments\n\
            Observation: the result of the action (STOP after providing Action Input and wait for this)\n\
            ... (this Thought/Action/Action Input/Observation can repeat N times)\n\
            Thought: I now know the final answer\n\
            FINAL ANSWER: the final answer to the original input question\n\n\
            {}\
            IMPORTANT: after providing an Action and Action Input you MUST stop generating and \
            wait for the Observation. Never invent an Observation.\n\n\
            Begin!",
            instructions,
            tools_desc,
            self.tools.names().join(", "),
            imports
        )
    }
}

/// Extract the text after a FINAL ANSWER marker, if present.
fn extract_final_answer(content: &str) -> Option<String> {
    FINAL_ANSWER_RE
        .captures(content)
        .map(|c| c[1].trim().to_string())
}

/// Extract an Action / Action Input pair, if both are present.
fn extract_action(content: &str) -> Option<(String, String)> {
    let tool = ACTION_RE.captures(content).map(|c| c[1].trim().to_string())?;
    let args = ACTION_INPUT_RE
        .captures(content)
        .map(|c| c[1].trim().to_string())?;
    Some((tool, args))
}

/// Action Input arrives as JSON for named arguments or as plain text for
/// single-argument tools; keep both forms.
fn parse_action_args(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::tools;
    use crate::llm::testing::ScriptedBackend;

    fn test_config() -> Config {
        let mut config = Config::default();
        config.token = Some("hf_test".to_string());
        config
    }

    fn agent_over(backend: Arc<ScriptedBackend>, config: &Config) -> Agent {
        let registry = tools::default_registry(&config.search).unwrap();
        Agent::new(backend, registry, config)
    }

    #[test]
    fn test_extract_final_answer() {
        assert_eq!(
            extract_final_answer("Thought: done\nFINAL ANSWER: 42").as_deref(),
            Some("42")
        );
        // Marker is case-insensitive
        assert_eq!(
            extract_final_answer("Final Answer: Paris").as_deref(),
            Some("Paris")
        );
        assert_eq!(extract_final_answer("Thought: still working"), None);
    }

    #[test]
    fn test_extract_action() {
        let content = "Thought: need math\nAction: add\nAction Input: {\"a\": 2, \"b\": 2}";
        let (tool, args) = extract_action(content).unwrap();
        assert_eq!(tool, "add");
        assert_eq!(args, "{\"a\": 2, \"b\": 2}");

        // An Action without Action Input is not a runnable action
        assert!(extract_action("Action: add").is_none());
    }

    #[test]
    fn test_parse_action_args() {
        assert_eq!(
            parse_action_args("{\"a\": 1}"),
            serde_json::json!({"a": 1})
        );
        assert_eq!(
            parse_action_args("capital of France"),
            Value::String("capital of France".to_string())
        );
    }

    #[test]
    fn test_system_prompt_lists_tools_and_imports() {
        let config = test_config();
        let backend = Arc::new(ScriptedBackend::replies(&[]));
        let agent = agent_over(backend, &config);
        let prompt = agent.generate_system_prompt();

        for name in ["web_search", "wikipedia", "add", "power"] {
            assert!(prompt.contains(name), "prompt missing tool {}", name);
        }
        assert!(prompt.contains("pandas, markdownify, requests"));
        assert!(prompt.contains("FINAL ANSWER:"));
    }

    #[tokio::test]
    async fn test_tool_call_roundtrip() {
        let config = test_config();
        let backend = Arc::new(ScriptedBackend::replies(&[
            "Thought: I should add the numbers.\nAction: add\nAction Input: {\"a\": 2, \"b\": 2}",
            "Thought: I now know the final answer\nFINAL ANSWER: 4",
        ]));
        let mut agent = agent_over(backend.clone(), &config);

        let answer = agent.run("What is 2+2?").await.unwrap();
        assert_eq!(answer, "4");

        let requests = backend.requests();
        assert_eq!(requests.len(), 2);
        // First request: system prompt plus the verbatim question
        assert_eq!(requests[0].messages.len(), 2);
        assert_eq!(requests[0].messages[1].content, "What is 2+2?");
        // Second request ends with the tool observation
        let last = requests[1].messages.last().unwrap();
        assert_eq!(last.content, "Observation: 4");
    }

    #[tokio::test]
    async fn test_unknown_tool_becomes_observation() {
        let config = test_config();
        let backend = Arc::new(ScriptedBackend::replies(&[
            "Action: teleport\nAction Input: {\"to\": \"Paris\"}",
            "FINAL ANSWER: done",
        ]));
        let mut agent = agent_over(backend.clone(), &config);

        let answer = agent.run("q").await.unwrap();
        assert_eq!(answer, "done");

        let last = backend.requests()[1].messages.last().unwrap().content.clone();
        assert!(last.contains("tool 'teleport' not found"));
        assert!(last.contains("web_search"));
    }

    #[tokio::test]
    async fn test_tool_error_becomes_observation() {
        let config = test_config();
        let backend = Arc::new(ScriptedBackend::replies(&[
            "Action: divide\nAction Input: {\"a\": 1, \"b\": 0}",
            "FINAL ANSWER: undefined",
        ]));
        let mut agent = agent_over(backend.clone(), &config);

        agent.run("q").await.unwrap();
        let last = backend.requests()[1].messages.last().unwrap().content.clone();
        assert!(last.contains("division by zero"));
    }

    #[tokio::test]
    async fn test_plain_reply_is_the_answer() {
        let config = test_config();
        let backend = Arc::new(ScriptedBackend::replies(&["Paris"]));
        let mut agent = agent_over(backend, &config);

        assert_eq!(agent.run("Capital of France?").await.unwrap(), "Paris");
    }

    #[tokio::test]
    async fn test_step_limit() {
        let mut config = test_config();
        config.agent.max_steps = 2;
        config.agent.planning_interval = 10;
        let action = "Action: add\nAction Input: {\"a\": 1, \"b\": 1}";
        let backend = Arc::new(ScriptedBackend::replies(&[action, action, action]));
        let mut agent = agent_over(backend, &config);

        let err = agent.run("q").await.unwrap_err();
        assert!(matches!(err, Error::Backend { .. }));
        assert!(err.to_string().contains("maximum step limit (2)"));
    }

    #[tokio::test]
    async fn test_planning_cadence() {
        let mut config = test_config();
        config.agent.planning_interval = 1;
        let backend = Arc::new(ScriptedBackend::replies(&[
            "Action: add\nAction Input: {\"a\": 1, \"b\": 2}",
            "Facts so far: 1+2=3. Next: answer.",
            "FINAL ANSWER: 3",
        ]));
        let mut agent = agent_over(backend.clone(), &config);

        assert_eq!(agent.run("q").await.unwrap(), "3");

        let requests = backend.requests();
        assert_eq!(requests.len(), 3);
        // The middle call is the planning request
        assert_eq!(
            requests[1].messages.last().unwrap().content,
            PLANNING_PROMPT
        );
        // The plan joined the history of the following request
        assert!(requests[2]
            .messages
            .iter()
            .any(|m| m.content.starts_with("Updated plan:")));
    }

    #[tokio::test]
    async fn test_backend_error_propagates() {
        let config = test_config();
        let backend = Arc::new(ScriptedBackend::new(vec![Err(Error::backend(
            "simulated outage",
        ))]));
        let mut agent = agent_over(backend, &config);

        let err = agent.run("q").await.unwrap_err();
        assert!(matches!(err, Error::Backend { .. }));
        assert!(err.to_string().contains("simulated outage"));
    }

    #[tokio::test]
    async fn test_final_answer_preferred_over_action() {
        // A reply that both names an action and declares a final answer
        // terminates the run.
        let config = test_config();
        let backend = Arc::new(ScriptedBackend::replies(&[
            "Action: add\nAction Input: {\"a\": 1, \"b\": 1}\nFINAL ANSWER: 2",
        ]));
        let mut agent = agent_over(backend.clone(), &config);

        assert_eq!(agent.run("q").await.unwrap(), "2");
        assert_eq!(backend.requests().len(), 1);
    }
}
