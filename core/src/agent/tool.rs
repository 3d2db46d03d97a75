//! Tool capability interface
//!
//! Tools are the primary way the agent interacts with the world. Each
//! tool exposes a name, a description, a JSON schema for its arguments,
//! and an async `call`. The registry is built once at construction and
//! rejects duplicate names outright rather than shadowing.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::error::{Error, Result};

/// A callable capability exposed to the agent.
///
/// Implementations must be `Send + Sync` so they can be shared with the
/// agent loop.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The name of the tool (e.g., "web_search")
    fn name(&self) -> &str;

    /// A brief description of what the tool does
    fn description(&self) -> &str;

    /// JSON schema describing the tool's arguments
    fn parameters(&self) -> Value;

    /// Execute the tool with the provided arguments
    async fn call(&self, args: Value) -> Result<String>;
}

/// An ordered, duplicate-free set of tools.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool. Fails if a tool with the same name is already
    /// present; a misconfigured tool set should not half-ship.
    pub fn register<T>(&mut self, tool: T) -> Result<()>
    where
        T: Tool + 'static,
    {
        if self.tools.iter().any(|t| t.name() == tool.name()) {
            return Err(Error::configuration(format!(
                "duplicate tool name '{}'",
                tool.name()
            )));
        }
        self.tools.push(Arc::new(tool));
        Ok(())
    }

    /// Look up a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    /// Tool names in registration order
    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name().to_string()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Extract a textual argument from tool args.
///
/// Models send either a bare string or a JSON object with a named field;
/// both forms are accepted.
pub(crate) fn text_arg(args: &Value, key: &str) -> Option<String> {
    match args {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map.get(key).and_then(|v| v.as_str()).map(String::from),
        _ => None,
    }
}
