//! Encyclopedia lookup tool
//!
//! Fetches the summary of a Wikipedia page through the REST API. A
//! missing page is a distinct `NotFound` failure so the agent can tell
//! "no such topic" apart from a transport problem.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::agent::tool::{text_arg, Tool};
use crate::config::SearchSettings;
use crate::error::{Error, Result};

const SUMMARY_URL: &str = "https://en.wikipedia.org/api/rest_v1/page/summary";

/// A tool for looking up encyclopedia summaries
pub struct WikipediaTool {
    client: reqwest::Client,
}

impl WikipediaTool {
    pub fn new(settings: &SearchSettings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(settings.timeout_seconds))
            .user_agent(concat!("gaiaq/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { client }
    }

    async fn lookup(&self, topic: &str) -> Result<String> {
        // The REST API wants underscores where titles have spaces
        let title = topic.trim().replace(' ', "_");
        let url = format!(
            "{}/{}?redirect=true",
            SUMMARY_URL,
            urlencoding::encode(&title)
        );
        tracing::debug!(%topic, "looking up encyclopedia entry");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::tool("wikipedia", format!("HTTP request failed: {}", e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound {
                topic: topic.to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(Error::tool(
                "wikipedia",
                format!("lookup returned status {}", response.status()),
            ));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::tool("wikipedia", format!("failed to parse response: {}", e)))?;

        format_summary(&body).ok_or_else(|| Error::NotFound {
            topic: topic.to_string(),
        })
    }
}

/// Render a summary payload as "## title\n\nextract"
fn format_summary(body: &Value) -> Option<String> {
    let extract = body.get("extract").and_then(|v| v.as_str())?;
    if extract.is_empty() {
        return None;
    }
    let title = body
        .get("title")
        .and_then(|v| v.as_str())
        .unwrap_or("Summary");
    Some(format!("## {}\n\n{}", title, extract))
}

#[async_trait]
impl Tool for WikipediaTool {
    fn name(&self) -> &str {
        "wikipedia"
    }

    fn description(&self) -> &str {
        "Look up a topic in the encyclopedia and return a summary of its article."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "topic": {
                    "type": "string",
                    "description": "The topic or article title to look up"
                }
            },
            "required": ["topic"]
        })
    }

    async fn call(&self, args: Value) -> Result<String> {
        let topic = text_arg(&args, "topic")
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| Error::tool("wikipedia", "missing 'topic' argument"))?;

        self.lookup(&topic).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_summary() {
        let body = json!({
            "title": "Ada Lovelace",
            "extract": "Ada Lovelace was an English mathematician."
        });
        let text = format_summary(&body).unwrap();
        assert!(text.starts_with("## Ada Lovelace"));
        assert!(text.contains("English mathematician"));
    }

    #[test]
    fn test_format_summary_missing_extract() {
        assert!(format_summary(&json!({"title": "X"})).is_none());
        assert!(format_summary(&json!({"title": "X", "extract": ""})).is_none());
    }

    #[test]
    fn test_tool_metadata() {
        let tool = WikipediaTool::new(&SearchSettings::default());
        assert_eq!(tool.name(), "wikipedia");
        let params = tool.parameters();
        assert!(params["properties"].get("topic").is_some());
    }

    #[tokio::test]
    async fn test_missing_topic_argument() {
        let tool = WikipediaTool::new(&SearchSettings::default());
        let err = tool.call(json!({})).await.unwrap_err();
        assert!(matches!(err, Error::Tool { .. }));
    }
}
