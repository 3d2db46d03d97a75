//! Web search tool
//!
//! Queries the DuckDuckGo HTML interface, which needs no API key, and
//! extracts title/snippet/URL blocks from the returned markup. Parsing
//! sticks to plain string scanning: the page is simple enough that a
//! full HTML parser buys nothing.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::agent::tool::{text_arg, Tool};
use crate::config::SearchSettings;
use crate::error::{Error, Result};

const SEARCH_URL: &str = "https://html.duckduckgo.com/html/";

/// A tool for searching the web via DuckDuckGo
pub struct WebSearchTool {
    client: reqwest::Client,
    settings: SearchSettings,
}

impl WebSearchTool {
    pub fn new(settings: SearchSettings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(settings.timeout_seconds))
            .user_agent(concat!("gaiaq/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { client, settings }
    }

    async fn search(&self, query: &str) -> Result<String> {
        let url = format!("{}?q={}", SEARCH_URL, urlencoding::encode(query));
        tracing::debug!(%query, "sending search request");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::tool("web_search", format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::tool(
                "web_search",
                format!("search returned status {}", status),
            ));
        }

        let html = response
            .text()
            .await
            .map_err(|e| Error::tool("web_search", format!("failed to read response: {}", e)))?;

        let results = parse_results(&html, self.settings.max_results);
        tracing::debug!(count = results.len(), "parsed search results");

        if results.is_empty() {
            Ok("No results found.".to_string())
        } else {
            Ok(results.join("\n\n"))
        }
    }
}

/// Extract the text of the first anchor following `marker`, together with
/// its `href` when present.
fn anchor_after(block: &str, marker: &str) -> Option<(Option<String>, String)> {
    let at = block.find(marker)?;
    let rest = &block[at..];

    let href = rest.find("href=\"").and_then(|h| {
        let start = h + 6;
        rest[start..]
            .find('"')
            .map(|end| rest[start..start + end].to_string())
    });

    let open = rest.find('>')?;
    let text_start = at + open + 1;
    let text_end = block[text_start..].find("</a>")?;
    let raw = &block[text_start..text_start + text_end];
    let text = html_escape::decode_html_entities(raw).trim().to_string();

    Some((href, text))
}

/// Parse DuckDuckGo HTML into "### title / snippet / URL" blocks
fn parse_results(html: &str, max: usize) -> Vec<String> {
    let mut results = Vec::new();

    // The class attribute carries several names ("links_main links_deep
    // result__body"), so match the bare class name.
    for block in html.split("result__body").skip(1) {
        let Some((href, title)) = anchor_after(block, "class=\"result__a\"") else {
            continue;
        };
        if title.is_empty() {
            continue;
        }

        let snippet = anchor_after(block, "class=\"result__snippet\"")
            .map(|(_, text)| text)
            .unwrap_or_default();
        let url = href.unwrap_or_default();

        results.push(format!("### {}\n{}\nURL: {}", title, snippet, url));
        if results.len() >= max {
            break;
        }
    }

    results
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web for current information, news, or specific facts. Returns result snippets with titles and URLs."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                }
            },
            "required": ["query"]
        })
    }

    async fn call(&self, args: Value) -> Result<String> {
        let query = text_arg(&args, "query")
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| Error::tool("web_search", "missing 'query' argument"))?;

        self.search(&query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        <div class="links_main links_deep result__body">
          <h2 class="result__title">
            <a rel="nofollow" class="result__a" href="https://example.com/rust">Rust &amp; Friends</a>
          </h2>
          <a class="result__snippet" href="https://example.com/rust">A language <b>empowering</b> everyone.</a>
        </div>
        <div class="links_main links_deep result__body">
          <h2 class="result__title">
            <a rel="nofollow" class="result__a" href="https://example.org/other">Second result</a>
          </h2>
        </div>
    "#;

    #[test]
    fn test_parse_results() {
        let results = parse_results(SAMPLE, 5);
        assert_eq!(results.len(), 2);
        assert!(results[0].starts_with("### Rust & Friends"));
        assert!(results[0].contains("URL: https://example.com/rust"));
        assert!(results[1].contains("Second result"));
    }

    #[test]
    fn test_parse_results_respects_max() {
        let results = parse_results(SAMPLE, 1);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_parse_results_empty_page() {
        assert!(parse_results("<html><body>nothing here</body></html>", 5).is_empty());
    }

    #[test]
    fn test_tool_metadata() {
        let tool = WebSearchTool::new(SearchSettings::default());
        assert_eq!(tool.name(), "web_search");
        let params = tool.parameters();
        assert!(params["properties"].get("query").is_some());
    }

    #[tokio::test]
    async fn test_missing_query_argument() {
        let tool = WebSearchTool::new(SearchSettings::default());
        let err = tool.call(json!({})).await.unwrap_err();
        assert!(matches!(err, Error::Tool { .. }));

        let err = tool.call(json!("  ")).await.unwrap_err();
        assert!(matches!(err, Error::Tool { .. }));
    }
}
