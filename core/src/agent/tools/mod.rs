//! Bundled tool set
//!
//! The fixed capabilities handed to the agent at construction: web
//! search, encyclopedia lookup, and the six arithmetic operations.

pub mod math;
pub mod web_search;
pub mod wikipedia;

pub use math::{MathOp, MathTool};
pub use web_search::WebSearchTool;
pub use wikipedia::WikipediaTool;

use crate::agent::tool::ToolRegistry;
use crate::config::SearchSettings;
use crate::error::Result;

/// Create a registry with the full bundled tool set pre-registered.
pub fn default_registry(search: &SearchSettings) -> Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.register(WebSearchTool::new(search.clone()))?;
    registry.register(WikipediaTool::new(search))?;
    for op in MathOp::ALL {
        registry.register(MathTool::new(op))?;
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry() {
        let registry = default_registry(&SearchSettings::default()).unwrap();
        assert_eq!(registry.len(), 8);

        let names = registry.names();
        assert_eq!(names[0], "web_search");
        assert_eq!(names[1], "wikipedia");
        for op in ["add", "subtract", "multiply", "divide", "modulus", "power"] {
            assert!(names.contains(&op.to_string()), "missing tool {}", op);
        }
    }
}
