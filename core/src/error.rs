//! Structured error types for gaiaq
//!
//! One taxonomy for the whole crate: configuration problems surface at
//! construction, tool and backend failures propagate to the caller as-is.
//! No variant is ever retried or translated on the way up.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Primary error type for gaiaq operations
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid configuration (credential, model id, tool set).
    /// Fatal at wrapper construction, never raised mid-call.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// A tool invocation failed
    #[error("tool '{tool}' failed: {message}")]
    Tool { tool: String, message: String },

    /// Arithmetic operation with an undefined result
    #[error("division by zero")]
    DivisionByZero,

    /// Encyclopedia lookup found no entry
    #[error("no encyclopedia entry found for '{topic}'")]
    NotFound { topic: String },

    /// The inference backend failed outside the HTTP layer
    #[error("backend error: {message}")]
    Backend { message: String },

    /// The provider returned a non-success status
    #[error("provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    /// HTTP transport failure talking to the provider
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Error::Backend {
            message: message.into(),
        }
    }
}
