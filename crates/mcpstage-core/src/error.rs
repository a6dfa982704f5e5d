//! Errors raised while compiling a provisioning request.
//!
//! Every variant is a pre-execution failure: the engine rejects the input
//! before any script text is produced.

use thiserror::Error;

/// Result alias used throughout the engine
pub type Result<T> = std::result::Result<T, ProvisionError>;

#[derive(Debug, Error)]
pub enum ProvisionError {
    /// A server entry cannot be launched as given
    #[error("MCP server '{key}' is malformed: {reason}")]
    MalformedServerSpec { key: String, reason: String },

    /// A parameter required by an enabled feature is empty
    #[error("Missing required parameter '{param}': {context}")]
    MissingRequiredParam { param: String, context: String },

    /// Two servers normalize to the same proxy slug
    #[error("Proxy slug '{slug}' is shared by servers '{first}' and '{second}'")]
    SlugCollision {
        slug: String,
        first: String,
        second: String,
    },

    /// `mcp_servers` was given as a string that is not a JSON object of servers
    #[error("Failed to parse mcp_servers JSON: {0}")]
    InvalidServersJson(#[from] serde_json::Error),

    /// The proxy port assigned to a server does not fit in a u16
    #[error("Proxy port {port} for MCP server '{key}' is out of range")]
    ProxyPortOutOfRange { key: String, port: u32 },
}

impl ProvisionError {
    pub(crate) fn malformed(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedServerSpec {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(param: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingRequiredParam {
            param: param.into(),
            context: context.into(),
        }
    }
}
