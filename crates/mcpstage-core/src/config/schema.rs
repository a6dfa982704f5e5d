//! Provisioning input schema
//!
//! Mirrors the variables a provisioning layer passes in, whether loaded from
//! `mcpstage.toml`, a JSON document, or assembled from CLI flags.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::mcp::FlagSet;

/// Configuration directory referenced by the script when none is given
pub const DEFAULT_MCP_CONFIG_DIR: &str = "/home/coder/.config/mcp";

/// First local port handed to proxied servers
pub const DEFAULT_PROXY_BASE_PORT: u16 = 8765;

/// Root input structure for one compile pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionConfig {
    /// Agent the script runs on; passed through unchanged
    #[serde(default)]
    pub agent_id: String,

    /// Explicit servers, as a table or a JSON-encoded string
    #[serde(default)]
    pub mcp_servers: Option<McpServersInput>,

    /// Directory the per-server JSON files are written to
    #[serde(default)]
    pub mcp_config_dir: Option<String>,

    #[serde(default)]
    pub enable_github: bool,

    #[serde(default)]
    pub github_token: Option<String>,

    #[serde(default)]
    pub enable_filesystem: bool,

    #[serde(default)]
    pub filesystem_path: Option<String>,

    #[serde(default)]
    pub enable_weather: bool,

    /// Emit one proxy app per configured server
    #[serde(default)]
    pub enable_proxy: bool,

    #[serde(default = "default_proxy_base_port")]
    pub proxy_base_port: u16,
}

fn default_proxy_base_port() -> u16 {
    DEFAULT_PROXY_BASE_PORT
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            agent_id: String::new(),
            mcp_servers: None,
            mcp_config_dir: None,
            enable_github: false,
            github_token: None,
            enable_filesystem: false,
            filesystem_path: None,
            enable_weather: false,
            enable_proxy: false,
            proxy_base_port: DEFAULT_PROXY_BASE_PORT,
        }
    }
}

impl ProvisionConfig {
    /// Create an empty configuration for the given agent
    pub fn new(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            ..Default::default()
        }
    }

    /// Set explicit servers from a JSON-encoded string
    pub fn with_servers_json(mut self, json: impl Into<String>) -> Self {
        self.mcp_servers = Some(McpServersInput::Json(json.into()));
        self
    }

    /// Set explicit servers from an already parsed mapping
    pub fn with_servers_map(mut self, map: Map<String, Value>) -> Self {
        self.mcp_servers = Some(McpServersInput::Map(map));
        self
    }

    /// Set the configuration directory
    pub fn with_config_dir(mut self, dir: impl Into<String>) -> Self {
        self.mcp_config_dir = Some(dir.into());
        self
    }

    /// Enable the GitHub server with the given token
    pub fn with_github(mut self, token: impl Into<String>) -> Self {
        self.enable_github = true;
        self.github_token = Some(token.into());
        self
    }

    /// Enable the filesystem server, optionally rooted at `path`
    pub fn with_filesystem(mut self, path: Option<String>) -> Self {
        self.enable_filesystem = true;
        self.filesystem_path = path;
        self
    }

    /// Enable the weather server
    pub fn with_weather(mut self) -> Self {
        self.enable_weather = true;
        self
    }

    /// Set the proxy flag
    pub fn with_proxy(mut self, enabled: bool) -> Self {
        self.enable_proxy = enabled;
        self
    }

    /// Configuration directory, falling back to the default
    pub fn config_dir(&self) -> &str {
        self.mcp_config_dir
            .as_deref()
            .filter(|dir| !dir.trim().is_empty())
            .unwrap_or(DEFAULT_MCP_CONFIG_DIR)
    }

    /// Toggle flags for the normalizer
    pub fn flags(&self) -> FlagSet {
        FlagSet {
            enable_github: self.enable_github,
            github_token: self.github_token.clone(),
            enable_filesystem: self.enable_filesystem,
            filesystem_path: self.filesystem_path.clone(),
            enable_weather: self.enable_weather,
        }
    }
}

/// The two accepted shapes of `mcp_servers`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum McpServersInput {
    /// JSON-encoded object, as produced by `jsonencode` style inputs
    Json(String),
    /// Structured mapping of key to server entry
    Map(Map<String, Value>),
}

/// Explicit server entry. Unset fields fall back to the built-in entry with
/// the same key, or to the defaults for a new server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerOverlay {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub command: Option<String>,

    #[serde(default)]
    pub args: Option<Vec<String>>,

    #[serde(default)]
    pub env: Option<BTreeMap<String, String>>,
}

impl ServerOverlay {
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }
}
