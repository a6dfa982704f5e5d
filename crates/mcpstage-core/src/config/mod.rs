//! Provisioning input: schema, file parsing, and the server merge
//!
//! Two layers feed the merged server map:
//! - Built-in: servers enabled by toggle flags
//! - Explicit: the caller's `mcp_servers` map

pub mod merge;
pub mod parser;
pub mod schema;
pub mod servers;

pub use merge::{merge_configs, merge_servers};
pub use parser::{parse_provision_file, parse_provision_json_str, parse_provision_toml_str};
pub use schema::{
    DEFAULT_MCP_CONFIG_DIR, DEFAULT_PROXY_BASE_PORT, McpServersInput, ProvisionConfig,
    ServerOverlay,
};
pub use servers::{ExplicitServers, parse_servers_json, parse_servers_map};
