//! Server merging logic
//!
//! Implements the 2-layer merge:
//! Built-in flag entries -> Explicit entries
//!
//! Explicit entries override built-in entries field by field; `env` is deep
//! merged.

use tracing::debug;

use super::schema::{ProvisionConfig, ServerOverlay};
use super::servers::ExplicitServers;
use crate::error::Result;
use crate::mcp::{MergedConfig, ServerSpec, normalize_flags};

/// Build the merged server map for a provisioning request
///
/// # Arguments
/// * `config` - Provisioning input with flags and explicit servers
///
/// # Returns
/// Ordered map: built-ins in priority order, then explicit additions in
/// caller order
pub fn merge_configs(config: &ProvisionConfig) -> Result<MergedConfig> {
    let builtins = normalize_flags(&config.flags())?;
    let explicit = match &config.mcp_servers {
        Some(input) => input.parse()?,
        None => ExplicitServers::new(),
    };
    merge_servers(builtins, explicit)
}

/// Merge explicit entries onto the built-in layer and validate the result
pub fn merge_servers(builtins: Vec<ServerSpec>, explicit: ExplicitServers) -> Result<MergedConfig> {
    let mut merged = MergedConfig::new();
    for spec in builtins {
        merged.insert(spec);
    }

    for (key, overlay) in explicit {
        match merged.get_mut(&key) {
            Some(existing) => {
                debug!(key = %key, "Explicit MCP server overrides built-in entry");
                merge_server_entry(existing, overlay);
            }
            None => {
                debug!(key = %key, "Adding explicit MCP server");
                merged.insert(spec_from_overlay(key, overlay));
            }
        }
    }

    for spec in &merged {
        spec.validate()?;
    }

    Ok(merged)
}

/// Apply an explicit overlay to an existing entry
fn merge_server_entry(base: &mut ServerSpec, overlay: ServerOverlay) {
    // A blank name keeps the built-in name, as a new entry keeps its key
    if let Some(name) = overlay.name.filter(|n| !n.trim().is_empty()) {
        base.name = name;
    }
    if let Some(command) = overlay.command {
        base.command = command;
    }
    if let Some(args) = overlay.args {
        base.args = args;
    }
    // Deep merge env vars
    for (key, value) in overlay.env.unwrap_or_default() {
        base.env.insert(key, value);
    }
}

/// Build a new entry; unset fields take their defaults and are validated later
fn spec_from_overlay(key: String, overlay: ServerOverlay) -> ServerSpec {
    let name = overlay
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| key.clone());
    ServerSpec {
        key,
        name,
        command: overlay.command.unwrap_or_default(),
        args: overlay.args.unwrap_or_default(),
        env: overlay.env.unwrap_or_default(),
    }
}
