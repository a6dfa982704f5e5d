//! Canonical form of the explicit server map.
//!
//! Both accepted shapes of `mcp_servers` are reduced here to one ordered list
//! of `(key, overlay)` pairs, so the merger never branches on input shape.

use serde_json::{Map, Value};

use super::schema::{McpServersInput, ServerOverlay};
use crate::error::{ProvisionError, Result};

/// Explicit servers in caller order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExplicitServers {
    entries: Vec<(String, ServerOverlay)>,
}

impl ExplicitServers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Append an entry; a repeated key replaces the earlier overlay in place
    pub fn push(&mut self, key: impl Into<String>, overlay: ServerOverlay) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = overlay,
            None => self.entries.push((key, overlay)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ServerOverlay)> {
        self.entries.iter().map(|(k, o)| (k.as_str(), o))
    }
}

impl IntoIterator for ExplicitServers {
    type Item = (String, ServerOverlay);
    type IntoIter = std::vec::IntoIter<(String, ServerOverlay)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl McpServersInput {
    /// Reduce either input shape to the canonical ordered list
    pub fn parse(&self) -> Result<ExplicitServers> {
        match self {
            McpServersInput::Json(text) => parse_servers_json(text),
            McpServersInput::Map(map) => parse_servers_map(map),
        }
    }
}

/// Parse a JSON-encoded server object. Blank input means no servers.
pub fn parse_servers_json(text: &str) -> Result<ExplicitServers> {
    if text.trim().is_empty() {
        return Ok(ExplicitServers::new());
    }
    let map: Map<String, Value> = serde_json::from_str(text)?;
    parse_servers_map(&map)
}

/// Convert a structured mapping, keeping its iteration order
pub fn parse_servers_map(map: &Map<String, Value>) -> Result<ExplicitServers> {
    let mut servers = ExplicitServers::new();
    for (key, value) in map {
        if key.trim().is_empty() {
            return Err(ProvisionError::malformed(key, "server key is empty"));
        }
        let overlay: ServerOverlay =
            serde_json::from_value(value.clone()).map_err(|e| {
                ProvisionError::malformed(key, format!("invalid server entry: {e}"))
            })?;
        servers.push(key.clone(), overlay);
    }
    Ok(servers)
}
