//! MCP (Model Context Protocol) server definitions

pub mod builtin;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{ProvisionError, Result};

pub use builtin::{BuiltinServer, DEFAULT_FILESYSTEM_PATH, FlagSet, normalize_flags};

/// One launchable MCP server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSpec {
    /// Unique identifier, used for file naming and ordering
    pub key: String,
    /// Display name, also the source of the proxy slug
    pub name: String,
    /// Command to run the server
    pub command: String,
    /// Arguments for the command
    #[serde(default)]
    pub args: Vec<String>,
    /// Environment variables, sorted by name
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl ServerSpec {
    /// Create a spec whose name defaults to its key
    pub fn new(key: impl Into<String>, command: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            name: key.clone(),
            key,
            command: command.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
        }
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replace the argument list
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Add one environment variable
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Check the launch invariants: a key usable as a file name and a
    /// non-empty command
    pub fn validate(&self) -> Result<()> {
        if self.key.trim().is_empty() {
            return Err(ProvisionError::malformed(&self.key, "server key is empty"));
        }
        if self.key == "."
            || self.key == ".."
            || self.key.contains('/')
            || self.key.chars().any(char::is_control)
        {
            return Err(ProvisionError::malformed(
                &self.key,
                "server key must be a plain file name",
            ));
        }
        if self.command.trim().is_empty() {
            return Err(ProvisionError::malformed(
                &self.key,
                "'command' is missing or empty",
            ));
        }
        Ok(())
    }
}

/// Ordered map of server key to spec.
///
/// Iteration order is insertion order; replacing an existing key keeps its
/// position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedConfig {
    servers: Vec<ServerSpec>,
}

impl MergedConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ServerSpec> {
        self.servers.iter()
    }

    pub fn get(&self, key: &str) -> Option<&ServerSpec> {
        self.servers.iter().find(|s| s.key == key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ServerSpec> {
        self.servers.iter_mut().find(|s| s.key == key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert a spec, returning the previous spec stored under the same key
    pub fn insert(&mut self, spec: ServerSpec) -> Option<ServerSpec> {
        match self.get_mut(&spec.key) {
            Some(existing) => Some(std::mem::replace(existing, spec)),
            None => {
                self.servers.push(spec);
                None
            }
        }
    }

    /// Keys in map order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.servers.iter().map(|s| s.key.as_str())
    }

    /// Display names in map order
    pub fn names(&self) -> Vec<String> {
        self.servers.iter().map(|s| s.name.clone()).collect()
    }
}

impl<'a> IntoIterator for &'a MergedConfig {
    type Item = &'a ServerSpec;
    type IntoIter = std::slice::Iter<'a, ServerSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.servers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_defaults_to_key() {
        let spec = ServerSpec::new("weather", "npx");
        assert_eq!(spec.name, "weather");
    }

    #[test]
    fn test_validate_rejects_empty_command() {
        let spec = ServerSpec::new("broken", "  ");
        let err = spec.validate().unwrap_err();
        assert!(matches!(
            err,
            ProvisionError::MalformedServerSpec { ref key, .. } if key == "broken"
        ));
    }

    #[test]
    fn test_validate_rejects_empty_key() {
        let spec = ServerSpec::new("", "npx");
        assert!(spec.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_path_like_keys() {
        for key in ["..", ".", "a/b", "line\nbreak"] {
            let spec = ServerSpec::new(key, "npx");
            assert!(spec.validate().is_err(), "key {key:?} should be rejected");
        }
        assert!(ServerSpec::new("my server.v2", "npx").validate().is_ok());
    }

    #[test]
    fn test_insert_preserves_order_and_position() {
        let mut config = MergedConfig::new();
        config.insert(ServerSpec::new("b", "npx"));
        config.insert(ServerSpec::new("a", "npx"));
        let previous = config.insert(ServerSpec::new("b", "python"));

        assert_eq!(previous.map(|s| s.command), Some("npx".to_string()));
        assert_eq!(config.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(config.get("b").map(|s| s.command.as_str()), Some("python"));
    }
}
