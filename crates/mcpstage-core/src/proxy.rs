//! Reverse-proxy endpoint descriptors for configured servers.
//!
//! One descriptor per server, in map order, each with a slug of the form
//! `mcp-<name>-proxy` and a local port assigned from the base port.

use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use crate::error::{ProvisionError, Result};
use crate::mcp::MergedConfig;

/// Externally reachable endpoint for one server
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProxyDescriptor {
    /// Key of the server this endpoint fronts
    pub key: String,
    pub slug: String,
    pub display_name: String,
    /// Local port the proxy targets
    pub port: u16,
}

impl ProxyDescriptor {
    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }
}

/// Lower-case `name` and collapse every run of non-alphanumeric characters
/// into a single `-`. Returns `None` when nothing alphanumeric remains.
pub fn slugify(name: &str) -> Option<String> {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    (!slug.is_empty()).then_some(slug)
}

/// Proxy slug for a server name
pub fn proxy_slug(name: &str) -> Option<String> {
    slugify(name).map(|s| format!("mcp-{s}-proxy"))
}

/// Derive descriptors for every server when proxying is enabled
pub fn generate_descriptors(
    merged: &MergedConfig,
    enable_proxy: bool,
    base_port: u16,
) -> Result<Vec<ProxyDescriptor>> {
    if !enable_proxy {
        return Ok(Vec::new());
    }

    let mut seen: HashMap<String, String> = HashMap::new();
    let mut descriptors = Vec::with_capacity(merged.len());

    for (index, spec) in merged.iter().enumerate() {
        let slug = proxy_slug(&spec.name).ok_or_else(|| {
            ProvisionError::malformed(
                &spec.key,
                format!("name '{}' has no characters usable in a proxy slug", spec.name),
            )
        })?;

        if let Some(first) = seen.get(&slug) {
            return Err(ProvisionError::SlugCollision {
                slug,
                first: first.clone(),
                second: spec.key.clone(),
            });
        }
        seen.insert(slug.clone(), spec.key.clone());

        let port = u32::from(base_port) + index as u32;
        let port = u16::try_from(port).map_err(|_| ProvisionError::ProxyPortOutOfRange {
            key: spec.key.clone(),
            port,
        })?;

        debug!(key = %spec.key, slug = %slug, port, "Derived proxy descriptor");
        descriptors.push(ProxyDescriptor {
            key: spec.key.clone(),
            display_name: format!("{} MCP Proxy", spec.name),
            slug,
            port,
        });
    }

    Ok(descriptors)
}
