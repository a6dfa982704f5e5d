//! Output assembly: the compiled artifact and its provisioning directives.

use serde::Serialize;

use crate::mcp::MergedConfig;
use crate::proxy::ProxyDescriptor;

/// Display name of the script-execution directive
pub const SCRIPT_DISPLAY_NAME: &str = "MCP Servers";

/// Result of one compile pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledOutput {
    /// Provisioning script; absent when no server is configured
    pub script: Option<String>,
    /// Server names in map order
    pub configured_names: Vec<String>,
    pub proxies: Vec<ProxyDescriptor>,
    pub proxy_instructions: Option<String>,
}

impl CompiledOutput {
    pub fn assemble(
        merged: &MergedConfig,
        script: Option<String>,
        proxies: Vec<ProxyDescriptor>,
    ) -> Self {
        let configured_names = merged.names();
        let proxy_instructions = proxy_instructions(merged, &proxies);
        Self {
            script,
            configured_names,
            proxies,
            proxy_instructions,
        }
    }
}

/// Human-readable summary of the proxied servers, or `None` when nothing is
/// proxied
pub fn proxy_instructions(merged: &MergedConfig, proxies: &[ProxyDescriptor]) -> Option<String> {
    if merged.is_empty() || proxies.is_empty() {
        return None;
    }

    let mut text = String::from("MCP servers are being proxied through the following apps:");
    for proxy in proxies {
        let name = merged
            .get(&proxy.key)
            .map(|spec| spec.name.as_str())
            .unwrap_or(proxy.key.as_str());
        text.push_str(&format!("\n- {} ({}) -> {}", proxy.slug, name, proxy.url()));
    }
    Some(text)
}

/// Script execution bound to an agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptDirective {
    pub agent_id: String,
    pub display_name: String,
    pub script: String,
    pub run_on_start: bool,
}

/// Proxy app bound to an agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProxyApp {
    pub agent_id: String,
    pub slug: String,
    pub display_name: String,
    pub url: String,
}

/// Everything the provisioning layer needs to act on one compile pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionPlan {
    pub script: Option<ScriptDirective>,
    pub proxy_apps: Vec<ProxyApp>,
    pub mcp_servers_configured: Vec<String>,
    pub proxy_instructions: Option<String>,
}

impl ProvisionPlan {
    /// Bind a compiled output to the agent it provisions
    pub fn for_agent(agent_id: &str, output: CompiledOutput) -> Self {
        let script = output.script.map(|script| ScriptDirective {
            agent_id: agent_id.to_string(),
            display_name: SCRIPT_DISPLAY_NAME.to_string(),
            script,
            run_on_start: true,
        });
        let proxy_apps = output
            .proxies
            .iter()
            .map(|proxy| ProxyApp {
                agent_id: agent_id.to_string(),
                slug: proxy.slug.clone(),
                display_name: proxy.display_name.clone(),
                url: proxy.url(),
            })
            .collect();

        Self {
            script,
            proxy_apps,
            mcp_servers_configured: output.configured_names,
            proxy_instructions: output.proxy_instructions,
        }
    }
}
