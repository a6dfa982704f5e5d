//! Compile command implementation.
//!
//! Runs the full pipeline for one provisioning request: normalize flags,
//! merge explicit servers, render the script, derive proxy descriptors, and
//! assemble the outputs.

use tracing::info;

use crate::config::{ProvisionConfig, merge_configs};
use crate::error::{ProvisionError, Result};
use crate::output::{CompiledOutput, ProvisionPlan};
use crate::proxy::generate_descriptors;
use crate::script::ScriptCompiler;

/// Compile command orchestrator
#[derive(Debug, Clone)]
pub struct CompileCommand {
    config: ProvisionConfig,
}

impl CompileCommand {
    pub fn new(config: ProvisionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProvisionConfig {
        &self.config
    }

    /// Compile and bind the result to the configured agent
    pub fn execute(&self) -> Result<ProvisionPlan> {
        if self.config.agent_id.trim().is_empty() {
            return Err(ProvisionError::MissingRequiredParam {
                param: "agent_id".to_string(),
                context: "the agent that runs the script must be named".to_string(),
            });
        }
        let output = compile_config(&self.config)?;
        Ok(ProvisionPlan::for_agent(&self.config.agent_id, output))
    }
}

/// Compile a provisioning request without binding it to an agent
pub fn compile_config(config: &ProvisionConfig) -> Result<CompiledOutput> {
    let merged = merge_configs(config)?;

    // Proxy descriptors are derived before rendering so that a slug collision
    // fails the pass without any script text.
    let proxies = generate_descriptors(&merged, config.enable_proxy, config.proxy_base_port)?;
    let script = ScriptCompiler::new(config.config_dir()).compile(&merged)?;

    let output = CompiledOutput::assemble(&merged, script, proxies);
    info!(
        servers = output.configured_names.len(),
        proxies = output.proxies.len(),
        script = output.script.is_some(),
        "Compiled MCP provisioning"
    );
    Ok(output)
}
