//! Shell script rendering for the merged server map.
//!
//! The script writes one `<key>.json` launch file per server into the
//! configuration directory and exports that directory as `MCP_CONFIG_DIR`.
//! Re-running it rewrites identical files and appends the profile export
//! only once.

pub mod escape;

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{ProvisionError, Result};
use crate::mcp::{MergedConfig, ServerSpec};

pub use escape::shell_quote;

/// Environment variable the script exports for downstream tooling
pub const CONFIG_DIR_ENV: &str = "MCP_CONFIG_DIR";

/// Contents of one per-server launch file
#[derive(Debug, Serialize)]
struct LaunchFile<'a> {
    command: &'a str,
    args: &'a [String],
    env: &'a BTreeMap<String, String>,
}

/// Render the launch file document for one server
pub fn launch_file_json(spec: &ServerSpec) -> Result<String> {
    let file = LaunchFile {
        command: &spec.command,
        args: &spec.args,
        env: &spec.env,
    };
    serde_json::to_string_pretty(&file).map_err(|e| {
        ProvisionError::malformed(&spec.key, format!("cannot render launch file: {e}"))
    })
}

/// File name of a server's launch file inside the configuration directory
pub fn launch_file_name(spec: &ServerSpec) -> String {
    format!("{}.json", spec.key)
}

/// Renders merged configurations into a provisioning script
#[derive(Debug, Clone)]
pub struct ScriptCompiler<'a> {
    /// Directory the launch files are written to
    config_dir: &'a str,
}

impl<'a> ScriptCompiler<'a> {
    pub fn new(config_dir: &'a str) -> Self {
        Self { config_dir }
    }

    /// Render the script, or `None` when there is nothing to configure
    pub fn compile(&self, merged: &MergedConfig) -> Result<Option<String>> {
        if merged.is_empty() {
            debug!("No MCP servers configured; skipping script");
            return Ok(None);
        }

        let mut lines = vec![
            "#!/usr/bin/env bash".to_string(),
            "# Generated by mcpstage. Safe to re-run.".to_string(),
            "set -euo pipefail".to_string(),
            String::new(),
            format!("{}={}", CONFIG_DIR_ENV, shell_quote(self.config_dir)),
            format!("export {}", CONFIG_DIR_ENV),
            format!("mkdir -p -- \"${}\"", CONFIG_DIR_ENV),
        ];

        for spec in merged {
            let document = launch_file_json(spec)?;
            lines.push(String::new());
            lines.push(format!("# MCP server: {}", spec.key));
            lines.push(format!(
                "printf '%s\\n' {} > \"${}\"/{}",
                shell_quote(&document),
                CONFIG_DIR_ENV,
                shell_quote(&launch_file_name(spec))
            ));
            debug!(key = %spec.key, "Rendered launch file");
        }

        let export_line = format!(
            "export {}={}",
            CONFIG_DIR_ENV,
            shell_quote(self.config_dir)
        );
        lines.push(String::new());
        lines.push(format!(
            "if ! grep -qxF -- {} \"$HOME/.profile\" 2>/dev/null; then",
            shell_quote(&export_line)
        ));
        lines.push(format!(
            "  printf '%s\\n' {} >> \"$HOME/.profile\"",
            shell_quote(&export_line)
        ));
        lines.push("fi".to_string());
        lines.push(String::new());
        lines.push(format!(
            "echo \"Configured {} MCP server(s) in ${}\"",
            merged.len(),
            CONFIG_DIR_ENV
        ));

        let mut script = lines.join("\n");
        script.push('\n');
        Ok(Some(script))
    }
}
