//! Provisioning file parser with helpful error messages
//!
//! `.json` files are read as JSON; everything else as TOML.

use super::schema::ProvisionConfig;
use anyhow::{Context, Result};
use std::path::Path;

/// Parse a provisioning file, choosing the format from its extension
pub fn parse_provision_file(path: &Path) -> Result<ProvisionConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read provisioning file: {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let parsed = if is_json {
        parse_provision_json_str(&content)
    } else {
        parse_provision_toml_str(&content)
    };
    parsed.with_context(|| format!("Failed to parse provisioning file: {}", path.display()))
}

/// Parse mcpstage.toml content from string
pub fn parse_provision_toml_str(content: &str) -> Result<ProvisionConfig> {
    toml::from_str(content).map_err(|e| enhance_toml_error(e, content))
}

/// Parse a JSON provisioning document
pub fn parse_provision_json_str(content: &str) -> Result<ProvisionConfig> {
    serde_json::from_str(content).context("JSON parsing error")
}

/// Enhance TOML parsing errors with the surrounding lines
fn enhance_toml_error(error: toml::de::Error, content: &str) -> anyhow::Error {
    let message = error.message().to_string();

    let line_num = error
        .span()
        .map(|span| content[..span.start.min(content.len())].matches('\n').count() + 1);

    match line_num {
        Some(line_num) => {
            let context = get_line_context(content, line_num);
            anyhow::anyhow!(
                "TOML parsing error at line {}:\n{}\n\nError: {}",
                line_num,
                context,
                message
            )
        }
        None => anyhow::anyhow!("TOML parsing error: {}", message),
    }
}

/// Get context lines around an error
fn get_line_context(content: &str, line_num: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line_num.saturating_sub(2);
    let end = (line_num + 2).min(lines.len());
    if start >= end {
        return String::new();
    }

    lines[start..end]
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let num = start + i + 1;
            let marker = if num == line_num { ">>>" } else { "   " };
            format!("{} {:4} | {}", marker, num, line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
