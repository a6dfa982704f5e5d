//! Built-in MCP server templates and the toggle-flag normalizer.
//!
//! Each well-known server is a variant of [`BuiltinServer`]; its launch
//! template is static data, so adding a server means adding a variant and a
//! table row.

use tracing::debug;

use super::ServerSpec;
use crate::error::{ProvisionError, Result};

/// Directory served by the filesystem server when no path is given
pub const DEFAULT_FILESYSTEM_PATH: &str = "/home/coder";

/// Launcher shared by all built-in templates
const NPX: &str = "npx";

/// Well-known servers that can be enabled with a single flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinServer {
    Github,
    Filesystem,
    Weather,
}

/// Static launch template for a built-in server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinTemplate {
    pub key: &'static str,
    pub name: &'static str,
    pub command: &'static str,
    pub package: &'static str,
    /// Environment variable carrying the required secret, if any
    pub token_env: Option<&'static str>,
}

impl BuiltinServer {
    /// All built-ins in merge priority order
    pub const ALL: [BuiltinServer; 3] = [
        BuiltinServer::Github,
        BuiltinServer::Filesystem,
        BuiltinServer::Weather,
    ];

    pub fn template(self) -> BuiltinTemplate {
        match self {
            BuiltinServer::Github => BuiltinTemplate {
                key: "github",
                name: "github-tools",
                command: NPX,
                package: "@modelcontextprotocol/server-github",
                token_env: Some("GITHUB_TOKEN"),
            },
            BuiltinServer::Filesystem => BuiltinTemplate {
                key: "filesystem",
                name: "filesystem",
                command: NPX,
                package: "@modelcontextprotocol/server-filesystem",
                token_env: None,
            },
            BuiltinServer::Weather => BuiltinTemplate {
                key: "weather",
                name: "weather",
                command: NPX,
                package: "@modelcontextprotocol/server-weather",
                token_env: None,
            },
        }
    }

    /// Render the template into a spec using the given flag parameters
    fn to_spec(self, flags: &FlagSet) -> Result<ServerSpec> {
        let template = self.template();
        let spec = ServerSpec::new(template.key, template.command)
            .with_name(template.name)
            .with_args(["-y", template.package]);

        match self {
            BuiltinServer::Github => {
                let token = flags.github_token.as_deref().unwrap_or_default();
                if token.trim().is_empty() {
                    return Err(ProvisionError::missing(
                        "github_token",
                        "enable_github is set but no GitHub token was provided",
                    ));
                }
                Ok(spec.with_env(template.token_env.unwrap_or("GITHUB_TOKEN"), token))
            }
            BuiltinServer::Filesystem => {
                let path = flags
                    .filesystem_path
                    .as_deref()
                    .filter(|p| !p.trim().is_empty())
                    .unwrap_or(DEFAULT_FILESYSTEM_PATH);
                let mut spec = spec;
                spec.args.push(path.to_string());
                Ok(spec)
            }
            BuiltinServer::Weather => Ok(spec),
        }
    }
}

impl TryFrom<&str> for BuiltinServer {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "github" | "github-tools" => Ok(BuiltinServer::Github),
            "filesystem" => Ok(BuiltinServer::Filesystem),
            "weather" => Ok(BuiltinServer::Weather),
            _ => anyhow::bail!(
                "Unknown built-in server: '{}'. Valid values: github, filesystem, weather",
                value
            ),
        }
    }
}

/// Toggle flags and their parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSet {
    pub enable_github: bool,
    pub github_token: Option<String>,
    pub enable_filesystem: bool,
    pub filesystem_path: Option<String>,
    pub enable_weather: bool,
}

impl FlagSet {
    fn is_enabled(&self, server: BuiltinServer) -> bool {
        match server {
            BuiltinServer::Github => self.enable_github,
            BuiltinServer::Filesystem => self.enable_filesystem,
            BuiltinServer::Weather => self.enable_weather,
        }
    }
}

/// Turn enabled flags into specs, in priority order github, filesystem, weather
pub fn normalize_flags(flags: &FlagSet) -> Result<Vec<ServerSpec>> {
    let mut specs = Vec::new();
    for server in BuiltinServer::ALL {
        if flags.is_enabled(server) {
            let spec = server.to_spec(flags)?;
            debug!(key = %spec.key, "Enabled built-in MCP server");
            specs.push(spec);
        }
    }
    Ok(specs)
}
