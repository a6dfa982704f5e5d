//! mcpstage - MCP server provisioning compiler
//!
//! Usage:
//!   mcpstage compile --agent-id main --weather       # Print a summary
//!   mcpstage compile -c mcpstage.toml -f script      # Print the script
//!   mcpstage compile -c mcpstage.toml -f json        # Print the full plan
//!   mcpstage builtins                                # List built-in servers
//!   mcpstage slug "My Server"                        # Show a proxy slug

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mcpstage_core::commands::CompileCommand;
use mcpstage_core::config::{ProvisionConfig, parse_provision_file};
use mcpstage_core::mcp::BuiltinServer;
use mcpstage_core::output::ProvisionPlan;
use mcpstage_core::proxy::proxy_slug;

/// Log filter used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "mcpstage=info,mcpstage_core=info,warn";

#[derive(Parser)]
#[command(name = "mcpstage")]
#[command(about = "MCP server provisioning compiler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile MCP server configuration into a provisioning script
    Compile(Box<CompileArgs>),

    /// List the built-in servers that can be enabled with a flag
    Builtins {
        /// Show a single built-in server (github, filesystem, weather)
        name: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: ListFormat,
    },

    /// Print the proxy slug a server name maps to
    Slug {
        /// Server display name
        name: String,
    },
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable summary
    #[default]
    Table,
    /// Machine-readable provisioning plan
    Json,
    /// The generated script only
    Script,
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum ListFormat {
    #[default]
    Table,
    Json,
}

#[derive(Args)]
struct CompileArgs {
    /// Provisioning file (TOML, or JSON when the extension is .json)
    #[arg(long, short)]
    config: Option<PathBuf>,
    /// Agent the script is bound to
    #[arg(long)]
    agent_id: Option<String>,
    /// Explicit servers as a JSON object
    #[arg(long, value_name = "JSON")]
    servers: Option<String>,
    /// Directory the per-server launch files are written to
    #[arg(long, value_name = "DIR")]
    config_dir: Option<String>,
    /// Enable the GitHub server
    #[arg(long)]
    github: bool,
    /// Token for the GitHub server
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,
    /// Enable the filesystem server
    #[arg(long)]
    filesystem: bool,
    /// Directory served by the filesystem server
    #[arg(long, value_name = "PATH")]
    filesystem_path: Option<String>,
    /// Enable the weather server
    #[arg(long)]
    weather: bool,
    /// Create a proxy app for every server
    #[arg(long)]
    proxy: bool,
    /// First local port assigned to proxied servers
    #[arg(long, value_name = "PORT")]
    proxy_base_port: Option<u16>,
    /// Also write the script to this file
    #[arg(long, short, value_name = "FILE")]
    output: Option<PathBuf>,
    /// Output format
    #[arg(short, long, default_value = "table")]
    format: OutputFormat,
}

fn main() -> Result<()> {
    // Initialize tracing; stdout is reserved for rendered output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compile(args) => run_compile(*args)?,
        Commands::Builtins { name, format } => run_builtins(name, format)?,
        Commands::Slug { name } => match proxy_slug(&name) {
            Some(slug) => println!("{slug}"),
            None => anyhow::bail!("'{}' has no characters usable in a proxy slug", name),
        },
    }
    Ok(())
}

/// Layer command-line flags over the provisioning file
fn build_config(args: &CompileArgs) -> Result<ProvisionConfig> {
    let mut config = match &args.config {
        Some(path) => parse_provision_file(path)?,
        None => ProvisionConfig::default(),
    };

    if let Some(agent_id) = &args.agent_id {
        config.agent_id = agent_id.clone();
    }
    if let Some(servers) = &args.servers {
        config = config.with_servers_json(servers);
    }
    if let Some(dir) = &args.config_dir {
        config.mcp_config_dir = Some(dir.clone());
    }
    if args.github {
        config.enable_github = true;
    }
    if let Some(token) = &args.github_token {
        config.github_token = Some(token.clone());
    }
    if args.filesystem {
        config.enable_filesystem = true;
    }
    if let Some(path) = &args.filesystem_path {
        config.filesystem_path = Some(path.clone());
    }
    if args.weather {
        config.enable_weather = true;
    }
    if args.proxy {
        config.enable_proxy = true;
    }
    if let Some(port) = args.proxy_base_port {
        config.proxy_base_port = port;
    }

    Ok(config)
}

fn run_compile(args: CompileArgs) -> Result<()> {
    let config = build_config(&args)?;
    let plan = CompileCommand::new(config).execute()?;

    if let (Some(path), Some(script)) = (&args.output, &plan.script) {
        std::fs::write(path, &script.script)
            .with_context(|| format!("Failed to write script: {}", path.display()))?;
        tracing::info!(path = %path.display(), "Wrote provisioning script");
    }

    match args.format {
        OutputFormat::Table => print_plan_table(&plan),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
        OutputFormat::Script => match &plan.script {
            Some(script) => print!("{}", script.script),
            None => eprintln!("No MCP servers configured; no script generated."),
        },
    }
    Ok(())
}

fn print_plan_table(plan: &ProvisionPlan) {
    let Some(script) = &plan.script else {
        println!("No MCP servers configured; no script generated.");
        println!("Enable a built-in server or pass --servers to get started.");
        return;
    };

    println!(
        "✓ Configured {} MCP server(s) for agent '{}'",
        plan.mcp_servers_configured.len(),
        script.agent_id
    );
    for name in &plan.mcp_servers_configured {
        println!("  • {name}");
    }

    if !plan.proxy_apps.is_empty() {
        println!();
        println!("{:<32} {:<28} Url", "Slug", "Name");
        println!("{}", "-".repeat(80));
        for app in &plan.proxy_apps {
            println!("{:<32} {:<28} {}", app.slug, app.display_name, app.url);
        }
    }

    if let Some(instructions) = &plan.proxy_instructions {
        println!();
        println!("{instructions}");
    }
}

fn run_builtins(name: Option<String>, format: ListFormat) -> Result<()> {
    let servers = match name {
        Some(name) => vec![BuiltinServer::try_from(name.as_str())?],
        None => BuiltinServer::ALL.to_vec(),
    };

    match format {
        ListFormat::Table => {
            println!("{:<12} {:<14} {:<8} Package", "Key", "Name", "Command");
            println!("{}", "-".repeat(72));
            for server in servers {
                let template = server.template();
                println!(
                    "{:<12} {:<14} {:<8} {}",
                    template.key, template.name, template.command, template.package
                );
            }
        }
        ListFormat::Json => {
            let entries: Vec<_> = servers
                .into_iter()
                .map(|server| {
                    let template = server.template();
                    serde_json::json!({
                        "key": template.key,
                        "name": template.name,
                        "command": template.command,
                        "package": template.package,
                        "requires": template.token_env,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_filter_covers_binary_and_core() {
        assert!(tracing_subscriber::EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
        assert!(DEFAULT_LOG_FILTER.contains("mcpstage=info"));
        assert!(DEFAULT_LOG_FILTER.contains("mcpstage_core=info"));
    }
}
