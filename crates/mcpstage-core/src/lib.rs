//! mcpstage Core Library
//!
//! Compiles a declarative description of MCP servers into a provisioning
//! script that writes one launch file per server, plus optional reverse-proxy
//! descriptors for each server.

pub mod commands;
pub mod config;
pub mod error;
pub mod mcp;
pub mod output;
pub mod proxy;
pub mod script;

pub use error::{ProvisionError, Result};

/// Re-exports of commonly used types
pub mod prelude {
    // Commands
    pub use crate::commands::{CompileCommand, compile_config};

    // Configuration
    pub use crate::config::{
        ExplicitServers, McpServersInput, ProvisionConfig, ServerOverlay, merge_configs,
        parse_provision_file,
    };

    // MCP
    pub use crate::mcp::{BuiltinServer, FlagSet, MergedConfig, ServerSpec, normalize_flags};

    // Script
    pub use crate::script::{ScriptCompiler, shell_quote};

    // Proxy
    pub use crate::proxy::{ProxyDescriptor, generate_descriptors, proxy_slug};

    // Output
    pub use crate::output::{CompiledOutput, ProvisionPlan, ProxyApp, ScriptDirective};

    // Errors
    pub use crate::error::{ProvisionError, Result};
}
