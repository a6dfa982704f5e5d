//! Integration tests for the compile pipeline

use serde_json::json;

use mcpstage_core::commands::{CompileCommand, compile_config};
use mcpstage_core::config::{DEFAULT_MCP_CONFIG_DIR, ProvisionConfig};
use mcpstage_core::error::ProvisionError;

fn weather_server() -> serde_json::Value {
    json!({
        "name": "weather",
        "command": "npx",
        "args": ["-y", "@modelcontextprotocol/server-weather"],
        "env": {}
    })
}

#[test]
fn empty_input_produces_no_script() {
    let plan = CompileCommand::new(ProvisionConfig::new("foo"))
        .execute()
        .expect("Compile should succeed");

    assert!(plan.script.is_none());
    assert!(plan.mcp_servers_configured.is_empty());
    assert!(plan.proxy_instructions.is_none());
}

#[test]
fn single_explicit_server_creates_script() {
    let config = ProvisionConfig::new("foo")
        .with_servers_json(json!({ "weather": weather_server() }).to_string());

    let plan = CompileCommand::new(config)
        .execute()
        .expect("Compile should succeed");

    let script = plan.script.expect("script directive should exist");
    assert_eq!(script.agent_id, "foo");
    assert!(script.script.contains(DEFAULT_MCP_CONFIG_DIR));
    assert_eq!(plan.mcp_servers_configured, vec!["weather"]);
}

#[test]
fn explicit_servers_keep_declaration_order() {
    let github = json!({
        "name": "github",
        "command": "npx",
        "args": ["-y", "@mcp/github-tools"],
        "env": {}
    });

    let forward = format!(
        r#"{{"github": {}, "weather": {}}}"#,
        github,
        weather_server()
    );
    let output = compile_config(&ProvisionConfig::new("foo").with_servers_json(forward))
        .expect("Compile should succeed");
    assert_eq!(output.configured_names, vec!["github", "weather"]);

    let reversed = format!(
        r#"{{"weather": {}, "github": {}}}"#,
        weather_server(),
        github
    );
    let output = compile_config(&ProvisionConfig::new("foo").with_servers_json(reversed))
        .expect("Compile should succeed");
    assert_eq!(output.configured_names, vec!["weather", "github"]);
}

#[test]
fn custom_config_dir_appears_in_script() {
    let config = ProvisionConfig::new("foo")
        .with_config_dir("/custom/path")
        .with_servers_json(json!({ "weather": weather_server() }).to_string());

    let output = compile_config(&config).expect("Compile should succeed");
    let script = output.script.expect("script should exist");
    assert!(script.contains("/custom/path"));
    assert!(script.contains("MCP_CONFIG_DIR='/custom/path'"));
}

#[test]
fn config_dir_with_double_quote_is_escaped() {
    let config = ProvisionConfig::new("foo")
        .with_config_dir(r#"/custom/"quoted" path"#)
        .with_servers_json(json!({ "weather": weather_server() }).to_string());

    let script = compile_config(&config)
        .expect("Compile should succeed")
        .script
        .expect("script should exist");
    assert!(script.contains(r#"MCP_CONFIG_DIR='/custom/"quoted" path'"#));
}

#[test]
fn config_dir_with_single_quote_is_escaped() {
    let config = ProvisionConfig::new("foo")
        .with_config_dir("/home/o'brien/mcp")
        .with_weather();

    let script = compile_config(&config)
        .expect("Compile should succeed")
        .script
        .expect("script should exist");
    assert!(script.contains(r"MCP_CONFIG_DIR='/home/o'\''brien/mcp'"));
}

#[test]
fn github_flag_without_token_fails() {
    let mut config = ProvisionConfig::new("foo");
    config.enable_github = true;
    config.github_token = Some(String::new());

    let err = compile_config(&config).expect_err("Compile should fail");
    assert!(matches!(
        err,
        ProvisionError::MissingRequiredParam { ref param, .. } if param == "github_token"
    ));
}

#[test]
fn github_flag_configures_github_tools() {
    let config = ProvisionConfig::new("foo").with_github("test-github-token");

    let output = compile_config(&config).expect("Compile should succeed");
    assert_eq!(output.configured_names, vec!["github-tools"]);
    let script = output.script.expect("script should exist");
    assert!(script.contains("GITHUB_TOKEN"));
    assert!(script.contains("test-github-token"));
    assert!(script.contains("'github.json'"));
}

#[test]
fn filesystem_flag_uses_given_path() {
    let config =
        ProvisionConfig::new("foo").with_filesystem(Some("/custom/filesystem/path".to_string()));

    let output = compile_config(&config).expect("Compile should succeed");
    assert_eq!(output.configured_names, vec!["filesystem"]);
    let script = output.script.expect("script should exist");
    assert!(script.contains("/custom/filesystem/path"));
    assert!(script.contains("@modelcontextprotocol/server-filesystem"));
}

#[test]
fn weather_flag_configures_weather() {
    let output = compile_config(&ProvisionConfig::new("foo").with_weather())
        .expect("Compile should succeed");
    assert_eq!(output.configured_names, vec!["weather"]);
    assert!(output.script.is_some());
}

#[test]
fn flags_combine_with_custom_servers() {
    let config = ProvisionConfig::new("foo")
        .with_github("test-github-token")
        .with_weather()
        .with_servers_json(
            json!({
                "custom": {
                    "command": "python",
                    "args": ["-m", "custom_mcp_tool"],
                    "env": { "API_KEY": "test-api-key" }
                }
            })
            .to_string(),
        );

    let output = compile_config(&config).expect("Compile should succeed");
    assert_eq!(output.configured_names, vec!["github-tools", "weather", "custom"]);
}

#[test]
fn explicit_entry_overrides_flag_entry_fields() {
    let config = ProvisionConfig::new("foo")
        .with_github("flag-token")
        .with_servers_json(
            json!({
                "github": {
                    "args": ["-y", "@mcp/github-tools"],
                    "env": { "GITHUB_HOST": "ghe.example.com" }
                }
            })
            .to_string(),
        );

    let output = compile_config(&config).expect("Compile should succeed");
    assert_eq!(output.configured_names, vec!["github-tools"]);
    let script = output.script.expect("script should exist");
    assert!(script.contains("@mcp/github-tools"));
    assert!(!script.contains("@modelcontextprotocol/server-github"));
    assert!(script.contains("flag-token"));
    assert!(script.contains("ghe.example.com"));
}

#[test]
fn explicit_server_without_command_fails() {
    let config = ProvisionConfig::new("foo")
        .with_servers_json(r#"{"broken": {"name": "broken", "args": []}}"#);

    let err = compile_config(&config).expect_err("Compile should fail");
    assert!(matches!(
        err,
        ProvisionError::MalformedServerSpec { ref key, .. } if key == "broken"
    ));
}

#[test]
fn proxy_enabled_creates_one_descriptor_per_server() {
    let config = ProvisionConfig::new("foo")
        .with_github("test-github-token")
        .with_weather()
        .with_proxy(true);

    let plan = CompileCommand::new(config)
        .execute()
        .expect("Compile should succeed");

    let slugs: Vec<_> = plan.proxy_apps.iter().map(|app| app.slug.as_str()).collect();
    assert_eq!(slugs, vec!["mcp-github-tools-proxy", "mcp-weather-proxy"]);
    assert!(plan.proxy_apps.iter().all(|app| app.agent_id == "foo"));

    let instructions = plan.proxy_instructions.expect("instructions should exist");
    assert!(instructions.contains("MCP servers are being proxied"));
    assert!(instructions.contains("mcp-github-tools-proxy"));
    assert!(instructions.contains("mcp-weather-proxy"));
}

#[test]
fn proxy_disabled_creates_no_descriptors() {
    let config = ProvisionConfig::new("foo")
        .with_github("test-github-token")
        .with_weather()
        .with_proxy(false);

    let output = compile_config(&config).expect("Compile should succeed");
    assert_eq!(output.configured_names.len(), 2);
    assert!(output.proxies.is_empty());
    assert!(output.proxy_instructions.is_none());
}

#[test]
fn proxy_enabled_without_servers_has_no_instructions() {
    let output = compile_config(&ProvisionConfig::new("foo").with_proxy(true))
        .expect("Compile should succeed");
    assert!(output.proxies.is_empty());
    assert!(output.proxy_instructions.is_none());
    assert!(output.script.is_none());
}

#[test]
fn compiling_twice_is_byte_identical() {
    let config = ProvisionConfig::new("foo")
        .with_github("test-github-token")
        .with_filesystem(None)
        .with_proxy(true)
        .with_servers_json(
            json!({
                "custom": {
                    "command": "python",
                    "env": { "Z_VAR": "z", "A_VAR": "a", "M_VAR": "m" }
                }
            })
            .to_string(),
        );

    let first = compile_config(&config).expect("Compile should succeed");
    let second = compile_config(&config).expect("Compile should succeed");
    assert_eq!(first.script, second.script);
    assert_eq!(first.proxies, second.proxies);
    assert_eq!(first, second);
}

#[test]
fn structured_and_string_servers_compile_identically() {
    let servers = json!({
        "custom": { "name": "custom-tool", "command": "python", "args": ["-m", "tool"] },
        "weather": weather_server()
    });
    let serde_json::Value::Object(map) = servers.clone() else {
        panic!("expected object");
    };

    let from_string =
        compile_config(&ProvisionConfig::new("foo").with_servers_json(servers.to_string()))
            .expect("Compile should succeed");
    let from_map = compile_config(&ProvisionConfig::new("foo").with_servers_map(map))
        .expect("Compile should succeed");
    assert_eq!(from_string, from_map);
}

#[test]
fn script_prepares_launch_files_without_starting_servers() {
    let config = ProvisionConfig::new("foo").with_weather().with_github("tok");
    let plan = CompileCommand::new(config)
        .execute()
        .expect("Compile should succeed");
    let script = plan.script.expect("script directive should exist").script;

    // No value here contains a single quote, so toggling on `'` finds the quoted spans
    let mut quoted = false;
    let unquoted: String = script
        .chars()
        .filter(|&c| {
            if c == '\'' {
                quoted = !quoted;
            }
            !quoted && c != '\''
        })
        .collect();

    // Server commands only appear inside the quoted launch file documents
    assert!(script.contains("npx"));
    assert!(!unquoted.contains("npx"));
    assert!(!unquoted.contains("@modelcontextprotocol"));
    assert!(!unquoted.contains("nohup"));
    assert_eq!(unquoted.matches("printf").count(), 3);
}
