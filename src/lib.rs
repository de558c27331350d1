//! Interactive MongoDB assistant.
//!
//! Spawns an MCP tool server over stdio, discovers its tools, and runs a
//! tool-calling Azure OpenAI agent behind a `You:` / `Bot:` console loop.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use application::{agent, repl, tooling};
pub use domain::types;
pub use infrastructure::model;

use agent::{Agent, MemorySaver, RunConfig};
use cli::Cli;
use config::AppConfig;
use model::AzureOpenAIClient;
use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{self, BufReader};
use tooling::{McpProcess, ToolServerInterface};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

/// Wire configuration, model client, MCP server and agent together, then
/// hand the console to the interaction loop until it exits.
pub async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    init_tracing();
    info!("Starting mongo-mcp-client");

    let config = load_config(&cli)?;
    let provider = AzureOpenAIClient::from_config(&config.model)?;
    debug!(deployment = provider.deployment(), "Model client ready");

    let process = McpProcess::spawn(&config.server)?;
    let outcome = serve(&config, provider, &process).await;
    process.shutdown().await;
    info!("Client execution finished");
    outcome
}

async fn serve(
    config: &AppConfig,
    provider: AzureOpenAIClient,
    process: &McpProcess,
) -> Result<(), Box<dyn Error>> {
    let session = process.session();
    let handshake = session.initialize().await?;
    if let Some(instructions) = session.instructions().await {
        debug!(
            server = session.server_name(),
            remote_version = handshake.server_version.as_deref().unwrap_or("unknown"),
            %instructions,
            "Server provided usage instructions"
        );
    }

    let tools = session.list_tools().await?;
    info!(count = tools.len(), "Discovered MCP tools");

    let agent = Agent::new(
        provider,
        tools,
        Arc::new(session.clone()),
        config.system_prompt.clone(),
        Arc::new(MemorySaver::new()),
    );
    debug!(tools = ?agent.tool_names(), "Agent assembled");

    let run_config =
        RunConfig::new(config.thread_id.clone()).with_recursion_limit(config.recursion_limit);
    repl::run(
        &agent,
        &run_config,
        BufReader::new(io::stdin()),
        io::stdout(),
    )
    .await?;
    Ok(())
}

fn load_config(cli: &Cli) -> Result<AppConfig, Box<dyn Error>> {
    let path = cli.config.as_deref().map(Path::new);
    let mut config = AppConfig::load(path)?;
    match path {
        Some(path) => info!(path = %path.display(), "Loaded configuration from file"),
        None => info!("Loaded configuration using default path or defaults"),
    }

    if let Some(thread_id) = &cli.thread_id {
        config.thread_id = thread_id.clone();
    }
    if let Some(system) = &cli.system {
        config.system_prompt = system.clone();
    }
    if cli.server_command.is_some() || !cli.server_arg.is_empty() {
        let command = cli
            .server_command
            .clone()
            .unwrap_or_else(|| config.server.command.display().to_string());
        let args = if cli.server_arg.is_empty() {
            config.server.args.clone()
        } else {
            cli.server_arg.clone()
        };
        config.server = config.server.with_command_line(&command, &args);
    }
    debug!(
        thread_id = %config.thread_id,
        command = %config.server.command.display(),
        args = ?config.server.args,
        "Effective configuration"
    );
    Ok(config)
}

fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_level(true)
            .init();
    });
}
