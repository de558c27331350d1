use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(
    name = "mongo-mcp-client",
    version,
    about = "MongoDB assistant backed by Azure OpenAI and an MCP tool server"
)]
pub struct Cli {
    /// Configuration file path
    #[arg(long)]
    pub config: Option<String>,
    /// Conversation thread to read and write history under
    #[arg(long)]
    pub thread_id: Option<String>,
    /// Override the system prompt
    #[arg(long)]
    pub system: Option<String>,
    /// Command that starts the MCP server
    #[arg(long)]
    pub server_command: Option<String>,
    /// Argument passed to the MCP server command (repeatable)
    #[arg(long = "server-arg", allow_hyphen_values = true)]
    pub server_arg: Vec<String>,
}
