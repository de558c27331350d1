use clap::Parser;
use mongo_mcp_client::cli::Cli;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    mongo_mcp_client::run(cli).await
}
