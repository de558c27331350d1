pub const DEFAULT_CONFIG_PATH: &str = "config/client.toml";
pub const DEFAULT_ENV_PATH: &str = ".env";

pub const ENV_ENDPOINT: &str = "AZURE_ENDPOINT_EUS";
pub const ENV_API_KEY: &str = "AZURE_OPENAI_API_KEY_EUS";
pub const ENV_API_VERSION: &str = "AZURE_OPENAI_API_VERSION";

pub const DEFAULT_DEPLOYMENT: &str = "OpenAIGPT4";
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const DEFAULT_SERVER_NAME: &str = "mongodb";
pub const DEFAULT_SERVER_COMMAND: &str = "python3";
pub const DEFAULT_SERVER_ARGS: &[&str] = &["mcp-server.py"];

pub const DEFAULT_THREAD_ID: &str = "335885";
pub const DEFAULT_RECURSION_LIMIT: usize = 25;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a MongoDB assistant. \
Your job is to use the tools from the MCP server to interact with MongoDB safely and effectively. \
Use tools to fetch schema info, update documents, disable jobs via config collections, and more. \
Never guess. Use the tools provided for every action or question about data.";
