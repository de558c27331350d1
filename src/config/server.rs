use super::defaults::{DEFAULT_SERVER_ARGS, DEFAULT_SERVER_COMMAND, DEFAULT_SERVER_NAME};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Launch description of the MCP tool server child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub name: String,
    pub command: PathBuf,
    pub args: Vec<String>,
    pub env: HashMap<String, String>,
    pub workdir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_SERVER_NAME.to_string(),
            command: PathBuf::from(DEFAULT_SERVER_COMMAND),
            args: DEFAULT_SERVER_ARGS.iter().map(|arg| arg.to_string()).collect(),
            env: HashMap::new(),
            workdir: None,
        }
    }
}

impl ServerConfig {
    /// Replace the command line, expanding it the same way file values are.
    pub fn with_command_line(mut self, command: &str, args: &[String]) -> Self {
        self.command = PathBuf::from(expand(command));
        self.args = args.iter().map(|arg| expand(arg)).collect();
        self
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub(crate) struct RawServer {
    name: Option<String>,
    command: Option<String>,
    args: Option<Vec<String>>,
    #[serde(default)]
    env: HashMap<String, String>,
    workdir: Option<String>,
}

impl From<RawServer> for ServerConfig {
    fn from(raw: RawServer) -> Self {
        let defaults = Self::default();

        let command = raw
            .command
            .map(|cmd| PathBuf::from(expand(&cmd)))
            .unwrap_or(defaults.command);
        let args = match raw.args {
            Some(args) => args.into_iter().map(|arg| expand(&arg)).collect(),
            None => defaults.args,
        };
        let workdir = raw.workdir.map(|d| PathBuf::from(expand(&d)));

        Self {
            name: raw.name.unwrap_or(defaults.name),
            command,
            args,
            env: raw.env,
            workdir,
        }
    }
}

fn expand(s: &str) -> String {
    shellexpand::full(s)
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    #[serial]
    fn expands_env_vars_in_command_and_args() {
        unsafe {
            env::set_var("TEST_MCP_ROOT", "/path/to/mcp");
            env::set_var("TEST_ARG", "example-arg");
        }

        let raw = RawServer {
            name: Some("mongo".to_string()),
            command: Some("${TEST_MCP_ROOT}/server".to_string()),
            args: Some(vec!["--flag".to_string(), "${TEST_ARG}".to_string()]),
            env: HashMap::new(),
            workdir: Some("${TEST_MCP_ROOT}/work".to_string()),
        };

        let config = ServerConfig::from(raw);

        let cmd = config.command.to_str().expect("valid utf8");
        assert!(cmd.contains("/path/to/mcp/server") || cmd.contains("\\path\\to\\mcp\\server"));
        assert_eq!(config.args, vec!["--flag", "example-arg"]);

        let workdir = config.workdir.expect("workdir exists");
        let workdir_str = workdir.to_str().expect("valid utf8");
        assert!(
            workdir_str.contains("/path/to/mcp/work")
                || workdir_str.contains("\\path\\to\\mcp\\work")
        );

        unsafe {
            env::remove_var("TEST_MCP_ROOT");
            env::remove_var("TEST_ARG");
        }
    }

    #[test]
    fn missing_fields_fall_back_to_python_server() {
        let config = ServerConfig::from(RawServer::default());
        assert_eq!(config.name, DEFAULT_SERVER_NAME);
        assert_eq!(config.command, PathBuf::from("python3"));
        assert_eq!(config.args, vec!["mcp-server.py"]);
        assert!(config.workdir.is_none());
    }

    #[test]
    fn explicit_empty_args_are_kept() {
        let raw = RawServer {
            command: Some("mongo-mcp".into()),
            args: Some(Vec::new()),
            ..RawServer::default()
        };
        let config = ServerConfig::from(raw);
        assert!(config.args.is_empty());
    }
}
