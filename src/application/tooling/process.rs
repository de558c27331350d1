use super::error::ToolInvokeError;
use super::session::McpSession;
use crate::config::ServerConfig;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::{Child, Command};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// MCP server running as a child process, spoken to over its stdio.
///
/// The child is killed when the handle is dropped.
pub struct McpProcess {
    server: ServerConfig,
    child: AsyncMutex<Option<Child>>,
    session: McpSession,
}

impl McpProcess {
    /// Launch the configured command and attach a session to its pipes.
    pub fn spawn(server: &ServerConfig) -> Result<Self, ToolInvokeError> {
        let mut command = Command::new(&server.command);
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        if let Some(dir) = &server.workdir {
            command.current_dir(dir);
        }
        if !server.args.is_empty() {
            command.args(&server.args);
        }
        for (key, value) in &server.env {
            command.env(key, value);
        }

        let mut child = command.spawn().map_err(|source| ToolInvokeError::Spawn {
            server: server.name.clone(),
            source,
        })?;

        let transport_error = |message: &str| ToolInvokeError::Transport {
            server: server.name.clone(),
            message: message.to_string(),
        };
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| transport_error("failed to capture server stdin"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| transport_error("failed to capture server stdout"))?;

        info!(
            server = %server.name,
            command = %server.command.display(),
            args = ?server.args,
            pid = child.id(),
            "Spawned MCP server process"
        );

        Ok(Self {
            server: server.clone(),
            child: AsyncMutex::new(Some(child)),
            session: McpSession::connect(server.name.clone(), stdout, stdin),
        })
    }

    pub fn session(&self) -> &McpSession {
        &self.session
    }

    /// Close the server's stdin, give it a moment to exit, then kill it.
    ///
    /// Returns the exit status the first time; later calls find no child
    /// and return `None`.
    pub async fn shutdown(&self) -> Option<ExitStatus> {
        self.session.close().await;

        let mut child = self.child.lock().await.take()?;
        match tokio::time::timeout(SHUTDOWN_GRACE, child.wait()).await {
            Ok(Ok(status)) => {
                debug!(server = %self.server.name, %status, "MCP server exited");
                Some(status)
            }
            Ok(Err(err)) => {
                warn!(server = %self.server.name, %err, "failed to wait for MCP server");
                None
            }
            Err(_) => {
                if let Err(err) = child.kill().await {
                    debug!(
                        server = %self.server.name,
                        %err,
                        "failed to kill MCP server process (may have already exited)"
                    );
                }
                child.wait().await.ok()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::tooling::ToolServerInterface;
    use std::path::PathBuf;

    #[tokio::test]
    async fn spawn_reports_missing_command() {
        let server = ServerConfig {
            name: "missing".into(),
            command: PathBuf::from("/definitely/not/a/real/mcp-server"),
            ..ServerConfig::default()
        };

        let err = McpProcess::spawn(&server).err().expect("spawn must fail");
        assert!(matches!(err, ToolInvokeError::Spawn { ref server, .. } if server == "missing"));
    }

    #[tokio::test]
    async fn shutdown_releases_child_once() {
        let server = ServerConfig {
            name: "echo".into(),
            command: PathBuf::from("cat"),
            args: Vec::new(),
            ..ServerConfig::default()
        };
        let process = McpProcess::spawn(&server).expect("cat spawns");

        let status = process.shutdown().await.expect("child reaped");
        assert!(status.success(), "cat exits cleanly once stdin closes");
        assert!(process.shutdown().await.is_none());

        let err = process
            .session()
            .list_tools()
            .await
            .expect_err("session is closed");
        assert!(matches!(
            err,
            ToolInvokeError::Terminated { .. } | ToolInvokeError::Transport { .. }
        ));
    }
}
