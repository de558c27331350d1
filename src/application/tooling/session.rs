use super::error::ToolInvokeError;
use super::interface::{ServerToolInfo, ToolCallOutcome, ToolServerInterface};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tokio::sync::{Mutex as AsyncMutex, oneshot};
use tracing::{debug, error, info, trace, warn};

pub const PROTOCOL_VERSION: &str = "2025-06-18";
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2024-11-05", "2025-03-26", "2025-06-18"];

type BoxedWriter = BufWriter<Box<dyn AsyncWrite + Send + Unpin>>;
type Responder = oneshot::Sender<Result<Value, ToolInvokeError>>;

/// What the server reported about itself during `initialize`.
#[derive(Debug, Clone, PartialEq)]
pub struct InitializeResult {
    pub protocol_version: String,
    pub server_name: Option<String>,
    pub server_version: Option<String>,
    pub instructions: Option<String>,
}

/// JSON-RPC client session over a newline-delimited byte stream.
#[derive(Clone)]
pub struct McpSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    server: String,
    writer: AsyncMutex<Option<BoxedWriter>>,
    pending: AsyncMutex<HashMap<String, Responder>>,
    closed: AtomicBool,
    id_counter: AtomicU64,
    instructions: AsyncMutex<Option<String>>,
}

impl McpSession {
    /// Attach to a server's output (`reader`) and input (`writer`) and start
    /// routing its messages. No request is sent until [`initialize`].
    ///
    /// [`initialize`]: McpSession::initialize
    pub fn connect<R, W>(server: impl Into<String>, reader: R, writer: W) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let writer: Box<dyn AsyncWrite + Send + Unpin> = Box::new(writer);
        let inner = Arc::new(SessionInner {
            server: server.into(),
            writer: AsyncMutex::new(Some(BufWriter::new(writer))),
            pending: AsyncMutex::new(HashMap::new()),
            closed: AtomicBool::new(false),
            id_counter: AtomicU64::new(1),
            instructions: AsyncMutex::new(None),
        });

        let reader_inner = Arc::clone(&inner);
        tokio::spawn(async move {
            reader_inner.reader_loop(reader).await;
        });

        Self { inner }
    }

    pub fn server_name(&self) -> &str {
        &self.inner.server
    }

    /// Run the `initialize` handshake followed by `notifications/initialized`.
    pub async fn initialize(&self) -> Result<InitializeResult, ToolInvokeError> {
        let params = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "clientInfo": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            },
            "capabilities": {}
        });
        let result = self.inner.send_request("initialize", params).await?;

        let protocol_version = result
            .get("protocolVersion")
            .and_then(Value::as_str)
            .ok_or_else(|| self.inner.invalid_result("initialize result lacks protocolVersion"))?
            .to_string();
        if !SUPPORTED_PROTOCOL_VERSIONS.contains(&protocol_version.as_str()) {
            return Err(ToolInvokeError::UnsupportedProtocol {
                server: self.inner.server.clone(),
                version: protocol_version,
            });
        }

        let server_info = result.get("serverInfo");
        let info_field = |key: &str| {
            server_info
                .and_then(|info| info.get(key))
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        let instructions = result
            .get("instructions")
            .and_then(Value::as_str)
            .map(str::to_string);
        *self.inner.instructions.lock().await = instructions.clone();

        self.inner
            .send_notification("notifications/initialized", None)
            .await?;

        let initialized = InitializeResult {
            protocol_version,
            server_name: info_field("name"),
            server_version: info_field("version"),
            instructions,
        };
        info!(
            server = %self.inner.server,
            protocol = initialized.protocol_version.as_str(),
            remote = initialized.server_name.as_deref().unwrap_or("unknown"),
            "MCP session initialized"
        );
        Ok(initialized)
    }

    pub async fn instructions(&self) -> Option<String> {
        self.inner.instructions.lock().await.clone()
    }

    /// Drop the write half, which closes the server's stdin.
    pub async fn close(&self) {
        if let Some(mut writer) = self.inner.writer.lock().await.take() {
            if let Err(err) = writer.shutdown().await {
                debug!(server = %self.inner.server, %err, "failed to close MCP server input");
            }
        }
    }
}

#[async_trait]
impl ToolServerInterface for McpSession {
    async fn list_tools(&self) -> Result<Vec<ServerToolInfo>, ToolInvokeError> {
        let mut tools = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let params = match &cursor {
                Some(cursor) => json!({ "cursor": cursor }),
                None => json!({}),
            };
            let result = self.inner.send_request("tools/list", params).await?;
            let page = result
                .get("tools")
                .and_then(Value::as_array)
                .ok_or_else(|| self.inner.invalid_result("tools/list result lacks 'tools'"))?;
            tools.extend(page.iter().filter_map(ServerToolInfo::from_listing));

            let next = result
                .get("nextCursor")
                .and_then(Value::as_str)
                .map(str::to_string);
            match next {
                Some(next) if cursor.as_deref() == Some(next.as_str()) => {
                    warn!(
                        server = %self.inner.server,
                        cursor = next.as_str(),
                        "server repeated pagination cursor"
                    );
                    break;
                }
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        debug!(server = %self.inner.server, count = tools.len(), "Discovered MCP tools");
        Ok(tools)
    }

    async fn call_tool(
        &self,
        tool: &str,
        arguments: Value,
    ) -> Result<ToolCallOutcome, ToolInvokeError> {
        let params = json!({
            "name": tool,
            "arguments": match arguments {
                Value::Null => Value::Object(Default::default()),
                other => other,
            }
        });
        let result = self.inner.send_request("tools/call", params).await?;
        Ok(ToolCallOutcome::from_result(&result))
    }
}

impl SessionInner {
    async fn reader_loop<R>(self: Arc<Self>, reader: R)
    where
        R: AsyncRead + Send + Unpin,
    {
        let mut lines = BufReader::new(reader).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(raw)) => {
                    let trimmed = raw.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<Value>(trimmed) {
                        Ok(value) => {
                            if let Err(err) = self.process_inbound_message(value).await {
                                warn!(
                                    server = %self.server,
                                    %err,
                                    "failed to process message from MCP server"
                                );
                            }
                        }
                        Err(source) => {
                            debug!(
                                server = %self.server,
                                line = trimmed,
                                %source,
                                "skipping non-JSON line from MCP server"
                            );
                        }
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    warn!(server = %self.server, %err, "failed to read from MCP server");
                    break;
                }
            }
        }

        debug!(server = %self.server, "MCP server output closed");
        self.closed.store(true, Ordering::SeqCst);
        self.fail_all_pending().await;
    }

    async fn process_inbound_message(self: &Arc<Self>, value: Value) -> Result<(), ToolInvokeError> {
        match (value.get("id").cloned(), value.get("method").is_some()) {
            (Some(id), true) => {
                // Replies go out on their own task: the reader must keep
                // draining server output while a large request holds the writer.
                let inner = Arc::clone(self);
                tokio::spawn(async move {
                    if let Err(err) = inner.handle_server_request(id, value).await {
                        warn!(server = %inner.server, %err, "failed to answer MCP server request");
                    }
                });
                Ok(())
            }
            (Some(id), false) => {
                self.handle_response(id, value).await;
                Ok(())
            }
            (None, true) => {
                self.handle_notification(value);
                Ok(())
            }
            (None, false) => Ok(()),
        }
    }

    async fn handle_response(&self, id: Value, value: Value) {
        let Some(key) = response_key(&id) else {
            return;
        };

        let responder = self.pending.lock().await.remove(&key);
        let Some(sender) = responder else {
            debug!(
                server = %self.server,
                response_id = key.as_str(),
                "received response for unknown request"
            );
            return;
        };

        let outcome = match value.get("error") {
            Some(error) => Err(ToolInvokeError::Rpc {
                server: self.server.clone(),
                code: error.get("code").and_then(Value::as_i64).unwrap_or(-32000),
                message: error
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error")
                    .to_string(),
            }),
            None => Ok(value.get("result").cloned().unwrap_or(Value::Null)),
        };
        let _ = sender.send(outcome);
    }

    async fn handle_server_request(&self, id: Value, value: Value) -> Result<(), ToolInvokeError> {
        let method = value
            .get("method")
            .and_then(Value::as_str)
            .unwrap_or_default();
        match method {
            "ping" => self.send_response(id, json!({})).await,
            other => {
                warn!(
                    server = %self.server,
                    method = other,
                    "server sent unsupported request"
                );
                let error = json!({
                    "code": -32601,
                    "message": format!("client does not implement method '{other}'"),
                });
                self.send_error(id, error).await
            }
        }
    }

    fn handle_notification(&self, value: Value) {
        let method = value
            .get("method")
            .and_then(Value::as_str)
            .unwrap_or_default();
        match method {
            "notifications/message" => {
                let params = value.get("params").cloned().unwrap_or(Value::Null);
                let level = params
                    .get("level")
                    .and_then(Value::as_str)
                    .unwrap_or("info");
                let logger = params
                    .get("logger")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                let data = params.get("data").cloned().unwrap_or(Value::Null);
                match level {
                    "debug" => debug!(server = %self.server, logger, %data, "server log"),
                    "info" | "notice" => info!(server = %self.server, logger, %data, "server log"),
                    "warning" => warn!(server = %self.server, logger, %data, "server log"),
                    _ => error!(server = %self.server, logger, level, %data, "server log"),
                }
            }
            "notifications/tools/list_changed" => {
                // Tools are bound to the agent once at startup.
                info!(server = %self.server, "server tool list changed; keeping startup tool set");
            }
            other => {
                trace!(server = %self.server, method = other, "received notification from server");
            }
        }
    }

    async fn send_request(&self, method: &str, params: Value) -> Result<Value, ToolInvokeError> {
        let id = self.next_id();
        let (tx, rx) = oneshot::channel();
        {
            let mut pending = self.pending.lock().await;
            if self.closed.load(Ordering::SeqCst) {
                return Err(self.terminated());
            }
            pending.insert(id.clone(), tx);
        }

        let payload = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params
        });
        if let Err(err) = self.write_message(&payload).await {
            self.pending.lock().await.remove(&id);
            return Err(err);
        }
        debug!(server = %self.server, method, request_id = id.as_str(), "Sent MCP request");

        match rx.await {
            Ok(outcome) => outcome,
            Err(_) => Err(ToolInvokeError::Cancelled {
                server: self.server.clone(),
            }),
        }
    }

    async fn send_notification(
        &self,
        method: &str,
        params: Option<Value>,
    ) -> Result<(), ToolInvokeError> {
        let mut payload = json!({
            "jsonrpc": "2.0",
            "method": method,
        });
        if let (Some(params), Value::Object(map)) = (params, &mut payload) {
            map.insert("params".to_string(), params);
        }
        self.write_message(&payload).await
    }

    async fn send_response(&self, id: Value, result: Value) -> Result<(), ToolInvokeError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": result
        });
        self.write_message(&payload).await
    }

    async fn send_error(&self, id: Value, error: Value) -> Result<(), ToolInvokeError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": error
        });
        self.write_message(&payload).await
    }

    async fn write_message(&self, message: &Value) -> Result<(), ToolInvokeError> {
        let mut encoded =
            serde_json::to_vec(message).map_err(|source| ToolInvokeError::InvalidJson {
                server: self.server.clone(),
                source,
            })?;
        encoded.push(b'\n');

        let mut writer = self.writer.lock().await;
        let stream = writer
            .as_mut()
            .ok_or_else(|| self.transport_error("server input already closed"))?;
        stream
            .write_all(&encoded)
            .await
            .map_err(|source| self.transport_error(source.to_string()))?;
        stream
            .flush()
            .await
            .map_err(|source| self.transport_error(source.to_string()))?;
        Ok(())
    }

    async fn fail_all_pending(&self) {
        let mut pending = self.pending.lock().await;
        for (_, sender) in pending.drain() {
            let _ = sender.send(Err(self.terminated()));
        }
    }

    fn next_id(&self) -> String {
        let id = self.id_counter.fetch_add(1, Ordering::SeqCst);
        format!("req-{id}")
    }

    fn terminated(&self) -> ToolInvokeError {
        ToolInvokeError::Terminated {
            server: self.server.clone(),
        }
    }

    fn invalid_result(&self, reason: impl Into<String>) -> ToolInvokeError {
        ToolInvokeError::InvalidResult {
            server: self.server.clone(),
            reason: reason.into(),
        }
    }

    fn transport_error(&self, message: impl Into<String>) -> ToolInvokeError {
        ToolInvokeError::Transport {
            server: self.server.clone(),
            message: message.into(),
        }
    }
}

fn response_key(id: &Value) -> Option<String> {
    match id {
        Value::String(value) => Some(value.clone()),
        Value::Number(num) => Some(num.to_string()),
        _ => None,
    }
}
