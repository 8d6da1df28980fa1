// MCP server: request dispatch and the newline-delimited JSON-RPC loop

use crate::protocol::{
    CallToolParams, CallToolResult, InitializeParams, InitializeResult, JsonRpcError,
    JsonRpcRequest, JsonRpcResponse, ListToolsResult, ServerCapabilities, ServerInfo,
    ToolsCapability, DEFAULT_PROTOCOL_VERSION,
};
use crate::tools::ToolRegistry;
use anyhow::{bail, Result};
use bytes::BytesMut;
use futures_util::{FutureExt, StreamExt};
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tokio_util::codec::{Decoder, FramedRead, LinesCodec, LinesCodecError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "apollo-io-manager";

/// Longest accepted request line.
pub const MAX_LINE_BYTES: usize = 8 * 1024 * 1024;

/// How long shutdown waits for queued responses to be written.
const SHUTDOWN_FLUSH: Duration = Duration::from_secs(2);

/// Errors surfaced as JSON-RPC faults by `tools/call`.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

/// Answers MCP requests against a tool registry.
pub struct McpHandler {
    registry: ToolRegistry,
    server_info: ServerInfo,
}

impl McpHandler {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry,
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    /// The static tool catalog.
    pub fn list_tools(&self) -> ListToolsResult {
        ListToolsResult {
            tools: self.registry.list_schemas(),
        }
    }

    /// Run one tool.
    ///
    /// Only an unknown name is an error here. Failures inside the tool, panics
    /// included, come back as an error-flagged result.
    pub async fn call_tool(&self, params: CallToolParams) -> Result<CallToolResult, DispatchError> {
        let tool = self
            .registry
            .get(&params.name)
            .ok_or_else(|| DispatchError::UnknownTool(params.name.clone()))?;

        let arguments = params.arguments.unwrap_or_else(|| serde_json::json!({}));
        debug!(tool = %params.name, "Calling tool");

        let outcome = AssertUnwindSafe(tool.execute(arguments)).catch_unwind().await;
        let result = match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                error!(tool = %params.name, error = %format!("{:#}", e), "Error executing tool");
                CallToolResult::error(format!("Apollo.io API error: {:#}", e))
            }
            Err(_) => {
                error!(tool = %params.name, "Tool panicked");
                CallToolResult::error(format!("Apollo.io API error: tool {} panicked", params.name))
            }
        };
        Ok(result)
    }

    /// Handle one line of input. `None` means nothing is sent back.
    pub async fn handle_message(&self, line: &str) -> Option<JsonRpcResponse> {
        let value: serde_json::Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Unparseable message");
                return Some(JsonRpcResponse::error(
                    serde_json::Value::Null,
                    JsonRpcError::parse_error(),
                ));
            }
        };

        let id = value.get("id").cloned();
        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => {
                warn!(error = %e, "Invalid JSON-RPC request");
                id.map(|id| JsonRpcResponse::error(id, JsonRpcError::invalid_request()))
            }
        }
    }

    /// Handle a parsed request.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id.clone() else {
            debug!(method = %request.method, "Notification received");
            return None;
        };

        let response = match request.method.as_str() {
            "initialize" => {
                let params: InitializeParams = request
                    .params
                    .and_then(|p| serde_json::from_value(p).ok())
                    .unwrap_or_default();
                if let Some(client) = &params.client_info {
                    info!(client = %client.name, version = %client.version, "Client connected");
                }
                JsonRpcResponse::success(id, self.initialize(params))
            }
            "ping" => JsonRpcResponse::success(id, serde_json::json!({})),
            "tools/list" => JsonRpcResponse::success(id, self.list_tools()),
            "tools/call" => {
                let params = request
                    .params
                    .ok_or_else(|| "missing params".to_string())
                    .and_then(|p| {
                        serde_json::from_value::<CallToolParams>(p).map_err(|e| e.to_string())
                    });
                match params {
                    Ok(params) => match self.call_tool(params).await {
                        Ok(result) => JsonRpcResponse::success(id, result),
                        Err(e) => {
                            warn!(error = %e, "tools/call rejected");
                            JsonRpcResponse::error(id, JsonRpcError::method_not_found(e.to_string()))
                        }
                    },
                    Err(message) => JsonRpcResponse::error(
                        id,
                        JsonRpcError::invalid_params(format!("Invalid tools/call params: {}", message)),
                    ),
                }
            }
            other => JsonRpcResponse::error(
                id,
                JsonRpcError::method_not_found(format!("Method not found: {}", other)),
            ),
        };

        Some(response)
    }

    fn initialize(&self, params: InitializeParams) -> InitializeResult {
        InitializeResult {
            protocol_version: params
                .protocol_version
                .unwrap_or_else(|| DEFAULT_PROTOCOL_VERSION.to_string()),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
                resources: serde_json::json!({}),
            },
            server_info: self.server_info.clone(),
        }
    }
}

/// Server lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Handlers registered, not reading input yet.
    Initialized,
    /// Transport connected. Stays set for the life of the process.
    Running,
}

/// MCP server over a line-delimited byte stream.
pub struct McpServer {
    handler: Arc<McpHandler>,
    running: AtomicBool,
    shutdown: CancellationToken,
    max_line_bytes: usize,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            handler: Arc::new(McpHandler::new(registry)),
            running: AtomicBool::new(false),
            shutdown: CancellationToken::new(),
            max_line_bytes: MAX_LINE_BYTES,
        }
    }

    /// Override the longest accepted request line.
    pub fn with_max_line_bytes(mut self, max_line_bytes: usize) -> Self {
        self.max_line_bytes = max_line_bytes;
        self
    }

    pub fn state(&self) -> ServerState {
        if self.running.load(Ordering::SeqCst) {
            ServerState::Running
        } else {
            ServerState::Initialized
        }
    }

    pub fn handler(&self) -> Arc<McpHandler> {
        self.handler.clone()
    }

    /// Token that stops the server when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Serve on stdin/stdout until EOF or shutdown.
    pub async fn run(&self) -> Result<()> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve requests read from `reader`, writing responses to `writer`.
    ///
    /// Each request runs in its own task, so slow tool calls do not hold up
    /// others; responses are written in completion order. At EOF the calls
    /// still in flight are answered before returning. Shutdown aborts them.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        if self.running.swap(true, Ordering::SeqCst) {
            bail!("MCP server is already running");
        }

        let (tx, rx) = mpsc::unbounded_channel::<JsonRpcResponse>();
        let writer_task = tokio::spawn(write_responses(rx, writer));

        let mut lines = FramedRead::new(reader, RequestCodec::new(self.max_line_bytes));
        let mut in_flight = JoinSet::new();
        info!("MCP server running, waiting for requests");

        loop {
            let next = tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("Shutdown requested, closing transport");
                    break;
                }
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    log_join(joined);
                    continue;
                }
                next = lines.next() => next,
            };

            let line = match next {
                None => {
                    info!("Input closed (EOF), shutting down");
                    break;
                }
                Some(Ok(Frame::Line(line))) => line,
                Some(Ok(Frame::Oversized)) => {
                    warn!(limit = self.max_line_bytes, "Request line too long, discarded");
                    let _ = tx.send(JsonRpcResponse::error(
                        serde_json::Value::Null,
                        JsonRpcError::invalid_request(),
                    ));
                    continue;
                }
                Some(Err(e)) => {
                    error!(error = %e, "Failed to read input");
                    in_flight.abort_all();
                    return Err(e.into());
                }
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            debug!(message = %trimmed, "Received");

            let handler = self.handler.clone();
            let tx = tx.clone();
            let message = trimmed.to_string();
            in_flight.spawn(async move {
                if let Some(response) = handler.handle_message(&message).await {
                    // Receiver only goes away when the writer failed.
                    let _ = tx.send(response);
                }
            });
        }

        // Answer what is still running unless shutdown was requested
        while !in_flight.is_empty() {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    debug!(pending = in_flight.len(), "Aborting in-flight calls");
                    in_flight.abort_all();
                    while in_flight.join_next().await.is_some() {}
                }
                Some(joined) = in_flight.join_next() => log_join(joined),
            }
        }

        drop(tx);
        let flushed = if self.shutdown.is_cancelled() {
            match tokio::time::timeout(SHUTDOWN_FLUSH, writer_task).await {
                Ok(joined) => joined,
                Err(_) => {
                    warn!("Output not flushed before shutdown deadline");
                    return Ok(());
                }
            }
        } else {
            writer_task.await
        };
        match flushed {
            Ok(result) => result,
            Err(e) => bail!("response writer task failed: {}", e),
        }
    }
}

fn log_join(joined: std::result::Result<(), JoinError>) {
    if let Err(e) = joined {
        if e.is_panic() {
            error!(error = %e, "Request task panicked");
        }
    }
}

/// One decoded input frame.
#[derive(Debug, PartialEq)]
enum Frame {
    Line(String),
    /// A line over the length limit; its bytes are skipped up to the next newline.
    Oversized,
}

/// Line codec that keeps the stream usable after an overlong line.
///
/// `FramedRead` ends the stream after a decoder error, so the length
/// violation is reported as a frame instead.
struct RequestCodec {
    lines: LinesCodec,
}

impl RequestCodec {
    fn new(max_length: usize) -> Self {
        Self {
            lines: LinesCodec::new_with_max_length(max_length),
        }
    }

    fn map(decoded: Result<Option<String>, LinesCodecError>) -> Result<Option<Frame>, LinesCodecError> {
        match decoded {
            Ok(line) => Ok(line.map(Frame::Line)),
            Err(LinesCodecError::MaxLineLengthExceeded) => Ok(Some(Frame::Oversized)),
            Err(e) => Err(e),
        }
    }
}

impl Decoder for RequestCodec {
    type Item = Frame;
    type Error = LinesCodecError;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Frame>, LinesCodecError> {
        Self::map(self.lines.decode(buf))
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Frame>, LinesCodecError> {
        Self::map(self.lines.decode_eof(buf))
    }
}

async fn write_responses<W>(mut rx: mpsc::UnboundedReceiver<JsonRpcResponse>, mut writer: W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        let json = serde_json::to_string(&response)?;
        debug!(message = %json, "Sending");

        if let Err(e) = write_line(&mut writer, &json).await {
            error!(error = %e, "Failed to write output");
            return Err(e.into());
        }
    }
    writer.flush().await?;
    Ok(())
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, json: &str) -> std::io::Result<()> {
    writer.write_all(json.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}
