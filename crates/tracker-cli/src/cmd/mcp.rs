use crate::tools::{self, ToolContext, TrackerTool};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{BufRead, Write};

const PROTOCOL_VERSION: &str = "2024-11-05";

const PARSE_ERROR: i32 = -32700;
const INVALID_REQUEST: i32 = -32600;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;

// ---------------------------------------------------------------------------
// JSON-RPC 2.0 protocol types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    #[allow(dead_code)]
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    pub params: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcResponse {
    fn ok(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn err(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

/// MCP `tools/call` result body.
#[derive(Debug, Serialize)]
struct ToolCallResult {
    content: Vec<ToolContent>,
    #[serde(rename = "isError")]
    is_error: bool,
}

#[derive(Debug, Serialize)]
struct ToolContent {
    r#type: &'static str,
    text: String,
}

// ---------------------------------------------------------------------------
// Server loop
// ---------------------------------------------------------------------------

pub fn run(ctx: &ToolContext) -> anyhow::Result<()> {
    tracing::info!(
        base_url = %ctx.config.base_url,
        authenticated = ctx.api.is_some(),
        "tracker MCP server listening on stdio"
    );
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    serve(stdin.lock(), stdout.lock(), ctx)?;
    tracing::info!("stdin closed, shutting down");
    Ok(())
}

/// Answer one JSON-RPC request per input line until EOF.
pub fn serve<R: BufRead, W: Write>(input: R, mut output: W, ctx: &ToolContext) -> anyhow::Result<()> {
    let tools = tools::all_tools();

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if let Some(response) = respond_to_line(&line, &tools, ctx) {
            serde_json::to_writer(&mut output, &response)?;
            writeln!(output)?;
            output.flush()?;
        }
    }

    Ok(())
}

/// `None` for notifications, which get no reply.
fn respond_to_line(
    line: &str,
    tools: &[Box<dyn TrackerTool>],
    ctx: &ToolContext,
) -> Option<JsonRpcResponse> {
    let raw: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            return Some(JsonRpcResponse::err(None, PARSE_ERROR, format!("parse error: {e}")));
        }
    };

    let is_notification = !raw
        .as_object()
        .map(|o| o.contains_key("id"))
        .unwrap_or(false);
    if is_notification {
        tracing::debug!(message = %line, "ignoring notification");
        return None;
    }

    match serde_json::from_value::<JsonRpcRequest>(raw) {
        Ok(request) => Some(handle_request(&request, tools, ctx)),
        Err(e) => Some(JsonRpcResponse::err(
            None,
            INVALID_REQUEST,
            format!("invalid request: {e}"),
        )),
    }
}

// ---------------------------------------------------------------------------
// Request dispatch
// ---------------------------------------------------------------------------

pub fn handle_request(
    req: &JsonRpcRequest,
    tools: &[Box<dyn TrackerTool>],
    ctx: &ToolContext,
) -> JsonRpcResponse {
    let id = req.id.clone();
    match req.method.as_str() {
        "initialize" => JsonRpcResponse::ok(
            id,
            serde_json::json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": "tracker",
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        ),

        "tools/list" => {
            let listed: Vec<Value> = tools
                .iter()
                .map(|t| {
                    serde_json::json!({
                        "name": t.name(),
                        "description": t.description(),
                        "inputSchema": t.schema()
                    })
                })
                .collect();
            JsonRpcResponse::ok(id, serde_json::json!({ "tools": listed }))
        }

        "tools/call" => {
            let Some(params) = &req.params else {
                return JsonRpcResponse::err(id, INVALID_PARAMS, "missing params");
            };
            let Some(tool_name) = params["name"].as_str() else {
                return JsonRpcResponse::err(id, INVALID_PARAMS, "missing tool name in params");
            };
            let Some(tool) = tools.iter().find(|t| t.name() == tool_name) else {
                return JsonRpcResponse::err(
                    id,
                    METHOD_NOT_FOUND,
                    format!("tool not found: {tool_name}"),
                );
            };

            let args = params.get("arguments").cloned().unwrap_or(Value::Null);
            JsonRpcResponse::ok(id, call_tool(tool.as_ref(), args, ctx))
        }

        other => JsonRpcResponse::err(id, METHOD_NOT_FOUND, format!("method not found: {other}")),
    }
}

/// Tool failures are reported inside the result with `isError`, never as
/// JSON-RPC errors, so the assistant sees the message.
fn call_tool(tool: &dyn TrackerTool, args: Value, ctx: &ToolContext) -> Value {
    tracing::debug!(tool = tool.name(), "tools/call");
    let (text, is_error) = match tool.call(args, ctx) {
        Ok(v) => (
            serde_json::to_string_pretty(&v).unwrap_or_else(|e| format!("serialization error: {e}")),
            false,
        ),
        Err(e) => {
            tracing::warn!(tool = tool.name(), error = %e, "tool call failed");
            (e, true)
        }
    };

    let result = ToolCallResult {
        content: vec![ToolContent {
            r#type: "text",
            text,
        }],
        is_error,
    };
    serde_json::to_value(&result).unwrap_or_else(|e| serde_json::json!({"error": e.to_string()}))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
