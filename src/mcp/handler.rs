//! MCP request dispatch.
//!
//! Routes `initialize`, `tools/list`, and `tools/call` onto the tool
//! registration table in [`tools`]. Tool names are also accepted as direct
//! JSON-RPC methods and rewritten into `tools/call` internally, so CLI
//! clients can skip the envelope.

use crate::mcp::protocol::{error_codes, Request, Response};
use crate::mcp::tools;
use crate::AppState;
use serde_json::{json, Value};
use tracing::info;

/// Main dispatcher for all incoming MCP requests.
pub async fn handle_mcp_request(req: Request, state: AppState) -> Option<Response> {
    info!("Handling MCP request for method: {}", req.method);

    if req.is_notification() {
        return None;
    }

    let response = match req.method.as_str() {
        "initialize" => handle_initialize(&req),
        "tools/list" => handle_tools_list(&req),
        "tools/call" => handle_tool_call(req, state).await,
        name if tools::find(name).is_some() => {
            let wrapped = Request {
                jsonrpc: req.jsonrpc.clone(),
                id: req.id.clone(),
                method: "tools/call".to_string(),
                params: Some(json!({
                    "name": name,
                    "arguments": req.params.clone().unwrap_or_else(|| json!({}))
                })),
            };
            handle_tool_call(wrapped, state).await
        }
        _ => Response::error(
            req.id,
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", req.method),
        ),
    };

    Some(response)
}

async fn handle_tool_call(req: Request, state: AppState) -> Response {
    let params = match req.params.as_ref() {
        Some(p) => p,
        None => {
            return Response::error(
                req.id,
                error_codes::INVALID_PARAMS,
                "Missing 'params' object".into(),
            )
        }
    };

    let tool_name = match params.get("name").and_then(|n| n.as_str()) {
        Some(name) => name,
        None => {
            return Response::error(
                req.id,
                error_codes::INVALID_PARAMS,
                "Missing 'name' field in params".into(),
            )
        }
    };

    let tool = match tools::find(tool_name) {
        Some(tool) => tool,
        None => {
            return Response::error(
                req.id,
                error_codes::METHOD_NOT_FOUND,
                format!("Tool not found: {}", tool_name),
            )
        }
    };

    let args = params.get("arguments").cloned().unwrap_or_else(|| json!({}));
    match (tool.handler)(&args, &state).await {
        Ok((summary, payload)) => Response::success(req.id, make_texty_result(summary, payload)),
        Err(err) => Response::error(req.id, err.code, err.message),
    }
}

/// Fold a summary line and a structured payload into the MCP result shape:
/// a `content` text array for chat clients, payload fields alongside for
/// JSON-friendly ones.
fn make_texty_result(text: String, payload: Value) -> Value {
    let content = json!([{ "type": "text", "text": text }]);
    match payload {
        Value::Object(mut map) => {
            map.insert("content".into(), content);
            Value::Object(map)
        }
        other => json!({
            "data": other,
            "content": content
        }),
    }
}

fn handle_initialize(req: &Request) -> Response {
    let server_info = json!({
        "name": "erc1155_mcp",
        "version": env!("CARGO_PKG_VERSION")
    });
    let capabilities = json!({ "tools": { "listChanged": false } });
    let instructions =
        "ERC1155 MCP server for multi-token balance queries, transfers, and operator approvals.";

    Response::success(
        req.id.clone(),
        json!({
            "serverInfo": server_info,
            "protocolVersion": "2025-06-18",
            "capabilities": capabilities,
            "instructions": instructions
        }),
    )
}

fn handle_tools_list(req: &Request) -> Response {
    Response::success(req.id.clone(), json!({ "tools": tools::list() }))
}
