//! Tool registration table.
//!
//! Every callable tool is one row: name, description, input schema, and
//! handler. `tools/list` and `tools/call` are both served from this table,
//! so adding a tool means adding exactly one entry here.

use crate::mcp::protocol::error_codes;
use crate::token::Erc1155Error;
use crate::utils;
use crate::AppState;
use futures::future::BoxFuture;
use serde_json::{json, Value};

/// Failure from a tool handler, carrying the JSON-RPC error code the
/// dispatcher responds with.
#[derive(Debug)]
pub struct ToolError {
    pub code: i32,
    pub message: String,
}

impl ToolError {
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: error_codes::INVALID_PARAMS,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: error_codes::INTERNAL_ERROR,
            message: message.into(),
        }
    }
}

impl From<Erc1155Error> for ToolError {
    fn from(err: Erc1155Error) -> Self {
        match err {
            Erc1155Error::NotFound(_) | Erc1155Error::UnsupportedChain { .. } => {
                ToolError::invalid_params(err.to_string())
            }
            _ => ToolError::internal(err.to_string()),
        }
    }
}

/// Summary line plus structured payload; the dispatcher folds both into the
/// MCP result shape.
pub type ToolResult = Result<(String, Value), ToolError>;

pub type ToolHandler = for<'a> fn(&'a Value, &'a AppState) -> BoxFuture<'a, ToolResult>;

pub struct ToolDef {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: fn() -> Value,
    pub handler: ToolHandler,
}

pub static TOOLS: [ToolDef; 7] = [
    ToolDef {
        name: "get_token_info_by_symbol",
        description: "Look up a registered ERC1155 token by symbol on the connected chain.",
        input_schema: token_info_schema,
        handler: get_token_info_by_symbol,
    },
    ToolDef {
        name: "get_erc1155_balance",
        description: "Get the ERC1155 balance of an owner for a token id.",
        input_schema: balance_schema,
        handler: get_erc1155_balance,
    },
    ToolDef {
        name: "get_erc1155_balance_batch",
        description: "Get ERC1155 balances for several (owner, token id) pairs in one call.",
        input_schema: balance_batch_schema,
        handler: get_erc1155_balance_batch,
    },
    ToolDef {
        name: "transfer_erc1155",
        description: "Transfer an amount of an ERC1155 token id (signed tx).",
        input_schema: transfer_schema,
        handler: transfer_erc1155,
    },
    ToolDef {
        name: "batch_transfer_erc1155",
        description: "Transfer several ERC1155 token ids in one transaction (signed tx).",
        input_schema: batch_transfer_schema,
        handler: batch_transfer_erc1155,
    },
    ToolDef {
        name: "set_approval_for_all",
        description: "Grant or revoke an operator for all of the sender's ERC1155 tokens (signed tx).",
        input_schema: set_approval_schema,
        handler: set_approval_for_all,
    },
    ToolDef {
        name: "is_approved_for_all",
        description: "Check whether an operator is approved for all of an owner's ERC1155 tokens.",
        input_schema: is_approved_schema,
        handler: is_approved_for_all,
    },
];

pub fn find(name: &str) -> Option<&'static ToolDef> {
    TOOLS.iter().find(|t| t.name == name)
}

/// Tool definitions in the shape `tools/list` returns.
pub fn list() -> Value {
    Value::Array(
        TOOLS
            .iter()
            .map(|t| {
                json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": (t.input_schema)()
                })
            })
            .collect(),
    )
}

// --- Schemas ---

fn token_info_schema() -> Value {
    json!({"type": "object", "properties": {"symbol": {"type": "string", "description": "Token symbol, matched case-insensitively."}}, "required": ["symbol"], "additionalProperties": false})
}

fn balance_schema() -> Value {
    json!({"type": "object", "properties": {"tokenAddress": {"type": "string"}, "owner": {"type": "string", "description": "0x address or resolvable name (e.g. ENS)."}, "id": {"type": "string", "description": "Token id as a decimal string."}}, "required": ["tokenAddress", "owner", "id"], "additionalProperties": false})
}

fn balance_batch_schema() -> Value {
    json!({"type": "object", "properties": {"tokenAddress": {"type": "string"}, "owners": {"type": "array", "items": {"type": "string"}}, "ids": {"type": "array", "items": {"type": "string"}, "description": "Token ids as decimal strings, one per owner."}}, "required": ["tokenAddress", "owners", "ids"], "additionalProperties": false})
}

fn transfer_schema() -> Value {
    json!({"type": "object", "properties": {"tokenAddress": {"type": "string"}, "from": {"type": "string"}, "to": {"type": "string"}, "id": {"type": "string"}, "value": {"type": "string", "description": "Amount as a decimal string."}, "data": {"type": "string", "description": "Optional 0x-prefixed hex payload, defaults to 0x."}}, "required": ["tokenAddress", "from", "to", "id", "value"], "additionalProperties": false})
}

fn batch_transfer_schema() -> Value {
    json!({"type": "object", "properties": {"tokenAddress": {"type": "string"}, "from": {"type": "string"}, "to": {"type": "string"}, "ids": {"type": "array", "items": {"type": "string"}}, "values": {"type": "array", "items": {"type": "string"}}, "data": {"type": "string"}}, "required": ["tokenAddress", "from", "to", "ids", "values"], "additionalProperties": false})
}

fn set_approval_schema() -> Value {
    json!({"type": "object", "properties": {"tokenAddress": {"type": "string"}, "operator": {"type": "string"}, "approved": {"type": "boolean"}}, "required": ["tokenAddress", "operator", "approved"], "additionalProperties": false})
}

fn is_approved_schema() -> Value {
    json!({"type": "object", "properties": {"tokenAddress": {"type": "string"}, "owner": {"type": "string"}, "operator": {"type": "string"}}, "required": ["tokenAddress", "owner", "operator"], "additionalProperties": false})
}

// --- Handlers ---

fn get_token_info_by_symbol<'a>(args: &'a Value, state: &'a AppState) -> BoxFuture<'a, ToolResult> {
    Box::pin(async move {
        let symbol: String = utils::get_required_arg(args, "symbol")?;
        let info = state.service.lookup_by_symbol(&symbol)?;
        let summary = format!("{} is {} on this chain", info.symbol, info.contract_address);
        Ok((summary, json!(info)))
    })
}

fn get_erc1155_balance<'a>(args: &'a Value, state: &'a AppState) -> BoxFuture<'a, ToolResult> {
    Box::pin(async move {
        let token: String = utils::get_required_arg(args, "tokenAddress")?;
        let owner: String = utils::get_required_arg(args, "owner")?;
        let id: String = utils::get_required_arg(args, "id")?;
        let id = utils::parse_u256(&id, "id")?;
        let balance = state.service.balance_of(&token, &owner, id).await?;
        Ok((
            format!("ERC1155 balance is {}", balance),
            json!({"balance": balance.to_string()}),
        ))
    })
}

fn get_erc1155_balance_batch<'a>(args: &'a Value, state: &'a AppState) -> BoxFuture<'a, ToolResult> {
    Box::pin(async move {
        let token: String = utils::get_required_arg(args, "tokenAddress")?;
        let owners: Vec<String> = utils::get_required_arg(args, "owners")?;
        let ids: Vec<String> = utils::get_required_arg(args, "ids")?;
        let ids = utils::parse_u256_list(&ids, "ids")?;
        let balances = state.service.balance_of_batch(&token, &owners, &ids).await?;
        let balances: Vec<String> = balances.iter().map(|b| b.to_string()).collect();
        Ok((
            format!("ERC1155 balanceOfBatch returned {} balances", balances.len()),
            json!({"balances": balances}),
        ))
    })
}

fn transfer_erc1155<'a>(args: &'a Value, state: &'a AppState) -> BoxFuture<'a, ToolResult> {
    Box::pin(async move {
        let token: String = utils::get_required_arg(args, "tokenAddress")?;
        let from: String = utils::get_required_arg(args, "from")?;
        let to: String = utils::get_required_arg(args, "to")?;
        let id: String = utils::get_required_arg(args, "id")?;
        let value: String = utils::get_required_arg(args, "value")?;
        let id = utils::parse_u256(&id, "id")?;
        let value = utils::parse_u256(&value, "value")?;
        let data = match utils::get_optional_arg::<String>(args, "data")? {
            Some(hex) => Some(utils::parse_hex_bytes(&hex, "data")?),
            None => None,
        };
        let hash = state
            .service
            .safe_transfer_from(&token, &from, &to, id, value, data)
            .await?;
        Ok((
            "ERC1155 transfer sent".to_string(),
            json!({"transactionHash": format!("{:?}", hash)}),
        ))
    })
}

fn batch_transfer_erc1155<'a>(args: &'a Value, state: &'a AppState) -> BoxFuture<'a, ToolResult> {
    Box::pin(async move {
        let token: String = utils::get_required_arg(args, "tokenAddress")?;
        let from: String = utils::get_required_arg(args, "from")?;
        let to: String = utils::get_required_arg(args, "to")?;
        let ids: Vec<String> = utils::get_required_arg(args, "ids")?;
        let values: Vec<String> = utils::get_required_arg(args, "values")?;
        let ids = utils::parse_u256_list(&ids, "ids")?;
        let values = utils::parse_u256_list(&values, "values")?;
        let data = match utils::get_optional_arg::<String>(args, "data")? {
            Some(hex) => Some(utils::parse_hex_bytes(&hex, "data")?),
            None => None,
        };
        let hash = state
            .service
            .safe_batch_transfer_from(&token, &from, &to, &ids, &values, data)
            .await?;
        Ok((
            "ERC1155 batch transfer sent".to_string(),
            json!({"transactionHash": format!("{:?}", hash)}),
        ))
    })
}

fn set_approval_for_all<'a>(args: &'a Value, state: &'a AppState) -> BoxFuture<'a, ToolResult> {
    Box::pin(async move {
        let token: String = utils::get_required_arg(args, "tokenAddress")?;
        let operator: String = utils::get_required_arg(args, "operator")?;
        let approved: bool = utils::get_required_arg(args, "approved")?;
        let hash = state
            .service
            .set_approval_for_all(&token, &operator, approved)
            .await?;
        Ok((
            format!("ERC1155 operator approval set to {}", approved),
            json!({"transactionHash": format!("{:?}", hash)}),
        ))
    })
}

fn is_approved_for_all<'a>(args: &'a Value, state: &'a AppState) -> BoxFuture<'a, ToolResult> {
    Box::pin(async move {
        let token: String = utils::get_required_arg(args, "tokenAddress")?;
        let owner: String = utils::get_required_arg(args, "owner")?;
        let operator: String = utils::get_required_arg(args, "operator")?;
        let approved = state
            .service
            .is_approved_for_all(&token, &owner, &operator)
            .await?;
        Ok((
            format!("operator approval is {}", approved),
            json!({"approved": approved}),
        ))
    })
}
