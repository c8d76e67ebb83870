//! Argument helpers for tool handlers.

use crate::mcp::tools::ToolError;
use ethers_core::types::{Bytes, U256};
use serde::de::DeserializeOwned;
use serde_json::{from_value, Value};

/// Extract a required argument from the tool's JSON arguments object.
pub fn get_required_arg<T: DeserializeOwned>(args: &Value, key: &str) -> Result<T, ToolError> {
    from_value(args.get(key).cloned().unwrap_or(Value::Null)).map_err(|_| {
        ToolError::invalid_params(format!("Missing or invalid required argument: '{}'", key))
    })
}

/// Extract an optional argument; absent and `null` both map to `None`.
pub fn get_optional_arg<T: DeserializeOwned>(args: &Value, key: &str) -> Result<Option<T>, ToolError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => from_value(v.clone())
            .map(Some)
            .map_err(|_| ToolError::invalid_params(format!("Invalid argument: '{}'", key))),
    }
}

/// Parse a decimal string into a uint256.
pub fn parse_u256(value: &str, key: &str) -> Result<U256, ToolError> {
    U256::from_dec_str(value.trim()).map_err(|e| {
        ToolError::invalid_params(format!("'{}' must be a decimal uint256: {}", key, e))
    })
}

pub fn parse_u256_list(values: &[String], key: &str) -> Result<Vec<U256>, ToolError> {
    values.iter().map(|v| parse_u256(v, key)).collect()
}

/// Parse an optional 0x-prefixed hex string into bytes; empty and `"0x"`
/// both map to empty bytes.
pub fn parse_hex_bytes(value: &str, key: &str) -> Result<Bytes, ToolError> {
    let s = value.strip_prefix("0x").unwrap_or(value);
    if s.is_empty() {
        return Ok(Bytes::default());
    }
    hex::decode(s)
        .map(Bytes::from)
        .map_err(|e| ToolError::invalid_params(format!("'{}' must be 0x-prefixed hex: {}", key, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn required_arg_missing_is_an_error() {
        let args = json!({"owner": "0xabc"});
        let r: Result<String, _> = get_required_arg(&args, "symbol");
        assert!(r.is_err());
    }

    #[test]
    fn optional_arg_null_is_none() {
        let args = json!({"data": null});
        let r: Option<String> = get_optional_arg(&args, "data").unwrap();
        assert!(r.is_none());
    }

    #[test]
    fn parse_u256_rejects_hex() {
        assert!(parse_u256("12", "id").is_ok());
        assert!(parse_u256("0x12", "id").is_err());
    }

    #[test]
    fn parse_hex_bytes_defaults_empty() {
        assert!(parse_hex_bytes("0x", "data").unwrap().is_empty());
        assert_eq!(parse_hex_bytes("0x0102", "data").unwrap().to_vec(), vec![1u8, 2u8]);
        assert!(parse_hex_bytes("zz", "data").is_err());
    }
}
