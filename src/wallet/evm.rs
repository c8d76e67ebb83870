// src/wallet/evm.rs

use crate::abi;
use crate::wallet::{Chain, ReadCall, TransactionCall, WalletClient, WalletClientError};
use async_trait::async_trait;
use ethers_core::abi::Token;
use ethers_core::types::{Address, Bytes, TransactionRequest, H256, U256};
use ethers_core::utils::keccak256;
use reqwest::Client;
use serde_json::{json, Value};
use std::str::FromStr;
use tracing::debug;

/// Mainnet ENS registry, shared by most EVM networks that deploy ENS.
const DEFAULT_ENS_REGISTRY: &str = "0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e";

/// Wallet client backed by a JSON-RPC endpoint and an optional local signer.
///
/// Reads go through `eth_call`; writes fetch nonce and gas parameters from
/// the node, sign locally, and broadcast via `eth_sendRawTransaction`.
/// Human-readable `*.eth` names resolve through the ENS registry.
#[derive(Clone)]
pub struct EvmWalletClient {
    http: Client,
    rpc_url: String,
    chain: Chain,
    signer: Option<ethers_signers::LocalWallet>,
    ens_registry: Address,
}

impl EvmWalletClient {
    pub fn new(rpc_url: impl Into<String>, chain_id: u64, signer: Option<ethers_signers::LocalWallet>) -> Self {
        Self {
            http: Client::new(),
            rpc_url: rpc_url.into(),
            chain: Chain { id: chain_id },
            signer,
            ens_registry: Address::from_str(DEFAULT_ENS_REGISTRY).expect("static registry address"),
        }
    }

    pub fn with_ens_registry(mut self, registry: Address) -> Self {
        self.ens_registry = registry;
        self
    }

    async fn rpc(&self, method: &str, params: Value) -> Result<Value, WalletClientError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1
        });
        let resp = self.http.post(&self.rpc_url).json(&payload).send().await?;
        let v: Value = resp.json().await?;
        if let Some(err) = v.get("error") {
            return Err(WalletClientError::Rpc(format!("{} error: {}", method, err)));
        }
        Ok(v["result"].clone())
    }

    async fn eth_call(&self, to: Address, data: Bytes) -> Result<Bytes, WalletClientError> {
        let params = json!([
            {"to": format!("{:?}", to), "data": format!("0x{}", hex::encode(&data))},
            "latest"
        ]);
        let result = self.rpc("eth_call", params).await?;
        let s = result
            .as_str()
            .ok_or_else(|| WalletClientError::Rpc("eth_call result is not a string".into()))?;
        let raw = hex::decode(s.strip_prefix("0x").unwrap_or(s))
            .map_err(|e| WalletClientError::Rpc(format!("invalid eth_call result: {}", e)))?;
        Ok(Bytes::from(raw))
    }

    async fn resolve_ens(&self, name: &str) -> Result<Address, WalletClientError> {
        let node = namehash(name);

        let data = abi::encode_call("resolver(bytes32)", &[Token::FixedBytes(node.to_vec())]);
        let raw = self.eth_call(self.ens_registry, data).await?;
        let resolver = abi::decode_address(&raw)
            .map_err(|e| WalletClientError::resolution(name, e.to_string()))?;
        if resolver.is_zero() {
            return Err(WalletClientError::resolution(name, "no resolver set"));
        }

        let data = abi::encode_call("addr(bytes32)", &[Token::FixedBytes(node.to_vec())]);
        let raw = self.eth_call(resolver, data).await?;
        let address = abi::decode_address(&raw)
            .map_err(|e| WalletClientError::resolution(name, e.to_string()))?;
        if address.is_zero() {
            return Err(WalletClientError::resolution(name, "name does not resolve to an address"));
        }
        debug!("resolved {} to {:?}", name, address);
        Ok(address)
    }
}

#[async_trait]
impl WalletClient for EvmWalletClient {
    fn get_chain(&self) -> Chain {
        self.chain
    }

    async fn resolve_address(&self, identifier: &str) -> Result<Address, WalletClientError> {
        let identifier = identifier.trim();
        if identifier.starts_with("0x") {
            return Address::from_str(identifier)
                .map_err(|e| WalletClientError::resolution(identifier, e.to_string()));
        }
        if identifier.ends_with(".eth") {
            return self.resolve_ens(identifier).await;
        }
        Err(WalletClientError::resolution(
            identifier,
            "expected a 0x address or an ENS name",
        ))
    }

    async fn read(&self, call: ReadCall) -> Result<Bytes, WalletClientError> {
        let data = abi::encode_call(call.function, &call.args);
        self.eth_call(call.address, data).await
    }

    async fn send_transaction(&self, call: TransactionCall) -> Result<H256, WalletClientError> {
        use ethers_signers::Signer;

        let wallet = self
            .signer
            .clone()
            .ok_or(WalletClientError::NoSigner)?
            .with_chain_id(self.chain.id);
        let from = wallet.address();
        let data = abi::encode_call(call.function, &call.args);

        let nonce = self
            .rpc("eth_getTransactionCount", json!([format!("{:?}", from), "pending"]))
            .await
            .and_then(|v| parse_quantity(&v))?;

        let mut tx = TransactionRequest::new()
            .to(call.to)
            .data(data)
            .from(from)
            .nonce(nonce)
            .chain_id(self.chain.id);

        let call_obj = serde_json::to_value(&tx)
            .map_err(|e| WalletClientError::Rpc(format!("could not serialize transaction: {}", e)))?;
        let gas = self
            .rpc("eth_estimateGas", json!([call_obj]))
            .await
            .and_then(|v| parse_quantity(&v))?;
        tx = tx.gas(gas);

        let gas_price = self
            .rpc("eth_gasPrice", json!([]))
            .await
            .and_then(|v| parse_quantity(&v))?;
        tx = tx.gas_price(gas_price);

        let signature = wallet
            .sign_transaction(&tx.clone().into())
            .await
            .map_err(|e| WalletClientError::Signing(e.to_string()))?;
        let raw = tx.rlp_signed(&signature);

        let result = self
            .rpc("eth_sendRawTransaction", json!([format!("0x{}", hex::encode(&raw))]))
            .await?;
        let hash = result
            .as_str()
            .ok_or_else(|| WalletClientError::Rpc("missing transaction hash in response".into()))?;
        parse_tx_hash(hash)
    }
}

fn parse_quantity(v: &Value) -> Result<U256, WalletClientError> {
    let s = v
        .as_str()
        .ok_or_else(|| WalletClientError::Rpc("expected a hex quantity".into()))?;
    U256::from_str_radix(s.trim_start_matches("0x"), 16)
        .map_err(|e| WalletClientError::Rpc(format!("invalid hex quantity '{}': {}", s, e)))
}

fn parse_tx_hash(s: &str) -> Result<H256, WalletClientError> {
    let raw = hex::decode(s.trim_start_matches("0x"))
        .map_err(|e| WalletClientError::Rpc(format!("invalid transaction hash '{}': {}", s, e)))?;
    if raw.len() != 32 {
        return Err(WalletClientError::Rpc(format!(
            "transaction hash '{}' is not 32 bytes",
            s
        )));
    }
    Ok(H256::from_slice(&raw))
}

/// EIP-137 namehash.
fn namehash(name: &str) -> [u8; 32] {
    let mut node = [0u8; 32];
    if name.is_empty() {
        return node;
    }
    for label in name.rsplit('.') {
        let label_hash = keccak256(label.as_bytes());
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(&node);
        buf[32..].copy_from_slice(&label_hash);
        node = keccak256(buf);
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namehash_matches_eip137_vectors() {
        assert_eq!(namehash(""), [0u8; 32]);
        assert_eq!(
            hex::encode(namehash("eth")),
            "93cdeb708b7545dc668eb9280176169d1c33cfd8ed6f04690a0bcc88a93fc4ae"
        );
        assert_eq!(
            hex::encode(namehash("foo.eth")),
            "de9b09fd7c5f901e23a3f19fecc54828e9c848539801e86591bd9801b019f84f"
        );
    }

    #[test]
    fn parse_quantity_reads_hex() {
        assert_eq!(parse_quantity(&json!("0x10")).unwrap(), U256::from(16u64));
        assert!(parse_quantity(&json!(16)).is_err());
    }

    #[test]
    fn parse_tx_hash_requires_32_bytes() {
        let h = "0x".to_string() + &"ab".repeat(32);
        assert!(parse_tx_hash(&h).is_ok());
        assert!(parse_tx_hash("0x1234").is_err());
    }
}
