// src/token/service.rs
//
// Translates high-level ERC1155 intents into wallet-client calls and
// reshapes the raw results. Every operation is a single round trip to the
// wallet client, or a small order-preserving fan-out for batch resolution.

use crate::abi;
use crate::token::error::Erc1155Error;
use crate::token::registry::{u256_dec, TokenRegistry};
use crate::wallet::{ReadCall, TransactionCall, WalletClient};
use ethers_core::abi::Token;
use ethers_core::types::{Address, Bytes, H256, U256};
use futures::future;
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;

const BALANCE_OF: &str = "balanceOf(address,uint256)";
const BALANCE_OF_BATCH: &str = "balanceOfBatch(address[],uint256[])";
const SAFE_TRANSFER_FROM: &str = "safeTransferFrom(address,address,uint256,uint256,bytes)";
const SAFE_BATCH_TRANSFER_FROM: &str = "safeBatchTransferFrom(address,address,uint256[],uint256[],bytes)";
const SET_APPROVAL_FOR_ALL: &str = "setApprovalForAll(address,bool)";
const IS_APPROVED_FOR_ALL: &str = "isApprovedForAll(address,address)";

/// Public descriptor fields plus the contract address resolved for the
/// wallet client's current chain.
#[derive(Debug, Clone, Serialize)]
pub struct TokenInfo {
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    pub uri: String,
    #[serde(with = "u256_dec")]
    pub total_supply: U256,
    #[serde(with = "u256_dec")]
    pub id: U256,
    pub contract_address: String,
}

pub struct Erc1155Service {
    registry: TokenRegistry,
    wallet: Arc<dyn WalletClient>,
}

impl Erc1155Service {
    pub fn new(registry: TokenRegistry, wallet: Arc<dyn WalletClient>) -> Self {
        Self { registry, wallet }
    }

    pub fn registry(&self) -> &TokenRegistry {
        &self.registry
    }

    /// Look up a token descriptor by symbol on the current chain.
    pub fn lookup_by_symbol(&self, symbol: &str) -> Result<TokenInfo, Erc1155Error> {
        let token = self
            .registry
            .find_by_symbol(symbol)
            .ok_or_else(|| Erc1155Error::NotFound(symbol.to_string()))?;
        let chain = self.wallet.get_chain();
        let contract = token.contracts.get(&chain.id).ok_or_else(|| {
            Erc1155Error::UnsupportedChain {
                symbol: token.symbol.clone(),
                chain_id: chain.id,
            }
        })?;
        Ok(TokenInfo {
            symbol: token.symbol.clone(),
            name: token.name.clone(),
            decimals: token.decimals,
            uri: token.uri.clone(),
            total_supply: token.total_supply,
            id: token.id,
            contract_address: contract.clone(),
        })
    }

    /// Balance of `owner` for token `id`.
    pub async fn balance_of(
        &self,
        token_address: &str,
        owner: &str,
        id: U256,
    ) -> Result<u128, Erc1155Error> {
        let contract = parse_contract(token_address).map_err(Erc1155Error::Query)?;
        let owner = self
            .wallet
            .resolve_address(owner)
            .await
            .map_err(|e| Erc1155Error::Query(format!("could not resolve owner: {}", e)))?;
        let raw = self
            .wallet
            .read(ReadCall {
                address: contract,
                function: BALANCE_OF,
                args: vec![Token::Address(owner), Token::Uint(id)],
            })
            .await
            .map_err(|e| Erc1155Error::Query(format!("balanceOf call failed: {}", e)))?;
        let value = abi::decode_uint(&raw)
            .map_err(|e| Erc1155Error::Query(format!("could not decode balanceOf return: {}", e)))?;
        to_u128(value).map_err(Erc1155Error::Query)
    }

    /// Balances for several (owner, id) pairs in one contract call. Owner
    /// resolution fans out concurrently; output order matches input order.
    pub async fn balance_of_batch(
        &self,
        token_address: &str,
        owners: &[String],
        ids: &[U256],
    ) -> Result<Vec<u128>, Erc1155Error> {
        if owners.len() != ids.len() {
            return Err(Erc1155Error::Query(format!(
                "owners and ids must have the same length ({} vs {})",
                owners.len(),
                ids.len()
            )));
        }
        let contract = parse_contract(token_address).map_err(Erc1155Error::Query)?;
        let resolved = future::try_join_all(owners.iter().map(|o| self.wallet.resolve_address(o)))
            .await
            .map_err(|e| Erc1155Error::Query(format!("could not resolve owner: {}", e)))?;
        let raw = self
            .wallet
            .read(ReadCall {
                address: contract,
                function: BALANCE_OF_BATCH,
                args: vec![
                    Token::Array(resolved.into_iter().map(Token::Address).collect()),
                    Token::Array(ids.iter().copied().map(Token::Uint).collect()),
                ],
            })
            .await
            .map_err(|e| Erc1155Error::Query(format!("balanceOfBatch call failed: {}", e)))?;
        let values = abi::decode_uint_array(&raw).map_err(|e| {
            Erc1155Error::Query(format!("could not decode balanceOfBatch return: {}", e))
        })?;
        values
            .into_iter()
            .map(|v| to_u128(v).map_err(Erc1155Error::Query))
            .collect()
    }

    /// Transfer `value` units of token `id` from `from` to `to`.
    pub async fn safe_transfer_from(
        &self,
        token_address: &str,
        from: &str,
        to: &str,
        id: U256,
        value: U256,
        data: Option<Bytes>,
    ) -> Result<H256, Erc1155Error> {
        let contract = parse_contract(token_address).map_err(Erc1155Error::Transfer)?;
        let from = self
            .wallet
            .resolve_address(from)
            .await
            .map_err(|e| Erc1155Error::Transfer(format!("could not resolve sender: {}", e)))?;
        let to = self
            .wallet
            .resolve_address(to)
            .await
            .map_err(|e| Erc1155Error::Transfer(format!("could not resolve recipient: {}", e)))?;
        self.wallet
            .send_transaction(TransactionCall {
                to: contract,
                function: SAFE_TRANSFER_FROM,
                args: vec![
                    Token::Address(from),
                    Token::Address(to),
                    Token::Uint(id),
                    Token::Uint(value),
                    Token::Bytes(data.unwrap_or_default().to_vec()),
                ],
            })
            .await
            .map_err(|e| Erc1155Error::Transfer(format!("safeTransferFrom call failed: {}", e)))
    }

    /// Batch transfer; `ids` and `values` are parallel arrays.
    pub async fn safe_batch_transfer_from(
        &self,
        token_address: &str,
        from: &str,
        to: &str,
        ids: &[U256],
        values: &[U256],
        data: Option<Bytes>,
    ) -> Result<H256, Erc1155Error> {
        if ids.len() != values.len() {
            return Err(Erc1155Error::Transfer(format!(
                "ids and values must have the same length ({} vs {})",
                ids.len(),
                values.len()
            )));
        }
        let contract = parse_contract(token_address).map_err(Erc1155Error::Transfer)?;
        let from = self
            .wallet
            .resolve_address(from)
            .await
            .map_err(|e| Erc1155Error::Transfer(format!("could not resolve sender: {}", e)))?;
        let to = self
            .wallet
            .resolve_address(to)
            .await
            .map_err(|e| Erc1155Error::Transfer(format!("could not resolve recipient: {}", e)))?;
        self.wallet
            .send_transaction(TransactionCall {
                to: contract,
                function: SAFE_BATCH_TRANSFER_FROM,
                args: vec![
                    Token::Address(from),
                    Token::Address(to),
                    Token::Array(ids.iter().copied().map(Token::Uint).collect()),
                    Token::Array(values.iter().copied().map(Token::Uint).collect()),
                    Token::Bytes(data.unwrap_or_default().to_vec()),
                ],
            })
            .await
            .map_err(|e| {
                Erc1155Error::Transfer(format!("safeBatchTransferFrom call failed: {}", e))
            })
    }

    /// Grant or revoke operator status for all of the caller's tokens.
    pub async fn set_approval_for_all(
        &self,
        token_address: &str,
        operator: &str,
        approved: bool,
    ) -> Result<H256, Erc1155Error> {
        let contract = parse_contract(token_address).map_err(Erc1155Error::Approval)?;
        let operator = self
            .wallet
            .resolve_address(operator)
            .await
            .map_err(|e| Erc1155Error::Approval(format!("could not resolve operator: {}", e)))?;
        self.wallet
            .send_transaction(TransactionCall {
                to: contract,
                function: SET_APPROVAL_FOR_ALL,
                args: vec![Token::Address(operator), Token::Bool(approved)],
            })
            .await
            .map_err(|e| Erc1155Error::Approval(format!("setApprovalForAll call failed: {}", e)))
    }

    /// Whether `operator` is approved for all of `owner`'s tokens.
    pub async fn is_approved_for_all(
        &self,
        token_address: &str,
        owner: &str,
        operator: &str,
    ) -> Result<bool, Erc1155Error> {
        let contract = parse_contract(token_address).map_err(Erc1155Error::Query)?;
        let owner = self
            .wallet
            .resolve_address(owner)
            .await
            .map_err(|e| Erc1155Error::Query(format!("could not resolve owner: {}", e)))?;
        let operator = self
            .wallet
            .resolve_address(operator)
            .await
            .map_err(|e| Erc1155Error::Query(format!("could not resolve operator: {}", e)))?;
        let raw = self
            .wallet
            .read(ReadCall {
                address: contract,
                function: IS_APPROVED_FOR_ALL,
                args: vec![Token::Address(owner), Token::Address(operator)],
            })
            .await
            .map_err(|e| Erc1155Error::Query(format!("isApprovedForAll call failed: {}", e)))?;
        abi::decode_bool(&raw).map_err(|e| {
            Erc1155Error::Query(format!("could not decode isApprovedForAll return: {}", e))
        })
    }
}

fn parse_contract(s: &str) -> Result<Address, String> {
    Address::from_str(s.trim()).map_err(|e| format!("invalid contract address '{}': {}", s, e))
}

fn to_u128(v: U256) -> Result<u128, String> {
    if v > U256::from(u128::MAX) {
        return Err(format!("value {} exceeds the u128 range", v));
    }
    Ok(v.as_u128())
}
