// src/wallet/mod.rs

pub mod evm;
pub use evm::EvmWalletClient;

use async_trait::async_trait;
use ethers_core::abi::Token;
use ethers_core::types::{Address, Bytes, H256};
use thiserror::Error;

/// The chain a wallet client is currently operating on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chain {
    pub id: u64,
}

/// A view call against a contract with a fixed function signature.
#[derive(Debug, Clone)]
pub struct ReadCall {
    pub address: Address,
    /// Canonical signature, e.g. `balanceOf(address,uint256)`
    pub function: &'static str,
    pub args: Vec<Token>,
}

/// A state-changing call against a contract with a fixed function signature.
#[derive(Debug, Clone)]
pub struct TransactionCall {
    pub to: Address,
    pub function: &'static str,
    pub args: Vec<Token>,
}

#[derive(Debug, Error)]
pub enum WalletClientError {
    #[error("could not resolve '{identifier}': {reason}")]
    Resolution { identifier: String, reason: String },
    #[error("rpc error: {0}")]
    Rpc(String),
    #[error("no signer configured; set TX_PRIVATE_KEY to enable write operations")]
    NoSigner,
    #[error("signing failed: {0}")]
    Signing(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl WalletClientError {
    pub fn resolution(identifier: &str, reason: impl Into<String>) -> Self {
        Self::Resolution {
            identifier: identifier.to_string(),
            reason: reason.into(),
        }
    }
}

/// Gateway to a chain account: address resolution plus generic contract
/// read/write execution. Implementations own key material and transport;
/// callers never see either.
#[async_trait]
pub trait WalletClient: Send + Sync {
    /// The chain this client is connected to.
    fn get_chain(&self) -> Chain;

    /// Resolve a 0x address or a human-readable name to a canonical address.
    async fn resolve_address(&self, identifier: &str) -> Result<Address, WalletClientError>;

    /// Execute a view call and return the raw ABI-encoded return data.
    async fn read(&self, call: ReadCall) -> Result<Bytes, WalletClientError>;

    /// Sign and broadcast a state-changing call, returning the transaction hash.
    async fn send_transaction(&self, call: TransactionCall) -> Result<H256, WalletClientError>;
}
