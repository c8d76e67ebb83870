// src/token/error.rs

use thiserror::Error;

/// Failure taxonomy for ERC1155 operations. Wallet-client failures are
/// rethrown as the variant matching the operation's path, with the
/// underlying error text embedded in the message.
#[derive(Debug, Error)]
pub enum Erc1155Error {
    #[error("no token registered with symbol '{0}'")]
    NotFound(String),

    #[error("token '{symbol}' has no contract address on chain {chain_id}")]
    UnsupportedChain { symbol: String, chain_id: u64 },

    #[error("query failed: {0}")]
    Query(String),

    #[error("transfer failed: {0}")]
    Transfer(String),

    #[error("approval failed: {0}")]
    Approval(String),
}
