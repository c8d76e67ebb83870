// src/lib.rs

use std::sync::Arc;

// Re-export commonly used types
pub use ethers_core::types::{Address, H256, U256};

// Re-export modules
pub mod abi;
pub mod config;
pub mod mcp;
pub mod token;
pub mod utils;
pub mod wallet;

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: config::Config,
    /// ERC1155 operations over the token registry and wallet client
    pub service: Arc<token::Erc1155Service>,
}
