// src/config.rs

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::env;

// A struct to hold all configuration, loaded once at startup from the .env file.
#[derive(Clone, Debug, Default)]
pub struct Config {
    // Server settings
    pub port: u16,

    /// RPC endpoints for EVM-compatible networks, keyed by chain id
    /// (1 Ethereum, 137 Polygon, 8453 Base, ...).
    pub chain_rpc_urls: HashMap<u64, String>,
    /// Chain the wallet client operates on.
    pub default_chain_id: u64,

    // Transaction settings
    pub tx_private_key: Option<String>,

    // Token registry
    /// JSON array of token descriptors overriding the built-in list.
    pub token_registry_json: Option<String>,
    /// Override for the ENS registry contract address.
    pub ens_registry_address: Option<String>,
}

impl Config {
    /// Returns a list of configured chain IDs
    pub fn supported_chains(&self) -> Vec<u64> {
        self.chain_rpc_urls.keys().copied().collect()
    }

    /// Checks if a chain ID is supported
    pub fn is_chain_supported(&self, chain_id: u64) -> bool {
        self.chain_rpc_urls.contains_key(&chain_id)
    }

    pub fn rpc_url_for(&self, chain_id: u64) -> Option<&str> {
        self.chain_rpc_urls.get(&chain_id).map(|s| s.as_str())
    }

    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load variables from the .env file into the environment
        dotenvy::dotenv().ok();

        let rpc_urls_str = env::var("CHAIN_RPC_URLS")
            .context("CHAIN_RPC_URLS must be set to a JSON map of chain_id -> RPC URL")?;
        let chain_rpc_urls: HashMap<u64, String> = serde_json::from_str(&rpc_urls_str)
            .context("Invalid CHAIN_RPC_URLS JSON format")?;

        // Default to Ethereum mainnet chain ID (1) if not specified
        let default_chain_id = env::var("DEFAULT_CHAIN_ID")
            .unwrap_or_else(|_| "1".to_string())
            .parse::<u64>()
            .context("DEFAULT_CHAIN_ID must be a valid number")?;

        Ok(Config {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,

            chain_rpc_urls,
            default_chain_id,

            tx_private_key: env::var("TX_PRIVATE_KEY").ok(),

            token_registry_json: env::var("TOKEN_REGISTRY").ok(),
            ens_registry_address: env::var("ENS_REGISTRY_ADDRESS").ok(),
        })
    }
}
