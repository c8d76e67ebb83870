// src/token/registry.rs
//
// Static multi-chain ERC1155 token registry. Populated once at startup and
// never mutated afterwards; lookup is a linear scan over a small list.

use ethers_core::types::U256;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Serde adapter: U256 as a decimal string, the form token lists are
/// written in.
pub(crate) mod u256_dec {
    use ethers_core::types::U256;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &U256, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&v.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<U256, D::Error> {
        let s = String::deserialize(d)?;
        U256::from_dec_str(s.trim()).map_err(serde::de::Error::custom)
    }
}

/// Static record describing one ERC1155 token: its identity, metadata, and
/// the contract address it lives at on each supported chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenDescriptor {
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    pub uri: String,
    #[serde(with = "u256_dec")]
    pub total_supply: U256,
    /// Token id within the contract; a single ERC1155 contract manages many ids.
    #[serde(with = "u256_dec")]
    pub id: U256,
    /// chain id -> 0x contract address
    pub contracts: HashMap<u64, String>,
}

#[derive(Debug, Clone, Default)]
pub struct TokenRegistry {
    tokens: Vec<TokenDescriptor>,
}

impl TokenRegistry {
    pub fn new(tokens: Vec<TokenDescriptor>) -> Self {
        Self { tokens }
    }

    /// Parse a registry from a JSON array of descriptors (the shape the
    /// TOKEN_REGISTRY env var carries).
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let tokens: Vec<TokenDescriptor> = serde_json::from_str(json)?;
        Ok(Self::new(tokens))
    }

    /// Registry pre-loaded with a couple of well-known ERC1155 collections.
    pub fn with_defaults() -> Self {
        Self::new(vec![
            TokenDescriptor {
                symbol: "OPENSTORE".to_string(),
                name: "OpenSea Shared Storefront".to_string(),
                decimals: 0,
                uri: "https://api.opensea.io/api/v2/metadata/{id}".to_string(),
                total_supply: U256::zero(),
                id: U256::one(),
                contracts: [
                    (1u64, "0x495f947276749Ce646f68AC8c248420045cb7b5e".to_string()),
                    (137u64, "0x2953399124F0cBB46d2CbACD8A89cF0599974963".to_string()),
                ]
                .into_iter()
                .collect(),
            },
            TokenDescriptor {
                symbol: "ASSET".to_string(),
                name: "Sandbox's ASSETs".to_string(),
                decimals: 0,
                uri: "ipfs://bafybei{id}".to_string(),
                total_supply: U256::zero(),
                id: U256::one(),
                contracts: [(1u64, "0xa342f5D851E866E18ff98F351f2c6637f4478dB5".to_string())]
                    .into_iter()
                    .collect(),
            },
        ])
    }

    /// Case-insensitive exact match over the list.
    pub fn find_by_symbol(&self, symbol: &str) -> Option<&TokenDescriptor> {
        self.tokens.iter().find(|t| t.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.symbol.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gold() -> TokenDescriptor {
        TokenDescriptor {
            symbol: "GOLD".to_string(),
            name: "Gold Bar".to_string(),
            decimals: 0,
            uri: "https://example.com/gold.json".to_string(),
            total_supply: U256::from(1_000u64),
            id: U256::one(),
            contracts: [(1u64, "0xAAA0000000000000000000000000000000000aaa".to_string())]
                .into_iter()
                .collect(),
        }
    }

    #[test]
    fn find_is_case_insensitive() {
        let registry = TokenRegistry::new(vec![gold()]);
        assert!(registry.find_by_symbol("GOLD").is_some());
        assert!(registry.find_by_symbol("gold").is_some());
        assert!(registry.find_by_symbol("GoLd").is_some());
    }

    #[test]
    fn find_unknown_symbol_is_none() {
        let registry = TokenRegistry::new(vec![gold()]);
        assert!(registry.find_by_symbol("SILVER").is_none());
    }

    #[test]
    fn defaults_are_loaded() {
        let registry = TokenRegistry::with_defaults();
        assert!(!registry.is_empty());
        assert!(registry.find_by_symbol("openstore").is_some());
    }

    #[test]
    fn json_round_trip() {
        let json = serde_json::to_string(&vec![gold()]).unwrap();
        let registry = TokenRegistry::from_json(&json).unwrap();
        assert_eq!(registry.len(), 1);
        let token = registry.find_by_symbol("gold").unwrap();
        assert_eq!(token.total_supply, U256::from(1_000u64));
        assert_eq!(token.id, U256::one());
    }

    #[test]
    fn descriptor_parses_decimal_strings() {
        let json = r#"[{
            "symbol": "GEM",
            "name": "Gem",
            "decimals": 0,
            "uri": "ipfs://gem",
            "total_supply": "5000",
            "id": "42",
            "contracts": {"137": "0xBBB0000000000000000000000000000000000bbb"}
        }]"#;
        let registry = TokenRegistry::from_json(json).unwrap();
        let token = registry.find_by_symbol("GEM").unwrap();
        assert_eq!(token.id, U256::from(42u64));
        assert_eq!(token.contracts.get(&137).unwrap(), "0xBBB0000000000000000000000000000000000bbb");
    }
}
