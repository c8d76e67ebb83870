// src/abi.rs
//
// Minimal ABI plumbing for fixed-signature contract calls. Calldata is built
// from a canonical signature string plus pre-typed tokens; return data is
// decoded against the single output type each signature has.

use anyhow::{anyhow, Result};
use ethers_core::abi::{decode, encode, ParamType, Token};
use ethers_core::types::{Address, Bytes, U256};
use ethers_core::utils::keccak256;

pub fn selector(sig: &str) -> [u8; 4] {
    let mut sel = [0u8; 4];
    sel.copy_from_slice(&keccak256(sig.as_bytes())[0..4]);
    sel
}

pub fn encode_call(sig: &str, tokens: &[Token]) -> Bytes {
    let mut out = selector(sig).to_vec();
    let mut tail = encode(tokens);
    out.append(&mut tail);
    Bytes::from(out)
}

pub fn decode_uint(data: &[u8]) -> Result<U256> {
    let tokens = decode(&[ParamType::Uint(256)], data)?;
    match tokens.into_iter().next() {
        Some(Token::Uint(n)) => Ok(n),
        _ => Err(anyhow!("expected a uint256 return value")),
    }
}

pub fn decode_uint_array(data: &[u8]) -> Result<Vec<U256>> {
    let tokens = decode(&[ParamType::Array(Box::new(ParamType::Uint(256)))], data)?;
    match tokens.into_iter().next() {
        Some(Token::Array(items)) => items
            .into_iter()
            .map(|t| match t {
                Token::Uint(n) => Ok(n),
                other => Err(anyhow!("expected uint256 array element, got {:?}", other)),
            })
            .collect(),
        _ => Err(anyhow!("expected a uint256[] return value")),
    }
}

pub fn decode_bool(data: &[u8]) -> Result<bool> {
    let tokens = decode(&[ParamType::Bool], data)?;
    match tokens.into_iter().next() {
        Some(Token::Bool(b)) => Ok(b),
        _ => Err(anyhow!("expected a bool return value")),
    }
}

pub fn decode_address(data: &[u8]) -> Result<Address> {
    let tokens = decode(&[ParamType::Address], data)?;
    match tokens.into_iter().next() {
        Some(Token::Address(a)) => Ok(a),
        _ => Err(anyhow!("expected an address return value")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn erc1155_selectors_match_the_standard() {
        assert_eq!(selector("balanceOf(address,uint256)"), [0x00, 0xfd, 0xd5, 0x8e]);
        assert_eq!(selector("balanceOfBatch(address[],uint256[])"), [0x4e, 0x12, 0x73, 0xf4]);
        assert_eq!(
            selector("safeTransferFrom(address,address,uint256,uint256,bytes)"),
            [0xf2, 0x42, 0x43, 0x2a]
        );
        assert_eq!(
            selector("safeBatchTransferFrom(address,address,uint256[],uint256[],bytes)"),
            [0x2e, 0xb2, 0xc2, 0xd6]
        );
        assert_eq!(selector("setApprovalForAll(address,bool)"), [0xa2, 0x2c, 0xb4, 0x65]);
        assert_eq!(selector("isApprovedForAll(address,address)"), [0xe9, 0x85, 0xe9, 0xc5]);
    }

    #[test]
    fn encode_call_prefixes_selector() {
        let data = encode_call("balanceOf(address,uint256)", &[
            Token::Address(Address::zero()),
            Token::Uint(U256::from(7u64)),
        ]);
        assert_eq!(&data[0..4], &[0x00, 0xfd, 0xd5, 0x8e]);
        // two static words follow the selector
        assert_eq!(data.len(), 4 + 64);
    }

    #[test]
    fn decode_uint_reads_a_single_word() {
        let data = encode(&[Token::Uint(U256::from(5u64))]);
        assert_eq!(decode_uint(&data).unwrap(), U256::from(5u64));
    }

    #[test]
    fn decode_uint_array_preserves_order() {
        let data = encode(&[Token::Array(vec![
            Token::Uint(U256::from(1u64)),
            Token::Uint(U256::from(2u64)),
            Token::Uint(U256::from(3u64)),
        ])]);
        let values = decode_uint_array(&data).unwrap();
        assert_eq!(values, vec![U256::from(1u64), U256::from(2u64), U256::from(3u64)]);
    }

    #[test]
    fn decode_bool_rejects_garbage() {
        assert!(decode_bool(&[0xde, 0xad]).is_err());
    }
}
