//! NFT operation types and argument parsing.

use alloy::dyn_abi::DynSolValue;
use alloy::hex;
use alloy::primitives::{Address, TxHash, U256};
use std::str::FromStr;
use std::time::Duration;

use crate::blockchain::contract::DecodedArgs;
use crate::blockchain::types::{NftError, NftResult};
use crate::config::AppConfig;

/// Contract function names and transaction timing used by [`NftContract`](super::NftContract).
#[derive(Debug, Clone)]
pub struct ContractSettings {
    pub mint_function: String,
    /// Event whose `mint_event_field` carries the minted token id.
    pub mint_event: String,
    pub mint_event_field: String,
    pub pay_function: String,
    /// Value attached to `pay_function`, in wei.
    pub price: U256,
    pub wait_for_receipt: bool,
    pub confirmation_timeout: Duration,
    pub poll_interval: Duration,
}

impl ContractSettings {
    pub fn from_config(config: &AppConfig) -> NftResult<Self> {
        let price = U256::from_str(config.contract.price_wei.trim()).map_err(|e| {
            NftError::Contract(format!(
                "invalid price '{}': {}",
                config.contract.price_wei, e
            ))
        })?;
        if config.network.poll_interval_ms == 0 {
            return Err(NftError::Contract(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        if config.network.confirmation_timeout_secs == 0 {
            return Err(NftError::Contract(
                "confirmation timeout must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            mint_function: config.contract.mint_function.clone(),
            mint_event: config.contract.mint_event.clone(),
            mint_event_field: config.contract.mint_event_field.clone(),
            pay_function: config.contract.pay_function.clone(),
            price,
            wait_for_receipt: config.network.wait_for_receipt,
            confirmation_timeout: config.network.confirmation_timeout(),
            poll_interval: config.network.poll_interval(),
        })
    }
}

/// Outcome of a successful mint.
#[derive(Debug, Clone, PartialEq)]
pub struct MintReceipt {
    /// Minted token id; `None` when the receipt was not awaited.
    pub token_id: Option<U256>,
    pub tx_hash: TxHash,
    /// Mint call arguments as recorded on chain.
    pub arguments: DecodedArgs,
}

impl MintReceipt {
    pub fn recipient(&self) -> Option<Address> {
        self.arguments.get("recipient").and_then(DynSolValue::as_address)
    }

    pub fn token_uri(&self) -> Option<&str> {
        self.arguments.get("tokenURI").and_then(DynSolValue::as_str)
    }
}

/// Outcome of a transfer or payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    /// `None` when the receipt was not awaited.
    pub block_number: Option<u64>,
}

/// Parse a user-supplied account address.
pub fn parse_address(input: &str) -> NftResult<Address> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(NftError::InvalidAddress {
            input: input.to_string(),
            reason: "empty address".to_string(),
        });
    }
    Address::from_str(trimmed).map_err(|e| NftError::InvalidAddress {
        input: input.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a user-supplied token id, decimal or `0x` hex.
pub fn parse_token_id(input: &str) -> NftResult<U256> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(NftError::InvalidTokenId {
            input: input.to_string(),
            reason: "empty token id".to_string(),
        });
    }
    U256::from_str(trimmed).map_err(|e| NftError::InvalidTokenId {
        input: input.to_string(),
        reason: e.to_string(),
    })
}

/// Human-readable rendering of a decoded ABI value.
pub fn render_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Address(address) => address.to_checksum(None),
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Int(i, _) => i.to_string(),
        DynSolValue::Uint(u, _) => u.to_string(),
        DynSolValue::String(s) => s.clone(),
        DynSolValue::Bytes(bytes) => hex::encode_prefixed(bytes),
        DynSolValue::FixedBytes(word, size) => hex::encode_prefixed(&word[..*size]),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) | DynSolValue::Tuple(items) => {
            let rendered: Vec<String> = items.iter().map(render_value).collect();
            format!("[{}]", rendered.join(", "))
        }
        other => format!("{:?}", other),
    }
}
