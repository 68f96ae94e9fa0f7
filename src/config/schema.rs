//! Configuration schema definitions.
//!
//! Non-secret sections derive Serde traits for deserialization from a TOML
//! file. Account credentials are filled from the environment only.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the console.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Endpoint and timing settings.
    pub network: NetworkConfig,

    /// Deployed contract and the functions/events used on it.
    pub contract: ContractConfig,

    /// Caller credentials. Never read from or written to files.
    #[serde(skip)]
    pub account: AccountConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Network configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// JSON-RPC endpoint URL.
    pub chain_url: String,

    /// Expected chain ID; unchecked when absent.
    pub chain_id: Option<u64>,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Maximum time to wait for a transaction to be mined.
    pub confirmation_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub poll_interval_ms: u64,

    /// Wait for the mint receipt and report the token id.
    pub wait_for_receipt: bool,
}

impl NetworkConfig {
    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }

    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            chain_url: String::new(),
            chain_id: None,
            rpc_timeout_secs: 10,
            confirmation_timeout_secs: 120,
            poll_interval_ms: 1000,
            wait_for_receipt: true,
        }
    }
}

/// Contract configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Deployed contract address.
    pub address: String,

    /// ABI JSON (bare array or compiler artifact).
    pub abi: Option<String>,

    /// File to read the ABI from when `abi` is not set.
    pub abi_path: Option<String>,

    pub mint_function: String,

    /// Event carrying the minted token id.
    pub mint_event: String,

    pub mint_event_field: String,

    pub pay_function: String,

    /// Fixed price attached to `pay_function`, in wei.
    pub price_wei: String,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            abi: None,
            abi_path: None,
            mint_function: "mintNFT".to_string(),
            mint_event: "Transfer".to_string(),
            mint_event_field: "tokenId".to_string(),
            pay_function: "payNft".to_string(),
            price_wei: "10000000000000000".to_string(), // 0.01 ether
        }
    }
}

/// Caller credentials.
#[derive(Debug, Clone)]
pub struct AccountConfig {
    /// Caller address.
    pub public_key: String,

    /// Hex private key.
    pub private_key: SecretString,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            public_key: String::new(),
            private_key: SecretString::new(String::new()),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}
