//! Caller credentials and local transaction signing.
//!
//! # Security
//! - The private key comes only from the environment
//! - Keys are never logged or serialized
//! - Only signed raw transactions leave the process

use alloy::consensus::TxEnvelope;
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::Address;
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use secrecy::ExposeSecret;

use crate::blockchain::types::{NftError, NftResult};
use crate::config::schema::AccountConfig;

/// Parse a hex private key, with or without `0x` prefix.
pub fn parse_private_key(private_key_hex: &str) -> NftResult<PrivateKeySigner> {
    let key_hex = private_key_hex
        .trim()
        .strip_prefix("0x")
        .unwrap_or(private_key_hex.trim());

    key_hex
        .parse()
        .map_err(|e| NftError::Wallet(format!("Invalid private key format: {}", e)))
}

/// Signing wallet for the caller's account.
#[derive(Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
    wallet: EthereumWallet,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    pub fn from_private_key(private_key_hex: &str) -> NftResult<Self> {
        let signer = parse_private_key(private_key_hex)?;
        tracing::info!(address = %signer.address(), "Wallet initialized");

        Ok(Self {
            wallet: EthereumWallet::from(signer.clone()),
            signer,
        })
    }

    /// Build the wallet from account configuration.
    ///
    /// The configured public key must be the address of the private key.
    pub fn from_account(account: &AccountConfig) -> NftResult<Self> {
        let public: Address = account.public_key.trim().parse().map_err(|e| {
            NftError::Wallet(format!("Invalid public key '{}': {}", account.public_key, e))
        })?;
        let wallet = Self::from_private_key(account.private_key.expose_secret())?;
        if wallet.address() != public {
            return Err(NftError::Wallet(format!(
                "Public key {} does not belong to the configured private key",
                public
            )));
        }
        Ok(wallet)
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Sign a fully populated transaction request.
    pub async fn sign_transaction(&self, request: TransactionRequest) -> NftResult<TxEnvelope> {
        request
            .build(&self.wallet)
            .await
            .map_err(|e| NftError::Wallet(format!("Signing failed: {}", e)))
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address())
            .finish()
    }
}
