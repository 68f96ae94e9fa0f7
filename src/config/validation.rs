//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check required values are present
//! - Check the ABI declares the functions and events the console uses
//! - Check the public key belongs to the private key
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use alloy::primitives::{Address, U256};
use secrecy::ExposeSecret;
use std::str::FromStr;
use thiserror::Error;

use crate::blockchain::contract::parse_abi;
use crate::blockchain::wallet::parse_private_key;
use crate::config::loader::{
    ENV_CHAIN_URL, ENV_CONTRACT_ABI, ENV_CONTRACT_ADDRESS, ENV_PRIVATE_KEY, ENV_PUBLIC_KEY,
};
use crate::config::schema::AppConfig;

/// A single configuration problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{key} has invalid value '{value}'")]
    InvalidValue { key: &'static str, value: String },

    #[error("{key} '{value}' is not a valid URL: {reason}")]
    InvalidUrl {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("{key} '{value}' is not a valid address")]
    InvalidAddress { key: &'static str, value: String },

    #[error("CONTRACT_ABI_PATH '{path}' could not be read: {reason}")]
    UnreadableAbi { path: String, reason: String },

    #[error("{key} could not be parsed: {reason}")]
    InvalidAbi { key: &'static str, reason: String },

    #[error("contract ABI has no function '{0}'")]
    MissingFunction(String),

    #[error("contract ABI has no event '{0}'")]
    MissingEvent(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("{0} is not a valid private key")]
    InvalidPrivateKey(&'static str),

    #[error("PUBLIC_KEY {public} does not match the address {derived} of PRIVATE_KEY")]
    KeyMismatch { public: String, derived: String },
}

/// Validate a fully loaded configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_network(config, &mut errors);
    validate_contract(config, &mut errors);
    validate_account(config, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_network(config: &AppConfig, errors: &mut Vec<ValidationError>) {
    let network = &config.network;

    if network.chain_url.trim().is_empty() {
        errors.push(ValidationError::Missing(ENV_CHAIN_URL));
    } else {
        match url::Url::parse(network.chain_url.trim()) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(ValidationError::InvalidUrl {
                key: ENV_CHAIN_URL,
                value: network.chain_url.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            }),
            Err(e) => errors.push(ValidationError::InvalidUrl {
                key: ENV_CHAIN_URL,
                value: network.chain_url.clone(),
                reason: e.to_string(),
            }),
        }
    }

    if network.rpc_timeout_secs == 0 {
        errors.push(ValidationError::Zero("rpc_timeout_secs"));
    }
    if network.confirmation_timeout_secs == 0 {
        errors.push(ValidationError::Zero("confirmation_timeout_secs"));
    }
    if network.poll_interval_ms == 0 {
        errors.push(ValidationError::Zero("poll_interval_ms"));
    }
}

fn validate_contract(config: &AppConfig, errors: &mut Vec<ValidationError>) {
    let contract = &config.contract;

    if contract.address.trim().is_empty() {
        errors.push(ValidationError::Missing(ENV_CONTRACT_ADDRESS));
    } else if Address::from_str(contract.address.trim()).is_err() {
        errors.push(ValidationError::InvalidAddress {
            key: ENV_CONTRACT_ADDRESS,
            value: contract.address.clone(),
        });
    }

    if U256::from_str(contract.price_wei.trim()).is_err() {
        errors.push(ValidationError::InvalidValue {
            key: "price_wei",
            value: contract.price_wei.clone(),
        });
    }

    // An unreadable abi_path is reported by the loader.
    let Some(abi_json) = contract.abi.as_deref() else {
        if contract.abi_path.is_none() {
            errors.push(ValidationError::Missing(ENV_CONTRACT_ABI));
        }
        return;
    };
    let abi = match parse_abi(abi_json) {
        Ok(abi) => abi,
        Err(e) => {
            errors.push(ValidationError::InvalidAbi {
                key: ENV_CONTRACT_ABI,
                reason: e.to_string(),
            });
            return;
        }
    };

    if abi.function(&contract.mint_function).is_none() {
        errors.push(ValidationError::MissingFunction(contract.mint_function.clone()));
    }
    if config.network.wait_for_receipt && abi.event(&contract.mint_event).is_none() {
        errors.push(ValidationError::MissingEvent(contract.mint_event.clone()));
    }
}

fn validate_account(config: &AppConfig, errors: &mut Vec<ValidationError>) {
    let account = &config.account;

    let public = if account.public_key.trim().is_empty() {
        errors.push(ValidationError::Missing(ENV_PUBLIC_KEY));
        None
    } else {
        match Address::from_str(account.public_key.trim()) {
            Ok(address) => Some(address),
            Err(_) => {
                errors.push(ValidationError::InvalidAddress {
                    key: ENV_PUBLIC_KEY,
                    value: account.public_key.clone(),
                });
                None
            }
        }
    };

    let private_key = account.private_key.expose_secret();
    let derived = if private_key.trim().is_empty() {
        errors.push(ValidationError::Missing(ENV_PRIVATE_KEY));
        None
    } else {
        match parse_private_key(private_key) {
            Ok(signer) => Some(signer.address()),
            Err(_) => {
                errors.push(ValidationError::InvalidPrivateKey(ENV_PRIVATE_KEY));
                None
            }
        }
    };

    if let (Some(public), Some(derived)) = (public, derived) {
        if public != derived {
            errors.push(ValidationError::KeyMismatch {
                public: public.to_string(),
                derived: derived.to_string(),
            });
        }
    }
}
