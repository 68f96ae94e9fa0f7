//! Startup orchestration.
//!
//! # Order
//! 1. Network handle (connectivity check)
//! 2. Contract handle, only once the network answered
//! 3. Caller wallet and contract wrapper
//!
//! Any failure is fatal; the caller reports it and exits non-zero.

use std::sync::Arc;
use thiserror::Error;

use crate::blockchain::client::Network;
use crate::blockchain::connection::Connection;
use crate::blockchain::types::NftError;
use crate::blockchain::wallet::Wallet;
use crate::config::AppConfig;
use crate::nft::{ContractSettings, NftContract};

/// Fatal startup failures.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("An error occurred! Check the connection with provider.")]
    Provider(#[source] NftError),

    #[error("An error occurred! Check the connection with smart contract.")]
    Contract(#[source] NftError),

    #[error("An error occurred! Check the account credentials.")]
    Account(#[source] NftError),
}

impl StartupError {
    /// The underlying error.
    pub fn cause(&self) -> &NftError {
        match self {
            StartupError::Provider(e) | StartupError::Contract(e) | StartupError::Account(e) => e,
        }
    }
}

/// Connect to the configured endpoint and build the contract wrapper.
pub async fn initialize(config: &AppConfig) -> Result<NftContract, StartupError> {
    let mut connection = Connection::from_config(config);
    connection
        .connect_network()
        .await
        .map_err(StartupError::Provider)?;
    finish(config, connection)
}

/// Like [`initialize`] over an already constructed network handle.
pub async fn initialize_with(
    config: &AppConfig,
    network: Arc<dyn Network>,
) -> Result<NftContract, StartupError> {
    let mut connection = Connection::from_config(config);
    connection
        .attach_network(network)
        .await
        .map_err(StartupError::Provider)?;
    finish(config, connection)
}

fn finish(config: &AppConfig, mut connection: Connection) -> Result<NftContract, StartupError> {
    connection
        .connect_contract()
        .map_err(StartupError::Contract)?;

    let wallet = Wallet::from_account(&config.account).map_err(StartupError::Account)?;
    let settings = ContractSettings::from_config(config).map_err(StartupError::Contract)?;
    let nft = NftContract::new(wallet, &connection, settings).map_err(StartupError::Contract)?;

    tracing::info!(
        endpoint = %connection.endpoint(),
        caller = %nft.caller(),
        "Startup complete"
    );
    Ok(nft)
}
