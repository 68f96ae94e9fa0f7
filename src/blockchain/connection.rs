//! Connection manager: network handle first, then the contract handle.

use alloy::primitives::Address;
use std::sync::Arc;
use std::time::Duration;

use crate::blockchain::client::{Network, RpcClient};
use crate::blockchain::contract::{parse_abi, ContractHandle};
use crate::blockchain::types::{NftError, NftResult};
use crate::config::AppConfig;

/// Holds the endpoint, contract address and ABI, and the handles built from them.
pub struct Connection {
    endpoint: String,
    rpc_timeout: Duration,
    expected_chain_id: Option<u64>,
    contract_address: String,
    contract_abi: String,
    network: Option<Arc<dyn Network>>,
    contract: Option<ContractHandle>,
}

impl Connection {
    pub fn new(
        endpoint: impl Into<String>,
        contract_address: impl Into<String>,
        contract_abi: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            rpc_timeout: Duration::from_secs(10),
            expected_chain_id: None,
            contract_address: contract_address.into(),
            contract_abi: contract_abi.into(),
            network: None,
            contract: None,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.network.chain_url.clone(),
            config.contract.address.clone(),
            config.contract.abi.clone().unwrap_or_default(),
        )
        .with_rpc_timeout(config.network.rpc_timeout())
        .with_chain_id(config.network.chain_id)
    }

    pub fn with_rpc_timeout(mut self, rpc_timeout: Duration) -> Self {
        self.rpc_timeout = rpc_timeout;
        self
    }

    /// Require the node to report this chain id.
    pub fn with_chain_id(mut self, chain_id: Option<u64>) -> Self {
        self.expected_chain_id = chain_id;
        self
    }

    /// Connect to the configured endpoint and check it answers.
    pub async fn connect_network(&mut self) -> NftResult<()> {
        let client = RpcClient::new(&self.endpoint, self.rpc_timeout)?;
        self.attach_network(Arc::new(client)).await
    }

    /// Check connectivity of an existing network handle and keep it.
    pub async fn attach_network(&mut self, network: Arc<dyn Network>) -> NftResult<()> {
        let chain_id = match network.chain_id().await {
            Ok(chain_id) => chain_id,
            Err(e) => {
                tracing::error!(endpoint = %network.endpoint(), error = %e, "Provider unreachable");
                return Err(e);
            }
        };

        if let Some(expected) = self.expected_chain_id {
            if expected != chain_id {
                return Err(NftError::ChainMismatch {
                    expected,
                    actual: chain_id,
                });
            }
        }

        tracing::info!(endpoint = %network.endpoint(), chain_id, "Provider connected");
        self.network = Some(network);
        self.contract = None;
        Ok(())
    }

    /// Build the contract handle on top of the network handle.
    ///
    /// Fails with [`NftError::NotConnected`] before [`connect_network`](Self::connect_network)
    /// has succeeded.
    pub fn connect_contract(&mut self) -> NftResult<()> {
        let network = self
            .network
            .clone()
            .ok_or(NftError::NotConnected("network"))?;

        let address: Address = self.contract_address.trim().parse().map_err(|e| {
            NftError::Contract(format!(
                "invalid contract address '{}': {}",
                self.contract_address, e
            ))
        })?;
        let abi = parse_abi(&self.contract_abi)
            .map_err(|e| NftError::Contract(format!("invalid contract ABI: {}", e)))?;

        tracing::info!(contract = %address, functions = abi.functions().count(), "Contract connected");
        self.contract = Some(ContractHandle::new(address, abi, network));
        Ok(())
    }

    pub fn network(&self) -> NftResult<&Arc<dyn Network>> {
        self.network.as_ref().ok_or(NftError::NotConnected("network"))
    }

    pub fn contract(&self) -> NftResult<&ContractHandle> {
        self.contract.as_ref().ok_or(NftError::NotConnected("contract"))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("endpoint", &self.endpoint)
            .field("contract_address", &self.contract_address)
            .field("network", &self.network.is_some())
            .field("contract", &self.contract.is_some())
            .finish()
    }
}
