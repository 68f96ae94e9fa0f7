//! JSON-RPC network handle with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the configured JSON-RPC endpoint
//! - Query chain state (chain id, nonce, gas price, receipts)
//! - Execute read-only calls and broadcast signed transactions
//! - Classify transport failures and reverts

use alloy::consensus::Transaction as _;
use alloy::eips::BlockId;
use alloy::primitives::{Address, Bytes, Log, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::transports::{RpcError, TransportErrorKind, TransportResult};
use async_trait::async_trait;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::types::{NftError, NftResult};

/// The parts of a mined receipt the contract wrapper needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinedReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    /// `false` when the transaction reverted.
    pub success: bool,
    pub logs: Vec<Log>,
}

/// Network operations used by the connection manager and the contract wrapper.
#[async_trait]
pub trait Network: Send + Sync {
    /// Endpoint this handle is bound to.
    fn endpoint(&self) -> &str;

    async fn chain_id(&self) -> NftResult<u64>;

    /// Transaction count of `address` at the latest block.
    async fn transaction_count(&self, address: Address) -> NftResult<u64>;

    async fn gas_price(&self) -> NftResult<u128>;

    async fn estimate_gas(&self, tx: TransactionRequest) -> NftResult<u64>;

    /// Execute a read-only `eth_call` and return the raw output.
    async fn call(&self, tx: TransactionRequest) -> NftResult<Bytes>;

    async fn send_raw_transaction(&self, raw: &[u8]) -> NftResult<TxHash>;

    /// `None` while the transaction is still pending.
    async fn transaction_receipt(&self, tx_hash: TxHash) -> NftResult<Option<MinedReceipt>>;

    /// Call data of a known transaction.
    async fn transaction_input(&self, tx_hash: TxHash) -> NftResult<Option<Bytes>>;
}

/// HTTP JSON-RPC implementation of [`Network`].
#[derive(Clone)]
pub struct RpcClient {
    provider: Arc<dyn Provider + Send + Sync>,
    endpoint: String,
    timeout_duration: Duration,
}

impl RpcClient {
    /// Create a client for `endpoint`.
    ///
    /// No request is made here; connectivity is checked by the connection
    /// manager.
    pub fn new(endpoint: &str, rpc_timeout: Duration) -> NftResult<Self> {
        let url: url::Url = endpoint
            .parse()
            .map_err(|e| NftError::Rpc(format!("Invalid RPC URL '{}': {}", endpoint, e)))?;
        let provider =
            Arc::new(ProviderBuilder::new().connect_http(url)) as Arc<dyn Provider + Send + Sync>;

        Ok(Self {
            provider,
            endpoint: endpoint.to_string(),
            timeout_duration: rpc_timeout,
        })
    }

    async fn bounded<F, T>(&self, method: &'static str, fut: F) -> NftResult<T>
    where
        F: IntoFuture<Output = TransportResult<T>>,
        F::IntoFuture: Send,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                tracing::warn!(method, error = %e, "RPC error");
                Err(classify_rpc_error(e))
            }
            Err(_) => {
                tracing::warn!(method, "RPC timeout");
                Err(NftError::Timeout(self.timeout_duration.as_secs()))
            }
        }
    }
}

#[async_trait]
impl Network for RpcClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn chain_id(&self) -> NftResult<u64> {
        self.bounded("eth_chainId", self.provider.get_chain_id()).await
    }

    async fn transaction_count(&self, address: Address) -> NftResult<u64> {
        let fut = self
            .provider
            .get_transaction_count(address)
            .block_id(BlockId::latest());
        self.bounded("eth_getTransactionCount", fut).await
    }

    async fn gas_price(&self) -> NftResult<u128> {
        self.bounded("eth_gasPrice", self.provider.get_gas_price()).await
    }

    async fn estimate_gas(&self, tx: TransactionRequest) -> NftResult<u64> {
        self.bounded("eth_estimateGas", self.provider.estimate_gas(tx)).await
    }

    async fn call(&self, tx: TransactionRequest) -> NftResult<Bytes> {
        self.bounded("eth_call", self.provider.call(tx)).await
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> NftResult<TxHash> {
        let pending = self
            .bounded("eth_sendRawTransaction", self.provider.send_raw_transaction(raw))
            .await?;
        Ok(*pending.tx_hash())
    }

    async fn transaction_receipt(&self, tx_hash: TxHash) -> NftResult<Option<MinedReceipt>> {
        let receipt = self
            .bounded(
                "eth_getTransactionReceipt",
                self.provider.get_transaction_receipt(tx_hash),
            )
            .await?;

        Ok(receipt.map(|receipt| MinedReceipt {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            success: receipt.status(),
            logs: receipt.inner.logs().iter().map(|log| log.inner.clone()).collect(),
        }))
    }

    async fn transaction_input(&self, tx_hash: TxHash) -> NftResult<Option<Bytes>> {
        let tx = self
            .bounded(
                "eth_getTransactionByHash",
                self.provider.get_transaction_by_hash(tx_hash),
            )
            .await?;
        Ok(tx.map(|tx| tx.input().clone()))
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout_duration)
            .finish()
    }
}

/// Map a transport error to a revert when the node reports one.
fn classify_rpc_error(err: RpcError<TransportErrorKind>) -> NftError {
    if let Some(payload) = err.as_error_resp() {
        // Geth and Anvil report reverts with code 3.
        if payload.code == 3 || payload.message.to_lowercase().contains("revert") {
            return NftError::Reverted(payload.message.to_string());
        }
    }
    NftError::Rpc(err.to_string())
}
