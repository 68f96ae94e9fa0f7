//! Transaction building, signing, and receipt monitoring.
//!
//! # Responsibilities
//! - Build transactions from the caller's latest nonce
//! - Sign locally and broadcast the raw bytes
//! - Wait for the receipt with an explicit deadline

use alloy::eips::Encodable2718;
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, timeout};

use crate::blockchain::client::{MinedReceipt, Network};
use crate::blockchain::types::{NftError, NftResult, TxStage};
use crate::blockchain::wallet::Wallet;

/// Transaction builder for contract writes.
#[derive(Clone)]
pub struct TxBuilder {
    network: Arc<dyn Network>,
    wallet: Wallet,
}

impl TxBuilder {
    pub fn new(network: Arc<dyn Network>, wallet: Wallet) -> Self {
        Self { network, wallet }
    }

    /// Build an unsigned transaction request.
    ///
    /// The nonce is read first, at the latest block; gas price and gas limit
    /// are taken from the node as reported.
    pub async fn build(
        &self,
        to: Address,
        value: U256,
        data: Bytes,
    ) -> NftResult<TransactionRequest> {
        let from = self.wallet.address();
        let nonce = self.network.transaction_count(from).await?;
        let chain_id = self.network.chain_id().await?;
        let gas_price = self.network.gas_price().await?;

        let tx = TransactionRequest::default()
            .with_from(from)
            .with_to(to)
            .with_value(value)
            .with_input(data)
            .with_nonce(nonce)
            .with_chain_id(chain_id)
            .with_gas_price(gas_price);

        let gas_limit = self.network.estimate_gas(tx.clone()).await?;
        tracing::debug!(nonce, chain_id, gas_price, gas_limit, "Transaction built");

        Ok(tx.with_gas_limit(gas_limit))
    }

    /// Sign `request` and broadcast it.
    pub async fn sign_and_send(&self, request: TransactionRequest) -> NftResult<TxHash> {
        let envelope = self.wallet.sign_transaction(request).await?;
        let local_hash = *envelope.tx_hash();
        tracing::debug!(tx_hash = %local_hash, stage = %TxStage::Signed, "Transaction signed");

        let tx_hash = self
            .network
            .send_raw_transaction(&envelope.encoded_2718())
            .await?;
        if tx_hash != local_hash {
            tracing::warn!(
                local = %local_hash,
                remote = %tx_hash,
                "Node reported a different transaction hash"
            );
        }
        tracing::info!(tx_hash = %tx_hash, stage = %TxStage::Broadcast, "Transaction broadcast");

        Ok(tx_hash)
    }

    /// Wait for a transaction to be mined.
    ///
    /// # Arguments
    /// * `tx_hash` - Transaction hash to monitor
    /// * `deadline` - Maximum time to wait for the receipt
    /// * `poll_interval` - Delay between receipt queries
    pub async fn wait_for_receipt(
        &self,
        tx_hash: TxHash,
        deadline: Duration,
        poll_interval: Duration,
    ) -> NftResult<MinedReceipt> {
        let result = timeout(deadline, async {
            let mut ticker = interval(poll_interval);

            loop {
                ticker.tick().await;

                match self.network.transaction_receipt(tx_hash).await? {
                    Some(receipt) => return Ok(receipt),
                    None => tracing::debug!(tx_hash = %tx_hash, "Transaction pending"),
                }
            }
        })
        .await;

        match result {
            Ok(Ok(receipt)) => {
                let stage = if receipt.success {
                    TxStage::Mined
                } else {
                    TxStage::Failed
                };
                tracing::info!(
                    tx_hash = %tx_hash,
                    block_number = ?receipt.block_number,
                    stage = %stage,
                    "Receipt received"
                );
                if receipt.success {
                    Ok(receipt)
                } else {
                    Err(NftError::ReceiptReverted(tx_hash))
                }
            }
            Ok(Err(e)) => {
                tracing::warn!(tx_hash = %tx_hash, stage = %TxStage::Failed, error = %e, "Receipt query failed");
                Err(e)
            }
            Err(_) => {
                tracing::warn!(tx_hash = %tx_hash, stage = %TxStage::TimedOut, "Transaction not mined in time");
                Err(NftError::ConfirmationTimeout {
                    tx_hash,
                    timeout: deadline,
                })
            }
        }
    }

    /// Get the wallet address.
    pub fn address(&self) -> Address {
        self.wallet.address()
    }
}

impl std::fmt::Debug for TxBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxBuilder")
            .field("from", &self.wallet.address())
            .field("endpoint", &self.network.endpoint())
            .finish()
    }
}
