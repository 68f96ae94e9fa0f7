//! NFT contract wrapper: one method per supported contract operation.
//!
//! # Mint flow
//! ```text
//! nonce (latest) → build → sign → broadcast → receipt (deadline) → tx input
//!        NotSubmitted    Signed   Broadcast   Mined | TimedOut | Failed
//! ```
//!
//! Every failure surfaces as an [`NftError`]; a partial result is never
//! returned.

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, Bytes, TxHash, U256};

use crate::blockchain::client::MinedReceipt;
use crate::blockchain::connection::Connection;
use crate::blockchain::contract::ContractHandle;
use crate::blockchain::transaction::TxBuilder;
use crate::blockchain::types::{NftError, NftResult, TxStage};
use crate::blockchain::wallet::Wallet;
use crate::nft::types::{
    parse_address, parse_token_id, ContractSettings, MintReceipt, TxReceipt,
};

const TRANSFER_FUNCTION: &str = "transferFrom";

/// Caller-bound view of the deployed NFT contract.
#[derive(Debug, Clone)]
pub struct NftContract {
    contract: ContractHandle,
    tx: TxBuilder,
    settings: ContractSettings,
}

impl NftContract {
    /// Bind `wallet` to the contract handle of an established connection.
    pub fn new(
        wallet: Wallet,
        connection: &Connection,
        settings: ContractSettings,
    ) -> NftResult<Self> {
        let contract = connection.contract()?.clone();
        let tx = TxBuilder::new(contract.network().clone(), wallet);
        Ok(Self {
            contract,
            tx,
            settings,
        })
    }

    /// The caller's address.
    pub fn caller(&self) -> Address {
        self.tx.address()
    }

    pub async fn name(&self) -> NftResult<String> {
        let value = self.read("name", &[]).await?;
        expect_string("name", value)
    }

    pub async fn symbol(&self) -> NftResult<String> {
        let value = self.read("symbol", &[]).await?;
        expect_string("symbol", value)
    }

    /// Contract owner.
    pub async fn owner(&self) -> NftResult<Address> {
        let value = self.read("owner", &[]).await?;
        expect_address("owner", value)
    }

    /// Number of tokens held by `account`.
    pub async fn balance_of(&self, account: &str) -> NftResult<U256> {
        let account = parse_address(account)?;
        let value = self
            .read("balanceOf", &[DynSolValue::Address(account)])
            .await?;
        expect_uint("balanceOf", value)
    }

    /// Owner of `token_id`.
    pub async fn owner_of(&self, token_id: &str) -> NftResult<Address> {
        let token_id = parse_token_id(token_id)?;
        let value = self.read_token("ownerOf", token_id).await?;
        expect_address("ownerOf", value)
    }

    /// Metadata URI of `token_id`.
    pub async fn token_uri(&self, token_id: &str) -> NftResult<String> {
        let token_id = parse_token_id(token_id)?;
        let value = self.read_token("tokenURI", token_id).await?;
        expect_string("tokenURI", value)
    }

    /// Mint a token for the caller with metadata at `token_uri`.
    pub async fn mint_nft(&self, token_uri: &str) -> NftResult<MintReceipt> {
        if token_uri.trim().is_empty() {
            return Err(NftError::EmptyTokenUri);
        }
        let function = self.settings.mint_function.as_str();
        let data = self.contract.encode_call(
            function,
            &[
                DynSolValue::Address(self.caller()),
                DynSolValue::String(token_uri.to_string()),
            ],
        )?;

        tracing::info!(function, token_uri, stage = %TxStage::NotSubmitted, "Minting");
        let (tx_hash, receipt) = self.submit(data, U256::ZERO).await?;

        let token_id = match receipt {
            Some(receipt) => {
                let value = self.contract.require_event_field(
                    &self.settings.mint_event,
                    &self.settings.mint_event_field,
                    &receipt.logs,
                    tx_hash,
                )?;
                Some(expect_uint(&self.settings.mint_event_field, value)?)
            }
            None => None,
        };

        let input = self
            .contract
            .network()
            .transaction_input(tx_hash)
            .await?
            .ok_or(NftError::TransactionNotFound(tx_hash))?;
        let arguments = self.contract.decode_input(function, &input)?;

        tracing::info!(tx_hash = %tx_hash, token_id = ?token_id, "Mint complete");
        Ok(MintReceipt {
            token_id,
            tx_hash,
            arguments,
        })
    }

    /// Transfer `token_id` from the caller to `to`.
    pub async fn transfer(&self, to: &str, token_id: &str) -> NftResult<TxReceipt> {
        let to = parse_address(to)?;
        let token_id = parse_token_id(token_id)?;
        let data = self.contract.encode_call(
            TRANSFER_FUNCTION,
            &[
                DynSolValue::Address(self.caller()),
                DynSolValue::Address(to),
                DynSolValue::Uint(token_id, 256),
            ],
        )?;

        tracing::info!(to = %to, token_id = %token_id, "Transferring");
        let (tx_hash, receipt) = self.submit(data, U256::ZERO).await?;
        Ok(TxReceipt {
            tx_hash,
            block_number: receipt.and_then(|r| r.block_number),
        })
    }

    /// Pay the fixed price to the pay function on behalf of `recipient`.
    pub async fn pay(&self, recipient: &str) -> NftResult<TxReceipt> {
        let recipient = parse_address(recipient)?;
        let data = self.contract.encode_call(
            &self.settings.pay_function,
            &[DynSolValue::Address(recipient)],
        )?;

        tracing::info!(recipient = %recipient, value = %self.settings.price, "Paying");
        let (tx_hash, receipt) = self.submit(data, self.settings.price).await?;
        Ok(TxReceipt {
            tx_hash,
            block_number: receipt.and_then(|r| r.block_number),
        })
    }

    async fn read(&self, function: &str, args: &[DynSolValue]) -> NftResult<DynSolValue> {
        let outputs = self.contract.call(function, args, self.caller()).await?;
        outputs
            .into_iter()
            .next()
            .ok_or_else(|| NftError::Abi(format!("{} returned no value", function)))
    }

    /// Token-id reads revert for tokens that were never minted.
    async fn read_token(&self, function: &str, token_id: U256) -> NftResult<DynSolValue> {
        match self.read(function, &[DynSolValue::Uint(token_id, 256)]).await {
            Err(NftError::Reverted(reason)) => {
                tracing::debug!(function, token_id = %token_id, reason = %reason, "Token lookup reverted");
                Err(NftError::NonexistentToken { token_id, reason })
            }
            other => other,
        }
    }

    /// Build, sign and broadcast a call to the contract; wait for the
    /// receipt when configured to.
    async fn submit(
        &self,
        data: Bytes,
        value: U256,
    ) -> NftResult<(TxHash, Option<MinedReceipt>)> {
        let request = self.tx.build(self.contract.address(), value, data).await?;
        let tx_hash = self.tx.sign_and_send(request).await?;

        if !self.settings.wait_for_receipt {
            return Ok((tx_hash, None));
        }
        let receipt = self
            .tx
            .wait_for_receipt(
                tx_hash,
                self.settings.confirmation_timeout,
                self.settings.poll_interval,
            )
            .await?;
        Ok((tx_hash, Some(receipt)))
    }
}

fn expect_string(function: &str, value: DynSolValue) -> NftResult<String> {
    match value {
        DynSolValue::String(s) => Ok(s),
        other => Err(unexpected(function, "string", &other)),
    }
}

fn expect_address(function: &str, value: DynSolValue) -> NftResult<Address> {
    value
        .as_address()
        .ok_or_else(|| unexpected(function, "address", &value))
}

fn expect_uint(function: &str, value: DynSolValue) -> NftResult<U256> {
    value
        .as_uint()
        .map(|(n, _)| n)
        .ok_or_else(|| unexpected(function, "uint", &value))
}

fn unexpected(function: &str, expected: &str, value: &DynSolValue) -> NftError {
    NftError::Abi(format!(
        "{} returned {:?}, expected {}",
        function, value, expected
    ))
}
