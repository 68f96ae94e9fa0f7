//! Error taxonomy and transaction state definitions.

use alloy::primitives::{TxHash, U256};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Generic line shown when a failure has no more specific message.
pub const GENERIC_DIAGNOSTIC: &str = "An error occurred! Check the error description.";

/// Coarse classification of every [`NftError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or malformed configuration and key material.
    Configuration,
    /// Endpoint unreachable, RPC failures, or handles not yet established.
    Connectivity,
    /// A user-supplied argument could not be parsed.
    InvalidInput,
    /// The contract or the network rejected the operation.
    ContractLogic,
    /// Anything else.
    Unclassified,
}

/// Errors that can occur while talking to the NFT contract.
#[derive(Debug, Error)]
pub enum NftError {
    /// Invalid private key or signing failure.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Connected node reports a different chain.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// A handle was requested before it was established.
    #[error("Not connected: {0} handle is not established")]
    NotConnected(&'static str),

    /// Contract handle could not be constructed.
    #[error("Contract setup failed: {0}")]
    Contract(String),

    #[error("Invalid account address '{input}': {reason}")]
    InvalidAddress { input: String, reason: String },

    #[error("Invalid token id '{input}': {reason}")]
    InvalidTokenId { input: String, reason: String },

    #[error("Token URI must not be empty")]
    EmptyTokenUri,

    /// The node rejected a call or transaction with a revert.
    #[error("Execution reverted: {0}")]
    Reverted(String),

    #[error("Token {token_id} does not exist: {reason}")]
    NonexistentToken { token_id: U256, reason: String },

    /// Transaction was mined but its receipt reports failure.
    #[error("Transaction {0} reverted")]
    ReceiptReverted(TxHash),

    /// The mined receipt carries no decodable mint event.
    #[error("Event {event}.{field} not found in receipt of {tx_hash}")]
    EventMissing {
        event: String,
        field: String,
        tx_hash: TxHash,
    },

    /// Encoding or decoding against the contract ABI failed.
    #[error("ABI error: {0}")]
    Abi(String),

    #[error("Transaction {tx_hash} not mined within {timeout:?}")]
    ConfirmationTimeout { tx_hash: TxHash, timeout: Duration },

    #[error("Transaction {0} not found")]
    TransactionNotFound(TxHash),
}

impl NftError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            NftError::Wallet(_) => ErrorKind::Configuration,
            NftError::Rpc(_)
            | NftError::Timeout(_)
            | NftError::ChainMismatch { .. }
            | NftError::NotConnected(_)
            | NftError::Contract(_) => ErrorKind::Connectivity,
            NftError::InvalidAddress { .. }
            | NftError::InvalidTokenId { .. }
            | NftError::EmptyTokenUri => ErrorKind::InvalidInput,
            NftError::Reverted(_)
            | NftError::NonexistentToken { .. }
            | NftError::ReceiptReverted(_)
            | NftError::EventMissing { .. } => ErrorKind::ContractLogic,
            NftError::Abi(_)
            | NftError::ConfirmationTimeout { .. }
            | NftError::TransactionNotFound(_) => ErrorKind::Unclassified,
        }
    }

    /// The single line shown to a console user for this failure.
    pub fn diagnostic(&self) -> &'static str {
        match self {
            NftError::InvalidAddress { .. } => "Invalid account address!",
            NftError::InvalidTokenId { .. } => "Invalid token id!",
            NftError::EmptyTokenUri => "Set a Token URI first!",
            NftError::NonexistentToken { .. } => "Unexistent Token for this ID!",
            _ => GENERIC_DIAGNOSTIC,
        }
    }

    pub(crate) fn abi(err: impl fmt::Display) -> Self {
        NftError::Abi(err.to_string())
    }
}

/// Result type for contract operations.
pub type NftResult<T> = Result<T, NftError>;

/// Lifecycle of a state-changing transaction.
///
/// ```text
/// NotSubmitted → Signed → Broadcast → Mined
///                                   ↘ TimedOut | Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStage {
    NotSubmitted,
    Signed,
    Broadcast,
    Mined,
    TimedOut,
    Failed,
}

impl fmt::Display for TxStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TxStage::NotSubmitted => "not-submitted",
            TxStage::Signed => "signed",
            TxStage::Broadcast => "broadcast",
            TxStage::Mined => "mined",
            TxStage::TimedOut => "timed-out",
            TxStage::Failed => "failed",
        };
        f.write_str(name)
    }
}
