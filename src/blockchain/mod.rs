//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment (endpoint, contract address, ABI, keys)
//!     → client.rs (RPC handle with timeouts)
//!     → connection.rs (network handle, then contract handle)
//!     → contract.rs (ABI encode/decode, named event lookup)
//!     → wallet.rs (local signing)
//!     → transaction.rs (build, sign, broadcast, wait for receipt)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod connection;
pub mod contract;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::{MinedReceipt, Network, RpcClient};
pub use connection::Connection;
pub use contract::{ContractHandle, DecodedArgs};
pub use types::{ErrorKind, NftError, NftResult, TxStage};
pub use wallet::Wallet;
