//! NFT contract operations.

pub mod types;
pub mod wrapper;

pub use types::{parse_address, parse_token_id, render_value, ContractSettings, MintReceipt, TxReceipt};
pub use wrapper::NftContract;
