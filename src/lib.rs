//! Console for minting and querying an ERC-721 contract over JSON-RPC.

pub mod blockchain;
pub mod config;
pub mod lifecycle;
pub mod nft;
pub mod observability;
pub mod shell;

pub use blockchain::{Connection, ErrorKind, NftError, NftResult};
pub use config::AppConfig;
pub use nft::NftContract;
pub use shell::Shell;
