//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → optional TOML file (loader.rs, serde)
//!     → .env file + process environment (loader.rs)
//!     → validation.rs (semantic checks, all errors collected)
//!     → AppConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All non-secret fields have defaults to allow minimal configs
//! - Credentials come from the environment only
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_config_with, load_env_file, ConfigError};
pub use schema::{AccountConfig, AppConfig, ContractConfig, NetworkConfig, ObservabilityConfig};
pub use validation::ValidationError;
