//! Configuration loading from file and environment.

use secrecy::SecretString;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

pub const ENV_PUBLIC_KEY: &str = "PUBLIC_KEY";
pub const ENV_PRIVATE_KEY: &str = "PRIVATE_KEY";
pub const ENV_CHAIN_URL: &str = "CHAIN_URL";
pub const ENV_CHAIN_ID: &str = "CHAIN_ID";
pub const ENV_RPC_TIMEOUT_SECS: &str = "RPC_TIMEOUT_SECS";
pub const ENV_CONFIRMATION_TIMEOUT_SECS: &str = "CONFIRMATION_TIMEOUT_SECS";
pub const ENV_POLL_INTERVAL_MS: &str = "POLL_INTERVAL_MS";
pub const ENV_WAIT_FOR_RECEIPT: &str = "WAIT_FOR_RECEIPT";
pub const ENV_CONTRACT_ADDRESS: &str = "CONTRACT_ADDRESS";
pub const ENV_CONTRACT_ABI: &str = "CONTRACT_ABI";
pub const ENV_CONTRACT_ABI_PATH: &str = "CONTRACT_ABI_PATH";
pub const ENV_MINT_FUNCTION: &str = "MINT_FUNCTION";
pub const ENV_MINT_EVENT: &str = "MINT_EVENT";
pub const ENV_MINT_EVENT_FIELD: &str = "MINT_EVENT_FIELD";
pub const ENV_PAY_FUNCTION: &str = "PAY_FUNCTION";
pub const ENV_NFT_PRICE_WEI: &str = "NFT_PRICE_WEI";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(toml::de::Error),
    EnvFile(dotenvy::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "IO error reading {}: {}", path.display(), e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::EnvFile(e) => write!(f, "Env file error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load variables from an env file into the process environment.
///
/// With no explicit path a missing `./.env` is not an error. Variables
/// already set in the environment win.
pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    match path {
        Some(path) => dotenvy::from_path(path)
            .map(|()| Some(path.to_path_buf()))
            .map_err(ConfigError::EnvFile),
        None => match dotenvy::dotenv() {
            Ok(path) => Ok(Some(path)),
            Err(e) if e.not_found() => Ok(None),
            Err(e) => Err(ConfigError::EnvFile(e)),
        },
    }
}

/// Load and validate configuration from an optional TOML file and the
/// process environment.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    load_config_with(path, |key| std::env::var(key).ok())
}

/// Like [`load_config`] with an explicit variable lookup.
pub fn load_config_with<F>(path: Option<&Path>, env: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content =
                fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => AppConfig::default(),
    };

    let mut errors = apply_env(&mut config, &env);
    if let Err(e) = resolve_abi(&mut config) {
        errors.push(e);
    }

    if let Err(validation) = validate_config(&config) {
        errors.extend(validation);
    }
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors));
    }

    tracing::debug!(
        chain_url = %config.network.chain_url,
        contract = %config.contract.address,
        "Configuration loaded"
    );
    Ok(config)
}

/// Overlay environment variables; returns values that failed to parse.
fn apply_env<F>(config: &mut AppConfig, env: &F) -> Vec<ValidationError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut errors = Vec::new();
    let get = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get(ENV_PUBLIC_KEY) {
        config.account.public_key = v;
    }
    if let Some(v) = get(ENV_PRIVATE_KEY) {
        config.account.private_key = SecretString::new(v);
    }
    if let Some(v) = get(ENV_CHAIN_URL) {
        config.network.chain_url = v;
    }
    if let Some(v) = get(ENV_CHAIN_ID) {
        config.network.chain_id = parse_env(ENV_CHAIN_ID, &v, &mut errors);
    }
    if let Some(v) = get(ENV_RPC_TIMEOUT_SECS) {
        if let Some(n) = parse_env(ENV_RPC_TIMEOUT_SECS, &v, &mut errors) {
            config.network.rpc_timeout_secs = n;
        }
    }
    if let Some(v) = get(ENV_CONFIRMATION_TIMEOUT_SECS) {
        if let Some(n) = parse_env(ENV_CONFIRMATION_TIMEOUT_SECS, &v, &mut errors) {
            config.network.confirmation_timeout_secs = n;
        }
    }
    if let Some(v) = get(ENV_POLL_INTERVAL_MS) {
        if let Some(n) = parse_env(ENV_POLL_INTERVAL_MS, &v, &mut errors) {
            config.network.poll_interval_ms = n;
        }
    }
    if let Some(v) = get(ENV_WAIT_FOR_RECEIPT) {
        if let Some(b) = parse_env(ENV_WAIT_FOR_RECEIPT, &v, &mut errors) {
            config.network.wait_for_receipt = b;
        }
    }
    if let Some(v) = get(ENV_CONTRACT_ADDRESS) {
        config.contract.address = v;
    }
    if let Some(v) = get(ENV_CONTRACT_ABI) {
        config.contract.abi = Some(v);
    }
    if let Some(v) = get(ENV_CONTRACT_ABI_PATH) {
        config.contract.abi_path = Some(v);
    }
    if let Some(v) = get(ENV_MINT_FUNCTION) {
        config.contract.mint_function = v;
    }
    if let Some(v) = get(ENV_MINT_EVENT) {
        config.contract.mint_event = v;
    }
    if let Some(v) = get(ENV_MINT_EVENT_FIELD) {
        config.contract.mint_event_field = v;
    }
    if let Some(v) = get(ENV_PAY_FUNCTION) {
        config.contract.pay_function = v;
    }
    if let Some(v) = get(ENV_NFT_PRICE_WEI) {
        config.contract.price_wei = v;
    }
    if let Some(v) = get(ENV_LOG_LEVEL) {
        config.observability.log_level = v;
    }

    errors
}

fn parse_env<T: FromStr>(
    key: &'static str,
    value: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<T> {
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            errors.push(ValidationError::InvalidValue {
                key,
                value: value.to_string(),
            });
            None
        }
    }
}

/// Read the ABI from `abi_path` when it was not given inline.
fn resolve_abi(config: &mut AppConfig) -> Result<(), ValidationError> {
    if config.contract.abi.is_some() {
        return Ok(());
    }
    if let Some(path) = config.contract.abi_path.as_deref() {
        let abi = fs::read_to_string(path).map_err(|e| ValidationError::UnreadableAbi {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        config.contract.abi = Some(abi);
    }
    Ok(())
}
