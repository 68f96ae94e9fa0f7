//! Shared utilities for integration tests.
#![allow(dead_code)]

use alloy::consensus::{Transaction as _, TxEnvelope};
use alloy::dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt};
use alloy::eips::Decodable2718;
use alloy::json_abi::{Function, JsonAbi};
use alloy::primitives::{address, Address, Bytes, Log, TxHash, B256, U256};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use secrecy::SecretString;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use nft_console::blockchain::contract::parse_abi;
use nft_console::blockchain::{MinedReceipt, Network};
use nft_console::config::{AccountConfig, AppConfig};
use nft_console::lifecycle::initialize_with;
use nft_console::{NftContract, NftError, NftResult};

pub const ABI_JSON: &str = include_str!("../../abi/MyNFT.json");
pub const CONTRACT: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
/// Anvil's first development account.
pub const CALLER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
pub const CALLER_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const OTHER: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");
pub const CHAIN_ID: u64 = 31337;

/// Configuration pointing at the mock contract with short timings.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.network.chain_url = "http://127.0.0.1:8545".to_string();
    config.network.rpc_timeout_secs = 2;
    config.network.confirmation_timeout_secs = 2;
    config.network.poll_interval_ms = 10;
    config.contract.address = CONTRACT.to_string();
    config.contract.abi = Some(ABI_JSON.to_string());
    config.account = AccountConfig {
        public_key: CALLER.to_string(),
        private_key: SecretString::new(CALLER_KEY.to_string()),
    };
    config
}

pub fn abi() -> JsonAbi {
    parse_abi(ABI_JSON).unwrap()
}

pub fn function(name: &str) -> Function {
    abi().function(name).unwrap()[0].clone()
}

/// Decode call data sent to `name`.
pub fn decode_call(name: &str, input: &[u8]) -> Vec<DynSolValue> {
    let function = function(name);
    assert_eq!(&input[..4], function.selector().as_slice());
    function.abi_decode_input(&input[4..]).unwrap()
}

/// Build the wrapper on top of `mock` with `config`.
pub async fn connect(mock: &Arc<MockNetwork>, config: &AppConfig) -> NftContract {
    initialize_with(config, mock.clone() as Arc<dyn Network>)
        .await
        .unwrap()
}

/// How the mock answers receipt queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mining {
    /// Receipt after this many pending polls.
    After(usize),
    Never,
    Reverted,
}

struct MockState {
    calls: Vec<&'static str>,
    reachable: bool,
    nonce: u64,
    reads: HashMap<&'static str, Result<Vec<DynSolValue>, String>>,
    estimate_revert: Option<String>,
    fail_broadcast: bool,
    mining: Mining,
    emit_mint_event: bool,
    minted_token_id: U256,
    sent: Vec<TxEnvelope>,
}

/// In-process node that records every request in order.
pub struct MockNetwork {
    abi: JsonAbi,
    state: Mutex<MockState>,
}

impl MockNetwork {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            abi: abi(),
            state: Mutex::new(MockState {
                calls: Vec::new(),
                reachable: true,
                nonce: 0,
                reads: HashMap::new(),
                estimate_revert: None,
                fail_broadcast: false,
                mining: Mining::After(0),
                emit_mint_event: true,
                minted_token_id: U256::from(1),
                sent: Vec::new(),
            }),
        })
    }

    pub fn unreachable(&self) {
        self.state.lock().unwrap().reachable = false;
    }

    pub fn set_nonce(&self, nonce: u64) {
        self.state.lock().unwrap().nonce = nonce;
    }

    /// Answer `eth_call` to `function` with `outputs`.
    pub fn set_read(&self, function: &'static str, outputs: Vec<DynSolValue>) {
        self.state.lock().unwrap().reads.insert(function, Ok(outputs));
    }

    /// Make `eth_call` to `function` revert with `reason`.
    pub fn set_revert(&self, function: &'static str, reason: &str) {
        self.state
            .lock()
            .unwrap()
            .reads
            .insert(function, Err(reason.to_string()));
    }

    pub fn set_estimate_revert(&self, reason: &str) {
        self.state.lock().unwrap().estimate_revert = Some(reason.to_string());
    }

    pub fn fail_broadcast(&self) {
        self.state.lock().unwrap().fail_broadcast = true;
    }

    pub fn set_mining(&self, mining: Mining) {
        self.state.lock().unwrap().mining = mining;
    }

    pub fn set_minted_token_id(&self, token_id: u64) {
        self.state.lock().unwrap().minted_token_id = U256::from(token_id);
    }

    pub fn omit_mint_event(&self) {
        self.state.lock().unwrap().emit_mint_event = false;
    }

    /// RPC method names in the order they were requested.
    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn position(&self, method: &str) -> Option<usize> {
        self.calls().iter().position(|m| *m == method)
    }

    /// Signed transactions received, decoded.
    pub fn sent(&self) -> Vec<TxEnvelope> {
        self.state.lock().unwrap().sent.clone()
    }

    fn record(&self, method: &'static str) -> std::sync::MutexGuard<'_, MockState> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(method);
        state
    }

    fn mint_logs(&self, state: &MockState, envelope: &TxEnvelope) -> Vec<Log> {
        let mint = &self.abi.function("mintNFT").unwrap()[0];
        if !state.emit_mint_event || !envelope.input().starts_with(mint.selector().as_slice()) {
            return Vec::new();
        }

        let transfer = &self.abi.event("Transfer").unwrap()[0];
        let approval = &self.abi.event("Approval").unwrap()[0];
        let foreign = address!("00000000000000000000000000000000000000aa");
        vec![
            // Same event from another contract, then an unrelated event.
            Log::new_unchecked(
                foreign,
                vec![
                    transfer.selector(),
                    Address::ZERO.into_word(),
                    CALLER.into_word(),
                    word(U256::from(999u64)),
                ],
                Bytes::new(),
            ),
            Log::new_unchecked(
                CONTRACT,
                vec![
                    approval.selector(),
                    CALLER.into_word(),
                    Address::ZERO.into_word(),
                    word(state.minted_token_id),
                ],
                Bytes::new(),
            ),
            Log::new_unchecked(
                CONTRACT,
                vec![
                    transfer.selector(),
                    Address::ZERO.into_word(),
                    CALLER.into_word(),
                    word(state.minted_token_id),
                ],
                Bytes::new(),
            ),
        ]
    }
}

#[async_trait]
impl Network for MockNetwork {
    fn endpoint(&self) -> &str {
        "mock://node"
    }

    async fn chain_id(&self) -> NftResult<u64> {
        let state = self.record("eth_chainId");
        if state.reachable {
            Ok(CHAIN_ID)
        } else {
            Err(NftError::Rpc("connection refused".to_string()))
        }
    }

    async fn transaction_count(&self, _address: Address) -> NftResult<u64> {
        Ok(self.record("eth_getTransactionCount").nonce)
    }

    async fn gas_price(&self) -> NftResult<u128> {
        self.record("eth_gasPrice");
        Ok(1_000_000_000)
    }

    async fn estimate_gas(&self, _tx: TransactionRequest) -> NftResult<u64> {
        let state = self.record("eth_estimateGas");
        match &state.estimate_revert {
            Some(reason) => Err(NftError::Reverted(reason.clone())),
            None => Ok(150_000),
        }
    }

    async fn call(&self, tx: TransactionRequest) -> NftResult<Bytes> {
        let state = self.record("eth_call");
        let input = tx.input.input().cloned().unwrap_or_default();
        let function = self
            .abi
            .functions()
            .find(|f| input.starts_with(f.selector().as_slice()))
            .ok_or_else(|| NftError::Rpc("unknown selector".to_string()))?;

        match state.reads.get(function.name.as_str()) {
            Some(Ok(outputs)) => Ok(function.abi_encode_output(outputs).unwrap().into()),
            Some(Err(reason)) => Err(NftError::Reverted(reason.clone())),
            None => Err(NftError::Reverted("execution reverted".to_string())),
        }
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> NftResult<TxHash> {
        let mut state = self.record("eth_sendRawTransaction");
        if state.fail_broadcast {
            return Err(NftError::Rpc("nonce too low".to_string()));
        }
        let envelope = TxEnvelope::decode_2718(&mut &raw[..])
            .map_err(|e| NftError::Rpc(format!("invalid raw transaction: {}", e)))?;
        let tx_hash = *envelope.tx_hash();
        state.sent.push(envelope);
        Ok(tx_hash)
    }

    async fn transaction_receipt(&self, tx_hash: TxHash) -> NftResult<Option<MinedReceipt>> {
        let mut state = self.record("eth_getTransactionReceipt");
        let Some(envelope) = state.sent.iter().find(|tx| *tx.tx_hash() == tx_hash).cloned() else {
            return Ok(None);
        };

        let success = match state.mining {
            Mining::Never => return Ok(None),
            Mining::After(n) if n > 0 => {
                state.mining = Mining::After(n - 1);
                return Ok(None);
            }
            Mining::After(_) => true,
            Mining::Reverted => false,
        };

        let logs = if success {
            self.mint_logs(&state, &envelope)
        } else {
            Vec::new()
        };
        Ok(Some(MinedReceipt {
            tx_hash,
            block_number: Some(12),
            success,
            logs,
        }))
    }

    async fn transaction_input(&self, tx_hash: TxHash) -> NftResult<Option<Bytes>> {
        let state = self.record("eth_getTransactionByHash");
        Ok(state
            .sent
            .iter()
            .find(|tx| *tx.tx_hash() == tx_hash)
            .map(|tx| tx.input().clone()))
    }
}

/// Shorter confirmation deadline for tests that expect a timeout.
pub fn impatient(mut config: AppConfig) -> AppConfig {
    config.network.confirmation_timeout_secs = 1;
    config
}

fn word(value: U256) -> B256 {
    B256::from(value.to_be_bytes::<32>())
}
