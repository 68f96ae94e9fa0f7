//! Contract handle bound to a network handle, an address and a runtime ABI.

use alloy::dyn_abi::{DynSolValue, EventExt, FunctionExt, JsonAbiExt};
use alloy::json_abi::{Function, JsonAbi};
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, Log, TxHash};
use alloy::rpc::types::TransactionRequest;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::blockchain::client::Network;
use crate::blockchain::types::{NftError, NftResult};

/// Function arguments keyed by their ABI parameter name.
pub type DecodedArgs = BTreeMap<String, DynSolValue>;

/// Parse a contract ABI.
///
/// Accepts either a bare ABI array or a compiler artifact with an `abi` key.
pub fn parse_abi(json: &str) -> Result<JsonAbi, serde_json::Error> {
    let mut value: serde_json::Value = serde_json::from_str(json)?;
    if let Some(abi) = value.get_mut("abi").map(serde_json::Value::take) {
        return serde_json::from_value(abi);
    }
    serde_json::from_value(value)
}

/// Handle to one deployed contract.
#[derive(Clone)]
pub struct ContractHandle {
    address: Address,
    abi: Arc<JsonAbi>,
    network: Arc<dyn Network>,
}

impl ContractHandle {
    pub fn new(address: Address, abi: JsonAbi, network: Arc<dyn Network>) -> Self {
        Self {
            address,
            abi: Arc::new(abi),
            network,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn abi(&self) -> &JsonAbi {
        &self.abi
    }

    pub fn network(&self) -> &Arc<dyn Network> {
        &self.network
    }

    /// Look up `name`, picking the overload that takes `arity` arguments.
    pub fn function(&self, name: &str, arity: usize) -> NftResult<&Function> {
        let overloads = self
            .abi
            .function(name)
            .ok_or_else(|| NftError::Abi(format!("function {} not found in ABI", name)))?;
        overloads
            .iter()
            .find(|f| f.inputs.len() == arity)
            .ok_or_else(|| {
                NftError::Abi(format!("function {} has no overload taking {} arguments", name, arity))
            })
    }

    /// ABI-encode a call to `name`, selector included.
    pub fn encode_call(&self, name: &str, args: &[DynSolValue]) -> NftResult<Bytes> {
        let function = self.function(name, args.len())?;
        let input = function.abi_encode_input(args).map_err(NftError::abi)?;
        Ok(input.into())
    }

    /// Run a read-only call from `from` and decode its outputs.
    pub async fn call(
        &self,
        name: &str,
        args: &[DynSolValue],
        from: Address,
    ) -> NftResult<Vec<DynSolValue>> {
        let function = self.function(name, args.len())?;
        let input = function.abi_encode_input(args).map_err(NftError::abi)?;
        let tx = TransactionRequest::default()
            .with_from(from)
            .with_to(self.address)
            .with_input(input);

        tracing::debug!(contract = %self.address, function = name, "eth_call");
        let output = self.network.call(tx).await?;
        function.abi_decode_output(&output).map_err(NftError::abi)
    }

    /// Decode call data that was sent to `name` back into named arguments.
    pub fn decode_input(&self, name: &str, input: &[u8]) -> NftResult<DecodedArgs> {
        if input.len() < 4 {
            return Err(NftError::Abi(format!(
                "call data of {} bytes is too short",
                input.len()
            )));
        }
        let (selector, data) = input.split_at(4);
        let function = self
            .abi
            .function(name)
            .and_then(|overloads| overloads.iter().find(|f| f.selector().as_slice() == selector))
            .ok_or_else(|| NftError::Abi(format!("call data does not match function {}", name)))?;

        let values = function.abi_decode_input(data).map_err(NftError::abi)?;
        Ok(function
            .inputs
            .iter()
            .zip(values)
            .enumerate()
            .map(|(i, (param, value))| {
                let key = if param.name.is_empty() {
                    format!("arg{}", i)
                } else {
                    param.name.clone()
                };
                (key, value)
            })
            .collect())
    }

    /// Find `field` of the first `event` emitted by this contract in `logs`.
    ///
    /// Logs are matched by address and event selector, not by position.
    pub fn event_field(
        &self,
        event: &str,
        field: &str,
        logs: &[Log],
    ) -> NftResult<Option<DynSolValue>> {
        let events = self
            .abi
            .event(event)
            .ok_or_else(|| NftError::Abi(format!("event {} not found in ABI", event)))?;

        for log in logs.iter().filter(|log| log.address == self.address) {
            let Some(topic0) = log.topics().first() else {
                continue;
            };
            let Some(abi_event) = events.iter().find(|e| e.selector() == *topic0) else {
                continue;
            };

            let decoded = abi_event
                .decode_log_parts(log.topics().iter().copied(), &log.data.data)
                .map_err(NftError::abi)?;
            let mut indexed = decoded.indexed.into_iter();
            let mut body = decoded.body.into_iter();
            for param in &abi_event.inputs {
                let value = if param.indexed {
                    indexed.next()
                } else {
                    body.next()
                };
                if param.name == field {
                    return Ok(value);
                }
            }
        }
        Ok(None)
    }

    /// Like [`event_field`](Self::event_field) but absence is an error.
    pub fn require_event_field(
        &self,
        event: &str,
        field: &str,
        logs: &[Log],
        tx_hash: TxHash,
    ) -> NftResult<DynSolValue> {
        self.event_field(event, field, logs)?
            .ok_or_else(|| NftError::EventMissing {
                event: event.to_string(),
                field: field.to_string(),
                tx_hash,
            })
    }
}

impl std::fmt::Debug for ContractHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractHandle")
            .field("address", &self.address)
            .field("endpoint", &self.network.endpoint())
            .finish()
    }
}
