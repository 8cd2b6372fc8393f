//! Execution calldata codecs.
//!
//! Which decoder applies is decided by the call type of the mode word:
//! - single / delegatecall: packed `address target || uint256 value || bytes callData`
//! - batch: `abi.encode(Execution[])` with `struct Execution { address target; uint256 value; bytes callData; }`

use alloc::vec::Vec;

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol_data, SolType};

use crate::errors::PayloadError;

const TARGET_LEN: usize = 20;
const VALUE_LEN: usize = 32;
/// Minimum length of a packed single execution (empty calldata).
pub const SINGLE_PREFIX_LEN: usize = TARGET_LEN + VALUE_LEN;

/// ABI shape of a batch: `(address,uint256,bytes)[]`.
type BatchAbi = sol_data::Array<(sol_data::Address, sol_data::Uint<256>, sol_data::Bytes)>;

/// One call to be forwarded by the account.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Execution {
    pub target: Address,
    pub value: U256,
    pub call_data: Bytes,
}

impl Execution {
    pub fn new(target: Address, value: U256, call_data: Vec<u8>) -> Self {
        Self {
            target,
            value,
            call_data: Bytes::from(call_data),
        }
    }
}

/// Decode a packed single execution.
pub fn decode_single(payload: &[u8]) -> Result<Execution, PayloadError> {
    if payload.len() < SINGLE_PREFIX_LEN {
        return Err(PayloadError::Truncated {
            len: payload.len(),
            min: SINGLE_PREFIX_LEN,
        });
    }
    let target = Address::from_slice(&payload[..TARGET_LEN]);
    let value = U256::from_be_slice(&payload[TARGET_LEN..SINGLE_PREFIX_LEN]);
    let call_data = Bytes::copy_from_slice(&payload[SINGLE_PREFIX_LEN..]);
    Ok(Execution {
        target,
        value,
        call_data,
    })
}

/// Decode a delegated execution. Same layout as [`decode_single`]; value must be zero.
pub fn decode_delegatecall(payload: &[u8]) -> Result<Execution, PayloadError> {
    let execution = decode_single(payload)?;
    if !execution.value.is_zero() {
        return Err(PayloadError::DelegateCallWithValue);
    }
    Ok(execution)
}

/// Decode an ABI-encoded batch. An empty array is valid.
pub fn decode_batch(payload: &[u8]) -> Result<Vec<Execution>, PayloadError> {
    let calls = BatchAbi::abi_decode(payload, true).map_err(|_| PayloadError::InvalidBatchEncoding)?;
    Ok(calls
        .into_iter()
        .map(|(target, value, call_data)| Execution {
            target,
            value,
            call_data,
        })
        .collect())
}

/// Encode a packed single (or delegatecall) execution.
pub fn encode_single(execution: &Execution) -> Vec<u8> {
    let mut buf = Vec::with_capacity(SINGLE_PREFIX_LEN + execution.call_data.len());
    buf.extend_from_slice(execution.target.as_slice());
    buf.extend_from_slice(&execution.value.to_be_bytes::<32>());
    buf.extend_from_slice(&execution.call_data);
    buf
}

/// Encode a batch as `abi.encode(Execution[])`.
pub fn encode_batch(executions: &[Execution]) -> Vec<u8> {
    let tuples: Vec<(Address, U256, Bytes)> = executions
        .iter()
        .map(|e| (e.target, e.value, e.call_data.clone()))
        .collect();
    BatchAbi::abi_encode(&tuples)
}
