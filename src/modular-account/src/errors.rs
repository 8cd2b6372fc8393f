use alloc::vec::Vec;

use alloy_primitives::Address;
use modular_account_types::{CallType, ExecType, PayloadError, ReplayKey};
use thiserror::Error;

/// Errors while decoding or executing an execution request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// The mode word names a call type / exec type pair with no handler.
    #[error("unsupported execution mode (call type {call_type}, exec type {exec_type})")]
    UnsupportedMode {
        call_type: CallType,
        exec_type: ExecType,
    },
    /// The execution calldata does not match the shape the call type declares.
    #[error("malformed execution calldata: {0}")]
    MalformedPayload(#[from] PayloadError),
    /// A call failed under strict execution; carries the callee's revert data.
    #[error("call {index} failed")]
    CallFailure { index: usize, revert_data: Vec<u8> },
}

/// Errors during nonce admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReplayError {
    #[error("validator {0} is not enabled")]
    ValidatorNotEnabled(Address),
    /// The presented sequence was already consumed on this key.
    #[error("nonce reused on {key}: expected {expected}, got {presented}")]
    NonceReused {
        key: ReplayKey,
        expected: u64,
        presented: u64,
    },
    /// The presented sequence skips ahead of the expected one.
    #[error("nonce out of order on {key}: expected {expected}, got {presented}")]
    NonceOutOfOrder {
        key: ReplayKey,
        expected: u64,
        presented: u64,
    },
    /// The stream reached the top of the sequence space.
    #[error("nonce stream {key} is exhausted")]
    NonceExhausted { key: ReplayKey },
}

/// Errors surfaced by the request pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error(transparent)]
    Execution(#[from] ExecutionError),
    #[error(transparent)]
    Replay(#[from] ReplayError),
    #[error("executor {0} is not enabled")]
    ExecutorNotEnabled(Address),
}
