//! Shared types for the modular account execution core (on-chain/off-chain).
//!
//! Everything in this crate is pure: fixed-layout codecs for the execution mode word,
//! the execution calldata shapes, and the 2D nonce / replay key, plus the collaborator
//! traits the contract is written against.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod errors;
pub mod execution;
pub mod host;
pub mod mode;
pub mod replay_key;

pub use errors::PayloadError;
pub use execution::{
    decode_batch, decode_delegatecall, decode_single, encode_batch, encode_single, Execution,
};
pub use host::{CallHost, ModuleRegistry};
pub use mode::{CallType, ExecType, ModeCode, ModeContext};
pub use replay_key::{pack_nonce, unpack_nonce, ReplayKey};
