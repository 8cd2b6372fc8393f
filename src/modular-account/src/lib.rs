//! Modular smart-account execution core for Arbitrum Stylus.
//!
//! - [`capability`]: the `(call type, exec type)` strategy table and `supports_mode`.
//! - [`dispatcher`]: decodes execution calldata and performs the calls.
//! - [`replay`]: per-validator nonce streams.
//! - [`request`]: the decode → admit → execute pipeline over injected collaborators.
//! - [`modular_account`]: the Stylus entrypoint wiring it to contract storage and VM calls.

#![cfg_attr(not(any(test, feature = "export-abi")), no_main)]

extern crate alloc;

pub mod capability;
pub mod dispatcher;
pub mod erc7579;
pub mod errors;
pub mod host;
pub mod modular_account;
pub mod replay;
pub mod request;

#[cfg(test)]
mod test_support;

pub use modular_account::{AccountError, ModularAccount};
