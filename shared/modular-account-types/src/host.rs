//! Collaborator abstractions, implemented differently on-chain vs off-chain.

use alloc::vec::Vec;

use alloy_primitives::{Address, U256};

/// Read-only view of the account's module registry.
///
/// The registry is authoritative; callers query it per request and never cache answers.
pub trait ModuleRegistry {
    fn is_validator_enabled(&self, validator: Address) -> bool;

    fn is_executor_enabled(&self, executor: Address) -> bool;
}

/// Performs the calls the account forwards.
///
/// Both methods return the callee's return data on success and its revert data on failure.
pub trait CallHost {
    fn call(&mut self, target: Address, value: U256, data: &[u8]) -> Result<Vec<u8>, Vec<u8>>;

    /// Run `target`'s code against the account's own storage.
    fn delegate_call(&mut self, target: Address, data: &[u8]) -> Result<Vec<u8>, Vec<u8>>;
}

impl<T: ModuleRegistry + ?Sized> ModuleRegistry for &T {
    fn is_validator_enabled(&self, validator: Address) -> bool {
        (**self).is_validator_enabled(validator)
    }

    fn is_executor_enabled(&self, executor: Address) -> bool {
        (**self).is_executor_enabled(executor)
    }
}
