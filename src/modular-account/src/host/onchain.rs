use alloc::vec::Vec;

use alloy_sol_types::SolCall;
use modular_account_types::{CallHost, ModuleRegistry};
use stylus_sdk::{
    alloy_primitives::{Address, U256},
    stylus_core::{
        calls::{context::Call, errors::Error, CallAccess},
        Host,
    },
};

use crate::erc7579::{constants::REGISTRY_QUERY_GAS, interfaces::IModuleRegistry};

/// Revert data of a failed call. Anything that is not a revert carries no data.
fn revert_data(err: Error) -> Vec<u8> {
    match err {
        Error::Revert(data) => data,
        Error::AbiDecodingFailed(_) => Vec::new(),
    }
}

/// Forwards calls from the account with `call` / `delegatecall` through the VM.
#[derive(Clone, Copy)]
pub struct OnchainCallHost<'a> {
    vm: &'a dyn Host,
}

impl<'a> OnchainCallHost<'a> {
    pub fn new(vm: &'a dyn Host) -> Self {
        Self { vm }
    }
}

impl CallHost for OnchainCallHost<'_> {
    fn call(&mut self, target: Address, value: U256, data: &[u8]) -> Result<Vec<u8>, Vec<u8>> {
        self.vm
            .call(&Call::new().value(value), target, data)
            .map_err(revert_data)
    }

    fn delegate_call(&mut self, target: Address, data: &[u8]) -> Result<Vec<u8>, Vec<u8>> {
        unsafe { self.vm.delegate_call(&Call::new(), target, data) }.map_err(revert_data)
    }
}

/// Module registry reached through a gas-capped `staticcall`.
///
/// Any failure (revert, short or malformed return data) reads as "not enabled".
#[derive(Clone, Copy)]
pub struct OnchainRegistry<'a> {
    vm: &'a dyn Host,
    pub registry: Address,
    pub gas_cap: u64,
}

impl<'a> OnchainRegistry<'a> {
    pub fn new(vm: &'a dyn Host, registry: Address) -> Self {
        Self {
            vm,
            registry,
            gas_cap: REGISTRY_QUERY_GAS,
        }
    }

    fn query<C: SolCall<Return = R>, R>(&self, call: C, enabled: impl FnOnce(R) -> bool) -> bool {
        let data = call.abi_encode();
        let ctx = Call::new().gas(self.gas_cap);
        match self.vm.static_call(&ctx, self.registry, &data) {
            Ok(out) => C::abi_decode_returns(&out, true).map(enabled).unwrap_or(false),
            Err(_) => false,
        }
    }
}

impl ModuleRegistry for OnchainRegistry<'_> {
    fn is_validator_enabled(&self, validator: Address) -> bool {
        self.query(
            IModuleRegistry::isValidatorEnabledCall { validator },
            |ret| ret.enabled,
        )
    }

    fn is_executor_enabled(&self, executor: Address) -> bool {
        self.query(
            IModuleRegistry::isExecutorEnabledCall { executor },
            |ret| ret.enabled,
        )
    }
}
