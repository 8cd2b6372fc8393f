//! In-memory collaborators for off-chain tests.

use alloc::{
    collections::{BTreeMap, BTreeSet},
    vec::Vec,
};

use alloy_primitives::{Address, U256};
use alloy_sol_types::{sol, SolCall, SolValue};
use modular_account_types::{CallHost, ModuleRegistry};

sol! {
    interface ICounter {
        function setValue(uint256 value) external;
        function value() external view returns (uint256);
    }
}

/// Behaviour of a mocked call target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MockTarget {
    /// Stores the last `setValue` argument; `value()` reads it back.
    Counter { value: U256 },
    /// Always reverts with the given data.
    Reverter { reason: Vec<u8> },
}

/// One observed call, in execution order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObservedCall {
    pub target: Address,
    pub value: U256,
    pub data: Vec<u8>,
    pub delegated: bool,
}

/// Call host backed by a map of mocked targets.
///
/// Unknown targets behave like externally owned accounts: every call succeeds with no return
/// data. Delegated calls to a counter write into `account_value` instead of the counter.
#[derive(Debug, Default)]
pub struct MockHost {
    pub targets: BTreeMap<Address, MockTarget>,
    pub observed: Vec<ObservedCall>,
    pub received: BTreeMap<Address, U256>,
    pub account_value: U256,
}

impl MockHost {
    pub fn with_counter(mut self, target: Address) -> Self {
        self.targets.insert(target, MockTarget::Counter { value: U256::ZERO });
        self
    }

    pub fn with_reverter(mut self, target: Address, reason: &[u8]) -> Self {
        self.targets.insert(
            target,
            MockTarget::Reverter {
                reason: reason.to_vec(),
            },
        );
        self
    }

    pub fn counter_value(&self, target: Address) -> Option<U256> {
        match self.targets.get(&target) {
            Some(MockTarget::Counter { value }) => Some(*value),
            _ => None,
        }
    }
}

/// Run counter calldata against a storage slot.
fn run_counter(slot: &mut U256, data: &[u8]) -> Result<Vec<u8>, Vec<u8>> {
    if let Ok(call) = ICounter::setValueCall::abi_decode(data, true) {
        *slot = call.value;
        return Ok(Vec::new());
    }
    if ICounter::valueCall::abi_decode(data, true).is_ok() {
        return Ok(slot.abi_encode());
    }
    Err(b"unknown selector".to_vec())
}

impl CallHost for MockHost {
    fn call(&mut self, target: Address, value: U256, data: &[u8]) -> Result<Vec<u8>, Vec<u8>> {
        self.observed.push(ObservedCall {
            target,
            value,
            data: data.to_vec(),
            delegated: false,
        });
        let out = match self.targets.get_mut(&target) {
            Some(MockTarget::Counter { value: slot }) => run_counter(slot, data),
            Some(MockTarget::Reverter { reason }) => Err(reason.clone()),
            None => Ok(Vec::new()),
        }?;
        *self.received.entry(target).or_default() += value;
        Ok(out)
    }

    fn delegate_call(&mut self, target: Address, data: &[u8]) -> Result<Vec<u8>, Vec<u8>> {
        self.observed.push(ObservedCall {
            target,
            value: U256::ZERO,
            data: data.to_vec(),
            delegated: true,
        });
        match self.targets.get(&target) {
            Some(MockTarget::Counter { .. }) => run_counter(&mut self.account_value, data),
            Some(MockTarget::Reverter { reason }) => Err(reason.clone()),
            None => Ok(Vec::new()),
        }
    }
}

/// Registry with explicit enable sets.
#[derive(Clone, Debug, Default)]
pub struct FakeRegistry {
    pub validators: BTreeSet<Address>,
    pub executors: BTreeSet<Address>,
}

impl FakeRegistry {
    pub fn with_validator(mut self, validator: Address) -> Self {
        self.validators.insert(validator);
        self
    }

    pub fn with_executor(mut self, executor: Address) -> Self {
        self.executors.insert(executor);
        self
    }
}

impl ModuleRegistry for FakeRegistry {
    fn is_validator_enabled(&self, validator: Address) -> bool {
        self.validators.contains(&validator)
    }

    fn is_executor_enabled(&self, executor: Address) -> bool {
        self.executors.contains(&executor)
    }
}

pub fn set_value(value: u64) -> Vec<u8> {
    ICounter::setValueCall {
        value: U256::from(value),
    }
    .abi_encode()
}

pub fn read_value() -> Vec<u8> {
    ICounter::valueCall {}.abi_encode()
}
