//! Request pipeline: decode, admit, execute.
//!
//! Decoding happens before admission so that malformed or unsupported requests are rejected
//! without consuming a nonce. Once admitted, the nonce stays consumed even if a strict
//! execution then fails.

use alloc::vec::Vec;

use alloy_primitives::{Address, U256};
use modular_account_types::{pack_nonce, unpack_nonce, CallHost, ModeCode, ModuleRegistry, ReplayKey};

use crate::{
    capability::supports_mode_code,
    dispatcher::{execute_mode, plan, run, CallResult, ExecutionPlan},
    errors::RequestError,
    replay::{admit, NonceStore},
};

/// A validated user request as handed over by the relay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    pub mode: ModeCode,
    pub execution_calldata: Vec<u8>,
    /// `key (192 bits) || sequence (64 bits)`.
    pub nonce: U256,
}

/// The account's execution core over injected collaborators.
#[derive(Debug)]
pub struct Account<H, R, S> {
    host: H,
    registry: R,
    nonces: S,
}

impl<H, R, S> Account<H, R, S>
where
    H: CallHost,
    R: ModuleRegistry,
    S: NonceStore,
{
    pub fn new(host: H, registry: R, nonces: S) -> Self {
        Self {
            host,
            registry,
            nonces,
        }
    }

    /// Handle a relayed request end to end.
    pub fn handle(&mut self, request: &Request) -> Result<Vec<CallResult>, RequestError> {
        let plan = self.validate(request.mode, &request.execution_calldata, request.nonce)?;
        Ok(run(&mut self.host, &plan)?)
    }

    /// Validation phase: decode the request, then admit its nonce.
    ///
    /// A request that does not decode is rejected before its stream is touched.
    pub fn validate(
        &mut self,
        mode: ModeCode,
        execution_calldata: &[u8],
        nonce: U256,
    ) -> Result<ExecutionPlan, RequestError> {
        let plan = plan(mode, execution_calldata)?;

        let (key, sequence) = unpack_nonce(nonce);
        admit(&mut self.nonces, &self.registry, key, sequence)?;

        Ok(plan)
    }

    /// Execution phase for a request admitted earlier.
    pub fn execute(
        &mut self,
        mode: ModeCode,
        execution_calldata: &[u8],
    ) -> Result<Vec<CallResult>, RequestError> {
        Ok(execute_mode(&mut self.host, mode, execution_calldata)?)
    }

    /// Execute on behalf of an installed executor module. No nonce is involved.
    pub fn execute_from_executor(
        &mut self,
        executor: Address,
        mode: ModeCode,
        execution_calldata: &[u8],
    ) -> Result<Vec<CallResult>, RequestError> {
        if !self.registry.is_executor_enabled(executor) {
            return Err(RequestError::ExecutorNotEnabled(executor));
        }
        Ok(execute_mode(&mut self.host, mode, execution_calldata)?)
    }

    /// The full nonce the next request on `key` must present.
    pub fn nonce_of(&self, key: ReplayKey) -> U256 {
        pack_nonce(key, self.nonces.sequence_of(key))
    }

    pub fn supports_mode(&self, mode: &ModeCode) -> bool {
        supports_mode_code(mode)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn registry_mut(&mut self) -> &mut R {
        &mut self.registry
    }

    pub fn nonces(&self) -> &S {
        &self.nonces
    }
}
