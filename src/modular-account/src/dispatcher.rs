use alloc::vec::Vec;

use modular_account_types::{
    decode_batch, decode_delegatecall, decode_single, CallHost, Execution, ModeCode,
};

use crate::{
    capability::{CallKind, ExecutionStrategy, FailurePolicy},
    errors::ExecutionError,
};

/// Outcome of one forwarded call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallResult {
    pub success: bool,
    /// Return data on success, revert data on failure.
    pub return_data: Vec<u8>,
}

impl CallResult {
    pub fn success(return_data: Vec<u8>) -> Self {
        Self {
            success: true,
            return_data,
        }
    }

    pub fn failure(revert_data: Vec<u8>) -> Self {
        Self {
            success: false,
            return_data: revert_data,
        }
    }
}

/// A decoded request, ready to run. Building one has no side effects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionPlan {
    pub strategy: ExecutionStrategy,
    pub calls: Vec<Execution>,
}

/// Decode the mode word and the execution calldata it describes.
pub fn plan(mode: ModeCode, execution_calldata: &[u8]) -> Result<ExecutionPlan, ExecutionError> {
    let (call_type, exec_type, _context) = mode.decode();
    let strategy = ExecutionStrategy::resolve(call_type, exec_type).ok_or(
        ExecutionError::UnsupportedMode {
            call_type,
            exec_type,
        },
    )?;

    let calls = match strategy.kind {
        CallKind::Single => alloc::vec![decode_single(execution_calldata)?],
        CallKind::DelegateCall => alloc::vec![decode_delegatecall(execution_calldata)?],
        CallKind::Batch => decode_batch(execution_calldata)?,
    };

    Ok(ExecutionPlan { strategy, calls })
}

/// Perform the planned calls in order.
///
/// Strict plans stop at the first failure and return it as the error of the whole request;
/// effects of earlier calls are left to the enclosing transaction to undo. Best-effort plans
/// always run every call and report one result per call, in input order.
pub fn run<H: CallHost + ?Sized>(
    host: &mut H,
    plan: &ExecutionPlan,
) -> Result<Vec<CallResult>, ExecutionError> {
    let mut results = Vec::with_capacity(plan.calls.len());

    for (index, call) in plan.calls.iter().enumerate() {
        let outcome = match plan.strategy.kind {
            CallKind::Single | CallKind::Batch => {
                host.call(call.target, call.value, &call.call_data)
            }
            CallKind::DelegateCall => host.delegate_call(call.target, &call.call_data),
        };

        match (outcome, plan.strategy.policy) {
            (Ok(return_data), _) => results.push(CallResult::success(return_data)),
            (Err(revert_data), FailurePolicy::Strict) => {
                return Err(ExecutionError::CallFailure { index, revert_data });
            }
            (Err(revert_data), FailurePolicy::BestEffort) => {
                stylus_sdk::console!("call {} to {} failed, continuing", index, call.target);
                results.push(CallResult::failure(revert_data));
            }
        }
    }

    Ok(results)
}

/// Decode and execute in one step.
pub fn execute_mode<H: CallHost + ?Sized>(
    host: &mut H,
    mode: ModeCode,
    execution_calldata: &[u8],
) -> Result<Vec<CallResult>, ExecutionError> {
    let plan = plan(mode, execution_calldata)?;
    run(host, &plan)
}
