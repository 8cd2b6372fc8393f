//! Execution strategy table and the capability query built on it.
//!
//! [`ExecutionStrategy::resolve`] is the only place that maps raw mode tags to behaviour. The
//! dispatcher and [`supports_mode`] both go through it, so they cannot disagree.

use modular_account_types::{CallType, ExecType, ModeCode};

/// How the execution calldata is shaped and how each call is performed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
    Single,
    Batch,
    DelegateCall,
}

/// What happens when a call fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailurePolicy {
    /// Abort the whole request on the first failure.
    Strict,
    /// Record the failure and continue with the next call.
    BestEffort,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ExecutionStrategy {
    pub kind: CallKind,
    pub policy: FailurePolicy,
}

impl ExecutionStrategy {
    /// Resolve raw tags into a strategy. `None` means the pair has no handler.
    pub fn resolve(call_type: CallType, exec_type: ExecType) -> Option<Self> {
        let kind = match call_type {
            CallType::SINGLE => CallKind::Single,
            CallType::BATCH => CallKind::Batch,
            CallType::DELEGATECALL => CallKind::DelegateCall,
            _ => return None,
        };
        let policy = match exec_type {
            ExecType::EXEC => FailurePolicy::Strict,
            ExecType::TRY_EXEC => FailurePolicy::BestEffort,
            _ => return None,
        };
        Some(Self { kind, policy })
    }

    pub fn from_mode(mode: &ModeCode) -> Option<Self> {
        Self::resolve(mode.call_type(), mode.exec_type())
    }

    /// The tags this strategy is reached from.
    pub fn tags(&self) -> (CallType, ExecType) {
        let call_type = match self.kind {
            CallKind::Single => CallType::SINGLE,
            CallKind::Batch => CallType::BATCH,
            CallKind::DelegateCall => CallType::DELEGATECALL,
        };
        let exec_type = match self.policy {
            FailurePolicy::Strict => ExecType::EXEC,
            FailurePolicy::BestEffort => ExecType::TRY_EXEC,
        };
        (call_type, exec_type)
    }
}

/// Whether the dispatcher can service this tag pair. No side effects.
pub fn supports_mode(call_type: CallType, exec_type: ExecType) -> bool {
    ExecutionStrategy::resolve(call_type, exec_type).is_some()
}

/// [`supports_mode`] over a packed mode word; the context bytes are ignored.
pub fn supports_mode_code(mode: &ModeCode) -> bool {
    supports_mode(mode.call_type(), mode.exec_type())
}
