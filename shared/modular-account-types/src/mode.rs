//! Execution mode word codec.
//!
//! The account receives a 32-byte `mode` next to every execution payload. It tells the account
//! how to read the payload (call type) and how strictly to treat failures (exec type). The
//! remaining bytes are module-defined context that the account carries but never interprets.
//!
//! Layout (most significant byte first):
//! - byte `0`: call type
//! - byte `1`: exec type
//! - bytes `2..32`: context

use core::fmt;

use alloy_primitives::FixedBytes;

/// Width of the whole mode word.
pub const MODE_LEN: usize = 32;

pub const CALL_TYPE_OFFSET: usize = 0;
pub const CALL_TYPE_LEN: usize = 1;

pub const EXEC_TYPE_OFFSET: usize = CALL_TYPE_OFFSET + CALL_TYPE_LEN;
pub const EXEC_TYPE_LEN: usize = 1;

pub const CONTEXT_OFFSET: usize = EXEC_TYPE_OFFSET + EXEC_TYPE_LEN;
pub const CONTEXT_LEN: usize = MODE_LEN - CONTEXT_OFFSET;

/// Payload shape tag.
///
/// Kept as a raw byte so that reserved values survive a decode/encode cycle unchanged; the
/// dispatcher decides which values it can service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallType(pub u8);

impl CallType {
    pub const NONE: Self = Self(0x00);
    pub const SINGLE: Self = Self(0x01);
    pub const BATCH: Self = Self(0x02);
    pub const DELEGATECALL: Self = Self(0x03);

    /// Whether this value is one of the defined (non-reserved) tags.
    pub const fn is_defined(self) -> bool {
        self.0 <= Self::DELEGATECALL.0
    }
}

impl fmt::Display for CallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::NONE => f.write_str("none"),
            Self::SINGLE => f.write_str("single"),
            Self::BATCH => f.write_str("batch"),
            Self::DELEGATECALL => f.write_str("delegatecall"),
            Self(other) => write!(f, "reserved(0x{other:02x})"),
        }
    }
}

/// Failure policy tag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExecType(pub u8);

impl ExecType {
    pub const NONE: Self = Self(0x00);
    /// Strict: the first failing call aborts the whole request.
    pub const EXEC: Self = Self(0x01);
    /// Best effort: failures are recorded per call and execution continues.
    pub const TRY_EXEC: Self = Self(0x02);

    pub const fn is_defined(self) -> bool {
        self.0 <= Self::TRY_EXEC.0
    }
}

impl fmt::Display for ExecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::NONE => f.write_str("none"),
            Self::EXEC => f.write_str("exec"),
            Self::TRY_EXEC => f.write_str("try"),
            Self(other) => write!(f, "reserved(0x{other:02x})"),
        }
    }
}

/// Opaque module-defined metadata carried in the low 30 bytes of the mode word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ModeContext(pub [u8; CONTEXT_LEN]);

impl ModeContext {
    pub const ZERO: Self = Self([0u8; CONTEXT_LEN]);

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl Default for ModeContext {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<[u8; CONTEXT_LEN]> for ModeContext {
    fn from(bytes: [u8; CONTEXT_LEN]) -> Self {
        Self(bytes)
    }
}

/// The packed 32-byte execution mode word.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ModeCode(pub FixedBytes<MODE_LEN>);

impl ModeCode {
    /// Pack the three fields. Never fails; field ranges are enforced by the types.
    pub fn encode(call_type: CallType, exec_type: ExecType, context: ModeContext) -> Self {
        let mut word = [0u8; MODE_LEN];
        word[CALL_TYPE_OFFSET] = call_type.0;
        word[EXEC_TYPE_OFFSET] = exec_type.0;
        word[CONTEXT_OFFSET..CONTEXT_OFFSET + CONTEXT_LEN].copy_from_slice(&context.0);
        Self(FixedBytes(word))
    }

    /// Split the word back into its fields. Pure bit extraction; reserved tag values are
    /// returned as-is and left for the caller to reject.
    pub fn decode(&self) -> (CallType, ExecType, ModeContext) {
        (self.call_type(), self.exec_type(), self.context())
    }

    pub fn call_type(&self) -> CallType {
        CallType(self.0[CALL_TYPE_OFFSET])
    }

    pub fn exec_type(&self) -> ExecType {
        ExecType(self.0[EXEC_TYPE_OFFSET])
    }

    pub fn context(&self) -> ModeContext {
        let mut ctx = [0u8; CONTEXT_LEN];
        ctx.copy_from_slice(&self.0[CONTEXT_OFFSET..CONTEXT_OFFSET + CONTEXT_LEN]);
        ModeContext(ctx)
    }

    pub const fn from_bytes(bytes: [u8; MODE_LEN]) -> Self {
        Self(FixedBytes(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; MODE_LEN] {
        &self.0 .0
    }
}

impl From<FixedBytes<MODE_LEN>> for ModeCode {
    fn from(word: FixedBytes<MODE_LEN>) -> Self {
        Self(word)
    }
}

impl From<ModeCode> for FixedBytes<MODE_LEN> {
    fn from(mode: ModeCode) -> Self {
        mode.0
    }
}
