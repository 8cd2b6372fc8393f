//! Encoders for the byte-level inputs the account consumes.
//!
//! Every command returns the text to print: hex for encoded values, pretty JSON for decoded
//! ones.

use std::{fs, path::Path, str::FromStr};

use alloy_primitives::{Address, Bytes, FixedBytes, U256};
use alloy_sol_types::{sol, SolCall};
use anyhow::{anyhow, bail, Context, Result};
use modular_account_types::{
    encode_batch, encode_single, mode::CONTEXT_LEN, pack_nonce, unpack_nonce, CallType, ExecType,
    Execution, ModeCode, ModeContext, ReplayKey,
};
use serde::{Deserialize, Serialize};

sol! {
    interface IERC7579Execution {
        function execute(bytes32 mode, bytes executionCalldata) external payable returns (bool[] success, bytes[] returnData);
        function executeFromExecutor(bytes32 mode, bytes executionCalldata) external payable returns (bool[] success, bytes[] returnData);
        function validateNonce(uint256 nonce, bytes32 mode, bytes executionCalldata) external;
    }
}

/// One entry of a batch file.
#[derive(Debug, Deserialize)]
pub struct CallSpec {
    pub target: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Serialize)]
struct ModeView {
    call_type: String,
    call_type_byte: u8,
    call_type_defined: bool,
    exec_type: String,
    exec_type_byte: u8,
    exec_type_defined: bool,
    context: String,
}

#[derive(Debug, Serialize)]
struct NonceView {
    validator: String,
    discriminator: u32,
    sequence: u64,
    key: String,
}

pub fn encode_mode(call_type: &str, exec_type: &str, context: &str) -> Result<String> {
    let mode = ModeCode::encode(
        parse_call_type(call_type)?,
        parse_exec_type(exec_type)?,
        parse_context(context)?,
    );
    tracing::debug!(%call_type, %exec_type, "encoded mode word");
    Ok(to_hex(mode.as_bytes()))
}

pub fn decode_mode(word: &str) -> Result<String> {
    let mode = parse_mode(word)?;
    let (call_type, exec_type, context) = mode.decode();
    let view = ModeView {
        call_type: call_type.to_string(),
        call_type_byte: call_type.0,
        call_type_defined: call_type.is_defined(),
        exec_type: exec_type.to_string(),
        exec_type_byte: exec_type.0,
        exec_type_defined: exec_type.is_defined(),
        context: to_hex(context.as_slice()),
    };
    serde_json::to_string_pretty(&view).context("failed serialising mode")
}

pub fn encode_single_execution(target: &str, value: &str, data: &str) -> Result<String> {
    let execution = parse_execution(target, Some(value), Some(data))?;
    Ok(to_hex(&encode_single(&execution)))
}

pub fn encode_batch_file(path: &Path) -> Result<String> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed reading {}", path.display()))?;
    let specs: Vec<CallSpec> = serde_json::from_str(&raw)
        .with_context(|| format!("failed parsing JSON in {}", path.display()))?;

    let executions = specs
        .iter()
        .enumerate()
        .map(|(i, call)| {
            parse_execution(&call.target, call.value.as_deref(), call.data.as_deref())
                .with_context(|| format!("call #{i}"))
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::info!(calls = executions.len(), "encoded batch");
    Ok(to_hex(&encode_batch(&executions)))
}

pub fn execute_calldata(mode: &str, calldata: &str, from_executor: bool) -> Result<String> {
    let mode: FixedBytes<32> = parse_mode(mode)?.into();
    let payload = Bytes::from(parse_hex(calldata)?);
    let encoded = if from_executor {
        IERC7579Execution::executeFromExecutorCall {
            mode,
            executionCalldata: payload,
        }
        .abi_encode()
    } else {
        IERC7579Execution::executeCall {
            mode,
            executionCalldata: payload,
        }
        .abi_encode()
    };
    Ok(to_hex(&encoded))
}

/// `validateNonce` calldata admitting `nonce` for the request `(mode, calldata)`.
pub fn validate_calldata(nonce: &str, mode: &str, calldata: &str) -> Result<String> {
    let call = IERC7579Execution::validateNonceCall {
        nonce: parse_u256(nonce)?,
        mode: parse_mode(mode)?.into(),
        executionCalldata: Bytes::from(parse_hex(calldata)?),
    };
    Ok(to_hex(&call.abi_encode()))
}

pub fn pack(validator: &str, discriminator: u32, sequence: u64) -> Result<String> {
    let key = ReplayKey::new(parse_address(validator)?, discriminator);
    Ok(to_hex(&pack_nonce(key, sequence).to_be_bytes::<32>()))
}

pub fn unpack(nonce: &str) -> Result<String> {
    let nonce = parse_u256(nonce)?;
    let (key, sequence) = unpack_nonce(nonce);
    let view = NonceView {
        validator: key.validator().to_string(),
        discriminator: key.discriminator(),
        sequence,
        key: to_hex(key.as_bytes()),
    };
    serde_json::to_string_pretty(&view).context("failed serialising nonce")
}

fn parse_execution(target: &str, value: Option<&str>, data: Option<&str>) -> Result<Execution> {
    let value = match value {
        Some(v) => parse_u256(v)?,
        None => U256::ZERO,
    };
    let data = match data {
        Some(d) => parse_hex(d)?,
        None => Vec::new(),
    };
    Ok(Execution::new(parse_address(target)?, value, data))
}

fn parse_call_type(s: &str) -> Result<CallType> {
    match s.to_ascii_lowercase().as_str() {
        "none" => Ok(CallType::NONE),
        "single" => Ok(CallType::SINGLE),
        "batch" => Ok(CallType::BATCH),
        "delegatecall" | "delegate" => Ok(CallType::DELEGATECALL),
        other => parse_tag_byte(other).map(CallType),
    }
}

fn parse_exec_type(s: &str) -> Result<ExecType> {
    match s.to_ascii_lowercase().as_str() {
        "none" => Ok(ExecType::NONE),
        "exec" | "strict" => Ok(ExecType::EXEC),
        "try" | "try_exec" | "best-effort" => Ok(ExecType::TRY_EXEC),
        other => parse_tag_byte(other).map(ExecType),
    }
}

fn parse_tag_byte(s: &str) -> Result<u8> {
    let parsed = match s.strip_prefix("0x") {
        Some(h) => u8::from_str_radix(h, 16),
        None => s.parse::<u8>(),
    };
    parsed.map_err(|_| anyhow!("unknown tag `{s}`: expected a name or a byte value"))
}

fn parse_context(s: &str) -> Result<ModeContext> {
    let bytes = parse_hex(s)?;
    if bytes.len() > CONTEXT_LEN {
        bail!("context is {} bytes; at most {CONTEXT_LEN} fit in the mode word", bytes.len());
    }
    let mut ctx = [0u8; CONTEXT_LEN];
    ctx[..bytes.len()].copy_from_slice(&bytes);
    Ok(ModeContext(ctx))
}

fn parse_mode(s: &str) -> Result<ModeCode> {
    let bytes = parse_hex(s)?;
    let word: [u8; 32] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| anyhow!("mode word must be 32 bytes, got {}", bytes.len()))?;
    Ok(ModeCode::from_bytes(word))
}

fn parse_address(s: &str) -> Result<Address> {
    Address::from_str(s.trim()).with_context(|| format!("invalid address `{s}`"))
}

fn parse_u256(s: &str) -> Result<U256> {
    U256::from_str(s.trim()).map_err(|e| anyhow!("invalid integer `{s}`: {e}"))
}

fn parse_hex(s: &str) -> Result<Vec<u8>> {
    let s = s.trim();
    let s = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(s).with_context(|| format!("invalid hex `{s}`"))
}

fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}
