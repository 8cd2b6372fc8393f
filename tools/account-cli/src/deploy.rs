//! Deploy the account with `cargo stylus deploy`, then write/update a deployments JSON.
//!
//! The entry point and module registry are constructor arguments: they are fixed in the
//! deployment transaction itself, so nobody can configure the account between deploy and use.

use std::{
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use alloy_primitives::Address;
use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use regex::Regex;
use serde_json::{json, Value};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// Raw deploy output kept in the deployments file is cut to this many bytes.
const MAX_RAW_OUTPUT: usize = 16_000;

#[derive(Args, Debug)]
pub struct DeployArgs {
    /// Directory containing the Stylus contract crate (where `cargo stylus deploy` runs).
    #[arg(long, default_value = "src/modular-account")]
    pub contract_dir: PathBuf,

    /// RPC URL used by `cargo stylus deploy`.
    #[arg(long, env = "RPC_URL")]
    pub rpc_url: String,

    /// Path to a file containing the deployer private key.
    #[arg(long, env = "PRIV_KEY_PATH", conflicts_with = "private_key")]
    pub private_key_path: Option<String>,

    /// Private key (hex string, 0x...).
    #[arg(long, env = "PKEY", conflicts_with = "private_key_path")]
    pub private_key: Option<String>,

    /// Entry point allowed to validate and execute requests (constructor argument).
    #[arg(long, env = "ENTRY_POINT")]
    pub entry_point: Address,

    /// Module registry queried for validators and executors (constructor argument).
    #[arg(long, env = "MODULE_REGISTRY")]
    pub registry: Address,

    /// Path to write deployment info (eg, deployments.devnet.json).
    #[arg(long, default_value = "deployments.devnet.json")]
    pub deployments_path: PathBuf,

    /// Key under `deployments` to store this contract.
    #[arg(long, default_value = "modular-account")]
    pub contract_key: String,

    /// Network name (eg, devnet, arb-sepolia).
    #[arg(long, default_value = "devnet")]
    pub network: String,

    /// Extra args passed through to `cargo stylus deploy` (after `--`), eg `-- --estimate-gas`.
    #[arg(last = true)]
    pub passthrough: Vec<String>,
}

/// What a successful deploy reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub address: String,
    pub tx_hashes: Vec<String>,
    pub raw_output: String,
}

pub fn run(args: &DeployArgs) -> Result<String> {
    let deployment = deploy(args)?;
    let now = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    let existing = read_deployments(&args.deployments_path)?;
    let updated = record_deployment(existing, args, &deployment, &now);
    replace_deployments(&args.deployments_path, &updated)?;

    tracing::info!(
        contract = %args.contract_key,
        address = %deployment.address,
        entry_point = %args.entry_point,
        registry = %args.registry,
        path = %args.deployments_path.display(),
        "deployment recorded"
    );
    Ok(format!("Deployed `{}` to {}", args.contract_key, deployment.address))
}

/// Constructor arguments in ABI order: `(address entryPoint, address registry)`.
fn constructor_args(args: &DeployArgs) -> Result<[String; 2]> {
    if args.entry_point == Address::ZERO {
        bail!("--entry-point must not be the zero address");
    }
    if args.registry == Address::ZERO {
        bail!("--registry must not be the zero address");
    }
    Ok([args.entry_point.to_string(), args.registry.to_string()])
}

/// Build the `cargo stylus deploy` invocation without running it.
fn deploy_command(args: &DeployArgs) -> Result<Command> {
    let (key_flag, key) = match (&args.private_key_path, &args.private_key) {
        (Some(path), _) => ("--private-key-path", path),
        (None, Some(key)) => ("--private-key", key),
        (None, None) => bail!(
            "missing deployer key: provide --private-key-path or --private-key (or set PRIV_KEY_PATH/PKEY)"
        ),
    };
    let [entry_point, registry] = constructor_args(args)?;

    let mut cmd = Command::new("cargo");
    cmd.current_dir(&args.contract_dir)
        .args(["stylus", "deploy", "-e"])
        .arg(&args.rpc_url)
        .arg(key_flag)
        .arg(key)
        .arg("--constructor-args")
        .arg(entry_point)
        .arg(registry)
        .args(&args.passthrough)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    Ok(cmd)
}

fn deploy(args: &DeployArgs) -> Result<Deployment> {
    let mut cmd = deploy_command(args)?;

    tracing::debug!(dir = %args.contract_dir.display(), "running cargo stylus deploy");
    let output = cmd
        .output()
        .context("failed to run `cargo stylus deploy`")?;
    let combined = format!(
        "{}\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );

    if !output.status.success() {
        bail!("`cargo stylus deploy` failed (exit {}):\n{combined}", output.status);
    }
    parse_deploy_output(&combined)
}

/// Pull the deployed address and confirmed tx hashes out of `cargo stylus deploy` output.
///
/// Lines looked for:
///   Deploying program to address 0x...
///   Confirmed tx 0x...
fn parse_deploy_output(output: &str) -> Result<Deployment> {
    let re_address = Regex::new(r"Deploying program to address (0x[a-fA-F0-9]{40})")?;
    let re_tx = Regex::new(r"Confirmed tx (0x[a-fA-F0-9]{64})")?;

    let address = re_address
        .captures(output)
        .and_then(|c| c.get(1).map(|m| m.as_str().to_string()))
        .ok_or_else(|| anyhow!("could not parse deployed address from `cargo stylus deploy` output"))?;

    let tx_hashes = re_tx
        .captures_iter(output)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect();

    Ok(Deployment {
        address,
        tx_hashes,
        raw_output: output.to_string(),
    })
}

fn read_deployments(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Ok(json!({}));
    }
    let existing =
        fs::read_to_string(path).with_context(|| format!("failed reading {}", path.display()))?;
    if existing.trim().is_empty() {
        return Ok(json!({}));
    }
    serde_json::from_str(&existing)
        .with_context(|| format!("failed parsing JSON in {}", path.display()))
}

/// Merge one deployment into the deployments document, keeping other contracts' entries.
fn record_deployment(mut root: Value, args: &DeployArgs, deployment: &Deployment, now: &str) -> Value {
    if !root.is_object() {
        root = json!({});
    }
    root["network"] = json!(args.network);
    root["updated_at"] = json!(now);

    if root.get("deployments").and_then(Value::as_object).is_none() {
        root["deployments"] = json!({});
    }

    let mut entry = json!({
        "address": deployment.address,
        "rpc_url": args.rpc_url,
        "deployed_at": now,
        "constructor": {
            "entry_point": args.entry_point.to_string(),
            "registry": args.registry.to_string(),
        },
    });
    if !deployment.tx_hashes.is_empty() {
        entry["tx_hashes"] = json!(deployment.tx_hashes);
    }

    let trimmed = deployment.raw_output.trim();
    if !trimmed.is_empty() {
        entry["cargo_stylus_output"] = json!(truncate_utf8(trimmed, MAX_RAW_OUTPUT));
    }

    root["deployments"][&args.contract_key] = entry;
    root
}

fn truncate_utf8(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Hidden sibling the new document is staged in before it replaces `path`.
fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .unwrap_or_else(|| OsStr::new("deployments.json"))
        .to_string_lossy();
    path.with_file_name(format!(".{name}.partial"))
}

/// Replace the deployments file in one rename, so readers never see a half-written document.
fn replace_deployments(path: &Path, root: &Value) -> Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("failed creating {}", dir.display()))?;
    }

    let mut document =
        serde_json::to_vec_pretty(root).context("failed serialising deployments JSON")?;
    document.push(b'\n');

    let staged = staging_path(path);
    fs::write(&staged, &document)
        .with_context(|| format!("failed staging {}", staged.display()))?;
    fs::rename(&staged, path).with_context(|| format!("failed replacing {}", path.display()))
}
