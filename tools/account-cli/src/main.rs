//! account-cli - tooling for the modular account contract.
//!
//! Builds the byte-level inputs the account consumes (mode words, execution calldata, 2D
//! nonces) and deploys the Stylus contract.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod deploy;
mod encode;

#[derive(Parser, Debug)]
#[command(name = "account-cli")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack a mode word from its call type, exec type and context.
    EncodeMode {
        /// single | batch | delegatecall | none | raw byte (eg 0x05)
        #[arg(long)]
        call_type: String,
        /// exec | try | none | raw byte
        #[arg(long)]
        exec_type: String,
        /// Up to 30 bytes of hex context (right-padded with zeros).
        #[arg(long, default_value = "0x")]
        context: String,
    },

    /// Split a mode word into its fields (JSON).
    DecodeMode {
        /// 32-byte hex word.
        word: String,
    },

    /// Encode execution calldata for a single (or delegatecall) execution.
    EncodeSingle {
        #[arg(long)]
        target: String,
        /// Decimal or 0x-prefixed hex amount.
        #[arg(long, default_value = "0")]
        value: String,
        #[arg(long, default_value = "0x")]
        data: String,
    },

    /// Encode execution calldata for a batch read from a JSON file.
    ///
    /// The file holds `[{"target": "0x..", "value": "0", "data": "0x.."}, ...]`.
    EncodeBatch {
        #[arg(long)]
        file: PathBuf,
    },

    /// Wrap a mode word and execution calldata into `execute(bytes32,bytes)` calldata.
    ExecuteCalldata {
        #[arg(long)]
        mode: String,
        #[arg(long)]
        calldata: String,
        /// Encode `executeFromExecutor` instead.
        #[arg(long)]
        from_executor: bool,
    },

    /// Build `validateNonce(uint256,bytes32,bytes)` calldata for a request.
    ValidateCalldata {
        #[arg(long)]
        nonce: String,
        #[arg(long)]
        mode: String,
        #[arg(long)]
        calldata: String,
    },

    /// Pack or unpack 2D nonces.
    #[command(subcommand)]
    Nonce(NonceCommand),

    /// Deploy the contract with `cargo stylus deploy` and record it in a deployments JSON.
    Deploy(deploy::DeployArgs),
}

#[derive(Subcommand, Debug)]
enum NonceCommand {
    /// Build the nonce for `sequence` on the stream of `validator`/`discriminator`.
    Pack {
        #[arg(long)]
        validator: String,
        #[arg(long, default_value_t = 0)]
        discriminator: u32,
        #[arg(long, default_value_t = 0)]
        sequence: u64,
    },
    /// Split a nonce into validator, discriminator and sequence (JSON).
    Unpack { nonce: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let output = match cli.command {
        Commands::EncodeMode {
            call_type,
            exec_type,
            context,
        } => encode::encode_mode(&call_type, &exec_type, &context)?,
        Commands::DecodeMode { word } => encode::decode_mode(&word)?,
        Commands::EncodeSingle {
            target,
            value,
            data,
        } => encode::encode_single_execution(&target, &value, &data)?,
        Commands::EncodeBatch { file } => encode::encode_batch_file(&file)?,
        Commands::ExecuteCalldata {
            mode,
            calldata,
            from_executor,
        } => encode::execute_calldata(&mode, &calldata, from_executor)?,
        Commands::ValidateCalldata {
            nonce,
            mode,
            calldata,
        } => encode::validate_calldata(&nonce, &mode, &calldata)?,
        Commands::Nonce(NonceCommand::Pack {
            validator,
            discriminator,
            sequence,
        }) => encode::pack(&validator, discriminator, sequence)?,
        Commands::Nonce(NonceCommand::Unpack { nonce }) => encode::unpack(&nonce)?,
        Commands::Deploy(args) => deploy::run(&args)?,
    };

    println!("{output}");
    Ok(())
}
