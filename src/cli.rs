//! Command-line interface.
//!
//! Flags mirror the configuration file; anything given on the command line wins.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::schema::{OracleConfig, DEFAULT_MAINCHAIN_TESTNET_RPC};

#[derive(Parser, Debug)]
#[command(name = "wrkoracle", version)]
#[command(about = "WRKChain Oracle: registers a WRKChain on UND Mainchain and records its block header hashes")]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory for the keystore and data
    #[arg(long, global = true, value_name = "DIR")]
    pub datadir: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialise the Oracle, importing a private key into the local keystore
    Init(InitArgs),
    /// Register a WRKChain on UND Mainchain
    Register(RegisterArgs),
    /// Record WRKChain block header hashes on UND Mainchain
    Record(RecordArgs),
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path to the account password file
    #[arg(long, value_name = "FILE")]
    pub password: Option<PathBuf>,

    /// Path to the raw private key file
    #[arg(long, value_name = "FILE")]
    pub key: Option<PathBuf>,
}

/// Account to unlock from the keystore.
#[derive(Args, Debug)]
pub struct AccountArgs {
    /// Account used to write to the WRKChain Root contract, e.g. 0x160B51e6…
    #[arg(long, value_name = "ADDR")]
    pub account: Option<String>,

    /// Path to the account password file
    #[arg(long, value_name = "FILE")]
    pub password: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct MainchainArgs {
    /// Mainchain JSON-RPC endpoint
    #[arg(long = "mainchain.rpc", value_name = "URL")]
    pub mainchain_rpc: Option<String>,

    /// Use the UND test network endpoint
    #[arg(long = "und-testnet")]
    pub und_testnet: bool,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[command(flatten)]
    pub account: AccountArgs,

    /// Path to the WRKChain's genesis.json
    #[arg(long, value_name = "FILE")]
    pub genesis: Option<PathBuf>,

    /// Comma separated addresses authorised to record headers, e.g. 0xabc…,0xdef…
    #[arg(long, value_name = "LIST")]
    pub auth: Option<String>,

    #[command(flatten)]
    pub mainchain: MainchainArgs,
}

#[derive(Args, Debug)]
pub struct RecordArgs {
    #[command(flatten)]
    pub account: AccountArgs,

    #[command(flatten)]
    pub mainchain: MainchainArgs,

    /// WRKChain JSON-RPC endpoint, e.g. http://localhost:8101
    #[arg(long = "wrkchain.rpc", value_name = "URL")]
    pub wrkchain_rpc: Option<String>,

    /// Seconds between two records
    #[arg(long, value_name = "SECS")]
    pub freq: Option<u64>,

    /// Also record the parent hash
    #[arg(long = "hash.parent")]
    pub hash_parent: bool,

    /// Also record the receipt root
    #[arg(long = "hash.receipt")]
    pub hash_receipt: bool,

    /// Also record the transaction root
    #[arg(long = "hash.tx")]
    pub hash_tx: bool,

    /// Also record the state root
    #[arg(long = "hash.state")]
    pub hash_state: bool,
}

impl Cli {
    /// Overlay command-line values on a loaded configuration.
    pub fn apply_overrides(&self, config: &mut OracleConfig) {
        if let Some(datadir) = &self.datadir {
            config.datadir = datadir.clone();
        }

        match &self.command {
            Command::Init(_) => {}
            Command::Register(args) => args.mainchain.apply(config),
            Command::Record(args) => {
                args.mainchain.apply(config);
                if let Some(url) = &args.wrkchain_rpc {
                    config.wrkchain.rpc_url = url.trim().to_string();
                }
                if let Some(freq) = args.freq {
                    config.record.frequency_secs = freq;
                }
                config.record.include_parent |= args.hash_parent;
                config.record.include_receipt |= args.hash_receipt;
                config.record.include_tx |= args.hash_tx;
                config.record.include_state |= args.hash_state;
            }
        }
    }
}

impl MainchainArgs {
    fn apply(&self, config: &mut OracleConfig) {
        if let Some(url) = &self.mainchain_rpc {
            config.mainchain.rpc_url = url.trim().to_string();
        } else if self.und_testnet {
            config.mainchain.rpc_url = DEFAULT_MAINCHAIN_TESTNET_RPC.to_string();
        }
    }
}
