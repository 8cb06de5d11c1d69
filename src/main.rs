//! WRKChain Oracle
//!
//! # Architecture Overview
//!
//! ```text
//!   init      ──▶ keystore import (<datadir>/keys)
//!
//!   register  ──▶ genesis ──▶ registration guard ──▶ fee guard ──▶ registerWrkChain tx
//!                                   │                                      │
//!                                   ▼                                      ▼
//!                          RegisterWrkChain events ◀──────────── WRKChain Root (Mainchain)
//!
//!   record    ──▶ poll loop ──▶ WRKChain latest header ──▶ field selector
//!                     │                                          │
//!                     ▼                                          ▼
//!                fee guard, nonce sequencer ──────────▶ dispatcher ──▶ recordHeader tx
//! ```
//!
//! Every fatal error ends here: it is printed as `Fatal: <message>` and the process exits
//! with status 1.

use alloy::primitives::{Address, U256};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use wrkoracle::blockchain::{BlockchainClient, HeaderSource, LedgerClient, Wallet};
use wrkoracle::cli::{AccountArgs, Cli, Command, InitArgs, RecordArgs, RegisterArgs};
use wrkoracle::config::{load_config, read_secret, validate_config, ConfigError, OracleConfig};
use wrkoracle::lifecycle::{report_fatal, signals, startup, Shutdown};
use wrkoracle::observability::{logging, metrics};
use wrkoracle::oracle::authorised::parse_address_strict;
use wrkoracle::oracle::{AuthorisedSet, ChainIdentity, FeeGuard, Recorder, Registrar, SigningSession};
use wrkoracle::{OracleError, OracleResult};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load(&cli) {
        Ok(config) => config,
        Err(e) => {
            report_fatal(&e.to_string());
            return ExitCode::FAILURE;
        }
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "wrkoracle starting");

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let result = match &cli.command {
        Command::Init(args) => run_init(&config, args),
        Command::Register(args) => run_register(&config, args).await,
        Command::Record(args) => run_record(&config, args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_fatal(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

/// Config file, then command-line overrides, then validation.
fn load(cli: &Cli) -> Result<OracleConfig, ConfigError> {
    let mut config = load_config(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn run_init(config: &OracleConfig, args: &InitArgs) -> OracleResult<()> {
    let datadir = datadir(config)?;

    let password = required_secret(args.password.as_deref(), "Path to password file required")?;
    let key_path = args
        .key
        .as_deref()
        .ok_or_else(|| OracleError::Configuration("Path to private key file required".to_string()))?;
    let key = read_secret(key_path)?;

    let (wallet, created) = Wallet::import(&startup::keys_dir(&datadir), &key, &password)?;
    if created {
        tracing::info!(
            account = %wallet.address(),
            "Account created. You can now delete {}",
            key_path.display()
        );
    } else {
        tracing::info!(account = %wallet.address(), "Account already exists");
    }
    Ok(())
}

async fn run_register(config: &OracleConfig, args: &RegisterArgs) -> OracleResult<()> {
    let datadir = datadir(config)?;

    let genesis = args
        .genesis
        .as_deref()
        .ok_or_else(|| OracleError::Configuration("Path to genesis JSON file required".to_string()))?;
    let identity = ChainIdentity::from_genesis_file(genesis)?;
    tracing::info!(
        genesis_hash = %identity.genesis_hash,
        network_id = identity.network_id,
        "Registering WRKChain"
    );

    let auth = args.auth.as_deref().ok_or_else(|| {
        OracleError::Configuration("List of authorised addresses required".to_string())
    })?;

    let wallet = unlock(&datadir, &args.account)?;
    let authorised = AuthorisedSet::parse(wallet.address(), auth)?;
    for address in authorised.as_slice() {
        tracing::info!(address = %address, "Authorised address");
    }

    tracing::info!(rpc_url = %config.mainchain.rpc_url, "Connecting to Mainchain");
    let mainchain: Arc<dyn LedgerClient> =
        Arc::new(BlockchainClient::new(config.mainchain.clone())?.with_wallet(&wallet)?);

    let session = SigningSession::new(wallet, contract_address(config)?, config.contract.gas_limit);
    let mut registrar = Registrar::new(
        mainchain,
        session,
        fee_guard(config)?,
        config.retries.clone(),
        U256::from(config.contract.deposit_slot),
    );

    let registration = registrar.register(identity, &authorised).await?;
    tracing::info!(tx_hash = %registration.tx_hash, "Registration submitted");
    Ok(())
}

async fn run_record(config: &OracleConfig, args: &RecordArgs) -> OracleResult<()> {
    let datadir = datadir(config)?;

    if config.wrkchain.rpc_url.trim().is_empty() {
        return Err(OracleError::Configuration(
            "WRKChain JSON RPC endpoint required (--wrkchain.rpc)".to_string(),
        ));
    }

    let wallet = unlock(&datadir, &args.account)?;

    tracing::info!(rpc_url = %config.mainchain.rpc_url, "Connecting to Mainchain");
    let mainchain: Arc<dyn LedgerClient> =
        Arc::new(BlockchainClient::new(config.mainchain.clone())?.with_wallet(&wallet)?);

    tracing::info!(rpc_url = %config.wrkchain.rpc_url, "Connecting to WRKChain");
    let wrkchain: Arc<dyn HeaderSource> = Arc::new(BlockchainClient::new(config.wrkchain.clone())?);

    let session = SigningSession::new(wallet, contract_address(config)?, config.contract.gas_limit);
    let recorder = Recorder::new(
        mainchain,
        wrkchain,
        session,
        &config.record,
        fee_guard(config)?,
        config.retries.clone(),
    );

    let shutdown = Arc::new(Shutdown::new());
    let receiver = shutdown.subscribe();
    tokio::spawn(signals::listen_for_signals(shutdown.clone()));

    recorder.run(receiver).await
}

fn datadir(config: &OracleConfig) -> OracleResult<PathBuf> {
    let datadir = startup::expand_path(&config.datadir);
    startup::prepare_datadir(&datadir)?;
    Ok(datadir)
}

fn required_secret(path: Option<&Path>, missing: &str) -> OracleResult<String> {
    let path = path.ok_or_else(|| OracleError::Configuration(missing.to_string()))?;
    Ok(read_secret(path)?)
}

/// Unlock the operator account from `<datadir>/keys`.
fn unlock(datadir: &Path, args: &AccountArgs) -> OracleResult<Wallet> {
    let password = required_secret(args.password.as_deref(), "Path to password file required")?;
    let account = args
        .account
        .as_deref()
        .ok_or_else(|| OracleError::Configuration("Account to unlock required".to_string()))?;
    let account = parse_address_strict(account)?;

    Wallet::from_keystore(&startup::keys_dir(datadir), account, &password)
        .map_err(|e| OracleError::Configuration(format!("{}. Did you init first?", e)))
}

fn contract_address(config: &OracleConfig) -> OracleResult<Address> {
    config
        .contract
        .address
        .parse()
        .map_err(|e| OracleError::Configuration(format!("Invalid contract address: {}", e)))
}

fn fee_guard(config: &OracleConfig) -> OracleResult<FeeGuard> {
    let reserve = config
        .fees
        .reserve_wei
        .parse::<U256>()
        .map_err(|e| OracleError::Configuration(format!("Invalid fees.reserve_wei: {}", e)))?;
    Ok(FeeGuard::new(reserve))
}
