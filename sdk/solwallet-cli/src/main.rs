//! `solwallet`: command-line view over [`WalletSession`].
//!
//! Each invocation restores the stored keypair, runs one operation and
//! prints its result on stdout.

mod cli;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use solwallet_sdk::amount::format_sol;
use solwallet_sdk::{
    Cluster, Commitment, FileStore, LedgerClient, RpcConnection, SecretStore, WalletConfig,
    WalletError, WalletSession,
};
use std::sync::Arc;

use cli::{Commands, SolwalletCli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = SolwalletCli::parse();
    logging::init_logging("info", cli.log_format);

    let config = load_config(&cli)?;
    tracing::debug!(
        rpc_url = config.rpc_url(),
        store = %config.store_path().display(),
        "configuration loaded"
    );

    let ledger = LedgerClient::new(RpcConnection::from_config(&config), &config);
    let store = SecretStore::new(Arc::new(FileStore::new(config.store_path())));
    let session = WalletSession::open(ledger, store, config);
    let opened_with = report_warning(&session, None);

    let result = run(&session, cli.command).await;
    if let Err(e) = &result {
        let pending = e
            .downcast_ref::<WalletError>()
            .and_then(WalletError::pending_signature);
        if let Some(signature) = pending {
            eprintln!("{} may still land: {}", signature, session.explorer_url(&signature));
        }
    }
    report_warning(&session, opened_with.as_deref());
    result
}

/// Print the session warning unless it was already shown
fn report_warning(session: &WalletSession<RpcConnection>, shown: Option<&str>) -> Option<String> {
    let warning = session.warning();
    if let Some(text) = unseen_warning(warning.as_deref(), shown) {
        eprintln!("warning: {}", text);
    }
    warning
}

fn unseen_warning<'a>(current: Option<&'a str>, shown: Option<&str>) -> Option<&'a str> {
    current.filter(|text| Some(*text) != shown)
}

/// Defaults, then the config file, then environment, then flags
fn load_config(cli: &SolwalletCli) -> Result<WalletConfig> {
    let mut config = match &cli.config {
        Some(path) => WalletConfig::from_json_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => WalletConfig::default(),
    };
    config.apply_env();

    if let Some(cluster) = &cli.cluster {
        let cluster: Cluster = cluster
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .context("invalid --cluster")?;
        config = config.with_cluster(cluster);
    }
    if let Some(url) = &cli.rpc_url {
        config = config.with_cluster(Cluster::Custom(url.clone()));
    }
    if let Some(store) = &cli.store {
        config.store_path = store.clone();
    }
    if cli.finalized {
        config = config.with_commitment(Commitment::Finalized);
    }
    Ok(config)
}

async fn run(session: &WalletSession<RpcConnection>, command: Commands) -> Result<()> {
    match command {
        Commands::Address => {
            let address = session.address().context("wallet has no active keypair")?;
            println!("{}", address);
        },
        Commands::Balance => match session.refresh_balance().await? {
            Some(lamports) => println!("{} SOL", format_sol(lamports)),
            None => println!("balance unavailable"),
        },
        Commands::Airdrop { amount } => {
            let signature = session.airdrop(&amount).await?;
            println!("{}", signature);
            println!("{}", session.explorer_url(&signature));
            print_balance(session);
        },
        Commands::Transfer { to, amount } => {
            let signature = session.transfer(&to, &amount).await?;
            println!("{}", signature);
            println!("{}", session.explorer_url(&signature));
            print_balance(session);
        },
        Commands::Export => {
            let secret = session.export()?;
            println!("{}", secret.expose());
        },
        Commands::Import { secret } => {
            let address = session.import(secret)?;
            println!("{}", address);
        },
        Commands::Generate => {
            let address = session.generate()?;
            println!("{}", address);
        },
        Commands::Clear => {
            let address = session.clear()?;
            println!("{}", address);
        },
    }

    Ok(())
}

fn print_balance(session: &WalletSession<RpcConnection>) {
    if let Some(lamports) = session.balance() {
        println!("balance: {} SOL", format_sol(lamports));
    }
}
