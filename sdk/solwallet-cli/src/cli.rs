//! Command-line surface for `solwallet`, built with `clap` derive.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Single-account wallet for a Solana cluster.
///
/// The keypair is kept in a local store and restored on every run. A
/// missing or unreadable stored secret is replaced with a fresh keypair.
#[derive(Parser, Debug)]
#[command(name = "solwallet", version, propagate_version = true)]
pub struct SolwalletCli {
    /// JSON config file; fields it omits keep their defaults
    #[arg(long, short = 'c', env = "SOLWALLET_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Named cluster (`localnet`, `devnet`) or an RPC URL
    #[arg(long, global = true)]
    pub cluster: Option<String>,

    /// RPC endpoint; takes precedence over `--cluster` and `RPC_URL`
    #[arg(long, global = true)]
    pub rpc_url: Option<String>,

    /// Path of the secret store file
    #[arg(long, env = "SOLWALLET_STORE", global = true)]
    pub store: Option<String>,

    /// Wait for `finalized` instead of `confirmed`
    #[arg(long, global = true)]
    pub finalized: bool,

    #[arg(long, value_enum, default_value_t = LogFormatArg::Pretty, global = true)]
    pub log_format: LogFormatArg,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the active wallet address.
    Address,
    /// Fetch and print the balance in SOL.
    Balance,
    /// Request test funds from the cluster faucet.
    Airdrop {
        /// Amount in SOL, e.g. `1` or `0.5`
        amount: String,
    },
    /// Send SOL to another address and wait for confirmation.
    Transfer {
        /// Recipient address (base-58)
        to: String,
        /// Amount in SOL
        amount: String,
    },
    /// Print the base-58 encoded secret key.
    Export,
    /// Replace the active keypair with an encoded secret key.
    Import {
        /// Base-58 encoded 64-byte secret key
        secret: String,
    },
    /// Replace the active keypair with a fresh random one.
    Generate,
    /// Forget the stored secret key.
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Json,
}
