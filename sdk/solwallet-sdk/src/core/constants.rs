/// Local development validator
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8899";

/// Public test cluster used when no local node is running
pub const DEVNET_RPC_URL: &str = "https://api.devnet.solana.com";

pub const EXPLORER_BASE_URL: &str = "https://explorer.solana.com/tx";

/// Key under which the encoded secret is persisted
pub const SECRET_STORAGE_KEY: &str = "solwallet-secret";

pub const DEFAULT_STORE_PATH: &str = "~/.config/solwallet/store.json";

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;
pub const SOL_DECIMALS: u32 = 9;

/// ed25519 secret (32) + public key (32)
pub const KEYPAIR_LENGTH: usize = 64;

/// Upper bound on the recent transaction list
pub const MAX_RECENT_TRANSACTIONS: usize = 10;

pub const DEFAULT_CONFIRM_POLL_INTERVAL_MS: u64 = 500;
pub const DEFAULT_CONFIRM_TIMEOUT_SECS: u64 = 90;
