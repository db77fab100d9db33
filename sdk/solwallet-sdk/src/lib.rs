pub mod amount;
pub mod basic;
pub mod core;
pub mod error;
pub mod types;

pub use crate::basic::keypair::{parse_address, EncodedSecret, WalletKeypair};
pub use crate::basic::ledger::LedgerClient;
pub use crate::basic::secret_store::{SecretStore, StoredSecret};
pub use crate::basic::session::WalletSession;
pub use crate::basic::transfer::{build_transfer, SignedTransfer, TransferBuilder};
pub use crate::core::config::{Cluster, Commitment, WalletConfig};
pub use crate::core::connection::{RpcConnection, SolConnection};
pub use crate::core::signer::WalletSigner;
pub use crate::core::storage::{FileStore, KeyValueStore, MemoryStore};
pub use crate::error::{ErrorKind, Result, WalletError};
pub use crate::types::{
    BlockhashAnchor, RecentTransaction, SignatureStatus, TransactionKind, TransferIntent,
    WalletStatus,
};
