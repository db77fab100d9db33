use crate::core::constants::MAX_RECENT_TRANSACTIONS;
use crate::error::ErrorKind;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use std::collections::VecDeque;

/// Freshness token for a transaction: a recent blockhash and the last block
/// height at which the node will still accept it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockhashAnchor {
    pub blockhash: Hash,
    pub last_valid_block_height: u64,
}

impl BlockhashAnchor {
    pub fn new(blockhash: Hash, last_valid_block_height: u64) -> Self {
        Self {
            blockhash,
            last_valid_block_height,
        }
    }

    /// Whether the node at `block_height` has moved past this anchor
    pub fn is_expired_at(&self, block_height: u64) -> bool {
        block_height > self.last_valid_block_height
    }
}

/// A validated request to move lamports from the active wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferIntent {
    pub from: Pubkey,
    pub to: Pubkey,
    pub lamports: u64,
}

/// Node-reported progress of a submitted signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureStatus {
    /// Seen but not yet at `confirmed`
    Processed,
    Confirmed,
    Finalized,
    /// Landed with an execution error
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Airdrop,
    Transfer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentTransaction {
    pub signature: Signature,
    pub kind: TransactionKind,
    pub lamports: u64,
    /// False when the confirmation window elapsed before the node attested it
    pub confirmed: bool,
}

/// Bounded recency list of submitted signatures, newest first.
#[derive(Debug, Clone, Default)]
pub struct RecentTransactions {
    entries: VecDeque<RecentTransaction>,
}

impl RecentTransactions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the front, replacing any entry with the same signature.
    pub fn record(&mut self, entry: RecentTransaction) {
        self.entries.retain(|e| e.signature != entry.signature);
        self.entries.push_front(entry);
        self.entries.truncate(MAX_RECENT_TRANSACTIONS);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecentTransaction> {
        self.entries.iter()
    }

    pub fn signatures(&self) -> Vec<Signature> {
        self.entries.iter().map(|e| e.signature).collect()
    }

    pub fn to_vec(&self) -> Vec<RecentTransaction> {
        self.entries.iter().cloned().collect()
    }
}

/// Discriminated status consumed by the view layer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WalletStatus {
    #[default]
    Idle,
    Busy,
    Success(String),
    Error { kind: ErrorKind, message: String },
}

impl WalletStatus {
    pub fn is_busy(&self) -> bool {
        matches!(self, WalletStatus::Busy)
    }
}
