use solana_sdk::signature::Signature;
use thiserror::Error;

/// Wallet error taxonomy shared by every component of the SDK.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WalletError {
    /// Secret text is not valid base-58 or does not decode to a keypair
    #[error("Invalid secret encoding: {0}")]
    InvalidEncoding(String),

    /// Destination is not a well-formed address
    #[error("Invalid recipient address: {0}")]
    InvalidRecipient(String),

    /// Amount text could not be parsed
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Amount resolves to zero base units or less
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,

    /// Transport-level failure talking to the node
    #[error("Network error: {0}")]
    Network(String),

    /// The node refused to mint test funds
    #[error("Faucet unavailable: {0}")]
    FaucetUnavailable(String),

    /// The node rejected the transaction (stale blockhash, funds, malformed)
    #[error("Rejected by node: {0}")]
    RejectedByNode(String),

    /// The blockhash validity window elapsed before confirmation.
    /// The transaction's final state is unknown.
    #[error("Confirmation window expired for {0}; transaction state unknown")]
    Expired(Signature),

    /// The node accepted the transaction but its status could not be read.
    /// The transaction's final state is unknown.
    #[error("Could not confirm {signature}: {reason}; transaction state unknown")]
    Unconfirmed { signature: Signature, reason: String },

    /// Another mutating operation is in flight
    #[error("Wallet is busy with another operation")]
    Busy,

    /// Persistent storage could not be read or written
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// No keypair has been generated or imported yet
    #[error("Wallet has no active keypair")]
    Uninitialized,
}

/// Field-less discriminant of [`WalletError`], used by views for status display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidEncoding,
    InvalidRecipient,
    InvalidAmount,
    NonPositiveAmount,
    NetworkError,
    FaucetUnavailable,
    RejectedByNode,
    Expired,
    Unconfirmed,
    Busy,
    StorageUnavailable,
    Uninitialized,
}

impl WalletError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WalletError::InvalidEncoding(_) => ErrorKind::InvalidEncoding,
            WalletError::InvalidRecipient(_) => ErrorKind::InvalidRecipient,
            WalletError::InvalidAmount(_) => ErrorKind::InvalidAmount,
            WalletError::NonPositiveAmount => ErrorKind::NonPositiveAmount,
            WalletError::Network(_) => ErrorKind::NetworkError,
            WalletError::FaucetUnavailable(_) => ErrorKind::FaucetUnavailable,
            WalletError::RejectedByNode(_) => ErrorKind::RejectedByNode,
            WalletError::Expired(_) => ErrorKind::Expired,
            WalletError::Unconfirmed { .. } => ErrorKind::Unconfirmed,
            WalletError::Busy => ErrorKind::Busy,
            WalletError::StorageUnavailable(_) => ErrorKind::StorageUnavailable,
            WalletError::Uninitialized => ErrorKind::Uninitialized,
        }
    }

    /// Signature of a submitted transaction whose outcome is unknown
    pub fn pending_signature(&self) -> Option<Signature> {
        match self {
            WalletError::Expired(signature) | WalletError::Unconfirmed { signature, .. } => {
                Some(*signature)
            },
            _ => None,
        }
    }

    /// Input validation failures, raised before any network call
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            WalletError::InvalidEncoding(_)
                | WalletError::InvalidRecipient(_)
                | WalletError::InvalidAmount(_)
                | WalletError::NonPositiveAmount
        )
    }
}

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, WalletError>;
