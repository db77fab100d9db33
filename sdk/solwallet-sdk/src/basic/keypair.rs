//! Key material: generation and the base-58 secret encoding.

use crate::core::constants::KEYPAIR_LENGTH;
use crate::core::signer::WalletSigner;
use crate::error::{Result, WalletError};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;
use std::fmt;
use zeroize::{Zeroize, Zeroizing};

/// Base-58 text of the full 64-byte keypair (secret followed by public key).
///
/// The buffer is wiped when dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedSecret(Zeroizing<String>);

impl EncodedSecret {
    pub fn new(text: impl Into<String>) -> Self {
        Self(Zeroizing::new(text.into().trim().to_string()))
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for EncodedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncodedSecret(<redacted>)")
    }
}

impl From<String> for EncodedSecret {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for EncodedSecret {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// The wallet's ed25519 keypair. The address is always derived from the
/// secret; there is no way to construct one with a mismatched public key.
pub struct WalletKeypair {
    keypair: Keypair,
}

impl WalletKeypair {
    /// Fresh keypair from the OS CSPRNG
    pub fn generate() -> Self {
        Self {
            keypair: Keypair::new(),
        }
    }

    pub fn address(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    pub fn encode(&self) -> EncodedSecret {
        let mut bytes = self.keypair.to_bytes();
        let text = bs58::encode(&bytes).into_string();
        bytes.zeroize();
        EncodedSecret::new(text)
    }

    /// Rejects anything that is not base-58 for exactly [`KEYPAIR_LENGTH`]
    /// bytes whose public half matches the secret half.
    pub fn decode(secret: &EncodedSecret) -> Result<Self> {
        let text = secret.expose();
        if text.is_empty() {
            return Err(WalletError::InvalidEncoding("empty secret".into()));
        }

        let bytes = Zeroizing::new(
            bs58::decode(text)
                .into_vec()
                .map_err(|e| WalletError::InvalidEncoding(e.to_string()))?,
        );
        if bytes.len() != KEYPAIR_LENGTH {
            return Err(WalletError::InvalidEncoding(format!(
                "expected {} bytes, got {}",
                KEYPAIR_LENGTH,
                bytes.len()
            )));
        }

        let keypair = Keypair::try_from(bytes.as_slice())
            .map_err(|e| WalletError::InvalidEncoding(e.to_string()))?;
        Ok(Self { keypair })
    }

    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }
}

impl WalletSigner for WalletKeypair {
    fn pubkey(&self) -> Pubkey {
        self.address()
    }

    fn as_signer(&self) -> &dyn Signer {
        &self.keypair
    }
}

impl PartialEq for WalletKeypair {
    fn eq(&self, other: &Self) -> bool {
        let mut ours = self.keypair.to_bytes();
        let mut theirs = other.keypair.to_bytes();
        let equal = ours == theirs;
        ours.zeroize();
        theirs.zeroize();
        equal
    }
}

impl Eq for WalletKeypair {}

impl fmt::Debug for WalletKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletKeypair")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

/// Address-format validation for user-supplied recipients
pub fn parse_address(text: &str) -> Result<Pubkey> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(WalletError::InvalidRecipient("empty address".into()));
    }
    trimmed
        .parse::<Pubkey>()
        .map_err(|e| WalletError::InvalidRecipient(format!("'{}': {}", trimmed, e)))
}
