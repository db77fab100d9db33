use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::signer::Signer;

/// Abstraction for an entity that can authorize a transfer as fee payer.
/// Implemented by [`crate::basic::keypair::WalletKeypair`]; tests may supply
/// their own signer.
pub trait WalletSigner: Send + Sync {
    fn pubkey(&self) -> Pubkey;

    /// The `solana_sdk` signer used to sign transaction messages.
    fn as_signer(&self) -> &dyn Signer;

    fn sign_message(&self, message: &[u8]) -> Signature {
        self.as_signer().sign_message(message)
    }
}
