use crate::amount::sol_to_lamports;
use crate::basic::keypair::parse_address;
use crate::core::signer::WalletSigner;
use crate::error::{Result, WalletError};
use crate::types::{BlockhashAnchor, TransferIntent};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::system_instruction;
use solana_sdk::transaction::Transaction;

/// A transfer signed against a specific anchor. Immutable: changing the
/// anchor or instruction means building a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransfer {
    transaction: Transaction,
    anchor: BlockhashAnchor,
    intent: TransferIntent,
}

impl SignedTransfer {
    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    pub fn anchor(&self) -> &BlockhashAnchor {
        &self.anchor
    }

    pub fn intent(&self) -> &TransferIntent {
        &self.intent
    }

    /// The fee payer's signature, which is also the transaction id
    pub fn signature(&self) -> Signature {
        self.transaction.signatures[0]
    }
}

/// Builder for a single system transfer paid for and signed by the sender.
pub struct TransferBuilder {
    to: Option<String>,
    amount: Option<String>,
    lamports: Option<u64>,
}

impl TransferBuilder {
    pub fn new() -> Self {
        Self {
            to: None,
            amount: None,
            lamports: None,
        }
    }

    pub fn to(mut self, address: impl Into<String>) -> Self {
        self.to = Some(address.into());
        self
    }

    /// Human SOL amount, floored to whole lamports
    pub fn amount_sol(mut self, amount: impl Into<String>) -> Self {
        self.amount = Some(amount.into());
        self.lamports = None;
        self
    }

    pub fn lamports(mut self, lamports: u64) -> Self {
        self.lamports = Some(lamports);
        self.amount = None;
        self
    }

    /// Validate recipient and amount without touching the network.
    pub fn intent(&self, from: Pubkey) -> Result<TransferIntent> {
        let to = parse_address(self.to.as_deref().unwrap_or_default())?;
        let lamports = match (self.lamports, self.amount.as_deref()) {
            (Some(0), _) => return Err(WalletError::NonPositiveAmount),
            (Some(lamports), _) => lamports,
            (None, Some(amount)) => sol_to_lamports(amount)?,
            (None, None) => return Err(WalletError::NonPositiveAmount),
        };
        Ok(TransferIntent { from, to, lamports })
    }

    pub fn build(
        &self,
        anchor: BlockhashAnchor,
        signer: &impl WalletSigner,
    ) -> Result<SignedTransfer> {
        let intent = self.intent(signer.pubkey())?;
        build_transfer(intent, anchor, signer)
    }
}

impl Default for TransferBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Sign a transfer of `intent.lamports` from the signer to `intent.to`.
///
/// Pure and local. ed25519 signing is deterministic, so identical inputs
/// produce identical bytes.
pub fn build_transfer(
    intent: TransferIntent,
    anchor: BlockhashAnchor,
    signer: &impl WalletSigner,
) -> Result<SignedTransfer> {
    if intent.lamports == 0 {
        return Err(WalletError::NonPositiveAmount);
    }
    let payer = signer.pubkey();
    if intent.from != payer {
        return Err(WalletError::InvalidRecipient(format!(
            "transfer source {} is not the signer {}",
            intent.from, payer
        )));
    }

    let ix = system_instruction::transfer(&payer, &intent.to, intent.lamports);
    let transaction = Transaction::new_signed_with_payer(
        &[ix],
        Some(&payer),
        &[signer.as_signer()],
        anchor.blockhash,
    );

    Ok(SignedTransfer {
        transaction,
        anchor,
        intent,
    })
}
