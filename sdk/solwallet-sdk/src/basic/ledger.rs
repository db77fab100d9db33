use crate::basic::transfer::SignedTransfer;
use crate::core::config::{Commitment, WalletConfig};
use crate::core::connection::SolConnection;
use crate::error::{Result, WalletError};
use crate::types::{BlockhashAnchor, SignatureStatus};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Network operations against a ledger node.
///
/// Constructed once and shared; nothing here retries on its own.
pub struct LedgerClient<C: SolConnection> {
    connection: Arc<C>,
    commitment: Commitment,
    poll_interval: Duration,
    confirm_timeout: Duration,
}

impl<C: SolConnection> Clone for LedgerClient<C> {
    fn clone(&self) -> Self {
        Self {
            connection: Arc::clone(&self.connection),
            commitment: self.commitment,
            poll_interval: self.poll_interval,
            confirm_timeout: self.confirm_timeout,
        }
    }
}

impl<C: SolConnection> LedgerClient<C> {
    pub fn new(connection: C, config: &WalletConfig) -> Self {
        Self::from_shared(Arc::new(connection), config)
    }

    pub fn from_shared(connection: Arc<C>, config: &WalletConfig) -> Self {
        Self {
            connection,
            commitment: config.commitment,
            poll_interval: config.confirm_poll_interval(),
            confirm_timeout: config.confirm_timeout(),
        }
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub async fn get_balance(&self, address: &Pubkey) -> Result<u64> {
        self.connection.get_balance(address).await
    }

    /// Fetch a fresh anchor. Call once per submission; anchors are never cached.
    pub async fn get_latest_anchor(&self) -> Result<BlockhashAnchor> {
        let anchor = self.connection.get_latest_blockhash().await?;
        tracing::debug!(
            blockhash = %anchor.blockhash,
            last_valid_block_height = anchor.last_valid_block_height,
            "fetched anchor"
        );
        Ok(anchor)
    }

    /// Ask the faucet to mint `lamports`. Each call mints again.
    pub async fn request_airdrop(&self, address: &Pubkey, lamports: u64) -> Result<Signature> {
        if lamports == 0 {
            return Err(WalletError::NonPositiveAmount);
        }
        self.connection.request_airdrop(address, lamports).await
    }

    /// Send a signed transfer. A `RejectedByNode` payload must be rebuilt
    /// against a fresh anchor, never resent.
    pub async fn submit(&self, transfer: &SignedTransfer) -> Result<Signature> {
        let signature = self
            .connection
            .send_transaction(transfer.transaction())
            .await?;
        if signature != transfer.signature() {
            tracing::warn!(
                expected = %transfer.signature(),
                reported = %signature,
                "node reported a different signature"
            );
        }
        Ok(signature)
    }

    /// Poll until `signature` reaches the configured commitment.
    ///
    /// Returns `Expired` once the node's block height passes the anchor's
    /// last valid height (or the wall-clock ceiling elapses) without the
    /// signature landing. An on-chain execution failure is `RejectedByNode`.
    /// A transport failure while polling is `Unconfirmed`: the transaction was
    /// already sent, so its outcome is as unknown as an expired one.
    pub async fn confirm(&self, signature: &Signature, anchor: &BlockhashAnchor) -> Result<()> {
        self.poll_confirmation(signature, anchor)
            .await
            .map_err(|e| match e {
                WalletError::Network(reason) => {
                    tracing::warn!(%signature, %reason, "lost contact while confirming");
                    WalletError::Unconfirmed {
                        signature: *signature,
                        reason,
                    }
                },
                other => other,
            })
    }

    async fn poll_confirmation(
        &self,
        signature: &Signature,
        anchor: &BlockhashAnchor,
    ) -> Result<()> {
        let deadline = Instant::now() + self.confirm_timeout;

        loop {
            match self.connection.get_signature_status(signature).await? {
                Some(SignatureStatus::Failed(reason)) => {
                    return Err(WalletError::RejectedByNode(reason));
                },
                Some(status) if self.reached_commitment(&status) => {
                    tracing::debug!(%signature, ?status, "signature confirmed");
                    return Ok(());
                },
                status => {
                    tracing::debug!(%signature, ?status, "awaiting confirmation");
                },
            }

            let block_height = self.connection.get_block_height().await?;
            if anchor.is_expired_at(block_height) {
                // One last look: it may have landed right before the window closed
                if let Some(status) = self.connection.get_signature_status(signature).await? {
                    if let SignatureStatus::Failed(reason) = status {
                        return Err(WalletError::RejectedByNode(reason));
                    }
                    if self.reached_commitment(&status) {
                        return Ok(());
                    }
                }
                tracing::warn!(
                    %signature,
                    block_height,
                    last_valid_block_height = anchor.last_valid_block_height,
                    "anchor expired before confirmation"
                );
                return Err(WalletError::Expired(*signature));
            }

            if Instant::now() >= deadline {
                tracing::warn!(%signature, "confirmation timed out");
                return Err(WalletError::Expired(*signature));
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    fn reached_commitment(&self, status: &SignatureStatus) -> bool {
        match (self.commitment, status) {
            (_, SignatureStatus::Finalized) => true,
            (Commitment::Confirmed, SignatureStatus::Confirmed) => true,
            _ => false,
        }
    }
}
