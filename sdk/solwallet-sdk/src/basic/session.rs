//! Wallet session: the single owner of the active keypair and everything
//! derived from it.
//!
//! Mutating operations (`generate`, `import`, `clear`, `airdrop`,
//! `transfer`) are serialized by a non-blocking operation lock: a second
//! mutation while one is in flight fails with [`WalletError::Busy`].
//! Balance refreshes run freely and are tagged with the keypair generation
//! they were issued against; results for a replaced keypair are dropped.
//!
//! Ordering for every mutation: validate locally, perform the network
//! operation, update in-memory state, then persist.

use crate::amount::{format_sol, sol_to_lamports};
use crate::basic::keypair::{EncodedSecret, WalletKeypair};
use crate::basic::ledger::LedgerClient;
use crate::basic::secret_store::{SecretStore, StoredSecret};
use crate::basic::transfer::{build_transfer, TransferBuilder};
use crate::core::config::WalletConfig;
use crate::core::connection::SolConnection;
use crate::error::{Result, WalletError};
use crate::types::{RecentTransaction, RecentTransactions, TransactionKind, WalletStatus};
use parking_lot::RwLock;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct SessionState {
    keypair: Option<Arc<WalletKeypair>>,
    /// Bumped every time the active keypair is replaced
    generation: u64,
    balance: Option<u64>,
    /// Sequence of the most recently issued and most recently applied refresh
    issued_refresh: u64,
    applied_refresh: u64,
    recent: RecentTransactions,
    status: WalletStatus,
    warning: Option<String>,
}

pub struct WalletSession<C: SolConnection> {
    ledger: LedgerClient<C>,
    store: SecretStore,
    config: WalletConfig,
    state: RwLock<SessionState>,
    op_lock: Mutex<()>,
}

impl<C: SolConnection> WalletSession<C> {
    /// An uninitialized session; call [`Self::restore`], [`Self::generate`]
    /// or [`Self::import`] to activate it.
    pub fn new(ledger: LedgerClient<C>, store: SecretStore, config: WalletConfig) -> Self {
        Self {
            ledger,
            store,
            config,
            state: RwLock::new(SessionState::default()),
            op_lock: Mutex::new(()),
        }
    }

    /// A session activated from the persisted secret, or from a fresh
    /// keypair when nothing usable is stored.
    pub fn open(ledger: LedgerClient<C>, store: SecretStore, config: WalletConfig) -> Self {
        let session = Self::new(ledger, store, config);
        // A brand-new session has no other operations in flight
        if let Err(e) = session.restore() {
            tracing::warn!("restore failed: {}", e);
        }
        session
    }

    /// Load the persisted keypair.
    ///
    /// Absent: generate and persist. Corrupt: warn, discard the stored value
    /// and regenerate. Storage unavailable: continue with an in-memory keypair.
    pub fn restore(&self) -> Result<Pubkey> {
        let _guard = self.begin()?;

        match self.store.load() {
            Ok(StoredSecret::Valid(keypair)) => {
                let address = self.activate(keypair);
                tracing::info!(%address, "restored wallet");
                Ok(address)
            },
            Ok(StoredSecret::Absent) => {
                let address = self.replace_and_persist(WalletKeypair::generate());
                tracing::info!(%address, "no stored wallet, generated a new one");
                Ok(address)
            },
            Ok(StoredSecret::Corrupt(e)) => {
                tracing::warn!("stored secret is corrupt, regenerating: {}", e);
                if let Err(e) = self.store.clear() {
                    tracing::warn!("failed to discard corrupt secret: {}", e);
                }
                let address = self.replace_and_persist(WalletKeypair::generate());
                if self.warning().is_none() {
                    self.set_warning(format!("Stored secret was unreadable and was replaced: {}", e));
                }
                Ok(address)
            },
            Err(e) => {
                tracing::warn!("secret storage unavailable, wallet is in-memory only: {}", e);
                let address = self.activate(WalletKeypair::generate());
                self.set_warning(format!("Wallet is not persisted: {}", e));
                Ok(address)
            },
        }
    }

    /// Replace the active keypair with a fresh random one.
    pub fn generate(&self) -> Result<Pubkey> {
        let _guard = self.begin()?;
        let address = self.replace_and_persist(WalletKeypair::generate());
        tracing::info!(%address, "generated wallet");
        self.set_status(WalletStatus::Success(format!("Generated wallet {}", address)));
        Ok(address)
    }

    /// Replace the active keypair with one decoded from `secret`.
    /// On failure the session is unchanged.
    pub fn import(&self, secret: impl Into<EncodedSecret>) -> Result<Pubkey> {
        let _guard = self.begin()?;
        let secret = secret.into();

        let keypair = match WalletKeypair::decode(&secret) {
            Ok(keypair) => keypair,
            Err(e) => return Err(self.fail(e)),
        };
        let address = self.replace_and_persist(keypair);
        tracing::info!(%address, "imported wallet");
        self.set_status(WalletStatus::Success(format!("Imported wallet {}", address)));
        Ok(address)
    }

    /// Encoded secret of the active keypair. Read-only.
    pub fn export(&self) -> Result<EncodedSecret> {
        Ok(self.active_keypair()?.encode())
    }

    /// Forget the stored secret and replace it with a fresh persisted keypair.
    pub fn clear(&self) -> Result<Pubkey> {
        let _guard = self.begin()?;
        // A failed delete is moot once the new secret overwrites the old one;
        // a failed overwrite surfaces through the persist warning.
        if let Err(e) = self.store.clear() {
            tracing::warn!("failed to clear stored secret: {}", e);
        }
        let address = self.replace_and_persist(WalletKeypair::generate());
        tracing::info!(%address, "cleared stored wallet");
        self.set_status(WalletStatus::Success("Stored wallet cleared".to_string()));
        Ok(address)
    }

    /// Re-read the balance of the active keypair.
    ///
    /// Returns `Ok(None)` when the result was discarded because the keypair
    /// changed, or a later refresh already landed.
    pub async fn refresh_balance(&self) -> Result<Option<u64>> {
        let (keypair, generation, seq) = {
            let mut state = self.state.write();
            let keypair = state.keypair.clone().ok_or(WalletError::Uninitialized)?;
            state.issued_refresh += 1;
            (keypair, state.generation, state.issued_refresh)
        };

        let lamports = self.ledger.get_balance(&keypair.address()).await?;

        let mut state = self.state.write();
        if state.generation != generation {
            tracing::debug!(address = %keypair.address(), "discarding balance for replaced keypair");
            return Ok(None);
        }
        if seq < state.applied_refresh {
            tracing::debug!(seq, applied = state.applied_refresh, "discarding superseded balance");
            return Ok(None);
        }
        state.applied_refresh = seq;
        state.balance = Some(lamports);
        Ok(Some(lamports))
    }

    /// Request `amount` SOL from the faucet and wait for it to land.
    pub async fn airdrop(&self, amount: &str) -> Result<Signature> {
        let _guard = self.begin()?;
        let result = self.airdrop_inner(amount).await;
        self.settle(result, |sig| format!("Airdrop confirmed: {}", sig))
    }

    async fn airdrop_inner(&self, amount: &str) -> Result<Signature> {
        let keypair = self.active_keypair()?;
        let lamports = sol_to_lamports(amount)?;
        self.set_status(WalletStatus::Busy);

        let signature = self
            .ledger
            .request_airdrop(&keypair.address(), lamports)
            .await?;
        let anchor = self.ledger.get_latest_anchor().await?;
        let confirmed = self.ledger.confirm(&signature, &anchor).await;

        self.record_outcome(&confirmed, signature, TransactionKind::Airdrop, lamports)?;
        tracing::info!(%signature, amount = %format_sol(lamports), "airdrop confirmed");
        self.refresh_after_mutation().await;
        Ok(signature)
    }

    /// Send `amount` SOL to `to`, waiting for confirmation.
    ///
    /// Recipient and amount are validated before any network call. A fresh
    /// anchor is fetched for every call.
    pub async fn transfer(&self, to: &str, amount: &str) -> Result<Signature> {
        let _guard = self.begin()?;
        let result = self
            .transfer_inner(TransferBuilder::new().to(to).amount_sol(amount))
            .await;
        self.settle(result, |sig| format!("Transfer confirmed: {}", sig))
    }

    /// Like [`Self::transfer`] with an exact lamport amount.
    pub async fn transfer_lamports(&self, to: &str, lamports: u64) -> Result<Signature> {
        let _guard = self.begin()?;
        let result = self
            .transfer_inner(TransferBuilder::new().to(to).lamports(lamports))
            .await;
        self.settle(result, |sig| format!("Transfer confirmed: {}", sig))
    }

    async fn transfer_inner(&self, builder: TransferBuilder) -> Result<Signature> {
        let keypair = self.active_keypair()?;
        let intent = builder.intent(keypair.address())?;
        self.set_status(WalletStatus::Busy);

        let anchor = self.ledger.get_latest_anchor().await?;
        let transfer = build_transfer(intent, anchor, keypair.as_ref())?;
        let signature = self.ledger.submit(&transfer).await?;
        let confirmed = self.ledger.confirm(&signature, transfer.anchor()).await;

        self.record_outcome(&confirmed, signature, TransactionKind::Transfer, intent.lamports)?;
        tracing::info!(
            %signature,
            to = %intent.to,
            amount = %format_sol(intent.lamports),
            "transfer confirmed"
        );
        self.refresh_after_mutation().await;
        Ok(signature)
    }

    pub fn address(&self) -> Option<Pubkey> {
        self.state.read().keypair.as_ref().map(|k| k.address())
    }

    pub fn is_initialized(&self) -> bool {
        self.state.read().keypair.is_some()
    }

    /// Last known balance in lamports; `None` until a refresh lands
    pub fn balance(&self) -> Option<u64> {
        self.state.read().balance
    }

    /// Newest first
    pub fn recent_transactions(&self) -> Vec<RecentTransaction> {
        self.state.read().recent.to_vec()
    }

    pub fn status(&self) -> WalletStatus {
        self.state.read().status.clone()
    }

    /// Most recent non-fatal warning (storage problems, replaced secrets)
    pub fn warning(&self) -> Option<String> {
        self.state.read().warning.clone()
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    pub fn ledger(&self) -> &LedgerClient<C> {
        &self.ledger
    }

    pub fn explorer_url(&self, signature: &Signature) -> String {
        self.config.cluster.explorer_url(signature)
    }

    fn begin(&self) -> Result<MutexGuard<'_, ()>> {
        self.op_lock.try_lock().map_err(|_| WalletError::Busy)
    }

    fn active_keypair(&self) -> Result<Arc<WalletKeypair>> {
        self.state
            .read()
            .keypair
            .clone()
            .ok_or(WalletError::Uninitialized)
    }

    /// Swap in `keypair`, resetting everything derived from the old one.
    fn activate(&self, keypair: WalletKeypair) -> Pubkey {
        let address = keypair.address();
        let mut state = self.state.write();
        state.keypair = Some(Arc::new(keypair));
        state.generation += 1;
        state.balance = None;
        state.recent.clear();
        address
    }

    fn replace_and_persist(&self, keypair: WalletKeypair) -> Pubkey {
        let secret = keypair.encode();
        let address = self.activate(keypair);
        self.persist(&secret);
        address
    }

    /// Persistence failures never fail the operation that triggered them.
    fn persist(&self, secret: &EncodedSecret) {
        match self.store.save(secret) {
            Ok(()) => {
                self.state.write().warning = None;
            },
            Err(e) => {
                tracing::warn!("failed to persist wallet secret: {}", e);
                self.set_warning(format!("Wallet is not persisted: {}", e));
            },
        }
    }

    /// Confirmed: record. Unknown outcome (expired, or status unreadable):
    /// record as unconfirmed and propagate. Anything else: propagate without
    /// recording.
    fn record_outcome(
        &self,
        confirmed: &Result<()>,
        signature: Signature,
        kind: TransactionKind,
        lamports: u64,
    ) -> Result<()> {
        let flag = match confirmed {
            Ok(()) => true,
            Err(e) if e.pending_signature().is_some() => false,
            Err(e) => return Err(e.clone()),
        };
        self.state.write().recent.record(RecentTransaction {
            signature,
            kind,
            lamports,
            confirmed: flag,
        });
        confirmed.clone()
    }

    async fn refresh_after_mutation(&self) {
        if let Err(e) = self.refresh_balance().await {
            tracing::warn!("balance refresh after mutation failed: {}", e);
        }
    }

    fn settle<T>(&self, result: Result<T>, success: impl FnOnce(&T) -> String) -> Result<T> {
        match result {
            Ok(value) => {
                self.set_status(WalletStatus::Success(success(&value)));
                Ok(value)
            },
            Err(e) => Err(self.fail(e)),
        }
    }

    fn fail(&self, e: WalletError) -> WalletError {
        let message = match &e {
            WalletError::Expired(sig) | WalletError::Unconfirmed { signature: sig, .. } => {
                format!("Transaction {} is unconfirmed", sig)
            },
            other => other.to_string(),
        };
        self.set_status(WalletStatus::Error {
            kind: e.kind(),
            message,
        });
        e
    }

    fn set_status(&self, status: WalletStatus) {
        self.state.write().status = status;
    }

    fn set_warning(&self, warning: String) {
        self.state.write().warning = Some(warning);
    }
}
