#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use solwallet_sdk::{
    BlockhashAnchor, LedgerClient, MemoryStore, SecretStore, SignatureStatus, SolConnection,
    WalletConfig, WalletError, WalletSession,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, Semaphore};

pub const FEE_LAMPORTS: u64 = 5_000;
pub const VALIDITY_WINDOW: u64 = 150;

/// Holds a fake RPC call pending until the test releases it.
pub struct Gate {
    entered: Notify,
    release: Semaphore,
}

impl Gate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            entered: Notify::new(),
            release: Semaphore::new(0),
        })
    }

    /// Resolves once a call has reached the gate
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    pub fn open(&self) {
        self.release.add_permits(1);
    }

    async fn pass(&self) {
        self.entered.notify_one();
        if let Ok(permit) = self.release.acquire().await {
            permit.forget();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// Signatures finalize as soon as they are submitted
    Instant,
    /// Signatures never land; block height advances on every poll
    Never,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Balance(Pubkey),
    Anchor(Hash),
    Airdrop(u64),
    Send(Hash),
}

struct LedgerState {
    balances: HashMap<Pubkey, u64>,
    block_height: u64,
    issued: HashMap<Hash, u64>,
    statuses: HashMap<Signature, SignatureStatus>,
    sent: Vec<Transaction>,
    calls: Vec<Call>,
    counter: u64,
    confirmation: Confirmation,
    faucet_enabled: bool,
    offline: bool,
    status_unreachable: bool,
}

/// In-memory ledger node with a fixed per-transaction fee.
pub struct FakeLedger {
    state: Mutex<LedgerState>,
    balance_gate: Mutex<Option<Arc<Gate>>>,
    airdrop_gate: Mutex<Option<Arc<Gate>>>,
}

impl FakeLedger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(LedgerState {
                balances: HashMap::new(),
                block_height: 1_000,
                issued: HashMap::new(),
                statuses: HashMap::new(),
                sent: Vec::new(),
                calls: Vec::new(),
                counter: 0,
                confirmation: Confirmation::Instant,
                faucet_enabled: true,
                offline: false,
                status_unreachable: false,
            }),
            balance_gate: Mutex::new(None),
            airdrop_gate: Mutex::new(None),
        })
    }

    pub fn set_confirmation(&self, confirmation: Confirmation) {
        self.state.lock().confirmation = confirmation;
    }

    pub fn set_faucet_enabled(&self, enabled: bool) {
        self.state.lock().faucet_enabled = enabled;
    }

    pub fn set_offline(&self, offline: bool) {
        self.state.lock().offline = offline;
    }

    /// Fail only signature status queries, as a dropped connection would
    /// after a send went through
    pub fn set_status_unreachable(&self, unreachable: bool) {
        self.state.lock().status_unreachable = unreachable;
    }

    pub fn set_balance(&self, address: &Pubkey, lamports: u64) {
        self.state.lock().balances.insert(*address, lamports);
    }

    pub fn balance_of(&self, address: &Pubkey) -> u64 {
        self.state.lock().balances.get(address).copied().unwrap_or(0)
    }

    pub fn advance_blocks(&self, blocks: u64) {
        self.state.lock().block_height += blocks;
    }

    pub fn gate_balance(&self) -> Arc<Gate> {
        let gate = Gate::new();
        *self.balance_gate.lock() = Some(gate.clone());
        gate
    }

    pub fn gate_airdrop(&self) -> Arc<Gate> {
        let gate = Gate::new();
        *self.airdrop_gate.lock() = Some(gate.clone());
        gate
    }

    pub fn set_signature_status(&self, signature: Signature, status: SignatureStatus) {
        self.state.lock().statuses.insert(signature, status);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn sent(&self) -> Vec<Transaction> {
        self.state.lock().sent.clone()
    }

    fn next_id(state: &mut LedgerState) -> [u8; 32] {
        state.counter += 1;
        let mut bytes = [0u8; 32];
        bytes[..8].copy_from_slice(&state.counter.to_le_bytes());
        bytes
    }

    fn check_online(state: &LedgerState) -> Result<(), WalletError> {
        if state.offline {
            return Err(WalletError::Network("connection refused".into()));
        }
        Ok(())
    }

    fn land(state: &mut LedgerState, signature: Signature) {
        if state.confirmation == Confirmation::Instant {
            state.statuses.insert(signature, SignatureStatus::Finalized);
        }
    }
}

/// Decode a system-program transfer: (from, to, lamports)
fn decode_transfer(tx: &Transaction) -> Option<(Pubkey, Pubkey, u64)> {
    let ix = tx.message.instructions.first()?;
    if ix.data.len() != 12 || ix.data[..4] != [2, 0, 0, 0] {
        return None;
    }
    let lamports = u64::from_le_bytes(ix.data[4..12].try_into().ok()?);
    let from = *tx.message.account_keys.get(*ix.accounts.first()? as usize)?;
    let to = *tx.message.account_keys.get(*ix.accounts.get(1)? as usize)?;
    Some((from, to, lamports))
}

#[async_trait]
impl SolConnection for FakeLedger {
    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64, WalletError> {
        let gate = self.balance_gate.lock().take();
        if let Some(gate) = gate {
            gate.pass().await;
        }
        let mut state = self.state.lock();
        Self::check_online(&state)?;
        state.calls.push(Call::Balance(*pubkey));
        Ok(state.balances.get(pubkey).copied().unwrap_or(0))
    }

    async fn get_latest_blockhash(&self) -> Result<BlockhashAnchor, WalletError> {
        let mut state = self.state.lock();
        Self::check_online(&state)?;
        let blockhash = Hash::new_from_array(Self::next_id(&mut state));
        let last_valid = state.block_height + VALIDITY_WINDOW;
        state.issued.insert(blockhash, last_valid);
        state.calls.push(Call::Anchor(blockhash));
        Ok(BlockhashAnchor::new(blockhash, last_valid))
    }

    async fn get_block_height(&self) -> Result<u64, WalletError> {
        let mut state = self.state.lock();
        Self::check_online(&state)?;
        if state.confirmation == Confirmation::Never {
            state.block_height += VALIDITY_WINDOW / 3;
        }
        Ok(state.block_height)
    }

    async fn request_airdrop(&self, pubkey: &Pubkey, lamports: u64) -> Result<Signature, WalletError> {
        let gate = self.airdrop_gate.lock().take();
        if let Some(gate) = gate {
            gate.pass().await;
        }
        let mut state = self.state.lock();
        Self::check_online(&state)?;
        if !state.faucet_enabled {
            return Err(WalletError::FaucetUnavailable("airdrop limit reached".into()));
        }
        state.calls.push(Call::Airdrop(lamports));
        *state.balances.entry(*pubkey).or_default() += lamports;

        let mut bytes = [0u8; 64];
        bytes[..32].copy_from_slice(&Self::next_id(&mut state));
        let signature = Signature::from(bytes);
        Self::land(&mut state, signature);
        Ok(signature)
    }

    async fn send_transaction(&self, tx: &Transaction) -> Result<Signature, WalletError> {
        let mut state = self.state.lock();
        Self::check_online(&state)?;
        let blockhash = tx.message.recent_blockhash;
        state.calls.push(Call::Send(blockhash));

        if tx.verify().is_err() {
            return Err(WalletError::RejectedByNode("signature verification failed".into()));
        }
        match state.issued.get(&blockhash) {
            Some(last_valid) if *last_valid >= state.block_height => {},
            _ => return Err(WalletError::RejectedByNode("Blockhash not found".into())),
        }
        let (from, to, lamports) = decode_transfer(tx)
            .ok_or_else(|| WalletError::RejectedByNode("unsupported instruction".into()))?;

        let available = state.balances.get(&from).copied().unwrap_or(0);
        let needed = lamports + FEE_LAMPORTS;
        if available < needed {
            return Err(WalletError::RejectedByNode(format!(
                "insufficient funds: need {}, have {}",
                needed, available
            )));
        }
        state.balances.insert(from, available - needed);
        *state.balances.entry(to).or_default() += lamports;
        state.sent.push(tx.clone());

        let signature = tx.signatures[0];
        Self::land(&mut state, signature);
        Ok(signature)
    }

    async fn get_signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<SignatureStatus>, WalletError> {
        let state = self.state.lock();
        Self::check_online(&state)?;
        if state.status_unreachable {
            return Err(WalletError::Network("connection reset by peer".into()));
        }
        Ok(state.statuses.get(signature).cloned())
    }
}

/// Config with fast confirmation polling
pub fn test_config() -> WalletConfig {
    WalletConfig::default().with_confirm_poll_interval(Duration::from_millis(1))
}

pub fn ledger_client(fake: &Arc<FakeLedger>) -> LedgerClient<FakeLedger> {
    LedgerClient::from_shared(fake.clone(), &test_config())
}

pub struct Harness {
    pub fake: Arc<FakeLedger>,
    pub backend: Arc<MemoryStore>,
    pub session: Arc<WalletSession<FakeLedger>>,
}

/// Opened session over a fresh fake ledger and in-memory storage
pub fn setup_session() -> Harness {
    let fake = FakeLedger::new();
    let backend = Arc::new(MemoryStore::new());
    let store = SecretStore::new(backend.clone());
    let session = WalletSession::open(ledger_client(&fake), store, test_config());
    Harness {
        fake,
        backend,
        session: Arc::new(session),
    }
}
