use crate::core::config::{Commitment, WalletConfig};
use crate::error::{Result, WalletError};
use crate::types::{BlockhashAnchor, SignatureStatus};
use async_trait::async_trait;
use solana_client::client_error::{ClientError, ClientErrorKind};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_request::RpcError;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;

/// RPC boundary to a ledger node.
///
/// Implementations classify their failures into [`WalletError`] variants so
/// callers never inspect transport errors directly.
#[async_trait]
pub trait SolConnection: Send + Sync {
    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64>;

    /// Latest blockhash together with its last valid block height
    async fn get_latest_blockhash(&self) -> Result<BlockhashAnchor>;

    async fn get_block_height(&self) -> Result<u64>;

    async fn request_airdrop(&self, pubkey: &Pubkey, lamports: u64) -> Result<Signature>;

    async fn send_transaction(&self, tx: &Transaction) -> Result<Signature>;

    /// `Ok(None)` when the node has not seen the signature
    async fn get_signature_status(&self, signature: &Signature)
        -> Result<Option<SignatureStatus>>;
}

/// Which RPC call produced a client error; decides how node-side errors map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RpcCall {
    Read,
    Airdrop,
    Submit,
}

/// [`SolConnection`] over a JSON-RPC endpoint.
pub struct RpcConnection {
    client: RpcClient,
    commitment: CommitmentConfig,
}

impl RpcConnection {
    pub fn new(rpc_url: impl Into<String>, commitment: Commitment) -> Self {
        let commitment = commitment.as_config();
        Self {
            client: RpcClient::new_with_commitment(rpc_url.into(), commitment),
            commitment,
        }
    }

    pub fn from_config(config: &WalletConfig) -> Self {
        Self::new(config.rpc_url(), config.commitment)
    }

    pub fn url(&self) -> String {
        self.client.url()
    }
}

#[async_trait]
impl SolConnection for RpcConnection {
    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64> {
        self.client
            .get_balance_with_commitment(pubkey, self.commitment)
            .await
            .map(|response| response.value)
            .map_err(|e| classify(e, RpcCall::Read))
    }

    async fn get_latest_blockhash(&self) -> Result<BlockhashAnchor> {
        let (blockhash, last_valid_block_height) = self
            .client
            .get_latest_blockhash_with_commitment(self.commitment)
            .await
            .map_err(|e| classify(e, RpcCall::Read))?;
        Ok(BlockhashAnchor::new(blockhash, last_valid_block_height))
    }

    async fn get_block_height(&self) -> Result<u64> {
        self.client
            .get_block_height_with_commitment(self.commitment)
            .await
            .map_err(|e| classify(e, RpcCall::Read))
    }

    async fn request_airdrop(&self, pubkey: &Pubkey, lamports: u64) -> Result<Signature> {
        self.client
            .request_airdrop(pubkey, lamports)
            .await
            .map_err(|e| classify(e, RpcCall::Airdrop))
    }

    async fn send_transaction(&self, tx: &Transaction) -> Result<Signature> {
        self.client
            .send_transaction(tx)
            .await
            .map_err(|e| classify(e, RpcCall::Submit))
    }

    async fn get_signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<SignatureStatus>> {
        let response = self
            .client
            .get_signature_statuses(&[*signature])
            .await
            .map_err(|e| classify(e, RpcCall::Read))?;

        let Some(Some(status)) = response.value.into_iter().next() else {
            return Ok(None);
        };
        if let Some(err) = status.err.as_ref() {
            return Ok(Some(SignatureStatus::Failed(err.to_string())));
        }
        let state = if status.satisfies_commitment(CommitmentConfig::finalized()) {
            SignatureStatus::Finalized
        } else if status.satisfies_commitment(CommitmentConfig::confirmed()) {
            SignatureStatus::Confirmed
        } else {
            SignatureStatus::Processed
        };
        Ok(Some(state))
    }
}

/// Map a client failure onto the wallet taxonomy.
///
/// Transport failures are always `Network`. Node-side errors on submit mean
/// the payload was refused (preflight, stale blockhash, funds); on airdrop
/// they mean the faucet declined.
fn classify(err: ClientError, call: RpcCall) -> WalletError {
    let message = err.to_string();
    let node_side = match err.kind() {
        ClientErrorKind::Io(_) | ClientErrorKind::Reqwest(_) => false,
        ClientErrorKind::TransactionError(_) | ClientErrorKind::SigningError(_) => true,
        ClientErrorKind::RpcError(RpcError::RpcResponseError { .. })
        | ClientErrorKind::RpcError(RpcError::RpcRequestError(_))
        | ClientErrorKind::RpcError(RpcError::ForUser(_)) => true,
        _ => false,
    };

    match (call, node_side) {
        (RpcCall::Submit, true) => WalletError::RejectedByNode(message),
        (RpcCall::Airdrop, true) => WalletError::FaucetUnavailable(message),
        _ => WalletError::Network(message),
    }
}
