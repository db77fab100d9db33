use crate::core::constants::{
    DEFAULT_CONFIRM_POLL_INTERVAL_MS, DEFAULT_CONFIRM_TIMEOUT_SECS, DEFAULT_RPC_URL,
    DEFAULT_STORE_PATH, DEVNET_RPC_URL, EXPLORER_BASE_URL,
};
use crate::error::{Result, WalletError};
use serde::{Deserialize, Serialize};
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::signature::Signature;
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use url::form_urlencoded::byte_serialize;

/// Well-known RPC endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cluster {
    Localnet,
    Devnet,
    Custom(String),
}

impl Cluster {
    pub fn url(&self) -> &str {
        match self {
            Cluster::Localnet => DEFAULT_RPC_URL,
            Cluster::Devnet => DEVNET_RPC_URL,
            Cluster::Custom(url) => url,
        }
    }

    /// Explorer link for a transaction signature on this cluster
    pub fn explorer_url(&self, signature: &Signature) -> String {
        format!(
            "{}/{}?cluster={}",
            EXPLORER_BASE_URL,
            signature,
            self.explorer_param()
        )
    }

    fn explorer_param(&self) -> String {
        match self {
            Cluster::Devnet => "devnet".to_string(),
            Cluster::Localnet | Cluster::Custom(_) => {
                let encoded: String = byte_serialize(self.url().as_bytes()).collect();
                format!("custom&customUrl={}", encoded)
            },
        }
    }
}

impl FromStr for Cluster {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "localnet" | "local" | "localhost" => Ok(Cluster::Localnet),
            "devnet" => Ok(Cluster::Devnet),
            other if other.starts_with("http://") || other.starts_with("https://") => {
                Ok(Cluster::Custom(s.trim().to_string()))
            },
            _ => Err(format!("unknown cluster '{}'", s)),
        }
    }
}

/// Commitment a signature must reach before it counts as confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    #[default]
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_config(&self) -> CommitmentConfig {
        match self {
            Commitment::Confirmed => CommitmentConfig::confirmed(),
            Commitment::Finalized => CommitmentConfig::finalized(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    pub cluster: Cluster,
    pub commitment: Commitment,
    pub confirm_poll_interval_ms: u64,
    pub confirm_timeout_secs: u64,
    pub store_path: String,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            cluster: Cluster::Localnet,
            commitment: Commitment::default(),
            confirm_poll_interval_ms: DEFAULT_CONFIRM_POLL_INTERVAL_MS,
            confirm_timeout_secs: DEFAULT_CONFIRM_TIMEOUT_SECS,
            store_path: DEFAULT_STORE_PATH.to_string(),
        }
    }
}

impl WalletConfig {
    /// Defaults overlaid with `RPC_URL`, `SOLWALLET_CLUSTER` and `SOLWALLET_STORE`
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Reads a JSON config file; missing fields keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            WalletError::StorageUnavailable(format!("{}: {}", path.display(), e))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            WalletError::StorageUnavailable(format!("{}: {}", path.display(), e))
        })
    }

    pub fn apply_env(&mut self) {
        if let Ok(cluster) = env::var("SOLWALLET_CLUSTER") {
            match cluster.parse() {
                Ok(cluster) => self.cluster = cluster,
                Err(e) => tracing::warn!("ignoring SOLWALLET_CLUSTER: {}", e),
            }
        }
        // An explicit URL wins over a named cluster
        if let Ok(url) = env::var("RPC_URL") {
            self.cluster = Cluster::Custom(url);
        }
        if let Ok(path) = env::var("SOLWALLET_STORE") {
            self.store_path = path;
        }
    }

    pub fn with_cluster(mut self, cluster: Cluster) -> Self {
        self.cluster = cluster;
        self
    }

    pub fn with_commitment(mut self, commitment: Commitment) -> Self {
        self.commitment = commitment;
        self
    }

    pub fn with_confirm_poll_interval(mut self, interval: Duration) -> Self {
        self.confirm_poll_interval_ms = interval.as_millis() as u64;
        self
    }

    pub fn with_confirm_timeout(mut self, timeout: Duration) -> Self {
        self.confirm_timeout_secs = timeout.as_secs();
        self
    }

    pub fn rpc_url(&self) -> &str {
        self.cluster.url()
    }

    pub fn confirm_poll_interval(&self) -> Duration {
        Duration::from_millis(self.confirm_poll_interval_ms.max(1))
    }

    pub fn confirm_timeout(&self) -> Duration {
        Duration::from_secs(self.confirm_timeout_secs)
    }

    /// Store path with `~` expanded
    pub fn store_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.store_path).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_targets_local_node() {
        let config = WalletConfig::default();
        assert_eq!(config.rpc_url(), "http://127.0.0.1:8899");
        assert_eq!(config.commitment, Commitment::Confirmed);
    }

    #[test]
    fn test_cluster_parsing() {
        assert_eq!("devnet".parse::<Cluster>().unwrap(), Cluster::Devnet);
        assert_eq!("Localnet".parse::<Cluster>().unwrap(), Cluster::Localnet);
        assert_eq!(
            "https://rpc.example.org".parse::<Cluster>().unwrap(),
            Cluster::Custom("https://rpc.example.org".to_string())
        );
        assert!("mainnet-ish".parse::<Cluster>().is_err());
        assert_eq!(Cluster::Devnet.url(), "https://api.devnet.solana.com");
    }

    #[test]
    fn test_explorer_url_encodes_custom_endpoint() {
        let signature = Signature::from([3u8; 64]);

        let local = Cluster::Localnet.explorer_url(&signature);
        assert!(local.ends_with("?cluster=custom&customUrl=http%3A%2F%2F127.0.0.1%3A8899"));

        let custom = Cluster::Custom("https://rpc.example.com/?api-key=a&b=c".into());
        let url = custom.explorer_url(&signature);
        let (_, query) = url.split_once('?').unwrap();
        assert_eq!(
            query,
            "cluster=custom&customUrl=https%3A%2F%2Frpc.example.com%2F%3Fapi-key%3Da%26b%3Dc"
        );
    }

    #[test]
    fn test_explorer_url() {
        let signature = Signature::from([3u8; 64]);
        let url = Cluster::Devnet.explorer_url(&signature);
        assert_eq!(
            url,
            format!("https://explorer.solana.com/tx/{}?cluster=devnet", signature)
        );
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallet.json");
        std::fs::write(&path, r#"{ "cluster": "devnet", "commitment": "finalized" }"#).unwrap();

        let config = WalletConfig::from_json_file(&path).unwrap();
        assert_eq!(config.cluster, Cluster::Devnet);
        assert_eq!(config.commitment, Commitment::Finalized);
        assert_eq!(config.confirm_timeout_secs, DEFAULT_CONFIRM_TIMEOUT_SECS);
    }
}
