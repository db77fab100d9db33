use crate::basic::keypair::{EncodedSecret, WalletKeypair};
use crate::core::constants::SECRET_STORAGE_KEY;
use crate::core::storage::KeyValueStore;
use crate::error::{Result, WalletError};
use std::sync::Arc;

/// Outcome of reading the persisted secret
#[derive(Debug)]
pub enum StoredSecret {
    /// Nothing has been saved yet
    Absent,
    Valid(WalletKeypair),
    /// A value exists but does not decode; carries the decode failure
    Corrupt(WalletError),
}

/// Persistence of the active wallet secret under a single fixed key.
#[derive(Clone)]
pub struct SecretStore {
    backend: Arc<dyn KeyValueStore>,
    key: String,
}

impl SecretStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            key: SECRET_STORAGE_KEY.to_string(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn save(&self, secret: &EncodedSecret) -> Result<()> {
        self.backend.save(&self.key, secret.expose())
    }

    /// Raw stored text, if any
    pub fn load_encoded(&self) -> Result<Option<EncodedSecret>> {
        Ok(self.backend.load(&self.key)?.map(EncodedSecret::from))
    }

    /// Fails only when the backend itself is unavailable; absence and
    /// corruption are reported in [`StoredSecret`].
    pub fn load(&self) -> Result<StoredSecret> {
        let Some(encoded) = self.load_encoded()? else {
            return Ok(StoredSecret::Absent);
        };
        Ok(match WalletKeypair::decode(&encoded) {
            Ok(keypair) => StoredSecret::Valid(keypair),
            Err(e) => StoredSecret::Corrupt(e),
        })
    }

    pub fn clear(&self) -> Result<()> {
        self.backend.clear(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::MemoryStore;

    #[test]
    fn test_absent_then_valid() {
        let store = SecretStore::new(Arc::new(MemoryStore::new()));
        assert!(matches!(store.load().unwrap(), StoredSecret::Absent));

        let keypair = WalletKeypair::generate();
        store.save(&keypair.encode()).unwrap();
        match store.load().unwrap() {
            StoredSecret::Valid(loaded) => assert_eq!(loaded, keypair),
            other => panic!("expected valid secret, got {:?}", other),
        }
    }

    #[test]
    fn test_corrupt_value_is_reported() {
        let backend = Arc::new(MemoryStore::new());
        backend.save(SECRET_STORAGE_KEY, "definitely-not-base58!").unwrap();

        let store = SecretStore::new(backend);
        assert!(matches!(
            store.load().unwrap(),
            StoredSecret::Corrupt(WalletError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let store = SecretStore::new(Arc::new(MemoryStore::new()));
        store.save(&WalletKeypair::generate().encode()).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert!(matches!(store.load().unwrap(), StoredSecret::Absent));
    }

    #[test]
    fn test_keys_are_scoped() {
        let backend: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let a = SecretStore::new(backend.clone()).with_key("a");
        let b = SecretStore::new(backend).with_key("b");

        a.save(&WalletKeypair::generate().encode()).unwrap();
        assert!(matches!(b.load().unwrap(), StoredSecret::Absent));
    }
}
