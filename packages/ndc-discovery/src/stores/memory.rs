//! In-memory fingerprint library.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::error::Result;
use crate::stores::defaults::default_fingerprints;
use crate::traits::store::FingerprintStore;
use crate::types::fingerprint::{AirlineFingerprint, FingerprintKey};

/// Fingerprints keyed by producer/version, plus a secondary index by
/// combination signature. Both keep insertion order.
#[derive(Debug, Default)]
struct Library {
    by_key: IndexMap<FingerprintKey, Vec<AirlineFingerprint>>,
    by_combination: IndexMap<String, Vec<AirlineFingerprint>>,
    count: usize,
}

/// In-memory fingerprint store.
///
/// Guarded by a read-write lock so a shared matcher can learn and match
/// from several threads. Data is lost on drop; use
/// [`export_json`](Self::export_json) to hand it to a persistence layer.
#[derive(Debug, Default)]
pub struct MemoryStore {
    library: RwLock<Library>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with the built-in producer fingerprints.
    pub fn with_defaults() -> Self {
        let store = Self::new();
        store.learn_all(default_fingerprints());
        store
    }

    fn read(&self) -> RwLockReadGuard<'_, Library> {
        self.library.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Library> {
        self.library.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Serialize every learned fingerprint, in iteration order, as a JSON
    /// array.
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.fingerprints())?)
    }

    /// Learn every fingerprint in a JSON array produced by
    /// [`export_json`](Self::export_json).
    ///
    /// Returns the number learned. Nothing is learned if the JSON is invalid.
    pub fn import_json(&self, json: &str) -> Result<usize> {
        let fingerprints: Vec<AirlineFingerprint> = serde_json::from_str(json)?;
        let count = fingerprints.len();
        self.learn_all(fingerprints);
        debug!(count = count, "Imported fingerprints");
        Ok(count)
    }
}

impl FingerprintStore for MemoryStore {
    fn learn(&self, fingerprint: AirlineFingerprint) {
        let key = fingerprint.key();
        let signature = fingerprint.combination.signature().to_string();

        let mut library = self.write();
        library
            .by_combination
            .entry(signature.clone())
            .or_default()
            .push(fingerprint.clone());
        library.by_key.entry(key.clone()).or_default().push(fingerprint);
        library.count += 1;

        info!(
            key = %key,
            signature = %signature,
            total = library.count,
            "Learned fingerprint"
        );
    }

    fn fingerprints(&self) -> Vec<AirlineFingerprint> {
        self.read().by_key.values().flatten().cloned().collect()
    }

    fn by_key(&self, key: &FingerprintKey) -> Vec<AirlineFingerprint> {
        self.read().by_key.get(key).cloned().unwrap_or_default()
    }

    fn by_combination(&self, signature: &str) -> Vec<AirlineFingerprint> {
        self.read()
            .by_combination
            .get(signature)
            .cloned()
            .unwrap_or_default()
    }

    fn keys(&self) -> Vec<FingerprintKey> {
        self.read().by_key.keys().cloned().collect()
    }

    fn len(&self) -> usize {
        self.read().count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fingerprint;
    use crate::types::fingerprint::RelationshipDirection;

    #[test]
    fn test_learn_and_lookup() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.learn(fingerprint("X", "1.0", (2, 1, 1), RelationshipDirection::InfantToAdult));
        store.learn(fingerprint("Y", "2.0", (1, 0, 1), RelationshipDirection::AdultToInfant));
        store.learn(fingerprint("Z", "1.0", (2, 1, 1), RelationshipDirection::None));

        assert_eq!(store.len(), 3);
        assert_eq!(store.by_key(&FingerprintKey::new("X", "1.0")).len(), 1);
        assert!(store.by_key(&FingerprintKey::new("X", "9.9")).is_empty());

        let family: Vec<_> = store
            .by_combination("2ADT+1CHD+1INF")
            .into_iter()
            .map(|f| f.producer)
            .collect();
        assert_eq!(family, vec!["X", "Z"]);
        assert!(store.by_combination("EMPTY").is_empty());
    }

    #[test]
    fn test_duplicates_kept_and_grouped_by_key() {
        let store = MemoryStore::new();
        let x = fingerprint("X", "1.0", (2, 1, 1), RelationshipDirection::InfantToAdult);
        let y = fingerprint("Y", "1.0", (2, 0, 0), RelationshipDirection::None);

        store.learn(x.clone());
        store.learn(y);
        store.learn(x);

        assert_eq!(store.len(), 3);
        assert_eq!(
            store.keys(),
            vec![FingerprintKey::new("X", "1.0"), FingerprintKey::new("Y", "1.0")]
        );

        let order: Vec<_> = store.fingerprints().into_iter().map(|f| f.producer).collect();
        assert_eq!(order, vec!["X", "X", "Y"]);
    }

    #[test]
    fn test_defaults() {
        let store = MemoryStore::with_defaults();
        assert_eq!(store.len(), 3);
        assert_eq!(
            store.keys(),
            vec![
                FingerprintKey::new("LH", "17.2"),
                FingerprintKey::new("BA", "18.1"),
                FingerprintKey::new("AF", "19.1"),
            ]
        );
    }

    #[test]
    fn test_json_round_trip_preserves_order() {
        let store = MemoryStore::with_defaults();
        let json = store.export_json().unwrap();

        let restored = MemoryStore::new();
        assert_eq!(restored.import_json(&json).unwrap(), 3);
        assert_eq!(restored.fingerprints(), store.fingerprints());
    }

    #[test]
    fn test_invalid_json_learns_nothing() {
        let store = MemoryStore::new();
        assert!(store.import_json("[{\"producer\": 1}]").is_err());
        assert!(store.is_empty());
    }
}
