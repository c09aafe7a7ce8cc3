//! Storage trait for learned producer fingerprints.
//!
//! The store is append-only: fingerprints are learned, then scanned during
//! matching. Nothing removes them.

use crate::types::fingerprint::{AirlineFingerprint, FingerprintKey};

/// Library of learned fingerprints.
///
/// Iteration order must be deterministic. Implementations return
/// fingerprints grouped by key, keys in the order they were first learned,
/// and entries within a key in learn order. Match ranking breaks ties by
/// this order.
pub trait FingerprintStore: Send + Sync {
    /// Append a fingerprint. Duplicates are kept.
    fn learn(&self, fingerprint: AirlineFingerprint);

    /// Snapshot of every learned fingerprint.
    fn fingerprints(&self) -> Vec<AirlineFingerprint>;

    /// Fingerprints learned under one producer/version.
    fn by_key(&self, key: &FingerprintKey) -> Vec<AirlineFingerprint>;

    /// Fingerprints whose combination has the given signature.
    fn by_combination(&self, signature: &str) -> Vec<AirlineFingerprint>;

    /// Distinct producer/version keys, first-learned first.
    fn keys(&self) -> Vec<FingerprintKey>;

    /// Number of learned fingerprints, counting duplicates.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Learn several fingerprints in order.
    fn learn_all(&self, fingerprints: impl IntoIterator<Item = AirlineFingerprint>)
    where
        Self: Sized,
    {
        for fingerprint in fingerprints {
            self.learn(fingerprint);
        }
    }
}
