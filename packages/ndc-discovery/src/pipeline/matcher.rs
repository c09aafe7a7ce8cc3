//! Fingerprint matching - rank learned producers against an unknown document.

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use crate::error::Result;
use crate::pipeline::extract::{extract_combination_as_of, extract_relationship};
use crate::pipeline::similarity::pattern_similarity;
use crate::pipeline::suggest::suggest_combinations;
use crate::stores::MemoryStore;
use crate::traits::store::FingerprintStore;
use crate::types::config::{validate_threshold, MatcherConfig};
use crate::types::fingerprint::{
    AirlineFingerprint, FingerprintMatch, IdentificationReport, PassengerCombination,
    RelationshipPattern,
};
use crate::types::xml::XmlNode;

/// Matches documents against a library of learned fingerprints.
///
/// # Example
///
/// ```rust
/// use ndc_discovery::{FingerprintMatcher, MemoryStore, XmlNode};
///
/// let matcher = FingerprintMatcher::new(MemoryStore::with_defaults());
/// let doc = XmlNode::parse(
///     "<PaxList>\
///        <Pax><PaxID>P1</PaxID><PTC>ADT</PTC></Pax>\
///        <Pax><PaxID>P2</PaxID><PTC>INF</PTC><PaxRefID>P1</PaxRefID></Pax>\
///      </PaxList>",
/// )?;
///
/// let report = matcher.identify(&doc);
/// assert_eq!(report.combination.signature(), "1ADT+1INF");
/// # Ok::<(), ndc_discovery::DiscoveryError>(())
/// ```
#[derive(Debug)]
pub struct FingerprintMatcher<S: FingerprintStore = MemoryStore> {
    store: S,
    config: MatcherConfig,
}

impl Default for FingerprintMatcher<MemoryStore> {
    fn default() -> Self {
        Self::new(MemoryStore::new())
    }
}

impl<S: FingerprintStore> FingerprintMatcher<S> {
    /// Create a matcher over `store` with the default config.
    pub fn new(store: S) -> Self {
        Self {
            store,
            config: MatcherConfig::default(),
        }
    }

    /// Create a matcher with a custom config.
    pub fn with_config(store: S, config: MatcherConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { store, config })
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Add a fingerprint to the library.
    pub fn learn(&self, fingerprint: AirlineFingerprint) {
        self.store.learn(fingerprint);
    }

    /// Rank every learned fingerprint by similarity to the given pattern.
    ///
    /// Only fingerprints scoring at least `threshold` are returned, highest
    /// first. Equal scores keep store order. An empty result is a normal
    /// "no match".
    pub fn match_patterns(
        &self,
        combination: &PassengerCombination,
        relationship: &RelationshipPattern,
        threshold: f32,
    ) -> Result<Vec<FingerprintMatch>> {
        validate_threshold(threshold)?;
        Ok(self.rank(combination, relationship, threshold))
    }

    fn rank(
        &self,
        combination: &PassengerCombination,
        relationship: &RelationshipPattern,
        threshold: f32,
    ) -> Vec<FingerprintMatch> {
        let fingerprints = self.store.fingerprints();

        let mut matches: Vec<FingerprintMatch> = fingerprints
            .iter()
            .filter_map(|known| {
                let confidence = pattern_similarity(
                    combination,
                    relationship,
                    &known.combination,
                    &known.relationship,
                );
                (confidence >= threshold).then(|| FingerprintMatch {
                    key: known.key(),
                    confidence,
                })
            })
            .collect();

        // sort_by is stable
        matches.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        debug!(
            signature = %combination,
            direction = %relationship.direction,
            threshold = threshold,
            scanned = fingerprints.len(),
            matched = matches.len(),
            "Matched fingerprints"
        );

        matches
    }

    /// Extract a document's fingerprint and match it against the library.
    pub fn identify(&self, doc: &XmlNode) -> IdentificationReport {
        self.identify_as_of(doc, Utc::now().date_naive())
    }

    /// [`identify`](Self::identify) with a fixed reference date for the
    /// birthdate fallback.
    pub fn identify_as_of(&self, doc: &XmlNode, today: NaiveDate) -> IdentificationReport {
        let combination = extract_combination_as_of(doc, today);
        let relationship = extract_relationship(doc);

        let mut matches = self.rank(&combination, &relationship, self.config.similarity_threshold);
        matches.truncate(self.config.max_matches);

        let suggestions = if matches.is_empty() {
            suggest_combinations(&combination)
                .into_iter()
                .take(self.config.max_suggestions)
                .map(|c| c.signature().to_string())
                .collect()
        } else {
            Vec::new()
        };

        let report = IdentificationReport {
            combination,
            relationship,
            matches,
            suggestions,
        };

        info!(
            signature = %report.combination,
            direction = %report.relationship.direction,
            best = %report.best_match().map(|m| m.key.to_string()).unwrap_or_default(),
            confidence = report.overall_confidence(),
            "Identified document"
        );

        report
    }
}
