//! NDC Message Discovery Library
//!
//! Analyses airline NDC-style XML messages to tell one producer's output
//! from another's.
//!
//! - **Fragment selection** splits a large document into a bounded set of
//!   non-overlapping subtrees sized for an external extraction step.
//! - **Pattern classification** scores patterns extracted from those
//!   fragments by how well they distinguish producers.
//! - **Fingerprint matching** reads the passenger mix and the direction of
//!   party references from a document and ranks learned producer
//!   fingerprints against it.
//!
//! The library does no I/O. Documents come in as [`XmlNode`] trees (see
//! [`XmlNode::parse`]) and results are plain serde types.
//!
//! # Usage
//!
//! ```rust
//! use ndc_discovery::{
//!     CandidatePattern, FingerprintMatcher, FragmentSelector, MemoryStore, PatternClassifier,
//!     SelectorConfig, ValueTier, XmlNode,
//! };
//!
//! let doc = XmlNode::parse(
//!     "<OrderViewRS><PaxList>\
//!        <Pax><PaxID>P1</PaxID><PTC>ADT</PTC></Pax>\
//!        <Pax><PaxID>P2</PaxID><PTC>INF</PTC><PaxRefID>P1</PaxRefID></Pax>\
//!      </PaxList></OrderViewRS>",
//! )?;
//!
//! // Fragments for the extraction step
//! let selector = FragmentSelector::new(SelectorConfig::new().with_window(50, 500))?;
//! let fragments = selector.select(&doc);
//! assert!(fragments.len() <= selector.config().max_fragments);
//!
//! // Value of a pattern the extraction step produced
//! let pattern = CandidatePattern::new("Infant to adult link")
//!     .with_description("Each infant Pax carries a PaxRefID pointing at its adult");
//! let classification = PatternClassifier::new().classify(&pattern);
//! assert_eq!(classification.tier, ValueTier::High);
//!
//! // Which producer wrote it
//! let matcher = FingerprintMatcher::new(MemoryStore::with_defaults());
//! let report = matcher.identify(&doc);
//! assert_eq!(report.combination.signature(), "1ADT+1INF");
//! # Ok::<(), ndc_discovery::DiscoveryError>(())
//! ```
//!
//! # Modules
//!
//! - [`types`] - XML tree, fragments, patterns, fingerprints and configs
//! - [`pipeline`] - Selector, classifier, extraction and matcher
//! - [`traits`] - Fingerprint store abstraction
//! - [`stores`] - Store implementations (MemoryStore) and the built-in library
//! - [`testing`] - Fixture builders for documents and fingerprints

pub mod error;
pub mod pipeline;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{DiscoveryError, Result};
pub use traits::store::FingerprintStore;
pub use types::{
    config::{ClassifierConfig, MatcherConfig, SelectorConfig},
    fingerprint::{
        AirlineFingerprint, FingerprintKey, FingerprintMatch, IdentificationReport,
        PassengerCombination, RelationshipDirection, RelationshipPattern,
    },
    fragment::Fragment,
    pattern::{
        CandidatePattern, PatternCategory, PatternClassification, PatternReport,
        PatternStatistics, ScoredPattern, ValueTier,
    },
    xml::XmlNode,
};

// Re-export pipeline components
pub use pipeline::{
    // Fragment selection
    complexity, select_fragments, usefulness, FragmentSelector,
    // Classification
    classify_pattern, filter_patterns, recommend, report_for, PatternClassifier,
    // Fingerprints
    combination_similarity, extract_combination, extract_combination_as_of,
    extract_relationship, parse_combination, pattern_similarity, relationship_similarity,
    suggest_combinations, FingerprintMatcher,
};

// Re-export stores
pub use stores::{default_fingerprints, MemoryStore};
