//! Discovery pipeline.
//!
//! - Fragment selection (split a document for downstream extraction)
//! - Pattern classification and reporting (value of extracted patterns)
//! - Fingerprint extraction, similarity and matching (producer identification)

pub mod classify;
pub mod extract;
pub mod fragment;
pub mod matcher;
pub mod report;
pub mod similarity;
pub mod suggest;

pub use classify::{classify_pattern, filter_patterns, PatternClassifier, SubScores};
pub use extract::{
    extract_combination, extract_combination_as_of, extract_relationship, parse_combination,
};
pub use fragment::{complexity, select_fragments, usefulness, FragmentSelector};
pub use matcher::FingerprintMatcher;
pub use report::{recommend, report_for};
pub use similarity::{combination_similarity, pattern_similarity, relationship_similarity};
pub use suggest::{suggest_combinations, MAX_SUGGESTIONS};
