//! Configuration types for fragment selection, classification and matching.
//!
//! All tunables are plain values; nothing is read from files or the
//! environment. Each config validates itself once, at construction of the
//! component that uses it.

use serde::{Deserialize, Serialize};

use crate::error::{DiscoveryError, Result};

/// Configuration for the fragment selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Upper bound of the complexity window.
    ///
    /// Nodes above it are split into their children. Default: 4000.
    pub max_fragment_chars: usize,

    /// Lower bound of the complexity window.
    ///
    /// Default: 200.
    pub min_fragment_chars: usize,

    /// Maximum fragments returned; extra fragments are dropped by
    /// usefulness. Default: 20.
    pub max_fragments: usize,

    /// How deep below the root the selector may descend. Default: 8.
    /// Oversized nodes are split down to this depth; nodes that are too
    /// small or not useful enough only hand off to children above it.
    pub max_recursion_depth: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            max_fragment_chars: 4000,
            min_fragment_chars: 200,
            max_fragments: 20,
            max_recursion_depth: 8,
        }
    }
}

impl SelectorConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the complexity window.
    pub fn with_window(mut self, min_chars: usize, max_chars: usize) -> Self {
        self.min_fragment_chars = min_chars;
        self.max_fragment_chars = max_chars;
        self
    }

    /// Set the fragment cap.
    pub fn with_max_fragments(mut self, max: usize) -> Self {
        self.max_fragments = max;
        self
    }

    /// Set the recursion bound.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_recursion_depth = depth;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_fragment_chars > self.max_fragment_chars {
            return Err(DiscoveryError::invalid_config(format!(
                "min_fragment_chars ({}) exceeds max_fragment_chars ({})",
                self.min_fragment_chars, self.max_fragment_chars
            )));
        }
        if self.max_fragment_chars == 0 {
            return Err(DiscoveryError::invalid_config(
                "max_fragment_chars must be positive",
            ));
        }
        if self.max_fragments == 0 {
            return Err(DiscoveryError::invalid_config(
                "max_fragments must be positive",
            ));
        }
        Ok(())
    }
}

/// Configuration for the pattern value classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Minimum score (0-100) a pattern needs to survive filtering.
    ///
    /// Default: 60 (MODERATE and above).
    pub min_score: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self { min_score: 60.0 }
    }
}

impl ClassifierConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.min_score) {
            return Err(DiscoveryError::invalid_config(format!(
                "min_score must be within [0, 100], got {}",
                self.min_score
            )));
        }
        Ok(())
    }
}

/// Configuration for fingerprint matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Minimum similarity (0.0 to 1.0) for a fingerprint to be reported.
    ///
    /// Default: 0.7.
    pub similarity_threshold: f32,

    /// Matches kept by [`identify`](crate::FingerprintMatcher::identify).
    ///
    /// Default: 5.
    pub max_matches: usize,

    /// Suggested signatures reported when nothing matches.
    ///
    /// Default: 5.
    pub max_suggestions: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.7,
            max_matches: 5,
            max_suggestions: 5,
        }
    }
}

impl MatcherConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn with_max_matches(mut self, max: usize) -> Self {
        self.max_matches = max;
        self
    }

    pub fn with_max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions = max;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.similarity_threshold)
    }
}

pub(crate) fn validate_threshold(threshold: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(DiscoveryError::invalid_config(format!(
            "similarity_threshold must be within [0, 1], got {}",
            threshold
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(SelectorConfig::default().validate().is_ok());
        assert!(ClassifierConfig::default().validate().is_ok());
        assert!(MatcherConfig::default().validate().is_ok());
    }

    #[test]
    fn test_selector_window_must_be_ordered() {
        let config = SelectorConfig::new().with_window(500, 100);
        assert!(matches!(
            config.validate(),
            Err(DiscoveryError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_selector_needs_positive_cap() {
        assert!(SelectorConfig::new().with_max_fragments(0).validate().is_err());
        assert!(SelectorConfig::new().with_window(0, 0).validate().is_err());
    }

    #[test]
    fn test_threshold_bounds() {
        assert!(MatcherConfig::new().with_threshold(1.5).validate().is_err());
        assert!(MatcherConfig::new().with_threshold(-0.1).validate().is_err());
        assert!(MatcherConfig::new().with_threshold(f32::NAN).validate().is_err());
        assert!(MatcherConfig::new().with_threshold(0.0).validate().is_ok());
    }

    #[test]
    fn test_min_score_bounds() {
        assert!(ClassifierConfig::new().with_min_score(101.0).validate().is_err());
        assert!(ClassifierConfig::new().with_min_score(f32::NAN).validate().is_err());
    }
}
