//! Candidate patterns and their valuation.
//!
//! A [`CandidatePattern`] is free text produced by an external extraction
//! step. The classifier attaches a [`PatternClassification`] describing how
//! well the pattern distinguishes one producer from another.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A pattern described in natural language by the extraction step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePattern {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Document path the pattern was extracted from
    #[serde(default)]
    pub path: String,

    /// Prompt or rationale that produced the pattern
    #[serde(default)]
    pub prompt: String,
}

impl CandidatePattern {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// All text fields joined and lowercased for keyword matching.
    pub fn text_blob(&self) -> String {
        format!(
            "{} {} {} {}",
            self.name, self.description, self.path, self.prompt
        )
        .to_lowercase()
    }
}

/// How valuable a pattern is for telling producers apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueTier {
    /// Actively confusing for identification
    Noise,
    Low,
    Moderate,
    /// Critical for identification
    High,
}

impl ValueTier {
    /// Tier for a clamped score.
    pub fn from_score(score: f32) -> Self {
        if score >= 80.0 {
            ValueTier::High
        } else if score >= 60.0 {
            ValueTier::Moderate
        } else if score >= 30.0 {
            ValueTier::Low
        } else {
            ValueTier::Noise
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueTier::Noise => "noise",
            ValueTier::Low => "low",
            ValueTier::Moderate => "moderate",
            ValueTier::High => "high",
        }
    }
}

impl fmt::Display for ValueTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which kind of distinguishing vocabulary dominated the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternCategory {
    /// Cross-party references (infant points at adult, etc.)
    Relationship,
    /// Mixes of party types
    Combination,
    /// Producer- or version-specific structure
    Structural,
    Generic,
}

impl PatternCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternCategory::Relationship => "relationship",
            PatternCategory::Combination => "combination",
            PatternCategory::Structural => "structural",
            PatternCategory::Generic => "generic",
        }
    }
}

impl fmt::Display for PatternCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying one candidate pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternClassification {
    pub tier: ValueTier,

    /// Score in `[0, 100]`
    pub score: f32,

    pub category: PatternCategory,

    /// Human-readable explanation of the score
    #[serde(default)]
    pub reasons: Vec<String>,
}

/// A pattern that passed the score filter, with its classification attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPattern {
    #[serde(flatten)]
    pub pattern: CandidatePattern,

    pub classification: PatternClassification,
}

impl ScoredPattern {
    pub fn score(&self) -> f32 {
        self.classification.score
    }

    pub fn tier(&self) -> ValueTier {
        self.classification.tier
    }

    pub fn category(&self) -> PatternCategory {
        self.classification.category
    }
}

/// Tier and category counts over a set of patterns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternStatistics {
    pub total: usize,
    pub high: usize,
    pub moderate: usize,
    pub low: usize,
    pub noise: usize,

    /// Counts per category, in first-seen order
    #[serde(default)]
    pub categories: IndexMap<PatternCategory, usize>,
}

impl PatternStatistics {
    /// Count for a category (0 when absent).
    pub fn category_count(&self, category: PatternCategory) -> usize {
        self.categories.get(&category).copied().unwrap_or(0)
    }
}

/// Statistics plus qualitative advice for improving extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternReport {
    pub statistics: PatternStatistics,

    #[serde(default)]
    pub recommendations: Vec<String>,

    /// Share of HIGH and MODERATE patterns, as a percentage
    pub efficiency_score: f32,
}
