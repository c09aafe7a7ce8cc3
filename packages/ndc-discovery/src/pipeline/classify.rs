//! Pattern value classification.
//!
//! Scores free-text pattern descriptions by how well they distinguish one
//! producer from another. Relationship, combination and structural
//! vocabulary raise the score; basic-field listings and validation-only
//! language lower it.

use std::sync::LazyLock;

use regex::{Regex, RegexSet};
use tracing::debug;

use crate::error::Result;
use crate::types::config::ClassifierConfig;
use crate::types::pattern::{
    CandidatePattern, PatternCategory, PatternClassification, ScoredPattern, ValueTier,
};

const BASE_SCORE: f32 = 50.0;
const SUB_SCORE_CAP: f32 = 50.0;
const CATEGORY_FLOOR: f32 = 30.0;

/// Cross-party reference language.
const RELATIONSHIP_KEYWORDS: &[&str] = &[
    "paxrefid",
    "reference",
    "parent-child",
    "relationship",
    "linking",
    "infant.*adult",
    "adult.*infant",
    "dependency",
    "association",
    "contactinforef",
    "passengerid",
    "passenger.*ref",
];

/// Multi-party-type mixes.
const COMBINATION_KEYWORDS: &[&str] = &[
    "combination",
    "mix",
    "multiple.*pax",
    "passenger.*types",
    "adt.*chd.*inf",
    "adult.*child.*infant",
    "composition",
    "passengerlist",
    "passenger.*list",
];

/// Producer- or version-specific structure.
const STRUCTURAL_KEYWORDS: &[&str] = &[
    "airline.*specific",
    "unique.*structure",
    "distinguishing",
    "api.*version",
    "carrier.*specific",
    "ndc.*pattern",
    "iberia.*specific",
    "lufthansa.*specific",
    "airfrance.*specific",
];

/// Basic passenger fields every producer emits.
const GENERIC_KEYWORDS: &[&str] = &[
    "individual.*details",
    "personal.*information",
    "basic.*structure",
    "name.*field",
    "birth.?date",
    "gender",
    "title",
    "surname",
    "given.?name",
    "individual.*node",
    "passenger.*details",
    "contact.*info",
    "standard.*field",
    "common.*element",
    "generic.*pattern",
];

/// Fields whose joint presence marks a plain field listing.
const BASIC_FIELDS: &[&str] = &[
    "name",
    "birth.?date",
    "gender",
    "title",
    "surname",
    "given.?name",
];

/// Validation- and format-only language.
const NOISE_KEYWORDS: &[&str] = &[
    "validation.*only",
    "format.*check",
    "field.*presence",
    "element.*exists",
    "required.*field",
    "data.*type",
];

/// One pattern per party type (adult, child, infant).
const PARTY_TYPES: &[&str] = &[r"\badt\b|adult", r"\bchd\b|child", r"\binf\b|infant"];

fn keyword_set(patterns: &[&str]) -> RegexSet {
    RegexSet::new(patterns).expect("keyword patterns are valid")
}

static RELATIONSHIP: LazyLock<RegexSet> = LazyLock::new(|| keyword_set(RELATIONSHIP_KEYWORDS));
static COMBINATION: LazyLock<RegexSet> = LazyLock::new(|| keyword_set(COMBINATION_KEYWORDS));
static STRUCTURAL: LazyLock<RegexSet> = LazyLock::new(|| keyword_set(STRUCTURAL_KEYWORDS));
static GENERIC: LazyLock<RegexSet> = LazyLock::new(|| keyword_set(GENERIC_KEYWORDS));
static BASIC: LazyLock<RegexSet> = LazyLock::new(|| keyword_set(BASIC_FIELDS));
static NOISE: LazyLock<RegexSet> = LazyLock::new(|| keyword_set(NOISE_KEYWORDS));
static PARTY: LazyLock<RegexSet> = LazyLock::new(|| keyword_set(PARTY_TYPES));

static PARENT_CHILD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"parent.*child|child.*parent").expect("valid regex"));
static VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"api.*version|version.*\d+\.\d+").expect("valid regex"));

fn matches(set: &RegexSet, text: &str) -> f32 {
    set.matches(text).iter().count() as f32
}

/// Raw component scores for one text blob.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubScores {
    pub relationship: f32,
    pub combination: f32,
    pub structural: f32,
    pub generic_penalty: f32,
    pub noise_penalty: f32,
}

impl SubScores {
    /// Score a lowercase text blob.
    pub fn from_text(text: &str) -> Self {
        Self {
            relationship: relationship_score(text),
            combination: combination_score(text),
            structural: structural_score(text),
            generic_penalty: generic_penalty(text),
            noise_penalty: noise_penalty(text),
        }
    }

    /// Final score clamped to `[0, 100]`.
    pub fn total(&self) -> f32 {
        let best = self
            .relationship
            .max(self.combination)
            .max(self.structural);
        (BASE_SCORE + best - self.generic_penalty - self.noise_penalty).clamp(0.0, 100.0)
    }

    /// Dominant category; ties go to relationship, then combination.
    pub fn category(&self) -> PatternCategory {
        let mut best: Option<(PatternCategory, f32)> = None;
        for (category, score) in [
            (PatternCategory::Relationship, self.relationship),
            (PatternCategory::Combination, self.combination),
            (PatternCategory::Structural, self.structural),
        ] {
            if score > CATEGORY_FLOOR && best.map_or(true, |(_, b)| score > b) {
                best = Some((category, score));
            }
        }
        best.map(|(category, _)| category)
            .unwrap_or(PatternCategory::Generic)
    }
}

fn relationship_score(text: &str) -> f32 {
    let mut score = matches(&RELATIONSHIP, text) * 15.0;

    let has_reference = text.contains("paxrefid") || text.contains("reference");
    if has_reference && text.contains("infant") && text.contains("adult") {
        score += 25.0;
    }

    if text.contains("reference") && text.contains("pax") {
        score += 20.0;
    }

    if PARENT_CHILD.is_match(text) {
        score += 20.0;
    }

    score.min(SUB_SCORE_CAP)
}

fn combination_score(text: &str) -> f32 {
    let mut score = matches(&COMBINATION, text) * 15.0;

    if PARTY.matches(text).iter().count() >= 2 {
        score += 20.0;
    }

    if text.contains("mix") || text.contains("combination") {
        score += 15.0;
    }

    score.min(SUB_SCORE_CAP)
}

fn structural_score(text: &str) -> f32 {
    let mut score = matches(&STRUCTURAL, text) * 15.0;

    if VERSION.is_match(text) {
        score += 20.0;
    }

    if text.contains("unique") && (text.contains("structure") || text.contains("pattern")) {
        score += 20.0;
    }

    score.min(SUB_SCORE_CAP)
}

fn generic_penalty(text: &str) -> f32 {
    let mut penalty = matches(&GENERIC, text) * 10.0;

    if BASIC.matches(text).iter().count() >= 3 {
        penalty += 30.0;
    }

    penalty.min(SUB_SCORE_CAP)
}

fn noise_penalty(text: &str) -> f32 {
    let mut penalty = matches(&NOISE, text) * 15.0;

    let has_business_vocabulary = ["relationship", "combination", "unique"]
        .iter()
        .any(|w| text.contains(w));
    if text.contains("validation") && !has_business_vocabulary {
        penalty += 20.0;
    }

    penalty.min(SUB_SCORE_CAP)
}

/// Classify a single pattern.
pub fn classify_pattern(pattern: &CandidatePattern) -> PatternClassification {
    let scores = SubScores::from_text(&pattern.text_blob());
    let score = scores.total();
    let category = scores.category();

    let mut reasons = Vec::new();
    match category {
        PatternCategory::Relationship => reasons.push(format!(
            "Contains relationship patterns (score: {})",
            scores.relationship
        )),
        PatternCategory::Combination => reasons.push(format!(
            "Contains combination patterns (score: {})",
            scores.combination
        )),
        PatternCategory::Structural => reasons.push(format!(
            "Contains structural uniqueness (score: {})",
            scores.structural
        )),
        PatternCategory::Generic => {}
    }
    if scores.generic_penalty > 20.0 {
        reasons.push(format!(
            "Generic pattern penalty applied (-{})",
            scores.generic_penalty
        ));
    }
    if scores.noise_penalty > 20.0 {
        reasons.push(format!(
            "Noise pattern penalty applied (-{})",
            scores.noise_penalty
        ));
    }
    if reasons.is_empty() {
        reasons.push("No producer-distinguishing vocabulary found".to_string());
    }

    PatternClassification {
        tier: ValueTier::from_score(score),
        score,
        category,
        reasons,
    }
}

/// Classify every pattern and keep those scoring at least `min_score`.
///
/// Returns the kept patterns with their classification attached, plus the
/// classification of every input in input order.
pub fn filter_patterns(
    patterns: &[CandidatePattern],
    min_score: f32,
) -> (Vec<ScoredPattern>, Vec<PatternClassification>) {
    let mut kept = Vec::new();
    let mut classifications = Vec::with_capacity(patterns.len());

    for pattern in patterns {
        let classification = classify_pattern(pattern);
        if classification.score >= min_score {
            kept.push(ScoredPattern {
                pattern: pattern.clone(),
                classification: classification.clone(),
            });
        }
        classifications.push(classification);
    }

    debug!(
        total = patterns.len(),
        kept = kept.len(),
        min_score = min_score,
        "Filtered candidate patterns"
    );

    (kept, classifications)
}

/// Classifier bound to a validated config.
#[derive(Debug, Clone, Default)]
pub struct PatternClassifier {
    config: ClassifierConfig,
}

impl PatternClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ClassifierConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn classify(&self, pattern: &CandidatePattern) -> PatternClassification {
        classify_pattern(pattern)
    }

    /// Filter with the configured minimum score.
    pub fn filter(
        &self,
        patterns: &[CandidatePattern],
    ) -> (Vec<ScoredPattern>, Vec<PatternClassification>) {
        filter_patterns(patterns, self.config.min_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn infant_link() -> CandidatePattern {
        CandidatePattern::new("Infant PaxRefID linkage")
            .with_description("Each infant carries a PaxRefID pointing at the accompanying adult")
            .with_path("/OrderViewRS/DataLists/PaxList/Pax/PaxRefID")
    }

    #[test]
    fn test_basic_field_listing_is_noise() {
        let pattern = CandidatePattern::new("name birthdate gender title surname givenname");
        let classification = classify_pattern(&pattern);

        assert!(classification.score < 60.0);
        assert!(matches!(
            classification.tier,
            ValueTier::Low | ValueTier::Noise
        ));
        assert_eq!(classification.category, PatternCategory::Generic);
        assert!(classification
            .reasons
            .iter()
            .any(|r| r.starts_with("Generic pattern penalty")));
    }

    #[test]
    fn test_infant_adult_reference_is_high_value_relationship() {
        let classification = classify_pattern(&infant_link());

        assert!(classification.score >= 80.0);
        assert_eq!(classification.tier, ValueTier::High);
        assert_eq!(classification.category, PatternCategory::Relationship);
    }

    #[test]
    fn test_sub_scores_are_capped() {
        let text = "paxrefid reference relationship linking dependency association \
                    passengerid infant adult parent child";
        let scores = SubScores::from_text(text);
        assert_eq!(scores.relationship, 50.0);
        assert_eq!(scores.total(), 100.0);
    }

    #[test]
    fn test_combination_category() {
        let pattern = CandidatePattern::new("Passenger mix")
            .with_description("Composition of ADT and CHD travellers in the passenger list");
        let scores = SubScores::from_text(&pattern.text_blob());

        // mix, composition, passenger.*list + two party types
        assert_eq!(scores.combination, 50.0);
        assert_eq!(scores.category(), PatternCategory::Combination);
        assert_eq!(classify_pattern(&pattern).tier, ValueTier::High);
    }

    #[test]
    fn test_mix_wording_lifts_combination() {
        let scores = SubScores::from_text("passenger mix combination");

        // combination, mix + mix wording bonus
        assert_eq!(scores.combination, 45.0);
        assert_eq!(scores.category(), PatternCategory::Combination);
        assert_eq!(scores.total(), 95.0);
    }

    #[test]
    fn test_pax_reference_wording_lifts_relationship() {
        let pattern = CandidatePattern::new("Pax reference element");
        let scores = SubScores::from_text(&pattern.text_blob());

        // reference + pax reference bonus
        assert_eq!(scores.relationship, 35.0);
        assert_eq!(scores.category(), PatternCategory::Relationship);

        let classification = classify_pattern(&pattern);
        assert_eq!(classification.score, 85.0);
        assert_eq!(classification.tier, ValueTier::High);
    }

    #[test]
    fn test_structural_category() {
        let pattern = CandidatePattern::new("Carrier specific envelope")
            .with_description("Unique structure introduced in API version 18.1");
        let scores = SubScores::from_text(&pattern.text_blob());

        assert_eq!(scores.structural, 50.0);
        assert_eq!(scores.category(), PatternCategory::Structural);
    }

    #[test]
    fn test_validation_only_is_penalized() {
        let pattern = CandidatePattern::new("Validation only")
            .with_description("Format check that the required field is present");
        let scores = SubScores::from_text(&pattern.text_blob());

        // validation.*only, format.*check, required.*field, + bare validation
        assert_eq!(scores.noise_penalty, 50.0);
        assert_eq!(classify_pattern(&pattern).tier, ValueTier::Noise);
    }

    #[test]
    fn test_empty_pattern_gets_neutral_score() {
        let classification = classify_pattern(&CandidatePattern::default());

        assert_eq!(classification.score, 50.0);
        assert_eq!(classification.tier, ValueTier::Low);
        assert_eq!(classification.category, PatternCategory::Generic);
        assert_eq!(classification.reasons.len(), 1);
    }

    #[test]
    fn test_filter_keeps_scores_above_threshold() {
        let patterns = vec![
            infant_link(),
            CandidatePattern::new("name birthdate gender title surname givenname"),
        ];

        let (kept, all) = filter_patterns(&patterns, 60.0);

        assert_eq!(all.len(), 2);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].pattern.name, "Infant PaxRefID linkage");
        assert_eq!(kept[0].category(), PatternCategory::Relationship);
    }

    #[test]
    fn test_classifier_rejects_invalid_min_score() {
        assert!(PatternClassifier::with_config(ClassifierConfig::new().with_min_score(-1.0)).is_err());

        let classifier =
            PatternClassifier::with_config(ClassifierConfig::new().with_min_score(0.0)).unwrap();
        let (kept, _) = classifier.filter(&[CandidatePattern::default()]);
        assert_eq!(kept.len(), 1);
    }
}
