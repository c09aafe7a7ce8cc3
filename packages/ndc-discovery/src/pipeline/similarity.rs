//! Similarity between fingerprints.
//!
//! Overall similarity is `0.4 * combination + 0.6 * relationship`. The
//! relationship carries more weight because producers differ most in how
//! they link parties, not in how many parties a booking holds.

use crate::types::fingerprint::{PassengerCombination, RelationshipPattern};

const COMBINATION_WEIGHT: f32 = 0.4;
const RELATIONSHIP_WEIGHT: f32 = 0.6;

const ADULT_WEIGHT: f32 = 0.3;
const CHILD_WEIGHT: f32 = 0.2;
const INFANT_WEIGHT: f32 = 0.5;

const DIRECTION_WEIGHT: f32 = 0.6;
const STRUCTURE_WEIGHT: f32 = 0.2;
const RULES_WEIGHT: f32 = 0.2;

/// Credit given to a direction mismatch.
const DIRECTION_MISMATCH_CREDIT: f32 = 0.3;

/// Similarity of two passenger combinations in `[0, 1]`.
///
/// An empty combination on either side scores 0, even against another
/// empty one.
pub fn combination_similarity(a: &PassengerCombination, b: &PassengerCombination) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a.same_counts(b) {
        return 1.0;
    }

    count_similarity(a.adults(), b.adults()) * ADULT_WEIGHT
        + count_similarity(a.children(), b.children()) * CHILD_WEIGHT
        + count_similarity(a.infants(), b.infants()) * INFANT_WEIGHT
}

fn count_similarity(a: u32, b: u32) -> f32 {
    1.0 - a.abs_diff(b) as f32 / a.max(b).max(1) as f32
}

/// Similarity of two relationship patterns in `[0, 1]`.
pub fn relationship_similarity(a: &RelationshipPattern, b: &RelationshipPattern) -> f32 {
    let direction = if a.direction == b.direction {
        1.0
    } else {
        DIRECTION_MISMATCH_CREDIT
    };

    let structure = if structures_overlap(&a.reference_structure, &b.reference_structure) {
        1.0
    } else {
        0.0
    };

    let rules = if a.linking_rules == b.linking_rules {
        1.0
    } else {
        0.0
    };

    direction * DIRECTION_WEIGHT + structure * STRUCTURE_WEIGHT + rules * RULES_WEIGHT
}

/// Equal, or one description contains the other. An empty description only
/// overlaps another empty one.
fn structures_overlap(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

/// Weighted similarity of an unknown document's fingerprint to a known one.
pub fn pattern_similarity(
    combination: &PassengerCombination,
    relationship: &RelationshipPattern,
    known_combination: &PassengerCombination,
    known_relationship: &RelationshipPattern,
) -> f32 {
    combination_similarity(combination, known_combination) * COMBINATION_WEIGHT
        + relationship_similarity(relationship, known_relationship) * RELATIONSHIP_WEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fingerprint::RelationshipDirection;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    fn infant_to_adult() -> RelationshipPattern {
        RelationshipPattern::new(
            RelationshipDirection::InfantToAdult,
            "Found 1 PaxRefID elements, 0 ContactInfoRef elements, 1 INF→ADT links",
            "Each infant references exactly one adult",
            0.9,
        )
    }

    #[test]
    fn test_exact_combination() {
        let a = PassengerCombination::new(2, 1, 1);
        assert_eq!(combination_similarity(&a, &a.clone()), 1.0);
    }

    #[test]
    fn test_empty_combination_scores_zero() {
        let empty = PassengerCombination::empty();
        let pair = PassengerCombination::new(2, 0, 0);
        assert_eq!(combination_similarity(&empty, &pair), 0.0);
        assert_eq!(combination_similarity(&pair, &empty), 0.0);
        assert_eq!(combination_similarity(&empty, &empty), 0.0);
    }

    #[test]
    fn test_weighted_combination() {
        // adults 1 - 1/2, children equal at zero, infants 1 - 1/1
        let a = PassengerCombination::new(2, 0, 1);
        let b = PassengerCombination::new(1, 0, 0);
        let expected = 0.5 * 0.3 + 1.0 * 0.2 + 0.0 * 0.5;
        assert!(approx(combination_similarity(&a, &b), expected));
        assert!(approx(combination_similarity(&b, &a), expected));
    }

    #[test]
    fn test_maximum_counts_stay_in_range() {
        let huge = PassengerCombination::new(u32::MAX, u32::MAX, u32::MAX);
        let small = PassengerCombination::new(1, 1, 0);

        let score = combination_similarity(&huge, &small);
        assert!((0.0..=1.0).contains(&score));
        assert_eq!(combination_similarity(&huge, &huge), 1.0);
        assert_eq!(
            combination_similarity(&PassengerCombination::new(u32::MAX, 1, 0), &small),
            combination_similarity(&small, &PassengerCombination::new(u32::MAX, 1, 0))
        );
    }

    #[test]
    fn test_identical_relationships() {
        let rel = infant_to_adult();
        assert!(approx(relationship_similarity(&rel, &rel.clone()), 1.0));
    }

    #[test]
    fn test_direction_mismatch() {
        let a = infant_to_adult();
        let b = RelationshipPattern::new(
            RelationshipDirection::AdultToInfant,
            "PaxRefID",
            "Each adult references associated infant",
            0.9,
        );
        // 0.3 direction credit, substring overlap, different rules
        assert!(approx(relationship_similarity(&a, &b), 0.3 * 0.6 + 0.2));
    }

    #[test]
    fn test_empty_structure_does_not_overlap_text() {
        let a = infant_to_adult();
        let none = RelationshipPattern::none();
        assert!(approx(relationship_similarity(&a, &none), 0.3 * 0.6));
        assert!(approx(relationship_similarity(&none, &none), 1.0));
    }

    #[test]
    fn test_pattern_similarity_weights() {
        let combo = PassengerCombination::new(2, 1, 1);
        let rel = infant_to_adult();
        assert!(approx(pattern_similarity(&combo, &rel, &combo, &rel), 1.0));

        let empty = PassengerCombination::empty();
        let none = RelationshipPattern::none();
        // Empty query: combination 0, relationship 0.3 * 0.6
        assert!(approx(
            pattern_similarity(&empty, &none, &combo, &rel),
            0.6 * 0.18
        ));
    }
}
