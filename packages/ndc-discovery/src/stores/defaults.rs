//! Built-in fingerprints for common producer releases.

use crate::types::fingerprint::{
    AirlineFingerprint, PassengerCombination, RelationshipDirection, RelationshipPattern,
};

const PAX_REF_STRUCTURE: &str = "PaxList/Pax/PaxRefID";

/// Seed library used by [`MemoryStore::with_defaults`](super::MemoryStore::with_defaults).
pub fn default_fingerprints() -> Vec<AirlineFingerprint> {
    let infant_to_adult = || {
        RelationshipPattern::new(
            RelationshipDirection::InfantToAdult,
            "PaxRefID",
            "Each infant references exactly one adult",
            0.9,
        )
    };

    vec![
        AirlineFingerprint::new(
            "LH",
            "17.2",
            PassengerCombination::new(2, 1, 1),
            infant_to_adult(),
        )
        .with_structural_signature(PAX_REF_STRUCTURE)
        .with_features(["Infant Pax carries PaxRefID of the accompanying adult"]),
        AirlineFingerprint::new(
            "BA",
            "18.1",
            PassengerCombination::new(2, 0, 1),
            infant_to_adult(),
        )
        .with_structural_signature(PAX_REF_STRUCTURE)
        .with_features(["Couple with lap infant", "Infant Pax carries PaxRefID"]),
        AirlineFingerprint::new(
            "AF",
            "19.1",
            PassengerCombination::new(1, 0, 1),
            RelationshipPattern::new(
                RelationshipDirection::AdultToInfant,
                "PaxRefID",
                "Each adult references associated infant",
                0.9,
            ),
        )
        .with_structural_signature(PAX_REF_STRUCTURE)
        .with_features(["Adult Pax carries PaxRefID of the infant"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_both_directions() {
        let defaults = default_fingerprints();

        assert_eq!(defaults.len(), 3);
        assert!(defaults
            .iter()
            .all(|f| f.structural_signature == PAX_REF_STRUCTURE));
        let directions: Vec<_> = defaults.iter().map(|f| f.relationship.direction).collect();
        assert_eq!(
            directions,
            vec![
                RelationshipDirection::InfantToAdult,
                RelationshipDirection::InfantToAdult,
                RelationshipDirection::AdultToInfant,
            ]
        );
    }
}
