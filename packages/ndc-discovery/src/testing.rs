//! Testing utilities: fixture builders for NDC-style documents and
//! fingerprints.
//!
//! Useful for testing applications that feed documents into the library
//! without shipping sample messages.

use crate::types::fingerprint::{
    AirlineFingerprint, PassengerCombination, RelationshipDirection, RelationshipPattern,
};
use crate::types::xml::XmlNode;

/// `<Pax><PaxID>id</PaxID><PTC>ptc</PTC></Pax>`
pub fn pax(id: &str, ptc: &str) -> XmlNode {
    XmlNode::new("Pax").with_children([
        XmlNode::new("PaxID").with_text(id),
        XmlNode::new("PTC").with_text(ptc),
    ])
}

/// A `Pax` carrying a `PaxRefID` to another party.
pub fn pax_with_ref(id: &str, ptc: &str, reference: &str) -> XmlNode {
    pax(id, ptc).with_child(XmlNode::new("PaxRefID").with_text(reference))
}

/// `<Passenger PassengerID="id"><PTC>ptc</PTC>[<PaxRefID>..</PaxRefID>]</Passenger>`
pub fn passenger(id: &str, ptc: &str, reference: Option<&str>) -> XmlNode {
    let node = XmlNode::new("Passenger")
        .with_attribute("PassengerID", id)
        .with_child(XmlNode::new("PTC").with_text(ptc));
    match reference {
        Some(reference) => node.with_child(XmlNode::new("PaxRefID").with_text(reference)),
        None => node,
    }
}

/// An order view response wrapping `Pax` elements in a `PaxList`.
pub fn ndc_document(paxes: impl IntoIterator<Item = XmlNode>) -> XmlNode {
    XmlNode::new("IATA_OrderViewRS").with_child(
        XmlNode::new("Response").with_child(
            XmlNode::new("DataLists").with_child(XmlNode::new("PaxList").with_children(paxes)),
        ),
    )
}

/// An older-schema response wrapping `Passenger` elements in a
/// `PassengerList`.
pub fn passenger_list_document(passengers: impl IntoIterator<Item = XmlNode>) -> XmlNode {
    XmlNode::new("OrderViewRS").with_child(
        XmlNode::new("DataLists")
            .with_child(XmlNode::new("PassengerList").with_children(passengers)),
    )
}

/// A document with the given party counts, linked in `direction`.
///
/// Parties are numbered `PAX1..` adults first, then children, then
/// infants. Infant `n` is paired with adult `n` (wrapping when there are
/// more infants than adults).
pub fn family_document(
    adults: u32,
    children: u32,
    infants: u32,
    direction: RelationshipDirection,
) -> XmlNode {
    let id = |n: u32| format!("PAX{}", n);
    let adult_id = |i: u32| id(i + 1);
    let infant_id = |i: u32| id(adults + children + i + 1);

    let infant_links_up = matches!(
        direction,
        RelationshipDirection::InfantToAdult | RelationshipDirection::Bidirectional
    );
    let adult_links_down = matches!(
        direction,
        RelationshipDirection::AdultToInfant | RelationshipDirection::Bidirectional
    );

    let mut paxes = Vec::new();
    for i in 0..adults {
        let node = if adult_links_down && i < infants {
            pax_with_ref(&adult_id(i), "ADT", &infant_id(i))
        } else {
            pax(&adult_id(i), "ADT")
        };
        paxes.push(node);
    }
    for i in 0..children {
        paxes.push(pax(&id(adults + i + 1), "CHD"));
    }
    for i in 0..infants {
        let node = if infant_links_up && adults > 0 {
            pax_with_ref(&infant_id(i), "INF", &adult_id(i % adults))
        } else {
            pax(&infant_id(i), "INF")
        };
        paxes.push(node);
    }

    ndc_document(paxes)
}

/// The relationship pattern the extractor reports for `direction`, with a
/// generic `PaxRefID` structure description.
pub fn relationship(direction: RelationshipDirection) -> RelationshipPattern {
    let rules = match direction {
        RelationshipDirection::InfantToAdult => "Each infant references exactly one adult",
        RelationshipDirection::AdultToInfant => "Each adult references associated infant",
        RelationshipDirection::Bidirectional => "Infants and adults reference each other",
        RelationshipDirection::None => return RelationshipPattern::none(),
    };
    RelationshipPattern::new(direction, "PaxRefID", rules, 0.9)
}

/// A fingerprint with counts `(adults, children, infants)`.
pub fn fingerprint(
    producer: &str,
    version: &str,
    (adults, children, infants): (u32, u32, u32),
    direction: RelationshipDirection,
) -> AirlineFingerprint {
    AirlineFingerprint::new(
        producer,
        version,
        PassengerCombination::new(adults, children, infants),
        relationship(direction),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extract::{extract_combination, extract_relationship};

    #[test]
    fn test_family_document_round_trips_through_extraction() {
        for direction in [
            RelationshipDirection::InfantToAdult,
            RelationshipDirection::AdultToInfant,
            RelationshipDirection::Bidirectional,
            RelationshipDirection::None,
        ] {
            let doc = family_document(2, 1, 1, direction);
            assert_eq!(extract_combination(&doc).signature(), "2ADT+1CHD+1INF");
            assert_eq!(extract_relationship(&doc).direction, direction);
        }
    }

    #[test]
    fn test_paths_are_unique() {
        let doc = family_document(2, 0, 0, RelationshipDirection::None);
        let pax_paths: Vec<_> = doc.find_all("Pax").map(|n| n.path.as_str()).collect();
        assert_eq!(
            pax_paths,
            vec![
                "/IATA_OrderViewRS/Response/DataLists/PaxList/Pax[1]",
                "/IATA_OrderViewRS/Response/DataLists/PaxList/Pax[2]",
            ]
        );
    }
}
