//! Fingerprint extraction - passenger mix and reference direction.
//!
//! Two element shapes are recognised for parties:
//!
//! - `<Pax><PaxID>..</PaxID><PTC>..</PTC><PaxRefID>..</PaxRefID></Pax>`
//! - `<Passenger PassengerID=".."><PTC>..</PTC><PaxRefID>..</PaxRefID></Passenger>`
//!
//! The passenger-type code (`PTC`) is the primary marker. Documents without
//! one fall back to classifying parties by birth year.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, Utc};
use indexmap::IndexMap;
use regex::Regex;
use tracing::debug;

use crate::types::fingerprint::{PassengerCombination, RelationshipDirection, RelationshipPattern};
use crate::types::xml::XmlNode;

const PTC_TAG: &str = "PTC";
const PAX_REF_TAG: &str = "PaxRefID";
const CONTACT_REF_TAG: &str = "ContactInfoRef";
const BIRTHDATE_TAGS: &[&str] = &["Birthdate", "BirthDate"];

const ADULT: &str = "ADT";
const CHILD: &str = "CHD";
const INFANT: &str = "INF";

/// Ages below these are infants and children respectively.
const INFANT_AGE_LIMIT: i32 = 2;
const CHILD_AGE_LIMIT: i32 = 12;

const DIRECTED_CONFIDENCE: f32 = 0.9;
const UNDIRECTED_CONFIDENCE: f32 = 0.1;

static COUNT_IN_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*(adt|adults?|chd|child(?:ren)?|inf|infants?)\b").expect("valid regex")
});

/// Count parties by type, using today's date for the birth-year fallback.
pub fn extract_combination(doc: &XmlNode) -> PassengerCombination {
    extract_combination_as_of(doc, Utc::now().date_naive())
}

/// Count parties by type.
///
/// `today` anchors the age fallback, which compares birth year against the
/// current year only.
pub fn extract_combination_as_of(doc: &XmlNode, today: NaiveDate) -> PassengerCombination {
    let (mut adults, mut children, mut infants) = (0u32, 0u32, 0u32);

    for code in doc
        .iter()
        .filter(|n| n.tag == PTC_TAG)
        .filter_map(XmlNode::text_trimmed)
    {
        let slot = match code {
            ADULT => &mut adults,
            CHILD => &mut children,
            INFANT => &mut infants,
            _ => continue,
        };
        *slot = slot.saturating_add(1);
    }

    let by_age = adults == 0 && children == 0 && infants == 0;
    if by_age {
        for birth_year in doc
            .iter()
            .filter(|n| BIRTHDATE_TAGS.contains(&n.tag.as_str()))
            .filter_map(XmlNode::text_trimmed)
            .filter_map(|t| NaiveDate::parse_from_str(t, "%Y-%m-%d").ok())
            .map(|d| d.year())
        {
            let age = today.year() - birth_year;
            let slot = if age < INFANT_AGE_LIMIT {
                &mut infants
            } else if age < CHILD_AGE_LIMIT {
                &mut children
            } else {
                &mut adults
            };
            *slot = slot.saturating_add(1);
        }
    }

    let combination = PassengerCombination::new(adults, children, infants);
    debug!(
        signature = %combination,
        by_age = by_age,
        "Extracted passenger combination"
    );
    combination
}

/// A party's type and the party it points at, if any.
#[derive(Debug, Clone)]
struct Party<'a> {
    ptc: &'a str,
    reference: Option<&'a str>,
}

fn party_from(node: &XmlNode) -> Option<(&str, Party<'_>)> {
    let id = match node.tag.as_str() {
        "Pax" => node.find_text("PaxID")?,
        "Passenger" => node.attribute("PassengerID")?.trim(),
        _ => return None,
    };
    let ptc = node.find_text(PTC_TAG)?;
    let reference = node.find_text(PAX_REF_TAG);
    Some((id, Party { ptc, reference }))
}

/// Determine which way parties reference each other.
pub fn extract_relationship(doc: &XmlNode) -> RelationshipPattern {
    let mut parties: IndexMap<&str, Party<'_>> = IndexMap::new();
    for (id, party) in doc.iter().filter_map(party_from) {
        parties.insert(id, party);
    }

    let mut infant_to_adult = 0usize;
    let mut adult_to_infant = 0usize;
    for party in parties.values() {
        let Some(target) = party.reference.and_then(|r| parties.get(r)) else {
            continue;
        };
        match (party.ptc, target.ptc) {
            (INFANT, ADULT) => infant_to_adult += 1,
            (ADULT, INFANT) => adult_to_infant += 1,
            _ => {}
        }
    }

    let direction = match (infant_to_adult > 0, adult_to_infant > 0) {
        (true, false) => RelationshipDirection::InfantToAdult,
        (false, true) => RelationshipDirection::AdultToInfant,
        (true, true) => RelationshipDirection::Bidirectional,
        (false, false) => RelationshipDirection::None,
    };

    let pax_refs = doc.iter().filter(|n| n.tag == PAX_REF_TAG).count();
    let contact_refs = doc.iter().filter(|n| n.tag == CONTACT_REF_TAG).count();

    let mut structure = format!(
        "Found {} PaxRefID elements, {} ContactInfoRef elements",
        pax_refs, contact_refs
    );
    if infant_to_adult > 0 {
        structure.push_str(&format!(", {} INF→ADT links", infant_to_adult));
    }
    if adult_to_infant > 0 {
        structure.push_str(&format!(", {} ADT→INF links", adult_to_infant));
    }

    let linking_rules = match direction {
        RelationshipDirection::InfantToAdult => "Each infant references exactly one adult",
        RelationshipDirection::AdultToInfant => "Each adult references associated infant",
        RelationshipDirection::Bidirectional => "Infants and adults reference each other",
        RelationshipDirection::None => "",
    };

    let confidence = if direction.is_determined() {
        DIRECTED_CONFIDENCE
    } else {
        UNDIRECTED_CONFIDENCE
    };

    debug!(
        parties = parties.len(),
        direction = %direction,
        pax_refs = pax_refs,
        contact_refs = contact_refs,
        "Extracted relationship pattern"
    );

    RelationshipPattern::new(direction, structure, linking_rules, confidence)
}

/// Read passenger counts out of free text such as `"2 ADT, 1 INF"` or
/// `"2 adults and 1 infant"`.
///
/// Returns `None` when the text names no counts. Repeated mentions of a type
/// add up and saturate at `u32::MAX`.
pub fn parse_combination(text: &str) -> Option<PassengerCombination> {
    let (mut adults, mut children, mut infants) = (0u32, 0u32, 0u32);
    let mut found = false;

    for caps in COUNT_IN_TEXT.captures_iter(text) {
        let Ok(count) = caps[1].parse::<u32>() else {
            continue;
        };
        found = true;
        let slot = match caps[2].as_bytes()[0].to_ascii_lowercase() {
            b'a' => &mut adults,
            b'c' => &mut children,
            _ => &mut infants,
        };
        *slot = slot.saturating_add(count);
    }

    found.then(|| PassengerCombination::new(adults, children, infants))
}
