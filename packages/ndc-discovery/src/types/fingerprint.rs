//! Producer fingerprint types.
//!
//! A fingerprint pairs the passenger-type mix of a document with the
//! direction in which its parties reference each other. Producers differ
//! most visibly in how infants are linked to adults, which is why the
//! relationship carries more weight than the counts when matching.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DiscoveryError;

/// Counts of adult, child and infant parties plus their compact signature.
///
/// The signature is derived from the counts and recomputed whenever they
/// change, so it can never drift.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "CombinationCounts")]
pub struct PassengerCombination {
    adults: u32,
    children: u32,
    infants: u32,
    signature: String,
}

#[derive(Deserialize)]
struct CombinationCounts {
    #[serde(default)]
    adults: u32,
    #[serde(default)]
    children: u32,
    #[serde(default)]
    infants: u32,
}

impl From<CombinationCounts> for PassengerCombination {
    fn from(counts: CombinationCounts) -> Self {
        Self::new(counts.adults, counts.children, counts.infants)
    }
}

impl Default for PassengerCombination {
    fn default() -> Self {
        Self::empty()
    }
}

impl PassengerCombination {
    pub fn new(adults: u32, children: u32, infants: u32) -> Self {
        Self {
            adults,
            children,
            infants,
            signature: signature_for(adults, children, infants),
        }
    }

    /// The all-zero combination, signature `EMPTY`.
    pub fn empty() -> Self {
        Self::new(0, 0, 0)
    }

    /// Replace the counts and recompute the signature.
    pub fn set_counts(&mut self, adults: u32, children: u32, infants: u32) {
        *self = Self::new(adults, children, infants);
    }

    pub fn adults(&self) -> u32 {
        self.adults
    }

    pub fn children(&self) -> u32 {
        self.children
    }

    pub fn infants(&self) -> u32 {
        self.infants
    }

    /// Compact form such as `2ADT+1CHD+1INF`.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Party count, widened so large counts cannot overflow.
    pub fn total(&self) -> u64 {
        u64::from(self.adults) + u64::from(self.children) + u64::from(self.infants)
    }

    pub fn is_empty(&self) -> bool {
        self.adults == 0 && self.children == 0 && self.infants == 0
    }

    /// Same counts as `other`.
    pub fn same_counts(&self, other: &PassengerCombination) -> bool {
        self.adults == other.adults
            && self.children == other.children
            && self.infants == other.infants
    }
}

fn signature_for(adults: u32, children: u32, infants: u32) -> String {
    let parts: Vec<String> = [(adults, "ADT"), (children, "CHD"), (infants, "INF")]
        .into_iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, code)| format!("{}{}", count, code))
        .collect();

    if parts.is_empty() {
        "EMPTY".to_string()
    } else {
        parts.join("+")
    }
}

impl fmt::Display for PassengerCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signature)
    }
}

impl FromStr for PassengerCombination {
    type Err = DiscoveryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DiscoveryError::InvalidSignature {
            signature: s.to_string(),
        };

        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("EMPTY") {
            return Ok(Self::empty());
        }

        let (mut adults, mut children, mut infants) = (0u32, 0u32, 0u32);
        for part in trimmed.split('+') {
            let part = part.trim();
            if part.len() < 4 || !part.is_char_boundary(part.len() - 3) {
                return Err(invalid());
            }
            let (count, code) = part.split_at(part.len() - 3);
            let count: u32 = count.trim().parse().map_err(|_| invalid())?;
            let slot = match code.to_ascii_uppercase().as_str() {
                "ADT" => &mut adults,
                "CHD" => &mut children,
                "INF" => &mut infants,
                _ => return Err(invalid()),
            };
            *slot = slot.checked_add(count).ok_or_else(invalid)?;
        }

        Ok(Self::new(adults, children, infants))
    }
}

/// Which way parties reference each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipDirection {
    /// Infants carry a reference to an adult
    #[serde(rename = "INF→ADT")]
    InfantToAdult,

    /// Adults carry a reference to an infant
    #[serde(rename = "ADT→INF")]
    AdultToInfant,

    #[serde(rename = "BIDIRECTIONAL")]
    Bidirectional,

    #[default]
    #[serde(rename = "NONE")]
    None,
}

impl RelationshipDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipDirection::InfantToAdult => "INF→ADT",
            RelationshipDirection::AdultToInfant => "ADT→INF",
            RelationshipDirection::Bidirectional => "BIDIRECTIONAL",
            RelationshipDirection::None => "NONE",
        }
    }

    /// Whether a direction was observed at all.
    pub fn is_determined(&self) -> bool {
        !matches!(self, RelationshipDirection::None)
    }
}

impl fmt::Display for RelationshipDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How parties in a document are linked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipPattern {
    pub direction: RelationshipDirection,

    /// Summary of the reference elements found
    #[serde(default)]
    pub reference_structure: String,

    /// Rule describing the linkage, empty when no direction was found
    #[serde(default)]
    pub linking_rules: String,

    /// Confidence in `[0, 1]`
    pub confidence: f32,
}

impl Default for RelationshipPattern {
    fn default() -> Self {
        Self::none()
    }
}

impl RelationshipPattern {
    pub fn new(
        direction: RelationshipDirection,
        reference_structure: impl Into<String>,
        linking_rules: impl Into<String>,
        confidence: f32,
    ) -> Self {
        Self {
            direction,
            reference_structure: reference_structure.into(),
            linking_rules: linking_rules.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// No relationship observed.
    pub fn none() -> Self {
        Self::new(RelationshipDirection::None, "", "", 0.1)
    }
}

/// Identifies one producer release in the fingerprint library.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FingerprintKey {
    pub producer: String,
    pub version: String,
}

impl FingerprintKey {
    pub fn new(producer: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            producer: producer.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for FingerprintKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.producer, self.version)
    }
}

impl FromStr for FingerprintKey {
    type Err = std::convert::Infallible;

    /// Splits on the first `_`; a key without one gets version `Unknown`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.split_once('_') {
            Some((producer, version)) => Self::new(producer, version),
            None => Self::new(s, "Unknown"),
        })
    }
}

/// A learned producer fingerprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirlineFingerprint {
    /// Producer (airline) code
    pub producer: String,

    /// API / schema version
    pub version: String,

    pub combination: PassengerCombination,

    pub relationship: RelationshipPattern,

    #[serde(default)]
    pub structural_signature: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub distinguishing_features: Vec<String>,

    /// Confidence in `[0, 1]`
    pub confidence: f32,
}

impl AirlineFingerprint {
    pub fn new(
        producer: impl Into<String>,
        version: impl Into<String>,
        combination: PassengerCombination,
        relationship: RelationshipPattern,
    ) -> Self {
        Self {
            producer: producer.into(),
            version: version.into(),
            combination,
            relationship,
            structural_signature: String::new(),
            distinguishing_features: Vec::new(),
            confidence: 1.0,
        }
    }

    pub fn with_structural_signature(mut self, signature: impl Into<String>) -> Self {
        self.structural_signature = signature.into();
        self
    }

    pub fn with_features(mut self, features: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.distinguishing_features = features.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    pub fn key(&self) -> FingerprintKey {
        FingerprintKey::new(&self.producer, &self.version)
    }
}

/// A ranked match of an unknown document against the library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FingerprintMatch {
    pub key: FingerprintKey,
    pub confidence: f32,
}

/// Everything learned about an unknown document in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentificationReport {
    pub combination: PassengerCombination,

    pub relationship: RelationshipPattern,

    /// Best matches first
    #[serde(default)]
    pub matches: Vec<FingerprintMatch>,

    /// Related combination signatures, filled only when nothing matched
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl IdentificationReport {
    pub fn best_match(&self) -> Option<&FingerprintMatch> {
        self.matches.first()
    }

    /// Confidence of the best match, 0 when nothing matched.
    pub fn overall_confidence(&self) -> f32 {
        self.best_match().map(|m| m.confidence).unwrap_or(0.0)
    }

    pub fn is_identified(&self) -> bool {
        !self.matches.is_empty()
    }
}
