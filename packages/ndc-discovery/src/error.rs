//! Typed errors for the discovery library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.
//!
//! Scoring and matching never fail. Errors only surface at the boundary:
//! invalid configuration, unparseable XML, or malformed JSON interchange.

use thiserror::Error;

/// Errors that can occur at the boundary of the discovery engine.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// A tunable parameter violates its precondition
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },

    /// The XML reader rejected the input
    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    /// The XML was readable but not a single well-formed tree
    #[error("malformed XML: {reason}")]
    MalformedXml { reason: String },

    /// A combination signature could not be read
    #[error("invalid combination signature: {signature}")]
    InvalidSignature { signature: String },

    /// JSON interchange failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DiscoveryError {
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedXml {
            reason: reason.into(),
        }
    }
}

/// Result type alias for discovery operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;
