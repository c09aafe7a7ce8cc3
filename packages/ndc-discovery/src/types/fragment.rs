//! Fragment type - a bounded subtree handed to the extraction step.

use serde::{Deserialize, Serialize};

/// A subtree selected for downstream pattern extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// Structural path of the subtree root
    pub path: String,

    /// Compact XML of the subtree
    pub xml: String,

    /// Weighted size estimate used for the size window
    pub complexity: f32,

    /// How much distinguishing content the subtree is likely to carry
    pub usefulness: f32,
}

impl Fragment {
    /// Serialized size in characters.
    pub fn char_len(&self) -> usize {
        self.xml.chars().count()
    }

    /// Whether `other` lies strictly inside this fragment's subtree.
    pub fn contains(&self, other: &Fragment) -> bool {
        is_ancestor_path(&self.path, &other.path)
    }

    /// Whether either fragment lies inside the other.
    pub fn overlaps(&self, other: &Fragment) -> bool {
        self.path == other.path || self.contains(other) || other.contains(self)
    }
}

/// Whether `ancestor` is a strict prefix of `path` on a segment boundary.
pub fn is_ancestor_path(ancestor: &str, path: &str) -> bool {
    path.len() > ancestor.len()
        && path.starts_with(ancestor)
        && path.as_bytes()[ancestor.len()] == b'/'
}
