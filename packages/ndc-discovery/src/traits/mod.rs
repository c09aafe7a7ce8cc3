//! Trait seams for the discovery library.
//!
//! Applications implement these to plug in their own fingerprint storage.

pub mod store;
