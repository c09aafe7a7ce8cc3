//! Data types shared by the selector, classifier and matcher.

pub mod config;
pub mod fingerprint;
pub mod fragment;
pub mod pattern;
pub mod xml;
