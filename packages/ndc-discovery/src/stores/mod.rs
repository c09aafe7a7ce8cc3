//! Fingerprint store implementations.

pub mod defaults;
pub mod memory;

pub use defaults::default_fingerprints;
pub use memory::MemoryStore;
