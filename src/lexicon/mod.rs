//! Static lexicons: known medications and frequency vocabulary.
//!
//! Loaded once, read-only, safe for concurrent readers. Table order is
//! the scan order of the extractors, so iteration is deterministic.

pub mod frequency;
pub mod medications;
