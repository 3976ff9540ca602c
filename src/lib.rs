//! Rule-based prescription text extraction.
//!
//! Takes best-effort OCR text from a scanned prescription and produces a
//! deduplicated list of structured medication records (name, dosage,
//! frequency, duration, timing instructions), plus the translation from a
//! free-text dosing frequency to concrete reminder clock times.
//!
//! The pipeline is deterministic and rule-based: a medication lexicon scan
//! and a surface-pattern scan run independently over the normalized text,
//! and an entity merger reduces their candidates to one best record per
//! medication. Nothing in the pipeline fails on bad input — garbage OCR
//! text degrades to an empty record list.

pub mod config;
pub mod lexicon;
pub mod models;
pub mod pipeline;
pub mod schedule;

pub use models::{MedicationCandidate, MedicationRecord};
pub use pipeline::extract_medications;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for binaries and integration harnesses embedding
/// this crate. Respects `RUST_LOG`; falls back to the crate default.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("rxtract v{}", config::CRATE_VERSION);
}
