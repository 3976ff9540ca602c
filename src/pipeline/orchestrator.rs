//! End-to-end extraction: the sequence the upload handler invokes once
//! per OCR result.

use tracing::debug;

use crate::models::MedicationRecord;

use super::{lexicon_match, merge, normalize, pattern};

/// Run the full pipeline over raw OCR text: normalize, repair garbled
/// drug names, run both extraction strategies, merge.
///
/// Never fails: empty or unrecognizable input degrades to an empty list,
/// which callers surface as "no medications detected".
pub fn extract_medications(ocr_text: &str) -> Vec<MedicationRecord> {
    let cleaned = normalize::normalize(ocr_text);
    if cleaned.is_empty() {
        debug!("nothing left after normalization");
        return Vec::new();
    }
    let corrected = normalize::correct_drug_terms(&cleaned);

    let mut candidates = lexicon_match::extract_by_lexicon(&corrected);
    let lexicon_count = candidates.len();
    candidates.extend(pattern::extract_by_pattern(&corrected));
    debug!(
        lexicon = lexicon_count,
        pattern = candidates.len() - lexicon_count,
        "extraction strategies complete"
    );

    let records = merge::merge(candidates);
    debug!(records = records.len(), "merge complete");
    records
}
