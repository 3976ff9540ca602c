//! Lexicon-matching extraction strategy: scan the text for known
//! medication surface variants, then pull dosage, frequency and duration
//! from the context window around each hit.

use crate::lexicon::{frequency, medications};
use crate::models::{ExtractionSource, MedicationCandidate};

use super::context;
use super::normalize::title_case;

/// Confidence assigned to every lexicon-matched candidate.
const LEXICON_CONFIDENCE: f32 = 0.8;

/// Extract candidates for every lexicon medication mentioned in `text`.
///
/// Each canonical drug yields at most one candidate per run — the first
/// variant that matches wins, so a drug's aliases can never produce
/// duplicate entries. A variant is matched by exact case-insensitive
/// containment first; if no variant of a drug is contained, a fuzzy word
/// scan tolerates OCR garbling of the name itself. Drugs that cannot be
/// located either way are skipped silently.
pub fn extract_by_lexicon(text: &str) -> Vec<MedicationCandidate> {
    let mut candidates = Vec::new();
    if text.trim().is_empty() {
        return candidates;
    }
    let lower = text.to_lowercase();

    for &(canonical, variants) in medications::MEDICATIONS {
        let mention = variants
            .iter()
            .copied()
            .find(|v| lower.contains(v))
            .or_else(|| {
                variants
                    .iter()
                    .copied()
                    .find(|v| context::locate_mention(text, v).is_some())
            });
        let Some(mention) = mention else {
            continue;
        };

        let frequency_label = context::frequency_near(text, mention);
        candidates.push(MedicationCandidate {
            name: title_case(canonical),
            dosage: context::dosage_near(text, mention),
            frequency: frequency_label.clone(),
            duration: context::duration_near(text, mention),
            instructions: frequency::expand_instructions(&frequency_label),
            confidence: LEXICON_CONFIDENCE,
            source: ExtractionSource::RuleBased,
        });
    }

    candidates
}
