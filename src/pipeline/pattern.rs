//! Pattern-based extraction strategy: surface regexes over the original
//! text, independent of the medication lexicon.
//!
//! Patterns run in a fixed priority order — dispensing-form-prefixed
//! shapes first, bare name + dosage next, dosage-first last — and all
//! matches are collected; only the first match per medication name
//! survives. This strategy is what catches drugs the lexicon has never
//! heard of, as long as they are written next to a dosage.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::config;
use crate::lexicon::frequency;
use crate::models::{ExtractionSource, MedicationCandidate};

use super::context;
use super::normalize::title_case;

/// Confidence assigned to every pattern-matched candidate.
const PATTERN_CONFIDENCE: f32 = 0.7;

/// How far past a dosage-first match to look for the medication name.
const NAME_LOOKAHEAD: usize = 50;

/// A candidate name: letter-started words, optionally hyphen/space joined.
const NAME: &str = r"[A-Za-z][A-Za-z]+(?:[-\s][A-Za-z][A-Za-z]+)*";

/// Dispensing forms that prefix a medication name on a prescription.
const FORM: &str = r"(?:Tablet|Capsule|Syrup|Injection|Tabs?|Caps?|Syr|Syp|Inj)";

const UNIT: &str = r"(mg|ml|g|mcg|units?)";

/// What a pattern captures, in the order patterns are tried.
enum Shape {
    /// form word, then (name, number, unit)
    FormDosed,
    /// form word, then (name) — dosage defaults to "1 tablet"
    FormBare,
    /// (name, number, unit)
    NameDosed,
    /// (number, unit) — name recovered by forward scan, or discarded
    DoseFirst,
}

static PATTERNS: LazyLock<Vec<(Regex, Shape)>> = LazyLock::new(|| {
    vec![
        (
            Regex::new(&format!(r"(?i)\b{FORM}\.?\s+({NAME})\s*(\d+(?:\.\d+)?)\s*{UNIT}\b"))
                .unwrap(),
            Shape::FormDosed,
        ),
        (
            Regex::new(&format!(r"(?i)\b{FORM}\.?\s+({NAME})\b")).unwrap(),
            Shape::FormBare,
        ),
        (
            Regex::new(&format!(r"(?i)\b({NAME})\s*(\d+(?:\.\d+)?)\s*{UNIT}\b")).unwrap(),
            Shape::NameDosed,
        ),
        (
            Regex::new(&format!(r"(?i)\b(\d+(?:\.\d+)?)\s*{UNIT}\s")).unwrap(),
            Shape::DoseFirst,
        ),
    ]
});

/// Capitalized word run — the forward-scan target after a dosage-first
/// match. Deliberately case-sensitive: lowercase prose must not be taken
/// for a drug name.
static RE_CAPITALIZED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][a-z]+(?:[-\s][A-Z][a-z]+)*").unwrap());

/// Extract candidates by surface shape, independent of the lexicon.
pub fn extract_by_pattern(text: &str) -> Vec<MedicationCandidate> {
    let mut candidates = Vec::new();
    if text.trim().is_empty() {
        return candidates;
    }

    let mut seen_names: HashSet<String> = HashSet::new();

    for (re, shape) in PATTERNS.iter() {
        for caps in re.captures_iter(text) {
            let (name, dosage) = match shape {
                Shape::FormDosed => (
                    caps[1].to_string(),
                    format!("{} {}", &caps[2], caps[3].to_lowercase()),
                ),
                Shape::FormBare => (caps[1].to_string(), config::TABLET_DOSAGE.to_string()),
                Shape::NameDosed => (
                    caps[1].to_string(),
                    format!("{} {}", &caps[2], caps[3].to_lowercase()),
                ),
                Shape::DoseFirst => {
                    let dosage = format!("{} {}", &caps[1], caps[2].to_lowercase());
                    match scan_forward_for_name(text, caps.get(0).unwrap().end()) {
                        Some(name) => (name, dosage),
                        // No recoverable name: drop the match rather than
                        // emit a placeholder that would corrupt
                        // downstream uniqueness.
                        None => continue,
                    }
                }
            };

            let name = name.trim().to_string();
            if name.len() < 3 || name.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            if !seen_names.insert(name.to_lowercase()) {
                continue;
            }

            let frequency_label = context::frequency_near(text, &name);
            candidates.push(MedicationCandidate {
                name: title_case(&name),
                dosage,
                frequency: frequency_label.clone(),
                duration: context::duration_near(text, &name),
                instructions: frequency::expand_instructions(&frequency_label),
                confidence: PATTERN_CONFIDENCE,
                source: ExtractionSource::PatternBased,
            });
        }
    }

    candidates
}

/// After a `<number> <unit>` match, the name — when the prescription puts
/// the strength first — follows within a short distance. Returns the
/// first capitalized word run inside the lookahead, if any.
fn scan_forward_for_name(text: &str, from: usize) -> Option<String> {
    let end = clamp(text, (from + NAME_LOOKAHEAD).min(text.len()));
    let ahead = &text[clamp(text, from)..end];
    RE_CAPITALIZED.find(ahead).map(|m| m.as_str().to_string())
}

fn clamp(s: &str, mut i: usize) -> usize {
    i = i.min(s.len());
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}
