//! Frequency vocabulary: canonical dosing-cadence labels, the
//! phrase/abbreviation variants that express them, and the expansion of a
//! label into a patient-readable instruction sentence.

use std::sync::LazyLock;

/// Canonical frequency label → surface variants. Variants must be
/// lowercase. Short alphanumeric variants (`bid`, `qd`, `ac`…) are matched
/// as whole words; longer variants by containment.
pub static FREQUENCIES: &[(&str, &[&str])] = &[
    ("once daily", &["once daily", "once a day", "qd", "q.d.", "every 24 hours"]),
    ("twice daily", &["twice daily", "twice a day", "bid", "b.i.d."]),
    (
        "three times daily (morning, afternoon & night)",
        &["three times daily", "three times a day", "tid", "t.i.d."],
    ),
    ("three times daily", &["tds", "t.d.s."]),
    ("four times daily", &["four times daily", "four times a day", "qid", "q.i.d."]),
    ("every 6 hours", &["every 6 hours", "q6h", "q.6.h."]),
    ("every 8 hours", &["every 8 hours", "q8h", "q.8.h."]),
    ("every 12 hours", &["every 12 hours", "q12h", "q.12.h."]),
    ("as needed", &["as needed", "prn", "p.r.n.", "when required", "sos"]),
    ("before meals", &["before meals", "ac", "a.c.", "ante cibum"]),
    ("after meals", &["after meals", "pc", "p.c.", "post cibum", "after food"]),
    ("at bedtime", &["at bedtime", "hs", "h.s.", "hora somni", "before sleep"]),
    (
        "twice daily (morning & night)",
        &["1 morning, 1 night", "morning and night"],
    ),
    ("once daily (morning)", &["1 morning", "in the morning", "morning"]),
    ("once daily (night)", &["1 night", "at night", "night"]),
];

/// Variants flattened and ordered longest-first, so "twice daily" wins
/// over "daily" and "morning and night" over "morning".
static PHRASE_INDEX: LazyLock<Vec<(&'static str, &'static str)>> = LazyLock::new(|| {
    let mut pairs: Vec<(&str, &str)> = FREQUENCIES
        .iter()
        .flat_map(|(label, variants)| variants.iter().map(move |v| (*v, *label)))
        .collect();
    pairs.sort_by_key(|(variant, _)| std::cmp::Reverse(variant.len()));
    pairs
});

/// Abbreviations this short match whole words only; anything longer is
/// distinctive enough for substring containment ("forbid" must not read
/// as `bid`).
const WORD_MATCH_MAX_LEN: usize = 4;

/// Find the canonical frequency label expressed somewhere in `text`.
pub fn lookup_phrase(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    for &(variant, label) in PHRASE_INDEX.iter() {
        let word_sized =
            variant.len() <= WORD_MATCH_MAX_LEN && variant.chars().all(|c| c.is_ascii_alphanumeric());
        let hit = if word_sized {
            words.contains(&variant)
        } else {
            lower.contains(variant)
        };
        if hit {
            return Some(label);
        }
    }
    None
}

/// Expand a canonical frequency label into a patient-readable instruction.
/// Identity outside the known label set — never errors.
pub fn expand_instructions(label: &str) -> String {
    match label {
        "once daily (morning)" => "Take 1 dose in the morning",
        "once daily (afternoon)" => "Take 1 dose in the afternoon",
        "once daily (night)" => "Take 1 dose at night",
        "twice daily (morning & night)" => "Take 1 dose in the morning and 1 dose at night",
        "twice daily (morning & afternoon)" => {
            "Take 1 dose in the morning and 1 dose in the afternoon"
        }
        "twice daily (afternoon & night)" => "Take 1 dose in the afternoon and 1 dose at night",
        "three times daily (morning, afternoon & night)" => {
            "Take 1 dose in the morning, 1 dose in the afternoon, and 1 dose at night"
        }
        other => return other.to_string(),
    }
    .to_string()
}
