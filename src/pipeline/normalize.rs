//! OCR text cleanup.
//!
//! Two passes run before extraction: `normalize` strips stray symbols and
//! collapses whitespace, and `correct_drug_terms` repairs OCR-garbled drug
//! names against the medication lexicon. Digits are never rewritten in
//! either pass — dosage correctness depends on every numeral surviving
//! exactly as recognized, so there is deliberately no "0 → O" style
//! character substitution here.

use crate::lexicon::medications;

/// Punctuation allowed through normalization besides ASCII alphanumerics
/// and spaces. Dosage separators and bracketing survive; everything else
/// is OCR noise.
const KEPT_PUNCT: &[char] = &[
    '.', ',', ':', ';', '(', ')', '[', ']', '{', '}', '/', '-', '+', '=', '%',
];

/// Clean raw OCR output: out-of-allow-list characters become spaces,
/// whitespace runs collapse to single spaces, ends trimmed.
pub fn normalize(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || KEPT_PUNCT.contains(&c) {
                c
            } else {
                ' '
            }
        })
        .collect();

    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Repair OCR-garbled drug names. Each purely alphabetic token of length
/// >= 5 is matched against the lexicon's single-word surface variants; an
/// unambiguous hit within edit distance 2 replaces the token, keeping the
/// original capitalization pattern. Tokens containing digits are never
/// touched.
pub fn correct_drug_terms(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut word_buf = String::new();

    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            word_buf.push(ch);
        } else {
            if !word_buf.is_empty() {
                result.push_str(&try_correct_word(&word_buf));
                word_buf.clear();
            }
            result.push(ch);
        }
    }
    if !word_buf.is_empty() {
        result.push_str(&try_correct_word(&word_buf));
    }

    result
}

fn try_correct_word(word: &str) -> String {
    if word.len() < 5 || !word.chars().all(|c| c.is_ascii_alphabetic()) {
        return word.to_string();
    }

    let lower = word.to_lowercase();

    // Already a known surface form — leave it alone.
    if medications::correction_vocabulary().any(|v| v == lower) {
        return word.to_string();
    }

    let mut best_variant: Option<&str> = None;
    let mut best_distance = 3u32; // only accept distance <= 2
    let mut ambiguous = false;

    for variant in medications::correction_vocabulary() {
        // Quick length filter: variants differing by more than 2 chars can't match
        if word.len().abs_diff(variant.len()) > 2 {
            continue;
        }

        let dist = edit_distance(&lower, variant);
        if dist < best_distance {
            best_distance = dist;
            best_variant = Some(variant);
            ambiguous = false;
        } else if dist == best_distance && best_variant.is_some() {
            ambiguous = true;
        }
    }

    match best_variant {
        Some(variant) if !ambiguous => preserve_case(word, variant),
        _ => word.to_string(),
    }
}

/// Preserve the original word's capitalization pattern when applying a
/// correction.
fn preserve_case(original: &str, correction: &str) -> String {
    if original.chars().all(|c| c.is_uppercase() || !c.is_alphabetic()) {
        return correction.to_uppercase();
    }

    let first_upper = original.chars().next().is_some_and(|c| c.is_uppercase());
    if first_upper {
        let mut chars = correction.chars();
        match chars.next() {
            Some(c) => {
                let mut s = c.to_uppercase().to_string();
                s.extend(chars);
                s
            }
            None => correction.to_string(),
        }
    } else {
        correction.to_string()
    }
}

/// Title-case a matched name the way prescriptions print them: the first
/// letter of each alphabetic run uppercased, the rest lowered
/// ("PanD" → "Pand", "co-amoxiclav" → "Co-Amoxiclav").
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut run_start = true;
    for c in s.chars() {
        if c.is_ascii_alphabetic() {
            if run_start {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c.to_ascii_lowercase());
            }
            run_start = false;
        } else {
            out.push(c);
            run_start = true;
        }
    }
    out
}

/// Levenshtein edit distance between two strings.
pub(crate) fn edit_distance(a: &str, b: &str) -> u32 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n as u32;
    }
    if n == 0 {
        return m as u32;
    }

    let mut prev: Vec<u32> = (0..=n as u32).collect();
    let mut curr = vec![0u32; n + 1];

    for (i, &a_ch) in a_chars.iter().enumerate() {
        curr[0] = (i + 1) as u32;
        for (j, &b_ch) in b_chars.iter().enumerate() {
            let cost = if a_ch == b_ch { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace_and_trims() {
        assert_eq!(normalize("  Tab.   Augmentin\n\t625mg  "), "Tab. Augmentin 625mg");
    }

    #[test]
    fn strips_stray_symbols_to_spaces() {
        assert_eq!(normalize("Rx* Augmentin ~625mg!"), "Rx Augmentin 625mg");
    }

    #[test]
    fn preserves_dosage_punctuation() {
        assert_eq!(normalize("1-0-1 x 5 days (after food) 2.5ml"), "1-0-1 x 5 days (after food) 2.5ml");
    }

    #[test]
    fn never_touches_digits() {
        let cleaned = normalize("0O0 625mg 1O1");
        assert!(cleaned.contains("625mg"));
        assert!(cleaned.contains("0O0"));
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("@@@ ###"), "");
    }

    #[test]
    fn corrects_garbled_drug_name() {
        // "Augmentn" → "Augmentin" (dropped letter, edit distance 1)
        assert_eq!(correct_drug_terms("Tab. Augmentn 625mg"), "Tab. Augmentin 625mg");
        // "metfonnin" → "metformin" (rn→m confusion, edit distance 2)
        assert_eq!(correct_drug_terms("metfonnin 500mg"), "metformin 500mg");
    }

    #[test]
    fn leaves_known_and_unrelated_words_alone() {
        assert_eq!(correct_drug_terms("Augmentin"), "Augmentin");
        assert_eq!(correct_drug_terms("Patient complains of fever"), "Patient complains of fever");
        assert_eq!(correct_drug_terms("morning"), "morning");
    }

    #[test]
    fn never_corrects_tokens_with_digits() {
        assert_eq!(correct_drug_terms("augment1n"), "augment1n");
        assert_eq!(correct_drug_terms("625mg"), "625mg");
    }

    #[test]
    fn preserves_case_pattern_on_correction() {
        assert_eq!(correct_drug_terms("AUGMENTN"), "AUGMENTIN");
        assert_eq!(correct_drug_terms("augmentn"), "augmentin");
    }

    #[test]
    fn title_case_matches_prescription_style() {
        assert_eq!(title_case("PanD"), "Pand");
        assert_eq!(title_case("augmentin"), "Augmentin");
        assert_eq!(title_case("meftol-p"), "Meftol-P");
        assert_eq!(title_case("syp calpol"), "Syp Calpol");
    }

    #[test]
    fn edit_distance_basic() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("augmentin", "augmentn"), 1);
    }
}
