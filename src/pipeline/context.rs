//! Context window location and per-field sub-extractors.
//!
//! Each sub-extractor locates the medication mention in the text (exact,
//! case-insensitive; falling back to a fuzzy word scan so OCR-garbled
//! names still anchor a window), slices a bounded window around it, and
//! pattern-matches the field inside that window. Absence of information
//! is never an error: each extractor returns its documented default.

use std::sync::LazyLock;

use regex::Regex;

use crate::config;
use crate::lexicon::frequency;

use super::normalize::edit_distance;

/// Window spans around a located mention, in bytes of lowercased text.
const DOSAGE_WINDOW_BEFORE: usize = 50;
const DOSAGE_WINDOW_AFTER: usize = 150;
const FREQUENCY_WINDOW_BEFORE: usize = 100;
const FREQUENCY_WINDOW_AFTER: usize = 200;
const DURATION_WINDOW_BEFORE: usize = 100;
const DURATION_WINDOW_AFTER: usize = 200;

/// Bare numbers accepted as dosages when no unit-bearing match exists —
/// the strengths that actually occur on Indian prescriptions.
const COMMON_DOSAGES: &[u32] = &[625, 500, 250, 125, 100, 75, 50, 40, 25, 20, 10, 5];

/// Morning-afternoon-night timing codes with fixed readings. The generic
/// slot-sum mapping below covers everything else.
const TIMING_CODES: &[(&str, &str)] = &[
    ("1-0-1", "twice daily (morning & night)"),
    ("1-1-1", "three times daily (morning, afternoon & night)"),
    ("1-0-0", "once daily (morning)"),
    ("0-0-1", "once daily (night)"),
    ("1-1-0", "twice daily (morning & afternoon)"),
    ("0-1-1", "twice daily (afternoon & night)"),
    ("2-0-2", "twice daily (2 morning & 2 night)"),
    ("1-2-1", "four times daily (1 morning, 2 afternoon, 1 night)"),
];

static RE_DOSE_UNIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d+(?:\.\d+)?)\s*(mg|ml|g|mcg|units?)\b").unwrap());
static RE_BARE_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d{1,4})\b").unwrap());
// Dash or space joined, for the named code table ("1-0-1" and "1 0 1").
static RE_TRIPLET_ANY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d)[\s-](\d)[\s-](\d)\b").unwrap());
// Dash-only, for the generic slot-sum fallback.
static RE_TRIPLET_DASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d)-(\d)-(\d)").unwrap());
static RE_DURATIONS: LazyLock<[(Regex, &'static str); 4]> = LazyLock::new(|| {
    [
        (Regex::new(r"\b(\d+)\s*(days?|d)\b").unwrap(), "days"),
        (Regex::new(r"\b(\d+)\s*(weeks?|wks?|w)\b").unwrap(), "weeks"),
        (Regex::new(r"\b(\d+)\s*(months?|mos?|m)\b").unwrap(), "months"),
        (Regex::new(r"\b(\d+)\s*(years?|yrs?|y)\b").unwrap(), "years"),
    ]
});

/// Locate `mention` in `text`, case-insensitive. Exact substring search
/// first; falls back to a fuzzy word scan so a garbled mention
/// ("Augmentn") still anchors a context window. Returns a byte offset
/// into the lowercased text, or None when nothing plausible is found.
pub fn locate_mention(text: &str, mention: &str) -> Option<usize> {
    let hay = text.to_lowercase();
    let needle = mention.to_lowercase();
    if needle.is_empty() || hay.is_empty() {
        return None;
    }

    if let Some(pos) = hay.find(&needle) {
        return Some(pos);
    }

    // Fuzzy pass: compare the mention's first word against each word of
    // the text.
    let target = needle.split_whitespace().next()?;
    let mut offset = 0;
    for chunk in hay.split_inclusive(char::is_whitespace) {
        let word = chunk.trim_end_matches(char::is_whitespace);
        let token = word.trim_matches(|c: char| !c.is_ascii_alphanumeric());
        if !token.is_empty() && fuzzy_word_match(token, target) {
            return Some(offset);
        }
        offset += chunk.len();
    }
    None
}

/// A word counts as a fuzzy hit when it shares a 4-character prefix with
/// the target, or sits within edit distance 2 of it (words of length >= 5,
/// lengths within 2 of each other).
fn fuzzy_word_match(word: &str, target: &str) -> bool {
    if word == target {
        return true;
    }
    if word.len() >= 4 && target.len() >= 4 && word.as_bytes()[..4] == target.as_bytes()[..4] {
        return true;
    }
    word.len() >= 5
        && target.len() >= 5
        && word.len().abs_diff(target.len()) <= 2
        && edit_distance(word, target) <= 2
}

/// Lowercased window of `before`/`after` bytes around the located mention.
fn window_around(text: &str, mention: &str, before: usize, after: usize) -> Option<String> {
    let lower = text.to_lowercase();
    let pos = locate_mention(text, mention)?;
    let start = clamp_to_boundary(&lower, pos.saturating_sub(before));
    let end = clamp_to_boundary(&lower, (pos + mention.len() + after).min(lower.len()));
    Some(lower[start..end].to_string())
}

fn clamp_to_boundary(s: &str, mut i: usize) -> usize {
    i = i.min(s.len());
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Dosage found near `mention`, as `"<number> <unit>"`. Unit-bearing
/// matches win; bare numbers count only when they are common prescription
/// strengths. Default: the "Unknown dosage" sentinel.
pub fn dosage_near(text: &str, mention: &str) -> String {
    let Some(window) = window_around(text, mention, DOSAGE_WINDOW_BEFORE, DOSAGE_WINDOW_AFTER)
    else {
        return config::UNKNOWN_DOSAGE.to_string();
    };

    if let Some(caps) = RE_DOSE_UNIT.captures(&window) {
        return format!("{} {}", &caps[1], &caps[2]);
    }

    for caps in RE_BARE_NUMBER.captures_iter(&window) {
        if let Ok(value) = caps[1].parse::<u32>() {
            if COMMON_DOSAGES.contains(&value) {
                return format!("{} mg", &caps[1]);
            }
        }
    }

    config::UNKNOWN_DOSAGE.to_string()
}

/// Frequency found near `mention`, as a canonical label. Numeric timing
/// codes are tried first (named table, then the generic slot-sum
/// reading), then phrase lookup in the frequency lexicon. Default:
/// "daily".
pub fn frequency_near(text: &str, mention: &str) -> String {
    let Some(window) =
        window_around(text, mention, FREQUENCY_WINDOW_BEFORE, FREQUENCY_WINDOW_AFTER)
    else {
        return config::DEFAULT_FREQUENCY.to_string();
    };

    for caps in RE_TRIPLET_ANY.captures_iter(&window) {
        let code = format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]);
        if let Some((_, label)) = TIMING_CODES.iter().find(|(c, _)| *c == code) {
            return label.to_string();
        }
    }

    if let Some(caps) = RE_TRIPLET_DASH.captures(&window) {
        let slots = (
            caps[1].parse::<u32>().unwrap_or(0),
            caps[2].parse::<u32>().unwrap_or(0),
            caps[3].parse::<u32>().unwrap_or(0),
        );
        if let Some(label) = classify_triplet(slots.0, slots.1, slots.2) {
            return label;
        }
    }

    if let Some(label) = frequency::lookup_phrase(&window) {
        return label.to_string();
    }

    config::DEFAULT_FREQUENCY.to_string()
}

/// Generic reading of a morning-afternoon-night dose triplet: the dose
/// total picks the count word, the non-zero slots the qualifier.
fn classify_triplet(morning: u32, afternoon: u32, night: u32) -> Option<String> {
    let total = morning + afternoon + night;
    if total == 0 {
        return None;
    }

    let mut slots = Vec::new();
    if morning > 0 {
        slots.push("morning");
    }
    if afternoon > 0 {
        slots.push("afternoon");
    }
    if night > 0 {
        slots.push("night");
    }

    let count = match total {
        1 => "once",
        2 => "twice",
        3 => "three times",
        4 => "four times",
        n => return Some(format!("{n} times daily")),
    };

    let qualifier = match slots.as_slice() {
        [only] => only.to_string(),
        [a, b] => format!("{a} & {b}"),
        _ => "morning, afternoon & night".to_string(),
    };

    Some(format!("{count} daily ({qualifier})"))
}

/// Duration found near `mention`, as `"<number> <unit>"` with the unit
/// always plural. Default: "7 days".
pub fn duration_near(text: &str, mention: &str) -> String {
    let Some(window) =
        window_around(text, mention, DURATION_WINDOW_BEFORE, DURATION_WINDOW_AFTER)
    else {
        return config::DEFAULT_DURATION.to_string();
    };

    for (re, unit) in RE_DURATIONS.iter() {
        if let Some(caps) = re.captures(&window) {
            return format!("{} {}", &caps[1], unit);
        }
    }

    config::DEFAULT_DURATION.to_string()
}
