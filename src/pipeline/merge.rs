//! Entity merger: reduce candidates from both strategies to one record
//! per medication.
//!
//! Candidates are grouped by name, each group is scored for field
//! completeness, and the winner is backfilled with any better field found
//! on the losers. Grouping is order-sensitive under the default mode —
//! see [`MergeMode`].

use crate::config;
use crate::models::{MedicationCandidate, MedicationRecord};

/// Grouping predicate for candidate names.
///
/// `Containment` is the historical behavior: a candidate joins the first
/// group whose key contains its lowercased name or is contained by it, so
/// "augmentin" and "tab augmentin duo" merge. The first-seen name in a
/// cluster becomes the permanent group key, which makes membership depend
/// on input order — callers must not rely on keys being the "best" name,
/// only on them being consistent within one call. `ExactName` groups
/// identical lowercased names only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeMode {
    #[default]
    Containment,
    ExactName,
}

/// Names that can never stand alone as a medication.
const NAME_STOPLIST: &[&str] = &["mg", "ml", "tablet", "cap", "tab", "unknown medication"];

/// Merge with the default containment grouping.
pub fn merge(candidates: Vec<MedicationCandidate>) -> Vec<MedicationRecord> {
    merge_with(candidates, MergeMode::Containment)
}

/// Merge candidates into one record per medication group.
/// Invalid names are dropped before grouping; output order follows the
/// first appearance of each group's key.
pub fn merge_with(candidates: Vec<MedicationCandidate>, mode: MergeMode) -> Vec<MedicationRecord> {
    let mut groups: Vec<(String, Vec<MedicationCandidate>)> = Vec::new();

    for candidate in candidates {
        let name = candidate.name.trim().to_string();
        if !is_valid_name(&name) {
            continue;
        }
        let key = name.to_lowercase();

        let existing = groups.iter_mut().find(|(group_key, _)| match mode {
            MergeMode::Containment => {
                *group_key == key || group_key.contains(&key) || key.contains(group_key.as_str())
            }
            MergeMode::ExactName => *group_key == key,
        });

        match existing {
            Some((_, members)) => members.push(candidate),
            None => groups.push((key, vec![candidate])),
        }
    }

    groups
        .into_iter()
        .filter_map(|(_, members)| reduce_group(members))
        .collect()
}

fn is_valid_name(name: &str) -> bool {
    if name.is_empty() || name.chars().count() < 2 {
        return false;
    }
    if name.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    !NAME_STOPLIST.contains(&name.to_lowercase().as_str())
}

/// Pick the most complete member as representative, then backfill its
/// fields from the rest.
fn reduce_group(members: Vec<MedicationCandidate>) -> Option<MedicationRecord> {
    if members.is_empty() {
        return None;
    }

    let mut best_idx = 0;
    let mut best_score = f32::MIN;
    for (i, member) in members.iter().enumerate() {
        let score = completeness_score(member);
        // strictly greater: ties keep the first-encountered member
        if score > best_score {
            best_score = score;
            best_idx = i;
        }
    }

    let mut rep = members[best_idx].clone();
    for (i, member) in members.iter().enumerate() {
        if i == best_idx {
            continue;
        }
        for rule in FIELD_RULES {
            let incoming = (rule.get)(member);
            if (rule.is_better)(incoming, (rule.get)(&rep)) {
                (rule.set)(&mut rep, incoming.to_string());
            }
        }
        if rep.instructions.is_empty() && !member.instructions.is_empty() {
            rep.instructions = member.instructions.clone();
        }
    }

    Some(rep.into())
}

/// Field-completeness score. Mirrors the per-field heuristics of the
/// backfill comparators; the candidate's strategy confidence breaks ties
/// between equally complete members.
fn completeness_score(m: &MedicationCandidate) -> f32 {
    let mut score = 0.0;

    if m.dosage.contains("mg") || m.dosage.contains("ml") {
        score += 3.0;
    } else if m.dosage.contains("tablet") {
        score += 1.0;
    } else if !m.dosage.contains("Unknown") {
        score += 2.0;
    }

    if m.frequency.contains("1-0-1") || m.frequency.contains("twice") {
        score += 2.0;
    } else if m.frequency != config::DEFAULT_FREQUENCY {
        score += 1.0;
    }

    if m.duration.contains("5 days") || m.duration.contains("1 week") {
        score += 2.0;
    } else if !m.duration.contains("7 days") && m.duration.chars().any(|c| c.is_ascii_digit()) {
        score += 1.0;
    }

    score + m.confidence
}

/// Per-field "is this value better" comparators, applied when backfilling
/// the representative. A table of named functions rather than nested
/// conditionals, so each rule is testable on its own.
struct FieldRule {
    get: fn(&MedicationCandidate) -> &str,
    set: fn(&mut MedicationCandidate, String),
    is_better: fn(new: &str, current: &str) -> bool,
}

static FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        get: |m| m.dosage.as_str(),
        set: |m, v| m.dosage = v,
        is_better: better_dosage,
    },
    FieldRule {
        get: |m| m.frequency.as_str(),
        set: |m, v| m.frequency = v,
        is_better: better_frequency,
    },
    FieldRule {
        get: |m| m.duration.as_str(),
        set: |m, v| m.duration = v,
        is_better: better_duration,
    },
];

/// A known dosage beats the sentinel; a unit-bearing dosage beats the
/// "1 tablet" default.
fn better_dosage(new: &str, current: &str) -> bool {
    if current.contains("Unknown") && !new.contains("Unknown") {
        return true;
    }
    (new.contains("mg") || new.contains("ml")) && current.contains("tablet")
}

/// A timed or multiplied frequency beats the bare "daily" fallback; a
/// longer non-fallback label beats a shorter one.
fn better_frequency(new: &str, current: &str) -> bool {
    if current.contains("daily")
        && (new.contains("1-0-1") || new.contains("twice") || new.contains("three"))
    {
        return true;
    }
    new.len() > current.len() && !new.contains("daily")
}

/// Any explicit duration beats the "7 days" default.
fn better_duration(new: &str, current: &str) -> bool {
    if current.contains("7 days") && !new.contains("7 days") {
        return true;
    }
    new.contains("5 days") && current.contains("7 days")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExtractionSource;

    fn candidate(name: &str, dosage: &str, frequency: &str, duration: &str) -> MedicationCandidate {
        MedicationCandidate {
            name: name.into(),
            dosage: dosage.into(),
            frequency: frequency.into(),
            duration: duration.into(),
            instructions: String::new(),
            confidence: 0.7,
            source: ExtractionSource::PatternBased,
        }
    }

    #[test]
    fn keeps_more_complete_variant_of_same_drug() {
        let bare = candidate("Augmentin", "Unknown dosage", "daily", "7 days");
        let full = candidate(
            "Augmentin",
            "625 mg",
            "twice daily (morning & night)",
            "5 days",
        );
        let merged = merge(vec![bare, full.clone()]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].dosage, full.dosage);
        assert_eq!(merged[0].frequency, full.frequency);
        assert_eq!(merged[0].duration, full.duration);
    }

    #[test]
    fn backfills_fields_across_members() {
        // representative has the dosage, another member has the duration
        let dosed = candidate("Metformin", "500 mg", "daily", "7 days");
        let timed = candidate("Metformin", "Unknown dosage", "twice daily", "5 days");
        let merged = merge(vec![dosed, timed]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].dosage, "500 mg");
        assert_eq!(merged[0].frequency, "twice daily");
        assert_eq!(merged[0].duration, "5 days");
    }

    #[test]
    fn containment_groups_prefixed_names() {
        let lexicon = candidate("Enzoflam", "Unknown dosage", "daily", "7 days");
        let pattern = candidate("Enzoflam After Meals", "1 tablet", "after meals", "7 days");
        let merged = merge(vec![lexicon, pattern]);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn exact_mode_keeps_prefixed_names_apart() {
        let a = candidate("Losartan", "50 mg", "daily", "7 days");
        let b = candidate("Losartan Potassium", "50 mg", "daily", "7 days");
        assert_eq!(merge_with(vec![a.clone(), b.clone()], MergeMode::ExactName).len(), 2);
        assert_eq!(merge_with(vec![a, b], MergeMode::Containment).len(), 1);
    }

    #[test]
    fn invalid_names_dropped_before_grouping() {
        let merged = merge(vec![
            candidate("mg", "625 mg", "daily", "7 days"),
            candidate("42", "625 mg", "daily", "7 days"),
            candidate("B", "625 mg", "daily", "7 days"),
            candidate("Unknown Medication", "625 mg", "daily", "7 days"),
            candidate("", "625 mg", "daily", "7 days"),
        ]);
        assert!(merged.is_empty());
    }

    #[test]
    fn merge_is_idempotent() {
        let once = merge(vec![
            candidate("Augmentin", "625 mg", "twice daily (morning & night)", "5 days"),
            candidate("Augmentin", "Unknown dosage", "daily", "7 days"),
            candidate("Pand", "40 mg", "once daily (morning)", "7 days"),
        ]);
        let twice = merge(once.iter().cloned().map(Into::into).collect());
        assert_eq!(once, twice);
    }

    #[test]
    fn output_follows_first_appearance_order() {
        let merged = merge(vec![
            candidate("Zoclar", "250 mg", "twice daily", "5 days"),
            candidate("Calpol", "250 mg", "q6h", "3 days"),
            candidate("Zoclar", "Unknown dosage", "daily", "7 days"),
        ]);
        let names: Vec<&str> = merged.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Zoclar", "Calpol"]);
    }

    #[test]
    fn higher_confidence_breaks_completeness_ties() {
        let mut rule_based = candidate("Brufen", "400 mg", "twice daily", "5 days");
        rule_based.confidence = 0.8;
        rule_based.source = ExtractionSource::RuleBased;
        let mut pattern_based = candidate("Brufen", "200 mg", "twice daily", "5 days");
        pattern_based.confidence = 0.7;

        // pattern candidate listed first: confidence must still win
        let merged = merge(vec![pattern_based, rule_based]);
        assert_eq!(merged[0].dosage, "400 mg");
        assert_eq!(merged[0].source, ExtractionSource::RuleBased);
    }

    #[test]
    fn comparators_follow_field_rules() {
        assert!(better_dosage("625 mg", "Unknown dosage"));
        assert!(better_dosage("5 ml", "1 tablet"));
        assert!(!better_dosage("1 tablet", "625 mg"));

        assert!(better_frequency("twice daily (morning & night)", "daily"));
        assert!(!better_frequency("daily", "twice daily"));

        assert!(better_duration("5 days", "7 days"));
        assert!(better_duration("2 weeks", "7 days"));
        assert!(!better_duration("7 days", "5 days"));
    }

    #[test]
    fn empty_input_empty_output() {
        assert!(merge(Vec::new()).is_empty());
    }
}
