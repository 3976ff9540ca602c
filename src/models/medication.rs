use serde::{Deserialize, Serialize};

use super::enums::ExtractionSource;

/// One extraction strategy's finding for a single medication mention.
///
/// Ephemeral: candidates from both strategies are reduced to
/// [`MedicationRecord`]s by the entity merger. `confidence` is fixed per
/// strategy; `source` tags provenance and is never user-visible beyond
/// debugging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationCandidate {
    pub name: String,
    /// `"<number> <unit>"`, `"1 tablet"`, or the "Unknown dosage" sentinel.
    pub dosage: String,
    /// Canonical frequency label, or the bare "daily" fallback.
    pub frequency: String,
    /// `"<number> <days|weeks|months|years>"`, default "7 days".
    pub duration: String,
    /// Human-readable expansion of `frequency`, or `frequency` itself.
    pub instructions: String,
    pub confidence: f32,
    pub source: ExtractionSource,
}

/// Final merged result for one medication, handed to the persistence
/// collaborator. Unique by lowercased `name` within a single extraction
/// run; `source` and `confidence` are retained as provenance only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationRecord {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub instructions: String,
    pub confidence: f32,
    pub source: ExtractionSource,
}

impl From<MedicationCandidate> for MedicationRecord {
    fn from(c: MedicationCandidate) -> Self {
        Self {
            name: c.name,
            dosage: c.dosage,
            frequency: c.frequency,
            duration: c.duration,
            instructions: c.instructions,
            confidence: c.confidence,
            source: c.source,
        }
    }
}

impl From<MedicationRecord> for MedicationCandidate {
    fn from(r: MedicationRecord) -> Self {
        Self {
            name: r.name,
            dosage: r.dosage,
            frequency: r.frequency,
            duration: r.duration,
            instructions: r.instructions,
            confidence: r.confidence,
            source: r.source,
        }
    }
}
