//! Known medications and the surface variants that resolve to them.

/// Canonical medication name → surface variants (brand names,
/// abbreviations, dispensing-form prefixes). Variants must be lowercase;
/// containment tests run against lowercased text.
pub static MEDICATIONS: &[(&str, &[&str])] = &[
    ("aspirin", &["aspirin", "acetylsalicylic acid", "asa"]),
    ("ibuprofen", &["ibuprofen", "advil", "motrin", "brufen"]),
    ("acetaminophen", &["acetaminophen", "paracetamol", "tylenol"]),
    ("amoxicillin", &["amoxicillin", "amoxil", "trimox"]),
    ("augmentin", &["augmentin"]),
    ("metformin", &["metformin", "glucophage"]),
    ("lisinopril", &["lisinopril", "prinivil", "zestril"]),
    ("atorvastatin", &["atorvastatin", "lipitor"]),
    ("omeprazole", &["omeprazole", "prilosec"]),
    ("pand", &["pand"]),
    ("simvastatin", &["simvastatin", "zocor"]),
    ("metoprolol", &["metoprolol", "lopressor", "toprol"]),
    ("losartan", &["losartan", "cozaar"]),
    ("amlodipine", &["amlodipine", "norvasc"]),
    ("hydrochlorothiazide", &["hydrochlorothiazide", "hctz", "microzide"]),
    ("pantoprazole", &["pantoprazole", "protonix"]),
    ("carvedilol", &["carvedilol", "coreg"]),
    ("furosemide", &["furosemide", "lasix"]),
    ("spironolactone", &["spironolactone", "aldactone"]),
    ("tramadol", &["tramadol", "ultram"]),
    ("gabapentin", &["gabapentin", "neurontin"]),
    ("duloxetine", &["duloxetine", "cymbalta"]),
    ("enzoflam", &["enzoflam"]),
    ("hexigel", &["hexigel"]),
    // Pediatric syrups common on Indian prescriptions
    ("calpol", &["calpol", "syp calpol"]),
    ("delcon", &["delcon", "syp delcon"]),
    ("levolin", &["levolin", "syp levolin"]),
    ("meftol", &["meftol", "meftol-p", "syp meftol", "syp meftol-p"]),
    ("abciximab", &["abciximab", "tab abciximab"]),
    ("vomilast", &["vomilast", "tab vomilast"]),
    ("zoclar", &["zoclar", "cap zoclar"]),
    ("gestakind", &["gestakind", "tab gestakind"]),
];

/// Single-word alphabetic variants — the vocabulary for post-OCR
/// drug-name correction, which operates on isolated tokens only.
pub fn correction_vocabulary() -> impl Iterator<Item = &'static str> {
    MEDICATIONS
        .iter()
        .flat_map(|(_, variants)| variants.iter().copied())
        .filter(|v| v.chars().all(|c| c.is_ascii_alphabetic()))
}

/// Resolve a surface variant back to its canonical name, if known.
pub fn canonical_for(variant: &str) -> Option<&'static str> {
    let lower = variant.to_lowercase();
    MEDICATIONS
        .iter()
        .find(|(_, variants)| variants.contains(&lower.as_str()))
        .map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_are_lowercase() {
        for (name, variants) in MEDICATIONS {
            assert_eq!(*name, name.to_lowercase());
            for v in *variants {
                assert_eq!(*v, v.to_lowercase(), "variant of {name} not lowercase");
            }
        }
    }

    #[test]
    fn canonical_appears_in_own_variants() {
        for (name, variants) in MEDICATIONS {
            assert!(variants.contains(name), "{name} missing from its variants");
        }
    }

    #[test]
    fn brand_name_resolves_to_canonical() {
        assert_eq!(canonical_for("advil"), Some("ibuprofen"));
        assert_eq!(canonical_for("Glucophage"), Some("metformin"));
        assert_eq!(canonical_for("syp calpol"), Some("calpol"));
        assert_eq!(canonical_for("placebo"), None);
    }

    #[test]
    fn correction_vocabulary_excludes_multiword_variants() {
        assert!(correction_vocabulary().all(|v| !v.contains(' ') && !v.contains('-')));
        assert!(correction_vocabulary().any(|v| v == "augmentin"));
    }
}
