//! Crate-level constants: field sentinels, defaults, logging.

/// Crate version, surfaced for diagnostics.
pub const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Sentinel returned when no dosage can be located near a medication.
pub const UNKNOWN_DOSAGE: &str = "Unknown dosage";

/// Fallback frequency when nothing frequency-shaped is found in context.
pub const DEFAULT_FREQUENCY: &str = "daily";

/// Fallback duration when nothing duration-shaped is found in context.
pub const DEFAULT_DURATION: &str = "7 days";

/// Dosage assigned to form-only matches ("Tab. Enzoflam") with no number.
pub const TABLET_DOSAGE: &str = "1 tablet";

/// Reminder time for frequency labels the scheduler does not recognize.
pub const DEFAULT_REMINDER_TIME: &str = "09:00";

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> String {
    format!("{}=info", env!("CARGO_PKG_NAME"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_scoped_to_crate() {
        assert!(default_log_filter().starts_with("rxtract"));
        assert!(default_log_filter().ends_with("=info"));
    }

    #[test]
    fn sentinels_are_distinct() {
        assert_ne!(UNKNOWN_DOSAGE, TABLET_DOSAGE);
        assert_ne!(DEFAULT_FREQUENCY, DEFAULT_DURATION);
    }
}
