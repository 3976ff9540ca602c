use serde::{Deserialize, Serialize};

/// Returned when a wire string does not map to an enum variant.
#[derive(Debug, thiserror::Error)]
#[error("invalid {field} value: {value}")]
pub struct InvalidEnum {
    pub field: String,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidEnum;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(ExtractionSource {
    RuleBased => "rule_based",
    PatternBased => "pattern_based",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn source_round_trips() {
        for source in [ExtractionSource::RuleBased, ExtractionSource::PatternBased] {
            assert_eq!(ExtractionSource::from_str(source.as_str()).unwrap(), source);
        }
    }

    #[test]
    fn unknown_source_rejected() {
        let err = ExtractionSource::from_str("ml_based").unwrap_err();
        assert!(err.to_string().contains("ml_based"));
    }

    #[test]
    fn source_serializes_as_wire_string() {
        let json = serde_json::to_string(&ExtractionSource::RuleBased).unwrap();
        assert_eq!(json, "\"rule_based\"");
    }
}
