use crate::db::DatabaseError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Macro to generate a closed enum with as_str + std::str::FromStr pattern.
/// The wire form (serde) and the stored form (SQLite) are both `as_str`.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
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

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(|_| {
                    serde::de::Error::custom(format!(
                        "invalid {}: {raw:?} (expected one of {})",
                        stringify!($name),
                        [$($s),+].join(", "),
                    ))
                })
            }
        }
    };
}

str_enum!(Severity {
    Mild => "Mild",
    Moderate => "Moderate",
    Severe => "Severe",
});

str_enum!(Probability {
    Low => "Low",
    Medium => "Medium",
    High => "High",
});

str_enum!(UnitSystem {
    Metric => "metric",
    Imperial => "imperial",
});

str_enum!(BmiCategory {
    Underweight => "Underweight",
    Normal => "Normal",
    Overweight => "Overweight",
    Obese => "Obese",
});

str_enum!(MetricType {
    Bmi => "bmi",
    BloodPressure => "blood_pressure",
    BloodSugar => "blood_sugar",
    Weight => "weight",
    Temperature => "temperature",
    HeartRate => "heart_rate",
});

impl Default for UnitSystem {
    fn default() -> Self {
        Self::Metric
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn severity_round_trip() {
        for (variant, s) in [
            (Severity::Mild, "Mild"),
            (Severity::Moderate, "Moderate"),
            (Severity::Severe, "Severe"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(Severity::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn metric_type_round_trip() {
        for (variant, s) in [
            (MetricType::Bmi, "bmi"),
            (MetricType::BloodPressure, "blood_pressure"),
            (MetricType::BloodSugar, "blood_sugar"),
            (MetricType::Weight, "weight"),
            (MetricType::Temperature, "temperature"),
            (MetricType::HeartRate, "heart_rate"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(MetricType::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn severity_is_case_sensitive() {
        assert!(Severity::from_str("mild").is_err());
        assert!(Severity::from_str("SEVERE").is_err());
    }

    #[test]
    fn invalid_enum_returns_error() {
        let err = Severity::from_str("Critical").unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::InvalidEnum { ref field, ref value }
                if field == "Severity" && value == "Critical"
        ));
        assert!(UnitSystem::from_str("").is_err());
    }

    #[test]
    fn serde_uses_wire_strings() {
        assert_eq!(serde_json::to_string(&Probability::Medium).unwrap(), "\"Medium\"");
        assert_eq!(
            serde_json::from_str::<UnitSystem>("\"imperial\"").unwrap(),
            UnitSystem::Imperial
        );
        let err = serde_json::from_str::<Severity>("\"Extreme\"").unwrap_err();
        assert!(err.to_string().contains("Mild, Moderate, Severe"));
    }
}
