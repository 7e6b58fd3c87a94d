use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
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
    };
}

str_enum!(MealCategory {
    Breakfast => "breakfast",
    Lunch => "lunch",
    Dinner => "dinner",
    Snack => "snack",
});

impl MealCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Breakfast => "Breakfast",
            Self::Lunch => "Lunch",
            Self::Dinner => "Dinner",
            Self::Snack => "Snack",
        }
    }
}

str_enum!(SymptomType {
    Nausea => "nausea",
    Vomiting => "vomiting",
    Headache => "headache",
    Dizziness => "dizziness",
    Fatigue => "fatigue",
    Heartburn => "heartburn",
    StomachPain => "stomach_pain",
    Constipation => "constipation",
    Diarrhea => "diarrhea",
    Swelling => "swelling",
    Other => "other",
});

impl SymptomType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Nausea => "Nausea",
            Self::Vomiting => "Vomiting",
            Self::Headache => "Headache",
            Self::Dizziness => "Dizziness",
            Self::Fatigue => "Fatigue",
            Self::Heartburn => "Heartburn",
            Self::StomachPain => "Stomach pain",
            Self::Constipation => "Constipation",
            Self::Diarrhea => "Diarrhea",
            Self::Swelling => "Swelling",
            Self::Other => "Other",
        }
    }

    /// Upper-case identifier, as shown in assistant context lines.
    pub fn code(&self) -> String {
        self.as_str().to_ascii_uppercase()
    }
}

/// Ordinal 1–5 severity scale. Stored as its integer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymptomSeverity {
    Mild = 1,
    Moderate = 2,
    Severe = 3,
    VerySevere = 4,
    Critical = 5,
}

impl SymptomSeverity {
    pub fn value(&self) -> i32 {
        *self as i32
    }

    pub fn from_value(value: i32) -> Result<Self, DatabaseError> {
        match value {
            1 => Ok(Self::Mild),
            2 => Ok(Self::Moderate),
            3 => Ok(Self::Severe),
            4 => Ok(Self::VerySevere),
            5 => Ok(Self::Critical),
            _ => Err(DatabaseError::InvalidEnum {
                field: "SymptomSeverity".into(),
                value: value.to_string(),
            }),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Mild => "Mild",
            Self::Moderate => "Moderate",
            Self::Severe => "Severe",
            Self::VerySevere => "Very severe",
            Self::Critical => "Critical",
        }
    }

    /// Upper-case identifier, as shown in assistant context lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Mild => "MILD",
            Self::Moderate => "MODERATE",
            Self::Severe => "SEVERE",
            Self::VerySevere => "VERY_SEVERE",
            Self::Critical => "CRITICAL",
        }
    }

    /// Very severe and critical entries raise the dashboard flag.
    pub fn is_critical(&self) -> bool {
        *self >= Self::VerySevere
    }
}
