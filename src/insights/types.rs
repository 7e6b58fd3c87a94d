use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::messages;
use crate::db::DatabaseError;
use crate::models::SymptomType;

// ---------------------------------------------------------------------------
// FoodTrigger
// ---------------------------------------------------------------------------

/// A food that repeatedly precedes a symptom type. A hypothesis, not a cause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodTrigger {
    /// Lower-cased food name.
    pub food_name: String,
    pub symptom_type: SymptomType,
    /// Share of the food's logged days followed by the symptom, in [0, 1].
    pub correlation: f64,
    pub occurrences: u32,
}

impl FoodTrigger {
    /// Truncated percentage, as shown to the user.
    pub fn correlation_percent(&self) -> u32 {
        (self.correlation * 100.0) as u32
    }
}

// ---------------------------------------------------------------------------
// RiskLevel / RiskAssessment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Thresholds apply to the clamped score.
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => Self::Critical,
            60..=79 => Self::High,
            30..=59 => Self::Medium,
            _ => Self::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    /// Always within [0, 100].
    pub score: u8,
    pub reasons: Vec<String>,
    pub recommendations: Vec<String>,
}

impl Default for RiskAssessment {
    /// What the user sees when there is nothing (or nothing usable) to score.
    fn default() -> Self {
        Self {
            level: RiskLevel::Low,
            score: 0,
            reasons: vec![messages::INSUFFICIENT_DATA.to_string()],
            recommendations: vec![messages::KEEP_JOURNALING.to_string()],
        }
    }
}

// ---------------------------------------------------------------------------
// InsightsReport
// ---------------------------------------------------------------------------

/// Everything the insights screen shows, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsReport {
    pub generated_at_ms: i64,
    pub triggers: Vec<FoodTrigger>,
    pub risk: RiskAssessment,
}

// ---------------------------------------------------------------------------
// InsightsError
// ---------------------------------------------------------------------------

/// Internal analysis failures. Never returned across the public adapters;
/// they are logged and replaced with the documented defaults.
#[derive(Error, Debug)]
pub enum InsightsError {
    #[error("Record source unavailable: {0}")]
    Source(#[from] DatabaseError),

    #[error("Risk window underflows at reference time {0}")]
    WindowUnderflow(i64),
}
