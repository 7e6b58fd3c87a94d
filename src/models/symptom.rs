use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{SymptomSeverity, SymptomType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomEntry {
    pub id: Uuid,
    pub symptom_type: SymptomType,
    pub severity: SymptomSeverity,
    /// Event time, epoch milliseconds.
    pub timestamp: i64,
    pub duration_minutes: Option<u32>,
    pub notes: String,
    /// Suspected food. Weak link, not enforced by the store.
    pub triggered_by_food_id: Option<Uuid>,
}

impl SymptomEntry {
    pub fn new(symptom_type: SymptomType, severity: SymptomSeverity, timestamp: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            symptom_type,
            severity,
            timestamp,
            duration_minutes: None,
            notes: String::new(),
            triggered_by_food_id: None,
        }
    }
}
