//! User-facing insight texts. Plain, calm wording; the scoring is a
//! heuristic and the texts should not read as a diagnosis.

pub const MODERATE_FREQUENCY: &str = "Moderate symptom frequency";
pub const FREQUENT_VOMITING: &str = "Frequent nausea (dehydration risk)";

pub const DRINK_WATER: &str = "Drink more water";
pub const SEE_DOCTOR: &str = "Go to the doctor";

pub const KEEP_DIARY: &str = "Keep writing your nutrition diary";
pub const AVOID_TRIGGERS: &str = "Avoid recognized triggers";

pub const SEE_DOCTOR_URGENTLY: &str = "Go to the doctor urgently";
pub const SHOW_HISTORY: &str = "Show your doctor your symptom history";

pub const INSUFFICIENT_DATA: &str =
    "Not enough data to analyze yet; insights will appear as you log more.";
pub const KEEP_JOURNALING: &str = "Keep journaling";

pub const NO_TRIGGERS: &str = "No obvious triggers have been identified yet. Keep journaling!";

/// `per_day` is the truncated daily average.
pub fn high_frequency(per_day: u32) -> String {
    format!("High symptom frequency ({per_day}/day)")
}

pub fn severe_symptoms(count: u32) -> String {
    format!("Severe symptoms ({count} this week)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_embed_counts() {
        assert_eq!(high_frequency(6), "High symptom frequency (6/day)");
        assert_eq!(severe_symptoms(3), "Severe symptoms (3 this week)");
    }
}
