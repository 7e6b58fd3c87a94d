use std::collections::HashMap;

use crate::models::{SymptomEntry, SymptomSeverity};

use super::day::{day_id, risk_window_start};
use super::messages;
use super::types::{InsightsError, RiskAssessment, RiskLevel};

const HIGH_FREQUENCY_PER_DAY: f64 = 5.0;
const MODERATE_FREQUENCY_PER_DAY: f64 = 3.0;
const HIGH_FREQUENCY_POINTS: u32 = 40;
const MODERATE_FREQUENCY_POINTS: u32 = 25;
const SEVERE_POINTS_EACH: u32 = 15;
const VOMITING_THRESHOLD: u32 = 10;
const VOMITING_POINTS: u32 = 30;
const MAX_SCORE: u32 = 100;

/// Scores the last seven days of symptoms relative to `now_ms`.
///
/// Never fails: an unusable history is logged and yields the default
/// LOW / 0 assessment.
pub fn assess_risk(symptoms: &[SymptomEntry], now_ms: i64) -> RiskAssessment {
    match try_assess_risk(symptoms, now_ms) {
        Ok(assessment) => assessment,
        Err(e) => {
            tracing::warn!(error = %e, "Risk assessment failed, returning default");
            RiskAssessment::default()
        }
    }
}

/// Fallible core of [`assess_risk`].
pub fn try_assess_risk(
    symptoms: &[SymptomEntry],
    now_ms: i64,
) -> Result<RiskAssessment, InsightsError> {
    let window_start = risk_window_start(now_ms)?;
    let recent: Vec<&SymptomEntry> = symptoms
        .iter()
        .filter(|s| s.timestamp >= window_start)
        .collect();

    let mut per_day: HashMap<i64, u32> = HashMap::new();
    for symptom in &recent {
        *per_day.entry(day_id(symptom.timestamp)).or_default() += 1;
    }
    let avg_per_day = if per_day.is_empty() {
        0.0
    } else {
        recent.len() as f64 / per_day.len() as f64
    };

    let mut score: u32 = 0;
    let mut reasons = Vec::new();
    let mut recommendations = Vec::new();

    if avg_per_day > HIGH_FREQUENCY_PER_DAY {
        score += HIGH_FREQUENCY_POINTS;
        reasons.push(messages::high_frequency(avg_per_day as u32));
    } else if avg_per_day > MODERATE_FREQUENCY_PER_DAY {
        score += MODERATE_FREQUENCY_POINTS;
        reasons.push(messages::MODERATE_FREQUENCY.to_string());
    }

    // Exactly SEVERE: very severe and critical entries are not counted here.
    let severe_count = count_u32(recent.iter().filter(|s| s.severity == SymptomSeverity::Severe));
    if severe_count > 0 {
        score = score.saturating_add(severe_count.saturating_mul(SEVERE_POINTS_EACH));
        reasons.push(messages::severe_symptoms(severe_count));
    }

    let vomiting_count = count_u32(recent.iter().filter(|s| {
        s.symptom_type
            .as_str()
            .to_ascii_uppercase()
            .contains("VOMITING")
    }));
    if vomiting_count > VOMITING_THRESHOLD {
        score = score.saturating_add(VOMITING_POINTS);
        reasons.push(messages::FREQUENT_VOMITING.to_string());
        recommendations.push(messages::DRINK_WATER.to_string());
        recommendations.push(messages::SEE_DOCTOR.to_string());
    }

    // Bounded by MAX_SCORE, so the narrowing cast is lossless.
    let score = score.min(MAX_SCORE) as u8;
    let level = RiskLevel::from_score(score);

    match level {
        RiskLevel::Low => {
            recommendations.push(messages::KEEP_DIARY.to_string());
            recommendations.push(messages::AVOID_TRIGGERS.to_string());
        }
        RiskLevel::High | RiskLevel::Critical => {
            recommendations.push(messages::SEE_DOCTOR_URGENTLY.to_string());
            recommendations.push(messages::SHOW_HISTORY.to_string());
        }
        RiskLevel::Medium => {}
    }

    if reasons.is_empty() {
        reasons.push(messages::INSUFFICIENT_DATA.to_string());
    }
    if recommendations.is_empty() {
        recommendations.push(messages::KEEP_JOURNALING.to_string());
    }

    tracing::debug!(
        recent = recent.len(),
        days = per_day.len(),
        severe = severe_count,
        vomiting = vomiting_count,
        score,
        level = level.as_str(),
        "Risk assessment complete"
    );

    Ok(RiskAssessment {
        level,
        score,
        reasons,
        recommendations,
    })
}

fn count_u32<I: Iterator>(iter: I) -> u32 {
    u32::try_from(iter.count()).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::day::DAY_MS;
    use crate::models::SymptomType;

    const NOW: i64 = 1_000 * DAY_MS + 15 * 3_600_000;

    fn at(kind: SymptomType, severity: SymptomSeverity, ts: i64) -> SymptomEntry {
        SymptomEntry::new(kind, severity, ts)
    }

    /// `n` entries spread over one hour, `days_ago` days before NOW.
    fn batch(kind: SymptomType, severity: SymptomSeverity, n: usize, days_ago: i64) -> Vec<SymptomEntry> {
        (0..n)
            .map(|i| at(kind, severity, NOW - days_ago * DAY_MS - (i as i64) * 60_000))
            .collect()
    }

    #[test]
    fn empty_history_is_low_with_placeholders() {
        let risk = assess_risk(&[], NOW);
        assert_eq!(risk, RiskAssessment::default());
    }

    #[test]
    fn entries_older_than_seven_days_are_ignored() {
        let old = batch(SymptomType::Vomiting, SymptomSeverity::Severe, 20, 8);
        let risk = assess_risk(&old, NOW);
        assert_eq!(risk.score, 0);
        assert_eq!(risk.level, RiskLevel::Low);
    }

    #[test]
    fn window_start_is_inclusive() {
        let edge = vec![at(SymptomType::Headache, SymptomSeverity::Severe, NOW - 7 * DAY_MS)];
        let risk = assess_risk(&edge, NOW);
        assert_eq!(risk.score, 15);
    }

    #[test]
    fn twelve_vomiting_entries_add_dehydration_warning() {
        // Two per day over six days keeps the daily average out of the frequency rules.
        let symptoms: Vec<SymptomEntry> = (0..6)
            .flat_map(|d| batch(SymptomType::Vomiting, SymptomSeverity::Mild, 2, d))
            .collect();
        assert_eq!(symptoms.len(), 12);

        let risk = assess_risk(&symptoms, NOW);
        assert_eq!(risk.score, 30);
        assert_eq!(risk.level, RiskLevel::Medium);
        assert!(risk.reasons.iter().any(|r| r == messages::FREQUENT_VOMITING));
        assert_eq!(
            risk.recommendations,
            vec![messages::DRINK_WATER, messages::SEE_DOCTOR]
        );
    }

    #[test]
    fn twelve_vomiting_entries_in_one_day_also_score_frequency() {
        let symptoms = batch(SymptomType::Vomiting, SymptomSeverity::Mild, 12, 0);
        let risk = assess_risk(&symptoms, NOW);
        // 12/day > 5 -> +40, vomiting > 10 -> +30
        assert_eq!(risk.score, 70);
        assert_eq!(risk.level, RiskLevel::High);
        assert_eq!(risk.reasons[0], "High symptom frequency (12/day)");
        assert!(risk.recommendations.contains(&messages::DRINK_WATER.to_string()));
        assert!(risk.recommendations.contains(&messages::SEE_DOCTOR_URGENTLY.to_string()));
    }

    #[test]
    fn ten_vomiting_entries_do_not_trigger_rule() {
        let symptoms: Vec<SymptomEntry> = (0..5)
            .flat_map(|d| batch(SymptomType::Vomiting, SymptomSeverity::Mild, 2, d))
            .collect();
        let risk = assess_risk(&symptoms, NOW);
        assert_eq!(risk.score, 0);
        assert!(!risk.reasons.iter().any(|r| r == messages::FREQUENT_VOMITING));
    }

    #[test]
    fn three_severe_entries_score_forty_five() {
        let symptoms = vec![
            at(SymptomType::Headache, SymptomSeverity::Severe, NOW - DAY_MS),
            at(SymptomType::Nausea, SymptomSeverity::Severe, NOW - 2 * DAY_MS),
            at(SymptomType::Fatigue, SymptomSeverity::Severe, NOW - 3 * DAY_MS),
        ];
        let risk = assess_risk(&symptoms, NOW);
        assert_eq!(risk.score, 45);
        assert_eq!(risk.level, RiskLevel::Medium);
        assert_eq!(risk.reasons, vec!["Severe symptoms (3 this week)"]);
        // MEDIUM adds no base recommendations.
        assert_eq!(risk.recommendations, vec![messages::KEEP_JOURNALING]);
    }

    #[test]
    fn very_severe_and_critical_are_not_counted_as_severe() {
        let symptoms = vec![
            at(SymptomType::Headache, SymptomSeverity::VerySevere, NOW - DAY_MS),
            at(SymptomType::Headache, SymptomSeverity::Critical, NOW - 2 * DAY_MS),
        ];
        let risk = assess_risk(&symptoms, NOW);
        assert_eq!(risk.score, 0);
        assert_eq!(risk.level, RiskLevel::Low);
    }

    #[test]
    fn moderate_frequency_adds_twenty_five() {
        let symptoms = batch(SymptomType::Heartburn, SymptomSeverity::Mild, 4, 1);
        let risk = assess_risk(&symptoms, NOW);
        assert_eq!(risk.score, 25);
        assert_eq!(risk.reasons, vec![messages::MODERATE_FREQUENCY]);
        assert_eq!(risk.level, RiskLevel::Low);
        assert_eq!(
            risk.recommendations,
            vec![messages::KEEP_DIARY, messages::AVOID_TRIGGERS]
        );
    }

    #[test]
    fn average_of_exactly_three_is_not_moderate() {
        let symptoms = batch(SymptomType::Heartburn, SymptomSeverity::Mild, 3, 1);
        assert_eq!(assess_risk(&symptoms, NOW).score, 0);
    }

    #[test]
    fn average_is_over_days_with_entries_only() {
        // 6 entries on one day, nothing else: average 6 not 6/7.
        let symptoms = batch(SymptomType::Swelling, SymptomSeverity::Mild, 6, 2);
        let risk = assess_risk(&symptoms, NOW);
        assert_eq!(risk.score, 40);
        assert_eq!(risk.reasons, vec!["High symptom frequency (6/day)"]);
    }

    #[test]
    fn score_is_clamped_to_one_hundred() {
        let symptoms = batch(SymptomType::Vomiting, SymptomSeverity::Severe, 12, 0);
        let risk = assess_risk(&symptoms, NOW);
        assert_eq!(risk.score, 100);
        assert_eq!(risk.level, RiskLevel::Critical);
        assert!(risk.recommendations.contains(&messages::SHOW_HISTORY.to_string()));
    }

    #[test]
    fn reasons_follow_rule_order() {
        let mut symptoms = batch(SymptomType::Vomiting, SymptomSeverity::Mild, 11, 0);
        symptoms.push(at(SymptomType::Nausea, SymptomSeverity::Severe, NOW - 2 * DAY_MS));
        let risk = assess_risk(&symptoms, NOW);
        assert_eq!(risk.reasons.len(), 3);
        assert!(risk.reasons[0].starts_with("High symptom frequency"));
        assert_eq!(risk.reasons[1], "Severe symptoms (1 this week)");
        assert_eq!(risk.reasons[2], messages::FREQUENT_VOMITING);
    }

    #[test]
    fn window_reaching_before_epoch_still_scores() {
        let now = 2 * DAY_MS;
        let symptoms = vec![
            at(SymptomType::Headache, SymptomSeverity::Severe, -DAY_MS),
            at(SymptomType::Headache, SymptomSeverity::Severe, now),
        ];
        let risk = try_assess_risk(&symptoms, now).unwrap();
        assert_eq!(risk.score, 30);
    }

    #[test]
    fn underflowing_reference_time_falls_back() {
        assert!(try_assess_risk(&[], i64::MIN).is_err());
        assert_eq!(assess_risk(&[], i64::MIN), RiskAssessment::default());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        const SEVERITIES: &[SymptomSeverity] = &[
            SymptomSeverity::Mild,
            SymptomSeverity::Moderate,
            SymptomSeverity::Severe,
            SymptomSeverity::VerySevere,
            SymptomSeverity::Critical,
        ];

        proptest! {
            #[test]
            fn score_and_level_are_consistent(
                raw in prop::collection::vec((0..SymptomType::ALL.len(), 0..SEVERITIES.len(), 0i64..(10 * DAY_MS)), 0..80)
            ) {
                let symptoms: Vec<SymptomEntry> = raw
                    .into_iter()
                    .map(|(t, s, back)| at(SymptomType::ALL[t], SEVERITIES[s], NOW - back))
                    .collect();
                let risk = assess_risk(&symptoms, NOW);
                prop_assert!(risk.score <= 100);
                prop_assert_eq!(risk.level, RiskLevel::from_score(risk.score));
                prop_assert!(!risk.reasons.is_empty());
                prop_assert!(!risk.recommendations.is_empty());
            }
        }
    }
}
