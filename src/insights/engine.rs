use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::completion::{CompletionClient, CompletionError};
use crate::db::repository::RecordSource;
use crate::models::{FoodEntry, SymptomEntry};

use super::explain::explain;
use super::risk::try_assess_risk;
use super::triggers::analyze_food_triggers;
use super::types::{FoodTrigger, InsightsError, InsightsReport, RiskAssessment};

/// Runs trigger correlation and risk scoring over an injected record source.
///
/// Analysis never fails outward. Every degraded result (source failure or an
/// unusable reference time) is logged and counted in [`Self::fallback_count`].
pub struct InsightsEngine<'a> {
    records: &'a dyn RecordSource,
    completion: &'a dyn CompletionClient,
    fallbacks: AtomicU64,
}

impl<'a> InsightsEngine<'a> {
    pub fn new(records: &'a dyn RecordSource, completion: &'a dyn CompletionClient) -> Self {
        Self {
            records,
            completion,
            fallbacks: AtomicU64::new(0),
        }
    }

    /// Full report relative to `now_ms`.
    pub fn analyze(&self, now_ms: i64) -> InsightsReport {
        let start = Instant::now();

        let (food, symptoms) = match self.fetch() {
            Ok(records) => records,
            Err(e) => {
                self.record_fallback("fetch", &e);
                return InsightsReport {
                    generated_at_ms: now_ms,
                    triggers: Vec::new(),
                    risk: RiskAssessment::default(),
                };
            }
        };

        let triggers = analyze_food_triggers(&food, &symptoms);
        let risk = self.risk_from(&symptoms, now_ms);

        tracing::info!(
            food = food.len(),
            symptoms = symptoms.len(),
            triggers = triggers.len(),
            risk = risk.level.as_str(),
            score = risk.score,
            processing_ms = start.elapsed().as_millis() as u64,
            "Insights analysis complete"
        );

        InsightsReport {
            generated_at_ms: now_ms,
            triggers,
            risk,
        }
    }

    /// Trigger list only. Empty on any failure.
    pub fn food_triggers(&self) -> Vec<FoodTrigger> {
        match self.fetch() {
            Ok((food, symptoms)) => analyze_food_triggers(&food, &symptoms),
            Err(e) => {
                self.record_fallback("fetch", &e);
                Vec::new()
            }
        }
    }

    /// Risk assessment only. Default LOW / 0 on any failure.
    pub fn risk(&self, now_ms: i64) -> RiskAssessment {
        match self.records.symptom_entries() {
            Ok(symptoms) => self.risk_from(&symptoms, now_ms),
            Err(e) => {
                self.record_fallback("fetch", &InsightsError::from(e));
                RiskAssessment::default()
            }
        }
    }

    pub fn explain(&self, triggers: &[FoodTrigger]) -> Result<String, CompletionError> {
        explain(self.completion, triggers)
    }

    /// Number of analyses that degraded to defaults since construction.
    pub fn fallback_count(&self) -> u64 {
        self.fallbacks.load(Ordering::Relaxed)
    }

    fn fetch(&self) -> Result<(Vec<FoodEntry>, Vec<SymptomEntry>), InsightsError> {
        let food = self.records.food_entries()?;
        let symptoms = self.records.symptom_entries()?;
        Ok((food, symptoms))
    }

    fn risk_from(&self, symptoms: &[SymptomEntry], now_ms: i64) -> RiskAssessment {
        try_assess_risk(symptoms, now_ms).unwrap_or_else(|e| {
            self.record_fallback("risk", &e);
            RiskAssessment::default()
        })
    }

    fn record_fallback(&self, stage: &'static str, error: &InsightsError) {
        let total = self.fallbacks.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::warn!(stage, error = %error, fallbacks = total, "Insights degraded to default");
    }
}
