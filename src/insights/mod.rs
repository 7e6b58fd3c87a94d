//! Food/symptom insights: trigger correlation, weekly risk scoring and
//! plain-language explanations.
//!
//! The correlator and scorer are pure functions over in-memory slices.
//! The scorer has a fallible `try_*` core and an infallible adapter that
//! logs and substitutes a safe default. [`InsightsEngine`] wires them to a
//! record source and a completion client.

pub mod day;
pub mod engine;
pub mod explain;
pub mod messages;
pub mod risk;
pub mod triggers;
pub mod types;

pub use day::{day_id, DAY_MS, RISK_WINDOW_DAYS};
pub use engine::InsightsEngine;
pub use explain::{build_insights_prompt, explain};
pub use risk::{assess_risk, try_assess_risk};
pub use triggers::{analyze_food_triggers, MIN_CORRELATION, MIN_OCCURRENCES};
pub use types::*;
