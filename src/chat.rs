//! Pregnancy assistant chat.
//!
//! Wraps the completion client with a fixed system prompt and, on request,
//! a short summary of the last week's journal so answers can be
//! personalised.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate, TimeZone};
use thiserror::Error;

use crate::completion::{ChatMessage, CompletionClient, CompletionError};
use crate::db::repository::RecordSource;
use crate::db::DatabaseError;
use crate::insights::{DAY_MS, RISK_WINDOW_DAYS};
use crate::models::{FoodEntry, SymptomEntry};

pub const ASSISTANT_SYSTEM_PROMPT: &str = "You are an AI assistant for pregnant women, specialising in pregnancy, nutrition and symptoms.

IMPORTANT RULES:
1. Always remind the user that your advice does not replace a doctor's consultation
2. For serious symptoms, recommend seeing a doctor
3. Be empathetic and supportive
4. Give concrete, practical advice
5. Answer in the user's language
6. Be brief and to the point

You can analyse the user's nutrition and symptom data to give personalised recommendations.";

/// Days shown per journal in the context block.
const CONTEXT_DAYS_SHOWN: usize = 3;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Message is empty")]
    EmptyMessage,

    #[error("Could not read journal: {0}")]
    Records(#[from] DatabaseError),

    #[error(transparent)]
    Completion(#[from] CompletionError),
}

impl ChatError {
    /// Text suitable for showing in the chat thread.
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyMessage => "Please type a message.".to_string(),
            Self::Records(_) => "Could not read your journal. Please try again.".to_string(),
            Self::Completion(e) => e.user_message().to_string(),
        }
    }
}

// ═══════════════════════════════════════════
// Context
// ═══════════════════════════════════════════

/// Weekly journal summary in `tz` calendar days. Empty when nothing was
/// logged in the last seven days.
pub fn build_user_context_in<Tz: TimeZone>(
    tz: &Tz,
    food: &[FoodEntry],
    symptoms: &[SymptomEntry],
    now_ms: i64,
) -> String {
    let week_ago = now_ms.saturating_sub(RISK_WINDOW_DAYS * DAY_MS);
    let mut parts = Vec::new();

    let recent_food: Vec<(i64, String)> = food
        .iter()
        .filter(|f| f.timestamp >= week_ago)
        .map(|f| (f.timestamp, f.food_name.clone()))
        .collect();
    if !recent_food.is_empty() {
        parts.push(format!(
            "Nutrition during the last week:\n{}",
            summarize_by_day(tz, recent_food)
        ));
    }

    let recent_symptoms: Vec<(i64, String)> = symptoms
        .iter()
        .filter(|s| s.timestamp >= week_ago)
        .map(|s| {
            (
                s.timestamp,
                format!("{} ({})", s.symptom_type.code(), s.severity.code()),
            )
        })
        .collect();
    if !recent_symptoms.is_empty() {
        parts.push(format!(
            "Symptoms during the last week:\n{}",
            summarize_by_day(tz, recent_symptoms)
        ));
    }

    parts.join("\n\n")
}

/// [`build_user_context_in`] using the system time zone.
pub fn build_user_context(food: &[FoodEntry], symptoms: &[SymptomEntry], now_ms: i64) -> String {
    build_user_context_in(&Local, food, symptoms, now_ms)
}

/// `- dd.mm: a, b` lines for the most recent days, newest first.
fn summarize_by_day<Tz: TimeZone>(tz: &Tz, items: Vec<(i64, String)>) -> String {
    let mut by_date: BTreeMap<NaiveDate, Vec<String>> = BTreeMap::new();
    for (timestamp, item) in items {
        if let Some(at) = tz.timestamp_millis_opt(timestamp).single() {
            by_date.entry(at.date_naive()).or_default().push(item);
        }
    }

    by_date
        .iter()
        .rev()
        .take(CONTEXT_DAYS_SHOWN)
        .map(|(date, items)| format!("- {}: {}", date.format("%d.%m"), items.join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}

fn wrap_with_context(context: &str, question: &str) -> String {
    format!("USER CONTEXT:\n{context}\n\nUSER QUESTION:\n{question}")
}

// ═══════════════════════════════════════════
// Assistant
// ═══════════════════════════════════════════

pub struct AssistantChat<'a> {
    records: &'a dyn RecordSource,
    client: &'a dyn CompletionClient,
}

impl<'a> AssistantChat<'a> {
    pub fn new(records: &'a dyn RecordSource, client: &'a dyn CompletionClient) -> Self {
        Self { records, client }
    }

    /// Ask the assistant, optionally prefixing the weekly journal summary.
    pub fn send_message(
        &self,
        user_message: &str,
        include_context: bool,
        now_ms: i64,
    ) -> Result<String, ChatError> {
        self.send_message_in(&Local, user_message, include_context, now_ms)
    }

    /// As [`Self::send_message`], grouping context days in `tz`.
    pub fn send_message_in<Tz: TimeZone>(
        &self,
        tz: &Tz,
        user_message: &str,
        include_context: bool,
        now_ms: i64,
    ) -> Result<String, ChatError> {
        if user_message.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let context = if include_context {
            let food = self.records.food_entries()?;
            let symptoms = self.records.symptom_entries()?;
            build_user_context_in(tz, &food, &symptoms, now_ms)
        } else {
            String::new()
        };

        let full_message = if context.is_empty() {
            user_message.to_string()
        } else {
            wrap_with_context(&context, user_message)
        };

        tracing::debug!(
            with_context = !context.is_empty(),
            chars = full_message.len(),
            "Sending assistant message"
        );

        let reply = self
            .client
            .complete(Some(ASSISTANT_SYSTEM_PROMPT), &[ChatMessage::user(full_message)])?;
        Ok(reply)
    }
}
