use crate::completion::{CompletionClient, CompletionError};

use super::messages;
use super::types::FoodTrigger;

const PROMPT_HEADER: &str =
    "Analyze the following patterns between food and symptoms in a pregnant woman:";

const PROMPT_QUESTIONS: &str = "Explain:
1. Why these foods might cause a reaction
2. What can I eat instead?
3. Should I be concerned?

Be specific and helpful. Format: short paragraphs, clear language.";

/// Deterministic prompt: one `- food → SYMPTOM (P% correlation, N cases)`
/// line per trigger, in the given order.
pub fn build_insights_prompt(triggers: &[FoodTrigger]) -> String {
    let lines = triggers
        .iter()
        .map(|t| {
            format!(
                "- {} → {} ({}% correlation, {} cases)",
                t.food_name,
                t.symptom_type.code(),
                t.correlation_percent(),
                t.occurrences
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("{PROMPT_HEADER}\n\n{lines}\n\n{PROMPT_QUESTIONS}")
}

/// Asks the completion service to explain `triggers` in plain language.
///
/// An empty list short-circuits with an encouraging message and makes no
/// call. Completion failures are returned unchanged.
pub fn explain(
    client: &dyn CompletionClient,
    triggers: &[FoodTrigger],
) -> Result<String, CompletionError> {
    if triggers.is_empty() {
        return Ok(messages::NO_TRIGGERS.to_string());
    }

    let prompt = build_insights_prompt(triggers);
    tracing::debug!(triggers = triggers.len(), "Requesting trigger explanation");
    client.send_message(&prompt)
}
