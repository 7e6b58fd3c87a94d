//! Daily meal suggestions for a given pregnancy week.
//!
//! The assistant is asked to answer in `KEY: value` lines, one key per field
//! per meal. Anything it fails to provide falls back to a fixed menu so the
//! screen is never empty.

use std::time::Duration;

use chrono::{Local, TimeZone};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::chat::{AssistantChat, ChatError};
use crate::db::repository::insert_food_entry;
use crate::db::DatabaseError;
use crate::models::{FoodEntry, MealCategory};

pub const DEFAULT_PREGNANCY_WEEK: u8 = 24;
pub const MAX_ATTEMPTS: u32 = 3;
pub const RETRY_DELAY: Duration = Duration::from_millis(1500);

/// Portion recorded when a suggestion is saved to the journal.
pub const SUGGESTION_PORTION: &str = "1 serving";

pub const CONNECTION_NOTICE: &str = "Connection issue. Showing recommended menu.";

/// Meals the assistant is asked for, with their key prefix.
const PLANNED_MEALS: [(MealCategory, &str); 3] = [
    (MealCategory::Breakfast, "BREAKFAST"),
    (MealCategory::Lunch, "LUNCH"),
    (MealCategory::Dinner, "DINNER"),
];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealSuggestion {
    pub meal_type: MealCategory,
    pub dish_name: String,
    pub description: String,
    pub benefits: String,
}

impl MealSuggestion {
    fn new(meal_type: MealCategory, dish_name: &str, description: &str, benefits: &str) -> Self {
        Self {
            meal_type,
            dish_name: dish_name.to_string(),
            description: description.to_string(),
            benefits: benefits.to_string(),
        }
    }

    /// Journal record for this dish eaten at `timestamp_ms`.
    pub fn to_food_entry(&self, timestamp_ms: i64) -> FoodEntry {
        let mut entry = FoodEntry::new(self.dish_name.clone(), self.meal_type, timestamp_ms);
        entry.portion_size = SUGGESTION_PORTION.to_string();
        entry
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealPlan {
    pub week: u8,
    pub suggestions: Vec<MealSuggestion>,
    /// Set when the fixed menu is shown because the assistant was unreachable.
    pub notice: Option<String>,
}

// ---------------------------------------------------------------------------
// Prompt + parsing
// ---------------------------------------------------------------------------

pub fn build_meal_plan_prompt(week: u8) -> String {
    let mut prompt = format!(
        "Create a daily menu for a pregnant woman at week {week}.

Requirements:
- Avoid foods that previously caused symptoms (if known from context)
- Include nutrients important for week {week}
- Keep dishes simple and easy to prepare

Respond ONLY in this exact format, no extra text:
"
    );
    for (_, key) in PLANNED_MEALS {
        prompt.push_str(&format!(
            "\n{key}_NAME: [dish name]\n{key}_DESC: [ingredients, 1 line]\n{key}_BENEFITS: [why beneficial, 1 line]\n"
        ));
    }
    prompt.trim_end().to_string()
}

/// Value of the first line starting with `key`, after its first colon.
fn extract_field(response: &str, key: &str) -> String {
    response
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with(key))
        .and_then(|line| line.split_once(':'))
        .map(|(_, value)| value.trim().to_string())
        .unwrap_or_default()
}

/// Meals found in `response`, in breakfast/lunch/dinner order. A meal is kept
/// when its name is present; description and benefits may be empty. Falls
/// back to [`fallback_meals`] when nothing parses.
pub fn parse_meal_plan(response: &str) -> Vec<MealSuggestion> {
    let meals: Vec<MealSuggestion> = PLANNED_MEALS
        .iter()
        .filter_map(|&(meal_type, key)| {
            let dish_name = extract_field(response, &format!("{key}_NAME"));
            if dish_name.is_empty() {
                return None;
            }
            Some(MealSuggestion {
                meal_type,
                dish_name,
                description: extract_field(response, &format!("{key}_DESC")),
                benefits: extract_field(response, &format!("{key}_BENEFITS")),
            })
        })
        .collect();

    if meals.is_empty() {
        tracing::warn!("Meal plan response had no recognised meals, using fallback menu");
        return fallback_meals();
    }
    meals
}

pub fn fallback_meals() -> Vec<MealSuggestion> {
    vec![
        MealSuggestion::new(
            MealCategory::Breakfast,
            "Oatmeal with Banana and Walnuts",
            "Rolled oats, banana, walnuts, honey",
            "Rich in folic acid, fiber and slow carbs",
        ),
        MealSuggestion::new(
            MealCategory::Lunch,
            "Steamed Chicken with Vegetables",
            "Chicken breast, broccoli, carrots, cauliflower",
            "Protein for baby's development, B vitamins",
        ),
        MealSuggestion::new(
            MealCategory::Dinner,
            "Baked Salmon with Quinoa",
            "Salmon fillet, quinoa, spinach, lemon",
            "Omega-3 for baby's brain development, iron",
        ),
    ]
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Asks the assistant (with journal context) for a menu, retrying transient
/// failures.
pub struct MealPlanner<'c, 'a> {
    chat: &'c AssistantChat<'a>,
    max_attempts: u32,
    retry_delay: Duration,
}

impl<'c, 'a> MealPlanner<'c, 'a> {
    pub fn new(chat: &'c AssistantChat<'a>) -> Self {
        Self {
            chat,
            max_attempts: MAX_ATTEMPTS,
            retry_delay: RETRY_DELAY,
        }
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn generate(&self, week: u8, now_ms: i64) -> MealPlan {
        self.generate_in(&Local, week, now_ms)
    }

    /// As [`Self::generate`], grouping journal context days in `tz`.
    /// Never fails: when every attempt fails the fixed menu is returned with
    /// [`CONNECTION_NOTICE`].
    pub fn generate_in<Tz: TimeZone>(&self, tz: &Tz, week: u8, now_ms: i64) -> MealPlan {
        let prompt = build_meal_plan_prompt(week);

        match self.request_with_retries(tz, &prompt, now_ms) {
            Ok(response) => MealPlan {
                week,
                suggestions: parse_meal_plan(&response),
                notice: None,
            },
            Err(e) => {
                tracing::warn!(error = %e, week, "Meal plan generation failed, using fallback menu");
                MealPlan {
                    week,
                    suggestions: fallback_meals(),
                    notice: Some(CONNECTION_NOTICE.to_string()),
                }
            }
        }
    }

    fn request_with_retries<Tz: TimeZone>(
        &self,
        tz: &Tz,
        prompt: &str,
        now_ms: i64,
    ) -> Result<String, ChatError> {
        let mut attempt = 1;
        loop {
            match self.chat.send_message_in(tz, prompt, true, now_ms) {
                Ok(response) => return Ok(response),
                Err(e) if attempt < self.max_attempts => {
                    tracing::debug!(attempt, error = %e, "Meal plan request failed, retrying");
                    std::thread::sleep(self.retry_delay);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Records `suggestion` in the food journal as eaten at `timestamp_ms`.
pub fn save_suggestion(
    conn: &Connection,
    suggestion: &MealSuggestion,
    timestamp_ms: i64,
) -> Result<FoodEntry, DatabaseError> {
    let entry = suggestion.to_food_entry(timestamp_ms);
    insert_food_entry(conn, &entry)?;
    tracing::info!(meal = suggestion.meal_type.as_str(), "Meal suggestion saved to journal");
    Ok(entry)
}
