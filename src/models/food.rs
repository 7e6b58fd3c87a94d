use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::MealCategory;

/// One food item consumed at a given instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntry {
    pub id: Uuid,
    pub food_name: String,
    pub category: MealCategory,
    /// Event time, epoch milliseconds.
    pub timestamp: i64,
    pub portion_size: String,
    pub notes: String,
    pub tags: Vec<String>,
}

impl FoodEntry {
    pub fn new(food_name: impl Into<String>, category: MealCategory, timestamp: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            food_name: food_name.into(),
            category,
            timestamp,
            portion_size: String::new(),
            notes: String::new(),
            tags: Vec::new(),
        }
    }

    /// Name used for trigger matching.
    pub fn normalized_name(&self) -> String {
        self.food_name.to_lowercase()
    }
}
