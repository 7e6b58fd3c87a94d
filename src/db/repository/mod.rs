//! Repository layer: entity-scoped database operations.
//!
//! Free functions over a `&Connection`, one sub-module per journal, plus
//! thin handle types implementing [`Repository`] for callers that want the
//! record store as an injected object.

mod food;
mod symptom;

pub use food::*;
pub use symptom::*;

use rusqlite::Connection;
use uuid::Uuid;

use super::DatabaseError;
use crate::models::{FoodEntry, SymptomEntry};

/// Base repository operations for a journal record type.
/// Range bounds are epoch milliseconds, both inclusive.
pub trait Repository<T> {
    fn insert(&self, entity: &T) -> Result<Uuid, DatabaseError>;
    fn update(&self, entity: &T) -> Result<(), DatabaseError>;
    fn get(&self, id: &Uuid) -> Result<Option<T>, DatabaseError>;
    fn delete(&self, id: &Uuid) -> Result<(), DatabaseError>;
    fn get_all(&self) -> Result<Vec<T>, DatabaseError>;
    fn get_in_range(&self, start_ms: i64, end_ms: i64) -> Result<Vec<T>, DatabaseError>;
}

/// Unbounded fetch of both journals. This is all the analysis layer needs.
pub trait RecordSource {
    fn food_entries(&self) -> Result<Vec<FoodEntry>, DatabaseError>;
    fn symptom_entries(&self) -> Result<Vec<SymptomEntry>, DatabaseError>;
}

impl RecordSource for Connection {
    fn food_entries(&self) -> Result<Vec<FoodEntry>, DatabaseError> {
        get_all_food_entries(self)
    }

    fn symptom_entries(&self) -> Result<Vec<SymptomEntry>, DatabaseError> {
        get_all_symptom_entries(self)
    }
}

/// Records already held in memory (tests, imports, previews).
#[derive(Debug, Clone, Default)]
pub struct RecordSnapshot {
    pub food: Vec<FoodEntry>,
    pub symptoms: Vec<SymptomEntry>,
}

impl RecordSource for RecordSnapshot {
    fn food_entries(&self) -> Result<Vec<FoodEntry>, DatabaseError> {
        Ok(self.food.clone())
    }

    fn symptom_entries(&self) -> Result<Vec<SymptomEntry>, DatabaseError> {
        Ok(self.symptoms.clone())
    }
}
