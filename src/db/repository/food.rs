use std::str::FromStr;

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::Repository;
use crate::db::DatabaseError;
use crate::models::*;

const FOOD_COLUMNS: &str = "id, food_name, category, timestamp, portion_size, notes, tags";

pub fn insert_food_entry(conn: &Connection, entry: &FoodEntry) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO food_entries (id, food_name, category, timestamp, portion_size, notes, tags)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            entry.id.to_string(),
            entry.food_name,
            entry.category.as_str(),
            entry.timestamp,
            entry.portion_size,
            entry.notes,
            serde_json::to_string(&entry.tags)?,
        ],
    )?;
    Ok(())
}

pub fn update_food_entry(conn: &Connection, entry: &FoodEntry) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE food_entries SET food_name = ?2, category = ?3, timestamp = ?4,
         portion_size = ?5, notes = ?6, tags = ?7
         WHERE id = ?1",
        params![
            entry.id.to_string(),
            entry.food_name,
            entry.category.as_str(),
            entry.timestamp,
            entry.portion_size,
            entry.notes,
            serde_json::to_string(&entry.tags)?,
        ],
    )?;
    if changed == 0 {
        return Err(not_found(&entry.id));
    }
    Ok(())
}

pub fn delete_food_entry(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "DELETE FROM food_entries WHERE id = ?1",
        params![id.to_string()],
    )?;
    if changed == 0 {
        return Err(not_found(id));
    }
    Ok(())
}

pub fn get_food_entry(conn: &Connection, id: &Uuid) -> Result<Option<FoodEntry>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("SELECT {FOOD_COLUMNS} FROM food_entries WHERE id = ?1"),
            params![id.to_string()],
            read_food_row,
        )
        .optional()?;
    row.map(food_from_row).transpose()
}

/// Newest first.
pub fn get_all_food_entries(conn: &Connection) -> Result<Vec<FoodEntry>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {FOOD_COLUMNS} FROM food_entries ORDER BY timestamp DESC"
    ))?;
    let rows = stmt.query_map([], read_food_row)?;
    collect_food(rows)
}

/// Entries with `start_ms <= timestamp <= end_ms`, oldest first.
pub fn get_food_entries_in_range(
    conn: &Connection,
    start_ms: i64,
    end_ms: i64,
) -> Result<Vec<FoodEntry>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {FOOD_COLUMNS} FROM food_entries
         WHERE timestamp >= ?1 AND timestamp <= ?2 ORDER BY timestamp ASC"
    ))?;
    let rows = stmt.query_map(params![start_ms, end_ms], read_food_row)?;
    collect_food(rows)
}

/// Count over the half-open window `[start_ms, end_ms)`.
pub fn count_food_entries_between(
    conn: &Connection,
    start_ms: i64,
    end_ms: i64,
) -> Result<u32, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM food_entries WHERE timestamp >= ?1 AND timestamp < ?2",
        params![start_ms, end_ms],
        |row| row.get::<_, u32>(0),
    )?;
    Ok(count)
}

type FoodRow = (String, String, String, i64, String, String, String);

fn read_food_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<FoodRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn food_from_row(row: FoodRow) -> Result<FoodEntry, DatabaseError> {
    let (id, food_name, category, timestamp, portion_size, notes, tags) = row;
    Ok(FoodEntry {
        id: Uuid::parse_str(&id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        food_name,
        category: MealCategory::from_str(&category)?,
        timestamp,
        portion_size,
        notes,
        tags: serde_json::from_str(&tags)?,
    })
}

fn collect_food(
    rows: rusqlite::MappedRows<'_, impl FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<FoodRow>>,
) -> Result<Vec<FoodEntry>, DatabaseError> {
    let mut entries = Vec::new();
    for row in rows {
        entries.push(food_from_row(row?)?);
    }
    Ok(entries)
}

fn not_found(id: &Uuid) -> DatabaseError {
    DatabaseError::NotFound {
        entity_type: "FoodEntry".into(),
        id: id.to_string(),
    }
}

/// Food journal handle over a borrowed connection.
pub struct FoodRepository<'c> {
    conn: &'c Connection,
}

impl<'c> FoodRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl Repository<FoodEntry> for FoodRepository<'_> {
    fn insert(&self, entity: &FoodEntry) -> Result<Uuid, DatabaseError> {
        insert_food_entry(self.conn, entity)?;
        Ok(entity.id)
    }

    fn update(&self, entity: &FoodEntry) -> Result<(), DatabaseError> {
        update_food_entry(self.conn, entity)
    }

    fn get(&self, id: &Uuid) -> Result<Option<FoodEntry>, DatabaseError> {
        get_food_entry(self.conn, id)
    }

    fn delete(&self, id: &Uuid) -> Result<(), DatabaseError> {
        delete_food_entry(self.conn, id)
    }

    fn get_all(&self) -> Result<Vec<FoodEntry>, DatabaseError> {
        get_all_food_entries(self.conn)
    }

    fn get_in_range(&self, start_ms: i64, end_ms: i64) -> Result<Vec<FoodEntry>, DatabaseError> {
        get_food_entries_in_range(self.conn, start_ms, end_ms)
    }
}
