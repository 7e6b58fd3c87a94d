use std::str::FromStr;

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::Repository;
use crate::db::DatabaseError;
use crate::models::*;

const SYMPTOM_COLUMNS: &str =
    "id, symptom_type, severity, timestamp, duration_minutes, notes, triggered_by_food_id";

pub fn insert_symptom_entry(conn: &Connection, entry: &SymptomEntry) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO symptom_entries (id, symptom_type, severity, timestamp, duration_minutes,
         notes, triggered_by_food_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            entry.id.to_string(),
            entry.symptom_type.as_str(),
            entry.severity.value(),
            entry.timestamp,
            entry.duration_minutes,
            entry.notes,
            entry.triggered_by_food_id.map(|id| id.to_string()),
        ],
    )?;
    Ok(())
}

pub fn update_symptom_entry(conn: &Connection, entry: &SymptomEntry) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE symptom_entries SET symptom_type = ?2, severity = ?3, timestamp = ?4,
         duration_minutes = ?5, notes = ?6, triggered_by_food_id = ?7
         WHERE id = ?1",
        params![
            entry.id.to_string(),
            entry.symptom_type.as_str(),
            entry.severity.value(),
            entry.timestamp,
            entry.duration_minutes,
            entry.notes,
            entry.triggered_by_food_id.map(|id| id.to_string()),
        ],
    )?;
    if changed == 0 {
        return Err(not_found(&entry.id));
    }
    Ok(())
}

pub fn delete_symptom_entry(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "DELETE FROM symptom_entries WHERE id = ?1",
        params![id.to_string()],
    )?;
    if changed == 0 {
        return Err(not_found(id));
    }
    Ok(())
}

pub fn get_symptom_entry(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<SymptomEntry>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("SELECT {SYMPTOM_COLUMNS} FROM symptom_entries WHERE id = ?1"),
            params![id.to_string()],
            read_symptom_row,
        )
        .optional()?;
    row.map(symptom_from_row).transpose()
}

/// Newest first.
pub fn get_all_symptom_entries(conn: &Connection) -> Result<Vec<SymptomEntry>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SYMPTOM_COLUMNS} FROM symptom_entries ORDER BY timestamp DESC"
    ))?;
    let rows = stmt.query_map([], read_symptom_row)?;
    collect_symptoms(rows)
}

/// Entries with `start_ms <= timestamp <= end_ms`, oldest first.
pub fn get_symptom_entries_in_range(
    conn: &Connection,
    start_ms: i64,
    end_ms: i64,
) -> Result<Vec<SymptomEntry>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SYMPTOM_COLUMNS} FROM symptom_entries
         WHERE timestamp >= ?1 AND timestamp <= ?2 ORDER BY timestamp ASC"
    ))?;
    let rows = stmt.query_map(params![start_ms, end_ms], read_symptom_row)?;
    collect_symptoms(rows)
}

/// Count over the half-open window `[start_ms, end_ms)`.
pub fn count_symptom_entries_between(
    conn: &Connection,
    start_ms: i64,
    end_ms: i64,
) -> Result<u32, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM symptom_entries WHERE timestamp >= ?1 AND timestamp < ?2",
        params![start_ms, end_ms],
        |row| row.get::<_, u32>(0),
    )?;
    Ok(count)
}

/// Very severe or critical entries in `[start_ms, end_ms)`.
pub fn count_critical_symptoms_between(
    conn: &Connection,
    start_ms: i64,
    end_ms: i64,
) -> Result<u32, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM symptom_entries
         WHERE timestamp >= ?1 AND timestamp < ?2 AND severity >= ?3",
        params![start_ms, end_ms, SymptomSeverity::VerySevere.value()],
        |row| row.get::<_, u32>(0),
    )?;
    Ok(count)
}

type SymptomRow = (String, String, i32, i64, Option<u32>, String, Option<String>);

fn read_symptom_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SymptomRow> {
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

fn symptom_from_row(row: SymptomRow) -> Result<SymptomEntry, DatabaseError> {
    let (id, symptom_type, severity, timestamp, duration_minutes, notes, food_id) = row;
    Ok(SymptomEntry {
        id: Uuid::parse_str(&id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        symptom_type: SymptomType::from_str(&symptom_type)?,
        severity: SymptomSeverity::from_value(severity)?,
        timestamp,
        duration_minutes,
        notes,
        // Weak link: a malformed id is dropped rather than failing the read.
        triggered_by_food_id: food_id.and_then(|s| Uuid::parse_str(&s).ok()),
    })
}

fn collect_symptoms(
    rows: rusqlite::MappedRows<'_, impl FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<SymptomRow>>,
) -> Result<Vec<SymptomEntry>, DatabaseError> {
    let mut entries = Vec::new();
    for row in rows {
        entries.push(symptom_from_row(row?)?);
    }
    Ok(entries)
}

fn not_found(id: &Uuid) -> DatabaseError {
    DatabaseError::NotFound {
        entity_type: "SymptomEntry".into(),
        id: id.to_string(),
    }
}

/// Symptom journal handle over a borrowed connection.
pub struct SymptomRepository<'c> {
    conn: &'c Connection,
}

impl<'c> SymptomRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl Repository<SymptomEntry> for SymptomRepository<'_> {
    fn insert(&self, entity: &SymptomEntry) -> Result<Uuid, DatabaseError> {
        insert_symptom_entry(self.conn, entity)?;
        Ok(entity.id)
    }

    fn update(&self, entity: &SymptomEntry) -> Result<(), DatabaseError> {
        update_symptom_entry(self.conn, entity)
    }

    fn get(&self, id: &Uuid) -> Result<Option<SymptomEntry>, DatabaseError> {
        get_symptom_entry(self.conn, id)
    }

    fn delete(&self, id: &Uuid) -> Result<(), DatabaseError> {
        delete_symptom_entry(self.conn, id)
    }

    fn get_all(&self) -> Result<Vec<SymptomEntry>, DatabaseError> {
        get_all_symptom_entries(self.conn)
    }

    fn get_in_range(&self, start_ms: i64, end_ms: i64) -> Result<Vec<SymptomEntry>, DatabaseError> {
        get_symptom_entries_in_range(self.conn, start_ms, end_ms)
    }
}
