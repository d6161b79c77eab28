use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::Severity;
use crate::models::{AnalysisResult, SymptomRecord};

const ENTITY: &str = "symptom_record";

const SELECT_COLUMNS: &str =
    "SELECT id, user_id, symptoms, duration, severity, analysis_result, created_at
     FROM symptom_records";

/// Result ordering by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    OldestFirst,
    NewestFirst,
}

impl SortOrder {
    fn sql(self) -> &'static str {
        match self {
            SortOrder::OldestFirst => "ORDER BY created_at ASC, rowid ASC",
            SortOrder::NewestFirst => "ORDER BY created_at DESC, rowid DESC",
        }
    }
}

/// Fixed-width timestamps so that lexical order equals chronological order.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::ConstraintViolation(format!("created_at {raw:?}: {e}")))
}

pub fn insert_symptom_record(conn: &Connection, record: &SymptomRecord) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO symptom_records (id, user_id, symptoms, duration, severity, analysis_result, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            record.id.to_string(),
            record.user_id,
            serde_json::to_string(&record.symptoms)?,
            record.duration,
            record.severity.as_str(),
            serde_json::to_string(&record.analysis_result)?,
            format_timestamp(&record.created_at),
        ],
    )?;
    Ok(())
}

type SymptomRecordRow = (String, String, String, String, String, String, String);

fn read_row(row: &Row<'_>) -> rusqlite::Result<SymptomRecordRow> {
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

/// Decode a stored row. The stored analysis is returned as-is, never recomputed.
fn record_from_row(row: SymptomRecordRow) -> Result<SymptomRecord, DatabaseError> {
    let (id, user_id, symptoms, duration, severity, analysis_result, created_at) = row;
    Ok(SymptomRecord {
        id: Uuid::parse_str(&id).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        user_id,
        symptoms: serde_json::from_str::<Vec<String>>(&symptoms)?,
        duration,
        severity: severity.parse::<Severity>()?,
        analysis_result: serde_json::from_str::<AnalysisResult>(&analysis_result)?,
        created_at: parse_timestamp(&created_at)?,
    })
}

pub fn get_symptom_record(conn: &Connection, id: &Uuid) -> Result<Option<SymptomRecord>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("{SELECT_COLUMNS} WHERE id = ?1"),
            params![id.to_string()],
            read_row,
        )
        .optional()?;
    row.map(record_from_row).transpose()
}

/// Fetch a record on behalf of `user_id`, enforcing ownership.
pub fn get_owned_symptom_record(
    conn: &Connection,
    id: &Uuid,
    user_id: &str,
) -> Result<SymptomRecord, DatabaseError> {
    let record = get_symptom_record(conn, id)?.ok_or_else(|| DatabaseError::NotFound {
        entity_type: ENTITY.into(),
        id: id.to_string(),
    })?;
    if !record.is_owned_by(user_id) {
        return Err(DatabaseError::NotOwner {
            entity_type: ENTITY.into(),
            id: id.to_string(),
        });
    }
    Ok(record)
}

/// All of a user's records in the requested order.
pub fn list_symptom_records(
    conn: &Connection,
    user_id: &str,
    order: SortOrder,
) -> Result<Vec<SymptomRecord>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE user_id = ?1 {}", order.sql()))?;
    let rows = stmt.query_map(params![user_id], read_row)?;

    let mut records = Vec::new();
    for row in rows {
        records.push(record_from_row(row?)?);
    }
    Ok(records)
}

/// Delete a record owned by `user_id`.
pub fn delete_symptom_record(conn: &Connection, id: &Uuid, user_id: &str) -> Result<(), DatabaseError> {
    get_owned_symptom_record(conn, id, user_id)?;
    conn.execute(
        "DELETE FROM symptom_records WHERE id = ?1 AND user_id = ?2",
        params![id.to_string(), user_id],
    )?;
    Ok(())
}
