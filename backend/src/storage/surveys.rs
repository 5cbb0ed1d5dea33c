use super::parse_column;
use chrono::{DateTime, NaiveDate, Utc};
use common::model::survey::SurveyStatus;
use rusqlite::{params, Connection, OptionalExtension, Row};

/// The scalar columns of a survey row. The question tree and the owner are
/// attached by the service layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyRecord {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: SurveyStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable scalar fields, shared by insert and update.
#[derive(Debug, Clone)]
pub struct SurveyFields<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub status: SurveyStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

const COLUMNS: &str =
    "id, title, description, status, start_date, end_date, created_by, created_at, updated_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<SurveyRecord> {
    Ok(SurveyRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        status: parse_column(row, 3)?,
        start_date: row.get(4)?,
        end_date: row.get(5)?,
        created_by: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

pub fn find_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<SurveyRecord>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM surveys WHERE id = ?1"),
        params![id],
        from_row,
    )
    .optional()
}

pub fn insert(conn: &Connection, fields: &SurveyFields<'_>, created_by: i64) -> rusqlite::Result<i64> {
    let now = Utc::now();
    conn.execute(
        "INSERT INTO surveys (title, description, status, start_date, end_date, created_by, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
        params![
            fields.title,
            fields.description,
            fields.status.as_str(),
            fields.start_date,
            fields.end_date,
            created_by,
            now,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_fields(conn: &Connection, id: i64, fields: &SurveyFields<'_>) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE surveys
         SET title = ?1, description = ?2, status = ?3, start_date = ?4, end_date = ?5, updated_at = ?6
         WHERE id = ?7",
        params![
            fields.title,
            fields.description,
            fields.status.as_str(),
            fields.start_date,
            fields.end_date,
            Utc::now(),
            id,
        ],
    )
}

pub fn update_status(conn: &Connection, id: i64, status: SurveyStatus) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE surveys SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.as_str(), Utc::now(), id],
    )
}

pub fn delete(conn: &Connection, id: i64) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM surveys WHERE id = ?1", params![id])
}

pub fn count(conn: &Connection, status: Option<SurveyStatus>) -> rusqlite::Result<u64> {
    conn.query_row(
        "SELECT COUNT(*) FROM surveys WHERE ?1 IS NULL OR status = ?1",
        params![status.map(|s| s.as_str())],
        |row| row.get(0),
    )
}

/// Newest first.
pub fn find_page(
    conn: &Connection,
    status: Option<SurveyStatus>,
    limit: u32,
    offset: u64,
) -> rusqlite::Result<Vec<SurveyRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM surveys
         WHERE ?1 IS NULL OR status = ?1
         ORDER BY created_at DESC, id DESC
         LIMIT ?2 OFFSET ?3"
    ))?;
    let rows = stmt.query_map(params![status.map(|s| s.as_str()), limit, offset], from_row)?;
    rows.collect()
}
