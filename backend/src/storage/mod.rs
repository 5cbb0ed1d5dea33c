//! # SQLite Storage
//!
//! Every request works on its own connection opened from the configured database
//! file. Connections enable foreign keys, which is what makes the ownership
//! cascades of the survey tree work:
//!
//! - deleting a survey removes its questions, their answer options and every
//!   client answer given to the survey;
//! - deleting a question removes its options and the answers given to it;
//! - deleting an answer option only clears the option reference of the answers
//!   that selected it (`ON DELETE SET NULL`).
//!
//! Clients are never cascaded from anything.
//!
//! The entity modules expose plain functions over `&Connection`, so the same code
//! runs on a bare connection or inside a `Transaction`.

pub mod answer_options;
pub mod client_answers;
pub mod clients;
pub mod questions;
pub mod surveys;
pub mod users;

use crate::error::ServiceError;
use actix_web::web;
use rusqlite::types::Type;
use rusqlite::{Connection, Row};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS surveys (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT,
        status TEXT NOT NULL,
        start_date TEXT,
        end_date TEXT,
        created_by INTEGER NOT NULL REFERENCES users(id),
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_surveys_status ON surveys(status);

    CREATE TABLE IF NOT EXISTS questions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        survey_id INTEGER NOT NULL REFERENCES surveys(id) ON DELETE CASCADE,
        text TEXT NOT NULL,
        type TEXT NOT NULL,
        required INTEGER NOT NULL,
        order_number INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_questions_survey ON questions(survey_id, order_number);

    CREATE TABLE IF NOT EXISTS answer_options (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        question_id INTEGER NOT NULL REFERENCES questions(id) ON DELETE CASCADE,
        text TEXT NOT NULL,
        order_number INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_answer_options_question ON answer_options(question_id, order_number);

    CREATE TABLE IF NOT EXISTS clients (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        phone TEXT,
        gender TEXT,
        age_group TEXT,
        profession TEXT,
        region TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS client_answers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        client_id INTEGER NOT NULL REFERENCES clients(id),
        survey_id INTEGER NOT NULL REFERENCES surveys(id) ON DELETE CASCADE,
        question_id INTEGER NOT NULL REFERENCES questions(id) ON DELETE CASCADE,
        answer_option_id INTEGER REFERENCES answer_options(id) ON DELETE SET NULL,
        submission_id TEXT NOT NULL,
        text_answer TEXT,
        numeric_answer INTEGER,
        selections TEXT NOT NULL DEFAULT '[]',
        created_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_client_answers_survey ON client_answers(survey_id, created_at);
    CREATE INDEX IF NOT EXISTS idx_client_answers_submission ON client_answers(submission_id);
";

/// Handle to the database file, shared with every worker as `web::Data`.
#[derive(Clone)]
pub struct Storage {
    path: Arc<PathBuf>,
}

impl Storage {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: Arc::new(path.as_ref().to_path_buf()),
        }
    }

    /// Creates the schema if it does not exist yet.
    pub fn initialize(&self) -> Result<(), ServiceError> {
        let conn = self.connect()?;
        init_schema(&conn)?;
        Ok(())
    }

    pub fn connect(&self) -> Result<Connection, ServiceError> {
        let conn = Connection::open(self.path.as_ref())?;
        configure(&conn)?;
        Ok(conn)
    }

    /// Runs `job` on a fresh connection on the blocking thread pool.
    pub async fn run<F, T>(&self, job: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&mut Connection) -> Result<T, ServiceError> + Send + 'static,
        T: Send + 'static,
    {
        let storage = self.clone();
        web::block(move || {
            let mut conn = storage.connect()?;
            job(&mut conn)
        })
        .await?
    }
}

fn configure(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(())
}

pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)
}

/// Reads a text column holding the string form of a `FromStr` enum.
pub(crate) fn parse_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = String>,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e: String| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.into()))
}

/// In-memory database with the production schema.
#[cfg(test)]
pub fn open_in_memory() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    configure(&conn).unwrap();
    init_schema(&conn).unwrap();
    conn
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_is_idempotent() {
        let conn = open_in_memory();
        init_schema(&conn).unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 6);
    }

    #[test]
    fn file_storage_enables_foreign_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path().join("surveys.sqlite"));
        storage.initialize().unwrap();
        let conn = storage.connect().unwrap();
        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }
}
