use chrono::Utc;
use common::model::client::ClientAnswer;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};

/// Column values of a new answer row; `id` and `created_at` are assigned on insert.
#[derive(Debug, Clone)]
pub struct NewClientAnswer<'a> {
    pub client_id: i64,
    pub survey_id: i64,
    pub question_id: i64,
    pub answer_option_id: Option<i64>,
    pub submission_id: &'a str,
    pub text_answer: Option<&'a str>,
    pub numeric_answer: Option<i32>,
    pub selections: &'a [String],
}

fn from_row(row: &Row<'_>) -> rusqlite::Result<ClientAnswer> {
    let selections: String = row.get(8)?;
    let selections = serde_json::from_str(&selections)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e)))?;
    Ok(ClientAnswer {
        id: row.get(0)?,
        client_id: row.get(1)?,
        survey_id: row.get(2)?,
        question_id: row.get(3)?,
        answer_option_id: row.get(4)?,
        submission_id: row.get(5)?,
        text_answer: row.get(6)?,
        numeric_answer: row.get(7)?,
        selections,
        created_at: row.get(9)?,
    })
}

pub fn insert(conn: &Connection, answer: &NewClientAnswer<'_>) -> rusqlite::Result<i64> {
    let selections = serde_json::to_string(answer.selections)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
    conn.execute(
        "INSERT INTO client_answers
            (client_id, survey_id, question_id, answer_option_id, submission_id,
             text_answer, numeric_answer, selections, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            answer.client_id,
            answer.survey_id,
            answer.question_id,
            answer.answer_option_id,
            answer.submission_id,
            answer.text_answer,
            answer.numeric_answer,
            selections,
            Utc::now(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// All answers given to a survey, oldest first.
pub fn find_by_survey(conn: &Connection, survey_id: i64) -> rusqlite::Result<Vec<ClientAnswer>> {
    let mut stmt = conn.prepare(
        "SELECT id, client_id, survey_id, question_id, answer_option_id, submission_id,
                text_answer, numeric_answer, selections, created_at
         FROM client_answers WHERE survey_id = ?1 ORDER BY created_at ASC, id ASC",
    )?;
    let rows = stmt.query_map(params![survey_id], from_row)?;
    rows.collect()
}

/// An answer together with the texts it points at.
#[derive(Debug, Clone)]
pub struct LabeledAnswer {
    pub answer: ClientAnswer,
    pub question_text: String,
    pub option_text: Option<String>,
}

/// Every stored answer, grouped by client and oldest first within a client.
pub fn find_all_labeled(conn: &Connection) -> rusqlite::Result<Vec<LabeledAnswer>> {
    let mut stmt = conn.prepare(
        "SELECT a.id, a.client_id, a.survey_id, a.question_id, a.answer_option_id, a.submission_id,
                a.text_answer, a.numeric_answer, a.selections, a.created_at,
                q.text, o.text
         FROM client_answers a
         JOIN questions q ON q.id = a.question_id
         LEFT JOIN answer_options o ON o.id = a.answer_option_id
         ORDER BY a.client_id, a.created_at, a.id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(LabeledAnswer {
            answer: from_row(row)?,
            question_text: row.get(10)?,
            option_text: row.get(11)?,
        })
    })?;
    rows.collect()
}

pub fn distinct_client_ids(conn: &Connection, survey_id: i64) -> rusqlite::Result<Vec<i64>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT client_id FROM client_answers WHERE survey_id = ?1 ORDER BY client_id",
    )?;
    let rows = stmt.query_map(params![survey_id], |row| row.get(0))?;
    rows.collect()
}

pub fn count_by_survey(conn: &Connection, survey_id: i64) -> rusqlite::Result<usize> {
    conn.query_row(
        "SELECT COUNT(*) FROM client_answers WHERE survey_id = ?1",
        params![survey_id],
        |row| row.get(0),
    )
}
