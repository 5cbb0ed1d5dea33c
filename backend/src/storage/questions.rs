use super::{answer_options, parse_column};
use common::model::question::{Question, QuestionType};
use rusqlite::{params, Connection, Row};

fn from_row(row: &Row<'_>) -> rusqlite::Result<Question> {
    Ok(Question {
        id: row.get(0)?,
        survey_id: row.get(1)?,
        text: row.get(2)?,
        question_type: parse_column(row, 3)?,
        required: row.get(4)?,
        order_number: row.get(5)?,
        options: Vec::new(),
    })
}

/// The survey's questions ordered by `order_number`, each with its ordered options.
pub fn find_by_survey_ordered(conn: &Connection, survey_id: i64) -> rusqlite::Result<Vec<Question>> {
    let mut stmt = conn.prepare(
        "SELECT id, survey_id, text, type, required, order_number
         FROM questions WHERE survey_id = ?1 ORDER BY order_number ASC, id ASC",
    )?;
    let mut questions = stmt
        .query_map(params![survey_id], from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    for question in &mut questions {
        question.options = answer_options::find_by_question_ordered(conn, question.id)?;
    }
    Ok(questions)
}

pub fn insert(
    conn: &Connection,
    survey_id: i64,
    text: &str,
    question_type: QuestionType,
    required: bool,
    order_number: u32,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO questions (survey_id, text, type, required, order_number)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![survey_id, text, question_type.as_str(), required, order_number],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Writes text, type, required flag and order number of an existing question.
pub fn update(conn: &Connection, question: &Question) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE questions SET text = ?1, type = ?2, required = ?3, order_number = ?4 WHERE id = ?5",
        params![
            question.text,
            question.question_type.as_str(),
            question.required,
            question.order_number,
            question.id,
        ],
    )
}

/// Deletes the question; its options and answers go with it.
pub fn delete(conn: &Connection, id: i64) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM questions WHERE id = ?1", params![id])
}
