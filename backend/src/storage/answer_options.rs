use common::model::question::AnswerOption;
use rusqlite::{params, Connection, Row};

fn from_row(row: &Row<'_>) -> rusqlite::Result<AnswerOption> {
    Ok(AnswerOption {
        id: row.get(0)?,
        question_id: row.get(1)?,
        text: row.get(2)?,
        order_number: row.get(3)?,
    })
}

pub fn find_by_question_ordered(conn: &Connection, question_id: i64) -> rusqlite::Result<Vec<AnswerOption>> {
    let mut stmt = conn.prepare(
        "SELECT id, question_id, text, order_number
         FROM answer_options WHERE question_id = ?1 ORDER BY order_number ASC, id ASC",
    )?;
    let rows = stmt.query_map(params![question_id], from_row)?;
    rows.collect()
}

pub fn insert(conn: &Connection, question_id: i64, text: &str, order_number: u32) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO answer_options (question_id, text, order_number) VALUES (?1, ?2, ?3)",
        params![question_id, text, order_number],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update(conn: &Connection, id: i64, text: &str, order_number: u32) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE answer_options SET text = ?1, order_number = ?2 WHERE id = ?3",
        params![text, order_number, id],
    )
}

pub fn delete(conn: &Connection, id: i64) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM answer_options WHERE id = ?1", params![id])
}
