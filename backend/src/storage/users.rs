use chrono::Utc;
use common::model::user::User;
use rusqlite::{params, Connection, OptionalExtension, Row};

fn from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
    })
}

pub fn find_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        "SELECT id, username, email FROM users WHERE id = ?1",
        params![id],
        from_row,
    )
    .optional()
}

pub fn find_by_email(conn: &Connection, email: &str) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        "SELECT id, username, email FROM users WHERE email = ?1",
        params![email],
        from_row,
    )
    .optional()
}

pub fn insert(conn: &Connection, username: &str, email: &str) -> rusqlite::Result<User> {
    conn.execute(
        "INSERT INTO users (username, email, created_at) VALUES (?1, ?2, ?3)",
        params![username, email, Utc::now()],
    )?;
    Ok(User {
        id: conn.last_insert_rowid(),
        username: username.to_string(),
        email: email.to_string(),
    })
}

/// Returns the account for `email`, creating it (username = local part) if needed.
pub fn ensure(conn: &Connection, email: &str) -> rusqlite::Result<User> {
    if let Some(user) = find_by_email(conn, email)? {
        return Ok(user);
    }
    let username = email.split('@').next().unwrap_or(email);
    insert(conn, username, email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::open_in_memory;

    #[test]
    fn ensure_creates_once() {
        let conn = open_in_memory();
        let first = ensure(&conn, "manager@example.com").unwrap();
        let second = ensure(&conn, "manager@example.com").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.username, "manager");
        assert_eq!(find_by_id(&conn, first.id).unwrap(), Some(first));
    }
}
