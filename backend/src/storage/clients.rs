use chrono::Utc;
use common::model::client::Client;
use rusqlite::{params, Connection, OptionalExtension, Row};

const COLUMNS: &str =
    "id, name, email, phone, gender, age_group, profession, region, created_at, updated_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Client> {
    Ok(Client {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        gender: row.get(4)?,
        age_group: row.get(5)?,
        profession: row.get(6)?,
        region: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

pub fn find_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<Client>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM clients WHERE id = ?1"),
        params![id],
        from_row,
    )
    .optional()
}

/// Every client, oldest first.
pub fn find_all(conn: &Connection) -> rusqlite::Result<Vec<Client>> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM clients ORDER BY id"))?;
    let rows = stmt.query_map([], from_row)?;
    rows.collect()
}

pub fn find_by_email(conn: &Connection, email: &str) -> rusqlite::Result<Option<Client>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM clients WHERE email = ?1"),
        params![email],
        from_row,
    )
    .optional()
}

pub fn update_name(conn: &Connection, id: i64, name: &str) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE clients SET name = ?1, updated_at = ?2 WHERE id = ?3",
        params![name, Utc::now(), id],
    )
}

/// Inserts a client with only name and email set. If another writer created
/// the same email first, the unique key turns the insert into a name refresh.
pub fn upsert_by_email(conn: &Connection, name: &str, email: &str) -> rusqlite::Result<i64> {
    conn.query_row(
        "INSERT INTO clients (name, email, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)
         ON CONFLICT(email) DO UPDATE SET name = excluded.name, updated_at = excluded.updated_at
         RETURNING id",
        params![name, email, Utc::now()],
        |row| row.get(0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::open_in_memory;

    #[test]
    fn upsert_keeps_one_row_per_email() {
        let conn = open_in_memory();
        let first = upsert_by_email(&conn, "Ann", "ann@example.com").unwrap();
        let second = upsert_by_email(&conn, "Ann B.", "ann@example.com").unwrap();
        assert_eq!(first, second);

        let client = find_by_email(&conn, "ann@example.com").unwrap().unwrap();
        assert_eq!(client.name, "Ann B.");
        assert!(client.phone.is_none());
    }
}
