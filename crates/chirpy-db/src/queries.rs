use crate::Database;
use crate::models::{ChirpRow, UserRow};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

impl Database {
    // -- Users --

    /// Insert a user and read the row back so DB-assigned timestamps are
    /// returned to the caller.
    pub fn create_user(
        &self,
        id: &str,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, email, password) VALUES (?1, ?2, ?3, ?4)",
                (id, username, email, password_hash),
            )?;

            query_user_by_id(conn, id)?.ok_or_else(|| anyhow!("user {} missing after insert", id))
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_email(conn, email))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    // -- Chirps --

    pub fn create_chirp(&self, id: &str, user_id: &str, body: &str) -> Result<ChirpRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO chirps (id, user_id, body) VALUES (?1, ?2, ?3)",
                (id, user_id, body),
            )?;

            query_chirp_by_id(conn, id)?.ok_or_else(|| anyhow!("chirp {} missing after insert", id))
        })
    }

    pub fn get_chirp(&self, id: &str) -> Result<Option<ChirpRow>> {
        self.with_conn(|conn| query_chirp_by_id(conn, id))
    }

    pub fn get_all_chirps(&self) -> Result<Vec<ChirpRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, body, created_at, updated_at
                 FROM chirps
                 ORDER BY created_at ASC, rowid ASC",
            )?;

            let rows = stmt
                .query_map([], |row| {
                    Ok(ChirpRow {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        body: row.get(2)?,
                        created_at: row.get(3)?,
                        updated_at: row.get(4)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    // -- Admin --

    /// Wipe all chirps and users. Chirps first so the foreign key holds.
    pub fn reset(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM chirps", [])?;
            conn.execute("DELETE FROM users", [])?;
            Ok(())
        })
    }
}

fn query_user_by_email(conn: &Connection, email: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, username, email, password, created_at, updated_at
         FROM users WHERE email = ?1",
    )?;

    let row = stmt.query_row([email], map_user_row).optional()?;

    Ok(row)
}

fn query_user_by_id(conn: &Connection, id: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, username, email, password, created_at, updated_at
         FROM users WHERE id = ?1",
    )?;

    let row = stmt.query_row([id], map_user_row).optional()?;

    Ok(row)
}

fn query_chirp_by_id(conn: &Connection, id: &str) -> Result<Option<ChirpRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, body, created_at, updated_at
         FROM chirps WHERE id = ?1",
    )?;

    let row = stmt
        .query_row([id], |row| {
            Ok(ChirpRow {
                id: row.get(0)?,
                user_id: row.get(1)?,
                body: row.get(2)?,
                created_at: row.get(3)?,
                updated_at: row.get(4)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn map_user_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
