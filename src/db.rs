use std::path::Path;

use chrono::NaiveDateTime;
use rusqlite::Connection;

use crate::error::Result;

pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS expenses (
    id INTEGER PRIMARY KEY,
    date TEXT NOT NULL,
    category TEXT NOT NULL,
    amount REAL NOT NULL CHECK (amount >= 0),
    note TEXT NOT NULL DEFAULT '',
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);
";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

pub fn insert_expense(
    conn: &Connection,
    date: NaiveDateTime,
    category: &str,
    amount: f64,
    note: &str,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO expenses (date, category, amount, note) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![date.format(DATE_FORMAT).to_string(), category, amount, note],
    )?;
    Ok(conn.last_insert_rowid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    fn noon(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn test_init_db_creates_tables() {
        let (_dir, conn) = test_db();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        assert!(tables.contains(&"expenses".to_string()));
    }

    #[test]
    fn test_init_db_is_idempotent() {
        let (_dir, conn) = test_db();
        init_db(&conn).unwrap();
    }

    #[test]
    fn test_insert_expense_stores_sortable_date() {
        let (_dir, conn) = test_db();
        let id = insert_expense(&conn, noon(2025, 1, 5), "식비", 8000.0, "김밥").unwrap();
        let date: String = conn
            .query_row("SELECT date FROM expenses WHERE id = ?1", [id], |r| r.get(0))
            .unwrap();
        assert_eq!(date, "2025-01-05 12:00:00");
    }

    #[test]
    fn test_negative_amount_rejected() {
        let (_dir, conn) = test_db();
        assert!(insert_expense(&conn, noon(2025, 1, 5), "식비", -1.0, "").is_err());
    }
}
