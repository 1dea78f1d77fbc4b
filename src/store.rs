//! Read access to recorded expenses.
//!
//! The engine only ever reads: a date-range fetch and the list of category
//! names in use. Both are async so a store may sit behind an actor, a
//! database pool or a network hop.

use std::path::Path;
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use rusqlite::Connection;

use crate::db::{get_connection, init_db, insert_expense, DATE_FORMAT};
use crate::error::{PennyError, Result};
use crate::models::Transaction;
use crate::period::DateRange;

#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Expenses dated within `[range.start, range.end)`.
    async fn fetch_by_range(&self, range: DateRange) -> Result<Vec<Transaction>>;

    /// Distinct category names. The order is significant: the keyword parser
    /// picks the first one mentioned.
    async fn list_distinct_categories(&self) -> Result<Vec<String>>;
}

/// Vec-backed store for tests and demos.
#[derive(Default)]
pub struct MemoryStore {
    transactions: RwLock<Vec<Transaction>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transactions(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions: RwLock::new(transactions),
        }
    }

    pub fn add(&self, date: NaiveDateTime, category: &str, amount: f64, note: &str) -> Result<i64> {
        let mut txns = self.write()?;
        let id = txns.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        txns.push(Transaction {
            id,
            date,
            category: category.to_string(),
            amount,
            note: note.to_string(),
        });
        Ok(id)
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Vec<Transaction>>> {
        self.transactions
            .write()
            .map_err(|_| PennyError::Store("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn fetch_by_range(&self, range: DateRange) -> Result<Vec<Transaction>> {
        let txns = self
            .transactions
            .read()
            .map_err(|_| PennyError::Store("memory store lock poisoned".to_string()))?;
        Ok(txns
            .iter()
            .filter(|t| range.contains(t.date))
            .cloned()
            .collect())
    }

    async fn list_distinct_categories(&self) -> Result<Vec<String>> {
        let txns = self
            .transactions
            .read()
            .map_err(|_| PennyError::Store("memory store lock poisoned".to_string()))?;
        let mut seen: Vec<String> = Vec::new();
        for t in txns.iter() {
            if !seen.contains(&t.category) {
                seen.push(t.category.clone());
            }
        }
        Ok(seen)
    }
}

/// Store backed by the `expenses` table.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = get_connection(db_path)?;
        init_db(&conn)?;
        Ok(Self::from_connection(conn))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    pub fn add(&self, date: NaiveDateTime, category: &str, amount: f64, note: &str) -> Result<i64> {
        let conn = self.lock()?;
        insert_expense(&conn, date, category, amount, note)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| PennyError::Store("sqlite connection lock poisoned".to_string()))
    }
}

#[async_trait]
impl TransactionStore for SqliteStore {
    async fn fetch_by_range(&self, range: DateRange) -> Result<Vec<Transaction>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, date, category, amount, note FROM expenses \
             WHERE date >= ?1 AND date < ?2 ORDER BY date, id",
        )?;
        let rows: Vec<(i64, String, String, f64, String)> = stmt
            .query_map(
                rusqlite::params![
                    range.start.format(DATE_FORMAT).to_string(),
                    range.end.format(DATE_FORMAT).to_string()
                ],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?)),
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, date, category, amount, note)| {
                let date = NaiveDateTime::parse_from_str(&date, DATE_FORMAT)
                    .map_err(|e| PennyError::InvalidDate(format!("expense {id}: {date}: {e}")))?;
                Ok(Transaction {
                    id,
                    date,
                    category,
                    amount,
                    note,
                })
            })
            .collect()
    }

    async fn list_distinct_categories(&self) -> Result<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT category FROM expenses GROUP BY category ORDER BY MIN(id)")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(names)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::period::start_of_day;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    fn january() -> DateRange {
        DateRange {
            start: start_of_day(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()),
            end: start_of_day(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()),
        }
    }

    fn seed<F: Fn(NaiveDateTime, &str, f64, &str)>(add: F) {
        add(at(2024, 12, 31, 23), "식비", 1000.0, "");
        add(at(2025, 1, 1, 0), "교통", 1250.0, "카드");
        add(at(2025, 1, 20, 9), "식비", 9000.0, "현금");
        add(at(2025, 2, 1, 0), "쇼핑", 30000.0, "");
        add(at(2025, 1, 21, 9), "교통", 1400.0, "");
    }

    fn sqlite_store() -> (tempfile::TempDir, SqliteStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(&dir.path().join("test.db")).unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_memory_fetch_is_half_open() {
        let store = MemoryStore::new();
        seed(|d, c, a, n| {
            store.add(d, c, a, n).unwrap();
        });
        let txns = store.fetch_by_range(january()).await.unwrap();
        let amounts: Vec<f64> = txns.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![1250.0, 9000.0, 1400.0]);
    }

    #[tokio::test]
    async fn test_memory_categories_in_first_seen_order() {
        let store = MemoryStore::new();
        seed(|d, c, a, n| {
            store.add(d, c, a, n).unwrap();
        });
        let names = store.list_distinct_categories().await.unwrap();
        assert_eq!(names, vec!["식비", "교통", "쇼핑"]);
    }

    #[tokio::test]
    async fn test_sqlite_fetch_is_half_open() {
        let (_dir, store) = sqlite_store();
        seed(|d, c, a, n| {
            store.add(d, c, a, n).unwrap();
        });
        let txns = store.fetch_by_range(january()).await.unwrap();
        assert_eq!(txns.len(), 3);
        assert_eq!(txns[0].category, "교통");
        assert_eq!(txns[0].note, "카드");
        assert_eq!(txns[0].date, at(2025, 1, 1, 0));
        assert_eq!(txns[2].amount, 1400.0);
    }

    #[tokio::test]
    async fn test_sqlite_categories_in_first_seen_order() {
        let (_dir, store) = sqlite_store();
        seed(|d, c, a, n| {
            store.add(d, c, a, n).unwrap();
        });
        let names = store.list_distinct_categories().await.unwrap();
        assert_eq!(names, vec!["식비", "교통", "쇼핑"]);
    }

    #[tokio::test]
    async fn test_sqlite_empty_store() {
        let (_dir, store) = sqlite_store();
        assert!(store.fetch_by_range(january()).await.unwrap().is_empty());
        assert!(store.list_distinct_categories().await.unwrap().is_empty());
    }
}
