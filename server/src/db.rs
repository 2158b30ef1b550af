use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::sync::Mutex;

const SCHEMA: &str = include_str!("schema.sql");

/// Handle to the ranking database, shared between workers through app state.
pub struct Db {
    conn: Mutex<Connection>,
}

impl Db {
    pub fn open(path: &str) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA busy_timeout=5000;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Db {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Db {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T, rusqlite::Error>
    where
        F: FnOnce(&Connection) -> Result<T, rusqlite::Error>,
    {
        // A panic inside another closure leaves the connection itself usable
        let conn = self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&conn)
    }

    /// Runs `f` inside an immediate transaction, committing only if it succeeds.
    /// The connection lock is held for the whole read-modify-write.
    pub fn with_tx<F, T>(&self, f: F) -> Result<T, rusqlite::Error>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, rusqlite::Error>,
    {
        self.with_conn(|conn| {
            let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
            let value = f(&tx)?;
            tx.commit()?;
            Ok(value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_tx_rolls_back() {
        let db = Db::open_in_memory().unwrap();
        let result: Result<(), _> = db.with_tx(|tx| {
            tx.execute(
                "INSERT INTO corrida_ranking (nome, tempo) VALUES ('Ana', 1.0)",
                [],
            )?;
            // Duplicate name violates the unique constraint
            tx.execute(
                "INSERT INTO corrida_ranking (nome, tempo) VALUES ('Ana', 2.0)",
                [],
            )?;
            Ok(())
        });
        assert!(result.is_err());

        let count: i64 = db
            .with_conn(|conn| {
                conn.query_row("SELECT COUNT(*) FROM corrida_ranking", [], |row| row.get(0))
            })
            .unwrap();
        assert_eq!(count, 0);
    }
}
