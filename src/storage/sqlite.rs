//! SQLite-backed ledger and audit log.
//!
//! Both tables are keyed the way the reservation and audit records define
//! their identity, and written with `INSERT OR REPLACE`. Timestamps are
//! stored as RFC 3339 text with nanosecond precision.

use super::{QueryAuditLog, ReservationLedger};
use crate::catalog::{QueryAuditRecord, Reservation};
use crate::types::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const LEDGER_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS reservations (
        restaurant_name   TEXT NOT NULL,
        main_guest_name   TEXT NOT NULL,
        number_of_persons INTEGER NOT NULL,
        timestamp_utc     TEXT NOT NULL,
        PRIMARY KEY (restaurant_name, main_guest_name)
    );
";

const AUDIT_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS query_audit (
        timestamp_utc TEXT PRIMARY KEY,
        sql_query     TEXT NOT NULL
    );
";

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| Error::storage(format!("corrupt timestamp '{}': {}", raw, e)))
}

fn open(path: &Path, schema: &str) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let conn = Connection::open(path)?;
    conn.execute_batch(schema)?;
    Ok(conn)
}

fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|_| Error::internal("sqlite connection mutex poisoned"))
}

// =============================================================================
// Ledger
// =============================================================================

/// Reservation ledger in a SQLite file.
#[derive(Debug)]
pub struct SqliteLedger {
    conn: Mutex<Connection>,
}

impl SqliteLedger {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = open(path.as_ref(), LEDGER_SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(LEDGER_SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

#[async_trait]
impl ReservationLedger for SqliteLedger {
    async fn put(&self, reservation: Reservation) -> Result<()> {
        let conn = lock(&self.conn)?;
        conn.execute(
            "INSERT OR REPLACE INTO reservations
                 (restaurant_name, main_guest_name, number_of_persons, timestamp_utc)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                reservation.restaurant_name,
                reservation.main_guest_name,
                reservation.number_of_persons,
                format_timestamp(&reservation.timestamp_utc),
            ],
        )?;
        Ok(())
    }

    async fn scan(&self) -> Result<Vec<Reservation>> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(
            "SELECT restaurant_name, main_guest_name, number_of_persons, timestamp_utc
             FROM reservations",
        )?;
        let raw = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        raw.into_iter()
            .map(|(restaurant_name, main_guest_name, number_of_persons, ts)| {
                Ok(Reservation {
                    restaurant_name,
                    main_guest_name,
                    number_of_persons,
                    timestamp_utc: parse_timestamp(&ts)?,
                })
            })
            .collect()
    }
}

// =============================================================================
// Audit log
// =============================================================================

/// Query audit log in a SQLite file.
#[derive(Debug)]
pub struct SqliteAuditLog {
    conn: Mutex<Connection>,
}

impl SqliteAuditLog {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = open(path.as_ref(), AUDIT_SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(AUDIT_SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Number of stored audit rows.
    pub fn count(&self) -> Result<usize> {
        let conn = lock(&self.conn)?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM query_audit", [], |row| row.get(0))?;
        Ok(usize::try_from(n).unwrap_or_default())
    }
}

#[async_trait]
impl QueryAuditLog for SqliteAuditLog {
    async fn append(&self, record: QueryAuditRecord) -> Result<()> {
        let conn = lock(&self.conn)?;
        conn.execute(
            "INSERT OR REPLACE INTO query_audit (timestamp_utc, sql_query) VALUES (?1, ?2)",
            params![format_timestamp(&record.timestamp_utc), record.sql_query],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ledger_upserts_on_identity_key() {
        let ledger = SqliteLedger::open_in_memory().unwrap();
        ledger.put(Reservation::new("Toyama", "Ivy", 3)).await.unwrap();
        ledger.put(Reservation::new("Toyama", "Ivy", 8)).await.unwrap();

        let rows = ledger.scan().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].number_of_persons, 8);
    }

    #[tokio::test]
    async fn test_ledger_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/reservations.db");
        let original = Reservation::new("Paros", "Nikos", 4);
        {
            let ledger = SqliteLedger::open(&path).unwrap();
            ledger.put(original.clone()).await.unwrap();
        }

        let reopened = SqliteLedger::open(&path).unwrap();
        let rows = reopened.scan().await.unwrap();
        assert_eq!(rows, vec![original]);
    }

    #[tokio::test]
    async fn test_audit_log_appends() {
        let audit = SqliteAuditLog::open_in_memory().unwrap();
        audit
            .append(QueryAuditRecord::now("SELECT * FROM restaurants"))
            .await
            .unwrap();
        let later = QueryAuditRecord {
            timestamp_utc: Utc::now() + chrono::Duration::seconds(1),
            sql_query: "SELEC oops".to_string(),
        };
        audit.append(later).await.unwrap();
        assert_eq!(audit.count().unwrap(), 2);
    }
}
