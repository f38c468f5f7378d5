//! Storage collaborators: catalog object store, reservation ledger, query
//! audit log.
//!
//! The handlers only see these traits. Each has an in-memory backend and a
//! persistent one (local directory for objects, SQLite for the two tables).
//! None of them offers transactions or conditional writes.

pub mod local;
pub mod memory;
pub mod sqlite;

pub use local::LocalObjectStore;
pub use memory::{MemoryAuditLog, MemoryLedger, MemoryObjectStore};
pub use sqlite::{SqliteAuditLog, SqliteLedger};

use crate::catalog::{QueryAuditRecord, Reservation};
use crate::types::Result;
use async_trait::async_trait;

/// Key/object store holding the catalog document and description artifacts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Read the object stored under `key`. A missing key is a storage error.
    async fn get(&self, key: &str) -> Result<Vec<u8>>;

    /// Create or replace the object stored under `key`.
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<()>;
}

/// Reservation rows keyed by `(restaurant_name, main_guest_name)`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReservationLedger: Send + Sync {
    /// Upsert: replaces any row with the same identity key.
    async fn put(&self, reservation: Reservation) -> Result<()>;

    /// Full scan of every row.
    async fn scan(&self) -> Result<Vec<Reservation>>;
}

/// Append-only log of submitted catalog queries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueryAuditLog: Send + Sync {
    async fn append(&self, record: QueryAuditRecord) -> Result<()>;
}
