//! In-memory backends.

use super::{ObjectStore, QueryAuditLog, ReservationLedger};
use crate::catalog::{QueryAuditRecord, Reservation, ReservationKey};
use crate::types::{Error, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

/// Object store backed by a map.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored keys, sorted.
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        self.objects
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| Error::storage(format!("object not found: {}", key)))
    }

    async fn put(&self, key: &str, body: Vec<u8>) -> Result<()> {
        self.objects.write().await.insert(key.to_string(), body);
        Ok(())
    }
}

/// Ledger backed by an ordered map on the identity key.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    rows: RwLock<BTreeMap<ReservationKey, Reservation>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl ReservationLedger for MemoryLedger {
    async fn put(&self, reservation: Reservation) -> Result<()> {
        self.rows.write().await.insert(reservation.key(), reservation);
        Ok(())
    }

    async fn scan(&self) -> Result<Vec<Reservation>> {
        Ok(self.rows.read().await.values().cloned().collect())
    }
}

/// Audit log backed by a vector, readable for inspection.
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    records: RwLock<Vec<QueryAuditRecord>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn records(&self) -> Vec<QueryAuditRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl QueryAuditLog for MemoryAuditLog {
    async fn append(&self, record: QueryAuditRecord) -> Result<()> {
        self.records.write().await.push(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ledger_overwrites_same_key() {
        let ledger = MemoryLedger::new();
        ledger.put(Reservation::new("Osaka", "Mia", 2)).await.unwrap();
        ledger.put(Reservation::new("Osaka", "Mia", 6)).await.unwrap();
        ledger.put(Reservation::new("Osaka", "Leo", 1)).await.unwrap();

        let rows = ledger.scan().await.unwrap();
        assert_eq!(rows.len(), 2);
        let mia = rows.iter().find(|r| r.main_guest_name == "Mia").unwrap();
        assert_eq!(mia.number_of_persons, 6);
    }

    #[tokio::test]
    async fn test_object_store_replaces() {
        let store = MemoryObjectStore::new();
        store.put("a", b"one".to_vec()).await.unwrap();
        store.put("a", b"two".to_vec()).await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), b"two".to_vec());
        assert!(store.get("b").await.is_err());
        assert_eq!(store.keys().await, vec!["a".to_string()]);
    }
}
