//! Restaurant catalog: records, the read-only catalog handle, and the flat
//! query view.
//!
//! The catalog is loaded once by the process entry point and shared as
//! `Arc<Catalog>` with every handler. Nothing mutates it after construction,
//! so concurrent readers need no locking.

pub mod model;
pub mod view;

pub use model::{Cuisine, District, QueryAuditRecord, Reservation, ReservationKey, Restaurant};
pub use view::{CatalogRow, COLUMNS, DISH_SEPARATOR};

use crate::storage::ObjectStore;
use crate::types::Result;
use std::collections::HashMap;

/// Immutable catalog handle with an exact-name index and the flat view.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    restaurants: Vec<Restaurant>,
    by_name: HashMap<String, usize>,
    rows: Vec<CatalogRow>,
}

impl Catalog {
    pub fn new(restaurants: Vec<Restaurant>) -> Self {
        let mut by_name = HashMap::with_capacity(restaurants.len());
        for (idx, restaurant) in restaurants.iter().enumerate() {
            // First occurrence wins on duplicate names.
            by_name.entry(restaurant.name.clone()).or_insert(idx);
        }
        let rows = view::flatten(&restaurants);

        Self {
            restaurants,
            by_name,
            rows,
        }
    }

    /// Parse a catalog document (JSON array of restaurant records).
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let restaurants: Vec<Restaurant> = serde_json::from_slice(bytes)?;
        Ok(Self::new(restaurants))
    }

    /// Fetch and parse the catalog document stored under `key`.
    pub async fn load(store: &dyn ObjectStore, key: &str) -> Result<Self> {
        let bytes = store.get(key).await?;
        let catalog = Self::from_json(&bytes)?;
        tracing::info!(key, restaurants = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, name: &str) -> Option<&Restaurant> {
        self.by_name.get(name).map(|&idx| &self.restaurants[idx])
    }

    pub fn restaurants(&self) -> &[Restaurant] {
        &self.restaurants
    }

    /// Flat rows backing the `restaurants` relation.
    pub fn rows(&self) -> &[CatalogRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.restaurants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.restaurants.is_empty()
    }
}
