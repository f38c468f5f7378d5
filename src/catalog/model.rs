//! Restaurant, reservation and audit records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Enumerations
// =============================================================================

/// City district a restaurant is located in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum District {
    #[serde(rename = "North District")]
    North,
    #[serde(rename = "East District")]
    East,
    #[serde(rename = "South District")]
    South,
    #[serde(rename = "West District")]
    West,
}

impl District {
    pub const ALL: [District; 4] = [
        District::North,
        District::East,
        District::South,
        District::West,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            District::North => "North District",
            District::East => "East District",
            District::South => "South District",
            District::West => "West District",
        }
    }
}

impl fmt::Display for District {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cuisine served by a restaurant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cuisine {
    Italian,
    Greek,
    Mexican,
    Japanese,
    Indian,
}

impl Cuisine {
    pub const ALL: [Cuisine; 5] = [
        Cuisine::Italian,
        Cuisine::Greek,
        Cuisine::Mexican,
        Cuisine::Japanese,
        Cuisine::Indian,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Cuisine::Italian => "italian",
            Cuisine::Greek => "greek",
            Cuisine::Mexican => "mexican",
            Cuisine::Japanese => "japanese",
            Cuisine::Indian => "indian",
        }
    }
}

impl fmt::Display for Cuisine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Restaurant
// =============================================================================

/// One catalog record. Immutable once generated.
///
/// Field names on the wire are the catalog document's column names, which are
/// also the columns of the queryable `restaurants` relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    #[serde(rename = "district_name")]
    pub district: District,
    #[serde(rename = "restaurant_name")]
    pub name: String,
    #[serde(rename = "restaurant_cuisine")]
    pub cuisine: Cuisine,
    pub signature_dish: String,
    /// Served dishes, excluding the signature dish.
    pub dishes: Vec<String>,
    pub average_price_per_person: i64,
    pub rating_food_stars: u8,
    pub rating_service_stars: u8,
    pub capacity_persons: i64,
}

impl Restaurant {
    /// Signature dish followed by the served dishes.
    pub fn all_dishes(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.signature_dish.as_str()).chain(self.dishes.iter().map(String::as_str))
    }
}

// =============================================================================
// Reservation
// =============================================================================

/// Identity of a ledger row. A second reservation with the same key replaces
/// the first one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReservationKey {
    pub restaurant_name: String,
    pub main_guest_name: String,
}

/// One reservation ledger row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub restaurant_name: String,
    pub main_guest_name: String,
    pub number_of_persons: i64,
    pub timestamp_utc: DateTime<Utc>,
}

impl Reservation {
    pub fn new(
        restaurant_name: impl Into<String>,
        main_guest_name: impl Into<String>,
        number_of_persons: i64,
    ) -> Self {
        Self {
            restaurant_name: restaurant_name.into(),
            main_guest_name: main_guest_name.into(),
            number_of_persons,
            timestamp_utc: Utc::now(),
        }
    }

    pub fn key(&self) -> ReservationKey {
        ReservationKey {
            restaurant_name: self.restaurant_name.clone(),
            main_guest_name: self.main_guest_name.clone(),
        }
    }
}

// =============================================================================
// Query audit
// =============================================================================

/// Write-only trail of submitted catalog queries, keyed by timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryAuditRecord {
    pub timestamp_utc: DateTime<Utc>,
    pub sql_query: String,
}

impl QueryAuditRecord {
    pub fn now(sql_query: impl Into<String>) -> Self {
        Self {
            timestamp_utc: Utc::now(),
            sql_query: sql_query.into(),
        }
    }
}
