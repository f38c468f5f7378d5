//! Availability calculator: remaining seats of one restaurant.
//!
//! Reads the catalog capacity and sums every ledger row for the restaurant.
//! The result is advisory: nothing ties it to a later reservation write.

use crate::catalog::Catalog;
use crate::storage::ReservationLedger;
use crate::types::{Error, Result};
use std::fmt;
use std::sync::Arc;

/// Capacity snapshot for one restaurant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Availability {
    pub capacity_persons: i64,
    pub reserved_persons: i64,
    /// May be negative when the ledger holds more than the capacity.
    pub remaining_persons: i64,
}

impl Availability {
    /// Build from the catalog capacity and the exact ledger total.
    ///
    /// Reported counts clamp to the `i64` range. Clamping keeps the sign of
    /// the remaining count, so the fully-booked decision is always exact.
    pub fn new(capacity_persons: i64, reserved_persons: i128) -> Self {
        let remaining = i128::from(capacity_persons) - reserved_persons;
        Self {
            capacity_persons,
            reserved_persons: clamp_to_i64(reserved_persons),
            remaining_persons: clamp_to_i64(remaining),
        }
    }

    pub fn is_fully_booked(&self) -> bool {
        self.remaining_persons <= 0
    }
}

fn clamp_to_i64(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_fully_booked() {
            write!(
                f,
                "The restaurant is fully booked. Remaining capacity is {} persons.",
                self.remaining_persons
            )
        } else {
            write!(f, "There is availability for {} persons.", self.remaining_persons)
        }
    }
}

/// Handler behind `check_restaurant_availability`.
#[derive(Clone)]
pub struct AvailabilityCalculator {
    catalog: Arc<Catalog>,
    ledger: Arc<dyn ReservationLedger>,
}

impl fmt::Debug for AvailabilityCalculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvailabilityCalculator")
            .field("restaurants", &self.catalog.len())
            .finish_non_exhaustive()
    }
}

impl AvailabilityCalculator {
    pub fn new(catalog: Arc<Catalog>, ledger: Arc<dyn ReservationLedger>) -> Self {
        Self { catalog, ledger }
    }

    /// Remaining capacity of `restaurant_name` (exact, case-sensitive).
    ///
    /// An unknown restaurant is a `NotFound` error; there is no fuzzy match.
    pub async fn remaining_capacity(&self, restaurant_name: &str) -> Result<Availability> {
        let restaurant = self
            .catalog
            .get(restaurant_name)
            .ok_or_else(|| Error::not_found(format!("Unknown restaurant: {}", restaurant_name)))?;

        // Party sizes are recorded unchecked; widen so no total can overflow.
        let reserved: i128 = self
            .ledger
            .scan()
            .await?
            .iter()
            .filter(|r| r.restaurant_name == restaurant_name)
            .map(|r| i128::from(r.number_of_persons))
            .sum();

        let availability = Availability::new(restaurant.capacity_persons, reserved);
        tracing::debug!(
            restaurant = restaurant_name,
            capacity = availability.capacity_persons,
            reserved = availability.reserved_persons,
            remaining = availability.remaining_persons,
            "availability computed"
        );
        Ok(availability)
    }
}
