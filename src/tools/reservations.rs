//! Reservation recorder.
//!
//! Writes unconditionally. Existence of the restaurant, the sign of
//! `number_of_persons` and remaining capacity are all left to the caller,
//! which checks availability in a separate, earlier tool call.

use crate::catalog::Reservation;
use crate::storage::ReservationLedger;
use crate::types::Result;
use std::fmt;
use std::sync::Arc;

/// Fixed acknowledgement returned after every successful write.
pub const RESERVATION_CONFIRMATION: &str = "Reservation was made successfully";

/// Handler behind `make_restaurant_reservation`.
#[derive(Clone)]
pub struct ReservationRecorder {
    ledger: Arc<dyn ReservationLedger>,
}

impl fmt::Debug for ReservationRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReservationRecorder").finish_non_exhaustive()
    }
}

impl ReservationRecorder {
    pub fn new(ledger: Arc<dyn ReservationLedger>) -> Self {
        Self { ledger }
    }

    /// Upsert the `(restaurant_name, main_guest_name)` row.
    pub async fn make_reservation(
        &self,
        restaurant_name: &str,
        main_guest_name: &str,
        number_of_persons: i64,
    ) -> Result<&'static str> {
        let reservation = Reservation::new(restaurant_name, main_guest_name, number_of_persons);
        self.ledger.put(reservation).await?;

        tracing::info!(
            restaurant = restaurant_name,
            guest = main_guest_name,
            persons = number_of_persons,
            "reservation recorded"
        );
        Ok(RESERVATION_CONFIRMATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryLedger, MockReservationLedger};
    use crate::types::Error;

    #[tokio::test]
    async fn test_same_guest_overwrites() {
        let ledger = Arc::new(MemoryLedger::new());
        let recorder = ReservationRecorder::new(ledger.clone());

        recorder.make_reservation("Kyoto", "Ana", 2).await.unwrap();
        recorder.make_reservation("Kyoto", "Ana", 5).await.unwrap();

        let rows = ledger.scan().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].number_of_persons, 5);
    }

    #[tokio::test]
    async fn test_no_validation_on_write() {
        let ledger = Arc::new(MemoryLedger::new());
        let recorder = ReservationRecorder::new(ledger.clone());

        let ack = recorder.make_reservation("Nowhere", "Ana", -3).await.unwrap();
        assert_eq!(ack, RESERVATION_CONFIRMATION);
        assert_eq!(ledger.len().await, 1);
    }

    #[tokio::test]
    async fn test_write_failure_surfaces() {
        let mut ledger = MockReservationLedger::new();
        ledger
            .expect_put()
            .returning(|_| Err(Error::storage("throttled")));
        let recorder = ReservationRecorder::new(Arc::new(ledger));

        let err = recorder.make_reservation("Kyoto", "Ana", 2).await.unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }
}
