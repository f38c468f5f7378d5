//! Tool handlers for availability, reservations and catalog queries, plus the
//! tool catalog describing them to the orchestrator.

pub mod availability;
pub mod catalog;
pub mod query;
pub mod reservations;

pub use availability::{Availability, AvailabilityCalculator};
pub use catalog::{ParamDef, ParamType, ToolArguments, ToolCatalog, ToolEntry};
pub use query::{CatalogQueryEngine, QueryOutcome, MAX_RESULTS, MULTIPLE_STATEMENTS, TABLE_NAME};
pub use reservations::{ReservationRecorder, RESERVATION_CONFIRMATION};

pub const ACTION_GROUP_AVAILABILITY: &str = "CheckRestaurantAvailability";
pub const ACTION_GROUP_FIND: &str = "FindRestaurants";
pub const ACTION_GROUP_RESERVATION: &str = "MakeRestaurantReservation";

pub const FN_CHECK_AVAILABILITY: &str = "check_restaurant_availability";
pub const FN_FIND_RESTAURANTS: &str = "find_restaurants";
pub const FN_MAKE_RESERVATION: &str = "make_restaurant_reservation";
