//! # Maitre Core - Restaurant Reservation Tools
//!
//! Domain logic behind the tools a conversational reservation assistant calls,
//! plus the synthetic catalog generator that seeds the data they query:
//! - Deterministic restaurant catalog generation (records + descriptions)
//! - Remaining-capacity checks against the reservation ledger
//! - Reservation recording with `(restaurant, guest)` overwrite semantics
//! - Ad-hoc SQL over a flat view of the catalog, with an audit trail
//! - A uniform tool-call envelope in front of the three handlers
//!
//! ## Architecture
//!
//! ```text
//!                     ┌──────────────────────────────────────────┐
//!  tool call JSON  →  │            ToolDispatcher                │
//!                     │  ┌────────────┐ ┌──────────┐ ┌─────────┐ │
//!                     │  │Availability│ │Reservation│ │ Catalog │ │
//!                     │  │ Calculator │ │ Recorder │ │  Query  │ │
//!                     │  └─────┬──────┘ └────┬─────┘ └──┬──────┘ │
//!                     └────────┼─────────────┼──────────┼────────┘
//!                       Arc<Catalog>   ReservationLedger  QueryAuditLog
//! ```
//!
//! The catalog is loaded once by the entry point and passed in as a
//! read-only handle; the ledger and audit log are trait objects.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod catalog;
pub mod envelope;
pub mod generator;
pub mod storage;
pub mod tools;
pub mod types;

// Internal utilities
pub mod observability;

pub use catalog::Catalog;
pub use envelope::{ToolDispatcher, ToolRequest, ToolResponse};
pub use types::{Config, Error, Result};
