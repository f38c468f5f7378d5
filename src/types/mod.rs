//! Core types shared across the crate.
//!
//! - **IDs**: Strongly-typed identifiers (InvocationId)
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Storage, query, generator and observability configuration

mod config;
mod errors;
mod ids;

pub use config::{Config, GeneratorConfig, ObservabilityConfig, QueryConfig, StorageConfig};
pub use errors::{Error, Result};
pub use ids::InvocationId;
