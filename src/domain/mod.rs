//! Domain layer for the UpliftXP progression engine
//!
//! Models, errors and the ports adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
