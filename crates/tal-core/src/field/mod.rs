//! Collected field domain module.
//!
//! # Module Structure
//!
//! - `model`: Logical field names (`FieldName`)
//! - `collector`: Incrementally populated field buffer (`FieldCollector`, `FieldSnapshot`)

mod collector;
mod model;

// Re-export public API
pub use collector::{FieldCollector, FieldSnapshot};
pub use model::FieldName;
