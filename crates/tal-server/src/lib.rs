//! Tal lead-intake REST server.
//!
//! # Module Structure
//!
//! - `state`: Shared collaborators and their bootstrap from configuration
//! - `router`: Route table and middleware
//! - `handlers`: One module per endpoint group
//! - `error`: Mapping of domain errors to HTTP responses

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
