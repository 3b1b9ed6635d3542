//! Chat session runtime.
//!
//! # Module Structure
//!
//! - `session`: Running conversation with timers and submission (`ChatSession`)
//! - `scheduler`: Tokio and immediate scheduler implementations
//! - `factory`: Builds sessions for a variant id (`ChatSessionFactory`)

mod factory;
mod scheduler;
mod session;

pub use factory::ChatSessionFactory;
pub use scheduler::{ImmediateScheduler, TokioScheduler};
pub use session::{ChatSession, StateListener};
