//! Infrastructure for the Tal funnel.
//!
//! # Module Structure
//!
//! - `paths`: Configuration directory layout (`~/.config/tal/`)
//! - `storage`: Secret and brand configuration files
//! - `toml_script_repository`: Built-in and TOML-configured dialogue scripts
//! - `supabase_lead_repository`: Hosted lead table over its REST interface
//! - `log_lead_repository`: Log-only lead persistence for unconfigured deployments

pub mod log_lead_repository;
pub mod paths;
pub mod storage;
pub mod supabase_lead_repository;
pub mod toml_script_repository;

pub use crate::log_lead_repository::LogLeadRepository;
pub use crate::paths::{PathError, TalPaths};
pub use crate::storage::{BrandStorage, BrandStorageError, SecretStorage, SecretStorageError};
pub use crate::supabase_lead_repository::SupabaseLeadRepository;
pub use crate::toml_script_repository::TomlScriptRepository;
