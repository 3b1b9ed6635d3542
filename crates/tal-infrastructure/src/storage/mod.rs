//! Configuration file storage.

mod brand_storage;
mod secret_storage;

pub use brand_storage::{BrandStorage, BrandStorageError};
pub use secret_storage::{SecretStorage, SecretStorageError, apply_env_fallback};
