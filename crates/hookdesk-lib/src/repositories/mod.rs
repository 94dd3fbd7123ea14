// Repository Layer
// Provides data access abstractions for SQLite database

pub mod storage_repo;

pub use storage_repo::{StorageRepository, LOCAL_NAMESPACE, SESSION_NAMESPACE};
