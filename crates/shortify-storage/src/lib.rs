//! Repository implementations for URL mappings.

pub mod memory;
pub mod mysql;

pub use memory::InMemoryRepository;
pub use mysql::MySqlRepository;
pub use shortify_core::repository::{ReadRepository, Repository, Result};
pub use shortify_core::StorageError;
