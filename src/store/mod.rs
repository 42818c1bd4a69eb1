//! Key-value store boundary
//!
//! Volumes keep one entry per path key. Any store that can get, put and
//! delete byte values atomically per key can back a volume.

pub mod disk;
pub mod memory;

pub use disk::RedbStore;
pub use memory::MemoryStore;

use crate::error::StoreError;

/// Capability consumed by a volume. Every call is atomic on its own.
pub trait Store: Send + Sync {
    /// Fetch the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Insert or replace the value stored under `key`.
    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Remove `key`, returning whether it was present.
    fn delete(&self, key: &str) -> Result<bool, StoreError>;
}
