//! kvfs: POSIX-like files stored in a single embedded key-value database.
//!
//! A [`Volume`] resolves names and commits entries; a [`File`] buffers one
//! open handle's content until it is synced or closed.

pub mod commands;
pub mod config;
pub mod entry;
pub mod error;
pub mod file;
pub mod ingest;
pub mod store;
pub mod utils;
pub mod volume;

pub use crate::config::VolumeConfig;
pub use entry::{FileKind, FileMode, Header};
pub use error::{CodecError, Error, Result, StoreError};
pub use file::{Access, File, OpenFlags};
pub use store::{MemoryStore, RedbStore, Store};
pub use volume::Volume;
