//! Error types
//!
//! Defines the error kinds reported by the store, the entry codec, and the
//! volume/file surface.

use std::io;
use thiserror::Error;

/// Failures surfaced by the key-value store boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] redb::DatabaseError),
    #[error("transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),
    #[error("table error: {0}")]
    Table(#[from] redb::TableError),
    #[error("storage error: {0}")]
    Storage(#[from] redb::StorageError),
    #[error("commit error: {0}")]
    Commit(#[from] redb::CommitError),
    #[error("volume is closed")]
    Closed,
    #[error("store lock poisoned")]
    Poisoned,
}

/// Failures of the entry codec.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("entry is empty")]
    Empty,
    #[error("unsupported entry version {0}")]
    UnsupportedVersion(u8),
    #[error("malformed header: {0}")]
    Header(#[from] rmp_serde::decode::Error),
    #[error("header encoding failed: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
    #[error("header declares {expected} content bytes, found {actual}")]
    SizeMismatch { expected: u64, actual: u64 },
    #[error("directory entry carries {0} content bytes")]
    DirectoryContent(usize),
}

/// Errors reported by volumes and open files.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{op} {path}: file already closed")]
    ClosedHandle { op: &'static str, path: String },
    #[error("{op} {path}: file not opened for reading")]
    NotReadable { op: &'static str, path: String },
    #[error("{op} {path}: file not opened for writing")]
    NotWritable { op: &'static str, path: String },
    #[error("{op} {path}: not a directory")]
    NotDirectory { op: &'static str, path: String },
    #[error("{op} {path}: is a directory")]
    IsDirectory { op: &'static str, path: String },
    #[error("{op} {path}: no such file or directory")]
    NotFound { op: &'static str, path: String },
    #[error("invalid path: {0:?}")]
    InvalidPath(String),
    #[error("write {path}: short write ({written} of {expected} bytes)")]
    ShortWrite {
        path: String,
        written: usize,
        expected: usize,
    },
    #[error("truncate {path}: cannot grow from {len} to {size} bytes")]
    InvalidTruncate { path: String, size: u64, len: u64 },
    #[error("corrupt entry {path}: {source}")]
    CorruptEntry {
        path: String,
        #[source]
        source: CodecError,
    },
    #[error("encode entry {path}: {source}")]
    Encode {
        path: String,
        #[source]
        source: CodecError,
    },
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Returns true when the error comes from a volume that has been closed.
    pub fn is_volume_closed(&self) -> bool {
        matches!(self, Error::Store(StoreError::Closed))
    }
}

impl From<Error> for io::Error {
    fn from(error: Error) -> Self {
        let kind = match &error {
            Error::Io(e) => e.kind(),
            Error::NotFound { .. } => io::ErrorKind::NotFound,
            Error::NotDirectory { .. } => io::ErrorKind::NotADirectory,
            Error::IsDirectory { .. } => io::ErrorKind::IsADirectory,
            Error::ClosedHandle { .. } | Error::NotReadable { .. } | Error::NotWritable { .. } => {
                io::ErrorKind::PermissionDenied
            }
            Error::ShortWrite { .. } => io::ErrorKind::WriteZero,
            Error::InvalidPath(_) | Error::InvalidTruncate { .. } => io::ErrorKind::InvalidInput,
            Error::CorruptEntry { .. } | Error::Encode { .. } => io::ErrorKind::InvalidData,
            Error::Store(_) => io::ErrorKind::Other,
        };
        match error {
            Error::Io(e) => e,
            other => io::Error::new(kind, other),
        }
    }
}
