//! Error handlers
//!
//! Provides error reporting and errno-style code mapping.

use crate::error::types::{Error, StoreError};
use log::error;

const ENOENT: i32 = 2;
const EIO: i32 = 5;
const EBADF: i32 = 9;
const ENOTDIR: i32 = 20;
const EISDIR: i32 = 21;
const EINVAL: i32 = 22;

/// Log an error once at the point where it stops propagating.
pub fn handle_error(err: &Error) {
    error!("kvfs error: {}", err);
}

/// Convert an error to the closest errno value
pub fn error_to_errno(err: &Error) -> i32 {
    match err {
        Error::ClosedHandle { .. } | Error::NotReadable { .. } | Error::NotWritable { .. } => EBADF,
        Error::NotDirectory { .. } => ENOTDIR,
        Error::IsDirectory { .. } => EISDIR,
        Error::NotFound { .. } => ENOENT,
        Error::InvalidPath(_) | Error::InvalidTruncate { .. } => EINVAL,
        Error::Store(StoreError::Closed) => EBADF,
        Error::ShortWrite { .. }
        | Error::CorruptEntry { .. }
        | Error::Encode { .. }
        | Error::Store(_) => EIO,
        Error::Io(e) => e.raw_os_error().unwrap_or(EIO),
    }
}

/// Process exit status for a failed command (always non-zero, fits in a byte).
pub fn exit_code(err: &Error) -> u8 {
    u8::try_from(error_to_errno(err)).ok().filter(|code| *code != 0).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_handle_errors_to_ebadf() {
        let err = Error::ClosedHandle {
            op: "read",
            path: "a".into(),
        };
        assert_eq!(error_to_errno(&err), EBADF);
        assert_eq!(error_to_errno(&Error::Store(StoreError::Closed)), EBADF);
    }

    #[test]
    fn maps_namespace_errors() {
        let not_dir = Error::NotDirectory {
            op: "chdir",
            path: "a.txt".into(),
        };
        let missing = Error::NotFound {
            op: "stat",
            path: "nope".into(),
        };
        assert_eq!(error_to_errno(&not_dir), ENOTDIR);
        assert_eq!(error_to_errno(&missing), ENOENT);
        assert_eq!(exit_code(&missing), ENOENT as u8);
    }
}
