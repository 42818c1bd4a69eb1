//! File headers
//!
//! Per-file metadata stored in front of the content of every entry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a stored entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Regular,
    Directory,
}

/// Permission bits plus the entry kind.
///
/// On disk (and at the raw `u32` boundary) the kind is the `S_IFDIR` bit;
/// inside the crate it is always a [`FileKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct FileMode {
    kind: FileKind,
    perm: u32,
}

impl FileMode {
    pub const PERM_MASK: u32 = 0o7777;
    pub const DIR_BIT: u32 = 0o040000;

    pub const fn regular(perm: u32) -> Self {
        Self {
            kind: FileKind::Regular,
            perm: perm & Self::PERM_MASK,
        }
    }

    pub const fn directory(perm: u32) -> Self {
        Self {
            kind: FileKind::Directory,
            perm: perm & Self::PERM_MASK,
        }
    }

    /// Build a mode from raw bits; any bits outside the permission mask and
    /// the directory bit are dropped.
    pub const fn from_bits(bits: u32) -> Self {
        if bits & Self::DIR_BIT != 0 {
            Self::directory(bits)
        } else {
            Self::regular(bits)
        }
    }

    pub const fn bits(self) -> u32 {
        match self.kind {
            FileKind::Regular => self.perm,
            FileKind::Directory => self.perm | Self::DIR_BIT,
        }
    }

    pub const fn kind(self) -> FileKind {
        self.kind
    }

    pub const fn perm(self) -> u32 {
        self.perm
    }

    pub const fn is_dir(self) -> bool {
        matches!(self.kind, FileKind::Directory)
    }

    /// Same kind, new permission bits.
    pub const fn with_perm(self, perm: u32) -> Self {
        Self {
            kind: self.kind,
            perm: perm & Self::PERM_MASK,
        }
    }
}

impl From<u32> for FileMode {
    fn from(bits: u32) -> Self {
        Self::from_bits(bits)
    }
}

impl From<FileMode> for u32 {
    fn from(mode: FileMode) -> Self {
        mode.bits()
    }
}

impl fmt::Display for FileMode {
    /// `ls -l` style, e.g. `drwxr-xr-x`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_dir() { 'd' } else { '-' };
        let mut out = String::with_capacity(10);
        out.push(kind);
        for shift in [6, 3, 0] {
            let bits = (self.perm >> shift) & 0o7;
            out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
            out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
            out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
        }
        f.write_str(&out)
    }
}

/// Metadata of a single file or directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Resolved path key the entry is stored under.
    pub name: String,
    pub mode: FileMode,
    pub uid: u32,
    pub gid: u32,
    /// Content length in bytes.
    pub size: u64,
}

impl Header {
    pub fn new(name: impl Into<String>, mode: FileMode) -> Self {
        Self {
            name: name.into(),
            mode,
            uid: 0,
            gid: 0,
            size: 0,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.mode.is_dir()
    }

    pub fn kind(&self) -> FileKind {
        self.mode.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_bit_becomes_kind() {
        let mode = FileMode::from_bits(0o755 | FileMode::DIR_BIT);
        assert_eq!(mode.kind(), FileKind::Directory);
        assert_eq!(mode.perm(), 0o755);
        assert_eq!(mode.bits(), 0o040755);

        let mode = FileMode::from_bits(0o100644);
        assert_eq!(mode.kind(), FileKind::Regular);
        assert_eq!(mode.bits(), 0o644);
    }

    #[test]
    fn with_perm_keeps_kind() {
        let mode = FileMode::directory(0o700).with_perm(0o1777);
        assert!(mode.is_dir());
        assert_eq!(mode.perm(), 0o1777);
    }

    #[test]
    fn display_like_ls() {
        assert_eq!(FileMode::regular(0o644).to_string(), "-rw-r--r--");
        assert_eq!(FileMode::directory(0o755).to_string(), "drwxr-xr-x");
    }
}
