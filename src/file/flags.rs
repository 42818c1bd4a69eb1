//! Open flags and the access rights derived from them

use bitflags::bitflags;

bitflags! {
    /// Flags accepted by `Volume::open`, numbered like their POSIX namesakes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct OpenFlags: u32 {
        /// Open for writing only.
        const WRONLY = 0o1;
        /// Open for reading and writing.
        const RDWR = 0o2;
        /// Create the file if missing. Accepted for compatibility: opening a
        /// missing path always yields an empty file.
        const CREATE = 0o100;
        /// Start from an empty buffer even if the path has stored content.
        const TRUNC = 0o1000;
        /// Commit after every write.
        const SYNC = 0o4010000;
    }
}

impl OpenFlags {
    /// Read only (no flags).
    pub const RDONLY: Self = Self::empty();
}

/// Access rights of an open file, fixed when the file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access {
    readable: bool,
    writable: bool,
    sync_on_write: bool,
}

impl Access {
    pub fn from_flags(flags: OpenFlags) -> Self {
        Self {
            readable: !flags.contains(OpenFlags::WRONLY),
            writable: flags.intersects(OpenFlags::WRONLY | OpenFlags::RDWR),
            sync_on_write: flags.contains(OpenFlags::SYNC),
        }
    }

    pub fn readable(&self) -> bool {
        self.readable
    }

    pub fn writable(&self) -> bool {
        self.writable
    }

    pub fn sync_on_write(&self) -> bool {
        self.sync_on_write
    }
}

impl From<OpenFlags> for Access {
    fn from(flags: OpenFlags) -> Self {
        Self::from_flags(flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_only_is_the_default() {
        let access = Access::from_flags(OpenFlags::RDONLY);
        assert!(access.readable());
        assert!(!access.writable());
        assert!(!access.sync_on_write());
        assert_eq!(OpenFlags::default(), OpenFlags::RDONLY);
    }

    #[test]
    fn write_only_is_not_readable() {
        let access = Access::from_flags(OpenFlags::WRONLY | OpenFlags::CREATE);
        assert!(!access.readable());
        assert!(access.writable());
    }

    #[test]
    fn read_write_and_sync() {
        let access = Access::from_flags(OpenFlags::RDWR | OpenFlags::SYNC);
        assert!(access.readable());
        assert!(access.writable());
        assert!(access.sync_on_write());
    }
}
