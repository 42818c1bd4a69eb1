//! `std::io` adapters so files work with `io::copy` and friends.

use std::io;

use crate::file::File;

impl io::Read for File {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        File::read(self, buf).map_err(io::Error::from)
    }
}

impl io::Write for File {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        File::write(self, buf).map_err(io::Error::from)
    }

    /// Commits the file, like `sync`.
    fn flush(&mut self) -> io::Result<()> {
        File::sync(self).map_err(io::Error::from)
    }
}
