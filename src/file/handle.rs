//! Module `handle`
//!
//! Defines the `File` struct: an open handle with a working header, an
//! in-memory content buffer, and access rights fixed at open time.
//!
//! Nothing a file does is durable until `sync` or `close` (or every `write`
//! when opened with `OpenFlags::SYNC`) commits it through the volume.

use log::{debug, warn};
use std::fmt;

use crate::entry::Header;
use crate::error::{Error, Result};
use crate::file::Access;
use crate::volume::Volume;

pub struct File {
    volume: Volume,
    header: Header,
    buffer: Vec<u8>,
    cursor: usize,
    access: Access,
    closed: bool,
}

impl File {
    pub(crate) fn new(volume: Volume, header: Header, buffer: Vec<u8>, access: Access) -> Self {
        Self {
            volume,
            header,
            buffer,
            cursor: 0,
            access,
            closed: false,
        }
    }

    /// Resolved path key of the file. Never changes after open.
    pub fn name(&self) -> &str {
        &self.header.name
    }

    pub fn access(&self) -> Access {
        self.access
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Read up to `buf.len()` bytes from the buffer. Returns `Ok(0)` once the
    /// buffer is drained.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.check_open("read")?;
        if !self.access.readable() {
            return Err(Error::NotReadable {
                op: "read",
                path: self.header.name.clone(),
            });
        }
        self.volume.ensure_open()?;

        let remaining = &self.buffer[self.cursor..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.cursor += n;
        Ok(n)
    }

    /// Append `buf` to the buffer.
    ///
    /// With `OpenFlags::SYNC` the file is committed after the append and a
    /// commit failure is returned from this call.
    pub fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.check_writable("write")?;
        if self.header.is_dir() && !buf.is_empty() {
            return Err(Error::IsDirectory {
                op: "write",
                path: self.header.name.clone(),
            });
        }
        self.volume.ensure_open()?;

        let written = match self.buffer.try_reserve(buf.len()) {
            Ok(()) => {
                self.buffer.extend_from_slice(buf);
                buf.len()
            }
            Err(e) => {
                warn!("write {}: cannot grow buffer: {}", self.header.name, e);
                0
            }
        };
        self.header.size += written as u64;

        if written != buf.len() {
            return Err(Error::ShortWrite {
                path: self.header.name.clone(),
                written,
                expected: buf.len(),
            });
        }

        if self.access.sync_on_write() {
            self.commit()?;
        }
        Ok(written)
    }

    pub fn write_str(&mut self, s: &str) -> Result<usize> {
        self.write(s.as_bytes())
    }

    /// Shrink the buffer to `size` bytes. Growing is not supported.
    pub fn truncate(&mut self, size: u64) -> Result<()> {
        self.check_writable("truncate")?;
        self.volume.ensure_open()?;

        let len = self.buffer.len() as u64;
        if size > len {
            return Err(Error::InvalidTruncate {
                path: self.header.name.clone(),
                size,
                len,
            });
        }

        // size <= len, so it fits in usize
        let size_usize = size as usize;
        self.buffer.truncate(size_usize);
        self.cursor = self.cursor.min(size_usize);
        self.header.size = size;
        Ok(())
    }

    /// Replace the permission bits; the file kind is kept.
    pub fn chmod(&mut self, perm: u32) -> Result<()> {
        self.check_open("chmod")?;
        self.volume.ensure_open()?;
        self.header.mode = self.header.mode.with_perm(perm);
        Ok(())
    }

    pub fn chown(&mut self, uid: u32, gid: u32) -> Result<()> {
        self.check_open("chown")?;
        self.volume.ensure_open()?;
        self.header.uid = uid;
        self.header.gid = gid;
        Ok(())
    }

    /// Snapshot of the working header, including uncommitted changes.
    pub fn stat(&self) -> Header {
        self.header.clone()
    }

    /// Commit the header and buffer to the store.
    pub fn sync(&mut self) -> Result<()> {
        self.check_open("sync")?;
        self.commit()
    }

    /// Mark the file closed, then commit it one last time.
    ///
    /// The file is closed even if the final commit fails; the failure is
    /// returned once and the buffered data is not retried.
    pub fn close(&mut self) -> Result<()> {
        self.check_open("close")?;
        self.closed = true;
        debug!("Closing {}", self.header.name);
        self.commit()
    }

    /// Make this file, which must be a directory, the volume's current
    /// directory.
    pub fn chdir(&self) -> Result<()> {
        if !self.header.is_dir() {
            return Err(Error::NotDirectory {
                op: "chdir",
                path: self.header.name.clone(),
            });
        }
        self.volume.chdir_key(self.header.name.clone())
    }

    fn commit(&mut self) -> Result<()> {
        self.volume.write_file(&mut self.header, &self.buffer)
    }

    fn check_open(&self, op: &'static str) -> Result<()> {
        if self.closed {
            return Err(Error::ClosedHandle {
                op,
                path: self.header.name.clone(),
            });
        }
        Ok(())
    }

    fn check_writable(&self, op: &'static str) -> Result<()> {
        self.check_open(op)?;
        if !self.access.writable() {
            return Err(Error::NotWritable {
                op,
                path: self.header.name.clone(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("File")
            .field("name", &self.header.name)
            .field("size", &self.header.size)
            .field("cursor", &self.cursor)
            .field("access", &self.access)
            .field("closed", &self.closed)
            .finish()
    }
}
