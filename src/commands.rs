//! Module `commands`
//!
//! Operations behind the `kvfs` subcommands. Each one drives a volume only
//! through its open/read/write/close surface.

use log::info;
use std::fs;
use std::io::{self, BufReader, Read, Write};
use std::path::Path;

use crate::entry::{FileMode, Header};
use crate::error::{Error, Result};
use crate::file::OpenFlags;
use crate::ingest::{IngestOptions, IngestReport, ingest_archive};
use crate::volume::Volume;

/// Load the tar archive at `archive` into the volume.
pub fn ingest(volume: &Volume, archive: &Path, options: &IngestOptions) -> Result<IngestReport> {
    info!("Ingesting {}", archive.display());
    let reader = BufReader::new(fs::File::open(archive)?);
    ingest_archive(volume, reader, options)
}

/// Copy the content of `path` to `out`, returning the byte count.
pub fn cat<W: Write>(volume: &Volume, path: &str, out: &mut W) -> Result<u64> {
    // Opening never fails for a missing path, so check first.
    let header = volume.stat(path)?;
    if header.is_dir() {
        return Err(Error::IsDirectory {
            op: "cat",
            path: header.name,
        });
    }
    let mut file = volume.open(path, OpenFlags::RDONLY, header.mode)?;
    let copied = io::copy(&mut file, out)?;
    file.close()?;
    Ok(copied)
}

/// Replace the content of `path` with everything read from `source`.
pub fn put<R: Read>(volume: &Volume, path: &str, source: &mut R, mode: FileMode) -> Result<u64> {
    let flags = OpenFlags::WRONLY | OpenFlags::CREATE | OpenFlags::TRUNC;
    let mut file = volume.open(path, flags, mode)?;
    let copied = io::copy(source, &mut file)?;
    file.close()?;
    Ok(copied)
}

/// Create a directory entry at `path`. An existing directory is kept.
pub fn mkdir(volume: &Volume, path: &str, perm: u32) -> Result<()> {
    let flags = OpenFlags::WRONLY | OpenFlags::CREATE;
    let mut dir = volume.open(path, flags, FileMode::directory(perm))?;
    if !dir.stat().is_dir() {
        return Err(Error::NotDirectory {
            op: "mkdir",
            path: dir.name().to_string(),
        });
    }
    dir.close()
}

pub fn remove(volume: &Volume, path: &str) -> Result<()> {
    volume.remove(path)
}

/// One `ls -n` style line: mode, owner, size, name.
pub fn format_header(header: &Header) -> String {
    format!(
        "{} {}/{} {:>10} {}",
        header.mode, header.uid, header.gid, header.size, header.name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn put_then_cat() {
        let volume = Volume::with_store(MemoryStore::new());
        let mut source: &[u8] = b"payload";
        let written = put(&volume, "p.bin", &mut source, FileMode::regular(0o600)).unwrap();
        assert_eq!(written, 7);

        let mut out = Vec::<u8>::new();
        assert_eq!(cat(&volume, "p.bin", &mut out).unwrap(), 7);
        assert_eq!(out, b"payload");
    }

    #[test]
    fn put_replaces_content() {
        let volume = Volume::with_store(MemoryStore::new());
        put(&volume, "p", &mut &b"long content"[..], FileMode::regular(0o644)).unwrap();
        put(&volume, "p", &mut &b"short"[..], FileMode::regular(0o644)).unwrap();
        assert_eq!(volume.stat("p").unwrap().size, 5);
    }

    #[test]
    fn mkdir_over_file_fails() {
        let volume = Volume::with_store(MemoryStore::new());
        put(&volume, "f", &mut &b"x"[..], FileMode::regular(0o644)).unwrap();
        assert!(matches!(
            mkdir(&volume, "f", 0o755),
            Err(Error::NotDirectory { op: "mkdir", .. })
        ));

        mkdir(&volume, "d", 0o755).unwrap();
        mkdir(&volume, "d", 0o755).unwrap();
        assert!(volume.stat("d").unwrap().is_dir());
    }

    #[test]
    fn cat_directory_fails() {
        let volume = Volume::with_store(MemoryStore::new());
        mkdir(&volume, "d", 0o755).unwrap();
        assert!(matches!(
            cat(&volume, "d", &mut Vec::<u8>::new()),
            Err(Error::IsDirectory { .. })
        ));
        assert!(matches!(
            cat(&volume, "missing", &mut Vec::<u8>::new()),
            Err(Error::NotFound { .. })
        ));
        assert!(volume.stat("missing").is_err());
    }

    #[test]
    fn formats_headers() {
        let mut header = Header::new("a.txt", FileMode::regular(0o644));
        header.size = 5;
        assert_eq!(format_header(&header), "-rw-r--r-- 0/0          5 a.txt");
    }
}
