//! Archive ingestion
//!
//! Copies every member of a tar archive into a volume through the regular
//! open/write/close surface.

use log::{debug, info, warn};
use std::io::{self, Read};

use crate::entry::FileMode;
use crate::error::Result;
use crate::file::OpenFlags;
use crate::ingest::results::{IngestOptions, IngestReport};
use crate::volume::Volume;

/// Ingest all members of the tar stream `reader` into `volume`.
///
/// Regular members become files with the member's content, mode and owner;
/// directory members become directory entries. Other member types (links,
/// devices, fifos) are skipped and listed in the report.
pub fn ingest_archive<R: Read>(
    volume: &Volume,
    reader: R,
    options: &IngestOptions,
) -> Result<IngestReport> {
    let mut archive = tar::Archive::new(reader);
    let mut report = IngestReport::default();

    let mut flags = OpenFlags::WRONLY | OpenFlags::CREATE | OpenFlags::TRUNC;
    if options.sync_on_write {
        flags |= OpenFlags::SYNC;
    }

    for member in archive.entries()? {
        let mut member = member?;
        let raw_name = member.path()?.to_string_lossy().into_owned();
        let Some(name) = member_key(&raw_name) else {
            debug!("Skipping archive root member {:?}", raw_name);
            continue;
        };

        let header = member.header();
        let entry_type = header.entry_type();
        let perm = header.mode()? & FileMode::PERM_MASK;
        let uid = owner_id(header.uid()?, &name)?;
        let gid = owner_id(header.gid()?, &name)?;

        if entry_type.is_dir() {
            let mut dir = volume.open(&name, flags, FileMode::directory(perm))?;
            dir.chmod(perm)?;
            dir.chown(uid, gid)?;
            dir.close()?;
            report.directories += 1;
        } else if entry_type.is_file() {
            let mut file = volume.open(&name, flags, FileMode::regular(perm))?;
            file.chmod(perm)?;
            file.chown(uid, gid)?;
            let copied = io::copy(&mut member, &mut file)?;
            file.close()?;
            report.files += 1;
            report.bytes += copied;
        } else {
            warn!("Skipping {} (unsupported member type {:?})", name, entry_type);
            report.skipped.push(name);
        }
    }

    info!(
        "Ingested {} files and {} directories ({} bytes, {} skipped)",
        report.files,
        report.directories,
        report.bytes,
        report.skipped.len()
    );
    Ok(report)
}

/// Store key for an archive member path: leading `./` and trailing `/` are
/// dropped, and the archive root itself has no key.
fn member_key(path: &str) -> Option<String> {
    let mut key = path;
    while let Some(rest) = key.strip_prefix("./") {
        key = rest;
    }
    let key = key.trim_end_matches('/');
    if key.is_empty() || key == "." {
        None
    } else {
        Some(key.to_string())
    }
}

fn owner_id(id: u64, name: &str) -> io::Result<u32> {
    u32::try_from(id).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{}: owner id {} out of range", name, id),
        )
    })
}
