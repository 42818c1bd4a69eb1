use kvfs::ingest::{IngestOptions, ingest_archive};
use kvfs::{FileMode, OpenFlags, Volume};
use std::io::Read;
use tempfile::tempdir;

fn member(kind: tar::EntryType, mode: u32, size: usize) -> tar::Header {
    let mut header = tar::Header::new_gnu();
    header.set_entry_type(kind);
    header.set_mode(mode);
    header.set_uid(1000);
    header.set_gid(100);
    header.set_size(size as u64);
    header
}

fn build_archive() -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());

    let mut dir = member(tar::EntryType::Directory, 0o755, 0);
    builder
        .append_data(&mut dir, "./docs/", std::io::empty())
        .unwrap();

    let readme = b"read me first\n";
    let mut file = member(tar::EntryType::Regular, 0o640, readme.len());
    builder
        .append_data(&mut file, "docs/readme.txt", &readme[..])
        .unwrap();

    let mut empty = member(tar::EntryType::Regular, 0o600, 0);
    builder
        .append_data(&mut empty, "empty", std::io::empty())
        .unwrap();

    let mut link = member(tar::EntryType::Symlink, 0o777, 0);
    builder
        .append_link(&mut link, "docs/latest", "readme.txt")
        .unwrap();

    builder.into_inner().unwrap()
}

#[test]
fn test_ingest_tar_archive() {
    let dir = tempdir().unwrap();
    let volume = Volume::open_path(dir.path().join("archive.db")).unwrap();

    let archive = build_archive();
    let report = ingest_archive(&volume, &archive[..], &IngestOptions::default()).unwrap();

    assert_eq!(report.files, 2);
    assert_eq!(report.directories, 1);
    assert_eq!(report.bytes, 14);
    assert_eq!(report.skipped, vec!["docs/latest".to_string()]);

    let docs = volume.stat("docs").unwrap();
    assert!(docs.is_dir());
    assert_eq!(docs.mode.perm(), 0o755);

    let readme = volume.stat("docs/readme.txt").unwrap();
    assert_eq!(readme.mode, FileMode::regular(0o640));
    assert_eq!((readme.uid, readme.gid, readme.size), (1000, 100, 14));
    assert_eq!(volume.stat("empty").unwrap().size, 0);

    volume.chdir("docs").unwrap();
    let mut file = volume
        .open("readme.txt", OpenFlags::RDONLY, FileMode::regular(0))
        .unwrap();
    let mut content = String::new();
    file.read_to_string(&mut content).unwrap();
    assert_eq!(content, "read me first\n");
}

#[test]
fn test_ingest_twice_replaces_content() {
    let dir = tempdir().unwrap();
    let volume = Volume::open_path(dir.path().join("archive.db")).unwrap();
    let options = IngestOptions {
        sync_on_write: true,
    };

    let archive = build_archive();
    ingest_archive(&volume, &archive[..], &options).unwrap();
    let report = ingest_archive(&volume, &archive[..], &options).unwrap();

    assert_eq!(report.files, 2);
    assert_eq!(volume.stat("docs/readme.txt").unwrap().size, 14);
}
