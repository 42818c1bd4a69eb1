//! Ingest option and result types

/// Options for an ingestion run
#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    /// Open every file with `OpenFlags::SYNC`
    pub sync_on_write: bool,
}

/// Summary of an ingestion run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub files: usize,
    pub directories: usize,
    pub bytes: u64,
    /// Members that were not stored (links, devices, ...)
    pub skipped: Vec<String>,
}
