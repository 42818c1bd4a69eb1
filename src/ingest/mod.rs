//! Ingest module
//!
//! Loads tar archives into a volume, one entry per archive member.

mod operations;
mod results;

pub use operations::ingest_archive;
pub use results::{IngestOptions, IngestReport};
