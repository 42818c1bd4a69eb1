//! Volumes
//!
//! The namespace over a key-value store: path resolution, the current
//! directory context, and the commit path for open files.

mod core;
pub mod path;

pub use self::core::Volume;
