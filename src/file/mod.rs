//! Open files
//!
//! Handles returned by `Volume::open`, the open flags, and the access rights
//! derived from them.

pub mod flags;
pub mod handle;
mod io;

pub use flags::{Access, OpenFlags};
pub use handle::File;
