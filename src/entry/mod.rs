//! Stored entries
//!
//! A header plus content, and the codec that turns the pair into one value.

pub mod codec;
pub mod header;

pub use codec::{decode, encode};
pub use header::{FileKind, FileMode, Header};
