//! Error handling
//!
//! Defines error types and handling for volumes and files.

pub mod handlers;
pub mod types;

pub use types::*;
