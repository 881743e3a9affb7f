// src/files/mod.rs
//! Filesystem collaborators used by the rekey pipeline
//!
//! Everything that touches the directory tree (other than reading and writing
//! individual key files) goes through the small traits defined here so the
//! orchestrator can be driven by fakes in tests.

mod archive;
mod filter;
mod helper;

pub use archive::{archive_root_name, FileArchiver, TarGzArchiver};
pub use filter::{FileFilter, KeyFileFilter};
pub use helper::{FilesHelper, LocalFiles};
