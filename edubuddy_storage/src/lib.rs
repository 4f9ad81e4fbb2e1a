#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Local persistence for the EduBuddy client.
//!
//! Both stores implement [`edubuddy_core::KeyValueStore`]:
//! - [`JsonFileStore`] keeps every key in one JSON object on disk
//! - [`MemoryStore`] keeps them in memory, for tests and throwaway sessions

use std::path::PathBuf;

use thiserror::Error;

mod file;
mod memory;
pub mod theme;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use theme::{Theme, ThemeSettings};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode storage file: {0}")]
    Encode(#[from] serde_json::Error),
}
