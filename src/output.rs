//! Action output emission.
//!
//! Outputs are `name=value` lines appended to the runner's output file, or
//! printed to stdout when no output file is configured.

use crate::error::{ReleaseError, Result};
use std::io::Write;
use std::path::PathBuf;

/// Output name carrying the release identifier
pub const RELEASE_ID: &str = "release-id";

/// Destination for action outputs
#[derive(Debug, Clone, Default)]
pub struct ActionOutput {
    path: Option<PathBuf>,
}

impl ActionOutput {
    /// Write to `path`, or stdout when `None`
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Emit one output
    pub fn set(&self, name: &str, value: &str) -> Result<()> {
        let line = format!("{name}={value}\n");
        match &self.path {
            Some(path) => std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .and_then(|mut file| file.write_all(line.as_bytes()))
                .map_err(|source| ReleaseError::Output {
                    path: path.clone(),
                    source,
                }),
            None => {
                print!("{line}");
                Ok(())
            }
        }
    }
}
