use std::path::PathBuf;

use thiserror::Error;

use crate::matching::types::RelocationSummary;

/// Errors that stop a matching or relocation run.
///
/// Per-folder problems are not errors: matching always yields a result
/// and individual move failures are recorded in the relocation summary.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Source root does not exist: {}", .0.display())]
    MissingSourceRoot(PathBuf),

    #[error("Destination root does not exist: {}", .0.display())]
    MissingDestinationRoot(PathBuf),

    #[error("No destination folders to match against")]
    NoDestinations,

    #[error("No source folders found in {}", .0.display())]
    NoSourceFolders(PathBuf),

    #[error("Invalid confidence thresholds: HIGH ({high}) must be greater than MEDIUM ({medium}), both in 1-100")]
    InvalidThresholds { high: u8, medium: u8 },

    /// A source folder disappeared before it could be disabled.
    /// Renames already done in the same batch are listed in `renamed`,
    /// and `summary` holds the outcomes of the tiers relocated before it.
    #[error("Source folder was modified or deleted: {}", path.display())]
    SourceVanished {
        path: PathBuf,
        renamed: Vec<(PathBuf, PathBuf)>,
        summary: Box<RelocationSummary>,
    },

    #[error("Failed to read directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
