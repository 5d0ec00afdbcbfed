use std::fmt;
use std::path::{Path, PathBuf};

use colored::{ColoredString, Colorize};
use serde::Serialize;

/// Destination name reported when no tier produced a candidate.
pub const NOT_FOUND: &str = "Not Found";

/// A candidate folder waiting to be matched, usually an extracted mod archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFolder {
    pub path: PathBuf,
    pub name: String,
}

/// A raw name together with its normalized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedName {
    pub original: String,
    pub normalized: String,
}

/// Which matching tier produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MatchReason {
    /// Source folder name contains or is contained in the destination name.
    DirectName,
    /// A sub-folder or file inside the source folder named the destination.
    Content,
    /// Best edit-distance similarity over name crops.
    Fuzzy,
    NoMatch,
}

/// Confidence bucket derived from the numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    High,
    Medium,
    Low,
}

/// Final result for a single source folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    source_path: PathBuf,
    destination_name: String,
    confidence: u8,
    reason: MatchReason,
    category: Category,
}

/// Result of resolving a single source folder before categorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderMatch {
    pub destination: Option<String>,
    pub confidence: u8,
    pub reason: MatchReason,
}

/// Outcome of moving a single folder into its destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MoveOutcome {
    Moved,
    /// Target path already existed, nothing was overwritten.
    Duplicate,
    Failed(String),
}

/// Aggregated outcome of a relocation batch.
///
/// Entries are `(from, to)` pairs in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RelocationSummary {
    pub moved: Vec<(PathBuf, PathBuf)>,
    pub failed: Vec<(PathBuf, PathBuf)>,
    pub duplicates: Vec<(PathBuf, PathBuf)>,
    /// Set when the batch was stopped by a cancellation request.
    pub cancelled: bool,
}

impl Category {
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    /// Coloured label for terminal output.
    #[must_use]
    pub fn colored_label(self) -> ColoredString {
        match self {
            Self::High => "HIGH".green().bold(),
            Self::Medium => "MEDIUM".yellow().bold(),
            Self::Low => "LOW".red().bold(),
        }
    }
}

impl MatchResult {
    #[must_use]
    pub const fn new(
        source_path: PathBuf,
        destination_name: String,
        confidence: u8,
        reason: MatchReason,
        category: Category,
    ) -> Self {
        Self {
            source_path,
            destination_name,
            confidence,
            reason,
            category,
        }
    }

    #[must_use]
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    #[must_use]
    pub fn destination_name(&self) -> &str {
        &self.destination_name
    }

    #[must_use]
    pub const fn confidence(&self) -> u8 {
        self.confidence
    }

    #[must_use]
    pub const fn reason(&self) -> MatchReason {
        self.reason
    }

    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// True if some destination was found.
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.reason != MatchReason::NoMatch
    }
}

impl FolderMatch {
    #[must_use]
    pub const fn not_found() -> Self {
        Self {
            destination: None,
            confidence: 0,
            reason: MatchReason::NoMatch,
        }
    }

    #[must_use]
    pub fn destination_name(&self) -> &str {
        self.destination.as_deref().unwrap_or(NOT_FOUND)
    }
}

impl RelocationSummary {
    /// Append the entries of another summary after the existing ones.
    pub fn merge(&mut self, other: Self) {
        self.moved.extend(other.moved);
        self.failed.extend(other.failed);
        self.duplicates.extend(other.duplicates);
        self.cancelled |= other.cancelled;
    }

    pub(crate) fn record(&mut self, outcome: &MoveOutcome, from: PathBuf, to: PathBuf) {
        match outcome {
            MoveOutcome::Moved => self.moved.push((from, to)),
            MoveOutcome::Duplicate => self.duplicates.push((from, to)),
            MoveOutcome::Failed(_) => self.failed.push((from, to)),
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.moved.len() + self.failed.len() + self.duplicates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl fmt::Display for MatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectName => write!(f, "Direct name match"),
            Self::Content => write!(f, "Content match"),
            Self::Fuzzy => write!(f, "Fuzzy match"),
            Self::NoMatch => write!(f, "No match"),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "HIGH"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::Low => write!(f, "LOW"),
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} ({}, {})",
            crate::path_to_filename_string(&self.source_path),
            self.destination_name,
            self.confidence,
            self.reason
        )
    }
}

impl fmt::Display for RelocationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "moved: {}, duplicates: {}, failed: {}",
            self.moved.len(),
            self.duplicates.len(),
            self.failed.len()
        )?;
        if self.cancelled {
            write!(f, " (cancelled)")?;
        }
        Ok(())
    }
}
