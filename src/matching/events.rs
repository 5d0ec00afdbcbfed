use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::matching::types::{Category, MatchResult};

/// Answer from the confirmation gate for a confidence tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Decision {
    Proceed,
    Skip,
}

/// Progress reported at each step boundary of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Event {
    /// Name after normalization, and after alias resolution.
    Normalized {
        source: PathBuf,
        normalized: String,
        resolved: String,
    },
    Matched(MatchResult),
    TierDecision { category: Category, count: usize, decision: Decision },
    Disabled { from: PathBuf, to: PathBuf },
    /// Rename failed, the folder is moved under its current name.
    DisableFailed { path: PathBuf, error: String },
    Moved { from: PathBuf, to: PathBuf },
    Duplicate { from: PathBuf, to: PathBuf },
    Failed { from: PathBuf, to: PathBuf, error: String },
    /// Cancellation was requested, `remaining` folders were not processed.
    Cancelled { remaining: usize },
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Proceed => write!(f, "proceed"),
            Self::Skip => write!(f, "skip"),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normalized {
                source,
                normalized,
                resolved,
            } => {
                write!(f, "NORMALIZED \"{}\" -> \"{normalized}\"", source.display())?;
                if resolved != normalized {
                    write!(f, " (alias \"{resolved}\")")?;
                }
                Ok(())
            }
            Self::Matched(result) => write!(
                f,
                "MATCHED \"{}\" -> \"{}\" ({}, {}, {})",
                result.source_path().display(),
                result.destination_name(),
                result.confidence(),
                result.reason(),
                result.category()
            ),
            Self::TierDecision {
                category,
                count,
                decision,
            } => write!(f, "TIER {category} ({count}): {decision}"),
            Self::Disabled { from, to } => write!(f, "DISABLED \"{}\" -> \"{}\"", from.display(), to.display()),
            Self::DisableFailed { path, error } => {
                write!(f, "DISABLE FAILED \"{}\": {error}", path.display())
            }
            Self::Moved { from, to } => write!(f, "MOVED \"{}\" -> \"{}\"", from.display(), to.display()),
            Self::Duplicate { from, to } => {
                write!(f, "DUPLICATE \"{}\" -> \"{}\"", from.display(), to.display())
            }
            Self::Failed { from, to, error } => write!(
                f,
                "FAILED \"{}\" -> \"{}\": {error}",
                from.display(),
                to.display()
            ),
            Self::Cancelled { remaining } => write!(f, "CANCELLED with {remaining} remaining"),
        }
    }
}
