//! Folder matching and relocation engine.
//!
//! Matches loosely named source folders, usually extracted mod archives,
//! to a fixed list of destination folders and moves them into place.
//! Names are normalized and alias-resolved, then matched by name, by folder content
//! and finally by fuzzy similarity. Results are bucketed into confidence tiers
//! that are confirmed one at a time before relocation.

mod alias;
mod category;
mod config;
mod engine;
mod error;
mod events;
mod matcher;
mod normalize;
mod relocate;
mod scan;
mod types;

pub use alias::{AliasTable, resolve_alias};
pub use category::{DEFAULT_HIGH_CONFIDENCE, DEFAULT_MEDIUM_CONFIDENCE, Thresholds, categorize};
pub use config::{DEFAULT_EXTENSIONS, DEFAULT_SKIP_WORDS, MatchConfig, ModMatchConfig, NOT_SET};
pub use engine::{AutoAccept, ConfirmationGate, Engine, RunReport};
pub use error::EngineError;
pub use events::{Decision, Event};
pub use matcher::{EXACT_CONFIDENCE, Matcher, crops, partial_match, similarity_ratio};
pub use normalize::normalize;
pub use relocate::{DISABLED_PREFIX, Relocator, disabled_name, move_folder};
pub use scan::{CONTENT_SEARCH_DEPTH, ContentEntry, RESERVED_SUFFIXES, list_files_recursive, list_source_folders, list_subfolders};
pub use types::{
    Category, FolderMatch, MatchReason, MatchResult, MoveOutcome, NOT_FOUND, NormalizedName, RelocationSummary,
    SourceFolder,
};
