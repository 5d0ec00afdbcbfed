//! Disable-and-move relocation of matched source folders.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::sync::atomic::{AtomicBool, Ordering};

use regex::Regex;

use crate::matching::error::EngineError;
use crate::matching::events::Event;
use crate::matching::types::{MatchResult, MoveOutcome, RelocationSummary};

/// Prefix marking a folder as disabled.
pub const DISABLED_PREFIX: &str = "DISABLED";

/// Existing disabled prefix in any case, followed by space, hyphen or underscore separators.
static RE_DISABLED_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^disabled[\s_-]+").expect("Invalid disabled prefix regex"));

/// Moves accepted match results into `destination_root/<destination>/<folder>`.
#[derive(Debug)]
pub struct Relocator<'a> {
    destination_root: &'a Path,
    cancel: Option<&'a AtomicBool>,
}

impl<'a> Relocator<'a> {
    #[must_use]
    pub const fn new(destination_root: &'a Path) -> Self {
        Self {
            destination_root,
            cancel: None,
        }
    }

    /// Stop before the next folder once `flag` is set.
    #[must_use]
    pub const fn with_cancel(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Disable-rename every source folder, then move each one into its destination.
    ///
    /// Results without a destination are ignored.
    /// Per-folder failures are recorded in the summary.
    ///
    /// # Errors
    /// Returns `EngineError::SourceVanished` if a source folder no longer exists
    /// when it is about to be renamed. No folders are moved in that case.
    pub fn relocate(
        &self,
        results: &[MatchResult],
        on_event: &mut dyn FnMut(&Event),
    ) -> Result<RelocationSummary, EngineError> {
        let results: Vec<&MatchResult> = results.iter().filter(|result| result.is_match()).collect();
        let disabled_paths = self.disable_all(&results, on_event)?;
        Ok(self.move_all(&results, disabled_paths, on_event))
    }

    /// Rename each source folder to its disabled name.
    /// Returns the current path of every folder processed before any cancellation.
    fn disable_all(
        &self,
        results: &[&MatchResult],
        on_event: &mut dyn FnMut(&Event),
    ) -> Result<Vec<PathBuf>, EngineError> {
        let mut renamed: Vec<(PathBuf, PathBuf)> = Vec::new();
        let mut paths = Vec::with_capacity(results.len());

        for result in results {
            if self.is_cancelled() {
                break;
            }

            let source = result.source_path();
            if !source.is_dir() {
                return Err(EngineError::SourceVanished {
                    path: source.to_path_buf(),
                    renamed,
                    summary: Box::default(),
                });
            }

            let name = crate::path_to_filename_string(source);
            let new_name = disabled_name(&name);
            if new_name == name {
                paths.push(source.to_path_buf());
                continue;
            }

            let new_path = source.with_file_name(&new_name);
            match rename_folder(source, &new_path) {
                Ok(()) => {
                    on_event(&Event::Disabled {
                        from: source.to_path_buf(),
                        to: new_path.clone(),
                    });
                    renamed.push((source.to_path_buf(), new_path.clone()));
                    paths.push(new_path);
                }
                Err(error) => {
                    on_event(&Event::DisableFailed {
                        path: source.to_path_buf(),
                        error,
                    });
                    paths.push(source.to_path_buf());
                }
            }
        }

        Ok(paths)
    }

    fn move_all(
        &self,
        results: &[&MatchResult],
        paths: Vec<PathBuf>,
        on_event: &mut dyn FnMut(&Event),
    ) -> RelocationSummary {
        let mut summary = RelocationSummary::default();
        let total = results.len();

        for (index, (result, source)) in results.iter().zip(paths).enumerate() {
            if self.is_cancelled() {
                summary.cancelled = true;
                on_event(&Event::Cancelled {
                    remaining: total - index,
                });
                return summary;
            }

            let target = self
                .destination_root
                .join(result.destination_name())
                .join(crate::path_to_filename_string(&source));

            let outcome = move_folder(&source, &target);
            on_event(&match &outcome {
                MoveOutcome::Moved => Event::Moved {
                    from: source.clone(),
                    to: target.clone(),
                },
                MoveOutcome::Duplicate => Event::Duplicate {
                    from: source.clone(),
                    to: target.clone(),
                },
                MoveOutcome::Failed(error) => Event::Failed {
                    from: source.clone(),
                    to: target.clone(),
                    error: error.clone(),
                },
            });
            summary.record(&outcome, source, target);
        }

        // Cancelled during the disable pass
        if self.is_cancelled() && summary.total() < total {
            summary.cancelled = true;
            on_event(&Event::Cancelled {
                remaining: total - summary.total(),
            });
        }

        summary
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.is_some_and(|flag| flag.load(Ordering::SeqCst))
    }
}

/// Folder name with the disabled prefix.
///
/// An existing prefix in any case with space, hyphen or underscore separators
/// is rewritten to the canonical `DISABLED ` form instead of being added twice.
///
/// ```rust
/// use modmatch::matching::disabled_name;
///
/// assert_eq!(disabled_name("Keqing"), "DISABLED Keqing");
/// assert_eq!(disabled_name("DISABLED Keqing"), "DISABLED Keqing");
/// assert_eq!(disabled_name("disabled_Keqing"), "DISABLED Keqing");
/// ```
#[must_use]
pub fn disabled_name(name: &str) -> String {
    RE_DISABLED_PREFIX.find(name).map_or_else(
        || format!("{DISABLED_PREFIX} {name}"),
        |prefix| format!("{DISABLED_PREFIX} {}", &name[prefix.end()..]),
    )
}

/// Move a folder to `target` without overwriting anything.
///
/// Missing parent directories of the target are created.
#[must_use]
pub fn move_folder(source: &Path, target: &Path) -> MoveOutcome {
    if target.exists() {
        return MoveOutcome::Duplicate;
    }
    if let Some(parent) = target.parent()
        && !parent.exists()
        && let Err(error) = fs::create_dir_all(parent)
    {
        return MoveOutcome::Failed(error.to_string());
    }
    match fs::rename(source, target) {
        Ok(()) => MoveOutcome::Moved,
        Err(_) if target.exists() => MoveOutcome::Duplicate,
        Err(error) => MoveOutcome::Failed(error.to_string()),
    }
}

fn rename_folder(source: &Path, target: &Path) -> Result<(), String> {
    // A case-insensitive filesystem reports the source itself as the target
    if target.exists() && (!is_case_only_rename(source, target) || has_exact_entry(target)) {
        return Err(format!("{} already exists", target.display()));
    }
    fs::rename(source, target).map_err(|error| error.to_string())
}

/// Source and target are in the same directory and their names differ only by ASCII case.
fn is_case_only_rename(source: &Path, target: &Path) -> bool {
    source.parent() == target.parent()
        && source
            .file_name()
            .zip(target.file_name())
            .is_some_and(|(from, to)| from != to && from.eq_ignore_ascii_case(to))
}

/// Parent directory has an entry with exactly this name.
fn has_exact_entry(path: &Path) -> bool {
    let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
        return false;
    };
    fs::read_dir(parent).is_ok_and(|entries| entries.filter_map(Result::ok).any(|entry| entry.file_name() == name))
}
