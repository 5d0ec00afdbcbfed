//! Matching run orchestration: resolve all sources, confirm per tier, relocate.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use indicatif::ProgressBar;
#[cfg(not(test))]
use indicatif::ProgressStyle;
use rayon::prelude::*;
use serde::Serialize;

use crate::matching::config::MatchConfig;
use crate::matching::error::EngineError;
use crate::matching::events::{Decision, Event};
use crate::matching::matcher::Matcher;
use crate::matching::relocate::Relocator;
use crate::matching::scan::list_source_folders;
use crate::matching::types::{Category, MatchResult, RelocationSummary, SourceFolder};

#[cfg(not(test))]
const PROGRESS_BAR_CHARS: &str = "=> ";
#[cfg(not(test))]
const PROGRESS_BAR_TEMPLATE: &str = "[{elapsed_precise}] {bar:80.cyan/blue} {pos}/{len} {percent}%";

/// Decides whether the results of a confidence tier are relocated.
///
/// Called once per non-empty tier in HIGH, MEDIUM, LOW order.
/// The LOW tier is shown for review only and never relocated.
pub trait ConfirmationGate {
    fn confirm(&mut self, category: Category, results: &[MatchResult]) -> Decision;
}

/// Non-interactive gate accepting the selected tiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutoAccept {
    pub high: bool,
    pub medium: bool,
}

/// Everything a run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// One result per source folder, in source order.
    pub results: Vec<MatchResult>,
    /// Effective decision per confirmed tier.
    pub decisions: Vec<(Category, Decision)>,
    pub summary: RelocationSummary,
}

/// Runs matching and relocation with one configuration snapshot.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: MatchConfig,
    show_progress: bool,
    cancel: Option<Arc<AtomicBool>>,
}

impl ConfirmationGate for AutoAccept {
    fn confirm(&mut self, category: Category, _results: &[MatchResult]) -> Decision {
        let accept = match category {
            Category::High => self.high,
            Category::Medium => self.medium,
            Category::Low => false,
        };
        if accept { Decision::Proceed } else { Decision::Skip }
    }
}

impl Engine {
    #[must_use]
    pub const fn new(config: MatchConfig) -> Self {
        Self {
            config,
            show_progress: false,
            cancel: None,
        }
    }

    /// Show a progress bar while matching.
    #[must_use]
    pub const fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Stop relocation before the next folder once `flag` is set.
    #[must_use]
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    #[must_use]
    pub const fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// List the source folders under `source_root`.
    ///
    /// # Errors
    /// Returns `EngineError::MissingSourceRoot` if the root does not exist,
    /// `EngineError::NoSourceFolders` if it has no usable sub-folders,
    /// or `EngineError::ReadDir` if it cannot be read.
    pub fn discover(source_root: &Path) -> Result<Vec<SourceFolder>, EngineError> {
        let sources = list_source_folders(source_root)?;
        if sources.is_empty() {
            return Err(EngineError::NoSourceFolders(source_root.to_path_buf()));
        }
        Ok(sources)
    }

    /// Resolve and categorize every source folder.
    ///
    /// Results are returned in source order.
    ///
    /// # Errors
    /// Returns `EngineError::NoDestinations` if there is no non-empty destination name.
    pub fn match_sources(
        &self,
        sources: &[SourceFolder],
        destinations: &[String],
    ) -> Result<Vec<MatchResult>, EngineError> {
        self.match_with_events(sources, destinations, &mut |_| {})
    }

    /// Match all sources, then confirm and relocate each confidence tier.
    ///
    /// Tiers are offered to `gate` in HIGH, MEDIUM, LOW order, skipping empty ones.
    /// Summaries of the relocated tiers are merged in tier order.
    ///
    /// # Errors
    /// Returns an input error before anything is matched,
    /// or `EngineError::SourceVanished` if a source folder disappears during relocation.
    /// The vanished error carries the summary of the tiers relocated before it.
    pub fn run(
        &self,
        sources: &[SourceFolder],
        destination_root: &Path,
        destinations: &[String],
        gate: &mut dyn ConfirmationGate,
        on_event: &mut dyn FnMut(&Event),
    ) -> Result<RunReport, EngineError> {
        if !destination_root.is_dir() {
            return Err(EngineError::MissingDestinationRoot(destination_root.to_path_buf()));
        }

        let results = self.match_with_events(sources, destinations, on_event)?;
        let mut report = RunReport {
            results,
            ..RunReport::default()
        };

        let mut relocator = Relocator::new(destination_root);
        if let Some(flag) = self.cancel.as_deref() {
            relocator = relocator.with_cancel(flag);
        }

        for category in Category::ALL {
            let tier: Vec<MatchResult> = report
                .results
                .iter()
                .filter(|result| result.category() == category)
                .cloned()
                .collect();
            if tier.is_empty() {
                continue;
            }
            if self.is_cancelled() {
                report.summary.cancelled = true;
                break;
            }

            let decision = match (category, gate.confirm(category, &tier)) {
                (Category::Low, _) => Decision::Skip,
                (_, decision) => decision,
            };
            on_event(&Event::TierDecision {
                category,
                count: tier.len(),
                decision,
            });
            report.decisions.push((category, decision));

            if decision == Decision::Proceed {
                let summary = relocator.relocate(&tier, on_event).map_err(|error| match error {
                    EngineError::SourceVanished {
                        path,
                        renamed,
                        summary,
                    } => {
                        let mut merged = std::mem::take(&mut report.summary);
                        merged.merge(*summary);
                        EngineError::SourceVanished {
                            path,
                            renamed,
                            summary: Box::new(merged),
                        }
                    }
                    other => other,
                })?;
                report.summary.merge(summary);
            }
        }

        Ok(report)
    }

    fn match_with_events(
        &self,
        sources: &[SourceFolder],
        destinations: &[String],
        on_event: &mut dyn FnMut(&Event),
    ) -> Result<Vec<MatchResult>, EngineError> {
        if destinations.iter().all(|destination| destination.trim().is_empty()) {
            return Err(EngineError::NoDestinations);
        }

        let matcher = Matcher::new(destinations, &self.config);
        let progress_bar = self.create_progress_bar(sources.len() as u64);

        // Content walks dominate, run them in parallel and keep source order
        let resolved: Vec<(String, String, MatchResult)> = sources
            .par_iter()
            .map(|source| {
                let normalized = matcher.normalize_name(&source.name).normalized;
                let resolved_name = matcher.apply_aliases(&normalized);
                let folder_match = matcher.match_resolved(&resolved_name, &source.path);
                let result = MatchResult::new(
                    source.path.clone(),
                    folder_match.destination_name().to_string(),
                    folder_match.confidence,
                    folder_match.reason,
                    self.config.thresholds.categorize(folder_match.confidence),
                );
                progress_bar.inc(1);
                (normalized, resolved_name, result)
            })
            .collect();

        progress_bar.finish_and_clear();

        let mut results = Vec::with_capacity(resolved.len());
        for (normalized, resolved_name, result) in resolved {
            on_event(&Event::Normalized {
                source: result.source_path().to_path_buf(),
                normalized,
                resolved: resolved_name,
            });
            on_event(&Event::Matched(result.clone()));
            results.push(result);
        }
        Ok(results)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_deref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// Create a progress bar that is hidden during tests.
    fn create_progress_bar(&self, len: u64) -> ProgressBar {
        #[cfg(test)]
        {
            let _ = (len, self.show_progress);
            ProgressBar::hidden()
        }
        #[cfg(not(test))]
        {
            if !self.show_progress {
                return ProgressBar::hidden();
            }
            let progress_bar = ProgressBar::new(len);
            progress_bar.set_style(
                ProgressStyle::default_bar()
                    .template(PROGRESS_BAR_TEMPLATE)
                    .expect("Failed to set progress bar template")
                    .progress_chars(PROGRESS_BAR_CHARS),
            );
            progress_bar
        }
    }
}
