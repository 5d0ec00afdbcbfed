use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use colored::Colorize;

use modmatch::matching::{
    AutoAccept, Category, ConfirmationGate, Decision, Engine, EngineError, Event, MatchResult, RelocationSummary,
    list_subfolders,
};
use modmatch::{get_relative_path_or_filename, path_to_filename_string, print_bold, print_error, print_warning};

use crate::Args;
use crate::config::Config;
use crate::logger::FileLogger;

pub struct ModMatch {
    config: Config,
    logger: FileLogger,
}

/// Confirmation gate asking the user on the command line.
///
/// Tiers selected for automatic acceptance are moved without asking.
/// JSON output never prompts.
#[derive(Debug)]
struct PromptGate {
    auto: AutoAccept,
    json: bool,
}

impl ModMatch {
    pub fn new(args: Args) -> Result<Self> {
        let config = Config::from_args(args)?;
        if config.debug {
            eprintln!("{config}");
        }
        let logger = FileLogger::new()?;
        Ok(Self { config, logger })
    }

    pub fn run(&mut self) -> Result<()> {
        let result = self.match_and_relocate();
        if let Err(error) = &result {
            self.logger.log_error(&format!("{error:#}"));
        }
        result
    }

    fn match_and_relocate(&mut self) -> Result<()> {
        let destination_root = self.destination_root()?;
        let destinations = self.destinations(&destination_root)?;
        let sources = Engine::discover(&self.config.source_root)?;
        self.logger.log_init(&self.config, &destinations);

        if self.config.verbose && !self.config.json {
            print_bold!(
                "Matching {} folder(s) in {} against {} destination(s) in {}",
                sources.len(),
                self.config.source_root.display(),
                destinations.len(),
                destination_root.display()
            );
        }

        let abort_flag = Arc::new(AtomicBool::new(false));
        let engine = Engine::new(self.config.match_config.clone())
            .with_progress(!self.config.json)
            .with_cancel(Arc::clone(&abort_flag));

        if self.config.dryrun {
            let results = engine.match_sources(&sources, &destinations)?;
            for result in &results {
                self.logger.log_event(&Event::Matched(result.clone()));
            }
            if self.config.json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                for category in Category::ALL {
                    let tier: Vec<MatchResult> = results
                        .iter()
                        .filter(|result| result.category() == category)
                        .cloned()
                        .collect();
                    if !tier.is_empty() {
                        print_tier(category, &tier);
                    }
                }
            }
            return Ok(());
        }

        let abort_flag_handler = Arc::clone(&abort_flag);
        ctrlc::set_handler(move || {
            if abort_flag_handler.load(Ordering::SeqCst) {
                // Second Ctrl+C - force exit
                std::process::exit(130);
            }
            println!("\n{}", "Received Ctrl+C, finishing current folder...".yellow().bold());
            abort_flag_handler.store(true, Ordering::SeqCst);
        })
        .context("Failed to set Ctrl+C handler")?;

        let mut gate = PromptGate {
            auto: AutoAccept {
                high: self.config.auto_high,
                medium: self.config.auto_medium,
            },
            json: self.config.json,
        };

        let verbose = self.config.verbose;
        let json = self.config.json;
        let logger = &mut self.logger;
        let outcome = engine.run(
            &sources,
            &destination_root,
            &destinations,
            &mut gate,
            &mut |event| {
                logger.log_event(event);
                if !json {
                    print_event(event, verbose);
                }
            },
        );

        let report = match outcome {
            Ok(report) => report,
            Err(error) => {
                if let EngineError::SourceVanished { renamed, summary, .. } = &error {
                    self.report_partial_run(renamed, summary, &destination_root)?;
                }
                return Err(error.into());
            }
        };

        self.logger.log_summary(&report.summary);

        if self.config.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_summary(&report.summary, &destination_root);
        }

        Ok(())
    }

    /// Log and print what was already done when a run stops early.
    fn report_partial_run(
        &mut self,
        renamed: &[(PathBuf, PathBuf)],
        summary: &RelocationSummary,
        destination_root: &Path,
    ) -> Result<()> {
        self.logger.log_summary(summary);
        if self.config.json {
            println!("{}", serde_json::to_string_pretty(summary)?);
            return Ok(());
        }
        for (from, to) in renamed {
            print_warning!(
                "Renamed before stopping: {} -> {}",
                path_to_filename_string(from),
                path_to_filename_string(to)
            );
        }
        print_summary(summary, destination_root);
        Ok(())
    }

    /// Destination root from config, which must exist.
    fn destination_root(&self) -> Result<PathBuf> {
        let Some(root) = self.config.destination_root.as_deref() else {
            anyhow::bail!(
                "Destination root not set. Use --destination, or set destination_root or game_paths in {}",
                modmatch::config::config_path().map_or_else(|| "the config file".to_string(), |p| p.display().to_string())
            );
        };
        if !root.is_dir() {
            return Err(EngineError::MissingDestinationRoot(root.to_path_buf()).into());
        }
        Ok(dunce::canonicalize(root).unwrap_or_else(|_| root.to_path_buf()))
    }

    /// Configured destination names, or the sub-folders of the destination root.
    fn destinations(&self, destination_root: &Path) -> Result<Vec<String>> {
        if !self.config.destinations.is_empty() {
            return Ok(self.config.destinations.clone());
        }
        let destinations = list_subfolders(destination_root)?;
        if destinations.is_empty() {
            return Err(EngineError::NoDestinations.into());
        }
        Ok(destinations)
    }
}

impl ConfirmationGate for PromptGate {
    fn confirm(&mut self, category: Category, results: &[MatchResult]) -> Decision {
        if !self.json {
            print_tier(category, results);
        }
        if category == Category::Low {
            if !self.json {
                println!("  {}\n", "Low confidence matches are not moved".dimmed());
            }
            return Decision::Skip;
        }

        let decision = self.auto.confirm(category, results);
        if decision == Decision::Proceed || self.json {
            return decision;
        }

        match ask_confirmation(category, results.len()) {
            Ok(true) => Decision::Proceed,
            Ok(false) => {
                println!("  Skipped\n");
                Decision::Skip
            }
            Err(error) => {
                print_error!("Failed to read input: {error}");
                Decision::Skip
            }
        }
    }
}

fn ask_confirmation(category: Category, count: usize) -> Result<bool> {
    print!(
        "{}",
        format!("Move {count} {category} confidence folder(s)? (y/n): ").magenta()
    );
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

fn print_tier(category: Category, results: &[MatchResult]) {
    println!("{} confidence: {} folder(s)", category.colored_label(), results.len());
    for result in results {
        let destination = if result.is_match() {
            result.destination_name().cyan()
        } else {
            result.destination_name().red()
        };
        println!(
            "  {} {} {} ({}, {})",
            path_to_filename_string(result.source_path()),
            "→".green(),
            destination,
            result.confidence(),
            result.reason()
        );
    }
}

fn print_event(event: &Event, verbose: bool) {
    match event {
        Event::Disabled { from, to } if verbose => {
            println!(
                "  Renamed: {} {} {}",
                path_to_filename_string(from),
                "→".green(),
                path_to_filename_string(to)
            );
        }
        Event::Moved { to, .. } if verbose => {
            println!("  {} {}", "Moved:".green(), to.display());
        }
        Event::DisableFailed { path, error } => {
            print_warning!("Failed to rename {}: {error}", path_to_filename_string(path));
        }
        Event::Duplicate { from, to } => {
            print_warning!(
                "Already exists, not moved: {} -> {}",
                path_to_filename_string(from),
                to.display()
            );
        }
        Event::Failed { from, to, error } => {
            print_error!("Failed to move {} -> {}: {error}", path_to_filename_string(from), to.display());
        }
        Event::Cancelled { remaining } => {
            print_warning!("Cancelled, {remaining} folder(s) not processed");
        }
        _ => {}
    }
}

fn print_summary(summary: &RelocationSummary, destination_root: &Path) {
    print_bold!("Summary");
    println!("  Moved:      {}", summary.moved.len().to_string().green());
    println!("  Duplicates: {}", summary.duplicates.len().to_string().yellow());
    println!("  Failed:     {}", summary.failed.len().to_string().red());
    for (from, to) in &summary.duplicates {
        println!(
            "    {} {} {}",
            path_to_filename_string(from).yellow(),
            "→".yellow(),
            get_relative_path_or_filename(to, destination_root)
        );
    }
    for (from, to) in &summary.failed {
        println!(
            "    {} {} {}",
            path_to_filename_string(from).red(),
            "→".red(),
            get_relative_path_or_filename(to, destination_root)
        );
    }
    if summary.cancelled {
        print_warning!("Run was cancelled before all folders were processed");
    }
}
