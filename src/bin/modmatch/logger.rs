use std::fs;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use chrono::Local;

use modmatch::matching::{Event, RelocationSummary};

use crate::config::Config;

/// Simple file logger for matching runs with buffered writes
pub struct FileLogger {
    writer: BufWriter<File>,
}

impl FileLogger {
    /// Create a new file logger, writing to ~/logs/modmatch/modmatch_<timestamp>.log
    pub(crate) fn new() -> Result<Self> {
        let home_dir = dirs::home_dir().context("Failed to get home directory")?;
        let log_dir = home_dir.join("logs").join(env!("CARGO_BIN_NAME"));

        if !log_dir.exists() {
            fs::create_dir_all(&log_dir).context("Failed to create log directory")?;
        }

        let log_path = log_dir.join(format!(
            "{}_{}.log",
            env!("CARGO_BIN_NAME"),
            Local::now().format("%Y-%m-%d_%H-%M-%S")
        ));

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to create log file: {}", log_path.display()))?;

        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    fn timestamp() -> String {
        Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// Log when starting the program
    pub(crate) fn log_init(&mut self, config: &Config, destinations: &[String]) {
        let _ = writeln!(
            self.writer,
            "[{}] INIT \"{}\"",
            Self::timestamp(),
            config.source_root.display()
        );
        if let Some(root) = &config.destination_root {
            let _ = writeln!(self.writer, "  destination_root: {}", root.display());
        }
        let _ = writeln!(self.writer, "  destinations: {destinations:?}");
        let _ = writeln!(self.writer, "  thresholds: {}", config.match_config.thresholds);
        let _ = writeln!(self.writer, "  skip_words: {:?}", config.match_config.skip_words);
        let _ = writeln!(self.writer, "  ignore_numbers: {}", config.match_config.ignore_numbers);
        let _ = writeln!(self.writer, "  extensions: {:?}", config.match_config.extensions);
        let _ = writeln!(self.writer, "  aliases: {}", config.match_config.aliases.len());
        let _ = writeln!(self.writer, "  auto_high: {}", config.auto_high);
        let _ = writeln!(self.writer, "  auto_medium: {}", config.auto_medium);
        let _ = writeln!(self.writer, "  dryrun: {}", config.dryrun);
        let _ = self.writer.flush();
    }

    /// Log a single engine event
    pub(crate) fn log_event(&mut self, event: &Event) {
        let _ = writeln!(self.writer, "[{}] {event}", Self::timestamp());
        // Only flush on filesystem changes
        if !matches!(event, Event::Normalized { .. } | Event::Matched(_)) {
            let _ = self.writer.flush();
        }
    }

    /// Log a run that stopped with an error
    pub(crate) fn log_error(&mut self, error: &str) {
        let _ = writeln!(self.writer, "[{}] ERROR {error}", Self::timestamp());
        let _ = self.writer.flush();
    }

    /// Log final relocation summary
    pub(crate) fn log_summary(&mut self, summary: &RelocationSummary) {
        let _ = writeln!(self.writer, "[{}] SUMMARY", Self::timestamp());
        let _ = writeln!(self.writer, "  Moved:      {}", summary.moved.len());
        let _ = writeln!(self.writer, "  Duplicates: {}", summary.duplicates.len());
        let _ = writeln!(self.writer, "  Failed:     {}", summary.failed.len());
        if summary.cancelled {
            let _ = writeln!(self.writer, "  Cancelled");
        }
        let _ = writeln!(self.writer, "[{}] END", Self::timestamp());
        let _ = self.writer.flush();
    }
}
