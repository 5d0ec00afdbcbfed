//! Configuration for folder matching.

use std::path::PathBuf;
use std::{fmt, fs};

use anyhow::Context;
use itertools::Itertools;
use serde::Deserialize;

use crate::matching::alias::AliasTable;
use crate::matching::category::{DEFAULT_HIGH_CONFIDENCE, DEFAULT_MEDIUM_CONFIDENCE, Thresholds};
use crate::matching::error::EngineError;

/// File extensions inspected during content matching by default.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".ini", ".dds", ".buf", ".ib"];

/// Words removed from names before matching by default.
pub const DEFAULT_SKIP_WORDS: &[&str] = &["DISABLED", "download"];

/// Game path value meaning the destination has not been configured yet.
pub const NOT_SET: &str = "Not Set";

/// Config from the user config file.
#[derive(Debug, Default, Deserialize)]
pub struct ModMatchConfig {
    #[serde(default)]
    pub source_root: Option<PathBuf>,
    #[serde(default)]
    pub destination_root: Option<PathBuf>,
    #[serde(default)]
    pub destinations: Vec<String>,
    #[serde(default)]
    pub game_paths: Vec<(String, String)>,
    #[serde(default)]
    pub aliases: Option<AliasTable>,
    #[serde(default)]
    pub skip_words: Option<Vec<String>>,
    #[serde(default)]
    pub ignore_numbers: Option<bool>,
    #[serde(default)]
    pub extensions: Option<Vec<String>>,
    #[serde(default)]
    pub high_confidence: Option<u8>,
    #[serde(default)]
    pub medium_confidence: Option<u8>,
    #[serde(default)]
    pub auto_high: bool,
    #[serde(default)]
    pub auto_medium: bool,
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub dryrun: bool,
    #[serde(default)]
    pub verbose: bool,
}

/// Wrapper needed for parsing the config section.
#[derive(Debug, Default, Deserialize)]
struct UserConfig {
    #[serde(default)]
    modmatch: ModMatchConfig,
}

/// Immutable settings snapshot passed to every matching call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchConfig {
    pub aliases: AliasTable,
    pub skip_words: Vec<String>,
    pub ignore_numbers: bool,
    /// Lowercase extensions without the leading dot.
    pub extensions: Vec<String>,
    pub thresholds: Thresholds,
}

impl ModMatchConfig {
    /// Try to read user config from the file if it exists.
    /// Otherwise, fall back to default config.
    ///
    /// # Errors
    /// Returns an error if config file exists but cannot be read or parsed.
    pub fn get_user_config() -> anyhow::Result<Self> {
        let Some(path) = crate::config::config_path() else {
            return Ok(Self::default());
        };

        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse config file {}:\n{e}", path.display())),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(anyhow::anyhow!(
                "Failed to read config file {}: {error}",
                path.display()
            )),
        }
    }

    /// Parse config from a TOML string.
    ///
    /// # Errors
    /// Returns an error if the TOML string is invalid.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        toml::from_str::<UserConfig>(toml_str)
            .map(|config| config.modmatch)
            .with_context(|| "Failed to parse config TOML")
    }

    /// Look up the destination root configured for a game folder name.
    ///
    /// Keys compare case-insensitively. Returns `None` for unknown games
    /// and for entries still set to "Not Set".
    #[must_use]
    pub fn game_destination(&self, game: &str) -> Option<PathBuf> {
        let game = game.to_lowercase();
        self.game_paths
            .iter()
            .find(|(name, _)| name.to_lowercase() == game)
            .map(|(_, path)| path.trim())
            .filter(|path| !path.is_empty() && *path != NOT_SET)
            .map(PathBuf::from)
    }
}

impl MatchConfig {
    /// Create a config snapshot, validating the thresholds.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidThresholds` for out-of-range or unordered thresholds.
    pub fn new(
        aliases: AliasTable,
        skip_words: Vec<String>,
        ignore_numbers: bool,
        extensions: &[String],
        high_confidence: u8,
        medium_confidence: u8,
    ) -> Result<Self, EngineError> {
        Ok(Self {
            aliases,
            skip_words,
            ignore_numbers,
            extensions: parse_extensions(extensions),
            thresholds: Thresholds::new(high_confidence, medium_confidence)?,
        })
    }

    /// Build the snapshot from the user config, filling unset values with defaults.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidThresholds` for out-of-range or unordered thresholds.
    pub fn from_user_config(user_config: &ModMatchConfig) -> Result<Self, EngineError> {
        let defaults = Self::default();
        Self::new(
            user_config.aliases.clone().unwrap_or(defaults.aliases),
            user_config.skip_words.clone().unwrap_or(defaults.skip_words),
            user_config.ignore_numbers.unwrap_or(defaults.ignore_numbers),
            user_config.extensions.as_deref().unwrap_or(&defaults.extensions),
            user_config.high_confidence.unwrap_or(DEFAULT_HIGH_CONFIDENCE),
            user_config.medium_confidence.unwrap_or(DEFAULT_MEDIUM_CONFIDENCE),
        )
    }

    /// Config without aliases, skip words or digit stripping.
    #[must_use]
    pub fn plain() -> Self {
        Self {
            aliases: AliasTable::default(),
            skip_words: Vec::new(),
            ignore_numbers: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_aliases(mut self, aliases: AliasTable) -> Self {
        self.aliases = aliases;
        self
    }

    #[must_use]
    pub fn with_skip_words(mut self, skip_words: Vec<String>) -> Self {
        self.skip_words = skip_words;
        self
    }

    #[must_use]
    pub const fn with_ignore_numbers(mut self, ignore_numbers: bool) -> Self {
        self.ignore_numbers = ignore_numbers;
        self
    }

    #[must_use]
    pub fn with_extensions(mut self, extensions: &[String]) -> Self {
        self.extensions = parse_extensions(extensions);
        self
    }

    #[must_use]
    pub const fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Check if a file extension is in the allow-list.
    #[must_use]
    pub fn allows_extension(&self, extension: &str) -> bool {
        let extension = extension.trim_start_matches('.').to_lowercase();
        !extension.is_empty() && self.extensions.contains(&extension)
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            aliases: AliasTable::default_aliases(),
            skip_words: DEFAULT_SKIP_WORDS.iter().map(ToString::to_string).collect(),
            ignore_numbers: true,
            extensions: parse_extensions(&DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect::<Vec<_>>()),
            thresholds: Thresholds::default(),
        }
    }
}

impl fmt::Display for MatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Config:")?;
        writeln!(f, "  thresholds: {}", self.thresholds)?;
        writeln!(f, "  ignore_numbers: {}", crate::colorize_bool(self.ignore_numbers))?;
        writeln!(f, "  skip_words: [{}]", self.skip_words.iter().join(", "))?;
        writeln!(f, "  extensions: [{}]", self.extensions.iter().join(", "))?;
        write!(
            f,
            "  aliases: [{}]",
            self.aliases
                .iter()
                .map(|(alias, canonical)| format!("{alias} -> {canonical}"))
                .join(", ")
        )
    }
}

/// Normalize extension entries: split comma-separated values,
/// trim, drop the leading dot, lowercase and deduplicate.
fn parse_extensions(extensions: &[String]) -> Vec<String> {
    extensions
        .iter()
        .flat_map(|entry| entry.split(','))
        .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .unique()
        .collect()
}
