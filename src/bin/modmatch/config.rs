use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;
use itertools::Itertools;

use modmatch::matching::{
    AliasTable, DEFAULT_EXTENSIONS, DEFAULT_HIGH_CONFIDENCE, DEFAULT_MEDIUM_CONFIDENCE, DEFAULT_SKIP_WORDS, MatchConfig,
    ModMatchConfig,
};

use crate::Args;

/// Final config combined from CLI arguments and user config file.
#[derive(Debug)]
pub struct Config {
    pub(crate) auto_high: bool,
    pub(crate) auto_medium: bool,
    pub(crate) debug: bool,
    /// `None` when neither the arguments nor the user config name one.
    pub(crate) destination_root: Option<PathBuf>,
    /// Ordered destination names, empty means the destination root sub-folders.
    pub(crate) destinations: Vec<String>,
    pub(crate) dryrun: bool,
    pub(crate) json: bool,
    pub(crate) match_config: MatchConfig,
    pub(crate) source_root: PathBuf,
    pub(crate) verbose: bool,
}

impl Config {
    /// Create config from given command line args and user config file.
    pub fn from_args(args: Args) -> Result<Self> {
        let user_config = ModMatchConfig::get_user_config()?;
        Self::from_parts(args, user_config)
    }

    /// Merge command line args over an already loaded user config.
    pub fn from_parts(args: Args, user_config: ModMatchConfig) -> Result<Self> {
        let source_root = modmatch::resolve_input_path(args.source.as_deref().or(user_config.source_root.as_deref()))?;
        let destination_root = resolve_destination_root(
            args.destination.as_deref(),
            args.game.as_deref(),
            &source_root,
            &user_config,
        );

        let skip_words: Vec<String> = user_config
            .skip_words
            .clone()
            .unwrap_or_else(|| DEFAULT_SKIP_WORDS.iter().map(ToString::to_string).collect())
            .into_iter()
            .chain(args.skip)
            .unique()
            .collect();

        let extensions: Vec<String> = user_config
            .extensions
            .clone()
            .unwrap_or_else(|| DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect())
            .into_iter()
            .chain(args.extension)
            .unique()
            .collect();

        let match_config = MatchConfig::new(
            user_config.aliases.clone().unwrap_or_else(AliasTable::default_aliases),
            skip_words,
            user_config.ignore_numbers.unwrap_or(true) && !args.keep_numbers,
            &extensions,
            args.high
                .or(user_config.high_confidence)
                .unwrap_or(DEFAULT_HIGH_CONFIDENCE),
            args.medium
                .or(user_config.medium_confidence)
                .unwrap_or(DEFAULT_MEDIUM_CONFIDENCE),
        )?;

        let destinations: Vec<String> = user_config
            .destinations
            .into_iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unique()
            .collect();

        Ok(Self {
            auto_high: args.auto_high || user_config.auto_high,
            auto_medium: args.auto_medium || user_config.auto_medium,
            debug: args.debug || user_config.debug,
            destination_root,
            destinations,
            dryrun: args.print || user_config.dryrun,
            json: args.json,
            match_config,
            source_root,
            verbose: args.verbose || user_config.verbose,
        })
    }
}

/// Pick the destination root.
///
/// An explicit path wins. Otherwise the game paths are searched by the given game name,
/// or by the source root folder name, before falling back to the configured destination root.
fn resolve_destination_root(
    destination: Option<&Path>,
    game: Option<&str>,
    source_root: &Path,
    user_config: &ModMatchConfig,
) -> Option<PathBuf> {
    if let Some(destination) = destination {
        return Some(destination.to_path_buf());
    }
    let game = game.map_or_else(|| modmatch::path_to_filename_string(source_root), ToString::to_string);
    user_config
        .game_destination(&game)
        .or_else(|| user_config.destination_root.clone())
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Source root: {}", self.source_root.display())?;
        writeln!(
            f,
            "Destination root: {}",
            self.destination_root
                .as_ref()
                .map_or_else(|| "not set".to_string(), |path| path.display().to_string())
        )?;
        if !self.destinations.is_empty() {
            writeln!(f, "Destinations: [{}]", self.destinations.iter().join(", "))?;
        }
        writeln!(f, "auto_high: {}", modmatch::colorize_bool(self.auto_high))?;
        writeln!(f, "auto_medium: {}", modmatch::colorize_bool(self.auto_medium))?;
        writeln!(f, "dryrun: {}", modmatch::colorize_bool(self.dryrun))?;
        write!(f, "{}", self.match_config)
    }
}
