mod config;
mod logger;
mod mod_match;

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use crate::mod_match::ModMatch;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    name = env!("CARGO_BIN_NAME"),
    about = "Match extracted mod folders to destination folders and move them into place"
)]
struct Args {
    /// Source root containing the folders to match
    #[arg(value_hint = clap::ValueHint::DirPath)]
    source: Option<PathBuf>,

    /// Destination root containing the destination folders
    #[arg(short, long, name = "DEST_ROOT", value_hint = clap::ValueHint::DirPath)]
    destination: Option<PathBuf>,

    /// Game name used to look up the destination root from config
    #[arg(short, long, name = "GAME")]
    game: Option<String>,

    /// Move HIGH confidence matches without asking
    #[arg(short = 'a', long)]
    auto_high: bool,

    /// Move MEDIUM confidence matches without asking
    #[arg(short = 'm', long)]
    auto_medium: bool,

    /// Minimum confidence for the HIGH tier
    #[arg(long, name = "HIGH", value_parser = clap::value_parser!(u8).range(1..=100))]
    high: Option<u8>,

    /// Minimum confidence for the MEDIUM tier
    #[arg(long, name = "MEDIUM", value_parser = clap::value_parser!(u8).range(1..=100))]
    medium: Option<u8>,

    /// Only print matches without moving folders
    #[arg(short, long)]
    print: bool,

    /// Print results as JSON
    #[arg(short, long)]
    json: bool,

    /// Word to remove from names before matching
    #[arg(short, long, num_args = 1, action = clap::ArgAction::Append, name = "SKIP")]
    skip: Vec<String>,

    /// File extension to inspect when matching folder content
    #[arg(short, long, num_args = 1, action = clap::ArgAction::Append, name = "EXTENSION")]
    extension: Vec<String>,

    /// Keep digits in names when matching
    #[arg(short, long)]
    keep_numbers: bool,

    /// Print debug information
    #[arg(short = 'D', long)]
    debug: bool,

    /// Generate shell completion
    #[arg(short = 'l', long, name = "SHELL")]
    completion: Option<Shell>,

    /// Print verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if let Some(ref shell) = args.completion {
        modmatch::generate_shell_completion(*shell, Args::command(), true, env!("CARGO_BIN_NAME"))
    } else {
        ModMatch::new(args)?.run()
    }
}
