//! Three-tier folder matching: direct name, folder content, fuzzy similarity.

use std::iter;
use std::path::Path;

use rapidfuzz::fuzz;

use crate::matching::alias::resolve_alias;
use crate::matching::config::MatchConfig;
use crate::matching::normalize::normalize;
use crate::matching::scan::{CONTENT_SEARCH_DEPTH, ContentEntry, list_files_recursive};
use crate::matching::types::{FolderMatch, MatchReason, NormalizedName, SourceFolder};

/// Confidence given to direct name and content matches.
pub const EXACT_CONFIDENCE: u8 = 100;

/// Resolves source folders against an ordered list of destination names.
///
/// Destination order is the tie-break in every tier: the first destination
/// that satisfies a tier wins. Empty destination names are ignored.
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'a> {
    destinations: &'a [String],
    config: &'a MatchConfig,
}

/// A name read from inside a source folder, prepared for content matching.
struct ContentName {
    /// Lowercase folder name, or lowercase file stem for files.
    lowercase: String,
    /// Normalized and alias-resolved name.
    resolved: String,
}

impl<'a> Matcher<'a> {
    #[must_use]
    pub const fn new(destinations: &'a [String], config: &'a MatchConfig) -> Self {
        Self { destinations, config }
    }

    /// Normalize a raw name with the configured skip words.
    #[must_use]
    pub fn normalize_name(&self, raw_name: &str) -> NormalizedName {
        normalize(raw_name, &self.config.skip_words, self.config.ignore_numbers)
    }

    /// Normalize a raw name and apply aliases.
    #[must_use]
    pub fn resolve_name(&self, raw_name: &str) -> String {
        self.apply_aliases(&self.normalize_name(raw_name).normalized)
    }

    #[must_use]
    pub fn apply_aliases(&self, normalized_name: &str) -> String {
        resolve_alias(normalized_name, &self.config.aliases)
    }

    /// Find the destination for a source folder.
    ///
    /// Tries the direct name match first, then the folder content,
    /// and finally fuzzy similarity. Always returns a result.
    #[must_use]
    pub fn match_folder(&self, source: &SourceFolder) -> FolderMatch {
        let resolved_name = self.resolve_name(&source.name);
        self.match_resolved(&resolved_name, &source.path)
    }

    /// Same as `match_folder` for an already resolved name.
    #[must_use]
    pub fn match_resolved(&self, resolved_name: &str, source_path: &Path) -> FolderMatch {
        if let Some(destination) = self.direct_name_match(resolved_name) {
            return FolderMatch {
                destination: Some(destination.to_string()),
                confidence: EXACT_CONFIDENCE,
                reason: MatchReason::DirectName,
            };
        }

        if let Some(destination) = self.content_match(source_path) {
            return FolderMatch {
                destination: Some(destination.to_string()),
                confidence: EXACT_CONFIDENCE,
                reason: MatchReason::Content,
            };
        }

        self.fuzzy_match(resolved_name)
            .map_or_else(FolderMatch::not_found, |(destination, confidence)| FolderMatch {
                destination: Some(destination.to_string()),
                confidence,
                reason: MatchReason::Fuzzy,
            })
    }

    /// Tier 1: first destination that partially matches the resolved name.
    #[must_use]
    pub fn direct_name_match(&self, resolved_name: &str) -> Option<&'a str> {
        self.candidates()
            .find(|destination| partial_match(resolved_name, destination))
    }

    /// Tier 2: walk the source folder and look for sub-folders or files naming a destination.
    #[must_use]
    pub fn content_match(&self, source_path: &Path) -> Option<&'a str> {
        let entries = list_files_recursive(source_path, CONTENT_SEARCH_DEPTH);
        self.match_content_entries(&entries)
    }

    /// Tier 2 on an existing listing.
    ///
    /// A sub-folder matches when its name equals the destination (ignoring case)
    /// or its resolved name partially matches it. A file with an allowed extension
    /// matches when its stem contains the destination (ignoring case)
    /// or its resolved stem partially matches it.
    #[must_use]
    pub fn match_content_entries(&self, entries: &[ContentEntry]) -> Option<&'a str> {
        let folders: Vec<ContentName> = entries
            .iter()
            .filter(|entry| entry.is_dir)
            .map(|entry| ContentName {
                lowercase: entry.name.to_lowercase(),
                resolved: self.resolve_name(&entry.name),
            })
            .collect();

        let files: Vec<ContentName> = if self.config.extensions.is_empty() {
            Vec::new()
        } else {
            entries
                .iter()
                .filter(|entry| {
                    !entry.is_dir
                        && self
                            .config
                            .allows_extension(&crate::path_to_file_extension_string(Path::new(&entry.name)))
                })
                .map(|entry| {
                    let stem = crate::path_to_file_stem_string(Path::new(&entry.name));
                    ContentName {
                        lowercase: stem.to_lowercase(),
                        resolved: self.resolve_name(&stem),
                    }
                })
                .collect()
        };

        if folders.is_empty() && files.is_empty() {
            return None;
        }

        self.candidates().find(|destination| {
            let destination_lower = destination.to_lowercase();
            folders.iter().any(|folder| {
                folder.lowercase == destination_lower || partial_match(&folder.resolved, destination)
            }) || files.iter().any(|file| {
                file.lowercase.contains(&destination_lower) || partial_match(&file.resolved, destination)
            })
        })
    }

    /// Tier 3: best similarity between any crop of the resolved name and any destination.
    ///
    /// Crops are one character longer than the destination name.
    /// Returns `None` when nothing scores above zero.
    /// Ties keep the first destination that reached the score.
    #[must_use]
    pub fn fuzzy_match(&self, resolved_name: &str) -> Option<(&'a str, u8)> {
        let mut best_match: Option<&'a str> = None;
        let mut best_score = 0.0;

        for destination in self.candidates() {
            let window = destination.chars().count() + 1;
            for crop in crops(resolved_name, window) {
                let score = similarity_ratio(crop, destination);
                if score > best_score {
                    best_score = score;
                    best_match = Some(destination);
                }
            }
        }

        best_match.map(|destination| (destination, best_score.round().clamp(1.0, 100.0) as u8))
    }

    fn candidates(self) -> impl Iterator<Item = &'a str> {
        self.destinations
            .iter()
            .map(String::as_str)
            .filter(|destination| !destination.trim().is_empty())
    }
}

/// Check if a candidate name and a destination name contain one another,
/// ignoring spaces and case.
///
/// Only candidates at least as long as the destination can match,
/// so short fragments never match long destination names.
///
/// ```rust
/// use modmatch::matching::partial_match;
///
/// assert!(partial_match("Raiden Shogun", "raidenshogun"));
/// assert!(partial_match("Ganyu Outfit", "Ganyu"));
/// assert!(!partial_match("Ei", "Raiden Shogun"));
/// ```
#[must_use]
pub fn partial_match(candidate: &str, destination: &str) -> bool {
    let candidate = candidate.replace(' ', "").to_lowercase();
    let destination = destination.replace(' ', "").to_lowercase();
    if candidate.is_empty() || destination.is_empty() {
        return false;
    }
    candidate.chars().count() >= destination.chars().count()
        && (candidate.contains(&destination) || destination.contains(&candidate))
}

/// All contiguous substrings of `text` with `length` characters.
///
/// Text that is not longer than `length` is returned whole as a single crop.
#[must_use]
pub fn crops(text: &str, length: usize) -> Vec<&str> {
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(index, _)| index)
        .chain(iter::once(text.len()))
        .collect();
    let char_count = boundaries.len() - 1;
    if length == 0 || char_count <= length {
        return vec![text];
    }
    (0..=char_count - length)
        .map(|start| &text[boundaries[start]..boundaries[start + length]])
        .collect()
}

/// Normalized insertion/deletion similarity in the range 0-100.
///
/// Symmetric and case-sensitive. Two empty strings score 0.
#[must_use]
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    100.0 * fuzz::ratio(a.chars(), b.chars())
}

#[cfg(test)]
mod matcher_tests {
    use super::*;

    use std::fs::{self, File};
    use std::path::PathBuf;

    use tempfile::tempdir;

    use crate::matching::alias::AliasTable;

    fn destinations(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    fn source(path: &Path) -> SourceFolder {
        SourceFolder {
            path: path.to_path_buf(),
            name: crate::path_to_filename_string(path),
        }
    }

    fn missing_source(name: &str) -> SourceFolder {
        SourceFolder {
            path: PathBuf::from("/nonexistent/modmatch").join(name),
            name: name.to_string(),
        }
    }

    #[test]
    fn partial_match_requires_candidate_at_least_as_long() {
        assert!(!partial_match("Ei", "Raiden Shogun"));
        assert!(!partial_match("Raiden", "Raiden Shogun"));
        assert!(partial_match("Raiden Shogun Mod", "Raiden Shogun"));
        assert!(partial_match("RaidenShogun", "Raiden Shogun"));
        assert!(!partial_match("Gan", "Ganyu"));
        assert!(partial_match("Ganyu", "ganyu"));
    }

    #[test]
    fn partial_match_empty_never_matches() {
        assert!(!partial_match("", "Ganyu"));
        assert!(!partial_match("Ganyu", ""));
        assert!(!partial_match("   ", "  "));
    }

    #[test]
    fn crops_have_requested_length() {
        assert_eq!(crops("abcdef", 4), vec!["abcd", "bcde", "cdef"]);
        assert_eq!(crops("abc", 4), vec!["abc"]);
        assert_eq!(crops("abcd", 4), vec!["abcd"]);
        assert_eq!(crops("", 3), vec![""]);
    }

    #[test]
    fn crops_respect_char_boundaries() {
        assert_eq!(crops("Åsa Ö", 4), vec!["Åsa ", "sa Ö"]);
    }

    #[test]
    fn similarity_ratio_values() {
        assert!((similarity_ratio("Keqing", "Keqing") - 100.0).abs() < f64::EPSILON);
        assert!(similarity_ratio("abc", "xyz").abs() < f64::EPSILON);
        assert!(similarity_ratio("", "").abs() < f64::EPSILON);
        // 2 * 3 common characters out of 8
        assert!((similarity_ratio("abcd", "abce") - 75.0).abs() < 1e-9);
        assert!((similarity_ratio("Ganyu", "Gan") - similarity_ratio("Gan", "Ganyu")).abs() < 1e-9);
        // Case matters
        assert!((similarity_ratio("ganyu", "Ganyu") - 80.0).abs() < 1e-9);
    }

    #[test]
    fn short_source_name_does_not_direct_match_long_destination() {
        let config = MatchConfig::plain();
        let dests = destinations(&["Raiden Shogun"]);
        let matcher = Matcher::new(&dests, &config);
        assert_eq!(matcher.direct_name_match(&matcher.resolve_name("Ei")), None);
    }

    #[test]
    fn direct_match_prefers_first_destination() {
        let config = MatchConfig::plain();
        let dests = destinations(&["Hu Tao", "Tao"]);
        let matcher = Matcher::new(&dests, &config);
        let result = matcher.match_folder(&missing_source("Hu Tao Tao Outfit"));
        assert_eq!(result.destination.as_deref(), Some("Hu Tao"));
        assert_eq!(result.reason, MatchReason::DirectName);
        assert_eq!(result.confidence, 100);

        let dests = destinations(&["Tao", "Hu Tao"]);
        let matcher = Matcher::new(&dests, &config);
        let result = matcher.match_folder(&missing_source("Hu Tao Tao Outfit"));
        assert_eq!(result.destination.as_deref(), Some("Tao"));
    }

    #[test]
    fn scenario_direct_matches_with_aliases_and_skip_words() {
        let config = MatchConfig::plain()
            .with_aliases(AliasTable::from_pairs(&[("ei", "Raiden Shogun")]))
            .with_skip_words(vec!["Skin".to_string(), "Pack".to_string(), "v2".to_string()])
            .with_ignore_numbers(true);
        let dests = destinations(&["Ganyu", "Raiden Shogun"]);
        let matcher = Matcher::new(&dests, &config);

        let ganyu = matcher.match_folder(&missing_source("Ganyu Skin Pack"));
        assert_eq!(ganyu.destination.as_deref(), Some("Ganyu"));
        assert_eq!(ganyu.reason, MatchReason::DirectName);
        assert_eq!(ganyu.confidence, 100);

        let raiden = matcher.match_folder(&missing_source("xEiSkin_v2"));
        assert_eq!(raiden.destination.as_deref(), Some("Raiden Shogun"));
        assert_eq!(raiden.confidence, 100);
        assert_eq!(raiden.reason, MatchReason::DirectName);
    }

    #[test]
    fn fuzzy_identical_name_scores_full_confidence() {
        let config = MatchConfig::plain();
        let dests = destinations(&["Keqing"]);
        let matcher = Matcher::new(&dests, &config);
        assert_eq!(matcher.fuzzy_match("Keqing"), Some(("Keqing", 100)));
    }

    #[test]
    fn fuzzy_match_finds_misspelled_name() {
        let config = MatchConfig::plain();
        let dests = destinations(&["Ganyu", "Keqing"]);
        let matcher = Matcher::new(&dests, &config);

        let result = matcher.match_folder(&missing_source("Keqinq Outfit"));
        assert_eq!(result.destination.as_deref(), Some("Keqing"));
        assert_eq!(result.reason, MatchReason::Fuzzy);
        // 2 * 5 common characters out of 13
        assert_eq!(result.confidence, 77);
    }

    #[test]
    fn fuzzy_ties_keep_first_destination() {
        let config = MatchConfig::plain();
        let dests = destinations(&["Abce", "Abcf"]);
        let matcher = Matcher::new(&dests, &config);
        assert_eq!(matcher.fuzzy_match("Abcd"), Some(("Abce", 75)));
    }

    #[test]
    fn no_similarity_is_not_found() {
        let config = MatchConfig::plain();
        let dests = destinations(&["Ganyu"]);
        let matcher = Matcher::new(&dests, &config);

        let result = matcher.match_folder(&missing_source("zzzz"));
        assert_eq!(result.destination, None);
        assert_eq!(result.destination_name(), "Not Found");
        assert_eq!(result.confidence, 0);
        assert_eq!(result.reason, MatchReason::NoMatch);
    }

    #[test]
    fn empty_resolved_name_is_not_found() {
        let config = MatchConfig::plain().with_skip_words(vec!["mod".to_string()]);
        let dests = destinations(&["Ganyu"]);
        let matcher = Matcher::new(&dests, &config);
        let result = matcher.match_folder(&missing_source("Mod"));
        assert_eq!(result.reason, MatchReason::NoMatch);
    }

    #[test]
    fn empty_destination_names_are_ignored() {
        let config = MatchConfig::plain();
        let dests = destinations(&["", "  ", "Ganyu"]);
        let matcher = Matcher::new(&dests, &config);
        assert_eq!(matcher.fuzzy_match("Ganyu"), Some(("Ganyu", 100)));
        assert_eq!(matcher.direct_name_match("Ganyu"), Some("Ganyu"));
    }

    #[test]
    fn content_match_on_exact_subfolder_name() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("Random Mod 1234");
        fs::create_dir_all(root.join("files/KEQING")).unwrap();

        let config = MatchConfig::plain();
        let dests = destinations(&["Ganyu", "Keqing"]);
        let matcher = Matcher::new(&dests, &config);

        let result = matcher.match_folder(&source(&root));
        assert_eq!(result.destination.as_deref(), Some("Keqing"));
        assert_eq!(result.reason, MatchReason::Content);
        assert_eq!(result.confidence, 100);
    }

    #[test]
    fn content_match_on_aliased_subfolder() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("Summer Pack");
        fs::create_dir_all(root.join("Raiden_Ei_Swimsuit")).unwrap();

        let config = MatchConfig::default();
        let dests = destinations(&["Ganyu", "Raiden Shogun"]);
        let matcher = Matcher::new(&dests, &config);

        assert_eq!(matcher.content_match(&root), Some("Raiden Shogun"));
    }

    #[test]
    fn content_match_on_allowed_file_stem() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("Outfit");
        fs::create_dir_all(root.join("a/b")).unwrap();
        File::create(root.join("a/b/GanyuBody.ini")).unwrap();

        let config = MatchConfig::plain().with_extensions(&[".ini".to_string()]);
        let dests = destinations(&["Keqing", "Ganyu"]);
        let matcher = Matcher::new(&dests, &config);

        assert_eq!(matcher.content_match(&root), Some("Ganyu"));
    }

    #[test]
    fn content_match_ignores_files_outside_allow_list() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("zzzz");
        fs::create_dir_all(&root).unwrap();
        File::create(root.join("ganyu.txt")).unwrap();

        let config = MatchConfig::plain().with_extensions(&[".ini".to_string()]);
        let dests = destinations(&["Ganyu"]);
        let matcher = Matcher::new(&dests, &config);

        assert_eq!(matcher.content_match(&root), None);
        assert_eq!(matcher.match_folder(&source(&root)).reason, MatchReason::NoMatch);
    }

    #[test]
    fn content_match_without_extensions_skips_files() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("zzzz");
        fs::create_dir_all(&root).unwrap();
        File::create(root.join("ganyu.ini")).unwrap();

        let config = MatchConfig::plain().with_extensions(&[]);
        let dests = destinations(&["Ganyu"]);
        let matcher = Matcher::new(&dests, &config);

        assert_eq!(matcher.content_match(&root), None);
    }

    #[test]
    fn content_match_uses_destination_order() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("Bundle");
        fs::create_dir_all(root.join("Ganyu")).unwrap();
        File::create(root.join("keqing.ini")).unwrap();

        let config = MatchConfig::plain().with_extensions(&[".ini".to_string()]);

        let dests = destinations(&["Keqing", "Ganyu"]);
        assert_eq!(Matcher::new(&dests, &config).content_match(&root), Some("Keqing"));

        let dests = destinations(&["Ganyu", "Keqing"]);
        assert_eq!(Matcher::new(&dests, &config).content_match(&root), Some("Ganyu"));
    }

    #[test]
    fn content_match_lists_children_of_deepest_folder() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("Deep");
        fs::create_dir_all(root.join("1/2/3/4/5/Ganyu")).unwrap();
        fs::create_dir_all(root.join("1/2/3/4/5/6/Keqing")).unwrap();

        let config = MatchConfig::plain();

        let dests = destinations(&["Ganyu"]);
        assert_eq!(Matcher::new(&dests, &config).content_match(&root), Some("Ganyu"));

        let dests = destinations(&["Keqing"]);
        assert_eq!(Matcher::new(&dests, &config).content_match(&root), None);
    }
}
