//! Directory enumeration for source discovery and content matching.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::matching::error::EngineError;
use crate::matching::types::SourceFolder;

/// Folder name suffixes used for archive bookkeeping, never treated as sources.
pub const RESERVED_SUFFIXES: &[&str] = &[".extracted", ".temp"];

/// Deepest folder level whose entries content matching lists.
///
/// Entries directly inside a folder at this level are still seen,
/// so the walk reaches one level further.
pub const CONTENT_SEARCH_DEPTH: usize = 5;

/// A file or directory found under a source folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentEntry {
    /// Path relative to the walked root.
    pub relative_path: PathBuf,
    pub name: String,
    pub is_dir: bool,
}

/// List the names of the direct sub-directories of `path`, sorted by name.
///
/// # Errors
/// Returns `EngineError::ReadDir` if the directory cannot be read.
pub fn list_subfolders(path: &Path) -> Result<Vec<String>, EngineError> {
    let read_error = |source| EngineError::ReadDir {
        path: path.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(path).map_err(read_error)? {
        let entry = entry.map_err(read_error)?;
        let entry_path = entry.path();
        if entry_path.is_dir()
            && let Ok(name) = crate::get_normalized_dir_name(&entry_path)
        {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// List the source folders under `root`, skipping reserved bookkeeping folders.
///
/// # Errors
/// Returns `EngineError::MissingSourceRoot` if `root` is not a directory,
/// or `EngineError::ReadDir` if it cannot be read.
pub fn list_source_folders(root: &Path) -> Result<Vec<SourceFolder>, EngineError> {
    if !root.is_dir() {
        return Err(EngineError::MissingSourceRoot(root.to_path_buf()));
    }
    let folders = list_subfolders(root)?
        .into_iter()
        .filter(|name| !is_reserved(name))
        .map(|name| SourceFolder {
            path: root.join(&name),
            name,
        })
        .collect();
    Ok(folders)
}

/// Walk `path` and return every entry below it, sorted by name per directory.
///
/// Folders are descended into down to level `max_depth`, so entries up to level `max_depth + 1` are returned.
///
/// Unreadable entries are skipped.
#[must_use]
pub fn list_files_recursive(path: &Path, max_depth: usize) -> Vec<ContentEntry> {
    WalkDir::new(path)
        .min_depth(1)
        .max_depth(max_depth + 1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .map(|entry| ContentEntry {
            relative_path: entry
                .path()
                .strip_prefix(path)
                .unwrap_or_else(|_| entry.path())
                .to_path_buf(),
            name: crate::os_str_to_string(entry.file_name()),
            is_dir: entry.file_type().is_dir(),
        })
        .collect()
}

fn is_reserved(name: &str) -> bool {
    RESERVED_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

#[cfg(test)]
mod scan_tests {
    use super::*;

    use std::fs::File;

    use tempfile::tempdir;

    #[test]
    fn lists_subfolders_sorted_without_files() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("Raiden Shogun")).unwrap();
        fs::create_dir(dir.path().join("Ganyu")).unwrap();
        File::create(dir.path().join("readme.txt")).unwrap();

        let names = list_subfolders(dir.path()).unwrap();
        assert_eq!(names, vec!["Ganyu", "Raiden Shogun"]);
    }

    #[test]
    fn list_subfolders_missing_dir_is_error() {
        let dir = tempdir().unwrap();
        let result = list_subfolders(&dir.path().join("missing"));
        assert!(matches!(result, Err(EngineError::ReadDir { .. })));
    }

    #[test]
    fn source_folders_skip_reserved_suffixes() {
        let dir = tempdir().unwrap();
        for name in ["Keqing Mod", "archives.extracted", "work.temp", "temp"] {
            fs::create_dir(dir.path().join(name)).unwrap();
        }

        let sources = list_source_folders(dir.path()).unwrap();
        let names: Vec<&str> = sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Keqing Mod", "temp"]);
        assert_eq!(sources[0].path, dir.path().join("Keqing Mod"));
    }

    #[test]
    fn source_folders_missing_root() {
        let dir = tempdir().unwrap();
        let result = list_source_folders(&dir.path().join("nope"));
        assert!(matches!(result, Err(EngineError::MissingSourceRoot(_))));
    }

    #[test]
    fn recursive_listing_respects_depth() {
        let dir = tempdir().unwrap();
        let deep = dir.path().join("a/b/c/d/e/f/g");
        fs::create_dir_all(&deep).unwrap();
        File::create(dir.path().join("a/top.ini")).unwrap();
        File::create(dir.path().join("a/b/c/d/e/in_e.ini")).unwrap();
        File::create(deep.join("hidden_deep.ini")).unwrap();

        let entries = list_files_recursive(dir.path(), CONTENT_SEARCH_DEPTH);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();

        assert!(names.contains(&"a"));
        assert!(names.contains(&"e"));
        assert!(names.contains(&"top.ini"));
        // Children of the level 5 folder are listed
        assert!(names.contains(&"f"));
        assert!(names.contains(&"in_e.ini"));
        assert!(!names.contains(&"g"));
        assert!(!names.contains(&"hidden_deep.ini"));

        let top = entries.iter().find(|e| e.name == "top.ini").unwrap();
        assert_eq!(top.relative_path, PathBuf::from("a/top.ini"));
        assert!(!top.is_dir);
    }
}
