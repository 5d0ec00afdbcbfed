//! Alias table mapping name fragments to canonical destination names.

use serde::{Deserialize, Serialize};

/// Ordered alias table.
///
/// Keys are matched as case-insensitive substrings of a normalized name
/// in insertion order; the first key found wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasTable {
    entries: Vec<(String, String)>,
}

impl AliasTable {
    /// Create a table from `(alias, canonical)` pairs, keeping their order.
    #[must_use]
    pub fn new(entries: Vec<(String, String)>) -> Self {
        Self { entries }
    }

    /// Aliases used when the user has not configured any.
    #[must_use]
    pub fn default_aliases() -> Self {
        Self::from_pairs(&[
            ("Raiden", "Raiden Shogun"),
            ("Shogun", "Raiden Shogun"),
            ("Ei", "Raiden Shogun"),
        ])
    }

    #[must_use]
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|(alias, canonical)| ((*alias).to_string(), (*canonical).to_string()))
                .collect(),
        )
    }

    /// Add an alias after the existing ones.
    pub fn push(&mut self, alias: impl Into<String>, canonical: impl Into<String>) {
        self.entries.push((alias.into(), canonical.into()));
    }

    /// Return the canonical name for the first alias contained in `name`,
    /// or `None` if no alias matches. Empty alias keys never match.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.entries
            .iter()
            .find(|(alias, _)| !alias.is_empty() && name.contains(&alias.to_lowercase()))
            .map(|(_, canonical)| canonical.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(alias, canonical)| (alias.as_str(), canonical.as_str()))
    }
}

impl FromIterator<(String, String)> for AliasTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Rewrite a normalized name to its canonical form using the alias table.
///
/// Returns the input unchanged when no alias matches.
///
/// ```rust
/// use modmatch::matching::{AliasTable, resolve_alias};
///
/// let aliases = AliasTable::from_pairs(&[("shogun", "Raiden Shogun"), ("ei", "Raiden Shogun")]);
/// assert_eq!(resolve_alias("Raiden Ei", &aliases), "Raiden Shogun");
/// assert_eq!(resolve_alias("Keqing", &aliases), "Keqing");
/// ```
#[must_use]
pub fn resolve_alias(normalized_name: &str, aliases: &AliasTable) -> String {
    aliases
        .lookup(normalized_name)
        .map_or_else(|| normalized_name.to_string(), ToString::to_string)
}

#[cfg(test)]
mod alias_tests {
    use super::*;

    #[test]
    fn first_matching_key_wins() {
        let aliases = AliasTable::from_pairs(&[("shogun", "Raiden Shogun"), ("ei", "Raiden Shogun")]);
        assert_eq!(resolve_alias("Raiden Ei", &aliases), "Raiden Shogun");

        let aliases = AliasTable::from_pairs(&[("ei", "Eula"), ("raiden", "Raiden Shogun")]);
        assert_eq!(resolve_alias("Raiden Ei", &aliases), "Eula");
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        let aliases = AliasTable::from_pairs(&[("HUTAO", "Hu Tao")]);
        assert_eq!(resolve_alias("Cool Hutao Outfit", &aliases), "Hu Tao");
    }

    #[test]
    fn unmatched_name_is_unchanged() {
        let aliases = AliasTable::default_aliases();
        assert_eq!(resolve_alias("Keqing", &aliases), "Keqing");
    }

    #[test]
    fn empty_table_returns_input() {
        assert_eq!(resolve_alias("Keqing", &AliasTable::default()), "Keqing");
    }

    #[test]
    fn empty_key_never_matches() {
        let aliases = AliasTable::from_pairs(&[("", "Everything"), ("qing", "Keqing")]);
        assert_eq!(resolve_alias("Keqing Mod", &aliases), "Keqing");
    }

    #[test]
    fn push_appends_with_lowest_priority() {
        let mut aliases = AliasTable::from_pairs(&[("ei", "Raiden Shogun")]);
        aliases.push("raiden", "Someone Else");
        assert_eq!(aliases.len(), 2);
        assert_eq!(resolve_alias("Raiden Ei", &aliases), "Raiden Shogun");
    }

    #[test]
    fn deserializes_from_ordered_pairs() {
        #[derive(Deserialize)]
        struct Wrapper {
            aliases: AliasTable,
        }
        let wrapper: Wrapper = toml::from_str(
            r#"aliases = [["Shogun", "Raiden Shogun"], ["Hutao", "Hu Tao"]]"#,
        )
        .expect("should parse aliases");
        let keys: Vec<&str> = wrapper.aliases.iter().map(|(alias, _)| alias).collect();
        assert_eq!(keys, vec!["Shogun", "Hutao"]);
    }
}
