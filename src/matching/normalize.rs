//! Folder name normalization.

use crate::matching::types::NormalizedName;

/// Normalize a raw folder or file name for matching.
///
/// Steps, in order:
/// transliterate to ASCII, lowercase and trim, remove every skip word,
/// strip digits (unless the name is purely numeric) when `ignore_numbers` is set,
/// turn `_` and `-` into spaces, collapse whitespace, and title-case each word.
///
/// Skip words are compared in lowercase since the name has already been lowercased.
/// The result may be empty.
///
/// ```rust
/// use modmatch::matching::normalize;
///
/// let skip_words = vec!["skin".to_string(), "pack".to_string()];
/// let name = normalize("Ganyu_Skin-Pack 2", &skip_words, true);
/// assert_eq!(name.normalized, "Ganyu");
/// ```
#[must_use]
pub fn normalize(raw_name: &str, skip_words: &[String], ignore_numbers: bool) -> NormalizedName {
    let mut name = deunicode::deunicode(raw_name).to_lowercase().trim().to_string();

    for skip_word in skip_words {
        let skip_word = skip_word.to_lowercase();
        if !skip_word.is_empty() {
            name = name.replace(&skip_word, "");
        }
    }

    if ignore_numbers && !is_numeric(&name) {
        name.retain(|c| !c.is_ascii_digit());
    }

    let name = name.replace(['_', '-'], " ");
    let name = name.split_whitespace().collect::<Vec<_>>().join(" ");

    NormalizedName {
        original: raw_name.to_string(),
        normalized: title_case(&name),
    }
}

/// Uppercase every letter that follows a non-letter, lowercase the rest.
fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous_is_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            result.push(c);
            previous_is_letter = false;
        }
    }
    result
}

fn is_numeric(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod normalize_tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn transliterates_non_latin_characters() {
        let result = normalize("Ñoño Café", &[], false);
        assert_eq!(result.normalized, "Nono Cafe");
        assert_eq!(result.original, "Ñoño Café");
    }

    #[test]
    fn removes_skip_words_case_insensitively() {
        let result = normalize("Ganyu Skin Pack", &words(&["Skin", "Pack"]), false);
        assert_eq!(result.normalized, "Ganyu");
    }

    #[test]
    fn skip_words_apply_in_list_order() {
        // Removing "ab" first leaves "c", removing "bc" first leaves "a"
        assert_eq!(normalize("abc", &words(&["ab", "bc"]), false).normalized, "C");
        assert_eq!(normalize("abc", &words(&["bc", "ab"]), false).normalized, "A");
    }

    #[test]
    fn empty_skip_word_is_ignored() {
        let result = normalize("Keqing", &words(&[""]), false);
        assert_eq!(result.normalized, "Keqing");
    }

    #[test]
    fn strips_digits_when_ignoring_numbers() {
        assert_eq!(normalize("Keqing 2024 v3", &[], true).normalized, "Keqing V");
        assert_eq!(normalize("Keqing 2024", &[], false).normalized, "Keqing 2024");
    }

    #[test]
    fn keeps_purely_numeric_names() {
        assert_eq!(normalize("12345", &[], true).normalized, "12345");
    }

    #[test]
    fn separators_become_single_spaces() {
        let result = normalize("  raiden__shogun--mod  ", &[], false);
        assert_eq!(result.normalized, "Raiden Shogun Mod");
    }

    #[test]
    fn title_cases_after_non_letters() {
        assert_eq!(title_case("x2y abc"), "X2Y Abc");
        assert_eq!(title_case("o'neil"), "O'Neil");
    }

    #[test]
    fn result_may_be_empty() {
        let result = normalize("Skin Pack", &words(&["skin", "pack"]), true);
        assert_eq!(result.normalized, "");
    }

    #[test]
    fn normalize_is_idempotent() {
        let skip_words = words(&["skin", "download"]);
        for raw in [
            "Ganyu Skin Pack",
            "xEiSkin_v2",
            "DISABLED Raiden-Shogun (download)",
            "Hu Tao 3.0",
            "Ayaka   FESTIVE",
            "12345",
            "",
        ] {
            let once = normalize(raw, &skip_words, true);
            let twice = normalize(&once.normalized, &skip_words, true);
            assert_eq!(once.normalized, twice.normalized, "not idempotent for '{raw}'");
        }
    }
}
