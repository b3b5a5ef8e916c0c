//! Case-insensitive substring matching for mute and show words.
//!
//! Plain substring semantics: "cat" matches "category". There is no
//! tokenization and no word-boundary handling.

/// Whether `haystack` contains any of `needles`, ignoring case.
///
/// An empty needle list never matches.
pub fn contains_any<S: AsRef<str>>(haystack: &str, needles: &[S]) -> bool {
    first_match(haystack, needles).is_some()
}

/// The first of `needles` (in list order) that `haystack` contains,
/// ignoring case.
pub fn first_match<'a, S: AsRef<str>>(haystack: &str, needles: &'a [S]) -> Option<&'a str> {
    if needles.is_empty() {
        return None;
    }
    let haystack = haystack.to_lowercase();
    needles
        .iter()
        .map(AsRef::as_ref)
        .find(|needle| haystack.contains(&needle.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_never_matches() {
        let none: [&str; 0] = [];
        assert!(!contains_any("anything at all", &none));
        assert!(!contains_any("", &none));
    }

    #[test]
    fn case_insensitive_both_ways() {
        assert!(contains_any("Crypto is the FUTURE", &["crypto"]));
        assert!(contains_any("crypto", &["CRYPTO"]));
    }

    #[test]
    fn substring_not_word() {
        assert!(contains_any("a new category of tools", &["cat"]));
        assert!(!contains_any("dog", &["cat"]));
    }

    #[test]
    fn first_match_respects_list_order() {
        let words = vec!["zeta".to_string(), "alpha".to_string()];
        assert_eq!(first_match("alpha and zeta", &words), Some("zeta"));
        assert_eq!(first_match("only alpha", &words), Some("alpha"));
        assert_eq!(first_match("neither", &words), None);
    }

    #[test]
    fn non_ascii_lowercasing() {
        assert!(contains_any("ÜBER hiring", &["über"]));
    }
}
