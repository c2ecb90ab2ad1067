// crates/ziptools-core/src/text.rs

//! Key normalization and prefix/suffix generation for the substring namespaces.

use std::collections::HashSet;

/// Normalizes a city name (or a query for one) for the substring namespaces.
#[inline]
pub fn fold_name(s: &str) -> String {
    s.to_lowercase()
}

/// Every non-empty prefix and suffix of `s`, each exactly once.
///
/// Prefixes come first (shortest to longest), then the suffixes not already
/// produced (longest to shortest). Interior substrings are not generated, so
/// `"tlan"` is not an affix of `"atlanta"`. Cuts happen on char boundaries.
pub fn affixes(s: &str) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    let cuts = s
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(s.len()));

    for i in cuts.clone().skip(1) {
        let prefix = &s[..i];
        if seen.insert(prefix) {
            out.push(prefix);
        }
    }
    for i in cuts.filter(|&i| i < s.len()) {
        let suffix = &s[i..];
        if seen.insert(suffix) {
            out.push(suffix);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_then_suffixes() {
        assert_eq!(affixes("abc"), vec!["a", "ab", "abc", "bc", "c"]);
    }

    #[test]
    fn no_interior_substrings() {
        let all = affixes("atlanta");
        assert!(all.contains(&"atl"));
        assert!(all.contains(&"lanta"));
        assert!(all.contains(&"atlanta"));
        assert!(!all.contains(&"tlan"));
    }

    #[test]
    fn repeated_affixes_are_emitted_once() {
        // "a" is both a prefix and a suffix
        let all = affixes("aba");
        assert_eq!(all, vec!["a", "ab", "aba", "ba"]);
        let zip = affixes("11111");
        assert_eq!(zip, vec!["1", "11", "111", "1111", "11111"]);
    }

    #[test]
    fn empty_input_has_no_affixes() {
        assert!(affixes("").is_empty());
    }

    #[test]
    fn multibyte_names_cut_on_char_boundaries() {
        let all = affixes("zürich");
        assert!(all.contains(&"zü"));
        assert!(all.contains(&"ürich"));
        assert_eq!(all.len(), 11);
    }

    #[test]
    fn fold_name_lowercases() {
        assert_eq!(fold_name("North English"), "north english");
    }
}
