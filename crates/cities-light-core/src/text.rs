// crates/cities-light-core/src/text.rs

//! # Text Normalizer
//!
//! Pure string helpers shared by derivation, indexing and lookups:
//! - [`to_ascii`]: NFKD decomposition with every non-ASCII codepoint dropped.
//! - [`to_search_key`]: lowercase, alphanumeric-only projection of [`to_ascii`].
//! - [`slugify`]: URL slug built from an already-ASCII name.
//! - [`fold_key`]: transliterating fold used for tolerant name lookups.

use unicode_normalization::UnicodeNormalization;

/// Converts `text` to ASCII.
///
/// The input is decomposed with NFKD so accented letters split into a base
/// letter plus combining marks; anything left outside ASCII is dropped, never
/// substituted.
///
/// ```rust
/// use cities_light_core::text::to_ascii;
///
/// assert_eq!(to_ascii("Côte d'Ivoire"), "Cote d'Ivoire");
/// assert_eq!(to_ascii("Paris"), "Paris");
/// // No decomposition for ß, so it disappears.
/// assert_eq!(to_ascii("Straße"), "Strae");
/// ```
pub fn to_ascii(text: &str) -> String {
    if text.is_ascii() {
        return text.to_owned();
    }
    text.nfkd().filter(char::is_ascii).collect()
}

/// Search key of `text`: [`to_ascii`], then only ASCII letters and digits,
/// lowercased.
///
/// ```rust
/// use cities_light_core::text::to_search_key;
///
/// assert_eq!(to_search_key("Paris Texas"), "paristexas");
/// assert_eq!(to_search_key("Saint-Étienne"), "saintetienne");
/// assert_eq!(to_search_key(""), "");
/// ```
pub fn to_search_key(text: &str) -> String {
    to_ascii(text)
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Builds a slug from `text`, truncated to `max_len` bytes.
///
/// Word characters, whitespace and hyphens survive; runs of whitespace and
/// hyphens collapse into a single `-`.
pub fn slugify(text: &str, max_len: usize) -> String {
    let mut out = String::with_capacity(text.len().min(max_len));
    let mut pending_dash = false;

    for ch in to_ascii(text).chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch.to_ascii_lowercase());
        } else if ch == '-' || ch.is_ascii_whitespace() {
            pending_dash = true;
        }
        // everything else is stripped
    }

    if out.len() > max_len {
        out.truncate(max_len);
        while out.ends_with('-') {
            out.pop();
        }
    }
    out
}

/// Folded comparison key: transliterate with `deunicode`, then lowercase.
///
/// Unlike [`to_ascii`], letters without a decomposition are transliterated
/// (`Łódź` → `lodz`), so this is only used for tolerant lookups, never for
/// stored fields.
pub fn fold_key(s: &str) -> String {
    deunicode::deunicode(s).to_lowercase()
}

/// Compares two strings for equality after [`fold_key`].
pub fn equals_folded(a: &str, b: &str) -> bool {
    fold_key(a) == fold_key(b)
}

/// Splits a comma-separated alternate names field, dropping blanks.
pub fn split_alternate_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn ascii_drops_marks_and_keeps_ascii() {
        assert_eq!(to_ascii("Côte d'Ivoire"), "Cote d'Ivoire");
        assert_eq!(to_ascii("Zürich"), "Zurich");
        assert_eq!(to_ascii("São Tomé"), "Sao Tome");
        assert_eq!(to_ascii("plain ascii 123"), "plain ascii 123");
    }

    #[test]
    fn ascii_drops_scripts_without_decomposition() {
        assert_eq!(to_ascii("北京"), "");
        assert_eq!(to_ascii("Łódź"), "odz");
    }

    #[test]
    fn ascii_expands_compatibility_forms() {
        // NFKD maps the ligature to two letters
        assert_eq!(to_ascii("ﬁnd"), "find");
    }

    #[test]
    fn search_key_examples() {
        assert_eq!(to_search_key("Paris Texas"), "paristexas");
        assert_eq!(to_search_key("St. John's"), "stjohns");
        assert_eq!(to_search_key("Aïn_Témouchent 2"), "aintemouchent2");
        assert_eq!(to_search_key(""), "");
        assert_eq!(to_search_key("  --  "), "");
    }

    #[test]
    fn slug_collapses_separators() {
        assert_eq!(slugify("Cote d'Ivoire", 50), "cote-divoire");
        assert_eq!(slugify("  New   York - City ", 50), "new-york-city");
        assert_eq!(slugify("Bosnia and Herzegovina", 10), "bosnia-and");
        assert_eq!(slugify("Bosnia and", 7), "bosnia");
        assert_eq!(slugify("", 50), "");
    }

    #[test]
    fn fold_key_transliterates() {
        assert_eq!(fold_key("Łódź"), "lodz");
        assert!(equals_folded("MÜNCHEN", "munchen"));
        assert!(!equals_folded("Berlin", "Paris"));
    }

    #[test]
    fn alternate_names_split() {
        assert_eq!(
            split_alternate_names("Lutetia, Paname,, "),
            vec!["Lutetia".to_string(), "Paname".to_string()]
        );
        assert!(split_alternate_names("").is_empty());
    }

    proptest! {
        #[test]
        fn to_ascii_is_idempotent(s in "\\PC*") {
            let once = to_ascii(&s);
            prop_assert_eq!(to_ascii(&once), once.clone());
            prop_assert!(once.is_ascii());
        }

        #[test]
        fn search_key_alphabet(s in "\\PC*") {
            let key = to_search_key(&s);
            prop_assert!(key.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        }

        #[test]
        fn slug_respects_max_len(s in "\\PC*", max in 1usize..60) {
            prop_assert!(slugify(&s, max).len() <= max);
        }
    }
}
