//! Search configuration as supplied by the host.
//!
//! Field names follow the host's wire format (camelCase) so a saved or
//! messaged configuration round-trips without a translation layer.

use serde::{Deserialize, Serialize};

/// Default proximity limit when the host does not supply one.
pub const DEFAULT_MAX_WORDS_BETWEEN: i64 = 10;

/// User-facing search options.
///
/// `highlight` and `same_block` only matter to the host: the core never paints
/// anything and never decides what a region is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchConfiguration {
    pub terms: Vec<String>,
    /// Maximum number of non-term words allowed inside a match. Negative values clamp to 0.
    pub max_words_between: i64,
    pub whole_word: bool,
    pub case_sensitive: bool,
    pub order_matters: bool,
    pub highlight: bool,
    pub same_block: bool,
}

impl Default for SearchConfiguration {
    fn default() -> Self {
        Self {
            terms: Vec::new(),
            max_words_between: DEFAULT_MAX_WORDS_BETWEEN,
            whole_word: false,
            case_sensitive: false,
            order_matters: false,
            highlight: false,
            same_block: true,
        }
    }
}

impl SearchConfiguration {
    /// Terms with surrounding whitespace removed and blanks dropped, in input order.
    pub fn normalized_terms(&self) -> Vec<String> {
        self.terms
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// The proximity limit as a token count.
    pub fn max_gap(&self) -> usize {
        usize::try_from(self.max_words_between.max(0)).unwrap_or(usize::MAX)
    }

    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            whole_word: self.whole_word,
            case_sensitive: self.case_sensitive,
        }
    }
}

/// The two switches that decide whether a piece of text matches a term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOptions {
    pub whole_word: bool,
    pub case_sensitive: bool,
}

impl MatchOptions {
    /// Fold text for comparison under these options.
    ///
    /// Lower-cases one char at a time, so folding a whole text equals
    /// concatenating the folds of its pieces. Tokens, haystacks and highlight
    /// text all go through here and always agree.
    pub fn fold<'a>(&self, text: &'a str) -> std::borrow::Cow<'a, str> {
        if self.case_sensitive {
            std::borrow::Cow::Borrowed(text)
        } else {
            std::borrow::Cow::Owned(text.chars().flat_map(char::to_lowercase).collect())
        }
    }

    /// Push the fold of a single char onto `out`.
    pub fn fold_char_into(&self, ch: char, out: &mut String) {
        if self.case_sensitive {
            out.push(ch);
        } else {
            out.extend(ch.to_lowercase());
        }
    }
}

/// Split a comma-separated terms field into trimmed, non-empty terms.
pub fn parse_terms(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_terms() {
        assert_eq!(parse_terms("quick, fox"), vec!["quick", "fox"]);
        assert_eq!(parse_terms(" a ,, b ,"), vec!["a", "b"]);
        assert!(parse_terms("  ,  ").is_empty());
        assert!(parse_terms("").is_empty());
    }

    #[test]
    fn test_normalized_terms_drops_blanks() {
        let config = SearchConfiguration {
            terms: vec!["  quick ".into(), "".into(), "   ".into(), "fox".into()],
            ..Default::default()
        };
        assert_eq!(config.normalized_terms(), vec!["quick", "fox"]);
    }

    #[test]
    fn test_negative_gap_clamps_to_zero() {
        let config = SearchConfiguration {
            max_words_between: -5,
            ..Default::default()
        };
        assert_eq!(config.max_gap(), 0);
    }

    #[test]
    fn test_defaults() {
        let config = SearchConfiguration::default();
        assert_eq!(config.max_gap(), 10);
        assert!(config.same_block);
        assert!(!config.highlight);
    }

    #[test]
    fn test_deserialize_fills_missing_fields() {
        let config: SearchConfiguration =
            serde_json::from_str(r#"{"terms":["a","b"],"wholeWord":true}"#).unwrap();
        assert_eq!(config.terms, vec!["a", "b"]);
        assert!(config.whole_word);
        assert_eq!(config.max_words_between, DEFAULT_MAX_WORDS_BETWEEN);
        assert!(config.same_block);
    }

    #[test]
    fn test_serialize_uses_camel_case() {
        let json = serde_json::to_string(&SearchConfiguration::default()).unwrap();
        assert!(json.contains("\"maxWordsBetween\":10"));
        assert!(json.contains("\"caseSensitive\":false"));
        assert!(json.contains("\"sameBlock\":true"));
    }

    #[test]
    fn test_fold() {
        let insensitive = MatchOptions::default();
        assert_eq!(insensitive.fold("Quick"), "quick");
        let sensitive = MatchOptions { case_sensitive: true, ..Default::default() };
        assert_eq!(sensitive.fold("Quick"), "Quick");
    }

    #[test]
    fn test_fold_is_per_char() {
        let options = MatchOptions::default();
        // Final sigma stays σ: a word folds the same alone or inside a sentence.
        assert_eq!(options.fold("ΟΔΟΣ"), "οδοσ");
        assert_eq!(options.fold("ΟΔΟΣ ΟΔΟΣ"), "οδοσ οδοσ");

        let mut out = String::new();
        options.fold_char_into('\u{130}', &mut out);
        assert_eq!(out, "i\u{307}");
    }
}
