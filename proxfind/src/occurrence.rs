//! Per-term occurrence indexing over a token stream.
//!
//! Terms are folded once when the matcher is built, so one `TermMatcher` can be
//! shared by every region of a search.

use crate::config::MatchOptions;
use crate::tokenizer::{Token, NON_WORD_CLASS};
use regex::Regex;
use std::sync::OnceLock;

/// A term index paired with the token index where that term matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    pub term: usize,
    pub token: usize,
}

/// Token positions per term, each list strictly increasing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Occurrences {
    per_term: Vec<Vec<usize>>,
}

impl Occurrences {
    pub fn from_lists(per_term: Vec<Vec<usize>>) -> Self {
        Self { per_term }
    }

    pub fn term_count(&self) -> usize {
        self.per_term.len()
    }

    pub fn for_term(&self, term: usize) -> &[usize] {
        self.per_term.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when every term matched at least one token.
    pub fn all_terms_present(&self) -> bool {
        !self.per_term.is_empty() && self.per_term.iter().all(|list| !list.is_empty())
    }

    pub fn total(&self) -> usize {
        self.per_term.iter().map(Vec::len).sum()
    }

    /// All occurrences ordered by token index, then term index.
    pub fn merged(&self) -> Vec<Occurrence> {
        let mut merged: Vec<Occurrence> = self
            .per_term
            .iter()
            .enumerate()
            .flat_map(|(term, tokens)| tokens.iter().map(move |&token| Occurrence { term, token }))
            .collect();
        merged.sort_unstable_by_key(|o| (o.token, o.term));
        merged
    }
}

/// Decides which tokens satisfy which terms.
#[derive(Debug)]
pub struct TermMatcher {
    options: MatchOptions,
    /// Terms folded under `options`, in query order.
    folded: Vec<String>,
    /// Word-boundary patterns for the whole-word text prefilter, built on first use.
    boundary_patterns: OnceLock<Vec<Option<Regex>>>,
}

impl TermMatcher {
    pub fn new(terms: &[String], options: MatchOptions) -> Self {
        let folded = terms.iter().map(|t| options.fold(t).into_owned()).collect();
        Self {
            options,
            folded,
            boundary_patterns: OnceLock::new(),
        }
    }

    pub fn term_count(&self) -> usize {
        self.folded.len()
    }

    pub fn options(&self) -> MatchOptions {
        self.options
    }

    fn token_matches(&self, folded_token: &str, term: &str) -> bool {
        if self.options.whole_word {
            folded_token == term
        } else {
            folded_token.contains(term)
        }
    }

    /// Scan `tokens` once, recording every (term, token) pair that matches.
    pub fn find_occurrences(&self, tokens: &[Token]) -> Occurrences {
        let mut per_term = vec![Vec::new(); self.folded.len()];
        if self.folded.is_empty() {
            return Occurrences { per_term };
        }

        for (index, token) in tokens.iter().enumerate() {
            let folded_token = self.options.fold(&token.text);
            for (term, query) in self.folded.iter().enumerate() {
                if self.token_matches(&folded_token, query) {
                    per_term[term].push(index);
                }
            }
        }

        Occurrences { per_term }
    }

    fn boundary_patterns(&self) -> &[Option<Regex>] {
        self.boundary_patterns.get_or_init(|| {
            self.folded
                .iter()
                .map(|term| match Regex::new(&whole_word_pattern(term)) {
                    Ok(re) => Some(re),
                    Err(e) => {
                        tracing::warn!(term = %term, error = %e, "whole-word prefilter disabled for term");
                        None
                    }
                })
                .collect()
        })
    }

    /// Cheap whole-text check that every term appears at all.
    ///
    /// `haystack` must already be folded under this matcher's options. A `false`
    /// here guarantees `find_occurrences` would leave some term empty. In
    /// whole-word mode a term must sit between non-word chars as the tokenizer
    /// defines them, not as regex `\b` does.
    pub fn prefilter(&self, haystack: &str) -> bool {
        if self.options.whole_word {
            self.boundary_patterns()
                .iter()
                .all(|pattern| pattern.as_ref().map_or(true, |re| re.is_match(haystack)))
        } else {
            self.folded.iter().all(|term| haystack.contains(term.as_str()))
        }
    }
}

/// `term` delimited by text edges or chars the tokenizer never puts in a token.
fn whole_word_pattern(term: &str) -> String {
    format!(
        "(?:^|{class}){term}(?:$|{class})",
        class = NON_WORD_CLASS,
        term = regex::escape(term)
    )
}

/// Compute per-term occurrences for `terms` over `tokens`.
pub fn find_occurrences(tokens: &[Token], terms: &[String], options: MatchOptions) -> Occurrences {
    TermMatcher::new(terms, options).find_occurrences(tokens)
}
