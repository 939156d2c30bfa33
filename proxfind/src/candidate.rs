//! Region candidate with memoized derived state.
//!
//! Module isolation ensures no code outside this module can mutate the region
//! text after construction, so the `OnceLock` caches can never go stale.

use crate::config::MatchOptions;
use crate::interface::Region;
use crate::tokenizer::{tokenize, Token};
use std::sync::OnceLock;

/// A region under evaluation. `folded()` and `tokens()` are computed on first
/// access: regions rejected by the text prefilter never get tokenized.
#[derive(Debug)]
pub struct RegionCandidate<'a> {
    region: &'a Region,
    char_len: OnceLock<usize>,
    folded: OnceLock<String>,
    tokens: OnceLock<Vec<Token>>,
}

impl<'a> RegionCandidate<'a> {
    pub fn new(region: &'a Region) -> Self {
        Self {
            region,
            char_len: OnceLock::new(),
            folded: OnceLock::new(),
            tokens: OnceLock::new(),
        }
    }

    pub fn region(&self) -> &'a Region {
        self.region
    }

    pub fn text(&self) -> &'a str {
        &self.region.text
    }

    pub fn char_len(&self) -> usize {
        *self.char_len.get_or_init(|| self.region.text.chars().count())
    }

    /// Region text folded for comparison under `options`.
    pub fn haystack(&self, options: MatchOptions) -> &str {
        if options.case_sensitive {
            &self.region.text
        } else {
            self.folded.get_or_init(|| options.fold(&self.region.text).into_owned())
        }
    }

    pub fn tokens(&self) -> &[Token] {
        self.tokens.get_or_init(|| tokenize(&self.region.text))
    }

    /// Character offset of byte offset `byte` in the region text.
    pub fn char_offset(&self, byte: usize) -> usize {
        let text = &self.region.text;
        text[..byte.min(text.len())].chars().count()
    }
}
