//! Excerpt building and term highlighting.
//!
//! An excerpt is the matched window plus a fixed amount of context, with
//! whitespace collapsed and every term match marked. Highlight positions are
//! character offsets so hosts in UTF-16 or UTF-32 land can map them cheaply.

use crate::config::MatchOptions;
use crate::interface::HighlightRange;
use crate::tokenizer::tokenize;
use regex::Regex;

/// Context characters kept on each side of the window.
pub const EXCERPT_CONTEXT_CHARS: usize = 80;

pub const ELLIPSIS_PREFIX: &str = "\u{2026} ";
pub const ELLIPSIS_SUFFIX: &str = " \u{2026}";

/// How highlighted text is wrapped when an excerpt is rendered to a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightMarkup {
    pub open: String,
    pub close: String,
    /// Escape `&`, `<`, `>`, `"` and `'` in the excerpt text itself.
    pub escape_html: bool,
}

impl Default for HighlightMarkup {
    fn default() -> Self {
        Self {
            open: "<span class=\"mark\">".to_string(),
            close: "</span>".to_string(),
            escape_html: true,
        }
    }
}

impl HighlightMarkup {
    /// Plain-text markers, no escaping.
    pub fn plain(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
            escape_html: false,
        }
    }
}

/// A whitespace-normalized slice of region text with highlight ranges into it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Excerpt {
    pub text: String,
    pub highlights: Vec<HighlightRange>,
    pub truncated_start: bool,
    pub truncated_end: bool,
}

impl Excerpt {
    /// Render with each highlight wrapped in `markup`.
    pub fn render(&self, markup: &HighlightMarkup) -> String {
        let mut out = String::with_capacity(self.text.len() + self.highlights.len() * 24);
        let mut ranges = self.highlights.iter().peekable();
        let mut open = false;

        for (i, ch) in self.text.chars().enumerate() {
            let i = i as u64;
            if open && ranges.peek().map_or(false, |r| r.end == i) {
                out.push_str(&markup.close);
                open = false;
                ranges.next();
            }
            if !open && ranges.peek().map_or(false, |r| r.start == i) {
                out.push_str(&markup.open);
                open = true;
            }
            push_char(&mut out, ch, markup.escape_html);
        }
        if open {
            out.push_str(&markup.close);
        }
        out
    }
}

fn push_char(out: &mut String, ch: char, escape_html: bool) {
    if !escape_html {
        out.push(ch);
        return;
    }
    match ch {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        c => out.push(c),
    }
}

/// Finds term matches in free text under the same rules as token matching:
/// the same case fold, and in whole-word mode the same tokens.
#[derive(Debug, Clone)]
pub struct Highlighter {
    options: MatchOptions,
    /// Folded terms, for whole-word token comparison.
    folded: Vec<String>,
    /// Substring-mode alternation over the folded terms.
    pattern: Option<Regex>,
}

impl Highlighter {
    pub fn new(terms: &[String], options: MatchOptions) -> Self {
        let folded: Vec<String> = terms
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(|t| options.fold(t).into_owned())
            .collect();
        let pattern = if options.whole_word {
            None
        } else {
            build_pattern(&folded)
        };
        Self {
            options,
            folded,
            pattern,
        }
    }

    /// Non-overlapping match ranges in `text`, as character offsets, left to right.
    pub fn ranges(&self, text: &str) -> Vec<HighlightRange> {
        if self.folded.is_empty() {
            return Vec::new();
        }
        if self.options.whole_word {
            self.token_ranges(text)
        } else {
            self.substring_ranges(text)
        }
    }

    fn token_ranges(&self, text: &str) -> Vec<HighlightRange> {
        let mut ranges = Vec::new();
        let mut chars_seen = 0usize;
        let mut bytes_seen = 0usize;
        for token in tokenize(text) {
            chars_seen += text[bytes_seen..token.start].chars().count();
            let start = chars_seen;
            chars_seen += token.text.chars().count();
            bytes_seen = token.end;

            let folded = self.options.fold(&token.text);
            if self.folded.iter().any(|term| *term == folded) {
                ranges.push(HighlightRange {
                    start: start as u64,
                    end: chars_seen as u64,
                });
            }
        }
        ranges
    }

    fn substring_ranges(&self, text: &str) -> Vec<HighlightRange> {
        let Some(pattern) = &self.pattern else {
            return Vec::new();
        };

        // Fold char by char, remembering which source char every folded byte came from.
        let mut folded = String::with_capacity(text.len());
        let mut origin = Vec::with_capacity(text.len());
        for (index, ch) in text.chars().enumerate() {
            let before = folded.len();
            self.options.fold_char_into(ch, &mut folded);
            origin.resize(origin.len() + folded.len() - before, index);
        }

        let mut ranges: Vec<HighlightRange> = Vec::new();
        for m in pattern.find_iter(&folded) {
            if m.start() == m.end() {
                continue;
            }
            let mut start = origin[m.start()] as u64;
            let end = origin[m.end() - 1] as u64 + 1;
            if let Some(last) = ranges.last() {
                start = start.max(last.end);
            }
            if start < end {
                ranges.push(HighlightRange { start, end });
            }
        }
        ranges
    }
}

/// One alternation over already-folded terms. Longer terms go first so that at
/// a given position the longest term wins (`foobar` over `foo`).
fn build_pattern(folded: &[String]) -> Option<Regex> {
    let mut sorted: Vec<&str> = folded.iter().map(String::as_str).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by_key(|t| std::cmp::Reverse(t.chars().count()));

    let alternatives: Vec<String> = sorted.iter().map(|t| regex::escape(t)).collect();
    let source = format!("(?:{})", alternatives.join("|"));

    match Regex::new(&source) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(error = %e, "highlight pattern rejected; excerpts will be unmarked");
            None
        }
    }
}

/// Collapse every whitespace run to a single space and trim both ends.
pub fn normalize_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut pending_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            pending_space = !result.is_empty();
            continue;
        }
        if pending_space {
            result.push(' ');
            pending_space = false;
        }
        result.push(ch);
    }
    result
}

/// Byte offset of the `char_index`-th character, or `text.len()` past the end.
fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices().nth(char_index).map_or(text.len(), |(b, _)| b)
}

/// Build the excerpt for the byte span `span_start..span_end` of `text`.
///
/// The span is padded by [`EXCERPT_CONTEXT_CHARS`] characters per side and
/// clamped to the text. Spans are expected to lie on character boundaries
/// (token offsets always do).
pub fn build_excerpt(text: &str, span_start: usize, span_end: usize, highlighter: &Highlighter) -> Excerpt {
    let span_end = span_end.min(text.len());
    let span_start = span_start.min(span_end);

    let start_char = text[..span_start].chars().count();
    let end_char = start_char + text[span_start..span_end].chars().count();
    let total_chars = end_char + text[span_end..].chars().count();

    let from_char = start_char.saturating_sub(EXCERPT_CONTEXT_CHARS);
    let to_char = (end_char + EXCERPT_CONTEXT_CHARS).min(total_chars);
    let from = byte_offset(text, from_char);
    let to = byte_offset(text, to_char);

    let truncated_start = from_char > 0;
    let truncated_end = to_char < total_chars;

    let body = normalize_whitespace(&text[from..to]);
    let mut highlights = highlighter.ranges(&body);

    let mut excerpt_text = String::with_capacity(body.len() + 8);
    if truncated_start {
        excerpt_text.push_str(ELLIPSIS_PREFIX);
        let shift = ELLIPSIS_PREFIX.chars().count() as u64;
        for h in &mut highlights {
            h.start += shift;
            h.end += shift;
        }
    }
    excerpt_text.push_str(&body);
    if truncated_end {
        excerpt_text.push_str(ELLIPSIS_SUFFIX);
    }

    Excerpt {
        text: excerpt_text,
        highlights,
        truncated_start,
        truncated_end,
    }
}
