//! User-facing strings for result lists.

use proxfind::protocol::MatchSummary;

pub const NO_MATCHES: &str = "No proximity matches found.";
pub const NO_TERMS: &str = "Enter at least one term.";

/// `adjacent`, `1 word between`, `N words between`.
pub fn distance_label(between_words: u64) -> String {
    match between_words {
        0 => "adjacent".to_string(),
        1 => "1 word between".to_string(),
        n => format!("{} words between", n),
    }
}

/// `tag • distance` header shown above each excerpt.
pub fn meta_line(summary: &MatchSummary) -> String {
    format!("{} \u{2022} {}", summary.tag, distance_label(summary.between_words))
}

/// Wrap each highlighted char range of `text` in `open`/`close`.
pub fn mark_ranges(text: &str, ranges: &[proxfind::HighlightRange], open: &str, close: &str) -> String {
    let mut out = String::with_capacity(text.len() + ranges.len() * (open.len() + close.len()));
    let mut ranges = ranges.iter().peekable();
    for (i, ch) in text.chars().enumerate() {
        let i = i as u64;
        if let Some(range) = ranges.peek() {
            if range.start == i {
                out.push_str(open);
            }
        }
        out.push(ch);
        if let Some(range) = ranges.peek() {
            if range.end == i + 1 {
                out.push_str(close);
                ranges.next();
            }
        }
    }
    out
}
