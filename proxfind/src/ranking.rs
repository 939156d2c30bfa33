//! Lexicographic ranking of windows and matches.
//!
//! Both keys derive `Ord`, so comparison is field order: an earlier field always
//! dominates a later one. Lower is better throughout.

use crate::coverage::Window;
use crate::interface::Match;

/// Window preference within one region.
///
/// Tuple order (most to least important):
/// 1. between_words: fewer non-term words inside the window
/// 2. token_span: shorter overall span
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WindowScore {
    pub between_words: usize,
    pub token_span: usize,
}

impl From<&Window> for WindowScore {
    fn from(w: &Window) -> Self {
        Self {
            between_words: w.between_words,
            token_span: w.token_span(),
        }
    }
}

/// Match preference across regions.
///
/// Tuple order (most to least important):
/// 1. between_words: tightest clustering first
/// 2. kind_priority: paragraphs, list items, table cells, then the rest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchScore {
    pub between_words: u64,
    pub kind_priority: u8,
}

impl From<&Match> for MatchScore {
    fn from(m: &Match) -> Self {
        Self {
            between_words: m.between_words,
            kind_priority: m.region_kind.priority(),
        }
    }
}

/// The preferred window; among equal scores the earliest discovered wins.
pub fn best_window(windows: &[Window]) -> Option<Window> {
    windows.iter().min_by_key(|w| WindowScore::from(*w)).copied()
}

/// Order matches best-first. The sort is stable, so equal scores keep the
/// order in which regions were supplied.
pub fn rank_matches(matches: &mut [Match]) {
    matches.sort_by_key(|m| MatchScore::from(m));
}
