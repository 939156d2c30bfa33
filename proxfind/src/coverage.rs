//! Coverage windows: spans of tokens that contain every term.
//!
//! Classic minimum-window-covering-all-categories, except that every window seen
//! while shrinking is a candidate, not only the global minimum. The left pointer
//! never moves backwards, so pointer work is linear in the number of occurrences.

use crate::occurrence::{Occurrence, Occurrences};

/// A span `[left, right]` of token indices containing at least one occurrence of
/// every term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub left: usize,
    pub right: usize,
    /// Tokens in the span beyond the one-per-term minimum.
    pub between_words: usize,
}

impl Window {
    pub fn token_span(&self) -> usize {
        self.right - self.left
    }
}

/// Limits a window must satisfy to be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConstraints {
    pub max_words_between: usize,
    pub order_matters: bool,
}

/// Words between the bounding occurrences, assuming one token per term.
pub fn between_words(left: usize, right: usize, term_count: usize) -> usize {
    (right - left).saturating_sub(term_count.saturating_sub(1))
}

/// First appearance of each distinct term, scanning left to right, must be
/// exactly `0, 1, .., n-1`. `seen` is scratch space sized to the term count.
fn first_seen_in_term_order(occurrences: &[Occurrence], seen: &mut [bool]) -> bool {
    seen.fill(false);
    let mut expected = 0;
    for occ in occurrences {
        if seen[occ.term] {
            continue;
        }
        seen[occ.term] = true;
        if occ.term != expected {
            return false;
        }
        expected += 1;
    }
    true
}

/// Enumerate qualifying windows over a region's occurrences, in discovery order.
pub fn find_windows(occurrences: &Occurrences, constraints: WindowConstraints) -> Vec<Window> {
    let term_count = occurrences.term_count();
    if !occurrences.all_terms_present() {
        return Vec::new();
    }

    let merged = occurrences.merged();
    let check_order = constraints.order_matters && term_count >= 2;

    let mut have = vec![0usize; term_count];
    let mut seen = vec![false; term_count];
    let mut covered = 0;
    let mut left = 0;
    let mut windows = Vec::new();

    for right in 0..merged.len() {
        let r = merged[right];
        if have[r.term] == 0 {
            covered += 1;
        }
        have[r.term] += 1;

        while covered == term_count {
            let l = merged[left];
            let between = between_words(l.token, r.token, term_count);

            if between <= constraints.max_words_between
                && (!check_order || first_seen_in_term_order(&merged[left..=right], &mut seen))
            {
                windows.push(Window {
                    left: l.token,
                    right: r.token,
                    between_words: between,
                });
            }

            have[l.term] -= 1;
            if have[l.term] == 0 {
                covered -= 1;
            }
            left += 1;
        }
    }

    windows
}
