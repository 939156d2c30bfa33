//! Search Engine (prefilter → tokenize → occurrences → windows → best match)
//!
//! Regions are independent, so they are evaluated with rayon. The indexed
//! parallel iterator keeps input order on collect, which the stable global
//! ranking relies on for its tie-break.

use crate::candidate::RegionCandidate;
use crate::config::SearchConfiguration;
use crate::coverage::{find_windows, WindowConstraints};
use crate::excerpt::{build_excerpt, Highlighter, HighlightMarkup};
use crate::interface::{Match, ProxFindError, Region};
use crate::occurrence::TermMatcher;
use crate::ranking::{best_window, rank_matches};
use std::collections::HashSet;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Regions shorter than this (in characters) are never searched.
pub(crate) const MIN_REGION_CHARS: usize = 2;

/// Why a region produced no match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    TooShort,
    /// Some term does not appear anywhere in the text
    PrefilterMiss,
    NoTokens,
    /// Some term matched no token
    MissingTerm,
    /// Every term occurs, but never close enough (or in order)
    NoWindow,
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::TooShort => "too_short",
            Rejection::PrefilterMiss => "prefilter_miss",
            Rejection::NoTokens => "no_tokens",
            Rejection::MissingTerm => "missing_term",
            Rejection::NoWindow => "no_window",
        }
    }
}

/// Everything derived once from the configuration and shared by all regions.
#[derive(Debug)]
pub struct SearchPlan {
    terms: Vec<String>,
    matcher: TermMatcher,
    highlighter: Highlighter,
    constraints: WindowConstraints,
    markup: HighlightMarkup,
}

impl SearchPlan {
    /// `None` when the configuration has no usable terms.
    pub fn new(config: &SearchConfiguration, markup: HighlightMarkup) -> Option<Self> {
        let terms = config.normalized_terms();
        if terms.is_empty() {
            return None;
        }
        let options = config.match_options();
        Some(Self {
            matcher: TermMatcher::new(&terms, options),
            highlighter: Highlighter::new(&terms, options),
            constraints: WindowConstraints {
                max_words_between: config.max_gap(),
                order_matters: config.order_matters,
            },
            markup,
            terms,
        })
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Run the full pipeline on one region.
    pub fn evaluate(&self, region: &Region) -> Result<Match, Rejection> {
        let candidate = RegionCandidate::new(region);
        if candidate.char_len() < MIN_REGION_CHARS {
            return Err(Rejection::TooShort);
        }
        if !self.matcher.prefilter(candidate.haystack(self.matcher.options())) {
            return Err(Rejection::PrefilterMiss);
        }

        let tokens = candidate.tokens();
        if tokens.is_empty() {
            return Err(Rejection::NoTokens);
        }

        let occurrences = self.matcher.find_occurrences(tokens);
        if !occurrences.all_terms_present() {
            return Err(Rejection::MissingTerm);
        }

        let windows = find_windows(&occurrences, self.constraints);
        let best = best_window(&windows).ok_or(Rejection::NoWindow)?;

        let span_start = tokens[best.left].start;
        let span_end = tokens[best.right].end;
        let excerpt = build_excerpt(candidate.text(), span_start, span_end, &self.highlighter);

        Ok(Match {
            region_id: region.id.clone(),
            region_kind: region.kind,
            between_words: best.between_words as u64,
            token_span: best.token_span() as u64,
            span_start: candidate.char_offset(span_start) as u64,
            span_end: candidate.char_offset(span_end) as u64,
            excerpt: excerpt.render(&self.markup),
            excerpt_text: excerpt.text,
            excerpt_highlights: excerpt.highlights,
        })
    }

    fn evaluate_logged(&self, region: &Region) -> Option<Match> {
        match self.evaluate(region) {
            Ok(m) => Some(m),
            Err(reason) => {
                tracing::trace!(region = %region.id, reason = reason.as_str(), "region skipped");
                None
            }
        }
    }
}

/// Search `regions` and return ranked matches, best first.
/// An empty term list, or regions sharing an id, yield no matches.
pub fn search(config: &SearchConfiguration, regions: &[Region]) -> Vec<Match> {
    search_cancellable(config, regions, &HighlightMarkup::default(), &CancellationToken::new())
        .unwrap_or_default()
}

/// Like [`search`], but checks `token` before each region and returns
/// `Cancelled` if it fired. Regions sharing an id are `InvalidInput`.
pub fn search_cancellable(
    config: &SearchConfiguration,
    regions: &[Region],
    markup: &HighlightMarkup,
    token: &CancellationToken,
) -> Result<Vec<Match>, ProxFindError> {
    if token.is_cancelled() {
        return Err(ProxFindError::Cancelled);
    }
    let Some(plan) = SearchPlan::new(config, markup.clone()) else {
        return Ok(Vec::new());
    };
    ensure_unique_ids(regions)?;

    let started = Instant::now();

    use rayon::prelude::*;
    let evaluated: Vec<Option<Match>> = regions
        .par_iter()
        .map(|region| {
            if token.is_cancelled() {
                return Err(ProxFindError::Cancelled);
            }
            Ok(plan.evaluate_logged(region))
        })
        .collect::<Result<Vec<_>, ProxFindError>>()?;

    let mut matches: Vec<Match> = evaluated.into_iter().flatten().collect();
    rank_matches(&mut matches);

    tracing::debug!(
        terms = plan.terms().len(),
        regions = regions.len(),
        matches = matches.len(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "proximity search finished"
    );

    Ok(matches)
}

/// Matches are reported by region id, so two regions may not share one.
fn ensure_unique_ids(regions: &[Region]) -> Result<(), ProxFindError> {
    let mut seen = HashSet::with_capacity(regions.len());
    match regions.iter().find(|r| !seen.insert(r.id.as_str())) {
        Some(duplicate) => Err(ProxFindError::InvalidInput(format!(
            "duplicate region id {:?}",
            duplicate.id
        ))),
        None => Ok(()),
    }
}

/// Character ranges of every term match in `text` under `config`'s matching rules.
pub fn highlight_ranges(text: &str, config: &SearchConfiguration) -> Vec<crate::interface::HighlightRange> {
    Highlighter::new(&config.normalized_terms(), config.match_options()).ranges(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::RegionKind;

    const FOX: &str = "the quick brown fox jumps over the lazy dog";

    fn config(terms: &[&str]) -> SearchConfiguration {
        SearchConfiguration {
            terms: terms.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn paragraph(id: &str, text: &str) -> Region {
        Region::new(id, text, RegionKind::Paragraph)
    }

    fn plan(config: &SearchConfiguration) -> SearchPlan {
        SearchPlan::new(config, HighlightMarkup::default()).unwrap()
    }

    #[test]
    fn test_evaluate_reports_window_and_span() {
        let mut cfg = config(&["quick", "fox"]);
        cfg.whole_word = true;
        cfg.max_words_between = 2;
        let m = plan(&cfg).evaluate(&paragraph("p1", FOX)).unwrap();
        assert_eq!(m.between_words, 1);
        assert_eq!(m.token_span, 2);
        assert_eq!((m.span_start, m.span_end), (4, 19));
        assert_eq!(m.excerpt_text, FOX);
        assert_eq!(m.region_id, "p1");
    }

    #[test]
    fn test_rejection_reasons() {
        let p = plan(&config(&["quick", "dog"]));
        assert_eq!(p.evaluate(&paragraph("a", "q")), Err(Rejection::TooShort));
        assert_eq!(p.evaluate(&paragraph("b", "quick cat")), Err(Rejection::PrefilterMiss));

        let mut cfg = config(&["quick", "dog"]);
        cfg.max_words_between = 2;
        assert_eq!(plan(&cfg).evaluate(&paragraph("c", FOX)), Err(Rejection::NoWindow));

        // Substring prefilter passes across a token boundary, token matching does not.
        let p = plan(&config(&["k b"]));
        assert_eq!(p.evaluate(&paragraph("d", FOX)), Err(Rejection::MissingTerm));

        let p = plan(&config(&["--"]));
        assert_eq!(p.evaluate(&paragraph("e", "-- --")), Err(Rejection::NoTokens));
    }

    #[test]
    fn test_empty_terms_returns_nothing() {
        let regions = vec![paragraph("p1", FOX)];
        assert!(search(&config(&[]), &regions).is_empty());
        assert!(search(&config(&["  ", ""]), &regions).is_empty());
        assert!(SearchPlan::new(&config(&[" "]), HighlightMarkup::default()).is_none());
    }

    #[test]
    fn test_results_ranked_across_regions() {
        let regions = vec![
            Region::new("cell", "fox quick", RegionKind::TableCell),
            Region::new("far", "quick one two three fox", RegionKind::Paragraph),
            Region::new("item", "quick fox", RegionKind::ListItem),
            Region::new("miss", "nothing to see", RegionKind::Paragraph),
            Region::new("para", "quick, fox!", RegionKind::Paragraph),
        ];
        let matches = search(&config(&["quick", "fox"]), &regions);
        let ids: Vec<&str> = matches.iter().map(|m| m.region_id.as_str()).collect();
        assert_eq!(ids, vec!["para", "item", "cell", "far"]);
        assert_eq!(matches[3].between_words, 3);
    }

    #[test]
    fn test_precancelled_token_returns_cancelled() {
        let token = CancellationToken::new();
        token.cancel();
        let result = search_cancellable(
            &config(&["quick"]),
            &[paragraph("p1", FOX)],
            &HighlightMarkup::default(),
            &token,
        );
        assert!(matches!(result, Err(ProxFindError::Cancelled)));
    }

    #[test]
    fn test_excerpt_uses_markup() {
        let regions = vec![paragraph("p1", "a <tag> quick fox")];
        let result = search_cancellable(
            &config(&["quick", "fox"]),
            &regions,
            &HighlightMarkup::plain("**", "**"),
            &CancellationToken::new(),
        )
        .unwrap();
        assert_eq!(result[0].excerpt, "a <tag> **quick** **fox**");
    }

    #[test]
    fn test_highlight_ranges_helper() {
        let mut cfg = config(&["the"]);
        cfg.whole_word = true;
        let ranges = highlight_ranges("The other the", &cfg);
        assert_eq!(ranges.len(), 2);
        assert_eq!((ranges[1].start, ranges[1].end), (10, 13));
    }

    #[test]
    fn test_duplicate_region_ids_are_invalid_input() {
        let regions = vec![paragraph("prox-1", "quick fox"), paragraph("prox-1", "quick red fox")];
        let result = search_cancellable(
            &config(&["quick", "fox"]),
            &regions,
            &HighlightMarkup::default(),
            &CancellationToken::new(),
        );
        match result {
            Err(ProxFindError::InvalidInput(message)) => assert!(message.contains("prox-1")),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_whole_word_finds_tokens_regex_boundaries_miss() {
        let mut cfg = config(&["m\u{b2}", "plot"]);
        cfg.whole_word = true;
        let regions = vec![paragraph("p1", "area of 10 m\u{b2} plot")];
        let matches = search(&cfg, &regions);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].between_words, 0);
        assert_eq!(matches[0].excerpt_highlights.len(), 2);
    }
}
