//! Per-document host state: regions, highlight marks and focus.
//!
//! The core is stateless; everything a page would keep between messages
//! (which regions are marked, which one was scrolled to, the last result list)
//! lives here.

use crate::regions::DocumentRegions;
use proxfind::protocol::{HostRequest, HostResponse};
use proxfind::{
    HighlightRange, Match, ProxFindError, ProxFinder, ProxFinderApi, Region, SearchConfiguration,
};
use std::collections::BTreeMap;

pub struct Session {
    finder: ProxFinder,
    regions: DocumentRegions,
    /// Region id -> char ranges currently marked in that region
    highlights: BTreeMap<String, Vec<HighlightRange>>,
    focused: Option<String>,
    last_results: Vec<Match>,
}

impl Session {
    pub fn new(document: &str) -> Self {
        Self::with_finder(document, ProxFinder::new())
    }

    pub fn with_finder(document: &str, finder: ProxFinder) -> Self {
        let regions = DocumentRegions::discover(document);
        tracing::debug!(regions = regions.blocks.len(), "document loaded");
        Self {
            finder,
            regions,
            highlights: BTreeMap::new(),
            focused: None,
            last_results: Vec::new(),
        }
    }

    pub fn regions(&self, same_block: bool) -> &[Region] {
        self.regions.view(same_block)
    }

    /// Look a region up by id in either view of the document.
    pub fn region(&self, id: &str) -> Option<&Region> {
        self.regions.find(id)
    }

    pub fn highlights(&self) -> &BTreeMap<String, Vec<HighlightRange>> {
        &self.highlights
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn last_results(&self) -> &[Match] {
        &self.last_results
    }

    /// Run a search against the document. An empty term list returns no results
    /// and leaves existing marks alone.
    pub async fn search(&mut self, mut config: SearchConfiguration) -> Result<Vec<Match>, ProxFindError> {
        config.terms = config.normalized_terms();
        if config.terms.is_empty() {
            return Ok(Vec::new());
        }

        self.clear();

        let regions = self.regions(config.same_block).to_vec();
        let outcome = self.finder.search(config.clone(), regions).await?;

        if config.highlight {
            for m in &outcome.matches {
                let Some(text) = self.region(&m.region_id).map(|r| r.text.clone()) else {
                    continue;
                };
                let ranges = self.finder.highlight_ranges(text, config.clone());
                if ranges.is_empty() {
                    tracing::debug!(region = %m.region_id, "no highlight ranges for matched region");
                    continue;
                }
                self.highlights.insert(m.region_id.clone(), ranges);
            }
        }

        self.last_results = outcome.matches.clone();
        Ok(outcome.matches)
    }

    /// Drop every highlight mark and the focus flash.
    pub fn clear(&mut self) {
        self.highlights.clear();
        self.focused = None;
    }

    /// Focus a region. Unknown ids are ignored.
    pub fn scroll_to(&mut self, id: &str) -> Option<&Region> {
        if self.region(id).is_none() {
            tracing::debug!(id, "scroll target not found");
            return None;
        }
        self.focused = Some(id.to_string());
        self.region(id)
    }

    pub async fn handle(&mut self, request: HostRequest) -> HostResponse {
        match request {
            HostRequest::Search { options } => match self.search(options).await {
                Ok(matches) => HostResponse::results(&matches),
                Err(e) => HostResponse::error(e),
            },
            HostRequest::Clear => {
                self.clear();
                HostResponse::ok()
            }
            HostRequest::ScrollTo { id } => {
                self.scroll_to(&id);
                HostResponse::ok()
            }
        }
    }

    /// Decode one JSON request line and answer it. Malformed input becomes an
    /// `{ "error": ... }` response rather than an `Err`.
    pub async fn handle_line(&mut self, line: &str) -> HostResponse {
        match HostRequest::from_json(line) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                tracing::warn!(error = %e, "rejected malformed request");
                HostResponse::error(e)
            }
        }
    }
}
