//! ProxFind FFI Interface Definition
//!
//! This file defines the public interface exposed to hosts via UniFFI.
//! It acts as the source of truth for shared types.

use crate::config::SearchConfiguration;
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// ENUMS
// ═══════════════════════════════════════════════════════════════════════════════

/// What kind of container a region came from. Hosts map their own element types
/// onto these; the only thing the core does with a kind is rank by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, uniffi::Enum)]
pub enum RegionKind {
    Paragraph,
    ListItem,
    TableCell,
    Blockquote,
    Preformatted,
    Heading { level: u8 },
    Article,
    Section,
    DefinitionTerm,
    DefinitionDescription,
    /// A generic container holding enough text to be searched on its own
    Container,
    /// The whole document, used when block-level search is turned off
    Document,
}

impl RegionKind {
    /// Ranking priority among equally tight matches (lower ranks first).
    /// Paragraphs, then list items, then table cells, then everything else.
    pub fn priority(&self) -> u8 {
        match self {
            RegionKind::Paragraph => 0,
            RegionKind::ListItem => 1,
            RegionKind::TableCell => 2,
            _ => 3,
        }
    }

    /// HTML-style tag name, as shown next to results.
    pub fn tag(&self) -> &'static str {
        match self {
            RegionKind::Paragraph => "p",
            RegionKind::ListItem => "li",
            RegionKind::TableCell => "td",
            RegionKind::Blockquote => "blockquote",
            RegionKind::Preformatted => "pre",
            RegionKind::Heading { level } => match level {
                0 | 1 => "h1",
                2 => "h2",
                3 => "h3",
                4 => "h4",
                5 => "h5",
                _ => "h6",
            },
            RegionKind::Article => "article",
            RegionKind::Section => "section",
            RegionKind::DefinitionTerm => "dt",
            RegionKind::DefinitionDescription => "dd",
            RegionKind::Container => "div",
            RegionKind::Document => "body",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RECORDS (Structs)
// ═══════════════════════════════════════════════════════════════════════════════

/// A searchable piece of the host's document
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct Region {
    /// Host-assigned identity, echoed back on matches
    pub id: String,
    pub text: String,
    pub kind: RegionKind,
}

impl Region {
    pub fn new(id: impl Into<String>, text: impl Into<String>, kind: RegionKind) -> Self {
        Self { id: id.into(), text: text.into(), kind }
    }
}

/// A highlight range in character (not byte) offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Record)]
pub struct HighlightRange {
    pub start: u64,
    pub end: u64,
}

/// The best proximity match found in one region
///
/// # Excerpt contract
/// - `excerpt_text` is the window padded by 80 characters per side, whitespace
///   collapsed, with a `"… "` prefix / `" …"` suffix when the region continues
///   beyond the excerpt.
/// - `excerpt_highlights` index `excerpt_text` in characters, ellipsis included.
/// - `excerpt` is `excerpt_text` with each highlight wrapped in the finder's markup
///   (HTML-escaped when the markup is HTML).
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct Match {
    pub region_id: String,
    pub region_kind: RegionKind,
    /// Non-term words inside the best window (0 = terms adjacent)
    pub between_words: u64,
    /// Token distance from the first to the last term of the window
    pub token_span: u64,
    /// Character offsets of the window in the region text
    pub span_start: u64,
    pub span_end: u64,
    pub excerpt: String,
    pub excerpt_text: String,
    pub excerpt_highlights: Vec<HighlightRange>,
}

/// Search result container
#[derive(Debug, Clone, PartialEq, Eq, Default, uniffi::Record)]
pub struct SearchOutcome {
    /// Ranked matches, tightest first
    pub matches: Vec<Match>,
    pub searched_regions: u64,
    /// False when no search ran because the term list was empty
    pub performed: bool,
}

/// Error type for ProxFind operations
#[derive(Debug, Error, uniffi::Error)]
pub enum ProxFindError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Protocol error: {0}")]
    Protocol(String),
    #[error("Operation cancelled")]
    Cancelled,
}

impl From<serde_json::Error> for ProxFindError {
    fn from(e: serde_json::Error) -> Self {
        ProxFindError::Protocol(e.to_string())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SERVICE INTERFACE
// ═══════════════════════════════════════════════════════════════════════════════

/// The primary interface a host uses to run proximity searches.
/// This matches the functionality exposed by the `ProxFinder` object.
#[uniffi::export(with_foreign)]
#[async_trait::async_trait]
pub trait ProxFinderApi: Send + Sync {
    /// Search `regions` for places where every configured term occurs close together.
    /// An empty term list returns an outcome with `performed == false`.
    async fn search(
        &self,
        config: SearchConfiguration,
        regions: Vec<Region>,
    ) -> Result<SearchOutcome, ProxFindError>;

    /// Character ranges of every term match in `text`, for painting highlights
    /// into the host's live document.
    fn highlight_ranges(&self, text: String, config: SearchConfiguration) -> Vec<HighlightRange>;

    /// Split a comma-separated terms field into trimmed, non-empty terms.
    fn parse_terms(&self, raw: String) -> Vec<String>;
}
