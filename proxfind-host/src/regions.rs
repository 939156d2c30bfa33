//! Block discovery over plain-text and markdown documents.
//!
//! Mirrors how a page is carved into searchable elements: each paragraph, list
//! item, table cell, heading, quote and code block becomes one region, so a match
//! never spans two visual blocks. Region ids are `prox-N` in document order.

use once_cell::sync::Lazy;
use proxfind::{Region, RegionKind};
use regex::Regex;

/// Multi-line unstructured blocks longer than this are reported as containers.
pub const CONTAINER_MIN_CHARS: usize = 120;

static HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s{0,3}(#{1,6})\s+(.*?)(?:\s+#+)?\s*$").unwrap()
});

static FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s{0,3}(`{3,}|~{3,})").unwrap()
});

static TABLE_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\|.*\|\s*$").unwrap()
});

static TABLE_SEPARATOR_CELL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^:?-+:?$").unwrap()
});

static LIST_ITEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:[-*+]|\d{1,9}[.)])\s+(.*)$").unwrap()
});

static BLOCKQUOTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s{0,3}>\s?(.*)$").unwrap()
});

static DEFINITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^:\s+(.*)$").unwrap()
});

pub fn region_id(n: usize) -> String {
    format!("prox-{}", n)
}

/// Both views of one document, with ids unique across them: blocks are
/// `prox-1..=N` and the whole-document region is `prox-(N+1)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentRegions {
    pub blocks: Vec<Region>,
    pub whole: Option<Region>,
}

impl DocumentRegions {
    pub fn discover(document: &str) -> Self {
        let blocks = discover_blocks(document);
        let text = document.trim();
        let whole = (!text.is_empty())
            .then(|| Region::new(region_id(blocks.len() + 1), text, RegionKind::Document));
        Self { blocks, whole }
    }

    /// Regions to search. With `same_block` off the whole document is a single
    /// `Document` region, so terms may match across block boundaries.
    pub fn view(&self, same_block: bool) -> &[Region] {
        if same_block {
            &self.blocks
        } else {
            match &self.whole {
                Some(region) => std::slice::from_ref(region),
                None => &[],
            }
        }
    }

    pub fn find(&self, id: &str) -> Option<&Region> {
        self.blocks.iter().chain(self.whole.iter()).find(|r| r.id == id)
    }
}

/// Split `document` into searchable regions; see [`DocumentRegions::view`].
pub fn discover_regions(document: &str, same_block: bool) -> Vec<Region> {
    DocumentRegions::discover(document).view(same_block).to_vec()
}

fn discover_blocks(document: &str) -> Vec<Region> {
    let mut discovery = Discovery::default();
    let mut lines = document.lines();

    while let Some(line) = lines.next() {
        if line.trim().is_empty() {
            discovery.flush();
            continue;
        }

        if let Some(caps) = FENCE.captures(line) {
            discovery.flush();
            let marker = caps[1].to_string();
            let mut body = Vec::new();
            for inner in lines.by_ref() {
                if inner.trim_start().starts_with(&marker) {
                    break;
                }
                body.push(inner);
            }
            discovery.emit(&body.join("\n"), RegionKind::Preformatted);
            continue;
        }

        if let Some(caps) = HEADING.captures(line) {
            discovery.flush();
            let level = caps[1].len() as u8;
            discovery.emit(&caps[2], RegionKind::Heading { level });
            continue;
        }

        if TABLE_ROW.is_match(line) {
            discovery.flush();
            let cells = table_cells(line);
            let separator = cells.iter().all(|cell| TABLE_SEPARATOR_CELL.is_match(cell));
            if !separator {
                for cell in cells {
                    discovery.emit(cell, RegionKind::TableCell);
                }
            }
            continue;
        }

        if let Some(caps) = DEFINITION.captures(line) {
            if discovery.start_definition(&caps[1]) {
                continue;
            }
        }

        if let Some(caps) = BLOCKQUOTE.captures(line) {
            discovery.continue_or_open(RegionKind::Blockquote, &caps[1]);
            continue;
        }

        if let Some(caps) = LIST_ITEM.captures(line) {
            discovery.flush();
            discovery.open(RegionKind::ListItem, &caps[1]);
            continue;
        }

        discovery.continue_or_open(RegionKind::Paragraph, line.trim());
    }

    discovery.flush();
    discovery.regions
}

fn table_cells(line: &str) -> Vec<&str> {
    let row = line.trim();
    let row = row.strip_prefix('|').unwrap_or(row);
    let row = row.strip_suffix('|').unwrap_or(row);
    row.split('|').map(str::trim).collect()
}

/// A block still accumulating lines.
#[derive(Debug)]
struct OpenBlock {
    kind: RegionKind,
    lines: Vec<String>,
}

#[derive(Debug, Default)]
struct Discovery {
    regions: Vec<Region>,
    open: Option<OpenBlock>,
}

impl Discovery {
    fn open(&mut self, kind: RegionKind, first_line: &str) {
        self.open = Some(OpenBlock {
            kind,
            lines: vec![first_line.to_string()],
        });
    }

    /// Plain lines continue any open text block; quote lines only continue a quote.
    fn continue_or_open(&mut self, kind: RegionKind, line: &str) {
        if let Some(block) = self.open.as_mut() {
            let continues = match kind {
                RegionKind::Blockquote => block.kind == RegionKind::Blockquote,
                _ => true,
            };
            if continues {
                block.lines.push(line.to_string());
                return;
            }
        }
        self.flush();
        self.open(kind, line);
    }

    /// `: description` after a single-line paragraph turns that line into a term.
    /// Returns false when the line is not part of a definition list.
    fn start_definition(&mut self, description: &str) -> bool {
        let Some(block) = self.open.take() else {
            return false;
        };
        let kind = block.kind;
        match kind {
            RegionKind::Paragraph if block.lines.len() == 1 => {
                self.emit(&block.lines[0], RegionKind::DefinitionTerm);
            }
            RegionKind::DefinitionDescription => self.close(block),
            _ => {
                self.open = Some(block);
                return false;
            }
        }
        self.open(RegionKind::DefinitionDescription, description);
        true
    }

    fn flush(&mut self) {
        if let Some(block) = self.open.take() {
            self.close(block);
        }
    }

    fn close(&mut self, block: OpenBlock) {
        let text = block.lines.join("\n");
        let kind = match block.kind {
            RegionKind::Paragraph
                if block.lines.len() > 1 && text.chars().count() > CONTAINER_MIN_CHARS =>
            {
                RegionKind::Container
            }
            kind => kind,
        };
        self.emit(&text, kind);
    }

    fn emit(&mut self, text: &str, kind: RegionKind) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let id = region_id(self.regions.len() + 1);
        self.regions.push(Region::new(id, text, kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(regions: &[Region]) -> Vec<(&str, RegionKind)> {
        regions.iter().map(|r| (r.text.as_str(), r.kind)).collect()
    }

    #[test]
    fn test_paragraphs_split_on_blank_lines() {
        let regions = discover_regions("first para\nstill first\n\nsecond para\n", true);
        assert_eq!(
            kinds(&regions),
            vec![
                ("first para\nstill first", RegionKind::Paragraph),
                ("second para", RegionKind::Paragraph),
            ]
        );
        assert_eq!(regions[0].id, "prox-1");
        assert_eq!(regions[1].id, "prox-2");
    }

    #[test]
    fn test_headings_and_list_items() {
        let doc = "# Title #\n- one\n* two\n  wraps here\n3. three\n####### not a heading";
        let regions = discover_regions(doc, true);
        assert_eq!(
            kinds(&regions),
            vec![
                ("Title", RegionKind::Heading { level: 1 }),
                ("one", RegionKind::ListItem),
                ("two\nwraps here", RegionKind::ListItem),
                ("three\n####### not a heading", RegionKind::ListItem),
            ]
        );
    }

    #[test]
    fn test_table_cells_skip_separator_row() {
        let doc = "| Name | Notes |\n|:-----|------:|\n| cache | flushed nightly |";
        let regions = discover_regions(doc, true);
        assert_eq!(
            kinds(&regions),
            vec![
                ("Name", RegionKind::TableCell),
                ("Notes", RegionKind::TableCell),
                ("cache", RegionKind::TableCell),
                ("flushed nightly", RegionKind::TableCell),
            ]
        );
    }

    #[test]
    fn test_fenced_code_is_preformatted() {
        let doc = "intro\n```rust\nlet quick = fox;\n\nlet x = 1;\n```\noutro";
        let regions = discover_regions(doc, true);
        assert_eq!(
            kinds(&regions),
            vec![
                ("intro", RegionKind::Paragraph),
                ("let quick = fox;\n\nlet x = 1;", RegionKind::Preformatted),
                ("outro", RegionKind::Paragraph),
            ]
        );
    }

    #[test]
    fn test_unterminated_fence_runs_to_end() {
        let regions = discover_regions("~~~\ncode\nmore", true);
        assert_eq!(kinds(&regions), vec![("code\nmore", RegionKind::Preformatted)]);
    }

    #[test]
    fn test_blockquote_lines_merge() {
        let doc = "> quoted one\n> quoted two\nplain after";
        let regions = discover_regions(doc, true);
        assert_eq!(
            kinds(&regions),
            vec![("quoted one\nquoted two\nplain after", RegionKind::Blockquote)]
        );

        let doc = "para\n> quote";
        let regions = discover_regions(doc, true);
        assert_eq!(
            kinds(&regions),
            vec![("para", RegionKind::Paragraph), ("quote", RegionKind::Blockquote)]
        );
    }

    #[test]
    fn test_definition_list() {
        let doc = "Cache\n: Stores rebuilt pages\n: Flushed nightly\n\nA: not a definition";
        let regions = discover_regions(doc, true);
        assert_eq!(
            kinds(&regions),
            vec![
                ("Cache", RegionKind::DefinitionTerm),
                ("Stores rebuilt pages", RegionKind::DefinitionDescription),
                ("Flushed nightly", RegionKind::DefinitionDescription),
                ("A: not a definition", RegionKind::Paragraph),
            ]
        );
    }

    #[test]
    fn test_colon_line_after_long_paragraph_is_text() {
        let doc = "line one\nline two\n: trailing";
        let regions = discover_regions(doc, true);
        assert_eq!(
            kinds(&regions),
            vec![("line one\nline two\n: trailing", RegionKind::Paragraph)]
        );
    }

    #[test]
    fn test_long_multiline_block_is_container() {
        let line = "word ".repeat(20);
        let doc = format!("{}\n{}", line.trim(), line.trim());
        let regions = discover_regions(&doc, true);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].kind, RegionKind::Container);

        let single = "word ".repeat(40);
        let regions = discover_regions(&single, true);
        assert_eq!(regions[0].kind, RegionKind::Paragraph);
    }

    #[test]
    fn test_same_block_off_yields_document() {
        let regions = discover_regions("# A\n\npara one\n- item\n", false);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].id, "prox-4");
        assert_eq!(regions[0].kind, RegionKind::Document);
        assert_eq!(regions[0].text, "# A\n\npara one\n- item");

        assert!(discover_regions("  \n ", false).is_empty());
    }

    #[test]
    fn test_ids_are_stable_across_runs() {
        let doc = "a para\n\n- item\n\n| x | y |";
        let first: Vec<String> = discover_regions(doc, true).into_iter().map(|r| r.id).collect();
        let second: Vec<String> = discover_regions(doc, true).into_iter().map(|r| r.id).collect();
        assert_eq!(first, second);
        assert_eq!(first, vec!["prox-1", "prox-2", "prox-3", "prox-4"]);
    }

    #[test]
    fn test_document_region_id_is_distinct_from_blocks() {
        let regions = DocumentRegions::discover("# Notes\n\nquick fox\n");
        let whole = regions.whole.as_ref().unwrap();
        assert_eq!(whole.id, "prox-3");
        assert!(regions.blocks.iter().all(|r| r.id != whole.id));

        assert_eq!(regions.find("prox-1").unwrap().kind, RegionKind::Heading { level: 1 });
        assert_eq!(regions.find("prox-3").unwrap().kind, RegionKind::Document);
        assert!(regions.find("prox-4").is_none());

        assert_eq!(regions.view(false), std::slice::from_ref(whole));
        assert_eq!(regions.view(true).len(), 2);
    }

    #[test]
    fn test_blank_document_has_no_regions() {
        let regions = DocumentRegions::discover(" \n\n ");
        assert!(regions.blocks.is_empty());
        assert!(regions.whole.is_none());
        assert!(regions.view(false).is_empty());
    }
}
