//! JSON message protocol between a host's UI and the side that owns the document.
//!
//! Requests are tagged by `type`; responses are told apart by their fields:
//! ```text
//! → {"type":"proxfind.search","options":{"terms":["quick","fox"],"maxWordsBetween":3}}
//! ← {"results":[{"elementId":"prox-4","betweenWords":1,"snippetHTML":"…","tag":"p"}]}
//! → {"type":"proxfind.scrollTo","id":"prox-4"}
//! ← {"ok":true}
//! ```

use crate::config::SearchConfiguration;
use crate::interface::{Match, ProxFindError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HostRequest {
    #[serde(rename = "proxfind.search")]
    Search {
        #[serde(default)]
        options: SearchConfiguration,
    },
    #[serde(rename = "proxfind.clear")]
    Clear,
    #[serde(rename = "proxfind.scrollTo")]
    ScrollTo { id: String },
}

impl HostRequest {
    pub fn from_json(line: &str) -> Result<Self, ProxFindError> {
        Ok(serde_json::from_str(line)?)
    }

    pub fn to_json(&self) -> Result<String, ProxFindError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// One result row as the UI renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    #[serde(rename = "elementId")]
    pub element_id: String,
    #[serde(rename = "betweenWords")]
    pub between_words: u64,
    #[serde(rename = "snippetHTML")]
    pub snippet_html: String,
    pub tag: String,
}

impl From<&Match> for MatchSummary {
    fn from(m: &Match) -> Self {
        Self {
            element_id: m.region_id.clone(),
            between_words: m.between_words,
            snippet_html: m.excerpt.clone(),
            tag: m.region_kind.tag().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HostResponse {
    Results { results: Vec<MatchSummary> },
    Ack { ok: bool },
    Error { error: String },
}

impl HostResponse {
    pub fn results(matches: &[Match]) -> Self {
        HostResponse::Results {
            results: matches.iter().map(MatchSummary::from).collect(),
        }
    }

    pub fn ok() -> Self {
        HostResponse::Ack { ok: true }
    }

    pub fn error(e: impl std::fmt::Display) -> Self {
        HostResponse::Error { error: e.to_string() }
    }

    pub fn from_json(line: &str) -> Result<Self, ProxFindError> {
        Ok(serde_json::from_str(line)?)
    }

    pub fn to_json(&self) -> Result<String, ProxFindError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::RegionKind;

    #[test]
    fn test_parse_search_request() {
        let req = HostRequest::from_json(
            r#"{"type":"proxfind.search","options":{"terms":["quick","fox"],"maxWordsBetween":3,"orderMatters":true}}"#,
        )
        .unwrap();
        match req {
            HostRequest::Search { options } => {
                assert_eq!(options.terms, vec!["quick", "fox"]);
                assert_eq!(options.max_words_between, 3);
                assert!(options.order_matters);
                assert!(options.same_block);
            }
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[test]
    fn test_search_without_options_uses_defaults() {
        let req = HostRequest::from_json(r#"{"type":"proxfind.search"}"#).unwrap();
        assert_eq!(req, HostRequest::Search { options: SearchConfiguration::default() });
    }

    #[test]
    fn test_parse_clear_and_scroll() {
        assert_eq!(HostRequest::from_json(r#"{"type":"proxfind.clear"}"#).unwrap(), HostRequest::Clear);
        assert_eq!(
            HostRequest::from_json(r#"{"type":"proxfind.scrollTo","id":"prox-7"}"#).unwrap(),
            HostRequest::ScrollTo { id: "prox-7".into() }
        );
    }

    #[test]
    fn test_unknown_request_is_protocol_error() {
        let err = HostRequest::from_json(r#"{"type":"proxfind.explode"}"#).unwrap_err();
        assert!(matches!(err, ProxFindError::Protocol(_)));
        let err = HostRequest::from_json("not json").unwrap_err();
        assert!(matches!(err, ProxFindError::Protocol(_)));
    }

    #[test]
    fn test_response_shapes() {
        let m = Match {
            region_id: "prox-4".into(),
            region_kind: RegionKind::ListItem,
            between_words: 1,
            token_span: 2,
            span_start: 4,
            span_end: 19,
            excerpt: "<span class=\"mark\">quick</span> brown".into(),
            excerpt_text: "quick brown".into(),
            excerpt_highlights: Vec::new(),
        };
        let json = HostResponse::results(&[m]).to_json().unwrap();
        assert_eq!(
            json,
            r#"{"results":[{"elementId":"prox-4","betweenWords":1,"snippetHTML":"<span class=\"mark\">quick</span> brown","tag":"li"}]}"#
        );
        assert_eq!(HostResponse::ok().to_json().unwrap(), r#"{"ok":true}"#);
        assert_eq!(HostResponse::error("boom").to_json().unwrap(), r#"{"error":"boom"}"#);
    }

    #[test]
    fn test_response_decodes_by_shape() {
        assert_eq!(HostResponse::from_json(r#"{"ok":true}"#).unwrap(), HostResponse::ok());
        assert_eq!(
            HostResponse::from_json(r#"{"results":[]}"#).unwrap(),
            HostResponse::Results { results: vec![] }
        );
        assert_eq!(
            HostResponse::from_json(r#"{"error":"x"}"#).unwrap(),
            HostResponse::error("x")
        );
    }
}
