//! ProxFind Core - proximity search over rendered document text
//!
//! Finds places in a piece of text where every search term occurs close together,
//! ranks them by how tightly the terms cluster, and builds a highlighted excerpt
//! for each. The host owns the document: it hands over `(region id, text)` pairs
//! and gets plain match descriptors back.
//!
//! Types are exported via UniFFI proc-macros (#[derive(uniffi::Record/Enum)]).

pub(crate) mod candidate;
pub mod config;
pub mod coverage;
pub mod excerpt;
pub mod finder;
pub mod interface;
pub mod occurrence;
pub mod protocol;
pub mod ranking;
pub mod search;
pub mod tokenizer;

pub use config::{parse_terms, SearchConfiguration};
pub use finder::ProxFinder;
pub use interface::*;

uniffi::setup_scaffolding!("proxfind");
