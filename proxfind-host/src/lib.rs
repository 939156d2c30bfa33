//! Reference host for the ProxFind core.
//!
//! Owns a text document the way a browser tab owns a page: splits it into
//! block regions, answers protocol requests against it, and keeps the
//! highlight and focus state the core itself never holds.

pub mod defaults;
pub mod display;
pub mod logging;
pub mod regions;
pub mod session;

pub use regions::{discover_regions, DocumentRegions};
pub use session::Session;
