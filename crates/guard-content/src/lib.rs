//! Filter-file content handling for syno-guard
//!
//! Everything in this crate is pure text processing: no filesystem access,
//! no processes. The daemon reads a filter file, asks [`needs_enforcement`]
//! whether anything is missing, and if so runs it through [`ConfigMerger`]
//! to produce the repaired text.

pub mod compliance;
pub mod diff;
pub mod document;
pub mod error;
pub mod merge;
pub mod rules;

pub use compliance::{missing_tokens, needs_enforcement};
pub use diff::unified_diff;
pub use document::{ConfigDocument, KeyValue, Section};
pub use error::{Error, Result};
pub use merge::{ConfigMerger, MergeOutcome, MergePolicy, TRACKED_KEY, TargetSection};
pub use rules::{DEFAULT_IGNORE_TOKENS, RuleSet, RuleToken};
