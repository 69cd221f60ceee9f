//! Shared test utilities for the syno-guard workspace.
//!
//! This crate provides standardised filesystem fixtures so every crate's
//! tests build configuration directories the same way. It is a
//! dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`conf`]: [`ConfDir`] scratch configuration directory with a sibling
//!   backup directory
//! - [`samples`]: filter-file texts in the shapes the client writes

pub mod conf;
pub mod samples;

pub use conf::ConfDir;
