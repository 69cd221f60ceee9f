//! Change detection
//!
//! [`ChangeWatcher`] turns filesystem notifications for the watched filter
//! files into [`Debouncer::arm`] calls; the [`Debouncer`] coalesces each
//! burst into a single deferred action.

mod debounce;
mod watcher;

pub use debounce::Debouncer;
pub use watcher::{ChangeWatcher, qualifying_file};
