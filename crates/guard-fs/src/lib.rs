//! Filesystem layer for syno-guard
//!
//! Backs up filter files before they are rewritten and persists new content,
//! retrying through an elevated helper when the unprivileged write is
//! refused. A [`LockFile`] keeps cycles from separate processes apart.

pub mod backup;
pub mod elevated;
pub mod error;
pub mod io;
pub mod lock;
pub mod writer;

pub use backup::BackupStore;
pub use elevated::{PrivilegedWrite, SudoTee};
pub use error::{Error, Result};
pub use lock::{LockFile, LockGuard};
pub use writer::{PersistenceWriter, WriteMethod};
