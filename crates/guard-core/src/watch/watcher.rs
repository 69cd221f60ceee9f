//! Filesystem watcher for the configuration directory

use std::path::Path;
use std::sync::Arc;

use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::debounce::Debouncer;
use crate::error::Result;

/// Watches one directory and arms a [`Debouncer`] on relevant changes.
///
/// Dropping the watcher stops both the OS subscription and the event loop.
pub struct ChangeWatcher {
    _watcher: RecommendedWatcher,
    events: JoinHandle<()>,
}

impl ChangeWatcher {
    /// Subscribe to `dir` (non-recursively) and spawn the event loop.
    ///
    /// Must be called inside a tokio runtime.
    pub fn start(dir: &Path, watched: Vec<String>, debouncer: Arc<Debouncer>) -> Result<Self> {
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                // The receiver only goes away when the watcher is being dropped.
                let _ = tx.send(res);
            },
            notify::Config::default(),
        )?;
        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        tracing::info!(dir = %dir.display(), files = ?watched, "Watching for filter changes");

        let events = tokio::spawn(async move {
            while let Some(res) = rx.recv().await {
                match res {
                    Ok(event) => {
                        if let Some(file) = qualifying_file(&event, &watched) {
                            tracing::debug!(%file, kind = ?event.kind, "Filter file changed");
                            debouncer.arm();
                        }
                    }
                    Err(e) => tracing::warn!("Watcher error: {}", e),
                }
            }
        });

        Ok(Self {
            _watcher: watcher,
            events,
        })
    }
}

impl Drop for ChangeWatcher {
    fn drop(&mut self) {
        self.events.abort();
    }
}

/// The watched file name `event` refers to, if it is a write or create.
///
/// Metadata-only changes (permissions, timestamps) never qualify.
pub fn qualifying_file(event: &Event, watched: &[String]) -> Option<String> {
    match event.kind {
        EventKind::Create(_) => {}
        EventKind::Modify(ModifyKind::Metadata(_)) => return None,
        EventKind::Modify(_) => {}
        _ => return None,
    }

    event
        .paths
        .iter()
        .filter_map(|path| path.file_name().and_then(|n| n.to_str()))
        .find(|name| watched.iter().any(|w| w == name))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, MetadataKind, RemoveKind, RenameMode};
    use rstest::rstest;
    use std::path::PathBuf;

    fn watched() -> Vec<String> {
        vec!["blacklist.filter".to_string(), "filter-v4150".to_string()]
    }

    fn event(kind: EventKind, name: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from("/conf").join(name))
    }

    #[rstest]
    #[case::data_write(EventKind::Modify(ModifyKind::Data(DataChange::Content)), "blacklist.filter", true)]
    #[case::any_modify(EventKind::Modify(ModifyKind::Any), "filter-v4150", true)]
    #[case::rename_into_place(EventKind::Modify(ModifyKind::Name(RenameMode::To)), "blacklist.filter", true)]
    #[case::create(EventKind::Create(CreateKind::File), "filter-v4150", true)]
    #[case::metadata(EventKind::Modify(ModifyKind::Metadata(MetadataKind::Permissions)), "blacklist.filter", false)]
    #[case::remove(EventKind::Remove(RemoveKind::File), "blacklist.filter", false)]
    #[case::other_file(EventKind::Modify(ModifyKind::Data(DataChange::Content)), "sync.db", false)]
    #[case::own_temp_file(EventKind::Create(CreateKind::File), ".blacklist.filter.42.tmp", false)]
    fn test_qualifying_file(#[case] kind: EventKind, #[case] name: &str, #[case] expected: bool) {
        let result = qualifying_file(&event(kind, name), &watched());
        assert_eq!(result.is_some(), expected);
        if expected {
            assert_eq!(result.unwrap(), name);
        }
    }
}
