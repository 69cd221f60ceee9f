//! Desktop notifications through `osascript`

use async_trait::async_trait;

use super::{applescript_string, run_checked};
use crate::notifier::Notifier;

/// Posts notifications with `display notification`.
#[derive(Debug, Clone, Default)]
pub struct OsaScriptNotifier;

impl OsaScriptNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for OsaScriptNotifier {
    async fn send(&self, title: &str, message: &str) {
        let script = format!(
            "display notification {} with title {}",
            applescript_string(message),
            applescript_string(title)
        );
        if let Err(e) = run_checked("osascript", &["-e", &script]).await {
            tracing::debug!("Notification not delivered: {}", e);
        }
    }
}
