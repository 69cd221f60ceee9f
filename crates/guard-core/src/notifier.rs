//! User-visible notifications

use async_trait::async_trait;

/// Title of the notification sent after a repair.
pub const REPAIR_TITLE: &str = "Synology Drive configuration updated";

/// Body of the notification sent after a repair.
pub const REPAIR_MESSAGE: &str = "Ignore rules were restored and the client was restarted.";

/// Fire-and-forget notification sink.
///
/// Implementations swallow their own failures; a lost notification never
/// affects a cycle.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, title: &str, message: &str);
}
