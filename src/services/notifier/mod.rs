//! Notification channel interface.

pub mod telegram;

pub use telegram::TelegramNotifier;

use crate::error::AlertError;
use tracing::info;

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver an already formatted message.
    async fn send(&self, message: &str) -> Result<(), AlertError>;
}

/// Writes alerts to the log instead of an external channel. Used when no
/// notifier credentials are configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: &str) -> Result<(), AlertError> {
        info!(message = %message, "alert (log-only notifier)");
        Ok(())
    }
}
