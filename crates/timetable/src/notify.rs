//! Delivery of mutation notices to whoever renders them.

use tokio::sync::mpsc;

use timetable_core::mutation::{Notice, NoticeLevel};

/// Receives exactly one notice per finished mutation.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Writes notices to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => {
                tracing::info!(kind = %notice.kind, message = %notice.message, "Mutation succeeded")
            }
            NoticeLevel::Error => tracing::warn!(
                kind = %notice.kind,
                class = ?notice.class,
                message = %notice.message,
                "Mutation failed"
            ),
        }
    }
}

/// Forwards notices over a channel, e.g. to a UI task.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notice>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notice: Notice) {
        if let Err(err) = self.tx.send(notice) {
            tracing::debug!(message = %err.0.message, "Notice dropped, receiver closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use timetable_core::mutation::MutationKind;
    use timetable_core::remote::RemoteError;

    use super::*;

    #[tokio::test]
    async fn test_channel_forwards_in_order() {
        let (notifier, mut rx) = ChannelNotifier::new();

        notifier.notify(Notice::success(MutationKind::DeleteSession));
        notifier.notify(Notice::failure(
            MutationKind::DeleteSessions,
            &RemoteError::status(500),
        ));

        assert_eq!(rx.recv().await.unwrap().message, "Session deleted");
        assert!(rx.recv().await.unwrap().is_error());
    }

    #[test]
    fn test_closed_channel_does_not_panic() {
        let (notifier, rx) = ChannelNotifier::new();
        drop(rx);

        notifier.notify(Notice::success(MutationKind::UpdateSessionTimes));
    }

    #[test]
    fn test_tracing_notifier_accepts_both_levels() {
        TracingNotifier.notify(Notice::success(MutationKind::DeleteSession));
        TracingNotifier.notify(Notice::failure(
            MutationKind::DeleteSession,
            &RemoteError::Network("offline".to_string()),
        ));
    }
}
