//! Notification sinks for shopper-facing notices

use crate::models::{Notice, NoticeKind};
use tokio::sync::mpsc;

/// Receives notices emitted after a cart change commits
pub trait NotificationSink: Send {
    /// Delivers one notice
    fn notify(&self, notice: &Notice);
}

/// Sink that writes notices through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, notice: &Notice) {
        match notice.kind {
            NoticeKind::Error => log::warn!("{}", notice.message),
            NoticeKind::Success | NoticeKind::Info => log::info!("{}", notice.message),
        }
    }
}

/// Sink that forwards notices to a channel, for a UI task to display
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<Notice>,
}

impl ChannelSink {
    /// Creates a sink and the receiver its notices arrive on
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl NotificationSink for ChannelSink {
    fn notify(&self, notice: &Notice) {
        // A closed receiver only means nobody is displaying notices
        if self.sender.send(notice.clone()).is_err() {
            log::debug!("Notice dropped, receiver closed: {}", notice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_sink_forwards_notices() {
        let (sink, mut receiver) = ChannelSink::new();

        sink.notify(&Notice::success("Added Pizza to cart"));
        sink.notify(&Notice::info("Cart cleared"));

        assert_eq!(
            receiver.try_recv().unwrap(),
            Notice::success("Added Pizza to cart")
        );
        assert_eq!(receiver.try_recv().unwrap(), Notice::info("Cart cleared"));
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_channel_sink_survives_closed_receiver() {
        let (sink, receiver) = ChannelSink::new();
        drop(receiver);

        sink.notify(&Notice::info("Cart cleared"));
    }
}
