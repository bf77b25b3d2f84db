//! Progress reporting.

use tokio::sync::mpsc;
use tracing::debug;

use super::types::ProgressEvent;

/// Receives batch progress.
///
/// Called synchronously from the batch worker, so implementations should
/// return quickly. Use [`ChannelProgressSink`] to hand events to another task.
pub trait ProgressSink: Send + Sync {
    /// `percent` is in [0, 100] and never decreases within a batch.
    fn on_progress(&self, message: &str, percent: f32);
}

impl<F> ProgressSink for F
where
    F: Fn(&str, f32) + Send + Sync,
{
    fn on_progress(&self, message: &str, percent: f32) {
        self(message, percent)
    }
}

/// Forwards progress events over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelProgressSink {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl ChannelProgressSink {
    /// Creates a sink and the receiver its events arrive on.
    ///
    /// The receiver yields `None` once the sink (and all its clones) is
    /// dropped, i.e. when the batch finishes.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ProgressSink for ChannelProgressSink {
    fn on_progress(&self, message: &str, percent: f32) {
        let event = ProgressEvent {
            message: message.to_string(),
            percent,
        };
        if self.tx.send(event).is_err() {
            debug!("Progress receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_channel_sink() {
        let (sink, mut rx) = ChannelProgressSink::new();
        sink.on_progress("Processing (1/2): a.mp3", 0.0);
        sink.on_progress("Done (1/2): a.mp3", 50.0);
        drop(sink);

        let first = rx.recv().await.unwrap();
        assert_eq!(first.message, "Processing (1/2): a.mp3");
        assert_eq!(first.percent, 0.0);
        assert_eq!(rx.recv().await.unwrap().percent, 50.0);
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn test_dropped_receiver_is_ignored() {
        let (sink, rx) = ChannelProgressSink::new();
        drop(rx);
        sink.on_progress("Done (1/1): a.mp3", 100.0);
    }

    #[test]
    fn test_closure_sink() {
        let seen = Mutex::new(Vec::new());
        let sink = |message: &str, percent: f32| {
            seen.lock().unwrap().push((message.to_string(), percent));
        };
        sink.on_progress("x", 10.0);
        let dyn_sink: &dyn ProgressSink = &sink;
        dyn_sink.on_progress("y", 20.0);

        let seen = seen.into_inner().unwrap();
        assert_eq!(seen, vec![("x".to_string(), 10.0), ("y".to_string(), 20.0)]);
    }
}
