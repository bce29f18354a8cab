//! Log sink contract between the pipeline and the control surface.
//!
//! The pipeline, watcher, and session all report progress as plain text
//! lines. The control surface decides how to render them; sinks must accept
//! calls from the watch loop's task without blocking it for long.

use std::sync::Mutex;

use tokio::sync::mpsc;

/// Destination for pipeline log events.
///
/// Called synchronously from whichever task detects the event. Every line is
/// also mirrored into `tracing` by the caller, so sinks only need to worry
/// about presentation.
pub trait LogSink: Send + Sync {
    fn log(&self, message: &str);
}

/// Sink that forwards lines over an unbounded channel.
///
/// The control surface owns the receiving end and marshals rendering onto its
/// own context (the CLI prints from its select loop).
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl LogSink for ChannelSink {
    fn log(&self, message: &str) {
        // Receiver dropped means the surface went away; nothing to render to.
        let _ = self.tx.send(message.to_string());
    }
}

/// Sink that collects lines in memory. Used by tests to assert log order.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all lines logged so far, in order.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("log sink poisoned").clone()
    }
}

impl LogSink for MemorySink {
    fn log(&self, message: &str) {
        self.lines
            .lock()
            .expect("log sink poisoned")
            .push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_preserves_order() {
        let sink = MemorySink::new();
        sink.log("first");
        sink.log("second");

        assert_eq!(sink.lines(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn channel_sink_forwards_lines() {
        let (sink, mut rx) = ChannelSink::new();
        sink.log("hello");

        assert_eq!(rx.recv().await.as_deref(), Some("hello"));
    }

    #[test]
    fn channel_sink_ignores_closed_receiver() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);

        // Must not panic
        sink.log("into the void");
    }
}
