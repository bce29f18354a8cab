//! Monitoring session lifecycle.
//!
//! A [`Monitor`] is the context object tying together the engine, the
//! processed-set tracker, and at most one active watch session. Start/stop
//! follow a two-state machine: Idle -> Active on `start`, Active -> Idle on
//! `stop`. Starting while active and stopping while idle are no-ops.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::engine::Engine;

use super::pipeline::TranscriptionPipeline;
use super::sink::LogSink;
use super::tracker::ProcessedSet;
use super::watcher::{FolderWatcher, WatchHandle, WatcherError};

/// Errors from session control
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Folder does not exist: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Watcher error: {0}")]
    Watcher(#[from] WatcherError),
}

/// Outcome of a start request
#[derive(Debug, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new session is now active
    Started,

    /// A session was already active; the request was ignored
    AlreadyActive,
}

/// Outcome of a stop request
#[derive(Debug, PartialEq, Eq)]
pub enum StopOutcome {
    /// The active session was stopped
    Stopped,

    /// No session was active
    NotRunning,
}

/// One active watch-and-transcribe run.
struct Session {
    watch_path: PathBuf,
    handle: WatchHandle,
    started_at: DateTime<Utc>,
}

/// Owns the engine, tracker, and current session.
///
/// Multiple monitors can coexist in one process; nothing here is global.
pub struct Monitor {
    pipeline: Arc<TranscriptionPipeline>,
    sink: Arc<dyn LogSink>,
    session: Option<Session>,
}

impl Monitor {
    pub fn new(engine: Arc<dyn Engine>, sink: Arc<dyn LogSink>) -> Self {
        let tracker = Arc::new(ProcessedSet::new());
        let pipeline = Arc::new(TranscriptionPipeline::new(engine, tracker, sink.clone()));

        Self {
            pipeline,
            sink,
            session: None,
        }
    }

    /// The pipeline backing this monitor (one-shot transcriptions go through
    /// the same extension filter and tracker as watched files).
    pub fn pipeline(&self) -> &Arc<TranscriptionPipeline> {
        &self.pipeline
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Path of the active session, if any.
    pub fn watch_path(&self) -> Option<&Path> {
        self.session.as_ref().map(|s| s.watch_path.as_path())
    }

    /// Start monitoring a directory.
    ///
    /// Fails with [`MonitorError::DirectoryNotFound`] when the path is not an
    /// existing directory. A duplicate start while a session is active logs a
    /// warning and returns [`StartOutcome::AlreadyActive`] without touching
    /// the running session.
    pub fn start(&mut self, path: impl Into<PathBuf>) -> Result<StartOutcome, MonitorError> {
        let path = path.into();

        if let Some(session) = &self.session {
            tracing::warn!(
                "Already monitoring {}, ignoring start request",
                session.watch_path.display()
            );
            self.sink.log(&format!(
                "already monitoring {}, stop first",
                session.watch_path.display()
            ));
            return Ok(StartOutcome::AlreadyActive);
        }

        if !path.is_dir() {
            return Err(MonitorError::DirectoryNotFound(path));
        }

        let watcher = FolderWatcher::new(&path);
        let handle = watcher.watch(self.pipeline.clone(), self.sink.clone())?;

        self.sink
            .log(&format!("monitoring folder: {}", path.display()));

        self.session = Some(Session {
            watch_path: path,
            handle,
            started_at: Utc::now(),
        });

        Ok(StartOutcome::Started)
    }

    /// Stop the active session, waiting for the watch loop to terminate.
    ///
    /// No events are delivered after this returns. An in-flight
    /// transcription is not aborted; the loop exits once it completes.
    pub async fn stop(&mut self) -> Result<StopOutcome, MonitorError> {
        let Some(session) = self.session.take() else {
            tracing::debug!("Stop requested with no active session");
            return Ok(StopOutcome::NotRunning);
        };

        session.handle.stop().await?;

        let elapsed = Utc::now() - session.started_at;
        tracing::info!(
            "Stopped monitoring {} after {}s",
            session.watch_path.display(),
            elapsed.num_seconds()
        );
        self.sink.log("stopped folder monitoring");

        Ok(StopOutcome::Stopped)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use tempfile::TempDir;

    use crate::engine::{EngineError, Transcript};
    use crate::monitor::sink::MemorySink;

    use super::*;

    struct NullEngine;

    #[async_trait]
    impl Engine for NullEngine {
        async fn transcribe(&self, _path: &Path) -> Result<Transcript, EngineError> {
            Ok(Transcript {
                text: String::new(),
                language: "en".to_string(),
                duration_seconds: 0.0,
            })
        }
    }

    fn monitor() -> (Monitor, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        (Monitor::new(Arc::new(NullEngine), sink.clone()), sink)
    }

    #[tokio::test]
    async fn start_with_missing_path_leaves_monitor_idle() {
        let (mut monitor, _sink) = monitor();

        let result = monitor.start("/no/such/folder");
        assert!(matches!(result, Err(MonitorError::DirectoryNotFound(_))));
        assert!(!monitor.is_active());
    }

    #[tokio::test]
    async fn start_then_stop_cycles_the_session() {
        let temp = TempDir::new().unwrap();
        let (mut monitor, _sink) = monitor();

        assert_eq!(monitor.start(temp.path()).unwrap(), StartOutcome::Started);
        assert!(monitor.is_active());
        assert_eq!(monitor.watch_path(), Some(temp.path()));

        assert_eq!(monitor.stop().await.unwrap(), StopOutcome::Stopped);
        assert!(!monitor.is_active());
    }

    #[tokio::test]
    async fn duplicate_start_is_ignored_with_a_warning() {
        let temp = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();
        let (mut monitor, sink) = monitor();

        assert_eq!(monitor.start(temp.path()).unwrap(), StartOutcome::Started);
        assert_eq!(
            monitor.start(other.path()).unwrap(),
            StartOutcome::AlreadyActive
        );

        // Still the original session
        assert_eq!(monitor.watch_path(), Some(temp.path()));
        assert!(sink
            .lines()
            .iter()
            .any(|l| l.starts_with("already monitoring")));

        monitor.stop().await.unwrap();
    }

    #[tokio::test]
    async fn stop_while_idle_is_a_no_op() {
        let (mut monitor, _sink) = monitor();
        assert_eq!(monitor.stop().await.unwrap(), StopOutcome::NotRunning);
    }

    #[tokio::test]
    async fn session_can_be_restarted_after_stop() {
        let temp = TempDir::new().unwrap();
        let (mut monitor, _sink) = monitor();

        monitor.start(temp.path()).unwrap();
        monitor.stop().await.unwrap();

        assert_eq!(monitor.start(temp.path()).unwrap(), StartOutcome::Started);
        monitor.stop().await.unwrap();
    }
}
