//! Filesystem watcher.
//!
//! Subscribes to creation events under a directory (recursively) and feeds
//! qualifying paths into the pipeline. The watch loop owns the notify
//! subscription; dropping it on stop guarantees no events are delivered
//! after [`WatchHandle::stop`] returns.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{EventKind, RecursiveMode, Watcher};
use thiserror::Error;
use tokio::sync::mpsc;

use super::pipeline::TranscriptionPipeline;
use super::sink::LogSink;

/// Errors that can occur with the watcher
#[derive(Debug, Error)]
pub enum WatcherError {
    #[error("Watch directory does not exist: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Watch task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// Watches a directory tree and forwards new media files to the pipeline.
pub struct FolderWatcher {
    watch_path: PathBuf,
}

impl FolderWatcher {
    pub fn new(watch_path: impl Into<PathBuf>) -> Self {
        Self {
            watch_path: watch_path.into(),
        }
    }

    pub fn watch_path(&self) -> &Path {
        &self.watch_path
    }

    /// Check that the watch path exists and is a directory.
    pub fn validate(&self) -> Result<(), WatcherError> {
        if !self.watch_path.is_dir() {
            return Err(WatcherError::DirectoryNotFound(self.watch_path.clone()));
        }
        Ok(())
    }

    /// Start watching. Runs until stopped via the returned handle.
    ///
    /// Transcriptions run inline on the watch loop, so only one proceeds at
    /// a time; a burst of creations queues in the notify channel behind it.
    pub fn watch(
        &self,
        pipeline: Arc<TranscriptionPipeline>,
        sink: Arc<dyn LogSink>,
    ) -> Result<WatchHandle, WatcherError> {
        self.validate()?;

        let (stop_tx, stop_rx) = mpsc::channel::<()>(1);
        let watch_path = self.watch_path.clone();

        // Subscribe before spawning so a bad path fails the caller, not the task
        let (fs_tx, fs_rx) = std::sync::mpsc::channel();
        let mut fs_watcher = notify::recommended_watcher(fs_tx)?;
        fs_watcher.watch(&watch_path, RecursiveMode::Recursive)?;

        let task = tokio::spawn(run_watch_loop(
            watch_path,
            fs_watcher,
            fs_rx,
            pipeline,
            sink,
            stop_rx,
        ));

        Ok(WatchHandle { stop_tx, task })
    }
}

/// Handle to a running watch loop.
pub struct WatchHandle {
    stop_tx: mpsc::Sender<()>,
    task: tokio::task::JoinHandle<()>,
}

impl WatchHandle {
    /// Stop the watcher and wait for the loop to terminate.
    ///
    /// Does not abort a transcription already underway; that finishes first.
    pub async fn stop(self) -> Result<(), WatcherError> {
        let _ = self.stop_tx.send(()).await;
        self.task.await?;
        Ok(())
    }
}

async fn run_watch_loop(
    watch_path: PathBuf,
    fs_watcher: notify::RecommendedWatcher,
    fs_rx: std::sync::mpsc::Receiver<Result<notify::Event, notify::Error>>,
    pipeline: Arc<TranscriptionPipeline>,
    sink: Arc<dyn LogSink>,
    mut stop_rx: mpsc::Receiver<()>,
) {
    tracing::info!("Watching {} for new media files", watch_path.display());

    loop {
        if stop_rx.try_recv().is_ok() {
            tracing::info!("Watcher stopping");
            break;
        }

        match fs_rx.recv_timeout(Duration::from_millis(100)) {
            Ok(Ok(event)) => {
                if !matches!(event.kind, EventKind::Create(_)) {
                    continue;
                }
                for path in event.paths {
                    // Creation of a subdirectory is not a job
                    if path.is_dir() {
                        continue;
                    }
                    pipeline.intake(&path).await;
                }
            }
            Ok(Err(e)) => {
                // Watched tree became unreadable (deleted, permissions);
                // surface it rather than dying silently
                tracing::warn!("Watch error on {}: {}", watch_path.display(), e);
                sink.log(&format!("watch error: {}", e));
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {
                // Expected - loop back to the stop check
            }
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                tracing::error!("Watcher channel disconnected");
                sink.log("watch error: notification channel disconnected");
                break;
            }
        }

        // Yield so the runtime can schedule other tasks between polls
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    // Dropping the subscription here means no further events after stop()
    drop(fs_watcher);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_missing_directory() {
        let watcher = FolderWatcher::new("/definitely/not/a/real/path");
        assert!(matches!(
            watcher.validate(),
            Err(WatcherError::DirectoryNotFound(_))
        ));
    }

    #[test]
    fn validate_rejects_plain_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let watcher = FolderWatcher::new(temp.path());
        assert!(matches!(
            watcher.validate(),
            Err(WatcherError::DirectoryNotFound(_))
        ));
    }

    #[test]
    fn validate_accepts_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        let watcher = FolderWatcher::new(temp.path());
        assert!(watcher.validate().is_ok());
    }
}
