//! Transcription pipeline.
//!
//! Takes paths from the watcher, filters them by extension and processed
//! state, runs the engine, and writes the transcript alongside the source
//! file. Failures are caught here so they never unwind into the watch loop.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::engine::{Engine, EngineError};

use super::sink::LogSink;
use super::tracker::ProcessedSet;

/// Media extensions eligible for transcription (matched case-insensitively).
pub const ALLOWED_EXTENSIONS: &[&str] = &["mp3", "wav", "mp4", "mkv", "mov", "flv", "aac", "m4a"];

/// Errors from a single transcription attempt
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Failed to write transcript to {path}: {source}")]
    WriteOutput {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Filters incoming paths and sequences engine calls.
///
/// One instance per monitor; invoked from the watch loop, one file at a time.
pub struct TranscriptionPipeline {
    engine: Arc<dyn Engine>,
    tracker: Arc<ProcessedSet>,
    sink: Arc<dyn LogSink>,
}

impl TranscriptionPipeline {
    pub fn new(engine: Arc<dyn Engine>, tracker: Arc<ProcessedSet>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            engine,
            tracker,
            sink,
        }
    }

    pub fn tracker(&self) -> &ProcessedSet {
        &self.tracker
    }

    /// Offer a newly created file to the pipeline.
    ///
    /// Paths with an extension outside [`ALLOWED_EXTENSIONS`], and paths that
    /// already completed transcription this run, are dropped with no side
    /// effects. Everything else is transcribed inline; a failure is logged
    /// and swallowed so the watch loop keeps running, and the path stays
    /// untracked (recreating the file offers it again).
    pub async fn intake(&self, path: &Path) {
        if !is_media_file(path) {
            return;
        }

        if self.tracker.is_tracked(path) {
            tracing::debug!("Already transcribed, skipping: {}", path.display());
            return;
        }

        self.emit(&format!("new file detected: {}", path.display()));

        if let Err(e) = self.transcribe(path).await {
            tracing::warn!("Transcription failed for {}: {}", path.display(), e);
            self.sink
                .log(&format!("transcription failed: {}: {}", path.display(), e));
        }
    }

    /// Transcribe one file and write the transcript alongside it.
    ///
    /// The path is marked as processed only after the transcript is on disk.
    pub async fn transcribe(&self, path: &Path) -> Result<PathBuf, PipelineError> {
        self.emit(&format!("transcribing started: {}", path.display()));

        let transcript = self.engine.transcribe(path).await?;

        let output_path = derive_output_path(path);
        tokio::fs::write(&output_path, transcript.text.as_bytes())
            .await
            .map_err(|source| PipelineError::WriteOutput {
                path: output_path.clone(),
                source,
            })?;

        self.tracker.mark(path);

        self.emit(&format!("transcription saved: {}", output_path.display()));

        Ok(output_path)
    }

    fn emit(&self, message: &str) {
        tracing::info!("{}", message);
        self.sink.log(message);
    }
}

/// Check whether a path carries an allowed media extension.
pub fn is_media_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ALLOWED_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Replace the final extension with `txt`, preserving the rest of the path.
///
/// A filename with no extension gets `.txt` appended.
pub fn derive_output_path(path: &Path) -> PathBuf {
    let mut output = path.to_path_buf();
    output.set_extension("txt");
    output
}
