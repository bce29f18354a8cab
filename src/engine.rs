//! Transcription engine seam.
//!
//! The pipeline talks to speech recognition through the [`Engine`] trait so
//! tests can substitute a scripted backend. The production implementation
//! shells out to a local whisper binary.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tokio::process::Command;

/// Errors from an engine invocation
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to run whisper at {path}: {source}")]
    Spawn {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Whisper exited with failure: {0}")]
    EngineFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse whisper output: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Recognized text for one media file
#[derive(Debug, Clone)]
pub struct Transcript {
    pub text: String,
    pub language: String,
    pub duration_seconds: f64,
}

/// A speech-recognition backend.
///
/// Implementations must be safe to share across tasks; a single instance is
/// constructed at startup and invoked once per detected file. Calls are
/// long-running (seconds to minutes) and block the caller.
#[async_trait]
pub trait Engine: Send + Sync {
    async fn transcribe(&self, path: &Path) -> Result<Transcript, EngineError>;
}

/// Whisper output JSON structure
#[derive(Debug, Deserialize)]
struct WhisperOutput {
    text: String,
    #[serde(default)]
    language: String,
    #[serde(default)]
    segments: Vec<WhisperSegment>,
}

#[derive(Debug, Deserialize)]
struct WhisperSegment {
    #[serde(default)]
    end: f64,
}

/// Engine backed by a local whisper binary.
pub struct WhisperEngine {
    binary: PathBuf,
    model: String,
}

impl WhisperEngine {
    /// Create an engine using the given model name.
    ///
    /// The binary location comes from the `WHISPER_PATH` env var, falling
    /// back to `/opt/homebrew/bin/whisper`.
    pub fn new(model: impl Into<String>) -> Self {
        let binary = std::env::var("WHISPER_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/opt/homebrew/bin/whisper"));

        Self {
            binary,
            model: model.into(),
        }
    }

    /// Override the binary location (takes precedence over `WHISPER_PATH`).
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

#[async_trait]
impl Engine for WhisperEngine {
    async fn transcribe(&self, path: &Path) -> Result<Transcript, EngineError> {
        // Whisper writes its JSON next to nothing we want to keep
        let temp_dir = tempfile::tempdir()?;

        let output = Command::new(&self.binary)
            .arg(path)
            .arg("--model")
            .arg(&self.model)
            .arg("--output_dir")
            .arg(temp_dir.path())
            .arg("--output_format")
            .arg("json")
            .output()
            .await
            .map_err(|source| EngineError::Spawn {
                path: self.binary.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::EngineFailed(stderr.trim().to_string()));
        }

        let stem = path.file_stem().unwrap_or_default().to_string_lossy();
        let json_path = temp_dir.path().join(format!("{}.json", stem));

        let json_content = tokio::fs::read_to_string(&json_path).await?;
        let whisper: WhisperOutput = serde_json::from_str(&json_content)?;

        let duration = whisper.segments.last().map(|s| s.end).unwrap_or(0.0);

        Ok(Transcript {
            text: whisper.text.trim().to_string(),
            language: if whisper.language.is_empty() {
                "en".to_string()
            } else {
                whisper.language
            },
            duration_seconds: duration,
        })
    }
}
