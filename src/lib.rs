//! scribewatch - folder-watch transcription
//!
//! Watches a folder for newly created media files and transcribes each one to
//! a `.txt` file alongside it, using a local Whisper install.
//!
//! # Architecture
//!
//! The interesting part is a thin pipeline:
//! - Creation events arrive from the filesystem watcher
//! - Paths are filtered by extension and processed state
//! - The engine transcribes one file at a time on the watch loop
//! - The transcript lands next to the source, the path is marked processed
//!
//! Everything is held by an explicit [`monitor::Monitor`] context (engine,
//! tracker, session) rather than process globals, so independent monitors
//! can coexist in one process.
//!
//! # Modules
//!
//! - `engine`: speech-recognition seam and the Whisper implementation
//! - `monitor`: watcher, pipeline, tracker, session, log sink
//! - `cli`: command-line control surface
//!
//! # Usage
//!
//! ```bash
//! # Watch a folder until Ctrl+C
//! scribewatch watch ~/Recordings
//!
//! # One-shot transcription
//! scribewatch transcribe meeting.m4a
//! ```

pub mod cli;
pub mod engine;
pub mod monitor;

// Re-export main types at crate root for convenience
pub use engine::{Engine, EngineError, Transcript, WhisperEngine};
pub use monitor::{
    Monitor, MonitorError, ProcessedSet, StartOutcome, StopOutcome, TranscriptionPipeline,
};
