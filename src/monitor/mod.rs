//! Folder-watch transcription pipeline.
//!
//! Wires the pieces of a monitoring session together:
//!
//! 1. **Watcher**: recursive creation-event subscription over the chosen folder
//! 2. **Pipeline**: extension filter, engine call, transcript write
//! 3. **Tracker**: processed-path set suppressing duplicate transcriptions
//! 4. **Session**: start/stop state machine owning at most one watcher
//!
//! ```text
//! filesystem event → Watcher → Pipeline → Engine → <stem>.txt + Tracker
//!                                 ↓
//!                              LogSink → control surface
//! ```

pub mod pipeline;
pub mod session;
pub mod sink;
pub mod tracker;
pub mod watcher;

// Re-export key types
pub use pipeline::{derive_output_path, TranscriptionPipeline, ALLOWED_EXTENSIONS};
pub use session::{Monitor, MonitorError, StartOutcome, StopOutcome};
pub use sink::{ChannelSink, LogSink, MemorySink};
pub use tracker::ProcessedSet;
pub use watcher::{FolderWatcher, WatchHandle, WatcherError};
