//! Command-line interface for scribewatch.
//!
//! The control surface for the pipeline:
//! - `scribewatch watch <folder>` - monitor a folder, transcribing new files
//! - `scribewatch transcribe <file>` - transcribe a single file and exit
//! - `scribewatch config` - show resolved settings

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};

use crate::engine::{Engine, WhisperEngine};
use crate::monitor::{ChannelSink, Monitor, ALLOWED_EXTENSIONS};

/// scribewatch - watch a folder and transcribe new media files
#[derive(Parser, Debug)]
#[command(name = "scribewatch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Monitor a folder, transcribing each new media file as it appears
    Watch {
        /// Folder to monitor (recursively)
        folder: PathBuf,

        /// Whisper model to load
        #[arg(short, long, default_value = "small")]
        model: String,
    },

    /// Transcribe a single media file and exit
    Transcribe {
        /// Media file to transcribe
        file: PathBuf,

        /// Whisper model to load
        #[arg(short, long, default_value = "small")]
        model: String,
    },

    /// Show resolved configuration
    Config {
        /// Whisper model to resolve against
        #[arg(short, long, default_value = "small")]
        model: String,
    },
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Watch { folder, model } => execute_watch(folder, &model).await,
            Commands::Transcribe { file, model } => execute_transcribe(file, &model).await,
            Commands::Config { model } => execute_config(&model),
        }
    }
}

/// Monitor a folder until Ctrl+C
async fn execute_watch(folder: PathBuf, model: &str) -> Result<()> {
    if !folder.is_dir() {
        anyhow::bail!("Folder does not exist: {}", folder.display());
    }

    // Model loads once; every transcription reuses this engine
    let engine: Arc<dyn Engine> = Arc::new(WhisperEngine::new(model));
    let (sink, mut log_rx) = ChannelSink::new();
    let mut monitor = Monitor::new(engine, Arc::new(sink));

    monitor
        .start(&folder)
        .with_context(|| format!("Failed to start monitoring {}", folder.display()))?;

    println!("Monitoring: {} (Ctrl+C to stop)", folder.display());
    println!();

    // Render log events on this task; transcriptions run on the watch loop
    loop {
        tokio::select! {
            Some(line) = log_rx.recv() => {
                println!("[{}] {}", Local::now().format("%H:%M:%S"), line);
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                println!("Stopping...");
                monitor.stop().await?;
                break;
            }
        }
    }

    // Drain anything the watch loop logged while shutting down
    while let Ok(line) = log_rx.try_recv() {
        println!("[{}] {}", Local::now().format("%H:%M:%S"), line);
    }

    Ok(())
}

/// Transcribe one file through the same pipeline the watcher uses
async fn execute_transcribe(file: PathBuf, model: &str) -> Result<()> {
    if !file.is_file() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let engine: Arc<dyn Engine> = Arc::new(WhisperEngine::new(model));
    let (sink, mut log_rx) = ChannelSink::new();
    let monitor = Monitor::new(engine, Arc::new(sink));

    let output = monitor
        .pipeline()
        .transcribe(&file)
        .await
        .with_context(|| format!("Failed to transcribe {}", file.display()))?;

    while let Ok(line) = log_rx.try_recv() {
        println!("[{}] {}", Local::now().format("%H:%M:%S"), line);
    }

    println!();
    println!("Transcript: {}", output.display());

    Ok(())
}

/// Show resolved configuration
fn execute_config(model: &str) -> Result<()> {
    let engine = WhisperEngine::new(model);

    println!();
    println!("scribewatch configuration");
    println!("══════════════════════════════════════════════════════════════");
    println!();
    println!("Whisper binary:  {}", engine.binary().display());
    println!("Whisper model:   {}", engine.model());
    println!("Extensions:      {}", ALLOWED_EXTENSIONS.join(", "));
    println!();

    if engine.binary().exists() {
        println!("✓ Whisper binary found");
    } else {
        println!("⚠️  Whisper binary not found");
        println!("    Install whisper or set WHISPER_PATH to its location.");
    }

    Ok(())
}
