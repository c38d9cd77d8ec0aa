//! CLI command definitions.
//!
//! This module defines the CLI structure using clap's derive macros. The
//! main entry point is the `Cli` struct which contains subcommands; command
//! wiring lives in `main.rs`.

use crate::types::EditMode;
use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use clap::{Parser, Subcommand};
use std::path::Path;

/// Local-first task list and journal with AI enrichment
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Data directory (overrides ZOURNEL_DATA_DIR)
    #[arg(short, long, global = true)]
    pub data_dir: Option<String>,

    /// Log output: 0/off, 1/stdout, 2/stderr, or a filename
    #[arg(long, default_value = "2", global = true)]
    pub log: String,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a task. With --ai, classify freeform input into tasks, journal
    /// narrative, and mood first.
    Add {
        text: String,
        /// Route the text through the AI classifier
        #[arg(long)]
        ai: bool,
    },
    /// List tasks
    List {
        /// Output format (json or markdown)
        #[arg(long, default_value = "markdown")]
        format: String,
    },
    /// Toggle a task's completion
    Toggle { id: String },
    /// Delete a task
    Rm { id: String },
    /// Cycle a task's priority (high -> medium -> low -> high)
    Priority { id: String },
    /// Break a task into AI-generated subtasks
    Breakdown { id: String },
    /// Toggle one subtask's completion
    Subtask { task_id: String, subtask_id: String },
    /// Journal entries
    #[command(subcommand)]
    Journal(JournalCommand),
    /// Application settings
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Subcommand, Debug)]
pub enum JournalCommand {
    /// Save an entry: new by default, overwrite with --id
    Add {
        content: String,
        /// Entry id to overwrite
        #[arg(long)]
        id: Option<String>,
        /// Path to a cover image file, embedded as a data URI
        #[arg(long)]
        image: Option<String>,
        /// Generate an AI cover image from the content
        #[arg(long, conflicts_with = "image")]
        cover: bool,
        /// Rewrite the content first: improve, rephrase, or summarize
        #[arg(long)]
        edit: Option<String>,
    },
    /// List entries
    List {
        /// Output format (json or markdown)
        #[arg(long, default_value = "markdown")]
        format: String,
    },
    /// Delete an entry
    Rm { id: String },
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Print the current settings
    Show,
    /// Change settings fields
    Set {
        #[arg(long)]
        theme: Option<String>,
        #[arg(long)]
        completion_animation: Option<String>,
        #[arg(long)]
        delete_animation: Option<String>,
        /// Model identifier for AI calls
        #[arg(long)]
        model: Option<String>,
    },
}

/// Parse an `--edit` mode argument.
pub fn parse_edit_mode(s: &str) -> Result<EditMode> {
    match s.to_lowercase().as_str() {
        "improve" => Ok(EditMode::Improve),
        "rephrase" => Ok(EditMode::Rephrase),
        "summarize" => Ok(EditMode::Summarize),
        other => bail!("unknown edit mode '{other}' (expected improve, rephrase, or summarize)"),
    }
}

/// Read a local image file and embed it as a base64 data URI, the same
/// representation AI-generated covers use.
pub fn embed_image_file(path: &str) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("reading image file {path}"))?;
    let mime = match Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    };
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}
