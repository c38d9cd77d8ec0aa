//! Zournel CLI.
//!
//! Opens the file-backed store, wires the enrichment coordinator to the
//! Gemini capability when a key is present, and runs one command. Commands
//! that dispatch enrichment await the spawned branches before exiting so
//! results land in the store; an interactive frontend would instead drop the
//! handles and rely on change notifications.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use zournel::ai::{gemini::GeminiCapability, AiCapability, Disabled};
use zournel::cli::{embed_image_file, parse_edit_mode, Cli, Command, JournalCommand, SettingsCommand};
use zournel::enrich::Coordinator;
use zournel::format::{format_entries_markdown, format_tasks_markdown, OutputFormat};
use zournel::persist::FileStore;
use zournel::store::Store;
use zournel::types::{CompletionAnimation, DeleteAnimation, Theme};
use zournel::{logging, paths};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log, cli.verbose)?;

    let data_dir = paths::data_dir(cli.data_dir.as_deref());
    let durable = Arc::new(FileStore::open(&data_dir)?);
    let store = Store::open(durable)?;

    let ai: Arc<dyn AiCapability> = match GeminiCapability::from_env() {
        Some(capability) => Arc::new(capability),
        None => {
            info!("no GEMINI_API_KEY set, AI enrichment disabled");
            Arc::new(Disabled)
        }
    };
    let coordinator = Coordinator::new(store.clone(), ai);

    run(&cli.command, &store, &coordinator).await?;

    if coordinator.needs_credential() {
        eprintln!("Your AI credential was rejected; set a valid GEMINI_API_KEY to re-enable enrichment.");
    }
    Ok(())
}

async fn run(command: &Command, store: &Store, coordinator: &Coordinator) -> Result<()> {
    match command {
        Command::Add { text, ai: false } => {
            let task = store.create_task(text.clone())?;
            println!("Added task `{}`", task.id);
        }
        Command::Add { text, ai: true } => {
            let outcome = coordinator.ingest_freeform(text).await?;
            println!("Added {} task(s)", outcome.task_ids.len());
            for id in &outcome.task_ids {
                println!("  `{id}`");
            }
            if let Some(entry_id) = &outcome.entry_id {
                println!("Added journal entry `{entry_id}`");
            }
        }
        Command::List { format } => {
            let tasks = store.tasks();
            match OutputFormat::from_str(format).unwrap_or(OutputFormat::Markdown) {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tasks)?),
                OutputFormat::Markdown => print!("{}", format_tasks_markdown(&tasks)),
            }
        }
        Command::Toggle { id } => {
            if store.toggle_task(id)? {
                println!("Toggled `{id}`");
            } else {
                println!("No task `{id}`");
            }
        }
        Command::Rm { id } => {
            if store.delete_task(id)? {
                println!("Deleted `{id}`");
            } else {
                println!("No task `{id}`");
            }
        }
        Command::Priority { id } => match store.cycle_task_priority(id)? {
            Some(priority) => println!("Priority of `{id}` is now {}", priority.as_str()),
            None => println!("No task `{id}`"),
        },
        Command::Breakdown { id } => match coordinator.request_breakdown(id) {
            Some(handle) => {
                handle.await?;
                match store.get_task(id).and_then(|t| t.subtasks) {
                    Some(subtasks) => println!("Added {} subtask(s)", subtasks.len()),
                    None => println!("No breakdown produced"),
                }
            }
            None => println!("Breakdown not dispatched (task missing, already broken down, or AI disabled)"),
        },
        Command::Subtask { task_id, subtask_id } => {
            if store.toggle_subtask(task_id, subtask_id)? {
                println!("Toggled subtask `{subtask_id}`");
            } else {
                println!("No such subtask");
            }
        }
        Command::Journal(journal) => run_journal(journal, store, coordinator).await?,
        Command::Settings(settings) => run_settings(settings, store)?,
    }
    Ok(())
}

async fn run_journal(
    command: &JournalCommand,
    store: &Store,
    coordinator: &Coordinator,
) -> Result<()> {
    match command {
        JournalCommand::Add {
            content,
            id,
            image,
            cover,
            edit,
        } => {
            let mut content = content.clone();
            if let Some(mode) = edit {
                content = coordinator
                    .edit_entry_text(&content, parse_edit_mode(mode)?)
                    .await;
            }
            // Cover generation replaces the draft image; it is committed by
            // the save below, not on its own.
            let image = match (image, cover) {
                (Some(path), _) => Some(embed_image_file(path)?),
                (None, true) => coordinator.generate_cover(&truncate(&content, 150)).await,
                (None, false) => None,
            };

            let entry_id = store.save_entry(id.as_deref(), content.clone(), image)?;
            println!("Saved entry `{entry_id}`");

            for handle in coordinator.enrich_saved_entry(&entry_id, &content) {
                handle.await?;
            }
            if let Some(entry) = store.get_entry(&entry_id) {
                if let Some(insight) = entry.ai_insight {
                    println!("Insight: {insight}");
                }
            }
        }
        JournalCommand::List { format } => {
            let entries = store.entries();
            match OutputFormat::from_str(format).unwrap_or(OutputFormat::Markdown) {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
                OutputFormat::Markdown => print!("{}", format_entries_markdown(&entries)),
            }
        }
        JournalCommand::Rm { id } => {
            if store.delete_entry(id)? {
                println!("Deleted `{id}`");
            } else {
                println!("No entry `{id}`");
            }
        }
    }
    Ok(())
}

fn run_settings(command: &SettingsCommand, store: &Store) -> Result<()> {
    match command {
        SettingsCommand::Show => {
            println!("{}", serde_json::to_string_pretty(&store.settings())?);
        }
        SettingsCommand::Set {
            theme,
            completion_animation,
            delete_animation,
            model,
        } => {
            let mut settings = store.settings();
            if let Some(theme) = theme {
                settings.theme = parse_enum::<Theme>(theme, "theme")?;
            }
            if let Some(anim) = completion_animation {
                settings.completion_animation =
                    parse_enum::<CompletionAnimation>(anim, "completion animation")?;
            }
            if let Some(anim) = delete_animation {
                settings.delete_animation =
                    parse_enum::<DeleteAnimation>(anim, "delete animation")?;
            }
            if let Some(model) = model {
                settings.model = model.clone();
            }
            store.update_settings(settings)?;
            println!("Settings updated");
        }
    }
    Ok(())
}

/// Parse a lowercase settings enum value via its serde representation.
fn parse_enum<T: serde::de::DeserializeOwned>(value: &str, what: &str) -> Result<T> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|_| anyhow::anyhow!("unrecognized {what} '{value}'"))
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
