//! Output formatting utilities for the CLI.

use crate::types::{JournalEntry, Task};
use chrono::{Local, TimeZone};

/// Output format for list commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "markdown" | "md" => Some(OutputFormat::Markdown),
            _ => None,
        }
    }
}

fn format_timestamp(ms: i64) -> String {
    match Local.timestamp_millis_opt(ms).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => ms.to_string(),
    }
}

/// Format a single task line with its subtasks.
pub fn format_task_markdown(task: &Task) -> String {
    let mut md = String::new();
    let check = if task.completed { "x" } else { " " };
    md.push_str(&format!(
        "- [{}] {} ({}, `{}`)\n",
        check,
        task.text,
        task.priority.as_str(),
        task.id
    ));
    if let Some(ref tag) = task.ai_analysis {
        md.push_str(&format!("      {}\n", tag));
    }
    if let Some(ref subtasks) = task.subtasks {
        for sub in subtasks {
            let sub_check = if sub.completed { "x" } else { " " };
            md.push_str(&format!("    - [{}] {} (`{}`)\n", sub_check, sub.text, sub.id));
        }
    }
    md
}

/// Format the task list, open tasks before completed ones.
pub fn format_tasks_markdown(tasks: &[Task]) -> String {
    let mut md = String::new();
    md.push_str(&format!("# Tasks ({})\n\n", tasks.len()));

    let open: Vec<&Task> = tasks.iter().filter(|t| !t.completed).collect();
    let done: Vec<&Task> = tasks.iter().filter(|t| t.completed).collect();

    if !open.is_empty() {
        md.push_str("## Open\n\n");
        for task in open {
            md.push_str(&format_task_markdown(task));
        }
        md.push('\n');
    }
    if !done.is_empty() {
        md.push_str("## Completed\n\n");
        for task in done {
            md.push_str(&format_task_markdown(task));
        }
    }
    md
}

/// Format a single journal entry.
pub fn format_entry_markdown(entry: &JournalEntry) -> String {
    let mut md = String::new();
    md.push_str(&format!(
        "## {} (`{}`)\n",
        format_timestamp(entry.created_at),
        entry.id
    ));
    if let Some(ref mood) = entry.mood {
        md.push_str(&format!("- **mood**: {}\n", mood));
    }
    if entry.image.is_some() {
        md.push_str("- **cover**: attached\n");
    }
    md.push('\n');
    md.push_str(&entry.content);
    md.push('\n');
    if let Some(ref insight) = entry.ai_insight {
        md.push_str(&format!("\n> {}\n", insight));
    }
    md
}

/// Format the journal, most recent entry first.
pub fn format_entries_markdown(entries: &[JournalEntry]) -> String {
    let mut md = String::new();
    md.push_str(&format!("# Journal ({})\n\n", entries.len()));
    for entry in entries {
        md.push_str(&format_entry_markdown(entry));
        md.push('\n');
    }
    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Priority, SubTask};

    fn sample_task() -> Task {
        Task {
            id: "t-1".into(),
            text: "Pay rent".into(),
            completed: false,
            priority: Priority::Medium,
            created_at: 0,
            subtasks: None,
            ai_analysis: None,
        }
    }

    #[test]
    fn open_task_renders_unchecked() {
        let md = format_task_markdown(&sample_task());
        assert!(md.starts_with("- [ ] Pay rent (medium"));
    }

    #[test]
    fn subtasks_render_indented() {
        let mut task = sample_task();
        task.subtasks = Some(vec![SubTask {
            id: "s-1".into(),
            text: "Transfer money".into(),
            completed: true,
        }]);
        let md = format_task_markdown(&task);
        assert!(md.contains("    - [x] Transfer money"));
    }

    #[test]
    fn list_groups_open_before_completed() {
        let mut done = sample_task();
        done.id = "t-2".into();
        done.completed = true;
        let md = format_tasks_markdown(&[done, sample_task()]);
        let open_at = md.find("## Open").unwrap();
        let done_at = md.find("## Completed").unwrap();
        assert!(open_at < done_at);
    }
}
