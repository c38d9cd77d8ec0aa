//! Integration tests for the entity store.
//!
//! These tests exercise the store against an in-memory durable store.
//! Tests are organized by area.

use zournel::store::tasks::JOURNAL_PROVENANCE;
use zournel::store::Store;
use zournel::subscriptions::MutationKind;
use zournel::types::{ExtractedTask, Priority};

/// Helper to create a fresh in-memory store for testing.
fn setup_store() -> Store {
    Store::in_memory().expect("Failed to create in-memory store")
}

mod task_tests {
    use super::*;

    #[test]
    fn create_task_uses_defaults_and_prepends() {
        let store = setup_store();

        let first = store.create_task("Pay rent").unwrap();
        assert!(!first.completed);
        assert_eq!(first.priority, Priority::Medium);
        assert!(first.subtasks.is_none());
        assert!(first.ai_analysis.is_none());
        assert!(first.created_at > 0);

        let second = store.create_task("Buy milk").unwrap();
        let ids: Vec<String> = store.tasks().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn toggle_reflects_net_parity() {
        let store = setup_store();
        let task = store.create_task("Pay rent").unwrap();

        assert!(store.toggle_task(&task.id).unwrap());
        assert!(store.get_task(&task.id).unwrap().completed);

        assert!(store.toggle_task(&task.id).unwrap());
        assert!(!store.get_task(&task.id).unwrap().completed);
    }

    #[test]
    fn toggle_absent_id_is_noop() {
        let store = setup_store();
        store.create_task("keep me").unwrap();
        assert!(!store.toggle_task("no-such-id").unwrap());
        assert_eq!(store.tasks().len(), 1);
    }

    #[test]
    fn deleted_ids_never_reappear() {
        let store = setup_store();
        let a = store.create_task("a").unwrap();
        let b = store.create_task("b").unwrap();

        assert!(store.delete_task(&a.id).unwrap());
        assert!(!store.delete_task(&a.id).unwrap());

        let surviving: Vec<String> = store.tasks().into_iter().map(|t| t.id).collect();
        assert_eq!(surviving, vec![b.id]);
    }

    #[test]
    fn update_task_after_delete_is_noop() {
        let store = setup_store();
        let mut task = store.create_task("doomed").unwrap();
        store.delete_task(&task.id).unwrap();

        task.text = "resurrected?".into();
        assert!(!store.update_task(task).unwrap());
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn update_task_replaces_wholesale() {
        let store = setup_store();
        let mut task = store.create_task("original").unwrap();
        task.text = "edited".into();
        task.priority = Priority::High;

        assert!(store.update_task(task.clone()).unwrap());
        let stored = store.get_task(&task.id).unwrap();
        assert_eq!(stored.text, "edited");
        assert_eq!(stored.priority, Priority::High);
    }

    #[test]
    fn priority_cycles_back_to_start_after_three_steps() {
        let store = setup_store();
        let task = store.create_task("cycle me").unwrap();
        assert_eq!(task.priority, Priority::Medium);

        assert_eq!(
            store.cycle_task_priority(&task.id).unwrap(),
            Some(Priority::Low)
        );
        assert_eq!(
            store.cycle_task_priority(&task.id).unwrap(),
            Some(Priority::High)
        );
        assert_eq!(
            store.cycle_task_priority(&task.id).unwrap(),
            Some(Priority::Medium)
        );
    }

    #[test]
    fn cycle_priority_on_absent_task_returns_none() {
        let store = setup_store();
        assert_eq!(store.cycle_task_priority("gone").unwrap(), None);
    }
}

mod subtask_tests {
    use super::*;

    #[test]
    fn populate_once_keeps_first_result() {
        let store = setup_store();
        let task = store.create_task("plan trip").unwrap();

        assert!(store
            .populate_subtasks(&task.id, vec!["book flights".into(), "pack".into()])
            .unwrap());
        // A racing second breakdown result is dropped.
        assert!(!store
            .populate_subtasks(&task.id, vec!["something else".into()])
            .unwrap());

        let subtasks = store.get_task(&task.id).unwrap().subtasks.unwrap();
        let texts: Vec<&str> = subtasks.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["book flights", "pack"]);
        assert!(subtasks.iter().all(|s| !s.completed));
    }

    #[test]
    fn populate_subtasks_on_absent_task_is_noop() {
        let store = setup_store();
        assert!(!store
            .populate_subtasks("gone", vec!["step".into()])
            .unwrap());
    }

    #[test]
    fn toggle_subtask_flips_only_that_subtask() {
        let store = setup_store();
        let task = store.create_task("two steps").unwrap();
        store
            .populate_subtasks(&task.id, vec!["one".into(), "two".into()])
            .unwrap();
        let subtasks = store.get_task(&task.id).unwrap().subtasks.unwrap();

        assert!(store.toggle_subtask(&task.id, &subtasks[0].id).unwrap());
        let after = store.get_task(&task.id).unwrap().subtasks.unwrap();
        assert!(after[0].completed);
        assert!(!after[1].completed);
    }
}

mod extraction_tests {
    use super::*;

    #[test]
    fn extracted_tasks_carry_priority_and_provenance() {
        let store = setup_store();
        let created = store
            .append_extracted_tasks(vec![ExtractedTask {
                text: "Call mom".into(),
                priority: Priority::High,
            }])
            .unwrap();

        assert_eq!(created.len(), 1);
        let stored = store.get_task(&created[0].id).unwrap();
        assert_eq!(stored.text, "Call mom");
        assert_eq!(stored.priority, Priority::High);
        assert_eq!(stored.ai_analysis.as_deref(), Some(JOURNAL_PROVENANCE));
        assert!(!stored.completed);
    }

    #[test]
    fn extraction_is_additive_with_no_deduplication() {
        let store = setup_store();
        let items = vec![ExtractedTask {
            text: "Call mom".into(),
            priority: Priority::High,
        }];
        store.append_extracted_tasks(items.clone()).unwrap();
        store.append_extracted_tasks(items).unwrap();
        assert_eq!(store.tasks().len(), 2);
    }

    #[test]
    fn extracted_tasks_prepend_before_existing() {
        let store = setup_store();
        let manual = store.create_task("manual").unwrap();
        store
            .append_extracted_tasks(vec![
                ExtractedTask {
                    text: "first".into(),
                    priority: Priority::Medium,
                },
                ExtractedTask {
                    text: "second".into(),
                    priority: Priority::Low,
                },
            ])
            .unwrap();

        let texts: Vec<String> = store.tasks().into_iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["first", "second", "manual"]);
        assert_eq!(store.tasks().last().unwrap().id, manual.id);
    }
}

mod journal_tests {
    use super::*;

    #[test]
    fn save_new_entry_then_merge_insight() {
        let store = setup_store();
        let id = store.save_entry(None, "Great day", None).unwrap();

        let entries = store.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].content, "Great day");
        assert!(entries[0].ai_insight.is_none());
        let created_at = entries[0].created_at;

        assert!(store
            .merge_journal_insight(&id, "You sound content.")
            .unwrap());
        let entry = store.get_entry(&id).unwrap();
        assert_eq!(entry.ai_insight.as_deref(), Some("You sound content."));
        assert_eq!(entry.content, "Great day");
        assert_eq!(entry.created_at, created_at);
    }

    #[test]
    fn overwrite_preserves_created_at_mood_and_insight() {
        let store = setup_store();
        let id = store
            .create_entry_with_mood("day one", Some("calm".into()))
            .unwrap();
        store.merge_journal_insight(&id, "steady").unwrap();
        let before = store.get_entry(&id).unwrap();

        let effective = store
            .save_entry(Some(&id), "day one, revised", Some("data:image/png;base64,AA==".into()))
            .unwrap();
        assert_eq!(effective, id);

        let after = store.get_entry(&id).unwrap();
        assert_eq!(after.content, "day one, revised");
        assert_eq!(after.image.as_deref(), Some("data:image/png;base64,AA=="));
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(after.mood.as_deref(), Some("calm"));
        assert_eq!(after.ai_insight.as_deref(), Some("steady"));
        assert_eq!(store.entries().len(), 1);
    }

    #[test]
    fn save_with_absent_id_changes_nothing() {
        let store = setup_store();
        store.save_entry(None, "existing", None).unwrap();

        let effective = store.save_entry(Some("missing-id"), "orphan", None).unwrap();
        assert_eq!(effective, "missing-id");
        assert_eq!(store.entries().len(), 1);
        assert_eq!(store.entries()[0].content, "existing");
    }

    #[test]
    fn merge_insight_after_delete_is_noop() {
        let store = setup_store();
        let id = store.save_entry(None, "short lived", None).unwrap();
        assert!(store.delete_entry(&id).unwrap());

        assert!(!store.merge_journal_insight(&id, "too late").unwrap());
        assert!(store.entries().is_empty());
    }
}

mod notification_tests {
    use super::*;

    #[test]
    fn each_mutation_notifies_its_kind() {
        let store = setup_store();
        let mut rx = store.subscribe();

        let task = store.create_task("notify me").unwrap();
        store.save_entry(None, "entry", None).unwrap();
        store.toggle_task(&task.id).unwrap();

        assert_eq!(rx.try_recv().unwrap(), MutationKind::TaskChanged);
        assert_eq!(rx.try_recv().unwrap(), MutationKind::JournalChanged);
        assert_eq!(rx.try_recv().unwrap(), MutationKind::TaskChanged);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn noop_mutations_do_not_notify() {
        let store = setup_store();
        let mut rx = store.subscribe();

        store.toggle_task("absent").unwrap();
        store.delete_task("absent").unwrap();
        store.merge_journal_insight("absent", "insight").unwrap();

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn settings_update_notifies_once() {
        let store = setup_store();
        let mut rx = store.subscribe();

        let mut settings = store.settings();
        settings.model = "gemini-3-flash-preview".into();
        store.update_settings(settings.clone()).unwrap();
        // Unchanged settings are a no-op.
        store.update_settings(settings).unwrap();

        assert_eq!(rx.try_recv().unwrap(), MutationKind::SettingsChanged);
        assert!(rx.try_recv().is_err());
    }
}
