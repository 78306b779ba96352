use chrono::{NaiveDate, Utc};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::checklist::{Action, Checklist, Outcome};
use crate::error::StorageError;
use crate::seed::seed_tasks;
use crate::storage::TaskRepository;
use crate::task::Status;

pub type Clock = fn() -> NaiveDate;

/// Today's calendar date in UTC; done dates are stamped with this.
pub fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Owns the checklist and writes every task-list change through to storage
/// before returning.
pub struct Store {
    checklist: Checklist,
    repo: TaskRepository,
    clock: Clock,
    save_error: Option<StorageError>,
}

impl Store {
    /// Restores the persisted list, or seeds a fresh one when nothing
    /// usable is stored.
    pub fn initialize(repo: TaskRepository) -> Self {
        let tasks = match repo.load() {
            Some(tasks) => {
                info!(count = tasks.len(), "restored checklist");
                tasks
            }
            None => {
                info!(key = %repo.key(), "no stored checklist, using seed list");
                seed_tasks()
            }
        };
        Self {
            checklist: Checklist::new(tasks),
            repo,
            clock: utc_today,
            save_error: None,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn checklist(&self) -> &Checklist {
        &self.checklist
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    /// The most recent failed write, if it has not been reported yet.
    pub fn take_save_error(&mut self) -> Option<StorageError> {
        self.save_error.take()
    }

    pub fn dispatch(&mut self, action: Action) -> Outcome {
        debug!(?action, "dispatch");
        let (next, outcome) = std::mem::take(&mut self.checklist).reduce(action);
        self.checklist = next;
        if outcome == Outcome::TasksChanged {
            self.persist();
        }
        outcome
    }

    fn persist(&mut self) {
        if let Err(e) = self.repo.save(self.checklist.tasks()) {
            error!(error = %e, "failed to save checklist");
            self.save_error = Some(e);
        }
    }

    pub fn set_status(&mut self, id: &str, status: Status) -> Outcome {
        let today = self.today();
        self.dispatch(Action::SetStatus {
            id: id.to_string(),
            status,
            today,
        })
    }

    pub fn update_notes(&mut self, id: &str, notes: Option<String>) -> Outcome {
        self.dispatch(Action::UpdateNotes {
            id: id.to_string(),
            notes,
        })
    }

    pub fn update_date(&mut self, id: &str, date: Option<NaiveDate>) -> Outcome {
        self.dispatch(Action::UpdateDate {
            id: id.to_string(),
            date,
        })
    }

    pub fn remove_task(&mut self, id: &str) -> Outcome {
        self.dispatch(Action::RemoveTask { id: id.to_string() })
    }

    pub fn add_task(&mut self, title: &str, day: &str) -> Outcome {
        let id = self.fresh_id();
        self.dispatch(Action::AddTask {
            id,
            title: title.to_string(),
            day: day.to_string(),
        })
    }

    /// Adds a task from the current draft title and day.
    pub fn add_draft(&mut self) -> Outcome {
        let title = self.checklist.draft_title().to_string();
        let day = self.checklist.draft_day().to_string();
        self.add_task(&title, &day)
    }

    pub fn set_draft_title(&mut self, title: impl Into<String>) -> Outcome {
        self.dispatch(Action::SetDraftTitle(title.into()))
    }

    pub fn set_draft_day(&mut self, day: impl Into<String>) -> Outcome {
        self.dispatch(Action::SetDraftDay(day.into()))
    }

    pub fn cycle_draft_day(&mut self, step: isize) -> Outcome {
        match self.checklist.neighbour_day(step) {
            Some(day) => self.set_draft_day(day),
            None => Outcome::Unchanged,
        }
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = format!("t-{}", Uuid::new_v4().simple());
            if !self.checklist.contains(&id) {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::Rejection;
    use crate::seed::{DAY_1, DAY_2};
    use crate::storage::{MemoryStore, STORAGE_KEY};
    use std::collections::HashSet;

    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn make_store() -> (Store, MemoryStore) {
        let mem = MemoryStore::new();
        let repo = TaskRepository::new(mem.clone(), STORAGE_KEY);
        (Store::initialize(repo).with_clock(fixed_today), mem)
    }

    #[test]
    fn initialize_seeds_when_nothing_stored() {
        let (store, mem) = make_store();
        assert_eq!(store.checklist().tasks().len(), 27);
        assert_eq!(store.checklist().draft_day(), DAY_1);
        // seeding alone does not write
        assert_eq!(mem.writes(), 0);
    }

    #[test]
    fn initialize_seeds_over_malformed_data() {
        let mem = MemoryStore::with_value(STORAGE_KEY, "[{\"broken\":");
        let store = Store::initialize(TaskRepository::new(mem, STORAGE_KEY));
        assert_eq!(store.checklist().tasks().len(), 27);
    }

    #[test]
    fn initialize_restores_persisted_list() {
        let (mut store, mem) = make_store();
        store.set_status("t-1", Status::Done);
        store.remove_task("t-27");

        let restored = Store::initialize(TaskRepository::new(mem, STORAGE_KEY));
        assert_eq!(restored.checklist().tasks(), store.checklist().tasks());
    }

    #[test]
    fn every_change_is_written_once() {
        let (mut store, mem) = make_store();
        store.set_status("t-1", Status::InProgress);
        assert_eq!(mem.writes(), 1);
        store.update_notes("t-1", Some("hi".into()));
        assert_eq!(mem.writes(), 2);
        store.update_date("t-1", NaiveDate::from_ymd_opt(2026, 1, 2));
        assert_eq!(mem.writes(), 3);
        store.remove_task("t-1");
        assert_eq!(mem.writes(), 4);
        store.add_task("New", DAY_2);
        assert_eq!(mem.writes(), 5);
    }

    #[test]
    fn no_op_paths_do_not_write() {
        let (mut store, mem) = make_store();
        assert_eq!(
            store.add_task("", DAY_1),
            Outcome::Rejected(Rejection::EmptyTitle)
        );
        assert_eq!(store.remove_task("nonexistent-id"), Outcome::Unchanged);
        assert_eq!(store.set_draft_title("draft"), Outcome::DraftChanged);
        assert_eq!(store.checklist().tasks().len(), 27);
        assert_eq!(mem.writes(), 0);
    }

    #[test]
    fn default_clock_is_utc() {
        let store = Store::initialize(TaskRepository::new(MemoryStore::new(), STORAGE_KEY));
        let before = Utc::now().date_naive();
        let today = store.today();
        let after = Utc::now().date_naive();
        // tolerate the test straddling UTC midnight
        assert!(today == before || today == after, "{today} is not the UTC date");
    }

    #[test]
    fn done_uses_the_clock() {
        let (mut store, _) = make_store();
        store.set_status("t-1", Status::Done);
        assert_eq!(store.checklist().task("t-1").unwrap().date, Some(fixed_today()));
        assert_eq!(store.checklist().completion_percent(), 4);
    }

    #[test]
    fn existing_date_survives_done() {
        let (mut store, _) = make_store();
        let jan15 = NaiveDate::from_ymd_opt(2024, 1, 15);
        store.update_date("t-2", jan15);
        store.set_status("t-2", Status::Done);
        assert_eq!(store.checklist().task("t-2").unwrap().date, jan15);
    }

    #[test]
    fn added_ids_are_distinct() {
        let (mut store, _) = make_store();
        let before: HashSet<String> = store
            .checklist()
            .tasks()
            .iter()
            .map(|t| t.id.clone())
            .collect();
        for i in 0..20 {
            store.add_task(&format!("task {i}"), DAY_1);
        }
        let new_ids: HashSet<String> = store
            .checklist()
            .tasks()
            .iter()
            .map(|t| t.id.clone())
            .filter(|id| !before.contains(id))
            .collect();
        assert_eq!(new_ids.len(), 20);
        assert_eq!(store.checklist().tasks().len(), 47);
    }

    #[test]
    fn add_draft_uses_drafts_and_clears_title() {
        let (mut store, _) = make_store();
        store.set_draft_title("Shadow a deploy");
        store.cycle_draft_day(1);
        assert_eq!(store.add_draft(), Outcome::TasksChanged);
        let first = &store.checklist().tasks()[0];
        assert_eq!(first.title, "Shadow a deploy");
        assert_eq!(first.day, DAY_2);
        assert_eq!(store.checklist().draft_title(), "");
        assert_eq!(store.checklist().draft_day(), DAY_2);
    }

    #[test]
    fn write_failure_is_kept_for_the_ui() {
        let (mut store, mem) = make_store();
        mem.set_fail_writes(true);
        assert_eq!(store.set_status("t-3", Status::Done), Outcome::TasksChanged);
        // in-memory state keeps the edit
        assert!(store.checklist().task("t-3").unwrap().is_done());
        assert!(matches!(
            store.take_save_error(),
            Some(StorageError::Unavailable(_))
        ));
        assert!(store.take_save_error().is_none());
    }
}
