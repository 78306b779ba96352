use std::collections::HashSet;

use chrono::NaiveDate;

use crate::seed::DAY_1;
use crate::task::{Status, Task};

/// Everything that can happen to a checklist.
///
/// Actions carry their impure inputs (today's date, a freshly generated id)
/// so that [`Checklist::reduce`] stays a pure function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetStatus {
        id: String,
        status: Status,
        today: NaiveDate,
    },
    UpdateNotes {
        id: String,
        notes: Option<String>,
    },
    UpdateDate {
        id: String,
        date: Option<NaiveDate>,
    },
    RemoveTask {
        id: String,
    },
    AddTask {
        id: String,
        title: String,
        day: String,
    },
    SetDraftTitle(String),
    SetDraftDay(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The task list changed and must be persisted.
    TasksChanged,
    /// Only the transient inputs changed.
    DraftChanged,
    Unchanged,
    Rejected(Rejection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    EmptyTitle,
    DuplicateId,
}

impl Rejection {
    pub fn message(&self) -> &'static str {
        match self {
            Rejection::EmptyTitle => "Title cannot be empty",
            Rejection::DuplicateId => "A task with that id already exists",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checklist {
    tasks: Vec<Task>,
    draft_title: String,
    draft_day: String,
}

impl Default for Checklist {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Checklist {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            draft_title: String::new(),
            draft_day: DAY_1.to_string(),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.task(id).is_some()
    }

    pub fn draft_title(&self) -> &str {
        &self.draft_title
    }

    pub fn draft_day(&self) -> &str {
        &self.draft_day
    }

    /// Distinct day labels in first-seen order. Recomputed on every call.
    pub fn day_groups(&self) -> impl Iterator<Item = &str> + '_ {
        let mut seen = HashSet::new();
        self.tasks
            .iter()
            .map(|t| t.day.as_str())
            .filter(move |day| seen.insert(*day))
    }

    pub fn done_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.is_done()).count()
    }

    /// Rounded percentage of tasks marked done; 0 for an empty list.
    pub fn completion_percent(&self) -> u8 {
        let total = self.tasks.len();
        if total == 0 {
            return 0;
        }
        // round half up without going through floats
        ((200 * self.done_count() + total) / (2 * total)) as u8
    }

    /// The day label `step` positions away from the current draft day,
    /// wrapping around the derived day groups.
    pub fn neighbour_day(&self, step: isize) -> Option<String> {
        let days: Vec<&str> = self.day_groups().collect();
        if days.is_empty() {
            return None;
        }
        let len = days.len() as isize;
        let next = match days.iter().position(|d| *d == self.draft_day) {
            Some(pos) => (pos as isize + step).rem_euclid(len),
            None => 0,
        };
        Some(days[next as usize].to_string())
    }

    pub fn reduce(mut self, action: Action) -> (Self, Outcome) {
        let outcome = match action {
            Action::SetStatus { id, status, today } => self.modify(&id, |task| {
                if status == Status::Done {
                    if task.date.is_none() {
                        task.date = Some(today);
                    }
                } else {
                    task.date = None;
                }
                task.status = status;
            }),
            Action::UpdateNotes { id, notes } => {
                let notes = notes.filter(|n| !n.is_empty());
                self.modify(&id, |task| task.notes = notes)
            }
            Action::UpdateDate { id, date } => self.modify(&id, |task| task.date = date),
            Action::RemoveTask { id } => {
                let before = self.tasks.len();
                self.tasks.retain(|t| t.id != id);
                if self.tasks.len() == before {
                    Outcome::Unchanged
                } else {
                    Outcome::TasksChanged
                }
            }
            Action::AddTask { id, title, day } => {
                let title = title.trim();
                if title.is_empty() {
                    Outcome::Rejected(Rejection::EmptyTitle)
                } else if self.contains(&id) {
                    Outcome::Rejected(Rejection::DuplicateId)
                } else {
                    self.tasks.insert(0, Task::new(id, day, title));
                    self.draft_title.clear();
                    Outcome::TasksChanged
                }
            }
            Action::SetDraftTitle(title) => {
                self.draft_title = title;
                Outcome::DraftChanged
            }
            Action::SetDraftDay(day) => {
                self.draft_day = day;
                Outcome::DraftChanged
            }
        };
        (self, outcome)
    }

    fn modify(&mut self, id: &str, f: impl FnOnce(&mut Task)) -> Outcome {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Outcome::Unchanged;
        };
        let before = task.clone();
        f(task);
        if *task == before {
            Outcome::Unchanged
        } else {
            Outcome::TasksChanged
        }
    }
}
