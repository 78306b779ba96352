use std::fmt::Write;

use crate::checklist::Checklist;

/// Every task grouped under its day label, in first-seen day order.
pub fn task_listing(checklist: &Checklist) -> String {
    let mut out = String::new();
    for day in checklist.day_groups() {
        let _ = writeln!(out, "{day}:");
        for task in checklist.tasks().iter().filter(|t| t.day == day) {
            let date = task.date.map(|d| format!(" ({d})")).unwrap_or_default();
            let _ = writeln!(
                out,
                "  {} [{}] {}{}",
                task.status.symbol(),
                task.id,
                task.title,
                date
            );
            if let Some(notes) = &task.notes {
                let _ = writeln!(out, "      {notes}");
            }
        }
    }
    let _ = writeln!(out, "{}% complete", checklist.completion_percent());
    out
}

/// One-line summary such as `1/27 done (4%)`.
pub fn progress_line(checklist: &Checklist) -> String {
    format!(
        "{}/{} done ({}%)",
        checklist.done_count(),
        checklist.tasks().len(),
        checklist.completion_percent()
    )
}
