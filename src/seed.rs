use crate::task::Task;

pub const DAY_1: &str = "Day 1 — Core Understanding";
pub const DAY_2: &str = "Day 2 — Employee Module Deep Dive";
pub const DAY_3: &str = "Day 3 — Shared Components";
pub const DAY_4: &str = "Day 4 — Permissions & Menu";
pub const DAY_5: &str = "Day 5 — Authentication Flow";
pub const DAY_6: &str = "Day 6 — Secondary Modules";
pub const DAY_7: &str = "Day 7 — First Contribution";

const SEED: &[(&str, &str)] = &[
    (DAY_1, "Run Angular project successfully"),
    (DAY_1, "Review app-routing.module.ts"),
    (DAY_1, "Understand layout.module.ts"),
    (DAY_1, "Study api-endpoint.ts"),
    (DAY_1, "Study http.service.ts"),
    (DAY_1, "Understand auth.guard.ts / role.guard.ts"),
    (DAY_2, "Understand employee-list component"),
    (DAY_2, "Understand employee-details component"),
    (DAY_2, "Review employee.service.ts"),
    (DAY_2, "Trace API calls UI → Service → Backend"),
    (DAY_3, "Study shared data-table component"),
    (DAY_3, "Review shared form components"),
    (DAY_3, "Study directives (access-control, validation)"),
    (DAY_4, "Review permission.ts"),
    (DAY_4, "Study menu.ts structure"),
    (DAY_4, "Study menu.service.ts logic"),
    (DAY_4, "Understand dynamic sidebar rendering"),
    (DAY_5, "Study sign-in.component.ts"),
    (DAY_5, "Study auth.service.ts"),
    (DAY_5, "Study token-interceptor.service.ts"),
    (DAY_6, "Explore setup module: district, designation, cadre"),
    (DAY_6, "Explore user & role modules"),
    (DAY_6, "Understand SEC module patterns"),
    (DAY_7, "Fix a small UI/UX bug"),
    (DAY_7, "Improve validation or loaders"),
    (DAY_7, "Remove unused imports + cleanup"),
    (DAY_7, "Submit your first PR"),
];

/// The built-in checklist used when nothing has been persisted yet.
/// Ids run `t-1` through `t-27` in list order.
pub fn seed_tasks() -> Vec<Task> {
    SEED.iter()
        .enumerate()
        .map(|(i, (day, title))| Task::new(format!("t-{}", i + 1), *day, *title))
        .collect()
}
