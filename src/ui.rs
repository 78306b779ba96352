use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Gauge, Paragraph};

use crate::checklist::Outcome;
use crate::components::task_list::TaskList;
use crate::store::Store;
use crate::task::{Status, DATE_FORMAT};

/// What the app is currently doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Moving through the task list
    Normal,
    /// Typing into the creation bar
    NewTask,
    /// Notes prompt for one task
    EditNotes { task_id: String, input: String },
    /// Date prompt for one task
    EditDate { task_id: String, input: String },
}

/// Result of a blocking text prompt. An empty confirmation is not a cancel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Confirmed(String),
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Warning,
}

pub struct App {
    store: Store,
    list: TaskList,
    mode: Mode,
    status_message: Option<(MessageKind, String)>,
}

impl App {
    pub fn new(store: Store) -> Self {
        let list = TaskList::new(store.checklist().tasks().len());
        Self {
            store,
            list,
            mode: Mode::Normal,
            status_message: None,
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_ref().map(|(_, msg)| msg.as_str())
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.list
            .selected_task(self.store.checklist().tasks())
            .map(|t| t.id.as_str())
    }

    pub fn is_input_mode(&self) -> bool {
        !matches!(self.mode, Mode::Normal)
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.status_message = None;

        match self.mode.clone() {
            Mode::Normal => self.handle_normal(key),
            Mode::NewTask => self.handle_new_task(key),
            Mode::EditNotes { task_id, input } => self.handle_edit_notes(key, task_id, input),
            Mode::EditDate { task_id, input } => self.handle_edit_date(key, task_id, input),
        }

        self.list.clamp(self.store.checklist().tasks().len());
        if let Some(e) = self.store.take_save_error() {
            self.warn(format!("Not saved: {e}"));
        }
    }

    fn handle_normal(&mut self, key: KeyEvent) {
        let len = self.store.checklist().tasks().len();
        let selected = self.selected_id().map(str::to_string);

        match key.code {
            KeyCode::Char('n') | KeyCode::Char('a') => self.mode = Mode::NewTask,
            KeyCode::Char('1') => self.set_selected_status(selected, Status::NotStarted),
            KeyCode::Char('2') => self.set_selected_status(selected, Status::InProgress),
            KeyCode::Char('3') => self.set_selected_status(selected, Status::Done),
            KeyCode::Char(' ') => {
                if let Some(id) = selected {
                    if let Some(task) = self.store.checklist().task(&id) {
                        let next = task.status.cycle();
                        self.set_selected_status(Some(id), next);
                    }
                }
            }
            KeyCode::Char('e') => {
                if let Some(task) = self.list.selected_task(self.store.checklist().tasks()) {
                    self.mode = Mode::EditNotes {
                        task_id: task.id.clone(),
                        input: task.notes.clone().unwrap_or_default(),
                    };
                }
            }
            KeyCode::Char('t') => {
                if let Some(task) = self.list.selected_task(self.store.checklist().tasks()) {
                    self.mode = Mode::EditDate {
                        task_id: task.id.clone(),
                        input: task
                            .date
                            .map(|d| d.format(DATE_FORMAT).to_string())
                            .unwrap_or_default(),
                    };
                }
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                if let Some(id) = selected {
                    let title = self
                        .store
                        .checklist()
                        .task(&id)
                        .map(|t| t.title.clone())
                        .unwrap_or_default();
                    if self.store.remove_task(&id) == Outcome::TasksChanged {
                        self.info(format!("Removed: {title}"));
                    }
                }
            }
            _ => self.list.handle_key(key, len),
        }
    }

    fn set_selected_status(&mut self, id: Option<String>, status: Status) {
        if let Some(id) = id {
            self.store.set_status(&id, status);
        }
    }

    fn handle_new_task(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => match self.store.add_draft() {
                Outcome::TasksChanged => {
                    self.list.select(0);
                    self.info("Task added".to_string());
                    self.mode = Mode::Normal;
                }
                Outcome::Rejected(reason) => self.warn(reason.message().to_string()),
                _ => {}
            },
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Tab => {
                self.store.cycle_draft_day(1);
            }
            KeyCode::BackTab => {
                self.store.cycle_draft_day(-1);
            }
            KeyCode::Backspace => {
                let mut title = self.store.checklist().draft_title().to_string();
                title.pop();
                self.store.set_draft_title(title);
            }
            KeyCode::Char(c) => {
                let mut title = self.store.checklist().draft_title().to_string();
                title.push(c);
                self.store.set_draft_title(title);
            }
            _ => {}
        }
    }

    fn handle_edit_notes(&mut self, key: KeyEvent, task_id: String, input: String) {
        match prompt_key(key, input) {
            Ok(outcome) => {
                self.apply_notes(&task_id, outcome);
                self.mode = Mode::Normal;
            }
            Err(input) => self.mode = Mode::EditNotes { task_id, input },
        }
    }

    /// Cancelling leaves notes alone; confirming an empty string clears them.
    pub fn apply_notes(&mut self, task_id: &str, outcome: PromptOutcome) {
        match outcome {
            PromptOutcome::Cancelled => {}
            PromptOutcome::Confirmed(text) => {
                let cleared = text.is_empty();
                if self.store.update_notes(task_id, Some(text)) == Outcome::TasksChanged {
                    let msg = if cleared { "Notes cleared" } else { "Notes saved" };
                    self.info(msg.to_string());
                }
            }
        }
    }

    fn handle_edit_date(&mut self, key: KeyEvent, task_id: String, input: String) {
        match prompt_key(key, input) {
            Ok(PromptOutcome::Cancelled) => self.mode = Mode::Normal,
            Ok(PromptOutcome::Confirmed(text)) => {
                let text = text.trim();
                if text.is_empty() {
                    self.store.update_date(&task_id, None);
                    self.mode = Mode::Normal;
                } else {
                    match NaiveDate::parse_from_str(text, DATE_FORMAT) {
                        Ok(date) => {
                            self.store.update_date(&task_id, Some(date));
                            self.mode = Mode::Normal;
                        }
                        Err(_) => {
                            self.warn(format!("Expected a date like 2024-01-15, got {text:?}"));
                            self.mode = Mode::EditDate {
                                task_id,
                                input: text.to_string(),
                            };
                        }
                    }
                }
            }
            Err(input) => self.mode = Mode::EditDate { task_id, input },
        }
    }

    fn info(&mut self, msg: String) {
        self.status_message = Some((MessageKind::Info, msg));
    }

    fn warn(&mut self, msg: String) {
        self.status_message = Some((MessageKind::Warning, msg));
    }

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_title_bar(frame, layout[0]);
        self.render_creation_bar(frame, layout[1]);
        self.render_progress(frame, layout[2]);
        self.list.render(frame, layout[3], self.store.checklist().tasks());
        self.render_status_bar(frame, layout[4]);

        match &self.mode {
            Mode::Normal | Mode::NewTask => {}
            Mode::EditNotes { input, .. } => self.render_prompt(frame, " Edit notes ", input, area),
            Mode::EditDate { input, .. } => {
                self.render_prompt(frame, " Date (YYYY-MM-DD, empty clears) ", input, area)
            }
        }
    }

    fn render_title_bar(&self, frame: &mut Frame, area: Rect) {
        let title = Line::from(vec![
            Span::styled(" Onboarding Checklist ", Style::default().bold().fg(Color::Cyan)),
            Span::styled(
                "| No filters. No clutter. Just your progress.",
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        frame.render_widget(title, area);
    }

    fn render_creation_bar(&self, frame: &mut Frame, area: Rect) {
        let checklist = self.store.checklist();
        let focused = self.mode == Mode::NewTask;
        let border_style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let title_span = if checklist.draft_title().is_empty() && !focused {
            Span::styled("New task title", Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(checklist.draft_title())
        };
        let line = Line::from(vec![
            title_span,
            Span::raw("  "),
            Span::styled(
                format!("[{}]", checklist.draft_day()),
                Style::default().fg(Color::Yellow),
            ),
        ]);

        let block = Block::default()
            .title(" Add task ")
            .borders(Borders::ALL)
            .border_style(border_style);
        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    fn render_progress(&self, frame: &mut Frame, area: Rect) {
        let percent = self.store.checklist().completion_percent();
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(" Progress "))
            .gauge_style(Style::default().fg(Color::Green).bg(Color::DarkGray))
            .percent(u16::from(percent))
            .label(format!("{percent}% complete"));
        frame.render_widget(gauge, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        if let Some((kind, msg)) = &self.status_message {
            let color = match kind {
                MessageKind::Info => Color::Green,
                MessageKind::Warning => Color::Red,
            };
            let line = Line::from(Span::styled(format!(" {msg}"), Style::default().fg(color)));
            frame.render_widget(line, area);
            return;
        }

        let hints = match &self.mode {
            Mode::Normal => vec![
                ("q", "quit"),
                ("j/k", "move"),
                ("n", "new"),
                ("1/2/3", "status"),
                ("space", "cycle"),
                ("e", "notes"),
                ("t", "date"),
                ("x", "remove"),
            ],
            Mode::NewTask => vec![("Enter", "add"), ("Tab", "day"), ("Esc", "back")],
            Mode::EditNotes { .. } | Mode::EditDate { .. } => {
                vec![("Enter", "save"), ("Esc", "cancel")]
            }
        };

        let spans: Vec<Span> = hints
            .into_iter()
            .flat_map(|(key, desc)| {
                vec![
                    Span::styled(format!(" {key}"), Style::default().fg(Color::Yellow).bold()),
                    Span::raw(format!(" {desc} ")),
                ]
            })
            .collect();

        frame.render_widget(Line::from(spans), area);
    }

    fn render_prompt(&self, frame: &mut Frame, label: &str, input: &str, area: Rect) {
        let popup = centered_rect(60, 20, area);
        frame.render_widget(Clear, popup);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(label.to_string());
        frame.render_widget(Paragraph::new(input.to_string()).block(block), popup);
    }
}

/// Feeds one key to a single-line prompt. `Ok` once the prompt resolves,
/// `Err` with the updated input while it is still open.
fn prompt_key(key: KeyEvent, mut input: String) -> Result<PromptOutcome, String> {
    match key.code {
        KeyCode::Enter => Ok(PromptOutcome::Confirmed(input)),
        KeyCode::Esc => Ok(PromptOutcome::Cancelled),
        KeyCode::Backspace => {
            input.pop();
            Err(input)
        }
        KeyCode::Char(c) => {
            input.push(c);
            Err(input)
        }
        _ => Err(input),
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
