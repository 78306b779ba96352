use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};

use crate::task::{Status, Task};

/// Cursor over the task rows. The rows themselves belong to the store.
#[derive(Debug, Default)]
pub struct TaskList {
    list_state: ListState,
}

impl TaskList {
    pub fn new(len: usize) -> Self {
        let mut list = Self::default();
        list.clamp(len);
        list
    }

    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    pub fn selected_task<'a>(&self, tasks: &'a [Task]) -> Option<&'a Task> {
        tasks.get(self.list_state.selected()?)
    }

    pub fn select(&mut self, index: usize) {
        self.list_state.select(Some(index));
    }

    /// Keep the cursor on a real row after the list grew or shrank.
    pub fn clamp(&mut self, len: usize) {
        match (len, self.list_state.selected()) {
            (0, _) => self.list_state.select(None),
            (_, None) => self.list_state.select(Some(0)),
            (len, Some(i)) if i >= len => self.list_state.select(Some(len - 1)),
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, len: usize) {
        if len == 0 {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0);
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if current + 1 < len {
                    self.list_state.select(Some(current + 1));
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.list_state.select(Some(current.saturating_sub(1)));
            }
            KeyCode::Char('g') | KeyCode::Home => self.list_state.select(Some(0)),
            KeyCode::Char('G') | KeyCode::End => self.list_state.select(Some(len - 1)),
            _ => {}
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, tasks: &[Task]) {
        let block = Block::default()
            .title(format!(" Tasks ({}) ", tasks.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let items: Vec<ListItem> = tasks.iter().map(task_item).collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::DarkGray).bold())
            .highlight_symbol("> ");

        let mut state = self.list_state.clone();
        frame.render_stateful_widget(list, area, &mut state);
    }
}

fn task_item(task: &Task) -> ListItem<'_> {
    let mut header = vec![
        Span::styled(format!("{} ", task.status.symbol()), status_style(task.status)),
        Span::styled(task.title.as_str(), Style::default().fg(Color::White).bold()),
        Span::styled(
            format!("  {}", task.status.display_name()),
            status_style(task.status),
        ),
    ];
    if let Some(date) = task.date {
        header.push(Span::styled(
            format!("  {date}"),
            Style::default().fg(Color::Magenta),
        ));
    }

    let notes = match task.notes.as_deref() {
        Some(notes) => Span::raw(notes),
        None => Span::styled("No notes", Style::default().fg(Color::DarkGray).italic()),
    };

    ListItem::new(vec![
        Line::from(header),
        Line::from(Span::styled(
            format!("    {}", task.day),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(vec![Span::raw("    "), notes]),
    ])
}

pub fn status_style(status: Status) -> Style {
    match status {
        Status::NotStarted => Style::default().fg(Color::Gray),
        Status::InProgress => Style::default().fg(Color::Yellow),
        Status::Done => Style::default().fg(Color::Green),
    }
}
