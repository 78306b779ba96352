use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Done")]
    Done,
}

impl Status {
    pub fn display_name(&self) -> &'static str {
        match self {
            Status::NotStarted => "Not Started",
            Status::InProgress => "In Progress",
            Status::Done => "Done",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Status::NotStarted => "[ ]",
            Status::InProgress => "[~]",
            Status::Done => "[x]",
        }
    }

    /// Next status in display order, wrapping from Done back to Not Started.
    pub fn cycle(&self) -> Status {
        match self {
            Status::NotStarted => Status::InProgress,
            Status::InProgress => Status::Done,
            Status::Done => Status::NotStarted,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub day: String,
    pub title: String,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Date the task was marked done; editable on its own.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_date"
    )]
    pub date: Option<NaiveDate>,
}

impl Task {
    pub fn new(id: impl Into<String>, day: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            day: day.into(),
            title: title.into(),
            status: Status::NotStarted,
            notes: None,
            date: None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.status == Status::Done
    }
}

// A cleared date input may be stored as "", which reads as absent.
fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_display_literals_on_the_wire() {
        let json = serde_json::to_string(&Status::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
        let parsed: Status = serde_json::from_str("\"Not Started\"").unwrap();
        assert_eq!(parsed, Status::NotStarted);
    }

    #[test]
    fn unknown_status_literal_is_rejected() {
        assert!(serde_json::from_str::<Status>("\"Blocked\"").is_err());
        assert!(serde_json::from_str::<Status>("\"done\"").is_err());
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let task: Task = serde_json::from_str(
            r#"{"id":"t-1","day":"Day 1","title":"Run it","status":"Done"}"#,
        )
        .unwrap();
        assert_eq!(task.notes, None);
        assert_eq!(task.date, None);
    }

    #[test]
    fn empty_and_null_dates_read_as_absent() {
        let empty: Task = serde_json::from_str(
            r#"{"id":"t-1","day":"d","title":"x","status":"Done","date":""}"#,
        )
        .unwrap();
        assert_eq!(empty.date, None);

        let null: Task = serde_json::from_str(
            r#"{"id":"t-1","day":"d","title":"x","status":"Done","date":null}"#,
        )
        .unwrap();
        assert_eq!(null.date, None);
    }

    #[test]
    fn malformed_date_is_an_error() {
        let res = serde_json::from_str::<Task>(
            r#"{"id":"t-1","day":"d","title":"x","status":"Done","date":"15/01/2024"}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn date_is_written_as_iso_calendar_date() {
        let mut task = Task::new("t-1", "d", "x");
        task.date = NaiveDate::from_ymd_opt(2024, 1, 15);
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["date"], "2024-01-15");
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn cycle_visits_every_status() {
        let mut s = Status::NotStarted;
        for expected in [Status::InProgress, Status::Done, Status::NotStarted] {
            s = s.cycle();
            assert_eq!(s, expected);
        }
    }
}
