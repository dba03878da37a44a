//! Shared fixtures for sheetdb integration tests

#![allow(dead_code)]

use sheetdb::backend::memory::MemoryWorksheet;
use sheetdb::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Open,
    Blocked,
    Done,
}

impl Status {
    fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "" | "open" => Some(Status::Open),
            "blocked" => Some(Status::Blocked),
            "done" => Some(Status::Done),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::Blocked => "blocked",
            Status::Done => "done",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub stamps: Timestamps,
    pub primary_key: String,
    pub title: String,
    pub status: Status,
    pub estimate: Option<f64>,
    pub notes: String,
}

impl Scheme for Task {
    const NAME: &'static str = "task";
    const FIELDS: &'static [&'static str] = &[
        "created_at",
        "updated_at",
        "primary_key",
        "title",
        "status",
        "estimate",
        "notes",
    ];
    const RAW_FIELDS: &'static [&'static str] = &["primary_key"];

    fn build(fields: &Fields) -> Result<Self> {
        let status: String = fields.get_or_default("status")?;
        Ok(Self {
            stamps: fields.timestamps()?,
            primary_key: fields.get("primary_key")?,
            title: fields.get("title")?,
            status: Status::parse(&status)
                .ok_or_else(|| Error::invalid(Self::NAME, format!("unknown status '{}'", status)))?,
            estimate: fields.get("estimate")?,
            notes: fields.get_or_default("notes")?,
        })
    }

    fn field_value(&self, name: &str) -> Option<Cell> {
        match name {
            "primary_key" => Some(self.primary_key.as_str().into()),
            "title" => Some(self.title.as_str().into()),
            "status" => Some(self.status.as_str().into()),
            "estimate" => Some(self.estimate.into()),
            "notes" => Some(self.notes.as_str().into()),
            _ => None,
        }
    }

    fn timestamps(&self) -> &Timestamps {
        &self.stamps
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.stamps
    }

    fn preprocess(&mut self) -> Result<()> {
        self.primary_key = self.primary_key.trim().to_ascii_uppercase();
        if self.title.trim().is_empty() {
            return Err(Error::invalid(Self::NAME, "title must not be blank"));
        }
        Ok(())
    }
}

pub fn task(key: &str, title: &str, status: &str) -> Task {
    Task::construct([
        ("primary_key", Cell::from(key)),
        ("title", Cell::from(title)),
        ("status", Cell::from(status)),
    ])
    .unwrap()
}

pub fn task_header() -> Vec<Cell> {
    Task::FIELDS.iter().map(|name| Cell::from(*name)).collect()
}

/// A worksheet holding only the task header
pub fn task_sheet() -> MemoryWorksheet {
    MemoryWorksheet::new("Tasks", vec![task_header()])
}

pub fn task_table(sheet: &MemoryWorksheet) -> Table<Task, MemoryWorksheet> {
    Table::new("tasks", sheet.clone())
}

pub fn collect(table: &Table<Task, MemoryWorksheet>) -> Vec<Task> {
    table
        .records()
        .unwrap()
        .collect::<Result<Vec<_>>>()
        .unwrap()
}
