use chrono::NaiveDate;
use serde::Serialize;

use crate::model::collection::Collection;
use crate::model::task::{Task, format_date};

/// A task moved into the archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveRecord {
    #[serde(rename = "id")]
    pub task_id: String,
    pub text: String,
    /// Date the record carries after archiving
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl ArchiveRecord {
    fn of(task: &Task) -> Self {
        ArchiveRecord {
            task_id: task.id.clone(),
            text: task.text.clone(),
            date: task.date.clone(),
        }
    }
}

/// Borrowed split of a collection. Both sides keep collection order.
#[derive(Debug, Default)]
pub struct Partition<'a> {
    pub active: Vec<&'a Task>,
    pub archived: Vec<&'a Task>,
}

/// Split a collection into active (`archive == false`) and archived
/// (`archive == true`) records.
pub fn partition(collection: &Collection) -> Partition<'_> {
    let (archived, active): (Vec<&Task>, Vec<&Task>) =
        collection.tasks.iter().partition(|t| t.archive);
    Partition { active, archived }
}

/// Whether a record is due for the automatic sweep on `today`.
fn is_stale_done(task: &Task, today: NaiveDate) -> bool {
    task.checked && !task.archive && !task.is_dated(today)
}

/// Auto-archive sweep: every checked, still-active task whose date is not
/// `today` is archived. Its date (the day it was checked) is left as is.
/// Running it twice is the same as running it once.
pub fn sweep(collection: &mut Collection, today: NaiveDate) -> Vec<ArchiveRecord> {
    let mut archived = Vec::new();
    for task in &mut collection.tasks {
        if is_stale_done(task, today) {
            task.archive = true;
            tracing::debug!(id = %task.short_id(), "auto-archived");
            archived.push(ArchiveRecord::of(task));
        }
    }
    archived
}

/// Archive every checked, still-active task now, stamping it with `today`.
pub fn archive_done(collection: &mut Collection, today: NaiveDate) -> Vec<ArchiveRecord> {
    let stamp = format_date(today);
    let mut archived = Vec::new();
    for task in &mut collection.tasks {
        if task.checked && !task.archive {
            task.archive = true;
            task.date = Some(stamp.clone());
            archived.push(ArchiveRecord::of(task));
        }
    }
    if archived.is_empty() {
        tracing::debug!("no done tasks to archive");
    }
    archived
}

/// Tracks the last displayed date so a long-running loop can notice
/// midnight and refresh. It never archives anything itself; the refresh
/// reloads and the load-time sweep does the work.
#[derive(Debug, Clone, Copy)]
pub struct DateWatch {
    shown: NaiveDate,
}

impl DateWatch {
    pub fn new(today: NaiveDate) -> Self {
        DateWatch { shown: today }
    }

    pub fn shown(&self) -> NaiveDate {
        self.shown
    }

    /// Returns the previously shown date if the day changed since the last poll.
    pub fn poll(&mut self, today: NaiveDate) -> Option<NaiveDate> {
        if today == self.shown {
            return None;
        }
        let previous = std::mem::replace(&mut self.shown, today);
        Some(previous)
    }
}
