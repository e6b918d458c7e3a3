use chrono::NaiveDate;
use serde::Serialize;

use crate::model::task::Task;
use crate::ops::archive::ArchiveRecord;
use crate::ops::bucket::{Bucket, BucketGroup};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ActiveJson<'a> {
    pub today: String,
    pub tasks: &'a [&'a Task],
}

#[derive(Serialize)]
pub struct ArchiveJson<'a> {
    pub group_by_period: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<BucketJson<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<&'a Task>>,
}

#[derive(Serialize)]
pub struct BucketJson<'a> {
    pub bucket: Bucket,
    pub label: &'static str,
    pub tasks: Vec<&'a Task>,
}

#[derive(Serialize)]
pub struct ArchivedJson<'a> {
    pub archived: &'a [ArchiveRecord],
}

pub fn groups_to_json<'a>(groups: &[BucketGroup<'a>]) -> Vec<BucketJson<'a>> {
    groups
        .iter()
        .map(|g| BucketJson {
            bucket: g.bucket,
            label: g.bucket.label(),
            tasks: g.tasks.clone(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

/// `19.10, Monday`
pub fn header(today: NaiveDate) -> String {
    today.format("%d.%m, %A").to_string()
}

/// One active-list row: `[x] 1a2b3c4d ! text`
pub fn task_line(task: &Task) -> String {
    let check = if task.checked { 'x' } else { ' ' };
    let mark = if task.important { '!' } else { ' ' };
    format!("[{}] {} {} {}", check, task.short_id(), mark, task.text)
}

/// One archive row: `1a2b3c4d  18.10 - text`
pub fn archive_line(task: &Task) -> String {
    let date = task
        .parsed_date()
        .map(|d| d.format("%d.%m").to_string())
        .unwrap_or_else(|| "--.--".to_string());
    format!("{}  {} - {}", task.short_id(), date, task.text)
}

pub fn render_active(today: NaiveDate, tasks: &[&Task]) -> String {
    let mut lines = vec![header(today)];
    if tasks.is_empty() {
        lines.push("No tasks".to_string());
    }
    for task in tasks {
        lines.push(task_line(task));
    }
    lines.join("\n")
}

pub fn render_archive_grouped(groups: &[BucketGroup<'_>]) -> String {
    if groups.is_empty() {
        return "Archive is empty".to_string();
    }
    let mut lines = Vec::new();
    for group in groups {
        lines.push(group.bucket.label().to_string());
        for task in &group.tasks {
            lines.push(format!("  {}", archive_line(task)));
        }
    }
    lines.join("\n")
}

/// Confirmation for a manual archive: a count, then one row per task
pub fn render_archived(records: &[ArchiveRecord]) -> String {
    let mut lines = vec![match records.len() {
        0 => "no done tasks to archive".to_string(),
        1 => "archived 1 task".to_string(),
        n => format!("archived {} tasks", n),
    }];
    for record in records {
        lines.push(format!("  {}", record.text));
    }
    lines.join("\n")
}

pub fn render_archive_flat(tasks: &[&Task]) -> String {
    if tasks.is_empty() {
        return "Archive is empty".to_string();
    }
    tasks
        .iter()
        .map(|t| archive_line(t))
        .collect::<Vec<_>>()
        .join("\n")
}
