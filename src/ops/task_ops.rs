use chrono::NaiveDate;

use crate::model::collection::Collection;
use crate::model::task::{Task, clean_text, format_date};

/// Error type for task operations
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("task not found: {0}")]
    NotFound(String),
    #[error("task id prefix '{prefix}' is ambiguous ({count} matches)")]
    Ambiguous { prefix: String, count: usize },
    #[error("task {0} is archived")]
    Archived(String),
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Resolve a full id or a unique id prefix to the full id.
pub fn resolve_id(collection: &Collection, key: &str) -> Result<String, TaskError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(TaskError::NotFound(key.to_string()));
    }
    if let Some(task) = collection.find(key) {
        return Ok(task.id.clone());
    }
    let matches: Vec<&Task> = collection
        .tasks
        .iter()
        .filter(|t| t.id.starts_with(key))
        .collect();
    match matches.as_slice() {
        [] => Err(TaskError::NotFound(key.to_string())),
        [only] => Ok(only.id.clone()),
        many => Err(TaskError::Ambiguous {
            prefix: key.to_string(),
            count: many.len(),
        }),
    }
}

fn resolve_mut<'a>(collection: &'a mut Collection, key: &str) -> Result<&'a mut Task, TaskError> {
    let id = resolve_id(collection, key)?;
    collection
        .find_mut(&id)
        .ok_or(TaskError::NotFound(id))
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// Append a new task. Blank text is ignored and `None` returned.
pub fn add_task(collection: &mut Collection, raw_text: &str, today: NaiveDate) -> Option<Task> {
    let text = clean_text(raw_text)?;
    let task = Task::new(text, today);
    tracing::debug!(id = %task.short_id(), "task added");
    collection.tasks.push(task.clone());
    Some(task)
}

/// Check or uncheck an active task. Checking stamps the date with `today`
/// so the sweep archives it from tomorrow on.
pub fn set_checked(
    collection: &mut Collection,
    key: &str,
    checked: bool,
    today: NaiveDate,
) -> Result<Task, TaskError> {
    let task = resolve_mut(collection, key)?;
    if task.archive {
        return Err(TaskError::Archived(task.id.clone()));
    }
    if task.checked != checked {
        task.checked = checked;
        if checked {
            task.date = Some(format_date(today));
        }
    }
    Ok(task.clone())
}

/// Replace a task's text. Blank text is discarded and `Ok(None)` returned.
pub fn edit_text(
    collection: &mut Collection,
    key: &str,
    raw_text: &str,
) -> Result<Option<Task>, TaskError> {
    let task = resolve_mut(collection, key)?;
    let Some(text) = clean_text(raw_text) else {
        return Ok(None);
    };
    task.text = text;
    Ok(Some(task.clone()))
}

/// Flip the important flag
pub fn toggle_important(collection: &mut Collection, key: &str) -> Result<Task, TaskError> {
    let task = resolve_mut(collection, key)?;
    task.important = !task.important;
    Ok(task.clone())
}

/// Permanently remove a task, active or archived
pub fn delete_task(collection: &mut Collection, key: &str) -> Result<Task, TaskError> {
    let id = resolve_id(collection, key)?;
    let pos = collection
        .tasks
        .iter()
        .position(|t| t.id == id)
        .ok_or_else(|| TaskError::NotFound(id.clone()))?;
    let removed = collection.tasks.remove(pos);
    tracing::debug!(id = %removed.short_id(), archived = removed.archive, "task deleted");
    Ok(removed)
}

/// Permanently remove an archived task. Active tasks are refused so an
/// archive-view delete can't hit the main list.
pub fn delete_archived(collection: &mut Collection, key: &str) -> Result<Task, TaskError> {
    let id = resolve_id(collection, key)?;
    match collection.find(&id) {
        Some(task) if task.archive => delete_task(collection, &id),
        _ => Err(TaskError::NotFound(id)),
    }
}
