use std::collections::HashSet;

use chrono::NaiveDate;

use crate::model::collection::Collection;
use crate::model::task::generate_id;
use crate::ops::archive::{self, ArchiveRecord};

/// What the load-time cleanup changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanResult {
    /// Ids given to records that had none
    pub ids_assigned: Vec<IdAssignment>,
    /// Duplicate ids replaced (first occurrence keeps its id)
    pub duplicates_resolved: Vec<DuplicateResolution>,
    /// Checked tasks moved to the archive by the sweep
    pub tasks_archived: Vec<ArchiveRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAssignment {
    pub assigned_id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateResolution {
    pub original_id: String,
    pub new_id: String,
    pub text: String,
}

impl CleanResult {
    pub fn is_empty(&self) -> bool {
        self.ids_assigned.is_empty()
            && self.duplicates_resolved.is_empty()
            && self.tasks_archived.is_empty()
    }
}

/// Cleanup run on every load, before anything is shown or mutated:
/// 1. Assign ids to records missing them
/// 2. Reassign duplicate ids
/// 3. Auto-archive sweep against `today`
pub fn normalize(collection: &mut Collection, today: NaiveDate) -> CleanResult {
    let mut result = CleanResult::default();
    ensure_ids(collection, &mut result);
    result.tasks_archived = archive::sweep(collection, today);

    if !result.is_empty() {
        tracing::info!(
            ids = result.ids_assigned.len(),
            duplicates = result.duplicates_resolved.len(),
            archived = result.tasks_archived.len(),
            "cleaned task file"
        );
    }
    result
}

/// Give every record a unique, non-empty id.
fn ensure_ids(collection: &mut Collection, result: &mut CleanResult) {
    let mut seen: HashSet<String> = HashSet::new();
    for task in &mut collection.tasks {
        if task.id.trim().is_empty() {
            task.id = generate_id();
            let assignment = IdAssignment {
                assigned_id: task.id.clone(),
                text: task.text.clone(),
            };
            tracing::debug!(id = %assignment.assigned_id, text = %assignment.text, "task id assigned");
            result.ids_assigned.push(assignment);
        } else if seen.contains(&task.id) {
            let original_id = std::mem::replace(&mut task.id, generate_id());
            tracing::warn!(id = %original_id, new_id = %task.id, text = %task.text, "duplicate task id reassigned");
            result.duplicates_resolved.push(DuplicateResolution {
                original_id,
                new_id: task.id.clone(),
                text: task.text.clone(),
            });
        }
        seen.insert(task.id.clone());
    }
}
