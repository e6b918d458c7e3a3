use super::task::Task;

/// Default for the archive grouping preference when the document has none
pub const DEFAULT_GROUP_BY_PERIOD: bool = true;

/// Top-level shape of the task document on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// A bare JSON array of task records
    List,
    /// `{ "group_by_period": bool, "tasks": [...] }`
    #[default]
    Envelope,
}

/// The full set of task records (active and archived) plus the display
/// preference persisted alongside them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    /// Records in insertion order
    pub tasks: Vec<Task>,
    /// Whether the archive view groups tasks into time buckets
    pub group_by_period: bool,
    /// Shape the document was read in; controls how it is written back
    pub layout: Layout,
}

impl Default for Collection {
    fn default() -> Self {
        Collection {
            tasks: Vec::new(),
            group_by_period: DEFAULT_GROUP_BY_PERIOD,
            layout: Layout::Envelope,
        }
    }
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Find a record by its exact id
    pub fn find(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Find a record by its exact id (mutable)
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Set the grouping preference. A bare-list document can't carry the
    /// flag, so moving away from the default switches it to the envelope.
    pub fn set_group_by_period(&mut self, value: bool) {
        self.group_by_period = value;
        if value != DEFAULT_GROUP_BY_PERIOD {
            self.layout = Layout::Envelope;
        }
    }
}
