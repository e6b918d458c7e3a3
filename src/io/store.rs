use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::model::collection::{Collection, DEFAULT_GROUP_BY_PERIOD, Layout};
use crate::model::task::Task;
use crate::ops::clean::{self, CleanResult};

/// Error type for task file I/O
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("task file is empty")]
    Empty,
    #[error("could not parse task file: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("could not serialize tasks: {0}")]
    Encode(serde_json::Error),
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

// ---------------------------------------------------------------------------
// On-disk document
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDocument {
    List(Vec<Task>),
    Envelope(RawEnvelope),
}

#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(default = "default_group_by_period")]
    group_by_period: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    tasks: Vec<Task>,
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    group_by_period: bool,
    tasks: &'a [Task],
}

fn default_group_by_period() -> bool {
    DEFAULT_GROUP_BY_PERIOD
}

fn null_as_empty<'de, D: serde::Deserializer<'de>>(d: D) -> Result<Vec<Task>, D::Error> {
    Ok(Option::<Vec<Task>>::deserialize(d)?.unwrap_or_default())
}

/// Decode a task document. Accepts a bare list of records or the
/// `{group_by_period, tasks}` envelope.
pub fn decode(content: &str) -> Result<Collection, StoreError> {
    if content.trim().is_empty() {
        return Err(StoreError::Empty);
    }
    let collection = match serde_json::from_str::<RawDocument>(content)? {
        RawDocument::List(tasks) => Collection {
            tasks,
            group_by_period: DEFAULT_GROUP_BY_PERIOD,
            layout: Layout::List,
        },
        RawDocument::Envelope(env) => Collection {
            tasks: env.tasks,
            group_by_period: env.group_by_period,
            layout: Layout::Envelope,
        },
    };
    Ok(collection)
}

/// Encode the complete collection as pretty JSON in its layout.
pub fn encode(collection: &Collection) -> Result<String, StoreError> {
    let result = match collection.layout {
        Layout::List => serde_json::to_string_pretty(&collection.tasks),
        Layout::Envelope => serde_json::to_string_pretty(&EnvelopeRef {
            group_by_period: collection.group_by_period,
            tasks: &collection.tasks,
        }),
    };
    let mut out = result.map_err(StoreError::Encode)?;
    out.push('\n');
    Ok(out)
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

/// Load the collection from `path`. Never fails: a missing, unreadable or
/// malformed file yields an empty collection, and the next save rewrites it.
pub fn load(path: &Path) -> Collection {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "task file not found, starting empty");
            return Collection::new();
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not read task file, starting empty");
            return Collection::new();
        }
    };
    match decode(&content) {
        Ok(collection) => {
            tracing::debug!(path = %path.display(), tasks = collection.len(), "loaded task file");
            collection
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unusable task file");
            Collection::new()
        }
    }
}

/// Replace the file at `path` with the complete collection.
pub fn save(path: &Path, collection: &Collection) -> Result<(), StoreError> {
    let content = encode(collection)?;
    atomic_write(path, content.as_bytes()).map_err(|e| StoreError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), tasks = collection.len(), "saved task file");
    Ok(())
}

/// Write `content` to `path` atomically using a temp file + rename.
fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Result of a store round trip
#[derive(Debug)]
pub struct Updated<T> {
    /// The collection as it now stands in memory
    pub collection: Collection,
    /// What the load-time cleanup changed
    pub cleaned: CleanResult,
    /// Value returned by the mutation
    pub value: T,
    /// Whether the collection differs from the file as read
    pub changed: bool,
    /// Whether the collection was written; false with `changed` set means
    /// the write failed
    pub saved: bool,
}

/// The task file, accessed by full read and full rewrite.
///
/// Every mutation goes through [`Store::update`], which reads the file fresh,
/// applies the load-time cleanup (id repair, auto-archive sweep), runs the
/// mutation against the whole collection and writes the whole collection
/// back. Nothing holds a partial view across a save.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Store { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw load without cleanup
    pub fn load(&self) -> Collection {
        load(&self.path)
    }

    pub fn save(&self, collection: &Collection) -> Result<(), StoreError> {
        save(&self.path, collection)
    }

    /// Load, clean up, and persist the cleanup if it changed anything.
    pub fn open(&self, today: NaiveDate) -> Updated<()> {
        match self.update(today, |_| Ok::<(), std::convert::Infallible>(())) {
            Ok(updated) => updated,
            Err(never) => match never {},
        }
    }

    /// Read-modify-write the full collection.
    ///
    /// If `f` fails, the mutation is discarded but the cleanup is still
    /// persisted when it changed something. Write failures are logged and
    /// swallowed; the in-memory state is returned with `saved = false`.
    pub fn update<T, E>(
        &self,
        today: NaiveDate,
        f: impl FnOnce(&mut Collection) -> Result<T, E>,
    ) -> Result<Updated<T>, E> {
        let loaded = self.load();
        let mut collection = loaded.clone();
        let cleaned = clean::normalize(&mut collection, today);

        let mut working = collection.clone();
        match f(&mut working) {
            Ok(value) => {
                let changed = working != loaded;
                let saved = changed && self.save_logged(&working);
                Ok(Updated {
                    collection: working,
                    cleaned,
                    value,
                    changed,
                    saved,
                })
            }
            Err(e) => {
                if collection != loaded {
                    self.save_logged(&collection);
                }
                Err(e)
            }
        }
    }

    fn save_logged(&self, collection: &Collection) -> bool {
        match self.save(collection) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "task save failed, changes kept in memory only");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::parse_date;
    use tempfile::TempDir;

    fn day(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    const ENVELOPE: &str = r#"{
  "group_by_period": false,
  "tasks": [
    {
      "id": "a1",
      "text": "buy milk",
      "checked": true,
      "important": false,
      "archive": true,
      "date": "2024-01-01"
    },
    {
      "id": "b2",
      "text": "call mom",
      "checked": false,
      "important": true,
      "archive": false,
      "date": "2024-01-03"
    }
  ]
}
"#;

    #[test]
    fn decode_envelope() {
        let c = decode(ENVELOPE).unwrap();
        assert_eq!(c.layout, Layout::Envelope);
        assert!(!c.group_by_period);
        assert_eq!(c.len(), 2);
        assert_eq!(c.tasks[1].text, "call mom");
        assert!(c.tasks[1].important);
    }

    #[test]
    fn decode_bare_list() {
        let c = decode(r#"[{"id":"x","text":"t","checked":false,"archive":false}]"#).unwrap();
        assert_eq!(c.layout, Layout::List);
        assert!(c.group_by_period);
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn encode_is_byte_stable_for_canonical_input() {
        let c = decode(ENVELOPE).unwrap();
        assert_eq!(encode(&c).unwrap(), ENVELOPE);
    }

    #[test]
    fn decode_rejects_wrong_shapes() {
        assert!(decode("").is_err());
        assert!(decode("   \n").is_err());
        assert!(decode("not json {{{").is_err());
        assert!(decode("42").is_err());
        assert!(decode(r#""tasks""#).is_err());
        assert!(decode(r#"{"tasks": 5}"#).is_err());
        assert!(decode("[1, 2]").is_err());
    }

    const ODD_RECORDS: &str = r#"[
  {"id": "a1", "text": "paid rent", "checked": true, "archive": true, "date": "2023-12-01"},
  {"id": "b2", "text": "fixed bike", "checked": true, "archive": true, "date": "2023-12-20"},
  {"id": 1, "text": "buy milk", "checked": true, "archive": false, "date": "2024-01-01"},
  {"id": "c3", "text": null, "checked": "yes", "important": null, "archive": false}
]"#;

    #[test]
    fn decode_tolerates_odd_field_values() {
        let c = decode(ODD_RECORDS).unwrap();
        assert_eq!(c.len(), 4);
        assert_eq!(c.tasks[2].id, "1");
        assert_eq!(c.tasks[3].text, "");
        assert!(!c.tasks[3].checked);
        assert!(!c.tasks[3].important);
    }

    #[test]
    fn odd_record_does_not_cost_archived_history() {
        let tmp = TempDir::new().unwrap();
        let store = Store::new(tmp.path().join("tasks.json"));
        fs::write(store.path(), ODD_RECORDS).unwrap();

        let updated = store
            .update(day("2024-01-03"), |c| {
                Ok::<_, ()>(crate::ops::task_ops::add_task(c, "new", day("2024-01-03")))
            })
            .unwrap();
        assert!(updated.saved);

        let on_disk = store.load();
        assert_eq!(on_disk.len(), 5);
        assert!(on_disk.find("a1").unwrap().archive);
        assert!(on_disk.find("b2").unwrap().archive);
        let milk = on_disk.find("1").unwrap();
        assert!(milk.archive);
        assert_eq!(milk.date.as_deref(), Some("2024-01-01"));
        assert_eq!(on_disk.tasks[4].text, "new");
    }

    #[test]
    fn null_task_list_reads_as_empty() {
        let c = decode(r#"{"group_by_period": false, "tasks": null}"#).unwrap();
        assert!(c.is_empty());
        assert!(!c.group_by_period);
    }

    #[test]
    fn load_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let c = load(&tmp.path().join("tasks.json"));
        assert!(c.is_empty());
        assert_eq!(c.layout, Layout::Envelope);
    }

    #[test]
    fn load_malformed_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tasks.json");
        fs::write(&path, "[{\"text\": ").unwrap();
        assert!(load(&path).is_empty());
    }

    #[test]
    fn save_creates_parent_directory() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/dir/tasks.json");
        let c = decode(ENVELOPE).unwrap();
        save(&path, &c).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), ENVELOPE);
    }

    #[test]
    fn save_into_a_file_path_fails() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let err = save(&blocker.join("tasks.json"), &Collection::new()).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
    }

    #[test]
    fn update_writes_full_collection() {
        let tmp = TempDir::new().unwrap();
        let store = Store::new(tmp.path().join("tasks.json"));
        fs::write(store.path(), ENVELOPE).unwrap();

        let updated = store
            .update(day("2024-01-03"), |c| {
                c.tasks.push(Task::new("new".into(), day("2024-01-03")));
                Ok::<_, ()>(())
            })
            .unwrap();
        assert!(updated.saved);

        let on_disk = store.load();
        assert_eq!(on_disk.len(), 3);
        // The archived record survived the rewrite
        assert!(on_disk.find("a1").unwrap().archive);
        assert!(!on_disk.group_by_period);
    }

    #[test]
    fn update_without_changes_does_not_write() {
        let tmp = TempDir::new().unwrap();
        let store = Store::new(tmp.path().join("tasks.json"));
        fs::write(store.path(), ENVELOPE).unwrap();

        let updated = store
            .update(day("2024-01-03"), |_| Ok::<_, ()>(()))
            .unwrap();
        assert!(!updated.changed);
        assert!(!updated.saved);
    }

    #[test]
    fn write_failure_is_reported_not_raised() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let store = Store::new(blocker.join("tasks.json"));

        let updated = store
            .update(day("2024-01-03"), |c| {
                c.tasks.push(Task::new("kept in memory".into(), day("2024-01-03")));
                Ok::<_, ()>(())
            })
            .unwrap();
        assert!(updated.changed);
        assert!(!updated.saved);
        assert_eq!(updated.collection.len(), 1);
    }

    #[test]
    fn failed_mutation_still_persists_cleanup() {
        let tmp = TempDir::new().unwrap();
        let store = Store::new(tmp.path().join("tasks.json"));
        fs::write(store.path(), r#"[{"text":"no id","checked":false,"archive":false}]"#).unwrap();

        let result = store.update(day("2024-01-03"), |_| Err::<(), _>("nope"));
        assert_eq!(result.unwrap_err(), "nope");
        let on_disk = store.load();
        assert!(!on_disk.tasks[0].id.is_empty());
    }

    #[test]
    fn open_on_missing_file_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let store = Store::new(tmp.path().join("tasks.json"));
        let opened = store.open(day("2024-01-03"));
        assert!(opened.collection.is_empty());
        assert!(!opened.saved);
        assert!(!store.path().exists());
    }
}
