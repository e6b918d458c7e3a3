use std::ffi::OsString;
use std::path::Path;
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Events sent from the file watcher to the watch loop.
#[derive(Debug, PartialEq, Eq)]
pub enum FileEvent {
    /// The task file was created, modified or removed.
    Changed,
}

/// Watches the task file for edits made outside this process.
///
/// The parent directory is watched rather than the file itself, because
/// saves replace the file through a rename.
pub struct StoreWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<FileEvent>,
}

impl StoreWatcher {
    /// Start watching `store_path`.
    /// Returns a `StoreWatcher` whose `poll()` method should be called each tick.
    pub fn start(store_path: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let dir = match store_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => Path::new(".").to_path_buf(),
        };
        let file_name: Option<OsString> = store_path.file_name().map(|n| n.to_os_string());

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(_) => return,
                };

                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }

                let relevant = event
                    .paths
                    .iter()
                    .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);

                if relevant {
                    let _ = tx.send(FileEvent::Changed);
                }
            },
            Config::default(),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        Ok(StoreWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Non-blocking drain of pending events. Several events for one write
    /// collapse into a single `true`.
    pub fn poll(&self) -> bool {
        let mut changed = false;
        while let Ok(FileEvent::Changed) = self.rx.try_recv() {
            changed = true;
        }
        changed
    }
}
