use crate::events::{DirectoryChange, EventSender, PushEvent};
use log::{debug, info, warn};
use notify::event::ModifyKind;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// The one live recursive watch. Dropping it closes the OS handle.
struct WatchSession {
    root: PathBuf,
    generation: u64,
    _watcher: RecommendedWatcher,
}

/// Owns at most one watch session for the whole process.
///
/// Every session is stamped with a generation; the notify callback compares
/// it against the current one, so events from a closed session that are
/// still in flight never reach subscribers.
pub struct DirectoryWatcher {
    session: Option<WatchSession>,
    current: Arc<AtomicU64>,
    events: EventSender,
}

impl DirectoryWatcher {
    pub fn new(events: EventSender) -> Self {
        Self {
            session: None,
            current: Arc::new(AtomicU64::new(0)),
            events,
        }
    }

    pub fn is_watching(&self) -> bool {
        self.session.is_some()
    }

    pub fn watched_root(&self) -> Option<&Path> {
        self.session.as_ref().map(|s| s.root.as_path())
    }

    /// Replaces any active session with a recursive watch on `path`.
    pub fn start(&mut self, path: &str) -> Result<(), notify::Error> {
        self.stop();

        let root = PathBuf::from(path);
        let generation = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        let current = Arc::clone(&self.current);
        let events = self.events.clone();
        let callback_root = root.clone();
        let dir_path = path.to_string();

        let mut watcher = notify::recommended_watcher(
            move |res: Result<notify::Event, notify::Error>| {
                if current.load(Ordering::SeqCst) != generation {
                    return;
                }
                let event = match res {
                    Ok(event) => event,
                    Err(e) => {
                        warn!("Watch error under '{}': {}", dir_path, e);
                        return;
                    }
                };
                for change in changes_from_event(&event, &callback_root, &dir_path) {
                    // No subscribers is fine; the event is simply dropped.
                    let _ = events.send(PushEvent::DirectoryChanged(change));
                }
            },
        )?;
        watcher.watch(&root, RecursiveMode::Recursive)?;

        info!("Watching directory: {}", root.display());
        self.session = Some(WatchSession {
            root,
            generation,
            _watcher: watcher,
        });
        Ok(())
    }

    /// Closes the active session, if any.
    pub fn stop(&mut self) {
        // Invalidate before dropping so queued callbacks see a stale generation.
        self.current.fetch_add(1, Ordering::SeqCst);
        if let Some(session) = self.session.take() {
            info!(
                "Stopped watching directory: {} (session {})",
                session.root.display(),
                session.generation
            );
        }
    }
}

/// Host-style event names: entries appearing, vanishing or being renamed are
/// `rename`; everything else that touches content is `change`.
fn event_type(kind: &EventKind) -> Option<&'static str> {
    match kind {
        EventKind::Access(_) => None,
        EventKind::Create(_) | EventKind::Remove(_) => Some("rename"),
        EventKind::Modify(ModifyKind::Name(_)) => Some("rename"),
        EventKind::Modify(_) | EventKind::Any | EventKind::Other => Some("change"),
    }
}

fn relative_filename(path: &Path, root: &Path) -> Option<String> {
    match path.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => Some(rel.to_string_lossy().to_string()),
        _ => path.file_name().map(|n| n.to_string_lossy().to_string()),
    }
}

fn changes_from_event(event: &notify::Event, root: &Path, dir_path: &str) -> Vec<DirectoryChange> {
    let Some(event_type) = event_type(&event.kind) else {
        return Vec::new();
    };
    if event.paths.is_empty() {
        return vec![DirectoryChange {
            event_type: event_type.to_string(),
            filename: None,
            dir_path: dir_path.to_string(),
        }];
    }
    debug!("{:?} under '{}': {:?}", event.kind, dir_path, event.paths);
    event
        .paths
        .iter()
        .map(|path| DirectoryChange {
            event_type: event_type.to_string(),
            filename: relative_filename(path, root),
            dir_path: dir_path.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events;
    use notify::event::{AccessKind, CreateKind, DataChange, RemoveKind, RenameMode};
    use std::time::Duration;
    use tokio::sync::broadcast;

    fn event(kind: EventKind, paths: Vec<PathBuf>) -> notify::Event {
        notify::Event {
            kind,
            paths,
            attrs: Default::default(),
        }
    }

    #[test]
    fn structural_changes_map_to_rename() {
        assert_eq!(event_type(&EventKind::Create(CreateKind::File)), Some("rename"));
        assert_eq!(event_type(&EventKind::Remove(RemoveKind::Folder)), Some("rename"));
        assert_eq!(
            event_type(&EventKind::Modify(ModifyKind::Name(RenameMode::Both))),
            Some("rename")
        );
    }

    #[test]
    fn content_changes_map_to_change_and_access_is_dropped() {
        assert_eq!(
            event_type(&EventKind::Modify(ModifyKind::Data(DataChange::Content))),
            Some("change")
        );
        assert_eq!(event_type(&EventKind::Any), Some("change"));
        assert_eq!(event_type(&EventKind::Access(AccessKind::Any)), None);
    }

    #[test]
    fn one_change_per_path_relative_to_root() {
        let root = PathBuf::from("/work");
        let ev = event(
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            vec![root.join("old.txt"), root.join("src").join("new.txt")],
        );
        let changes = changes_from_event(&ev, &root, "/work");
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].filename.as_deref(), Some("old.txt"));
        assert_eq!(
            changes[1].filename.as_deref().map(PathBuf::from),
            Some(PathBuf::from("src").join("new.txt"))
        );
        assert!(changes.iter().all(|c| c.event_type == "rename" && c.dir_path == "/work"));
    }

    #[test]
    fn paths_outside_root_fall_back_to_file_name() {
        let root = PathBuf::from("/work");
        let ev = event(
            EventKind::Create(CreateKind::Any),
            vec![PathBuf::from("/private/work/x.txt")],
        );
        let changes = changes_from_event(&ev, &root, "/work");
        assert_eq!(changes[0].filename.as_deref(), Some("x.txt"));
    }

    #[test]
    fn watching_missing_root_fails_and_stays_idle() {
        let dir = tempfile::tempdir().unwrap();
        let mut watcher = DirectoryWatcher::new(events::channel(8));
        let missing = dir.path().join("missing");
        assert!(watcher.start(missing.to_str().unwrap()).is_err());
        assert!(!watcher.is_watching());
    }

    #[test]
    fn stop_is_idempotent() {
        let mut watcher = DirectoryWatcher::new(events::channel(8));
        watcher.stop();
        watcher.stop();
        assert!(!watcher.is_watching());
    }

    async fn next_change(rx: &mut broadcast::Receiver<PushEvent>) -> Option<DirectoryChange> {
        loop {
            match tokio::time::timeout(Duration::from_secs(5), rx.recv()).await {
                Ok(Ok(PushEvent::DirectoryChanged(change))) => return Some(change),
                Ok(Ok(_)) => continue,
                Ok(Err(broadcast::error::RecvError::Lagged(_))) => continue,
                Ok(Err(broadcast::error::RecvError::Closed)) | Err(_) => return None,
            }
        }
    }

    #[actix_rt::test]
    async fn superseding_watch_silences_previous_root() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let first_path = first.path().to_str().unwrap().to_string();
        let second_path = second.path().to_str().unwrap().to_string();

        let tx = events::channel(64);
        let mut rx = tx.subscribe();
        let mut watcher = DirectoryWatcher::new(tx);

        watcher.start(&first_path).unwrap();
        watcher.start(&second_path).unwrap();
        assert_eq!(watcher.watched_root(), Some(second.path()));

        std::fs::write(first.path().join("ignored.txt"), "a").unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        std::fs::write(second.path().join("seen.txt"), "b").unwrap();

        loop {
            let change = next_change(&mut rx).await.expect("event from second root");
            assert_eq!(change.dir_path, second_path, "no events from the first root");
            if change.filename.as_deref() == Some("seen.txt") {
                break;
            }
        }

        watcher.stop();
        assert!(!watcher.is_watching());
    }
}
