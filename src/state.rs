use parking_lot::Mutex;

use crate::events::{self, EventSender, PushEvent};
use crate::settings::{KeyValueStore, SettingsStore};
use crate::watcher::DirectoryWatcher;

/// Shared by every worker through `web::Data`.
pub struct AppState {
    pub watcher: Mutex<DirectoryWatcher>,
    pub settings: Mutex<SettingsStore>,
    pub events: EventSender,
}

impl AppState {
    pub fn new(storage: Box<dyn KeyValueStore>, event_capacity: usize) -> Self {
        let events = events::channel(event_capacity);
        Self {
            watcher: Mutex::new(DirectoryWatcher::new(events.clone())),
            settings: Mutex::new(SettingsStore::load(storage)),
            events,
        }
    }

    /// Sends to current subscribers; with none connected the event is dropped.
    pub fn publish(&self, event: PushEvent) {
        let _ = self.events.send(event);
    }
}
