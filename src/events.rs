use serde::Serialize;
use tokio::sync::broadcast;

use crate::settings::DocumentStyle;

pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Payload of `directory-changed`. `filename` may be absent when the host
/// cannot attribute the change to an entry.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryChange {
    pub event_type: String,
    pub filename: Option<String>,
    pub dir_path: String,
}

/// Everything the server pushes to the renderer.
#[derive(Debug, Clone)]
pub enum PushEvent {
    DirectoryChanged(DirectoryChange),
    StyleApplied(DocumentStyle),
}

impl PushEvent {
    pub fn name(&self) -> &'static str {
        match self {
            PushEvent::DirectoryChanged(_) => "directory-changed",
            PushEvent::StyleApplied(_) => "style-applied",
        }
    }

    /// Encodes the event as one Server-Sent Events frame.
    pub fn to_sse_frame(&self) -> Result<String, serde_json::Error> {
        let data = match self {
            PushEvent::DirectoryChanged(change) => serde_json::to_string(change)?,
            PushEvent::StyleApplied(style) => serde_json::to_string(style)?,
        };
        Ok(format!("event: {}\ndata: {}\n\n", self.name(), data))
    }
}

pub type EventSender = broadcast::Sender<PushEvent>;

pub fn channel(capacity: usize) -> EventSender {
    let (tx, _rx) = broadcast::channel(capacity.max(1));
    tx
}
