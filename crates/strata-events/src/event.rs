use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use strata_types::VersionId;

/// Classification of change events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// A new directory has been created.
    DirectoryCreated,
    /// A new file has been created.
    FileCreated,
    /// A new file version has been created.
    VersionCreated,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::DirectoryCreated => "DirectoryCreated",
            Self::FileCreated => "FileCreated",
            Self::VersionCreated => "VersionCreated",
        };
        write!(f, "{s}")
    }
}

/// A single change notification.
///
/// Events carry a bus-assigned sequence number: within one bus, `seq` is
/// strictly increasing in emission order, which makes the causal-order
/// contract observable (a file-created event always carries a smaller `seq`
/// than the version-created event for its initial version).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Bus-assigned, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock time the event was emitted.
    pub timestamp: DateTime<Utc>,
    /// Classification of this event.
    pub kind: EventKind,
    /// Absolute path of the created entry (for version events, the owning
    /// file's path).
    pub path: String,
    /// The created version, present only for [`EventKind::VersionCreated`].
    pub version: Option<VersionId>,
}

/// Filter for subscribing to a subset of change events.
#[derive(Clone, Debug, Default)]
pub struct EventFilter {
    /// If set, only events of these kinds are delivered.
    pub kinds: Option<Vec<EventKind>>,
    /// If set, only events whose path starts with this prefix are delivered.
    pub path_prefix: Option<String>,
}

impl EventFilter {
    /// Returns `true` if the given event matches this filter.
    pub fn matches(&self, event: &ChangeEvent) -> bool {
        if let Some(ref kinds) = self.kinds {
            if !kinds.contains(&event.kind) {
                return false;
            }
        }
        if let Some(ref prefix) = self.path_prefix {
            if !event.path.starts_with(prefix.as_str()) {
                return false;
            }
        }
        true
    }
}
