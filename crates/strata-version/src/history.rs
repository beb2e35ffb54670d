use std::sync::{Arc, RwLock};

use tracing::debug;

use strata_events::{ChangeBus, EventKind};

use crate::version::Version;

/// The version-history component of a single file.
///
/// Holds the append-only list of the file's versions in creation order and
/// the current-version pointer. The pointer is updated by a direct call
/// from the version-creation path ([`VersionHistory::record`]); the change
/// bus is notified afterwards, for external observers only, so delivery can
/// never reorder the history's own state.
///
/// The history owns every version strongly; versions point back with a
/// `Weak`, keeping the structure acyclic.
pub struct VersionHistory {
    /// Path of the owning file, fixed at creation.
    path: String,
    /// Maximum version count for this file; `None` means unlimited.
    max_versions: Option<u32>,
    bus: Arc<ChangeBus>,
    versions: RwLock<Vec<Arc<Version>>>,
    current: RwLock<Arc<Version>>,
}

impl VersionHistory {
    /// Create a history seeded with the file's initial version.
    ///
    /// No event is emitted for the seed: the caller creating the file emits
    /// file-created followed by version-created, preserving causal order.
    pub fn new(
        path: impl Into<String>,
        max_versions: Option<u32>,
        bus: Arc<ChangeBus>,
    ) -> Arc<Self> {
        let path = path.into();
        Arc::new_cyclic(|history| {
            let initial = Version::initial(history.clone());
            Self {
                path,
                max_versions,
                bus,
                versions: RwLock::new(vec![Arc::clone(&initial)]),
                current: RwLock::new(initial),
            }
        })
    }

    /// Path of the owning file.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The configured versions-per-file maximum, if any.
    pub fn max_versions(&self) -> Option<u32> {
        self.max_versions
    }

    /// Number of versions, counting the initial one.
    pub fn version_count(&self) -> usize {
        self.versions.read().expect("history lock poisoned").len()
    }

    /// Snapshot of all versions in creation order.
    pub fn versions(&self) -> Vec<Arc<Version>> {
        self.versions.read().expect("history lock poisoned").clone()
    }

    /// The current (most recently created) version.
    pub fn current(&self) -> Arc<Version> {
        Arc::clone(&self.current.read().expect("history lock poisoned"))
    }

    /// Register a freshly created version: append it, move the current
    /// pointer, then notify external observers.
    pub(crate) fn record(&self, version: &Arc<Version>) {
        {
            let mut versions = self.versions.write().expect("history lock poisoned");
            versions.push(Arc::clone(version));
            *self.current.write().expect("history lock poisoned") = Arc::clone(version);
        }
        debug!(path = %self.path, version = %version.id(), "version recorded");
        self.bus
            .emit(EventKind::VersionCreated, &self.path, Some(version.id()));
    }
}

impl std::fmt::Debug for VersionHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionHistory")
            .field("path", &self.path)
            .field("version_count", &self.version_count())
            .finish()
    }
}
