use std::sync::Arc;

use strata_events::ChangeBus;
use strata_version::{Version, VersionHistory};

/// A file in the virtual tree.
///
/// A file is a name, a path fixed at creation, and the version-history
/// component that owns its content. The file wraps the same
/// `Arc<VersionHistory>` that every version of the file points back to, so
/// a version's owner can be identified by `Arc` pointer identity.
pub struct VirtualFile {
    name: String,
    path: String,
    history: Arc<VersionHistory>,
}

impl VirtualFile {
    /// Create a file with its initial version seeded. The caller emits the
    /// file-created and version-created events after inserting the entry.
    pub(crate) fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        max_versions: Option<u32>,
        bus: Arc<ChangeBus>,
    ) -> Self {
        let name = name.into();
        let path = path.into();
        let history = VersionHistory::new(path.clone(), max_versions, bus);
        Self {
            name,
            path,
            history,
        }
    }

    /// The file's name within its directory.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The file's absolute path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The current (most recently created) version.
    pub fn current_version(&self) -> Arc<Version> {
        self.history.current()
    }

    /// All versions in creation order, starting with the initial version.
    pub fn versions(&self) -> Vec<Arc<Version>> {
        self.history.versions()
    }

    /// The file's version-history component.
    pub fn history(&self) -> &Arc<VersionHistory> {
        &self.history
    }
}

impl std::fmt::Debug for VirtualFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualFile")
            .field("path", &self.path)
            .field("versions", &self.history.version_count())
            .finish()
    }
}
