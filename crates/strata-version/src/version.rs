use std::sync::{Arc, RwLock, Weak};

use strata_layer::SparseLayer;
use strata_types::VersionId;

use crate::error::{VersionError, VersionResult};
use crate::history::VersionHistory;
use crate::stream::VersionStream;

/// One version of a file's content.
///
/// A version exclusively owns its [`SparseLayer`] (1:1) and links backward
/// to its parent version the same way layers link to their ancestors:
/// strong, shared, acyclic. The child slot transitions `Empty → Occupied`
/// exactly once, on the first successful [`Version::create_version`]; the
/// slot holds a `Weak` because the owning history keeps every version
/// alive for the file's lifetime.
///
/// Versions carry identity, not value: two versions are never equal, and
/// comparisons go through [`VersionId`] or `Arc` pointer identity.
pub struct Version {
    id: VersionId,
    layer: Arc<SparseLayer>,
    parent: Option<Arc<Version>>,
    child: RwLock<Option<Weak<Version>>>,
    history: Weak<VersionHistory>,
}

impl Version {
    /// A file's first version: fresh empty layer, no parent. Only the
    /// history constructor calls this.
    pub(crate) fn initial(history: Weak<VersionHistory>) -> Arc<Self> {
        Arc::new(Self {
            id: VersionId::new(),
            layer: SparseLayer::new(),
            parent: None,
            child: RwLock::new(None),
            history,
        })
    }

    /// Unique identity, minted at creation.
    pub fn id(&self) -> VersionId {
        self.id
    }

    /// Logical length of this version's content.
    pub fn len(&self) -> u64 {
        self.layer.len()
    }

    /// Returns `true` if the logical length is zero.
    pub fn is_empty(&self) -> bool {
        self.layer.is_empty()
    }

    /// The parent version; `None` only for a file's first version.
    pub fn parent(&self) -> Option<Arc<Version>> {
        self.parent.clone()
    }

    /// The child version; `None` until [`Version::create_version`] succeeds.
    pub fn child(&self) -> Option<Arc<Version>> {
        self.child
            .read()
            .expect("version lock poisoned")
            .as_ref()
            .and_then(Weak::upgrade)
    }

    /// The owning file's version-history component. Stable for the
    /// version's lifetime; `None` only after the owning file is gone.
    pub fn history(&self) -> Option<Arc<VersionHistory>> {
        self.history.upgrade()
    }

    /// Open a new stream over this version's content. Every call returns an
    /// independent stream with its own position.
    pub fn stream(&self) -> VersionStream {
        VersionStream::new(Arc::clone(&self.layer))
    }

    /// Create this version's child version.
    ///
    /// Derives a child layer (freezing this version's layer for good),
    /// registers the child with the owning history, and emits a
    /// version-created notification — all before returning. Fails with
    /// [`VersionError::LimitExceeded`] when the file is at its configured
    /// version maximum and with [`VersionError::ChildExists`] on a second
    /// attempt.
    pub fn create_version(self: &Arc<Self>) -> VersionResult<Arc<Version>> {
        let history = self.history.upgrade().ok_or(VersionError::OwnerReleased)?;

        if let Some(limit) = history.max_versions() {
            if history.version_count() >= limit as usize {
                return Err(VersionError::LimitExceeded { limit });
            }
        }

        let mut child_slot = self.child.write().expect("version lock poisoned");
        if child_slot.is_some() {
            return Err(VersionError::ChildExists);
        }

        let layer = self.layer.derive_child()?;
        let child = Arc::new(Version {
            id: VersionId::new(),
            layer,
            parent: Some(Arc::clone(self)),
            child: RwLock::new(None),
            history: self.history.clone(),
        });
        *child_slot = Some(Arc::downgrade(&child));
        drop(child_slot);

        history.record(&child);
        Ok(child)
    }
}

impl std::fmt::Debug for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Version")
            .field("id", &self.id)
            .field("len", &self.len())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}
