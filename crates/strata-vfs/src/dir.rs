use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, RwLock};

use strata_events::EventKind;

use crate::entry::Entry;
use crate::error::{VfsError, VfsResult};
use crate::file::VirtualFile;
use crate::fs::FsCore;
use crate::path::{self, ROOT_PATH};

/// A directory in the virtual tree.
///
/// A directory owns its entries, keyed case-sensitively by name. Entry
/// creation enforces, in order: the per-directory entry limit, name
/// validity, and per-directory name uniqueness.
pub struct VirtualDirectory {
    name: String,
    path: String,
    core: Arc<FsCore>,
    entries: RwLock<BTreeMap<String, Entry>>,
}

impl VirtualDirectory {
    /// The file system's root directory.
    pub(crate) fn root(core: Arc<FsCore>) -> Arc<Self> {
        Arc::new(Self {
            name: ROOT_PATH.to_string(),
            path: ROOT_PATH.to_string(),
            core,
            entries: RwLock::new(BTreeMap::new()),
        })
    }

    /// The directory's name; the root's name is the path delimiter itself.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The directory's absolute path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Create a subdirectory.
    pub fn create_dir(&self, name: &str) -> VfsResult<Arc<VirtualDirectory>> {
        let mut entries = self.entries.write().expect("directory lock poisoned");
        self.check_insertable(&entries, name)?;

        let dir = Arc::new(VirtualDirectory {
            name: name.to_string(),
            path: path::join(&self.path, name),
            core: Arc::clone(&self.core),
            entries: RwLock::new(BTreeMap::new()),
        });
        entries.insert(name.to_string(), Entry::Directory(Arc::clone(&dir)));
        drop(entries);

        self.core
            .bus
            .emit(EventKind::DirectoryCreated, dir.path(), None);
        Ok(dir)
    }

    /// Create a file, seeding its initial version.
    ///
    /// Emits file-created followed by version-created for the seeded
    /// version: causal order, container before dependent.
    pub fn create_file(&self, name: &str) -> VfsResult<Arc<VirtualFile>> {
        let mut entries = self.entries.write().expect("directory lock poisoned");
        self.check_insertable(&entries, name)?;

        let file = Arc::new(VirtualFile::new(
            name,
            path::join(&self.path, name),
            self.core.options.max_versions_per_file,
            Arc::clone(&self.core.bus),
        ));
        entries.insert(name.to_string(), Entry::File(Arc::clone(&file)));
        drop(entries);

        self.core.bus.emit(EventKind::FileCreated, file.path(), None);
        self.core.bus.emit(
            EventKind::VersionCreated,
            file.path(),
            Some(file.current_version().id()),
        );
        Ok(file)
    }

    /// Snapshot of the directory's direct entries, sorted by name.
    pub fn entries(&self) -> Vec<Entry> {
        self.entries
            .read()
            .expect("directory lock poisoned")
            .values()
            .cloned()
            .collect()
    }

    /// Number of direct entries.
    pub fn entry_count(&self) -> usize {
        self.entries.read().expect("directory lock poisoned").len()
    }

    /// Breadth-first traversal over all transitive entries, the directory
    /// itself excluded.
    pub fn walk(self: &Arc<Self>) -> Walk {
        Walk {
            queue: VecDeque::from([Arc::clone(self)]),
            pending: VecDeque::new(),
        }
    }

    fn check_insertable(&self, entries: &BTreeMap<String, Entry>, name: &str) -> VfsResult<()> {
        if let Some(limit) = self.core.options.max_entries_per_directory {
            if entries.len() >= limit as usize {
                return Err(VfsError::EntryLimitExceeded { limit });
            }
        }
        path::validate_entry_name(name)?;
        if entries.contains_key(name) {
            return Err(VfsError::EntryExists {
                path: path::join(&self.path, name),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for VirtualDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualDirectory")
            .field("path", &self.path)
            .field("entry_count", &self.entry_count())
            .finish()
    }
}

/// Breadth-first iterator over a directory's transitive entries.
///
/// Entries are yielded directory by directory: all of one directory's
/// entries before any of a subdirectory's.
pub struct Walk {
    queue: VecDeque<Arc<VirtualDirectory>>,
    pending: VecDeque<Entry>,
}

impl Iterator for Walk {
    type Item = Entry;

    fn next(&mut self) -> Option<Entry> {
        loop {
            if let Some(entry) = self.pending.pop_front() {
                if let Entry::Directory(dir) = &entry {
                    self.queue.push_back(Arc::clone(dir));
                }
                return Some(entry);
            }
            let dir = self.queue.pop_front()?;
            self.pending.extend(dir.entries());
        }
    }
}
