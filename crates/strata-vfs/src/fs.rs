use std::sync::Arc;

use tracing::info;

use strata_events::{ChangeBus, EventFilter, EventStream};
use strata_types::FsOptions;

use crate::dir::VirtualDirectory;
use crate::entry::Entry;
use crate::error::{VfsError, VfsResult};
use crate::file::VirtualFile;

/// State shared by every directory of one file system instance: the limits,
/// fixed at construction, and the change bus.
pub(crate) struct FsCore {
    pub(crate) options: FsOptions,
    pub(crate) bus: Arc<ChangeBus>,
}

/// An in-memory virtual file system with versioned files.
///
/// The file system owns the root directory and the process-wide change bus.
/// Limits are supplied once at construction and are immutable thereafter.
pub struct VirtualFileSystem {
    core: Arc<FsCore>,
    root: Arc<VirtualDirectory>,
}

impl VirtualFileSystem {
    /// Create a file system with the given limits.
    pub fn new(options: FsOptions) -> Self {
        let core = Arc::new(FsCore {
            options,
            bus: Arc::new(ChangeBus::new()),
        });
        let root = VirtualDirectory::root(Arc::clone(&core));
        info!(?options, "virtual file system created");
        Self { core, root }
    }

    /// The root directory.
    pub fn root(&self) -> &Arc<VirtualDirectory> {
        &self.root
    }

    /// The limits this file system was created with.
    pub fn options(&self) -> FsOptions {
        self.core.options
    }

    /// Subscribe to change events matching the given filter.
    pub fn subscribe(&self, filter: EventFilter) -> EventStream {
        self.core.bus.subscribe(filter)
    }

    /// Find a directory by absolute path.
    pub fn directory(&self, path: &str) -> VfsResult<Arc<VirtualDirectory>> {
        self.root
            .walk()
            .find_map(|entry| match entry {
                Entry::Directory(dir) if dir.path() == path => Some(dir),
                _ => None,
            })
            .ok_or_else(|| VfsError::DirectoryNotFound {
                path: path.to_string(),
            })
    }

    /// Find a file by absolute path.
    pub fn file(&self, path: &str) -> VfsResult<Arc<VirtualFile>> {
        self.root
            .walk()
            .find_map(|entry| match entry {
                Entry::File(file) if file.path() == path => Some(file),
                _ => None,
            })
            .ok_or_else(|| VfsError::FileNotFound {
                path: path.to_string(),
            })
    }
}

impl Default for VirtualFileSystem {
    fn default() -> Self {
        Self::new(FsOptions::default())
    }
}

impl std::fmt::Debug for VirtualFileSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualFileSystem")
            .field("options", &self.core.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    use strata_events::EventKind;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    fn paths(entries: impl IntoIterator<Item = Entry>) -> BTreeSet<String> {
        entries.into_iter().map(|e| e.path().to_string()).collect()
    }

    fn set(paths: &[&str]) -> BTreeSet<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    // -----------------------------------------------------------------------
    // Tree construction
    // -----------------------------------------------------------------------

    #[test]
    fn root_directory() {
        init_tracing();
        let fs = VirtualFileSystem::default();
        assert_eq!(fs.root().name(), "/");
        assert_eq!(fs.root().path(), "/");
        assert_eq!(fs.root().entry_count(), 0);
    }

    #[test]
    fn creates_directories_and_files_under_root() {
        let fs = VirtualFileSystem::default();
        let root = fs.root();

        let d1 = root.create_dir("d1").unwrap();
        let d2 = root.create_dir("d2").unwrap();
        assert_eq!(d1.name(), "d1");
        assert_eq!(d1.path(), "/d1");
        assert_eq!(d2.path(), "/d2");

        let f1 = root.create_file("f1").unwrap();
        let f2 = root.create_file("f2").unwrap();
        assert_eq!(f1.name(), "f1");
        assert_eq!(f1.path(), "/f1");
        assert_eq!(f2.path(), "/f2");

        assert_eq!(
            paths(root.entries()),
            set(&["/d1", "/d2", "/f1", "/f2"])
        );
    }

    #[test]
    fn nested_hierarchy_paths() {
        let fs = VirtualFileSystem::default();
        let d1 = fs.root().create_dir("d1").unwrap();
        let d2 = d1.create_dir("d2").unwrap();
        let d3 = d2.create_dir("d3").unwrap();

        assert_eq!(d1.path(), "/d1");
        assert_eq!(d2.path(), "/d1/d2");
        assert_eq!(d3.path(), "/d1/d2/d3");

        let f1 = d3.create_file("f1").unwrap();
        let f2 = d2.create_file("f2").unwrap();
        assert_eq!(f1.path(), "/d1/d2/d3/f1");
        assert_eq!(f2.path(), "/d1/d2/f2");

        assert_eq!(paths(fs.root().entries()), set(&["/d1"]));
        assert_eq!(paths(d1.entries()), set(&["/d1/d2"]));
        assert_eq!(paths(d2.entries()), set(&["/d1/d2/d3", "/d1/d2/f2"]));
        assert_eq!(paths(d3.entries()), set(&["/d1/d2/d3/f1"]));

        assert_eq!(
            paths(fs.root().walk()),
            set(&["/d1", "/d1/d2", "/d1/d2/d3", "/d1/d2/f2", "/d1/d2/d3/f1"])
        );
    }

    #[test]
    fn walk_is_breadth_first() {
        let fs = VirtualFileSystem::default();
        let d1 = fs.root().create_dir("d1").unwrap();
        let d2 = d1.create_dir("d2").unwrap();
        d1.create_file("f1").unwrap();
        d2.create_file("f2").unwrap();

        let walked: Vec<String> = d1.walk().map(|e| e.path().to_string()).collect();
        // All of d1's entries precede d2's.
        assert_eq!(walked, ["/d1/d2", "/d1/f1", "/d1/d2/f2"]);
    }

    #[test]
    fn empty_root_walks_nothing() {
        let fs = VirtualFileSystem::default();
        assert_eq!(fs.root().walk().count(), 0);
    }

    #[test]
    fn deep_hierarchy() {
        let fs = VirtualFileSystem::default();
        const DEPTH: usize = 1000;

        let mut dir = Arc::clone(fs.root());
        for i in 0..DEPTH {
            dir = dir.create_dir(&i.to_string()).unwrap();
        }
        assert_eq!(fs.root().walk().count(), DEPTH);
    }

    #[test]
    fn entries_are_case_sensitive() {
        let fs = VirtualFileSystem::default();
        fs.root().create_dir("D1").unwrap();
        fs.root().create_dir("d1").unwrap();
        fs.root().create_file("f1").unwrap();
        fs.root().create_file("F2").unwrap();
        assert_eq!(fs.root().entry_count(), 4);
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    #[test]
    fn directory_lookup_by_path() {
        let fs = VirtualFileSystem::default();
        let d1 = fs.root().create_dir("d1").unwrap();
        let d2 = d1.create_dir("d2").unwrap();
        let d3 = d2.create_dir("d3").unwrap();

        assert!(Arc::ptr_eq(&fs.directory("/d1").unwrap(), &d1));
        assert!(Arc::ptr_eq(&fs.directory("/d1/d2").unwrap(), &d2));
        assert!(Arc::ptr_eq(&fs.directory("/d1/d2/d3").unwrap(), &d3));
    }

    #[test]
    fn file_lookup_by_path() {
        let fs = VirtualFileSystem::default();
        let d1 = fs.root().create_dir("d1").unwrap();
        let f1 = d1.create_file("f1").unwrap();
        let f2 = d1.create_file("f2").unwrap();

        assert!(Arc::ptr_eq(&fs.file("/d1/f1").unwrap(), &f1));
        assert!(Arc::ptr_eq(&fs.file("/d1/f2").unwrap(), &f2));
    }

    #[test]
    fn lookup_misses() {
        let fs = VirtualFileSystem::default();
        assert!(matches!(
            fs.file("unknown"),
            Err(VfsError::FileNotFound { .. })
        ));
        assert!(matches!(
            fs.directory("unknown"),
            Err(VfsError::DirectoryNotFound { .. })
        ));
    }

    // -----------------------------------------------------------------------
    // Validation and limits
    // -----------------------------------------------------------------------

    #[test]
    fn rejects_names_containing_delimiter() {
        let fs = VirtualFileSystem::default();
        assert!(matches!(
            fs.root().create_dir("a/directory"),
            Err(VfsError::InvalidName { .. })
        ));
        assert!(matches!(
            fs.root().create_file("a/file"),
            Err(VfsError::InvalidName { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_names() {
        let fs = VirtualFileSystem::default();
        let d1 = fs.root().create_dir("d1").unwrap();
        assert!(matches!(
            fs.root().create_dir(d1.name()),
            Err(VfsError::EntryExists { .. })
        ));

        let f1 = fs.root().create_file("f1").unwrap();
        assert!(matches!(
            fs.root().create_file(f1.name()),
            Err(VfsError::EntryExists { .. })
        ));
        // A file and a directory cannot share a name either.
        assert!(matches!(
            fs.root().create_dir("f1"),
            Err(VfsError::EntryExists { .. })
        ));
    }

    #[test]
    fn entry_limit_applies_to_files_and_directories() {
        let fs = VirtualFileSystem::new(FsOptions {
            max_entries_per_directory: Some(2),
            ..FsOptions::default()
        });
        fs.root().create_file("f1").unwrap();
        fs.root().create_file("f2").unwrap();

        assert!(matches!(
            fs.root().create_file("f3"),
            Err(VfsError::EntryLimitExceeded { limit: 2 })
        ));
        assert!(matches!(
            fs.root().create_dir("d3"),
            Err(VfsError::EntryLimitExceeded { limit: 2 })
        ));

        // Subdirectory limits are independent of the parent's.
        let fs = VirtualFileSystem::new(FsOptions {
            max_entries_per_directory: Some(2),
            ..FsOptions::default()
        });
        let d1 = fs.root().create_dir("d1").unwrap();
        d1.create_file("f1").unwrap();
        d1.create_file("f2").unwrap();
        assert!(d1.create_file("f3").is_err());
    }

    #[test]
    fn version_limit_through_the_tree() {
        let fs = VirtualFileSystem::new(FsOptions {
            max_versions_per_file: Some(3),
            ..FsOptions::default()
        });
        let f1 = fs.root().create_file("f1").unwrap();
        let v2 = f1.current_version().create_version().unwrap();
        let v3 = v2.create_version().unwrap();

        let err = v3.create_version().unwrap_err();
        // The facade error type composes over the version engine's.
        let err: VfsError = err.into();
        assert!(matches!(
            err,
            VfsError::Version(strata_version::VersionError::LimitExceeded { limit: 3 })
        ));
        assert_eq!(f1.versions().len(), 3);
    }

    // -----------------------------------------------------------------------
    // Versions through the tree
    // -----------------------------------------------------------------------

    #[test]
    fn file_starts_with_one_version() {
        let fs = VirtualFileSystem::default();
        let f1 = fs.root().create_file("f1").unwrap();

        assert_eq!(f1.versions().len(), 1);
        assert!(Arc::ptr_eq(&f1.versions()[0], &f1.current_version()));
        assert!(Arc::ptr_eq(
            f1.history(),
            &f1.current_version().history().unwrap()
        ));
    }

    #[test]
    fn current_version_follows_creation() {
        let fs = VirtualFileSystem::default();
        let f1 = fs.root().create_file("f1").unwrap();

        let v1 = f1.current_version();
        let v2 = v1.create_version().unwrap();
        let v3 = v2.create_version().unwrap();
        let v4 = v3.create_version().unwrap();

        let versions = f1.versions();
        assert_eq!(versions.len(), 4);
        assert!(Arc::ptr_eq(&versions[0], &v1));
        assert!(Arc::ptr_eq(&versions[1], &v2));
        assert!(Arc::ptr_eq(&versions[2], &v3));
        assert!(Arc::ptr_eq(&versions[3], &v4));
        assert!(Arc::ptr_eq(&f1.current_version(), &v4));
    }

    #[test]
    fn version_content_survives_through_lookup() {
        let fs = VirtualFileSystem::default();
        let d1 = fs.root().create_dir("docs").unwrap();
        d1.create_file("notes").unwrap();

        {
            let file = fs.file("/docs/notes").unwrap();
            let mut stream = file.current_version().stream();
            stream.set_len(5).unwrap();
            stream.write(b"hello").unwrap();
        }

        let file = fs.file("/docs/notes").unwrap();
        let mut stream = file.current_version().stream();
        let mut buf = [0u8; 5];
        assert_eq!(stream.read(&mut buf).unwrap(), 5);
        assert_eq!(&buf, b"hello");
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    #[test]
    fn creation_events_in_causal_order() {
        let fs = VirtualFileSystem::default();
        let mut stream = fs.subscribe(EventFilter::default());

        let d1 = fs.root().create_dir("d1").unwrap();
        let f1 = d1.create_file("f1").unwrap();

        let e1 = stream.try_recv().unwrap();
        assert_eq!(e1.kind, EventKind::DirectoryCreated);
        assert_eq!(e1.path, d1.path());

        let e2 = stream.try_recv().unwrap();
        assert_eq!(e2.kind, EventKind::FileCreated);
        assert_eq!(e2.path, f1.path());

        // Creating a file implicitly creates its first version; the
        // dependent event comes last.
        let e3 = stream.try_recv().unwrap();
        assert_eq!(e3.kind, EventKind::VersionCreated);
        assert_eq!(e3.path, f1.path());
        assert_eq!(e3.version, Some(f1.current_version().id()));

        assert!(e1.seq < e2.seq && e2.seq < e3.seq);
        assert!(stream.try_recv().is_err());
    }

    #[test]
    fn version_creation_events_through_the_tree() {
        let fs = VirtualFileSystem::default();
        let f1 = fs.root().create_file("f1").unwrap();

        let mut stream = fs.subscribe(EventFilter {
            kinds: Some(vec![EventKind::VersionCreated]),
            ..Default::default()
        });

        let v2 = f1.current_version().create_version().unwrap();
        let v3 = v2.create_version().unwrap();

        assert_eq!(stream.try_recv().unwrap().version, Some(v2.id()));
        assert_eq!(stream.try_recv().unwrap().version, Some(v3.id()));
        assert!(stream.try_recv().is_err());
    }
}
