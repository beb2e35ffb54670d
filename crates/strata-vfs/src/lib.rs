//! Directory and file tree for the Strata versioned virtual file system.
//!
//! This crate is the user-facing surface: it owns path construction,
//! per-directory name uniqueness and entry limits, and the ordered version
//! history of each file. The storage itself lives in `strata-layer` and
//! `strata-version`; the tree wires those components to a shared
//! [`ChangeBus`](strata_events::ChangeBus) so external observers see every
//! directory, file, and version creation in causal order.
//!
//! # Example
//!
//! ```
//! use strata_types::FsOptions;
//! use strata_vfs::VirtualFileSystem;
//!
//! let fs = VirtualFileSystem::new(FsOptions::default());
//! let file = fs.root().create_file("notes").unwrap();
//!
//! let mut stream = file.current_version().stream();
//! stream.set_len(5).unwrap();
//! stream.write(b"hello").unwrap();
//!
//! // Snapshot: the old version freezes, the new one starts sparse.
//! let v2 = file.current_version().create_version().unwrap();
//! assert_eq!(v2.len(), 0);
//! ```

pub mod dir;
pub mod entry;
pub mod error;
pub mod file;
pub mod fs;
pub mod path;

pub use dir::{VirtualDirectory, Walk};
pub use entry::Entry;
pub use error::{VfsError, VfsResult};
pub use file::VirtualFile;
pub use fs::VirtualFileSystem;
