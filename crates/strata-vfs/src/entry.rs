use std::sync::Arc;

use crate::dir::VirtualDirectory;
use crate::file::VirtualFile;

/// A directory entry: either a subdirectory or a file.
#[derive(Clone, Debug)]
pub enum Entry {
    Directory(Arc<VirtualDirectory>),
    File(Arc<VirtualFile>),
}

impl Entry {
    /// The entry's name within its directory.
    pub fn name(&self) -> &str {
        match self {
            Self::Directory(dir) => dir.name(),
            Self::File(file) => file.name(),
        }
    }

    /// The entry's absolute path.
    pub fn path(&self) -> &str {
        match self {
            Self::Directory(dir) => dir.path(),
            Self::File(file) => file.path(),
        }
    }

    /// Returns `true` for a directory entry.
    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory(_))
    }

    /// Returns `true` for a file entry.
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    /// The directory, if this entry is one.
    pub fn as_directory(&self) -> Option<&Arc<VirtualDirectory>> {
        match self {
            Self::Directory(dir) => Some(dir),
            Self::File(_) => None,
        }
    }

    /// The file, if this entry is one.
    pub fn as_file(&self) -> Option<&Arc<VirtualFile>> {
        match self {
            Self::Directory(_) => None,
            Self::File(file) => Some(file),
        }
    }
}
