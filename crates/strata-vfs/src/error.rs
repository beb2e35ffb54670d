use strata_version::VersionError;

/// Errors from file system tree operations.
#[derive(Debug, thiserror::Error)]
pub enum VfsError {
    /// The entry name is empty, whitespace-only, or contains the path
    /// delimiter.
    #[error("invalid entry name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// An entry with the same name already exists in the directory.
    #[error("entry already exists: {path}")]
    EntryExists { path: String },

    /// The directory has reached its configured entry maximum.
    #[error("maximum of {limit} entries per directory reached")]
    EntryLimitExceeded { limit: u32 },

    /// No directory exists at the given path.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: String },

    /// No file exists at the given path.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// Failure surfaced from the version engine.
    #[error(transparent)]
    Version(#[from] VersionError),
}

/// Result alias for tree operations.
pub type VfsResult<T> = Result<T, VfsError>;
