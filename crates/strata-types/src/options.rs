use serde::{Deserialize, Serialize};

/// File-system-wide limits, supplied once at construction and immutable
/// thereafter.
///
/// `None` means unlimited. The default is fully unlimited; use
/// [`FsOptions::standard`] for the conventional capped configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FsOptions {
    /// Maximum number of versions a single file may accumulate, counting
    /// the initial version.
    pub max_versions_per_file: Option<u32>,
    /// Maximum number of entries (files plus directories) a single
    /// directory may hold.
    pub max_entries_per_directory: Option<u32>,
}

impl FsOptions {
    /// An unlimited configuration (same as `Default`).
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// The conventional capped configuration: 10 versions per file,
    /// 1000 entries per directory.
    pub fn standard() -> Self {
        Self {
            max_versions_per_file: Some(10),
            max_entries_per_directory: Some(1000),
        }
    }
}
