//! Foundation types for the Strata versioned virtual file system.
//!
//! This crate provides the shared identity and configuration types used
//! throughout Strata. Every other Strata crate depends on `strata-types`.
//!
//! # Key Types
//!
//! - [`VersionId`] — Time-ordered unique identifier for a file version
//! - [`FsOptions`] — Optional file-system-wide limits, fixed at construction
//! - [`PATH_DELIMITER`] — The `/` separator used by every entry path

pub mod options;
pub mod version_id;

pub use options::FsOptions;
pub use version_id::VersionId;

/// Separator between path components. The root directory's path is a single
/// delimiter.
pub const PATH_DELIMITER: char = '/';
