//! Path construction and entry-name validation.
//!
//! Paths are `/`-delimited and absolute; the root directory's path is a
//! single delimiter. Entry names are case-sensitive and may not be empty,
//! whitespace-only, or contain the delimiter.

use strata_types::PATH_DELIMITER;

use crate::error::{VfsError, VfsResult};

/// The root directory's name and path.
pub const ROOT_PATH: &str = "/";

/// Append an entry name to a directory path.
pub fn join(parent: &str, name: &str) -> String {
    if parent == ROOT_PATH {
        format!("{parent}{name}")
    } else {
        format!("{parent}{PATH_DELIMITER}{name}")
    }
}

/// Validate an entry name, returning `Ok(())` if valid.
pub fn validate_entry_name(name: &str) -> VfsResult<()> {
    if name.trim().is_empty() {
        return Err(VfsError::InvalidName {
            name: name.to_string(),
            reason: "must not be empty or whitespace".into(),
        });
    }
    if name.contains(PATH_DELIMITER) {
        return Err(VfsError::InvalidName {
            name: name.to_string(),
            reason: format!("must not contain {PATH_DELIMITER:?}"),
        });
    }
    Ok(())
}
