//! Version chains and streams for the Strata virtual file system.
//!
//! This crate implements the copy-on-write version lifecycle over
//! `strata-layer`:
//!
//! - [`Version`] — one version of a file's content, exclusively owning its
//!   sparse layer and linked to its parent/child versions
//! - [`VersionHistory`] — a file's append-only version list and
//!   current-version pointer, updated by direct call from the
//!   version-creation path
//! - [`VersionStream`] — a random-access stream view over one version,
//!   translating seek/read/write/length semantics into layer operations
//!
//! Creating a version freezes its parent's layer forever: all prior
//! versions remain readable and immutable once they have a child. The
//! history notifies the change bus once per successful creation, after its
//! own state is updated, so observers can never see a version before the
//! owning file does.

pub mod error;
pub mod history;
pub mod stream;
pub mod version;

pub use error::{StreamError, StreamResult, VersionError, VersionResult};
pub use history::VersionHistory;
pub use stream::VersionStream;
pub use version::Version;
