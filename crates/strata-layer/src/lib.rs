//! Sparse copy-on-write byte layers: the Strata version storage core.
//!
//! A [`SparseLayer`] is one copy-on-write slice of a version's byte content,
//! storing only its own explicit writes in an ordered `offset → byte` map
//! plus a logical length. Deriving a child freezes the parent forever;
//! reads compose the layer with its whole ancestor chain without ever
//! materializing the logical content.
//!
//! # Design Rules
//!
//! 1. Storage cost is proportional to bytes written, never to logical
//!    length — terabyte-long layers with kilobytes of real storage.
//! 2. A layer acquires at most one child, ever; the freeze is irreversible.
//! 3. Ancestors are shared read-only (`Arc`), strictly acyclic, linked
//!    backward only.
//! 4. Truncation evicts out-of-range entries permanently; regrown ranges
//!    read as zero until rewritten.
//! 5. The zero-fill default is indistinguishable from an explicit zero
//!    write during composition — inherited behavior, kept as-is.

pub mod error;
pub mod layer;

pub use error::{LayerError, LayerResult};
pub use layer::SparseLayer;
