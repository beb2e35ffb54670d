//! Change notification bus for the Strata virtual file system.
//!
//! One [`ChangeBus`] exists per file-system instance. It carries three
//! event kinds — directory-created, file-created, version-created — and
//! fans each event out synchronously to filtered subscribers over
//! broadcast channels.
//!
//! The bus is an outward-facing observer surface only: internal
//! bookkeeping (such as a file's current-version pointer) is wired by
//! direct calls, never through the bus, so event delivery can never
//! reorder core state updates.
//!
//! # Ordering
//!
//! Within one logical operation, events are emitted in causal order:
//! creating a file emits file-created before the version-created event for
//! the file's initial version. Sequence numbers on [`ChangeEvent`] make
//! this order observable to subscribers.

pub mod bus;
pub mod event;

pub use bus::{ChangeBus, EventStream};
pub use event::{ChangeEvent, EventFilter, EventKind};
