use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::error::{LayerError, LayerResult};

/// Mutable state of a layer, shared by every stream bound to it.
#[derive(Debug, Default)]
struct LayerState {
    /// Only explicitly written offsets are present; every other offset in
    /// `[0, length)` reads as zero. Keys are always `< length`.
    written: BTreeMap<u64, u8>,
    /// Logical size, independent of how many bytes are physically stored.
    length: u64,
    /// Set once by [`SparseLayer::derive_child`]; a frozen layer permanently
    /// rejects writes and length changes.
    frozen: bool,
}

/// A single copy-on-write byte layer.
///
/// A layer stores only the bytes it directly received, plus a logical
/// length. Reads compose data from this layer and its ancestor chain: the
/// closest layer's explicit writes dominate, gaps fall through to the
/// nearest ancestor that wrote the offset, and offsets never written
/// anywhere read as zero. Storage cost is proportional to bytes actually
/// written, never to the logical length, so a layer can be terabytes long
/// while occupying kilobytes.
///
/// Ancestors are held through shared read-only ownership (`Arc`), forming a
/// strictly acyclic, singly-backward-linked chain. A layer never enumerates
/// its descendants and acquires at most one child, ever: deriving the child
/// freezes the parent for good.
///
/// All methods take `&self`; the mutable state lives behind a `RwLock` so
/// that every stream bound to the layer observes a freeze uniformly and
/// immediately. This is not a concurrent-writer guarantee — overlapping
/// writes from uncoordinated streams remain a caller-owned race.
#[derive(Debug)]
pub struct SparseLayer {
    state: RwLock<LayerState>,
    parent: Option<Arc<SparseLayer>>,
}

impl SparseLayer {
    /// Create the root layer of a chain: empty, length zero, no parent.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: RwLock::new(LayerState::default()),
            parent: None,
        })
    }

    /// Current logical length.
    pub fn len(&self) -> u64 {
        self.state.read().expect("layer lock poisoned").length
    }

    /// Returns `true` if the logical length is zero.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` once a child has been derived from this layer.
    pub fn is_frozen(&self) -> bool {
        self.state.read().expect("layer lock poisoned").frozen
    }

    /// Number of bytes physically stored in this layer (ancestors excluded).
    pub fn written_bytes(&self) -> usize {
        self.state.read().expect("layer lock poisoned").written.len()
    }

    /// The ancestor layer, if any.
    pub fn parent(&self) -> Option<Arc<SparseLayer>> {
        self.parent.clone()
    }

    /// Set the logical length.
    ///
    /// Shrinking discards every written byte at offset `>= new_len`
    /// permanently: growing the layer back later reads zeros there until the
    /// range is rewritten.
    pub fn set_length(&self, new_len: u64) -> LayerResult<()> {
        let mut state = self.state.write().expect("layer lock poisoned");
        if state.frozen {
            return Err(LayerError::Immutable);
        }
        if new_len < state.length {
            // Evict entries at or past the new length; keys stay < length.
            let _evicted = state.written.split_off(&new_len);
        }
        state.length = new_len;
        Ok(())
    }

    /// Write `src` into the layer starting at `position`.
    ///
    /// The whole operation is rejected if it would extend past the current
    /// logical length — there are no partial writes.
    pub fn write(&self, src: &[u8], position: u64) -> LayerResult<()> {
        let mut state = self.state.write().expect("layer lock poisoned");
        if state.frozen {
            return Err(LayerError::Immutable);
        }
        match position.checked_add(src.len() as u64) {
            Some(end) if end <= state.length => {}
            _ => {
                return Err(LayerError::OutOfRange {
                    position,
                    count: src.len(),
                    length: state.length,
                })
            }
        }
        for (i, byte) in src.iter().enumerate() {
            state.written.insert(position + i as u64, *byte);
        }
        Ok(())
    }

    /// Read into `dst` starting at `position`, composing this layer with its
    /// ancestors. Returns the number of bytes produced: zero when `position`
    /// is at or past the logical length, otherwise
    /// `min(dst.len(), length - position)`.
    ///
    /// The destination prefix is zero-filled first, then each layer from
    /// here outward contributes its written bytes only where the destination
    /// is still zero. An explicitly written zero is indistinguishable from
    /// the fill, so a non-zero ancestor byte shows through it — inherited
    /// behavior that callers may rely on.
    pub fn read(&self, dst: &mut [u8], position: u64) -> usize {
        let state = self.state.read().expect("layer lock poisoned");
        if position >= state.length {
            return 0;
        }
        let available = state.length - position;
        let count = if (dst.len() as u64) <= available {
            dst.len()
        } else {
            available as usize
        };
        let dst = &mut dst[..count];
        dst.fill(0);

        let end = position + count as u64;
        apply_written(&state.written, dst, position, end);
        drop(state);

        let mut ancestor = self.parent.as_deref();
        while let Some(layer) = ancestor {
            let state = layer.state.read().expect("layer lock poisoned");
            apply_written(&state.written, dst, position, end);
            ancestor = layer.parent.as_deref();
        }
        count
    }

    /// Derive the one permitted child layer, freezing this layer.
    ///
    /// The child starts empty with length zero and its own independent
    /// length; ancestor data becomes visible through it only once its length
    /// is extended past those offsets.
    pub fn derive_child(self: &Arc<Self>) -> LayerResult<Arc<SparseLayer>> {
        let mut state = self.state.write().expect("layer lock poisoned");
        if state.frozen {
            return Err(LayerError::Immutable);
        }
        state.frozen = true;
        drop(state);
        Ok(Arc::new(SparseLayer {
            state: RwLock::new(LayerState::default()),
            parent: Some(Arc::clone(self)),
        }))
    }
}

/// Copy a layer's written bytes in `[position, end)` into `dst`, touching
/// only destination bytes that are still at their zero-filled default.
fn apply_written(written: &BTreeMap<u64, u8>, dst: &mut [u8], position: u64, end: u64) {
    for (&offset, &byte) in written.range(position..end) {
        let index = (offset - position) as usize;
        if dst[index] != 0 {
            continue;
        }
        dst[index] = byte;
    }
}
