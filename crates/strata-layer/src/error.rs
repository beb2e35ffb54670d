/// Errors from sparse layer operations.
#[derive(Debug, thiserror::Error)]
pub enum LayerError {
    /// Mutation attempted on a layer that already has a child.
    #[error("layer is frozen: a child layer has been derived from it")]
    Immutable,

    /// A write would extend beyond the layer's current logical length.
    #[error("write of {count} bytes at position {position} exceeds layer length {length}")]
    OutOfRange {
        position: u64,
        count: usize,
        length: u64,
    },
}

/// Result alias for layer operations.
pub type LayerResult<T> = Result<T, LayerError>;
