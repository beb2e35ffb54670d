use strata_layer::LayerError;

/// Errors from version lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum VersionError {
    /// A second child was requested from the same version.
    #[error("version already has a child version")]
    ChildExists,

    /// The owning file has reached its configured version maximum.
    #[error("maximum of {limit} versions per file reached")]
    LimitExceeded { limit: u32 },

    /// The owning file's version history has been dropped.
    #[error("owning version history no longer exists")]
    OwnerReleased,

    /// Failure surfaced from the underlying layer.
    #[error(transparent)]
    Layer(#[from] LayerError),
}

/// Result alias for version operations.
pub type VersionResult<T> = Result<T, VersionError>;

/// Errors from stream operations.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// Operation attempted on a disposed stream.
    #[error("stream has been disposed")]
    Disposed,

    /// Position access attempted while the layer's length is zero.
    #[error("stream is not seekable while its length is zero")]
    NotSeekable,

    /// A seek computed a negative position.
    #[error("stream position must not be negative (computed {position})")]
    NegativePosition { position: i128 },

    /// Failure surfaced from the underlying layer.
    #[error(transparent)]
    Layer(#[from] LayerError),
}

/// Result alias for stream operations.
pub type StreamResult<T> = Result<T, StreamError>;
