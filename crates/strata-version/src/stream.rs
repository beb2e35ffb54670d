use std::io::{self, SeekFrom};
use std::sync::Arc;

use strata_layer::SparseLayer;

use crate::error::{StreamError, StreamResult};

/// A random-access stream over one version's composed content.
///
/// Every stream owns its own position; any number of independent streams
/// may be open over the same version at once. A stream becomes seekable
/// only once the underlying layer's length is non-zero — a zero-length
/// layer cannot be positioned at all, including at position zero. The
/// position may legally point past the end ("seek past end"): reads there
/// return zero bytes and writes fail the layer's own bounds check unless
/// the length is extended first.
///
/// Disposal releases the stream's handle on the layer and is idempotent.
/// Afterwards every operation fails with [`StreamError::Disposed`] except
/// the capability queries, which simply report `false`.
///
/// The stream also implements [`std::io::Read`], [`std::io::Write`], and
/// [`std::io::Seek`] as thin pass-throughs, so it composes with the
/// standard I/O machinery (`io::copy` and friends). There is no buffering:
/// the underlying operations are pure in-memory computations.
#[derive(Debug)]
pub struct VersionStream {
    layer: Option<Arc<SparseLayer>>,
    position: u64,
}

impl VersionStream {
    pub(crate) fn new(layer: Arc<SparseLayer>) -> Self {
        Self {
            layer: Some(layer),
            position: 0,
        }
    }

    fn layer(&self) -> StreamResult<&Arc<SparseLayer>> {
        self.layer.as_ref().ok_or(StreamError::Disposed)
    }

    /// Logical length of the underlying layer.
    pub fn len(&self) -> StreamResult<u64> {
        Ok(self.layer()?.len())
    }

    /// Returns `true` if the logical length is zero.
    pub fn is_empty(&self) -> StreamResult<bool> {
        Ok(self.layer()?.is_empty())
    }

    /// Current position.
    pub fn position(&self) -> StreamResult<u64> {
        self.layer()?;
        Ok(self.position)
    }

    /// Assign the position directly.
    ///
    /// Fails with [`StreamError::NotSeekable`] while the layer's length is
    /// zero; otherwise assigns unconditionally, even past the end.
    pub fn set_position(&mut self, value: u64) -> StreamResult<()> {
        let layer = self.layer()?;
        if layer.len() == 0 {
            return Err(StreamError::NotSeekable);
        }
        self.position = value;
        Ok(())
    }

    /// Seek relative to the start, the current position, or the end.
    /// Returns the resulting position.
    pub fn seek(&mut self, pos: SeekFrom) -> StreamResult<u64> {
        let layer = self.layer()?;
        let target: i128 = match pos {
            SeekFrom::Start(offset) => offset as i128,
            SeekFrom::Current(offset) => self.position as i128 + offset as i128,
            SeekFrom::End(offset) => layer.len() as i128 + offset as i128,
        };
        if layer.len() == 0 {
            return Err(StreamError::NotSeekable);
        }
        if target < 0 {
            return Err(StreamError::NegativePosition { position: target });
        }
        self.position = u64::try_from(target).unwrap_or(u64::MAX);
        Ok(self.position)
    }

    /// Read at the current position, advancing by the number of bytes
    /// actually produced. `Ok(0)` signals end-of-data, not an error.
    pub fn read(&mut self, dst: &mut [u8]) -> StreamResult<usize> {
        let layer = self.layer()?;
        let count = layer.read(dst, self.position);
        self.position += count as u64;
        Ok(count)
    }

    /// Write at the current position, advancing by `src.len()` on success.
    /// Fails without moving if the layer is frozen or the write would run
    /// past the layer's length.
    pub fn write(&mut self, src: &[u8]) -> StreamResult<()> {
        let layer = self.layer()?;
        layer.write(src, self.position)?;
        self.position += src.len() as u64;
        Ok(())
    }

    /// Set the underlying layer's logical length.
    pub fn set_len(&mut self, value: u64) -> StreamResult<()> {
        self.layer()?.set_length(value)?;
        Ok(())
    }

    /// No-op, but still subject to the disposed check.
    pub fn flush(&mut self) -> StreamResult<()> {
        self.layer()?;
        Ok(())
    }

    /// Release the stream's handle on the layer. Idempotent.
    pub fn dispose(&mut self) {
        self.layer = None;
    }

    /// Returns `true` until the stream is disposed.
    pub fn can_read(&self) -> bool {
        self.layer.is_some()
    }

    /// Returns `true` until the stream is disposed.
    pub fn can_seek(&self) -> bool {
        self.layer.is_some()
    }

    /// Returns `true` until the stream is disposed.
    pub fn can_write(&self) -> bool {
        self.layer.is_some()
    }
}

impl io::Read for VersionStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        VersionStream::read(self, buf).map_err(io::Error::other)
    }
}

impl io::Write for VersionStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        VersionStream::write(self, buf).map_err(io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        VersionStream::flush(self).map_err(io::Error::other)
    }
}

impl io::Seek for VersionStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        VersionStream::seek(self, pos).map_err(io::Error::other)
    }
}
