//! File I/O utilities.

use crate::types::ImageSource;
use crate::{Result, TextliftError};
use std::borrow::Cow;
use std::path::Path;

/// Read a file synchronously.
///
/// # Errors
///
/// Returns `TextliftError::Io` for I/O errors (these always bubble up).
pub fn read_file_sync(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    std::fs::read(path.as_ref()).map_err(TextliftError::Io)
}

/// Raw bytes behind an image source, borrowed when already in memory.
pub fn read_source(source: &ImageSource) -> Result<Cow<'_, [u8]>> {
    match source {
        ImageSource::Path(path) => Ok(Cow::Owned(read_file_sync(path)?)),
        ImageSource::Bytes(bytes) => Ok(Cow::Borrowed(bytes.as_slice())),
    }
}
