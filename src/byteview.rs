//! Immutable byte payload stored in the cache.

use std::fmt;
use std::str::Utf8Error;
use std::sync::Arc;

/// An immutable view over a byte buffer.
///
/// Cloning a `ByteView` is O(1): the underlying bytes are shared via `Arc`
/// and never mutated after construction, so it is safe to hand the same
/// `ByteView` to every caller waiting on a coalesced single-flight call.
#[derive(Clone, Eq, PartialEq)]
pub struct ByteView {
    bytes: Arc<[u8]>,
}

impl ByteView {
    /// Builds a `ByteView` by copying `bytes`.
    ///
    /// Construction always copies so that a caller who later mutates their
    /// own buffer cannot reach into cached state.
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            bytes: Arc::from(bytes),
        }
    }

    /// Number of bytes in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True if the view holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decodes the view as UTF-8, failing if the bytes are not valid UTF-8.
    pub fn as_str(&self) -> Result<&str, Utf8Error> {
        std::str::from_utf8(&self.bytes)
    }

    /// Borrows the underlying bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns a defensive copy of the underlying bytes.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Arc::from(bytes),
        }
    }
}

impl From<String> for ByteView {
    fn from(s: String) -> Self {
        Self {
            bytes: Arc::from(s.into_bytes()),
        }
    }
}

impl fmt::Debug for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Ok(s) => f.debug_tuple("ByteView").field(&s).finish(),
            Err(_) => f.debug_tuple("ByteView").field(&self.bytes).finish(),
        }
    }
}
