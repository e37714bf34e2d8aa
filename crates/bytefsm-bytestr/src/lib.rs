//! Growable byte-string buffer for hook implementations.
//!
//! The engine's hooks typically accumulate tokens (tag names, attribute
//! values) as they watch the byte stream go by. [`ByteStr`] is the small
//! append-oriented buffer they do it with. The engine itself never depends
//! on this crate; it only assumes the append contract documented here.

/// A growable byte string supporting append, clear and whitespace stripping.
///
/// Unlike the engine's fixed recording buffer, a `ByteStr` grows without
/// bound and survives across recording sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteStr {
    buf: Vec<u8>,
}

impl ByteStr {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Create an empty buffer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { buf: Vec::with_capacity(capacity) }
    }

    /// Append all of `bytes`.
    pub fn append(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append at most the first `n` bytes of `bytes`.
    pub fn append_n(&mut self, bytes: &[u8], n: usize) {
        let n = n.min(bytes.len());
        self.buf.extend_from_slice(&bytes[..n]);
    }

    /// Append one byte.
    pub fn push(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Discard the contents, keeping the allocation.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// View of the contents with leading and trailing ASCII whitespace
    /// removed. The buffer itself is not modified.
    pub fn strip(&self) -> &[u8] {
        let start = match self.buf.iter().position(|b| !b.is_ascii_whitespace()) {
            Some(i) => i,
            None => return &[],
        };
        // Non-whitespace exists, so rposition is Some.
        let end = self.buf.iter().rposition(|b| !b.is_ascii_whitespace()).unwrap_or(start);
        &self.buf[start..=end]
    }

    /// The raw contents.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Number of bytes in the buffer.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl From<&[u8]> for ByteStr {
    fn from(bytes: &[u8]) -> Self {
        Self { buf: bytes.to_vec() }
    }
}
