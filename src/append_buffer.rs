//! # Append buffer
//!
//! A grow-only byte buffer used to stage a whole frame of terminal output,
//! so that the frame reaches the terminal in a single write.

/// One frame's worth of output. Created at the start of a refresh, written
/// out once, then dropped.
#[derive(Default)]
pub(crate) struct AppendBuffer {
    bytes: Vec<u8>,
}

impl AppendBuffer {
    /// Append a single byte.
    pub fn push(&mut self, byte: u8) { self.bytes.push(byte) }

    /// Append a string slice.
    pub fn push_str(&mut self, s: &str) { self.bytes.extend_from_slice(s.as_bytes()) }

    /// Append raw bytes.
    pub fn push_bytes(&mut self, bytes: &[u8]) { self.bytes.extend_from_slice(bytes) }

    /// The staged frame.
    pub fn as_bytes(&self) -> &[u8] { &self.bytes }
}
