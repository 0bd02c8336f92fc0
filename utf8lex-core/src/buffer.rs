//! The byte buffer chain: input arrives as a sequence of append-only chunks,
//! and the grapheme reader walks it one byte at a time without caring where
//! a chunk boundary falls.
//!
//! Reading from a file, a socket or an in-memory string are all, from the
//! matchers' point of view, "bytes show up in buffers, and eventually one of
//! them is marked as the last one". That collaborator is external to this
//! crate; what lives here is the chain
//! itself, plus the single-byte read that lets a consumer step across it
//! without ever needing a contiguous slice.

use crate::error::{LexError, Outcome};

/// One chunk of input bytes, plus whether it is known to be the last chunk.
#[derive(Clone, Debug, Default)]
pub struct ByteBuffer {
    data: Vec<u8>,
    is_eof: bool,
}

impl ByteBuffer {
    pub fn new() -> Self {
        Self { data: Vec::new(), is_eof: false }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { data: Vec::with_capacity(capacity), is_eof: false }
    }

    pub fn from_bytes(data: Vec<u8>, is_eof: bool) -> Self {
        Self { data, is_eof }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_eof(&self) -> bool {
        self.is_eof
    }

    pub fn set_eof(&mut self) {
        self.is_eof = true;
    }

    /// Appends more bytes to this buffer. Only valid while it isn't yet
    /// marked EOF; callers that need to keep growing past that point should
    /// start a new [`ByteBuffer`] and link it in with
    /// [`BufferChain::push_buffer`] instead.
    pub fn extend(&mut self, bytes: &[u8]) {
        debug_assert!(!self.is_eof, "extending a buffer already marked EOF");
        self.data.extend_from_slice(bytes);
    }
}

/// A cursor position into a [`BufferChain`]: which buffer, and how far into
/// it. Buffers are referenced by index rather than by pointer or reference
/// so a cursor can outlive any particular borrow of the chain — the same
/// trick the definition/rule database uses for its neighbor links.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct BufferCursor {
    pub buffer_index: usize,
    pub byte_offset: usize,
}

impl BufferCursor {
    pub const START: BufferCursor = BufferCursor { buffer_index: 0, byte_offset: 0 };
}

/// An append-only sequence of [`ByteBuffer`]s.
///
/// New buffers are always pushed onto the tail; nothing is ever removed, so
/// a [`BufferCursor`] taken earlier stays valid for the lifetime of the
/// chain even after more input has arrived.
#[derive(Clone, Debug, Default)]
pub struct BufferChain {
    buffers: Vec<ByteBuffer>,
}

impl BufferChain {
    pub fn new() -> Self {
        Self { buffers: vec![ByteBuffer::new()] }
    }

    /// Convenience constructor for the common case of lexing a complete,
    /// already-in-memory string: a single EOF-terminated buffer.
    pub fn from_complete(bytes: impl Into<Vec<u8>>) -> Self {
        Self { buffers: vec![ByteBuffer::from_bytes(bytes.into(), true)] }
    }

    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn buffer(&self, index: usize) -> Option<&ByteBuffer> {
        self.buffers.get(index)
    }

    /// Appends bytes to the current tail buffer.
    ///
    /// # Errors
    /// Returns [`LexError::ChainInsert`] if the tail buffer has already been
    /// marked EOF; call [`Self::push_buffer`] to start a fresh one instead.
    pub fn append(&mut self, bytes: &[u8]) -> Result<(), LexError> {
        let tail = self
            .buffers
            .last_mut()
            .expect("chain always has at least one buffer");
        if tail.is_eof() {
            return Err(LexError::ChainInsert(
                "cannot append past a buffer already marked EOF".to_string(),
            ));
        }
        tail.extend(bytes);
        Ok(())
    }

    /// Links a new buffer onto the tail of the chain.
    pub fn push_buffer(&mut self, buffer: ByteBuffer) -> Result<(), LexError> {
        if self.is_eof() {
            return Err(LexError::ChainInsert(
                "cannot push a buffer after the chain has reached EOF".to_string(),
            ));
        }
        self.buffers.push(buffer);
        Ok(())
    }

    /// Marks the current tail buffer (and therefore the whole chain) as
    /// final: no more buffers will ever be appended.
    pub fn set_eof(&mut self) {
        if let Some(tail) = self.buffers.last_mut() {
            tail.set_eof();
        }
    }

    pub fn is_eof(&self) -> bool {
        self.buffers.last().is_some_and(ByteBuffer::is_eof)
    }

    /// Reads the single byte at `cursor`, stepping across a buffer boundary
    /// transparently.
    ///
    /// Returns `Outcome::More` if `cursor` sits exactly at the end of a
    /// non-EOF buffer (a reader needs to wait for more input before it can
    /// know what comes next), or `Outcome::Eof` if it sits at the end of the
    /// EOF buffer with nothing after it.
    pub fn next_byte(&self, cursor: BufferCursor) -> Outcome<(u8, BufferCursor)> {
        let Some(buffer) = self.buffers.get(cursor.buffer_index) else {
            return Outcome::Eof;
        };
        if let Some(&byte) = buffer.bytes().get(cursor.byte_offset) {
            return Outcome::Matched((
                byte,
                BufferCursor { buffer_index: cursor.buffer_index, byte_offset: cursor.byte_offset + 1 },
            ));
        }
        if let Some(next_buffer) = self.buffers.get(cursor.buffer_index + 1) {
            debug_assert!(!next_buffer.is_empty() || next_buffer.is_eof());
            return self.next_byte(BufferCursor { buffer_index: cursor.buffer_index + 1, byte_offset: 0 });
        }
        if buffer.is_eof() {
            Outcome::Eof
        } else {
            Outcome::More
        }
    }

    /// `true` once `cursor` cannot advance any further because the chain has
    /// reached EOF at that point.
    pub fn is_exhausted(&self, cursor: BufferCursor) -> bool {
        matches!(self.next_byte(cursor), Outcome::Eof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_bytes_within_one_buffer() {
        let chain = BufferChain::from_complete(*b"ab");
        let Outcome::Matched((b, cursor)) = chain.next_byte(BufferCursor::START) else {
            panic!("expected a byte");
        };
        assert_eq!(b, b'a');
        let Outcome::Matched((b, _)) = chain.next_byte(cursor) else {
            panic!("expected a byte");
        };
        assert_eq!(b, b'b');
    }

    #[test]
    fn crosses_buffer_boundary_transparently() {
        let mut chain = BufferChain::new();
        chain.append(b"a").unwrap();
        chain.push_buffer(ByteBuffer::from_bytes(b"b".to_vec(), true)).unwrap();
        let Outcome::Matched((first, cursor)) = chain.next_byte(BufferCursor::START) else {
            panic!("expected a byte");
        };
        assert_eq!(first, b'a');
        let Outcome::Matched((second, _)) = chain.next_byte(cursor) else {
            panic!("expected to cross into the next buffer");
        };
        assert_eq!(second, b'b');
    }

    #[test]
    fn returns_more_at_tail_of_non_eof_buffer() {
        let mut chain = BufferChain::new();
        chain.append(b"a").unwrap();
        let cursor = BufferCursor { buffer_index: 0, byte_offset: 1 };
        assert_eq!(chain.next_byte(cursor), Outcome::More);
    }

    #[test]
    fn returns_eof_at_tail_of_eof_buffer() {
        let chain = BufferChain::from_complete(*b"a");
        let cursor = BufferCursor { buffer_index: 0, byte_offset: 1 };
        assert_eq!(chain.next_byte(cursor), Outcome::Eof);
    }

    #[test]
    fn append_past_eof_is_rejected() {
        let mut chain = BufferChain::from_complete(*b"a");
        assert!(chain.append(b"b").is_err());
    }
}
