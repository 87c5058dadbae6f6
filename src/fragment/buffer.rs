//! Storage for a single fragment.

use bytes::{BufMut, Bytes, BytesMut};

use super::{FragmentHeader, HEADER_SIZE};

/// One fragment: a header region followed by the payload bytes assigned to it.
///
/// The payload region holds exactly the logical bytes written into this
/// fragment, so the last fragment of a packet is usually shorter than the
/// layout's payload capacity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    buf: BytesMut,
}

impl Fragment {
    /// Allocate an empty fragment with room for `payload_capacity` bytes.
    pub(crate) fn with_capacity(payload_capacity: usize) -> Self {
        let mut buf = BytesMut::with_capacity(HEADER_SIZE + payload_capacity);
        buf.put_bytes(0, HEADER_SIZE);
        Self { buf }
    }

    /// Wrap a received frame, header included.
    pub(crate) fn from_frame(frame: &[u8]) -> Self {
        debug_assert!(frame.len() >= HEADER_SIZE, "frame shorter than header");
        Self {
            buf: BytesMut::from(frame),
        }
    }

    /// Borrow the header region.
    #[must_use]
    pub fn header(&self) -> &[u8] { &self.buf[..HEADER_SIZE] }

    /// Mutably borrow the header region so a transport can fill it.
    pub fn header_mut(&mut self) -> &mut [u8] { &mut self.buf[..HEADER_SIZE] }

    /// Borrow the payload bytes held by this fragment.
    #[must_use]
    pub fn payload(&self) -> &[u8] { &self.buf[HEADER_SIZE..] }

    /// Number of payload bytes held by this fragment.
    #[must_use]
    pub fn payload_len(&self) -> usize { self.buf.len() - HEADER_SIZE }

    /// Borrow the whole fragment as it would appear on the wire.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] { &self.buf }

    pub(crate) fn stamp(&mut self, header: FragmentHeader) {
        self.header_mut().copy_from_slice(&header.encode());
    }

    pub(crate) fn extend(&mut self, bytes: &[u8]) { self.buf.put_slice(bytes); }

    /// Freeze the fragment into an immutable frame.
    #[must_use]
    pub fn freeze(self) -> Bytes { self.buf.freeze() }
}
