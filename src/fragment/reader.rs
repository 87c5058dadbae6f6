//! Inbound decoder that walks the logical stream of a fragmented packet.
//!
//! [`PacketReader`] borrows the fragments of a finished [`PacketWriter`] or an
//! [`AssembledPacket`] and advances a single read cursor across fragment
//! boundaries. Reads must mirror the writes that produced the packet; the
//! stream carries no type tags.

use bytes::Buf;
use log::{debug, warn};

use super::{AssembledPacket, ChannelId, Fragment, FragmentLayout, PacketWriter, ReadError};
use crate::{
    byte_order::{WireValue, read_length_prefix},
    metrics,
};

/// Read cursor over the concatenated payloads of a fragment sequence.
///
/// [`size`](Self::size) and [`chunk_count`](Self::chunk_count) are a snapshot
/// of the source taken at construction. The readable extent is the bytes
/// actually held by the fragments: a writer floor larger than what was
/// written is reported but never read back.
///
/// The reader also implements [`Buf`], exposing the rest of the current
/// fragment as [`chunk`](Buf::chunk).
///
/// # Examples
///
/// ```
/// use chunkwire::fragment::{ChannelId, HEADER_SIZE, PacketReader, PacketWriter};
///
/// let mut writer = PacketWriter::new(ChannelId::new(3), HEADER_SIZE + 1, 0);
/// writer.write(0x0102_u16).expect("write u16");
///
/// let mut reader = PacketReader::new(&writer);
/// assert_eq!(reader.chunk_count(), 2);
/// assert_eq!(reader.read(0_u16), 0x0102);
/// assert_eq!(reader.read(7_u8), 7, "under-run yields the fallback");
/// ```
#[derive(Clone, Debug)]
pub struct PacketReader<'a> {
    fragments: &'a [Fragment],
    channel: ChannelId,
    layout: FragmentLayout,
    size: usize,
    chunk_count: usize,
    end: usize,
    cursor: usize,
}

impl<'a> PacketReader<'a> {
    /// Create a reader over everything written to `writer`.
    #[must_use]
    pub fn new(writer: &'a PacketWriter) -> Self {
        Self {
            fragments: writer.fragments(),
            channel: writer.channel(),
            layout: writer.layout(),
            size: writer.size(),
            chunk_count: writer.chunk_count(),
            end: writer.cursor(),
            cursor: 0,
        }
    }

    /// Create a reader over a packet rebuilt from received frames.
    #[must_use]
    pub fn from_assembled(packet: &'a AssembledPacket) -> Self {
        Self {
            fragments: packet.fragments(),
            channel: packet.channel(),
            layout: packet.layout(),
            size: packet.len(),
            chunk_count: packet.layout().chunks_for(packet.len()),
            end: packet.len(),
            cursor: 0,
        }
    }

    /// Decode the next value, or return `fallback` if too few bytes remain.
    ///
    /// On an under-run the cursor stays where it was, so a later read of a
    /// narrower value can still succeed.
    pub fn read<T: WireValue>(&mut self, fallback: T) -> T {
        match self.try_read() {
            Ok(value) => value,
            Err(err) => {
                debug!("channel {}: {err}; using fallback", self.channel);
                fallback
            }
        }
    }

    /// Decode the next value.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError::UnexpectedEnd`] if fewer than `T::WIDTH` bytes
    /// remain. The cursor does not move on failure.
    pub fn try_read<T: WireValue>(&mut self) -> Result<T, ReadError> {
        let mut bytes = T::Bytes::default();
        self.fill(bytes.as_mut())?;
        Ok(T::from_wire(bytes))
    }

    /// Copy the next `len` raw bytes out of the stream.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError::UnexpectedEnd`] if fewer than `len` bytes remain.
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>, ReadError> {
        self.ensure(len)?;
        let mut out = vec![0; len];
        self.copy_to_slice(&mut out);
        Ok(out)
    }

    /// Read a `u32` length field followed by that many raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError::UnexpectedEnd`] if the length field itself is
    /// truncated and [`ReadError::StringOverrun`] if the declared length runs
    /// past the end of the packet. The cursor is restored on either failure.
    pub fn read_string_bytes(&mut self) -> Result<Vec<u8>, ReadError> {
        let start = self.cursor;
        let mut prefix = [0_u8; 4];
        self.fill(&mut prefix)?;

        let declared = usize::try_from(read_length_prefix(prefix)).unwrap_or(usize::MAX);
        let remaining = self.remaining();
        if declared > remaining {
            warn!(
                "channel {}: string of {declared} bytes overruns the {remaining} remaining",
                self.channel
            );
            metrics::inc_errors();
            self.cursor = start;
            return Err(ReadError::StringOverrun {
                declared,
                remaining,
            });
        }
        self.read_bytes(declared)
    }

    /// Read a length-prefixed string.
    ///
    /// The string bytes are consumed even when they are not valid UTF-8; use
    /// [`read_string_bytes`](Self::read_string_bytes) for a raw copy.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`read_string_bytes`](Self::read_string_bytes),
    /// plus [`ReadError::InvalidUtf8`].
    pub fn read_string(&mut self) -> Result<String, ReadError> {
        let bytes = self.read_string_bytes()?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Logical size snapshot taken from the source.
    #[must_use]
    pub const fn size(&self) -> usize { self.size }

    /// Fragment count snapshot taken from the source.
    #[must_use]
    pub const fn chunk_count(&self) -> usize { self.chunk_count }

    /// Bytes consumed so far.
    #[must_use]
    pub const fn cursor(&self) -> usize { self.cursor }

    /// Bytes left before the end of the readable extent.
    #[must_use]
    pub const fn remaining(&self) -> usize { self.end - self.cursor }

    /// Channel recorded by the source.
    #[must_use]
    pub const fn channel(&self) -> ChannelId { self.channel }

    fn ensure(&self, needed: usize) -> Result<(), ReadError> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(ReadError::UnexpectedEnd { needed, remaining });
        }
        Ok(())
    }

    fn fill(&mut self, dst: &mut [u8]) -> Result<(), ReadError> {
        self.ensure(dst.len())?;
        self.copy_to_slice(dst);
        Ok(())
    }
}

impl Buf for PacketReader<'_> {
    fn remaining(&self) -> usize { self.end - self.cursor }

    fn chunk(&self) -> &[u8] {
        let Some((index, offset)) = self.layout.locate(self.cursor) else {
            return &[];
        };
        let available = self.end - self.cursor;
        self.fragments
            .get(index)
            .and_then(|fragment| fragment.payload().get(offset..))
            .map(|rest| &rest[..rest.len().min(available)])
            .unwrap_or_default()
    }

    fn advance(&mut self, cnt: usize) {
        assert!(
            cnt <= self.end - self.cursor,
            "cannot advance {cnt} bytes with {} remaining",
            self.end - self.cursor
        );
        self.cursor += cnt;
    }
}
