//! Fragment header layout shared with the transport.
//!
//! The codec reserves [`HEADER_SIZE`] bytes at the front of every fragment.
//! Their contents belong to the transport; [`FragmentHeader`] describes the
//! layout used by [`PacketWriter::into_frames`](crate::fragment::PacketWriter::into_frames)
//! and the [`Reassembler`](crate::fragment::Reassembler):
//!
//! ```text
//! [channel: u16 LE][fragment index: u16 LE][fragment count: u16 LE]
//! ```

use super::{ChannelId, FragmentIndex, HeaderError};
use crate::byte_order::WireValue;

/// Bytes reserved at the front of every fragment for transport metadata.
pub const HEADER_SIZE: usize = 6;

/// Conventional total size of a single oversized fragment.
///
/// Writers built with this size behave as if unfragmented for any packet the
/// transport is willing to carry.
pub const MAX_FRAGMENT_SIZE: usize = 30_000;

/// Header describing a single fragment.
///
/// # Examples
///
/// ```
/// use chunkwire::fragment::{ChannelId, FragmentHeader, FragmentIndex};
/// let header = FragmentHeader::new(ChannelId::new(7), FragmentIndex::zero(), 2);
/// assert_eq!(header.channel().get(), 7);
/// assert!(!header.is_last_fragment());
/// let decoded = FragmentHeader::decode(&header.encode()).expect("decode header");
/// assert_eq!(decoded, header);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FragmentHeader {
    channel: ChannelId,
    fragment_index: FragmentIndex,
    fragment_count: u16,
}

impl FragmentHeader {
    /// Create a new fragment header.
    #[must_use]
    pub const fn new(channel: ChannelId, fragment_index: FragmentIndex, fragment_count: u16) -> Self {
        Self {
            channel,
            fragment_index,
            fragment_count,
        }
    }

    /// Return the channel the packet travels on.
    #[must_use]
    pub const fn channel(&self) -> ChannelId { self.channel }

    /// Return the fragment position relative to the packet.
    #[must_use]
    pub const fn fragment_index(&self) -> FragmentIndex { self.fragment_index }

    /// Return the number of fragments the packet was split into.
    #[must_use]
    pub const fn fragment_count(&self) -> u16 { self.fragment_count }

    /// Report whether this is the final fragment.
    #[must_use]
    pub fn is_last_fragment(&self) -> bool {
        u32::from(self.fragment_index.get()) + 1 >= u32::from(self.fragment_count)
    }

    /// Encode the header into its fixed on-wire form.
    #[must_use]
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0_u8; HEADER_SIZE];
        buf[0..2].copy_from_slice(&self.channel.get().to_wire());
        buf[2..4].copy_from_slice(&self.fragment_index.get().to_wire());
        buf[4..6].copy_from_slice(&self.fragment_count.to_wire());
        buf
    }

    /// Decode a header from the front of `frame`.
    ///
    /// # Errors
    ///
    /// Returns [`HeaderError::Truncated`] when `frame` is shorter than
    /// [`HEADER_SIZE`], and [`HeaderError::ZeroCount`] when the header
    /// advertises a packet with no fragments.
    pub fn decode(frame: &[u8]) -> Result<Self, HeaderError> {
        let Some(bytes) = frame.get(..HEADER_SIZE) else {
            return Err(HeaderError::Truncated { have: frame.len() });
        };
        let field = |at: usize| u16::from_wire([bytes[at], bytes[at + 1]]);

        let fragment_count = field(4);
        if fragment_count == 0 {
            return Err(HeaderError::ZeroCount);
        }
        Ok(Self {
            channel: ChannelId::new(field(0)),
            fragment_index: FragmentIndex::new(field(2)),
            fragment_count,
        })
    }
}
