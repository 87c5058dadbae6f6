//! Outbound packet builder that spreads a logical byte stream across fragments.
//!
//! [`PacketWriter`] keeps a single logical cursor and resolves it to a
//! `(fragment, offset)` pair only when copying bytes, so values and strings
//! may straddle any number of fragment boundaries. Fragments are allocated
//! lazily, one at a time, as the stream grows.

use std::num::NonZeroUsize;

use bytes::Bytes;
use log::{trace, warn};

use super::{
    ChannelId,
    Fragment,
    FragmentHeader,
    FragmentIndex,
    FragmentLayout,
    FragmentationConfig,
    FragmentationError,
    WriteError,
};
use crate::{
    byte_order::{WireValue, write_length_prefix},
    metrics::{self, Direction},
};

/// Accumulates typed values and strings into fixed-capacity fragments.
///
/// # Examples
///
/// ```
/// use chunkwire::fragment::{ChannelId, HEADER_SIZE, PacketReader, PacketWriter};
///
/// let mut writer = PacketWriter::new(ChannelId::new(0), HEADER_SIZE + 2, 0);
/// writer.write(25_u8).expect("write u8");
/// writer.write(1768_u16).expect("write u16");
/// writer.write_string("abcd").expect("write string");
/// assert_eq!(writer.size(), 11);
/// assert_eq!(writer.chunk_count(), 6);
///
/// let mut reader = PacketReader::new(&writer);
/// assert_eq!(reader.read(0_u8), 25);
/// assert_eq!(reader.read(0_u16), 1768);
/// assert_eq!(reader.read_string().expect("read string"), "abcd");
/// ```
#[derive(Clone, Debug)]
pub struct PacketWriter {
    channel: ChannelId,
    layout: FragmentLayout,
    cursor: usize,
    reported_floor: usize,
    fragments: Vec<Fragment>,
}

impl PacketWriter {
    /// Create a writer for fragments of `fragment_size` total bytes.
    ///
    /// `initial_size` is a reporting floor for [`size`](Self::size); it does
    /// not reserve or pre-write any bytes. A `fragment_size` that leaves no
    /// room after the header is accepted here, but every non-empty write on
    /// the resulting writer fails.
    #[must_use]
    pub fn new(channel: ChannelId, fragment_size: usize, initial_size: usize) -> Self {
        Self::with_layout(channel, FragmentLayout::new(fragment_size), initial_size)
    }

    /// Create a writer from an explicit [`FragmentLayout`].
    #[must_use]
    pub fn with_layout(channel: ChannelId, layout: FragmentLayout, initial_size: usize) -> Self {
        Self {
            channel,
            layout,
            cursor: 0,
            reported_floor: initial_size,
            fragments: Vec::new(),
        }
    }

    /// Create a writer using the outbound layout in `config`.
    #[must_use]
    pub fn from_config(
        channel: ChannelId,
        config: &FragmentationConfig,
        initial_size: usize,
    ) -> Self {
        Self::with_layout(channel, config.layout, initial_size)
    }

    /// Create a writer using one oversized fragment of
    /// [`MAX_FRAGMENT_SIZE`](crate::fragment::MAX_FRAGMENT_SIZE) bytes.
    #[must_use]
    pub fn unfragmented(channel: ChannelId, initial_size: usize) -> Self {
        Self::with_layout(channel, FragmentLayout::unfragmented(), initial_size)
    }

    /// Append a fixed-width value in stream byte order.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::NoPayloadCapacity`] if the layout has no payload
    /// capacity.
    pub fn write<T: WireValue>(&mut self, value: T) -> Result<(), WriteError> {
        self.write_bytes(value.to_wire().as_ref())
    }

    /// Append raw bytes to the logical stream.
    ///
    /// Writing an empty slice is a no-op and always succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::NoPayloadCapacity`] if the layout has no payload
    /// capacity.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), WriteError> {
        if bytes.is_empty() {
            return Ok(());
        }
        let Some(capacity) = self.layout.payload_capacity() else {
            return Err(self.reject(WriteError::NoPayloadCapacity {
                fragment_size: self.layout.fragment_size(),
            }));
        };
        let capacity = capacity.get();

        let mut rest = bytes;
        while let Some((index, offset)) = self.layout.locate(self.cursor) {
            if rest.is_empty() {
                break;
            }
            if index == self.fragments.len() {
                trace!(
                    "allocating fragment {index} on channel {} (payload capacity {capacity})",
                    self.channel
                );
                metrics::inc_fragments(Direction::Outbound);
                self.fragments.push(Fragment::with_capacity(capacity));
            }
            debug_assert_eq!(self.fragments[index].payload_len(), offset);

            let (head, tail) = rest.split_at(rest.len().min(capacity - offset));
            self.fragments[index].extend(head);
            self.cursor += head.len();
            rest = tail;
        }
        Ok(())
    }

    /// Append a length-prefixed string covering all of `text`.
    ///
    /// # Errors
    ///
    /// See [`write_string_with_len`](Self::write_string_with_len).
    pub fn write_string(&mut self, text: impl AsRef<[u8]>) -> Result<(), WriteError> {
        let bytes = text.as_ref();
        self.write_string_with_len(bytes, bytes.len())
    }

    /// Append a `u32` length field equal to `len` followed by the first `len`
    /// bytes of `text`.
    ///
    /// Claiming fewer bytes than `text` holds records only that prefix.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::StringTooShort`] if `len` exceeds the bytes in
    /// `text`, [`WriteError::StringTooLong`] if `len` does not fit a `u32`,
    /// and [`WriteError::NoPayloadCapacity`] if the layout has no payload
    /// capacity. Nothing is written when an error is returned.
    pub fn write_string_with_len(
        &mut self,
        text: impl AsRef<[u8]>,
        len: usize,
    ) -> Result<(), WriteError> {
        let bytes = text.as_ref();
        let Some(content) = bytes.get(..len) else {
            return Err(self.reject(WriteError::StringTooShort {
                declared: len,
                available: bytes.len(),
            }));
        };
        let Ok(prefix) = u32::try_from(len) else {
            return Err(self.reject(WriteError::StringTooLong { len }));
        };

        self.write_bytes(&write_length_prefix(prefix))?;
        self.write_bytes(content)
    }

    /// Logical size reported to the transport: `max(initial_size, cursor)`.
    #[must_use]
    pub fn size(&self) -> usize { self.reported_floor.max(self.cursor) }

    /// Number of fragments needed to carry [`size`](Self::size) bytes.
    ///
    /// Returns `0` for an empty packet and for layouts without payload
    /// capacity.
    #[must_use]
    pub fn chunk_count(&self) -> usize { self.layout.chunks_for(self.size()) }

    /// Bytes written to the logical stream so far.
    #[must_use]
    pub const fn cursor(&self) -> usize { self.cursor }

    /// Channel recorded for the transport.
    #[must_use]
    pub const fn channel(&self) -> ChannelId { self.channel }

    /// Fragment layout used by this writer.
    #[must_use]
    pub const fn layout(&self) -> FragmentLayout { self.layout }

    /// Logical bytes each fragment carries, or `None` when the header fills
    /// the whole fragment.
    #[must_use]
    pub const fn payload_capacity(&self) -> Option<NonZeroUsize> { self.layout.payload_capacity() }

    /// Allocated fragments, in stream order.
    #[must_use]
    pub fn fragments(&self) -> &[Fragment] { &self.fragments }

    /// Allocated fragments, with header regions open for the transport.
    pub fn fragments_mut(&mut self) -> &mut [Fragment] { &mut self.fragments }

    /// Log and count a rejected write, handing the error back to the caller.
    pub(crate) fn reject(&self, err: WriteError) -> WriteError {
        warn!("rejected write on channel {}: {err}", self.channel);
        metrics::inc_errors();
        err
    }

    /// Stamp every fragment header and freeze the fragments into frames.
    ///
    /// Headers follow the [`FragmentHeader`] layout and count the fragments
    /// actually allocated. A writer that never allocated a fragment yields a
    /// single header-only frame.
    ///
    /// # Errors
    ///
    /// Returns [`FragmentationError::IndexOverflow`] if more fragments were
    /// allocated than a header can number.
    pub fn into_frames(self) -> Result<Vec<Bytes>, FragmentationError> {
        let Self {
            channel,
            mut fragments,
            ..
        } = self;
        if fragments.is_empty() {
            fragments.push(Fragment::with_capacity(0));
        }

        let count = fragments.len();
        let total = u16::try_from(count).map_err(|_| {
            warn!("packet on channel {channel} needs {count} fragments; header limit exceeded");
            FragmentationError::IndexOverflow { count }
        })?;

        fragments
            .into_iter()
            .enumerate()
            .map(|(position, mut fragment)| {
                let index = FragmentIndex::try_from(position)
                    .map_err(|_| FragmentationError::IndexOverflow { count })?;
                fragment.stamp(FragmentHeader::new(channel, index, total));
                Ok(fragment.freeze())
            })
            .collect()
    }
}
