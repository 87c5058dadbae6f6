//! Inbound helper that stitches received frames back into packets.
//!
//! [`Reassembler`] mirrors [`PacketWriter::into_frames`](crate::fragment::PacketWriter::into_frames)
//! by collecting frames keyed by [`ChannelId`](crate::fragment::ChannelId).
//! It enforces ordering via [`FragmentSeries`](crate::fragment::FragmentSeries),
//! checks that every fragment but the last is filled to the packet's payload
//! capacity, guards against unbounded allocation with a configurable cap, and
//! purges stale partial packets after a fixed timeout.

use std::{
    collections::{
        HashMap,
        hash_map::{Entry, OccupiedEntry},
    },
    num::NonZeroUsize,
    time::{Duration, Instant},
};

use log::{debug, warn};

use super::{
    ChannelId,
    Fragment,
    FragmentHeader,
    FragmentIndex,
    FragmentLayout,
    FragmentSeries,
    FragmentStatus,
    FragmentationConfig,
    PacketReader,
    ReassemblyError,
};
use crate::metrics::{self, Direction};

#[derive(Debug)]
struct PartialPacket {
    series: FragmentSeries,
    fragments: Vec<Fragment>,
    payload_capacity: NonZeroUsize,
    len: usize,
    started_at: Instant,
}

impl PartialPacket {
    fn new(
        series: FragmentSeries,
        first: Fragment,
        payload_capacity: NonZeroUsize,
        started_at: Instant,
    ) -> Self {
        let len = first.payload_len();
        Self {
            series,
            fragments: vec![first],
            payload_capacity,
            len,
            started_at,
        }
    }

    fn push(&mut self, fragment: Fragment) {
        self.len += fragment.payload_len();
        self.fragments.push(fragment);
    }

    fn into_packet(self) -> AssembledPacket {
        AssembledPacket {
            channel: self.series.channel(),
            layout: FragmentLayout::with_payload_capacity(self.payload_capacity),
            fragments: self.fragments,
            len: self.len,
        }
    }
}

/// A packet rebuilt from received frames, ready to be read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssembledPacket {
    channel: ChannelId,
    layout: FragmentLayout,
    fragments: Vec<Fragment>,
    len: usize,
}

impl AssembledPacket {
    fn single(channel: ChannelId, fragment: Fragment) -> Self {
        let len = fragment.payload_len();
        let layout = NonZeroUsize::new(len)
            .map_or_else(FragmentLayout::unfragmented, FragmentLayout::with_payload_capacity);
        Self {
            channel,
            layout,
            fragments: vec![fragment],
            len,
        }
    }

    /// Channel the packet arrived on.
    #[must_use]
    pub const fn channel(&self) -> ChannelId { self.channel }

    /// Layout inferred from the received fragments.
    #[must_use]
    pub const fn layout(&self) -> FragmentLayout { self.layout }

    /// Received fragments, in stream order.
    #[must_use]
    pub fn fragments(&self) -> &[Fragment] { &self.fragments }

    /// Logical size of the packet in bytes.
    #[must_use]
    pub const fn len(&self) -> usize { self.len }

    /// Whether the packet carries no logical bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool { self.len == 0 }

    /// Copy the logical stream out of the fragments into one buffer.
    #[must_use]
    pub fn to_payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(self.len);
        for fragment in &self.fragments {
            payload.extend_from_slice(fragment.payload());
        }
        payload
    }

    /// Create a reader over the packet's logical stream.
    #[must_use]
    pub fn reader(&self) -> PacketReader<'_> { PacketReader::from_assembled(self) }
}

/// Stateful packet re-assembler with timeout-based eviction.
#[derive(Debug)]
pub struct Reassembler {
    max_packet_size: NonZeroUsize,
    timeout: Duration,
    buffers: HashMap<ChannelId, PartialPacket>,
}

impl Reassembler {
    /// Create a new re-assembler that enforces a maximum packet size.
    #[must_use]
    pub fn new(max_packet_size: NonZeroUsize, timeout: Duration) -> Self {
        Self {
            max_packet_size,
            timeout,
            buffers: HashMap::new(),
        }
    }

    /// Create a re-assembler from the limits in `config`.
    #[must_use]
    pub fn from_config(config: &FragmentationConfig) -> Self {
        Self::new(config.max_packet_size, config.reassembly_timeout)
    }

    /// Process a frame using the current time.
    ///
    /// Returns `Ok(Some(_))` when the frame completes a packet, `Ok(None)`
    /// while more frames are required or when the frame repeats one already
    /// accepted, or an error if ordering or size invariants are violated.
    ///
    /// A fragment with index zero always starts a new packet; any partial
    /// packet still buffered for its channel is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`ReassemblyError`] when the header is malformed, a fragment
    /// arrives out of order, fragment payload lengths are inconsistent, or
    /// the packet would exceed the configured cap. The partial packet for the
    /// channel is discarded on error.
    pub fn push(
        &mut self,
        frame: impl AsRef<[u8]>,
    ) -> Result<Option<AssembledPacket>, ReassemblyError> {
        self.push_at(frame, Instant::now())
    }

    /// Process a frame using an explicit clock reading.
    ///
    /// Accepting an explicit `now` simplifies deterministic testing and allows
    /// callers to co-ordinate eviction sweeps with their own timers.
    ///
    /// # Errors
    ///
    /// See [`push`](Self::push).
    pub fn push_at(
        &mut self,
        frame: impl AsRef<[u8]>,
        now: Instant,
    ) -> Result<Option<AssembledPacket>, ReassemblyError> {
        self.purge_expired_at(now);

        let frame = frame.as_ref();
        let result = FragmentHeader::decode(frame)
            .map_err(ReassemblyError::from)
            .and_then(|header| self.accept(header, Fragment::from_frame(frame), now));
        match &result {
            Ok(Some(packet)) => debug!(
                "reassembled packet on channel {}: {} bytes in {} fragments",
                packet.channel(),
                packet.len(),
                packet.fragments().len()
            ),
            Ok(None) => {}
            Err(err) => {
                warn!("dropping fragment: {err}");
                metrics::inc_errors();
            }
        }
        result
    }

    fn accept(
        &mut self,
        header: FragmentHeader,
        fragment: Fragment,
        now: Instant,
    ) -> Result<Option<AssembledPacket>, ReassemblyError> {
        let limit = self.max_packet_size;
        if header.fragment_index() == FragmentIndex::zero()
            && self.buffers.remove(&header.channel()).is_some()
        {
            warn!(
                "channel {}: new packet started before the previous one completed; \
                 discarding partial packet",
                header.channel()
            );
            metrics::inc_errors();
        }
        match self.buffers.entry(header.channel()) {
            Entry::Occupied(mut occupied) => match occupied.get_mut().series.accept(header) {
                Ok(FragmentStatus::Duplicate) => Ok(None),
                Ok(status) => Self::append_and_maybe_complete(
                    limit,
                    occupied,
                    header,
                    fragment,
                    status == FragmentStatus::Complete,
                ),
                Err(err) => {
                    occupied.remove();
                    Err(err.into())
                }
            },
            Entry::Vacant(vacant) => {
                let mut series = FragmentSeries::new(header.channel(), header.fragment_count());
                let status = series.accept(header)?;
                Self::assert_within_limit(limit, header.channel(), fragment.payload_len())?;
                metrics::inc_fragments(Direction::Inbound);

                if status == FragmentStatus::Complete {
                    return Ok(Some(AssembledPacket::single(header.channel(), fragment)));
                }
                let Some(capacity) = NonZeroUsize::new(fragment.payload_len()) else {
                    return Err(ReassemblyError::EmptyFragment {
                        index: header.fragment_index(),
                    });
                };
                vacant.insert(PartialPacket::new(series, fragment, capacity, now));
                Ok(None)
            }
        }
    }

    /// Remove any partial packets that exceeded the configured timeout.
    ///
    /// Returns the channels whose packets were evicted.
    pub fn purge_expired(&mut self) -> Vec<ChannelId> { self.purge_expired_at(Instant::now()) }

    /// Remove any partial packets that exceeded the configured timeout using
    /// an explicit clock reading.
    ///
    /// Returns the channels whose packets were evicted.
    pub fn purge_expired_at(&mut self, now: Instant) -> Vec<ChannelId> {
        let mut evicted = Vec::new();
        let timeout = self.timeout;

        self.buffers.retain(|channel, partial| {
            let expired = now.saturating_duration_since(partial.started_at) >= timeout;
            if expired {
                debug!("evicting stale partial packet on channel {channel}");
                evicted.push(*channel);
            }
            !expired
        });

        evicted
    }

    /// Number of partial packets currently buffered.
    #[must_use]
    pub fn buffered_len(&self) -> usize { self.buffers.len() }

    fn assert_within_limit(
        limit: NonZeroUsize,
        channel: ChannelId,
        attempted: usize,
    ) -> Result<(), ReassemblyError> {
        if attempted > limit.get() {
            return Err(ReassemblyError::PacketTooLarge {
                channel,
                attempted,
                limit,
            });
        }
        Ok(())
    }

    fn append_and_maybe_complete(
        limit: NonZeroUsize,
        mut occupied: OccupiedEntry<'_, ChannelId, PartialPacket>,
        header: FragmentHeader,
        fragment: Fragment,
        completes: bool,
    ) -> Result<Option<AssembledPacket>, ReassemblyError> {
        let channel = *occupied.key();
        let capacity = occupied.get().payload_capacity.get();
        let len = fragment.payload_len();
        let consistent = if completes {
            len <= capacity
        } else {
            len == capacity
        };
        if !consistent {
            occupied.remove();
            return Err(ReassemblyError::PayloadLengthMismatch {
                index: header.fragment_index(),
                len,
                expected: capacity,
            });
        }

        let attempted = occupied.get().len.saturating_add(len);
        if let Err(err) = Self::assert_within_limit(limit, channel, attempted) {
            occupied.remove();
            return Err(err);
        }

        metrics::inc_fragments(Direction::Inbound);
        occupied.get_mut().push(fragment);
        if completes {
            Ok(Some(occupied.remove().into_packet()))
        } else {
            Ok(None)
        }
    }
}
