//! Configuration used by packet writers and the reassembler.

use std::{num::NonZeroUsize, time::Duration};

use super::{HEADER_SIZE, MAX_FRAGMENT_SIZE};

/// Split of a fragment's total size into header and payload regions.
///
/// A layout whose total size does not exceed [`HEADER_SIZE`] is valid to
/// hold but has no payload capacity; writers built from it reject every
/// non-empty write.
///
/// # Examples
///
/// ```
/// use chunkwire::fragment::{FragmentLayout, HEADER_SIZE};
/// let layout = FragmentLayout::new(HEADER_SIZE + 16);
/// assert_eq!(layout.payload_capacity().map(|cap| cap.get()), Some(16));
/// assert_eq!(layout.chunks_for(17), 2);
/// assert!(FragmentLayout::new(HEADER_SIZE).payload_capacity().is_none());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FragmentLayout {
    fragment_size: usize,
    payload_capacity: Option<NonZeroUsize>,
}

impl FragmentLayout {
    /// Derive the layout for fragments occupying `fragment_size` bytes in total.
    #[must_use]
    pub const fn new(fragment_size: usize) -> Self {
        Self {
            fragment_size,
            payload_capacity: NonZeroUsize::new(fragment_size.saturating_sub(HEADER_SIZE)),
        }
    }

    /// Layout for a single oversized fragment of [`MAX_FRAGMENT_SIZE`] bytes.
    #[must_use]
    pub const fn unfragmented() -> Self { Self::new(MAX_FRAGMENT_SIZE) }

    /// Build a layout directly from a payload capacity.
    #[must_use]
    pub const fn with_payload_capacity(payload_capacity: NonZeroUsize) -> Self {
        Self {
            fragment_size: payload_capacity.get().saturating_add(HEADER_SIZE),
            payload_capacity: Some(payload_capacity),
        }
    }

    /// Total bytes one fragment occupies, header included.
    #[must_use]
    pub const fn fragment_size(&self) -> usize { self.fragment_size }

    /// Logical bytes one fragment can carry, or `None` if the header consumes
    /// the whole fragment.
    #[must_use]
    pub const fn payload_capacity(&self) -> Option<NonZeroUsize> { self.payload_capacity }

    /// Number of fragments needed to carry `len` logical bytes.
    ///
    /// Returns `0` for an empty stream and for layouts without payload capacity.
    #[must_use]
    pub fn chunks_for(&self, len: usize) -> usize {
        match self.payload_capacity {
            Some(cap) => len.div_ceil(cap.get()),
            None => 0,
        }
    }

    /// Resolve a logical stream offset to `(fragment, offset within payload)`.
    pub(crate) fn locate(&self, offset: usize) -> Option<(usize, usize)> {
        self.payload_capacity
            .map(|cap| (offset / cap.get(), offset % cap.get()))
    }
}

impl Default for FragmentLayout {
    fn default() -> Self { Self::unfragmented() }
}

/// Settings that bound fragment sizes and reassembly resource usage.
#[derive(Clone, Copy, Debug)]
pub struct FragmentationConfig {
    /// Layout applied to outbound packets.
    pub layout: FragmentLayout,
    /// Hard cap on the logical size of a reassembled packet.
    pub max_packet_size: NonZeroUsize,
    /// Duration after which incomplete reassembly buffers are evicted.
    pub reassembly_timeout: Duration,
}

const DEFAULT_MAX_PACKET_SIZE: NonZeroUsize = match NonZeroUsize::new(1 << 20) {
    Some(size) => size,
    None => panic!("default packet cap must be non-zero"),
};

const DEFAULT_REASSEMBLY_TIMEOUT: Duration = Duration::from_secs(30);

impl FragmentationConfig {
    /// Configuration for fragments of `fragment_size` total bytes with the
    /// default packet cap and timeout.
    #[must_use]
    pub const fn for_fragment_size(fragment_size: usize) -> Self {
        Self {
            layout: FragmentLayout::new(fragment_size),
            max_packet_size: DEFAULT_MAX_PACKET_SIZE,
            reassembly_timeout: DEFAULT_REASSEMBLY_TIMEOUT,
        }
    }

    /// Replace the reassembled packet size cap.
    #[must_use]
    pub const fn with_max_packet_size(mut self, max_packet_size: NonZeroUsize) -> Self {
        self.max_packet_size = max_packet_size;
        self
    }

    /// Replace the reassembly timeout.
    #[must_use]
    pub const fn with_reassembly_timeout(mut self, timeout: Duration) -> Self {
        self.reassembly_timeout = timeout;
        self
    }
}

impl Default for FragmentationConfig {
    fn default() -> Self { Self::for_fragment_size(MAX_FRAGMENT_SIZE) }
}
