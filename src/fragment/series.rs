//! Per-channel ordering state for inbound fragments.

use super::{ChannelId, FragmentError, FragmentHeader, FragmentIndex, FragmentStatus};

/// Track the expected ordering of fragments for a single packet.
///
/// The series keeps only lightweight metadata: the channel, the fragment
/// count advertised by the first header, the next expected index and a
/// completion flag.
#[derive(Clone, Debug)]
pub struct FragmentSeries {
    channel: ChannelId,
    fragment_count: u16,
    next_index: FragmentIndex,
    complete: bool,
}

impl FragmentSeries {
    /// Create a new series for a packet of `fragment_count` fragments on
    /// `channel`, expecting the first fragment.
    #[must_use]
    pub const fn new(channel: ChannelId, fragment_count: u16) -> Self {
        Self {
            channel,
            fragment_count,
            next_index: FragmentIndex::zero(),
            complete: false,
        }
    }

    /// Return the channel tracked by this series.
    #[must_use]
    pub const fn channel(&self) -> ChannelId { self.channel }

    /// Return the fragment count the series expects.
    #[must_use]
    pub const fn fragment_count(&self) -> u16 { self.fragment_count }

    /// Return whether the series has consumed the final fragment.
    #[must_use]
    pub const fn is_complete(&self) -> bool { self.complete }

    /// Accept a fragment and update the expected index.
    ///
    /// # Examples
    ///
    /// ```
    /// use chunkwire::fragment::{
    ///     ChannelId,
    ///     FragmentHeader,
    ///     FragmentIndex,
    ///     FragmentSeries,
    ///     FragmentStatus,
    /// };
    /// let channel = ChannelId::new(99);
    /// let mut series = FragmentSeries::new(channel, 2);
    /// let first = FragmentHeader::new(channel, FragmentIndex::zero(), 2);
    /// let final_fragment = FragmentHeader::new(channel, FragmentIndex::new(1), 2);
    /// assert_eq!(series.accept(first), Ok(FragmentStatus::Incomplete));
    /// assert_eq!(series.accept(final_fragment), Ok(FragmentStatus::Complete));
    /// assert!(series.is_complete());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`FragmentError::ChannelMismatch`] when the fragment belongs to
    /// another channel, [`FragmentError::CountMismatch`] when it advertises a
    /// different fragment count, [`FragmentError::IndexOutOfRange`] when its
    /// index does not fit the count, and [`FragmentError::IndexMismatch`] when
    /// it arrives ahead of the expected index.
    ///
    /// When a fragment repeats an already accepted index, this method returns
    /// [`FragmentStatus::Duplicate`] and leaves the series position unchanged.
    pub fn accept(&mut self, fragment: FragmentHeader) -> Result<FragmentStatus, FragmentError> {
        if fragment.channel() != self.channel {
            return Err(FragmentError::ChannelMismatch {
                expected: self.channel,
                found: fragment.channel(),
            });
        }

        if fragment.fragment_count() != self.fragment_count {
            return Err(FragmentError::CountMismatch {
                expected: self.fragment_count,
                found: fragment.fragment_count(),
            });
        }

        let index = fragment.fragment_index();
        if index.get() >= self.fragment_count {
            return Err(FragmentError::IndexOutOfRange {
                index,
                count: self.fragment_count,
            });
        }

        if index < self.next_index {
            return Ok(FragmentStatus::Duplicate);
        }

        if index > self.next_index {
            return Err(FragmentError::IndexMismatch {
                expected: self.next_index,
                found: index,
            });
        }

        if let Some(next) = index.checked_increment() {
            self.next_index = next;
        }
        if fragment.is_last_fragment() {
            self.complete = true;
            return Ok(FragmentStatus::Complete);
        }
        Ok(FragmentStatus::Incomplete)
    }
}
