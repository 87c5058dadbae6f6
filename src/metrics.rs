//! Metric helpers for `chunkwire`.
//!
//! This module defines metric names and simple helper functions wrapping the
//! [`metrics`](https://docs.rs/metrics) crate. Without the `metrics` feature
//! the helpers compile to nothing.

#[cfg(feature = "metrics")]
use metrics::counter;

/// Name of the counter tracking fragments allocated or accepted.
pub const FRAGMENTS_TOTAL: &str = "chunkwire_fragments_total";
/// Name of the counter tracking codec error occurrences.
pub const ERRORS_TOTAL: &str = "chunkwire_errors_total";

/// Direction of fragment processing.
#[derive(Clone, Copy, Debug)]
pub enum Direction {
    /// Fragments accepted by the reassembler.
    Inbound,
    /// Fragments allocated by a writer.
    Outbound,
}

impl Direction {
    #[cfg_attr(not(feature = "metrics"), allow(dead_code))]
    fn as_str(self) -> &'static str {
        match self {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
        }
    }
}

/// Record a fragment for the given direction.
pub fn inc_fragments(direction: Direction) {
    #[cfg(feature = "metrics")]
    counter!(FRAGMENTS_TOTAL, "direction" => direction.as_str()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = direction;
}

/// Record an error occurrence.
pub fn inc_errors() {
    #[cfg(feature = "metrics")]
    counter!(ERRORS_TOTAL).increment(1);
}
