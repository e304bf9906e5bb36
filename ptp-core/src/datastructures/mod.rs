//! Wire-format data structures defined by the PTP standard: common types,
//! per-clock/per-port datasets, and the message codec.

use core::fmt::Debug;

pub mod common;
pub mod datasets;
pub mod messages;

pub use crate::error::DecodeError as WireFormatError;

/// Shared behaviour for anything with an exact PTP wire representation.
pub trait WireFormat: Sized + Debug + Clone + PartialEq {
    /// The byte size this value occupies on the wire.
    fn wire_size(&self) -> usize;

    /// Serialize into `buffer`, which must be at least [`wire_size`](Self::wire_size) long.
    fn serialize(&self, buffer: &mut [u8]) -> Result<(), WireFormatError>;

    /// Parse a value from the front of `buffer`.
    fn deserialize(buffer: &[u8]) -> Result<Self, WireFormatError>;
}
