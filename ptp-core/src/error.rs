//! A single error type shared by every fallible operation in the crate.

use core::fmt;

/// Everything that can go wrong inside the engine.
///
/// Every variant here is something a caller can reasonably branch on; purely
/// internal invariant violations are not represented (they are bugs, not
/// errors) and show up as `debug_assert!` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum Error {
    /// A received message did not parse as valid wire data.
    #[cfg_attr(feature = "std", error("malformed message: {0}"))]
    Malformed(DecodeError),
    /// A received message used a PTP version this engine does not speak.
    #[cfg_attr(feature = "std", error("unsupported PTP version {0}"))]
    UnsupportedVersion(u8),
    /// A received message used a delay mechanism other than end-to-end.
    #[cfg_attr(feature = "std", error("unsupported delay mechanism"))]
    UnsupportedDelayMechanism,
    /// The outbound buffer supplied by the host was too small for the
    /// message being encoded.
    #[cfg_attr(feature = "std", error("buffer too small to encode message"))]
    BufferTooSmall,
    /// The foreign master list, pending-measurement table or some other
    /// fixed-capacity collection was already full.
    #[cfg_attr(feature = "std", error("fixed-capacity collection is full"))]
    CapacityExceeded,
    /// A `steps_removed` field would have overflowed `u16` during relay;
    /// the triggering Announce is dropped rather than wrapped.
    #[cfg_attr(feature = "std", error("steps_removed would overflow"))]
    StepsRemovedOverflow,
    /// The host asked the engine to act on a port index that does not exist.
    #[cfg_attr(feature = "std", error("port index {0} out of range"))]
    InvalidPortIndex(usize),
    /// The requested clock adjustment exceeds the frequency bound the
    /// injected [`Clock`](crate::hal::Clock) reported.
    #[cfg_attr(feature = "std", error("requested frequency adjustment out of bounds"))]
    FrequencyOutOfBounds,
}

#[cfg(not(feature = "std"))]
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Malformed(e) => write!(f, "malformed message: {e}"),
            Error::UnsupportedVersion(v) => write!(f, "unsupported PTP version {v}"),
            Error::UnsupportedDelayMechanism => write!(f, "unsupported delay mechanism"),
            Error::BufferTooSmall => write!(f, "buffer too small to encode message"),
            Error::CapacityExceeded => write!(f, "fixed-capacity collection is full"),
            Error::StepsRemovedOverflow => write!(f, "steps_removed would overflow"),
            Error::InvalidPortIndex(p) => write!(f, "port index {p} out of range"),
            Error::FrequencyOutOfBounds => {
                write!(f, "requested frequency adjustment out of bounds")
            }
        }
    }
}

/// Reasons a wire-format decode can fail, nested inside [`Error::Malformed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Fewer bytes were supplied than the header or body requires.
    BufferTooShort,
    /// The `messageType` nibble did not match a message this engine decodes.
    UnknownMessageType(u8),
    /// A TLV's declared length ran past the end of the containing message.
    TruncatedTlv,
    /// `messageLength` in the header did not match the bytes supplied.
    LengthMismatch,
    /// A wire value did not match any variant of the enum it decodes to.
    EnumConversion,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::BufferTooShort => write!(f, "buffer too short"),
            DecodeError::UnknownMessageType(t) => write!(f, "unknown message type {t:#x}"),
            DecodeError::TruncatedTlv => write!(f, "truncated TLV"),
            DecodeError::LengthMismatch => write!(f, "messageLength did not match buffer"),
            DecodeError::EnumConversion => write!(f, "enum conversion failed"),
        }
    }
}

impl<Enum: num_enum::TryFromPrimitive> From<num_enum::TryFromPrimitiveError<Enum>>
    for DecodeError
{
    fn from(_: num_enum::TryFromPrimitiveError<Enum>) -> Self {
        Self::EnumConversion
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}
