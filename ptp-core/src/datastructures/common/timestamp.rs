use crate::datastructures::{WireFormat, WireFormatError};
use crate::time::Instant;

/// The wire representation of a PTP timestamp: a 48-bit seconds field and a
/// 32-bit nanoseconds-within-the-second field, both unsigned. See
/// *IEEE1588-2019 section 5.3.3*.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WireTimestamp {
    pub seconds: u64,
    pub nanos: u32,
}

impl WireTimestamp {
    /// Build a wire timestamp from an [`Instant`], truncating to the
    /// non-negative range the wire format can express.
    pub fn from_instant(instant: Instant) -> Self {
        let total_nanos = instant.nanos().max(0) as u64;
        Self {
            seconds: total_nanos / 1_000_000_000,
            nanos: (total_nanos % 1_000_000_000) as u32,
        }
    }

    /// Convert back to an [`Instant`].
    pub fn to_instant(self) -> Instant {
        Instant::from_nanos((self.seconds as i64) * 1_000_000_000 + self.nanos as i64)
    }
}

impl WireFormat for WireTimestamp {
    fn wire_size(&self) -> usize {
        10
    }

    fn serialize(&self, buffer: &mut [u8]) -> Result<(), WireFormatError> {
        let buffer = buffer
            .get_mut(0..10)
            .ok_or(WireFormatError::BufferTooShort)?;
        buffer[0..6].copy_from_slice(&self.seconds.to_be_bytes()[2..8]);
        buffer[6..10].copy_from_slice(&self.nanos.to_be_bytes());
        Ok(())
    }

    fn deserialize(buffer: &[u8]) -> Result<Self, WireFormatError> {
        let buffer = buffer.get(0..10).ok_or(WireFormatError::BufferTooShort)?;
        let mut seconds_bytes = [0u8; 8];
        seconds_bytes[2..8].copy_from_slice(&buffer[0..6]);
        Ok(Self {
            seconds: u64::from_be_bytes(seconds_bytes),
            nanos: u32::from_be_bytes(buffer[6..10].try_into().unwrap()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wireformat_roundtrip() {
        let ts = WireTimestamp {
            seconds: 1_234_567,
            nanos: 89,
        };
        let mut buf = [0u8; 10];
        ts.serialize(&mut buf).unwrap();
        assert_eq!(WireTimestamp::deserialize(&buf).unwrap(), ts);
    }

    #[test]
    fn instant_roundtrip() {
        let instant = Instant::from_nanos(1_234_567_000_000_089);
        let ts = WireTimestamp::from_instant(instant);
        assert_eq!(ts.to_instant(), instant);
    }
}
