use fixed::types::I48F16;

use crate::datastructures::{WireFormat, WireFormatError};
use crate::time::Duration;

/// The wire representation of a signed time interval: a 64-bit two's
/// complement number with a 16-bit fractional part, scaled in nanoseconds.
/// Used only for `correctionField`; everywhere else the engine works in
/// [`Duration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeInterval(pub I48F16);

impl TimeInterval {
    /// Nanosecond value as a floating point number, for diagnostics.
    pub fn to_nanos_f64(self) -> f64 {
        self.0.to_num()
    }
}

impl WireFormat for TimeInterval {
    fn wire_size(&self) -> usize {
        8
    }

    fn serialize(&self, buffer: &mut [u8]) -> Result<(), WireFormatError> {
        if buffer.len() < 8 {
            return Err(WireFormatError::BufferTooShort);
        }
        buffer[0..8].copy_from_slice(&self.0.to_bits().to_be_bytes());
        Ok(())
    }

    fn deserialize(buffer: &[u8]) -> Result<Self, WireFormatError> {
        let bytes: [u8; 8] = buffer
            .get(0..8)
            .ok_or(WireFormatError::BufferTooShort)?
            .try_into()
            .unwrap();
        Ok(Self(I48F16::from_bits(i64::from_be_bytes(bytes))))
    }
}

impl From<Duration> for TimeInterval {
    fn from(duration: Duration) -> Self {
        TimeInterval(I48F16::from_num(duration.nanos()))
    }
}

impl From<TimeInterval> for Duration {
    fn from(interval: TimeInterval) -> Self {
        Duration::from_nanos(interval.0.to_num::<i64>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_interval_wireformat() {
        let representations = [
            (
                [0x00, 0x00, 0x00, 0x00, 0x00, 0x02, 0x80, 0x00u8],
                TimeInterval(I48F16::from_num(2.5f64)),
            ),
            (
                [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01u8],
                TimeInterval(I48F16::from_num(1.0f64 / u16::MAX as f64)),
            ),
            (
                [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x00, 0x00u8],
                TimeInterval(I48F16::from_num(-1.0f64)),
            ),
        ];

        for (byte_representation, object_representation) in representations {
            let mut buf = [0u8; 8];
            object_representation.serialize(&mut buf).unwrap();
            assert_eq!(buf, byte_representation);
            assert_eq!(
                TimeInterval::deserialize(&byte_representation).unwrap(),
                object_representation
            );
        }
    }

    #[test]
    fn from_duration_is_exact_for_whole_nanos() {
        let d = Duration::from_nanos(1_184_567);
        let ti = TimeInterval::from(d);
        assert_eq!(ti.to_nanos_f64(), 1_184_567.0);
    }
}
