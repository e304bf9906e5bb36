use crate::datastructures::common::{ClockIdentity, ClockQuality, TimeSource, WireTimestamp};
use crate::datastructures::{WireFormat, WireFormatError};

/// Body of an `Announce` message: the sender's view of the current
/// grandmaster, used by every listening port to run dataset comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnounceMessage {
    pub origin_timestamp: WireTimestamp,
    pub current_utc_offset: i16,
    pub grandmaster_priority_1: u8,
    pub grandmaster_clock_quality: ClockQuality,
    pub grandmaster_priority_2: u8,
    pub grandmaster_identity: ClockIdentity,
    pub steps_removed: u16,
    pub time_source: TimeSource,
}

impl AnnounceMessage {
    pub fn wire_size(&self) -> usize {
        30
    }

    pub fn serialize(&self, buffer: &mut [u8]) -> Result<(), WireFormatError> {
        let buffer = buffer
            .get_mut(0..30)
            .ok_or(WireFormatError::BufferTooShort)?;
        self.origin_timestamp.serialize(&mut buffer[0..10])?;
        buffer[10..12].copy_from_slice(&self.current_utc_offset.to_be_bytes());
        buffer[12] = 0;
        buffer[13] = self.grandmaster_priority_1;
        self.grandmaster_clock_quality.serialize(&mut buffer[14..18])?;
        buffer[18] = self.grandmaster_priority_2;
        self.grandmaster_identity.serialize(&mut buffer[19..27])?;
        buffer[27..29].copy_from_slice(&self.steps_removed.to_be_bytes());
        buffer[29] = self.time_source.to_primitive();
        Ok(())
    }

    pub fn deserialize(buffer: &[u8]) -> Result<Self, WireFormatError> {
        let buffer = buffer.get(0..30).ok_or(WireFormatError::BufferTooShort)?;
        Ok(Self {
            origin_timestamp: WireTimestamp::deserialize(&buffer[0..10])?,
            current_utc_offset: i16::from_be_bytes(buffer[10..12].try_into().unwrap()),
            grandmaster_priority_1: buffer[13],
            grandmaster_clock_quality: ClockQuality::deserialize(&buffer[14..18])?,
            grandmaster_priority_2: buffer[18],
            grandmaster_identity: ClockIdentity::deserialize(&buffer[19..27])?,
            steps_removed: u16::from_be_bytes(buffer[27..29].try_into().unwrap()),
            time_source: TimeSource::from_primitive(buffer[29]),
        })
    }
}
