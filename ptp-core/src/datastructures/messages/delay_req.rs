use crate::datastructures::common::WireTimestamp;
use crate::datastructures::{WireFormat, WireFormatError};

/// Body of a `Delay_Req` message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DelayReqMessage {
    pub origin_timestamp: WireTimestamp,
}

impl DelayReqMessage {
    pub fn wire_size(&self) -> usize {
        10
    }

    pub fn serialize(&self, buffer: &mut [u8]) -> Result<(), WireFormatError> {
        self.origin_timestamp.serialize(buffer)
    }

    pub fn deserialize(buffer: &[u8]) -> Result<Self, WireFormatError> {
        Ok(Self {
            origin_timestamp: WireTimestamp::deserialize(buffer)?,
        })
    }
}
