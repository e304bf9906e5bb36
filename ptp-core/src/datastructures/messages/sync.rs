use crate::datastructures::common::WireTimestamp;
use crate::datastructures::{WireFormat, WireFormatError};

/// Body of a `Sync` message. In the two-step operation this engine always
/// uses, `origin_timestamp` is zero on the wire and the real transmit time
/// travels in the following `Follow_Up`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncMessage {
    pub origin_timestamp: WireTimestamp,
}

impl SyncMessage {
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
