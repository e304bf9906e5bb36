use crate::datastructures::common::WireTimestamp;
use crate::datastructures::{WireFormat, WireFormatError};

/// Body of a `Follow_Up` message: the precise transmit timestamp of the
/// `Sync` it correlates to, carried separately because hardware
/// timestamping of the `Sync` send only completes after the packet leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FollowUpMessage {
    pub precise_origin_timestamp: WireTimestamp,
}

impl FollowUpMessage {
    pub fn wire_size(&self) -> usize {
        10
    }

    pub fn serialize(&self, buffer: &mut [u8]) -> Result<(), WireFormatError> {
        self.precise_origin_timestamp.serialize(buffer)
    }

    pub fn deserialize(buffer: &[u8]) -> Result<Self, WireFormatError> {
        Ok(Self {
            precise_origin_timestamp: WireTimestamp::deserialize(buffer)?,
        })
    }
}
