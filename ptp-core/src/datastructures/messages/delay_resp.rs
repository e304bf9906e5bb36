use crate::datastructures::common::{PortIdentity, WireTimestamp};
use crate::datastructures::{WireFormat, WireFormatError};

/// Body of a `Delay_Resp` message: the timestamp the requesting
/// `Delay_Req` was received at, addressed back to the requester by its
/// [`PortIdentity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DelayRespMessage {
    pub receive_timestamp: WireTimestamp,
    pub requesting_port_identity: PortIdentity,
}

impl DelayRespMessage {
    pub fn wire_size(&self) -> usize {
        20
    }

    pub fn serialize(&self, buffer: &mut [u8]) -> Result<(), WireFormatError> {
        let buffer = buffer
            .get_mut(0..20)
            .ok_or(WireFormatError::BufferTooShort)?;
        self.receive_timestamp.serialize(&mut buffer[0..10])?;
        self.requesting_port_identity.serialize(&mut buffer[10..20])?;
        Ok(())
    }

    pub fn deserialize(buffer: &[u8]) -> Result<Self, WireFormatError> {
        let buffer = buffer.get(0..20).ok_or(WireFormatError::BufferTooShort)?;
        Ok(Self {
            receive_timestamp: WireTimestamp::deserialize(&buffer[0..10])?,
            requesting_port_identity: PortIdentity::deserialize(&buffer[10..20])?,
        })
    }
}
