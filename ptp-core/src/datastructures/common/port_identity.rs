use crate::datastructures::common::ClockIdentity;
use crate::datastructures::{WireFormat, WireFormatError};

/// The identity of a single port on a PTP node: its node's [`ClockIdentity`]
/// plus a 1-based port number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, PartialOrd, Ord, Hash)]
pub struct PortIdentity {
    pub clock_identity: ClockIdentity,
    pub port_number: u16,
}

impl WireFormat for PortIdentity {
    fn wire_size(&self) -> usize {
        10
    }

    fn serialize(&self, buffer: &mut [u8]) -> Result<(), WireFormatError> {
        let buffer = buffer
            .get_mut(0..10)
            .ok_or(WireFormatError::BufferTooShort)?;
        self.clock_identity.serialize(&mut buffer[0..8])?;
        buffer[8..10].copy_from_slice(&self.port_number.to_be_bytes());
        Ok(())
    }

    fn deserialize(buffer: &[u8]) -> Result<Self, WireFormatError> {
        let buffer = buffer.get(0..10).ok_or(WireFormatError::BufferTooShort)?;
        Ok(Self {
            clock_identity: ClockIdentity::deserialize(&buffer[0..8])?,
            port_number: u16::from_be_bytes(buffer[8..10].try_into().unwrap()),
        })
    }
}

impl core::fmt::Display for PortIdentity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}-{}", self.clock_identity, self.port_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_identity_wireformat() {
        let pid = PortIdentity {
            clock_identity: ClockIdentity([1, 2, 3, 4, 5, 6, 7, 8]),
            port_number: 1,
        };
        let mut buf = [0u8; 10];
        pid.serialize(&mut buf).unwrap();
        assert_eq!(buf[8..10], [0x00, 0x01]);
        assert_eq!(PortIdentity::deserialize(&buf).unwrap(), pid);
    }
}
