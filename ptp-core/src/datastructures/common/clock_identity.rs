use crate::datastructures::{WireFormat, WireFormatError};

/// The identity of a PTP node.
///
/// All PTP clocks in a network need a unique clock identity. A common
/// approach is to use the MAC address of the device to generate a unique
/// identifier, see [`from_mac_address`](Self::from_mac_address).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, PartialOrd, Ord, Hash)]
pub struct ClockIdentity(pub [u8; 8]);

impl ClockIdentity {
    /// Create a [`ClockIdentity`] from a MAC address, filling the first six
    /// bytes and zeroing the rest.
    pub fn from_mac_address(addr: [u8; 6]) -> Self {
        let mut this = Self([0; 8]);
        this.0[0..6].copy_from_slice(&addr);
        this
    }
}

impl WireFormat for ClockIdentity {
    fn wire_size(&self) -> usize {
        8
    }

    fn serialize(&self, buffer: &mut [u8]) -> Result<(), WireFormatError> {
        let buffer = buffer.get_mut(0..8).ok_or(WireFormatError::BufferTooShort)?;
        buffer.copy_from_slice(&self.0);
        Ok(())
    }

    fn deserialize(buffer: &[u8]) -> Result<Self, WireFormatError> {
        let bytes = buffer.get(0..8).ok_or(WireFormatError::BufferTooShort)?;
        Ok(Self(bytes.try_into().unwrap()))
    }
}

impl core::fmt::Display for ClockIdentity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, val) in self.0.iter().enumerate() {
            if i != 0 {
                write!(f, ":")?;
            }
            write!(f, "{val:02x}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_identity_wireformat() {
        let id = ClockIdentity([0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]);
        let mut buf = [0u8; 8];
        id.serialize(&mut buf).unwrap();
        assert_eq!(buf, [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]);
        assert_eq!(ClockIdentity::deserialize(&buf).unwrap(), id);
    }

    #[test]
    fn from_mac() {
        let id = ClockIdentity::from_mac_address([1, 2, 3, 4, 5, 6]);
        assert_eq!(id, ClockIdentity([1, 2, 3, 4, 5, 6, 0, 0]));
    }
}
