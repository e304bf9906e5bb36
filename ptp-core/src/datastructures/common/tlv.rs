use crate::datastructures::{WireFormat, WireFormatError};

/// The `tlvType` field of a TLV. Only a handful of values matter to this
/// engine; everything else is carried opaquely so unknown TLVs can still be
/// skipped correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlvType {
    Management,
    ManagementErrorStatus,
    OrganizationExtension,
    AlternateTimeOffsetIndicator,
    PathTrace,
    AlternateResponsePortTrace,
    Unknown(u16),
}

impl TlvType {
    pub fn to_primitive(self) -> u16 {
        match self {
            Self::Management => 0x0001,
            Self::ManagementErrorStatus => 0x0002,
            Self::OrganizationExtension => 0x0003,
            Self::AlternateTimeOffsetIndicator => 0x0007,
            Self::PathTrace => 0x0008,
            Self::AlternateResponsePortTrace => 0x0009,
            Self::Unknown(v) => v,
        }
    }

    pub fn from_primitive(value: u16) -> Self {
        match value {
            0x0001 => Self::Management,
            0x0002 => Self::ManagementErrorStatus,
            0x0003 => Self::OrganizationExtension,
            0x0007 => Self::AlternateTimeOffsetIndicator,
            0x0008 => Self::PathTrace,
            0x0009 => Self::AlternateResponsePortTrace,
            v => Self::Unknown(v),
        }
    }
}

/// A single TLV extension field, borrowing its value bytes from the
/// decoded message buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv<'a> {
    pub tlv_type: TlvType,
    pub value: &'a [u8],
}

impl<'a> Tlv<'a> {
    /// Wire size including the 4-byte `tlvType`/`lengthField` header.
    pub fn wire_size(&self) -> usize {
        4 + self.value.len()
    }
}

/// Bounds-checked iterator over the TLVs appended to a message body.
#[derive(Debug, Clone)]
pub struct TlvSetIterator<'a> {
    remainder: &'a [u8],
}

impl<'a> TlvSetIterator<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { remainder: buffer }
    }

    pub fn empty() -> Self {
        Self { remainder: &[] }
    }
}

impl<'a> Iterator for TlvSetIterator<'a> {
    type Item = Tlv<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remainder.len() < 4 {
            self.remainder = &[];
            return None;
        }
        let tlv_type = TlvType::from_primitive(u16::from_be_bytes(
            self.remainder[0..2].try_into().unwrap(),
        ));
        let length = u16::from_be_bytes(self.remainder[2..4].try_into().unwrap()) as usize;
        if self.remainder.len() < 4 + length {
            // Truncated trailing TLV: stop yielding rather than panic on a
            // bad slice.
            self.remainder = &[];
            return None;
        }
        let value = &self.remainder[4..4 + length];
        self.remainder = &self.remainder[4 + length..];
        Some(Tlv { tlv_type, value })
    }
}

impl WireFormat for Tlv<'_> {
    fn wire_size(&self) -> usize {
        Tlv::wire_size(self)
    }

    fn serialize(&self, buffer: &mut [u8]) -> Result<(), WireFormatError> {
        let total = self.wire_size();
        let buffer = buffer
            .get_mut(0..total)
            .ok_or(WireFormatError::BufferTooShort)?;
        buffer[0..2].copy_from_slice(&self.tlv_type.to_primitive().to_be_bytes());
        buffer[2..4].copy_from_slice(&(self.value.len() as u16).to_be_bytes());
        buffer[4..total].copy_from_slice(self.value);
        Ok(())
    }

    fn deserialize(buffer: &[u8]) -> Result<Self, WireFormatError> {
        TlvSetIterator::new(buffer)
            .next()
            .ok_or(WireFormatError::TruncatedTlv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iterates_multiple_tlvs() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&0x0008u16.to_be_bytes());
        buf.extend_from_slice(&2u16.to_be_bytes());
        buf.extend_from_slice(&[0xaa, 0xbb]);
        buf.extend_from_slice(&0x0003u16.to_be_bytes());
        buf.extend_from_slice(&0u16.to_be_bytes());

        let tlvs: Vec<_> = TlvSetIterator::new(&buf).collect();
        assert_eq!(tlvs.len(), 2);
        assert_eq!(tlvs[0].tlv_type, TlvType::PathTrace);
        assert_eq!(tlvs[0].value, &[0xaa, 0xbb]);
        assert_eq!(tlvs[1].tlv_type, TlvType::OrganizationExtension);
        assert!(tlvs[1].value.is_empty());
    }

    #[test]
    fn truncated_tlv_stops_iteration_without_panicking() {
        let buf = [0x00, 0x08, 0x00, 0x10, 0xaa];
        assert_eq!(TlvSetIterator::new(&buf).count(), 0);
    }
}
