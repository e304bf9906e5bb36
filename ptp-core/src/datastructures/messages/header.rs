use crate::datastructures::common::PortIdentity;
use crate::datastructures::WireFormatError;
use crate::time::TimeInterval;

use super::MessageType;

pub(super) const HEADER_LEN: usize = 34;
const PTP_VERSION: u8 = 0x02;

/// The common 34-byte header prefixed to every PTP message.
/// See *IEEE1588-2019 section 13.3*.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    pub domain_number: u8,
    pub source_port_identity: PortIdentity,
    pub sequence_id: u16,
    pub two_step_flag: bool,
    pub leap59: bool,
    pub leap61: bool,
    pub current_utc_offset_valid: bool,
    pub ptp_timescale: bool,
    pub time_traceable: bool,
    pub frequency_traceable: bool,
    pub correction_field: TimeInterval,
    pub log_message_interval: i8,
}

impl Header {
    pub(super) fn control_field(message_type: MessageType) -> u8 {
        match message_type {
            MessageType::Sync => 0,
            MessageType::DelayReq => 1,
            MessageType::FollowUp => 2,
            MessageType::DelayResp => 3,
            MessageType::Announce => 5,
        }
    }

    pub(super) fn serialize_header(
        &self,
        message_type: MessageType,
        message_length: usize,
        buffer: &mut [u8],
    ) -> Result<(), WireFormatError> {
        let buffer = buffer
            .get_mut(0..HEADER_LEN)
            .ok_or(WireFormatError::BufferTooShort)?;

        buffer[0] = message_type.to_primitive();
        buffer[1] = PTP_VERSION;
        buffer[2..4].copy_from_slice(&(message_length as u16).to_be_bytes());
        buffer[4] = self.domain_number;
        buffer[5] = 0;

        let mut flags = [0u8; 2];
        if self.two_step_flag {
            flags[0] |= 0b0000_0010;
        }
        if self.leap61 {
            flags[1] |= 0b0000_0001;
        }
        if self.leap59 {
            flags[1] |= 0b0000_0010;
        }
        if self.current_utc_offset_valid {
            flags[1] |= 0b0000_0100;
        }
        if self.ptp_timescale {
            flags[1] |= 0b0000_1000;
        }
        if self.time_traceable {
            flags[1] |= 0b0001_0000;
        }
        if self.frequency_traceable {
            flags[1] |= 0b0010_0000;
        }
        buffer[6..8].copy_from_slice(&flags);

        self.correction_field.serialize(&mut buffer[8..16])?;
        buffer[16..20].fill(0);
        self.source_port_identity.serialize(&mut buffer[20..30])?;
        buffer[30..32].copy_from_slice(&self.sequence_id.to_be_bytes());
        buffer[32] = Self::control_field(message_type);
        buffer[33] = self.log_message_interval as u8;

        Ok(())
    }

    pub(super) fn deserialize_header(
        buffer: &[u8],
    ) -> Result<(MessageType, usize, Self), WireFormatError> {
        use crate::datastructures::common::WireFormat;

        let buffer = buffer.get(0..HEADER_LEN).ok_or(WireFormatError::BufferTooShort)?;

        let message_type = MessageType::from_primitive(buffer[0] & 0x0f)?;
        let message_length = u16::from_be_bytes(buffer[2..4].try_into().unwrap()) as usize;
        let domain_number = buffer[4];
        let flags = &buffer[6..8];

        let two_step_flag = flags[0] & 0b0000_0010 != 0;
        let leap61 = flags[1] & 0b0000_0001 != 0;
        let leap59 = flags[1] & 0b0000_0010 != 0;
        let current_utc_offset_valid = flags[1] & 0b0000_0100 != 0;
        let ptp_timescale = flags[1] & 0b0000_1000 != 0;
        let time_traceable = flags[1] & 0b0001_0000 != 0;
        let frequency_traceable = flags[1] & 0b0010_0000 != 0;

        let correction_field = TimeInterval::deserialize(&buffer[8..16])?;
        let source_port_identity = PortIdentity::deserialize(&buffer[20..30])?;
        let sequence_id = u16::from_be_bytes(buffer[30..32].try_into().unwrap());
        let log_message_interval = buffer[33] as i8;

        Ok((
            message_type,
            message_length,
            Self {
                domain_number,
                source_port_identity,
                sequence_id,
                two_step_flag,
                leap59,
                leap61,
                current_utc_offset_valid,
                ptp_timescale,
                time_traceable,
                frequency_traceable,
                correction_field,
                log_message_interval,
            },
        ))
    }

    pub(super) fn wire_size() -> usize {
        HEADER_LEN
    }
}
