//! PTP network messages.
//!
//! Only the end-to-end message set is implemented: `Sync`, `Follow_Up`,
//! `Delay_Req`, `Delay_Resp` and `Announce`. Peer-to-peer, management,
//! signaling and PTPv1-compatibility messages are out of scope.

mod announce;
mod delay_req;
mod delay_resp;
mod follow_up;
mod header;
mod sync;

pub use announce::AnnounceMessage;
pub use delay_req::DelayReqMessage;
pub use delay_resp::DelayRespMessage;
pub use follow_up::FollowUpMessage;
pub use header::Header;
pub use sync::SyncMessage;

use header::HEADER_LEN;

use crate::datastructures::common::{PortIdentity, WireTimestamp};
use crate::datastructures::datasets::DefaultDS;
use crate::datastructures::WireFormatError;
use crate::error::DecodeError;
use crate::time::Duration;

/// Upper bound on the size of any message this engine encodes or decodes,
/// header plus body plus TLVs.
pub const MAX_MESSAGE_LEN: usize = 256;

/// The `messageType` field. Only the five end-to-end message types are
/// represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum MessageType {
    Sync = 0x0,
    DelayReq = 0x1,
    FollowUp = 0x8,
    DelayResp = 0x9,
    Announce = 0xb,
}

impl MessageType {
    pub fn to_primitive(self) -> u8 {
        self as u8
    }

    pub fn from_primitive(value: u8) -> Result<Self, WireFormatError> {
        match value {
            0x0 => Ok(Self::Sync),
            0x1 => Ok(Self::DelayReq),
            0x8 => Ok(Self::FollowUp),
            0x9 => Ok(Self::DelayResp),
            0xb => Ok(Self::Announce),
            other => Err(DecodeError::UnknownMessageType(other)),
        }
    }

    /// Whether this message type needs a transmit timestamp captured.
    pub fn is_event(self) -> bool {
        matches!(self, Self::Sync | Self::DelayReq)
    }
}

/// A decoded message body.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageBody {
    Sync(SyncMessage),
    FollowUp(FollowUpMessage),
    DelayReq(DelayReqMessage),
    DelayResp(DelayRespMessage),
    Announce(AnnounceMessage),
}

impl MessageBody {
    fn wire_size(&self) -> usize {
        match self {
            MessageBody::Sync(m) => m.wire_size(),
            MessageBody::FollowUp(m) => m.wire_size(),
            MessageBody::DelayReq(m) => m.wire_size(),
            MessageBody::DelayResp(m) => m.wire_size(),
            MessageBody::Announce(m) => m.wire_size(),
        }
    }

    fn message_type(&self) -> MessageType {
        match self {
            MessageBody::Sync(_) => MessageType::Sync,
            MessageBody::FollowUp(_) => MessageType::FollowUp,
            MessageBody::DelayReq(_) => MessageType::DelayReq,
            MessageBody::DelayResp(_) => MessageType::DelayResp,
            MessageBody::Announce(_) => MessageType::Announce,
        }
    }

    fn serialize(&self, buffer: &mut [u8]) -> Result<(), WireFormatError> {
        match self {
            MessageBody::Sync(m) => m.serialize(buffer),
            MessageBody::FollowUp(m) => m.serialize(buffer),
            MessageBody::DelayReq(m) => m.serialize(buffer),
            MessageBody::DelayResp(m) => m.serialize(buffer),
            MessageBody::Announce(m) => m.serialize(buffer),
        }
    }

    fn deserialize(message_type: MessageType, buffer: &[u8]) -> Result<Self, WireFormatError> {
        Ok(match message_type {
            MessageType::Sync => MessageBody::Sync(SyncMessage::deserialize(buffer)?),
            MessageType::FollowUp => MessageBody::FollowUp(FollowUpMessage::deserialize(buffer)?),
            MessageType::DelayReq => MessageBody::DelayReq(DelayReqMessage::deserialize(buffer)?),
            MessageType::DelayResp => MessageBody::DelayResp(DelayRespMessage::deserialize(buffer)?),
            MessageType::Announce => MessageBody::Announce(AnnounceMessage::deserialize(buffer)?),
        })
    }
}

/// A full PTP message: header plus body. TLVs trailing an `Announce` are
/// not retained (path-trace/alternate-time TLVs are out of scope), but are
/// skipped correctly during decode rather than causing an error.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub header: Header,
    pub body: MessageBody,
}

impl Message {
    pub fn message_type(&self) -> MessageType {
        self.body.message_type()
    }

    pub fn is_event(&self) -> bool {
        self.message_type().is_event()
    }

    fn base_header(default_ds: &DefaultDS, port_identity: PortIdentity, sequence_id: u16) -> Header {
        Header {
            domain_number: default_ds.domain_number,
            source_port_identity: port_identity,
            sequence_id,
            ..Default::default()
        }
    }

    pub fn sync(default_ds: &DefaultDS, port_identity: PortIdentity, sequence_id: u16) -> Self {
        Message {
            header: Header {
                two_step_flag: true,
                ..Self::base_header(default_ds, port_identity, sequence_id)
            },
            body: MessageBody::Sync(SyncMessage {
                origin_timestamp: WireTimestamp::default(),
            }),
        }
    }

    pub fn follow_up(
        default_ds: &DefaultDS,
        port_identity: PortIdentity,
        sequence_id: u16,
        precise_origin_timestamp: WireTimestamp,
    ) -> Self {
        Message {
            header: Self::base_header(default_ds, port_identity, sequence_id),
            body: MessageBody::FollowUp(FollowUpMessage {
                precise_origin_timestamp,
            }),
        }
    }

    pub fn delay_req(default_ds: &DefaultDS, port_identity: PortIdentity, sequence_id: u16) -> Self {
        Message {
            header: Header {
                log_message_interval: 0x7f,
                ..Self::base_header(default_ds, port_identity, sequence_id)
            },
            body: MessageBody::DelayReq(DelayReqMessage {
                origin_timestamp: WireTimestamp::default(),
            }),
        }
    }

    pub fn delay_resp(
        request_header: &Header,
        port_identity: PortIdentity,
        min_delay_req_interval: i8,
        receive_timestamp: WireTimestamp,
    ) -> Self {
        let header = Header {
            two_step_flag: false,
            source_port_identity: port_identity,
            log_message_interval: min_delay_req_interval,
            ..*request_header
        };

        Message {
            header,
            body: MessageBody::DelayResp(DelayRespMessage {
                receive_timestamp,
                requesting_port_identity: request_header.source_port_identity,
            }),
        }
    }

    pub fn announce(
        default_ds: &DefaultDS,
        time_properties_ds: &crate::datastructures::datasets::TimePropertiesDS,
        parent_ds: &crate::datastructures::datasets::ParentDS,
        steps_removed: u16,
        port_identity: PortIdentity,
        sequence_id: u16,
    ) -> Self {
        let header = Header {
            leap59: time_properties_ds.leap59,
            leap61: time_properties_ds.leap61,
            current_utc_offset_valid: time_properties_ds.current_utc_offset_valid,
            ptp_timescale: time_properties_ds.ptp_timescale,
            time_traceable: time_properties_ds.time_traceable,
            frequency_traceable: time_properties_ds.frequency_traceable,
            ..Self::base_header(default_ds, port_identity, sequence_id)
        };

        Message {
            header,
            body: MessageBody::Announce(AnnounceMessage {
                origin_timestamp: WireTimestamp::default(),
                current_utc_offset: time_properties_ds.current_utc_offset,
                grandmaster_priority_1: parent_ds.grandmaster_priority_1,
                grandmaster_clock_quality: parent_ds.grandmaster_clock_quality,
                grandmaster_priority_2: parent_ds.grandmaster_priority_2,
                grandmaster_identity: parent_ds.grandmaster_identity,
                steps_removed,
                time_source: time_properties_ds.time_source,
            }),
        }
    }

    pub fn wire_size(&self) -> usize {
        HEADER_LEN + self.body.wire_size()
    }

    pub fn serialize(&self, buffer: &mut [u8]) -> Result<usize, WireFormatError> {
        let total = self.wire_size();
        if buffer.len() < total {
            return Err(DecodeError::BufferTooShort);
        }
        let (header_buf, body_buf) = buffer.split_at_mut(HEADER_LEN);
        self.header
            .serialize_header(self.message_type(), total, header_buf)?;
        self.body.serialize(&mut body_buf[..self.body.wire_size()])?;
        Ok(total)
    }

    pub fn deserialize(buffer: &[u8]) -> Result<Self, WireFormatError> {
        let (message_type, message_length, header) = Header::deserialize_header(buffer)?;
        if message_length < HEADER_LEN {
            return Err(DecodeError::LengthMismatch);
        }
        let body_buf = buffer
            .get(HEADER_LEN..message_length)
            .ok_or(DecodeError::BufferTooShort)?;
        let body = MessageBody::deserialize(message_type, body_buf)?;
        Ok(Message { header, body })
    }

    /// `correctionField` expressed as a [`Duration`], including any
    /// accumulated residence-time correction from transparent clocks.
    pub fn correction(&self) -> Duration {
        Duration::from_nanos(self.header.correction_field.to_nanos_f64() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datastructures::common::{ClockIdentity, ClockQuality, PortIdentity};
    use crate::datastructures::datasets::{ParentDS, TimePropertiesDS};

    fn default_ds() -> DefaultDS {
        DefaultDS {
            clock_identity: ClockIdentity([1, 2, 3, 4, 5, 6, 7, 8]),
            number_ports: 1,
            clock_quality: ClockQuality::default(),
            priority_1: 128,
            priority_2: 128,
            domain_number: 0,
            slave_only: false,
        }
    }

    fn port_identity() -> PortIdentity {
        PortIdentity {
            clock_identity: ClockIdentity([1, 2, 3, 4, 5, 6, 7, 8]),
            port_number: 1,
        }
    }

    #[test]
    fn sync_roundtrip() {
        let msg = Message::sync(&default_ds(), port_identity(), 42);
        let mut buf = [0u8; MAX_MESSAGE_LEN];
        let len = msg.serialize(&mut buf).unwrap();
        let decoded = Message::deserialize(&buf[..len]).unwrap();
        assert_eq!(decoded, msg);
        assert!(decoded.is_event());
    }

    #[test]
    fn announce_roundtrip() {
        let ds = default_ds();
        let tp = TimePropertiesDS::new_arbitrary(
            false,
            false,
            crate::datastructures::common::TimeSource::InternalOscillator,
        );
        let parent = ParentDS::new_self(&ds);
        let msg = Message::announce(&ds, &tp, &parent, 0, port_identity(), 7);
        let mut buf = [0u8; MAX_MESSAGE_LEN];
        let len = msg.serialize(&mut buf).unwrap();
        let decoded = Message::deserialize(&buf[..len]).unwrap();
        assert_eq!(decoded, msg);
        assert!(!decoded.is_event());
    }

    #[test]
    fn unknown_message_type_is_rejected() {
        let mut buf = [0u8; HEADER_LEN];
        buf[1] = 0x02; // version
        buf[0] = 0x0f; // reserved/unused message type nibble
        buf[2..4].copy_from_slice(&(HEADER_LEN as u16).to_be_bytes());
        let err = Message::deserialize(&buf).unwrap_err();
        assert_eq!(err, DecodeError::UnknownMessageType(0x0f));
    }
}
