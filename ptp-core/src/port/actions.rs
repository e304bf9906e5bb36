//! Correlates a pending transmit timestamp with the message that produced
//! it.
//!
//! [`Port`](super::Port) never touches the HAL directly: it hands
//! [`PtpInstance::tick`](crate::instance::PtpInstance::tick) a `Message` to
//! send plus a `TimestampContext`, and later receives the egress
//! [`Instant`](crate::time::Instant) back through
//! [`Port::handle_send_timestamp`](super::Port::handle_send_timestamp) once
//! the HAL's [`SendHandle`](crate::hal::SendHandle) resolves to one.

/// Identifies a message a [`Port`](super::Port) just asked the caller to
/// send, so that once its transmit timestamp is known it can be handed
/// back via [`Port::handle_send_timestamp`](super::Port::handle_send_timestamp).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampContext {
    Sync { sequence_id: u16 },
    DelayReq { sequence_id: u16 },
}
