//! Hardware/host abstraction layer: the capability interfaces a host injects
//! so the engine never touches a socket, a clock device or a timer queue
//! directly. Every method here is non-blocking — the engine drives all of
//! them from inside [`PtpInstance::tick`](crate::instance::PtpInstance::tick).

use crate::datastructures::common::ClockQuality;
use crate::datastructures::messages::MAX_MESSAGE_LEN;
use crate::time::{Duration, Instant};

/// A received datagram, copied into a fixed-capacity buffer sized for the
/// largest message this engine decodes.
pub type RawMessage = arrayvec::ArrayVec<u8, MAX_MESSAGE_LEN>;

/// Which multicast/class of destination a message should be sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationClass {
    /// The time-critical event multicast group (Sync, Delay_Req).
    Event,
    /// The general multicast group (Announce, Follow_Up, Delay_Resp).
    General,
}

/// An opaque handle correlating a send with its later transmit timestamp,
/// returned by [`Network::send`] and passed back to
/// [`Network::take_tx_timestamp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SendHandle(pub u32);

/// Injected network transport for a single port.
pub trait Network {
    /// Enqueue `data` for transmission on the given destination class.
    /// Returns a [`SendHandle`] when the message is one that needs a
    /// transmit timestamp (event class); implementations may return `None`
    /// for general-class sends.
    fn send(&mut self, data: &[u8], class: DestinationClass) -> Option<SendHandle>;

    /// Pull the next received datagram, if any, with its receive timestamp.
    fn try_recv(&mut self) -> Option<(Instant, RawMessage)>;

    /// Retrieve the transmit timestamp for a previously returned
    /// [`SendHandle`], if the hardware has captured it yet.
    fn take_tx_timestamp(&mut self, handle: SendHandle) -> Option<Instant>;

    /// Maximum datagram size this transport can send/receive.
    fn mtu(&self) -> usize;
}

/// Injected clock: the single oscillator an instance disciplines.
pub trait Clock {
    /// Current reading of this clock.
    fn now(&self) -> Instant;

    /// The clock's own accuracy/class, reported in `defaultDS`.
    fn quality(&self) -> ClockQuality;

    /// Apply a frequency correction, in parts-per-billion. `0` means "run at
    /// nominal rate". Returns `false` if `ppb` exceeds
    /// [`frequency_bound`](Self::frequency_bound) and was clamped/rejected.
    fn adjust_frequency(&mut self, ppb: f64) -> bool;

    /// Immediately offset the clock's reading by `delta` (a phase step).
    fn step_phase(&mut self, delta: Duration);

    /// Largest frequency correction, in parts-per-billion, this clock can
    /// apply in either direction.
    fn frequency_bound(&self) -> f64;
}

/// A single armed deadline, identified by which port and timer it belongs
/// to so the host can route [`TimerEvent`]s without the engine needing to
/// know about wall-clock time itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerEvent {
    pub port: usize,
    pub kind: TimerKind,
}

/// Which per-port timer fired or needs arming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    Announce,
    AnnounceReceipt,
    Sync,
    DelayRequest,
    Qualification,
}

/// Injected timer queue.
pub trait Timer {
    /// Arm (or re-arm) `event` to fire `duration` from now.
    fn arm(&mut self, event: TimerEvent, duration: core::time::Duration);

    /// Cancel a previously armed timer, if it has not already fired.
    fn cancel(&mut self, event: TimerEvent);

    /// Drain timers that have reached their deadline.
    fn poll_expired(&mut self) -> Option<TimerEvent>;
}
