//! A software-disciplined clock used in place of a hardware oscillator.
//!
//! This host has no privileged access to the system clock, so instead of
//! steering `CLOCK_REALTIME` the way the teacher's `LinuxClock` steers a
//! hardware PHC, [`SystemClock`] tracks its own phase/frequency state on top
//! of the process's monotonic clock. Two independent `SystemClock`s, each
//! fed to a [`PtpInstance`](ptp_core::PtpInstance) wired over a
//! [`LoopbackNetwork`](crate::network::LoopbackNetwork), behave exactly like
//! two unsynchronized oscillators for the purposes of the servo and BMCA.

use std::time::Instant as StdInstant;

use ptp_core::datastructures::common::{ClockAccuracy, ClockQuality};
use ptp_core::hal::Clock;
use ptp_core::time::{Duration, Instant};

/// Largest frequency correction this software clock accepts, in
/// parts-per-billion.
const FREQUENCY_BOUND_PPB: f64 = 100_000.0;

pub struct SystemClock {
    anchor_std: StdInstant,
    anchor_nanos: i64,
    freq_ppb: f64,
    quality: ClockQuality,
}

impl SystemClock {
    /// Builds a clock starting `initial_offset` away from the wall clock, so
    /// a demo can start two instances visibly out of sync.
    pub fn new(initial_offset: Duration) -> Self {
        Self {
            anchor_std: StdInstant::now(),
            anchor_nanos: wall_clock_now().nanos() + initial_offset.nanos(),
            freq_ppb: 0.0,
            quality: ClockQuality {
                clock_class: 248,
                clock_accuracy: ClockAccuracy::Unknown,
                offset_scaled_log_variance: 0xffff,
            },
        }
    }

    /// Re-anchors to the clock's current reading, so a rate or phase change
    /// takes effect from now rather than retroactively.
    fn reanchor(&mut self) {
        let now = self.now();
        self.anchor_std = StdInstant::now();
        self.anchor_nanos = now.nanos();
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        let elapsed_nanos = self.anchor_std.elapsed().as_nanos() as f64;
        let steered_nanos = (elapsed_nanos * (1.0 + self.freq_ppb * 1e-9)) as i64;
        Instant::from_nanos(self.anchor_nanos + steered_nanos)
    }

    fn quality(&self) -> ClockQuality {
        self.quality
    }

    fn adjust_frequency(&mut self, ppb: f64) -> bool {
        if ppb.abs() > FREQUENCY_BOUND_PPB {
            return false;
        }
        self.reanchor();
        self.freq_ppb = ppb;
        true
    }

    fn step_phase(&mut self, delta: Duration) {
        self.reanchor();
        self.anchor_nanos += delta.nanos();
    }

    fn frequency_bound(&self) -> f64 {
        FREQUENCY_BOUND_PPB
    }
}

/// The host's one notion of "real" time, used to timestamp loopback
/// datagrams and to anchor freshly-built [`SystemClock`]s. Independent of
/// any individual instance's disciplined `now()`.
pub fn wall_clock_now() -> Instant {
    let since_epoch = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    Instant::from_nanos(since_epoch.as_nanos() as i64)
}

/// A deadline queue backed by the process's monotonic clock.
pub struct MonotonicTimer {
    armed: Vec<(ptp_core::hal::TimerEvent, StdInstant)>,
}

impl MonotonicTimer {
    pub fn new() -> Self {
        Self { armed: Vec::new() }
    }
}

impl Default for MonotonicTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl ptp_core::hal::Timer for MonotonicTimer {
    fn arm(&mut self, event: ptp_core::hal::TimerEvent, duration: core::time::Duration) {
        self.armed.retain(|(e, _)| *e != event);
        self.armed.push((event, StdInstant::now() + duration));
    }

    fn cancel(&mut self, event: ptp_core::hal::TimerEvent) {
        self.armed.retain(|(e, _)| *e != event);
    }

    fn poll_expired(&mut self) -> Option<ptp_core::hal::TimerEvent> {
        let now = StdInstant::now();
        let index = self.armed.iter().position(|(_, deadline)| *deadline <= now)?;
        Some(self.armed.remove(index).0)
    }
}
