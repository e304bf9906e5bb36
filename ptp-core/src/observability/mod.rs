//! Read-only telemetry: counters plus the last-offset/last-selection/servo
//! substate values an integrator polls. Every accessor returns an atomic
//! value copy, never a reference into live engine state, so a host can read
//! telemetry from outside the tick loop without synchronization.

use arrayvec::ArrayVec;

use crate::datastructures::common::PortIdentity;
use crate::port::PortState;
use crate::servo::ServoState;
use crate::time::Duration;

/// Upper bound on the number of ports a single telemetry snapshot can
/// describe, matching [`crate::instance::MAX_PORTS`].
pub const MAX_PORTS: usize = 8;

/// Monotonically increasing event counts, never reset by the engine.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counters {
    pub announces_rx: u64,
    pub syncs_rx: u64,
    pub bmca_selections: u64,
    pub bmca_passive_wins: u64,
    pub offsets_computed: u64,
    pub parse_errors: u64,
    pub holdover_entries: u64,
}

impl Counters {
    pub fn record_announce_rx(&mut self) {
        self.announces_rx += 1;
    }

    pub fn record_sync_rx(&mut self) {
        self.syncs_rx += 1;
    }

    pub fn record_bmca_selection(&mut self, decision: crate::bmc::StateDecision) {
        self.bmca_selections += 1;
        if decision == crate::bmc::StateDecision::Passive {
            self.bmca_passive_wins += 1;
        }
    }

    pub fn record_offset_computed(&mut self) {
        self.offsets_computed += 1;
    }

    pub fn record_parse_error(&mut self) {
        self.parse_errors += 1;
    }

    pub fn record_holdover_entry(&mut self) {
        self.holdover_entries += 1;
    }
}

/// An atomic copy of everything a host might want to log, export as a
/// metric, or display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub counters: Counters,
    pub last_offset_from_master: Option<Duration>,
    pub last_selection: Option<PortIdentity>,
    pub servo_state: ServoState,
    pub port_states: ArrayVec<PortState, MAX_PORTS>,
}
