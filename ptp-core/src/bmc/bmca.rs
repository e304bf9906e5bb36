//! The best master clock algorithm: selecting the best foreign candidate
//! and deciding this port's recommended state from it.

use crate::datastructures::common::PortIdentity;
use crate::datastructures::datasets::DefaultDS;
use crate::datastructures::messages::{AnnounceMessage, Header};

use super::dataset_comparison::{ComparisonDataset, DatasetOrdering};

/// Outcome of the state decision procedure for one port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateDecision {
    /// No qualifying candidate yet; stay in (or enter) `LISTENING`.
    Listening,
    /// This clock outranks every foreign candidate.
    Master,
    /// `Ebest` outranks this clock; it becomes the new parent.
    Slave,
    /// This clock ties a distinct foreign candidate of equal rank.
    Passive,
}

/// A pure, stateless best master clock algorithm: no instance state, only
/// functions over a snapshot of the foreign-master data.
pub struct Bmca;

impl Bmca {
    /// Picks `Erbest`, the best-ranked announce among this port's qualified
    /// foreign candidates.
    pub fn best_foreign<'a, I>(own_port_identity: PortIdentity, candidates: I) -> Option<(Header, AnnounceMessage)>
    where
        I: IntoIterator<Item = (Header, AnnounceMessage)>,
    {
        candidates.into_iter().max_by(|(header_a, announce_a), (header_b, announce_b)| {
            let a = ComparisonDataset::from_announce(
                announce_a,
                header_a.source_port_identity.clock_identity,
                own_port_identity,
            );
            let b = ComparisonDataset::from_announce(
                announce_b,
                header_b.source_port_identity.clock_identity,
                own_port_identity,
            );
            a.compare(&b).as_ordering()
        })
    }

    /// Runs the state decision algorithm, comparing `D0` (this clock's own
    /// dataset) with `Ebest` (the best foreign candidate, if any).
    pub fn decide(own_data: &DefaultDS, own_port_identity: PortIdentity, best_foreign: Option<&(Header, AnnounceMessage)>) -> StateDecision {
        let Some((header, announce)) = best_foreign else {
            // No qualified foreign candidate: a clock that can act as master
            // defaults to being its own grandmaster. A slave-only clock has
            // no self-candidate and waits instead.
            return if own_data.slave_only {
                StateDecision::Listening
            } else {
                StateDecision::Master
            };
        };

        // A best candidate that names this clock as grandmaster is this
        // clock's own announcement reflected back, not a real competitor.
        if announce.grandmaster_identity == own_data.clock_identity {
            return StateDecision::Master;
        }

        let d0 = ComparisonDataset::from_own_data(own_data);
        let ebest = ComparisonDataset::from_announce(
            announce,
            header.source_port_identity.clock_identity,
            own_port_identity,
        );

        match d0.compare(&ebest) {
            DatasetOrdering::Better | DatasetOrdering::BetterByTopology => StateDecision::Master,
            DatasetOrdering::Worse | DatasetOrdering::WorseByTopology => StateDecision::Slave,
            DatasetOrdering::Error1 | DatasetOrdering::Error2 => StateDecision::Passive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InstanceConfig;
    use crate::datastructures::common::{ClockAccuracy, ClockIdentity, ClockQuality, TimeSource, WireTimestamp};

    fn own_data(priority_1: u8, clock_identity: ClockIdentity) -> DefaultDS {
        DefaultDS::new(
            InstanceConfig {
                clock_identity,
                clock_quality: ClockQuality {
                    clock_class: 6,
                    clock_accuracy: ClockAccuracy::WithinNs100,
                    offset_scaled_log_variance: 0,
                },
                priority_1,
                priority_2: 128,
                domain_number: 0,
                slave_only: false,
            },
            1,
        )
    }

    fn port_identity(byte: u8) -> PortIdentity {
        PortIdentity {
            clock_identity: ClockIdentity([byte; 8]),
            port_number: 1,
        }
    }

    fn announce_from(identity: ClockIdentity, priority_1: u8) -> (Header, AnnounceMessage) {
        let header = Header {
            source_port_identity: PortIdentity {
                clock_identity: identity,
                port_number: 1,
            },
            ..Header::default()
        };
        let announce = AnnounceMessage {
            origin_timestamp: WireTimestamp::default(),
            current_utc_offset: 37,
            grandmaster_priority_1: priority_1,
            grandmaster_clock_quality: ClockQuality {
                clock_class: 6,
                clock_accuracy: ClockAccuracy::WithinNs100,
                offset_scaled_log_variance: 0,
            },
            grandmaster_priority_2: 128,
            grandmaster_identity: identity,
            steps_removed: 0,
            time_source: TimeSource::Gnss,
        };
        (header, announce)
    }

    #[test]
    fn no_candidates_yields_master_for_a_self_capable_clock() {
        let own = own_data(128, ClockIdentity([1; 8]));
        assert_eq!(
            Bmca::decide(&own, port_identity(1), None),
            StateDecision::Master
        );
    }

    #[test]
    fn no_candidates_stays_listening_when_slave_only() {
        let mut own = own_data(128, ClockIdentity([1; 8]));
        own.slave_only = true;
        assert_eq!(
            Bmca::decide(&own, port_identity(1), None),
            StateDecision::Listening
        );
    }

    #[test]
    fn better_foreign_yields_slave() {
        let own = own_data(200, ClockIdentity([1; 8]));
        let best = announce_from(ClockIdentity([2; 8]), 10);
        assert_eq!(
            Bmca::decide(&own, port_identity(1), Some(&best)),
            StateDecision::Slave
        );
    }

    #[test]
    fn worse_foreign_yields_master() {
        let own = own_data(10, ClockIdentity([1; 8]));
        let best = announce_from(ClockIdentity([2; 8]), 200);
        assert_eq!(
            Bmca::decide(&own, port_identity(1), Some(&best)),
            StateDecision::Master
        );
    }

    #[test]
    fn self_reflected_announce_yields_master() {
        let identity = ClockIdentity([1; 8]);
        let own = own_data(128, identity);
        let best = announce_from(identity, 128);
        assert_eq!(
            Bmca::decide(&own, port_identity(1), Some(&best)),
            StateDecision::Master
        );
    }

    #[test]
    fn best_foreign_picks_highest_ranked() {
        let worse = announce_from(ClockIdentity([2; 8]), 200);
        let better = announce_from(ClockIdentity([3; 8]), 10);
        let picked = Bmca::best_foreign(port_identity(1), [worse, better]).unwrap();
        assert_eq!(picked.1.grandmaster_identity, ClockIdentity([3; 8]));
    }
}
