//! The foreign master dataset, *IEEE1588-2019 section 9.3.2*.

use arrayvec::ArrayVec;

use crate::datastructures::common::PortIdentity;
use crate::datastructures::messages::{AnnounceMessage, Header};
use crate::time::{Duration, TimeInterval};

/// Window, in multiples of the announce interval, over which announce
/// messages are kept to judge whether a foreign master is qualified.
const FOREIGN_MASTER_TIME_WINDOW: u16 = 4;

/// Minimum number of announce messages within that window for a foreign
/// master to qualify as a BMCA candidate.
const FOREIGN_MASTER_THRESHOLD: usize = 2;

/// Capacity of the per-master announce history.
const MAX_ANNOUNCE_MESSAGES: usize = 8;

/// Capacity of the foreign master table itself.
const MAX_FOREIGN_MASTERS: usize = 8;

#[derive(Debug)]
struct AgedAnnounce {
    header: Header,
    message: AnnounceMessage,
    age: Duration,
}

#[derive(Debug)]
struct ForeignMaster {
    port_identity: PortIdentity,
    announces: ArrayVec<AgedAnnounce, MAX_ANNOUNCE_MESSAGES>,
}

impl ForeignMaster {
    fn new(header: Header, message: AnnounceMessage) -> Self {
        let mut announces = ArrayVec::new();
        announces.push(AgedAnnounce {
            header,
            message,
            age: Duration::ZERO,
        });
        Self {
            port_identity: header.source_port_identity,
            announces,
        }
    }

    /// Drops announces outside the time window, returning whether the
    /// master now has none left.
    fn purge_old(&mut self, cutoff: Duration) -> bool {
        self.announces.retain(|a| a.age < cutoff);
        self.announces.is_empty()
    }

    fn register(&mut self, header: Header, message: AnnounceMessage, cutoff: Duration, age: Duration) {
        self.purge_old(cutoff);
        let entry = AgedAnnounce { header, message, age };
        if self.announces.try_push(entry).is_err() {
            // Full: evict the oldest entry (largest age) to make room for the
            // newest one, rather than silently discarding it.
            let oldest = self
                .announces
                .iter()
                .enumerate()
                .max_by_key(|(_, a)| a.age)
                .map(|(i, _)| i)
                .expect("array just failed to push, so it is non-empty");
            self.announces.remove(oldest);
            self.announces.push(entry);
        }
    }

    fn step_age(&mut self, step: Duration, cutoff: Duration) -> bool {
        for a in &mut self.announces {
            a.age = a.age + step;
        }
        self.purge_old(cutoff)
    }
}

/// Tracks announce traffic from every other master this port hears, and
/// surfaces the subset eligible to take part in the best master clock
/// algorithm.
#[derive(Debug)]
pub struct ForeignMasterList {
    masters: ArrayVec<ForeignMaster, MAX_FOREIGN_MASTERS>,
    announce_interval: TimeInterval,
    own_port_identity: PortIdentity,
}

impl ForeignMasterList {
    pub fn new(announce_interval: TimeInterval, own_port_identity: PortIdentity) -> Self {
        Self {
            masters: ArrayVec::new(),
            announce_interval,
            own_port_identity,
        }
    }

    fn cutoff(&self) -> Duration {
        Duration::from(self.announce_interval) * FOREIGN_MASTER_TIME_WINDOW as i64
    }

    /// Advances every tracked announce's age, dropping masters that have
    /// aged out entirely. Call once per tick with the elapsed time.
    pub fn step_age(&mut self, step: Duration) {
        let cutoff = self.cutoff();
        let mut i = self.masters.len();
        while i > 0 {
            i -= 1;
            if self.masters[i].step_age(step, cutoff) {
                self.masters.remove(i);
            }
        }
    }

    /// Records a freshly received announce message, if it is qualified to
    /// be tracked at all (see [`Self::is_qualified`]).
    pub fn register(&mut self, header: &Header, message: &AnnounceMessage, age: Duration) {
        if !self.is_qualified(header, message) {
            return;
        }

        let cutoff = self.cutoff();
        if let Some(master) = self.find_mut(header.source_port_identity) {
            master.register(*header, *message, cutoff, age);
            return;
        }

        if self.masters.len() == MAX_FOREIGN_MASTERS {
            // Evict the master whose most recent announce is oldest, so a
            // genuinely new master is never silently dropped on a full table.
            if let Some(victim) = self
                .masters
                .iter()
                .enumerate()
                .min_by_key(|(_, m)| m.announces.last().map(|a| a.age).unwrap_or(Duration::ZERO))
                .map(|(i, _)| i)
            {
                self.masters.remove(victim);
            }
        }
        self.masters.push(ForeignMaster::new(*header, *message));
    }

    /// Consumes and returns the most recent qualified announce of every
    /// foreign master that currently meets [`FOREIGN_MASTER_THRESHOLD`].
    pub fn take_qualified_announces(&mut self) -> impl Iterator<Item = (Header, AnnounceMessage)> {
        let mut qualified = ArrayVec::<_, MAX_FOREIGN_MASTERS>::new();

        let mut i = self.masters.len();
        while i > 0 {
            i -= 1;
            if self.masters[i].announces.len() >= FOREIGN_MASTER_THRESHOLD {
                let last = self.masters[i].announces.len() - 1;
                let entry = self.masters[i].announces.remove(last);
                qualified.push((entry.header, entry.message));
            }
        }

        qualified.into_iter()
    }

    fn find_mut(&mut self, port_identity: PortIdentity) -> Option<&mut ForeignMaster> {
        self.masters
            .iter_mut()
            .find(|m| m.port_identity == port_identity)
    }

    fn find(&self, port_identity: PortIdentity) -> Option<&ForeignMaster> {
        self.masters.iter().find(|m| m.port_identity == port_identity)
    }

    fn is_qualified(&self, header: &Header, message: &AnnounceMessage) -> bool {
        let source = header.source_port_identity;

        if source.clock_identity == self.own_port_identity.clock_identity {
            return false;
        }

        if let Some(master) = self.find(source) {
            if let Some(last) = master.announces.last() {
                let delta = header.sequence_id.wrapping_sub(last.header.sequence_id);
                if delta >= u16::MAX / 2 {
                    return false;
                }
            }
        }

        message.steps_removed < 255
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datastructures::common::{ClockIdentity, ClockQuality, TimeSource, WireTimestamp};

    fn identity(byte: u8) -> PortIdentity {
        PortIdentity {
            clock_identity: ClockIdentity([byte; 8]),
            port_number: 1,
        }
    }

    fn header(source: PortIdentity, sequence_id: u16) -> Header {
        Header {
            source_port_identity: source,
            sequence_id,
            ..Header::default()
        }
    }

    fn announce(steps_removed: u16) -> AnnounceMessage {
        AnnounceMessage {
            origin_timestamp: WireTimestamp::default(),
            current_utc_offset: 37,
            grandmaster_priority_1: 128,
            grandmaster_clock_quality: ClockQuality::default(),
            grandmaster_priority_2: 128,
            grandmaster_identity: ClockIdentity([0xff; 8]),
            steps_removed,
            time_source: TimeSource::InternalOscillator,
        }
    }

    fn one_second_interval() -> TimeInterval {
        TimeInterval::from(Duration::from_nanos(1_000_000_000))
    }

    #[test]
    fn qualifies_only_after_threshold_met() {
        let mut list = ForeignMasterList::new(one_second_interval(), identity(0));
        let source = identity(1);

        list.register(&header(source, 1), &announce(0), Duration::ZERO);
        assert_eq!(list.take_qualified_announces().count(), 0);

        list.register(&header(source, 2), &announce(0), Duration::ZERO);
        assert_eq!(list.take_qualified_announces().count(), 1);
    }

    #[test]
    fn own_clock_is_never_tracked() {
        let own = identity(9);
        let mut list = ForeignMasterList::new(one_second_interval(), own);
        list.register(&header(own, 1), &announce(0), Duration::ZERO);
        list.register(&header(own, 2), &announce(0), Duration::ZERO);
        assert_eq!(list.take_qualified_announces().count(), 0);
    }

    #[test]
    fn overflow_evicts_instead_of_dropping_new_master() {
        let mut list = ForeignMasterList::new(one_second_interval(), identity(0));

        for i in 1..=MAX_FOREIGN_MASTERS {
            let source = identity(i as u8);
            list.register(&header(source, 1), &announce(0), Duration::from_millis(i as i64));
            list.register(&header(source, 2), &announce(0), Duration::from_millis(i as i64));
        }
        assert_eq!(list.masters.len(), MAX_FOREIGN_MASTERS);

        let newcomer = identity(200);
        list.register(&header(newcomer, 1), &announce(0), Duration::ZERO);
        list.register(&header(newcomer, 2), &announce(0), Duration::ZERO);

        assert!(list.find(newcomer).is_some());
        assert_eq!(list.masters.len(), MAX_FOREIGN_MASTERS);
    }
}
