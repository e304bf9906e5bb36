//! Dataset comparison algorithm, *IEEE1588-2019 section 9.3.4*.

use core::cmp::Ordering;

use crate::datastructures::common::{ClockIdentity, ClockQuality, PortIdentity};
use crate::datastructures::datasets::DefaultDS;
use crate::datastructures::messages::AnnounceMessage;

/// Everything the comparison algorithm needs about one candidate
/// grandmaster, gathered either from a received `Announce` or from this
/// clock's own `defaultDS`.
#[derive(Eq, PartialEq, Default, Debug, Clone, Copy)]
pub struct ComparisonDataset {
    gm_priority_1: u8,
    gm_identity: ClockIdentity,
    gm_clock_quality: ClockQuality,
    gm_priority_2: u8,
    steps_removed: u16,
    identity_of_sender: ClockIdentity,
    identity_of_receiver: PortIdentity,
}

impl ComparisonDataset {
    pub fn from_announce(message: &AnnounceMessage, sender: ClockIdentity, receiver: PortIdentity) -> Self {
        Self {
            gm_priority_1: message.grandmaster_priority_1,
            gm_identity: message.grandmaster_identity,
            gm_clock_quality: message.grandmaster_clock_quality,
            gm_priority_2: message.grandmaster_priority_2,
            steps_removed: message.steps_removed,
            identity_of_sender: sender,
            identity_of_receiver: receiver,
        }
    }

    pub fn from_own_data(default_ds: &DefaultDS) -> Self {
        Self {
            gm_priority_1: default_ds.priority_1,
            gm_identity: default_ds.clock_identity,
            gm_clock_quality: default_ds.clock_quality,
            gm_priority_2: default_ds.priority_2,
            steps_removed: 0,
            identity_of_sender: default_ds.clock_identity,
            identity_of_receiver: PortIdentity {
                clock_identity: default_ds.clock_identity,
                port_number: 0,
            },
        }
    }

    /// Where `self` ranks relative to `other`.
    pub fn compare(&self, other: &Self) -> DatasetOrdering {
        if self.gm_identity == other.gm_identity {
            self.compare_same_identity(other)
        } else {
            self.compare_different_identity(other)
        }
    }

    /// Figure 34: different candidate grandmasters.
    fn compare_different_identity(&self, other: &Self) -> DatasetOrdering {
        let ordering = self
            .gm_priority_1
            .cmp(&other.gm_priority_1)
            .then_with(|| {
                self.gm_clock_quality
                    .clock_class
                    .cmp(&other.gm_clock_quality.clock_class)
            })
            .then_with(|| {
                // The wire encoding runs in the opposite direction of the
                // accuracy itself: a smaller wire value is a more accurate
                // clock, and the algorithm operates on the wire value.
                self.gm_clock_quality
                    .clock_accuracy
                    .to_primitive()
                    .cmp(&other.gm_clock_quality.clock_accuracy.to_primitive())
            })
            .then_with(|| {
                self.gm_clock_quality
                    .offset_scaled_log_variance
                    .cmp(&other.gm_clock_quality.offset_scaled_log_variance)
            })
            .then_with(|| self.gm_priority_2.cmp(&other.gm_priority_2))
            .then_with(|| self.gm_identity.cmp(&other.gm_identity));

        match ordering {
            Ordering::Equal => unreachable!("gm_identity is guaranteed to differ here"),
            Ordering::Less => DatasetOrdering::Better,
            Ordering::Greater => DatasetOrdering::Worse,
        }
    }

    /// Figure 35: same candidate grandmaster, compared by path topology.
    fn compare_same_identity(&self, other: &Self) -> DatasetOrdering {
        let steps_removed_difference = self.steps_removed as i32 - other.steps_removed as i32;

        match steps_removed_difference {
            2..=i32::MAX => DatasetOrdering::Worse,
            i32::MIN..=-2 => DatasetOrdering::Better,
            1 => match self
                .identity_of_receiver
                .clock_identity
                .cmp(&self.identity_of_sender)
            {
                Ordering::Less => DatasetOrdering::Worse,
                Ordering::Equal => DatasetOrdering::Error1,
                Ordering::Greater => DatasetOrdering::WorseByTopology,
            },
            -1 => match other
                .identity_of_receiver
                .clock_identity
                .cmp(&other.identity_of_sender)
            {
                Ordering::Less => DatasetOrdering::Better,
                Ordering::Equal => DatasetOrdering::Error1,
                Ordering::Greater => DatasetOrdering::BetterByTopology,
            },
            0 => {
                let senders = self.identity_of_sender.cmp(&other.identity_of_sender);
                let receivers = self
                    .identity_of_receiver
                    .port_number
                    .cmp(&other.identity_of_receiver.port_number);

                match senders.then(receivers) {
                    Ordering::Less => DatasetOrdering::BetterByTopology,
                    Ordering::Equal => DatasetOrdering::Error2,
                    Ordering::Greater => DatasetOrdering::WorseByTopology,
                }
            }
            _ => unreachable!(),
        }
    }
}

/// Result of comparing two [`ComparisonDataset`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetOrdering {
    /// Strictly better: a different, superior grandmaster.
    Better,
    /// Same grandmaster, preferred for topological reasons.
    BetterByTopology,
    /// Same grandmaster reached through a path that makes the two entries
    /// indistinguishable — a degenerate loop in the announce data.
    Error1,
    /// Same grandmaster, same sender and receiver port — almost certainly
    /// the same announce observed twice.
    Error2,
    /// Same grandmaster, rejected for topological reasons.
    WorseByTopology,
    /// Strictly worse: a different, inferior grandmaster.
    Worse,
}

impl DatasetOrdering {
    pub const fn as_ordering(self) -> Ordering {
        match self {
            DatasetOrdering::Better | DatasetOrdering::BetterByTopology => Ordering::Greater,
            DatasetOrdering::Error1 | DatasetOrdering::Error2 => Ordering::Equal,
            DatasetOrdering::WorseByTopology | DatasetOrdering::Worse => Ordering::Less,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datastructures::common::ClockAccuracy;

    const IDENTITY_A: ClockIdentity = ClockIdentity([1, 1, 1, 1, 1, 1, 1, 1]);
    const IDENTITY_B: ClockIdentity = ClockIdentity([2, 2, 2, 2, 2, 2, 2, 2]);
    const IDENTITY_C: ClockIdentity = ClockIdentity([3, 3, 3, 3, 3, 3, 3, 3]);

    fn pair() -> (ComparisonDataset, ComparisonDataset) {
        Default::default()
    }

    #[test]
    fn figure_34() {
        let (mut a, mut b) = pair();

        a.gm_identity = IDENTITY_A;
        b.gm_identity = IDENTITY_B;
        assert_eq!(a.compare(&b), DatasetOrdering::Better);
        assert_eq!(b.compare(&a), DatasetOrdering::Worse);

        a.gm_priority_2 = 1;
        b.gm_priority_2 = 0;
        assert_eq!(a.compare(&b), DatasetOrdering::Worse);
        assert_eq!(b.compare(&a), DatasetOrdering::Better);

        a.gm_clock_quality.offset_scaled_log_variance = 0;
        b.gm_clock_quality.offset_scaled_log_variance = 1;
        assert_eq!(a.compare(&b), DatasetOrdering::Better);
        assert_eq!(b.compare(&a), DatasetOrdering::Worse);

        a.gm_clock_quality.clock_accuracy = ClockAccuracy::WithinUs10;
        b.gm_clock_quality.clock_accuracy = ClockAccuracy::WithinNs100;
        assert_eq!(a.compare(&b), DatasetOrdering::Worse);
        assert_eq!(b.compare(&a), DatasetOrdering::Better);

        a.gm_clock_quality.clock_class = 0;
        b.gm_clock_quality.clock_class = 1;
        assert_eq!(a.compare(&b), DatasetOrdering::Better);
        assert_eq!(b.compare(&a), DatasetOrdering::Worse);

        a.gm_priority_1 = 1;
        b.gm_priority_1 = 0;
        assert_eq!(a.compare(&b), DatasetOrdering::Worse);
        assert_eq!(b.compare(&a), DatasetOrdering::Better);
    }

    #[test]
    fn figure_35() {
        let (mut a, mut b) = pair();

        assert_eq!(a.compare(&b), DatasetOrdering::Error2);
        assert_eq!(b.compare(&a), DatasetOrdering::Error2);

        a.identity_of_receiver.port_number = 1;
        b.identity_of_receiver.port_number = 0;
        assert_eq!(a.compare(&b), DatasetOrdering::WorseByTopology);
        assert_eq!(b.compare(&a), DatasetOrdering::BetterByTopology);

        a.identity_of_sender = IDENTITY_A;
        b.identity_of_sender = IDENTITY_B;
        assert_eq!(a.compare(&b), DatasetOrdering::BetterByTopology);
        assert_eq!(b.compare(&a), DatasetOrdering::WorseByTopology);

        a.steps_removed = 0;
        a.identity_of_receiver.clock_identity = IDENTITY_A;
        b.steps_removed = 1;
        b.identity_of_receiver.clock_identity = IDENTITY_B;
        assert_eq!(a.compare(&b), DatasetOrdering::Error1);
        assert_eq!(b.compare(&a), DatasetOrdering::Error1);

        a.identity_of_receiver.clock_identity = IDENTITY_B;
        b.identity_of_receiver.clock_identity = IDENTITY_C;
        assert_eq!(a.compare(&b), DatasetOrdering::BetterByTopology);
        assert_eq!(b.compare(&a), DatasetOrdering::WorseByTopology);

        a.identity_of_receiver.clock_identity = IDENTITY_B;
        b.identity_of_receiver.clock_identity = IDENTITY_A;
        assert_eq!(a.compare(&b), DatasetOrdering::Better);
        assert_eq!(b.compare(&a), DatasetOrdering::Worse);

        a.steps_removed = 0;
        b.steps_removed = 2;
        assert_eq!(a.compare(&b), DatasetOrdering::Better);
        assert_eq!(b.compare(&a), DatasetOrdering::Worse);
    }
}
