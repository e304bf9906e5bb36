use super::DefaultDS;
use crate::datastructures::common::{ClockIdentity, ClockQuality, PortIdentity};

/// The `parentDS` managed dataset: who this clock currently considers its
/// time source, directly or transitively.
#[derive(Clone, Debug, Copy, Eq, PartialEq)]
pub struct ParentDS {
    pub parent_port_identity: PortIdentity,
    pub grandmaster_identity: ClockIdentity,
    pub grandmaster_clock_quality: ClockQuality,
    pub grandmaster_priority_1: u8,
    pub grandmaster_priority_2: u8,
}

impl ParentDS {
    /// The dataset a clock reports about itself while it is its own
    /// grandmaster (before BMCA selects a remote parent).
    pub fn new_self(default_ds: &DefaultDS) -> Self {
        Self {
            parent_port_identity: PortIdentity {
                clock_identity: default_ds.clock_identity,
                port_number: 0,
            },
            grandmaster_identity: default_ds.clock_identity,
            grandmaster_clock_quality: default_ds.clock_quality,
            grandmaster_priority_1: default_ds.priority_1,
            grandmaster_priority_2: default_ds.priority_2,
        }
    }
}
