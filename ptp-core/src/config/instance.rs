use crate::datastructures::common::{ClockIdentity, ClockQuality};

/// Configuration for the whole clock: identity and BMCA tie-breaking
/// priorities shared by every port.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct InstanceConfig {
    pub clock_identity: ClockIdentity,
    pub clock_quality: ClockQuality,
    pub priority_1: u8,
    pub priority_2: u8,
    pub domain_number: u8,
    pub slave_only: bool,
}
