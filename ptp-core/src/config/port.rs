use crate::datastructures::common::PortIdentity;
use crate::time::Duration;

/// Which delay mechanism a port uses. Only the end-to-end mechanism is
/// implemented; peer-to-peer delay measurement is a possible extension but
/// is not part of this engine.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum DelayMechanism {
    /// End-to-end delay mechanism: delay is measured directly against the
    /// chosen master. `log_interval` is `portDS.logMinDelayReqInterval`.
    E2E { log_interval: i8 },
}

/// Configuration items of the `portDS` managed dataset that are fixed for
/// the life of the port. Dynamic `portDS` fields live on [`Port`](crate::port::Port)
/// itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PortConfig {
    pub port_identity: PortIdentity,
    pub delay_mechanism: DelayMechanism,
    pub log_announce_interval: i8,
    pub announce_receipt_timeout: u8,
    pub log_sync_interval: i8,
    pub master_only: bool,
    pub delay_asymmetry: Duration,
}

impl PortConfig {
    pub fn min_delay_req_interval(&self) -> i8 {
        match self.delay_mechanism {
            DelayMechanism::E2E { log_interval } => log_interval,
        }
    }
}
