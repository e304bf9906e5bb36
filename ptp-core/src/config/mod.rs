//! Static configuration consumed when constructing an instance or a port.
//!
//! Everything here is set once, at construction time, and never mutated by
//! the engine afterwards — reconfiguration means building a new instance.

mod instance;
mod port;

pub use instance::InstanceConfig;
pub use port::{DelayMechanism, PortConfig};

pub use crate::bmc::AcceptableMasterList;
pub use crate::datastructures::common::{ClockAccuracy, ClockIdentity, ClockQuality, TimeSource};
pub use crate::datastructures::datasets::TimePropertiesDS;
