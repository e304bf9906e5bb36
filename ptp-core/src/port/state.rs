use core::fmt::{Display, Formatter};

use crate::datastructures::common::PortIdentity;

/// Port state, *IEEE1588-2019 section 9.2.5*. Each variant carries only
/// the data meaningful in that state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PortState {
    #[default]
    Initializing,
    Faulty,
    Disabled,
    Listening,
    PreMaster,
    Master,
    Passive,
    Uncalibrated { parent: PortIdentity },
    Slave { parent: PortIdentity },
}

impl PortState {
    /// The `PortIdentity` of the clock this port currently synchronizes to,
    /// if it has one.
    pub fn parent(&self) -> Option<PortIdentity> {
        match self {
            PortState::Uncalibrated { parent } | PortState::Slave { parent } => Some(*parent),
            _ => None,
        }
    }

    pub fn is_steady(&self) -> bool {
        matches!(
            self,
            PortState::Master | PortState::Passive | PortState::Slave { .. }
        )
    }
}

impl Display for PortState {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            PortState::Initializing => write!(f, "Initializing"),
            PortState::Faulty => write!(f, "Faulty"),
            PortState::Disabled => write!(f, "Disabled"),
            PortState::Listening => write!(f, "Listening"),
            PortState::PreMaster => write!(f, "PreMaster"),
            PortState::Master => write!(f, "Master"),
            PortState::Passive => write!(f, "Passive"),
            PortState::Uncalibrated { .. } => write!(f, "Uncalibrated"),
            PortState::Slave { .. } => write!(f, "Slave"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datastructures::common::ClockIdentity;

    #[test]
    fn parent_only_present_in_uncalibrated_and_slave() {
        let parent = PortIdentity {
            clock_identity: ClockIdentity([1; 8]),
            port_number: 1,
        };
        assert_eq!(PortState::Slave { parent }.parent(), Some(parent));
        assert_eq!(PortState::Uncalibrated { parent }.parent(), Some(parent));
        assert_eq!(PortState::Master.parent(), None);
    }
}
