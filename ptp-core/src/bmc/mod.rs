//! Best master clock algorithm: dataset comparison, state decision, and
//! the foreign-master bookkeeping that feeds them.

mod acceptable_master;
mod bmca;
mod dataset_comparison;
mod foreign_master;

pub use acceptable_master::{AcceptAnyMaster, AcceptableMasterList};
pub use bmca::{Bmca, StateDecision};
pub use dataset_comparison::{ComparisonDataset, DatasetOrdering};
pub use foreign_master::ForeignMasterList;
