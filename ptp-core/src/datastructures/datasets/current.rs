use crate::time::Duration;

/// The `currentDS` managed dataset: live synchronization status relative to
/// the current parent.
#[derive(Default, Copy, Clone, Debug, PartialEq)]
pub struct CurrentDS {
    pub steps_removed: u16,
    pub offset_from_master: Duration,
    pub mean_path_delay: Duration,
}
