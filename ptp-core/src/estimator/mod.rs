//! Delay/offset estimator, *IEEE1588-2019 section 11.3* (E2E delay
//! mechanism).
//!
//! Correlates the four timestamps of one sync cycle — `t1`/`t2` from the
//! Sync/Follow_Up exchange, `t3`/`t4` from the Delay_Req/Delay_Resp
//! exchange — keyed by `sequenceId`, and produces one offset/path-delay
//! sample per completed cycle.

use arrayvec::ArrayVec;

use crate::time::{Duration, Instant};

/// How many sync cycles can be in flight at once. One port only ever runs
/// one cycle at a time in practice; a little slack absorbs reordering.
const MAX_PENDING_CYCLES: usize = 4;

#[derive(Debug, Clone, Copy)]
struct PendingCycle {
    sequence_id: u16,
    t1: Option<Instant>,
    t2: Option<Instant>,
    t3: Option<Instant>,
    t4: Option<Instant>,
    correction_total: Duration,
    age: Duration,
}

impl PendingCycle {
    fn new(sequence_id: u16) -> Self {
        Self {
            sequence_id,
            t1: None,
            t2: None,
            t3: None,
            t4: None,
            correction_total: Duration::ZERO,
            age: Duration::ZERO,
        }
    }

    fn is_complete(&self) -> bool {
        self.t1.is_some() && self.t2.is_some() && self.t3.is_some() && self.t4.is_some()
    }
}

/// One completed sync cycle's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncResult {
    pub offset_from_master: Duration,
    pub mean_path_delay: Duration,
}

/// Failure producing a [`SyncResult`] from a completed or abandoned cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimatorError {
    /// The cycle did not complete within the configured ceiling.
    Timeout,
    /// The gathered timestamps violate the ordering constraints
    /// (`t2 < t1 - skew_tolerance`, or `t4 <= t3`).
    ImplausibleTimestamps,
}

/// Tracks in-flight sync cycles for one port and turns completed ones into
/// offset/path-delay samples.
#[derive(Debug)]
pub struct Estimator {
    cycles: ArrayVec<PendingCycle, MAX_PENDING_CYCLES>,
    timeout: Duration,
    skew_tolerance: Duration,
}

impl Estimator {
    pub fn new(timeout: Duration, skew_tolerance: Duration) -> Self {
        Self {
            cycles: ArrayVec::new(),
            timeout,
            skew_tolerance,
        }
    }

    fn slot_mut(&mut self, sequence_id: u16) -> &mut PendingCycle {
        if let Some(i) = self.cycles.iter().position(|c| c.sequence_id == sequence_id) {
            return &mut self.cycles[i];
        }

        let fresh = PendingCycle::new(sequence_id);
        if self.cycles.is_full() {
            let oldest = self
                .cycles
                .iter()
                .enumerate()
                .max_by_key(|(_, c)| c.age)
                .map(|(i, _)| i)
                .expect("capacity is nonzero");
            self.cycles[oldest] = fresh;
            &mut self.cycles[oldest]
        } else {
            self.cycles.push(fresh);
            self.cycles.last_mut().expect("just pushed")
        }
    }

    /// Records `t1` (Sync origin timestamp, from Follow_Up or an embedded
    /// one-step Sync) and `t2` (local Sync ingress timestamp).
    pub fn record_sync(&mut self, sequence_id: u16, t1: Instant, t2: Instant, correction: Duration) {
        let slot = self.slot_mut(sequence_id);
        slot.t1 = Some(t1);
        slot.t2 = Some(t2);
        slot.correction_total = slot.correction_total + correction;
    }

    /// Records `t3`, the local Delay_Req egress timestamp.
    pub fn record_delay_req(&mut self, sequence_id: u16, t3: Instant) {
        self.slot_mut(sequence_id).t3 = Some(t3);
    }

    /// Records `t4` from the matching Delay_Resp and, if the cycle is now
    /// complete, computes and removes it.
    pub fn record_delay_resp(
        &mut self,
        sequence_id: u16,
        t4: Instant,
        correction: Duration,
    ) -> Option<Result<SyncResult, EstimatorError>> {
        let index = self.cycles.iter().position(|c| c.sequence_id == sequence_id)?;
        self.cycles[index].t4 = Some(t4);
        self.cycles[index].correction_total = self.cycles[index].correction_total + correction;

        if !self.cycles[index].is_complete() {
            return None;
        }

        let cycle = self.cycles.remove(index);
        Some(Self::compute(&cycle, self.skew_tolerance))
    }

    fn compute(cycle: &PendingCycle, skew_tolerance: Duration) -> Result<SyncResult, EstimatorError> {
        let t1 = cycle.t1.expect("checked complete");
        let t2 = cycle.t2.expect("checked complete");
        let t3 = cycle.t3.expect("checked complete");
        let t4 = cycle.t4.expect("checked complete");

        if t2 < t1 - skew_tolerance || t4 <= t3 {
            return Err(EstimatorError::ImplausibleTimestamps);
        }

        let sync_leg = t2.duration_since(t1);
        let delay_leg = t4.duration_since(t3);
        let mean_path_delay = (sync_leg + delay_leg - cycle.correction_total) / 2;
        let offset_from_master = sync_leg - mean_path_delay - cycle.correction_total;

        Ok(SyncResult {
            offset_from_master,
            mean_path_delay,
        })
    }

    /// Advances every in-flight cycle's age, abandoning ones that exceed
    /// the configured ceiling. Returns the sequence ids abandoned this
    /// call.
    pub fn step_age(&mut self, step: Duration) -> ArrayVec<u16, MAX_PENDING_CYCLES> {
        let mut timed_out = ArrayVec::new();
        let timeout = self.timeout;

        let mut i = self.cycles.len();
        while i > 0 {
            i -= 1;
            self.cycles[i].age = self.cycles[i].age + step;
            if self.cycles[i].age > timeout {
                let cycle = self.cycles.remove(i);
                let _ = timed_out.try_push(cycle.sequence_id);
            }
        }

        timed_out
    }
}
