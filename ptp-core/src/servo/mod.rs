//! Clock servo: the PI control loop that turns offset samples from the
//! [estimator](crate::estimator) into frequency adjustments and, when
//! necessary, phase steps.

use arrayvec::ArrayVec;

use crate::time::Duration;

/// Samples kept to judge oscillation and convergence.
const HISTORY_LEN: usize = 10;

/// `|offset_ns| >= this` triggers a phase step instead of a slew.
const DEFAULT_STEP_THRESHOLD: Duration = Duration::from_nanos(100_000_000);

/// Convergence band for `ADJUSTING -> TRACKING`.
const DEFAULT_CONVERGENCE_BAND: Duration = Duration::from_nanos(100);

/// Variance ceiling (in ns²) for convergence, held for `HISTORY_LEN` samples.
const DEFAULT_CONVERGENCE_VARIANCE: f64 = 50.0;

/// Minimum sign changes within the last [`HISTORY_LEN`] samples to call it
/// oscillation.
const OSCILLATION_SIGN_CHANGES: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServoState {
    Adjusting,
    Tracking,
    Holdover,
    Faulty,
}

/// Gains and thresholds the servo runs with. Mutated in place by
/// oscillation mitigation; reset alongside the integral.
#[derive(Debug, Clone, Copy)]
pub struct ServoConfig {
    pub kp: f64,
    pub ki: f64,
    pub step_threshold: Duration,
    pub convergence_band: Duration,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            kp: 0.7,
            ki: 0.3,
            step_threshold: DEFAULT_STEP_THRESHOLD,
            convergence_band: DEFAULT_CONVERGENCE_BAND,
        }
    }
}

/// Action the caller must take in response to a processed sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ServoAction {
    /// Adjust the clock's running frequency by this many parts-per-billion.
    AdjustFrequency(f64),
    /// Step the clock's phase by this amount instead of slewing.
    StepPhase(Duration),
}

/// A PI clock servo implementing the control law: frequency term `P = Kp *
/// offset`, integral term `I` clamped to the HAL frequency bound, phase
/// stepping above a threshold, and gain backoff on sustained oscillation.
#[derive(Debug)]
pub struct Servo {
    config: ServoConfig,
    integral_ppb: f64,
    frequency_bound_ppb: f64,
    state: ServoState,
    history: ArrayVec<Duration, HISTORY_LEN>,
    oscillating: bool,
}

impl Servo {
    pub fn new(config: ServoConfig, frequency_bound_ppb: f64) -> Self {
        Self {
            config,
            integral_ppb: 0.0,
            frequency_bound_ppb,
            state: ServoState::Adjusting,
            history: ArrayVec::new(),
            oscillating: false,
        }
    }

    pub fn state(&self) -> ServoState {
        self.state
    }

    /// Whether the most recent [`Self::process_sample`] call halved the
    /// gains in response to a ringing offset.
    pub fn oscillation_detected(&self) -> bool {
        self.oscillating
    }

    /// Discards the integral and any convergence history. Called on parent
    /// change, fault recovery, or an explicit request from the port.
    pub fn reset(&mut self) {
        self.integral_ppb = 0.0;
        self.history.clear();
        self.state = ServoState::Adjusting;
        self.oscillating = false;
    }

    /// Marks the servo as faulted: no further adjustments are produced
    /// until [`Self::reset`].
    pub fn mark_faulty(&mut self) {
        self.state = ServoState::Faulty;
    }

    /// Transitions to holdover: the last frequency estimate is kept, but no
    /// further samples update the integral.
    pub fn enter_holdover(&mut self) {
        self.state = ServoState::Holdover;
    }

    /// Processes one offset sample and returns the action the caller must
    /// apply to the clock, or `None` while faulted or in holdover.
    pub fn process_sample(&mut self, offset: Duration, dt: Duration) -> Option<ServoAction> {
        match self.state {
            ServoState::Faulty | ServoState::Holdover => return None,
            ServoState::Adjusting | ServoState::Tracking => {}
        }

        self.push_history(offset);
        self.oscillating = false;

        if offset.abs() > self.config.step_threshold {
            log::info!("offset {} exceeds step threshold, stepping clock", offset);
            self.integral_ppb = 0.0;
            self.state = ServoState::Adjusting;
            return Some(ServoAction::StepPhase(offset));
        }

        if self.sign_changes() >= OSCILLATION_SIGN_CHANGES {
            log::warn!("oscillation detected, halving servo gains");
            self.config.kp /= 2.0;
            self.config.ki /= 2.0;
            self.integral_ppb = 0.0;
            self.oscillating = true;
        }

        let offset_ns = offset.nanos() as f64;
        let dt_s = dt.nanos() as f64 / 1_000_000_000.0;

        let p = self.config.kp * offset_ns;
        self.integral_ppb = (self.integral_ppb + self.config.ki * offset_ns * dt_s)
            .clamp(-self.frequency_bound_ppb, self.frequency_bound_ppb);
        let freq_adj_ppb = (p + self.integral_ppb).clamp(-self.frequency_bound_ppb, self.frequency_bound_ppb);

        if self.has_converged() {
            self.state = ServoState::Tracking;
        }

        Some(ServoAction::AdjustFrequency(freq_adj_ppb))
    }

    fn push_history(&mut self, offset: Duration) {
        if self.history.is_full() {
            self.history.remove(0);
        }
        self.history.push(offset);
    }

    fn sign_changes(&self) -> usize {
        self.history
            .windows(2)
            .filter(|pair| (pair[0].nanos() < 0) != (pair[1].nanos() < 0))
            .count()
    }

    fn has_converged(&self) -> bool {
        if self.history.len() < HISTORY_LEN {
            return false;
        }
        let within_band = self.history.iter().all(|o| o.abs() < self.config.convergence_band);
        within_band && self.variance() < DEFAULT_CONVERGENCE_VARIANCE
    }

    fn variance(&self) -> f64 {
        let n = self.history.len() as f64;
        let mean = self.history.iter().map(|o| o.nanos() as f64).sum::<f64>() / n;
        self.history
            .iter()
            .map(|o| {
                let d = o.nanos() as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n
    }
}
