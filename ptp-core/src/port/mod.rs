//! Per-port state: the port state machine, this port's view of the
//! foreign-master list, and its delay/offset estimator.
//!
//! A [`Port`] has no HAL dependency of its own — [`PtpInstance::tick`]
//! (the convenience entry point) drives the HAL and feeds timestamps back
//! in through these `handle_*` methods, the same split the teacher uses
//! between `Port` and the runtime that owns its sockets.

pub mod actions;
mod state;

pub use state::PortState;

use crate::bmc::{AcceptAnyMaster, AcceptableMasterList, Bmca, ForeignMasterList, StateDecision};
use crate::config::PortConfig;
use crate::datastructures::common::{PortIdentity, WireTimestamp};
use crate::datastructures::datasets::DefaultDS;
use crate::datastructures::messages::{
    AnnounceMessage, DelayRespMessage, FollowUpMessage, Header, Message, SyncMessage,
};
use crate::estimator::{Estimator, EstimatorError, SyncResult};
use crate::time::{Duration, Instant};

use actions::TimestampContext;

struct PendingSync {
    sequence_id: u16,
    ingress: Instant,
    correction: Duration,
}

/// One PTP port: state machine, foreign-master bookkeeping, and delay
/// estimation. Synchronization of the shared clock itself lives on
/// [`PtpInstance`](crate::instance::PtpInstance), not here.
pub struct Port<M: AcceptableMasterList = AcceptAnyMaster> {
    config: PortConfig,
    port_identity: PortIdentity,
    state: PortState,
    foreign_masters: ForeignMasterList,
    estimator: Estimator,
    acceptable_master_list: M,
    next_sequence_id: u16,
    pending_sync: Option<PendingSync>,
    announce_receipt_timeout_ticks: u8,
    ticks_since_last_announce: u8,
}

impl Port<AcceptAnyMaster> {
    pub fn new(config: PortConfig) -> Self {
        Self::with_acceptable_masters(config, AcceptAnyMaster)
    }
}

impl<M: AcceptableMasterList> Port<M> {
    pub fn with_acceptable_masters(config: PortConfig, acceptable_master_list: M) -> Self {
        let port_identity = config.port_identity;
        let announce_interval = crate::time::TimeInterval::from(Duration::from(
            crate::time::log_interval_to_duration(config.log_announce_interval),
        ));
        Port {
            foreign_masters: ForeignMasterList::new(announce_interval, port_identity),
            estimator: Estimator::new(
                Duration::from(crate::time::log_interval_to_duration(config.log_sync_interval)) * 10,
                Duration::from_millis(1),
            ),
            acceptable_master_list,
            next_sequence_id: 0,
            pending_sync: None,
            announce_receipt_timeout_ticks: config.announce_receipt_timeout,
            ticks_since_last_announce: 0,
            port_identity,
            state: PortState::Listening,
            config,
        }
    }

    pub fn state(&self) -> PortState {
        self.state
    }

    pub fn port_identity(&self) -> PortIdentity {
        self.port_identity
    }

    /// The configured `Sync` transmission interval (`portDS.logSyncInterval`
    /// decoded to a [`Duration`]).
    pub fn sync_interval(&self) -> Duration {
        Duration::from(crate::time::log_interval_to_duration(self.config.log_sync_interval))
    }

    /// The configured `Announce` transmission interval
    /// (`portDS.logAnnounceInterval` decoded to a [`Duration`]), also used as
    /// the `PRE_MASTER` qualification timeout (*9.2.6.11*: at least one
    /// `announceInterval`).
    pub fn announce_interval(&self) -> Duration {
        Duration::from(crate::time::log_interval_to_duration(self.config.log_announce_interval))
    }

    /// The configured `Delay_Req` transmission interval
    /// (`portDS.logMinDelayReqInterval` decoded to a [`Duration`]).
    pub fn delay_req_interval(&self) -> Duration {
        Duration::from(crate::time::log_interval_to_duration(self.config.min_delay_req_interval()))
    }

    /// The `ANNOUNCE_RECEIPT_TIMEOUT` watchdog period: `announceInterval`
    /// scaled by `portDS.announceReceiptTimeout`.
    pub fn announce_receipt_timeout(&self) -> Duration {
        self.announce_interval() * self.announce_receipt_timeout_ticks as i64
    }

    /// Advances timer-driven bookkeeping by `elapsed`: ages the foreign
    /// master list and the estimator, and counts down the announce receipt
    /// timeout. Returns whether the parent was just declared lost, and how
    /// many in-flight sync cycles the estimator abandoned as a result.
    pub fn step_age(&mut self, elapsed: Duration) -> (bool, usize) {
        self.foreign_masters.step_age(elapsed);
        let timed_out = self.estimator.step_age(elapsed).len();

        if self.state.parent().is_some() {
            let interval = crate::time::log_interval_to_duration(self.config.log_announce_interval);
            if elapsed >= Duration::from(interval) {
                self.ticks_since_last_announce = self.ticks_since_last_announce.saturating_add(1);
            }
            if self.ticks_since_last_announce >= self.announce_receipt_timeout_ticks {
                self.state = PortState::Listening;
                self.ticks_since_last_announce = 0;
                return (true, timed_out);
            }
        }
        (false, timed_out)
    }

    pub fn handle_announce(&mut self, header: &Header, message: &AnnounceMessage) {
        if !self.acceptable_master_list.is_acceptable(message.grandmaster_identity) {
            return;
        }
        if header.source_port_identity == self.state.parent().unwrap_or(header.source_port_identity) {
            self.ticks_since_last_announce = 0;
        }
        self.foreign_masters.register(header, message, Duration::ZERO);
    }

    pub fn handle_sync(&mut self, header: &Header, _message: &SyncMessage, ingress: Instant) {
        self.pending_sync = Some(PendingSync {
            sequence_id: header.sequence_id,
            ingress,
            correction: header.correction_field.into(),
        });
    }

    /// Completes a pending two-step `Sync` with its `Follow_Up`. Recording
    /// `t1`/`t2` never by itself yields a [`SyncResult`] — that only
    /// happens once the matching `Delay_Resp` arrives, see
    /// [`Self::handle_delay_resp`].
    pub fn handle_follow_up(&mut self, header: &Header, message: &FollowUpMessage) {
        let Some(pending) = self.pending_sync.take() else {
            return;
        };
        if pending.sequence_id != header.sequence_id {
            self.pending_sync = Some(pending);
            return;
        }
        let correction = pending.correction + Duration::from(header.correction_field);
        let t1 = message.precise_origin_timestamp.to_instant();
        self.estimator.record_sync(header.sequence_id, t1, pending.ingress, correction);
    }

    /// Responds to an incoming `Delay_Req`, if this port is currently
    /// acting as master.
    pub fn handle_delay_req(&self, header: &Header, ingress: Instant) -> Option<Message> {
        if !matches!(self.state, PortState::Master) {
            return None;
        }
        Some(Message::delay_resp(
            header,
            self.port_identity,
            self.config.min_delay_req_interval(),
            WireTimestamp::from_instant(ingress),
        ))
    }

    pub fn handle_delay_resp(&mut self, header: &Header, message: &DelayRespMessage) -> Option<Result<SyncResult, EstimatorError>> {
        if message.requesting_port_identity != self.port_identity {
            return None;
        }
        let t4 = message.receive_timestamp.to_instant();
        let result = self
            .estimator
            .record_delay_resp(header.sequence_id, t4, header.correction_field.into())?;
        // `delayAsymmetry` biases the one-way offset only: the configured
        // master-to-slave path is this much longer than the slave-to-master
        // one, so it never factors into the averaged round-trip path delay.
        Some(result.map(|mut sample| {
            sample.offset_from_master = sample.offset_from_master - self.config.delay_asymmetry;
            sample
        }))
    }

    /// Builds the next `Sync` to send, advancing the sequence counter.
    pub fn build_sync(&mut self, default_ds: &DefaultDS) -> (Message, TimestampContext) {
        let sequence_id = self.next_sequence_id;
        self.next_sequence_id = self.next_sequence_id.wrapping_add(1);
        (
            Message::sync(default_ds, self.port_identity, sequence_id),
            TimestampContext::Sync { sequence_id },
        )
    }

    /// Builds the next `Delay_Req` to send, advancing the sequence counter.
    pub fn build_delay_req(&mut self, default_ds: &DefaultDS) -> (Message, TimestampContext) {
        let sequence_id = self.next_sequence_id;
        self.next_sequence_id = self.next_sequence_id.wrapping_add(1);
        (
            Message::delay_req(default_ds, self.port_identity, sequence_id),
            TimestampContext::DelayReq { sequence_id },
        )
    }

    /// Feeds back the transmit timestamp of a previously sent event
    /// message. For a `Sync`, this both supplies `t1` when this port is
    /// acting as master (one-step is not produced by this codec, so a
    /// `Follow_Up` is always built) and records `t3` for a `Delay_Req`.
    pub fn handle_send_timestamp(&mut self, context: TimestampContext, default_ds: &DefaultDS, tx_time: Instant) -> Option<Message> {
        match context {
            TimestampContext::Sync { sequence_id } => Some(Message::follow_up(
                default_ds,
                self.port_identity,
                sequence_id,
                WireTimestamp::from_instant(tx_time),
            )),
            TimestampContext::DelayReq { sequence_id } => {
                self.estimator.record_delay_req(sequence_id, tx_time);
                None
            }
        }
    }

    /// Runs the state decision procedure and applies the result to this
    /// port's state machine. Returns the decision and, when it was derived
    /// from a foreign candidate, that candidate's header and announce body
    /// so the caller can update `ParentDS`/`TimePropertiesDS`/`CurrentDS`
    /// from it.
    pub fn run_bmca(&mut self, own_data: &DefaultDS) -> (StateDecision, Option<(Header, AnnounceMessage)>) {
        let candidates = self.foreign_masters.take_qualified_announces();
        let best = Bmca::best_foreign(self.port_identity, candidates);
        let decision = Bmca::decide(own_data, self.port_identity, best.as_ref());

        match decision {
            // Only reached with an empty candidate list on a slave-only
            // port: it has no master to follow and nothing to offer, so it
            // always reverts to LISTENING.
            StateDecision::Listening => self.state = PortState::Listening,
            StateDecision::Master => {
                self.state = match self.state {
                    PortState::Master | PortState::PreMaster => PortState::Master,
                    _ if own_data.slave_only => self.state,
                    _ => PortState::PreMaster,
                };
            }
            StateDecision::Slave if self.config.master_only => {
                // A master-only port never follows another clock; losing
                // BMCA to a better candidate demotes it to PASSIVE instead.
                self.state = PortState::Passive;
            }
            StateDecision::Slave => {
                if let Some((header, _)) = &best {
                    self.ticks_since_last_announce = 0;
                    self.state = PortState::Uncalibrated {
                        parent: header.source_port_identity,
                    };
                }
            }
            StateDecision::Passive => self.state = PortState::Passive,
        }

        (decision, best)
    }

    /// Marks a port that has been in `Uncalibrated` long enough, and has
    /// produced at least one offset sample, as fully `Slave`.
    pub fn confirm_calibrated(&mut self) {
        if let PortState::Uncalibrated { parent } = self.state {
            self.state = PortState::Slave { parent };
        }
    }

    /// Promotes a qualified `PreMaster` port to `Master`.
    pub fn confirm_master(&mut self) {
        if matches!(self.state, PortState::PreMaster) {
            self.state = PortState::Master;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datastructures::common::{ClockAccuracy, ClockIdentity, ClockQuality, TimeSource};
    use crate::config::InstanceConfig;

    fn port_config(byte: u8) -> PortConfig {
        PortConfig {
            port_identity: PortIdentity {
                clock_identity: ClockIdentity([byte; 8]),
                port_number: 1,
            },
            delay_mechanism: crate::config::DelayMechanism::E2E { log_interval: 0 },
            log_announce_interval: 1,
            announce_receipt_timeout: 3,
            log_sync_interval: 0,
            master_only: false,
            delay_asymmetry: Duration::ZERO,
        }
    }

    fn own_data(byte: u8, priority_1: u8) -> DefaultDS {
        DefaultDS::new(
            InstanceConfig {
                clock_identity: ClockIdentity([byte; 8]),
                clock_quality: ClockQuality {
                    clock_class: 6,
                    clock_accuracy: ClockAccuracy::WithinNs100,
                    offset_scaled_log_variance: 0,
                },
                priority_1,
                priority_2: 128,
                domain_number: 0,
                slave_only: false,
            },
            1,
        )
    }

    fn announce_from(identity: ClockIdentity, priority_1: u8, sequence_id: u16) -> (Header, AnnounceMessage) {
        let header = Header {
            source_port_identity: PortIdentity {
                clock_identity: identity,
                port_number: 1,
            },
            sequence_id,
            ..Header::default()
        };
        let announce = AnnounceMessage {
            origin_timestamp: WireTimestamp::default(),
            current_utc_offset: 37,
            grandmaster_priority_1: priority_1,
            grandmaster_clock_quality: ClockQuality {
                clock_class: 6,
                clock_accuracy: ClockAccuracy::WithinNs100,
                offset_scaled_log_variance: 0,
            },
            grandmaster_priority_2: 128,
            grandmaster_identity: identity,
            steps_removed: 0,
            time_source: TimeSource::Gnss,
        };
        (header, announce)
    }

    #[test]
    fn cold_port_starts_listening() {
        let port = Port::new(port_config(1));
        assert_eq!(port.state(), PortState::Listening);
    }

    #[test]
    fn two_qualifying_announces_from_better_master_yield_slave() {
        let mut port = Port::new(port_config(1));
        let (header_a, announce_a) = announce_from(ClockIdentity([2; 8]), 10, 1);
        let (header_b, announce_b) = announce_from(ClockIdentity([2; 8]), 10, 2);
        port.handle_announce(&header_a, &announce_a);
        port.handle_announce(&header_b, &announce_b);

        let own = own_data(1, 200);
        let (decision, _) = port.run_bmca(&own);
        assert_eq!(decision, StateDecision::Slave);
        assert!(matches!(port.state(), PortState::Uncalibrated { .. }));
    }

    #[test]
    fn empty_foreign_list_with_no_slave_only_yields_premaster() {
        let mut port = Port::new(port_config(1));
        let own = own_data(1, 128);
        let (decision, _) = port.run_bmca(&own);
        assert_eq!(decision, StateDecision::Master);
        assert_eq!(port.state(), PortState::PreMaster);
        port.confirm_master();
        assert_eq!(port.state(), PortState::Master);
    }

    #[test]
    fn sync_and_follow_up_feed_the_estimator() {
        let mut port = Port::new(port_config(1));
        let header = Header {
            sequence_id: 5,
            ..Header::default()
        };
        let sync = SyncMessage {
            origin_timestamp: WireTimestamp::default(),
        };
        port.handle_sync(&header, &sync, Instant::from_nanos(1_000_100_000));

        let follow_up = FollowUpMessage {
            precise_origin_timestamp: WireTimestamp::from_instant(Instant::from_nanos(1_000_000_000)),
        };
        let follow_up_header = Header {
            sequence_id: 5,
            ..Header::default()
        };
        port.handle_follow_up(&follow_up_header, &follow_up);
        assert!(port.pending_sync.is_none());
    }
}
