//! The clock instance: owns every port, the single disciplined
//! [`Clock`](hal::Clock), and the [`Servo`] that steers it. Mirrors the
//! teacher's `PtpInstance`, which likewise owns one `Clock`/`Filter` shared
//! across an array of `Port`s while each `Port` keeps its own BMCA and
//! foreign-master state.
//!
//! [`PtpInstance::tick`] is the only place in this crate that calls into
//! the HAL — every [`Port`] method is pure. `tick` exists because spec §5
//! pins down one observable event-processing order: expire timers, drain
//! the receive queue, run BMCA, emit outbound messages, run the servo.

use arrayvec::ArrayVec;

use crate::bmc::{AcceptAnyMaster, AcceptableMasterList, StateDecision};
use crate::datastructures::datasets::{CurrentDS, DefaultDS, ParentDS, TimePropertiesDS};
use crate::datastructures::messages::{Message, MessageBody, MAX_MESSAGE_LEN};
use crate::error::Error;
use crate::hal::{Clock, DestinationClass, Network, SendHandle, Timer, TimerEvent, TimerKind};
use crate::observability::{Counters, Snapshot};
use crate::port::actions::TimestampContext;
use crate::port::{Port, PortState};
use crate::servo::{Servo, ServoAction, ServoConfig};
use crate::time::Duration;
use crate::Event;

/// Upper bound on the number of ports one instance can drive.
pub const MAX_PORTS: usize = 8;

const MAX_PENDING_SENDS: usize = MAX_PORTS * 2;

/// Events worth logging from a single [`PtpInstance::tick`].
type TickEvents = ArrayVec<Event, { MAX_PORTS * 4 }>;

struct PendingSend {
    port: usize,
    handle: SendHandle,
    context: TimestampContext,
}

/// A PTP ordinary or boundary clock: `N` ports sharing one system clock and
/// servo. `NW` is the network transport type used uniformly across every
/// port (a host with heterogeneous transports runs one `PtpInstance` per
/// transport type, as the teacher's `statime-linux` does).
pub struct PtpInstance<NW, C, T, M = AcceptAnyMaster>
where
    NW: Network,
    C: Clock,
    T: Timer,
    M: AcceptableMasterList,
{
    default_ds: DefaultDS,
    parent_ds: ParentDS,
    time_properties_ds: TimePropertiesDS,
    current_ds: CurrentDS,
    ports: ArrayVec<Port<M>, MAX_PORTS>,
    networks: ArrayVec<NW, MAX_PORTS>,
    clock: C,
    timer: T,
    servo: Servo,
    pending_sends: ArrayVec<PendingSend, MAX_PENDING_SENDS>,
    counters: Counters,
    last_offset_from_master: Option<Duration>,
}

impl<NW, C, T, M> PtpInstance<NW, C, T, M>
where
    NW: Network,
    C: Clock,
    T: Timer,
    M: AcceptableMasterList,
{
    /// Builds an instance from already-constructed ports and their
    /// matching network transports, one pair per port, in port-number
    /// order.
    pub fn new(
        default_ds: DefaultDS,
        time_properties_ds: TimePropertiesDS,
        ports: ArrayVec<Port<M>, MAX_PORTS>,
        networks: ArrayVec<NW, MAX_PORTS>,
        clock: C,
        timer: T,
        servo_config: ServoConfig,
    ) -> Result<Self, Error> {
        if ports.len() != networks.len() {
            return Err(Error::InvalidPortIndex(ports.len().max(networks.len())));
        }
        let parent_ds = ParentDS::new_self(&default_ds);
        let frequency_bound = clock.frequency_bound();

        for (index, port) in ports.iter().enumerate() {
            // Every port starts in LISTENING (*9.2.5*), so only the receipt
            // watchdog needs arming up front; ANNOUNCE/SYNC/DELAY_REQ are
            // armed by `run_bmca` once a port actually becomes MASTER or
            // starts following a parent.
            timer.arm(
                TimerEvent { port: index, kind: TimerKind::AnnounceReceipt },
                port.announce_receipt_timeout().into(),
            );
        }

        Ok(Self {
            default_ds,
            parent_ds,
            time_properties_ds,
            current_ds: CurrentDS::default(),
            ports,
            networks,
            clock,
            timer,
            servo: Servo::new(servo_config, frequency_bound),
            pending_sends: ArrayVec::new(),
            counters: Counters::default(),
            last_offset_from_master: None,
        })
    }

    pub fn default_ds(&self) -> &DefaultDS {
        &self.default_ds
    }

    pub fn parent_ds(&self) -> &ParentDS {
        &self.parent_ds
    }

    pub fn current_ds(&self) -> &CurrentDS {
        &self.current_ds
    }

    pub fn time_properties_ds(&self) -> &TimePropertiesDS {
        &self.time_properties_ds
    }

    pub fn port_state(&self, port: usize) -> Option<PortState> {
        self.ports.get(port).map(Port::state)
    }

    /// A read-only, atomic-value-copy snapshot of everything a host might
    /// want to log or export as a metric.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            counters: self.counters,
            last_offset_from_master: self.last_offset_from_master,
            last_selection: Some(self.parent_ds.parent_port_identity),
            servo_state: self.servo.state(),
            port_states: self.ports.iter().map(Port::state).collect(),
        }
    }

    /// Drives one iteration of the 5-step order from spec §5: expire
    /// timers, drain the receive queue, run BMCA, emit outbound messages,
    /// run the servo. Returns the events worth logging from this tick.
    pub fn tick(&mut self) -> TickEvents {
        let mut events = ArrayVec::new();
        let mut bmca_due = false;

        // (1) expire timers
        while let Some(fired) = self.timer.poll_expired() {
            if self.handle_timer(fired, &mut events) {
                bmca_due = true;
            }
        }

        // (2) drain receive queue
        for port in 0..self.ports.len() {
            while let Some((ingress, raw)) = self.networks[port].try_recv() {
                if self.handle_datagram(port, ingress, &raw, &mut events) {
                    bmca_due = true;
                }
            }
        }

        // (3) run BMCA if any qualifying change occurred
        if bmca_due {
            self.run_bmca(&mut events);
        }

        // (4) emit outbound messages queued by steps 1-3
        self.drain_outbound(&mut events);

        // (5) run servo if a new offset sample is ready
        self.poll_tx_timestamps(&mut events);

        events
    }

    /// Handles one expired deadline. Returns whether BMCA should run this
    /// tick as a result (*spec §4.1*: BMCA runs on Announce receipt or on
    /// `ANNOUNCE_RECEIPT_TIMEOUT`, so a master-capable port with no rival on
    /// the segment can still self-promote without ever seeing a datagram).
    fn handle_timer(&mut self, fired: TimerEvent, events: &mut TickEvents) -> bool {
        if fired.port >= self.ports.len() {
            return false;
        }
        match fired.kind {
            TimerKind::Announce => {
                if matches!(self.ports[fired.port].state(), PortState::Master) {
                    let message = Message::announce(
                        &self.default_ds,
                        &self.time_properties_ds,
                        &self.parent_ds,
                        self.current_ds.steps_removed,
                        self.ports[fired.port].port_identity(),
                        0,
                    );
                    self.send_now(fired.port, &message, DestinationClass::General);
                    let duration = self.ports[fired.port].announce_interval().into();
                    self.timer.arm(fired, duration);
                }
                false
            }
            TimerKind::AnnounceReceipt => {
                // This timer always re-arms for the same `announce_receipt_timeout()`
                // span (below), so that span is also the real time elapsed since it
                // last fired. Ages the foreign-master list and the estimator by an
                // actual, non-zero duration instead of pretending no time passed.
                let timeout = self.ports[fired.port].announce_receipt_timeout();
                let (parent_lost, timed_out) = self.ports[fired.port].step_age(timeout);
                if parent_lost {
                    let _ = events.try_push(Event::PortStateChange { port: fired.port });
                }
                for _ in 0..timed_out {
                    self.apply_sync_result(fired.port, Err(crate::estimator::EstimatorError::Timeout), events);
                }
                self.timer.arm(fired, timeout.into());
                true
            }
            TimerKind::Sync => {
                if matches!(self.ports[fired.port].state(), PortState::Master) {
                    let (message, context) = self.ports[fired.port].build_sync(&self.default_ds);
                    self.queue_event_send(fired.port, &message, context);
                    let duration = self.ports[fired.port].sync_interval().into();
                    self.timer.arm(fired, duration);
                }
                false
            }
            TimerKind::DelayRequest => {
                if self.ports[fired.port].state().parent().is_some() {
                    let (message, context) = self.ports[fired.port].build_delay_req(&self.default_ds);
                    self.queue_event_send(fired.port, &message, context);
                    let duration = self.ports[fired.port].delay_req_interval().into();
                    self.timer.arm(fired, duration);
                }
                false
            }
            TimerKind::Qualification => {
                self.ports[fired.port].confirm_master();
                if matches!(self.ports[fired.port].state(), PortState::Master) {
                    let sync_event = TimerEvent { port: fired.port, kind: TimerKind::Sync };
                    let duration = self.ports[fired.port].sync_interval().into();
                    self.timer.arm(sync_event, duration);
                    let announce_event = TimerEvent { port: fired.port, kind: TimerKind::Announce };
                    let announce_duration = self.ports[fired.port].announce_interval().into();
                    self.timer.arm(announce_event, announce_duration);
                }
                let _ = events.try_push(Event::PortStateChange { port: fired.port });
                false
            }
        }
    }

    /// Decodes and dispatches one datagram. Returns whether it may have
    /// changed the foreign-master list (and so BMCA should run this tick).
    fn handle_datagram(
        &mut self,
        port_index: usize,
        ingress: crate::time::Instant,
        raw: &[u8],
        events: &mut TickEvents,
    ) -> bool {
        let message = match Message::deserialize(raw) {
            Ok(m) => m,
            Err(_) => {
                self.counters.record_parse_error();
                return false;
            }
        };

        if message.header.domain_number != self.default_ds.domain_number {
            return false;
        }

        match &message.body {
            MessageBody::Announce(announce) => {
                self.counters.record_announce_rx();
                self.ports[port_index].handle_announce(&message.header, announce);
                true
            }
            MessageBody::Sync(sync) => {
                self.counters.record_sync_rx();
                self.ports[port_index].handle_sync(&message.header, sync, ingress);
                false
            }
            MessageBody::FollowUp(follow_up) => {
                self.ports[port_index].handle_follow_up(&message.header, follow_up);
                false
            }
            MessageBody::DelayReq(_) => {
                let response = self.ports[port_index].handle_delay_req(&message.header, ingress);
                if let Some(response) = response {
                    self.send_now(port_index, &response, DestinationClass::General);
                }
                false
            }
            MessageBody::DelayResp(delay_resp) => {
                let result = self.ports[port_index].handle_delay_resp(&message.header, delay_resp);
                if let Some(result) = result {
                    self.apply_sync_result(port_index, result, events);
                }
                false
            }
        }
    }

    fn apply_sync_result(
        &mut self,
        port_index: usize,
        result: Result<crate::estimator::SyncResult, crate::estimator::EstimatorError>,
        events: &mut TickEvents,
    ) {
        match result {
            Ok(sample) => {
                self.counters.record_offset_computed();
                self.current_ds.offset_from_master = sample.offset_from_master;
                self.current_ds.mean_path_delay = sample.mean_path_delay;
                self.last_offset_from_master = Some(sample.offset_from_master);
                if self.ports[port_index].state().parent().is_some() {
                    self.ports[port_index].confirm_calibrated();
                }
                let _ = events.try_push(Event::PortStateChange { port: port_index });
            }
            Err(crate::estimator::EstimatorError::Timeout) => {
                let _ = events.try_push(Event::EstimatorTimeout { port: port_index });
            }
            Err(crate::estimator::EstimatorError::ImplausibleTimestamps) => {
                let _ = events.try_push(Event::ImplausibleTimestamps { port: port_index });
            }
        }
    }

    fn run_bmca(&mut self, events: &mut TickEvents) {
        for index in 0..self.ports.len() {
            let previous_state = self.ports[index].state();
            let (decision, best_foreign) = self.ports[index].run_bmca(&self.default_ds);
            self.counters.record_bmca_selection(decision);
            let new_state = self.ports[index].state();

            if decision == StateDecision::Slave {
                if let Some(parent) = new_state.parent() {
                    if let Some((header, announce)) = &best_foreign {
                        self.parent_ds.parent_port_identity = parent;
                        self.parent_ds.grandmaster_identity = announce.grandmaster_identity;
                        self.parent_ds.grandmaster_clock_quality = announce.grandmaster_clock_quality;
                        self.parent_ds.grandmaster_priority_1 = announce.grandmaster_priority_1;
                        self.parent_ds.grandmaster_priority_2 = announce.grandmaster_priority_2;
                        self.current_ds.steps_removed = announce.steps_removed + 1;
                        self.time_properties_ds = TimePropertiesDS {
                            current_utc_offset: announce.current_utc_offset,
                            current_utc_offset_valid: header.current_utc_offset_valid,
                            leap59: header.leap59,
                            leap61: header.leap61,
                            time_traceable: header.time_traceable,
                            frequency_traceable: header.frequency_traceable,
                            ptp_timescale: header.ptp_timescale,
                            time_source: announce.time_source,
                        };
                    }
                    self.servo.reset();
                    let _ = events.try_push(Event::NewParent);
                }
            }

            if new_state != previous_state {
                self.arm_timers_for_transition(index, new_state);
                let _ = events.try_push(Event::PortStateChange { port: index });
            }
        }
    }

    /// Arms the per-port timer a freshly-entered state needs to make
    /// progress: `PRE_MASTER` needs its qualification deadline, `MASTER`
    /// needs its `Sync` heartbeat, and `UNCALIBRATED`/`SLAVE` need the
    /// `Delay_Req` heartbeat. Entering any other state cancels all three,
    /// since none of them apply outside of mastering or slaving.
    fn arm_timers_for_transition(&mut self, port: usize, new_state: PortState) {
        let event = |kind| TimerEvent { port, kind };
        self.timer.cancel(event(TimerKind::Qualification));
        self.timer.cancel(event(TimerKind::Announce));
        self.timer.cancel(event(TimerKind::Sync));
        self.timer.cancel(event(TimerKind::DelayRequest));

        match new_state {
            PortState::PreMaster => {
                let duration = self.ports[port].announce_interval().into();
                self.timer.arm(event(TimerKind::Qualification), duration);
            }
            // Reached directly only if a port was already MASTER/PRE_MASTER
            // and stays MASTER; ordinary promotion goes through
            // `TimerKind::Qualification` firing instead, which arms both
            // heartbeats itself.
            PortState::Master => {
                let duration = self.ports[port].sync_interval().into();
                self.timer.arm(event(TimerKind::Sync), duration);
                let announce_duration = self.ports[port].announce_interval().into();
                self.timer.arm(event(TimerKind::Announce), announce_duration);
            }
            PortState::Uncalibrated { .. } | PortState::Slave { .. } => {
                let duration = self.ports[port].delay_req_interval().into();
                self.timer.arm(event(TimerKind::DelayRequest), duration);
            }
            _ => {}
        }
    }

    fn queue_event_send(&mut self, port: usize, message: &Message, context: TimestampContext) {
        let mut buffer = [0u8; MAX_MESSAGE_LEN];
        let Ok(len) = message.serialize(&mut buffer) else {
            return;
        };
        if let Some(handle) = self.networks[port].send(&buffer[..len], DestinationClass::Event) {
            let _ = self.pending_sends.try_push(PendingSend { port, handle, context });
        }
    }

    fn send_now(&mut self, port: usize, message: &Message, class: DestinationClass) {
        let mut buffer = [0u8; MAX_MESSAGE_LEN];
        if let Ok(len) = message.serialize(&mut buffer) {
            let _ = self.networks[port].send(&buffer[..len], class);
        }
    }

    fn drain_outbound(&mut self, _events: &mut TickEvents) {
        // Event-class sends queued this tick are picked up by
        // `poll_tx_timestamps` once their egress timestamp is available;
        // general-class messages are already sent synchronously above.
    }

    fn poll_tx_timestamps(&mut self, events: &mut TickEvents) {
        let pending_sends = core::mem::take(&mut self.pending_sends);
        let mut still_pending = ArrayVec::<PendingSend, MAX_PENDING_SENDS>::new();
        for pending in pending_sends {
            match self.networks[pending.port].take_tx_timestamp(pending.handle) {
                Some(tx_time) => {
                    let follow_up = self.ports[pending.port].handle_send_timestamp(
                        pending.context,
                        &self.default_ds,
                        tx_time,
                    );
                    if let Some(follow_up) = follow_up {
                        self.send_now(pending.port, &follow_up, DestinationClass::General);
                    }
                }
                None => {
                    let _ = still_pending.try_push(pending);
                }
            }
        }
        self.pending_sends = still_pending;

        if let Some(offset) = self.last_offset_from_master.take() {
            let sync_interval = self.sync_interval();
            if let Some(action) = self.servo.process_sample(offset, sync_interval) {
                self.apply_servo_action(action, events);
            }
            if self.servo.oscillation_detected() {
                // The offending port isn't tracked per-sample; attribute the
                // event to the port currently acting as parent.
                if let Some(port) = self.ports.iter().position(|p| p.state().parent().is_some()) {
                    let _ = events.try_push(Event::OscillationDetected { port });
                }
            }
        }
    }

    /// The `Sync` interval of whichever port currently has a parent, or a
    /// one-second default while no port is synchronized to anything.
    fn sync_interval(&self) -> Duration {
        self.ports
            .iter()
            .find(|p| p.state().parent().is_some())
            .map(Port::sync_interval)
            .unwrap_or(Duration::from_nanos(1_000_000_000))
    }

    fn apply_servo_action(&mut self, action: ServoAction, events: &mut TickEvents) {
        match action {
            ServoAction::AdjustFrequency(ppb) => {
                if !self.clock.adjust_frequency(ppb) {
                    self.servo.mark_faulty();
                }
            }
            ServoAction::StepPhase(delta) => {
                self.clock.step_phase(delta);
                let _ = events.try_push(Event::ClockStepped);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DelayMechanism, InstanceConfig, PortConfig};
    use crate::datastructures::common::{ClockAccuracy, ClockIdentity, ClockQuality, PortIdentity, TimeSource};
    use crate::hal::RawMessage;

    struct NullNetwork;
    impl Network for NullNetwork {
        fn send(&mut self, _data: &[u8], _class: DestinationClass) -> Option<SendHandle> {
            None
        }
        fn try_recv(&mut self) -> Option<(crate::time::Instant, RawMessage)> {
            None
        }
        fn take_tx_timestamp(&mut self, _handle: SendHandle) -> Option<crate::time::Instant> {
            None
        }
        fn mtu(&self) -> usize {
            1500
        }
    }

    struct NullClock {
        now: crate::time::Instant,
    }
    impl Clock for NullClock {
        fn now(&self) -> crate::time::Instant {
            self.now
        }
        fn quality(&self) -> ClockQuality {
            ClockQuality {
                clock_class: 248,
                clock_accuracy: ClockAccuracy::Unknown,
                offset_scaled_log_variance: 0xffff,
            }
        }
        fn adjust_frequency(&mut self, _ppb: f64) -> bool {
            true
        }
        fn step_phase(&mut self, delta: Duration) {
            self.now = self.now + delta;
        }
        fn frequency_bound(&self) -> f64 {
            500_000.0
        }
    }

    struct NullTimer;
    impl Timer for NullTimer {
        fn arm(&mut self, _event: TimerEvent, _duration: core::time::Duration) {}
        fn cancel(&mut self, _event: TimerEvent) {}
        fn poll_expired(&mut self) -> Option<TimerEvent> {
            None
        }
    }

    fn instance_config() -> InstanceConfig {
        InstanceConfig {
            clock_identity: ClockIdentity([1; 8]),
            clock_quality: ClockQuality {
                clock_class: 6,
                clock_accuracy: ClockAccuracy::WithinNs100,
                offset_scaled_log_variance: 0,
            },
            priority_1: 128,
            priority_2: 128,
            domain_number: 0,
            slave_only: false,
        }
    }

    fn port_config() -> PortConfig {
        PortConfig {
            port_identity: PortIdentity {
                clock_identity: ClockIdentity([1; 8]),
                port_number: 1,
            },
            delay_mechanism: DelayMechanism::E2E { log_interval: 0 },
            log_announce_interval: 1,
            announce_receipt_timeout: 3,
            log_sync_interval: 0,
            master_only: false,
            delay_asymmetry: Duration::ZERO,
        }
    }

    /// A network fake that replays a fixed queue of pre-serialized datagrams,
    /// standing in for [`NullNetwork`] where a test needs `tick` to actually
    /// see inbound traffic rather than none.
    struct QueueNetwork {
        queue: std::collections::VecDeque<(crate::time::Instant, RawMessage)>,
    }

    impl QueueNetwork {
        fn new(messages: Vec<Message>) -> Self {
            let queue = messages
                .into_iter()
                .map(|message| {
                    let mut buffer = [0u8; MAX_MESSAGE_LEN];
                    let len = message.serialize(&mut buffer).unwrap();
                    let mut raw = RawMessage::new();
                    raw.try_extend_from_slice(&buffer[..len]).unwrap();
                    (crate::time::Instant::from_nanos(0), raw)
                })
                .collect();
            Self { queue }
        }
    }

    impl Network for QueueNetwork {
        fn send(&mut self, _data: &[u8], _class: DestinationClass) -> Option<SendHandle> {
            None
        }
        fn try_recv(&mut self) -> Option<(crate::time::Instant, RawMessage)> {
            self.queue.pop_front()
        }
        fn take_tx_timestamp(&mut self, _handle: SendHandle) -> Option<crate::time::Instant> {
            None
        }
        fn mtu(&self) -> usize {
            1500
        }
    }

    fn foreign_announce(identity: ClockIdentity, priority_1: u8, sequence_id: u16) -> Message {
        let header = crate::datastructures::messages::Header {
            source_port_identity: PortIdentity {
                clock_identity: identity,
                port_number: 1,
            },
            domain_number: 0,
            sequence_id,
            ..crate::datastructures::messages::Header::default()
        };
        let announce = crate::datastructures::messages::AnnounceMessage {
            origin_timestamp: crate::datastructures::common::WireTimestamp::default(),
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
        Message {
            header,
            body: MessageBody::Announce(announce),
        }
    }

    /// Regression test for the dataset-propagation fix: a real `tick()` fed
    /// two qualifying Announces from a better foreign master must not only
    /// move the port to `Slave`, it must populate `ParentDS`'s grandmaster
    /// fields, `TimePropertiesDS`, and `CurrentDS.steps_removed` from the
    /// winning Announce, not just `parent_ds.parent_port_identity`.
    #[test]
    fn winning_announce_populates_parent_and_time_properties_datasets() {
        let foreign_identity = ClockIdentity([2; 8]);
        let messages = vec![
            foreign_announce(foreign_identity, 10, 1),
            foreign_announce(foreign_identity, 10, 2),
        ];

        let mut default_ds = DefaultDS::new(instance_config(), 1);
        default_ds.priority_1 = 200;
        let time_properties_ds = TimePropertiesDS::new_arbitrary(false, false, TimeSource::InternalOscillator);

        let mut ports = ArrayVec::new();
        ports.push(Port::new(port_config()));
        let mut networks = ArrayVec::new();
        networks.push(QueueNetwork::new(messages));

        let mut instance = PtpInstance::new(
            default_ds,
            time_properties_ds,
            ports,
            networks,
            NullClock {
                now: crate::time::Instant::from_nanos(0),
            },
            NullTimer,
            ServoConfig::default(),
        )
        .unwrap();

        instance.tick();

        assert!(matches!(instance.port_state(0), Some(PortState::Uncalibrated { .. })));
        assert_eq!(instance.parent_ds().grandmaster_identity, foreign_identity);
        assert_eq!(instance.parent_ds().grandmaster_priority_1, 10);
        assert_eq!(instance.current_ds().steps_removed, 1);
        assert_eq!(instance.time_properties_ds().time_source, TimeSource::Gnss);
        assert_eq!(instance.time_properties_ds().current_utc_offset, 37);
    }

    #[test]
    fn empty_tick_produces_no_events_with_no_traffic() {
        let default_ds = DefaultDS::new(instance_config(), 1);
        let time_properties_ds = TimePropertiesDS::new_arbitrary(false, false, TimeSource::InternalOscillator);

        let mut ports = ArrayVec::new();
        ports.push(Port::new(port_config()));
        let mut networks = ArrayVec::new();
        networks.push(NullNetwork);

        let mut instance = PtpInstance::new(
            default_ds,
            time_properties_ds,
            ports,
            networks,
            NullClock {
                now: crate::time::Instant::from_nanos(0),
            },
            NullTimer,
            ServoConfig::default(),
        )
        .unwrap();

        assert!(instance.tick().is_empty());
    }
}
