//! A loopback demonstration host: two `ptp-core` instances, wired to each
//! other over an in-process [`LoopbackNetwork`](network::LoopbackNetwork)
//! instead of a real interface, ticking against each other until BMCA picks
//! a master and the servo on the other side converges. Grounded on
//! `statime-linux`'s `main.rs` (CLI shape, `build_instance` helper) with the
//! actual Linux networking/clock/async-runtime plumbing replaced by
//! synchronous, in-process equivalents a demo host can run anywhere.

mod clock;
mod config;
mod logging;
mod metrics;
mod network;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use arrayvec::ArrayVec;
use clap::Parser;
use ptp_core::config::{ClockAccuracy, ClockIdentity, ClockQuality, InstanceConfig, TimeSource};
use ptp_core::datastructures::common::PortIdentity;
use ptp_core::datastructures::datasets::{DefaultDS, TimePropertiesDS};
use ptp_core::instance::PtpInstance;
use ptp_core::port::Port;
use ptp_core::servo::ServoConfig;
use ptp_core::time::Duration;

use clock::{MonotonicTimer, SystemClock};
use config::Config;
use logging::LogLevel;
use metrics::{MetricsState, SharedMetrics};
use network::{loopback_pair, LoopbackNetwork};

/// How often the demo advances both instances. Real deployments drive
/// `tick()` from whatever scheduling the host already has (an event loop,
/// a periodic task); a plain sleep loop is enough for a demonstration.
const TICK_INTERVAL: StdDuration = StdDuration::from_millis(50);

#[derive(Parser, Debug)]
#[command(author, version, about = "Loopback demonstration host for ptp-core", long_about = None)]
struct Args {
    /// Optional TOML config providing the shared port/domain settings both
    /// demo clocks run with (see `config.rs`). Their priorities and
    /// identities are still fixed by the demo so BMCA has a clear winner.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = LogLevel::Info)]
    loglevel: LogLevel,

    #[arg(long, default_value = "127.0.0.1:9975")]
    metrics_listen: SocketAddr,
}

type DemoInstance = PtpInstance<LoopbackNetwork, SystemClock, MonotonicTimer>;

fn main() {
    let args = Args::parse();
    logging::init(args.loglevel);

    let port_config = match &args.config {
        Some(path) => match Config::from_file(path) {
            Ok(config) => config.ports.first().copied().unwrap_or_else(config::PortConfig::default_demo),
            Err(err) => {
                log::error!("failed to load {}: {err}", path.display());
                std::process::exit(1);
            }
        },
        None => config::PortConfig::default_demo(),
    };

    let (network_a, network_b) = loopback_pair();

    // Clock A starts as a better candidate (lower priority1 wins ties) and
    // ahead of wall-clock time by a second, so convergence is visible.
    let mut instance_a = build_instance(
        ClockIdentity([0xa0; 8]),
        128,
        port_config,
        network_a,
        SystemClock::new(Duration::from_nanos(1_000_000_000)),
    );
    let mut instance_b = build_instance(
        ClockIdentity([0xb0; 8]),
        255,
        port_config,
        network_b,
        SystemClock::new(Duration::ZERO),
    );

    let metrics_state: SharedMetrics = Arc::new(Mutex::new(MetricsState::default()));
    if let Err(err) = metrics::spawn(args.metrics_listen, metrics_state.clone()) {
        log::warn!("metrics exporter disabled: {err}");
    }

    log::info!("ticking two loopback clocks against each other, press ctrl-c to stop");
    loop {
        for event in instance_a.tick() {
            log::info!("[a] {event}");
        }
        for event in instance_b.tick() {
            log::info!("[b] {event}");
        }

        if let Ok(mut state) = metrics_state.lock() {
            state.default_ds = Some(*instance_a.default_ds());
            state.parent_ds = Some(*instance_a.parent_ds());
            state.current_ds = Some(*instance_a.current_ds());
            state.snapshot = Some(instance_a.snapshot());
        }

        std::thread::sleep(TICK_INTERVAL);
    }
}

fn build_instance(
    clock_identity: ClockIdentity,
    priority_1: u8,
    port_config: config::PortConfig,
    network: LoopbackNetwork,
    clock: SystemClock,
) -> DemoInstance {
    let instance_config = InstanceConfig {
        clock_identity,
        clock_quality: ClockQuality {
            clock_class: 248,
            clock_accuracy: ClockAccuracy::Unknown,
            offset_scaled_log_variance: 0xffff,
        },
        priority_1,
        priority_2: 128,
        domain_number: 0,
        slave_only: false,
    };
    let default_ds = DefaultDS::new(instance_config, 1);
    let time_properties_ds = TimePropertiesDS::new_arbitrary(false, false, TimeSource::InternalOscillator);

    let port_identity = PortIdentity { clock_identity, port_number: 1 };
    let mut ports = ArrayVec::new();
    ports.push(Port::new(port_config.into_engine_config(port_identity)));
    let mut networks = ArrayVec::new();
    networks.push(network);

    PtpInstance::new(default_ds, time_properties_ds, ports, networks, clock, MonotonicTimer::new(), ServoConfig::default())
        .expect("one port paired with one network transport always constructs")
}
