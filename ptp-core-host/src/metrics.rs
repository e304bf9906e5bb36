//! A hand-rolled Prometheus text-exposition endpoint, grounded on
//! `statime-linux`'s `metrics::format` module — same metric naming
//! (`ptp_<name>[_<unit>]`, `# HELP`/`# TYPE` lines) and the same
//! write-the-whole-response-into-a-`String` approach, served synchronously
//! since this host carries no async runtime.

use std::fmt::Write;
use std::io::Write as _;
use std::net::{SocketAddr, TcpListener};
use std::sync::{Arc, Mutex};

use ptp_core::datastructures::datasets::{CurrentDS, DefaultDS, ParentDS};
use ptp_core::observability::Snapshot;

/// Everything the exporter reads each time it is scraped. The main loop
/// refreshes this after every `tick()`.
#[derive(Default)]
pub struct MetricsState {
    pub default_ds: Option<DefaultDS>,
    pub parent_ds: Option<ParentDS>,
    pub current_ds: Option<CurrentDS>,
    pub snapshot: Option<Snapshot>,
}

pub type SharedMetrics = Arc<Mutex<MetricsState>>;

/// Spawns a blocking accept loop on its own thread. Each connection gets
/// exactly one response and is then closed, matching a scrape's one-shot
/// request/response shape.
pub fn spawn(addr: SocketAddr, state: SharedMetrics) -> std::io::Result<std::thread::JoinHandle<()>> {
    let listener = TcpListener::bind(addr)?;
    log::info!("metrics exporter listening on {addr}");

    Ok(std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let mut response = String::with_capacity(4 * 1024);
            if let Ok(guard) = state.lock() {
                if format_response(&mut response, &guard).is_err() {
                    continue;
                }
            }
            let _ = stream.write_all(response.as_bytes());
        }
    }))
}

fn format_response(buf: &mut String, state: &MetricsState) -> std::fmt::Result {
    let mut body = String::with_capacity(4 * 1024);
    format_body(&mut body, state)?;

    buf.push_str("HTTP/1.1 200 OK\r\n");
    buf.push_str("content-type: text/plain\r\n");
    write!(buf, "content-length: {}\r\n\r\n", body.len())?;
    buf.push_str(&body);
    Ok(())
}

fn format_body(w: &mut impl Write, state: &MetricsState) -> std::fmt::Result {
    let labels = match &state.default_ds {
        Some(default_ds) => vec![("clock_identity", default_ds.clock_identity.to_string())],
        None => vec![],
    };

    if let Some(default_ds) = &state.default_ds {
        format_metric(w, "priority_1", "priority 1 used in the BMCA", labels.clone(), default_ds.priority_1)?;
        format_metric(w, "priority_2", "priority 2 used in the BMCA", labels.clone(), default_ds.priority_2)?;
        format_metric(
            w,
            "quality_class",
            "the PTP clock class",
            labels.clone(),
            default_ds.clock_quality.clock_class,
        )?;
    }

    if let Some(current_ds) = &state.current_ds {
        format_metric(w, "steps_removed", "paths traversed to the grandmaster", labels.clone(), current_ds.steps_removed)?;
        format_metric_nanos(w, "offset_from_master", "offset from the current parent", labels.clone(), current_ds.offset_from_master.nanos())?;
        format_metric_nanos(w, "mean_path_delay", "mean one-way path delay to the current parent", labels.clone(), current_ds.mean_path_delay.nanos())?;
    }

    if let Some(parent_ds) = &state.parent_ds {
        format_metric(
            w,
            "grandmaster_priority_1",
            "priority 1 of the current grandmaster",
            labels.clone(),
            parent_ds.grandmaster_priority_1,
        )?;
    }

    if let Some(snapshot) = &state.snapshot {
        format_metric(w, "bmca_selections_total", "BMCA runs performed", labels.clone(), snapshot.counters.bmca_selections)?;
        format_metric(w, "announces_received_total", "Announce messages received", labels.clone(), snapshot.counters.announces_rx)?;
        format_metric(w, "syncs_received_total", "Sync messages received", labels.clone(), snapshot.counters.syncs_rx)?;
        format_metric(w, "parse_errors_total", "datagrams rejected by the codec", labels.clone(), snapshot.counters.parse_errors)?;
    }

    w.write_str("# EOF\n")
}

fn format_metric<T: std::fmt::Display>(
    w: &mut impl Write,
    name: &str,
    help: &str,
    labels: Vec<(&'static str, String)>,
    value: T,
) -> std::fmt::Result {
    let name = format!("ptp_{name}");
    writeln!(w, "# HELP {name} {help}.")?;
    writeln!(w, "# TYPE {name} gauge")?;
    write_measurement(w, &name, &labels, value)
}

fn format_metric_nanos<T: std::fmt::Display>(
    w: &mut impl Write,
    name: &str,
    help: &str,
    labels: Vec<(&'static str, String)>,
    value: T,
) -> std::fmt::Result {
    let name = format!("ptp_{name}_nanoseconds");
    writeln!(w, "# HELP {name} {help}.")?;
    writeln!(w, "# TYPE {name} gauge")?;
    writeln!(w, "# UNIT {name} nanoseconds")?;
    write_measurement(w, &name, &labels, value)
}

fn write_measurement<T: std::fmt::Display>(
    w: &mut impl Write,
    name: &str,
    labels: &[(&'static str, String)],
    value: T,
) -> std::fmt::Result {
    w.write_str(name)?;
    if !labels.is_empty() {
        w.write_str("{")?;
        for (offset, (label, value)) in labels.iter().enumerate() {
            if offset > 0 {
                w.write_str(",")?;
            }
            let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
            write!(w, "{label}=\"{escaped}\"")?;
        }
        w.write_str("}")?;
    }
    writeln!(w, " {value}")
}
