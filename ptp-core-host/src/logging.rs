//! Logging setup: a `tracing` subscriber driven by `RUST_LOG`, with `log`
//! records from `ptp-core` (which only depends on the `log` facade, never
//! `tracing`) bridged in via `tracing-log`.

use serde::Deserialize;

/// Default verbosity, settable from the CLI or config file. Independent of
/// `RUST_LOG`, which always wins when set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Installs the global subscriber. Must be called once, before any `log::`
/// or `tracing::` call that should be captured.
pub fn init(default_level: LogLevel) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level.as_str()));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing_log::LogTracer::init().expect("tracing-log can only be installed once");
}
