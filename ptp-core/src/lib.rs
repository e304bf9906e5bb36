//! Core engine for an IEEE 1588-2019 Precision Time Protocol ordinary/boundary
//! clock: port state machine, best master clock algorithm, delay/offset
//! estimator and clock servo.
//!
//! The crate is transport-, timestamping- and clock-agnostic: all of those
//! are injected through the traits in [`hal`]. Nothing in here opens a
//! socket, reads the wall clock or touches a file.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

pub mod bmc;
pub mod config;
pub mod datastructures;
pub mod error;
pub mod estimator;
pub mod hal;
pub mod instance;
pub mod observability;
pub mod port;
pub mod servo;
pub mod time;

pub use error::Error;
pub use instance::PtpInstance;

/// Events visible to a host driving a [`PtpInstance`], primarily useful for
/// logging and telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A port changed [`PortState`](crate::port::PortState).
    PortStateChange { port: usize },
    /// The best master clock algorithm selected a new parent.
    NewParent,
    /// The servo stepped the clock phase instead of slewing it.
    ClockStepped,
    /// A sync cycle did not complete within the configured ceiling.
    EstimatorTimeout { port: usize },
    /// A sync cycle produced timestamps that violate ordering constraints.
    ImplausibleTimestamps { port: usize },
    /// The servo detected a ringing offset and reduced its gains.
    OscillationDetected { port: usize },
}

impl core::fmt::Display for Event {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Event::PortStateChange { port } => write!(f, "port {port} changed state"),
            Event::NewParent => write!(f, "best master clock algorithm selected a new parent"),
            Event::ClockStepped => write!(f, "clock was stepped"),
            Event::EstimatorTimeout { port } => write!(f, "port {port} sync cycle timed out"),
            Event::ImplausibleTimestamps { port } => {
                write!(f, "port {port} observed implausible timestamps")
            }
            Event::OscillationDetected { port } => {
                write!(f, "port {port} servo detected oscillation")
            }
        }
    }
}
