//! The continuous scanning engine.
//!
//! A [`ScanEngine`] splits the address range into one segment per worker,
//! spawns the workers and hands the shared [`HostTable`] to whoever needs to
//! read it. Each worker drives a [`Prober`] over its segment forever, pausing
//! between probes, until the [`shutdown::ShutdownCoordinator`] hands it a stop
//! token.
//!
//! **Probe outcomes** are classified three ways and only an explicit timeout
//! counts as evidence that a host is gone:
//!
//! | outcome    | table effect                  |
//! |------------|-------------------------------|
//! | `Resolved` | entry set to the replied MAC  |
//! | `Timeout`  | entry reset to absent         |
//! | `Ignored`  | entry left as it was          |

use std::io;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use arpmon_common::config::Config;
use arpmon_common::network::range::{self, Segment, Subnet};
use arpmon_protocols::PacketError;
use async_trait::async_trait;
use pnet::util::MacAddr;
use thiserror::Error;
use tracing::info;

use crate::table::HostTable;

pub mod arp;
pub mod shutdown;
mod worker;

use shutdown::ShutdownCoordinator;
use worker::ScanWorker;

/// Failures that say nothing about whether the target is alive.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("opening channel on {interface}: {source}")]
    Channel {
        interface: String,
        #[source]
        source: io::Error,
    },
    #[error("non-ethernet channel for {0}")]
    NonEthernet(String),
    #[error("sending ARP request: {0}")]
    Send(#[source] io::Error),
    #[error("channel did not send the ARP request")]
    NotSent,
    #[error("receiving frame: {0}")]
    Receive(#[source] io::Error),
    #[error(transparent)]
    Packet(#[from] PacketError),
    #[error("probe task failed: {0}")]
    Task(String),
}

#[derive(Debug)]
pub enum ProbeOutcome {
    Resolved { mac: MacAddr, latency: Duration },
    /// No reply within the probe timeout.
    Timeout,
    Ignored(ProbeError),
}

/// Sends one address-resolution probe and classifies the result.
///
/// Implementations must return within their own timeout; workers never cancel
/// an in-flight probe.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, target: Ipv4Addr) -> ProbeOutcome;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub subnet: Subnet,
    pub own_octet: u8,
    pub own_mac: MacAddr,
    pub workers: usize,
    pub wait_cadence: Duration,
}

impl From<&Config> for EngineSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            subnet: cfg.subnet,
            own_octet: cfg.own_octet,
            own_mac: cfg.own_mac,
            workers: cfg.workers,
            wait_cadence: cfg.wait_cadence,
        }
    }
}

pub struct ScanEngine {
    table: Arc<HostTable>,
    segments: Vec<Segment>,
    coordinator: ShutdownCoordinator,
}

impl ScanEngine {
    /// Builds the table, partitions the range and spawns one worker task per
    /// segment. Must be called from within a tokio runtime.
    pub fn start(settings: EngineSettings, prober: Arc<dyn Prober>) -> Self {
        let table = Arc::new(HostTable::new(settings.own_octet, settings.own_mac));
        let segments: Vec<Segment> = range::partition(settings.workers);
        let (mut coordinator, listener) = ShutdownCoordinator::new(segments.len());

        for (id, segment) in segments.iter().enumerate() {
            let worker = ScanWorker {
                id,
                segment: *segment,
                subnet: settings.subnet,
                own_octet: settings.own_octet,
                cadence: settings.wait_cadence,
                table: Arc::clone(&table),
                prober: Arc::clone(&prober),
                shutdown: listener.clone(),
            };
            coordinator.track(tokio::spawn(worker.run()));
        }

        info!(
            subnet = %settings.subnet,
            workers = segments.len(),
            cadence_secs = settings.wait_cadence.as_secs_f64(),
            "scan engine started"
        );

        Self {
            table,
            segments,
            coordinator,
        }
    }

    pub fn table(&self) -> Arc<HostTable> {
        Arc::clone(&self.table)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Stops every worker and waits for all of them to exit. Returns the number
    /// of workers that exited cleanly.
    pub async fn shutdown(self) -> usize {
        self.coordinator.shutdown().await
    }
}
