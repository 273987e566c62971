//! ARP probing over a raw layer 2 channel.
//!
//! Each probe opens its own channel, broadcasts one "who has" request and
//! listens for the target's reply until the probe timeout expires. The
//! blocking socket work runs on tokio's blocking pool.

use std::io::ErrorKind;
use std::net::Ipv4Addr;
use std::time::{Duration, Instant};

use arpmon_common::config::Config;
use arpmon_protocols::arp;
use async_trait::async_trait;
use pnet::datalink::{DataLinkReceiver, DataLinkSender, NetworkInterface};
use pnet::util::MacAddr;
use tracing::debug;

use super::{ProbeError, ProbeOutcome, Prober};
use crate::network::channel;
use crate::network::interface::{self, InterfaceError};

#[derive(Debug, Clone)]
pub struct ArpProber {
    interface: NetworkInterface,
    src_mac: MacAddr,
    src_ip: Ipv4Addr,
    timeout: Duration,
}

impl ArpProber {
    pub fn new(
        interface: NetworkInterface,
        src_mac: MacAddr,
        src_ip: Ipv4Addr,
        timeout: Duration,
    ) -> Self {
        Self {
            interface,
            src_mac,
            src_ip,
            timeout,
        }
    }

    pub fn from_config(cfg: &Config) -> Result<Self, InterfaceError> {
        let intf = interface::find_interface(cfg.interface.as_deref(), cfg.own_ip)?;
        debug!(interface = %intf.name, "selected probe interface");
        Ok(Self::new(intf, cfg.own_mac, cfg.own_ip, cfg.probe_timeout))
    }

    pub fn interface_name(&self) -> &str {
        &self.interface.name
    }

    /// Opens and immediately closes a channel, surfacing permission problems
    /// before the first worker runs.
    pub fn check_channel(&self) -> Result<(), ProbeError> {
        channel::open(&self.interface).map(|_| ())
    }
}

#[async_trait]
impl Prober for ArpProber {
    async fn probe(&self, target: Ipv4Addr) -> ProbeOutcome {
        let prober = self.clone();
        let task = tokio::task::spawn_blocking(move || {
            let (mut tx, mut rx) = match channel::open(&prober.interface) {
                Ok(pair) => pair,
                Err(e) => return ProbeOutcome::Ignored(e),
            };
            arping(
                tx.as_mut(),
                rx.as_mut(),
                prober.src_mac,
                prober.src_ip,
                target,
                prober.timeout,
            )
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(e) => ProbeOutcome::Ignored(ProbeError::Task(e.to_string())),
        }
    }
}

/// Sends one request for `target` and waits up to `timeout` for its reply.
///
/// Replies from other hosts and unrelated frames are skipped. Read timeouts on
/// `rx` only re-check the deadline; any other receive error ends the probe as
/// ignored.
pub fn arping(
    tx: &mut dyn DataLinkSender,
    rx: &mut dyn DataLinkReceiver,
    src_mac: MacAddr,
    src_ip: Ipv4Addr,
    target: Ipv4Addr,
    timeout: Duration,
) -> ProbeOutcome {
    let request = match arp::create_request(src_mac, src_ip, target) {
        Ok(frame) => frame,
        Err(e) => return ProbeOutcome::Ignored(e.into()),
    };

    let started = Instant::now();
    match tx.send_to(&request, None) {
        Some(Ok(())) => {}
        Some(Err(e)) => return ProbeOutcome::Ignored(ProbeError::Send(e)),
        None => return ProbeOutcome::Ignored(ProbeError::NotSent),
    }

    let deadline = started + timeout;
    while Instant::now() < deadline {
        match rx.next() {
            Ok(frame) => match arp::parse_reply(frame) {
                Ok(Some(reply)) if reply.sender_ip == target => {
                    return ProbeOutcome::Resolved {
                        mac: reply.sender_mac,
                        latency: started.elapsed(),
                    };
                }
                Ok(_) => {}
                Err(e) => debug!(%target, "skipping frame: {e}"),
            },
            Err(e)
                if matches!(
                    e.kind(),
                    ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                ) => {}
            Err(e) => return ProbeOutcome::Ignored(ProbeError::Receive(e)),
        }
    }

    ProbeOutcome::Timeout
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
