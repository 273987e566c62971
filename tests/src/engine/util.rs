use std::collections::{HashMap, VecDeque};
use std::net::Ipv4Addr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use arpmon_common::network::range::Subnet;
use arpmon_core::scanner::{EngineSettings, ProbeError, ProbeOutcome, Prober};
use async_trait::async_trait;
use pnet::util::MacAddr;

pub const OWN: u8 = 50;

pub fn subnet() -> Subnet {
    Subnet::new(192, 168, 7)
}

pub fn own_mac() -> MacAddr {
    MacAddr::new(0x02, 0, 0, 0, 0, OWN)
}

pub fn mac(octet: u8) -> MacAddr {
    MacAddr::new(0x10, 0x20, 0x30, 0x40, 0x50, octet)
}

pub fn settings(workers: usize, cadence: Duration) -> EngineSettings {
    EngineSettings {
        subnet: subnet(),
        own_octet: OWN,
        own_mac: own_mac(),
        workers,
        wait_cadence: cadence,
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Reply {
    Answer(MacAddr),
    Silence,
    Failure,
}

/// Answers probes from per-address scripts. Addresses without a script, or
/// whose script ran out, stay silent.
pub struct ScriptedProber {
    scripts: Mutex<HashMap<u8, VecDeque<Reply>>>,
    delay: Duration,
    seen: Mutex<Vec<u8>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedProber {
    pub fn new(delay: Duration) -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            delay,
            seen: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn script(self, octet: u8, replies: &[Reply]) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(octet, replies.iter().copied().collect());
        self
    }

    pub fn seen(&self) -> Vec<u8> {
        self.seen.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Prober for ScriptedProber {
    async fn probe(&self, target: Ipv4Addr) -> ProbeOutcome {
        let octet = target.octets()[3];
        self.seen.lock().unwrap().push(octet);

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let reply = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&octet)
            .and_then(VecDeque::pop_front)
            .unwrap_or(Reply::Silence);

        match reply {
            Reply::Answer(mac) => ProbeOutcome::Resolved {
                mac,
                latency: self.delay,
            },
            Reply::Silence => ProbeOutcome::Timeout,
            Reply::Failure => ProbeOutcome::Ignored(ProbeError::Task("scripted failure".into())),
        }
    }
}
