use std::net::Ipv4Addr;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use arpmon_common::network::host::HostRecord;
use arpmon_common::network::range::{Segment, Subnet};
use tracing::{debug, info, trace};

use super::shutdown::ShutdownListener;
use super::{ProbeOutcome, Prober};
use crate::table::HostTable;

/// Probes one segment round robin until told to stop.
pub(super) struct ScanWorker {
    pub id: usize,
    pub segment: Segment,
    pub subnet: Subnet,
    pub own_octet: u8,
    pub cadence: Duration,
    pub table: Arc<HostTable>,
    pub prober: Arc<dyn Prober>,
    pub shutdown: ShutdownListener,
}

impl ScanWorker {
    pub async fn run(self) {
        info!(worker = self.id, segment = %self.segment, "worker started");

        'scan: loop {
            let mut probed = false;
            for octet in self.segment.iter() {
                if octet == self.own_octet {
                    continue;
                }
                self.probe(octet).await;
                probed = true;
                if self.wait().await.is_break() {
                    break 'scan;
                }
            }
            // A segment holding only the own address still paces itself.
            if !probed && self.wait().await.is_break() {
                break 'scan;
            }
        }

        info!(worker = self.id, "worker stopped");
    }

    /// Runs one probe and commits its outcome. The table lock is only taken
    /// after the probe has returned.
    async fn probe(&self, octet: u8) {
        let target: Ipv4Addr = self.subnet.host(octet);
        match self.prober.probe(target).await {
            ProbeOutcome::Resolved { mac, latency } => {
                trace!(
                    worker = self.id,
                    %target,
                    %mac,
                    latency_us = latency.as_micros() as u64,
                    "resolved"
                );
                self.table.set(octet, HostRecord::Resolved(mac));
            }
            ProbeOutcome::Timeout => {
                trace!(worker = self.id, %target, "no reply");
                self.table.set(octet, HostRecord::Absent);
            }
            ProbeOutcome::Ignored(e) => {
                debug!(worker = self.id, %target, "probe ignored: {e}");
            }
        }
    }

    /// Waits out the cadence unless a stop token arrives first.
    async fn wait(&self) -> ControlFlow<()> {
        tokio::select! {
            biased;
            _ = self.shutdown.recv() => ControlFlow::Break(()),
            _ = tokio::time::sleep(self.cadence) => ControlFlow::Continue(()),
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::ProbeError;
    use crate::scanner::shutdown::ShutdownCoordinator;
    use async_trait::async_trait;
    use pnet::util::MacAddr;
    use std::sync::Mutex;

    const OWN: u8 = 3;

    /// Replays one scripted outcome per call and records every target.
    struct Scripted {
        outcomes: Mutex<Vec<ProbeOutcome>>,
        seen: Mutex<Vec<Ipv4Addr>>,
    }

    impl Scripted {
        fn new(mut outcomes: Vec<ProbeOutcome>) -> Self {
            outcomes.reverse();
            Self {
                outcomes: Mutex::new(outcomes),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn seen(&self) -> Vec<Ipv4Addr> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Prober for Scripted {
        async fn probe(&self, target: Ipv4Addr) -> ProbeOutcome {
            self.seen.lock().unwrap().push(target);
            self.outcomes
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(ProbeOutcome::Timeout)
        }
    }

    fn worker(
        segment: Segment,
        cadence: Duration,
        prober: Arc<Scripted>,
        table: Arc<HostTable>,
        shutdown: ShutdownListener,
    ) -> ScanWorker {
        ScanWorker {
            id: 0,
            segment,
            subnet: Subnet::new(10, 0, 0),
            own_octet: OWN,
            cadence,
            table,
            prober,
            shutdown,
        }
    }

    fn own_mac() -> MacAddr {
        MacAddr::new(0xaa, 0, 0, 0, 0, 0x01)
    }

    #[tokio::test(start_paused = true)]
    async fn skips_own_address_and_commits_outcomes() {
        let mac = MacAddr::new(2, 2, 2, 2, 2, 2);
        let table = Arc::new(HostTable::new(OWN, own_mac()));
        table.set(4, HostRecord::Resolved(MacAddr::new(9, 9, 9, 9, 9, 9)));
        table.set(5, HostRecord::Resolved(mac));

        let prober = Arc::new(Scripted::new(vec![
            ProbeOutcome::Resolved {
                mac,
                latency: Duration::from_millis(1),
            },
            ProbeOutcome::Timeout,
            ProbeOutcome::Ignored(ProbeError::Task("gone".into())),
        ]));
        let (mut coordinator, listener) = ShutdownCoordinator::new(1);
        let w = worker(
            Segment::new(2, 5),
            Duration::from_secs(12),
            Arc::clone(&prober),
            Arc::clone(&table),
            listener,
        );
        coordinator.track(tokio::spawn(w.run()));

        // Three probes with two full waits in between.
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(coordinator.shutdown().await, 1);

        assert_eq!(
            prober.seen(),
            vec![
                Ipv4Addr::new(10, 0, 0, 2),
                Ipv4Addr::new(10, 0, 0, 4),
                Ipv4Addr::new(10, 0, 0, 5),
            ]
        );
        assert_eq!(table.get(2), HostRecord::Resolved(mac));
        assert_eq!(table.get(4), HostRecord::Absent);
        assert_eq!(table.get(5), HostRecord::Resolved(mac));
        assert_eq!(table.get(OWN), HostRecord::Resolved(own_mac()));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_token_interrupts_the_wait() {
        let table = Arc::new(HostTable::new(OWN, own_mac()));
        let prober = Arc::new(Scripted::new(vec![]));
        let (mut coordinator, listener) = ShutdownCoordinator::new(1);
        let w = worker(
            Segment::new(10, 20),
            Duration::from_secs(3600),
            Arc::clone(&prober),
            table,
            listener,
        );
        coordinator.track(tokio::spawn(w.run()));
        tokio::task::yield_now().await;

        let started = tokio::time::Instant::now();
        assert_eq!(coordinator.shutdown().await, 1);
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(prober.seen().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn own_only_segment_waits_without_probing() {
        let table = Arc::new(HostTable::new(OWN, own_mac()));
        let prober = Arc::new(Scripted::new(vec![]));
        let (mut coordinator, listener) = ShutdownCoordinator::new(1);
        let w = worker(
            Segment::new(OWN, OWN),
            Duration::from_secs(12),
            Arc::clone(&prober),
            table,
            listener,
        );
        coordinator.track(tokio::spawn(w.run()));

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(coordinator.shutdown().await, 1);
        assert!(prober.seen().is_empty());
    }
}
