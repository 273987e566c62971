use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use arpmon_common::network::host::HostRecord;
use arpmon_common::network::range::{ADDRESS_COUNT, ADDRESS_FIRST, ADDRESS_LAST};
use arpmon_core::scanner::ScanEngine;
use tokio::time::{sleep, Instant};

use super::util::{mac, own_mac, settings, Reply, ScriptedProber, OWN};

/*************************************************************
                  Table updates from outcomes
**************************************************************/

#[tokio::test(start_paused = true)]
async fn timeout_clears_entry_and_ignored_keeps_it() {
    // One address per worker, so each address is probed once per cadence.
    let prober = Arc::new(ScriptedProber::new(Duration::ZERO).script(
        7,
        &[Reply::Answer(mac(7)), Reply::Failure, Reply::Silence],
    ));
    let engine = ScanEngine::start(settings(ADDRESS_COUNT, Duration::from_secs(10)), prober);
    let table = engine.table();

    sleep(Duration::from_secs(5)).await;
    assert_eq!(table.get(7), HostRecord::Resolved(mac(7)));

    sleep(Duration::from_secs(10)).await;
    assert_eq!(table.get(7), HostRecord::Resolved(mac(7)), "ignored probe changed the entry");

    sleep(Duration::from_secs(10)).await;
    assert_eq!(table.get(7), HostRecord::Absent);

    assert_eq!(engine.shutdown().await, ADDRESS_COUNT);
}

#[tokio::test(start_paused = true)]
async fn sweep_resolves_scripted_hosts_and_skips_own_address() {
    let answers = [Reply::Answer(mac(1)); 4];
    let prober = Arc::new(
        ScriptedProber::new(Duration::ZERO)
            .script(1, &answers)
            .script(100, &[Reply::Answer(mac(100)); 4])
            .script(ADDRESS_LAST, &[Reply::Answer(mac(ADDRESS_LAST)); 4]),
    );
    let engine = ScanEngine::start(settings(4, Duration::from_secs(1)), Arc::clone(&prober) as _);
    let table = engine.table();

    // Longest segment is 64 addresses at one probe per second.
    sleep(Duration::from_secs(70)).await;

    let seen: BTreeSet<u8> = prober.seen().into_iter().collect();
    assert!(!seen.contains(&OWN), "own address was probed");
    let expected: BTreeSet<u8> = (ADDRESS_FIRST..=ADDRESS_LAST).filter(|o| *o != OWN).collect();
    assert_eq!(seen, expected);

    assert_eq!(table.snapshot().len(), ADDRESS_COUNT);
    assert_eq!(table.get(OWN), HostRecord::Resolved(own_mac()));
    assert_eq!(table.get(1), HostRecord::Resolved(mac(1)));
    assert_eq!(table.get(100), HostRecord::Resolved(mac(100)));
    assert_eq!(table.get(ADDRESS_LAST), HostRecord::Resolved(mac(ADDRESS_LAST)));
    assert_eq!(table.resolved_count(), 4);

    assert_eq!(engine.shutdown().await, 4);
}

#[tokio::test(start_paused = true)]
async fn worker_waits_cadence_between_probes() {
    let prober = Arc::new(ScriptedProber::new(Duration::ZERO));
    let engine = ScanEngine::start(settings(1, Duration::from_secs(12)), Arc::clone(&prober) as _);

    sleep(Duration::from_secs(55)).await;
    assert_eq!(prober.seen(), vec![1, 2, 3, 4, 5]);

    assert_eq!(engine.shutdown().await, 1);
}

/*************************************************************
                     Concurrency and locking
**************************************************************/

#[tokio::test(start_paused = true)]
async fn workers_probe_in_parallel() {
    let prober = Arc::new(ScriptedProber::new(Duration::from_secs(2)));
    let engine = ScanEngine::start(settings(8, Duration::from_secs(1)), Arc::clone(&prober) as _);

    sleep(Duration::from_secs(1)).await;
    assert_eq!(prober.max_in_flight(), 8);

    assert_eq!(engine.shutdown().await, 8);
}

#[tokio::test(start_paused = true)]
async fn readers_are_not_blocked_by_in_flight_probes() {
    let prober = Arc::new(ScriptedProber::new(Duration::from_secs(6)));
    let engine = ScanEngine::start(settings(2, Duration::from_secs(12)), Arc::clone(&prober) as _);
    let table = engine.table();

    sleep(Duration::from_secs(1)).await;
    assert_eq!(prober.max_in_flight(), 2);
    assert_eq!(table.snapshot().len(), ADDRESS_COUNT);
    assert_eq!(table.get(OWN), HostRecord::Resolved(own_mac()));

    assert_eq!(engine.shutdown().await, 2);
}

/*************************************************************
                            Shutdown
**************************************************************/

#[tokio::test(start_paused = true)]
async fn shutdown_mid_probe_waits_only_for_the_probe() {
    let probe_time = Duration::from_secs(6);
    let prober = Arc::new(ScriptedProber::new(probe_time));
    let engine = ScanEngine::start(settings(16, Duration::from_secs(12)), prober);

    sleep(Duration::from_secs(3)).await;
    let started = Instant::now();
    assert_eq!(engine.shutdown().await, 16);
    assert!(started.elapsed() <= probe_time);
}

#[tokio::test(start_paused = true)]
async fn shutdown_during_wait_is_immediate() {
    let prober = Arc::new(ScriptedProber::new(Duration::ZERO));
    let engine = ScanEngine::start(settings(4, Duration::from_secs(3600)), prober);

    sleep(Duration::from_secs(5)).await;
    let started = Instant::now();
    assert_eq!(engine.shutdown().await, 4);
    assert!(started.elapsed() < Duration::from_secs(1));
}

/*************************************************************
                        Segment coverage
**************************************************************/

#[tokio::test(start_paused = true)]
async fn segments_cover_every_address_exactly_once() {
    for workers in [1, 3, 4, 7, 64, ADDRESS_COUNT] {
        let prober = Arc::new(ScriptedProber::new(Duration::ZERO));
        let engine = ScanEngine::start(settings(workers, Duration::from_secs(60)), prober);

        let segments = engine.segments().to_vec();
        assert_eq!(segments.len(), workers);

        let mut covered: Vec<u8> = segments.iter().flat_map(|s| s.iter()).collect();
        assert_eq!(covered.len(), ADDRESS_COUNT, "{workers} workers overlap or leave gaps");
        covered.sort_unstable();
        covered.dedup();
        assert_eq!(covered.len(), ADDRESS_COUNT, "{workers} workers overlap");

        let sizes: BTreeSet<usize> = segments.iter().map(|s| s.size()).collect();
        assert!(sizes.len() <= 2, "unbalanced segments for {workers} workers: {sizes:?}");

        assert_eq!(engine.shutdown().await, workers);
    }
}
