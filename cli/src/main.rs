mod commands;
mod server;
mod terminal;

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use arpmon_common::config::Config;
use arpmon_core::scanner::arp::ArpProber;
use arpmon_core::scanner::{EngineSettings, ScanEngine};
use commands::CommandLine;
use server::AppState;
use terminal::logging;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

const HTTP_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    logging::init_logging(commands.log_level.as_deref());

    let cfg = match Config::new(commands.raw_config()) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    info!(
        version = env!("CARGO_PKG_VERSION"),
        subnet = %cfg.subnet,
        own_ip = %cfg.own_ip,
        workers = cfg.workers,
        "Starting arpmon"
    );

    if !is_root::is_root() {
        warn!("not running as root, opening raw sockets will most likely fail");
    }

    let prober = ArpProber::from_config(&cfg).context("selecting probe interface")?;
    info!(interface = prober.interface_name(), "probing via interface");
    if let Err(e) = prober.check_channel() {
        warn!("{e}; probes will be ignored until the channel can be opened");
    }

    let engine = ScanEngine::start(EngineSettings::from(&cfg), Arc::new(prober));
    let table = engine.table();

    let http_shutdown = CancellationToken::new();
    let state = AppState {
        table: Arc::clone(&table),
        subnet: cfg.subnet,
    };
    let bind_addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, cfg.port));
    let mut web = tokio::spawn(server::start_web_server(
        bind_addr,
        cfg.url_base.clone(),
        state,
        http_shutdown.clone(),
    ));

    tokio::select! {
        _ = shutdown_signal() => info!("shutdown signal received"),
        result = &mut web => {
            // The server only returns early when it could not start or crashed.
            let failure = match result {
                Ok(Ok(())) => anyhow::anyhow!("web server exited unexpectedly"),
                Ok(Err(e)) => e,
                Err(e) => e.into(),
            };
            error!("{failure:#}");
            engine.shutdown().await;
            return Err(failure);
        }
    }

    http_shutdown.cancel();
    let (joined, drained) = tokio::join!(
        engine.shutdown(),
        tokio::time::timeout(HTTP_DRAIN_TIMEOUT, web)
    );

    match drained {
        Ok(Ok(Ok(()))) => {}
        Ok(Ok(Err(e))) => error!("web server error: {e:#}"),
        Ok(Err(e)) => error!("web server task failed: {e}"),
        Err(_) => warn!(
            timeout_secs = HTTP_DRAIN_TIMEOUT.as_secs(),
            "web server did not drain in time"
        ),
    }

    info!(
        workers = joined,
        resolved = table.resolved_count(),
        "Graceful shutdown complete"
    );
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
