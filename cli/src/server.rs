use std::net::SocketAddr;
use std::sync::Arc;

use arpmon_common::network::range::Subnet;
use arpmon_core::render::{self, HostListing};
use arpmon_core::table::HostTable;
use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{Json, Router, routing::get};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[derive(Clone)]
pub struct AppState {
    pub table: Arc<HostTable>,
    pub subnet: Subnet,
}

pub async fn start_web_server(
    bind_addr: SocketAddr,
    url_base: String,
    state: AppState,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    info!(
        bind_address = %bind_addr,
        macs_url = format!("http://{bind_addr}{url_base}/macs"),
        "Starting web server"
    );

    let app = create_app(state, &url_base);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!("Web server started successfully");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("Web server stopped");
    Ok(())
}

/// `url_base` must already be normalised: empty or `/segment`.
pub fn create_app(state: AppState, url_base: &str) -> Router {
    Router::new()
        .route(&format!("{url_base}/macs"), get(macs_handler))
        .route(&format!("{url_base}/csv"), get(csv_handler))
        .route(&format!("{url_base}/json"), get(json_handler))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let response = next.run(request).await;
    info!(%method, %uri, status = response.status().as_u16(), "request");
    response
}

async fn macs_handler(State(state): State<AppState>) -> String {
    let body = render::unique_macs(&state.table.snapshot());
    debug!(bytes = body.len(), "served macs");
    body
}

async fn csv_handler(State(state): State<AppState>) -> String {
    let body = render::csv_rows(state.subnet, &state.table.snapshot());
    debug!(bytes = body.len(), "served csv");
    body
}

async fn json_handler(State(state): State<AppState>) -> Json<HostListing> {
    let listing = render::host_listing(state.subnet, &state.table.snapshot());
    debug!(hosts = listing.hosts.len(), "served json");
    Json(listing)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
