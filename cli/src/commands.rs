use arpmon_common::config::{DEFAULT_PORT, DEFAULT_URL_BASE, RawConfig};
use clap::Parser;

/// Every setting can come from a flag or its environment variable; flags win.
#[derive(Parser, Debug)]
#[command(name = "arpmon")]
#[command(version)]
#[command(about = "Continuously maps a /24 to MAC addresses with ARP and serves the result.")]
pub struct CommandLine {
    /// Network to monitor, e.g. 192.168.1.0/24
    #[arg(long, env = "CIDR")]
    pub cidr: Option<String>,

    /// This host's IPv4 address inside the network
    #[arg(long, env = "IPV4")]
    pub ipv4: Option<String>,

    /// This host's MAC address
    #[arg(long, env = "MAC")]
    pub mac: Option<String>,

    /// HTTP listen port
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Route prefix for the HTTP endpoints
    #[arg(long, env = "URL_BASE", default_value = DEFAULT_URL_BASE)]
    pub url_base: String,

    /// Number of scan workers
    #[arg(short, long, env = "WORKERS")]
    pub workers: Option<usize>,

    /// Older name for the worker count, read when --workers/WORKERS are unset
    #[arg(long, env = "GOROUTINES", hide = true)]
    pub goroutines: Option<usize>,

    /// Seconds to wait for an ARP reply
    #[arg(long, env = "PROBE_TIMEOUT_SECS")]
    pub probe_timeout_secs: Option<u64>,

    /// Seconds each worker pauses between probes
    #[arg(long, env = "WAIT_SECS")]
    pub wait_secs: Option<u64>,

    /// Interface to probe on, picked from the own address when unset
    #[arg(short, long, env = "INTERFACE")]
    pub interface: Option<String>,

    /// Log filter, e.g. `debug` or `arpmon_core=trace,info`
    #[arg(long, env = "RUST_LOG")]
    pub log_level: Option<String>,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn raw_config(&self) -> RawConfig {
        RawConfig {
            cidr: self.cidr.clone(),
            ipv4: self.ipv4.clone(),
            mac: self.mac.clone(),
            port: Some(self.port),
            url_base: Some(self.url_base.clone()),
            workers: self.workers.or(self.goroutines),
            probe_timeout_secs: self.probe_timeout_secs,
            wait_secs: self.wait_secs,
            interface: self.interface.clone(),
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
