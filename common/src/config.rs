//! Startup configuration.
//!
//! Values arrive as loosely typed strings ([`RawConfig`], filled from flags and
//! the environment) and are validated once into a [`Config`]. A process must
//! never start scanning with a partial or malformed configuration, so every
//! problem surfaces as a [`ConfigError`] before any worker exists.

use std::net::Ipv4Addr;
use std::time::Duration;

use pnet::ipnetwork::Ipv4Network;
use pnet::util::MacAddr;
use thiserror::Error;

use crate::network::mac;
use crate::network::range::{ADDRESS_COUNT, ADDRESS_FIRST, ADDRESS_LAST, Subnet};

pub const DEFAULT_PORT: u16 = 1234;
pub const DEFAULT_URL_BASE: &str = "/";
pub const DEFAULT_WORKERS: usize = 4;
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(6);
pub const DEFAULT_WAIT_CADENCE: Duration = Duration::from_secs(12);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("\"{0}\" must be set")]
    Missing(&'static str),
    #[error("invalid CIDR {value:?}: {reason}")]
    InvalidCidr { value: String, reason: String },
    #[error("invalid IPv4 address {0:?}")]
    InvalidAddress(String),
    #[error("invalid MAC address {0:?}")]
    InvalidMac(String),
    #[error("{addr} is not inside {subnet}")]
    OutsideSubnet { addr: Ipv4Addr, subnet: Subnet },
    #[error("own address octet {0} is outside {first}..={last}", first = ADDRESS_FIRST, last = ADDRESS_LAST)]
    OctetOutOfRange(u8),
    #[error("worker count must be between 1 and {max}, got {0}", max = ADDRESS_COUNT)]
    InvalidWorkerCount(usize),
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
}

/// Unvalidated settings as collected from the command line and environment.
#[derive(Debug, Clone, Default)]
pub struct RawConfig {
    pub cidr: Option<String>,
    pub ipv4: Option<String>,
    pub mac: Option<String>,
    pub port: Option<u16>,
    pub url_base: Option<String>,
    pub workers: Option<usize>,
    pub probe_timeout_secs: Option<u64>,
    pub wait_secs: Option<u64>,
    pub interface: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub subnet: Subnet,
    pub own_ip: Ipv4Addr,
    /// Last octet of `own_ip`; pre-seeded in the host table and never probed.
    pub own_octet: u8,
    pub own_mac: MacAddr,
    pub workers: usize,
    pub probe_timeout: Duration,
    /// Pause between two consecutive probes of the same worker.
    pub wait_cadence: Duration,
    /// Explicit capture interface, otherwise picked from the own address.
    pub interface: Option<String>,
    pub port: u16,
    /// Normalised route prefix: empty, or `/segment` without a trailing slash.
    pub url_base: String,
}

impl Config {
    pub fn new(raw: RawConfig) -> Result<Self, ConfigError> {
        let cidr = required(raw.cidr, "CIDR")?;
        let ipv4 = required(raw.ipv4, "IPV4")?;
        let mac_text = required(raw.mac, "MAC")?;

        let network: Ipv4Network = cidr.parse().map_err(|e| ConfigError::InvalidCidr {
            value: cidr.clone(),
            reason: format!("{e}"),
        })?;
        let subnet = Subnet::from(network.ip());

        let own_ip: Ipv4Addr = ipv4
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(ipv4.clone()))?;
        let own_octet = subnet.octet_of(own_ip).ok_or(ConfigError::OutsideSubnet {
            addr: own_ip,
            subnet,
        })?;
        if !(ADDRESS_FIRST..=ADDRESS_LAST).contains(&own_octet) {
            return Err(ConfigError::OctetOutOfRange(own_octet));
        }

        let own_mac = mac::parse(&mac_text).ok_or(ConfigError::InvalidMac(mac_text))?;

        let workers = raw.workers.unwrap_or(DEFAULT_WORKERS);
        if workers == 0 || workers > ADDRESS_COUNT {
            return Err(ConfigError::InvalidWorkerCount(workers));
        }

        let probe_timeout = seconds(raw.probe_timeout_secs, DEFAULT_PROBE_TIMEOUT, "probe timeout")?;
        let wait_cadence = seconds(raw.wait_secs, DEFAULT_WAIT_CADENCE, "wait cadence")?;

        Ok(Self {
            subnet,
            own_ip,
            own_octet,
            own_mac,
            workers,
            probe_timeout,
            wait_cadence,
            interface: raw.interface.filter(|name| !name.trim().is_empty()),
            port: raw.port.unwrap_or(DEFAULT_PORT),
            url_base: normalize_url_base(raw.url_base.as_deref().unwrap_or(DEFAULT_URL_BASE)),
        })
    }
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn seconds(value: Option<u64>, default: Duration, name: &'static str) -> Result<Duration, ConfigError> {
    match value {
        Some(0) => Err(ConfigError::ZeroDuration(name)),
        Some(secs) => Ok(Duration::from_secs(secs)),
        None => Ok(default),
    }
}

/// `"/"` and `""` mean "no prefix"; anything else gets exactly one leading
/// slash and no trailing one.
pub fn normalize_url_base(base: &str) -> String {
    let trimmed = base.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
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
