//! Text and JSON views over a table snapshot. Absent entries never appear.

use std::collections::BTreeSet;
use std::fmt::Write;
use std::net::Ipv4Addr;

use arpmon_common::network::host::HostRecord;
use arpmon_common::network::mac;
use arpmon_common::network::range::Subnet;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostEntry {
    pub ip: Ipv4Addr,
    pub mac: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostListing {
    pub hosts: Vec<HostEntry>,
}

/// Distinct MAC addresses, uppercase, sorted, one per line.
pub fn unique_macs(snapshot: &[(u8, HostRecord)]) -> String {
    let macs: BTreeSet<String> = snapshot
        .iter()
        .filter_map(|(_, record)| record.mac())
        .map(mac::to_upper_string)
        .collect();

    let mut out = String::new();
    for m in macs {
        out.push_str(&m);
        out.push('\n');
    }
    out
}

/// `ip,MAC` lines in ascending address order.
pub fn csv_rows(subnet: Subnet, snapshot: &[(u8, HostRecord)]) -> String {
    let mut out = String::new();
    for (octet, record) in snapshot {
        if let Some(m) = record.mac() {
            // Writing into a String cannot fail.
            let _ = writeln!(out, "{},{}", subnet.host(*octet), mac::to_upper_string(m));
        }
    }
    out
}

pub fn host_listing(subnet: Subnet, snapshot: &[(u8, HostRecord)]) -> HostListing {
    let hosts = snapshot
        .iter()
        .filter_map(|(octet, record)| {
            record.mac().map(|m| HostEntry {
                ip: subnet.host(*octet),
                mac: mac::to_upper_string(m),
            })
        })
        .collect();
    HostListing { hosts }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
