//! Picks the interface ARP requests are sent from.

use std::net::Ipv4Addr;

use pnet::datalink::{self, NetworkInterface};
use pnet::ipnetwork::IpNetwork;
use thiserror::Error;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ViabilityError {
    /// The interface is operationally down.
    IsDown,
    IsLoopback,
    /// The interface does not have a MAC address.
    NoMacAddress,
    /// The interface does not support broadcast (required for ARP).
    NotBroadcast,
    /// The interface is a point-to-point link (e.g., a VPN).
    IsPointToPoint,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("interface {0:?} not found")]
    NotFound(String),
    #[error("interface {name:?} cannot carry ARP: {reason:?}")]
    NotViable { name: String, reason: ViabilityError },
    #[error("no usable interface is configured with {0}")]
    NoneForAddress(Ipv4Addr),
}

/// Looks the interface up among the ones the OS reports.
pub fn find_interface(
    name: Option<&str>,
    own_ip: Ipv4Addr,
) -> Result<NetworkInterface, InterfaceError> {
    select_interface(&datalink::interfaces(), name, own_ip)
}

/// An explicit `name` must exist and be viable. Without one, the first viable
/// interface with an IPv4 network containing `own_ip` wins.
pub fn select_interface(
    interfaces: &[NetworkInterface],
    name: Option<&str>,
    own_ip: Ipv4Addr,
) -> Result<NetworkInterface, InterfaceError> {
    if let Some(name) = name {
        let interface = interfaces
            .iter()
            .find(|i| i.name == name)
            .ok_or_else(|| InterfaceError::NotFound(name.to_string()))?;
        is_viable_arp_interface(interface).map_err(|reason| InterfaceError::NotViable {
            name: name.to_string(),
            reason,
        })?;
        return Ok(interface.clone());
    }

    interfaces
        .iter()
        .filter(|interface| is_viable_arp_interface(interface).is_ok())
        .find(|interface| carries_address(interface, own_ip))
        .cloned()
        .ok_or(InterfaceError::NoneForAddress(own_ip))
}

fn carries_address(interface: &NetworkInterface, addr: Ipv4Addr) -> bool {
    interface.ips.iter().any(|net| match net {
        IpNetwork::V4(v4) => v4.contains(addr),
        IpNetwork::V6(_) => false,
    })
}

fn is_viable_arp_interface(interface: &NetworkInterface) -> Result<(), ViabilityError> {
    if !interface.is_up() {
        return Err(ViabilityError::IsDown);
    }
    if interface.is_loopback() {
        return Err(ViabilityError::IsLoopback);
    }
    if interface.mac.is_none() {
        return Err(ViabilityError::NoMacAddress);
    }
    if !interface.is_broadcast() {
        return Err(ViabilityError::NotBroadcast);
    }
    if interface.is_point_to_point() {
        return Err(ViabilityError::IsPointToPoint);
    }
    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
