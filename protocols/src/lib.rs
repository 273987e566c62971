//! Layer 2 frame construction and parsing for ARP probing.

pub mod arp;
pub mod ethernet;

use thiserror::Error;

pub const MIN_ETH_FRAME_NO_FCS: usize = 60;
pub const ETH_HDR_LEN: usize = 14;
pub const ARP_LEN: usize = 28;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PacketError {
    #[error("buffer too small for an Ethernet header ({0} bytes)")]
    EthernetBuffer(usize),
    #[error("buffer too small for an ARP payload ({0} bytes)")]
    ArpBuffer(usize),
    #[error("truncated or invalid ARP packet (payload len {0})")]
    TruncatedArp(usize),
}
