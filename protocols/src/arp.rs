use std::net::Ipv4Addr;

use pnet::packet::Packet;
use pnet::packet::arp::{ArpHardwareTypes, ArpOperations, ArpPacket, MutableArpPacket};
use pnet::packet::ethernet::{EtherTypes, EthernetPacket};
use pnet::util::MacAddr;

use crate::{ARP_LEN, ETH_HDR_LEN, MIN_ETH_FRAME_NO_FCS, PacketError, ethernet};

/// The interesting half of an ARP reply: who answered, from which address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArpReply {
    pub sender_mac: MacAddr,
    pub sender_ip: Ipv4Addr,
}

/// Builds a broadcast "who has `target_addr`" frame, padded to the minimum
/// Ethernet frame size.
pub fn create_request(
    src_mac: MacAddr,
    src_addr: Ipv4Addr,
    target_addr: Ipv4Addr,
) -> Result<Vec<u8>, PacketError> {
    let mut buffer = [0u8; MIN_ETH_FRAME_NO_FCS];
    ethernet::make_header(&mut buffer, src_mac, MacAddr::broadcast(), EtherTypes::Arp)?;
    request_payload(&mut buffer, src_mac, src_addr, target_addr)?;
    Ok(Vec::from(buffer))
}

/// Writes the ARP request body behind an already written Ethernet header.
pub fn request_payload(
    buffer: &mut [u8],
    src_mac: MacAddr,
    src_addr: Ipv4Addr,
    target_addr: Ipv4Addr,
) -> Result<(), PacketError> {
    if ETH_HDR_LEN + ARP_LEN > buffer.len() {
        return Err(PacketError::ArpBuffer(buffer.len()));
    }
    let mut arp = MutableArpPacket::new(&mut buffer[ETH_HDR_LEN..ETH_HDR_LEN + ARP_LEN])
        .ok_or(PacketError::ArpBuffer(ARP_LEN))?;
    arp.set_hardware_type(ArpHardwareTypes::Ethernet);
    arp.set_protocol_type(EtherTypes::Ipv4);
    arp.set_hw_addr_len(6);
    arp.set_proto_addr_len(4);
    arp.set_operation(ArpOperations::Request);
    arp.set_sender_hw_addr(src_mac);
    arp.set_target_hw_addr(MacAddr::zero());
    arp.set_sender_proto_addr(src_addr);
    arp.set_target_proto_addr(target_addr);
    Ok(())
}

/// Extracts the sender of an ARP reply.
///
/// Frames that are not IPv4-over-Ethernet ARP replies yield `Ok(None)`; an
/// ARP frame too short to hold a full ARP body is an error.
pub fn parse_reply(frame: &[u8]) -> Result<Option<ArpReply>, PacketError> {
    let Some(eth) = ethernet::get_packet_from_u8(frame) else {
        return Ok(None);
    };
    if eth.get_ethertype() != EtherTypes::Arp {
        return Ok(None);
    }
    read_reply(&eth)
}

fn read_reply(eth: &EthernetPacket) -> Result<Option<ArpReply>, PacketError> {
    let payload = eth.payload();
    let arp = ArpPacket::new(payload).ok_or(PacketError::TruncatedArp(payload.len()))?;

    if arp.get_operation() != ArpOperations::Reply
        || arp.get_protocol_type() != EtherTypes::Ipv4
    {
        return Ok(None);
    }

    Ok(Some(ArpReply {
        sender_mac: arp.get_sender_hw_addr(),
        sender_ip: arp.get_sender_proto_addr(),
    }))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
