//! Address arithmetic for the monitored /24.
//!
//! Hosts are identified by their last octet. Every octet in
//! [`ADDRESS_FIRST`]..=[`ADDRESS_LAST`] is a candidate for probing, and the
//! range is split once at startup into one contiguous [`Segment`] per worker.

use std::fmt;
use std::net::Ipv4Addr;
use std::ops::RangeInclusive;

pub const ADDRESS_FIRST: u8 = 1;
pub const ADDRESS_LAST: u8 = 254;
pub const ADDRESS_COUNT: usize = (ADDRESS_LAST - ADDRESS_FIRST) as usize + 1;

/// The network prefix (first three octets) all probed hosts share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subnet {
    prefix: [u8; 3],
}

impl Subnet {
    pub fn new(a: u8, b: u8, c: u8) -> Self {
        Self { prefix: [a, b, c] }
    }

    /// Full host address for a last octet.
    pub fn host(&self, octet: u8) -> Ipv4Addr {
        let [a, b, c] = self.prefix;
        Ipv4Addr::new(a, b, c, octet)
    }

    /// Last octet of `addr` if it belongs to this subnet.
    pub fn octet_of(&self, addr: Ipv4Addr) -> Option<u8> {
        let [a, b, c, d] = addr.octets();
        (self.prefix == [a, b, c]).then_some(d)
    }
}

impl From<Ipv4Addr> for Subnet {
    fn from(addr: Ipv4Addr) -> Self {
        let [a, b, c, _] = addr.octets();
        Self::new(a, b, c)
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/24", self.host(0))
    }
}

/// A contiguous, inclusive run of octets owned by exactly one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    pub min: u8,
    pub max: u8,
}

impl Segment {
    pub fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    pub fn iter(&self) -> RangeInclusive<u8> {
        self.min..=self.max
    }

    pub fn size(&self) -> usize {
        (self.max - self.min) as usize + 1
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.min, self.max)
    }
}

/// Splits the whole address range into `workers` segments.
///
/// Segments are ascending, contiguous and never overlap; their sizes differ by
/// at most one, the first `ADDRESS_COUNT % workers` being the larger ones.
/// A worker count above [`ADDRESS_COUNT`] is capped (a segment is never empty)
/// and zero workers yields no segments.
pub fn partition(workers: usize) -> Vec<Segment> {
    let workers = workers.min(ADDRESS_COUNT);
    if workers == 0 {
        return Vec::new();
    }

    let base = ADDRESS_COUNT / workers;
    let extra = ADDRESS_COUNT % workers;
    let mut next = ADDRESS_FIRST as usize;

    (0..workers)
        .map(|idx| {
            let size = base + usize::from(idx < extra);
            let min = next;
            let max = next + size - 1;
            next = max + 1;
            Segment::new(min as u8, max as u8)
        })
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
