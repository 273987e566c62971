use pnet::util::MacAddr;

/// What the table knows about one address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HostRecord {
    /// No reply has been seen since the last authoritative timeout.
    #[default]
    Absent,
    Resolved(MacAddr),
}

impl HostRecord {
    pub fn mac(&self) -> Option<MacAddr> {
        match self {
            HostRecord::Resolved(mac) => Some(*mac),
            HostRecord::Absent => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, HostRecord::Resolved(_))
    }
}
