//! # Host Table
//!
//! Maps every last octet in [`ADDRESS_FIRST`]..=[`ADDRESS_LAST`] to a
//! [`HostRecord`]. The table is fully populated from construction on: every
//! address always has a value, resolved or absent.
//!
//! All access goes through a single reader/writer lock. Writers (the scan
//! workers) only take it for the duration of one record update, never across
//! a probe.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use arpmon_common::network::host::HostRecord;
use arpmon_common::network::range::{ADDRESS_FIRST, ADDRESS_LAST};
use pnet::util::MacAddr;
use tracing::warn;

pub type Snapshot = Vec<(u8, HostRecord)>;

#[derive(Debug)]
pub struct HostTable {
    hosts: RwLock<BTreeMap<u8, HostRecord>>,
    own_octet: u8,
}

impl HostTable {
    /// Creates a table with every address absent except `own_octet`, which is
    /// seeded with `own_mac` and stays that way for the table's lifetime.
    pub fn new(own_octet: u8, own_mac: MacAddr) -> Self {
        let mut hosts: BTreeMap<u8, HostRecord> = (ADDRESS_FIRST..=ADDRESS_LAST)
            .map(|octet| (octet, HostRecord::Absent))
            .collect();
        if let Some(own) = hosts.get_mut(&own_octet) {
            *own = HostRecord::Resolved(own_mac);
        }
        Self {
            hosts: RwLock::new(hosts),
            own_octet,
        }
    }

    /// Out of range octets read as [`HostRecord::Absent`].
    pub fn get(&self, octet: u8) -> HostRecord {
        self.read().get(&octet).copied().unwrap_or_default()
    }

    /// Overwrites the record for `octet`. Returns `false` (and leaves the table
    /// untouched) for the own address and for octets outside the range.
    pub fn set(&self, octet: u8, record: HostRecord) -> bool {
        if octet == self.own_octet {
            warn!(octet, "refusing to overwrite own address entry");
            return false;
        }
        match self.write().get_mut(&octet) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => {
                warn!(octet, "ignoring update for out of range address");
                false
            }
        }
    }

    /// Copy of every entry, in ascending octet order, taken under one read lock.
    pub fn snapshot(&self) -> Snapshot {
        self.read()
            .iter()
            .map(|(octet, record)| (*octet, *record))
            .collect()
    }

    pub fn resolved_count(&self) -> usize {
        self.read().values().filter(|r| r.is_resolved()).count()
    }

    // Records are Copy values swapped whole, poisoning never leaves one torn.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<u8, HostRecord>> {
        self.hosts.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<u8, HostRecord>> {
        self.hosts.write().unwrap_or_else(PoisonError::into_inner)
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
