//! # arpmon core
//!
//! The scanning engine: a fixed pool of workers that sweep their share of the
//! subnet with ARP probes and keep a shared [`table::HostTable`] current.
//!
//! * [`scanner`]: probe abstraction, workers, shutdown coordination and the
//!   [`scanner::ScanEngine`] facade.
//! * [`table`]: the address to MAC mapping shared with the query layer.
//! * [`network`]: layer 2 channel and interface plumbing used by the ARP prober.
//! * [`render`]: text and structured views over a table snapshot.

pub mod network;
pub mod render;
pub mod scanner;
pub mod table;
