//! Shared building blocks for `arpmon`: configuration, subnet arithmetic and
//! the host record model used by the scanner and the query layer.

pub mod config;
pub mod network;
