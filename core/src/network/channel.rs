use std::time::Duration;

use pnet::datalink::{self, Channel, Config, DataLinkReceiver, DataLinkSender, NetworkInterface};

use crate::scanner::ProbeError;

/// How long a single `rx.next()` may block before the caller re-checks its
/// deadline.
const READ_TIMEOUT: Duration = Duration::from_millis(50);

pub type EthernetPair = (Box<dyn DataLinkSender>, Box<dyn DataLinkReceiver>);

pub fn probe_config() -> Config {
    Config {
        read_timeout: Some(READ_TIMEOUT),
        ..Default::default()
    }
}

/// Opens a layer 2 channel on `intf` using the platform backend.
pub fn open(intf: &NetworkInterface) -> Result<EthernetPair, ProbeError> {
    open_eth_channel(intf, &probe_config(), datalink::channel)
}

pub fn open_eth_channel<F>(
    intf: &NetworkInterface,
    cfg: &Config,
    channel_opener: F,
) -> Result<EthernetPair, ProbeError>
where
    F: FnOnce(&NetworkInterface, Config) -> std::io::Result<Channel>,
{
    let ch: Channel = channel_opener(intf, *cfg).map_err(|source| ProbeError::Channel {
        interface: intf.name.clone(),
        source,
    })?;
    match ch {
        Channel::Ethernet(tx, rx) => Ok((tx, rx)),
        _ => Err(ProbeError::NonEthernet(intf.name.clone())),
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
