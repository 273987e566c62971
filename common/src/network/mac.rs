use pnet::util::MacAddr;

/// Upper-case, colon separated rendering used on every output surface.
pub fn to_upper_string(mac: MacAddr) -> String {
    mac.to_string().to_ascii_uppercase()
}

/// Parses `xx:xx:xx:xx:xx:xx` in either case.
pub fn parse(text: &str) -> Option<MacAddr> {
    text.trim().parse::<MacAddr>().ok()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
