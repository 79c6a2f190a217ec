//! Host, interface and port discovery.
//!
//! Interface data is read from Linux sysfs (`/sys/class/net`). Port probes
//! bind and immediately release sockets; nothing is sent over the wire.

use crate::config::Config;
use crate::error::{Result, ToolError};
use serde::Serialize;
use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpListener, ToSocketAddrs, UdpSocket};
use std::path::Path;
use tracing::{debug, warn};

/// Root of the kernel's network interface listing
pub const SYSFS_NET: &str = "/sys/class/net";

/// ARPHRD_ETHER
const ARPHRD_ETHER: u32 = 1;
/// ARPHRD_LOOPBACK
const ARPHRD_LOOPBACK: u32 = 772;

/// Kind of network interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceKind {
    Ethernet,
    Wireless,
    Loopback,
    Other,
}

/// A network interface as reported by the kernel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetInterface {
    /// Interface name (e.g. `eth0`)
    pub name: String,
    /// Link type
    pub kind: InterfaceKind,
    /// Operational state is `up`
    pub up: bool,
    /// Hardware address as `AA:BB:CC:DD:EE:FF`, if the interface has one
    pub mac: Option<String>,
}

impl NetInterface {
    /// Read one interface directory (`/sys/class/net/<name>`).
    fn from_sysfs(dir: &Path) -> Option<Self> {
        let name = dir.file_name()?.to_str()?.to_string();
        let type_id: Option<u32> = read_trimmed(&dir.join("type")).and_then(|t| t.parse().ok());

        let kind = if name == "lo" || type_id == Some(ARPHRD_LOOPBACK) {
            InterfaceKind::Loopback
        } else if dir.join("wireless").exists() || dir.join("phy80211").exists() {
            InterfaceKind::Wireless
        } else if type_id == Some(ARPHRD_ETHER) {
            InterfaceKind::Ethernet
        } else {
            InterfaceKind::Other
        };

        let up = read_trimmed(&dir.join("operstate")).is_some_and(|state| state == "up");
        let mac = read_trimmed(&dir.join("address")).and_then(|raw| format_mac(&raw));

        Some(Self {
            name,
            kind,
            up,
            mac,
        })
    }
}

/// Host name of this machine.
///
/// Falls back to `$HOSTNAME`, then `localhost`.
pub fn host_name() -> String {
    read_trimmed(Path::new("/proc/sys/kernel/hostname"))
        .or_else(|| std::env::var("HOSTNAME").ok().filter(|h| !h.is_empty()))
        .unwrap_or_else(|| "localhost".to_string())
}

/// Local IPv4 address used for outbound traffic.
///
/// Asks the kernel which source address a UDP "connection" to a public
/// address would use (no packet is sent), then falls back to resolving
/// the host name.
pub fn local_ip() -> Option<IpAddr> {
    let routed = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))
        .and_then(|socket| {
            socket.connect((Ipv4Addr::new(8, 8, 8, 8), 80))?;
            socket.local_addr()
        })
        .map(|addr| addr.ip())
        .ok()
        .filter(|ip| !ip.is_unspecified());

    routed.or_else(|| {
        (host_name().as_str(), 0)
            .to_socket_addrs()
            .ok()?
            .map(|addr| addr.ip())
            .find(IpAddr::is_ipv4)
    })
}

/// A TCP port on the loopback interface that is free right now.
pub fn available_port() -> Result<u16> {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))?;
    Ok(listener.local_addr()?.port())
}

/// First port in `start..end` that can be bound for both TCP and UDP.
pub fn free_port_in_range(start: u16, end: u16) -> Result<u16> {
    if start >= end {
        return Err(ToolError::InvalidRange {
            min: i64::from(start),
            max: i64::from(end),
        });
    }

    let port = (start..end)
        .filter(|&port| port != 0)
        .find(|&port| is_port_free(port))
        .ok_or(ToolError::NoFreePort { start, end })?;

    debug!(port, start, end, "Found free port");
    Ok(port)
}

/// Whether `port` can be bound on all IPv4 interfaces for TCP and UDP.
pub fn is_port_free(port: u16) -> bool {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    TcpListener::bind(addr).is_ok() && UdpSocket::bind(addr).is_ok()
}

/// All network interfaces known to the kernel.
pub fn interfaces() -> Result<Vec<NetInterface>> {
    interfaces_in(Path::new(SYSFS_NET))
}

/// Interfaces listed under a sysfs-style directory, sorted by name.
pub fn interfaces_in(root: &Path) -> Result<Vec<NetInterface>> {
    let mut found: Vec<NetInterface> = fs::read_dir(root)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| NetInterface::from_sysfs(&entry.path()))
        .collect();
    found.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(found)
}

/// MAC address of the first up Ethernet or Wireless interface.
pub fn mac_address() -> Option<String> {
    let list = interfaces().ok()?;
    pick_mac(&list, &[InterfaceKind::Ethernet, InterfaceKind::Wireless])
}

/// MAC address of the first up interface of `kind`.
pub fn first_mac_address(kind: InterfaceKind) -> Option<String> {
    let list = interfaces().ok()?;
    pick_mac(&list, &[kind])
}

fn pick_mac(list: &[NetInterface], kinds: &[InterfaceKind]) -> Option<String> {
    list.iter()
        .filter(|iface| iface.up && kinds.contains(&iface.kind))
        .find_map(|iface| iface.mac.clone())
}

/// Whether the probe host resolves within the configured timeout.
pub async fn is_connected_to_internet(config: &Config) -> bool {
    let lookup = tokio::net::lookup_host((config.probe_host.as_str(), 80));
    match tokio::time::timeout(config.probe_timeout, lookup).await {
        Ok(Ok(mut addrs)) => addrs.next().is_some(),
        Ok(Err(e)) => {
            debug!(host = %config.probe_host, error = %e, "Connectivity probe failed");
            false
        }
        Err(_) => {
            warn!(
                host = %config.probe_host,
                timeout_secs = config.probe_timeout.as_secs(),
                "Connectivity probe timed out"
            );
            false
        }
    }
}

/// Normalise a colon-separated hardware address to upper case.
///
/// All-zero addresses (loopback, tunnels) count as absent.
fn format_mac(raw: &str) -> Option<String> {
    let octets: Vec<u8> = raw
        .split(':')
        .map(|part| u8::from_str_radix(part, 16).ok())
        .collect::<Option<_>>()?;

    if octets.len() != 6 || octets.iter().all(|&b| b == 0) {
        return None;
    }

    let formatted: Vec<String> = octets.iter().map(|b| hex::encode_upper([*b])).collect();
    Some(formatted.join(":"))
}

fn read_trimmed(path: &Path) -> Option<String> {
    fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn mac_formatting() {
        assert_eq!(
            format_mac("0a:1b:2c:3d:4e:5f").as_deref(),
            Some("0A:1B:2C:3D:4E:5F")
        );
        assert_eq!(format_mac("00:00:00:00:00:00"), None);
        assert_eq!(format_mac("zz:00:00:00:00:01"), None);
        assert_eq!(format_mac("01:02:03"), None);
    }

    #[test]
    fn inverted_range_rejected() {
        assert!(matches!(
            free_port_in_range(9000, 9000),
            Err(ToolError::InvalidRange { .. })
        ));
    }

    #[test]
    fn occupied_port_is_skipped() {
        let held = TcpListener::bind((Ipv4Addr::UNSPECIFIED, 0)).unwrap();
        let port = held.local_addr().unwrap().port();
        assert!(!is_port_free(port));

        if port < u16::MAX {
            match free_port_in_range(port, port + 1) {
                Err(ToolError::NoFreePort { start, end }) => {
                    assert_eq!((start, end), (port, port + 1));
                }
                other => panic!("expected NoFreePort, got {:?}", other),
            }
        }
    }

    #[test]
    fn available_port_is_nonzero() {
        assert_ne!(available_port().unwrap(), 0);
    }

    #[test]
    fn host_name_is_never_empty() {
        assert!(!host_name().is_empty());
    }

    #[test]
    fn pick_prefers_up_interfaces_of_kind() {
        let list = vec![
            NetInterface {
                name: "eth0".into(),
                kind: InterfaceKind::Ethernet,
                up: false,
                mac: Some("AA:AA:AA:AA:AA:AA".into()),
            },
            NetInterface {
                name: "wlan0".into(),
                kind: InterfaceKind::Wireless,
                up: true,
                mac: Some("BB:BB:BB:BB:BB:BB".into()),
            },
        ];
        assert_eq!(
            pick_mac(&list, &[InterfaceKind::Ethernet, InterfaceKind::Wireless]).as_deref(),
            Some("BB:BB:BB:BB:BB:BB")
        );
        assert_eq!(pick_mac(&list, &[InterfaceKind::Ethernet]), None);
    }

    #[tokio::test]
    async fn unresolvable_probe_host_is_offline() {
        let config = Config {
            probe_host: "host.invalid".to_string(),
            probe_timeout: Duration::from_secs(2),
            ..Config::default()
        };
        assert!(!is_connected_to_internet(&config).await);
    }
}
