use ipnetwork::{Ipv4Network, Ipv6Network};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;

static RESERVED_V4: LazyLock<Vec<Ipv4Network>> = LazyLock::new(|| {
    [
        (Ipv4Addr::new(0, 0, 0, 0), 8),
        (Ipv4Addr::new(10, 0, 0, 0), 8),
        (Ipv4Addr::new(100, 64, 0, 0), 10),
        (Ipv4Addr::new(127, 0, 0, 0), 8),
        (Ipv4Addr::new(169, 254, 0, 0), 16),
        (Ipv4Addr::new(172, 16, 0, 0), 12),
        (Ipv4Addr::new(192, 168, 0, 0), 16),
        (Ipv4Addr::new(255, 255, 255, 255), 32),
    ]
    .into_iter()
    .filter_map(|(addr, prefix)| Ipv4Network::new(addr, prefix).ok())
    .collect()
});

static RESERVED_V6: LazyLock<Vec<Ipv6Network>> = LazyLock::new(|| {
    [
        (Ipv6Addr::UNSPECIFIED, 128),
        (Ipv6Addr::LOCALHOST, 128),
        (Ipv6Addr::new(0xfc00, 0, 0, 0, 0, 0, 0, 0), 7),
        (Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 0), 10),
    ]
    .into_iter()
    .filter_map(|(addr, prefix)| Ipv6Network::new(addr, prefix).ok())
    .collect()
});

/// True for addresses that say nothing about where a client is: private,
/// shared (CGNAT), loopback, link-local, unique-local and unspecified ranges.
/// Documentation ranges (203.0.113.0/24 and friends) are not reserved here.
pub fn is_reserved(address: IpAddr) -> bool {
    match address.to_canonical() {
        IpAddr::V4(v4) => RESERVED_V4.iter().any(|net| net.contains(v4)),
        IpAddr::V6(v6) => RESERVED_V6.iter().any(|net| net.contains(v6)),
    }
}
