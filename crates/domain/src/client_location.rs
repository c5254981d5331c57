use std::fmt;
use std::net::{IpAddr, SocketAddr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transport {
    Udp,
    Tcp,
}

impl Transport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::Udp => "udp",
            Transport::Tcp => "tcp",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client network disclosed by a forwarding resolver through the
/// client-subnet EDNS option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubnetHint {
    pub address: IpAddr,
    pub source_prefix: u8,
}

impl SubnetHint {
    pub fn new(address: IpAddr, source_prefix: u8) -> Self {
        Self {
            address,
            source_prefix,
        }
    }
}

impl fmt::Display for SubnetHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.source_prefix)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientLocation {
    pub transport: Transport,
    pub direct_address: IpAddr,
    pub hint: Option<SubnetHint>,
}

impl ClientLocation {
    /// Builds the location from the transport peer and an optional hint.
    ///
    /// UDP and TCP peers both arrive as socket addresses; IPv4-mapped IPv6
    /// peers from dual-stack sockets are reduced to plain IPv4.
    pub fn from_peer(transport: Transport, peer: SocketAddr, hint: Option<SubnetHint>) -> Self {
        Self {
            transport,
            direct_address: peer.ip().to_canonical(),
            hint,
        }
    }

    pub fn hinted_address(&self) -> Option<IpAddr> {
        self.hint.map(|h| h.address)
    }

    /// Address used for geo classification: the hint wins over the peer.
    pub fn effective_address(&self) -> IpAddr {
        self.hinted_address().unwrap_or(self.direct_address)
    }
}
