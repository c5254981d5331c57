use geodns_domain::SubnetHint;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// EDNS option code of the client-subnet option (RFC 7871).
pub const OPTION_CLIENT_SUBNET: u16 = 8;

const FAMILY_IPV4: u16 = 1;
const FAMILY_IPV6: u16 = 2;

/// Walks the option list carried in an OPT record's RDATA and returns the
/// hint from the first client-subnet option, wherever it sits in the list.
///
/// A truncated option list, or a client-subnet option that fails any of the
/// checks in [`parse_client_subnet`], yields `None`.
pub fn find_client_subnet(rdata: &[u8]) -> Option<SubnetHint> {
    let mut pos = 0;

    while pos + 4 <= rdata.len() {
        let code = u16::from_be_bytes([rdata[pos], rdata[pos + 1]]);
        let len = u16::from_be_bytes([rdata[pos + 2], rdata[pos + 3]]) as usize;
        pos += 4;

        if pos + len > rdata.len() {
            return None;
        }

        if code == OPTION_CLIENT_SUBNET {
            return parse_client_subnet(&rdata[pos..pos + len]);
        }
        pos += len;
    }

    None
}

/// Decodes the payload of one client-subnet option.
///
/// Layout: FAMILY (2) | SOURCE PREFIX (1) | SCOPE PREFIX (1) | ADDRESS.
/// The address must be exactly `ceil(source_prefix / 8)` bytes with every
/// bit past the prefix cleared. A zero source prefix discloses nothing and
/// is treated as no hint.
pub fn parse_client_subnet(data: &[u8]) -> Option<SubnetHint> {
    if data.len() < 4 {
        return None;
    }

    let family = u16::from_be_bytes([data[0], data[1]]);
    let source_prefix = data[2];
    let address = &data[4..];

    let max_prefix = match family {
        FAMILY_IPV4 => 32,
        FAMILY_IPV6 => 128,
        _ => return None,
    };

    if source_prefix == 0 || source_prefix > max_prefix {
        return None;
    }

    let expected_len = (source_prefix as usize).div_ceil(8);
    if address.len() != expected_len {
        return None;
    }

    let spare_bits = (expected_len * 8 - source_prefix as usize) as u32;
    if spare_bits > 0 {
        let mask = (1u8 << spare_bits) - 1;
        if address[expected_len - 1] & mask != 0 {
            return None;
        }
    }

    let ip = match family {
        FAMILY_IPV4 => {
            let mut octets = [0u8; 4];
            octets[..expected_len].copy_from_slice(address);
            IpAddr::V4(Ipv4Addr::from(octets))
        }
        _ => {
            let mut octets = [0u8; 16];
            octets[..expected_len].copy_from_slice(address);
            IpAddr::V6(Ipv6Addr::from(octets))
        }
    };

    Some(SubnetHint::new(ip, source_prefix))
}
