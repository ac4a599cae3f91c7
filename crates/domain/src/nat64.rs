//! Embedded IPv4 extraction for peers published behind an IPv6 AAAA record.
//!
//! Layout of an embedded address:
//! ```text
//!  0      4                    10     12            16
//! +------+--------------------+------+-------------+
//! |prefix|      (ignored)     | port |    IPv4     |
//! +------+--------------------+------+-------------+
//! ```
//!
//! The prefix is `2001:0000::/32`. Only the first four octets are compared.

use std::net::{IpAddr, Ipv4Addr};

pub const EMBEDDING_PREFIX: [u8; 4] = [0x20, 0x01, 0x00, 0x00];

/// Returns the embedded IPv4 address and port when `ip` carries the
/// embedding prefix, otherwise `ip` unchanged with no port override.
pub fn unwrap_embedded(ip: IpAddr) -> (IpAddr, Option<u16>) {
    let IpAddr::V6(v6) = ip else {
        return (ip, None);
    };

    let octets = v6.octets();
    if octets[..4] != EMBEDDING_PREFIX {
        return (ip, None);
    }

    let v4 = Ipv4Addr::new(octets[12], octets[13], octets[14], octets[15]);
    let port = u16::from_be_bytes([octets[10], octets[11]]);

    (IpAddr::V4(v4), Some(port))
}
