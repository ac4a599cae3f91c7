//! Minimal DNS wire format codec for A/AAAA lookups (RFC 1035 §4.1).
//!
//! Query layout:
//! ```text
//! +--------+--------+--------+--------+--------+--------+
//! |   ID   | 0x0100 | QD = 1 | AN = 0 | NS = 0 | AR = 0 |   header, 12 bytes
//! +--------+--------+--------+--------+--------+--------+
//! | len | label | len | label | ... | 0 | QTYPE | CLASS IN |
//! ```
//!
//! Response parsing only walks what an endpoint lookup needs. Answer names are
//! assumed to be 2-byte compression pointers, which every mainstream recursive
//! resolver emits for answers to a single question.

use bytes::{BufMut, BytesMut};
use peerdns_domain::{DomainError, RecordType};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

pub const HEADER_LEN: usize = 12;

/// Classic DNS-over-UDP message limit without EDNS(0).
pub const MAX_UDP_MESSAGE_SIZE: usize = 512;

/// Standard query (opcode 0) with RD set.
const FLAGS_RECURSION_DESIRED: u16 = 0x0100;

const CLASS_IN: u16 = 1;

const MAX_LABEL_LEN: usize = 63;

const MAX_NAME_LEN: usize = 255;

/// Fixed part of a resource record after the compressed name:
/// name pointer (2) + TYPE (2) + CLASS (2) + TTL (4) + RDLENGTH (2).
const RR_FIXED_LEN: usize = 12;

pub fn build_query(domain: &str, record_type: RecordType) -> Result<Vec<u8>, DomainError> {
    build_query_with_id(fastrand::u16(..), domain, record_type)
}

pub fn build_query_with_id(
    id: u16,
    domain: &str,
    record_type: RecordType,
) -> Result<Vec<u8>, DomainError> {
    let mut buf = BytesMut::with_capacity(MAX_UDP_MESSAGE_SIZE);

    buf.put_u16(id);
    buf.put_u16(FLAGS_RECURSION_DESIRED);
    buf.put_u16(1);
    buf.put_u16(0);
    buf.put_u16(0);
    buf.put_u16(0);

    let mut name_len = 1;
    for label in domain.split('.').filter(|l| !l.is_empty()) {
        if label.len() > MAX_LABEL_LEN {
            return Err(DomainError::InvalidDomainName(format!(
                "Label '{}' in '{}' exceeds {} bytes",
                label, domain, MAX_LABEL_LEN
            )));
        }
        name_len += label.len() + 1;
        buf.put_u8(label.len() as u8);
        buf.put_slice(label.as_bytes());
    }

    if name_len == 1 {
        return Err(DomainError::InvalidDomainName(format!(
            "Empty domain name '{}'",
            domain
        )));
    }
    if name_len > MAX_NAME_LEN {
        return Err(DomainError::InvalidDomainName(format!(
            "Domain '{}' exceeds {} bytes on the wire",
            domain, MAX_NAME_LEN
        )));
    }

    buf.put_u8(0);
    buf.put_u16(record_type.to_u16());
    buf.put_u16(CLASS_IN);

    Ok(buf.to_vec())
}

/// Transaction ID of a message, if it is long enough to carry one.
pub fn message_id(message: &[u8]) -> Option<u16> {
    (message.len() >= 2).then(|| u16::from_be_bytes([message[0], message[1]]))
}

/// Extracts every answer of `record_type` from a response.
pub fn parse_response(message: &[u8], record_type: RecordType) -> Result<Vec<IpAddr>, DomainError> {
    let mut reader = WireReader::new(message);
    reader.skip(HEADER_LEN)?;

    // Echoed QNAME
    loop {
        let len = reader.read_u8()? as usize;
        if len == 0 {
            break;
        }
        if len & 0xC0 == 0xC0 {
            reader.skip(1)?;
            break;
        }
        reader.skip(len)?;
    }
    reader.skip(4)?;

    let wanted = record_type.to_u16();
    let mut addresses = Vec::new();

    while reader.remaining() >= RR_FIXED_LEN {
        reader.skip(2)?;
        let rr_type = reader.read_u16()?;
        reader.skip(6)?;
        let rd_length = reader.read_u16()? as usize;

        if rr_type == wanted {
            addresses.push(parse_address(reader.take(rd_length)?)?);
        } else {
            reader.skip(rd_length)?;
        }
    }

    Ok(addresses)
}

fn parse_address(rdata: &[u8]) -> Result<IpAddr, DomainError> {
    if let Ok(octets) = <[u8; 4]>::try_from(rdata) {
        return Ok(IpAddr::V4(Ipv4Addr::from(octets)));
    }
    if let Ok(octets) = <[u8; 16]>::try_from(rdata) {
        return Ok(IpAddr::V6(Ipv6Addr::from(octets)));
    }
    Err(DomainError::InvalidDnsResponse(format!(
        "Address record with {} bytes of RDATA",
        rdata.len()
    )))
}

/// Bounds-checked forward cursor over a message.
struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DomainError> {
        if n > self.remaining() {
            return Err(DomainError::InvalidDnsResponse(format!(
                "Truncated message: need {} bytes at offset {}, {} left",
                n,
                self.pos,
                self.remaining()
            )));
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn skip(&mut self, n: usize) -> Result<(), DomainError> {
        self.take(n).map(|_| ())
    }

    fn read_u8(&mut self) -> Result<u8, DomainError> {
        Ok(self.take(1)?[0])
    }

    fn read_u16(&mut self) -> Result<u16, DomainError> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }
}
