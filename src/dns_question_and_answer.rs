use std::net::Ipv4Addr;

use bytes::{BufMut, BytesMut};

use crate::domain_name::{decode_name, encode_name};
use crate::error::{DnsError, Result};
use crate::wire::read_u16;

/// DNS Question Section
/// Format: QNAME + QTYPE (2 bytes) + QCLASS (2 bytes)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuestion {
    pub name: String, // Domain name (e.g., "example.com")
    pub qtype: u16,   // Query type (A, AAAA, CNAME, etc.)
    pub qclass: u16,  // Query class (usually IN for Internet)
}

/// DNS Answer/Resource Record Section
/// Format: NAME + TYPE (2 bytes) + CLASS (2 bytes) + TTL (4 bytes) + RDLENGTH (2 bytes) + RDATA
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsAnswer {
    pub name: String,   // Domain name
    pub rtype: u16,     // Record type (A, AAAA, CNAME, etc.)
    pub rclass: u16,    // Record class (usually IN for Internet)
    pub ttl: u32,       // Time to live in seconds
    pub rdlength: u16,  // Length of RDATA field
    pub rdata: Vec<u8>, // Resource data (format depends on record type)
}

/// Common DNS record types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    A = 1,     // IPv4 address
    NS = 2,    // Name server
    CNAME = 5, // Canonical name
    SOA = 6,   // Start of authority
    PTR = 12,  // Pointer record
    MX = 15,   // Mail exchange
    TXT = 16,  // Text record
    AAAA = 28, // IPv6 address
}

impl RecordType {
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(RecordType::A),
            2 => Some(RecordType::NS),
            5 => Some(RecordType::CNAME),
            6 => Some(RecordType::SOA),
            12 => Some(RecordType::PTR),
            15 => Some(RecordType::MX),
            16 => Some(RecordType::TXT),
            28 => Some(RecordType::AAAA),
            _ => None,
        }
    }

    pub fn to_u16(self) -> u16 {
        self as u16
    }
}

/// Common DNS classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordClass {
    IN = 1, // Internet
}

impl RecordClass {
    pub fn to_u16(self) -> u16 {
        self as u16
    }
}

impl DnsQuestion {
    /// Parse a DNS question from bytes starting at the given offset
    /// `bytes` is the whole message so compression pointers can be followed
    /// Returns the question and the new offset after parsing
    pub fn from_bytes(bytes: &[u8], offset: usize) -> Result<(Self, usize)> {
        let (name, new_offset) = decode_name(bytes, offset)?;

        let qtype = read_u16(bytes, new_offset, "question type")?;
        let qclass = read_u16(bytes, new_offset + 2, "question class")?;

        Ok((
            DnsQuestion {
                name,
                qtype,
                qclass,
            },
            new_offset + 4,
        ))
    }

    pub fn write_to(&self, buf: &mut BytesMut) -> Result<()> {
        encode_name(&self.name, buf)?;

        buf.put_u16(self.qtype);
        buf.put_u16(self.qclass);

        Ok(())
    }
}

impl DnsAnswer {
    pub fn write_to(&self, buf: &mut BytesMut) -> Result<()> {
        encode_name(&self.name, buf)?;

        buf.put_u16(self.rtype);
        buf.put_u16(self.rclass);
        buf.put_u32(self.ttl);
        buf.put_u16(self.rdlength);
        buf.put_slice(&self.rdata);

        Ok(())
    }

    /// Create a new DNS answer with the given parameters
    /// The data length is taken from `rdata`
    pub fn new(name: String, rtype: u16, rclass: u16, ttl: u32, rdata: Vec<u8>) -> Result<Self> {
        let rdlength = u16::try_from(rdata.len()).map_err(|_| {
            DnsError::InvalidRecord(format!(
                "{} bytes of resource data for {}",
                rdata.len(),
                name
            ))
        })?;

        Ok(DnsAnswer {
            name,
            rtype,
            rclass,
            ttl,
            rdlength,
            rdata,
        })
    }

    /// Create an A record (IPv4 address) answer
    pub fn new_a_record(name: String, ttl: u32, ip: Ipv4Addr) -> Result<Self> {
        Self::new(
            name,
            RecordType::A.to_u16(),
            RecordClass::IN.to_u16(),
            ttl,
            ip.octets().to_vec(),
        )
    }
}
