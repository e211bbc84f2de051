use bytes::{BufMut, BytesMut};

use crate::error::{DnsError, Result};
use crate::wire::read_u16;

pub const HEADER_LEN: usize = 12;

/// Opcode 0: standard query
pub const OPCODE_QUERY: u8 = 0;
pub const RCODE_NO_ERROR: u8 = 0;
pub const RCODE_NOT_IMPLEMENTED: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DnsHeader {
    pub id: u16,
    pub flags: DnsFlags,
    pub question_count: u16,
    pub answer_count: u16,
    pub authority_count: u16,
    pub additional_count: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DnsFlags {
    pub qr: bool,              // Query/Response (false = query, true = response)
    pub opcode: u8,            // Operation code (0 = standard query)
    pub aa: bool,              // Authoritative Answer
    pub tc: bool,              // Truncation
    pub rd: bool,              // Recursion Desired
    pub ra: bool,              // Recursion Available
    pub z: u8,                 // Reserved (must be 0)
    pub rcode: u8,             // Response code (0 = no error, 4 = not implemented, etc.)
}

impl DnsFlags {
    pub fn to_u16(&self) -> u16 {
        let mut flags: u16 = 0;

        if self.qr { flags |= 1 << 15; }           // QR at bit 15
        flags |= (self.opcode as u16 & 0xF) << 11; // OPCODE at bits 11-14
        if self.aa { flags |= 1 << 10; }           // AA at bit 10
        if self.tc { flags |= 1 << 9; }            // TC at bit 9
        if self.rd { flags |= 1 << 8; }            // RD at bit 8
        if self.ra { flags |= 1 << 7; }            // RA at bit 7
        flags |= (self.z as u16 & 0x7) << 4;       // Z at bits 4-6 (reserved)
        flags |= self.rcode as u16 & 0xF;          // RCODE at bits 0-3

        flags
    }

    pub fn from_u16(flags: u16) -> Self {
        DnsFlags {
            qr: (flags & (1 << 15)) != 0,
            opcode: ((flags >> 11) & 0xF) as u8,
            aa: (flags & (1 << 10)) != 0,
            tc: (flags & (1 << 9)) != 0,
            rd: (flags & (1 << 8)) != 0,
            ra: (flags & (1 << 7)) != 0,
            z: ((flags >> 4) & 0x7) as u8,
            rcode: (flags & 0xF) as u8,
        }
    }

    /// Flags for the reply to a request carrying `self`.
    ///
    /// OPCODE, TC and RD are echoed. Anything but a standard query is
    /// answered with RCODE 4 (not implemented).
    pub fn response(self) -> Self {
        DnsFlags {
            qr: true,
            opcode: self.opcode,
            aa: false,
            tc: self.tc,
            rd: self.rd,
            ra: false,
            z: 0,
            rcode: if self.opcode == OPCODE_QUERY {
                RCODE_NO_ERROR
            } else {
                RCODE_NOT_IMPLEMENTED
            },
        }
    }
}

impl DnsHeader {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(DnsError::MalformedMessage(format!(
                "header needs {} bytes, got {}",
                HEADER_LEN,
                bytes.len()
            )));
        }

        Ok(DnsHeader {
            id: read_u16(bytes, 0, "id")?,
            flags: DnsFlags::from_u16(read_u16(bytes, 2, "flags")?),
            question_count: read_u16(bytes, 4, "question count")?,
            answer_count: read_u16(bytes, 6, "answer count")?,
            authority_count: read_u16(bytes, 8, "authority count")?,
            additional_count: read_u16(bytes, 10, "additional count")?,
        })
    }

    pub fn write_to(&self, buf: &mut BytesMut) {
        buf.reserve(HEADER_LEN);

        buf.put_u16(self.id);
        buf.put_u16(self.flags.to_u16());
        buf.put_u16(self.question_count);
        buf.put_u16(self.answer_count);
        buf.put_u16(self.authority_count);
        buf.put_u16(self.additional_count);
    }
}
