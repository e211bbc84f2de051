use bytes::Buf;

use crate::error::{DnsError, Result};

/// Borrow `len` bytes at `offset`, failing if the read would run past the end
pub fn read_slice<'a>(bytes: &'a [u8], offset: usize, len: usize, what: &str) -> Result<&'a [u8]> {
    offset
        .checked_add(len)
        .and_then(|end| bytes.get(offset..end))
        .ok_or_else(|| {
            DnsError::MalformedMessage(format!(
                "{} at offset {} needs {} bytes, buffer has {}",
                what,
                offset,
                len,
                bytes.len()
            ))
        })
}

pub fn read_u8(bytes: &[u8], offset: usize, what: &str) -> Result<u8> {
    Ok(read_slice(bytes, offset, 1, what)?.get_u8())
}

pub fn read_u16(bytes: &[u8], offset: usize, what: &str) -> Result<u16> {
    Ok(read_slice(bytes, offset, 2, what)?.get_u16())
}
