use bytes::{BufMut, BytesMut};

use crate::error::{DnsError, Result};
use crate::wire::{read_slice, read_u16, read_u8};

/// Top two bits of a length byte set: the next 14 bits are a message offset
const POINTER_MASK: u8 = 0xC0;
const POINTER_OFFSET_MASK: u16 = 0x3FFF;
const MAX_LABEL_LEN: usize = 63;
const MAX_NAME_LEN: usize = 255;
/// Nested pointers followed before a name is rejected as a loop
const MAX_POINTER_DEPTH: usize = 16;

/// Parse a domain name from DNS message format
/// Supports DNS name compression (pointers)
/// Returns the parsed domain name and the offset just past the name's last byte
/// in the original position (a pointer counts as its own two bytes only)
pub fn decode_name(bytes: &[u8], offset: usize) -> Result<(String, usize)> {
    let mut labels = Vec::new();
    let next_offset = decode_labels(bytes, offset, 0, &mut labels)?;

    let name = if labels.is_empty() {
        ".".to_string() // Root domain
    } else {
        labels.join(".")
    };

    Ok((name, next_offset))
}

fn decode_labels(
    bytes: &[u8],
    mut offset: usize,
    depth: usize,
    labels: &mut Vec<String>,
) -> Result<usize> {
    loop {
        let length = read_u8(bytes, offset, "label length")?;

        match length & POINTER_MASK {
            0 => {}
            POINTER_MASK => {
                if depth >= MAX_POINTER_DEPTH {
                    return Err(DnsError::MalformedMessage(format!(
                        "compression pointer at offset {} nested deeper than {}",
                        offset, MAX_POINTER_DEPTH
                    )));
                }

                let pointer = read_u16(bytes, offset, "compression pointer")? & POINTER_OFFSET_MASK;
                decode_labels(bytes, pointer as usize, depth + 1, labels)?;

                return Ok(offset + 2);
            }
            _ => {
                return Err(DnsError::MalformedMessage(format!(
                    "reserved label type {:#04x} at offset {}",
                    length, offset
                )));
            }
        }

        offset += 1;

        if length == 0 {
            return Ok(offset);
        }

        // One byte per character, no multi-byte decoding
        let label = read_slice(bytes, offset, length as usize, "label")?;
        labels.push(label.iter().copied().map(char::from).collect());
        offset += length as usize;
    }
}

/// Encode a domain name to DNS message format
/// Format: length-prefixed labels terminated with a null byte
/// Example: "example.com" -> [7]example[3]com[0]
///
/// Never emits compression pointers.
pub fn encode_name(name: &str, buf: &mut BytesMut) -> Result<()> {
    let mut encoded = Vec::with_capacity(name.len() + 2);

    for label in name.split('.').filter(|label| !label.is_empty()) {
        let label_bytes = label
            .chars()
            .map(|c| {
                u8::try_from(c).map_err(|_| {
                    DnsError::InvalidLabel(format!("{:?} is not a single-byte character in {}", c, label))
                })
            })
            .collect::<Result<Vec<u8>>>()?;

        if label_bytes.len() > MAX_LABEL_LEN {
            return Err(DnsError::NameTooLong(format!(
                "label {} is {} bytes, limit is {}",
                label,
                label_bytes.len(),
                MAX_LABEL_LEN
            )));
        }

        encoded.push(label_bytes.len() as u8);
        encoded.extend_from_slice(&label_bytes);
    }

    encoded.push(0);

    if encoded.len() > MAX_NAME_LEN {
        return Err(DnsError::NameTooLong(format!(
            "{} encodes to {} bytes, limit is {}",
            name,
            encoded.len(),
            MAX_NAME_LEN
        )));
    }

    buf.put_slice(&encoded);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE_COM: [u8; 13] = [
        7, b'e', b'x', b'a', b'm', b'p', b'l', b'e', 3, b'c', b'o', b'm', 0,
    ];

    fn encode(name: &str) -> Result<Vec<u8>> {
        let mut buf = BytesMut::new();
        encode_name(name, &mut buf)?;
        Ok(buf.to_vec())
    }

    #[test]
    fn test_encode_domain_name() {
        assert_eq!(encode("example.com").unwrap(), EXAMPLE_COM.to_vec());
    }

    #[test]
    fn test_encode_root_domain() {
        assert_eq!(encode(".").unwrap(), vec![0]);
        assert_eq!(encode("").unwrap(), vec![0]);
    }

    #[test]
    fn test_encode_trailing_dot() {
        assert_eq!(encode("example.com.").unwrap(), EXAMPLE_COM.to_vec());
    }

    #[test]
    fn test_parse_domain_name() {
        let (name, offset) = decode_name(&EXAMPLE_COM, 0).unwrap();
        assert_eq!(name, "example.com");
        assert_eq!(offset, 13);
    }

    #[test]
    fn test_parse_root_domain() {
        let (name, offset) = decode_name(&[0], 0).unwrap();
        assert_eq!(name, ".");
        assert_eq!(offset, 1);
    }

    #[test]
    fn test_max_length_label_roundtrip() {
        let name = format!("{}.{}", "a".repeat(63), "b".repeat(1));
        let encoded = encode(&name).unwrap();
        let (decoded, offset) = decode_name(&encoded, 0).unwrap();
        assert_eq!(decoded, name);
        assert_eq!(offset, encoded.len());
    }

    #[test]
    fn test_high_bytes_roundtrip() {
        let wire = [2, 0xE9, 0x7F, 0];
        let (name, _) = decode_name(&wire, 0).unwrap();
        assert_eq!(name.chars().count(), 2);
        assert_eq!(encode(&name).unwrap(), wire.to_vec());
    }

    #[test]
    fn test_label_too_long() {
        let name = format!("{}.com", "a".repeat(64));
        assert!(matches!(encode(&name), Err(DnsError::NameTooLong(_))));
    }

    #[test]
    fn test_name_too_long() {
        let label = "a".repeat(63);
        let name = vec![label.as_str(); 4].join(".");
        assert!(matches!(encode(&name), Err(DnsError::NameTooLong(_))));
    }

    #[test]
    fn test_multibyte_character_rejected() {
        assert!(matches!(encode("ex\u{263A}.com"), Err(DnsError::InvalidLabel(_))));
    }

    #[test]
    fn test_pointer_matches_full_name() {
        // example.com at 0, then www + pointer to 0 at 13
        let mut bytes = EXAMPLE_COM.to_vec();
        bytes.extend_from_slice(&[3, b'w', b'w', b'w', 0xC0, 0x00]);
        bytes.extend_from_slice(&[0xC0, 0x00]);

        let (name, offset) = decode_name(&bytes, 13).unwrap();
        assert_eq!(name, "www.example.com");
        assert_eq!(offset, 19);

        let (pointed, offset) = decode_name(&bytes, 19).unwrap();
        let (full, _) = decode_name(&bytes, 0).unwrap();
        assert_eq!(pointed, full);
        assert_eq!(offset, 21);
    }

    #[test]
    fn test_nested_pointers() {
        let mut bytes = EXAMPLE_COM.to_vec();
        bytes.extend_from_slice(&[3, b'w', b'w', b'w', 0xC0, 0x00]); // 13
        bytes.extend_from_slice(&[3, b'a', b'p', b'i', 0xC0, 0x0D]); // 19

        let (name, offset) = decode_name(&bytes, 19).unwrap();
        assert_eq!(name, "api.www.example.com");
        assert_eq!(offset, 25);
    }

    #[test]
    fn test_self_pointer_is_malformed() {
        let bytes = [0xC0, 0x00];
        assert!(matches!(
            decode_name(&bytes, 0),
            Err(DnsError::MalformedMessage(_))
        ));
    }

    #[test]
    fn test_transitive_pointer_loop_is_malformed() {
        let bytes = [1, b'a', 0xC0, 0x04, 1, b'b', 0xC0, 0x00];
        assert!(matches!(
            decode_name(&bytes, 0),
            Err(DnsError::MalformedMessage(_))
        ));
    }

    #[test]
    fn test_truncated_names_are_malformed() {
        assert!(matches!(decode_name(&[], 0), Err(DnsError::MalformedMessage(_))));
        assert!(matches!(
            decode_name(&[7, b'e', b'x'], 0),
            Err(DnsError::MalformedMessage(_))
        ));
        assert!(matches!(
            decode_name(&[3, b'c', b'o', b'm'], 0),
            Err(DnsError::MalformedMessage(_))
        ));
        assert!(matches!(decode_name(&[0xC0], 0), Err(DnsError::MalformedMessage(_))));
        assert!(matches!(
            decode_name(&[0xC0, 0x20], 0),
            Err(DnsError::MalformedMessage(_))
        ));
    }

    #[test]
    fn test_reserved_label_type_is_malformed() {
        assert!(matches!(
            decode_name(&[0x40, 0x00], 0),
            Err(DnsError::MalformedMessage(_))
        ));
        assert!(matches!(
            decode_name(&[0x80, 0x00], 0),
            Err(DnsError::MalformedMessage(_))
        ));
    }
}
