//! Leaf value decoders
//!
//! Each function consumes an entire value window, typically the
//! [`DerBuffer`](super::DerBuffer) handed to a parse handler, and converts
//! the content bytes of one primitive type. The tag and length have already
//! been read by the parser.
//!
//! # Usage Example
//!
//! ```rust
//! use ldap_asn1::der::decoder;
//!
//! let mut value: &[u8] = &[0xff, 0x7f];
//! assert_eq!(decoder::decode_integer(&mut value).unwrap(), -129);
//! ```

use crate::error::{DerError, DerResult};
use bytes::{Buf, Bytes};

/// Decode an OCTET STRING as raw bytes
pub fn decode_octet_string(buf: &mut impl Buf) -> Bytes {
    buf.copy_to_bytes(buf.remaining())
}

/// Decode an OCTET STRING (or any string type) as UTF-8 text
///
/// # Error Handling
/// Returns `InvalidValue` if the bytes are not valid UTF-8.
pub fn decode_string(buf: &mut impl Buf) -> DerResult<String> {
    let bytes = decode_octet_string(buf);
    String::from_utf8(bytes.to_vec())
        .map_err(|e| DerError::InvalidValue(format!("Invalid UTF-8 string: {}", e)))
}

/// Decode an INTEGER or ENUMERATED value
///
/// # Decoding Format
/// Big-endian two's complement, 1 to 8 bytes.
///
/// # Error Handling
/// Returns `InvalidValue` for an empty value or one too large for `i64`.
pub fn decode_integer(buf: &mut impl Buf) -> DerResult<i64> {
    let len = buf.remaining();
    if len == 0 {
        return Err(DerError::InvalidValue("Empty integer encoding".to_string()));
    }
    if len > 8 {
        return Err(DerError::InvalidValue(format!(
            "Integer too large: {} bytes (max 8)",
            len
        )));
    }
    Ok(buf.get_int(len))
}

/// Decode a non-negative INTEGER
///
/// A leading zero byte keeps values with the high bit set positive, so up
/// to 9 bytes are accepted.
///
/// # Error Handling
/// Returns `InvalidValue` for an empty, negative or oversized value.
pub fn decode_unsigned(buf: &mut impl Buf) -> DerResult<u64> {
    let mut len = buf.remaining();
    if len == 0 {
        return Err(DerError::InvalidValue("Empty integer encoding".to_string()));
    }
    if buf.chunk()[0] & 0x80 != 0 {
        return Err(DerError::InvalidValue(
            "Negative value for unsigned integer".to_string(),
        ));
    }
    if len == 9 && buf.chunk()[0] == 0 {
        buf.advance(1);
        len -= 1;
    }
    if len > 8 {
        return Err(DerError::InvalidValue(format!(
            "Integer too large: {} bytes (max 8)",
            len
        )));
    }
    Ok(buf.get_uint(len))
}

/// Decode a BOOLEAN
///
/// # Error Handling
/// Returns `InvalidValue` unless the value is exactly one byte.
pub fn decode_boolean(buf: &mut impl Buf) -> DerResult<bool> {
    if buf.remaining() != 1 {
        return Err(DerError::InvalidValue(format!(
            "Boolean must be 1 byte, got {}",
            buf.remaining()
        )));
    }
    Ok(buf.get_u8() != 0)
}

/// Check a NULL value is empty
pub fn decode_null(buf: &mut impl Buf) -> DerResult<()> {
    if buf.has_remaining() {
        return Err(DerError::InvalidValue(format!(
            "Null must be empty, got {} bytes",
            buf.remaining()
        )));
    }
    Ok(())
}

/// Decode an OBJECT IDENTIFIER into its components
///
/// # OID Decoding Rules
/// - Every subidentifier is base-128, bit 7 set on all but its last byte
/// - The first subidentifier packs two arcs as 40*X + Y; values of 80 and
///   above all belong to arc 2
pub fn decode_object_identifier(buf: &mut impl Buf) -> DerResult<Vec<u32>> {
    if !buf.has_remaining() {
        return Err(DerError::InvalidValue(
            "Empty object identifier encoding".to_string(),
        ));
    }

    let first = read_subidentifier(buf)?;
    let mut oid = match first {
        0..=39 => vec![0, first],
        40..=79 => vec![1, first - 40],
        _ => vec![2, first - 80],
    };
    while buf.has_remaining() {
        oid.push(read_subidentifier(buf)?);
    }

    Ok(oid)
}

fn read_subidentifier(buf: &mut impl Buf) -> DerResult<u32> {
    let mut component = 0u32;
    loop {
        if !buf.has_remaining() {
            return Err(DerError::InvalidValue(
                "Truncated object identifier component".to_string(),
            ));
        }
        let byte = buf.get_u8();
        component = component
            .checked_mul(128)
            .and_then(|x| x.checked_add(u32::from(byte & 0x7F)))
            .ok_or_else(|| DerError::InvalidValue("OID component overflow".to_string()))?;
        if byte & 0x80 == 0 {
            return Ok(component);
        }
    }
}

/// Decode an OBJECT IDENTIFIER into dotted text, e.g. `1.3.6.1.4.1.4203.1.11.1`
pub fn decode_oid_string(buf: &mut impl Buf) -> DerResult<String> {
    let components = decode_object_identifier(buf)?;
    Ok(components
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join("."))
}

/// Decode a BIT STRING
///
/// # Returns
/// `(bytes, unused_bits)` where `unused_bits` (0-7) counts the padding
/// bits in the last byte.
pub fn decode_bit_string(buf: &mut impl Buf) -> DerResult<(Bytes, u8)> {
    if !buf.has_remaining() {
        return Err(DerError::InvalidValue("Empty bit string encoding".to_string()));
    }
    let unused_bits = buf.get_u8();
    if unused_bits > 7 || (unused_bits > 0 && !buf.has_remaining()) {
        return Err(DerError::InvalidValue(format!(
            "Invalid unused bits: {}",
            unused_bits
        )));
    }
    Ok((decode_octet_string(buf), unused_bits))
}
