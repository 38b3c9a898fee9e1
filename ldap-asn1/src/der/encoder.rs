//! DER encoder for protocol messages
//!
//! The parser never encodes; this is the construction side used when
//! building request values such as an extended operation's SEQUENCE of
//! context-tagged fields.
//!
//! # Usage Example
//!
//! ```rust
//! use ldap_asn1::der::DerEncoder;
//!
//! // PasswdModifyRequestValue ::= SEQUENCE { userIdentity [0] OCTET STRING }
//! let mut encoder = DerEncoder::new();
//! encoder
//!     .encode_sequence(|seq| seq.encode_context_specific(0, b"uid=jdoe"))
//!     .unwrap();
//! assert_eq!(&encoder.as_bytes()[..4], &[0x30, 0x0a, 0x80, 0x08]);
//! ```

use crate::der::tag::DerTag;
use crate::der::universal::UniversalTag;
use crate::error::{DerError, DerResult};
use bytes::{BufMut, Bytes, BytesMut};

/// DER encoder accumulating TLV triplets
///
/// Lengths are always definite and minimal. Constructed values are built
/// with a closure that encodes the children into a nested encoder, after
/// which the enclosing length is known.
#[derive(Debug, Clone, Default)]
pub struct DerEncoder {
    buffer: BytesMut,
}

impl DerEncoder {
    /// Create a new DER encoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new DER encoder with initial capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
        }
    }

    /// Encode a TLV (Tag-Length-Value) triplet
    ///
    /// # Error Handling
    /// Returns `HighTagNumber` for tags that need more than one byte.
    pub fn encode_tlv(&mut self, tag: &DerTag, value: &[u8]) -> DerResult<()> {
        self.buffer.put_u8(tag.to_byte()?);
        encode_length(&mut self.buffer, value.len());
        self.buffer.put_slice(value);
        Ok(())
    }

    /// Encode a constructed value whose children are written by `f`
    pub fn encode_constructed<F>(&mut self, tag: &DerTag, f: F) -> DerResult<()>
    where
        F: FnOnce(&mut DerEncoder) -> DerResult<()>,
    {
        if !tag.is_constructed() {
            return Err(DerError::InvalidValue(format!(
                "Tag {} is not constructed",
                tag
            )));
        }
        let mut inner = DerEncoder::new();
        f(&mut inner)?;
        self.encode_tlv(tag, &inner.buffer)
    }

    /// Encode a SEQUENCE whose elements are written by `f`
    pub fn encode_sequence<F>(&mut self, f: F) -> DerResult<()>
    where
        F: FnOnce(&mut DerEncoder) -> DerResult<()>,
    {
        self.encode_constructed(&DerTag::universal(UniversalTag::Seq), f)
    }

    /// Encode a SET whose elements are written by `f`
    pub fn encode_set<F>(&mut self, f: F) -> DerResult<()>
    where
        F: FnOnce(&mut DerEncoder) -> DerResult<()>,
    {
        self.encode_constructed(&DerTag::universal(UniversalTag::Set), f)
    }

    /// Encode an INTEGER in minimal two's complement form
    pub fn encode_integer(&mut self, value: i64) -> DerResult<()> {
        self.encode_tlv(&DerTag::universal(UniversalTag::Int), &integer_bytes(value))
    }

    /// Encode an ENUMERATED value
    pub fn encode_enumerated(&mut self, value: i64) -> DerResult<()> {
        self.encode_tlv(&DerTag::universal(UniversalTag::Enum), &integer_bytes(value))
    }

    /// Encode a BOOLEAN (DER uses 0xFF for true)
    pub fn encode_boolean(&mut self, value: bool) -> DerResult<()> {
        let byte = if value { 0xFF } else { 0x00 };
        self.encode_tlv(&DerTag::universal(UniversalTag::Bool), &[byte])
    }

    /// Encode a NULL
    pub fn encode_null(&mut self) -> DerResult<()> {
        self.encode_tlv(&DerTag::universal(UniversalTag::Null), &[])
    }

    /// Encode an OCTET STRING
    pub fn encode_octet_string(&mut self, value: &[u8]) -> DerResult<()> {
        self.encode_tlv(&DerTag::universal(UniversalTag::OctStr), value)
    }

    /// Encode an OBJECT IDENTIFIER
    ///
    /// # OID Encoding Rules
    /// - First two components (X.Y) are encoded as: 40*X + Y
    /// - Remaining components are encoded in base-128 (variable length)
    ///
    /// # Error Handling
    /// Returns `InvalidValue` for fewer than two components or a first arc
    /// above 2.
    pub fn encode_object_identifier(&mut self, oid: &[u32]) -> DerResult<()> {
        if oid.len() < 2 {
            return Err(DerError::InvalidValue(
                "Object identifier must have at least 2 components".to_string(),
            ));
        }
        if oid[0] > 2 || (oid[0] < 2 && oid[1] > 39) {
            return Err(DerError::InvalidValue(format!(
                "Invalid leading object identifier arcs: {}.{}",
                oid[0], oid[1]
            )));
        }

        let mut bytes = BytesMut::new();
        let first = oid[0]
            .checked_mul(40)
            .and_then(|x| x.checked_add(oid[1]))
            .ok_or_else(|| DerError::InvalidValue("OID component too large".to_string()))?;
        put_base128(&mut bytes, first);
        for &component in &oid[2..] {
            put_base128(&mut bytes, component);
        }

        self.encode_tlv(&DerTag::universal(UniversalTag::Oid), &bytes)
    }

    /// Encode a primitive context-specific value, e.g. `[0] IMPLICIT OCTET STRING`
    pub fn encode_context_specific(&mut self, number: u32, value: &[u8]) -> DerResult<()> {
        self.encode_tlv(&DerTag::context(number, false), value)
    }

    /// Encode a primitive application value
    pub fn encode_application(&mut self, number: u32, value: &[u8]) -> DerResult<()> {
        self.encode_tlv(&DerTag::application(number, false), value)
    }

    /// Get the encoded bytes
    pub fn into_bytes(self) -> Bytes {
        self.buffer.freeze()
    }

    /// Get a reference to the encoded bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Clear the encoder buffer
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

/// Write a definite length in the shortest form
fn encode_length(out: &mut BytesMut, length: usize) {
    if length < 0x80 {
        out.put_u8(length as u8);
        return;
    }
    let bytes = length.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count();
    out.put_u8(0x80 | (bytes.len() - skip) as u8);
    out.put_slice(&bytes[skip..]);
}

/// Minimal big-endian two's complement bytes of `value`
fn integer_bytes(value: i64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let mut start = 0;
    // drop leading bytes that only repeat the sign of the next byte
    while start < bytes.len() - 1 {
        let redundant = (bytes[start] == 0x00 && bytes[start + 1] & 0x80 == 0)
            || (bytes[start] == 0xFF && bytes[start + 1] & 0x80 != 0);
        if !redundant {
            break;
        }
        start += 1;
    }
    bytes[start..].to_vec()
}

fn put_base128(out: &mut BytesMut, mut value: u32) {
    let mut groups = [0u8; 5];
    let mut count = 0;
    loop {
        groups[count] = (value & 0x7F) as u8;
        count += 1;
        value >>= 7;
        if value == 0 {
            break;
        }
    }
    for i in (0..count).rev() {
        let continuation = if i > 0 { 0x80 } else { 0x00 };
        out.put_u8(groups[i] | continuation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::der::decoder;

    #[test]
    fn test_encode_integer() {
        let cases: [(i64, &[u8]); 7] = [
            (0, &[0x00]),
            (127, &[0x7f]),
            (128, &[0x00, 0x80]),
            (256, &[0x01, 0x00]),
            (-1, &[0xff]),
            (-128, &[0x80]),
            (-129, &[0xff, 0x7f]),
        ];
        for (value, expected) in cases {
            let mut encoder = DerEncoder::new();
            encoder.encode_integer(value).unwrap();
            let bytes = encoder.into_bytes();
            assert_eq!(bytes[0], 0x02);
            assert_eq!(usize::from(bytes[1]), expected.len());
            assert_eq!(&bytes[2..], expected, "value {}", value);
        }
    }

    #[test]
    fn test_encode_long_length() {
        let value = vec![0x41u8; 300];
        let mut encoder = DerEncoder::new();
        encoder.encode_octet_string(&value).unwrap();
        assert_eq!(&encoder.as_bytes()[..4], &[0x04, 0x82, 0x01, 0x2c]);
        assert_eq!(encoder.as_bytes().len(), 304);
    }

    #[test]
    fn test_encode_object_identifier() {
        let mut encoder = DerEncoder::new();
        encoder
            .encode_object_identifier(&[1, 3, 6, 1, 4, 1, 4203, 1, 11, 1])
            .unwrap();
        let bytes = encoder.into_bytes();
        assert_eq!(bytes[0], 0x06);
        let mut value = &bytes[2..];
        assert_eq!(
            decoder::decode_oid_string(&mut value).unwrap(),
            "1.3.6.1.4.1.4203.1.11.1"
        );

        let mut encoder = DerEncoder::new();
        encoder.encode_object_identifier(&[2, 999, 3]).unwrap();
        assert_eq!(encoder.as_bytes(), &[0x06, 0x03, 0x88, 0x37, 0x03]);
        let mut value = &encoder.as_bytes()[2..];
        assert_eq!(
            decoder::decode_object_identifier(&mut value).unwrap(),
            vec![2, 999, 3]
        );

        let mut encoder = DerEncoder::new();
        assert!(encoder.encode_object_identifier(&[1]).is_err());
        assert!(encoder.encode_object_identifier(&[3, 1]).is_err());
    }

    #[test]
    fn test_encode_nested_sequence() {
        let mut encoder = DerEncoder::new();
        encoder
            .encode_sequence(|seq| {
                seq.encode_context_specific(0, b"uid=jdoe")?;
                seq.encode_constructed(&DerTag::context(1, true), |ctx| {
                    ctx.encode_boolean(true)
                })?;
                seq.encode_null()
            })
            .unwrap();
        assert_eq!(
            encoder.as_bytes(),
            &[
                0x30, 0x11, 0x80, 0x08, b'u', b'i', b'd', b'=', b'j', b'd', b'o', b'e', 0xa1,
                0x03, 0x01, 0x01, 0xff, 0x05, 0x00
            ]
        );
    }

    #[test]
    fn test_constructed_requires_constructed_tag() {
        let mut encoder = DerEncoder::new();
        assert!(encoder
            .encode_constructed(&DerTag::context(0, false), |_| Ok(()))
            .is_err());
        assert!(encoder.encode_context_specific(31, b"x").is_err());
        assert!(encoder.as_bytes().is_empty());
    }

    #[test]
    fn test_clear() {
        let mut encoder = DerEncoder::with_capacity(16);
        encoder.encode_enumerated(2).unwrap();
        encoder.encode_application(1, &[]).unwrap();
        assert_eq!(encoder.as_bytes(), &[0x0a, 0x01, 0x02, 0x41, 0x00]);
        encoder.clear();
        assert!(encoder.as_bytes().is_empty());
    }
}
