//! Rust implementation of LDAP protocol building blocks
//!
//! # Architecture
//!
//! This library is organized as a workspace:
//!
//! - `ldap-asn1`: path-addressed DER parsing, leaf value decoders and the
//!   TLV encoder used for extended operations and controls
//!
//! # Usage
//!
//! ```rust
//! use ldap::asn1::{decoder, DerParser};
//!
//! // SimplePagedResults control value: SEQUENCE { size INTEGER, cookie OCTET STRING }
//! let value = [0x30, 0x08, 0x02, 0x01, 0x64, 0x04, 0x03, 0x01, 0x02, 0x03];
//!
//! let mut size = 0;
//! let mut parser = DerParser::new();
//! parser
//!     .register_fn("/SEQ/INT", |_, buffer| {
//!         size = decoder::decode_integer(buffer)?;
//!         Ok(())
//!     })
//!     .unwrap();
//! parser.parse_bytes(&value).unwrap();
//! drop(parser);
//! assert_eq!(size, 100);
//! ```

// Re-export core types
pub use ldap_asn1::{DerError, DerResult};

// Re-export the ASN.1 API
pub mod asn1 {
    pub use ldap_asn1::der::*;
}

#[cfg(test)]
mod tests {
    use super::asn1::{decoder, DerEncoder, DerParser, DerTag, TagClass};
    use super::DerResult;
    use bytes::Bytes;

    /// Cookie and size of a SimplePagedResults response control
    fn decode_paged_results(value: &[u8]) -> DerResult<(i64, Bytes)> {
        let mut size = 0;
        let mut cookie = Bytes::new();
        let mut parser = DerParser::new();
        parser.register_fn("/SEQ/INT", |_, buffer| {
            size = decoder::decode_integer(buffer)?;
            Ok(())
        })?;
        parser.register_fn("/SEQ/OCTSTR[1]", |_, buffer| {
            cookie = decoder::decode_octet_string(buffer);
            Ok(())
        })?;
        parser.parse_bytes(value)?;
        drop(parser);
        Ok((size, cookie))
    }

    #[test]
    fn test_paged_results_round_trip() {
        let mut encoder = DerEncoder::new();
        encoder
            .encode_sequence(|seq| {
                seq.encode_integer(1500)?;
                seq.encode_octet_string(&[0xde, 0xad, 0xbe, 0xef])
            })
            .unwrap();
        let (size, cookie) = decode_paged_results(&encoder.into_bytes()).unwrap();
        assert_eq!(size, 1500);
        assert_eq!(cookie, Bytes::from_static(&[0xde, 0xad, 0xbe, 0xef]));
    }

    #[test]
    fn test_password_modify_response() {
        // PasswdModifyResponseValue ::= SEQUENCE { genPasswd [0] OCTET STRING OPTIONAL }
        let mut encoder = DerEncoder::new();
        encoder
            .encode_sequence(|seq| seq.encode_context_specific(0, b"s3cr3t"))
            .unwrap();
        let value = encoder.into_bytes();

        let mut generated = None;
        let mut parser = DerParser::new();
        parser
            .register_tag_name(TagClass::Context, 0, "genPasswd")
            .unwrap();
        parser
            .register_fn("/SEQ/genPasswd", |p, buffer| {
                assert_eq!(p.current_path().to_string(), "/SEQ/genPasswd");
                generated = Some(decoder::decode_string(buffer)?);
                Ok(())
            })
            .unwrap();
        parser.parse_bytes(&value).unwrap();
        drop(parser);
        assert_eq!(generated.as_deref(), Some("s3cr3t"));
    }

    #[test]
    fn test_extended_response_name() {
        // ExtendedResponse ::= [APPLICATION 24] SEQUENCE {
        //   resultCode ENUMERATED, matchedDN LDAPDN, diagnosticMessage LDAPString,
        //   responseName [10] LDAPOID OPTIONAL }
        let mut encoder = DerEncoder::new();
        encoder
            .encode_constructed(&DerTag::application(24, true), |op| {
                op.encode_enumerated(0)?;
                op.encode_octet_string(b"")?;
                op.encode_octet_string(b"")?;
                op.encode_context_specific(10, b"1.3.6.1.4.1.1466.20037")
            })
            .unwrap();
        let message = encoder.into_bytes();

        let mut result_code = None;
        let mut name = None;
        let mut parser = DerParser::new();
        parser
            .register_fn("/APP(24)/ENUM", |_, buffer| {
                result_code = Some(decoder::decode_integer(buffer)?);
                Ok(())
            })
            .unwrap();
        parser
            .register_fn("/APP(24)/CTX(10)[3]", |_, buffer| {
                name = Some(decoder::decode_string(buffer)?);
                Ok(())
            })
            .unwrap();
        parser.parse_bytes(&message).unwrap();
        drop(parser);
        assert_eq!(result_code, Some(0));
        assert_eq!(name.as_deref(), Some("1.3.6.1.4.1.1466.20037"));
    }

    #[test]
    fn test_errors_are_reexported() {
        let mut parser = DerParser::new();
        assert_eq!(
            parser.parse_bytes(&[0xdf, 0x00]),
            Err(super::DerError::UnsupportedTagClass(TagClass::Private))
        );
    }
}
