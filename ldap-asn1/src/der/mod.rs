//! Path-addressed DER parser, value decoders and TLV encoder
//!
//! # ASN.1 BER/DER Encoding Overview
//!
//! Each ASN.1 value is encoded as a TLV (Tag-Length-Value) triplet:
//!
//! ```text
//! [Tag] [Length] [Value]
//! ```
//!
//! ## Tag Encoding
//!
//! ```text
//! Bits: 8 7 6 5 4 3 2 1
//!       C C P T T T T T
//! ```
//! Where:
//! - CC = Class (00=Universal, 01=Application, 10=Context, 11=Private)
//! - P = Primitive (0) or Constructed (1)
//! - TTTTT = Tag number (0-30)
//!
//! Only the low-tag-number form is accepted. A leading byte whose tag bits
//! are all set (`11111`) announces the high-tag-number form and is rejected
//! with [`DerError::HighTagNumber`](crate::DerError::HighTagNumber).
//! Private class tags are rejected with
//! [`DerError::UnsupportedTagClass`](crate::DerError::UnsupportedTagClass).
//!
//! ## Length Encoding
//!
//! - **Short form** (1 byte): bit 7 = 0, bits 6-0 = length (0-127)
//! - **Long form**: first byte bit 7 = 1, bits 6-0 = number of following
//!   big-endian length bytes
//! - **Indefinite form** (`0x80`): rejected unless
//!   [`IndefiniteLength::TreatAsEmpty`] is configured
//!
//! # Paths
//!
//! A [`DerPath`] names a location in the tag tree. Each node is the tag name
//! plus the zero-based position of that element among *all* its siblings:
//!
//! ```text
//! 30 0c                 SEQUENCE            /SEQ
//!    04 03 61 62 63       OCTET STRING      /SEQ/OCTSTR
//!    02 01 05             INTEGER           /SEQ/INT[1]
//!    04 02 78 79          OCTET STRING      /SEQ/OCTSTR[2]
//! ```
//!
//! # Usage Example
//!
//! ```rust
//! use ldap_asn1::der::{decoder, DerParser};
//!
//! let mut names = Vec::new();
//! let mut parser = DerParser::new();
//! parser
//!     .register_fn("/SEQ/OCTSTR", |_, buffer| {
//!         names.push(decoder::decode_string(buffer)?);
//!         Ok(())
//!     })
//!     .unwrap();
//! parser.parse_bytes(&[0x30, 0x05, 0x04, 0x03, 0x61, 0x62, 0x63]).unwrap();
//! drop(parser);
//! assert_eq!(names, vec!["abc".to_string()]);
//! ```

pub mod buffer;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod parser;
pub mod path;
pub mod tag;
pub mod universal;

pub use buffer::DerBuffer;
pub use config::{IndefiniteLength, ParserConfig};
pub use encoder::DerEncoder;
pub use parser::{DerParser, ParseHandler};
pub use path::{DerPath, IntoDerPath, PathNode};
pub use tag::{DerTag, TagClass};
pub use universal::UniversalTag;
