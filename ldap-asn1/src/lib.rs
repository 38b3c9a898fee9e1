//! ASN.1 processing module for LDAP wire structures
//!
//! This crate provides a SAX-like DER/BER parser: callers register handlers
//! against symbolic paths in the tag tree (`/SEQ/OCTSTR`, `/SEQ/CTX(0)[1]`)
//! and a single pass over the encoded bytes invokes only the handlers whose
//! path was actually visited. No parse tree is materialized.
//!
//! It also carries the small set of leaf value decoders and the TLV encoder
//! used by protocol messages (extended operations, controls).

pub mod error;
pub mod der;

pub use error::{DerError, DerResult};
pub use der::{
    DerBuffer, DerEncoder, DerParser, DerPath, DerTag, IndefiniteLength, IntoDerPath,
    ParseHandler, ParserConfig, PathNode, TagClass, UniversalTag,
};
