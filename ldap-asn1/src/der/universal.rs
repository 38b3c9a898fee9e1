//! Universal class tag table

use crate::error::{DerError, DerResult};
use std::fmt;

/// Well-known universal ASN.1 tags
///
/// The discriminant is the universal tag number. The short name returned by
/// [`UniversalTag::name`] is what appears as a path segment, e.g. `SEQ` in
/// `/SEQ/INT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniversalTag {
    Bool = 1,
    Int = 2,
    BitStr = 3,
    OctStr = 4,
    Null = 5,
    Oid = 6,
    Real = 9,
    Enum = 10,
    Utf8Str = 12,
    RelOid = 13,
    Seq = 16,
    Set = 17,
    NumStr = 18,
    PrintStr = 19,
    T61Str = 20,
    VideotexStr = 21,
    Ia5Str = 22,
    UtcTime = 23,
    GenTime = 24,
    GraphicStr = 25,
    Iso646Str = 26,
    GeneralStr = 27,
    UniversalStr = 28,
    CharStr = 29,
    BmpStr = 30,
}

impl UniversalTag {
    const ALL: [UniversalTag; 25] = [
        UniversalTag::Bool,
        UniversalTag::Int,
        UniversalTag::BitStr,
        UniversalTag::OctStr,
        UniversalTag::Null,
        UniversalTag::Oid,
        UniversalTag::Real,
        UniversalTag::Enum,
        UniversalTag::Utf8Str,
        UniversalTag::RelOid,
        UniversalTag::Seq,
        UniversalTag::Set,
        UniversalTag::NumStr,
        UniversalTag::PrintStr,
        UniversalTag::T61Str,
        UniversalTag::VideotexStr,
        UniversalTag::Ia5Str,
        UniversalTag::UtcTime,
        UniversalTag::GenTime,
        UniversalTag::GraphicStr,
        UniversalTag::Iso646Str,
        UniversalTag::GeneralStr,
        UniversalTag::UniversalStr,
        UniversalTag::CharStr,
        UniversalTag::BmpStr,
    ];

    /// Resolve a universal tag number
    ///
    /// # Error Handling
    /// Returns `UnknownUniversalTag` for numbers absent from the table
    /// (including 0, the end-of-contents marker of indefinite encodings).
    pub fn from_number(number: u32) -> DerResult<Self> {
        match number {
            1 => Ok(UniversalTag::Bool),
            2 => Ok(UniversalTag::Int),
            3 => Ok(UniversalTag::BitStr),
            4 => Ok(UniversalTag::OctStr),
            5 => Ok(UniversalTag::Null),
            6 => Ok(UniversalTag::Oid),
            9 => Ok(UniversalTag::Real),
            10 => Ok(UniversalTag::Enum),
            12 => Ok(UniversalTag::Utf8Str),
            13 => Ok(UniversalTag::RelOid),
            16 => Ok(UniversalTag::Seq),
            17 => Ok(UniversalTag::Set),
            18 => Ok(UniversalTag::NumStr),
            19 => Ok(UniversalTag::PrintStr),
            20 => Ok(UniversalTag::T61Str),
            21 => Ok(UniversalTag::VideotexStr),
            22 => Ok(UniversalTag::Ia5Str),
            23 => Ok(UniversalTag::UtcTime),
            24 => Ok(UniversalTag::GenTime),
            25 => Ok(UniversalTag::GraphicStr),
            26 => Ok(UniversalTag::Iso646Str),
            27 => Ok(UniversalTag::GeneralStr),
            28 => Ok(UniversalTag::UniversalStr),
            29 => Ok(UniversalTag::CharStr),
            30 => Ok(UniversalTag::BmpStr),
            _ => Err(DerError::UnknownUniversalTag(number)),
        }
    }

    /// Look up a tag by its short name, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|tag| tag.name().eq_ignore_ascii_case(name))
    }

    /// Get the universal tag number
    pub fn number(self) -> u32 {
        self as u32
    }

    /// Get the canonical short name used in paths
    pub fn name(self) -> &'static str {
        match self {
            UniversalTag::Bool => "BOOL",
            UniversalTag::Int => "INT",
            UniversalTag::BitStr => "BITSTR",
            UniversalTag::OctStr => "OCTSTR",
            UniversalTag::Null => "NULL",
            UniversalTag::Oid => "OID",
            UniversalTag::Real => "REAL",
            UniversalTag::Enum => "ENUM",
            UniversalTag::Utf8Str => "UTF8STR",
            UniversalTag::RelOid => "RELOID",
            UniversalTag::Seq => "SEQ",
            UniversalTag::Set => "SET",
            UniversalTag::NumStr => "NUMSTR",
            UniversalTag::PrintStr => "PRINTSTR",
            UniversalTag::T61Str => "T61STR",
            UniversalTag::VideotexStr => "VIDEOTEXSTR",
            UniversalTag::Ia5Str => "IA5STR",
            UniversalTag::UtcTime => "UTCTIME",
            UniversalTag::GenTime => "GENTIME",
            UniversalTag::GraphicStr => "GRAPHICSTR",
            UniversalTag::Iso646Str => "ISO646STR",
            UniversalTag::GeneralStr => "GENERALSTR",
            UniversalTag::UniversalStr => "UNIVERSALSTR",
            UniversalTag::CharStr => "CHARSTR",
            UniversalTag::BmpStr => "BMPSTR",
        }
    }

    /// Whether DER requires the constructed form for this type
    pub fn is_constructed(self) -> bool {
        matches!(self, UniversalTag::Seq | UniversalTag::Set)
    }
}

impl fmt::Display for UniversalTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
