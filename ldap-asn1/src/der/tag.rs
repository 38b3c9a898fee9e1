//! DER tag identity

use crate::der::buffer::DerBuffer;
use crate::der::universal::UniversalTag;
use crate::error::{DerError, DerResult};
use bytes::Buf;
use std::borrow::Cow;
use std::fmt;

/// Largest tag number expressible in the low-tag-number form
pub const MAX_LOW_TAG_NUMBER: u32 = 30;

const CONSTRUCTED_BIT: u8 = 0x20;
const TAG_NUMBER_MASK: u8 = 0x1F;

/// DER Tag Class
///
/// ASN.1 defines four tag classes:
/// - **Universal**: Standard ASN.1 types (INTEGER, OCTET STRING, etc.)
/// - **Application**: Application-wide types (LDAP protocol operations)
/// - **Context-specific**: Context-dependent types (fields inside a SEQUENCE)
/// - **Private**: Recognized, but no tag variant supports it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagClass {
    /// Universal class (00)
    Universal = 0,
    /// Application class (01)
    Application = 1,
    /// Context-specific class (10)
    Context = 2,
    /// Private class (11)
    Private = 3,
}

impl TagClass {
    /// Get tag class from bits 7-6 of a tag byte
    pub fn from_bits(byte: u8) -> Self {
        match (byte >> 6) & 0x03 {
            0 => TagClass::Universal,
            1 => TagClass::Application,
            2 => TagClass::Context,
            _ => TagClass::Private,
        }
    }

    /// Convert tag class to bits 7-6 of a tag byte
    pub fn to_bits(self) -> u8 {
        (self as u8) << 6
    }
}

impl fmt::Display for TagClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TagClass::Universal => "universal",
            TagClass::Application => "application",
            TagClass::Context => "context-specific",
            TagClass::Private => "private",
        };
        f.write_str(name)
    }
}

/// Identity of one decoded tag byte
///
/// The name of a tag is the path segment it contributes to a
/// [`DerPath`](super::DerPath):
///
/// | Variant | Name |
/// |---------|------|
/// | `Universal` | table name, e.g. `SEQ` |
/// | `Application` | `APP(n)` |
/// | `Context` | `CTX(n)` |
/// | `Custom` | the supplied name |
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DerTag {
    Universal {
        tag: UniversalTag,
        constructed: bool,
    },
    Application {
        number: u32,
        constructed: bool,
    },
    Context {
        number: u32,
        constructed: bool,
    },
    /// Application or context tag carrying a readable name
    Custom {
        class: TagClass,
        number: u32,
        name: Cow<'static, str>,
        constructed: bool,
    },
}

impl DerTag {
    /// Universal tag in its canonical DER form
    pub fn universal(tag: UniversalTag) -> Self {
        DerTag::Universal {
            tag,
            constructed: tag.is_constructed(),
        }
    }

    pub fn application(number: u32, constructed: bool) -> Self {
        DerTag::Application {
            number,
            constructed,
        }
    }

    pub fn context(number: u32, constructed: bool) -> Self {
        DerTag::Context {
            number,
            constructed,
        }
    }

    /// Create a named application or context tag
    ///
    /// # Error Handling
    /// Returns `UnsupportedTagClass` for universal and private classes and
    /// `InvalidTagName` unless the name is non-empty ASCII letters (the only
    /// bare names the path syntax accepts) distinct from every universal tag
    /// name.
    pub fn custom(
        class: TagClass,
        number: u32,
        name: impl Into<Cow<'static, str>>,
        constructed: bool,
    ) -> DerResult<Self> {
        if !matches!(class, TagClass::Application | TagClass::Context) {
            return Err(DerError::UnsupportedTagClass(class));
        }
        let name = name.into();
        if name.is_empty()
            || !name.chars().all(|c| c.is_ascii_alphabetic())
            || UniversalTag::from_name(&name).is_some()
        {
            return Err(DerError::InvalidTagName(name.into_owned()));
        }
        Ok(DerTag::Custom {
            class,
            number,
            name,
            constructed,
        })
    }

    /// Read a tag from the byte at the buffer's position
    ///
    /// Consumes exactly one byte. Returns `Ok(None)` when the buffer window is
    /// exhausted, which signals that no more siblings follow.
    ///
    /// # Error Handling
    /// - `UnsupportedTagClass` for a private class byte
    /// - `HighTagNumber` when the tag number bits are all set
    /// - `UnknownUniversalTag` for universal numbers absent from the table
    pub fn read_from(buffer: &mut DerBuffer<'_>) -> DerResult<Option<Self>> {
        if !buffer.has_remaining() {
            return Ok(None);
        }
        let byte = buffer.read_u8()?;
        Self::from_byte(byte).map(Some)
    }

    /// Decode a single low-tag-number form tag byte
    pub fn from_byte(byte: u8) -> DerResult<Self> {
        let class = TagClass::from_bits(byte);
        if class == TagClass::Private {
            return Err(DerError::UnsupportedTagClass(class));
        }
        let number = byte & TAG_NUMBER_MASK;
        if number == TAG_NUMBER_MASK {
            return Err(DerError::HighTagNumber);
        }
        let number = u32::from(number);
        let constructed = byte & CONSTRUCTED_BIT != 0;
        match class {
            TagClass::Universal => Ok(DerTag::Universal {
                tag: UniversalTag::from_number(number)?,
                constructed,
            }),
            TagClass::Application => Ok(DerTag::application(number, constructed)),
            _ => Ok(DerTag::context(number, constructed)),
        }
    }

    /// Encode this tag as a single tag byte
    ///
    /// # Error Handling
    /// Returns `HighTagNumber` for tag numbers above 30 and
    /// `UnsupportedTagClass` for a private custom tag.
    pub fn to_byte(&self) -> DerResult<u8> {
        let class = self.class();
        if class == TagClass::Private {
            return Err(DerError::UnsupportedTagClass(class));
        }
        let number = self.number();
        if number > MAX_LOW_TAG_NUMBER {
            return Err(DerError::HighTagNumber);
        }
        let constructed_bit = if self.is_constructed() {
            CONSTRUCTED_BIT
        } else {
            0
        };
        Ok(class.to_bits() | constructed_bit | number as u8)
    }

    pub fn class(&self) -> TagClass {
        match self {
            DerTag::Universal { .. } => TagClass::Universal,
            DerTag::Application { .. } => TagClass::Application,
            DerTag::Context { .. } => TagClass::Context,
            DerTag::Custom { class, .. } => *class,
        }
    }

    pub fn number(&self) -> u32 {
        match self {
            DerTag::Universal { tag, .. } => tag.number(),
            DerTag::Application { number, .. }
            | DerTag::Context { number, .. }
            | DerTag::Custom { number, .. } => *number,
        }
    }

    pub fn is_constructed(&self) -> bool {
        match self {
            DerTag::Universal { constructed, .. }
            | DerTag::Application { constructed, .. }
            | DerTag::Context { constructed, .. }
            | DerTag::Custom { constructed, .. } => *constructed,
        }
    }

    /// Path segment name of this tag
    pub fn name(&self) -> Cow<'static, str> {
        match self {
            DerTag::Universal { tag, .. } => Cow::Borrowed(tag.name()),
            DerTag::Application { number, .. } => Cow::Owned(format!("APP({})", number)),
            DerTag::Context { number, .. } => Cow::Owned(format!("CTX({})", number)),
            DerTag::Custom { name, .. } => name.clone(),
        }
    }
}

impl fmt::Display for DerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_universal_tag() {
        let data = [0x30, 0x04];
        let mut buffer = DerBuffer::new(&data);
        let tag = DerTag::read_from(&mut buffer).unwrap().unwrap();
        assert_eq!(tag, DerTag::universal(UniversalTag::Seq));
        assert_eq!(tag.name(), "SEQ");
        assert!(tag.is_constructed());
        assert_eq!(buffer.position(), 1);
    }

    #[test]
    fn test_read_application_and_context_tags() {
        let tag = DerTag::from_byte(0x78).unwrap();
        assert_eq!(tag, DerTag::application(24, true));
        assert_eq!(tag.name(), "APP(24)");

        let tag = DerTag::from_byte(0x80).unwrap();
        assert_eq!(tag, DerTag::context(0, false));
        assert_eq!(tag.name(), "CTX(0)");
        assert_eq!(tag.class(), TagClass::Context);
    }

    #[test]
    fn test_read_end_of_input() {
        let data = [0x04];
        let mut buffer = DerBuffer::new(&data);
        buffer.set_limit(0).unwrap();
        assert_eq!(DerTag::read_from(&mut buffer).unwrap(), None);
    }

    #[test]
    fn test_private_class_unsupported() {
        assert_eq!(
            DerTag::from_byte(0xC1),
            Err(DerError::UnsupportedTagClass(TagClass::Private))
        );
    }

    #[test]
    fn test_high_tag_number_rejected() {
        assert_eq!(DerTag::from_byte(0x9F), Err(DerError::HighTagNumber));
        assert_eq!(DerTag::from_byte(0x1F), Err(DerError::HighTagNumber));
    }

    #[test]
    fn test_unknown_universal_tag() {
        assert_eq!(
            DerTag::from_byte(0x00),
            Err(DerError::UnknownUniversalTag(0))
        );
    }

    #[test]
    fn test_custom_tag() {
        let tag = DerTag::custom(TagClass::Context, 3, "cookie", false).unwrap();
        assert_eq!(tag.name(), "cookie");
        assert_eq!(tag.to_byte().unwrap(), 0x83);
        assert!(DerTag::custom(TagClass::Universal, 3, "X", false).is_err());
        assert_eq!(
            DerTag::custom(TagClass::Application, 3, "two words", false),
            Err(DerError::InvalidTagName("two words".to_string()))
        );
        assert_eq!(
            DerTag::custom(TagClass::Context, 0, "SEQ", false),
            Err(DerError::InvalidTagName("SEQ".to_string()))
        );
        assert!(DerTag::custom(TagClass::Context, 0, "octstr", false).is_err());
    }

    #[test]
    fn test_to_byte() {
        assert_eq!(DerTag::universal(UniversalTag::Int).to_byte().unwrap(), 0x02);
        assert_eq!(DerTag::application(0, true).to_byte().unwrap(), 0x60);
        assert_eq!(DerTag::context(31, false).to_byte(), Err(DerError::HighTagNumber));
    }
}
