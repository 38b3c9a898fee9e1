//! SAX-like DER parser with path-addressed handlers
//!
//! The parser walks the encoded bytes depth-first without building a tree.
//! For every tag it pushes a node on its path cursor, fires the handler
//! registered for exactly that path (if any), descends into constructed
//! values, then pops the node and moves on to the next sibling.
//!
//! # Usage Example
//!
//! ```rust
//! use ldap_asn1::der::{decoder, DerParser};
//!
//! // SEQUENCE { INTEGER 5, OCTET STRING "ok" }
//! let data = [0x30, 0x07, 0x02, 0x01, 0x05, 0x04, 0x02, 0x6f, 0x6b];
//!
//! let mut code = None;
//! let mut parser = DerParser::new();
//! parser
//!     .register_fn("/SEQ/INT", |_, buffer| {
//!         code = Some(decoder::decode_integer(buffer)?);
//!         Ok(())
//!     })
//!     .unwrap();
//! parser.parse_bytes(&data).unwrap();
//! drop(parser);
//! assert_eq!(code, Some(5));
//! ```

use crate::der::buffer::DerBuffer;
use crate::der::config::{IndefiniteLength, ParserConfig};
use crate::der::path::{DerPath, IntoDerPath};
use crate::der::tag::{DerTag, TagClass};
use crate::error::{DerError, DerResult};
use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

/// Callback fired when the parser visits a registered path
///
/// The buffer is positioned at the first value byte and its limit is the end
/// of the value. The parser repositions the same buffer as soon as the call
/// returns, so the handler must not keep it. Use
/// [`DerParser::current_path`] to learn where in the tree the call happened.
pub trait ParseHandler {
    fn handle(&mut self, parser: &DerParser<'_>, buffer: &mut DerBuffer<'_>) -> DerResult<()>;
}

struct FnHandler<F>(F);

impl<F> ParseHandler for FnHandler<F>
where
    F: FnMut(&DerParser<'_>, &mut DerBuffer<'_>) -> DerResult<()>,
{
    fn handle(&mut self, parser: &DerParser<'_>, buffer: &mut DerBuffer<'_>) -> DerResult<()> {
        (self.0)(parser, buffer)
    }
}

/// Path-addressed DER parser
///
/// Handlers are registered up front, then [`parse`](Self::parse) may be
/// called any number of times. Each parse starts from an empty path cursor;
/// the handler registry persists across parses.
///
/// The path cursor is shared mutable state, so one parser serves one call
/// chain at a time. `parse` takes `&mut self`, and the type is not `Sync`.
pub struct DerParser<'h> {
    config: ParserConfig,
    handlers: HashMap<DerPath, RefCell<Box<dyn ParseHandler + 'h>>>,
    tag_names: HashMap<(TagClass, u32), Cow<'static, str>>,
    current_path: DerPath,
}

impl<'h> DerParser<'h> {
    /// Create a parser with default settings
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            handlers: HashMap::new(),
            tag_names: HashMap::new(),
            current_path: DerPath::new(),
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Register a handler to fire when `path` is visited
    ///
    /// Registering a second handler for the same path replaces the first;
    /// the last registration wins.
    ///
    /// # Error Handling
    /// Returns `InvalidPathSyntax` or `NegativeIndex` for malformed path text.
    pub fn register_handler<P, H>(&mut self, path: P, handler: H) -> DerResult<()>
    where
        P: IntoDerPath,
        H: ParseHandler + 'h,
    {
        let path = path.into_der_path()?;
        log::debug!("Registering handler for {}", path);
        if self
            .handlers
            .insert(path, RefCell::new(Box::new(handler)))
            .is_some()
        {
            log::debug!("Replaced previously registered handler");
        }
        Ok(())
    }

    /// Register a closure to fire when `path` is visited
    ///
    /// Same semantics as [`register_handler`](Self::register_handler).
    pub fn register_fn<P, F>(&mut self, path: P, f: F) -> DerResult<()>
    where
        P: IntoDerPath,
        F: FnMut(&DerParser<'_>, &mut DerBuffer<'_>) -> DerResult<()> + 'h,
    {
        self.register_handler(path, FnHandler(f))
    }

    /// Give application or context tag `number` a readable path name
    ///
    /// Matching tags are then reported as [`DerTag::Custom`] and their path
    /// segment is `name` instead of `APP(n)`/`CTX(n)`.
    ///
    /// # Error Handling
    /// Returns `UnsupportedTagClass` for universal/private classes and
    /// `InvalidTagName` unless `name` is ASCII letters.
    pub fn register_tag_name(
        &mut self,
        class: TagClass,
        number: u32,
        name: impl Into<Cow<'static, str>>,
    ) -> DerResult<()> {
        if let DerTag::Custom { name, .. } = DerTag::custom(class, number, name, false)? {
            self.tag_names.insert((class, number), name);
        }
        Ok(())
    }

    /// Get a copy of the path currently visited
    ///
    /// Changes to the returned path do not affect the parser position.
    pub fn current_path(&self) -> DerPath {
        self.current_path.clone()
    }

    /// Parse the bytes in `[position, limit)` of `buffer`, firing handlers
    ///
    /// The buffer's position and limit are not restored afterwards.
    ///
    /// # Error Handling
    /// Any tag, length or bounds failure, a depth overflow, or an error
    /// returned by a handler aborts the parse. There is no partial result.
    pub fn parse(&mut self, buffer: &mut DerBuffer<'_>) -> DerResult<()> {
        self.current_path.clear();
        let end = buffer.limit();
        log::debug!(
            "Parsing {} bytes at offset {}",
            end - buffer.position(),
            buffer.position()
        );
        let result = self.parse_tags(buffer, end);
        if let Err(ref e) = result {
            log::debug!("Parse failed at '{}': {}", self.current_path, e);
        }
        self.current_path.clear();
        result
    }

    /// Parse a complete slice of DER-encoded bytes
    pub fn parse_bytes(&mut self, data: &[u8]) -> DerResult<()> {
        let mut buffer = DerBuffer::new(data);
        self.parse(&mut buffer)
    }

    /// Read a tag at the buffer position, applying registered tag names
    ///
    /// Returns `Ok(None)` when the buffer window is exhausted.
    pub fn read_tag(&self, buffer: &mut DerBuffer<'_>) -> DerResult<Option<DerTag>> {
        let tag = match DerTag::read_from(buffer)? {
            Some(tag) => tag,
            None => return Ok(None),
        };
        let class = tag.class();
        let number = tag.number();
        match self.tag_names.get(&(class, number)) {
            Some(name) => Ok(Some(DerTag::Custom {
                class,
                number,
                name: name.clone(),
                constructed: tag.is_constructed(),
            })),
            None => Ok(Some(tag)),
        }
    }

    /// Read a definite length, leaving the buffer at the first value byte
    ///
    /// Short form lengths occupy one byte. In the long form the low 7 bits of
    /// the first byte count the big-endian length bytes that follow; after
    /// reading them the limit is reset to the capacity so that only the value
    /// window set by the caller bounds later reads.
    ///
    /// # Error Handling
    /// - `IndefiniteLength` for `0x80` unless configured otherwise
    /// - `LengthOverflow` when the length does not fit in `usize`
    /// - `OutOfBounds` when the length bytes are truncated
    pub fn read_length(&self, buffer: &mut DerBuffer<'_>) -> DerResult<usize> {
        let first = buffer.read_u8()?;
        if first & 0x80 == 0 {
            return Ok(usize::from(first));
        }

        let count = usize::from(first & 0x7F);
        if count == 0 {
            return match self.config.indefinite_length {
                IndefiniteLength::Reject => Err(DerError::IndefiniteLength),
                IndefiniteLength::TreatAsEmpty => Ok(0),
            };
        }
        if count > size_of::<usize>() {
            return Err(DerError::LengthOverflow(count));
        }

        let bytes = buffer.read_bytes(count)?;
        let length = bytes
            .iter()
            .fold(0usize, |length, &b| (length << 8) | usize::from(b));
        buffer.set_limit(buffer.capacity())?;
        Ok(length)
    }

    /// Parse all sibling tags between the buffer position and `end`
    fn parse_tags(&mut self, buffer: &mut DerBuffer<'_>, end: usize) -> DerResult<()> {
        let mut index = 0;
        loop {
            buffer.set_limit(end)?;
            let tag = match self.read_tag(buffer)? {
                Some(tag) => tag,
                None => break,
            };
            if self.current_path.len() >= self.config.max_depth {
                log::warn!(
                    "Maximum depth {} exceeded at '{}'",
                    self.config.max_depth,
                    self.current_path
                );
                return Err(DerError::DepthExceeded(self.config.max_depth));
            }
            self.current_path.push_child(tag.name(), index);
            index += 1;
            self.parse_tag(&tag, buffer, end)?;
            self.current_path.pop_child()?;
        }
        Ok(())
    }

    /// Dispatch the handler for the current path and descend into `tag`
    fn parse_tag(&mut self, tag: &DerTag, buffer: &mut DerBuffer<'_>, end: usize) -> DerResult<()> {
        let length = self.read_length(buffer)?;
        let start = buffer.position();
        let next_pos = match start.checked_add(length) {
            Some(next_pos) if next_pos <= end => next_pos,
            _ => {
                return Err(DerError::OutOfBounds {
                    needed: length,
                    available: end.saturating_sub(start),
                });
            }
        };
        log::trace!(
            "{} ({} bytes at offset {})",
            self.current_path,
            length,
            start
        );

        buffer.set_limit(next_pos)?;
        if let Some(handler) = self.handlers.get(&self.current_path) {
            log::trace!("Invoking handler for {}", self.current_path);
            handler.borrow_mut().handle(self, buffer)?;
        }

        if tag.is_constructed() {
            buffer.set_limit(next_pos)?;
            buffer.set_position(start)?;
            self.parse_tags(buffer, next_pos)?;
        }

        buffer.set_limit(buffer.capacity())?;
        buffer.set_position(next_pos)
    }
}

impl Default for DerParser<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DerParser<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut paths: Vec<String> = self.handlers.keys().map(|p| p.to_string()).collect();
        paths.sort();
        f.debug_struct("DerParser")
            .field("config", &self.config)
            .field("handlers", &paths)
            .field("tag_names", &self.tag_names)
            .field("current_path", &self.current_path)
            .finish()
    }
}
