//! Paths addressing elements of a DER tag tree
//!
//! Consider the following production rule:
//!
//! ```text
//! BankAccountSet ::= SET OF {
//!   account       BankAccount
//! }
//! BankAccount ::= SEQUENCE {
//!   accountNumber OCTET STRING,
//!   accountName   OCTET STRING,
//!   balance       REAL
//! }
//! ```
//!
//! Given a set with two accounts, the balance of the second account is at
//! `/SET/SEQ[1]/REAL[2]`. Index 0 is never printed, so the first account's
//! number is simply `/SET/SEQ/OCTSTR`.

use crate::error::{DerError, DerResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Separates nodes in the text form of a path
pub const PATH_SEPARATOR: char = '/';

/// Segment grammar: a bare name, `APP(n)` or `CTX(n)`, then an optional `[i]`
static NODE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z]+|APP\(\d+\)|CTX\(\d+\))(?:\[(-?\d+)\])?$")
        .expect("node pattern is a valid regex")
});

/// One element of a [`DerPath`]: a tag name and its sibling position
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathNode {
    name: Cow<'static, str>,
    index: usize,
}

impl PathNode {
    pub fn new(name: impl Into<Cow<'static, str>>, index: usize) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Zero-based position among all siblings at this level
    pub fn index(&self) -> usize {
        self.index
    }

    fn parse(segment: &str) -> DerResult<Self> {
        let captures = NODE_PATTERN
            .captures(segment)
            .ok_or_else(|| DerError::InvalidPathSyntax(segment.to_string()))?;
        let index = match captures.get(2) {
            Some(index) if index.as_str().starts_with('-') => {
                return Err(DerError::NegativeIndex(segment.to_string()));
            }
            Some(index) => index
                .as_str()
                .parse::<usize>()
                .map_err(|_| DerError::InvalidPathSyntax(segment.to_string()))?,
            None => 0,
        };
        Ok(Self::new(captures[1].to_string(), index))
    }
}

impl fmt::Display for PathNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.index > 0 {
            write!(f, "[{}]", self.index)?;
        }
        Ok(())
    }
}

/// Location of an element in a DER tag tree
///
/// A path is both the parser's live cursor and the key under which handlers
/// are registered. Equality and hashing are structural, so a path parsed from
/// `"/SEQ[1]/INT"` and one built with `push_child` calls are interchangeable
/// map keys.
///
/// # Canonical Form
///
/// `/` + name for each node, with `[index]` appended only when the index is
/// greater than zero. The empty path prints as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DerPath {
    nodes: Vec<PathNode>,
}

impl DerPath {
    /// Create an empty (root) path
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a path from its text form, e.g. `/SEQ[1]/CTX(0)`
    ///
    /// Empty segments are skipped, so `""` and `"/"` both yield the root.
    ///
    /// # Error Handling
    /// - `InvalidPathSyntax` naming the first malformed segment
    /// - `NegativeIndex` for a segment such as `SEQ[-1]`
    pub fn parse(text: &str) -> DerResult<Self> {
        let mut path = Self::new();
        for segment in text.split(PATH_SEPARATOR).filter(|s| !s.is_empty()) {
            path.nodes.push(PathNode::parse(segment)?);
        }
        Ok(path)
    }

    /// Append a node
    ///
    /// # Returns
    /// Self for method chaining
    pub fn push_child(&mut self, name: impl Into<Cow<'static, str>>, index: usize) -> &mut Self {
        self.nodes.push(PathNode::new(name, index));
        self
    }

    /// Remove and return the last node
    ///
    /// # Error Handling
    /// Returns `EmptyPath` on the root path.
    pub fn pop_child(&mut self) -> DerResult<PathNode> {
        self.nodes.pop().ok_or(DerError::EmptyPath)
    }

    /// Get the last node without removing it
    pub fn last_child(&self) -> Option<&PathNode> {
        self.nodes.last()
    }

    /// Nodes from the root down
    pub fn nodes(&self) -> &[PathNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
    }
}

impl fmt::Display for DerPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            write!(f, "{}{}", PATH_SEPARATOR, node)?;
        }
        Ok(())
    }
}

impl FromStr for DerPath {
    type Err = DerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for DerPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DerPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Conversion into a [`DerPath`] for handler registration
pub trait IntoDerPath {
    fn into_der_path(self) -> DerResult<DerPath>;
}

impl IntoDerPath for DerPath {
    fn into_der_path(self) -> DerResult<DerPath> {
        Ok(self)
    }
}

impl IntoDerPath for &DerPath {
    fn into_der_path(self) -> DerResult<DerPath> {
        Ok(self.clone())
    }
}

impl IntoDerPath for &str {
    fn into_der_path(self) -> DerResult<DerPath> {
        DerPath::parse(self)
    }
}

impl IntoDerPath for String {
    fn into_der_path(self) -> DerResult<DerPath> {
        DerPath::parse(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_push_child_to_string() {
        let mut path = DerPath::new();
        path.push_child("SEQ", 0).push_child("INT", 0);
        assert_eq!(path.to_string(), "/SEQ/INT");

        let mut path = DerPath::new();
        path.push_child("SEQ", 1);
        assert_eq!(path.to_string(), "/SEQ[1]");
    }

    #[test]
    fn test_parsed_equals_built() {
        let parsed = DerPath::parse("/SEQ[1]/INT").unwrap();
        let mut built = DerPath::new();
        built.push_child("SEQ", 1).push_child("INT", 0);
        assert_eq!(parsed, built);

        let mut handlers = HashMap::new();
        handlers.insert(parsed, "int");
        assert_eq!(handlers.get(&built), Some(&"int"));
    }

    #[test]
    fn test_explicit_zero_index_is_canonicalized() {
        let path = DerPath::parse("/SEQ[0]/CTX(3)[0]").unwrap();
        assert_eq!(path.to_string(), "/SEQ/CTX(3)");
        assert_eq!(path, DerPath::parse("/SEQ/CTX(3)").unwrap());
    }

    #[test]
    fn test_parse_tagged_segments() {
        let path = DerPath::parse("/APP(24)/CTX(11)[2]").unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path.nodes()[0].name(), "APP(24)");
        assert_eq!(path.nodes()[1].name(), "CTX(11)");
        assert_eq!(path.nodes()[1].index(), 2);
        assert_eq!(path.last_child().unwrap().to_string(), "CTX(11)[2]");
    }

    #[test]
    fn test_parse_empty_path() {
        assert!(DerPath::parse("").unwrap().is_empty());
        assert!(DerPath::parse("/").unwrap().is_empty());
        assert_eq!(DerPath::new().to_string(), "");
    }

    #[test]
    fn test_invalid_segment() {
        assert_eq!(
            DerPath::parse("/SEQ/IN T"),
            Err(DerError::InvalidPathSyntax("IN T".to_string()))
        );
        assert_eq!(
            DerPath::parse("/CTX(a)"),
            Err(DerError::InvalidPathSyntax("CTX(a)".to_string()))
        );
        assert_eq!(
            DerPath::parse("/SEQ[1"),
            Err(DerError::InvalidPathSyntax("SEQ[1".to_string()))
        );
        assert_eq!(
            DerPath::parse("/SEQ[99999999999999999999999]"),
            Err(DerError::InvalidPathSyntax(
                "SEQ[99999999999999999999999]".to_string()
            ))
        );
    }

    #[test]
    fn test_negative_index() {
        assert_eq!(
            DerPath::parse("/SEQ[-1]"),
            Err(DerError::NegativeIndex("SEQ[-1]".to_string()))
        );
    }

    #[test]
    fn test_pop_child() {
        let mut path = DerPath::parse("/SEQ/INT[3]").unwrap();
        assert_eq!(path.pop_child().unwrap(), PathNode::new("INT", 3));
        assert_eq!(path.pop_child().unwrap(), PathNode::new("SEQ", 0));
        assert_eq!(path.pop_child(), Err(DerError::EmptyPath));
    }

    #[test]
    fn test_copy_is_independent() {
        let mut path = DerPath::parse("/SEQ").unwrap();
        let snapshot = path.clone();
        path.push_child("INT", 0);
        assert_eq!(snapshot.to_string(), "/SEQ");
        assert_eq!(path.to_string(), "/SEQ/INT");
    }

    #[test]
    fn test_serde_as_string() {
        let path = DerPath::parse("/SEQ[1]/OCTSTR").unwrap();
        assert_eq!(serde_json::to_string(&path).unwrap(), r#""/SEQ[1]/OCTSTR""#);
        let parsed: DerPath = serde_json::from_str(r#""/SET/SEQ[2]""#).unwrap();
        assert_eq!(parsed.to_string(), "/SET/SEQ[2]");
        assert!(serde_json::from_str::<DerPath>(r#""/S-Q""#).is_err());
    }
}
