//! RDF node values and their metadata.

use crate::uri::{UriRef, file_uri};
use crate::{Status, vocab::xsd};
use oxilangtag::LanguageTag;
use std::fmt;
use std::ops::BitOr;

/// The variant of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A URI (more precisely an IRI reference).
    Uri,
    /// A prefixed name, not yet expanded against an environment.
    Curie,
    /// A blank node label, without the `_:` sigil.
    Blank,
    /// A literal value, possibly carrying a datatype or language tag.
    Literal,
    /// A variable name, without the `?` sigil.
    Variable,
}

/// Property bits of a [`Node`].
///
/// `HAS_NEWLINE` and `HAS_QUOTE` are set while the node string is first
/// scanned and drive the writer's choice of quoting. `HAS_DATATYPE` and
/// `HAS_LANGUAGE` are mutually exclusive and imply a meta node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NodeFlags(u8);

impl NodeFlags {
    pub const NONE: Self = Self(0);
    /// The node string contains a line ending.
    pub const HAS_NEWLINE: Self = Self(1);
    /// The node string contains a double quote.
    pub const HAS_QUOTE: Self = Self(1 << 1);
    /// The node is a literal with a datatype meta node.
    pub const HAS_DATATYPE: Self = Self(1 << 2);
    /// The node is a literal with a language-tag meta node.
    pub const HAS_LANGUAGE: Self = Self(1 << 3);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for NodeFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// An RDF node: a typed string with flags and optional metadata.
///
/// A literal with a datatype points to a URI meta node naming it; a literal
/// with a language tag points to a literal meta node holding the tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Node {
    kind: NodeKind,
    flags: NodeFlags,
    text: String,
    meta: Option<Box<Node>>,
}

impl Node {
    fn new(kind: NodeKind, text: impl Into<String>) -> Self {
        let text = text.into();
        let mut flags = NodeFlags::NONE;
        if text.bytes().any(|b| matches!(b, b'\n' | b'\r')) {
            flags = flags | NodeFlags::HAS_NEWLINE;
        }
        if text.bytes().any(|b| b == b'"') {
            flags = flags | NodeFlags::HAS_QUOTE;
        }
        Self {
            kind,
            flags,
            text,
            meta: None,
        }
    }

    /// A URI node from its string form.
    pub fn uri(value: impl Into<String>) -> Self {
        Self::new(NodeKind::Uri, value)
    }

    /// A URI node serialized from a parsed view.
    pub fn from_uri_view(view: &UriRef<'_>) -> Self {
        let mut text = String::new();
        view.write(&mut text);
        Self::new(NodeKind::Uri, text)
    }

    /// A `file:` URI node from a filesystem path and optional hostname.
    pub fn file_uri(path: &str, hostname: Option<&str>) -> Self {
        Self::new(NodeKind::Uri, file_uri(path, hostname))
    }

    /// A prefixed name node such as `eg:name`.
    pub fn curie(value: impl Into<String>) -> Self {
        Self::new(NodeKind::Curie, value)
    }

    /// A blank node from its label (without the `_:` sigil).
    pub fn blank(label: impl Into<String>) -> Self {
        Self::new(NodeKind::Blank, label)
    }

    /// A variable node from its name (without the `?` sigil).
    pub fn variable(name: impl Into<String>) -> Self {
        Self::new(NodeKind::Variable, name)
    }

    /// A simple literal without datatype or language.
    pub fn literal(value: impl Into<String>) -> Self {
        Self::new(NodeKind::Literal, value)
    }

    /// A language-tagged literal. The tag is validated and lowercased.
    pub fn plain_literal(value: impl Into<String>, language: &str) -> Result<Self, Status> {
        LanguageTag::parse(language).map_err(|_| Status::BadLiteral)?;
        Ok(Self::plain_literal_unchecked(
            value,
            language.to_ascii_lowercase(),
        ))
    }

    /// A language-tagged literal without tag validation, keeping its case.
    pub fn plain_literal_unchecked(value: impl Into<String>, language: impl Into<String>) -> Self {
        let mut node = Self::new(NodeKind::Literal, value);
        node.flags = node.flags | NodeFlags::HAS_LANGUAGE;
        node.meta = Some(Box::new(Self::new(NodeKind::Literal, language)));
        node
    }

    /// A typed literal. The datatype must be a URI or prefixed name.
    pub fn typed_literal(value: impl Into<String>, datatype: Node) -> Result<Self, Status> {
        if !matches!(datatype.kind, NodeKind::Uri | NodeKind::Curie) {
            return Err(Status::BadArg);
        }
        Ok(Self::with_datatype(value, datatype))
    }

    fn with_datatype(value: impl Into<String>, datatype: Node) -> Self {
        let mut node = Self::new(NodeKind::Literal, value);
        node.flags = node.flags | NodeFlags::HAS_DATATYPE;
        node.meta = Some(Box::new(datatype));
        node
    }

    /// A canonical `xsd:integer` literal.
    pub fn from_integer(value: i64) -> Self {
        Self::with_datatype(value.to_string(), Self::uri(xsd::INTEGER))
    }

    /// A canonical `xsd:decimal` literal (shortest round-trip form).
    ///
    /// Fails with `BadArg` on non-finite input, which `xsd:decimal` cannot
    /// express.
    pub fn from_decimal(value: f64) -> Result<Self, Status> {
        if !value.is_finite() {
            return Err(Status::BadArg);
        }
        let mut text = value.to_string();
        if !text.contains('.') {
            text.push_str(".0");
        }
        Ok(Self::with_datatype(text, Self::uri(xsd::DECIMAL)))
    }

    /// A canonical `xsd:double` literal in mantissa/exponent form.
    pub fn from_double(value: f64) -> Self {
        let text = if value.is_nan() {
            "NaN".to_owned()
        } else if value.is_infinite() {
            if value > 0. { "INF" } else { "-INF" }.to_owned()
        } else {
            let mut text = format!("{value:E}");
            if let Some(e) = text.find('E') {
                if !text[..e].contains('.') {
                    text.insert_str(e, ".0");
                }
            }
            text
        };
        Self::with_datatype(text, Self::uri(xsd::DOUBLE))
    }

    /// A canonical `xsd:boolean` literal.
    pub fn from_bool(value: bool) -> Self {
        Self::with_datatype(if value { "true" } else { "false" }, Self::uri(xsd::BOOLEAN))
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    /// The node string: URI, label, name or lexical form.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The node string length in bytes.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// The datatype of a typed literal.
    pub fn datatype(&self) -> Option<&Node> {
        self.flags
            .contains(NodeFlags::HAS_DATATYPE)
            .then(|| self.meta.as_deref())
            .flatten()
    }

    /// The language tag of a plain literal.
    pub fn language(&self) -> Option<&str> {
        self.flags
            .contains(NodeFlags::HAS_LANGUAGE)
            .then(|| self.meta.as_deref().map(Node::as_str))
            .flatten()
    }

    /// The meta node (datatype or language tag), if any.
    pub fn meta(&self) -> Option<&Node> {
        self.meta.as_deref()
    }

    /// Extracts the node string.
    pub fn into_string(self) -> String {
        self.text
    }

    /// True for URI, CURIE and blank nodes (legal subject positions).
    pub fn is_resource(&self) -> bool {
        matches!(self.kind, NodeKind::Uri | NodeKind::Curie | NodeKind::Blank)
    }
}

impl fmt::Display for Node {
    /// Writes the node string without any syntactic decoration.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_scan_sets_flags() {
        let node = Node::literal("a\n\"b");
        assert!(node.flags().contains(NodeFlags::HAS_NEWLINE));
        assert!(node.flags().contains(NodeFlags::HAS_QUOTE));
        assert_eq!(node.len(), 4);

        let node = Node::literal("plain");
        assert_eq!(node.flags(), NodeFlags::NONE);
    }

    #[test]
    fn plain_literal_canonicalizes_tag() {
        let node = Node::plain_literal("hi", "en-US").unwrap();
        assert_eq!(node.language(), Some("en-us"));
        assert!(node.flags().contains(NodeFlags::HAS_LANGUAGE));
        assert!(node.datatype().is_none());
        assert_eq!(Node::plain_literal("hi", "not a tag"), Err(Status::BadLiteral));
    }

    #[test]
    fn typed_literal_needs_resource_datatype() {
        let node = Node::typed_literal("1", Node::uri(xsd::INTEGER)).unwrap();
        assert_eq!(node.datatype().map(Node::as_str), Some(xsd::INTEGER));
        assert_eq!(
            Node::typed_literal("1", Node::literal("nope")),
            Err(Status::BadArg)
        );
    }

    #[test]
    fn canonical_numbers() {
        assert_eq!(Node::from_integer(-42).as_str(), "-42");
        assert_eq!(Node::from_decimal(1.5).unwrap().as_str(), "1.5");
        assert_eq!(Node::from_decimal(2.0).unwrap().as_str(), "2.0");
        assert_eq!(Node::from_decimal(f64::NAN), Err(Status::BadArg));
        assert_eq!(Node::from_double(150.0).as_str(), "1.5E2");
        assert_eq!(Node::from_double(1.0).as_str(), "1.0E0");
        assert_eq!(Node::from_double(f64::NEG_INFINITY).as_str(), "-INF");
        assert_eq!(Node::from_bool(true).as_str(), "true");
    }

    #[test]
    fn node_equality_is_recursive() {
        let a = Node::typed_literal("1", Node::uri(xsd::INTEGER)).unwrap();
        let b = Node::typed_literal("1", Node::uri(xsd::INTEGER)).unwrap();
        let c = Node::typed_literal("1", Node::uri(xsd::DECIMAL)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(Node::literal("x"), Node::blank("x"));
    }

    #[test]
    fn file_uri_node() {
        assert_eq!(
            Node::file_uri("/tmp/x y", None).as_str(),
            "file:///tmp/x%20y"
        );
    }
}
