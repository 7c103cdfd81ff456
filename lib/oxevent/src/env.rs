//! Base URI and prefix bindings.

use crate::grammar::escape_local_name;
use crate::uri::UriRef;
use crate::{Event, Node, NodeKind, Sink, Statement, Status};

/// A base URI plus an ordered set of prefix bindings.
///
/// Prefix values are stored absolute: a relative value is resolved against
/// the current base when it is set. An environment is itself a [`Sink`] that
/// applies `BASE` and `PREFIX` events to its own state, so it can be fed
/// directly from a reader.
#[derive(Debug, Clone, Default)]
pub struct Env {
    base: Option<Node>,
    prefixes: Vec<(String, Node)>,
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current base URI node, if any.
    pub fn base_uri(&self) -> Option<&Node> {
        self.base.as_ref()
    }

    /// Sets the base URI, resolving `uri` against the current base first
    /// when it is relative.
    ///
    /// Fails with `BadArg` when `uri` is relative and no base is set.
    pub fn set_base_uri(&mut self, uri: &str) -> Result<(), Status> {
        self.base = Some(Node::uri(self.make_absolute(uri)?));
        Ok(())
    }

    /// Adds or updates a prefix binding. A relative value is resolved
    /// against the base first; without a base this fails with `BadArg`.
    pub fn set_prefix(&mut self, name: &str, uri: &str) -> Result<(), Status> {
        let value = Node::uri(self.make_absolute(uri)?);
        if let Some((_, bound)) = self
            .prefixes
            .iter_mut()
            .find(|(bound_name, _)| bound_name == name)
        {
            *bound = value;
        } else {
            self.prefixes.push((name.to_owned(), value));
        }
        Ok(())
    }

    fn make_absolute(&self, uri: &str) -> Result<String, Status> {
        let view = UriRef::parse(uri);
        if view.is_absolute() {
            return Ok(uri.to_owned());
        }
        let base = self.base.as_ref().ok_or(Status::BadArg)?;
        let mut absolute = String::new();
        view.resolve_into(&UriRef::parse(base.as_str()), &mut absolute)?;
        Ok(absolute)
    }

    /// The value bound to a prefix name.
    pub fn prefix_value(&self, name: &str) -> Option<&Node> {
        self.prefixes
            .iter()
            .find(|(bound_name, _)| bound_name == name)
            .map(|(_, value)| value)
    }

    /// Expands a prefixed name into the URI string it maps to.
    ///
    /// Fails with `BadArg` when `curie` has no `:` and with `BadCurie` when
    /// its prefix is not bound.
    pub fn expand_curie(&self, curie: &str) -> Result<String, Status> {
        let (prefix, suffix) = curie.split_once(':').ok_or(Status::BadArg)?;
        let value = self.prefix_value(prefix).ok_or(Status::BadCurie)?;
        Ok(format!("{value}{suffix}"))
    }

    /// Qualifies an absolute URI into `(prefix_name, suffix)` using the
    /// longest binding whose value prefixes it, provided the suffix forms a
    /// valid (possibly escaped) local name.
    pub fn qualify<'a>(&'a self, uri: &'a str) -> Option<(&'a str, &'a str)> {
        let mut best: Option<(&str, &str)> = None;
        for (name, value) in &self.prefixes {
            if let Some(suffix) = uri.strip_prefix(value.as_str()) {
                if best.is_some_and(|(_, best_suffix)| best_suffix.len() <= suffix.len()) {
                    continue;
                }
                if escape_local_name(suffix).is_some() {
                    best = Some((name, suffix));
                }
            }
        }
        best
    }

    /// Expands a node to its absolute URI form, if it has one:
    /// URIs are resolved against the base, prefixed names through the
    /// bindings, and typed literals get their datatype expanded.
    pub fn expand(&self, node: &Node) -> Option<Node> {
        match node.kind() {
            NodeKind::Uri => {
                let view = UriRef::parse(node.as_str());
                if view.is_absolute() {
                    return Some(node.clone());
                }
                let base = self.base.as_ref()?;
                let mut absolute = String::new();
                view.resolve_into(&UriRef::parse(base.as_str()), &mut absolute)
                    .ok()?;
                Some(Node::uri(absolute))
            }
            NodeKind::Curie => Some(Node::uri(self.expand_curie(node.as_str()).ok()?)),
            NodeKind::Literal => {
                let datatype = node.datatype()?;
                if datatype.kind() != NodeKind::Curie {
                    return None;
                }
                let expanded = Node::uri(self.expand_curie(datatype.as_str()).ok()?);
                Node::typed_literal(node.as_str(), expanded).ok()
            }
            NodeKind::Blank | NodeKind::Variable => None,
        }
    }

    /// Replays every binding as a `PREFIX` event, in insertion order.
    pub fn describe(&self, sink: &mut impl Sink) -> Result<(), Status> {
        for (name, value) in &self.prefixes {
            sink.prefix(Node::literal(name.clone()), value.clone())?;
        }
        Ok(())
    }

    /// Iterates over the bindings in insertion order.
    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.prefixes
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }
}

impl Sink for Env {
    fn on_event(&mut self, event: &Event) -> Result<(), Status> {
        match event {
            Event::Base { uri } => self.set_base_uri(uri.as_str()),
            Event::Prefix { name, uri } => self.set_prefix(name.as_str(), uri.as_str()),
            Event::Statement(Statement { .. }) | Event::End { .. } => Ok(()),
        }
    }
}
