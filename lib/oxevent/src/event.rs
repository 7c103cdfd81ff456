//! RDF events and the sink contract between producers and consumers.

use crate::{Node, Status};
use std::ops::BitOr;

/// Property bits of a [`Statement`].
///
/// The `*_S` bits describe the subject, the `*_O` bits the object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StatementFlags(u16);

impl StatementFlags {
    pub const NONE: Self = Self(0);
    /// The subject is an empty blank node (`[]`) or empty list (`()`).
    pub const EMPTY_S: Self = Self(1);
    /// The object is an empty blank node or empty list.
    pub const EMPTY_O: Self = Self(1 << 1);
    /// The subject starts an anonymous node description closed by a
    /// matching [`Event::End`].
    pub const ANON_S: Self = Self(1 << 2);
    /// The object starts an anonymous node description closed by a matching
    /// [`Event::End`].
    pub const ANON_O: Self = Self(1 << 3);
    /// The subject is the head of a streamed collection.
    pub const LIST_S: Self = Self(1 << 4);
    /// The object is the head of a streamed collection.
    pub const LIST_O: Self = Self(1 << 5);
    /// Write the subject inline, without line breaks.
    pub const TERSE_S: Self = Self(1 << 6);
    /// Write the object inline, without line breaks.
    pub const TERSE_O: Self = Self(1 << 7);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for StatementFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// An RDF statement: subject, predicate, object and an optional graph name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub flags: StatementFlags,
    pub subject: Node,
    pub predicate: Node,
    pub object: Node,
    pub graph: Option<Node>,
}

impl Statement {
    pub fn new(subject: Node, predicate: Node, object: Node) -> Self {
        Self {
            flags: StatementFlags::NONE,
            subject,
            predicate,
            object,
            graph: None,
        }
    }

    #[must_use]
    pub fn with_graph(mut self, graph: Node) -> Self {
        self.graph = Some(graph);
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: StatementFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// An element of an RDF event stream, delivered in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A base URI directive.
    Base { uri: Node },
    /// A prefix binding directive.
    Prefix { name: Node, uri: Node },
    /// A statement.
    Statement(Statement),
    /// The end of the anonymous node description opened with `node` as
    /// anonymous subject or object.
    End { node: Node },
}

/// A consumer of RDF events.
///
/// Readers push every event in document order; any error stops the
/// production immediately.
pub trait Sink {
    fn on_event(&mut self, event: &Event) -> Result<(), Status>;

    fn base(&mut self, uri: Node) -> Result<(), Status> {
        self.on_event(&Event::Base { uri })
    }

    fn prefix(&mut self, name: Node, uri: Node) -> Result<(), Status> {
        self.on_event(&Event::Prefix { name, uri })
    }

    fn statement(&mut self, statement: Statement) -> Result<(), Status> {
        self.on_event(&Event::Statement(statement))
    }

    fn end(&mut self, node: Node) -> Result<(), Status> {
        self.on_event(&Event::End { node })
    }
}

impl<F: FnMut(&Event) -> Result<(), Status>> Sink for F {
    fn on_event(&mut self, event: &Event) -> Result<(), Status> {
        self(event)
    }
}

/// A sink recording every event it receives, mostly useful in tests.
#[derive(Debug, Default)]
pub struct EventCollector {
    pub events: Vec<Event>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded statements, ignoring other event kinds.
    pub fn statements(&self) -> impl Iterator<Item = &Statement> {
        self.events.iter().filter_map(|event| match event {
            Event::Statement(statement) => Some(statement),
            _ => None,
        })
    }
}

impl Sink for EventCollector {
    fn on_event(&mut self, event: &Event) -> Result<(), Status> {
        self.events.push(event.clone());
        Ok(())
    }
}
