//! The streaming writer: a syntax-aware pretty-printer consuming RDF events.

use crate::dumper::BlockDumper;
use crate::syntax::Syntax;
use oxevent::vocab::{rdf, xsd};
use oxevent::{
    Env, Event, Node, NodeFlags, NodeKind, Sink, Statement, StatementFlags, Status, UriRef,
};
use std::io::Write;
use std::ops::BitOr;

/// Writer behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriterFlags(u8);

impl WriterFlags {
    pub const NONE: Self = Self(0);
    /// Escape every non-ASCII character with `\uXXXX`/`\UXXXXXXXX`.
    pub const ESCAPED: Self = Self(1);
    /// Write full URIs instead of prefixed names.
    pub const EXPANDED: Self = Self(1 << 1);
    /// Write URIs exactly as they arrive, without resolution or
    /// relativization.
    pub const VERBATIM: Self = Self(1 << 2);
    /// Do not write newlines.
    pub const TERSE: Self = Self(1 << 3);
    /// Tolerate lossy output instead of failing.
    pub const LAX: Self = Self(1 << 4);
    /// Suppress directives, assuming the reader shares the context.
    pub const CONTEXTUAL: Self = Self(1 << 5);
    /// Spell everything out: no `a`, no bare numbers or booleans.
    pub const LONGHAND: Self = Self(1 << 6);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for WriterFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

enum FrameKind {
    /// A top-level subject whose statement ends with `.`.
    Top,
    /// An anonymous object description, between `[` and `]`.
    Anon,
    /// An anonymous subject description; after its `]` the node keeps
    /// serving as subject of the enclosing statement.
    AnonSubject,
    /// A collection; `subject` tracks the current cell while `head` stays
    /// at the first one.
    List { head: Node, is_subject: bool },
}

struct Frame {
    subject: Node,
    predicate: Option<Node>,
    kind: FrameKind,
    wrote_po: bool,
}

/// A streaming writer for one of the [`Syntax`] grammars.
///
/// The writer is a [`Sink`]: feed it events (usually straight from a
/// [`Reader`](crate::Reader)) and it prints the corresponding document,
/// abbreviating prefixed names through its environment, folding predicate
/// and object lists, restoring `[...]`/`(...)` forms from the statement
/// flags and relativizing URIs against its base. Call
/// [`finish`](Writer::finish) to close open constructs and flush.
pub struct Writer<'a> {
    syntax: Syntax,
    flags: WriterFlags,
    env: Env,
    root: Option<String>,
    chop_blank_prefix: Option<String>,
    dumper: BlockDumper<'a>,
    stack: Vec<Frame>,
    prelude: Vec<(String, String)>,
    prelude_written: bool,
    graph: Option<Node>,
    empty: bool,
}

impl<'a> Writer<'a> {
    pub fn new(syntax: Syntax, writer: impl Write + 'a) -> Self {
        Self {
            syntax,
            flags: WriterFlags::NONE,
            env: Env::new(),
            root: None,
            chop_blank_prefix: None,
            dumper: BlockDumper::new(writer, 1),
            stack: Vec::new(),
            prelude: Vec::new(),
            prelude_written: false,
            graph: None,
            empty: true,
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: WriterFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the base URI used to relativize absolute URIs (and resolve
    /// relative ones).
    pub fn with_base_uri(mut self, uri: &str) -> Result<Self, Status> {
        self.env.set_base_uri(uri)?;
        Ok(self)
    }

    /// Bounds relativization: `../` segments never climb above this URI,
    /// which must be a prefix of the base.
    #[must_use]
    pub fn with_root_uri(mut self, uri: impl Into<String>) -> Self {
        self.root = Some(uri.into());
        self
    }

    /// Binds a prefix for abbreviation; it is also written as a directive
    /// before the first statement (in the syntaxes that have directives).
    pub fn with_prefix(
        mut self,
        name: impl Into<String>,
        uri: impl Into<String>,
    ) -> Result<Self, Status> {
        let name = name.into();
        let uri = uri.into();
        self.env.set_prefix(&name, &uri)?;
        self.prelude.push((name, uri));
        Ok(self)
    }

    /// Replaces the environment. Its bindings are written as directives
    /// before the first statement.
    #[must_use]
    pub fn with_env(mut self, env: Env) -> Self {
        self.prelude = env
            .prefixes()
            .map(|(name, value)| (name.to_owned(), value.as_str().to_owned()))
            .collect();
        self.env = env;
        self
    }

    /// Strips `prefix` from blank node labels whose remainder is itself a
    /// valid label, undoing the padding a reader applied.
    #[must_use]
    pub fn with_chop_blank_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.chop_blank_prefix = Some(prefix.into());
        self
    }

    /// Sets the output block size; 1 (the default) writes through.
    #[must_use]
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.dumper.set_block_size(block_size);
        self
    }

    /// Closes all still-open constructs and flushes buffered output.
    pub fn finish(&mut self) -> Result<(), Status> {
        while !self.stack.is_empty() {
            self.close_top_frame()?;
        }
        if self.graph.take().is_some() {
            self.dumper.write_str("}\n")?;
        }
        if self.flags.contains(WriterFlags::TERSE) && !self.empty {
            self.dumper.write_str("\n")?;
        }
        self.dumper.flush()
    }

    fn terse(&self) -> bool {
        self.flags.contains(WriterFlags::TERSE)
    }

    // ---- Event handling ----

    fn handle_base(&mut self, uri: &Node) -> Result<(), Status> {
        self.env.set_base_uri(uri.as_str())?;
        if self.syntax.supports_directives() && !self.flags.contains(WriterFlags::CONTEXTUAL) {
            self.close_statement_frames()?;
            self.write_prelude()?;
            self.dumper.write_str("@base <")?;
            self.dumper.write_str(uri.as_str())?;
            self.dumper.write_str("> .")?;
            self.end_directive_line()?;
        }
        Ok(())
    }

    fn handle_prefix(&mut self, name: &Node, uri: &Node) -> Result<(), Status> {
        self.env.set_prefix(name.as_str(), uri.as_str())?;
        if self.syntax.supports_directives() && !self.flags.contains(WriterFlags::CONTEXTUAL) {
            self.close_statement_frames()?;
            self.write_prelude()?;
            self.dumper.write_str("@prefix ")?;
            self.dumper.write_str(name.as_str())?;
            self.dumper.write_str(": <")?;
            self.dumper.write_str(uri.as_str())?;
            self.dumper.write_str("> .")?;
            self.end_directive_line()?;
        }
        Ok(())
    }

    fn end_directive_line(&mut self) -> Result<(), Status> {
        self.empty = false;
        self.dumper
            .write_str(if self.terse() { " " } else { "\n" })
    }

    fn handle_end(&mut self, node: &Node) -> Result<(), Status> {
        if self.syntax.is_line_based() {
            // Line formats have no inline descriptions to close
            return Ok(());
        }
        let is_subject_description = match self.stack.last() {
            Some(top) if top.subject == *node => match top.kind {
                FrameKind::Anon => false,
                FrameKind::AnonSubject => true,
                FrameKind::Top | FrameKind::List { .. } => return Err(Status::BadArg),
            },
            _ => return Err(Status::BadArg),
        };
        self.dumper.write_str(" ]")?;
        if is_subject_description {
            if let Some(top) = self.stack.last_mut() {
                // The node keeps serving as subject of the outer statement
                top.kind = FrameKind::Top;
                top.predicate = None;
                top.wrote_po = false;
            }
        } else {
            self.stack.pop();
        }
        Ok(())
    }

    fn handle_statement(&mut self, statement: &Statement) -> Result<(), Status> {
        self.write_prelude()?;
        if self.syntax.is_line_based() {
            return self.write_statement_line(statement);
        }
        if self.syntax == Syntax::TriG {
            self.sync_graph(statement.graph.as_ref())?;
        }

        // An open collection absorbs its own chain statements
        if let Some(Frame {
            kind: FrameKind::List { .. },
            subject,
            ..
        }) = self.stack.last()
        {
            if *subject == statement.subject {
                return self.continue_list(statement);
            }
            return Err(Status::BadArg);
        }

        if let Some(top) = self.stack.last() {
            if top.subject == statement.subject {
                return self.continue_subject(statement);
            }
            if !matches!(top.kind, FrameKind::Top) {
                // Descriptions must stay on their own subject until END
                return Err(Status::BadArg);
            }
        }
        self.close_statement_frames()?;
        self.begin_statement_line()?;
        self.write_subject(statement)
    }

    fn write_prelude(&mut self) -> Result<(), Status> {
        if self.prelude_written {
            return Ok(());
        }
        self.prelude_written = true;
        if !self.syntax.supports_directives() || self.flags.contains(WriterFlags::CONTEXTUAL) {
            return Ok(());
        }
        let prelude = std::mem::take(&mut self.prelude);
        for (name, uri) in &prelude {
            self.dumper.write_str("@prefix ")?;
            self.dumper.write_str(name)?;
            self.dumper.write_str(": <")?;
            self.dumper.write_str(uri)?;
            self.dumper.write_str("> .")?;
            self.end_directive_line()?;
        }
        Ok(())
    }

    /// Closes any finished top-level frame (there is at most one).
    fn close_statement_frames(&mut self) -> Result<(), Status> {
        while matches!(
            self.stack.last(),
            Some(Frame {
                kind: FrameKind::Top,
                ..
            })
        ) {
            self.close_top_frame()?;
        }
        if self.stack.is_empty() {
            Ok(())
        } else {
            Err(Status::BadArg)
        }
    }

    fn close_top_frame(&mut self) -> Result<(), Status> {
        let Some(frame) = self.stack.pop() else {
            return Ok(());
        };
        match frame.kind {
            FrameKind::Top => {
                self.dumper.write_str(" .")?;
                if !self.terse() {
                    self.dumper.write_str("\n")?;
                }
                Ok(())
            }
            FrameKind::Anon | FrameKind::AnonSubject => self.dumper.write_str(" ]"),
            FrameKind::List { .. } => self.dumper.write_str(" )"),
        }
    }

    fn sync_graph(&mut self, graph: Option<&Node>) -> Result<(), Status> {
        if self.graph.as_ref() == graph {
            return Ok(());
        }
        self.close_statement_frames()?;
        if self.graph.take().is_some() {
            self.dumper.write_str("}")?;
            if !self.terse() {
                self.dumper.write_str("\n")?;
            }
        }
        if let Some(graph) = graph {
            let graph = graph.clone();
            self.write_node(&graph)?;
            self.dumper.write_str(" {")?;
            if !self.terse() {
                self.dumper.write_str("\n")?;
            }
            self.graph = Some(graph);
        }
        Ok(())
    }

    fn begin_statement_line(&mut self) -> Result<(), Status> {
        if self.terse() {
            if !self.empty {
                self.dumper.write_str(" ")?;
            }
        } else if self.graph.is_some() {
            self.dumper.write_str("\t")?;
        }
        self.empty = false;
        Ok(())
    }

    fn write_subject(&mut self, statement: &Statement) -> Result<(), Status> {
        let flags = statement.flags;
        if flags.contains(StatementFlags::LIST_S) {
            // This statement is already the first rdf:first link of the
            // collection
            self.dumper.write_str("(")?;
            self.stack.push(Frame {
                subject: statement.subject.clone(),
                predicate: None,
                kind: FrameKind::List {
                    head: statement.subject.clone(),
                    is_subject: true,
                },
                wrote_po: false,
            });
            return self.continue_list(statement);
        }
        if flags.contains(StatementFlags::ANON_S) {
            self.dumper.write_str("[")?;
            self.stack.push(Frame {
                subject: statement.subject.clone(),
                predicate: None,
                kind: FrameKind::AnonSubject,
                wrote_po: false,
            });
            return self.continue_subject(statement);
        }
        if flags.contains(StatementFlags::EMPTY_S) {
            self.dumper
                .write_str(if statement.subject.as_str() == rdf::NIL {
                    "()"
                } else {
                    "[]"
                })?;
        } else {
            self.write_node(&statement.subject)?;
        }
        self.stack.push(Frame {
            subject: statement.subject.clone(),
            predicate: None,
            kind: FrameKind::Top,
            wrote_po: false,
        });
        self.continue_subject(statement)
    }

    fn continue_subject(&mut self, statement: &Statement) -> Result<(), Status> {
        let top = self.stack.len() - 1;
        let (wrote_po, same_predicate) = {
            let frame = &self.stack[top];
            (
                frame.wrote_po,
                frame.predicate.as_ref() == Some(&statement.predicate),
            )
        };
        if wrote_po && same_predicate {
            self.dumper.write_str(" , ")?;
            return self.write_object(statement);
        }
        if wrote_po {
            let inline = self.terse()
                || self.stack.len() > 1
                || self.graph.is_some()
                || !matches!(self.stack[top].kind, FrameKind::Top);
            if inline {
                self.dumper.write_str(" ; ")?;
            } else {
                self.dumper.write_str(" ;\n\t")?;
            }
        } else {
            self.dumper.write_str(" ")?;
        }
        self.write_predicate(&statement.predicate)?;
        self.dumper.write_str(" ")?;
        {
            let frame = &mut self.stack[top];
            frame.predicate = Some(statement.predicate.clone());
            frame.wrote_po = true;
        }
        self.write_object(statement)
    }

    fn continue_list(&mut self, statement: &Statement) -> Result<(), Status> {
        if statement.predicate.as_str() == rdf::FIRST {
            self.dumper.write_str(" ")?;
            return self.write_object(statement);
        }
        if statement.predicate.as_str() == rdf::REST {
            if statement.object.as_str() == rdf::NIL {
                self.dumper.write_str(" )")?;
                let frame = self.stack.pop().ok_or(Status::BadArg)?;
                if let FrameKind::List {
                    head,
                    is_subject: true,
                } = frame.kind
                {
                    // The closed collection keeps serving as subject
                    self.stack.push(Frame {
                        subject: head,
                        predicate: None,
                        kind: FrameKind::Top,
                        wrote_po: false,
                    });
                }
                return Ok(());
            }
            let Some(frame) = self.stack.last_mut() else {
                return Err(Status::BadArg);
            };
            frame.subject = statement.object.clone();
            return Ok(());
        }
        Err(Status::BadArg)
    }

    /// Writes the object, opening a description or collection frame when
    /// the statement flags call for one.
    fn write_object(&mut self, statement: &Statement) -> Result<(), Status> {
        let flags = statement.flags;
        if flags.contains(StatementFlags::EMPTY_O) {
            return self
                .dumper
                .write_str(if statement.object.as_str() == rdf::NIL {
                    "()"
                } else {
                    "[]"
                });
        }
        if flags.contains(StatementFlags::ANON_O) {
            self.dumper.write_str("[")?;
            self.stack.push(Frame {
                subject: statement.object.clone(),
                predicate: None,
                kind: FrameKind::Anon,
                wrote_po: false,
            });
            return Ok(());
        }
        if flags.contains(StatementFlags::LIST_O) {
            self.dumper.write_str("(")?;
            self.stack.push(Frame {
                subject: statement.object.clone(),
                predicate: None,
                kind: FrameKind::List {
                    head: statement.object.clone(),
                    is_subject: false,
                },
                wrote_po: false,
            });
            return Ok(());
        }
        self.write_node(&statement.object)
    }

    // ---- Node emission ----

    fn write_predicate(&mut self, predicate: &Node) -> Result<(), Status> {
        if !self.flags.contains(WriterFlags::LONGHAND)
            && predicate.kind() == NodeKind::Uri
            && predicate.as_str() == rdf::TYPE
        {
            return self.dumper.write_str("a");
        }
        self.write_node(predicate)
    }

    fn write_node(&mut self, node: &Node) -> Result<(), Status> {
        match node.kind() {
            NodeKind::Uri => self.write_uri(node.as_str()),
            NodeKind::Curie => self.write_curie(node.as_str()),
            NodeKind::Blank => self.write_blank(node.as_str()),
            NodeKind::Literal => self.write_literal(node),
            NodeKind::Variable => {
                self.dumper.write_str("?")?;
                self.dumper.write_str(node.as_str())
            }
        }
    }

    fn write_uri(&mut self, uri: &str) -> Result<(), Status> {
        let verbatim = self.flags.contains(WriterFlags::VERBATIM);
        let resolved = if verbatim {
            uri.to_owned()
        } else {
            self.resolve_against_base(uri)
        };
        if !self.flags.contains(WriterFlags::EXPANDED) && self.syntax.supports_directives() {
            let qualified = self.env.qualify(&resolved).and_then(|(prefix, suffix)| {
                let escaped = oxevent::grammar::escape_local_name(suffix)?;
                Some(format!("{prefix}:{escaped}"))
            });
            if let Some(qualified) = qualified {
                return self.dumper.write_str(&qualified);
            }
        }
        if !verbatim && self.syntax.supports_directives() {
            let relative = self.env.base_uri().and_then(|base| {
                let mut relative = String::new();
                let root = self.root.as_deref().map(UriRef::parse);
                UriRef::parse(&resolved)
                    .relativize_into(&UriRef::parse(base.as_str()), root.as_ref(), &mut relative)
                    .then_some(relative)
            });
            if let Some(relative) = relative {
                return self.write_uri_ref(&relative);
            }
        }
        self.write_uri_ref(&resolved)
    }

    fn resolve_against_base(&self, uri: &str) -> String {
        let view = UriRef::parse(uri);
        if view.is_absolute() {
            return uri.to_owned();
        }
        let Some(base) = self.env.base_uri() else {
            return uri.to_owned();
        };
        let mut absolute = String::new();
        if view
            .resolve_into(&UriRef::parse(base.as_str()), &mut absolute)
            .is_err()
        {
            return uri.to_owned();
        }
        absolute
    }

    fn write_uri_ref(&mut self, uri: &str) -> Result<(), Status> {
        self.dumper.write_str("<")?;
        if self.flags.contains(WriterFlags::ESCAPED) {
            self.write_escaped_unicode(uri)?;
        } else {
            self.dumper.write_str(uri)?;
        }
        self.dumper.write_str(">")
    }

    fn write_curie(&mut self, curie: &str) -> Result<(), Status> {
        if !self.flags.contains(WriterFlags::EXPANDED) && self.syntax.supports_directives() {
            if let Some((prefix, local)) = curie.split_once(':') {
                if let Some(escaped) = oxevent::grammar::escape_local_name(local) {
                    let abbreviated = format!("{prefix}:{escaped}");
                    return self.dumper.write_str(&abbreviated);
                }
            }
        }
        let expanded = self.env.expand_curie(curie)?;
        self.write_uri(&expanded)
    }

    fn write_blank(&mut self, label: &str) -> Result<(), Status> {
        self.dumper.write_str("_:")?;
        if let Some(prefix) = self.chop_blank_prefix.clone() {
            if let Some(rest) = label.strip_prefix(prefix.as_str()) {
                if !rest.is_empty() {
                    return self.dumper.write_str(rest);
                }
            }
        }
        self.dumper.write_str(label)
    }

    fn write_literal(&mut self, node: &Node) -> Result<(), Status> {
        if !self.flags.contains(WriterFlags::LONGHAND) && self.syntax.supports_directives() {
            if let Some(datatype) = self.expanded_datatype(node) {
                let text = node.as_str();
                let inline = match datatype.as_str() {
                    xsd::BOOLEAN => is_turtle_boolean(text),
                    xsd::INTEGER => is_turtle_integer(text),
                    xsd::DECIMAL => is_turtle_decimal(text),
                    xsd::DOUBLE => is_turtle_double(text),
                    _ => false,
                };
                if inline {
                    return self.dumper.write_str(text);
                }
            }
        }
        // Long-quoted form only when the string has both a quote and a line
        // ending; anything else short-quotes with escapes
        let long = self.syntax.supports_directives()
            && !self.flags.contains(WriterFlags::ESCAPED)
            && node.flags().contains(NodeFlags::HAS_NEWLINE)
            && node.flags().contains(NodeFlags::HAS_QUOTE);
        let text = node.as_str();
        if long {
            self.dumper.write_str("\"\"\"")?;
            self.write_long_quoted(text)?;
            self.dumper.write_str("\"\"\"")?;
        } else {
            self.dumper.write_str("\"")?;
            self.write_short_quoted(text)?;
            self.dumper.write_str("\"")?;
        }
        if let Some(language) = node.language() {
            self.dumper.write_str("@")?;
            self.dumper.write_str(language)?;
        } else if let Some(datatype) = node.datatype() {
            self.dumper.write_str("^^")?;
            if self.syntax.is_line_based() {
                // N-Triples and N-Quads have no prefixed names
                let expanded = match datatype.kind() {
                    NodeKind::Curie => self.env.expand_curie(datatype.as_str())?,
                    _ => datatype.as_str().to_owned(),
                };
                self.write_uri_ref(&expanded)?;
            } else {
                self.write_node(datatype)?;
            }
        }
        Ok(())
    }

    fn expanded_datatype(&self, node: &Node) -> Option<String> {
        let datatype = node.datatype()?;
        match datatype.kind() {
            NodeKind::Curie => self.env.expand_curie(datatype.as_str()).ok(),
            _ => Some(datatype.as_str().to_owned()),
        }
    }

    fn write_short_quoted(&mut self, text: &str) -> Result<(), Status> {
        for c in text.chars() {
            match c {
                '"' => self.dumper.write_str("\\\"")?,
                '\\' => self.dumper.write_str("\\\\")?,
                '\n' => self.dumper.write_str("\\n")?,
                '\r' => self.dumper.write_str("\\r")?,
                '\t' => self.dumper.write_str("\\t")?,
                '\u{8}' => self.dumper.write_str("\\b")?,
                '\u{C}' => self.dumper.write_str("\\f")?,
                c if (c as u32) < 0x20 => self.write_uchar(c)?,
                c if !c.is_ascii() && self.flags.contains(WriterFlags::ESCAPED) => {
                    self.write_uchar(c)?;
                }
                c => self.dumper.write_char(c)?,
            }
        }
        Ok(())
    }

    /// Long-quoted form: only backslashes and quote runs that would close
    /// the literal need escaping.
    fn write_long_quoted(&mut self, text: &str) -> Result<(), Status> {
        let bytes = text.as_bytes();
        let mut written = 0;
        let mut quote_run = 0usize;
        let mut previous_quote = usize::MAX;
        for i in memchr::memchr2_iter(b'"', b'\\', bytes) {
            if bytes[i] == b'"' {
                quote_run = if i > 0 && previous_quote == i - 1 {
                    quote_run + 1
                } else {
                    1
                };
                previous_quote = i;
                // Every third consecutive quote, and a final quote, would
                // collide with the closing delimiter
                if quote_run == 3 || i + 1 == bytes.len() {
                    self.dumper.write(&bytes[written..i])?;
                    self.dumper.write_str("\\\"")?;
                    written = i + 1;
                    quote_run = 0;
                }
            } else {
                self.dumper.write(&bytes[written..i])?;
                self.dumper.write_str("\\\\")?;
                written = i + 1;
            }
        }
        self.dumper.write(&bytes[written..])
    }

    fn write_uchar(&mut self, c: char) -> Result<(), Status> {
        let code = c as u32;
        let escape = if code > 0xFFFF {
            format!("\\U{code:08X}")
        } else {
            format!("\\u{code:04X}")
        };
        self.dumper.write_str(&escape)
    }

    fn write_escaped_unicode(&mut self, text: &str) -> Result<(), Status> {
        for c in text.chars() {
            if c.is_ascii() {
                self.dumper.write_char(c)?;
            } else {
                self.write_uchar(c)?;
            }
        }
        Ok(())
    }

    // ---- Line-based output ----

    fn write_statement_line(&mut self, statement: &Statement) -> Result<(), Status> {
        self.empty = false;
        self.write_node_line(&statement.subject)?;
        self.dumper.write_str(" ")?;
        self.write_node_line(&statement.predicate)?;
        self.dumper.write_str(" ")?;
        self.write_node_line(&statement.object)?;
        if self.syntax == Syntax::NQuads {
            if let Some(graph) = &statement.graph {
                self.dumper.write_str(" ")?;
                self.write_node_line(graph)?;
            }
        }
        self.dumper.write_str(" .\n")
    }

    fn write_node_line(&mut self, node: &Node) -> Result<(), Status> {
        match node.kind() {
            NodeKind::Uri => {
                let resolved = if self.flags.contains(WriterFlags::VERBATIM) {
                    node.as_str().to_owned()
                } else {
                    self.resolve_against_base(node.as_str())
                };
                self.write_uri_ref(&resolved)
            }
            NodeKind::Curie => {
                let expanded = self.env.expand_curie(node.as_str())?;
                self.write_uri_ref(&expanded)
            }
            NodeKind::Blank => self.write_blank(node.as_str()),
            NodeKind::Literal => self.write_literal(node),
            NodeKind::Variable => {
                self.dumper.write_str("?")?;
                self.dumper.write_str(node.as_str())
            }
        }
    }
}

impl Sink for Writer<'_> {
    fn on_event(&mut self, event: &Event) -> Result<(), Status> {
        match event {
            Event::Base { uri } => self.handle_base(uri),
            Event::Prefix { name, uri } => self.handle_prefix(name, uri),
            Event::Statement(statement) => self.handle_statement(statement),
            Event::End { node } => self.handle_end(node),
        }
    }
}

fn is_turtle_boolean(value: &str) -> bool {
    matches!(value, "true" | "false")
}

fn is_turtle_integer(value: &str) -> bool {
    // [19]  INTEGER  ::=  [+-]? [0-9]+
    let mut value = value.as_bytes();
    if let Some(v) = value.strip_prefix(b"+") {
        value = v;
    } else if let Some(v) = value.strip_prefix(b"-") {
        value = v;
    }
    !value.is_empty() && value.iter().all(u8::is_ascii_digit)
}

fn is_turtle_decimal(value: &str) -> bool {
    // [20]  DECIMAL  ::=  [+-]? [0-9]* '.' [0-9]+
    let mut value = value.as_bytes();
    if let Some(v) = value.strip_prefix(b"+") {
        value = v;
    } else if let Some(v) = value.strip_prefix(b"-") {
        value = v;
    }
    while value.first().is_some_and(u8::is_ascii_digit) {
        value = &value[1..];
    }
    let Some(value) = value.strip_prefix(b".") else {
        return false;
    };
    !value.is_empty() && value.iter().all(u8::is_ascii_digit)
}

fn is_turtle_double(value: &str) -> bool {
    // [21]    DOUBLE    ::=  [+-]? ([0-9]+ '.' [0-9]* EXPONENT | '.' [0-9]+ EXPONENT | [0-9]+ EXPONENT)
    // [154s]  EXPONENT  ::=  [eE] [+-]? [0-9]+
    let mut value = value.as_bytes();
    if let Some(v) = value.strip_prefix(b"+") {
        value = v;
    } else if let Some(v) = value.strip_prefix(b"-") {
        value = v;
    }
    let mut with_before = false;
    while value.first().is_some_and(u8::is_ascii_digit) {
        value = &value[1..];
        with_before = true;
    }
    let mut with_after = false;
    if let Some(v) = value.strip_prefix(b".") {
        value = v;
        while value.first().is_some_and(u8::is_ascii_digit) {
            value = &value[1..];
            with_after = true;
        }
    }
    if let Some(v) = value.strip_prefix(b"e") {
        value = v;
    } else if let Some(v) = value.strip_prefix(b"E") {
        value = v;
    } else {
        return false;
    }
    if let Some(v) = value.strip_prefix(b"+") {
        value = v;
    } else if let Some(v) = value.strip_prefix(b"-") {
        value = v;
    }
    (with_before || with_after) && !value.is_empty() && value.iter().all(u8::is_ascii_digit)
}
