//! Turtle and TriG: directives, terse triples and graph blocks.

use crate::reader::{Reader, ReaderFlags, WordOrPname};
use crate::source::ByteSource;
use crate::syntax::Syntax;
use oxevent::{Node, StatementFlags, Status};

/// The fixed part of the statement an object is being read into.
struct Ctx {
    subject: Node,
    predicate: Node,
    graph: Option<Node>,
    flags: StatementFlags,
}

/// What a subject production produced besides the node itself.
struct SubjectTail {
    flags: StatementFlags,
    /// An anonymous description was already emitted (and closed).
    had_description: bool,
}

impl Reader<'_> {
    /// One top-level Turtle/TriG production: a directive, a triples block
    /// or (TriG) a graph block.
    pub(crate) fn read_terse_block(&mut self, src: &mut ByteSource<'_>) -> Result<(), Status> {
        self.skip_ws(src)?;
        if src.is_eof() {
            return Err(Status::Failure);
        }
        match src.peek() {
            b'@' => return self.read_at_directive(src),
            b'{' if self.syntax == Syntax::TriG => {
                src.advance()?;
                return self.read_graph_body(src, None);
            }
            _ => {}
        }

        let mut ate_dot = false;
        if starts_name(src.peek()) {
            match self.read_pname_or_keyword(src, &mut ate_dot)? {
                WordOrPname::Word(word) => {
                    if word.eq_ignore_ascii_case("prefix") {
                        return self.read_prefix_decl(src, false);
                    }
                    if word.eq_ignore_ascii_case("base") {
                        return self.read_base_decl(src, false);
                    }
                    if word.eq_ignore_ascii_case("graph") && self.syntax == Syntax::TriG {
                        let label = self.read_graph_label(src)?;
                        self.skip_ws(src)?;
                        self.eat(src, b'{', "after GRAPH label")?;
                        return self.read_graph_body(src, Some(label));
                    }
                    let message = format!("'{word}' is not a valid subject");
                    Err(self.syntax_error(src, Status::BadSyntax, &message))
                }
                WordOrPname::Pname(subject) => {
                    if ate_dot {
                        return Err(self.syntax_error(
                            src,
                            Status::BadSyntax,
                            "statement ended after subject",
                        ));
                    }
                    self.skip_ws(src)?;
                    if self.syntax == Syntax::TriG && src.peek() == b'{' {
                        src.advance()?;
                        return self.read_graph_body(src, Some(subject));
                    }
                    self.finish_triples(src, subject, StatementFlags::NONE, None)
                }
            }
        } else {
            let (subject, tail) = self.read_subject(src, None, &mut ate_dot)?;
            if !tail.had_description {
                self.skip_ws(src)?;
                if self.syntax == Syntax::TriG && src.peek() == b'{' && subject.is_resource() {
                    src.advance()?;
                    return self.read_graph_body(src, Some(subject));
                }
                if ate_dot {
                    return Err(self.syntax_error(
                        src,
                        Status::BadSyntax,
                        "statement ended after subject",
                    ));
                }
                return self.finish_triples(src, subject, tail.flags, None);
            }
            // An anonymous subject with an inline description: the
            // predicate-object list is optional, and a dot eaten inside the
            // description ends the statement
            if ate_dot {
                return Ok(());
            }
            self.skip_ws(src)?;
            if src.peek() == b'.' {
                src.advance()?;
                return Ok(());
            }
            self.finish_triples(src, subject, tail.flags, None)
        }
    }

    /// The predicate-object list and terminating dot of a triples block.
    fn finish_triples(
        &mut self,
        src: &mut ByteSource<'_>,
        subject: Node,
        flags: StatementFlags,
        graph: Option<&Node>,
    ) -> Result<(), Status> {
        let mut ate_dot = false;
        self.read_predicate_object_list(src, &subject, graph, flags, &mut ate_dot)?;
        if !ate_dot {
            self.skip_ws(src)?;
            self.eat(src, b'.', "at end of statement")?;
        }
        Ok(())
    }

    // ---- Directives ----

    fn read_at_directive(&mut self, src: &mut ByteSource<'_>) -> Result<(), Status> {
        src.advance()?; // '@'
        let mut ate_dot = false;
        let word = self.read_bare_word(src, &mut ate_dot)?;
        match word.as_str() {
            "prefix" => self.read_prefix_decl(src, true),
            "base" => self.read_base_decl(src, true),
            _ => {
                let message = format!("'@{word}' is not a valid directive");
                Err(self.syntax_error(src, Status::BadSyntax, &message))
            }
        }
    }

    fn read_prefix_decl(&mut self, src: &mut ByteSource<'_>, with_dot: bool) -> Result<(), Status> {
        self.skip_ws(src)?;
        let mut ate_dot = false;
        let name = self.read_bare_word(src, &mut ate_dot)?;
        if ate_dot {
            return Err(self.syntax_error(src, Status::BadSyntax, "a prefix name cannot end with '.'"));
        }
        self.eat(src, b':', "after prefix name")?;
        self.skip_ws(src)?;
        let uri = self.read_iriref(src)?;
        self.sink.prefix(Node::literal(name), uri)?;
        if with_dot {
            self.skip_ws(src)?;
            self.eat(src, b'.', "after @prefix directive")?;
        }
        Ok(())
    }

    fn read_base_decl(&mut self, src: &mut ByteSource<'_>, with_dot: bool) -> Result<(), Status> {
        self.skip_ws(src)?;
        let uri = self.read_iriref(src)?;
        if self.env.set_base_uri(uri.as_str()).is_err() && !self.keeps_relative() {
            return Err(self.syntax_error(
                src,
                Status::BadSyntax,
                "the base URI is not absolute and no previous base is set",
            ));
        }
        self.sink.base(uri)?;
        if with_dot {
            self.skip_ws(src)?;
            self.eat(src, b'.', "after @base directive")?;
        }
        Ok(())
    }

    // ---- Graph blocks (TriG) ----

    fn read_graph_label(&mut self, src: &mut ByteSource<'_>) -> Result<Node, Status> {
        self.skip_ws(src)?;
        let mut ate_dot = false;
        match src.peek() {
            b'<' => self.read_iriref(src),
            b'_' => self.read_blank_label(src, &mut ate_dot),
            b'[' => {
                src.advance()?;
                self.skip_ws(src)?;
                self.eat(src, b']', "in anonymous graph label")?;
                Ok(self.generate_blank())
            }
            _ if starts_name(src.peek()) => self
                .read_pname_or_keyword(src, &mut ate_dot)?
                .into_node(self, src),
            c => {
                let message = format!("expected graph label, found '{}'", char::from(c));
                Err(self.syntax_error(src, Status::BadSyntax, &message))
            }
        }
    }

    /// The statements between `{` and `}`, all scoped to `graph`.
    fn read_graph_body(
        &mut self,
        src: &mut ByteSource<'_>,
        graph: Option<Node>,
    ) -> Result<(), Status> {
        loop {
            self.skip_ws(src)?;
            if src.peek() == b'}' {
                src.advance()?;
                return Ok(());
            }
            if src.is_eof() {
                return Err(self.syntax_error(src, Status::BadSyntax, "unterminated graph block"));
            }
            let ate_dot = self.read_graph_triples(src, graph.as_ref())?;
            if !ate_dot {
                self.skip_ws(src)?;
                if src.peek() == b'.' {
                    src.advance()?;
                } else if src.peek() != b'}' {
                    return Err(self.syntax_error(
                        src,
                        Status::BadSyntax,
                        "expected '.' or '}' after statement in graph block",
                    ));
                }
            }
        }
    }

    fn read_graph_triples(
        &mut self,
        src: &mut ByteSource<'_>,
        graph: Option<&Node>,
    ) -> Result<bool, Status> {
        let mut ate_dot = false;
        let (subject, tail) = if starts_name(src.peek()) {
            let subject = self
                .read_pname_or_keyword(src, &mut ate_dot)?
                .into_node(self, src)?;
            (
                subject,
                SubjectTail {
                    flags: StatementFlags::NONE,
                    had_description: false,
                },
            )
        } else {
            self.read_subject(src, graph, &mut ate_dot)?
        };
        if tail.had_description {
            if ate_dot {
                return Ok(true);
            }
            self.skip_ws(src)?;
            if matches!(src.peek(), b'.' | b'}') {
                return Ok(false);
            }
        } else if ate_dot {
            return Err(self.syntax_error(
                src,
                Status::BadSyntax,
                "statement ended after subject",
            ));
        }
        let mut ate_dot = false;
        self.read_predicate_object_list(src, &subject, graph, tail.flags, &mut ate_dot)?;
        Ok(ate_dot)
    }

    // ---- Triples ----

    fn read_subject(
        &mut self,
        src: &mut ByteSource<'_>,
        graph: Option<&Node>,
        ate_dot: &mut bool,
    ) -> Result<(Node, SubjectTail), Status> {
        let plain = SubjectTail {
            flags: StatementFlags::NONE,
            had_description: false,
        };
        match src.peek() {
            b'<' => Ok((self.read_iriref(src)?, plain)),
            b'_' => Ok((self.read_blank_label(src, ate_dot)?, plain)),
            b'?' | b'$' if self.variables_enabled() => {
                Ok((self.read_variable(src, ate_dot)?, plain))
            }
            b'[' => {
                src.advance()?;
                self.skip_ws(src)?;
                let blank = self.generate_blank();
                if src.peek() == b']' {
                    src.advance()?;
                    return Ok((
                        blank,
                        SubjectTail {
                            flags: StatementFlags::EMPTY_S,
                            had_description: false,
                        },
                    ));
                }
                self.read_predicate_object_list(
                    src,
                    &blank,
                    graph,
                    StatementFlags::ANON_S,
                    ate_dot,
                )?;
                self.skip_ws(src)?;
                self.eat(src, b']', "at end of blank node description")?;
                self.sink.end(blank.clone())?;
                Ok((
                    blank,
                    SubjectTail {
                        flags: StatementFlags::NONE,
                        had_description: true,
                    },
                ))
            }
            b'(' => {
                src.advance()?;
                self.skip_ws(src)?;
                if src.peek() == b')' {
                    src.advance()?;
                    return Ok((
                        self.canon.nil.clone(),
                        SubjectTail {
                            flags: StatementFlags::EMPTY_S,
                            had_description: false,
                        },
                    ));
                }
                let head = self.generate_blank();
                self.read_collection_items(src, graph, &head, StatementFlags::LIST_S)?;
                Ok((head, plain))
            }
            c => {
                let message = format!("expected subject, found '{}'", char::from(c));
                Err(self.syntax_error(src, Status::BadSyntax, &message))
            }
        }
    }

    fn read_verb(&mut self, src: &mut ByteSource<'_>) -> Result<Node, Status> {
        match src.peek() {
            b'<' => self.read_iriref(src),
            b'?' | b'$' if self.variables_enabled() => {
                let mut ate_dot = false;
                self.read_variable(src, &mut ate_dot)
            }
            _ => {
                let mut ate_dot = false;
                match self.read_pname_or_keyword(src, &mut ate_dot)? {
                    WordOrPname::Word(word) if word == "a" => Ok(self.canon.type_.clone()),
                    WordOrPname::Word(word) => {
                        let message = format!("expected predicate, found '{word}'");
                        Err(self.syntax_error(src, Status::BadSyntax, &message))
                    }
                    WordOrPname::Pname(node) => Ok(node),
                }
            }
        }
    }

    /// `predicate objectList (';' predicate objectList)*` with tolerance
    /// for trailing `;`. `first_flags` lands on the first statement only.
    fn read_predicate_object_list(
        &mut self,
        src: &mut ByteSource<'_>,
        subject: &Node,
        graph: Option<&Node>,
        first_flags: StatementFlags,
        ate_dot: &mut bool,
    ) -> Result<(), Status> {
        let mut pending = first_flags;
        loop {
            self.skip_ws(src)?;
            let predicate = self.read_verb(src)?;
            self.skip_ws(src)?;
            loop {
                let ctx = Ctx {
                    subject: subject.clone(),
                    predicate: predicate.clone(),
                    graph: graph.cloned(),
                    flags: pending,
                };
                pending = StatementFlags::NONE;
                self.read_object_into(src, ctx, ate_dot)?;
                if *ate_dot {
                    return Ok(());
                }
                self.skip_ws(src)?;
                if src.peek() == b',' {
                    src.advance()?;
                    self.skip_ws(src)?;
                } else {
                    break;
                }
            }
            if src.peek() == b';' {
                src.advance()?;
                self.skip_ws(src)?;
                while src.peek() == b';' {
                    src.advance()?;
                    self.skip_ws(src)?;
                }
                if matches!(src.peek(), b'.' | b']' | b'}') || src.is_eof() {
                    return Ok(());
                }
            } else {
                return Ok(());
            }
        }
    }

    /// Reads one object and emits the statement built from `ctx`, plus any
    /// description or collection statements the object itself produces.
    fn read_object_into(
        &mut self,
        src: &mut ByteSource<'_>,
        mut ctx: Ctx,
        ate_dot: &mut bool,
    ) -> Result<(), Status> {
        match src.peek() {
            b'<' => {
                let object = self.read_iriref(src)?;
                self.emit_ctx(ctx, object)
            }
            b'_' => {
                let object = self.read_blank_label(src, ate_dot)?;
                self.emit_ctx(ctx, object)
            }
            b'"' | b'\'' => {
                let text = self.read_string(src, true)?;
                let object = self.finish_literal(src, text, ate_dot)?;
                self.emit_ctx(ctx, object)
            }
            b'0'..=b'9' | b'+' | b'-' | b'.' => {
                let object = self.read_number(src, ate_dot)?;
                self.emit_ctx(ctx, object)
            }
            b'?' | b'$' if self.variables_enabled() => {
                let object = self.read_variable(src, ate_dot)?;
                self.emit_ctx(ctx, object)
            }
            b'[' => {
                src.advance()?;
                self.skip_ws(src)?;
                let blank = self.generate_blank();
                if src.peek() == b']' {
                    src.advance()?;
                    ctx.flags = ctx.flags | StatementFlags::EMPTY_O;
                    return self.emit_ctx(ctx, blank);
                }
                let graph = ctx.graph.clone();
                ctx.flags = ctx.flags | StatementFlags::ANON_O;
                self.emit_ctx(ctx, blank.clone())?;
                let mut inner_ate_dot = false;
                self.read_predicate_object_list(
                    src,
                    &blank,
                    graph.as_ref(),
                    StatementFlags::NONE,
                    &mut inner_ate_dot,
                )?;
                if inner_ate_dot {
                    return Err(self.syntax_error(
                        src,
                        Status::BadSyntax,
                        "'.' is not allowed inside a blank node description",
                    ));
                }
                self.skip_ws(src)?;
                self.eat(src, b']', "at end of blank node description")?;
                self.sink.end(blank)
            }
            b'(' => {
                src.advance()?;
                self.skip_ws(src)?;
                if src.peek() == b')' {
                    src.advance()?;
                    ctx.flags = ctx.flags | StatementFlags::EMPTY_O;
                    let nil = self.canon.nil.clone();
                    return self.emit_ctx(ctx, nil);
                }
                let graph = ctx.graph.clone();
                let head = self.generate_blank();
                ctx.flags = ctx.flags | StatementFlags::LIST_O;
                self.emit_ctx(ctx, head.clone())?;
                self.read_collection_items(src, graph.as_ref(), &head, StatementFlags::NONE)
            }
            _ if starts_name(src.peek()) => {
                match self.read_pname_or_keyword(src, ate_dot)? {
                    WordOrPname::Word(word) if word == "true" || word == "false" => {
                        let boolean = self.canon.boolean.clone();
                        let object = Node::typed_literal(word, boolean)
                            .map_err(|e| self.syntax_error(src, e, "invalid boolean literal"))?;
                        self.emit_ctx(ctx, object)
                    }
                    WordOrPname::Word(word) => {
                        let message = format!("expected object, found '{word}'");
                        Err(self.syntax_error(src, Status::BadSyntax, &message))
                    }
                    WordOrPname::Pname(object) => self.emit_ctx(ctx, object),
                }
            }
            c => {
                let message = format!("expected object, found '{}'", char::from(c));
                Err(self.syntax_error(src, Status::BadSyntax, &message))
            }
        }
    }

    /// The items of a non-empty collection, emitted as an `rdf:first`/
    /// `rdf:rest` chain alternating over generated blanks.
    fn read_collection_items(
        &mut self,
        src: &mut ByteSource<'_>,
        graph: Option<&Node>,
        head: &Node,
        first_flags: StatementFlags,
    ) -> Result<(), Status> {
        let mut cell = head.clone();
        let mut pending = first_flags;
        loop {
            let mut ate_dot = false;
            let ctx = Ctx {
                subject: cell.clone(),
                predicate: self.canon.first.clone(),
                graph: graph.cloned(),
                flags: pending,
            };
            pending = StatementFlags::NONE;
            self.read_object_into(src, ctx, &mut ate_dot)?;
            if ate_dot {
                return Err(self.syntax_error(
                    src,
                    Status::BadSyntax,
                    "'.' is not allowed inside a collection",
                ));
            }
            self.skip_ws(src)?;
            if src.peek() == b')' {
                src.advance()?;
                let rest = self.canon.rest.clone();
                let nil = self.canon.nil.clone();
                return self.emit(StatementFlags::NONE, cell, rest, nil, graph.cloned());
            }
            if src.is_eof() {
                return Err(self.syntax_error(src, Status::BadSyntax, "unterminated collection"));
            }
            let next = self.generate_blank();
            let rest = self.canon.rest.clone();
            self.emit(
                StatementFlags::NONE,
                cell,
                rest,
                next.clone(),
                graph.cloned(),
            )?;
            cell = next;
        }
    }

    fn emit_ctx(&mut self, ctx: Ctx, object: Node) -> Result<(), Status> {
        self.emit(ctx.flags, ctx.subject, ctx.predicate, object, ctx.graph)
    }

    fn keeps_relative(&self) -> bool {
        self.flags.contains(ReaderFlags::RELATIVE)
    }
}

/// True when a byte can start a prefixed name or keyword. `_` is not one:
/// it starts blank node labels.
fn starts_name(byte: u8) -> bool {
    !byte.is_ascii() || byte.is_ascii_alphabetic() || byte == b':'
}

#[cfg(test)]
mod tests {
    use crate::{Reader, Syntax};
    use oxevent::vocab::{rdf, xsd};
    use oxevent::{Event, EventCollector, LogEntry, Node, NodeKind, StatementFlags, Status};

    fn read(syntax: Syntax, input: &str) -> Result<EventCollector, Status> {
        let mut events = EventCollector::new();
        Reader::new(syntax, &mut events)
            .with_log(|_: &LogEntry<'_>| {})
            .read_str(input)?;
        Ok(events)
    }

    fn turtle(input: &str) -> EventCollector {
        read(Syntax::Turtle, input).unwrap()
    }

    #[test]
    fn prefix_and_type_abbreviation() {
        let events = turtle("@prefix eg: <http://example.org/> .\neg:s a eg:C ; eg:p \"hi\" .");
        assert!(matches!(
            &events.events[0],
            Event::Prefix { name, uri }
                if name.as_str() == "eg" && uri.as_str() == "http://example.org/"
        ));
        let statements: Vec<_> = events.statements().collect();
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].predicate.as_str(), rdf::TYPE);
        assert_eq!(statements[0].object, Node::curie("eg:C"));
        assert_eq!(statements[1].subject, Node::curie("eg:s"));
        assert_eq!(statements[1].object.as_str(), "hi");
    }

    #[test]
    fn sparql_style_directives() {
        let events = turtle("PREFIX eg: <http://example.org/>\nBASE <http://example.org/base/>\neg:s eg:p <doc> .");
        assert!(matches!(&events.events[0], Event::Prefix { .. }));
        assert!(matches!(&events.events[1], Event::Base { .. }));
        let statement = events.statements().next().unwrap();
        assert_eq!(statement.object.as_str(), "http://example.org/base/doc");
    }

    #[test]
    fn base_resolution_applies_to_iris() {
        let events = turtle("@base <http://example.org/dir/> .\n<a> <b> <../c> .");
        let statement = events.statements().next().unwrap();
        assert_eq!(statement.subject.as_str(), "http://example.org/dir/a");
        assert_eq!(statement.object.as_str(), "http://example.org/c");
    }

    #[test]
    fn object_lists_and_predicate_lists() {
        let events = turtle(
            "@prefix eg: <http://e/> .\neg:s eg:p eg:o1 , eg:o2 ;\n  eg:q eg:o3 ; .",
        );
        let statements: Vec<_> = events.statements().collect();
        assert_eq!(statements.len(), 3);
        assert_eq!(statements[0].object, Node::curie("eg:o1"));
        assert_eq!(statements[1].object, Node::curie("eg:o2"));
        assert_eq!(statements[2].predicate, Node::curie("eg:q"));
    }

    #[test]
    fn numbers_and_booleans() {
        let events = turtle("<http://e/s> <http://e/p> 42 , -3.14 , 1.2E3 , true , false .");
        let objects: Vec<_> = events.statements().map(|s| &s.object).collect();
        assert_eq!(objects[0].as_str(), "42");
        assert_eq!(objects[0].datatype().map(Node::as_str), Some(xsd::INTEGER));
        assert_eq!(objects[1].as_str(), "-3.14");
        assert_eq!(objects[1].datatype().map(Node::as_str), Some(xsd::DECIMAL));
        assert_eq!(objects[2].as_str(), "1.2E3");
        assert_eq!(objects[2].datatype().map(Node::as_str), Some(xsd::DOUBLE));
        assert_eq!(objects[3].as_str(), "true");
        assert_eq!(objects[3].datatype().map(Node::as_str), Some(xsd::BOOLEAN));
        assert_eq!(objects[4].as_str(), "false");
    }

    #[test]
    fn number_trailing_dot_ends_statement() {
        let events = turtle("<http://e/s> <http://e/p> 5.");
        let statement = events.statements().next().unwrap();
        assert_eq!(statement.object.as_str(), "5");
        assert_eq!(
            statement.object.datatype().map(Node::as_str),
            Some(xsd::INTEGER)
        );
    }

    #[test]
    fn booleans_do_not_eat_prefixed_names() {
        let events = turtle("@prefix true: <http://e/> .\n<http://e/s> <http://e/p> true:x .");
        let statement = events.statements().next().unwrap();
        assert_eq!(statement.object, Node::curie("true:x"));
        assert_eq!(statement.object.kind(), NodeKind::Curie);
    }

    #[test]
    fn long_literals() {
        let events = turtle("<http://e/s> <http://e/p> \"\"\"a\n\"b\"\"\" .");
        let object = &events.statements().next().unwrap().object;
        assert_eq!(object.as_str(), "a\n\"b");

        let events = turtle("<http://e/s> <http://e/p> '''x''y''' .");
        assert_eq!(events.statements().next().unwrap().object.as_str(), "x''y");
    }

    #[test]
    fn single_quoted_and_empty_strings() {
        let events = turtle("<http://e/s> <http://e/p> 'a' , \"\" , '''''' .");
        let objects: Vec<_> = events.statements().map(|s| s.object.as_str()).collect();
        assert_eq!(objects, ["a", "", ""]);
    }

    #[test]
    fn escaped_local_names() {
        let events = turtle("@prefix eg: <http://e/> .\neg:s eg:p eg:o\\.k .");
        assert_eq!(
            events.statements().next().unwrap().object,
            Node::curie("eg:o.k")
        );
    }

    #[test]
    fn pn_local_trailing_dot_ends_statement() {
        let events = turtle("@prefix eg: <http://e/> .\neg:s eg:p eg:o.");
        assert_eq!(
            events.statements().next().unwrap().object,
            Node::curie("eg:o")
        );
    }

    #[test]
    fn empty_anonymous_nodes() {
        let events = turtle("[] <http://e/p> [] .");
        let statement = events.statements().next().unwrap();
        assert!(statement.flags.contains(StatementFlags::EMPTY_S));
        assert!(statement.flags.contains(StatementFlags::EMPTY_O));
        assert_eq!(statement.subject.kind(), NodeKind::Blank);
        assert_eq!(statement.object.kind(), NodeKind::Blank);
        assert_ne!(statement.subject, statement.object);
        assert_eq!(events.events.len(), 1, "empty anons have no END");
    }

    #[test]
    fn anonymous_object_produces_balanced_end() {
        let events =
            turtle("<http://e/s> <http://e/p> [ <http://e/q> \"v\" ; <http://e/r> \"w\" ] .");
        let statements: Vec<_> = events.statements().collect();
        assert_eq!(statements.len(), 3);
        assert!(statements[0].flags.contains(StatementFlags::ANON_O));
        let blank = &statements[0].object;
        assert_eq!(&statements[1].subject, blank);
        assert_eq!(&statements[2].subject, blank);
        assert!(matches!(
            events.events.last().unwrap(),
            Event::End { node } if node == blank
        ));
    }

    #[test]
    fn anonymous_subject_description_comes_first() {
        let events = turtle("[ <http://e/p> \"v\" ] <http://e/q> \"w\" .");
        let statements: Vec<_> = events.statements().collect();
        assert_eq!(statements.len(), 2);
        assert!(statements[0].flags.contains(StatementFlags::ANON_S));
        assert_eq!(statements[0].object.as_str(), "v");
        assert_eq!(statements[1].subject, statements[0].subject);
        assert_eq!(statements[1].object.as_str(), "w");
        assert!(matches!(&events.events[1], Event::End { node } if *node == statements[0].subject));
    }

    #[test]
    fn bare_dot_after_anonymous_subject() {
        let events = turtle("[ <http://e/p> \"v\" ] .");
        assert_eq!(events.statements().count(), 1);
        assert!(matches!(events.events.last().unwrap(), Event::End { .. }));
    }

    #[test]
    fn collections_stream_first_rest_chains() {
        let events = turtle("<http://e/s> <http://e/p> ( 1 2 3 ) .");
        let statements: Vec<_> = events.statements().collect();
        assert_eq!(statements.len(), 7);
        assert!(statements[0].flags.contains(StatementFlags::LIST_O));
        let head = &statements[0].object;
        assert_eq!(&statements[1].subject, head);
        assert_eq!(statements[1].predicate.as_str(), rdf::FIRST);
        assert_eq!(statements[1].object.as_str(), "1");
        assert_eq!(statements[2].predicate.as_str(), rdf::REST);
        assert_eq!(statements[5].object.as_str(), "3");
        assert_eq!(statements[6].predicate.as_str(), rdf::REST);
        assert_eq!(statements[6].object.as_str(), rdf::NIL);
    }

    #[test]
    fn empty_collection_is_nil() {
        let events = turtle("<http://e/s> <http://e/p> ( ) .");
        let statement = events.statements().next().unwrap();
        assert!(statement.flags.contains(StatementFlags::EMPTY_O));
        assert_eq!(statement.object.as_str(), rdf::NIL);
    }

    #[test]
    fn collection_as_subject() {
        let events = turtle("( 1 ) <http://e/p> <http://e/o> .");
        let statements: Vec<_> = events.statements().collect();
        assert_eq!(statements.len(), 3);
        assert!(statements[0].flags.contains(StatementFlags::LIST_S));
        assert_eq!(statements[0].predicate.as_str(), rdf::FIRST);
        assert_eq!(statements[1].predicate.as_str(), rdf::REST);
        assert_eq!(statements[2].subject, statements[0].subject);
        assert_eq!(statements[2].object.as_str(), "http://e/o");
    }

    #[test]
    fn nested_structures() {
        let events = turtle("<http://e/s> <http://e/p> ( [ <http://e/q> 1 ] ( 2 ) ) .");
        // Containing statement, anon cell statements + END come interleaved,
        // all first/rest links present
        assert!(events.statements().count() >= 7);
        let ends = events
            .events
            .iter()
            .filter(|event| matches!(event, Event::End { .. }))
            .count();
        assert_eq!(ends, 1);
    }

    #[test]
    fn trig_graph_blocks() {
        let events = read(
            Syntax::TriG,
            "@prefix eg: <http://e/> .\neg:g { eg:s eg:p eg:o . eg:s eg:q eg:r }\n{ eg:s eg:p eg:o }\nGRAPH eg:h { eg:s eg:p eg:o }",
        )
        .unwrap();
        let statements: Vec<_> = events.statements().collect();
        assert_eq!(statements.len(), 4);
        assert_eq!(statements[0].graph, Some(Node::curie("eg:g")));
        assert_eq!(statements[1].graph, Some(Node::curie("eg:g")));
        assert_eq!(statements[2].graph, None);
        assert_eq!(statements[3].graph, Some(Node::curie("eg:h")));
    }

    #[test]
    fn graph_blocks_are_rejected_in_turtle() {
        assert_eq!(
            read(Syntax::Turtle, "<http://e/g> { <http://e/s> <http://e/p> <http://e/o> }")
                .unwrap_err(),
            Status::BadSyntax
        );
    }

    #[test]
    fn blank_labels_that_look_generated_are_padded() {
        let events = turtle("_:b1 <http://e/p> _:custom .");
        let statement = events.statements().next().unwrap();
        assert_eq!(statement.subject, Node::blank("Bb1"));
        assert_eq!(statement.object, Node::blank("custom"));
    }

    #[test]
    fn generated_blanks_use_the_configured_prefix() {
        let mut events = EventCollector::new();
        Reader::new(Syntax::Turtle, &mut events)
            .with_blank_prefix("in1-")
            .read_str("<http://e/s> <http://e/p> [] .")
            .unwrap();
        let statement = events.statements().next().unwrap();
        assert_eq!(statement.object.as_str(), "in1-b1");
    }

    #[test]
    fn lax_recovery_in_turtle() {
        let mut events = EventCollector::new();
        Reader::new(Syntax::Turtle, &mut events)
            .lax()
            .with_log(|_: &LogEntry<'_>| {})
            .read_str("<http://e/s> <http://e/p> <bad iri> .\n<http://e/s> <http://e/p> <http://e/o> .\n")
            .unwrap();
        assert_eq!(events.statements().count(), 1);
    }

    #[test]
    fn comments_are_skipped() {
        let events = turtle("# leading\n<http://e/s> # mid\n  <http://e/p> <http://e/o> . # end");
        assert_eq!(events.statements().count(), 1);
    }

    #[test]
    fn unicode_names() {
        let events = turtle("@prefix é: <http://e/> .\né:s é:p é:ô .");
        let statement = events.statements().next().unwrap();
        assert_eq!(statement.subject, Node::curie("é:s"));
        assert_eq!(statement.object, Node::curie("é:ô"));
    }
}
