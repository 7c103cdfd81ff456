//! N-Triples and N-Quads: one statement per line.

use crate::reader::Reader;
use crate::source::ByteSource;
use crate::syntax::Syntax;
use oxevent::{Node, StatementFlags, Status};

impl Reader<'_> {
    /// One N-Triples/N-Quads line: whitespace, a comment or a statement
    /// terminated by `.`.
    pub(crate) fn read_line(&mut self, src: &mut ByteSource<'_>) -> Result<(), Status> {
        self.skip_ws(src)?;
        if src.is_eof() {
            return Err(Status::Failure);
        }
        let mut ate_dot = false;
        let subject = self.read_line_resource(src, &mut ate_dot, "subject")?;
        if ate_dot {
            return Err(self.syntax_error(src, Status::BadSyntax, "statement ended after subject"));
        }
        self.skip_linear_ws(src)?;
        let predicate = self.read_line_predicate(src)?;
        self.skip_linear_ws(src)?;
        let object = self.read_line_object(src, &mut ate_dot)?;
        self.skip_linear_ws(src)?;
        let graph = if self.syntax == Syntax::NQuads && !ate_dot && src.peek() != b'.' {
            let graph = self.read_line_resource(src, &mut ate_dot, "graph label")?;
            self.skip_linear_ws(src)?;
            Some(graph)
        } else {
            None
        };
        if !ate_dot {
            self.eat(src, b'.', "at end of statement")?;
        }
        self.read_line_tail(src)?;
        self.emit(StatementFlags::NONE, subject, predicate, object, graph)
    }

    fn read_line_resource(
        &mut self,
        src: &mut ByteSource<'_>,
        ate_dot: &mut bool,
        position: &str,
    ) -> Result<Node, Status> {
        match src.peek() {
            b'<' => self.read_iriref(src),
            b'_' => self.read_blank_label(src, ate_dot),
            b'?' | b'$' if self.variables_enabled() => self.read_variable(src, ate_dot),
            c => {
                let message =
                    format!("expected {position}, found '{}'", char::from(c));
                Err(self.syntax_error(src, Status::BadSyntax, &message))
            }
        }
    }

    fn read_line_predicate(&mut self, src: &mut ByteSource<'_>) -> Result<Node, Status> {
        let mut ate_dot = false;
        match src.peek() {
            b'<' => self.read_iriref(src),
            b'?' | b'$' if self.variables_enabled() => self.read_variable(src, &mut ate_dot),
            c => {
                let message = format!("expected predicate, found '{}'", char::from(c));
                Err(self.syntax_error(src, Status::BadSyntax, &message))
            }
        }
    }

    fn read_line_object(
        &mut self,
        src: &mut ByteSource<'_>,
        ate_dot: &mut bool,
    ) -> Result<Node, Status> {
        match src.peek() {
            b'"' => {
                let text = self.read_string(src, false)?;
                match src.peek() {
                    b'@' => {
                        let tag = self.read_langtag(src)?;
                        Ok(Node::plain_literal_unchecked(text, tag))
                    }
                    b'^' => {
                        src.advance()?;
                        self.eat(src, b'^', "after '^' of a datatype annotation")?;
                        let datatype = self.read_iriref(src)?;
                        Node::typed_literal(text, datatype)
                            .map_err(|e| self.syntax_error(src, e, "invalid literal datatype"))
                    }
                    _ => Ok(Node::literal(text)),
                }
            }
            _ => self.read_line_resource(src, ate_dot, "object"),
        }
    }

    /// The rest of the line after the terminating dot: optional whitespace
    /// and comment, then a line ending or the end of input.
    fn read_line_tail(&mut self, src: &mut ByteSource<'_>) -> Result<(), Status> {
        self.skip_linear_ws(src)?;
        if src.peek() == b'#' {
            while src.peek() != b'\n' && !src.is_eof() {
                src.advance()?;
            }
        }
        if src.peek() == b'\r' {
            src.advance()?;
        }
        match src.peek() {
            b'\n' => {
                src.advance()?;
                Ok(())
            }
            0 if src.is_eof() => Ok(()),
            c => {
                let message = format!("expected end of line, found '{}'", char::from(c));
                Err(self.syntax_error(src, Status::BadSyntax, &message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Reader, Syntax};
    use oxevent::{Event, EventCollector, LogEntry, Node, NodeKind, Status};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn read(syntax: Syntax, input: &str) -> Result<EventCollector, Status> {
        let mut events = EventCollector::new();
        Reader::new(syntax, &mut events)
            .with_log(|_: &LogEntry<'_>| {})
            .read_str(input)?;
        Ok(events)
    }

    #[test]
    fn minimal_ntriples() {
        let events = read(
            Syntax::NTriples,
            "<http://example.org/s> <http://example.org/p> <http://example.org/o> .\n",
        )
        .unwrap();
        let statement = events.statements().next().unwrap();
        assert_eq!(statement.subject.as_str(), "http://example.org/s");
        assert_eq!(statement.predicate.kind(), NodeKind::Uri);
        assert_eq!(statement.object.as_str(), "http://example.org/o");
        assert_eq!(statement.graph, None);
    }

    #[test]
    fn literals_and_blanks() {
        let events = read(
            Syntax::NTriples,
            "_:s <http://example.org/p> \"a\\n\\\"b\"@en .\n\
             _:s <http://example.org/p> \"1\"^^<http://www.w3.org/2001/XMLSchema#integer> .\n",
        )
        .unwrap();
        let statements: Vec<_> = events.statements().collect();
        assert_eq!(statements[0].subject, Node::blank("s"));
        assert_eq!(statements[0].object.as_str(), "a\n\"b");
        assert_eq!(statements[0].object.language(), Some("en"));
        assert_eq!(
            statements[1].object.datatype().map(Node::as_str),
            Some("http://www.w3.org/2001/XMLSchema#integer")
        );
    }

    #[test]
    fn nquads_graph_label() {
        let events = read(
            Syntax::NQuads,
            "<http://e/s> <http://e/p> <http://e/o> <http://e/g> .\n<http://e/s> <http://e/p> <http://e/o> .\n",
        )
        .unwrap();
        let statements: Vec<_> = events.statements().collect();
        assert_eq!(
            statements[0].graph.as_ref().map(Node::as_str),
            Some("http://e/g")
        );
        assert_eq!(statements[1].graph, None);
    }

    #[test]
    fn graph_labels_are_rejected_in_ntriples() {
        assert_eq!(
            read(
                Syntax::NTriples,
                "<http://e/s> <http://e/p> <http://e/o> <http://e/g> .\n"
            )
            .unwrap_err(),
            Status::BadSyntax
        );
    }

    #[test]
    fn comments_and_blank_lines() {
        let events = read(
            Syntax::NTriples,
            "# a comment\n\n<http://e/s> <http://e/p> <http://e/o> . # trailing\n",
        )
        .unwrap();
        assert_eq!(events.statements().count(), 1);
    }

    #[test]
    fn escapes_in_iris() {
        let events = read(
            Syntax::NTriples,
            "<http://e/s> <http://e/p> <http://e/\\u00E9> .\n",
        )
        .unwrap();
        assert_eq!(
            events.statements().next().unwrap().object.as_str(),
            "http://e/é"
        );
    }

    #[test]
    fn lax_mode_recovers_on_next_line() {
        let warnings = Rc::new(RefCell::new(Vec::new()));
        let recorded = Rc::clone(&warnings);
        let mut events = EventCollector::new();
        let mut reader = Reader::new(Syntax::NTriples, &mut events)
            .lax()
            .with_log(move |entry: &LogEntry<'_>| {
                recorded
                    .borrow_mut()
                    .push((entry.level, entry.caret.map(|c| (c.line, c.col))));
            });
        reader
            .read_str("# fine\n<bad iri> <http://e/p> <http://e/o> .\n<http://e/s> <http://e/p> <http://e/o> .\n")
            .unwrap();
        drop(reader);
        assert_eq!(events.statements().count(), 1);
        let warnings = warnings.borrow();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].1.map(|(line, _)| line), Some(2));
    }

    #[test]
    fn strict_mode_stops() {
        assert_eq!(
            read(
                Syntax::NTriples,
                "<bad iri> <http://e/p> <http://e/o> .\n<http://e/s> <http://e/p> <http://e/o> .\n"
            )
            .unwrap_err(),
            Status::BadSyntax
        );
    }

    #[test]
    fn variables_need_the_flag() {
        assert!(read(Syntax::NTriples, "?s <http://e/p> <http://e/o> .\n").is_err());

        let mut events = EventCollector::new();
        Reader::new(Syntax::NTriples, &mut events)
            .with_variables()
            .read_str("?s <http://e/p> $o .\n")
            .unwrap();
        let statement = events.statements().next().unwrap();
        assert_eq!(statement.subject, Node::variable("s"));
        assert_eq!(statement.object, Node::variable("o"));
    }

    #[test]
    fn events_arrive_in_document_order() {
        let events = read(
            Syntax::NTriples,
            "<http://e/a> <http://e/p> <http://e/o> .\n<http://e/b> <http://e/p> <http://e/o> .\n",
        )
        .unwrap();
        let subjects: Vec<_> = events
            .events
            .iter()
            .map(|event| match event {
                Event::Statement(statement) => statement.subject.as_str(),
                _ => panic!("only statements expected"),
            })
            .collect();
        assert_eq!(subjects, ["http://e/a", "http://e/b"]);
    }
}
