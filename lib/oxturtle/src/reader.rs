//! The streaming reader: a recursive-descent parser emitting RDF events.

use crate::source::ByteSource;
use crate::stack::Stack;
use crate::syntax::Syntax;
use oxevent::vocab::{rdf, xsd};
use oxevent::{
    Env, Log, LogEntry, LogLevel, Node, Sink, Statement, StatementFlags, Status, StderrLog, UriRef,
    grammar,
};
use std::io::Read;
use std::ops::BitOr;
use std::sync::Arc;

/// Reader behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReaderFlags(u8);

impl ReaderFlags {
    pub const NONE: Self = Self(0);
    /// Tolerate recoverable errors by skipping to the next line.
    pub const LAX: Self = Self(1);
    /// Support `?name` and `$name` variable nodes.
    pub const VARIABLES: Self = Self(1 << 1);
    /// Keep relative URI references as written instead of resolving them.
    pub const RELATIVE: Self = Self(1 << 2);
    /// Do not namespace blank node labels per reader.
    pub const GLOBAL: Self = Self(1 << 3);
    /// Generate blank nodes for anonymous forms (`[]`, `(...)`).
    pub const GENERATED: Self = Self(1 << 4);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ReaderFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Nodes the grammars produce over and over, built once per reader.
pub(crate) struct CanonNodes {
    pub first: Node,
    pub rest: Node,
    pub nil: Node,
    pub type_: Node,
    pub integer: Node,
    pub decimal: Node,
    pub double: Node,
    pub boolean: Node,
}

impl CanonNodes {
    fn new() -> Self {
        Self {
            first: Node::uri(rdf::FIRST),
            rest: Node::uri(rdf::REST),
            nil: Node::uri(rdf::NIL),
            type_: Node::uri(rdf::TYPE),
            integer: Node::uri(xsd::INTEGER),
            decimal: Node::uri(xsd::DECIMAL),
            double: Node::uri(xsd::DOUBLE),
            boolean: Node::uri(xsd::BOOLEAN),
        }
    }
}

/// A streaming reader for one of the [`Syntax`] grammars.
///
/// The reader pulls bytes from an input, parses statements and directives
/// and pushes [`oxevent`] events to its sink in document order. It never
/// builds a document in memory: a statement is emitted as soon as its last
/// node is complete.
///
/// ```
/// use oxevent::EventCollector;
/// use oxturtle::{Reader, Syntax};
///
/// let mut events = EventCollector::new();
/// Reader::new(Syntax::Turtle, &mut events)
///     .read_str("@prefix eg: <http://example.org/> .\neg:s eg:p eg:o , \"x\" .")?;
/// assert_eq!(events.statements().count(), 2);
/// # Result::<_, oxevent::Status>::Ok(())
/// ```
pub struct Reader<'a> {
    pub(crate) syntax: Syntax,
    pub(crate) flags: ReaderFlags,
    pub(crate) sink: &'a mut dyn Sink,
    log: Box<dyn Log + 'a>,
    pub(crate) env: Env,
    pub(crate) stack: Stack,
    pub(crate) canon: CanonNodes,
    blank_prefix: String,
    next_blank_id: u64,
    block_size: usize,
    document: Option<Arc<str>>,
}

impl<'a> Reader<'a> {
    pub fn new(syntax: Syntax, sink: &'a mut dyn Sink) -> Self {
        Self {
            syntax,
            flags: ReaderFlags::GENERATED,
            sink,
            log: Box::new(StderrLog::new()),
            env: Env::new(),
            stack: Stack::new(None),
            canon: CanonNodes::new(),
            blank_prefix: String::new(),
            next_blank_id: 0,
            block_size: 4096,
            document: None,
        }
    }

    /// Keeps going over recoverable errors, reporting them as warnings and
    /// skipping to the next line.
    #[must_use]
    pub fn lax(mut self) -> Self {
        self.flags = self.flags | ReaderFlags::LAX;
        self
    }

    /// Enables `?name` and `$name` variable nodes.
    #[must_use]
    pub fn with_variables(mut self) -> Self {
        self.flags = self.flags | ReaderFlags::VARIABLES;
        self
    }

    /// Keeps relative URI references as written.
    #[must_use]
    pub fn with_relative_uris(mut self) -> Self {
        self.flags = self.flags | ReaderFlags::RELATIVE;
        self
    }

    /// Adds to the flag set.
    #[must_use]
    pub fn with_flags(mut self, flags: ReaderFlags) -> Self {
        self.flags = self.flags | flags;
        self
    }

    /// Sets the base URI relative references are resolved against.
    pub fn with_base_uri(mut self, uri: &str) -> Result<Self, Status> {
        self.env.set_base_uri(uri)?;
        Ok(self)
    }

    /// Namespaces every blank label this reader produces, so that events
    /// from concurrent reads do not collide.
    #[must_use]
    pub fn with_blank_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.blank_prefix = prefix.into();
        self
    }

    /// Sets the input page size; 1 reads byte-at-a-time.
    #[must_use]
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Caps the scratch stack; exceeding it fails the document with
    /// `BadStack`.
    #[must_use]
    pub fn with_stack_limit(mut self, bytes: usize) -> Self {
        self.stack = Stack::new(Some(bytes));
        self
    }

    /// Names the document in carets and diagnostics.
    #[must_use]
    pub fn with_document_name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.document = Some(name.into());
        self
    }

    /// Replaces the diagnostics consumer (stderr by default).
    #[must_use]
    pub fn with_log(mut self, log: impl Log + 'a) -> Self {
        self.log = Box::new(log);
        self
    }

    /// Reads a whole document from `input`, pushing events to the sink.
    pub fn read(&mut self, input: impl Read) -> Result<(), Status> {
        let mut source = ByteSource::new(input, self.block_size, self.document.clone());
        self.read_document(&mut source)
    }

    /// Reads a whole document from a string.
    pub fn read_str(&mut self, input: &str) -> Result<(), Status> {
        self.read(input.as_bytes())
    }

    fn read_document(&mut self, src: &mut ByteSource<'_>) -> Result<(), Status> {
        src.prepare()?;
        src.skip_bom()?;
        loop {
            let rewind = self.stack.len();
            let result = if self.syntax.is_line_based() {
                self.read_line(src)
            } else {
                self.read_terse_block(src)
            };
            match result {
                Ok(()) => {}
                Err(Status::Failure) => return Ok(()), // end of input
                Err(e) if self.is_lax() && e.is_recoverable() => {
                    self.stack.pop_to(rewind);
                    self.skip_to_next_line(src)?;
                    if src.is_eof() {
                        return Ok(());
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub(crate) fn is_lax(&self) -> bool {
        self.flags.contains(ReaderFlags::LAX)
    }

    pub(crate) fn variables_enabled(&self) -> bool {
        self.flags.contains(ReaderFlags::VARIABLES)
    }

    /// Reports a grammar violation at the current position and hands back
    /// the status for propagation.
    pub(crate) fn syntax_error(
        &mut self,
        src: &ByteSource<'_>,
        status: Status,
        message: &str,
    ) -> Status {
        let level = if self.is_lax() && status.is_recoverable() {
            LogLevel::Warning
        } else {
            LogLevel::Error
        };
        self.log.log(&LogEntry {
            level,
            caret: Some(src.caret()),
            status: Some(status),
            message,
        });
        status
    }

    fn skip_to_next_line(&mut self, src: &mut ByteSource<'_>) -> Result<(), Status> {
        loop {
            let byte = src.peek();
            if !src.advance()? {
                return Ok(());
            }
            if byte == b'\n' {
                return Ok(());
            }
        }
    }

    /// Skips whitespace and comments. At end of input it simply returns, so
    /// callers check [`ByteSource::is_eof`] or the next peek.
    pub(crate) fn skip_ws(&mut self, src: &mut ByteSource<'_>) -> Result<(), Status> {
        loop {
            match src.peek() {
                b' ' | b'\t' | b'\r' | b'\n' => {
                    src.advance()?;
                }
                b'#' => {
                    while src.peek() != b'\n' && !src.is_eof() {
                        src.advance()?;
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Skips spaces and tabs only, for the line-based grammars.
    pub(crate) fn skip_linear_ws(&mut self, src: &mut ByteSource<'_>) -> Result<(), Status> {
        while matches!(src.peek(), b' ' | b'\t') {
            src.advance()?;
        }
        Ok(())
    }

    pub(crate) fn eat(
        &mut self,
        src: &mut ByteSource<'_>,
        expected: u8,
        context: &str,
    ) -> Result<(), Status> {
        if src.peek() != expected {
            let message = format!(
                "expected '{}' {context}, found '{}'",
                char::from(expected),
                char::from(src.peek())
            );
            return Err(self.syntax_error(src, Status::BadSyntax, &message));
        }
        src.advance()?;
        Ok(())
    }

    /// A fresh blank node for an anonymous form or list cell.
    pub(crate) fn generate_blank(&mut self) -> Node {
        self.next_blank_id += 1;
        if self.flags.contains(ReaderFlags::GLOBAL) {
            Node::blank(format!("b{}", self.next_blank_id))
        } else {
            Node::blank(format!("{}b{}", self.blank_prefix, self.next_blank_id))
        }
    }

    /// A blank node read from the document. Labels that look like generated
    /// ones are padded with `B` so they can never collide; the writer strips
    /// the pad again.
    pub(crate) fn document_blank(&self, label: String) -> Node {
        if !self.flags.contains(ReaderFlags::GLOBAL) && label_looks_generated(&label) {
            Node::blank(format!("B{label}"))
        } else {
            Node::blank(label)
        }
    }

    /// Sends a statement to the sink.
    pub(crate) fn emit(
        &mut self,
        flags: StatementFlags,
        subject: Node,
        predicate: Node,
        object: Node,
        graph: Option<Node>,
    ) -> Result<(), Status> {
        let mut statement = Statement::new(subject, predicate, object).with_flags(flags);
        statement.graph = graph;
        self.sink.statement(statement)
    }

    // ---- Shared character-level productions ----

    /// Decodes one UTF-8 character whose first byte is already peeked.
    /// Consumes the whole sequence. In lax mode invalid sequences come back
    /// as U+FFFD; in strict mode they are `BadText`.
    pub(crate) fn read_utf8_char(&mut self, src: &mut ByteSource<'_>) -> Result<char, Status> {
        let first = src.peek();
        src.advance()?;
        if first < 0x80 {
            return Ok(char::from(first));
        }
        let (len, mut code_point) = match first {
            0xC2..=0xDF => (1, u32::from(first) & 0x1F),
            0xE0..=0xEF => (2, u32::from(first) & 0xF),
            0xF0..=0xF4 => (3, u32::from(first) & 0x7),
            _ => {
                return if self.is_lax() {
                    Ok('\u{FFFD}')
                } else {
                    Err(self.syntax_error(src, Status::BadText, "invalid UTF-8 character encoding"))
                };
            }
        };
        for _ in 0..len {
            let byte = src.peek();
            if !(0x80..=0xBF).contains(&byte) {
                return if self.is_lax() {
                    Ok('\u{FFFD}')
                } else {
                    Err(self.syntax_error(src, Status::BadText, "invalid UTF-8 character encoding"))
                };
            }
            src.advance()?;
            code_point = (code_point << 6) | (u32::from(byte) & 0x3F);
        }
        match char::from_u32(code_point) {
            Some(c) => Ok(c),
            None if self.is_lax() => Ok('\u{FFFD}'),
            None => Err(self.syntax_error(src, Status::BadText, "invalid UTF-8 code point")),
        }
    }

    /// Reads `\uXXXX` or `\UXXXXXXXX` with the backslash already consumed
    /// and the `u`/`U` peeked.
    pub(crate) fn read_uchar(&mut self, src: &mut ByteSource<'_>) -> Result<char, Status> {
        let len = match src.peek() {
            b'u' => 4,
            b'U' => 8,
            _ => {
                return Err(self.syntax_error(src, Status::BadSyntax, "invalid escape sequence"));
            }
        };
        src.advance()?;
        let mut code_point: u32 = 0;
        for _ in 0..len {
            let digit = match char::from(src.peek()).to_digit(16) {
                Some(digit) => digit,
                None => {
                    return Err(self.syntax_error(
                        src,
                        Status::BadSyntax,
                        "expected a hexadecimal digit in escape sequence",
                    ));
                }
            };
            src.advance()?;
            code_point = code_point * 16 + digit;
        }
        char::from_u32(code_point).ok_or_else(|| {
            self.syntax_error(
                src,
                Status::BadSyntax,
                &format!("the code point {code_point:X} is not a character"),
            )
        })
    }

    /// Reads one string escape (`ECHAR` or `UCHAR`) with the backslash
    /// peeked.
    pub(crate) fn read_string_escape(&mut self, src: &mut ByteSource<'_>) -> Result<char, Status> {
        src.advance()?; // '\\'
        match src.peek() {
            b'u' | b'U' => self.read_uchar(src),
            b't' => self.eat_escape(src, '\t'),
            b'b' => self.eat_escape(src, '\u{8}'),
            b'n' => self.eat_escape(src, '\n'),
            b'r' => self.eat_escape(src, '\r'),
            b'f' => self.eat_escape(src, '\u{C}'),
            b'"' => self.eat_escape(src, '"'),
            b'\'' => self.eat_escape(src, '\''),
            b'\\' => self.eat_escape(src, '\\'),
            c => Err(self.syntax_error(
                src,
                Status::BadSyntax,
                &format!("unexpected escape character '\\{}'", char::from(c)),
            )),
        }
    }

    fn eat_escape(&mut self, src: &mut ByteSource<'_>, c: char) -> Result<char, Status> {
        src.advance()?;
        Ok(c)
    }

    // ---- Shared token productions ----

    /// `IRIREF`: `<...>` with `\uXXXX`/`\UXXXXXXXX` escapes. The opening
    /// `<` must be peeked. Relative references are resolved against the
    /// base unless the reader keeps them.
    pub(crate) fn read_iriref(&mut self, src: &mut ByteSource<'_>) -> Result<Node, Status> {
        self.eat(src, b'<', "at start of IRI")?;
        let start = self.stack.len();
        loop {
            match src.peek() {
                b'>' => {
                    src.advance()?;
                    break;
                }
                0 if src.is_eof() => {
                    self.stack.pop_to(start);
                    return Err(self.syntax_error(src, Status::BadSyntax, "unterminated IRI"));
                }
                b'\\' => {
                    src.advance()?;
                    let c = match self.read_uchar(src) {
                        Ok(c) => c,
                        Err(e) => {
                            self.stack.pop_to(start);
                            return Err(e);
                        }
                    };
                    if matches!(c, '\0'..='\u{20}' | '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`') {
                        self.stack.pop_to(start);
                        return Err(self.syntax_error(
                            src,
                            Status::BadSyntax,
                            &format!("character '{}' is not allowed in IRIs", c.escape_default()),
                        ));
                    }
                    self.stack.push_char(c)?;
                }
                c @ (b'\0'..=b' ' | b'"' | b'{' | b'}' | b'|' | b'^' | b'`' | b'<') => {
                    self.stack.pop_to(start);
                    return Err(self.syntax_error(
                        src,
                        Status::BadSyntax,
                        &format!(
                            "character '{}' is not allowed in IRIs",
                            char::from(c).escape_default()
                        ),
                    ));
                }
                c => {
                    self.stack.push_byte(c)?;
                    src.advance()?;
                }
            }
        }
        let text = self.take_text(src, start)?;
        self.finish_iri(src, text)
    }

    fn take_text(&mut self, src: &ByteSource<'_>, start: usize) -> Result<String, Status> {
        if self.is_lax() {
            Ok(self.stack.take_string_lossy(start))
        } else {
            match self.stack.take_string(start) {
                Ok(text) => Ok(text),
                Err(e) => Err(self.syntax_error(src, e, "text is not valid UTF-8")),
            }
        }
    }

    fn finish_iri(&mut self, src: &ByteSource<'_>, text: String) -> Result<Node, Status> {
        if self.flags.contains(ReaderFlags::RELATIVE) {
            return Ok(Node::uri(text));
        }
        let view = UriRef::parse(&text);
        if view.is_absolute() {
            return Ok(Node::uri(text));
        }
        let Some(base) = self.env.base_uri() else {
            return Ok(Node::uri(text));
        };
        let mut absolute = String::new();
        match view.resolve_into(&UriRef::parse(base.as_str()), &mut absolute) {
            Ok(()) => Ok(Node::uri(absolute)),
            Err(e) => Err(self.syntax_error(src, e, "cannot resolve IRI against base")),
        }
    }

    /// A bare word of `PN_CHARS`, with trailing dots returned through
    /// `ate_dot` (they terminate the enclosing statement).
    pub(crate) fn read_bare_word(
        &mut self,
        src: &mut ByteSource<'_>,
        ate_dot: &mut bool,
    ) -> Result<String, Status> {
        let start = self.stack.len();
        let mut pending_dots = 0usize;
        loop {
            let byte = src.peek();
            if byte == b'.' && (self.stack.len() > start || pending_dots > 0) {
                pending_dots += 1;
                src.advance()?;
                continue;
            }
            let continues = if byte.is_ascii() {
                byte != 0 && grammar::is_pn_chars(char::from(byte))
            } else {
                true // multi-byte characters are validated after decoding
            };
            if !continues {
                break;
            }
            if pending_dots > 0 {
                for _ in 0..pending_dots {
                    self.stack.push_byte(b'.')?;
                }
                pending_dots = 0;
            }
            if byte.is_ascii() {
                self.stack.push_byte(byte)?;
                src.advance()?;
            } else {
                let c = self.read_utf8_char(src)?;
                if !grammar::is_pn_chars(c) {
                    self.stack.pop_to(start);
                    return Err(self.syntax_error(
                        src,
                        Status::BadSyntax,
                        &format!("unexpected character '{c}' in name"),
                    ));
                }
                self.stack.push_char(c)?;
            }
        }
        if pending_dots > 1 {
            self.stack.pop_to(start);
            return Err(self.syntax_error(src, Status::BadSyntax, "unexpected '..'"));
        }
        *ate_dot = pending_dots == 1;
        self.take_text(src, start)
    }

    /// `PN_LOCAL` after the colon of a prefixed name, unescaping `\`
    /// escapes and keeping `%XX` verbatim.
    pub(crate) fn read_pn_local(
        &mut self,
        src: &mut ByteSource<'_>,
        ate_dot: &mut bool,
    ) -> Result<String, Status> {
        let start = self.stack.len();
        let mut pending_dots = 0usize;
        let mut first = true;
        loop {
            let byte = src.peek();
            match byte {
                b'.' if !first => {
                    pending_dots += 1;
                    src.advance()?;
                    continue;
                }
                b'%' => {
                    self.flush_dots(&mut pending_dots)?;
                    src.advance()?;
                    let mut escape = [b'%', 0, 0];
                    for slot in escape.iter_mut().skip(1) {
                        let digit = src.peek();
                        if !digit.is_ascii_hexdigit() {
                            self.stack.pop_to(start);
                            return Err(self.syntax_error(
                                src,
                                Status::BadSyntax,
                                "'%' in a local name must start a two-digit escape",
                            ));
                        }
                        *slot = digit;
                        src.advance()?;
                    }
                    self.stack.push(&escape)?;
                }
                b'\\' => {
                    self.flush_dots(&mut pending_dots)?;
                    src.advance()?;
                    let c = char::from(src.peek());
                    if !grammar::can_be_escaped_in_local_name(c) {
                        self.stack.pop_to(start);
                        return Err(self.syntax_error(
                            src,
                            Status::BadSyntax,
                            &format!("'{c}' cannot be escaped in a local name"),
                        ));
                    }
                    src.advance()?;
                    self.stack.push_char(c)?;
                }
                b':' => {
                    self.flush_dots(&mut pending_dots)?;
                    self.stack.push_byte(b':')?;
                    src.advance()?;
                }
                byte if byte.is_ascii() => {
                    let c = char::from(byte);
                    let ok = if first {
                        grammar::is_pn_chars_u(c) || c.is_ascii_digit()
                    } else {
                        grammar::is_pn_chars(c)
                    };
                    if !ok {
                        break;
                    }
                    self.flush_dots(&mut pending_dots)?;
                    self.stack.push_byte(byte)?;
                    src.advance()?;
                }
                _ => {
                    self.flush_dots(&mut pending_dots)?;
                    let c = self.read_utf8_char(src)?;
                    let ok = if first {
                        grammar::is_pn_chars_u(c)
                    } else {
                        grammar::is_pn_chars(c)
                    };
                    if !ok {
                        self.stack.pop_to(start);
                        return Err(self.syntax_error(
                            src,
                            Status::BadSyntax,
                            &format!("unexpected character '{c}' in local name"),
                        ));
                    }
                    self.stack.push_char(c)?;
                }
            }
            first = false;
        }
        if pending_dots > 1 {
            self.stack.pop_to(start);
            return Err(self.syntax_error(src, Status::BadSyntax, "unexpected '..'"));
        }
        *ate_dot = pending_dots == 1;
        self.take_text(src, start)
    }

    /// `BLANK_NODE_LABEL` with `_` peeked.
    pub(crate) fn read_blank_label(
        &mut self,
        src: &mut ByteSource<'_>,
        ate_dot: &mut bool,
    ) -> Result<Node, Status> {
        self.eat(src, b'_', "at start of blank node")?;
        self.eat(src, b':', "after '_' of blank node")?;
        let start = self.stack.len();
        let mut pending_dots = 0usize;
        let mut first = true;
        loop {
            let byte = src.peek();
            if byte == b'.' && !first {
                pending_dots += 1;
                src.advance()?;
                continue;
            }
            let c = if byte.is_ascii() {
                char::from(byte)
            } else {
                self.flush_dots(&mut pending_dots)?;
                let c = self.read_utf8_char(src)?;
                let ok = if first {
                    grammar::is_pn_chars_u(c)
                } else {
                    grammar::is_pn_chars(c)
                };
                if !ok {
                    self.stack.pop_to(start);
                    return Err(self.syntax_error(
                        src,
                        Status::BadSyntax,
                        &format!("unexpected character '{c}' in blank node label"),
                    ));
                }
                self.stack.push_char(c)?;
                first = false;
                continue;
            };
            let ok = if first {
                grammar::is_pn_chars_u(c) || c.is_ascii_digit()
            } else {
                grammar::is_pn_chars(c)
            };
            if !ok {
                break;
            }
            self.flush_dots(&mut pending_dots)?;
            self.stack.push_byte(byte)?;
            src.advance()?;
            first = false;
        }
        if first {
            self.stack.pop_to(start);
            return Err(self.syntax_error(src, Status::BadSyntax, "a blank node label cannot be empty"));
        }
        if pending_dots > 1 {
            self.stack.pop_to(start);
            return Err(self.syntax_error(src, Status::BadSyntax, "unexpected '..'"));
        }
        *ate_dot = pending_dots == 1;
        let label = self.take_text(src, start)?;
        Ok(self.document_blank(label))
    }

    /// `LANGTAG` with `@` peeked.
    pub(crate) fn read_langtag(&mut self, src: &mut ByteSource<'_>) -> Result<String, Status> {
        self.eat(src, b'@', "at start of language tag")?;
        let start = self.stack.len();
        if !src.peek().is_ascii_alphabetic() {
            return Err(self.syntax_error(
                src,
                Status::BadSyntax,
                "a language tag must start with a letter",
            ));
        }
        while src.peek().is_ascii_alphabetic() {
            self.stack.push_byte(src.peek())?;
            src.advance()?;
        }
        while src.peek() == b'-' {
            self.stack.push_byte(b'-')?;
            src.advance()?;
            if !src.peek().is_ascii_alphanumeric() {
                self.stack.pop_to(start);
                return Err(self.syntax_error(
                    src,
                    Status::BadSyntax,
                    "a language tag block cannot be empty",
                ));
            }
            while src.peek().is_ascii_alphanumeric() {
                self.stack.push_byte(src.peek())?;
                src.advance()?;
            }
        }
        let tag = self.take_text(src, start)?;
        if !self.is_lax() && oxilangtag::LanguageTag::parse(tag.as_str()).is_err() {
            return Err(self.syntax_error(
                src,
                Status::BadLiteral,
                &format!("'{tag}' is not a valid language tag"),
            ));
        }
        Ok(tag)
    }

    /// A numeric literal (`INTEGER` | `DECIMAL` | `DOUBLE`), with a
    /// trailing dot that turned out to terminate the statement reported
    /// through `ate_dot`.
    pub(crate) fn read_number(
        &mut self,
        src: &mut ByteSource<'_>,
        ate_dot: &mut bool,
    ) -> Result<Node, Status> {
        let start = self.stack.len();
        if matches!(src.peek(), b'+' | b'-') {
            self.stack.push_byte(src.peek())?;
            src.advance()?;
        }
        let mut digits_before = 0usize;
        while src.peek().is_ascii_digit() {
            self.stack.push_byte(src.peek())?;
            src.advance()?;
            digits_before += 1;
        }
        let mut is_decimal = false;
        if src.peek() == b'.' {
            src.advance()?;
            if src.peek().is_ascii_digit() {
                is_decimal = true;
                self.stack.push_byte(b'.')?;
                while src.peek().is_ascii_digit() {
                    self.stack.push_byte(src.peek())?;
                    src.advance()?;
                }
            } else if matches!(src.peek(), b'e' | b'E') && digits_before > 0 {
                // An empty fraction before an exponent, as in `1.E5`
                self.stack.push_byte(b'.')?;
            } else {
                // The dot was the statement terminator after all
                *ate_dot = true;
            }
        }
        let datatype = if matches!(src.peek(), b'e' | b'E') && !*ate_dot {
            self.stack.push_byte(src.peek())?;
            src.advance()?;
            if matches!(src.peek(), b'+' | b'-') {
                self.stack.push_byte(src.peek())?;
                src.advance()?;
            }
            if !src.peek().is_ascii_digit() {
                self.stack.pop_to(start);
                return Err(self.syntax_error(
                    src,
                    Status::BadSyntax,
                    "a double exponent cannot be empty",
                ));
            }
            while src.peek().is_ascii_digit() {
                self.stack.push_byte(src.peek())?;
                src.advance()?;
            }
            self.canon.double.clone()
        } else if is_decimal {
            self.canon.decimal.clone()
        } else {
            self.canon.integer.clone()
        };
        if digits_before == 0 && !is_decimal {
            self.stack.pop_to(start);
            return Err(self.syntax_error(src, Status::BadSyntax, "a number cannot be empty"));
        }
        let text = self.take_text(src, start)?;
        Node::typed_literal(text, datatype)
            .map_err(|e| self.syntax_error(src, e, "invalid numeric literal"))
    }

    /// A variable (`?name` or `$name`) with the sigil peeked.
    pub(crate) fn read_variable(
        &mut self,
        src: &mut ByteSource<'_>,
        ate_dot: &mut bool,
    ) -> Result<Node, Status> {
        src.advance()?; // '?' or '$'
        let name = self.read_pn_local(src, ate_dot)?;
        if name.is_empty() {
            return Err(self.syntax_error(
                src,
                Status::BadSyntax,
                "a variable name cannot be empty",
            ));
        }
        Ok(Node::variable(name))
    }

    /// A short or long quoted string with the opening delimiter peeked.
    /// Long forms are only reachable from the terse grammars.
    pub(crate) fn read_string(
        &mut self,
        src: &mut ByteSource<'_>,
        allow_long: bool,
    ) -> Result<String, Status> {
        let delimiter = src.peek();
        src.advance()?;
        if src.peek() != delimiter {
            return self.read_short_string_rest(src, delimiter);
        }
        src.advance()?;
        if src.peek() != delimiter || !allow_long {
            // An empty string
            return Ok(String::new());
        }
        src.advance()?;
        self.read_long_string_rest(src, delimiter)
    }

    fn read_short_string_rest(
        &mut self,
        src: &mut ByteSource<'_>,
        delimiter: u8,
    ) -> Result<String, Status> {
        let start = self.stack.len();
        loop {
            match src.peek() {
                c if c == delimiter => {
                    src.advance()?;
                    break;
                }
                0 if src.is_eof() => {
                    self.stack.pop_to(start);
                    return Err(self.syntax_error(src, Status::BadSyntax, "unterminated string"));
                }
                b'\\' => {
                    let c = match self.read_string_escape(src) {
                        Ok(c) => c,
                        Err(e) => {
                            self.stack.pop_to(start);
                            return Err(e);
                        }
                    };
                    self.stack.push_char(c)?;
                }
                b'\n' | b'\r' if !self.is_lax() => {
                    self.stack.pop_to(start);
                    return Err(self.syntax_error(
                        src,
                        Status::BadSyntax,
                        "line endings are not allowed in short strings, use \\n",
                    ));
                }
                c => {
                    self.stack.push_byte(c)?;
                    src.advance()?;
                }
            }
        }
        self.take_text(src, start)
    }

    fn read_long_string_rest(
        &mut self,
        src: &mut ByteSource<'_>,
        delimiter: u8,
    ) -> Result<String, Status> {
        let start = self.stack.len();
        let mut quotes = 0usize;
        loop {
            match src.peek() {
                c if c == delimiter => {
                    quotes += 1;
                    src.advance()?;
                    if quotes == 3 {
                        break;
                    }
                }
                0 if src.is_eof() => {
                    self.stack.pop_to(start);
                    return Err(self.syntax_error(src, Status::BadSyntax, "unterminated string"));
                }
                b'\\' => {
                    for _ in 0..quotes {
                        self.stack.push_byte(delimiter)?;
                    }
                    quotes = 0;
                    let c = match self.read_string_escape(src) {
                        Ok(c) => c,
                        Err(e) => {
                            self.stack.pop_to(start);
                            return Err(e);
                        }
                    };
                    self.stack.push_char(c)?;
                }
                c => {
                    for _ in 0..quotes {
                        self.stack.push_byte(delimiter)?;
                    }
                    quotes = 0;
                    self.stack.push_byte(c)?;
                    src.advance()?;
                }
            }
        }
        self.take_text(src, start)
    }

    /// The optional `@lang` / `^^datatype` tail of a literal.
    pub(crate) fn finish_literal(
        &mut self,
        src: &mut ByteSource<'_>,
        text: String,
        ate_dot: &mut bool,
    ) -> Result<Node, Status> {
        match src.peek() {
            b'@' => {
                let tag = self.read_langtag(src)?;
                Ok(Node::plain_literal_unchecked(text, tag))
            }
            b'^' => {
                src.advance()?;
                self.eat(src, b'^', "after '^' of a datatype annotation")?;
                let datatype = if src.peek() == b'<' {
                    self.read_iriref(src)?
                } else {
                    self.read_pname_or_keyword(src, ate_dot)?.into_node(self, src)?
                };
                Node::typed_literal(text, datatype)
                    .map_err(|e| self.syntax_error(src, e, "invalid literal datatype"))
            }
            _ => Ok(Node::literal(text)),
        }
    }

    fn flush_dots(&mut self, pending: &mut usize) -> Result<(), Status> {
        for _ in 0..*pending {
            self.stack.push_byte(b'.')?;
        }
        *pending = 0;
        Ok(())
    }

    /// A word followed by an optional `:local` part: either a keyword
    /// (`a`, `true`, `prefix`, ...) or a prefixed name.
    pub(crate) fn read_pname_or_keyword(
        &mut self,
        src: &mut ByteSource<'_>,
        ate_dot: &mut bool,
    ) -> Result<WordOrPname, Status> {
        let word = self.read_bare_word(src, ate_dot)?;
        if *ate_dot || src.peek() != b':' {
            if word.is_empty() {
                return Err(self.syntax_error(
                    src,
                    Status::BadSyntax,
                    &format!("unexpected character '{}'", char::from(src.peek())),
                ));
            }
            return Ok(WordOrPname::Word(word));
        }
        src.advance()?;
        let local = self.read_pn_local(src, ate_dot)?;
        Ok(WordOrPname::Pname(Node::curie(format!("{word}:{local}"))))
    }
}

/// The result of reading a name-like token.
pub(crate) enum WordOrPname {
    /// A bare keyword such as `a`, `true` or `prefix`.
    Word(String),
    /// A prefixed name.
    Pname(Node),
}

impl WordOrPname {
    /// Requires the token to be a prefixed name.
    pub(crate) fn into_node(
        self,
        reader: &mut Reader<'_>,
        src: &ByteSource<'_>,
    ) -> Result<Node, Status> {
        match self {
            Self::Pname(node) => Ok(node),
            Self::Word(word) => Err(reader.syntax_error(
                src,
                Status::BadSyntax,
                &format!("expected a prefixed name, found '{word}'"),
            )),
        }
    }
}

fn label_looks_generated(label: &str) -> bool {
    label
        .strip_prefix('b')
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}
