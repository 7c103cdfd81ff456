//! Character classes of the [Turtle 1.1 grammar](https://www.w3.org/TR/turtle/#sec-grammar)
//! shared by readers, writers and environments.

// [157s]  PN_CHARS_BASE  ::=  [A-Z] | [a-z] | [#x00C0-#x00D6] | [#x00D8-#x00F6] | [#x00F8-#x02FF] | [#x0370-#x037D] | [#x037F-#x1FFF] | [#x200C-#x200D] | [#x2070-#x218F] | [#x2C00-#x2FEF] | [#x3001-#xD7FF] | [#xF900-#xFDCF] | [#xFDF0-#xFFFD] | [#x10000-#xEFFFF]
pub fn is_pn_chars_base(c: char) -> bool {
    matches!(c,
    'A'..='Z'
    | 'a'..='z'
    | '\u{00C0}'..='\u{00D6}'
    | '\u{00D8}'..='\u{00F6}'
    | '\u{00F8}'..='\u{02FF}'
    | '\u{0370}'..='\u{037D}'
    | '\u{037F}'..='\u{1FFF}'
    | '\u{200C}'..='\u{200D}'
    | '\u{2070}'..='\u{218F}'
    | '\u{2C00}'..='\u{2FEF}'
    | '\u{3001}'..='\u{D7FF}'
    | '\u{F900}'..='\u{FDCF}'
    | '\u{FDF0}'..='\u{FFFD}'
    | '\u{10000}'..='\u{EFFFF}')
}

// [158s]  PN_CHARS_U  ::=  PN_CHARS_BASE | '_'
pub fn is_pn_chars_u(c: char) -> bool {
    is_pn_chars_base(c) || c == '_'
}

// [160s]  PN_CHARS  ::=  PN_CHARS_U | '-' | [0-9] | #x00B7 | [#x0300-#x036F] | [#x203F-#x2040]
pub fn is_pn_chars(c: char) -> bool {
    is_pn_chars_u(c)
        || matches!(c,
    '-' | '0'..='9' | '\u{00B7}' | '\u{0300}'..='\u{036F}' | '\u{203F}'..='\u{2040}')
}

/// Characters a `PN_LOCAL` may carry behind a `\` escape.
pub fn can_be_escaped_in_local_name(c: char) -> bool {
    matches!(
        c,
        '_' | '~'
            | '.'
            | '-'
            | '!'
            | '$'
            | '&'
            | '\''
            | '('
            | ')'
            | '*'
            | '+'
            | ','
            | ';'
            | '='
            | '/'
            | '?'
            | '#'
            | '@'
            | '%'
    )
}

/// Escapes a string so it forms a valid `PN_LOCAL`, or returns `None` when
/// some character cannot appear in a local name even behind an escape.
///
/// An empty input is a valid (empty) local name.
// [168s]  PN_LOCAL  ::=  (PN_CHARS_U | ':' | [0-9] | PLX) ((PN_CHARS | '.' | ':' | PLX)* (PN_CHARS | ':' | PLX))?
pub fn escape_local_name(value: &str) -> Option<String> {
    let mut output = String::with_capacity(value.len());
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return Some(output);
    };
    if is_pn_chars_u(first) || first == ':' || first.is_ascii_digit() {
        output.push(first);
    } else if can_be_escaped_in_local_name(first) {
        output.push('\\');
        output.push(first);
    } else {
        return None;
    }

    while let Some(c) = chars.next() {
        if is_pn_chars(c) || c == ':' || (c == '.' && !chars.as_str().is_empty()) {
            output.push(c);
        } else if can_be_escaped_in_local_name(c) {
            output.push('\\');
            output.push(c);
        } else {
            return None;
        }
    }

    Some(output)
}

/// Checks the `LANGTAG` production: `[a-zA-Z]+ ('-' [a-zA-Z0-9]+)*`.
pub fn is_lang_tag(value: &str) -> bool {
    let mut blocks = value.split('-');
    let Some(first) = blocks.next() else {
        return false;
    };
    if first.is_empty() || !first.bytes().all(|b| b.is_ascii_alphabetic()) {
        return false;
    }
    blocks.all(|block| !block.is_empty() && block.bytes().all(|b| b.is_ascii_alphanumeric()))
}
