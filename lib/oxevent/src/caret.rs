use std::fmt;
use std::sync::Arc;

/// A position in a source document: an optional document name, a 1-based
/// `line` and a 1-based `col` in bytes.
///
/// The byte source updates its caret on every advance; `\n` starts a new
/// line and resets the column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Caret {
    /// Name of the document, usually a file path or URI.
    pub document: Option<Arc<str>>,
    pub line: u64,
    pub col: u64,
}

impl Caret {
    pub fn new(document: Option<Arc<str>>) -> Self {
        Self {
            document,
            line: 1,
            col: 1,
        }
    }
}

impl fmt::Display for Caret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(document) = &self.document {
            write!(f, "{document}:{}:{}", self.line, self.col)
        } else {
            write!(f, "{}:{}", self.line, self.col)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(
            Caret {
                document: Some("test.ttl".into()),
                line: 4,
                col: 12,
            }
            .to_string(),
            "test.ttl:4:12"
        );
        assert_eq!(Caret::new(None).to_string(), "1:1");
    }
}
