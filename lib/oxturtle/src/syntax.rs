use std::fmt;
use std::str::FromStr;

/// The syntaxes of the Turtle family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Syntax {
    /// [N-Triples](https://www.w3.org/TR/n-triples/): one triple per line.
    NTriples,
    /// [N-Quads](https://www.w3.org/TR/n-quads/): N-Triples plus a graph label.
    NQuads,
    /// [Turtle](https://www.w3.org/TR/turtle/): terse triples.
    Turtle,
    /// [TriG](https://www.w3.org/TR/trig/): Turtle plus graph blocks.
    TriG,
}

impl Syntax {
    /// The canonical name of the syntax.
    pub fn name(self) -> &'static str {
        match self {
            Self::NTriples => "NTriples",
            Self::NQuads => "NQuads",
            Self::Turtle => "Turtle",
            Self::TriG => "TriG",
        }
    }

    /// The canonical media type, like `text/turtle`.
    pub fn media_type(self) -> &'static str {
        match self {
            Self::NTriples => "application/n-triples",
            Self::NQuads => "application/n-quads",
            Self::Turtle => "text/turtle",
            Self::TriG => "application/trig",
        }
    }

    /// The usual file extension, without the leading dot.
    pub fn file_extension(self) -> &'static str {
        match self {
            Self::NTriples => "nt",
            Self::NQuads => "nq",
            Self::Turtle => "ttl",
            Self::TriG => "trig",
        }
    }

    /// Looks up a syntax from a media type, ignoring parameters.
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        match media_type.split(';').next()?.trim() {
            "application/n-triples" | "text/plain" => Some(Self::NTriples),
            "application/n-quads" => Some(Self::NQuads),
            "text/turtle" | "application/turtle" | "application/x-turtle" => Some(Self::Turtle),
            "application/trig" => Some(Self::TriG),
            _ => None,
        }
    }

    /// Looks up a syntax from a file extension, without the leading dot.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "nt" => Some(Self::NTriples),
            "nq" => Some(Self::NQuads),
            "ttl" | "turtle" => Some(Self::Turtle),
            "trig" => Some(Self::TriG),
            _ => None,
        }
    }

    /// True for the syntaxes carrying graph labels.
    pub fn supports_graphs(self) -> bool {
        matches!(self, Self::NQuads | Self::TriG)
    }

    /// True for the syntaxes with `@prefix`/`@base` directives and
    /// abbreviated forms.
    pub fn supports_directives(self) -> bool {
        matches!(self, Self::Turtle | Self::TriG)
    }

    /// True for the line-oriented syntaxes.
    pub fn is_line_based(self) -> bool {
        matches!(self, Self::NTriples | Self::NQuads)
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Syntax {
    type Err = UnknownSyntaxError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "ntriples" | "n-triples" => Ok(Self::NTriples),
            "nquads" | "n-quads" => Ok(Self::NQuads),
            "turtle" => Ok(Self::Turtle),
            "trig" => Ok(Self::TriG),
            _ => Err(UnknownSyntaxError {
                name: name.to_owned(),
            }),
        }
    }
}

/// A syntax name was not recognized.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{name} is not a known RDF syntax")]
pub struct UnknownSyntaxError {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup() {
        assert_eq!(Syntax::from_extension("ttl"), Some(Syntax::Turtle));
        assert_eq!(
            Syntax::from_media_type("application/trig; charset=utf-8"),
            Some(Syntax::TriG)
        );
        assert_eq!(Syntax::from_media_type("text/html"), None);
        assert_eq!("n-quads".parse::<Syntax>().ok(), Some(Syntax::NQuads));
        assert!("rdfxml".parse::<Syntax>().is_err());
    }

    #[test]
    fn capabilities() {
        assert!(Syntax::TriG.supports_graphs());
        assert!(!Syntax::Turtle.supports_graphs());
        assert!(Syntax::Turtle.supports_directives());
        assert!(Syntax::NTriples.is_line_based());
    }
}
