//! RFC 3986 URI reference handling: parsing into a borrowed view, relative
//! resolution, relativization and `file:` URI conversion.

use crate::Status;
use std::borrow::Cow;
use std::fmt;

/// A URI reference split into its components, each borrowing the input.
///
/// `scheme` excludes the `:` separator. `authority` includes the leading
/// `//` so that an empty-but-present authority (as in `file:///p`) is
/// distinguishable from an absent one. `query` and `fragment` include their
/// leading `?` and `#` for the same reason. `path_prefix` is only non-empty
/// on views produced by resolution: it holds the part of the merged path
/// borrowed from the base, and `path_prefix` followed by `path` forms the
/// composed path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UriRef<'a> {
    pub scheme: &'a str,
    pub authority: &'a str,
    pub path_prefix: &'a str,
    pub path: &'a str,
    pub query: &'a str,
    pub fragment: &'a str,
}

impl<'a> UriRef<'a> {
    /// Splits `value` into URI components.
    ///
    /// The split is lenient: any string parses, and serializing the view
    /// yields `value` back unchanged.
    pub fn parse(value: &'a str) -> Self {
        let mut rest = value;
        let mut scheme = "";
        if let Some(end) = scheme_end(rest) {
            scheme = &rest[..end];
            rest = &rest[end + 1..];
        }
        let mut authority = "";
        if rest.starts_with("//") {
            let end = rest[2..]
                .find(['/', '?', '#'])
                .map_or(rest.len(), |i| i + 2);
            authority = &rest[..end];
            rest = &rest[end..];
        }
        let path_end = rest.find(['?', '#']).unwrap_or(rest.len());
        let path = &rest[..path_end];
        rest = &rest[path_end..];
        let query_end = rest.find('#').unwrap_or(rest.len());
        Self {
            scheme,
            authority,
            path_prefix: "",
            path,
            query: &rest[..query_end],
            fragment: &rest[query_end..],
        }
    }

    /// True if the reference carries a scheme.
    pub fn is_absolute(&self) -> bool {
        !self.scheme.is_empty()
    }

    /// True if every component is empty (the null URI).
    pub fn is_empty(&self) -> bool {
        self.scheme.is_empty()
            && self.authority.is_empty()
            && self.path_prefix.is_empty()
            && self.path.is_empty()
            && self.query.is_empty()
            && self.fragment.is_empty()
    }

    /// The composed path (`path_prefix` followed by `path`).
    pub fn composed_path(&self) -> Cow<'a, str> {
        if self.path_prefix.is_empty() {
            Cow::Borrowed(self.path)
        } else {
            Cow::Owned(format!("{}{}", self.path_prefix, self.path))
        }
    }

    /// Serializes the view verbatim, without normalization.
    pub fn write(&self, out: &mut String) {
        if !self.scheme.is_empty() {
            out.push_str(self.scheme);
            out.push(':');
        }
        out.push_str(self.authority);
        out.push_str(self.path_prefix);
        out.push_str(self.path);
        out.push_str(self.query);
        out.push_str(self.fragment);
    }

    /// Resolves this reference against `base` (RFC 3986 §5.2) and appends the
    /// absolute result to `out`, removing dot segments on the way.
    ///
    /// A reference that already has a scheme is written back as-is. `base`
    /// must be absolute and should be a parsed view (its `path_prefix`
    /// empty), or `BadArg` is returned.
    pub fn resolve_into(&self, base: &UriRef<'_>, out: &mut String) -> Result<(), Status> {
        if !self.scheme.is_empty() {
            self.write(out);
            return Ok(());
        }
        if !base.is_absolute() || !base.path_prefix.is_empty() {
            return Err(Status::BadArg);
        }

        out.push_str(base.scheme);
        out.push(':');
        if !self.authority.is_empty() {
            out.push_str(self.authority);
            let path_start = out.len();
            append_and_remove_dot_segments(self.path, out, path_start);
            out.push_str(self.query);
        } else {
            out.push_str(base.authority);
            if self.path.is_empty() {
                out.push_str(base.path);
                out.push_str(if self.query.is_empty() {
                    base.query
                } else {
                    self.query
                });
            } else {
                let path_start = out.len();
                if self.path.starts_with('/') {
                    append_and_remove_dot_segments(self.path, out, path_start);
                } else if !base.authority.is_empty() && base.path.is_empty() {
                    // Merging onto an authority with an empty path roots the
                    // reference path
                    append_and_remove_dot_segments_with_extra_slash(self.path, out, path_start);
                } else {
                    let directory = match base.path.rfind('/') {
                        Some(i) => &base.path[..=i],
                        None => "",
                    };
                    append_and_remove_dot_segments(directory, out, path_start);
                    if out.ends_with('/') {
                        out.pop();
                        append_and_remove_dot_segments_with_extra_slash(self.path, out, path_start);
                    } else {
                        append_and_remove_dot_segments(self.path, out, path_start);
                    }
                }
                out.push_str(self.query);
            }
        }
        out.push_str(self.fragment);
        Ok(())
    }

    /// Tries to append a reference relative to `base` that resolves back to
    /// this URI, and returns whether it did.
    ///
    /// Without a `root`, only suffixes of the base directory are produced.
    /// With a `root` (which must bound both this URI and the base), `../`
    /// segments may climb up to the root but not above it. When the URI
    /// cannot be expressed under these rules nothing is written and `false`
    /// is returned, so the caller can fall back to the absolute form.
    pub fn relativize_into(
        &self,
        base: &UriRef<'_>,
        root: Option<&UriRef<'_>>,
        out: &mut String,
    ) -> bool {
        if self.scheme != base.scheme || self.authority != base.authority {
            return false;
        }
        let path_buf = self.composed_path();
        let path = path_buf.as_ref();
        let base_path_buf = base.composed_path();
        let base_path = base_path_buf.as_ref();

        // Longest common prefix ending on a directory boundary
        let mut common = 0;
        for (a, b) in path.bytes().zip(base_path.bytes()) {
            if a != b {
                break;
            }
            common += 1;
        }
        let common = path[..common].rfind('/').map_or(0, |i| i + 1);

        let up = base_path[common..].matches('/').count();
        if up > 0 {
            // Climbing is only allowed inside an explicit root
            let Some(root) = root else {
                return false;
            };
            if root.scheme != self.scheme || root.authority != self.authority {
                return false;
            }
            let root_path_buf = root.composed_path();
            let root_path = root_path_buf.as_ref();
            if !path.starts_with(root_path)
                || !base_path.starts_with(root_path)
                || common < root_path.len()
            {
                return false;
            }
        }

        let rest = &path[common..];
        if up == 0 && rest.is_empty() && self.query.is_empty() && !base.query.is_empty() {
            // "" or "#frag" would pick up the base query
            return false;
        }
        for _ in 0..up {
            out.push_str("../");
        }
        if up == 0 {
            // A leading segment with a colon would parse as a scheme
            let first_segment = rest.split('/').next().unwrap_or("");
            if first_segment.contains(':') {
                out.push_str("./");
            }
        }
        out.push_str(rest);
        out.push_str(self.query);
        out.push_str(self.fragment);
        true
    }
}

impl fmt::Display for UriRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write(&mut out);
        f.write_str(&out)
    }
}

fn scheme_end(value: &str) -> Option<usize> {
    // scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ), ended by ':'
    // before any '/', '?' or '#'
    let mut bytes = value.bytes().enumerate();
    match bytes.next() {
        Some((_, b)) if b.is_ascii_alphabetic() => {}
        _ => return None,
    }
    for (i, b) in bytes {
        match b {
            b':' => return Some(i),
            b if b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.') => {}
            _ => return None,
        }
    }
    None
}

// RFC 3986 §5.2.4 Remove Dot Segments
fn append_and_remove_dot_segments(mut input: &str, output: &mut String, path_start: usize) {
    while !input.is_empty() {
        if input.starts_with("../") {
            input = &input[3..];
        } else if input.starts_with("./") || input.starts_with("/./") {
            input = &input[2..];
        } else if input == "/." {
            input = "/";
        } else if input.starts_with("/../") {
            pop_last_segment(output, path_start);
            input = &input[3..];
        } else if input == "/.." {
            pop_last_segment(output, path_start);
            input = "/";
        } else if input == "." || input == ".." {
            input = "";
        } else {
            if let Some(rest) = input.strip_prefix('/') {
                output.push('/');
                input = rest;
            }
            if let Some(i) = input.find('/') {
                output.push_str(&input[..i]);
                input = &input[i..];
            } else {
                output.push_str(input);
                input = "";
            }
        }
    }
}

fn append_and_remove_dot_segments_with_extra_slash(
    input: &str,
    output: &mut String,
    path_start: usize,
) {
    if input.is_empty() {
        output.push('/');
    } else if let Some(rest) = input.strip_prefix("./") {
        append_and_remove_dot_segments_with_extra_slash(rest, output, path_start);
    } else if input == "." {
        output.push('/');
    } else if let Some(rest) = input.strip_prefix("../") {
        pop_last_segment(output, path_start);
        append_and_remove_dot_segments_with_extra_slash(rest, output, path_start);
    } else if input == ".." {
        pop_last_segment(output, path_start);
        output.push('/');
    } else {
        output.push('/');
        if let Some(i) = input.find('/') {
            output.push_str(&input[..i]);
            append_and_remove_dot_segments(&input[i..], output, path_start);
        } else {
            output.push_str(input);
        }
    }
}

fn pop_last_segment(buffer: &mut String, path_start: usize) {
    if let Some(i) = buffer[path_start..].rfind('/') {
        buffer.truncate(path_start + i);
    }
}

const UNRESERVED: &[u8] = b"-._~";

/// Builds a `file:` URI from a filesystem path and an optional hostname,
/// percent-escaping characters outside the unreserved set.
///
/// A relative path produces a relative reference without the `file://`
/// prefix.
pub fn file_uri(path: &str, hostname: Option<&str>) -> String {
    let mut out = String::with_capacity(path.len() + 8);
    if path.starts_with('/') {
        out.push_str("file://");
        if let Some(hostname) = hostname {
            out.push_str(hostname);
        }
    }
    for b in path.bytes() {
        if b.is_ascii_alphanumeric() || UNRESERVED.contains(&b) || b == b'/' {
            out.push(char::from(b));
        } else {
            out.push('%');
            out.push(char::from_digit(u32::from(b >> 4), 16).unwrap_or('0').to_ascii_uppercase());
            out.push(char::from_digit(u32::from(b & 0xF), 16).unwrap_or('0').to_ascii_uppercase());
        }
    }
    out
}

/// Extracts the filesystem path of a `file:` URI, percent-decoding it, and
/// optionally the hostname it carries.
///
/// Returns `None` if `uri` is not a `file:` URI or decodes to invalid UTF-8.
pub fn file_uri_path(uri: &str) -> Option<(String, Option<&str>)> {
    let view = UriRef::parse(uri);
    if view.scheme != "file" {
        return None;
    }
    let hostname = view
        .authority
        .strip_prefix("//")
        .filter(|host| !host.is_empty());
    let mut bytes = Vec::with_capacity(view.path.len());
    let mut input = view.path.bytes();
    while let Some(b) = input.next() {
        if b == b'%' {
            let high = char::from(input.next()?).to_digit(16)?;
            let low = char::from(input.next()?).to_digit(16)?;
            bytes.push(u8::try_from(high * 16 + low).ok()?);
        } else {
            bytes.push(b);
        }
    }
    Some((String::from_utf8(bytes).ok()?, hostname))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(reference: &str, base: &str) -> String {
        let mut out = String::new();
        UriRef::parse(reference)
            .resolve_into(&UriRef::parse(base), &mut out)
            .unwrap();
        out
    }

    #[test]
    fn parse_round_trips() {
        for uri in [
            "http://example.com/foo/bar?q=1&r=2#toto",
            "file:///usr/share",
            "mailto:John.Doe@example.com",
            "//g",
            "?y",
            "#s",
            "",
            "../..",
            "urn:oasis:names:tc",
        ] {
            assert_eq!(UriRef::parse(uri).to_string(), uri);
        }
    }

    #[test]
    fn parse_components() {
        let view = UriRef::parse("http://example.com/a/b?q#f");
        assert_eq!(view.scheme, "http");
        assert_eq!(view.authority, "//example.com");
        assert_eq!(view.path, "/a/b");
        assert_eq!(view.query, "?q");
        assert_eq!(view.fragment, "#f");
        assert!(view.is_absolute());

        let view = UriRef::parse("a/b:c");
        assert!(view.scheme.is_empty(), "colon in a later segment only");
        assert!(UriRef::parse("").is_empty());
    }

    // RFC 3986 §5.4 reference resolution examples
    #[test]
    fn rfc3986_resolution() {
        let base = "http://a/b/c/d;p?q";
        for (input, output) in [
            ("g:h", "g:h"),
            ("g", "http://a/b/c/g"),
            ("./g", "http://a/b/c/g"),
            ("g/", "http://a/b/c/g/"),
            ("/g", "http://a/g"),
            ("//g", "http://g"),
            ("?y", "http://a/b/c/d;p?y"),
            ("g?y", "http://a/b/c/g?y"),
            ("#s", "http://a/b/c/d;p?q#s"),
            ("g#s", "http://a/b/c/g#s"),
            ("g?y#s", "http://a/b/c/g?y#s"),
            (";x", "http://a/b/c/;x"),
            ("g;x", "http://a/b/c/g;x"),
            ("g;x?y#s", "http://a/b/c/g;x?y#s"),
            ("", "http://a/b/c/d;p?q"),
            (".", "http://a/b/c/"),
            ("./", "http://a/b/c/"),
            ("..", "http://a/b/"),
            ("../", "http://a/b/"),
            ("../g", "http://a/b/g"),
            ("../..", "http://a/"),
            ("../../", "http://a/"),
            ("../../g", "http://a/g"),
            ("../../../g", "http://a/g"),
            ("../../../../g", "http://a/g"),
            ("/./g", "http://a/g"),
            ("/../g", "http://a/g"),
            ("g.", "http://a/b/c/g."),
            (".g", "http://a/b/c/.g"),
            ("g..", "http://a/b/c/g.."),
            ("..g", "http://a/b/c/..g"),
            ("./../g", "http://a/b/g"),
            ("./g/.", "http://a/b/c/g/"),
            ("g/./h", "http://a/b/c/g/h"),
            ("g/../h", "http://a/b/c/h"),
            ("g;x=1/./y", "http://a/b/c/g;x=1/y"),
            ("g;x=1/../y", "http://a/b/c/y"),
            ("g?y/./x", "http://a/b/c/g?y/./x"),
            ("g?y/../x", "http://a/b/c/g?y/../x"),
            ("g#s/./x", "http://a/b/c/g#s/./x"),
            ("g#s/../x", "http://a/b/c/g#s/../x"),
            ("http:g", "http:g"),
            ("./g:h", "http://a/b/c/g:h"),
        ] {
            assert_eq!(resolve(input, base), output, "resolving {input}");
        }
    }

    #[test]
    fn resolution_identity_and_idempotence() {
        let base = "http://a/b/c/d;p?q";
        assert_eq!(resolve("", base), base);
        let once = resolve("../g", base);
        assert_eq!(resolve(&once, base), once);
    }

    #[test]
    fn resolution_on_authority_only_base() {
        assert_eq!(resolve("g", "http://example.com"), "http://example.com/g");
        assert_eq!(resolve("..", "http://example.com"), "http://example.com/");
    }

    #[test]
    fn resolution_needs_absolute_base() {
        let mut out = String::new();
        assert_eq!(
            UriRef::parse("g").resolve_into(&UriRef::parse("/relative"), &mut out),
            Err(Status::BadArg)
        );
    }

    fn relativize(uri: &str, base: &str, root: Option<&str>) -> Option<String> {
        let mut out = String::new();
        let root = root.map(UriRef::parse);
        UriRef::parse(uri)
            .relativize_into(&UriRef::parse(base), root.as_ref(), &mut out)
            .then_some(out)
    }

    #[test]
    fn relativization_within_base() {
        let base = "http://a.example/b/";
        assert_eq!(
            relativize("http://a.example/b/c#d", base, None).as_deref(),
            Some("c#d")
        );
        assert_eq!(relativize("http://other.example/x", base, None), None);
        assert_eq!(relativize("http://a.example/x", base, None), None);
        assert_eq!(
            relativize("http://a.example/b/d/e", base, None).as_deref(),
            Some("d/e")
        );
    }

    #[test]
    fn relativization_with_root() {
        let base = "http://a.example/b/c/";
        let root = Some("http://a.example/b/");
        assert_eq!(
            relativize("http://a.example/b/x", base, root).as_deref(),
            Some("../x")
        );
        assert_eq!(relativize("http://a.example/y", base, root), None);
        assert_eq!(
            relativize("http://a.example/b/c/z", base, root).as_deref(),
            Some("z")
        );
    }

    #[test]
    fn relativization_round_trips() {
        let base = "http://a.example/b/c/";
        let root = Some("http://a.example/");
        for uri in [
            "http://a.example/b/c/d",
            "http://a.example/b/x?q=1",
            "http://a.example/z#f",
            "http://a.example/b/c/",
        ] {
            let Some(rel) = relativize(uri, base, root) else {
                panic!("{uri} should relativize under root")
            };
            assert_eq!(resolve(&rel, base), uri, "{uri} via {rel}");
        }
    }

    #[test]
    fn relativization_avoids_scheme_confusion() {
        assert_eq!(
            relativize("http://a.example/b/g:h", "http://a.example/b/", None).as_deref(),
            Some("./g:h")
        );
    }

    #[test]
    fn file_uris() {
        assert_eq!(
            file_uri("/tmp/a file.ttl", None),
            "file:///tmp/a%20file.ttl"
        );
        assert_eq!(
            file_uri("/x", Some("ahost")),
            "file://ahost/x"
        );
        assert_eq!(file_uri("rel/path", None), "rel/path");
        assert_eq!(
            file_uri_path("file:///tmp/a%20file.ttl"),
            Some(("/tmp/a file.ttl".into(), None))
        );
        assert_eq!(
            file_uri_path("file://ahost/x"),
            Some(("/x".into(), Some("ahost")))
        );
        assert_eq!(file_uri_path("http://example.com/"), None);
        assert_eq!(file_uri_path("file:///bad%2"), None);
    }
}
