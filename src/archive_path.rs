//! Absolute entry path type with validation.
//!
//! Entry paths inside an ARC archive are absolute and canonical:
//! one or more `/`-prefixed segments, each drawn from a restricted set of
//! printable ASCII characters. The grammar is checked by a hand-written
//! scanner so there is no per-call construction cost.

use crate::{Error, Result};
use std::fmt;

/// Returns true if `c` may appear inside a path segment.
///
/// Printable ASCII, minus the path separators `/` and `\` and the reserved
/// characters `: * ? " < > |`.
#[inline]
pub(crate) fn is_segment_char(c: char) -> bool {
    matches!(c,
        ' ' | '!' | '#'..=')' | '+'..='.' | '0'..='9' | ';' | '=' | '@'
        | 'A'..='Z' | '[' | ']' | '^'..='{' | '}' | '~')
}

/// Checks a path against the entry path grammar.
pub(crate) fn validate(s: &str) -> Result<()> {
    if s.is_empty() {
        return Err(Error::invalid_path(s, "empty path"));
    }

    let Some(rest) = s.strip_prefix('/') else {
        return Err(Error::invalid_path(s, "path must start with '/'"));
    };

    for segment in rest.split('/') {
        if segment.is_empty() {
            return Err(Error::invalid_path(s, "empty segment"));
        }

        if let Some(c) = segment.chars().find(|&c| !is_segment_char(c)) {
            let reason = if c.is_control() {
                format!("control character {:#04x}", c as u32)
            } else {
                format!("reserved character {:?}", c)
            };
            return Err(Error::invalid_path(s, reason));
        }

        // Only ASCII survives the character check, so byte indexing is safe.
        let bytes = segment.as_bytes();
        if bytes[0] == b' ' {
            return Err(Error::invalid_path(s, "segment starts with whitespace"));
        }
        match bytes[bytes.len() - 1] {
            b' ' => return Err(Error::invalid_path(s, "segment ends with whitespace")),
            b'.' => return Err(Error::invalid_path(s, "segment ends with '.'")),
            _ => {}
        }
    }

    Ok(())
}

/// Returns true if `s` is a valid absolute entry path.
pub fn is_valid(s: &str) -> bool {
    validate(s).is_ok()
}

/// A validated absolute entry path.
///
/// # Examples
///
/// ```
/// use gdarc::EntryPath;
///
/// let path = EntryPath::new("/records/items/sword.dbr").unwrap();
/// assert_eq!(path.file_name(), "sword.dbr");
///
/// assert!(EntryPath::new("relative/file").is_err());
/// assert!(EntryPath::new("/bad?path").is_err());
/// assert!(EntryPath::new("/dir/..").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryPath(String);

impl EntryPath {
    /// Creates a new `EntryPath`, validating it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if the path:
    /// - Is empty or does not start with `/`
    /// - Contains an empty segment (`//` or a trailing `/`)
    /// - Contains a control character or one of `: * ? " < > | \`
    /// - Has a segment starting with a space, or ending with a space or `.`
    pub fn new(s: &str) -> Result<Self> {
        validate(s)?;
        Ok(Self(s.to_string()))
    }

    /// Returns the path as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the path and returns the inner string.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Returns the file name (last segment) of this path.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Returns the parent folder, or `None` for a top-level entry.
    pub fn parent(&self) -> Option<Self> {
        match self.0.rfind('/') {
            Some(0) | None => None,
            Some(idx) => Some(Self(self.0[..idx].to_string())),
        }
    }

    /// Returns an iterator over the path segments.
    ///
    /// ```
    /// use gdarc::EntryPath;
    ///
    /// let path = EntryPath::new("/a/b/c.txt").unwrap();
    /// let segments: Vec<_> = path.segments().collect();
    /// assert_eq!(segments, vec!["a", "b", "c.txt"]);
    /// ```
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0[1..].split('/')
    }

    /// Joins this path with a relative segment list.
    pub fn join(&self, other: &str) -> Result<Self> {
        Self::new(&format!("{}/{}", self.0, other))
    }

    /// Returns true if this path lives somewhere under `folder`.
    ///
    /// The comparison is segment-wise: `/foo/bar` is inside `/foo` but not
    /// inside `/fo`.
    pub fn is_inside(&self, folder: &str) -> bool {
        let folder = folder.trim_end_matches('/');
        self.0.len() > folder.len()
            && self.0.starts_with(folder)
            && self.0.as_bytes()[folder.len()] == b'/'
    }

    /// Moves this path from under `from` to under `to`.
    ///
    /// Returns `Ok(None)` if the path is not inside `from`.
    pub fn rebase(&self, from: &str, to: &str) -> Result<Option<Self>> {
        if !self.is_inside(from) {
            return Ok(None);
        }
        let from = from.trim_end_matches('/');
        let to = to.trim_end_matches('/');
        Self::new(&format!("{}{}", to, &self.0[from.len()..])).map(Some)
    }
}

impl AsRef<str> for EntryPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for EntryPath {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for EntryPath {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        validate(&s)?;
        Ok(Self(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(s: &str) -> String {
        match EntryPath::new(s).unwrap_err() {
            Error::InvalidPath { reason, .. } => reason,
            e => panic!("Expected InvalidPath, got: {:?}", e),
        }
    }

    #[test]
    fn test_valid_simple_file() {
        let path = EntryPath::new("/file.txt").unwrap();
        assert_eq!(path.as_str(), "/file.txt");
    }

    #[test]
    fn test_valid_nested_path() {
        let path = EntryPath::new("/a/b.txt").unwrap();
        assert_eq!(path.as_str(), "/a/b.txt");
    }

    #[test]
    fn test_valid_punctuation() {
        for p in [
            "/my file.txt",
            "/a-b_c/d+e,f",
            "/[x]/{y}/~z",
            "/100%/$cash&/it's(1)",
            "/a;b=c@d^e`f!g#h",
            "/.hidden",
        ] {
            assert!(is_valid(p), "{} should be valid", p);
        }
    }

    #[test]
    fn test_invalid_empty() {
        assert_eq!(reason(""), "empty path");
    }

    #[test]
    fn test_invalid_relative() {
        assert!(reason("file.txt").contains("start with '/'"));
    }

    #[test]
    fn test_invalid_root_only() {
        assert_eq!(reason("/"), "empty segment");
    }

    #[test]
    fn test_invalid_empty_segment() {
        assert_eq!(reason("/a//b"), "empty segment");
        assert_eq!(reason("/a/"), "empty segment");
    }

    #[test]
    fn test_invalid_reserved_characters() {
        for c in [':', '*', '?', '"', '<', '>', '|', '\\'] {
            let p = format!("/bad{}path", c);
            assert!(reason(&p).contains("reserved character"), "{}", p);
        }
    }

    #[test]
    fn test_invalid_control_character() {
        assert!(reason("/a\tb").contains("control character"));
        assert!(reason("/a\0b").contains("control character"));
    }

    #[test]
    fn test_invalid_non_ascii() {
        assert!(reason("/файл").contains("reserved character"));
    }

    #[test]
    fn test_invalid_whitespace_edges() {
        assert_eq!(reason("/ a"), "segment starts with whitespace");
        assert_eq!(reason("/a "), "segment ends with whitespace");
        assert_eq!(reason("/dir /file"), "segment ends with whitespace");
    }

    #[test]
    fn test_invalid_trailing_dot() {
        assert_eq!(reason("/file."), "segment ends with '.'");
        assert_eq!(reason("/a/./b"), "segment ends with '.'");
        assert_eq!(reason("/a/../b"), "segment ends with '.'");
    }

    #[test]
    fn test_file_name_and_parent() {
        let path = EntryPath::new("/dir/sub/file.txt").unwrap();
        assert_eq!(path.file_name(), "file.txt");
        assert_eq!(path.parent().unwrap().as_str(), "/dir/sub");
        assert!(EntryPath::new("/top").unwrap().parent().is_none());
    }

    #[test]
    fn test_join() {
        let path = EntryPath::new("/dir").unwrap();
        assert_eq!(path.join("file.txt").unwrap().as_str(), "/dir/file.txt");
        assert!(path.join("bad|name").is_err());
    }

    #[test]
    fn test_is_inside_component_boundary() {
        let path = EntryPath::new("/foo/bar/baz.txt").unwrap();
        assert!(path.is_inside("/foo"));
        assert!(path.is_inside("/foo/"));
        assert!(path.is_inside("/foo/bar"));
        assert!(!path.is_inside("/fo"));
        assert!(!path.is_inside("/foo/bar/baz.txt"));
    }

    #[test]
    fn test_rebase() {
        let path = EntryPath::new("/old/sub/file.txt").unwrap();
        let moved = path.rebase("/old", "/new/place").unwrap().unwrap();
        assert_eq!(moved.as_str(), "/new/place/sub/file.txt");

        assert!(path.rebase("/other", "/new").unwrap().is_none());
        assert!(path.rebase("/old", "/bad:dir").is_err());
    }

    #[test]
    fn test_try_from() {
        let path: EntryPath = "/x/y".try_into().unwrap();
        assert_eq!(path.to_string(), "/x/y");
        assert!(EntryPath::try_from(String::from("x")).is_err());
    }
}
