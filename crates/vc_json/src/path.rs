//! Structural locations inside a JSON value.
//!
//! [`JsonPath`] is the owned, rendered form carried by errors (`/0/field2`).
//! [`PathContext`] is the traversal-time stack: every nested decode or encode
//! call runs inside [`PathContext::scoped`], which appends one token for the
//! duration of the call.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use thiserror::Error;

// -----------------------------------------------------------------------------
// PathToken

/// One step of a path: an object key or an array index.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum PathToken {
    Key(Box<str>),
    Index(usize),
}

impl From<&str> for PathToken {
    #[inline]
    fn from(key: &str) -> Self {
        Self::Key(key.into())
    }
}

impl From<usize> for PathToken {
    #[inline]
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl fmt::Display for PathToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Key(key) if !key.contains(['~', '/']) => f.write_str(key),
            Self::Key(key) => f.write_str(&key.replace('~', "~0").replace('/', "~1")),
        }
    }
}

// -----------------------------------------------------------------------------
// JsonPath

/// The text is not a JSON pointer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PointerError {
    #[error("a JSON pointer must be empty or start with `/`, got `{0}`")]
    MissingLeadingSlash(Box<str>),
    #[error("invalid escape in JSON pointer `{0}`")]
    InvalidEscape(Box<str>),
}

/// A JSON-Pointer-like path, rendered slash-delimited (`/items/0/name`).
///
/// The root path renders as `/`. Keys are escaped per RFC 6901.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct JsonPath {
    tokens: Vec<PathToken>,
}

impl JsonPath {
    #[inline]
    pub const fn root() -> Self {
        Self { tokens: Vec::new() }
    }

    #[inline]
    pub fn from_tokens(tokens: Vec<PathToken>) -> Self {
        Self { tokens }
    }

    /// Parses an RFC 6901 pointer; every segment becomes a key token.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_json::path::JsonPath;
    ///
    /// let path = JsonPath::parse("/meta/a~1b").unwrap();
    /// assert_eq!(path.len(), 2);
    /// assert_eq!(path.to_string(), "/meta/a~1b");
    /// ```
    pub fn parse(pointer: &str) -> Result<Self, PointerError> {
        if pointer.is_empty() {
            return Ok(Self::root());
        }
        let Some(rest) = pointer.strip_prefix('/') else {
            return Err(PointerError::MissingLeadingSlash(pointer.into()));
        };
        let tokens = rest
            .split('/')
            .map(|segment| {
                unescape(segment)
                    .map(|key| PathToken::Key(key.into_boxed_str()))
                    .ok_or_else(|| PointerError::InvalidEscape(pointer.into()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { tokens })
    }

    #[inline]
    pub fn tokens(&self) -> &[PathToken] {
        &self.tokens
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    /// A new path with `token` appended.
    pub fn child(&self, token: impl Into<PathToken>) -> Self {
        let mut tokens = self.tokens.clone();
        tokens.push(token.into());
        Self { tokens }
    }
}

fn unescape(segment: &str) -> Option<String> {
    if !segment.contains('~') {
        return Some(segment.into());
    }
    let mut out = String::with_capacity(segment.len());
    let mut chars = segment.chars();
    while let Some(ch) = chars.next() {
        if ch == '~' {
            match chars.next()? {
                '0' => out.push('~'),
                '1' => out.push('/'),
                _ => return None,
            }
        } else {
            out.push(ch);
        }
    }
    Some(out)
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tokens.is_empty() {
            return f.write_str("/");
        }
        for token in &self.tokens {
            write!(f, "/{token}")?;
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// PathContext

/// The path of the value currently being decoded or encoded.
///
/// Owned by one traversal and never shared between calls.
#[derive(Default, Debug)]
pub struct PathContext {
    tokens: Vec<PathToken>,
}

impl PathContext {
    #[inline]
    pub const fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    /// Runs `f` with `token` appended; the token is removed afterwards.
    #[inline]
    pub fn scoped<R>(&mut self, token: impl Into<PathToken>, f: impl FnOnce(&mut Self) -> R) -> R {
        self.push(token);
        let result = f(self);
        self.pop();
        result
    }

    #[inline]
    pub(crate) fn push(&mut self, token: impl Into<PathToken>) {
        self.tokens.push(token.into());
    }

    #[inline]
    pub(crate) fn pop(&mut self) {
        self.tokens.pop();
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.tokens.len()
    }

    /// The current location as an owned [`JsonPath`].
    #[inline]
    pub fn snapshot(&self) -> JsonPath {
        JsonPath::from_tokens(self.tokens.clone())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn render_escapes_keys() {
        let path = JsonPath::root().child(0_usize).child("field2").child("a/b~c");
        assert_eq!(path.to_string(), "/0/field2/a~1b~0c");
        assert_eq!(JsonPath::root().to_string(), "/");
    }

    #[test]
    fn parse_pointer() {
        let path = JsonPath::parse("/a~1b/~0/").unwrap();
        assert_eq!(
            path.tokens(),
            [
                PathToken::from("a/b"),
                PathToken::from("~"),
                PathToken::from(""),
            ]
        );
        assert!(JsonPath::parse("").unwrap().is_root());
        assert!(matches!(
            JsonPath::parse("meta"),
            Err(PointerError::MissingLeadingSlash(_))
        ));
        assert!(matches!(
            JsonPath::parse("/a~2"),
            Err(PointerError::InvalidEscape(_))
        ));
    }

    #[test]
    fn scoped_tokens_are_popped() {
        let mut cx = PathContext::new();
        let inner = cx.scoped(3_usize, |cx| cx.scoped("name", |cx| cx.snapshot()));
        assert_eq!(inner.to_string(), "/3/name");
        assert_eq!(cx.depth(), 0);
    }
}
