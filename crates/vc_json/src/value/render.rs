//! Compact JSON text rendering.
//!
//! All renderings are driven by [`Tokens`], so `to_string`, [`JsonValue::chars`]
//! and [`JsonValue::write_to`] produce the same bytes.

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::fmt::Write as _;
use core::slice;

use super::JsonValue;

// -----------------------------------------------------------------------------
// Tokens

enum Frame<'a> {
    Value(&'a JsonValue),
    Items(slice::Iter<'a, JsonValue>, bool),
    Entries(indexmap::map::Iter<'a, String, JsonValue>, bool),
}

/// A lazy sequence of text fragments rendering one [`JsonValue`].
///
/// Created by [`JsonValue::tokens`]. The traversal keeps an explicit stack,
/// so deeply nested values do not recurse.
pub struct Tokens<'a> {
    stack: Vec<Frame<'a>>,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Cow<'a, str>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.stack.pop()? {
                Frame::Value(value) => return Some(self.open(value)),
                Frame::Items(mut items, first) => match items.next() {
                    Some(item) => {
                        self.stack.push(Frame::Items(items, false));
                        self.stack.push(Frame::Value(item));
                        if !first {
                            return Some(Cow::Borrowed(","));
                        }
                    }
                    None => return Some(Cow::Borrowed("]")),
                },
                Frame::Entries(mut entries, first) => match entries.next() {
                    Some((key, value)) => {
                        self.stack.push(Frame::Entries(entries, false));
                        self.stack.push(Frame::Value(value));
                        let mut head = String::with_capacity(key.len() + 4);
                        if !first {
                            head.push(',');
                        }
                        escape_into(key, &mut head);
                        head.push(':');
                        return Some(Cow::Owned(head));
                    }
                    None => return Some(Cow::Borrowed("}")),
                },
            }
        }
    }
}

impl<'a> Tokens<'a> {
    fn open(&mut self, value: &'a JsonValue) -> Cow<'a, str> {
        match value {
            JsonValue::Null => Cow::Borrowed("null"),
            JsonValue::Bool(true) => Cow::Borrowed("true"),
            JsonValue::Bool(false) => Cow::Borrowed("false"),
            JsonValue::Int(v) => Cow::Owned(alloc::format!("{v}")),
            JsonValue::Long(v) => Cow::Owned(alloc::format!("{v}")),
            JsonValue::Decimal(d) => Cow::Borrowed(d.as_str()),
            JsonValue::String(s) => {
                let mut out = String::with_capacity(s.len() + 2);
                escape_into(s, &mut out);
                Cow::Owned(out)
            }
            JsonValue::Array(items) => {
                self.stack.push(Frame::Items(items.iter(), true));
                Cow::Borrowed("[")
            }
            JsonValue::Object(object) => {
                self.stack.push(Frame::Entries(object.iter(), true));
                Cow::Borrowed("{")
            }
        }
    }
}

/// Writes `text` as a quoted JSON string.
pub(crate) fn escape_into(text: &str, out: &mut String) {
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

// -----------------------------------------------------------------------------
// Chars

/// The rendered text of a [`JsonValue`], one `char` at a time.
///
/// Created by [`JsonValue::chars`].
pub struct Chars<'a> {
    tokens: Tokens<'a>,
    current: Cow<'a, str>,
    offset: usize,
}

impl Iterator for Chars<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        loop {
            if let Some(ch) = self.current[self.offset..].chars().next() {
                self.offset += ch.len_utf8();
                return Some(ch);
            }
            self.current = self.tokens.next()?;
            self.offset = 0;
        }
    }
}

// -----------------------------------------------------------------------------
// JsonValue

impl JsonValue {
    /// Lazily renders this value as compact JSON text fragments.
    #[inline]
    pub fn tokens(&self) -> Tokens<'_> {
        Tokens {
            stack: alloc::vec![Frame::Value(self)],
        }
    }

    /// Lazily renders this value as compact JSON text, one `char` at a time.
    #[inline]
    pub fn chars(&self) -> Chars<'_> {
        Chars {
            tokens: self.tokens(),
            current: Cow::Borrowed(""),
            offset: 0,
        }
    }

    /// Streams the compact rendering into `writer`, fragment by fragment.
    pub fn write_to<W: std::io::Write>(&self, mut writer: W) -> std::io::Result<()> {
        for token in self.tokens() {
            writer.write_all(token.as_bytes())?;
        }
        Ok(())
    }

    /// Renders compact JSON text.
    #[inline]
    pub fn to_json_string(&self) -> String {
        self.tokens().collect()
    }
}

impl fmt::Display for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.tokens().try_for_each(|token| f.write_str(&token))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::JsonObject;
    use alloc::string::ToString;
    use alloc::vec;

    fn sample() -> JsonValue {
        let mut inner = JsonObject::new();
        inner.insert("a\"b", JsonValue::from("line\nbreak\u{1}")).unwrap();
        inner.insert("empty", JsonValue::Array(vec![])).unwrap();
        let mut root = JsonObject::new();
        root.insert("n", JsonValue::Null).unwrap();
        root.insert("xs", JsonValue::Array(vec![JsonValue::Int(1), JsonValue::Long(-2), JsonValue::Bool(true)])).unwrap();
        root.insert("o", JsonValue::Object(inner)).unwrap();
        root.insert("d", JsonValue::Decimal("1.50".parse().unwrap())).unwrap();
        JsonValue::Object(root)
    }

    #[test]
    fn compact_rendering() {
        assert_eq!(
            sample().to_string(),
            r#"{"n":null,"xs":[1,-2,true],"o":{"a\"b":"line\nbreak\u0001","empty":[]},"d":1.50}"#
        );
        assert_eq!(JsonValue::Object(JsonObject::new()).to_string(), "{}");
    }

    #[test]
    fn streamed_output_is_identical() {
        let value = sample();
        let buffered = value.to_json_string();

        let mut streamed = Vec::new();
        value.write_to(&mut streamed).unwrap();
        assert_eq!(streamed, buffered.as_bytes());

        let chars: String = value.chars().collect();
        assert_eq!(chars, buffered);
    }
}
