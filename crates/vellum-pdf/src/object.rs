//! The PDF object model and serializer.
//!
//! [PDF 32000-1:2008 § 7.3 Objects](https://opensource.adobe.com/dam/cmiat/en/devnet/pdf/pdfs/PDF32000_2008.pdf)
//!
//! Dictionaries are `BTreeMap`s: key order is sorted and therefore stable,
//! which together with stable object numbering makes the serialized
//! document byte-identical across runs of the same input.

use std::collections::BTreeMap;
use std::io::Write;

/// An opaque handle to a registered indirect object.
///
/// Every materialized object (font dictionary, descriptor, stream, page,
/// catalog) holds exactly one reference; handles are assigned
/// sequentially by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjRef(pub u32);

/// A direct PDF object.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// The null object.
    Null,
    /// `true` / `false`.
    Boolean(bool),
    /// An integer number.
    Integer(i64),
    /// A real number (serialized with four-decimal precision).
    Real(f32),
    /// A name object, written `/Name`.
    Name(String),
    /// A literal string, written `(...)` with escaping.
    Literal(String),
    /// A hexadecimal string, written `<...>`.
    Hex(Vec<u8>),
    /// An array of objects.
    Array(Vec<Object>),
    /// A dictionary with sorted keys.
    Dictionary(BTreeMap<String, Object>),
    /// An indirect reference, written `N 0 R`.
    Reference(ObjRef),
}

impl From<ObjRef> for Object {
    fn from(r: ObjRef) -> Self {
        Object::Reference(r)
    }
}

impl From<i64> for Object {
    fn from(v: i64) -> Self {
        Object::Integer(v)
    }
}

impl From<f32> for Object {
    fn from(v: f32) -> Self {
        Object::Real(v)
    }
}

impl From<&str> for Object {
    fn from(v: &str) -> Self {
        Object::Name(v.to_string())
    }
}

impl Object {
    /// Shorthand for a dictionary from key/value pairs.
    #[must_use]
    pub fn dict<const N: usize>(pairs: [(&str, Object); N]) -> Object {
        Object::Dictionary(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    /// Serialize this object into `out`.
    pub fn write(&self, out: &mut Vec<u8>) {
        match self {
            Object::Null => out.extend_from_slice(b"null"),
            Object::Boolean(b) => {
                out.extend_from_slice(if *b { b"true" } else { b"false" });
            }
            Object::Integer(i) => {
                let _ = write!(out, "{i}");
            }
            Object::Real(r) => {
                let _ = write!(out, "{}", format_number(*r));
            }
            Object::Name(name) => {
                let _ = write!(out, "/{name}");
            }
            Object::Literal(s) => {
                out.push(b'(');
                out.extend_from_slice(escape_literal(s).as_bytes());
                out.push(b')');
            }
            Object::Hex(bytes) => {
                out.push(b'<');
                for byte in bytes {
                    let _ = write!(out, "{byte:02x}");
                }
                out.push(b'>');
            }
            Object::Array(items) => {
                out.push(b'[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(b' ');
                    }
                    item.write(out);
                }
                out.push(b']');
            }
            Object::Dictionary(map) => {
                out.extend_from_slice(b"<< ");
                for (key, value) in map {
                    let _ = write!(out, "/{key} ");
                    value.write(out);
                    out.push(b' ');
                }
                out.extend_from_slice(b">>");
            }
            Object::Reference(r) => {
                let _ = write!(out, "{} 0 R", r.0);
            }
        }
    }
}

/// Serialize a number deterministically: four decimal places, trailing
/// zeros trimmed, `-0` normalized to `0`.
#[must_use]
pub fn format_number(value: f32) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let mut s = format!("{value:.4}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

/// [§ 7.3.4.2 Literal strings]
///
/// Escape backslash, parentheses, and control characters for a literal
/// string body. Non-ASCII characters pass through as their UTF-8 bytes
/// (callers that need WinAnsi text encode before escaping).
#[must_use]
pub fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(1.2345678), "1.2346");
        assert_eq!(format_number(-0.00001), "0");
    }

    #[test]
    fn dictionaries_serialize_sorted() {
        let mut out = Vec::new();
        Object::dict([
            ("Zeta", Object::Integer(1)),
            ("Alpha", Object::Integer(2)),
        ])
        .write(&mut out);
        let s = String::from_utf8(out).unwrap();
        assert_eq!(s, "<< /Alpha 2 /Zeta 1 >>");
    }

    #[test]
    fn literal_strings_escape_delimiters() {
        let mut out = Vec::new();
        Object::Literal("a(b)\\c".to_string()).write(&mut out);
        assert_eq!(String::from_utf8(out).unwrap(), "(a\\(b\\)\\\\c)");
    }
}
