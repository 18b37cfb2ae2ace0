//! Parameter value encoding.
//!
//! Query parameters are spliced into the query text as literals, so encoding
//! must preserve the query grammar: strings are double-quoted with embedded
//! quotes escaped, numbers are rendered with an invariant `.` decimal
//! separator and no grouping, and nested lists/objects recurse. Encoding the
//! same value twice yields byte-identical text.

use std::fmt::Write;

/// A value that can be bound as a query parameter.
///
/// Closed sum over everything the query grammar can express as a literal.
/// Anything structured beyond these shapes is carried as [`ParamValue::Object`]
/// and rendered as an object literal with unquoted keys.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    Char(char),
    Str(String),
    Array(Vec<ParamValue>),
    /// Ordered key/value pairs; keys are emitted unquoted, null-valued
    /// entries are omitted.
    Object(Vec<(String, ParamValue)>),
}

impl ParamValue {
    /// Render this value as query-literal text.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        self.encode_into(&mut out);
        out
    }

    fn encode_into(&self, out: &mut String) {
        match self {
            ParamValue::Null => out.push_str("null"),
            ParamValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            ParamValue::Int(i) => {
                let _ = write!(out, "{i}");
            }
            ParamValue::Double(d) => {
                let _ = write!(out, "{d}");
            }
            ParamValue::Char(c) => {
                out.push('"');
                out.push(*c);
                out.push('"');
            }
            ParamValue::Str(s) => out.push_str(&quote_string(s)),
            ParamValue::Array(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    item.encode_into(out);
                }
                out.push(']');
            }
            ParamValue::Object(fields) => {
                out.push('{');
                let mut first = true;
                for (key, value) in fields {
                    if matches!(value, ParamValue::Null) {
                        continue;
                    }
                    if !first {
                        out.push_str(", ");
                    }
                    first = false;
                    out.push_str(key);
                    out.push_str(": ");
                    value.encode_into(out);
                }
                out.push('}');
            }
        }
    }
}

/// Double-quote a string, escaping embedded `"` as `\"`.
///
/// A string that already begins and ends with `"` is assumed to be encoded
/// and passes through unchanged, so re-encoding is idempotent.
pub fn quote_string(s: &str) -> String {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        return s.to_string();
    }

    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    quoted.push_str(&s.replace('"', "\\\""));
    quoted.push('"');
    quoted
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl From<i32> for ParamValue {
    fn from(i: i32) -> Self {
        ParamValue::Int(i64::from(i))
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        ParamValue::Int(i)
    }
}

impl From<f64> for ParamValue {
    fn from(d: f64) -> Self {
        ParamValue::Double(d)
    }
}

impl From<char> for ParamValue {
    fn from(c: char) -> Self {
        ParamValue::Char(c)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Str(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Str(s)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(items: Vec<T>) -> Self {
        ParamValue::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => ParamValue::Null,
        }
    }
}

impl From<serde_json::Value> for ParamValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ParamValue::Null,
            serde_json::Value::Bool(b) => ParamValue::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    ParamValue::Int(i)
                } else {
                    // u64 above i64::MAX also lands here; literal text keeps
                    // full precision only for the i64/f64 cases the protocol
                    // itself supports.
                    ParamValue::Double(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => ParamValue::Str(s),
            serde_json::Value::Array(items) => {
                ParamValue::Array(items.into_iter().map(Into::into).collect())
            }
            serde_json::Value::Object(map) => {
                ParamValue::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(ParamValue::Null, "null"; "null value")]
    #[test_case(ParamValue::Bool(true), "true"; "true value")]
    #[test_case(ParamValue::Bool(false), "false"; "false value")]
    #[test_case(ParamValue::Int(42), "42"; "integer")]
    #[test_case(ParamValue::Int(-9_007_199_254_740_993), "-9007199254740993"; "large negative integer")]
    #[test_case(ParamValue::Double(2.5), "2.5"; "double")]
    #[test_case(ParamValue::Double(-0.25), "-0.25"; "negative double")]
    #[test_case(ParamValue::Char('x'), "\"x\""; "char")]
    #[test_case(ParamValue::Str("hello".into()), "\"hello\""; "plain string")]
    #[test_case(ParamValue::Str("a\"b".into()), "\"a\\\"b\""; "embedded quote")]
    #[test_case(ParamValue::Str("\"quoted\"".into()), "\"quoted\""; "already quoted passthrough")]
    fn test_encode_scalars(value: ParamValue, expected: &str) {
        assert_eq!(value.encode(), expected);
    }

    #[test]
    fn test_encode_arrays() {
        let v: ParamValue = vec![1i64, 2, 3].into();
        assert_eq!(v.encode(), "[1, 2, 3]");

        let nested = ParamValue::Array(vec![
            ParamValue::Array(vec![ParamValue::Int(1), ParamValue::Int(2)]),
            ParamValue::Str("three".into()),
        ]);
        assert_eq!(nested.encode(), "[[1, 2], \"three\"]");
    }

    #[test]
    fn test_encode_object_skips_null_fields() {
        let v = ParamValue::Object(vec![
            ("name".into(), ParamValue::Str("alice".into())),
            ("nickname".into(), ParamValue::Null),
            ("age".into(), ParamValue::Int(30)),
        ]);
        assert_eq!(v.encode(), "{name: \"alice\", age: 30}");
    }

    #[test]
    fn test_encode_is_deterministic() {
        let v = ParamValue::from(serde_json::json!({
            "b": [1, 2.5, null],
            "a": {"inner": "x\"y"},
        }));
        assert_eq!(v.encode(), v.encode());
        // preserve_order keeps the declaration order of the object keys
        assert_eq!(v.encode(), "{b: [1, 2.5, null], a: {inner: \"x\\\"y\"}}");
    }

    #[test]
    fn test_quote_string_idempotent() {
        let once = quote_string("hello");
        assert_eq!(quote_string(&once), once);
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(ParamValue::from(None::<i64>), ParamValue::Null);
        assert_eq!(ParamValue::from(Some(3i64)), ParamValue::Int(3));
    }
}
