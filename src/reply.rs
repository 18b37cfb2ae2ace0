//! Transport reply values.
//!
//! A reply is recursively either a terminal scalar (integer, string, error,
//! nil) or an ordered array of replies. The decoder depends only on this
//! shape; how the bytes arrived (RESP2, RESP3, a test fixture) is the
//! transport's business.

use bytes::Bytes;
use std::fmt;

use crate::error::{GraphError, Result};

/// One reply element as delivered by the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Integer reply, e.g. `:42`.
    Integer(i64),
    /// Simple string reply, e.g. `+OK`.
    Simple(String),
    /// Bulk string reply; may carry arbitrary bytes.
    Bulk(Bytes),
    /// Error reply, e.g. `-WRONGTYPE ...`.
    Error(String),
    /// Null bulk string or null array.
    Nil,
    /// Array reply of nested replies.
    Array(Vec<Reply>),
}

impl Reply {
    /// Bulk string reply from UTF-8 text.
    pub fn bulk(s: impl Into<String>) -> Self {
        Reply::Bulk(Bytes::from(s.into()))
    }

    /// Array reply.
    pub fn array(items: Vec<Reply>) -> Self {
        Reply::Array(items)
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Reply::Nil)
    }

    /// Borrow as an array, or `None` for any terminal reply.
    pub fn as_array(&self) -> Option<&[Reply]> {
        match self {
            Reply::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Reply::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Borrow as UTF-8 text. Covers simple and bulk string replies.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Reply::Simple(s) => Some(s),
            Reply::Bulk(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    /// Array contents, or a protocol violation naming `what`.
    pub(crate) fn expect_array(&self, what: &str) -> Result<&[Reply]> {
        self.as_array()
            .ok_or_else(|| GraphError::protocol(format!("expected array for {what}, got {self}")))
    }

    /// Integer contents, or a protocol violation naming `what`.
    pub(crate) fn expect_integer(&self, what: &str) -> Result<i64> {
        self.as_integer()
            .ok_or_else(|| GraphError::protocol(format!("expected integer for {what}, got {self}")))
    }

    /// Text contents, or a protocol violation naming `what`.
    pub(crate) fn expect_str(&self, what: &str) -> Result<&str> {
        self.as_str()
            .ok_or_else(|| GraphError::protocol(format!("expected string for {what}, got {self}")))
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Integer(i) => write!(f, "{i}"),
            Reply::Simple(s) => write!(f, "+{s}"),
            Reply::Bulk(b) => match std::str::from_utf8(b) {
                Ok(s) => write!(f, "{s:?}"),
                Err(_) => write!(f, "<{} bytes>", b.len()),
            },
            Reply::Error(e) => write!(f, "-{e}"),
            Reply::Nil => write!(f, "nil"),
            Reply::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<i64> for Reply {
    fn from(i: i64) -> Self {
        Reply::Integer(i)
    }
}

impl From<&str> for Reply {
    fn from(s: &str) -> Self {
        Reply::bulk(s)
    }
}

impl From<String> for Reply {
    fn from(s: String) -> Self {
        Reply::bulk(s)
    }
}

impl From<Vec<Reply>> for Reply {
    fn from(items: Vec<Reply>) -> Self {
        Reply::Array(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        assert_eq!(Reply::Integer(7).as_integer(), Some(7));
        assert_eq!(Reply::bulk("hi").as_str(), Some("hi"));
        assert_eq!(Reply::Simple("OK".into()).as_str(), Some("OK"));
        assert!(Reply::Nil.is_nil());
        assert!(Reply::Integer(1).as_array().is_none());

        let arr = Reply::array(vec![Reply::Integer(1), Reply::bulk("x")]);
        assert_eq!(arr.as_array().map(|a| a.len()), Some(2));
    }

    #[test]
    fn test_expect_reports_context() {
        let err = Reply::Integer(3).expect_array("header").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("header"), "unexpected message: {msg}");
    }

    #[test]
    fn test_display() {
        let arr = Reply::array(vec![Reply::Integer(1), Reply::bulk("a")]);
        assert_eq!(arr.to_string(), "[1, \"a\"]");
    }
}
