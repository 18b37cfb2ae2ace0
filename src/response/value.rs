//! Decoded result values.

use std::fmt;

use crate::reply::Reply;
use crate::response::graph_objects::{Edge, Node, Path};

/// One decoded column value.
///
/// Closed sum over everything the compact protocol can deliver in a result
/// cell. Consumers pattern-match exhaustively; there is no dynamic typing
/// anywhere downstream of the decoder.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphValue {
    Null,
    Bool(bool),
    /// Always 64-bit. Entity identifiers and integer properties can exceed
    /// 32-bit range.
    Int(i64),
    Double(f64),
    Str(String),
    Array(Vec<GraphValue>),
    Node(Node),
    Edge(Edge),
    Path(Path),
    /// Payload carried by a scalar tag or column type this driver does not
    /// recognize. Kept raw so a newer server does not fail the whole row.
    Opaque(Reply),
}

impl GraphValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            GraphValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            GraphValue::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            GraphValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            GraphValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            GraphValue::Node(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_edge(&self) -> Option<&Edge> {
        match self {
            GraphValue::Edge(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            GraphValue::Path(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[GraphValue]> {
        match self {
            GraphValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, GraphValue::Null)
    }
}

// Display favors the query-literal look: strings quoted, null lowercase,
// arrays bracketed. Entities use their own Display impls.
impl fmt::Display for GraphValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphValue::Null => write!(f, "null"),
            GraphValue::Bool(b) => write!(f, "{b}"),
            GraphValue::Int(i) => write!(f, "{i}"),
            GraphValue::Double(d) => write!(f, "{d}"),
            GraphValue::Str(s) => write!(f, "{s:?}"),
            GraphValue::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            GraphValue::Node(n) => write!(f, "{n}"),
            GraphValue::Edge(e) => write!(f, "{e}"),
            GraphValue::Path(p) => write!(f, "{p}"),
            GraphValue::Opaque(raw) => write!(f, "{raw}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        assert_eq!(GraphValue::Int(5).as_int(), Some(5));
        assert_eq!(GraphValue::Str("x".into()).as_str(), Some("x"));
        assert!(GraphValue::Null.is_null());
        assert_eq!(GraphValue::Bool(true).as_int(), None);
    }

    #[test]
    fn test_array_equality_is_elementwise() {
        let a = GraphValue::Array(vec![GraphValue::Int(1), GraphValue::Str("a".into())]);
        let b = GraphValue::Array(vec![GraphValue::Int(1), GraphValue::Str("a".into())]);
        assert_eq!(a, b);
        let c = GraphValue::Array(vec![GraphValue::Int(2), GraphValue::Str("a".into())]);
        assert_ne!(a, c);
    }

    #[test]
    fn test_display() {
        let v = GraphValue::Array(vec![
            GraphValue::Null,
            GraphValue::Int(3),
            GraphValue::Str("hi".into()),
        ]);
        assert_eq!(v.to_string(), "[null, 3, \"hi\"]");
    }
}
