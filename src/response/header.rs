//! Result header parsing.

use crate::error::{GraphError, Result};
use crate::reply::Reply;

/// Declared type of a result column.
///
/// Unrecognized tags map to `Unknown`; the row deserializer then passes that
/// column's payload through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Unknown,
    Scalar,
    Node,
    Relation,
}

impl ColumnType {
    fn from_tag(tag: i64) -> Self {
        match tag {
            1 => ColumnType::Scalar,
            2 => ColumnType::Node,
            3 => ColumnType::Relation,
            _ => ColumnType::Unknown,
        }
    }
}

/// Ordered column names and types, one entry per RETURN expression.
///
/// Both lists always have the same length. A write-only reply carries no
/// header at all; that case is modelled as `Option<Header>` on the result
/// set, never as a zero-column `Header`.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    names: Vec<String>,
    types: Vec<ColumnType>,
}

impl Header {
    /// Parse the header segment: an array of `[typeTag, columnName]` pairs.
    pub(crate) fn parse(reply: &Reply) -> Result<Header> {
        let columns = reply.expect_array("header")?;
        let mut names = Vec::with_capacity(columns.len());
        let mut types = Vec::with_capacity(columns.len());

        for column in columns {
            let pair = column.expect_array("header column")?;
            let [tag, name] = pair else {
                return Err(GraphError::protocol(format!(
                    "header column must be a [type, name] pair, got {} elements",
                    pair.len()
                )));
            };

            types.push(ColumnType::from_tag(tag.expect_integer("header column type")?));
            names.push(name.expect_str("header column name")?.to_string());
        }

        Ok(Header { names, types })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn types(&self) -> &[ColumnType] {
        &self.types
    }

    /// Column count.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Position of a column by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_reply() -> Reply {
        Reply::array(vec![
            Reply::array(vec![Reply::Integer(1), Reply::bulk("x")]),
            Reply::array(vec![Reply::Integer(2), Reply::bulk("n")]),
            Reply::array(vec![Reply::Integer(3), Reply::bulk("r")]),
            Reply::array(vec![Reply::Integer(99), Reply::bulk("future")]),
        ])
    }

    #[test]
    fn test_parse_preserves_order_and_maps_tags() {
        let header = Header::parse(&header_reply()).unwrap();
        assert_eq!(header.len(), 4);
        assert_eq!(header.names(), &["x", "n", "r", "future"]);
        assert_eq!(
            header.types(),
            &[
                ColumnType::Scalar,
                ColumnType::Node,
                ColumnType::Relation,
                ColumnType::Unknown,
            ]
        );
        assert_eq!(header.names().len(), header.types().len());
    }

    #[test]
    fn test_index_of() {
        let header = Header::parse(&header_reply()).unwrap();
        assert_eq!(header.index_of("n"), Some(1));
        assert_eq!(header.index_of("missing"), None);
    }

    #[test]
    fn test_non_array_header_is_protocol_violation() {
        assert!(Header::parse(&Reply::Integer(1)).is_err());
        assert!(Header::parse(&Reply::array(vec![Reply::Integer(1)])).is_err());
    }

    #[test]
    fn test_column_pair_arity_is_enforced() {
        // tag without a name
        let short = Reply::array(vec![Reply::array(vec![Reply::Integer(1)])]);
        assert!(matches!(
            Header::parse(&short),
            Err(GraphError::ProtocolViolation(_))
        ));

        // trailing extra element
        let long = Reply::array(vec![Reply::array(vec![
            Reply::Integer(1),
            Reply::bulk("x"),
            Reply::Integer(0),
        ])]);
        assert!(matches!(
            Header::parse(&long),
            Err(GraphError::ProtocolViolation(_))
        ));

        let empty_pair = Reply::array(vec![Reply::array(vec![])]);
        assert!(Header::parse(&empty_pair).is_err());
    }
}
