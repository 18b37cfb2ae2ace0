//! Result set façade.
//!
//! Construction branches on reply arity: a 3-element reply carries header,
//! rows, and statistics; anything shorter is a write-only reply carrying
//! statistics alone. Rows are kept raw and decoded one at a time as records
//! are iterated — the whole reply is already in memory, so laziness here is
//! about decode cost, not network streaming.

use std::fmt;
use std::sync::Arc;

use crate::error::{GraphError, Result};
use crate::reply::Reply;
use crate::response::decoder;
use crate::response::header::Header;
use crate::response::statistics::Statistics;
use crate::response::value::GraphValue;
use crate::schema::{SchemaCache, SchemaDemand};

/// One decoded result row: ordered column names with their values.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    keys: Arc<Vec<String>>,
    values: Vec<GraphValue>,
}

impl Record {
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn values(&self) -> &[GraphValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&GraphValue> {
        self.values.get(index)
    }

    pub fn get_by_key(&self, key: &str) -> Option<&GraphValue> {
        self.keys.iter().position(|k| k == key).and_then(|i| self.values.get(i))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    /// Rendered form of the value at `index`.
    pub fn get_string(&self, index: usize) -> Option<String> {
        self.values.get(index).map(|v| match v {
            GraphValue::Str(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Record{{")?;
        for (i, (key, value)) in self.keys.iter().zip(&self.values).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        write!(f, "}}")
    }
}

/// A fully received, lazily decoded query reply.
pub struct ResultSet {
    header: Option<Header>,
    keys: Arc<Vec<String>>,
    raw_rows: Vec<Reply>,
    statistics: Statistics,
    cache: Arc<SchemaCache>,
}

impl ResultSet {
    /// Split a raw reply into header, rows, and statistics.
    ///
    /// Statistics parse here (their label set is a closed contract and a
    /// mismatch must fail the decode); rows wait for iteration.
    pub fn parse(reply: Reply, cache: Arc<SchemaCache>) -> Result<ResultSet> {
        if let Reply::Error(message) = reply {
            return Err(GraphError::Server(message));
        }

        let mut elements = match reply {
            Reply::Array(elements) => elements,
            other => {
                return Err(GraphError::protocol(format!(
                    "reply must be an array, got {other}"
                )))
            }
        };

        if elements.len() == 3 {
            let statistics = Statistics::parse(&elements[2])?;
            let header = Header::parse(&elements[0])?;
            let raw_rows = match elements.swap_remove(1) {
                Reply::Array(rows) => rows,
                other => {
                    return Err(GraphError::protocol(format!(
                        "rows segment must be an array, got {other}"
                    )))
                }
            };
            let keys = Arc::new(header.names().to_vec());
            Ok(ResultSet {
                header: Some(header),
                keys,
                raw_rows,
                statistics,
                cache,
            })
        } else if elements.len() > 3 {
            Err(GraphError::protocol(format!(
                "reply must have at most 3 segments, got {}",
                elements.len()
            )))
        } else {
            // Write-only reply: no header, no rows, statistics only.
            let last = elements
                .last()
                .ok_or_else(|| GraphError::protocol("empty reply"))?;
            let statistics = Statistics::parse(last)?;
            Ok(ResultSet {
                header: None,
                keys: Arc::new(Vec::new()),
                raw_rows: Vec::new(),
                statistics,
                cache,
            })
        }
    }

    /// Number of rows in the reply.
    pub fn len(&self) -> usize {
        self.raw_rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw_rows.is_empty()
    }

    /// Column description, absent for write-only replies.
    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Schema indices this reply's rows reference.
    pub(crate) fn schema_demand(&self) -> SchemaDemand {
        match &self.header {
            Some(header) => decoder::scan_demand(&self.raw_rows, header),
            None => SchemaDemand::default(),
        }
    }

    pub(crate) fn schema_cache(&self) -> &Arc<SchemaCache> {
        &self.cache
    }

    /// Decode the row at `index`.
    pub fn get(&self, index: usize) -> Option<Result<Record>> {
        let header = self.header.as_ref()?;
        let raw = self.raw_rows.get(index)?;
        Some(
            decoder::decode_row(raw, header, &self.cache).map(|values| Record {
                keys: Arc::clone(&self.keys),
                values,
            }),
        )
    }

    /// Iterate records, decoding each row on demand. Restartable: every call
    /// starts a fresh pass over the same reply.
    pub fn records(&self) -> Records<'_> {
        Records {
            result_set: self,
            index: 0,
        }
    }
}

impl fmt::Debug for ResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultSet")
            .field("rows", &self.raw_rows.len())
            .field("header", &self.header)
            .field("statistics", &self.statistics)
            .finish()
    }
}

/// Forward-only record iterator over one [`ResultSet`].
pub struct Records<'a> {
    result_set: &'a ResultSet,
    index: usize,
}

impl Iterator for Records<'_> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.result_set.get(self.index)?;
        self.index += 1;
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.result_set.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = Result<Record>;
    type IntoIter = Records<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.records()
    }
}
