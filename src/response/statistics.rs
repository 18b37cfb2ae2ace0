//! Query statistics parsing.
//!
//! The statistics segment is a list of `"Label text: value"` lines. The label
//! set is a closed, versioned contract with the server: an unrecognized label
//! fails the decode loudly (a server/client version mismatch is worth
//! surfacing), unlike the forward-compatible row deserializer. Servers omit
//! zero-valued counters, so absence reads as zero.

use std::collections::HashMap;

use crate::error::{GraphError, Result};
use crate::reply::Reply;

/// The closed set of statistics labels the server may emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatisticsLabel {
    LabelsAdded,
    IndicesAdded,
    IndicesCreated,
    NodesCreated,
    NodesDeleted,
    RelationshipsDeleted,
    RelationshipsCreated,
    PropertiesSet,
    QueryInternalExecutionTime,
    GraphRemovedInternalExecutionTime,
}

impl StatisticsLabel {
    fn from_text(text: &str) -> Option<Self> {
        match text {
            "Labels added" => Some(StatisticsLabel::LabelsAdded),
            "Indices added" => Some(StatisticsLabel::IndicesAdded),
            "Indices created" => Some(StatisticsLabel::IndicesCreated),
            "Nodes created" => Some(StatisticsLabel::NodesCreated),
            "Nodes deleted" => Some(StatisticsLabel::NodesDeleted),
            "Relationships deleted" => Some(StatisticsLabel::RelationshipsDeleted),
            "Relationships created" => Some(StatisticsLabel::RelationshipsCreated),
            "Properties set" => Some(StatisticsLabel::PropertiesSet),
            "Query internal execution time" => Some(StatisticsLabel::QueryInternalExecutionTime),
            "Graph removed, internal execution time" => {
                Some(StatisticsLabel::GraphRemovedInternalExecutionTime)
            }
            _ => None,
        }
    }
}

/// Parsed statistics segment of one reply.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Statistics {
    values: HashMap<StatisticsLabel, String>,
}

impl Statistics {
    /// Parse the statistics segment: an array of `"Label: value"` strings.
    pub(crate) fn parse(reply: &Reply) -> Result<Statistics> {
        let lines = reply.expect_array("statistics")?;
        let mut values = HashMap::with_capacity(lines.len());

        for line in lines {
            let text = line.expect_str("statistics line")?;
            let (label_text, value) = text.split_once(':').ok_or_else(|| {
                GraphError::protocol(format!("statistics line without separator: {text:?}"))
            })?;
            let label = StatisticsLabel::from_text(label_text.trim())
                .ok_or_else(|| GraphError::UnknownStatistic(label_text.trim().to_string()))?;
            values.insert(label, value.trim().to_string());
        }

        Ok(Statistics { values })
    }

    /// Raw string value for a label, if the server emitted it.
    pub fn get(&self, label: StatisticsLabel) -> Option<&str> {
        self.values.get(&label).map(String::as_str)
    }

    fn count(&self, label: StatisticsLabel) -> i64 {
        self.get(label)
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }

    pub fn labels_added(&self) -> i64 {
        self.count(StatisticsLabel::LabelsAdded)
    }

    pub fn indices_added(&self) -> i64 {
        self.count(StatisticsLabel::IndicesAdded)
    }

    pub fn indices_created(&self) -> i64 {
        self.count(StatisticsLabel::IndicesCreated)
    }

    pub fn nodes_created(&self) -> i64 {
        self.count(StatisticsLabel::NodesCreated)
    }

    pub fn nodes_deleted(&self) -> i64 {
        self.count(StatisticsLabel::NodesDeleted)
    }

    pub fn relationships_deleted(&self) -> i64 {
        self.count(StatisticsLabel::RelationshipsDeleted)
    }

    pub fn relationships_created(&self) -> i64 {
        self.count(StatisticsLabel::RelationshipsCreated)
    }

    pub fn properties_set(&self) -> i64 {
        self.count(StatisticsLabel::PropertiesSet)
    }

    /// Execution time as reported, e.g. `"0.5 milliseconds"`. Not a pure
    /// number, so it stays unparsed.
    pub fn query_internal_execution_time(&self) -> Option<&str> {
        self.get(StatisticsLabel::QueryInternalExecutionTime)
    }

    pub fn graph_removed_internal_execution_time(&self) -> Option<&str> {
        self.get(StatisticsLabel::GraphRemovedInternalExecutionTime)
    }
}
