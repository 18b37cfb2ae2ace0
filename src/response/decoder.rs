//! Compact reply deserialization.
//!
//! Each row is a fixed-arity array of raw cells, one per header column.
//! Cells dispatch on the column's declared type; scalar cells carry their own
//! type tag and recurse for arrays, embedded entities, and paths. Replies are
//! trees, so the mutual recursion always bottoms out in scalar leaves.
//!
//! Name indices resolve against the graph's [`SchemaCache`] snapshot. The
//! client pre-resolves the indices a reply demands (see [`scan_demand`])
//! before rows are decoded, so a miss here means server and client schema
//! genuinely disagree: the name is dropped with a warning and the entity is
//! still produced.

use log::warn;

use crate::error::{GraphError, Result};
use crate::reply::Reply;
use crate::response::graph_objects::{Edge, Node, Path, Property, PropertyMap};
use crate::response::header::{ColumnType, Header};
use crate::response::value::GraphValue;
use crate::schema::{SchemaCache, SchemaDemand, TableKind};

/// Scalar type tags of the compact protocol. Tag 0 is the server's own
/// "unknown" marker and falls through the catch-all arm.
mod tags {
    pub const NULL: i64 = 1;
    pub const STRING: i64 = 2;
    pub const INTEGER: i64 = 3;
    pub const BOOLEAN: i64 = 4;
    pub const DOUBLE: i64 = 5;
    pub const ARRAY: i64 = 6;
    pub const EDGE: i64 = 7;
    pub const NODE: i64 = 8;
    pub const PATH: i64 = 9;
}

/// Decode one raw row into one value per header column.
pub(crate) fn decode_row(
    raw: &Reply,
    header: &Header,
    cache: &SchemaCache,
) -> Result<Vec<GraphValue>> {
    let cells = raw.expect_array("row")?;
    if cells.len() != header.len() {
        return Err(GraphError::protocol(format!(
            "row has {} cells but header declares {} columns",
            cells.len(),
            header.len()
        )));
    }

    cells
        .iter()
        .zip(header.types())
        .map(|(cell, column_type)| match column_type {
            ColumnType::Scalar => decode_scalar(cell, cache),
            ColumnType::Node => Ok(GraphValue::Node(decode_node(cell, cache)?)),
            ColumnType::Relation => Ok(GraphValue::Edge(decode_edge(cell, cache)?)),
            // Forward compatibility: a column type this driver does not know
            // passes through raw instead of failing the row.
            ColumnType::Unknown => Ok(GraphValue::Opaque(cell.clone())),
        })
        .collect()
}

/// Decode a `[typeTag, value]` scalar cell.
fn decode_scalar(reply: &Reply, cache: &SchemaCache) -> Result<GraphValue> {
    let pair = reply.expect_array("scalar")?;
    if pair.len() != 2 {
        return Err(GraphError::protocol(format!(
            "scalar must be a [tag, value] pair, got {} elements",
            pair.len()
        )));
    }
    let tag = pair[0].expect_integer("scalar type tag")?;
    let value = &pair[1];

    match tag {
        tags::NULL => Ok(GraphValue::Null),
        tags::STRING => Ok(GraphValue::Str(value.expect_str("string scalar")?.to_string())),
        tags::INTEGER => Ok(GraphValue::Int(value.expect_integer("integer scalar")?)),
        tags::BOOLEAN => match value.expect_str("boolean scalar")? {
            "true" => Ok(GraphValue::Bool(true)),
            "false" => Ok(GraphValue::Bool(false)),
            other => Err(GraphError::protocol(format!(
                "boolean scalar must be \"true\" or \"false\", got {other:?}"
            ))),
        },
        tags::DOUBLE => {
            let text = value.expect_str("double scalar")?;
            text.parse()
                .map(GraphValue::Double)
                .map_err(|_| GraphError::protocol(format!("malformed double scalar: {text:?}")))
        }
        tags::ARRAY => {
            // Elements recurse through scalar dispatch, so arrays of nodes,
            // edges, or nested arrays all decode here.
            let items = value.expect_array("array scalar")?;
            items
                .iter()
                .map(|item| decode_scalar(item, cache))
                .collect::<Result<Vec<_>>>()
                .map(GraphValue::Array)
        }
        tags::NODE => Ok(GraphValue::Node(decode_node(value, cache)?)),
        tags::EDGE => Ok(GraphValue::Edge(decode_edge(value, cache)?)),
        tags::PATH => Ok(GraphValue::Path(decode_path(value, cache)?)),
        // tags::UNKNOWN and anything newer than this driver
        _ => Ok(GraphValue::Opaque(value.clone())),
    }
}

/// Decode a `[id, labelIndices, properties]` node payload.
fn decode_node(reply: &Reply, cache: &SchemaCache) -> Result<Node> {
    let parts = reply.expect_array("node")?;
    if parts.len() != 3 {
        return Err(GraphError::protocol(format!(
            "node must have 3 fields, got {}",
            parts.len()
        )));
    }

    let mut node = Node::new(parts[0].expect_integer("node id")?);

    for raw_index in parts[1].expect_array("node label indices")? {
        let index = raw_index.expect_integer("label index")?;
        match cache.label(index) {
            Some(label) => node.labels.push(label),
            None => warn!("label index {index} not in schema cache after refresh; dropping"),
        }
    }

    node.properties = decode_properties(&parts[2], cache)?;
    Ok(node)
}

/// Decode a `[id, typeIndex, sourceId, destId, properties]` edge payload.
fn decode_edge(reply: &Reply, cache: &SchemaCache) -> Result<Edge> {
    let parts = reply.expect_array("edge")?;
    if parts.len() != 5 {
        return Err(GraphError::protocol(format!(
            "edge must have 5 fields, got {}",
            parts.len()
        )));
    }

    let type_index = parts[1].expect_integer("relationship type index")?;
    let relationship_type = cache.relationship_type(type_index).unwrap_or_else(|| {
        warn!("relationship type index {type_index} not in schema cache after refresh");
        String::new()
    });

    Ok(Edge {
        id: parts[0].expect_integer("edge id")?,
        relationship_type,
        source: parts[2].expect_integer("edge source id")?,
        destination: parts[3].expect_integer("edge destination id")?,
        properties: decode_properties(&parts[4], cache)?,
    })
}

/// Decode a `[nodes, edges]` path payload. Both halves arrive as scalar
/// arrays whose elements are node / edge scalars.
fn decode_path(reply: &Reply, cache: &SchemaCache) -> Result<Path> {
    let parts = reply.expect_array("path")?;
    if parts.len() != 2 {
        return Err(GraphError::protocol(format!(
            "path must have 2 fields, got {}",
            parts.len()
        )));
    }

    let nodes = match decode_scalar(&parts[0], cache)? {
        GraphValue::Array(items) => items
            .into_iter()
            .map(|item| match item {
                GraphValue::Node(node) => Ok(node),
                other => Err(GraphError::protocol(format!(
                    "path node sequence holds a non-node value: {other}"
                ))),
            })
            .collect::<Result<Vec<_>>>()?,
        other => {
            return Err(GraphError::protocol(format!(
                "path node sequence is not an array: {other}"
            )))
        }
    };

    let edges = match decode_scalar(&parts[1], cache)? {
        GraphValue::Array(items) => items
            .into_iter()
            .map(|item| match item {
                GraphValue::Edge(edge) => Ok(edge),
                other => Err(GraphError::protocol(format!(
                    "path edge sequence holds a non-edge value: {other}"
                )))
            })
            .collect::<Result<Vec<_>>>()?,
        other => {
            return Err(GraphError::protocol(format!(
                "path edge sequence is not an array: {other}"
            )))
        }
    };

    Path::new(nodes, edges)
}

/// Decode a `[[nameIndex, [typeTag, value]], ...]` property list.
fn decode_properties(reply: &Reply, cache: &SchemaCache) -> Result<PropertyMap> {
    let entries = reply.expect_array("properties")?;
    let mut properties = PropertyMap::new();

    for entry in entries {
        let pair = entry.expect_array("property entry")?;
        if pair.len() != 2 {
            return Err(GraphError::protocol(format!(
                "property entry must be [nameIndex, scalar], got {} elements",
                pair.len()
            )));
        }
        let name_index = pair[0].expect_integer("property name index")?;
        let value = decode_scalar(&pair[1], cache)?;

        match cache.property_name(name_index) {
            Some(name) => properties.insert(Property::new(name, value)),
            None => {
                warn!("property name index {name_index} not in schema cache after refresh; dropping")
            }
        }
    }

    Ok(properties)
}

/// Scan raw rows for the schema indices they reference.
///
/// Best-effort mirror of the decoder's dispatch: malformed payloads are
/// skipped here and surface as decode errors once the row is iterated.
pub(crate) fn scan_demand(rows: &[Reply], header: &Header) -> SchemaDemand {
    let mut demand = SchemaDemand::default();

    for row in rows {
        let Some(cells) = row.as_array() else { continue };
        for (cell, column_type) in cells.iter().zip(header.types()) {
            match column_type {
                ColumnType::Scalar => scan_scalar(cell, &mut demand),
                ColumnType::Node => scan_node(cell, &mut demand),
                ColumnType::Relation => scan_edge(cell, &mut demand),
                ColumnType::Unknown => {}
            }
        }
    }

    demand
}

fn scan_scalar(reply: &Reply, demand: &mut SchemaDemand) {
    let Some([tag, value]) = reply.as_array().and_then(as_pair) else {
        return;
    };
    match tag.as_integer() {
        Some(tags::ARRAY) => {
            if let Some(items) = value.as_array() {
                for item in items {
                    scan_scalar(item, demand);
                }
            }
        }
        Some(tags::NODE) => scan_node(value, demand),
        Some(tags::EDGE) => scan_edge(value, demand),
        Some(tags::PATH) => {
            if let Some([nodes, edges]) = value.as_array().and_then(as_pair) {
                scan_scalar(nodes, demand);
                scan_scalar(edges, demand);
            }
        }
        _ => {}
    }
}

fn as_pair(items: &[Reply]) -> Option<&[Reply; 2]> {
    items.try_into().ok()
}

fn scan_node(reply: &Reply, demand: &mut SchemaDemand) {
    let Some(parts) = reply.as_array() else { return };
    if let Some(indices) = parts.get(1).and_then(Reply::as_array) {
        for raw in indices {
            if let Some(index) = raw.as_integer() {
                demand.note(TableKind::Labels, index);
            }
        }
    }
    if let Some(props) = parts.get(2) {
        scan_properties(props, demand);
    }
}

fn scan_edge(reply: &Reply, demand: &mut SchemaDemand) {
    let Some(parts) = reply.as_array() else { return };
    if let Some(index) = parts.get(1).and_then(Reply::as_integer) {
        demand.note(TableKind::RelationshipTypes, index);
    }
    if let Some(props) = parts.get(4) {
        scan_properties(props, demand);
    }
}

fn scan_properties(reply: &Reply, demand: &mut SchemaDemand) {
    let Some(entries) = reply.as_array() else { return };
    for entry in entries {
        let Some(pair) = entry.as_array() else { continue };
        if let Some(index) = pair.first().and_then(Reply::as_integer) {
            demand.note(TableKind::PropertyNames, index);
        }
        if let Some(value) = pair.get(1) {
            scan_scalar(value, demand);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(tag: i64, value: Reply) -> Reply {
        Reply::array(vec![Reply::Integer(tag), value])
    }

    fn cache() -> SchemaCache {
        let cache = SchemaCache::new();
        cache
            .table(TableKind::Labels)
            .replace(vec!["Person".into(), "Actor".into()]);
        cache
            .table(TableKind::PropertyNames)
            .replace(vec!["name".into(), "age".into(), "scores".into()]);
        cache
            .table(TableKind::RelationshipTypes)
            .replace(vec!["KNOWS".into()]);
        cache
    }

    fn node_payload() -> Reply {
        Reply::array(vec![
            Reply::Integer(42),
            Reply::array(vec![Reply::Integer(0), Reply::Integer(1)]),
            Reply::array(vec![
                Reply::array(vec![Reply::Integer(0), scalar(tags::STRING, Reply::bulk("Alice"))]),
                Reply::array(vec![Reply::Integer(1), scalar(tags::INTEGER, Reply::Integer(30))]),
            ]),
        ])
    }

    fn edge_payload(id: i64, src: i64, dst: i64) -> Reply {
        Reply::array(vec![
            Reply::Integer(id),
            Reply::Integer(0),
            Reply::Integer(src),
            Reply::Integer(dst),
            Reply::array(vec![]),
        ])
    }

    #[test]
    fn test_decode_scalar_leaves() {
        let cache = cache();
        assert_eq!(
            decode_scalar(&scalar(tags::NULL, Reply::Nil), &cache).unwrap(),
            GraphValue::Null
        );
        assert_eq!(
            decode_scalar(&scalar(tags::STRING, Reply::bulk("hi")), &cache).unwrap(),
            GraphValue::Str("hi".into())
        );
        assert_eq!(
            decode_scalar(&scalar(tags::BOOLEAN, Reply::bulk("true")), &cache).unwrap(),
            GraphValue::Bool(true)
        );
        assert_eq!(
            decode_scalar(&scalar(tags::DOUBLE, Reply::bulk("2.5")), &cache).unwrap(),
            GraphValue::Double(2.5)
        );
    }

    #[test]
    fn test_integers_stay_64_bit() {
        let cache = cache();
        let big = 5_000_000_000i64; // beyond i32
        assert_eq!(
            decode_scalar(&scalar(tags::INTEGER, Reply::Integer(big)), &cache).unwrap(),
            GraphValue::Int(big)
        );
    }

    #[test]
    fn test_decode_nested_array() {
        let cache = cache();
        let value = scalar(
            tags::ARRAY,
            Reply::array(vec![
                scalar(tags::INTEGER, Reply::Integer(1)),
                scalar(
                    tags::ARRAY,
                    Reply::array(vec![scalar(tags::STRING, Reply::bulk("x"))]),
                ),
            ]),
        );
        assert_eq!(
            decode_scalar(&value, &cache).unwrap(),
            GraphValue::Array(vec![
                GraphValue::Int(1),
                GraphValue::Array(vec![GraphValue::Str("x".into())]),
            ])
        );
    }

    #[test]
    fn test_decode_node() {
        let cache = cache();
        let node = decode_node(&node_payload(), &cache).unwrap();
        assert_eq!(node.id, 42);
        assert_eq!(node.labels, vec!["Person".to_string(), "Actor".to_string()]);
        assert_eq!(node.property("name"), Some(&GraphValue::Str("Alice".into())));
        assert_eq!(node.property("age"), Some(&GraphValue::Int(30)));
    }

    #[test]
    fn test_decode_edge() {
        let cache = cache();
        let edge = decode_edge(&edge_payload(7, 1, 2), &cache).unwrap();
        assert_eq!(edge.id, 7);
        assert_eq!(edge.relationship_type, "KNOWS");
        assert_eq!(edge.source, 1);
        assert_eq!(edge.destination, 2);
        assert!(edge.properties.is_empty());
    }

    #[test]
    fn test_decode_path() {
        let cache = cache();
        let path_value = Reply::array(vec![
            scalar(
                tags::ARRAY,
                Reply::array(vec![
                    scalar(
                        tags::NODE,
                        Reply::array(vec![
                            Reply::Integer(1),
                            Reply::array(vec![]),
                            Reply::array(vec![]),
                        ]),
                    ),
                    scalar(
                        tags::NODE,
                        Reply::array(vec![
                            Reply::Integer(2),
                            Reply::array(vec![]),
                            Reply::array(vec![]),
                        ]),
                    ),
                ]),
            ),
            scalar(
                tags::ARRAY,
                Reply::array(vec![scalar(tags::EDGE, edge_payload(9, 1, 2))]),
            ),
        ]);

        let path = decode_path(&path_value, &cache).unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(path.node_count(), 2);
        assert_eq!(path.first_node().unwrap().id, 1);
        assert_eq!(path.last_node().unwrap().id, 2);
        assert_eq!(path.edge(0).unwrap().id, 9);
    }

    #[test]
    fn test_path_arity_mismatch_is_protocol_violation() {
        let cache = cache();
        // two nodes but no connecting edge
        let path_value = Reply::array(vec![
            scalar(
                tags::ARRAY,
                Reply::array(vec![
                    scalar(
                        tags::NODE,
                        Reply::array(vec![
                            Reply::Integer(1),
                            Reply::array(vec![]),
                            Reply::array(vec![]),
                        ]),
                    ),
                    scalar(
                        tags::NODE,
                        Reply::array(vec![
                            Reply::Integer(2),
                            Reply::array(vec![]),
                            Reply::array(vec![]),
                        ]),
                    ),
                ]),
            ),
            scalar(tags::ARRAY, Reply::array(vec![])),
        ]);
        assert!(decode_path(&path_value, &cache).is_err());
    }

    #[test]
    fn test_unknown_scalar_tag_passes_through() {
        let cache = cache();
        let decoded = decode_scalar(&scalar(77, Reply::bulk("mystery")), &cache).unwrap();
        assert_eq!(decoded, GraphValue::Opaque(Reply::bulk("mystery")));
    }

    #[test]
    fn test_schema_miss_keeps_entity() {
        let cache = SchemaCache::new(); // empty: every index misses
        let node = decode_node(&node_payload(), &cache).unwrap();
        assert_eq!(node.id, 42);
        assert!(node.labels.is_empty());
        assert!(node.properties.is_empty());
    }

    #[test]
    fn test_row_arity_must_match_header() {
        let cache = cache();
        let header = Header::parse(&Reply::array(vec![
            Reply::array(vec![Reply::Integer(1), Reply::bulk("a")]),
            Reply::array(vec![Reply::Integer(1), Reply::bulk("b")]),
        ]))
        .unwrap();

        let short_row = Reply::array(vec![scalar(tags::INTEGER, Reply::Integer(1))]);
        assert!(decode_row(&short_row, &header, &cache).is_err());
    }

    #[test]
    fn test_unknown_column_type_passes_raw() {
        let cache = cache();
        let header = Header::parse(&Reply::array(vec![Reply::array(vec![
            Reply::Integer(42),
            Reply::bulk("col"),
        ])]))
        .unwrap();
        let row = Reply::array(vec![Reply::bulk("anything")]);
        let values = decode_row(&row, &header, &cache).unwrap();
        assert_eq!(values, vec![GraphValue::Opaque(Reply::bulk("anything"))]);
    }

    #[test]
    fn test_scan_demand_covers_nested_entities() {
        let header = Header::parse(&Reply::array(vec![Reply::array(vec![
            Reply::Integer(1),
            Reply::bulk("v"),
        ])]))
        .unwrap();

        // a scalar column holding [node, edge] inside an array
        let rows = vec![Reply::array(vec![scalar(
            tags::ARRAY,
            Reply::array(vec![
                scalar(tags::NODE, node_payload()),
                scalar(
                    tags::EDGE,
                    Reply::array(vec![
                        Reply::Integer(5),
                        Reply::Integer(3),
                        Reply::Integer(1),
                        Reply::Integer(2),
                        Reply::array(vec![Reply::array(vec![
                            Reply::Integer(6),
                            scalar(tags::INTEGER, Reply::Integer(1)),
                        ])]),
                    ]),
                ),
            ]),
        )])];

        let demand = scan_demand(&rows, &header);
        assert_eq!(demand.max_index(TableKind::Labels), Some(1));
        assert_eq!(demand.max_index(TableKind::PropertyNames), Some(6));
        assert_eq!(demand.max_index(TableKind::RelationshipTypes), Some(3));
    }
}
