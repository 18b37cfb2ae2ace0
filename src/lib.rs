//! redigraph - client driver for RedisGraph-style graph databases.
//!
//! This crate provides Cypher query execution over any Redis-protocol
//! transport, with:
//! - Typed decoding of the compact reply format (nodes, edges, paths,
//!   scalars, nested arrays)
//! - A per-graph schema cache resolving the protocol's integer name indices,
//!   refreshed on demand with single-flight introspection calls
//! - Query parameter encoding with grammar-safe quoting
//! - Async and blocking client surfaces sharing one decode pipeline
//!
//! The network itself stays behind the [`Transport`] trait: implement it for
//! your connection layer and hand it to [`GraphClient`].

pub mod blocking;
pub mod client;
pub mod error;
pub mod query;
pub mod reply;
pub mod response;
pub mod schema;
pub mod transport;

pub use client::GraphClient;
pub use error::{GraphError, Result};
pub use query::{prepare_query, ParamValue};
pub use reply::Reply;
pub use response::{
    ColumnType, Edge, GraphValue, Header, Node, Path, Property, Record, ResultSet, Statistics,
};
pub use schema::{SchemaCache, TableKind};
pub use transport::Transport;
