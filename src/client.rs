//! Asynchronous graph client.
//!
//! Owns the per-graph schema cache registry and drives the refresh protocol:
//! after a reply arrives, the rows are scanned for the schema indices they
//! reference and any undersized table is refreshed before the result set is
//! handed out. Record decoding itself then never performs I/O.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::{debug, warn};

use crate::error::{GraphError, Result};
use crate::query::{prepare_query, procedure_call, ParamValue};
use crate::response::result_set::ResultSet;
use crate::schema::{SchemaCache, TableKind};
use crate::transport::Transport;

/// Server commands issued by the client.
mod commands {
    pub const QUERY: &str = "GRAPH.QUERY";
    pub const RO_QUERY: &str = "GRAPH.RO_QUERY";
    pub const DELETE: &str = "GRAPH.DELETE";
}

/// Query modifier selecting the integer-indexed compact reply format.
const COMPACT_FLAG: &str = "--COMPACT";

/// Client for one server connection, multiplexing any number of graphs.
///
/// Cheap to share behind an `Arc`; all interior state is synchronized.
pub struct GraphClient<T> {
    transport: T,
    caches: Mutex<HashMap<String, Arc<SchemaCache>>>,
}

impl<T: Transport> GraphClient<T> {
    pub fn new(transport: T) -> Self {
        GraphClient {
            transport,
            caches: Mutex::new(HashMap::new()),
        }
    }

    /// The transport this client issues commands through.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Execute a Cypher query.
    pub async fn query(&self, graph_id: &str, query: &str) -> Result<ResultSet> {
        self.run_query(commands::QUERY, graph_id, query).await
    }

    /// Execute a Cypher query with bound parameters.
    pub async fn query_with_params(
        &self,
        graph_id: &str,
        query: &str,
        params: &[(&str, ParamValue)],
    ) -> Result<ResultSet> {
        self.run_query(commands::QUERY, graph_id, &prepare_query(query, params))
            .await
    }

    /// Execute a Cypher query marked read-only. Whether it lands on a
    /// replica is the transport's routing decision.
    pub async fn read_only_query(&self, graph_id: &str, query: &str) -> Result<ResultSet> {
        self.run_query(commands::RO_QUERY, graph_id, query).await
    }

    /// Execute a read-only Cypher query with bound parameters.
    pub async fn read_only_query_with_params(
        &self,
        graph_id: &str,
        query: &str,
        params: &[(&str, ParamValue)],
    ) -> Result<ResultSet> {
        self.run_query(commands::RO_QUERY, graph_id, &prepare_query(query, params))
            .await
    }

    /// Call a server-side procedure with positional arguments.
    pub async fn call_procedure(
        &self,
        graph_id: &str,
        procedure: &str,
        args: &[&str],
    ) -> Result<ResultSet> {
        self.run_query(commands::QUERY, graph_id, &procedure_call(procedure, args))
            .await
    }

    /// Delete a graph and discard its schema cache.
    pub async fn delete_graph(&self, graph_id: &str) -> Result<ResultSet> {
        let reply = self
            .transport
            .execute(commands::DELETE, &[graph_id.to_string()])
            .await?;

        // Names assigned by a future graph under the same id share nothing
        // with the deleted one, so the cache goes with the graph.
        let cache = self
            .remove_cache(graph_id)
            .unwrap_or_else(|| Arc::new(SchemaCache::new()));

        ResultSet::parse(reply, cache)
    }

    async fn run_query(&self, command: &str, graph_id: &str, query: &str) -> Result<ResultSet> {
        debug!("{command} {graph_id}: {query}");
        let cache = self.cache_for(graph_id);

        let args = [
            graph_id.to_string(),
            query.to_string(),
            COMPACT_FLAG.to_string(),
        ];
        let reply = self.transport.execute(command, &args).await?;

        let result_set = ResultSet::parse(reply, cache)?;
        self.resolve_schema(graph_id, &result_set).await?;
        Ok(result_set)
    }

    /// Refresh every schema table this reply references beyond the cached
    /// range. Serialized per table: concurrent decodes that miss the same
    /// table collapse into a single introspection call.
    async fn resolve_schema(&self, graph_id: &str, result_set: &ResultSet) -> Result<()> {
        let demand = result_set.schema_demand();
        let cache = result_set.schema_cache();

        for kind in TableKind::ALL {
            let Some(max_index) = demand.max_index(kind) else {
                continue;
            };
            let table = cache.table(kind);
            if table.covers(max_index) {
                continue;
            }

            let _gate = table.refresh_gate().lock().await;
            if table.covers(max_index) {
                // another flight refreshed while we waited
                continue;
            }

            debug!(
                "refreshing {} for graph {graph_id} (need index {max_index})",
                kind.procedure()
            );
            let names = self.fetch_names(graph_id, kind, cache).await?;
            table.replace(names);

            if !table.covers(max_index) {
                warn!(
                    "graph {graph_id}: {} index {max_index} unknown to the server after refresh",
                    kind.procedure()
                );
            }
        }

        Ok(())
    }

    /// Fetch the full, ordered name list of one schema table.
    async fn fetch_names(
        &self,
        graph_id: &str,
        kind: TableKind,
        cache: &Arc<SchemaCache>,
    ) -> Result<Vec<String>> {
        let args = [
            graph_id.to_string(),
            procedure_call(kind.procedure(), &[]),
            COMPACT_FLAG.to_string(),
        ];
        let reply = self.transport.execute(commands::QUERY, &args).await?;
        let result_set = ResultSet::parse(reply, Arc::clone(cache))?;

        let mut names = Vec::with_capacity(result_set.len());
        for record in result_set.records() {
            let record = record?;
            let name = record.get(0).and_then(|v| v.as_str()).ok_or_else(|| {
                GraphError::protocol(format!(
                    "{} row must hold a single string column",
                    kind.procedure()
                ))
            })?;
            names.push(name.to_string());
        }
        Ok(names)
    }

    /// Cache for a graph, created atomically on first use.
    fn cache_for(&self, graph_id: &str) -> Arc<SchemaCache> {
        let mut caches = self.caches.lock().unwrap_or_else(|p| p.into_inner());
        Arc::clone(
            caches
                .entry(graph_id.to_string())
                .or_insert_with(|| Arc::new(SchemaCache::new())),
        )
    }

    fn remove_cache(&self, graph_id: &str) -> Option<Arc<SchemaCache>> {
        let mut caches = self.caches.lock().unwrap_or_else(|p| p.into_inner());
        caches.remove(graph_id)
    }

    /// Whether a schema cache currently exists for `graph_id`.
    pub fn has_cache(&self, graph_id: &str) -> bool {
        let caches = self.caches.lock().unwrap_or_else(|p| p.into_inner());
        caches.contains_key(graph_id)
    }
}
