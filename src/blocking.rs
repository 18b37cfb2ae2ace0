//! Blocking client surface.
//!
//! Thin wrapper that drives the async client to completion on an owned
//! current-thread runtime, so every operation exists in a blocking form with
//! identical decode behavior. Must not be used from inside an async context;
//! use [`crate::GraphClient`] there.

use crate::error::{GraphError, Result};
use crate::query::ParamValue;
use crate::response::result_set::ResultSet;
use crate::transport::Transport;

/// Blocking mirror of [`crate::GraphClient`].
pub struct GraphClient<T> {
    runtime: tokio::runtime::Runtime,
    inner: crate::client::GraphClient<T>,
}

impl<T: Transport> GraphClient<T> {
    pub fn new(transport: T) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| GraphError::Transport(Box::new(e)))?;
        Ok(GraphClient {
            runtime,
            inner: crate::client::GraphClient::new(transport),
        })
    }

    pub fn query(&self, graph_id: &str, query: &str) -> Result<ResultSet> {
        self.runtime.block_on(self.inner.query(graph_id, query))
    }

    pub fn query_with_params(
        &self,
        graph_id: &str,
        query: &str,
        params: &[(&str, ParamValue)],
    ) -> Result<ResultSet> {
        self.runtime
            .block_on(self.inner.query_with_params(graph_id, query, params))
    }

    pub fn read_only_query(&self, graph_id: &str, query: &str) -> Result<ResultSet> {
        self.runtime
            .block_on(self.inner.read_only_query(graph_id, query))
    }

    pub fn read_only_query_with_params(
        &self,
        graph_id: &str,
        query: &str,
        params: &[(&str, ParamValue)],
    ) -> Result<ResultSet> {
        self.runtime
            .block_on(self.inner.read_only_query_with_params(graph_id, query, params))
    }

    pub fn call_procedure(
        &self,
        graph_id: &str,
        procedure: &str,
        args: &[&str],
    ) -> Result<ResultSet> {
        self.runtime
            .block_on(self.inner.call_procedure(graph_id, procedure, args))
    }

    pub fn delete_graph(&self, graph_id: &str) -> Result<ResultSet> {
        self.runtime.block_on(self.inner.delete_graph(graph_id))
    }

    pub fn has_cache(&self, graph_id: &str) -> bool {
        self.inner.has_cache(graph_id)
    }
}
