use thiserror::Error;

/// Errors surfaced by the driver.
///
/// Decode errors (`ProtocolViolation`, `UnknownStatistic`) abort decoding of
/// the single reply that carried them; they never leave the schema cache in a
/// partially refreshed state. `Server` carries an error the server itself
/// reported and is raised before any decoding starts.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The reply did not have the shape the compact protocol promises
    /// (wrong arity, wrong element type, malformed payload).
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    /// A statistics line used a label outside the closed server contract.
    #[error("unknown statistics label: {0:?}")]
    UnknownStatistic(String),

    /// The server answered with an error reply (query compile or runtime
    /// failure). Not a decode error.
    #[error("server error: {0}")]
    Server(String),

    /// The underlying transport failed to deliver the command or reply.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl GraphError {
    pub(crate) fn protocol(msg: impl Into<String>) -> Self {
        GraphError::ProtocolViolation(msg.into())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GraphError>;
