//! Transport seam.
//!
//! The driver only ever asks the connection layer one thing: run a named
//! command with positional arguments and hand back the single nested reply.
//! Connection lifecycle, addressing, pipelining, and timeouts all live behind
//! this trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::reply::Reply;

/// Executes key-value server commands and returns their raw replies.
///
/// Implementations translate a command name plus argument strings into the
/// server's wire format. A timeout or connection failure should surface as
/// [`crate::GraphError::Transport`]; a reply that arrives intact is returned
/// as-is, including server-side error replies (the client maps those to
/// [`crate::GraphError::Server`]).
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, command: &str, args: &[String]) -> Result<Reply>;
}
