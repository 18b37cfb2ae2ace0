//! Query text construction: parameter value encoding and the `CYPHER`
//! parameter preamble.

pub mod encoding;
pub mod prepare;

pub use encoding::ParamValue;
pub use prepare::{prepare_query, procedure_call};
