//! Reply decoding: header, entities, values, statistics, and the result-set
//! façade tying them together.

pub(crate) mod decoder;
pub mod graph_objects;
pub mod header;
pub mod result_set;
pub mod statistics;
pub mod value;

pub use graph_objects::{Edge, Node, Path, Property, PropertyMap};
pub use header::{ColumnType, Header};
pub use result_set::{Record, Records, ResultSet};
pub use statistics::{Statistics, StatisticsLabel};
pub use value::GraphValue;
