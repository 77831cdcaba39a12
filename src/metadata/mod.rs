//! metadata
//!
//! Distributed binary metadata: the sign-encoded string codec, the
//! per-unit writer, and the reader used to verify that units load
//! independently.

pub mod codec;
pub mod reader;
pub mod writer;

pub use codec::{CodecError, PoolRef};
pub use reader::{read_unit, MetadataUnit, ReadError};
pub use writer::{MetadataWriter, StringPools, WriteError, GRAPH_FILE, INDEX_FILE};
