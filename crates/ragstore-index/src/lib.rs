//! The semantic chunk index: a flat exact similarity index with
//! position-aligned chunk text and metadata, persisted to disk as a unit
//! after every mutation.

pub mod index;
mod persist;
pub mod store;

pub use index::{l2_normalize, FlatIndex};
pub use store::VectorStore;
