//! World snapshot serialization
//!
//! Captures the saveable portion of a scene graph as a JSON document and
//! instantiates it back, remapping parent links through a [`NodeMapper`].

mod node_mapper;
mod snapshot;

pub use node_mapper::NodeMapper;
pub use snapshot::{SnapshotError, SnapshotNode, WorldSnapshot};
