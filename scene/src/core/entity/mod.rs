//! Scene-graph entity model
//!
//! Nodes live in a [`SceneGraph`]: an owned hierarchy with stable integer
//! identity, append-only type classification, and scoped naming.

pub mod components;
pub mod graph;
pub mod hierarchy;

// Re-export commonly used types
pub use components::{
    Children, GlobalTransform, Name, NodeFlags, NodeId, NodeType, Parent, Transform, TypeTags,
    WorldId,
};
pub use graph::SceneGraph;
pub use hierarchy::{
    complete_scoped_name, get_by_name, print_tree, scoped_name, set_selected, set_world,
    validate_graph, world_of,
};

// Re-export hecs types that users will need
pub use hecs::Entity;
