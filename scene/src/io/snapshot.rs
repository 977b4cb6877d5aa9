//! World snapshot capture and instantiation

use crate::core::entity::{NodeFlags, NodeId, SceneGraph, Transform, TypeTags};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use super::node_mapper::NodeMapper;

/// Serialized form of the saveable portion of a scene graph
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Serialized nodes; parent links are indices into this list
    pub nodes: Vec<SnapshotNode>,
}

/// A single serialized node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotNode {
    pub name: String,
    pub types: TypeTags,
    pub transform: Transform,
    pub flags: NodeFlags,
    /// Index of the parent within the snapshot, or `None` for a root
    pub parent: Option<u64>,
}

/// Errors that can occur during snapshot operations
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot refers to missing node index {0}")]
    NodeNotFound(u64),
}

impl WorldSnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture every saveable node of the graph
    ///
    /// Nodes whose `saveable` flag is false are skipped, along with any
    /// parent link that points at a skipped node. Nodes are captured in id
    /// order, so parents always precede their children.
    pub fn from_graph(graph: &SceneGraph) -> Self {
        let mut saveable: Vec<(NodeId, hecs::Entity)> = graph
            .inner()
            .query::<(&NodeId, &NodeFlags)>()
            .iter()
            .filter(|(_, (_, flags))| flags.saveable)
            .map(|(entity, (id, _))| (*id, entity))
            .collect();
        saveable.sort_by_key(|(id, _)| *id);

        let index_of = |target: hecs::Entity| -> Option<u64> {
            saveable
                .iter()
                .position(|&(_, e)| e == target)
                .map(|i| i as u64)
        };

        let mut nodes = Vec::with_capacity(saveable.len());
        for &(_, entity) in &saveable {
            let parent = graph.parent(entity).and_then(index_of);
            nodes.push(SnapshotNode {
                name: graph.name(entity).unwrap_or_default(),
                types: graph
                    .get::<TypeTags>(entity)
                    .map(|t| (*t).clone())
                    .unwrap_or_default(),
                transform: graph
                    .get::<Transform>(entity)
                    .map(|t| *t)
                    .unwrap_or_default(),
                flags: graph.flags(entity).unwrap_or_default(),
                parent,
            });
        }

        info!(node_count = nodes.len(), "Captured world snapshot");
        Self { nodes }
    }

    /// Instantiate this snapshot into a graph
    ///
    /// New nodes receive fresh ids; parent links are remapped through the
    /// returned [`NodeMapper`]. Instantiation is additive.
    pub fn instantiate(&self, graph: &mut SceneGraph) -> Result<NodeMapper, SnapshotError> {
        let mut mapper = NodeMapper::new();

        info!(node_count = self.nodes.len(), "Instantiating snapshot");

        // First pass: spawn all nodes and build the index mapping.
        for (index, node) in self.nodes.iter().enumerate() {
            let entity = graph.spawn(node.name.clone(), None);
            let _ = graph.insert_one(entity, node.types.clone());
            let _ = graph.insert_one(entity, node.transform);
            let _ = graph.insert_one(entity, node.flags);
            mapper.register(index as u64, entity);
            debug!(index = index, entity = ?entity, "Spawned snapshot node");
        }

        // Second pass: attach parents with remapped indices.
        for (index, node) in self.nodes.iter().enumerate() {
            let Some(parent_index) = node.parent else {
                continue;
            };
            let child = mapper
                .remap(index as u64)
                .ok_or(SnapshotError::NodeNotFound(index as u64))?;
            match mapper.remap(parent_index) {
                Some(parent) => graph.add_child(parent, child),
                None => {
                    warn!(
                        index = index,
                        parent_index = parent_index,
                        "Snapshot parent index out of range, node left as root"
                    );
                }
            }
        }

        info!("Snapshot instantiation complete");
        Ok(mapper)
    }

    /// Save this snapshot to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!(path = ?path, "Snapshot saved");
        Ok(())
    }

    /// Load a snapshot from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let snapshot = serde_json::from_str(&json)?;
        info!(path = ?path, "Snapshot loaded");
        Ok(snapshot)
    }
}
