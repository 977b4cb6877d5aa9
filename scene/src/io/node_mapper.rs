//! Node index mapping for snapshot instantiation

use hecs::Entity;
use std::collections::HashMap;
use tracing::debug;

/// Maps snapshot node indices to the entities created during instantiation
///
/// Parent links in a serialized snapshot refer to positions in the snapshot,
/// not to live entities; this mapper maintains the relationship while a
/// snapshot is being instantiated and lets callers resolve the nodes
/// afterwards.
#[derive(Debug, Default)]
pub struct NodeMapper {
    mapping: HashMap<u64, Entity>,
}

impl NodeMapper {
    /// Create a new empty mapper
    pub fn new() -> Self {
        Self {
            mapping: HashMap::new(),
        }
    }

    /// Register a mapping from a snapshot index to a live entity
    pub fn register(&mut self, index: u64, entity: Entity) {
        debug!(index = index, entity = ?entity, "Registering node mapping");
        self.mapping.insert(index, entity);
    }

    /// Look up the live entity for a snapshot index
    pub fn remap(&self, index: u64) -> Option<Entity> {
        self.mapping.get(&index).copied()
    }

    /// Number of mapped nodes
    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    /// Check if the mapper is empty
    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    /// Iterate over all (index, entity) pairs
    pub fn iter(&self) -> impl Iterator<Item = (u64, Entity)> + '_ {
        self.mapping.iter().map(|(&index, &entity)| (index, entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_mapper_basic() {
        let mut mapper = NodeMapper::new();
        assert!(mapper.is_empty());

        let entity = Entity::DANGLING;
        mapper.register(3, entity);

        assert_eq!(mapper.len(), 1);
        assert_eq!(mapper.remap(3), Some(entity));
        assert_eq!(mapper.remap(4), None);
    }

    #[test]
    fn test_node_mapper_overwrite() {
        let mut mapper = NodeMapper::new();
        mapper.register(1, Entity::DANGLING);
        mapper.register(1, Entity::DANGLING);
        assert_eq!(mapper.len(), 1);
    }
}
