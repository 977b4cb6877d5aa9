//! Scene-graph store wrapping hecs with hierarchy-aware helpers
//!
//! [`SceneGraph`] is the sole owner of node lifetime. Parent and child links
//! are mutated only through its attach/detach operations, which keep both
//! sides of the relation consistent.

use super::components::{
    Children, GlobalTransform, Name, NodeFlags, NodeId, NodeType, Parent, Transform, TypeTags,
};
use hecs::Entity;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

// Node ids are process-unique and never reused, even across graphs.
static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Owned hierarchy of scene nodes backed by a hecs world
pub struct SceneGraph {
    inner: hecs::World,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self {
            inner: hecs::World::new(),
        }
    }

    /// Spawn a node, optionally attached under `parent`
    ///
    /// The node receives a fresh [`NodeId`], an empty tag list, default
    /// flags, and identity transforms.
    pub fn spawn(&mut self, name: impl Into<String>, parent: Option<Entity>) -> Entity {
        let id = NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::SeqCst));
        let entity = self.inner.spawn((
            id,
            Name::new(name),
            TypeTags::default(),
            NodeFlags::default(),
            Children::default(),
            Transform::default(),
            GlobalTransform::default(),
        ));
        debug!(node = %id, entity = ?entity, "Spawned scene node");

        if let Some(parent) = parent {
            self.add_child(parent, entity);
        }
        entity
    }

    /// Append `child` under `parent`
    ///
    /// Idempotent on the child-set: re-adding an existing child neither
    /// errors nor moves it. A child attached elsewhere is detached from its
    /// previous parent first.
    pub fn add_child(&mut self, parent: Entity, child: Entity) {
        if parent == child {
            warn!(entity = ?child, "Refusing to attach a node to itself");
            return;
        }
        match self.inner.get::<&Children>(parent) {
            Ok(children) if children.0.contains(&child) => return,
            Ok(_) => {}
            Err(_) => {
                warn!(parent = ?parent, "add_child on a despawned parent");
                return;
            }
        }
        if !self.inner.contains(child) {
            warn!(child = ?child, "add_child with a despawned child");
            return;
        }

        let previous = self.inner.get::<&Parent>(child).map(|p| p.0).ok();
        if let Some(previous) = previous {
            self.detach(previous, child);
        }

        let _ = self.inner.insert_one(child, Parent(parent));
        if let Ok(children) = self.inner.query_one_mut::<&mut Children>(parent) {
            children.0.push(child);
        }
    }

    /// Remove the child with the given id; no-op when absent
    ///
    /// The removed subtree is destroyed as a unit, children first in
    /// insertion order.
    pub fn remove_child_by_id(&mut self, parent: Entity, id: NodeId) {
        let target = self
            .children(parent)
            .into_iter()
            .find(|&c| self.node_id(c) == Some(id));
        match target {
            Some(child) => self.remove_node(child),
            None => debug!(parent = ?parent, node = %id, "remove_child_by_id: no such child"),
        }
    }

    /// Remove the first child with the given name; no-op when absent
    pub fn remove_child_by_name(&mut self, parent: Entity, name: &str) {
        let target = self
            .children(parent)
            .into_iter()
            .find(|&c| self.name(c).as_deref() == Some(name));
        match target {
            Some(child) => self.remove_node(child),
            None => debug!(parent = ?parent, name = name, "remove_child_by_name: no such child"),
        }
    }

    /// Remove all children of `parent`, each destroyed in insertion order
    pub fn remove_children(&mut self, parent: Entity) {
        for child in self.children(parent) {
            self.detach(parent, child);
            self.despawn_recursive(child);
        }
    }

    /// Detach a node from its parent (if any) and destroy its subtree
    pub fn remove_node(&mut self, entity: Entity) {
        if let Some(parent) = self.parent(entity) {
            self.detach(parent, entity);
        }
        self.despawn_recursive(entity);
    }

    // Unlink both sides of the parent/child relation without despawning.
    fn detach(&mut self, parent: Entity, child: Entity) {
        if let Ok(children) = self.inner.query_one_mut::<&mut Children>(parent) {
            children.0.retain(|&c| c != child);
        }
        let _ = self.inner.remove_one::<Parent>(child);
    }

    // Children first, in insertion order, then the node itself.
    fn despawn_recursive(&mut self, entity: Entity) {
        for child in self.children(entity) {
            self.despawn_recursive(child);
        }
        if let Some(id) = self.node_id(entity) {
            debug!(node = %id, "Destroying scene node");
        }
        let _ = self.inner.despawn(entity);
    }

    /// Child by index; bounds-checked
    pub fn child(&self, parent: Entity, index: usize) -> Option<Entity> {
        self.inner
            .get::<&Children>(parent)
            .ok()
            .and_then(|c| c.0.get(index).copied())
    }

    /// Number of children
    pub fn child_count(&self, parent: Entity) -> usize {
        self.inner
            .get::<&Children>(parent)
            .map(|c| c.0.len())
            .unwrap_or(0)
    }

    /// Children in insertion order (cloned list)
    pub fn children(&self, entity: Entity) -> Vec<Entity> {
        self.inner
            .get::<&Children>(entity)
            .map(|c| c.0.clone())
            .unwrap_or_default()
    }

    /// The owning parent, or `None` for a root
    pub fn parent(&self, entity: Entity) -> Option<Entity> {
        self.inner.get::<&Parent>(entity).map(|p| p.0).ok()
    }

    /// The node's stable id
    pub fn node_id(&self, entity: Entity) -> Option<NodeId> {
        self.inner.get::<&NodeId>(entity).map(|id| *id).ok()
    }

    /// The node's name
    pub fn name(&self, entity: Entity) -> Option<String> {
        self.inner.get::<&Name>(entity).map(|n| n.0.clone()).ok()
    }

    /// Rename a node
    pub fn set_name(&mut self, entity: Entity, name: impl Into<String>) {
        if let Ok(n) = self.inner.query_one_mut::<&mut Name>(entity) {
            n.0 = name.into();
        }
    }

    /// Name-only equality check between two nodes
    pub fn same_name(&self, a: Entity, b: Entity) -> bool {
        match (self.name(a), self.name(b)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Append a classification tag
    pub fn add_type(&mut self, entity: Entity, tag: NodeType) {
        if let Ok(tags) = self.inner.query_one_mut::<&mut TypeTags>(entity) {
            tags.push(tag);
        }
    }

    /// Check tag membership
    pub fn has_type(&self, entity: Entity, tag: NodeType) -> bool {
        self.inner
            .get::<&TypeTags>(entity)
            .map(|t| t.has(tag))
            .unwrap_or(false)
    }

    /// The most specific (last appended) tag
    pub fn leaf_type(&self, entity: Entity) -> NodeType {
        self.inner
            .get::<&TypeTags>(entity)
            .map(|t| t.leaf())
            .unwrap_or(NodeType::Unclassified)
    }

    /// Number of tags on the node
    pub fn type_count(&self, entity: Entity) -> usize {
        self.inner
            .get::<&TypeTags>(entity)
            .map(|t| t.count())
            .unwrap_or(0)
    }

    /// Tag by append order
    pub fn type_at(&self, entity: Entity, index: usize) -> Option<NodeType> {
        self.inner
            .get::<&TypeTags>(entity)
            .ok()
            .and_then(|t| t.at(index))
    }

    /// Whether the node is included in world serialization
    pub fn is_saveable(&self, entity: Entity) -> bool {
        self.flags(entity).map(|f| f.saveable).unwrap_or(false)
    }

    /// Mark the node for inclusion in world serialization
    pub fn set_saveable(&mut self, entity: Entity, saveable: bool) {
        if let Ok(flags) = self.inner.query_one_mut::<&mut NodeFlags>(entity) {
            flags.saveable = saveable;
        }
    }

    /// Whether the node is selected
    pub fn is_selected(&self, entity: Entity) -> bool {
        self.flags(entity).map(|f| f.selected).unwrap_or(false)
    }

    /// Visibility hint for external inspection tooling
    pub fn show_in_gui(&self, entity: Entity) -> bool {
        self.flags(entity).map(|f| f.show_in_gui).unwrap_or(false)
    }

    /// Set the inspection-tooling visibility hint
    pub fn set_show_in_gui(&mut self, entity: Entity, show: bool) {
        if let Ok(flags) = self.inner.query_one_mut::<&mut NodeFlags>(entity) {
            flags.show_in_gui = show;
        }
    }

    pub(crate) fn flags(&self, entity: Entity) -> Option<NodeFlags> {
        self.inner.get::<&NodeFlags>(entity).map(|f| *f).ok()
    }

    pub(crate) fn set_selected_flag(&mut self, entity: Entity, selected: bool) {
        if let Ok(flags) = self.inner.query_one_mut::<&mut NodeFlags>(entity) {
            flags.selected = selected;
        }
    }

    /// Get a reference to a component on a node
    pub fn get<T: hecs::Component>(
        &self,
        entity: Entity,
    ) -> Result<hecs::Ref<T>, hecs::ComponentError> {
        self.inner.get::<&T>(entity)
    }

    /// Insert a component into a node
    pub fn insert_one(
        &mut self,
        entity: Entity,
        component: impl hecs::Component,
    ) -> Result<(), hecs::NoSuchEntity> {
        self.inner.insert_one(entity, component)
    }

    /// Query a single node for a mutable component reference
    pub fn query_one_mut<Q: hecs::Query>(
        &mut self,
        entity: Entity,
    ) -> Result<Q::Item<'_>, hecs::QueryOneError> {
        self.inner.query_one_mut::<Q>(entity)
    }

    /// Check if a node is alive
    pub fn contains(&self, entity: Entity) -> bool {
        self.inner.contains(entity)
    }

    /// Get access to the inner hecs world for advanced operations
    pub fn inner(&self) -> &hecs::World {
        &self.inner
    }

    /// Get mutable access to the inner hecs world for advanced operations
    pub fn inner_mut(&mut self) -> &mut hecs::World {
        &mut self.inner
    }
}
