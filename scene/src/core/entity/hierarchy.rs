//! Traversal, scoped naming, and subtree propagation
//!
//! Read-only lookups walk the tree the graph owns; the two propagating
//! operations (`set_world`, `set_selected`) visit every descendant exactly
//! once. A cycle in the parent chain is a consistency bug, not a runtime
//! state: upward walks are depth-bounded and log an error instead of
//! hanging.

use super::components::{Name, NodeType, Parent, WorldId};
use super::graph::SceneGraph;
use hecs::Entity;
use tracing::{debug, error};

/// Separator used when joining scoped names
pub const SCOPE_SEPARATOR: &str = "::";

// Upper bound on ancestor-chain walks; deeper chains indicate a cycle.
const MAX_PARENT_DEPTH: usize = 1024;

/// Find the first node named `name` in the subtree rooted at `root`
///
/// Pre-order depth-first: the root is matched before its descendants, and
/// children are visited in insertion order.
pub fn get_by_name(graph: &SceneGraph, root: Entity, name: &str) -> Option<Entity> {
    let mut stack = vec![root];
    while let Some(entity) = stack.pop() {
        if graph.name(entity).as_deref() == Some(name) {
            return Some(entity);
        }
        let children = graph.children(entity);
        for child in children.into_iter().rev() {
            stack.push(child);
        }
    }
    None
}

// Ancestors from root-most down to (excluding) the entity itself.
fn ancestor_chain(graph: &SceneGraph, entity: Entity) -> Vec<Entity> {
    let mut chain = Vec::new();
    let mut current = graph.parent(entity);
    while let Some(ancestor) = current {
        if chain.len() >= MAX_PARENT_DEPTH {
            error!(
                entity = ?entity,
                "Parent chain exceeds maximum depth, likely a cycle"
            );
            break;
        }
        chain.push(ancestor);
        current = graph.parent(ancestor);
    }
    chain.reverse();
    chain
}

/// The node's name qualified by its model-level ancestors
///
/// `model1::...::modelN::name`: only ancestors tagged [`NodeType::Model`]
/// contribute to the scope.
pub fn scoped_name(graph: &SceneGraph, entity: Entity) -> String {
    let mut parts: Vec<String> = ancestor_chain(graph, entity)
        .into_iter()
        .filter(|&a| graph.has_type(a, NodeType::Model))
        .filter_map(|a| graph.name(a))
        .collect();
    parts.extend(graph.name(entity));
    parts.join(SCOPE_SEPARATOR)
}

/// The node's name qualified by every ancestor
///
/// Unlike [`scoped_name`] this keeps link- and collision-level scoping:
/// `model1::...::modelN::linkN::name`.
pub fn complete_scoped_name(graph: &SceneGraph, entity: Entity) -> String {
    let mut parts: Vec<String> = ancestor_chain(graph, entity)
        .into_iter()
        .filter_map(|a| graph.name(a))
        .collect();
    parts.extend(graph.name(entity));
    parts.join(SCOPE_SEPARATOR)
}

/// Set the owning world of a node and all of its descendants
///
/// Every node of the subtree is visited exactly once. Children attached
/// after this call do not inherit the world reference automatically.
pub fn set_world(graph: &mut SceneGraph, root: Entity, world: WorldId) {
    let mut stack = vec![root];
    let mut visited = 0usize;
    while let Some(entity) = stack.pop() {
        let _ = graph.insert_one(entity, world);
        visited += 1;
        stack.extend(graph.children(entity));
    }
    debug!(root = ?root, world = ?world, visited = visited, "Propagated world reference");
}

/// The world a node belongs to, if one has been assigned
pub fn world_of(graph: &SceneGraph, entity: Entity) -> Option<WorldId> {
    graph.get::<WorldId>(entity).map(|w| *w).ok()
}

/// Set the selection flag on a node and its whole subtree
pub fn set_selected(graph: &mut SceneGraph, root: Entity, selected: bool) {
    let mut stack = vec![root];
    while let Some(entity) = stack.pop() {
        graph.set_selected_flag(entity, selected);
        stack.extend(graph.children(entity));
    }
}

/// Log the subtree rooted at `root`, one node per line, indented by depth
pub fn print_tree(graph: &SceneGraph, root: Entity) {
    print_node(graph, root, 0);
}

fn print_node(graph: &SceneGraph, entity: Entity, depth: usize) {
    let name = graph.name(entity).unwrap_or_default();
    let id = graph
        .node_id(entity)
        .map(|id| id.0.to_string())
        .unwrap_or_default();
    let leaf = graph.leaf_type(entity);
    debug!(
        "{:indent$}{} [id={} type={}]",
        "",
        name,
        id,
        leaf,
        indent = depth * 2
    );
    for child in graph.children(entity) {
        print_node(graph, child, depth + 1);
    }
}

/// Check parent/child consistency across the whole graph
///
/// Returns the number of issues found; each issue is logged.
pub fn validate_graph(graph: &SceneGraph) -> usize {
    let mut issues = 0;

    for (entity, parent) in graph.inner().query::<&Parent>().iter() {
        let listed = graph.children(parent.0).contains(&entity);
        if !listed {
            error!(
                entity = ?entity,
                parent = ?parent.0,
                "Node has a Parent that does not list it as a child"
            );
            issues += 1;
        }
    }

    for (entity, _) in graph.inner().query::<&Name>().iter() {
        for child in graph.children(entity) {
            if graph.parent(child) != Some(entity) {
                error!(
                    entity = ?entity,
                    child = ?child,
                    "Child does not point back at the node holding it"
                );
                issues += 1;
            }
        }
    }

    if issues > 0 {
        error!("Found {} hierarchy consistency issues", issues);
    }
    issues
}
