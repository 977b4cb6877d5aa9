//! Core components for scene-graph nodes

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Process-unique node identifier
///
/// Assigned monotonically by [`SceneGraph::spawn`](super::SceneGraph::spawn)
/// and never reused, even across graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name component for user-friendly node identification
///
/// Names are not globally unique; scoped names disambiguate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name(pub String);

impl Name {
    /// Create a new name component
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Classification tag for a scene node
///
/// The tag universe is fixed; a node accumulates tags from general to
/// specific during configuration and the last appended tag is its leaf type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    Base,
    Entity,
    Model,
    Link,
    Collision,
    Joint,
    BallJoint,
    HingeJoint,
    Hinge2Joint,
    SliderJoint,
    UniversalJoint,
    Shape,
    BoxShape,
    SphereShape,
    CylinderShape,
    PlaneShape,
    HeightmapShape,
    MapShape,
    RayShape,
    MultiRayShape,
    TrimeshShape,
    Light,
    Visual,
    /// Sentinel leaf type for a node with no tags
    Unclassified,
}

impl NodeType {
    /// Stable lowercase name, used in logs and documents
    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Base => "base",
            NodeType::Entity => "entity",
            NodeType::Model => "model",
            NodeType::Link => "link",
            NodeType::Collision => "collision",
            NodeType::Joint => "joint",
            NodeType::BallJoint => "ball",
            NodeType::HingeJoint => "hinge",
            NodeType::Hinge2Joint => "hinge2",
            NodeType::SliderJoint => "slider",
            NodeType::UniversalJoint => "universal",
            NodeType::Shape => "shape",
            NodeType::BoxShape => "box",
            NodeType::SphereShape => "sphere",
            NodeType::CylinderShape => "cylinder",
            NodeType::PlaneShape => "plane",
            NodeType::HeightmapShape => "heightmap",
            NodeType::MapShape => "map",
            NodeType::RayShape => "ray",
            NodeType::MultiRayShape => "multiray",
            NodeType::TrimeshShape => "trimesh",
            NodeType::Light => "light",
            NodeType::Visual => "visual",
            NodeType::Unclassified => "unclassified",
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only ordered list of classification tags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeTags(pub Vec<NodeType>);

impl TypeTags {
    /// Append a tag. Tags are never removed or reordered.
    pub fn push(&mut self, tag: NodeType) {
        self.0.push(tag);
    }

    /// Check tag membership
    pub fn has(&self, tag: NodeType) -> bool {
        self.0.contains(&tag)
    }

    /// The most recently appended tag, or `Unclassified` when empty
    pub fn leaf(&self) -> NodeType {
        self.0.last().copied().unwrap_or(NodeType::Unclassified)
    }

    /// Number of tags
    pub fn count(&self) -> usize {
        self.0.len()
    }

    /// Tag by append order
    pub fn at(&self, index: usize) -> Option<NodeType> {
        self.0.get(index).copied()
    }
}

/// Parent component establishing a parent-child relationship
///
/// Only [`SceneGraph`](super::SceneGraph) attach/detach operations mutate
/// this; it always names the node currently holding this one in `Children`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parent(pub hecs::Entity);

/// Ordered list of owned children; insertion order is traversal order
#[derive(Debug, Clone, Default)]
pub struct Children(pub Vec<hecs::Entity>);

/// Per-node interaction and serialization flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeFlags {
    /// Include this node when the world is externally serialized
    pub saveable: bool,
    /// User-interaction selection flag
    pub selected: bool,
    /// Visibility hint for external inspection tooling
    pub show_in_gui: bool,
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self {
            saveable: true,
            selected: false,
            show_in_gui: true,
        }
    }
}

/// Identifier of the simulation context that owns a node
///
/// A relational link rather than an owning pointer; propagated across a
/// subtree by [`set_world`](super::set_world).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldId(pub u64);

/// Transform component representing position, rotation, and scale in local space
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform {
    /// Position in local space
    pub position: Vec3,
    /// Rotation in local space as a quaternion
    pub rotation: Quat,
    /// Scale in local space
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform with the given position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Convert this transform to a transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Set the transform to look at a target position with the given up vector
    pub fn looking_at(mut self, target: Vec3, up: Vec3) -> Self {
        let forward = (target - self.position).normalize();
        let right = forward.cross(up).normalize();
        let up = right.cross(forward);

        let rotation_matrix = Mat4::from_cols(
            right.extend(0.0),
            up.extend(0.0),
            (-forward).extend(0.0),
            Vec3::ZERO.extend(1.0),
        );

        self.rotation = Quat::from_mat4(&rotation_matrix);
        self
    }

    /// Set the scale of the transform
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }
}

/// Global transform component representing the world-space transformation matrix
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GlobalTransform {
    /// World-space transformation matrix
    pub matrix: Mat4,
}

impl Default for GlobalTransform {
    fn default() -> Self {
        Self {
            matrix: Mat4::IDENTITY,
        }
    }
}

impl GlobalTransform {
    /// Create a new global transform from a matrix
    pub fn from_matrix(matrix: Mat4) -> Self {
        Self { matrix }
    }

    /// Get the world position from the transformation matrix
    pub fn position(&self) -> Vec3 {
        self.matrix.w_axis.truncate()
    }
}
