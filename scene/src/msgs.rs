//! Message descriptors exchanged with the rendering and factory backends
//!
//! [`Visual`] is the transient preview descriptor republished every drag
//! sample; [`Factory`] is the one-shot world-object description handed to
//! the simulation backend for instantiation. Neither side reads a response
//! back.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Primitive shape selectable for interactive creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Box,
    Sphere,
    Cylinder,
}

impl ShapeKind {
    /// Stable lowercase name used in preview names and documents
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Box => "box",
            ShapeKind::Sphere => "sphere",
            ShapeKind::Cylinder => "cylinder",
        }
    }
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a [`Visual`] publish means for the named descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisualAction {
    /// First appearance of the descriptor
    Create,
    /// Overwrite of the descriptor's current state
    Update,
    /// Retraction of the descriptor
    Delete,
}

/// World pose carried inside messages
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseMsg {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Default for PoseMsg {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }
}

/// Transient visual descriptor
///
/// Republished idempotently per drag sample; the same `name` always refers
/// to the same on-screen object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visual {
    pub name: String,
    pub action: VisualAction,
    pub pose: PoseMsg,
    pub scale: Vec3,
    pub geometry: ShapeKind,
    /// Material script name
    pub material: String,
}

impl Visual {
    /// Create a descriptor with default pose and unit scale
    pub fn new(name: impl Into<String>, geometry: ShapeKind, material: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            action: VisualAction::Create,
            pose: PoseMsg::default(),
            scale: Vec3::ONE,
            geometry,
            material: material.into(),
        }
    }
}

/// Wall-clock timestamp: seconds and nanoseconds since the epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stamp {
    pub sec: u64,
    pub nsec: u32,
}

impl Stamp {
    /// The current wall-clock time
    pub fn now() -> Self {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self {
            sec: elapsed.as_secs(),
            nsec: elapsed.subsec_nanos(),
        }
    }
}

/// Geometry of a collision or visual element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryDoc {
    Box { size: Vec3 },
    Sphere { radius: f32 },
    Cylinder { radius: f32, length: f32 },
}

impl GeometryDoc {
    /// Derive the geometry for a shape sized by a uniform preview scale
    ///
    /// Boxes keep the full extent; spheres and cylinders use half the extent
    /// as their radius, cylinders the vertical extent as their length.
    pub fn from_scale(kind: ShapeKind, scale: Vec3) -> Self {
        match kind {
            ShapeKind::Box => GeometryDoc::Box { size: scale },
            ShapeKind::Sphere => GeometryDoc::Sphere {
                radius: scale.x * 0.5,
            },
            ShapeKind::Cylinder => GeometryDoc::Cylinder {
                radius: scale.x * 0.5,
                length: scale.z,
            },
        }
    }
}

/// Mass properties of a link
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InertialDoc {
    pub mass: f32,
    pub ixx: f32,
    pub ixy: f32,
    pub ixz: f32,
    pub iyy: f32,
    pub iyz: f32,
    pub izz: f32,
}

impl Default for InertialDoc {
    fn default() -> Self {
        Self {
            mass: 1.0,
            ixx: 1.0,
            ixy: 0.0,
            ixz: 0.0,
            iyy: 1.0,
            iyz: 0.0,
            izz: 1.0,
        }
    }
}

/// Collision element of a link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionDoc {
    pub name: String,
    pub geometry: GeometryDoc,
}

/// Visual element of a link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualDoc {
    pub name: String,
    pub cast_shadows: bool,
    pub geometry: GeometryDoc,
    pub material: String,
}

/// A single rigid link of a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkDoc {
    pub name: String,
    pub inertial: InertialDoc,
    pub collision: CollisionDoc,
    pub visual: VisualDoc,
}

/// Complete world-object description submitted for instantiation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDoc {
    pub name: String,
    pub pose: PoseMsg,
    pub link: LinkDoc,
}

/// One-shot factory submission wrapping a [`ModelDoc`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factory {
    /// Request identifier; no response is read back
    pub request_id: String,
    /// Creation timestamp
    pub stamp: Stamp,
    pub model: ModelDoc,
}

/// Failure to render a factory document
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to serialize factory document: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Factory {
    /// Render the human-readable document form of this submission
    pub fn to_document(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_from_scale() {
        let scale = Vec3::splat(3.0);
        assert_eq!(
            GeometryDoc::from_scale(ShapeKind::Box, scale),
            GeometryDoc::Box { size: scale }
        );
        assert_eq!(
            GeometryDoc::from_scale(ShapeKind::Sphere, scale),
            GeometryDoc::Sphere { radius: 1.5 }
        );
        assert_eq!(
            GeometryDoc::from_scale(ShapeKind::Cylinder, scale),
            GeometryDoc::Cylinder {
                radius: 1.5,
                length: 3.0
            }
        );
    }

    #[test]
    fn test_factory_document_round_trips_pose_and_size() {
        let pose = PoseMsg {
            position: Vec3::new(1.0, 1.0, 0.75),
            orientation: Quat::IDENTITY,
        };
        let factory = Factory {
            request_id: "new_sphere".to_string(),
            stamp: Stamp { sec: 42, nsec: 7 },
            model: ModelDoc {
                name: "user_sphere_0_model".to_string(),
                pose,
                link: LinkDoc {
                    name: "body".to_string(),
                    inertial: InertialDoc::default(),
                    collision: CollisionDoc {
                        name: "geom".to_string(),
                        geometry: GeometryDoc::Sphere { radius: 0.75 },
                    },
                    visual: VisualDoc {
                        name: "visual".to_string(),
                        cast_shadows: true,
                        geometry: GeometryDoc::Sphere { radius: 0.75 },
                        material: "grey".to_string(),
                    },
                },
            },
        };

        let document = factory.to_document().unwrap();
        let back: Factory = serde_json::from_str(&document).unwrap();
        assert_eq!(back, factory);
        assert_eq!(back.model.pose.position, pose.position);
    }

    #[test]
    fn test_visual_defaults() {
        let visual = Visual::new("user_box_3", ShapeKind::Box, "turquoise_glow_outline");
        assert_eq!(visual.action, VisualAction::Create);
        assert_eq!(visual.scale, Vec3::ONE);
        assert_eq!(visual.pose.orientation, Quat::IDENTITY);
    }

    #[test]
    fn test_stamp_now_is_sane() {
        let stamp = Stamp::now();
        // After 2020, before the heat death of the universe.
        assert!(stamp.sec > 1_577_836_800);
    }
}
