//! Simulation scene core
//!
//! This crate provides the scene-graph entity model used by the simulation:
//! typed nodes in an owned hierarchy, camera/viewpoint math, the message
//! descriptors exchanged with the rendering and factory backends, and the
//! fire-and-forget transport they travel over.

pub mod core;
pub mod io;
pub mod msgs;
pub mod transport;

// Re-export commonly used types
pub mod prelude {
    // Entity system types
    pub use crate::core::entity::{
        get_by_name, set_selected, set_world, Children, Entity, GlobalTransform, Name, NodeFlags,
        NodeId, NodeType, Parent, SceneGraph, Transform, TypeTags, WorldId,
    };

    // Camera types
    pub use crate::core::camera::{Camera, Plane, ProjectionMode, Viewpoint};

    // Math types
    pub use glam::{Mat4, Quat, Vec2, Vec3};

    // Message types
    pub use crate::msgs::{Factory, ModelDoc, ShapeKind, Visual, VisualAction};

    // Transport types
    pub use crate::transport::{ChannelPublisher, MemoryPublisher, Publisher};

    // IO types
    pub use crate::io::{SnapshotError, WorldSnapshot};
}

/// Initialize logging for the scene core
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
