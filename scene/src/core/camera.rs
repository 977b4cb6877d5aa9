//! Camera component and viewpoint utilities
//!
//! Provides perspective and orthographic projections, view matrix
//! calculation from transforms, and viewport-to-world projection onto a
//! plane for interactive tooling.

use crate::core::entity::GlobalTransform;
use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Camera component that defines projection parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Camera {
    /// Field of view in radians (for perspective projection)
    pub fov_y_radians: f32,
    /// Aspect ratio (width / height)
    pub aspect_ratio: f32,
    /// Near clipping plane distance
    pub z_near: f32,
    /// Far clipping plane distance
    pub z_far: f32,
    /// Projection mode (perspective or orthographic)
    pub projection_mode: ProjectionMode,
}

/// Projection mode for the camera
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum ProjectionMode {
    /// Perspective projection with depth
    Perspective,
    /// Orthographic projection (parallel)
    Orthographic {
        /// Height of the orthographic view
        height: f32,
    },
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(60.0, 16.0 / 9.0, 0.1, 1000.0)
    }
}

impl Camera {
    /// Create a perspective camera
    pub fn perspective(fov_y_degrees: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        Self {
            fov_y_radians: fov_y_degrees.to_radians(),
            aspect_ratio,
            z_near,
            z_far,
            projection_mode: ProjectionMode::Perspective,
        }
    }

    /// Create an orthographic camera
    pub fn orthographic(height: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        Self {
            fov_y_radians: 0.0, // Not used for orthographic
            aspect_ratio,
            z_near,
            z_far,
            projection_mode: ProjectionMode::Orthographic { height },
        }
    }

    /// Calculate the projection matrix for this camera
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection_mode {
            ProjectionMode::Perspective => Mat4::perspective_rh(
                self.fov_y_radians,
                self.aspect_ratio,
                self.z_near,
                self.z_far,
            ),
            ProjectionMode::Orthographic { height } => {
                let half_height = height * 0.5;
                let half_width = half_height * self.aspect_ratio;
                Mat4::orthographic_rh(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    self.z_near,
                    self.z_far,
                )
            }
        }
    }

    /// Calculate the view matrix from a camera's global transform
    ///
    /// The view matrix is the inverse of the camera's world transform
    pub fn view_matrix(camera_transform: &GlobalTransform) -> Mat4 {
        camera_transform.matrix.inverse()
    }

    /// Calculate the combined view-projection matrix
    pub fn view_projection_matrix(&self, camera_transform: &GlobalTransform) -> Mat4 {
        self.projection_matrix() * Self::view_matrix(camera_transform)
    }

}

/// An infinite plane `normal · p + d = 0`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Plane {
    /// Plane normal
    pub normal: Vec3,
    /// Signed offset along the normal
    pub d: f32,
}

impl Plane {
    /// Create a plane from a normal and offset
    pub fn new(normal: Vec3, d: f32) -> Self {
        Self { normal, d }
    }

    /// The ground plane z = 0
    pub fn ground() -> Self {
        Self::new(Vec3::Z, 0.0)
    }
}

/// The active user viewpoint: a camera, its world pose, and the viewport
/// it renders into
#[derive(Debug, Clone, Copy)]
pub struct Viewpoint {
    /// Projection parameters
    pub camera: Camera,
    /// World pose of the camera
    pub pose: GlobalTransform,
    /// Viewport size in pixels
    pub viewport: Vec2,
}

impl Viewpoint {
    /// Create a viewpoint from camera, pose, and viewport size
    pub fn new(camera: Camera, pose: GlobalTransform, viewport: Vec2) -> Self {
        Self {
            camera,
            pose,
            viewport,
        }
    }

    /// Project a viewport coordinate onto a world-space plane
    ///
    /// `screen` is in pixels with the origin at the top-left. Returns `None`
    /// when the pick ray is parallel to the plane or the intersection lies
    /// behind the eye.
    pub fn world_point_on_plane(&self, screen: Vec2, plane: Plane) -> Option<Vec3> {
        if self.viewport.x <= 0.0 || self.viewport.y <= 0.0 {
            return None;
        }

        let ndc = Vec2::new(
            2.0 * screen.x / self.viewport.x - 1.0,
            1.0 - 2.0 * screen.y / self.viewport.y,
        );

        let inverse_vp = self.camera.view_projection_matrix(&self.pose).inverse();
        let near = inverse_vp.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inverse_vp.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        let direction = (far - near).normalize();

        let denom = plane.normal.dot(direction);
        if denom.abs() < 1e-4 {
            return None;
        }
        let t = -(plane.normal.dot(near) + plane.d) / denom;
        if t < 0.0 {
            return None;
        }
        Some(near + direction * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::Transform;

    // Camera 10 units above the origin, looking straight down at the ground.
    fn top_down(height: f32, viewport: Vec2) -> Viewpoint {
        let camera = Camera::orthographic(height, viewport.x / viewport.y, 0.1, 100.0);
        let pose = GlobalTransform::from_matrix(
            Transform::from_position(Vec3::new(0.0, 0.0, 10.0)).to_matrix(),
        );
        Viewpoint::new(camera, pose, viewport)
    }

    #[test]
    fn test_camera_perspective_projection() {
        let camera = Camera::perspective(60.0, 16.0 / 9.0, 0.1, 1000.0);
        let proj = camera.projection_matrix();

        // Perspective projection has w=0 in the last row
        assert_eq!(proj.w_axis.w, 0.0);
        assert!(proj.z_axis.z < 0.0);
    }

    #[test]
    fn test_camera_orthographic_projection() {
        let camera = Camera::orthographic(10.0, 16.0 / 9.0, 0.1, 1000.0);
        let proj = camera.projection_matrix();

        // Orthographic projection has w=1 in the last row
        assert_eq!(proj.w_axis.w, 1.0);
    }

    #[test]
    fn test_view_matrix() {
        let transform = Transform::from_position(Vec3::new(0.0, 0.0, 5.0));
        let global = GlobalTransform::from_matrix(transform.to_matrix());

        let view = Camera::view_matrix(&global);
        assert_eq!(view.w_axis.z, -5.0);
    }

    #[test]
    fn test_ground_projection_center() {
        let vp = top_down(10.0, Vec2::new(800.0, 800.0));
        let hit = vp
            .world_point_on_plane(Vec2::new(400.0, 400.0), Plane::ground())
            .unwrap();
        assert!(hit.distance(Vec3::ZERO) < 1e-4);
    }

    #[test]
    fn test_ground_projection_offset() {
        // Ortho height 10 on a square viewport: half-extent 5 in both axes.
        let vp = top_down(10.0, Vec2::new(800.0, 800.0));
        let hit = vp
            .world_point_on_plane(Vec2::new(600.0, 400.0), Plane::ground())
            .unwrap();
        assert!(hit.distance(Vec3::new(2.5, 0.0, 0.0)) < 1e-4);

        let hit = vp
            .world_point_on_plane(Vec2::new(400.0, 200.0), Plane::ground())
            .unwrap();
        assert!(hit.distance(Vec3::new(0.0, 2.5, 0.0)) < 1e-4);
    }

    #[test]
    fn test_parallel_ray_misses_plane() {
        // Camera looking along +X: the pick ray never crosses z = 0.
        let camera = Camera::orthographic(10.0, 1.0, 0.1, 100.0);
        let pose = GlobalTransform::from_matrix(
            Transform::from_position(Vec3::new(0.0, 0.0, 5.0))
                .looking_at(Vec3::new(10.0, 0.0, 5.0), Vec3::Z)
                .to_matrix(),
        );
        let vp = Viewpoint::new(camera, pose, Vec2::new(100.0, 100.0));

        assert!(vp
            .world_point_on_plane(Vec2::new(50.0, 50.0), Plane::ground())
            .is_none());
    }

    #[test]
    fn test_degenerate_viewport() {
        let vp = Viewpoint::new(Camera::default(), GlobalTransform::default(), Vec2::ZERO);
        assert!(vp
            .world_point_on_plane(Vec2::new(1.0, 1.0), Plane::ground())
            .is_none());
    }
}
