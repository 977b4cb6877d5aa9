//! Interactive primitive creation
//!
//! A [`ShapeMaker`] turns a press/drag/release pointer gesture into one
//! finalized world-object description. While the gesture is in flight it
//! republishes a transient preview descriptor every drag sample; on the
//! second release it submits the description to the factory backend once
//! and retracts the preview.
//!
//! Two releases are required to finalize so that the click selecting the
//! creation tool cannot itself place an object: the first release arms the
//! sizing drag, the second commits it.

use glam::{Vec2, Vec3};
use scene::core::camera::{Plane, Viewpoint};
use scene::msgs::{
    CollisionDoc, Factory, GeometryDoc, InertialDoc, LinkDoc, ModelDoc, ShapeKind, Stamp, Visual,
    VisualAction, VisualDoc,
};
use scene::transport::Publisher;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

use crate::events::EditorEvent;
use crate::input::MouseEvent;
use crate::settings::EditorSettings;

// One preview-name sequence per primitive kind, shared across all sessions
// and never reset.
static SEQUENCE_COUNTERS: [AtomicU64; 3] = [
    AtomicU64::new(0),
    AtomicU64::new(0),
    AtomicU64::new(0),
];

fn kind_index(kind: ShapeKind) -> usize {
    match kind {
        ShapeKind::Box => 0,
        ShapeKind::Sphere => 1,
        ShapeKind::Cylinder => 2,
    }
}

/// Generate a unique preview name for the given kind, e.g. `user_sphere_3`
pub fn next_preview_name(kind: ShapeKind) -> String {
    let n = SEQUENCE_COUNTERS[kind_index(kind)].fetch_add(1, Ordering::SeqCst);
    format!("user_{}_{}", kind, n)
}

/// Round each coordinate to the nearest multiple of `grid`
///
/// A grid of 0.0 (or less) disables snapping.
pub fn snap_point(point: Vec3, grid: f32) -> Vec3 {
    if grid <= 0.0 {
        return point;
    }
    (point / grid).round() * grid
}

/// Distance between two points in the ground plane
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(b.x - a.x, b.y - a.y).length()
}

/// Pose of an object of extent `scale` seated on the ground at `anchor`
pub fn seated_position(anchor: Vec3, scale: f32) -> Vec3 {
    Vec3::new(anchor.x, anchor.y, scale * 0.5)
}

/// Phase of a creation gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MakerPhase {
    /// No gesture in flight
    Idle,
    /// Tool engaged; no release seen yet
    Armed,
    /// Sizing drag in progress; the next release commits
    Dragging,
}

/// Reusable state machine creating one primitive per gesture
pub struct ShapeMaker {
    kind: ShapeKind,
    phase: MakerPhase,
    /// World-space point captured at drag start
    anchor: Option<Vec3>,
    /// The transient descriptor mutated each drag sample
    visual: Visual,
    viewpoint: Option<Viewpoint>,
    grid_snap: f32,
    preview_material: String,
    model_material: String,
    visual_pub: Box<dyn Publisher<Visual>>,
    factory_pub: Box<dyn Publisher<Factory>>,
    event_pub: Box<dyn Publisher<EditorEvent>>,
}

impl ShapeMaker {
    /// Create an idle maker for the given primitive kind
    pub fn new(
        kind: ShapeKind,
        settings: &EditorSettings,
        visual_pub: Box<dyn Publisher<Visual>>,
        factory_pub: Box<dyn Publisher<Factory>>,
        event_pub: Box<dyn Publisher<EditorEvent>>,
    ) -> Self {
        let visual = Visual::new(String::new(), kind, settings.creation.preview_material.clone());
        Self {
            kind,
            phase: MakerPhase::Idle,
            anchor: None,
            visual,
            viewpoint: None,
            grid_snap: settings.creation.grid_snap,
            preview_material: settings.creation.preview_material.clone(),
            model_material: settings.creation.model_material.clone(),
            visual_pub,
            factory_pub,
            event_pub,
        }
    }

    /// The primitive kind this maker creates
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Current gesture phase
    pub fn phase(&self) -> MakerPhase {
        self.phase
    }

    /// True while a gesture is in flight
    pub fn is_active(&self) -> bool {
        self.phase != MakerPhase::Idle
    }

    /// Arm a new creation gesture
    ///
    /// Names a fresh preview descriptor and records the active viewpoint.
    /// Nothing is published until the first drag sample.
    pub fn start(&mut self, viewpoint: Option<Viewpoint>) {
        self.viewpoint = viewpoint;
        self.visual = Visual::new(
            next_preview_name(self.kind),
            self.kind,
            self.preview_material.clone(),
        );
        self.anchor = None;
        self.phase = MakerPhase::Armed;
        debug!(kind = %self.kind, preview = %self.visual.name, "Creation gesture armed");
    }

    /// Cancel the gesture, retracting the preview
    ///
    /// Safe to call repeatedly: from Idle this publishes nothing.
    pub fn stop(&mut self) {
        if self.phase == MakerPhase::Idle {
            return;
        }

        let mut retract = self.visual.clone();
        retract.action = VisualAction::Delete;
        self.visual_pub.publish(retract);

        self.event_pub.publish(EditorEvent::MoveMode(true));
        self.phase = MakerPhase::Idle;
        self.anchor = None;
        debug!(kind = %self.kind, preview = %self.visual.name, "Creation gesture stopped");
    }

    /// Record the drag anchor from a button press
    ///
    /// No-ops while idle or when no viewpoint is available for projection.
    pub fn on_mouse_push(&mut self, event: &MouseEvent) {
        if self.phase == MakerPhase::Idle {
            return;
        }
        let Some(viewpoint) = self.viewpoint else {
            return;
        };
        if let Some(point) = viewpoint.world_point_on_plane(event.press_pos, Plane::ground()) {
            self.anchor = Some(point);
        }
    }

    /// Size the preview from the current drag sample
    ///
    /// Projects the pointer onto the ground plane, snaps anchor and pointer
    /// to the grid, and republishes the preview descriptor with the derived
    /// pose and uniform scale. An idempotent overwrite, not an
    /// accumulation; without a viewpoint the preview silently freezes.
    pub fn on_mouse_drag(&mut self, event: &MouseEvent) {
        if self.phase == MakerPhase::Idle {
            return;
        }
        let Some(viewpoint) = self.viewpoint else {
            return;
        };
        let ground = Plane::ground();

        let anchor = match self.anchor {
            Some(anchor) => anchor,
            // Press not routed here; fall back to the event's press position.
            None => match viewpoint.world_point_on_plane(event.press_pos, ground) {
                Some(anchor) => {
                    self.anchor = Some(anchor);
                    anchor
                }
                None => return,
            },
        };
        let Some(current) = viewpoint.world_point_on_plane(event.pos, ground) else {
            return;
        };

        let anchor = snap_point(anchor, self.grid_snap);
        let current = snap_point(current, self.grid_snap);
        let scale = planar_distance(anchor, current);

        self.visual.pose.position = seated_position(anchor, scale);
        self.visual.scale = Vec3::splat(scale);
        self.visual_pub.publish(self.visual.clone());
        self.visual.action = VisualAction::Update;
    }

    /// Advance the gesture on a button release
    ///
    /// The first release after [`start`](Self::start) arms the sizing drag;
    /// the second finalizes: the world-object description is submitted to
    /// the factory once, the preview is retracted, and the maker returns to
    /// Idle ready for the next gesture.
    pub fn on_mouse_release(&mut self, _event: &MouseEvent) {
        match self.phase {
            MakerPhase::Idle => {}
            MakerPhase::Armed => {
                self.phase = MakerPhase::Dragging;
            }
            MakerPhase::Dragging => {
                self.submit();
                self.stop();
            }
        }
    }

    // Build the permanent-object description from the current preview state
    // and hand it to the factory. Fire-and-forget; a zero-size object is
    // submitted as-is and left to the backend to accept or reject.
    fn submit(&self) {
        let geometry = GeometryDoc::from_scale(self.kind, self.visual.scale);
        let model = ModelDoc {
            name: format!("{}_model", self.visual.name),
            pose: self.visual.pose,
            link: LinkDoc {
                name: "body".to_string(),
                inertial: InertialDoc::default(),
                collision: CollisionDoc {
                    name: "geom".to_string(),
                    geometry,
                },
                visual: VisualDoc {
                    name: "visual".to_string(),
                    cast_shadows: true,
                    geometry,
                    material: self.model_material.clone(),
                },
            },
        };
        let factory = Factory {
            request_id: format!("new_{}", self.kind),
            stamp: Stamp::now(),
            model,
        };
        info!(
            kind = %self.kind,
            model = %factory.model.name,
            scale = self.visual.scale.x,
            "Submitting world-object description"
        );
        self.factory_pub.publish(factory);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene::core::camera::Camera;
    use scene::core::entity::{GlobalTransform, Transform};
    use scene::transport::MemoryPublisher;
    use winit::event::MouseButton;

    // Top-down orthographic viewpoint over a square viewport, chosen so a
    // screen coordinate (sx, sy) projects to world (sx - 1, 1 - sy, 0).
    fn top_down_viewpoint() -> Viewpoint {
        let camera = Camera::orthographic(2.0, 1.0, 0.1, 100.0);
        let pose = GlobalTransform::from_matrix(
            Transform::from_position(Vec3::new(0.0, 0.0, 10.0)).to_matrix(),
        );
        Viewpoint::new(camera, pose, Vec2::new(2.0, 2.0))
    }

    fn screen_for(world: Vec2) -> Vec2 {
        Vec2::new(world.x + 1.0, 1.0 - world.y)
    }

    struct Harness {
        maker: ShapeMaker,
        visuals: MemoryPublisher<Visual>,
        factories: MemoryPublisher<Factory>,
        events: MemoryPublisher<EditorEvent>,
    }

    fn harness(kind: ShapeKind, grid_snap: f32) -> Harness {
        let visuals = MemoryPublisher::new();
        let factories = MemoryPublisher::new();
        let events = MemoryPublisher::new();
        let mut settings = EditorSettings::default();
        settings.creation.grid_snap = grid_snap;
        let maker = ShapeMaker::new(
            kind,
            &settings,
            Box::new(visuals.clone()),
            Box::new(factories.clone()),
            Box::new(events.clone()),
        );
        Harness {
            maker,
            visuals,
            factories,
            events,
        }
    }

    fn press_at(world: Vec2) -> MouseEvent {
        let screen = screen_for(world);
        MouseEvent {
            pos: screen,
            press_pos: screen,
            button: MouseButton::Left,
        }
    }

    fn drag_to(press_world: Vec2, world: Vec2) -> MouseEvent {
        MouseEvent {
            pos: screen_for(world),
            press_pos: screen_for(press_world),
            button: MouseButton::Left,
        }
    }

    #[test]
    fn test_snap_point() {
        assert_eq!(
            snap_point(Vec3::new(1.23, 0.88, 0.0), 0.5),
            Vec3::new(1.0, 1.0, 0.0)
        );
        assert_eq!(
            snap_point(Vec3::new(2.7, 0.9, 0.0), 0.5),
            Vec3::new(2.5, 1.0, 0.0)
        );
        // Snapping disabled
        let raw = Vec3::new(1.23, 0.88, 0.0);
        assert_eq!(snap_point(raw, 0.0), raw);
    }

    #[test]
    fn test_planar_distance_ignores_height() {
        let a = Vec3::new(1.0, 1.0, 0.0);
        let b = Vec3::new(2.5, 1.0, 5.0);
        assert_eq!(planar_distance(a, b), 1.5);
    }

    #[test]
    fn test_seated_position() {
        assert_eq!(
            seated_position(Vec3::new(1.0, 1.0, 0.0), 1.5),
            Vec3::new(1.0, 1.0, 0.75)
        );
    }

    #[test]
    fn test_full_gesture_submits_once_with_last_drag_scale() {
        let mut h = harness(ShapeKind::Sphere, 0.5);
        let anchor_world = Vec2::new(1.23, 0.88);

        h.maker.start(Some(top_down_viewpoint()));
        assert_eq!(h.maker.phase(), MakerPhase::Armed);
        assert!(h.visuals.is_empty());

        h.maker.on_mouse_push(&press_at(anchor_world));
        h.maker
            .on_mouse_drag(&drag_to(anchor_world, Vec2::new(1.8, 0.9)));
        h.maker.on_mouse_release(&press_at(anchor_world));
        assert_eq!(h.maker.phase(), MakerPhase::Dragging);

        h.maker
            .on_mouse_drag(&drag_to(anchor_world, Vec2::new(2.7, 0.9)));
        h.maker.on_mouse_release(&press_at(anchor_world));
        assert_eq!(h.maker.phase(), MakerPhase::Idle);

        // Exactly one factory submission, sized by the last drag sample:
        // snapped anchor (1.0, 1.0), snapped pointer (2.5, 1.0), scale 1.5.
        let factories = h.factories.take();
        assert_eq!(factories.len(), 1);
        let model = &factories[0].model;
        assert!((model.pose.position - Vec3::new(1.0, 1.0, 0.75)).length() < 1e-4);
        match model.link.collision.geometry {
            GeometryDoc::Sphere { radius } => assert!((radius - 0.75).abs() < 1e-4),
            other => panic!("unexpected geometry: {other:?}"),
        }

        // Exactly one preview retraction, after two preview updates.
        let visuals = h.visuals.take();
        let deletes = visuals
            .iter()
            .filter(|v| v.action == VisualAction::Delete)
            .count();
        assert_eq!(deletes, 1);
        assert_eq!(visuals.len(), 3);
        assert_eq!(visuals[0].action, VisualAction::Create);
        assert_eq!(visuals[1].action, VisualAction::Update);
        assert!((visuals[1].scale.x - 1.5).abs() < 1e-4);

        // Commit returns the editor to move mode.
        assert_eq!(h.events.take(), vec![EditorEvent::MoveMode(true)]);
    }

    #[test]
    fn test_single_click_does_not_commit() {
        let mut h = harness(ShapeKind::Box, 0.0);
        h.maker.start(Some(top_down_viewpoint()));
        h.maker.on_mouse_push(&press_at(Vec2::ZERO));
        h.maker.on_mouse_release(&press_at(Vec2::ZERO));

        assert_eq!(h.maker.phase(), MakerPhase::Dragging);
        assert!(h.factories.is_empty());
    }

    #[test]
    fn test_zero_distance_commit_is_degenerate_but_accepted() {
        let mut h = harness(ShapeKind::Box, 0.0);
        let spot = Vec2::new(0.4, -0.2);

        h.maker.start(Some(top_down_viewpoint()));
        h.maker.on_mouse_push(&press_at(spot));
        h.maker.on_mouse_drag(&drag_to(spot, spot));
        h.maker.on_mouse_release(&press_at(spot));
        h.maker.on_mouse_release(&press_at(spot));

        let factories = h.factories.take();
        assert_eq!(factories.len(), 1);
        match factories[0].model.link.collision.geometry {
            GeometryDoc::Box { size } => assert!(size.length() < 1e-4),
            other => panic!("unexpected geometry: {other:?}"),
        }
        assert!((factories[0].model.pose.position.z).abs() < 1e-4);
    }

    #[test]
    fn test_stop_is_idempotent_from_idle() {
        let mut h = harness(ShapeKind::Cylinder, 0.0);
        h.maker.stop();
        h.maker.stop();
        assert!(h.visuals.is_empty());
        assert!(h.events.is_empty());
    }

    #[test]
    fn test_stop_cancels_without_submission() {
        let mut h = harness(ShapeKind::Cylinder, 0.0);
        h.maker.start(Some(top_down_viewpoint()));
        h.maker.on_mouse_push(&press_at(Vec2::ZERO));
        h.maker.on_mouse_drag(&drag_to(Vec2::ZERO, Vec2::new(0.5, 0.0)));
        h.maker.stop();

        assert!(h.factories.is_empty());
        let visuals = h.visuals.take();
        assert_eq!(
            visuals
                .iter()
                .filter(|v| v.action == VisualAction::Delete)
                .count(),
            1
        );
        assert_eq!(h.events.take(), vec![EditorEvent::MoveMode(true)]);
        assert!(!h.maker.is_active());
    }

    #[test]
    fn test_missing_viewpoint_freezes_preview() {
        let mut h = harness(ShapeKind::Sphere, 0.0);
        h.maker.start(None);
        h.maker.on_mouse_push(&press_at(Vec2::ZERO));
        h.maker.on_mouse_drag(&drag_to(Vec2::ZERO, Vec2::new(0.9, 0.0)));

        // No projection, no feedback, no fault.
        assert!(h.visuals.is_empty());
        assert!(h.maker.is_active());
    }

    #[test]
    fn test_preview_names_are_unique_and_monotonic() {
        let mut h = harness(ShapeKind::Box, 0.0);
        let mut previous = None;
        for _ in 0..3 {
            h.maker.start(Some(top_down_viewpoint()));
            h.maker.on_mouse_drag(&drag_to(Vec2::ZERO, Vec2::new(0.1, 0.0)));
            let visuals = h.visuals.take();
            let name = visuals[0].name.clone();
            let n: u64 = name.strip_prefix("user_box_").unwrap().parse().unwrap();
            if let Some(prev) = previous {
                assert!(n > prev);
            }
            previous = Some(n);
            h.maker.stop();
            let _ = h.visuals.take();
        }
    }

    #[test]
    fn test_drag_without_push_uses_event_press_position() {
        let mut h = harness(ShapeKind::Sphere, 0.5);
        h.maker.start(Some(top_down_viewpoint()));

        // No explicit push routed; the drag carries the press position.
        h.maker
            .on_mouse_drag(&drag_to(Vec2::new(1.23, 0.88), Vec2::new(2.7, 0.9)));

        let visuals = h.visuals.take();
        assert_eq!(visuals.len(), 1);
        assert!((visuals[0].scale.x - 1.5).abs() < 1e-4);
        assert!((visuals[0].pose.position - Vec3::new(1.0, 1.0, 0.75)).length() < 1e-4);
    }
}
