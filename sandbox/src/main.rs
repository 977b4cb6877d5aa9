//! Headless demonstration of the scene graph and interactive creation
//!
//! Builds a small typed hierarchy, drives one scripted creation gesture
//! through a [`ShapeMaker`], instantiates the resulting world-object
//! description back into the graph, and saves a snapshot.

use editor::{EditorEvent, EditorSettings, InputState, ShapeMaker};
use scene::core::entity::{print_tree, scoped_name, validate_graph};
use scene::prelude::*;
use tracing::info;
use winit::event::{ElementState, MouseButton};

fn main() {
    scene::init_logging();
    info!("Starting scene sandbox");

    let mut graph = SceneGraph::new();

    // A hand-built model the way the factory backend would assemble one.
    let root = graph.spawn("default", None);
    let model = graph.spawn("table", Some(root));
    graph.add_type(model, NodeType::Model);
    let link = graph.spawn("top", Some(model));
    graph.add_type(link, NodeType::Link);
    let collision = graph.spawn("geom", Some(link));
    graph.add_type(collision, NodeType::Collision);
    graph.add_type(collision, NodeType::BoxShape);
    if let Ok(t) = graph.query_one_mut::<&mut Transform>(model) {
        *t = Transform::from_position(Vec3::new(1.0, 2.0, 0.0))
            .with_scale(Vec3::new(1.5, 0.8, 0.7));
    }

    set_world(&mut graph, root, WorldId(1));
    info!(name = %scoped_name(&graph, collision), "Built demo hierarchy");
    print_tree(&graph, root);

    // Scripted creation gesture: press, size, release twice.
    let settings = EditorSettings::load().unwrap_or_default();
    let (visual_pub, visual_rx) = ChannelPublisher::unbounded();
    let (factory_pub, factory_rx) = ChannelPublisher::unbounded();
    let (event_pub, event_rx) = ChannelPublisher::<EditorEvent>::unbounded();
    let mut maker = ShapeMaker::new(
        ShapeKind::Sphere,
        &settings,
        Box::new(visual_pub),
        Box::new(factory_pub),
        Box::new(event_pub),
    );

    // Top-down orthographic viewpoint over a 10x10 patch of ground.
    let camera = Camera::orthographic(10.0, 1.0, 0.1, 100.0);
    let pose = GlobalTransform::from_matrix(
        Transform::from_position(Vec3::new(0.0, 0.0, 10.0)).to_matrix(),
    );
    let viewpoint = Viewpoint::new(camera, pose, Vec2::new(800.0, 800.0));

    let mut input = InputState::new();
    maker.start(Some(viewpoint));

    input.handle_cursor_moved(400.0, 400.0);
    let press = input.handle_mouse_button(MouseButton::Left, ElementState::Pressed);
    maker.on_mouse_push(&press);
    if let Some(drag) = input.handle_cursor_moved(480.0, 400.0) {
        maker.on_mouse_drag(&drag);
    }
    let release = input.handle_mouse_button(MouseButton::Left, ElementState::Released);
    maker.on_mouse_release(&release);

    input.handle_mouse_button(MouseButton::Left, ElementState::Pressed);
    if let Some(drag) = input.handle_cursor_moved(560.0, 400.0) {
        maker.on_mouse_drag(&drag);
    }
    let release = input.handle_mouse_button(MouseButton::Left, ElementState::Released);
    maker.on_mouse_release(&release);

    for visual in visual_rx.try_iter() {
        info!(name = %visual.name, action = ?visual.action, "Preview update");
    }
    for event in event_rx.try_iter() {
        info!(event = ?event, "Editor event");
    }

    // Instantiate the submitted description the way the backend would.
    if let Ok(factory) = factory_rx.try_recv() {
        match factory.to_document() {
            Ok(document) => info!("Factory submission:\n{document}"),
            Err(e) => tracing::error!("Failed to render factory document: {e}"),
        }
        spawn_from_factory(&mut graph, root, &factory);
    }

    print_tree(&graph, root);
    let issues = validate_graph(&graph);
    info!(issues, "Hierarchy validated");

    let snapshot = WorldSnapshot::from_graph(&graph);
    if let Err(e) = snapshot.save_to_file("sandbox_world.json") {
        tracing::error!("Failed to save snapshot: {e}");
    }
}

// Build the graph-side counterpart of a factory submission.
fn spawn_from_factory(graph: &mut SceneGraph, root: Entity, factory: &Factory) {
    let model = graph.spawn(factory.model.name.clone(), Some(root));
    graph.add_type(model, NodeType::Model);
    let link = graph.spawn(factory.model.link.name.clone(), Some(model));
    graph.add_type(link, NodeType::Link);
    let collision = graph.spawn(factory.model.link.collision.name.clone(), Some(link));
    graph.add_type(collision, NodeType::Collision);
    let visual = graph.spawn(factory.model.link.visual.name.clone(), Some(link));
    graph.add_type(visual, NodeType::Visual);
    info!(model = %scoped_name(graph, link), "Instantiated factory model");
}
