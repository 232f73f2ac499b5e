//! The frame driver: fixed-step time, actions through the tree,
//! window resizes and termination.

use anyhow::Result;
use lienzo_core::{Color, Point};
use lienzo_scene::{
    Action, App, AppConfig, Node, Pen, SceneError, Shape, ShapeGroup,
};

mod common;
use common::RecordingCanvas;

fn circle_node(radius: f32) -> Node {
    let mut node = Node::new();
    node.add_shape_group(ShapeGroup::with_shape(
        Shape::circle(Point::ORIGIN, radius),
        Pen::color(Color::WHITE),
    ));
    node
}

fn app() -> App<RecordingCanvas> {
    App::new(RecordingCanvas::new(), &AppConfig::default())
}

#[test]
fn update_for_advances_in_fixed_frames() -> Result<()> {
    let mut app = app();
    let mut node = circle_node(10.0);
    node.add_action(Action::move_by(Point::new(100.0, 0.0), 1.0));
    app.root().add_child(node);

    app.update_for(1.0)?;

    let position = app.root().child(0).position();
    assert!((position.x - 100.0).abs() < 1e-3, "moved {position:?}");

    // 60 fps over one second, plus at most one residue frame.
    let frames = app.canvas().frames();
    assert!((60..=61).contains(&frames), "ran {frames} frames");
    Ok(())
}

#[test]
fn paused_subtree_holds_still_through_frames() -> Result<()> {
    let mut app = app();
    let mut node = circle_node(10.0);
    node.add_action(Action::move_by(Point::new(100.0, 0.0), 1.0));
    node.set_actions_paused(true);
    app.root().add_child(node);

    app.update_for(1.0)?;
    assert_eq!(app.root().child(0).position(), Point::ORIGIN);

    app.root().child_mut(0).set_actions_paused(false);
    app.update_for(1.0)?;
    let position = app.root().child(0).position();
    assert!((position.x - 100.0).abs() < 1e-3, "moved {position:?}");
    Ok(())
}

#[test]
fn actions_speed_compresses_scene_time() -> Result<()> {
    let mut app = app();
    let mut node = circle_node(10.0);
    node.set_actions_speed(4.0);
    node.add_action(Action::move_by(Point::new(100.0, 0.0), 1.0));
    app.root().add_child(node);

    app.update_for(0.25)?;
    let position = app.root().child(0).position();
    assert!((position.x - 100.0).abs() < 1e-3, "moved {position:?}");
    Ok(())
}

#[test]
fn closed_app_stops_updating() {
    let mut app = app();
    app.set_closed();
    assert!(matches!(app.update(0.016), Err(SceneError::Closed)));
    assert!(matches!(app.update_for(1.0), Err(SceneError::Closed)));
}

#[test]
fn window_resize_recomputes_final_boxes() -> Result<()> {
    let mut app = app();
    app.root().add_child(circle_node(100.0));
    app.update(0.0)?;
    let before = app.root().child(0).final_bounding_box();

    app.set_window_size(1280.0, 1440.0);
    app.update(0.0)?;
    let after = app.root().child(0).final_bounding_box();

    // Doubling the window height doubles the device scale.
    assert!((after.width() - before.width() * 2.0).abs() < 1e-3);
    assert!((after.height() - before.height() * 2.0).abs() < 1e-3);
    Ok(())
}

#[test]
fn screen_rect_is_centered_and_aspect_correct() {
    let app = app();
    assert_eq!(app.screen_height(), 1000.0);
    let expected_width = 1280.0 * 1000.0 / 720.0;
    assert!((app.screen_width() - expected_width).abs() < 1e-3);

    let rect = app.screen_rect();
    assert_eq!(rect.center(), Point::ORIGIN);
    assert_eq!(rect.height(), 1000.0);
}

#[test]
fn render_to_image_needs_backend_support() {
    let mut app = app();
    assert!(matches!(
        app.render_to_image(64, 64),
        Err(SceneError::FrameBufferBuild(_))
    ));
}
