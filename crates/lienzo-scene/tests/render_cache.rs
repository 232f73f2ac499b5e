//! Display-list render cache behavior against a cache-capable backend.

use anyhow::Result;
use lienzo_core::{Color, Point, Rect};
use lienzo_scene::{
    App, AppConfig, CachePool, Node, Pen, RenderContext, Shape, ShapeGroup,
};

mod common;
use common::{Event, RecordingCanvas};

fn circle_node(radius: f32) -> Node {
    let mut node = Node::new();
    node.add_shape_group(ShapeGroup::with_shape(
        Shape::circle(Point::ORIGIN, radius),
        Pen::color(Color::WHITE),
    ));
    node
}

fn cached_app() -> App<RecordingCanvas> {
    App::new(RecordingCanvas::with_cache(), &AppConfig::default())
}

#[test]
fn content_records_once_then_replays() -> Result<()> {
    let mut app = cached_app();
    app.root().add_child(circle_node(50.0));

    app.update(0.0)?;
    assert_eq!(app.canvas().cache_recordings(), 1);
    assert_eq!(app.canvas().cache_replays(), 1);
    assert_eq!(app.canvas().fills(), 1, "the recording itself fills once");

    app.canvas().clear();
    app.update(0.0)?;
    assert_eq!(app.canvas().cache_recordings(), 0, "second frame replays only");
    assert_eq!(app.canvas().cache_replays(), 1);
    assert_eq!(app.canvas().fills(), 0);
    Ok(())
}

#[test]
fn moving_a_node_does_not_rerecord() -> Result<()> {
    let mut app = cached_app();
    app.root().add_child(circle_node(50.0));
    app.update(0.0)?;

    app.canvas().clear();
    app.root().child_mut(0).set_position(Point::new(30.0, 0.0));
    app.update(0.0)?;
    assert_eq!(app.canvas().cache_recordings(), 0);
    assert_eq!(app.canvas().cache_replays(), 1);
    Ok(())
}

#[test]
fn scale_change_rerecords_at_the_new_scale() -> Result<()> {
    let mut app = cached_app();
    app.root().add_child(circle_node(50.0));
    app.update(0.0)?;

    app.canvas().clear();
    app.root().child_mut(0).set_scale(2.0, 2.0);
    app.update(0.0)?;
    assert_eq!(app.canvas().cache_recordings(), 1, "stale scale forces a re-record");
    assert_eq!(app.canvas().cache_replays(), 1);
    Ok(())
}

#[test]
fn opacity_change_applies_as_replay_alpha() -> Result<()> {
    let mut app = cached_app();
    app.root().add_child(circle_node(50.0));
    app.update(0.0)?;

    app.canvas().clear();
    app.root().child_mut(0).set_opacity(0.5);
    app.update(0.0)?;
    // Changing opacity conservatively re-records the slot, but the
    // recorded content itself carries no alpha: the new opacity reaches
    // the backend as a global alpha at replay time.
    assert_eq!(app.canvas().cache_recordings(), 1);
    assert_eq!(
        app.canvas()
            .count(|event| matches!(event, Event::GlobalAlpha(alpha) if *alpha == 0.5)),
        1
    );
    assert_eq!(app.canvas().cache_replays(), 1);
    Ok(())
}

#[test]
fn scissored_node_bypasses_the_cache() -> Result<()> {
    let mut app = cached_app();
    let mut node = circle_node(50.0);
    node.set_scissor_rect(Rect::new(-10.0, -10.0, 20.0, 20.0));
    app.root().add_child(node);

    app.update(0.0)?;
    app.canvas().clear();
    app.update(0.0)?;
    assert_eq!(app.canvas().cache_recordings(), 0);
    assert_eq!(app.canvas().cache_replays(), 0);
    assert_eq!(app.canvas().fills(), 1, "draws directly every frame");
    Ok(())
}

#[test]
fn flipped_node_bypasses_the_cache() -> Result<()> {
    let mut app = cached_app();
    let mut node = circle_node(50.0);
    node.set_flip_x(true);
    app.root().add_child(node);

    app.update(0.0)?;
    assert_eq!(app.canvas().cache_recordings(), 0);
    assert_eq!(app.canvas().fills(), 1);
    Ok(())
}

#[test]
fn closing_drops_recorded_backend_caches() -> Result<()> {
    let mut app = cached_app();
    app.root().add_child(circle_node(50.0));
    app.update(0.0)?;
    assert_eq!(app.canvas().cache_recordings(), 1);

    app.canvas().clear();
    app.set_closed();
    assert!(app.update(0.0).is_err());
    assert_eq!(
        app.canvas()
            .count(|event| matches!(event, Event::DropCache(_))),
        1,
        "the recorded slot's backend resources are freed on close"
    );

    // Already drained; a second refused update drops nothing more.
    assert!(app.update(0.0).is_err());
    assert_eq!(
        app.canvas()
            .count(|event| matches!(event, Event::DropCache(_))),
        1
    );
    Ok(())
}

#[test]
fn released_slots_are_reused() {
    let mut canvas = RecordingCanvas::with_cache();
    let mut pool = CachePool::new();

    let mut first = circle_node(20.0);
    let mut context = RenderContext::new(&mut canvas, &mut pool, 800.0, 600.0, true, true, false);
    first.render(&mut context);
    first.release_render_caches(&mut pool);
    assert_eq!(pool.free_count(), 1);

    let mut second = circle_node(30.0);
    let mut context = RenderContext::new(&mut canvas, &mut pool, 800.0, 600.0, true, true, false);
    second.render(&mut context);
    assert_eq!(pool.allocated(), 1, "the released slot is recycled");
    assert_eq!(pool.free_count(), 0);
}
