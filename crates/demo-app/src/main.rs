//! Headless demo: builds an animated scene and drives it for a few
//! seconds against the tracing backend.

use anyhow::Result;
use lienzo_core::{Color, Point, Rect, Size};
use lienzo_scene::image::ImageData;
use lienzo_scene::{
    Action, App, AppConfig, Node, Pen, PenKind, SceneError, Shape, ShapeGroup,
};

mod trace_canvas;
use trace_canvas::TraceCanvas;

fn checkerboard(size: u32, cell: u32) -> ImageData {
    let mut data = ImageData::new(size, size);
    let light = Color::from_u8(220, 220, 220, 255);
    let dark = Color::from_u8(60, 60, 60, 255);
    for y in 0..size {
        for x in 0..size {
            let even = ((x / cell) + (y / cell)) % 2 == 0;
            data.set_color(x, y, if even { light } else { dark });
        }
    }
    data
}

fn spinner() -> Node {
    let mut node = Node::new();
    node.set_tag("spinner");
    node.set_position(Point::new(-250.0, 0.0));

    let pen = Pen::new(PenKind::LinearGradient {
        start: Point::new(-60.0, -60.0),
        end: Point::new(60.0, 60.0),
        inner: Color::rgb(0.9, 0.3, 0.2),
        outer: Color::rgb(0.2, 0.3, 0.9),
    });
    let mut group = ShapeGroup::new(pen);
    group.add_shape(Shape::rounded_rect(
        Rect::new(-60.0, -60.0, 120.0, 120.0),
        12.0,
    ));
    group.add_hole_shape(Shape::circle(Point::ORIGIN, 25.0));
    node.add_shape_group(group);

    node.add_action(Action::repeat_forever(Action::rotate_by(
        std::f32::consts::PI,
        2.0,
    )));
    node
}

fn bouncer() -> Node {
    let mut node = Node::new();
    node.set_tag("bouncer");
    node.set_position(Point::new(250.0, -150.0));

    node.add_shape_group(ShapeGroup::with_shape(
        Shape::circle(Point::ORIGIN, 40.0),
        Pen::stroked(
            PenKind::Color {
                color: Color::rgb(0.3, 0.8, 0.4),
            },
            6.0,
        ),
    ));

    let fall = Action::move_by(Point::new(0.0, 300.0), 1.0);
    let bounce = Action::sequence(vec![fall.reversed(), fall]);
    node.add_action(Action::repeat_forever(bounce));
    node
}

fn run() -> Result<()> {
    let config = AppConfig::load();
    let mut app = App::new(TraceCanvas::new(), &config);

    let image_data = checkerboard(64, 8);
    let image = app.create_image(&image_data)?;
    let mut backdrop = Node::image(lienzo_scene::ImageContent::with_size(
        image,
        None,
        Size::new(400.0, 400.0),
    ));
    backdrop.set_opacity(0.35);

    let root = app.root();
    root.add_child(backdrop);
    root.add_child(spinner());
    root.add_child(bouncer());

    log::info!(
        "scene ready: screen {}x{}",
        app.screen_width(),
        app.screen_height()
    );

    match app.update_for(3.0) {
        Ok(()) => log::info!("ran 3 seconds of scene time"),
        Err(SceneError::Closed) => log::info!("scene closed"),
        Err(error) => return Err(error.into()),
    }

    let spinner = app
        .root()
        .find_child("spinner")
        .map(|node| node.rotation_angle());
    log::info!("spinner angle after run: {spinner:?}");

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    run()
}
