//! Frame driver: owns the root node, the drawing backend and the
//! per-frame bookkeeping between them.

use std::time::{Duration, Instant};

use lienzo_core::{is_positive, Color, Point, Rect, Size, Transform};

use crate::canvas::Canvas;
use crate::config::AppConfig;
use crate::error::{Result, SceneError};
use crate::image::{Image, ImageData, ImageRegistry};
use crate::node::Node;
use crate::render::{CachePool, RenderContext};

/// The scene application. Drives `update` and `render` over the node
/// tree once per frame against a window-sized canvas.
///
/// The coordinate space puts the origin at the window center and scales
/// so that `logical_screen_height` units always span the window
/// vertically, whatever the pixel size. Horizontal extent follows the
/// aspect ratio; [`App::screen_width`] reports it.
pub struct App<C: Canvas> {
    canvas: C,
    root: Node,
    cache_pool: CachePool,
    images: ImageRegistry,
    window_width: f32,
    window_height: f32,
    logical_screen_height: f32,
    frame_time: f32,
    background: Color,
    show_bounding_boxes: bool,
    window_width_changed: bool,
    window_height_changed: bool,
    closed: bool,
    last_frame: Option<Instant>,
}

impl<C: Canvas> App<C> {
    pub fn new(canvas: C, config: &AppConfig) -> Self {
        debug_assert!(config.window.width > 0, "invalid window width");
        debug_assert!(config.window.height > 0, "invalid window height");
        debug_assert!(
            is_positive(config.scene.logical_screen_height),
            "invalid logical screen height"
        );
        debug_assert!(
            is_positive(config.scene.frames_per_second),
            "invalid frame rate"
        );

        Self {
            canvas,
            root: Node::new(),
            cache_pool: CachePool::new(),
            images: ImageRegistry::new(),
            window_width: config.window.width as f32,
            window_height: config.window.height as f32,
            logical_screen_height: config.scene.logical_screen_height,
            frame_time: 1.0 / config.scene.frames_per_second,
            background: config.scene.background(),
            show_bounding_boxes: config.debug.show_bounding_boxes,
            window_width_changed: true,
            window_height_changed: true,
            closed: false,
            last_frame: None,
        }
    }

    pub fn canvas(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn root(&mut self) -> &mut Node {
        &mut self.root
    }

    pub fn images(&mut self) -> &mut ImageRegistry {
        &mut self.images
    }

    /// Upload pixels to the backend and register the resulting image.
    pub fn create_image(&mut self, data: &ImageData) -> Result<Image> {
        self.images.create(&mut self.canvas, data)
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_background(&mut self, background: Color) {
        self.background = background;
    }

    pub fn show_bounding_boxes(&self) -> bool {
        self.show_bounding_boxes
    }

    pub fn set_show_bounding_boxes(&mut self, show: bool) {
        self.show_bounding_boxes = show;
    }

    /// Seconds each frame of [`App::update_for`] advances the scene.
    pub fn frame_time(&self) -> f32 {
        self.frame_time
    }

    /// Request termination; the next update returns
    /// [`SceneError::Closed`].
    pub fn set_closed(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Report a window resize. Final transforms and on-screen state are
    /// recomputed on the next frame.
    pub fn set_window_size(&mut self, width: f32, height: f32) {
        debug_assert!(is_positive(width), "invalid window width");
        debug_assert!(is_positive(height), "invalid window height");

        if width != self.window_width {
            self.window_width = width;
            self.window_width_changed = true;
        }
        if height != self.window_height {
            self.window_height = height;
            self.window_height_changed = true;
        }
    }

    pub fn window_size(&self) -> Size {
        Size::new(self.window_width, self.window_height)
    }

    /// Logical screen width at the current aspect ratio.
    pub fn screen_width(&self) -> f32 {
        self.window_width * self.logical_screen_height / self.window_height
    }

    pub fn screen_height(&self) -> f32 {
        self.logical_screen_height
    }

    pub fn screen_size(&self) -> Size {
        Size::new(self.screen_width(), self.screen_height())
    }

    /// The visible area in scene coordinates, centered on the origin.
    pub fn screen_rect(&self) -> Rect {
        let size = self.screen_size();
        let mut rect = Rect::new(0.0, 0.0, size.width(), size.height());
        rect.set_center(Point::ORIGIN);
        rect
    }

    /// Advance the scene by `elapsed` seconds and draw one frame.
    pub fn update(&mut self, elapsed: f32) -> Result<()> {
        if self.closed {
            self.root.release_render_caches(&mut self.cache_pool);
            for id in self.cache_pool.drain_free() {
                self.canvas.drop_cache(id);
            }
            return Err(SceneError::Closed);
        }

        self.root.update(elapsed, elapsed, false);
        self.render_frame();
        self.images.sweep(&mut self.canvas);

        Ok(())
    }

    /// Run fixed frames until `seconds` of scene time have passed.
    pub fn update_for(&mut self, seconds: f32) -> Result<()> {
        debug_assert!(seconds >= 0.0, "invalid duration");

        let mut remaining = seconds;
        while is_positive(remaining) {
            let step = remaining.min(self.frame_time);
            self.update(step)?;
            remaining -= step;
        }

        Ok(())
    }

    /// How long to wait before the next frame to hold the configured
    /// rate. Measured from the previous call; the caller sleeps.
    pub fn pacing_wait(&mut self) -> Duration {
        let now = Instant::now();
        let wait = match self.last_frame {
            None => Duration::ZERO,
            Some(last) => {
                let frame_time = Duration::from_secs_f32(self.frame_time);
                frame_time.saturating_sub(now.duration_since(last))
            }
        };
        self.last_frame = Some(now);
        wait
    }

    fn render_frame(&mut self) {
        self.canvas
            .begin_frame(self.window_width, self.window_height, self.background);
        self.canvas.save();

        // Origin at the window center, logical units spanning the
        // window height.
        self.canvas.transform(&Transform::translate(
            self.window_width / 2.0,
            self.window_height / 2.0,
        ));
        let scale = self.window_height / self.logical_screen_height;
        self.canvas.transform(&Transform::scale(scale, scale));

        let mut context = RenderContext::new(
            &mut self.canvas,
            &mut self.cache_pool,
            self.window_width,
            self.window_height,
            self.window_width_changed,
            self.window_height_changed,
            self.show_bounding_boxes,
        );
        self.root.render(&mut context);

        self.canvas.restore();
        self.canvas.end_frame();

        self.window_width_changed = false;
        self.window_height_changed = false;
    }

    /// Draw the scene once into an off-screen frame buffer of the given
    /// pixel size and read the pixels back.
    pub fn render_to_image(&mut self, width: u32, height: u32) -> Result<ImageData> {
        debug_assert!(width > 0 && height > 0, "invalid frame buffer size");

        self.canvas.begin_frame_buffer(width, height)?;

        let old_size = (self.window_width, self.window_height);
        self.window_width = width as f32;
        self.window_height = height as f32;
        self.window_width_changed = true;
        self.window_height_changed = true;
        self.render_frame();
        (self.window_width, self.window_height) = old_size;
        self.window_width_changed = true;
        self.window_height_changed = true;

        self.canvas.end_frame_buffer()
    }
}
