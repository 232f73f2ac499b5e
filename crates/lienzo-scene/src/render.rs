//! Per-frame render traversal state and the display-list slot pool.

use lienzo_core::{BlendColor, Rect};

use crate::canvas::{CacheId, Canvas, TextMeasure};

/// Free-list of display-list slots. Slots are recycled, never garbage
/// collected: releasing a node's cache returns its slot here.
#[derive(Debug, Default)]
pub struct CachePool {
    next: u32,
    free: Vec<CacheId>,
}

impl CachePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a slot, reusing a released one when available.
    pub fn pull(&mut self) -> CacheId {
        self.free.pop().unwrap_or_else(|| {
            let id = CacheId(self.next);
            self.next += 1;
            log::debug!("allocated display-list slot {id:?}");
            id
        })
    }

    /// Return a slot for reuse.
    pub fn push(&mut self, id: CacheId) {
        debug_assert!(
            !self.free.contains(&id),
            "display-list slot released twice"
        );
        self.free.push(id);
    }

    /// Take every free slot out of the pool, so the backend resources
    /// behind them can be dropped.
    pub fn drain_free(&mut self) -> Vec<CacheId> {
        std::mem::take(&mut self.free)
    }

    /// Total slots ever allocated.
    pub fn allocated(&self) -> u32 {
        self.next
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }
}

/// Traversal state threaded through one render pass. Stack-like fields
/// (opacity, final scale, blend colors, scissor flag) are saved and
/// restored around each node, mirroring the tree nesting. Not persisted
/// across frames.
pub struct RenderContext<'a> {
    canvas: &'a mut dyn Canvas,
    cache_pool: &'a mut CachePool,
    window_rect: Rect,
    aspect_ratio: f32,
    final_scale_x: f32,
    final_scale_y: f32,
    opacity: f32,
    blend_colors: Vec<BlendColor>,
    window_width_changed: bool,
    window_height_changed: bool,
    scissor_enabled: bool,
    show_bounding_boxes: bool,
    render_off_screen: bool,
    invalidate_final_bounding_boxes: bool,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        canvas: &'a mut dyn Canvas,
        cache_pool: &'a mut CachePool,
        window_width: f32,
        window_height: f32,
        window_width_changed: bool,
        window_height_changed: bool,
        show_bounding_boxes: bool,
    ) -> Self {
        debug_assert!(window_width > 0.0, "invalid window width");
        debug_assert!(window_height > 0.0, "invalid window height");

        Self {
            canvas,
            cache_pool,
            window_rect: Rect::new(0.0, 0.0, window_width, window_height),
            aspect_ratio: window_width / window_height,
            final_scale_x: 1.0,
            final_scale_y: 1.0,
            opacity: 1.0,
            blend_colors: Vec::new(),
            window_width_changed,
            window_height_changed,
            scissor_enabled: false,
            show_bounding_boxes,
            render_off_screen: false,
            invalidate_final_bounding_boxes: false,
        }
    }

    pub fn canvas(&mut self) -> &mut dyn Canvas {
        &mut *self.canvas
    }

    pub fn measure(&self) -> &dyn TextMeasure {
        &*self.canvas
    }

    pub fn pull_cache(&mut self) -> CacheId {
        self.cache_pool.pull()
    }

    pub fn push_cache(&mut self, id: CacheId) {
        self.cache_pool.push(id);
    }

    #[inline]
    pub fn window_rect(&self) -> Rect {
        self.window_rect
    }

    #[inline]
    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    #[inline]
    pub fn final_scale_x(&self) -> f32 {
        self.final_scale_x
    }

    pub fn set_final_scale_x(&mut self, final_scale_x: f32) {
        self.final_scale_x = final_scale_x;
    }

    #[inline]
    pub fn final_scale_y(&self) -> f32 {
        self.final_scale_y
    }

    pub fn set_final_scale_y(&mut self, final_scale_y: f32) {
        self.final_scale_y = final_scale_y;
    }

    #[inline]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
    }

    #[inline]
    pub fn window_size_changed(&self) -> bool {
        self.window_width_changed || self.window_height_changed
    }

    #[inline]
    pub fn is_scissor_enabled(&self) -> bool {
        self.scissor_enabled
    }

    pub fn set_scissor_enabled(&mut self, enabled: bool) {
        self.scissor_enabled = enabled;
    }

    #[inline]
    pub fn show_bounding_boxes(&self) -> bool {
        self.show_bounding_boxes
    }

    #[inline]
    pub fn render_off_screen(&self) -> bool {
        self.render_off_screen
    }

    pub fn set_render_off_screen(&mut self, render_off_screen: bool) {
        self.render_off_screen = render_off_screen;
    }

    #[inline]
    pub fn invalidate_final_bounding_boxes(&self) -> bool {
        self.invalidate_final_bounding_boxes
    }

    pub fn set_invalidate_final_bounding_boxes(&mut self, invalidate: bool) {
        self.invalidate_final_bounding_boxes = invalidate;
    }

    pub fn blend_colors(&self) -> &[BlendColor] {
        &self.blend_colors
    }

    pub fn push_blend_color(&mut self, blend_color: BlendColor) {
        self.blend_colors.push(blend_color);
    }

    pub fn pop_blend_color(&mut self) {
        self.blend_colors.pop();
    }

    /// The active blend stack collapsed into one color and factor pair.
    pub fn blend_result(&self) -> BlendColor {
        BlendColor::fold(&self.blend_colors)
    }
}
