//! The scene-graph node: the central entity of the renderer.
//!
//! A node owns its shape groups, its actions and its children, and
//! caches everything derivable: local and final bounding boxes, the
//! local transform, the hidden flag and the display-list render cache.
//! Caches are invalidated synchronously by the setters that affect
//! them and recomputed lazily on the next query or render.

use std::f32::consts::PI;
use std::mem;

use lienzo_core::{
    approx_eq, is_positive, is_positive_zero, is_zero, BlendColor, Color, Point, Rect, Transform,
};

use crate::action::Action;
use crate::canvas::{CacheId, LineCap, LineJoin, Paint, TextMeasure};
use crate::image::ImageContent;
use crate::render::{CachePool, RenderContext};
use crate::shape_group::ShapeGroup;
use crate::text::TextContent;

const TWO_PI: f32 = 2.0 * PI;

#[cfg(feature = "render-cache")]
const RENDER_CACHE_ENABLED: bool = true;
#[cfg(not(feature = "render-cache"))]
const RENDER_CACHE_ENABLED: bool = false;

/// What a node draws besides its shape groups.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Pure container and shape-group holder.
    Group,
    Image(ImageContent),
    Text(TextContent),
}

/// A single entry in the scene graph.
#[derive(Debug)]
pub struct Node {
    position: Point,
    rotation_angle: f32,
    skew_x_angle: f32,
    skew_y_angle: f32,
    scale_x: f32,
    scale_y: f32,
    opacity: f32,
    blend_color: Color,
    blend_color_factor: f32,
    visible: bool,
    scissor_rect: Rect,
    tag: String,
    render_off_screen: bool,
    scale_with_aspect_ratio: bool,
    flip_x: bool,
    flip_y: bool,
    actions_speed: f32,
    actions_paused: bool,

    kind: NodeKind,
    shape_groups: Vec<ShapeGroup>,
    actions: Vec<Action>,
    children: Vec<Node>,

    bounding_box: Rect,
    final_bounding_box: Rect,
    transform: Transform,
    final_transform: Transform,
    cached_scale_x: f32,
    cached_scale_y: f32,
    hidden: bool,
    is_on_screen: bool,
    render_cache: Option<CacheId>,

    invalidate_bounding_box: bool,
    invalidate_render_cache: bool,
    invalidate_transform: bool,
    invalidate_hidden: bool,
    actions_running: bool,
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

impl Node {
    pub fn new() -> Self {
        Self::with_kind(NodeKind::Group)
    }

    pub fn with_kind(kind: NodeKind) -> Self {
        Self {
            position: Point::ORIGIN,
            rotation_angle: 0.0,
            skew_x_angle: 0.0,
            skew_y_angle: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            opacity: 1.0,
            blend_color: Color::WHITE,
            blend_color_factor: 0.0,
            visible: true,
            scissor_rect: Rect::default(),
            tag: String::new(),
            render_off_screen: false,
            scale_with_aspect_ratio: false,
            flip_x: false,
            flip_y: false,
            actions_speed: 1.0,
            actions_paused: false,
            kind,
            shape_groups: Vec::new(),
            actions: Vec::new(),
            children: Vec::new(),
            bounding_box: Rect::default(),
            final_bounding_box: Rect::default(),
            transform: Transform::IDENTITY,
            final_transform: Transform::IDENTITY,
            cached_scale_x: 1.0,
            cached_scale_y: 1.0,
            hidden: false,
            is_on_screen: false,
            render_cache: None,
            invalidate_bounding_box: true,
            invalidate_render_cache: true,
            invalidate_transform: true,
            invalidate_hidden: true,
            actions_running: false,
        }
    }

    pub fn image(content: ImageContent) -> Self {
        Self::with_kind(NodeKind::Image(content))
    }

    pub fn text(content: TextContent) -> Self {
        Self::with_kind(NodeKind::Text(content))
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn image_content(&self) -> Option<&ImageContent> {
        match &self.kind {
            NodeKind::Image(content) => Some(content),
            _ => None,
        }
    }

    /// Mutable image payload access. Conservatively invalidates the
    /// bounding box and render cache.
    pub fn image_content_mut(&mut self) -> Option<&mut ImageContent> {
        self.invalidate_bounding_box();
        match &mut self.kind {
            NodeKind::Image(content) => Some(content),
            _ => None,
        }
    }

    pub fn text_content(&self) -> Option<&TextContent> {
        match &self.kind {
            NodeKind::Text(content) => Some(content),
            _ => None,
        }
    }

    /// Mutable text payload access. Conservatively invalidates the
    /// bounding box and render cache.
    pub fn text_content_mut(&mut self) -> Option<&mut TextContent> {
        self.invalidate_bounding_box();
        match &mut self.kind {
            NodeKind::Text(content) => Some(content),
            _ => None,
        }
    }

    // ----- invalidation -----

    fn invalidate_bounding_box(&mut self) {
        self.invalidate_bounding_box = true;
        self.invalidate_render_cache();
    }

    fn invalidate_render_cache(&mut self) {
        self.invalidate_render_cache = true;
    }

    fn invalidate_transform(&mut self) {
        self.invalidate_transform = true;
    }

    fn invalidate_hidden(&mut self) {
        self.invalidate_hidden = true;
    }

    // ----- transform and visual properties -----

    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
        self.invalidate_transform();
    }

    #[inline]
    pub fn rotation_angle(&self) -> f32 {
        self.rotation_angle
    }

    /// Angle is radians in `[0, 2π)`.
    pub fn set_rotation_angle(&mut self, angle: f32) {
        debug_assert!((0.0..TWO_PI).contains(&angle), "invalid angle");

        self.rotation_angle = angle;
        self.invalidate_transform();
    }

    #[inline]
    pub fn skew_x_angle(&self) -> f32 {
        self.skew_x_angle
    }

    pub fn set_skew_x_angle(&mut self, angle: f32) {
        self.skew_x_angle = angle;
        self.invalidate_transform();
    }

    #[inline]
    pub fn skew_y_angle(&self) -> f32 {
        self.skew_y_angle
    }

    pub fn set_skew_y_angle(&mut self, angle: f32) {
        self.skew_y_angle = angle;
        self.invalidate_transform();
    }

    #[inline]
    pub fn scale_x(&self) -> f32 {
        self.scale_x
    }

    pub fn set_scale_x(&mut self, scale: f32) {
        debug_assert!(scale >= 0.0, "invalid scale x");

        self.scale_x = scale;
        self.invalidate_transform();
        self.invalidate_hidden();
    }

    #[inline]
    pub fn scale_y(&self) -> f32 {
        self.scale_y
    }

    pub fn set_scale_y(&mut self, scale: f32) {
        debug_assert!(scale >= 0.0, "invalid scale y");

        self.scale_y = scale;
        self.invalidate_transform();
        self.invalidate_hidden();
    }

    pub fn set_scale(&mut self, scale_x: f32, scale_y: f32) {
        self.set_scale_x(scale_x);
        self.set_scale_y(scale_y);
    }

    #[inline]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        debug_assert!((0.0..=1.0).contains(&opacity), "invalid opacity");

        self.opacity = opacity;
        self.invalidate_hidden();
        self.invalidate_render_cache();
    }

    pub fn blend_color(&self) -> (Color, f32) {
        (self.blend_color, self.blend_color_factor)
    }

    pub fn set_blend_color(&mut self, blend_color: Color, blend_factor: f32) {
        debug_assert!((0.0..=1.0).contains(&blend_factor), "invalid blend factor");

        self.blend_color = blend_color;
        self.blend_color_factor = blend_factor;
        self.invalidate_hidden();
        self.invalidate_render_cache();
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.invalidate_hidden();
    }

    pub fn scissor_rect(&self) -> Rect {
        self.scissor_rect
    }

    /// An empty rect disables scissoring.
    pub fn set_scissor_rect(&mut self, scissor_rect: Rect) {
        self.scissor_rect = scissor_rect;
    }

    #[inline]
    pub fn flip_x(&self) -> bool {
        self.flip_x
    }

    pub fn set_flip_x(&mut self, flip_x: bool) {
        self.flip_x = flip_x;
        self.invalidate_transform();
    }

    #[inline]
    pub fn flip_y(&self) -> bool {
        self.flip_y
    }

    pub fn set_flip_y(&mut self, flip_y: bool) {
        self.flip_y = flip_y;
        self.invalidate_transform();
    }

    #[inline]
    pub fn scale_with_aspect_ratio(&self) -> bool {
        self.scale_with_aspect_ratio
    }

    pub fn set_scale_with_aspect_ratio(&mut self, scale: bool) {
        self.scale_with_aspect_ratio = scale;
        self.invalidate_transform();
    }

    #[inline]
    pub fn render_off_screen(&self) -> bool {
        self.render_off_screen
    }

    /// Draw even when the final bounding box misses the viewport.
    pub fn set_render_off_screen(&mut self, render_off_screen: bool) {
        self.render_off_screen = render_off_screen;
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.tag = tag.into();
    }

    // ----- shape groups -----

    pub fn shape_groups(&self) -> &[ShapeGroup] {
        &self.shape_groups
    }

    pub fn add_shape_group(&mut self, shape_group: ShapeGroup) {
        self.shape_groups.push(shape_group);
        self.invalidate_bounding_box();
    }

    pub fn insert_shape_group(&mut self, index: usize, shape_group: ShapeGroup) {
        debug_assert!(index <= self.shape_groups.len(), "invalid shape group index");

        self.shape_groups.insert(index, shape_group);
        self.invalidate_bounding_box();
    }

    pub fn set_shape_group(&mut self, index: usize, shape_group: ShapeGroup) {
        debug_assert!(index < self.shape_groups.len(), "invalid shape group index");

        self.shape_groups[index] = shape_group;
        self.invalidate_bounding_box();
    }

    pub fn remove_shape_group(&mut self, index: usize) {
        debug_assert!(index < self.shape_groups.len(), "invalid shape group index");

        self.shape_groups.remove(index);
        self.invalidate_bounding_box();
    }

    pub fn release_shape_group(&mut self, index: usize) -> ShapeGroup {
        debug_assert!(index < self.shape_groups.len(), "invalid shape group index");

        let shape_group = self.shape_groups.remove(index);
        self.invalidate_bounding_box();
        shape_group
    }

    pub fn release_shape_groups(&mut self) -> Vec<ShapeGroup> {
        self.invalidate_bounding_box();
        mem::take(&mut self.shape_groups)
    }

    pub fn clear_shape_groups(&mut self) {
        self.shape_groups.clear();
        self.invalidate_bounding_box();
    }

    /// Mirror the node's content about the vertical axis.
    pub fn horizontal_flip_shape_groups(&mut self) {
        for shape_group in &mut self.shape_groups {
            shape_group.horizontal_flip();
        }
        self.invalidate_bounding_box();
    }

    /// Mirror the node's content about the horizontal axis.
    pub fn vertical_flip_shape_groups(&mut self) {
        for shape_group in &mut self.shape_groups {
            shape_group.vertical_flip();
        }
        self.invalidate_bounding_box();
    }

    // ----- actions -----

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Actions cannot be added while actions are running on this node.
    pub fn add_action(&mut self, action: Action) {
        debug_assert!(
            !self.actions_running,
            "actions can't be modified while they are running"
        );

        self.actions.push(action);
    }

    pub fn set_actions(&mut self, actions: Vec<Action>) {
        debug_assert!(
            !self.actions_running,
            "actions can't be modified while they are running"
        );

        self.actions = actions;
    }

    pub fn clear_actions(&mut self) {
        debug_assert!(
            !self.actions_running,
            "actions can't be modified while they are running"
        );

        self.actions.clear();
    }

    #[inline]
    pub fn actions_speed(&self) -> f32 {
        self.actions_speed
    }

    /// Multiplies the action time for this node and its subtree.
    pub fn set_actions_speed(&mut self, speed: f32) {
        debug_assert!(is_positive(speed), "invalid speed");
        debug_assert!(
            !self.actions_running,
            "actions can't be modified while they are running"
        );

        self.actions_speed = speed;
    }

    #[inline]
    pub fn actions_paused(&self) -> bool {
        self.actions_paused
    }

    pub fn set_actions_paused(&mut self, paused: bool) {
        debug_assert!(
            !self.actions_running,
            "actions can't be modified while they are running"
        );

        self.actions_paused = paused;
    }

    // ----- children -----

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child(&self, index: usize) -> &Node {
        debug_assert!(index < self.children.len(), "invalid child node index");
        &self.children[index]
    }

    pub fn child_mut(&mut self, index: usize) -> &mut Node {
        debug_assert!(index < self.children.len(), "invalid child node index");
        &mut self.children[index]
    }

    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn insert_child(&mut self, index: usize, child: Node) {
        debug_assert!(index <= self.children.len(), "invalid child node index");
        self.children.insert(index, child);
    }

    pub fn set_child(&mut self, index: usize, child: Node) {
        debug_assert!(index < self.children.len(), "invalid child node index");
        self.children[index] = child;
    }

    pub fn remove_child(&mut self, index: usize) {
        debug_assert!(index < self.children.len(), "invalid child node index");
        self.children.remove(index);
    }

    /// Detach a child, returning ownership to the caller.
    pub fn release_child(&mut self, index: usize) -> Node {
        debug_assert!(index < self.children.len(), "invalid child node index");
        self.children.remove(index)
    }

    pub fn release_children(&mut self) -> Vec<Node> {
        mem::take(&mut self.children)
    }

    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    /// Search direct children by tag.
    pub fn find_child(&self, tag: &str) -> Option<&Node> {
        self.children.iter().find(|child| child.tag == tag)
    }

    pub fn find_child_mut(&mut self, tag: &str) -> Option<&mut Node> {
        self.children.iter_mut().find(|child| child.tag == tag)
    }

    /// Breadth-biased recursive tag search: direct children first, then
    /// each child's subtree.
    pub fn find_child_recursive(&self, tag: &str) -> Option<&Node> {
        if let Some(child) = self.find_child(tag) {
            return Some(child);
        }

        self.children
            .iter()
            .find_map(|child| child.find_child_recursive(tag))
    }

    pub fn find_child_recursive_mut(&mut self, tag: &str) -> Option<&mut Node> {
        if self.children.iter().any(|child| child.tag == tag) {
            return self.find_child_mut(tag);
        }

        self.children
            .iter_mut()
            .find_map(|child| child.find_child_recursive_mut(tag))
    }

    // ----- cached queries -----

    /// The local bounding box, recomputed on demand from the shape
    /// groups and the node kind's content.
    pub fn bounding_box(&mut self, measure: &dyn TextMeasure) -> Rect {
        if self.invalidate_bounding_box {
            self.bounding_box = self.generate_bounding_box(measure);
            self.invalidate_bounding_box = false;
        }

        self.bounding_box
    }

    /// The world-space box from the last render pass that recomputed it.
    pub fn final_bounding_box(&self) -> Rect {
        self.final_bounding_box
    }

    /// Whether the last render pass found the node inside the viewport.
    pub fn is_on_screen(&self) -> bool {
        self.is_on_screen
    }

    fn generate_bounding_box(&mut self, measure: &dyn TextMeasure) -> Rect {
        let mut bounding_box = Rect::default();
        for shape_group in &mut self.shape_groups {
            bounding_box.join(&shape_group.bounding_box());
        }

        match &self.kind {
            NodeKind::Group => {}
            NodeKind::Image(content) => bounding_box.join(&content.rect()),
            NodeKind::Text(content) => content.join_bounding_box(&mut bounding_box, measure),
        }

        bounding_box
    }

    // ----- clone -----

    /// Deep copy: children are recursively cloned, actions restart with
    /// fresh timers, the render cache stays behind.
    pub fn deep_clone(&self) -> Node {
        Node {
            position: self.position,
            rotation_angle: self.rotation_angle,
            skew_x_angle: self.skew_x_angle,
            skew_y_angle: self.skew_y_angle,
            scale_x: self.scale_x,
            scale_y: self.scale_y,
            opacity: self.opacity,
            blend_color: self.blend_color,
            blend_color_factor: self.blend_color_factor,
            visible: self.visible,
            scissor_rect: self.scissor_rect,
            tag: self.tag.clone(),
            render_off_screen: self.render_off_screen,
            scale_with_aspect_ratio: self.scale_with_aspect_ratio,
            flip_x: self.flip_x,
            flip_y: self.flip_y,
            actions_speed: self.actions_speed,
            actions_paused: self.actions_paused,
            kind: self.kind.clone(),
            shape_groups: self.shape_groups.clone(),
            actions: self.actions.iter().map(Action::clone_action).collect(),
            children: self.children.iter().map(Node::deep_clone).collect(),
            bounding_box: self.bounding_box,
            final_bounding_box: self.final_bounding_box,
            transform: self.transform,
            final_transform: self.final_transform,
            cached_scale_x: self.cached_scale_x,
            cached_scale_y: self.cached_scale_y,
            hidden: self.hidden,
            is_on_screen: self.is_on_screen,
            render_cache: None,
            invalidate_bounding_box: self.invalidate_bounding_box,
            invalidate_render_cache: self.invalidate_render_cache
                || self.render_cache.is_some(),
            invalidate_transform: self.invalidate_transform,
            invalidate_hidden: self.invalidate_hidden,
            actions_running: false,
        }
    }

    // ----- update -----

    /// Advance actions and recurse. All actions across the subtree see
    /// the same elapsed time; a node's own actions run before its
    /// children's. Completed actions are removed.
    pub fn update(&mut self, elapsed: f32, mut actions_elapsed: f32, mut actions_paused: bool) {
        actions_paused |= self.actions_paused;

        if !actions_paused {
            actions_elapsed *= self.actions_speed;
            self.actions_running = true;

            let mut actions = mem::take(&mut self.actions);
            actions.retain_mut(|action| !action.run(actions_elapsed, self));
            debug_assert!(
                self.actions.is_empty(),
                "actions can't be modified while they are running"
            );
            self.actions = actions;

            self.actions_running = false;
        }

        for child in &mut self.children {
            child.update(elapsed, actions_elapsed, actions_paused);
        }
    }

    // ----- render -----

    fn update_hidden(&mut self) {
        if self.invalidate_hidden {
            self.hidden = !self.visible
                || is_positive_zero(self.scale_x)
                || is_positive_zero(self.scale_y)
                || is_positive_zero(self.opacity)
                || (is_positive(self.blend_color_factor) && !self.blend_color.is_visible());
            self.invalidate_hidden = false;
        }
    }

    fn update_transform(&mut self, context: &mut RenderContext<'_>) {
        let mut transform = Transform::IDENTITY;
        self.invalidate_transform = false;

        if self.flip_x || self.flip_y {
            let flip_scale_x = if self.flip_x { -1.0 } else { 1.0 };
            let flip_scale_y = if self.flip_y { -1.0 } else { 1.0 };
            transform.premultiply(&Transform::scale(flip_scale_x, flip_scale_y));
        }

        if !is_zero(self.position.x) || !is_zero(self.position.y) {
            transform.premultiply(&Transform::translate(self.position.x, self.position.y));
        }

        let mut scale_x = self.scale_x;
        if self.scale_with_aspect_ratio {
            scale_x *= context.aspect_ratio();
        }

        if !approx_eq(scale_x, 1.0) || !approx_eq(self.scale_y, 1.0) {
            context.set_final_scale_x(context.final_scale_x() * scale_x);
            context.set_final_scale_y(context.final_scale_y() * self.scale_y);
            transform.premultiply(&Transform::scale(scale_x, self.scale_y));
        }

        if !is_zero(self.rotation_angle) {
            transform.premultiply(&Transform::rotate(self.rotation_angle));
        }

        if !is_zero(self.skew_x_angle) {
            transform.premultiply(&Transform::skew_x(self.skew_x_angle));
        }

        if !is_zero(self.skew_y_angle) {
            transform.premultiply(&Transform::skew_y(self.skew_y_angle));
        }

        self.transform = transform;
    }

    fn render_cache_available(&self, context: &RenderContext<'_>) -> bool {
        let base = !self.flip_x && !self.flip_y && !context.is_scissor_enabled();
        match &self.kind {
            NodeKind::Text(content) => base && content.render_cache_available(context.opacity()),
            _ => base,
        }
    }

    fn render_itself(&self, context: &mut RenderContext<'_>) {
        match &self.kind {
            NodeKind::Group => {}
            NodeKind::Image(content) => content.render(context),
            NodeKind::Text(content) => content.render(context),
        }

        for shape_group in &self.shape_groups {
            shape_group.render(context);
        }
    }

    /// Recursive render traversal. Depth-first pre-order; z-order is
    /// child-list order.
    pub fn render(&mut self, context: &mut RenderContext<'_>) {
        let old_invalidate_final = context.invalidate_final_bounding_boxes();
        if old_invalidate_final {
            self.invalidate_bounding_box = true;
        }

        self.update_hidden();

        if self.hidden {
            // Invalidation still reaches the subtree even though the
            // hidden node renders nothing.
            if old_invalidate_final {
                for child in &mut self.children {
                    child.invalidate_bounding_box = true;
                }
            }
        } else {
            self.render_visible(context);
        }

        context.set_invalidate_final_bounding_boxes(old_invalidate_final);
    }

    fn render_visible(&mut self, context: &mut RenderContext<'_>) {
        let old_final_scale_x = context.final_scale_x();
        let old_final_scale_y = context.final_scale_y();
        let old_render_off_screen = context.render_off_screen();
        context.set_render_off_screen(old_render_off_screen || self.render_off_screen);

        if self.invalidate_transform || context.window_size_changed() {
            self.update_transform(context);
            context.set_invalidate_final_bounding_boxes(true);
        } else {
            context.set_final_scale_x(context.final_scale_x() * self.scale_x);
            context.set_final_scale_y(context.final_scale_y() * self.scale_y);
        }

        let invalidate_final = context.invalidate_final_bounding_boxes();
        let must_render_itself =
            self.is_on_screen || invalidate_final || context.render_off_screen();
        if must_render_itself || !self.children.is_empty() {
            context.canvas().save();

            let old_scissor_enabled = context.is_scissor_enabled();
            if !self.scissor_rect.is_empty() {
                let scissor_rect = self.scissor_rect;
                context.canvas().intersect_scissor(&scissor_rect);
                context.set_scissor_enabled(true);
            }

            let transform = self.transform;
            context.canvas().transform(&transform);

            let old_opacity = context.opacity();
            let new_opacity = old_opacity * self.opacity;
            context.set_opacity(new_opacity);

            let blend_color_enabled = is_positive(self.blend_color_factor);
            if blend_color_enabled {
                context.push_blend_color(BlendColor::new(
                    self.blend_color,
                    self.blend_color_factor,
                ));
            }

            if invalidate_final {
                self.final_transform = context.canvas().current_transform();
                let local_box = self.bounding_box(context.measure());
                self.final_bounding_box = local_box.transformed(&self.final_transform);
                self.is_on_screen = self
                    .final_bounding_box
                    .intersects(&context.window_rect());
            }

            if self.is_on_screen || context.render_off_screen() {
                self.render_content(context, new_opacity);

                if context.show_bounding_boxes() && !self.final_bounding_box.is_empty() {
                    self.render_bounding_box_overlay(context);
                }
            }

            for child in &mut self.children {
                child.render(context);
            }

            context.set_scissor_enabled(old_scissor_enabled);
            context.set_opacity(old_opacity);
            if blend_color_enabled {
                context.pop_blend_color();
            }

            context.canvas().restore();
        }

        context.set_final_scale_x(old_final_scale_x);
        context.set_final_scale_y(old_final_scale_y);
        context.set_render_off_screen(old_render_off_screen);
    }

    /// Draw the node's own content, through the display-list cache when
    /// the backend and the node's state allow it.
    fn render_content(&mut self, context: &mut RenderContext<'_>, opacity: f32) {
        if RENDER_CACHE_ENABLED
            && context.canvas().supports_cache()
            && self.render_cache_available(context)
        {
            let final_scale_x = context.final_scale_x();
            let final_scale_y = context.final_scale_y();

            if self.invalidate_render_cache
                || !approx_eq(self.cached_scale_x, final_scale_x)
                || !approx_eq(self.cached_scale_y, final_scale_y)
            {
                self.cached_scale_x = final_scale_x;
                self.cached_scale_y = final_scale_y;
                self.invalidate_render_cache = false;

                let cache_id = match self.render_cache {
                    Some(cache_id) => cache_id,
                    None => {
                        let cache_id = context.pull_cache();
                        self.render_cache = Some(cache_id);
                        cache_id
                    }
                };

                log::debug!(
                    "recording render cache {cache_id:?} at scale ({final_scale_x}, {final_scale_y})"
                );

                // Record at the accumulated scale so replay stays crisp.
                let canvas = context.canvas();
                canvas.save();
                canvas.reset_transform();
                canvas.transform(&Transform::scale(final_scale_x, final_scale_y));
                canvas.begin_cache(cache_id);
                self.render_itself(context);
                let canvas = context.canvas();
                canvas.end_cache();
                canvas.restore();
            }

            if let Some(cache_id) = self.render_cache {
                // Opacity is not baked into the cache; it applies as a
                // global alpha at replay time.
                let canvas = context.canvas();
                canvas.save();
                canvas.transform(&Transform::scale(
                    1.0 / final_scale_x,
                    1.0 / final_scale_y,
                ));
                canvas.global_alpha(opacity);
                canvas.replay_cache(cache_id);
                canvas.restore();
            }
        } else {
            if let Some(cache_id) = self.render_cache.take() {
                context.push_cache(cache_id);
                self.invalidate_render_cache = true;
            }

            context.canvas().global_alpha(opacity);
            self.render_itself(context);
        }
    }

    fn render_bounding_box_overlay(&self, context: &mut RenderContext<'_>) {
        let bounding_box = self.final_bounding_box;
        let canvas = context.canvas();
        canvas.save();
        canvas.reset_transform();
        canvas.begin_path();
        canvas.rect(&bounding_box);
        canvas.stroke(
            &Paint::Color(Color::BLACK.with_alpha(0.5)),
            1.0,
            LineCap::Butt,
            LineJoin::Round,
        );
        canvas.restore();
    }

    /// Return this subtree's display-list slots to the pool. Call
    /// before dropping a node that has been rendered with caching.
    pub fn release_render_caches(&mut self, pool: &mut CachePool) {
        if let Some(cache_id) = self.render_cache.take() {
            pool.push(cache_id);
            self.invalidate_render_cache = true;
        }

        for child in &mut self.children {
            child.release_render_caches(pool);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pen::Pen;
    use crate::shape::Shape;
    use crate::text::{Text, TextStyle};

    struct NullMeasure;

    impl TextMeasure for NullMeasure {
        fn text_bounds(&self, _style: &TextStyle, _text: &Text) -> Rect {
            Rect::default()
        }
    }

    fn circle_node(radius: f32) -> Node {
        let mut node = Node::new();
        node.add_shape_group(ShapeGroup::with_shape(
            Shape::ellipse(Point::ORIGIN, radius, radius),
            Pen::color(Color::WHITE),
        ));
        node
    }

    #[test]
    fn bounding_box_is_memoized() {
        let mut node = circle_node(10.0);
        let first = node.bounding_box(&NullMeasure);
        assert_eq!(first, node.bounding_box(&NullMeasure));
        assert_eq!(first, Rect::new(-10.0, -10.0, 20.0, 20.0));

        node.add_shape_group(ShapeGroup::with_shape(
            Shape::rect(Rect::new(0.0, 0.0, 30.0, 5.0)),
            Pen::color(Color::WHITE),
        ));
        assert_eq!(
            node.bounding_box(&NullMeasure),
            Rect::new(-10.0, -10.0, 40.0, 20.0)
        );
    }

    #[test]
    fn deep_clone_is_structurally_independent() {
        let mut original = Node::new();
        let mut child = circle_node(5.0);
        child.set_tag("ball");
        original.add_child(child);
        original.add_child(Node::new());
        original.add_action(Action::wait(1.0));

        let mut clone = original.deep_clone();
        clone
            .find_child_mut("ball")
            .unwrap()
            .set_position(Point::new(100.0, 0.0));

        assert_eq!(
            original.find_child("ball").unwrap().position(),
            Point::ORIGIN
        );
        assert_eq!(clone.children().len(), 2);
        assert_eq!(clone.actions().len(), 1);
    }

    #[test]
    fn clone_mid_action_gets_fresh_timers() {
        let mut original = Node::new();
        original.add_action(Action::wait(1.0));
        original.update(0.9, 0.9, false);
        assert_eq!(original.actions().len(), 1);

        let mut clone = original.deep_clone();
        clone.update(0.5, 0.5, false);
        // A fresh timer has 0.5 left; the original's would be done.
        assert_eq!(clone.actions().len(), 1);
        original.update(0.5, 0.5, false);
        assert!(original.actions().is_empty());
    }

    #[test]
    fn update_removes_completed_actions() {
        let mut node = Node::new();
        node.add_action(Action::wait(0.5));
        node.add_action(Action::wait(2.0));

        node.update(1.0, 1.0, false);
        assert_eq!(node.actions().len(), 1);
        node.update(1.0, 1.0, false);
        assert!(node.actions().is_empty());
    }

    #[test]
    fn actions_speed_scales_subtree_time() {
        let mut parent = Node::new();
        parent.set_actions_speed(2.0);
        let mut child = Node::new();
        child.add_action(Action::move_by(Point::new(10.0, 0.0), 1.0));
        parent.add_child(child);

        parent.update(0.25, 0.25, false);
        assert_eq!(parent.child(0).position(), Point::new(5.0, 0.0));
    }

    #[test]
    fn paused_actions_consume_no_time() {
        let mut node = Node::new();
        node.add_action(Action::move_by(Point::new(10.0, 0.0), 1.0));
        node.set_actions_paused(true);

        node.update(1.0, 1.0, false);
        assert_eq!(node.position(), Point::ORIGIN);

        node.set_actions_paused(false);
        node.update(1.0, 1.0, false);
        assert_eq!(node.position(), Point::new(10.0, 0.0));
    }

    #[test]
    fn recursive_tag_search_prefers_direct_children() {
        let mut root = Node::new();
        let mut branch = Node::new();
        let mut leaf = Node::new();
        leaf.set_tag("target");
        leaf.set_position(Point::new(1.0, 1.0));
        branch.add_child(leaf);
        root.add_child(branch);

        let mut direct = Node::new();
        direct.set_tag("target");
        direct.set_position(Point::new(2.0, 2.0));
        root.add_child(direct);

        assert!(root.find_child("missing").is_none());
        let found = root.find_child_recursive("target").unwrap();
        assert_eq!(found.position(), Point::new(2.0, 2.0));
    }

    #[test]
    #[should_panic(expected = "actions can't be modified")]
    fn adding_actions_while_running_is_rejected() {
        let mut node = Node::new();
        node.actions_running = true;
        node.add_action(Action::wait(1.0));
    }
}
