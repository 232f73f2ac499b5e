//! Image pixel buffers and reference-counted backend image handles.

use std::rc::Rc;

use lienzo_core::{Color, Rect, Size};

use crate::canvas::{Canvas, ImageHandle};
use crate::error::Result;

const BYTES_PER_PIXEL: usize = 4;

/// An owned RGBA8 pixel buffer, row-major (`y * width + x`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl ImageData {
    /// A zeroed (fully transparent) buffer.
    pub fn new(width: u32, height: u32) -> Self {
        debug_assert!(width > 0, "invalid width");
        debug_assert!(height > 0, "invalid height");

        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * BYTES_PER_PIXEL],
        }
    }

    pub fn from_bytes(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert!(width > 0, "invalid width");
        debug_assert!(height > 0, "invalid height");
        debug_assert!(
            data.len() == width as usize * height as usize * BYTES_PER_PIXEL,
            "pixel buffer size mismatch"
        );

        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width, "x coordinate out of bounds");
        debug_assert!(y < self.height, "y coordinate out of bounds");

        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }

    pub fn color(&self, x: u32, y: u32) -> Color {
        let offset = self.offset(x, y);
        let pixel = &self.data[offset..offset + BYTES_PER_PIXEL];
        Color::from_u8(pixel[0], pixel[1], pixel[2], pixel[3])
    }

    pub fn set_color(&mut self, x: u32, y: u32, color: Color) {
        let offset = self.offset(x, y);
        let pixel = &mut self.data[offset..offset + BYTES_PER_PIXEL];
        pixel[0] = (color.red() * 255.0) as u8;
        pixel[1] = (color.green() * 255.0) as u8;
        pixel[2] = (color.blue() * 255.0) as u8;
        pixel[3] = (color.alpha() * 255.0) as u8;
    }
}

#[derive(Debug)]
struct ImageInfo {
    handle: ImageHandle,
    width: u32,
    height: u32,
}

/// A shared handle to a backend image resource. Cloning shares the
/// handle; the resource is freed by [`ImageRegistry::sweep`] once every
/// clone outside the registry is gone.
#[derive(Debug, Clone)]
pub struct Image(Rc<ImageInfo>);

impl Image {
    #[inline]
    pub fn handle(&self) -> ImageHandle {
        self.0.handle
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.0.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.0.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.0.width as f32, self.0.height as f32)
    }

    /// Full-image region rect at the origin.
    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.0.width as f32, self.0.height as f32)
    }
}

impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        self.0.handle == other.0.handle
    }
}

/// Issues [`Image`] handles through the canvas and frees the backend
/// resources of handles nobody references any more.
#[derive(Default)]
pub struct ImageRegistry {
    images: Vec<Rc<ImageInfo>>,
}

impl ImageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, canvas: &mut dyn Canvas, data: &ImageData) -> Result<Image> {
        let handle = canvas.create_image(data)?;
        let info = Rc::new(ImageInfo {
            handle,
            width: data.width(),
            height: data.height(),
        });
        self.images.push(Rc::clone(&info));
        log::debug!(
            "created image {:?} ({}x{})",
            handle,
            data.width(),
            data.height()
        );
        Ok(Image(info))
    }

    /// Free backend resources for images only the registry still holds.
    pub fn sweep(&mut self, canvas: &mut dyn Canvas) {
        self.images.retain(|info| {
            if Rc::strong_count(info) == 1 {
                log::debug!("freeing unreferenced image {:?}", info.handle);
                canvas.delete_image(info.handle);
                false
            } else {
                true
            }
        });
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// The image payload of a node: a centered rect textured from a region
/// of an image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageContent {
    image: Image,
    image_region: Rect,
    rect: Rect,
    image_pattern_rect: Rect,
}

impl ImageContent {
    /// Show `image_region` of the image inside a centered rect of the
    /// given size.
    pub fn with_size(image: Image, image_region: Option<Rect>, size: Size) -> Self {
        let mut content = Self {
            image_region: Rect::default(),
            rect: Rect::default(),
            image_pattern_rect: Rect::default(),
            image,
        };
        content.set_image_region(image_region);
        content.set_size(size);
        content
    }

    /// Like [`ImageContent::with_size`], with the width derived from the
    /// region's aspect ratio.
    pub fn with_height(image: Image, image_region: Option<Rect>, height: f32) -> Self {
        let mut content = Self {
            image_region: Rect::default(),
            rect: Rect::default(),
            image_pattern_rect: Rect::default(),
            image,
        };
        content.set_image_region(image_region);
        content.set_height(height);
        content
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn image_region(&self) -> Rect {
        self.image_region
    }

    /// The centered rect the image draws into, in node-local space.
    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn set_size(&mut self, size: Size) {
        debug_assert!(!size.is_empty(), "size is empty");

        self.rect = Rect::new(
            size.width() * -0.5,
            size.height() * -0.5,
            size.width(),
            size.height(),
        );
        self.setup();
    }

    /// Set the height, keeping the region's aspect ratio for the width.
    pub fn set_height(&mut self, height: f32) {
        debug_assert!(lienzo_core::is_positive(height), "invalid height");

        let width = height * self.image_region.width() / self.image_region.height();
        self.set_size(Size::new(width, height));
    }

    /// `None` selects the whole image.
    pub fn set_image_region(&mut self, image_region: Option<Rect>) {
        let image_region = image_region.unwrap_or_else(|| self.image.rect());
        let image_width = self.image.width() as f32;
        let image_height = self.image.height() as f32;
        debug_assert!(
            image_region.x() >= 0.0 && image_region.x() < image_width,
            "invalid image region x coordinate"
        );
        debug_assert!(
            image_region.y() >= 0.0 && image_region.y() < image_height,
            "invalid image region y coordinate"
        );
        debug_assert!(
            image_region.x() + image_region.width() <= image_width,
            "invalid image region width"
        );
        debug_assert!(
            image_region.y() + image_region.height() <= image_height,
            "invalid image region height"
        );

        self.image_region = image_region;
        self.setup();
    }

    pub fn set_image(&mut self, image: Image, image_region: Option<Rect>) {
        self.image = image;
        self.set_image_region(image_region);
    }

    /// Derive the pattern rect that maps the selected region onto the
    /// node rect: the full image is positioned and scaled so the region
    /// lands exactly on the rect.
    fn setup(&mut self) {
        if self.image_region.is_empty() || self.rect.is_empty() {
            return;
        }

        self.image_pattern_rect = Rect::new(
            self.rect.x()
                - self.rect.width() * (self.image_region.x() / self.image_region.width()),
            self.rect.y()
                - self.rect.height() * (self.image_region.y() / self.image_region.height()),
            self.rect.width() * (self.image.width() as f32 / self.image_region.width()),
            self.rect.height() * (self.image.height() as f32 / self.image_region.height()),
        );
    }

    pub(crate) fn render(&self, context: &mut crate::render::RenderContext<'_>) {
        let paint = crate::canvas::Paint::ImagePattern {
            rect: self.image_pattern_rect,
            angle: 0.0,
            image: self.image.handle(),
            opacity: 1.0,
        };
        let rect = self.rect;
        let blend = (!context.blend_colors().is_empty()).then(|| context.blend_result());

        let canvas = context.canvas();
        canvas.begin_path();
        canvas.rect(&rect);
        canvas.fill(&paint);

        // Blend tint as a translucent quad over the textured rect.
        if let Some(blend) = blend {
            let mut color = blend.color;
            color.set_alpha(color.alpha() * blend.factor);
            canvas.begin_path();
            canvas.rect(&rect);
            canvas.fill(&crate::canvas::Paint::Color(color));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_major_indexing() {
        let mut data = ImageData::new(4, 2);
        let red = Color::from_u8(255, 0, 0, 255);
        data.set_color(3, 1, red);

        let offset = (1 * 4 + 3) * BYTES_PER_PIXEL;
        assert_eq!(data.bytes()[offset], 255);
        assert_eq!(data.bytes()[offset + 3], 255);
        assert_eq!(data.color(3, 1), red);
        assert_eq!(data.color(1, 1), Color::TRANSPARENT);
    }

    #[test]
    fn new_buffer_is_transparent() {
        let data = ImageData::new(2, 2);
        assert!(data.bytes().iter().all(|byte| *byte == 0));
        assert_eq!(data.bytes().len(), 16);
    }
}
