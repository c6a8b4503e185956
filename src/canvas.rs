//! Pixel buffer that is streamed to a texture when drawn.

use std::io::Cursor;

use imgref::ImgVec;
use png::{BitDepth, ColorType, Decoder, Transformations};

use crate::{
    color::Color,
    error::{Error, Result},
    math::{Point, Rectangle},
};

/// How the texture of a canvas is combined with what's already drawn.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Overwrite the destination, alpha is ignored.
    None,
    /// Regular alpha blending.
    #[default]
    Alpha,
    /// Add the color multiplied by its alpha to the destination.
    Additive,
    /// Multiply the destination by the color.
    Modulate,
}

/// Filtering used when the texture of a canvas is scaled.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalingQuality {
    /// Nearest neighbor sampling, keeps the pixels sharp.
    #[default]
    Nearest,
    /// Linear filtering.
    Linear,
}

/// Pixel buffer paired with a GPU texture.
///
/// Every time the window draws, the pixels of a dirty canvas are uploaded to its texture.
/// Any mutable access to the pixels marks the canvas dirty.
#[derive(Debug, Clone)]
pub struct Canvas {
    /// Raw pixels with the dimensions of the canvas.
    pixels: ImgVec<Color>,
    /// How the texture will be blended.
    blend_mode: BlendMode,
    /// How the texture will be filtered when scaled.
    scaling_quality: ScalingQuality,
    /// Section of the canvas that should be drawn.
    clipping: Rectangle,
    /// Pixels changed since the last upload.
    dirty: bool,
}

impl Canvas {
    /// Create a transparent canvas.
    ///
    /// The clipping rectangle covers the whole canvas.
    ///
    /// # Errors
    ///
    /// - When `width` or `height` is zero.
    #[inline]
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::with_clipping(width, height, Rectangle::new(0, 0, width as i32, height as i32))
    }

    /// Create a transparent canvas with a custom clipping rectangle.
    ///
    /// # Errors
    ///
    /// - When `width` or `height` is zero.
    pub fn with_clipping(width: u32, height: u32, clipping: Rectangle) -> Result<Self> {
        let pixels = Self::allocate(width, height)?;

        Ok(Self {
            pixels,
            blend_mode: BlendMode::default(),
            scaling_quality: ScalingQuality::default(),
            clipping,
            dirty: true,
        })
    }

    /// Decode a PNG image into a new canvas.
    ///
    /// Indexed, grayscale and RGB images are normalized to 8 bit RGBA.
    ///
    /// # Errors
    ///
    /// - When the bytes are not a valid PNG.
    /// - When the image has a zero dimension.
    pub fn from_png(bytes: &[u8]) -> Result<Self> {
        let mut decoder = Decoder::new(Cursor::new(bytes));

        // Discard text chunks
        decoder.set_ignore_text_chunk(true);

        // Convert everything to 8 bits with an alpha channel
        decoder
            .set_transformations(Transformations::normalize_to_color8() | Transformations::ALPHA);

        let mut reader = decoder.read_info()?;

        let (color_type, bit_depth) = reader.output_color_type();
        if bit_depth != BitDepth::Eight {
            return Err(Error::UnsupportedPng {
                color_type,
                bit_depth,
            });
        }

        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf)?;
        let bytes = &buf[..info.buffer_size()];

        let colors: Vec<Color> = match color_type {
            ColorType::Rgba => bytes
                .chunks_exact(4)
                .map(|rgba| Color::new(rgba[0], rgba[1], rgba[2], rgba[3]))
                .collect(),
            ColorType::GrayscaleAlpha => bytes
                .chunks_exact(2)
                .map(|gray_alpha| {
                    Color::new(gray_alpha[0], gray_alpha[0], gray_alpha[0], gray_alpha[1])
                })
                .collect(),
            _ => {
                return Err(Error::UnsupportedPng {
                    color_type,
                    bit_depth,
                })
            }
        };

        log::debug!("Decoded PNG canvas of {}x{}", info.width, info.height);

        let mut canvas = Self::new(info.width, info.height)?;
        canvas.pixels.buf_mut().copy_from_slice(&colors);

        Ok(canvas)
    }

    /// Width in pixels.
    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixels.width() as u32
    }

    /// Height in pixels.
    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixels.height() as u32
    }

    /// Change the width, this clears the canvas.
    ///
    /// # Errors
    ///
    /// - When `width` is zero, the canvas is left untouched.
    #[inline]
    pub fn set_width(&mut self, width: u32) -> Result<()> {
        self.resize(width, self.height())
    }

    /// Change the height, this clears the canvas.
    ///
    /// # Errors
    ///
    /// - When `height` is zero, the canvas is left untouched.
    #[inline]
    pub fn set_height(&mut self, height: u32) -> Result<()> {
        self.resize(self.width(), height)
    }

    /// Change both dimensions, this clears the canvas.
    ///
    /// When the clipping rectangle covered the whole canvas it will cover the whole resized canvas, otherwise it's kept as is.
    ///
    /// # Errors
    ///
    /// - When `width` or `height` is zero, the canvas is left untouched.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        let pixels = Self::allocate(width, height)?;

        if self.clipping == self.full_rect() {
            self.clipping = Rectangle::new(0, 0, width as i32, height as i32);
        }

        self.pixels = pixels;
        self.dirty = true;

        Ok(())
    }

    /// Array index of a coordinate.
    ///
    /// Calculated as `width * y + x`, no bounds are checked.
    #[inline]
    #[must_use]
    pub fn index(&self, x: u32, y: u32) -> usize {
        self.pixels.width() * y as usize + x as usize
    }

    /// Array index of a point, `None` when the point is outside of the canvas.
    #[inline]
    #[must_use]
    pub fn index_of(&self, point: Point) -> Option<usize> {
        self.full_rect()
            .contains(point)
            .then(|| self.index(point.x as u32, point.y as u32))
    }

    /// Color of a single pixel, `None` when out of bounds.
    #[inline]
    #[must_use]
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index_of(Point::new(x, y))
            .map(|index| self.pixels.buf()[index])
    }

    /// Set a single pixel.
    ///
    /// Returns `false` and does nothing when the coordinate is out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) -> bool {
        let Some(index) = self.index_of(Point::new(x, y)) else {
            return false;
        };

        self.pixels.buf_mut()[index] = color;
        self.dirty = true;

        true
    }

    /// All pixels, row by row.
    #[inline]
    #[must_use]
    pub fn pixels(&self) -> &[Color] {
        self.pixels.buf()
    }

    /// All pixels, row by row, for writing.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Color] {
        self.dirty = true;

        self.pixels.buf_mut()
    }

    /// Set every pixel to the same color.
    #[inline]
    pub fn fill(&mut self, color: Color) {
        self.pixels_mut().fill(color);
    }

    /// How the texture will be blended.
    #[inline]
    #[must_use]
    pub const fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    /// Set how the texture will be blended.
    #[inline]
    pub fn set_blend_mode(&mut self, blend_mode: BlendMode) {
        self.blend_mode = blend_mode;
    }

    /// Filtering used when the texture is scaled.
    #[inline]
    #[must_use]
    pub const fn scaling_quality(&self) -> ScalingQuality {
        self.scaling_quality
    }

    /// Set the filtering used when the texture is scaled.
    #[inline]
    pub fn set_scaling_quality(&mut self, scaling_quality: ScalingQuality) {
        self.scaling_quality = scaling_quality;
    }

    /// Section of the canvas that will be drawn.
    #[inline]
    #[must_use]
    pub const fn clipping(&self) -> Rectangle {
        self.clipping
    }

    /// Set the section of the canvas that will be drawn.
    ///
    /// A zero width or height draws the whole canvas.
    #[inline]
    pub fn set_clipping(&mut self, clipping: Rectangle) {
        self.clipping = clipping;
    }

    /// Mutable reference to the section of the canvas that will be drawn.
    #[inline]
    pub fn clipping_mut(&mut self) -> &mut Rectangle {
        &mut self.clipping
    }

    /// Section of the texture that's actually copied when drawing.
    ///
    /// This is the clipping rectangle cut to the canvas bounds, unless its width or height is zero, in which case it's the whole canvas.
    /// When the clipping doesn't overlap the canvas, or has a negative size, the result is empty and nothing is drawn.
    #[inline]
    #[must_use]
    pub fn source_rect(&self) -> Rectangle {
        if self.clipping.size.x == 0 || self.clipping.size.y == 0 {
            self.full_rect()
        } else {
            self.clipping.intersection(&self.full_rect())
        }
    }

    /// Whether the pixels changed since the last upload.
    #[inline]
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Pixels have been uploaded.
    #[inline]
    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Rectangle covering every pixel.
    #[inline]
    fn full_rect(&self) -> Rectangle {
        Rectangle::new(0, 0, self.width() as i32, self.height() as i32)
    }

    /// Validate the dimensions and create an empty buffer.
    fn allocate(width: u32, height: u32) -> Result<ImgVec<Color>> {
        Error::check_dimension("Width", i64::from(width))?;
        Error::check_dimension("Height", i64::from(height))?;

        let (width, height) = (width as usize, height as usize);

        Ok(ImgVec::new(
            vec![Color::TRANSPARENT; width * height],
            width,
            height,
        ))
    }
}

#[cfg(test)]
mod tests {
    use glam::IVec2;

    use super::{BlendMode, Canvas};
    use crate::{color::Color, error::Error, math::Rectangle};

    #[test]
    fn index_formula() {
        let canvas = Canvas::new(7, 3).unwrap();
        assert_eq!(canvas.index(0, 0), 0);
        assert_eq!(canvas.index(6, 0), 6);
        assert_eq!(canvas.index(0, 1), 7);
        assert_eq!(canvas.index(3, 2), 7 * 2 + 3);

        assert_eq!(canvas.index_of(IVec2::new(3, 2)), Some(17));
        assert_eq!(canvas.index_of(IVec2::new(7, 0)), None);
        assert_eq!(canvas.index_of(IVec2::new(-1, 0)), None);
    }

    #[test]
    fn rejects_zero_dimensions() {
        assert!(matches!(
            Canvas::new(0, 10),
            Err(Error::InvalidDimension { what: "Width", .. })
        ));
        assert!(matches!(
            Canvas::new(10, 0),
            Err(Error::InvalidDimension { what: "Height", .. })
        ));

        let mut canvas = Canvas::new(2, 2).unwrap();
        assert!(canvas.set_height(0).is_err());
        assert_eq!((canvas.width(), canvas.height()), (2, 2));
        assert_eq!(canvas.pixels().len(), 4);
    }

    #[test]
    fn resize_clears() {
        let mut canvas = Canvas::new(4, 4).unwrap();
        canvas.fill(Color::WHITE);
        canvas.mark_clean();

        canvas.set_width(8).unwrap();
        assert_eq!(canvas.pixels().len(), 8 * 4);
        assert!(canvas.pixels().iter().all(|pixel| *pixel == Color::TRANSPARENT));
        assert!(canvas.is_dirty());

        // Full clipping grows with the canvas
        assert_eq!(canvas.clipping(), Rectangle::new(0, 0, 8, 4));

        // Custom clipping is kept
        canvas.set_clipping(Rectangle::new(1, 1, 2, 2));
        canvas.set_height(16).unwrap();
        assert_eq!(canvas.clipping(), Rectangle::new(1, 1, 2, 2));
    }

    #[test]
    fn pixel_access() {
        let mut canvas = Canvas::new(3, 3).unwrap();
        canvas.mark_clean();

        assert!(!canvas.set_pixel(3, 0, Color::WHITE));
        assert!(!canvas.is_dirty());

        assert!(canvas.set_pixel(1, 2, Color::WHITE));
        assert!(canvas.is_dirty());
        assert_eq!(canvas.pixel(1, 2), Some(Color::WHITE));
        assert_eq!(canvas.pixels()[canvas.index(1, 2)], Color::WHITE);
        assert_eq!(canvas.pixel(1, 3), None);
    }

    #[test]
    fn source_rect_fills_when_empty() {
        let mut canvas = Canvas::new(10, 20).unwrap();
        assert_eq!(canvas.source_rect(), Rectangle::new(0, 0, 10, 20));

        canvas.set_clipping(Rectangle::new(5, 5, 0, 3));
        assert_eq!(canvas.source_rect(), Rectangle::new(0, 0, 10, 20));

        canvas.clipping_mut().size.x = 2;
        assert_eq!(canvas.source_rect(), Rectangle::new(5, 5, 2, 3));
    }

    #[test]
    fn source_rect_is_cut_to_canvas() {
        let mut canvas = Canvas::new(10, 10).unwrap();

        canvas.set_clipping(Rectangle::new(8, 8, 50, 50));
        assert_eq!(canvas.source_rect(), Rectangle::new(8, 8, 2, 2));

        canvas.set_clipping(Rectangle::new(2, 2, -5, 4));
        assert!(canvas.source_rect().is_empty());

        canvas.set_clipping(Rectangle::new(10, 0, 4, 4));
        assert!(canvas.source_rect().is_empty());
    }

    #[test]
    fn defaults() {
        let canvas = Canvas::new(1, 1).unwrap();
        assert_eq!(canvas.blend_mode(), BlendMode::Alpha);
        assert!(canvas.is_dirty());
    }

    #[test]
    fn invalid_png() {
        assert!(matches!(
            Canvas::from_png(b"definitely not a png"),
            Err(Error::Png(..))
        ));
    }
}
