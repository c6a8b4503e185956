//! Canvases that are composited on top of the window background.

use std::ops::{Deref, DerefMut};

use glam::Vec2;
use smallvec::SmallVec;

use crate::{
    canvas::Canvas,
    error::Result,
    math::{Point, Rectangle},
};

/// Mirror a sprite when it's drawn.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flip {
    /// Draw as is.
    #[default]
    None,
    /// Mirror left and right.
    Horizontal,
    /// Mirror top and bottom.
    Vertical,
    /// Mirror both axes, same as rotating by 180 degrees.
    Both,
}

impl Flip {
    /// Whether the horizontal axis is mirrored.
    #[inline]
    #[must_use]
    pub const fn horizontal(self) -> bool {
        matches!(self, Self::Horizontal | Self::Both)
    }

    /// Whether the vertical axis is mirrored.
    #[inline]
    #[must_use]
    pub const fn vertical(self) -> bool {
        matches!(self, Self::Vertical | Self::Both)
    }
}

/// A canvas with a position, scale and rotation.
///
/// Dereferences to its [`Canvas`] for the pixels, blend mode, scaling quality and clipping.
///
/// # Example
///
/// ```
/// use spritewin::{BlendMode, Color, Sprite};
///
/// let mut sprite = Sprite::new(16, 16)?;
/// sprite.fill(Color::rgb(255, 64, 64));
/// sprite.set_blend_mode(BlendMode::Additive);
/// sprite.scale.x = 1.5;
///
/// assert_eq!(sprite.destination().size.x, 24);
/// # Ok::<(), spritewin::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Sprite {
    /// Pixels drawn for this sprite.
    canvas: Canvas,
    /// Top-left position in texture pixels.
    pub position: Point,
    /// Horizontal and vertical scaling factor.
    pub scale: Vec2,
    /// Clockwise rotation in degrees.
    pub rotation: f64,
    /// Point relative to the destination rectangle to rotate around.
    ///
    /// `None` rotates around the center.
    pub rotation_center: Option<Point>,
    /// Mirroring.
    pub flip: Flip,
    /// Sprites with a lower value are drawn first.
    pub z_order: i32,
    /// Hidden sprites are skipped when drawing.
    pub shown: bool,
}

impl Sprite {
    /// Create a transparent sprite.
    ///
    /// # Errors
    ///
    /// - When `width` or `height` is zero.
    #[inline]
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Ok(Self::from_canvas(Canvas::new(width, height)?))
    }

    /// Wrap an existing canvas.
    #[must_use]
    pub fn from_canvas(canvas: Canvas) -> Self {
        Self {
            canvas,
            position: Point::ZERO,
            scale: Vec2::ONE,
            rotation: 0.0,
            rotation_center: None,
            flip: Flip::None,
            z_order: 0,
            shown: true,
        }
    }

    /// Move the position by an offset.
    #[inline]
    pub fn move_by(&mut self, delta: Point) {
        self.position += delta;
    }

    /// Where the sprite will be drawn in texture pixels.
    ///
    /// The size is the source rectangle scaled, truncated toward zero.
    #[inline]
    #[must_use]
    pub fn destination(&self) -> Rectangle {
        let source = self.canvas.source_rect();
        let size = Point::new(
            (source.size.x as f32 * self.scale.x) as i32,
            (source.size.y as f32 * self.scale.y) as i32,
        );

        Rectangle::from_parts(self.position, size)
    }

    /// Point to rotate around, relative to the destination rectangle.
    #[inline]
    #[must_use]
    pub fn pivot(&self) -> Vec2 {
        self.rotation_center.map_or_else(
            || self.destination().size.as_vec2() / 2.0,
            |center| center.as_vec2(),
        )
    }

    /// Consume the sprite and return its pixels.
    #[inline]
    #[must_use]
    pub fn into_canvas(self) -> Canvas {
        self.canvas
    }
}

impl Deref for Sprite {
    type Target = Canvas;

    #[inline]
    fn deref(&self) -> &Canvas {
        &self.canvas
    }
}

impl DerefMut for Sprite {
    #[inline]
    fn deref_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }
}

/// Handle for a sprite added to a [`SpriteList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteId(u64);

/// Sprites owned by a window, kept in insertion order.
#[derive(Debug, Default)]
pub struct SpriteList {
    /// Next unique identifier.
    next_id: u64,
    /// All sprites with their handles.
    sprites: Vec<(SpriteId, Sprite)>,
}

impl SpriteList {
    /// Create an empty list.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sprite, returning the handle to access it later.
    pub fn add(&mut self, sprite: Sprite) -> SpriteId {
        let id = SpriteId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        self.sprites.push((id, sprite));

        id
    }

    /// Remove a sprite, its texture will be released on the next draw.
    pub fn remove(&mut self, id: SpriteId) -> Option<Sprite> {
        let index = self
            .sprites
            .iter()
            .position(|(sprite_id, _)| *sprite_id == id)?;

        Some(self.sprites.remove(index).1)
    }

    /// Reference to a sprite.
    #[inline]
    #[must_use]
    pub fn get(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites
            .iter()
            .find_map(|(sprite_id, sprite)| (*sprite_id == id).then_some(sprite))
    }

    /// Mutable reference to a sprite.
    #[inline]
    pub fn get_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        self.sprites
            .iter_mut()
            .find_map(|(sprite_id, sprite)| (*sprite_id == id).then_some(sprite))
    }

    /// Whether the handle still points to a sprite.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: SpriteId) -> bool {
        self.sprites.iter().any(|(sprite_id, _)| *sprite_id == id)
    }

    /// Amount of sprites, including hidden ones.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    /// Whether there are no sprites.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Remove all sprites.
    #[inline]
    pub fn clear(&mut self) {
        self.sprites.clear();
    }

    /// Iterate over all sprites in insertion order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (SpriteId, &Sprite)> {
        self.sprites.iter().map(|(id, sprite)| (*id, sprite))
    }

    /// Iterate mutably over all sprites in insertion order.
    #[inline]
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SpriteId, &mut Sprite)> {
        self.sprites.iter_mut().map(|(id, sprite)| (*id, sprite))
    }

    /// Handles of all sprites in insertion order.
    #[inline]
    pub fn ids(&self) -> impl Iterator<Item = SpriteId> + '_ {
        self.sprites.iter().map(|(id, _)| *id)
    }

    /// Shown sprites in the order they must be drawn.
    ///
    /// Sorted by z-order from low to high, sprites with the same z-order keep their insertion order.
    #[must_use]
    pub fn draw_order(&self) -> SmallVec<[(SpriteId, &Sprite); 16]> {
        let mut order: SmallVec<[(SpriteId, &Sprite); 16]> =
            self.iter().filter(|(_, sprite)| sprite.shown).collect();

        // Must be stable
        order.sort_by_key(|(_, sprite)| sprite.z_order);

        order
    }
}
