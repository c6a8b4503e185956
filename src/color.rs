//! Pixel color type shared by canvases and the GPU textures.

use bytemuck::{Pod, Zeroable};

/// Single pixel, stored as ARGB8888.
///
/// The memory layout is the little-endian byte order of a `0xAARRGGBB` integer, so a slice of colors can be uploaded as a BGRA texture without conversion.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Color {
    /// Blue channel.
    pub b: u8,
    /// Green channel.
    pub g: u8,
    /// Red channel.
    pub r: u8,
    /// Alpha channel, `0` is fully transparent.
    pub a: u8,
}

impl Color {
    /// Fully transparent black, the value new canvases are filled with.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(0xFF, 0xFF, 0xFF);

    /// Construct from all four channels.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { b, g, r, a }
    }

    /// Construct an opaque color.
    #[inline]
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 0xFF)
    }

    /// Construct from a `0xAARRGGBB` integer.
    #[inline]
    #[must_use]
    pub const fn from_argb(argb: u32) -> Self {
        let [b, g, r, a] = argb.to_le_bytes();

        Self { b, g, r, a }
    }

    /// Convert to a `0xAARRGGBB` integer.
    #[inline]
    #[must_use]
    pub const fn to_argb(self) -> u32 {
        u32::from_le_bytes([self.b, self.g, self.r, self.a])
    }

    /// Multiply the color channels by a factor, alpha is kept.
    ///
    /// Results are truncated and saturate at `255`.
    #[inline]
    #[must_use]
    pub fn scale_rgb(self, factor: f32) -> Self {
        let scale = |channel: u8| (f32::from(channel) * factor).clamp(0.0, 255.0) as u8;

        Self {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
            a: self.a,
        }
    }
}

impl From<u32> for Color {
    #[inline]
    fn from(argb: u32) -> Self {
        Self::from_argb(argb)
    }
}

impl From<Color> for u32 {
    #[inline]
    fn from(color: Color) -> Self {
        color.to_argb()
    }
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn argb_layout() {
        let color = Color::from_argb(0x80FF_4020);
        assert_eq!(color, Color::new(0xFF, 0x40, 0x20, 0x80));
        assert_eq!(color.to_argb(), 0x80FF_4020);

        // Memory order must match a little-endian ARGB8888 texture
        assert_eq!(bytemuck::bytes_of(&color), &[0x20, 0x40, 0xFF, 0x80]);
    }

    #[test]
    fn scale_keeps_alpha() {
        let darker = Color::new(100, 200, 255, 10).scale_rgb(0.8);
        assert_eq!(darker, Color::new(80, 160, 204, 10));

        assert_eq!(Color::rgb(200, 0, 0).scale_rgb(2.0).r, 255);
    }
}
