//! Vertices of a textured rectangle copied with a transformation.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use wgpu::{VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

use crate::{math::Rectangle, sprite::Flip};

/// Two triangles forming the rectangle.
pub(crate) const INDICES: &[u16] = &[0, 1, 2, 0, 2, 3];

/// Position with a UV coordinate for rendering a vertex with a texture.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub(crate) struct Vertex {
    /// Position in normalized device coordinates.
    pub(crate) position: [f32; 2],
    /// UV coordinate.
    pub(crate) uv: [f32; 2],
}

impl Vertex {
    /// WGPU descriptor.
    pub(crate) const fn descriptor() -> VertexBufferLayout<'static> {
        VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as u64,
            step_mode: VertexStepMode::Vertex,
            attributes: &[
                VertexAttribute {
                    format: VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 0,
                },
                VertexAttribute {
                    format: VertexFormat::Float32x2,
                    offset: std::mem::size_of::<[f32; 2]>() as u64,
                    shader_location: 1,
                },
            ],
        }
    }
}

/// How a section of a texture is copied to the render target.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TextureCopy {
    /// Section of the texture in texture pixels.
    pub(crate) source: Rectangle,
    /// Full size of the texture in pixels.
    pub(crate) texture_size: (u32, u32),
    /// Where the section is copied to, in target pixels.
    pub(crate) destination: Rectangle,
    /// Clockwise rotation in degrees.
    pub(crate) rotation: f64,
    /// Point to rotate around relative to the destination.
    pub(crate) pivot: Vec2,
    /// Mirroring of the texture.
    pub(crate) flip: Flip,
}

impl TextureCopy {
    /// Copy a texture section stretched over the whole target without any transformation.
    pub(crate) fn stretched(source: Rectangle, texture_size: (u32, u32), target_size: (u32, u32)) -> Self {
        Self {
            source,
            texture_size,
            destination: Rectangle::new(0, 0, target_size.0 as i32, target_size.1 as i32),
            rotation: 0.0,
            pivot: Vec2::ZERO,
            flip: Flip::None,
        }
    }

    /// Calculate the 4 vertices, clockwise from the top-left.
    ///
    /// The target size is the logical pixel size mapped to the whole surface.
    pub(crate) fn vertices(&self, target_size: (u32, u32)) -> [Vertex; 4] {
        let size = self.destination.size.as_vec2();
        let offset = self.destination.position.as_vec2();
        let target = Vec2::new(target_size.0 as f32, target_size.1 as f32);

        // Clockwise on screen because the Y axis points down
        let rotation = Vec2::from_angle(self.rotation.to_radians() as f32);

        let corners = [
            Vec2::ZERO,
            Vec2::new(size.x, 0.0),
            size,
            Vec2::new(0.0, size.y),
        ]
        .map(|corner| {
            let rotated = self.pivot + rotation.rotate(corner - self.pivot);
            let pixel = offset + rotated;

            // Map pixels to normalized device coordinates
            [pixel.x / target.x * 2.0 - 1.0, 1.0 - pixel.y / target.y * 2.0]
        });

        let [u0, v0, u1, v1] = self.uv_bounds();
        let uvs = [[u0, v0], [u1, v0], [u1, v1], [u0, v1]];

        [0, 1, 2, 3].map(|index| Vertex {
            position: corners[index],
            uv: uvs[index],
        })
    }

    /// Left, top, right and bottom texture coordinates, with the flip applied.
    fn uv_bounds(&self) -> [f32; 4] {
        let texture_width = self.texture_size.0 as f32;
        let texture_height = self.texture_size.1 as f32;

        let mut left = self.source.position.x as f32 / texture_width;
        let mut right = self.source.right() as f32 / texture_width;
        let mut top = self.source.position.y as f32 / texture_height;
        let mut bottom = self.source.bottom() as f32 / texture_height;

        if self.flip.horizontal() {
            std::mem::swap(&mut left, &mut right);
        }
        if self.flip.vertical() {
            std::mem::swap(&mut top, &mut bottom);
        }

        [left, top, right, bottom]
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::TextureCopy;
    use crate::{math::Rectangle, sprite::Flip};

    fn assert_close(actual: [f32; 2], expected: [f32; 2]) {
        assert!(
            (actual[0] - expected[0]).abs() < 1e-5 && (actual[1] - expected[1]).abs() < 1e-5,
            "{actual:?} != {expected:?}"
        );
    }

    #[test]
    fn stretched_covers_target() {
        let copy = TextureCopy::stretched(Rectangle::new(0, 0, 16, 8), (16, 8), (256, 196));
        let vertices = copy.vertices((256, 196));

        assert_close(vertices[0].position, [-1.0, 1.0]);
        assert_close(vertices[1].position, [1.0, 1.0]);
        assert_close(vertices[2].position, [1.0, -1.0]);
        assert_close(vertices[3].position, [-1.0, -1.0]);

        assert_close(vertices[0].uv, [0.0, 0.0]);
        assert_close(vertices[2].uv, [1.0, 1.0]);
    }

    #[test]
    fn clipped_source_uv() {
        let copy = TextureCopy::stretched(Rectangle::new(256, 0, 256, 512), (1024, 1024), (10, 10));
        let vertices = copy.vertices((10, 10));

        assert_close(vertices[0].uv, [0.25, 0.0]);
        assert_close(vertices[2].uv, [0.5, 0.5]);
    }

    #[test]
    fn flip_swaps_uv() {
        let mut copy = TextureCopy::stretched(Rectangle::new(0, 0, 4, 4), (4, 4), (4, 4));
        copy.flip = Flip::Horizontal;
        let vertices = copy.vertices((4, 4));
        assert_close(vertices[0].uv, [1.0, 0.0]);
        assert_close(vertices[1].uv, [0.0, 0.0]);

        copy.flip = Flip::Both;
        let vertices = copy.vertices((4, 4));
        assert_close(vertices[0].uv, [1.0, 1.0]);
    }

    #[test]
    fn rotates_clockwise_around_pivot() {
        let copy = TextureCopy {
            source: Rectangle::new(0, 0, 2, 2),
            texture_size: (2, 2),
            destination: Rectangle::new(2, 2, 2, 2),
            rotation: 90.0,
            pivot: Vec2::new(1.0, 1.0),
            flip: Flip::None,
        };
        let vertices = copy.vertices((8, 8));

        // Top-left corner (2, 2) ends up at the top-right (4, 2) after a clockwise quarter turn
        assert_close(vertices[0].position, [4.0 / 8.0 * 2.0 - 1.0, 1.0 - 2.0 / 8.0 * 2.0]);
        // Top-right corner (4, 2) ends up at the bottom-right (4, 4)
        assert_close(vertices[1].position, [4.0 / 8.0 * 2.0 - 1.0, 1.0 - 4.0 / 8.0 * 2.0]);
    }
}
