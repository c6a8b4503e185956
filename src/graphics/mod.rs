//! Types and helpers for drawing canvases on the GPU.

pub(crate) mod gpu;
pub(crate) mod pipeline;
pub(crate) mod quad;
pub(crate) mod texture;

use std::sync::Arc;

use miette::Result;
use smallvec::SmallVec;
use wgpu::util::DeviceExt as _;
use winit::window::Window;

use self::{
    gpu::Gpu,
    pipeline::Pipelines,
    quad::{TextureCopy, Vertex, INDICES},
    texture::{CanvasTexture, TextureBinding, TextureOwner},
};
use crate::{
    canvas::{BlendMode, Canvas, ScalingQuality},
    resources::ResourceManager,
    sprite::SpriteList,
};

/// A single textured rectangle queued for this frame.
struct DrawCall {
    /// Which texture to sample.
    owner: TextureOwner,
    /// How to blend.
    blend_mode: BlendMode,
    /// How to sample.
    scaling_quality: ScalingQuality,
}

/// Everything needed to composite the background and sprites on the window.
pub(crate) struct Graphics {
    /// GPU device, queue and surface.
    gpu: Gpu,
    /// Samplers and texture layout.
    binding: TextureBinding,
    /// Pipeline for every blend mode.
    pipelines: Pipelines,
    /// GPU textures for every canvas that has been drawn.
    textures: ResourceManager<TextureOwner, CanvasTexture>,
    /// GPU buffer reference to the vertices of all quads.
    vertex_buffer: wgpu::Buffer,
    /// GPU buffer reference to the indices of a single quad.
    index_buffer: wgpu::Buffer,
    /// Logical size the background is stretched to, in pixels.
    texture_size: (u32, u32),
}

impl Graphics {
    /// Setup the GPU on the window.
    pub(crate) async fn new(
        window: Arc<Window>,
        texture_size: (u32, u32),
        vsync: bool,
    ) -> Result<Self> {
        let gpu = Gpu::new(window, vsync).await?;

        let binding = TextureBinding::new(&gpu.device, gpu.format());
        let pipelines = Pipelines::new(&gpu.device, gpu.format(), &binding);

        // Create the initial empty vertex buffer, will be resized by the render call
        let vertex_buffer = Self::create_vertex_buffer(&gpu.device, &[]);

        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Index Buffer"),
                contents: bytemuck::cast_slice(INDICES),
                usage: wgpu::BufferUsages::INDEX,
            });

        Ok(Self {
            gpu,
            binding,
            pipelines,
            textures: ResourceManager::new(),
            vertex_buffer,
            index_buffer,
            texture_size,
        })
    }

    /// Resize the surface to the new window size.
    #[inline]
    pub(crate) fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
    }

    /// Upload the changed canvases and draw the background with all sprites on top.
    ///
    /// # Errors
    ///
    /// - When the GPU ran out of memory.
    pub(crate) fn render(&mut self, background: &mut Canvas, sprites: &mut SpriteList) -> Result<()> {
        profiling::scope!("Render");

        // Drop the textures of sprites that don't exist anymore
        self.textures.retain_live(|owner| match owner {
            TextureOwner::Background => true,
            TextureOwner::Sprite(id) => sprites.contains(*id),
        });

        {
            profiling::scope!("Upload canvases");

            self.sync(TextureOwner::Background, background);
            for (id, sprite) in sprites.iter_mut() {
                if sprite.shown {
                    self.sync(TextureOwner::Sprite(id), sprite);
                }
            }
        }

        // Background first, sprites on top of it in order
        let mut draw_calls = SmallVec::<[DrawCall; 16]>::new();
        let mut vertices = Vec::<Vertex>::new();

        let background_source = background.source_rect();
        if !background_source.is_empty() {
            let background_copy = TextureCopy::stretched(
                background_source,
                (background.width(), background.height()),
                self.texture_size,
            );
            vertices.extend(background_copy.vertices(self.texture_size));
            draw_calls.push(DrawCall {
                owner: TextureOwner::Background,
                blend_mode: background.blend_mode(),
                scaling_quality: background.scaling_quality(),
            });
        }

        for (id, sprite) in sprites.draw_order() {
            // Also skips sprites whose clipping lies outside of their canvas
            let destination = sprite.destination();
            if destination.is_empty() {
                continue;
            }

            let copy = TextureCopy {
                source: sprite.source_rect(),
                texture_size: (sprite.width(), sprite.height()),
                destination,
                rotation: sprite.rotation,
                pivot: sprite.pivot(),
                flip: sprite.flip,
            };
            vertices.extend(copy.vertices(self.texture_size));
            draw_calls.push(DrawCall {
                owner: TextureOwner::Sprite(id),
                blend_mode: sprite.blend_mode(),
                scaling_quality: sprite.scaling_quality(),
            });
        }

        self.upload_vertices(&vertices);

        let Some(mut frame) = self.gpu.start()? else {
            // Nothing to draw on this frame
            return Ok(());
        };

        {
            profiling::scope!("Render pass");

            let mut render_pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Canvas Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // Set the target indices
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            // Set the target vertices
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));

            for (index, draw_call) in draw_calls.iter().enumerate() {
                let (Some(texture), Some(pipeline)) = (
                    self.textures.get(&draw_call.owner),
                    self.pipelines.get(draw_call.blend_mode),
                ) else {
                    log::warn!("Skipping draw of {:?} without a GPU texture", draw_call.owner);

                    continue;
                };

                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, texture.bind_group(draw_call.scaling_quality), &[]);
                render_pass.draw_indexed(0..INDICES.len() as u32, (index * 4) as i32, 0..1);
            }
        }

        frame.present();

        Ok(())
    }

    /// Make sure the GPU texture exists with the right size and contains the latest pixels.
    fn sync(&mut self, owner: TextureOwner, canvas: &mut Canvas) {
        let allocated = self
            .textures
            .get(&owner)
            .is_some_and(|texture| texture.fits(canvas));

        if !allocated {
            let texture = CanvasTexture::new(&self.gpu.device, &self.binding, canvas);
            texture.upload(&self.gpu.queue, canvas);
            self.textures.register(owner, texture);
        } else if canvas.is_dirty() {
            if let Some(texture) = self.textures.get(&owner) {
                texture.upload(&self.gpu.queue, canvas);
            }
        }

        canvas.mark_clean();
    }

    /// Write all vertices to the GPU, growing the buffer when needed.
    fn upload_vertices(&mut self, vertices: &[Vertex]) {
        profiling::scope!("Upload vertices");

        let bytes: &[u8] = bytemuck::cast_slice(vertices);
        if bytes.len() as u64 > self.vertex_buffer.size() {
            // We have more vertices than the buffer size, recreate the buffer
            self.vertex_buffer.destroy();
            self.vertex_buffer = Self::create_vertex_buffer(&self.gpu.device, bytes);
        } else {
            self.gpu.queue.write_buffer(&self.vertex_buffer, 0, bytes);
        }
    }

    /// Create a vertex buffer filled with the bytes.
    fn create_vertex_buffer(device: &wgpu::Device, contents: &[u8]) -> wgpu::Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        })
    }
}
