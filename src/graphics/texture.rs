//! Canvas pixels living on the GPU.

use crate::{
    canvas::{Canvas, ScalingQuality},
    sprite::SpriteId,
};

/// Which canvas a GPU texture belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum TextureOwner {
    /// Background canvas stretched over the window.
    Background,
    /// Canvas of a sprite.
    Sprite(SpriteId),
}

/// Samplers and the layout every canvas texture is bound with.
pub(crate) struct TextureBinding {
    /// Shared bind group layout for all canvas textures.
    pub(crate) bind_group_layout: wgpu::BindGroupLayout,
    /// Pixelated sampler.
    nearest: wgpu::Sampler,
    /// Smooth sampler.
    linear: wgpu::Sampler,
    /// Pixel format of the textures.
    format: wgpu::TextureFormat,
}

impl TextureBinding {
    /// Create the samplers and the layout.
    ///
    /// The texture format follows whether the surface is sRGB so colors aren't converted twice.
    pub(crate) fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let format = if surface_format.is_srgb() {
            wgpu::TextureFormat::Bgra8UnormSrgb
        } else {
            wgpu::TextureFormat::Bgra8Unorm
        };

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Canvas Texture Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let nearest = Self::sampler(device, wgpu::FilterMode::Nearest);
        let linear = Self::sampler(device, wgpu::FilterMode::Linear);

        Self {
            bind_group_layout,
            nearest,
            linear,
            format,
        }
    }

    /// Create a sampler clamping to the edges.
    fn sampler(device: &wgpu::Device, filter: wgpu::FilterMode) -> wgpu::Sampler {
        device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Canvas Texture Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: filter,
            min_filter: filter,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        })
    }
}

/// Texture on the GPU mirroring a canvas.
pub(crate) struct CanvasTexture {
    /// GPU reference.
    texture: wgpu::Texture,
    /// Bind group sampling with [`ScalingQuality::Nearest`].
    nearest: wgpu::BindGroup,
    /// Bind group sampling with [`ScalingQuality::Linear`].
    linear: wgpu::BindGroup,
}

impl CanvasTexture {
    /// Allocate a texture with the size of the canvas.
    ///
    /// The pixels still need to be uploaded.
    pub(crate) fn new(device: &wgpu::Device, binding: &TextureBinding, canvas: &Canvas) -> Self {
        log::debug!(
            "Allocating GPU texture of ({}x{})",
            canvas.width(),
            canvas.height()
        );

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Canvas Texture"),
            size: wgpu::Extent3d {
                width: canvas.width(),
                height: canvas.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            // Texture is 2D
            dimension: wgpu::TextureDimension::D2,
            format: binding.format,
            // We want to use this texture in shaders and we want to copy data to it
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            // We only need a single format
            view_formats: &[binding.format],
        });

        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bind_group = |sampler: &wgpu::Sampler| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Canvas Texture Bind Group"),
                layout: &binding.bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&texture_view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                ],
            })
        };

        let nearest = bind_group(&binding.nearest);
        let linear = bind_group(&binding.linear);

        Self {
            texture,
            nearest,
            linear,
        }
    }

    /// Whether the texture can hold the canvas without reallocating.
    #[inline]
    pub(crate) fn fits(&self, canvas: &Canvas) -> bool {
        self.texture.width() == canvas.width() && self.texture.height() == canvas.height()
    }

    /// Copy all pixels of the canvas to the GPU.
    pub(crate) fn upload(&self, queue: &wgpu::Queue, canvas: &Canvas) {
        profiling::scope!("Upload canvas texture");

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(canvas.pixels()),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(canvas.width() * 4),
                rows_per_image: Some(canvas.height()),
            },
            wgpu::Extent3d {
                width: canvas.width(),
                height: canvas.height(),
                depth_or_array_layers: 1,
            },
        );
    }

    /// Bind group with the requested filtering.
    #[inline]
    pub(crate) const fn bind_group(&self, scaling_quality: ScalingQuality) -> &wgpu::BindGroup {
        match scaling_quality {
            ScalingQuality::Nearest => &self.nearest,
            ScalingQuality::Linear => &self.linear,
        }
    }
}
