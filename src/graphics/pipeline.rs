//! Render pipelines for copying canvas textures with each blend mode.

use std::borrow::Cow;

use hashbrown::HashMap;
use wgpu::{BlendComponent, BlendFactor, BlendOperation, BlendState};

use super::{quad::Vertex, texture::TextureBinding};
use crate::canvas::BlendMode;

/// Every blend mode a canvas can be drawn with.
const BLEND_MODES: [BlendMode; 4] = [
    BlendMode::None,
    BlendMode::Alpha,
    BlendMode::Additive,
    BlendMode::Modulate,
];

/// How the copied texture is combined with what's already drawn.
///
/// `None` means the target pixels are replaced.
pub(crate) const fn blend_state(blend_mode: BlendMode) -> Option<BlendState> {
    match blend_mode {
        BlendMode::None => None,
        BlendMode::Alpha => Some(BlendState::ALPHA_BLENDING),
        // dst.rgb = src.rgb * src.a + dst.rgb, dst.a is kept
        BlendMode::Additive => Some(BlendState {
            color: BlendComponent {
                src_factor: BlendFactor::SrcAlpha,
                dst_factor: BlendFactor::One,
                operation: BlendOperation::Add,
            },
            alpha: KEEP_ALPHA,
        }),
        // dst.rgb = src.rgb * dst.rgb, dst.a is kept
        BlendMode::Modulate => Some(BlendState {
            color: BlendComponent {
                src_factor: BlendFactor::Zero,
                dst_factor: BlendFactor::Src,
                operation: BlendOperation::Add,
            },
            alpha: KEEP_ALPHA,
        }),
    }
}

/// Leave the alpha of the target untouched.
const KEEP_ALPHA: BlendComponent = BlendComponent {
    src_factor: BlendFactor::Zero,
    dst_factor: BlendFactor::One,
    operation: BlendOperation::Add,
};

/// A pipeline per blend mode sharing the same shader.
pub(crate) struct Pipelines {
    /// Pipeline of the rendering itself for each blend mode.
    render: HashMap<BlendMode, wgpu::RenderPipeline>,
}

impl Pipelines {
    /// Create and upload the pipelines.
    pub(crate) fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        binding: &TextureBinding,
    ) -> Self {
        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Canvas Render Pipeline Layout"),
                bind_group_layouts: &[&binding.bind_group_layout],
                push_constant_ranges: &[],
            });

        // Upload the shader to the GPU
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Canvas Texture Shader"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!("shaders/quad.wgsl"))),
        });

        let render = BLEND_MODES
            .into_iter()
            .map(|blend_mode| {
                let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some("Canvas Render Pipeline"),
                    layout: Some(&render_pipeline_layout),
                    vertex: wgpu::VertexState {
                        buffers: &[Vertex::descriptor()],
                        module: &shader,
                        entry_point: "vs_main",
                        compilation_options: wgpu::PipelineCompilationOptions::default(),
                    },
                    fragment: Some(wgpu::FragmentState {
                        module: &shader,
                        entry_point: "fs_main",
                        targets: &[Some(wgpu::ColorTargetState {
                            format: surface_format,
                            blend: blend_state(blend_mode),
                            write_mask: wgpu::ColorWrites::ALL,
                        })],
                        compilation_options: wgpu::PipelineCompilationOptions::default(),
                    }),
                    primitive: wgpu::PrimitiveState {
                        topology: wgpu::PrimitiveTopology::TriangleList,
                        strip_index_format: None,
                        front_face: wgpu::FrontFace::Cw,
                        // Irrelevant since we disable culling
                        cull_mode: None,
                        polygon_mode: wgpu::PolygonMode::Fill,
                        unclipped_depth: false,
                        conservative: false,
                    },
                    depth_stencil: None,
                    multisample: wgpu::MultisampleState {
                        // How many samples the pipeline will use
                        count: 1,
                        // Use all masks
                        mask: !0,
                        // Disable anti-aliasing
                        alpha_to_coverage_enabled: false,
                    },
                    multiview: None,
                });

                (blend_mode, pipeline)
            })
            .collect();

        Self { render }
    }

    /// Pipeline for drawing with the blend mode.
    #[inline]
    pub(crate) fn get(&self, blend_mode: BlendMode) -> Option<&wgpu::RenderPipeline> {
        self.render.get(&blend_mode)
    }
}

#[cfg(test)]
mod tests {
    use wgpu::{BlendFactor, BlendState};

    use super::{blend_state, BLEND_MODES};
    use crate::canvas::BlendMode;

    #[test]
    fn replace_without_blending() {
        assert_eq!(blend_state(BlendMode::None), None);
        assert_eq!(
            blend_state(BlendMode::Alpha),
            Some(BlendState::ALPHA_BLENDING)
        );
    }

    #[test]
    fn additive_and_modulate_keep_alpha() {
        for blend_mode in [BlendMode::Additive, BlendMode::Modulate] {
            let state = blend_state(blend_mode).unwrap();
            assert_eq!(state.alpha.src_factor, BlendFactor::Zero);
            assert_eq!(state.alpha.dst_factor, BlendFactor::One);
        }

        let additive = blend_state(BlendMode::Additive).unwrap();
        assert_eq!(additive.color.src_factor, BlendFactor::SrcAlpha);
        assert_eq!(additive.color.dst_factor, BlendFactor::One);

        let modulate = blend_state(BlendMode::Modulate).unwrap();
        assert_eq!(modulate.color.src_factor, BlendFactor::Zero);
        assert_eq!(modulate.color.dst_factor, BlendFactor::Src);
    }

    #[test]
    fn every_mode_is_distinct() {
        let states = BLEND_MODES.map(blend_state);
        for (index, state) in states.iter().enumerate() {
            assert!(!states[index + 1..].contains(state));
        }
    }
}
