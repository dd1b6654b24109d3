//! Render pipeline construction
//!
//! One shader drives three pipeline variants: opaque meshes, transparent
//! meshes drawn after them without depth writes, and line geometry for
//! the grid helper. A separate depth-only pipeline renders the shadow
//! map from the light's point of view.

use wgpu::*;

use crate::gfx::resources::TextureResource;
use crate::gfx::scene::vertex::Vertex3D;

const SHADER_SOURCE: &str = include_str!("shader.wgsl");
const SHADOW_SHADER_SOURCE: &str = include_str!("shadow.wgsl");

pub struct PipelineSet {
    pub opaque: RenderPipeline,
    pub transparent: RenderPipeline,
    pub lines: RenderPipeline,
    pub shadow: RenderPipeline,
}

struct PipelineVariant {
    label: &'static str,
    topology: PrimitiveTopology,
    blend: BlendState,
    depth_write: bool,
    cull_mode: Option<Face>,
}

impl PipelineSet {
    pub fn new(
        device: &Device,
        surface_format: TextureFormat,
        bind_group_layouts: &[&BindGroupLayout],
        shadow_bind_group_layouts: &[&BindGroupLayout],
    ) -> Self {
        let shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("Diorama Shader"),
            source: ShaderSource::Wgsl(SHADER_SOURCE.into()),
        });

        let layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("Diorama Pipeline Layout"),
            bind_group_layouts,
            push_constant_ranges: &[],
        });

        let build = |variant: PipelineVariant| {
            device.create_render_pipeline(&RenderPipelineDescriptor {
                label: Some(variant.label),
                layout: Some(&layout),
                vertex: VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[Vertex3D::desc()],
                    compilation_options: PipelineCompilationOptions::default(),
                },
                fragment: Some(FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(ColorTargetState {
                        format: surface_format,
                        blend: Some(variant.blend),
                        write_mask: ColorWrites::ALL,
                    })],
                    compilation_options: PipelineCompilationOptions::default(),
                }),
                primitive: PrimitiveState {
                    topology: variant.topology,
                    strip_index_format: None,
                    front_face: FrontFace::Ccw,
                    cull_mode: variant.cull_mode,
                    polygon_mode: PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(DepthStencilState {
                    format: TextureResource::DEPTH_FORMAT,
                    depth_write_enabled: variant.depth_write,
                    depth_compare: CompareFunction::Less,
                    stencil: StencilState::default(),
                    bias: DepthBiasState::default(),
                }),
                multisample: MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        Self {
            opaque: build(PipelineVariant {
                label: "Opaque Pipeline",
                topology: PrimitiveTopology::TriangleList,
                blend: BlendState::REPLACE,
                depth_write: true,
                cull_mode: Some(Face::Back),
            }),
            transparent: build(PipelineVariant {
                label: "Transparent Pipeline",
                topology: PrimitiveTopology::TriangleList,
                blend: BlendState::ALPHA_BLENDING,
                depth_write: false,
                cull_mode: Some(Face::Back),
            }),
            lines: build(PipelineVariant {
                label: "Line Pipeline",
                topology: PrimitiveTopology::LineList,
                blend: BlendState::REPLACE,
                depth_write: true,
                cull_mode: None,
            }),
            shadow: Self::shadow_pipeline(device, shadow_bind_group_layouts),
        }
    }

    /// Depth-only pipeline for the shadow map. No fragment stage, no
    /// culling so back faces fill the map and reduce peter-panning.
    fn shadow_pipeline(
        device: &Device,
        bind_group_layouts: &[&BindGroupLayout],
    ) -> RenderPipeline {
        let shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("Shadow Shader"),
            source: ShaderSource::Wgsl(SHADOW_SHADER_SOURCE.into()),
        });

        let layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("Shadow Pipeline Layout"),
            bind_group_layouts,
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("Shadow Pipeline"),
            layout: Some(&layout),
            vertex: VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex3D::desc()],
                compilation_options: PipelineCompilationOptions::default(),
            },
            fragment: None,
            primitive: PrimitiveState {
                topology: PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(DepthStencilState {
                format: TextureResource::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: CompareFunction::Less,
                stencil: StencilState::default(),
                bias: DepthBiasState::default(),
            }),
            multisample: MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }
}
