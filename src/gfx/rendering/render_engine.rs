//! WGPU-based rendering engine
//!
//! Owns the surface, device, depth buffer and pipelines, and turns a
//! scene into frames. Each frame renders the shadow map from the light's
//! point of view first, then opaque meshes, line geometry, transparent
//! meshes, and the UI overlay.

use anyhow::{Context, Result};
use cgmath::{Matrix4, SquareMatrix};
use wgpu::TextureFormat;

use crate::gfx::rendering::pipeline::PipelineSet;
use crate::gfx::resources::{
    light_view_proj, GlobalBindings, GlobalUboContent, ShadowUniform, TextureManager,
    TextureResource,
};
use crate::gfx::scene::material::{material_bind_group_layout, texture_bind_group_layout};
use crate::gfx::scene::node::node_bind_group_layout;
use crate::gfx::scene::Scene;
use crate::gfx::geometry::GeometryTopology;
use crate::wgpu_utils::{binding, BindGroupBuilder, BindGroupLayoutBuilder, UniformBuffer};

const SHADOW_MAP_SIZE: u32 = 2048;

pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    shadow_map: TextureResource,
    shadow_ubo: UniformBuffer<ShadowUniform>,
    shadow_layout: wgpu::BindGroupLayout,
    shadow_bind_group: wgpu::BindGroup,
    global_bindings: GlobalBindings,
    textures: TextureManager,
    pipelines: Option<PipelineSet>,
}

impl RenderEngine {
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to request adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to request a device")?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(surface_capabilities.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Immediate,
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");
        let shadow_map = TextureResource::create_shadow_map(&device, SHADOW_MAP_SIZE);
        let shadow_ubo = UniformBuffer::new(&device);
        let shadow_layout = BindGroupLayoutBuilder::new()
            .next_binding_vertex(binding::uniform())
            .create(&device, "Shadow Bind Group Layout");
        let shadow_bind_group = BindGroupBuilder::new(&shadow_layout)
            .resource(shadow_ubo.binding_resource())
            .create(&device, "Shadow Bind Group");
        let global_bindings =
            GlobalBindings::new(&device, &shadow_map.view, &shadow_map.sampler);
        let textures = TextureManager::new(&device, &queue);

        log::info!("render engine ready: {:?}, format {:?}", adapter.get_info().name, format);

        Ok(RenderEngine {
            surface,
            device,
            queue,
            config,
            depth_texture,
            shadow_map,
            shadow_ubo,
            shadow_layout,
            shadow_bind_group,
            global_bindings,
            textures,
            pipelines: None,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn textures(&self) -> &TextureManager {
        &self.textures
    }

    pub fn surface_format(&self) -> TextureFormat {
        self.config.format
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    /// One-time scene upload: textures, geometry buffers, bind groups and
    /// the pipelines that depend on the surface format
    pub fn prepare_scene(&mut self, scene: &mut Scene) {
        for path in scene.material_manager.texture_paths() {
            self.textures.load(&self.device, &self.queue, &path);
        }
        scene.init_gpu_resources(&self.device, &self.queue, &self.textures);

        if self.pipelines.is_none() {
            let node_layout = node_bind_group_layout(&self.device);
            let material_layout = material_bind_group_layout(&self.device);
            let texture_layout = texture_bind_group_layout(&self.device);
            self.pipelines = Some(PipelineSet::new(
                &self.device,
                self.config.format,
                &[
                    &self.global_bindings.layout,
                    &node_layout,
                    &material_layout,
                    &texture_layout,
                ],
                &[&self.shadow_layout, &node_layout],
            ));
        }
    }

    /// Refreshes the per-frame globals from the camera, the scene lights
    /// and the shadow light's frustum
    pub fn update(&mut self, scene: &Scene) {
        let light_vp = match scene.shadow_light {
            Some(id) => light_view_proj(scene.world_position(id)),
            None => Matrix4::identity(),
        };
        let shadows = scene.shadows_enabled && scene.shadow_light.is_some();

        self.shadow_ubo.update_content(
            &self.queue,
            ShadowUniform {
                light_view_proj: light_vp.into(),
            },
        );
        let content = GlobalUboContent::from_scene(
            &scene.camera_manager.camera.uniform,
            scene,
            light_vp,
            shadows,
        );
        self.global_bindings.update(&self.queue, content);
    }

    /// Renders the scene and then lets the caller draw UI into the same
    /// frame via `ui_callback`
    pub fn render_frame_with_ui<F>(&mut self, scene: &Scene, ui_callback: F) -> Result<()>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let pipelines = match &self.pipelines {
            Some(pipelines) => pipelines,
            None => return Ok(()),
        };

        let frame = self
            .surface
            .get_current_texture()
            .context("failed to acquire surface texture")?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        if scene.shadows_enabled && scene.shadow_light.is_some() {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow_map.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(&pipelines.shadow);
            pass.set_bind_group(0, &self.shadow_bind_group, &[]);
            self.draw_shadow_casters(&mut pass, scene);
        }

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.01,
                            g: 0.01,
                            b: 0.03,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_bind_group(0, &self.global_bindings.bind_group, &[]);

            // Transparency sorts after everything else; line geometry sits
            // between so the grid never writes over blended fragments.
            for phase in [DrawPhase::Opaque, DrawPhase::Lines, DrawPhase::Transparent] {
                let pipeline = match phase {
                    DrawPhase::Opaque => &pipelines.opaque,
                    DrawPhase::Lines => &pipelines.lines,
                    DrawPhase::Transparent => &pipelines.transparent,
                };
                pass.set_pipeline(pipeline);
                self.draw_phase(&mut pass, scene, phase);
            }
        }

        ui_callback(&self.device, &self.queue, &mut encoder, &view);

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// Opaque triangle meshes only; lines have no area and transparent
    /// surfaces would darken what shows through them
    fn draw_shadow_casters(&self, pass: &mut wgpu::RenderPass<'_>, scene: &Scene) {
        for id in scene.drawable_nodes() {
            let node = scene.node(id);
            let geometry_id = match node.geometry {
                Some(g) => g,
                None => continue,
            };
            let mesh = match scene.mesh_gpu(geometry_id) {
                Some(mesh) => mesh,
                None => continue,
            };
            let material = scene
                .material_manager
                .get_material_for_node(node.material.as_ref());
            if mesh.topology != GeometryTopology::TriangleList || material.transparent {
                continue;
            }
            let node_bind_group = match node.gpu.as_ref() {
                Some(gpu) => &gpu.bind_group,
                None => continue,
            };

            pass.set_bind_group(1, node_bind_group, &[]);
            pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }

    fn draw_phase(&self, pass: &mut wgpu::RenderPass<'_>, scene: &Scene, phase: DrawPhase) {
        for id in scene.drawable_nodes() {
            let node = scene.node(id);
            let geometry_id = match node.geometry {
                Some(g) => g,
                None => continue,
            };
            let mesh = match scene.mesh_gpu(geometry_id) {
                Some(mesh) => mesh,
                None => continue,
            };
            let material = scene
                .material_manager
                .get_material_for_node(node.material.as_ref());

            let wanted = match (mesh.topology, material.transparent) {
                (GeometryTopology::LineList, _) => DrawPhase::Lines,
                (GeometryTopology::TriangleList, true) => DrawPhase::Transparent,
                (GeometryTopology::TriangleList, false) => DrawPhase::Opaque,
            };
            if wanted != phase {
                continue;
            }

            let (node_bind_group, material_bind_group, texture_bind_group) = match (
                node.gpu.as_ref(),
                material.bind_group(),
                material.texture_bind_group(),
            ) {
                (Some(gpu), Some(m), Some(t)) => (&gpu.bind_group, m, t),
                _ => continue,
            };

            pass.set_bind_group(1, node_bind_group, &[]);
            pass.set_bind_group(2, material_bind_group, &[]);
            pass.set_bind_group(3, texture_bind_group, &[]);
            pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum DrawPhase {
    Opaque,
    Lines,
    Transparent,
}
