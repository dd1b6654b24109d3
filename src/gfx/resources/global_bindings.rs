//! Per-frame global bindings
//!
//! One uniform buffer carries the camera matrices, the shadow light's
//! view-projection, the ambient term and the packed point-light array
//! shared by every draw call. The shadow map and its comparison sampler
//! live in the same bind group.

use cgmath::{ortho, EuclideanSpace, InnerSpace, Matrix4, Point3, Vector3};
use wgpu::Device;

use crate::gfx::camera::{CameraUniform, OPENGL_TO_WGPU_MATRIX};
use crate::gfx::scene::Scene;
use crate::wgpu_utils::{binding, BindGroupBuilder, BindGroupLayoutBuilder, UniformBuffer};

pub const MAX_POINT_LIGHTS: usize = 8;

/// Half-extent of the orthographic shadow frustum, sized to the yard
const SHADOW_EXTENT: f32 = 20.0;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuPointLight {
    pub position: [f32; 3],
    pub intensity: f32,
    pub color: [f32; 3],
    pub decay: f32,
    pub distance: f32,
    /// Explicit tail padding matching WGSL's implicit 16-byte rounding
    pub _pad: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUboContent {
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
    pub light_view_proj: [[f32; 4]; 4],
    /// rgb plus intensity in w
    pub ambient: [f32; 4],
    pub lights: [GpuPointLight; MAX_POINT_LIGHTS],
    /// Only x is read; padded to 16 bytes for uniform layout
    pub light_count: [u32; 4],
    /// x > 0.5 enables shadowing; padded to 16 bytes
    pub shadow_params: [f32; 4],
}

/// Uniform for the depth-only shadow pass
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShadowUniform {
    pub light_view_proj: [[f32; 4]; 4],
}

/// View-projection of the shadow light: an orthographic frustum looking
/// from the light's position at the scene origin. Degenerate positions
/// (at the origin, or straight above it) get safe fallbacks.
pub fn light_view_proj(position: Vector3<f32>) -> Matrix4<f32> {
    let eye = if position.magnitude2() < 1e-6 {
        Point3::new(0.0, 1.0, 0.0)
    } else {
        Point3::from_vec(position)
    };
    let target = Point3::new(0.0, 0.0, 0.0);
    let dir = target - eye;
    let up = if dir.x.abs() < 1e-4 && dir.z.abs() < 1e-4 {
        Vector3::unit_z()
    } else {
        Vector3::unit_y()
    };
    let view = Matrix4::look_at_rh(eye, target, up);
    let proj = OPENGL_TO_WGPU_MATRIX
        * ortho(
            -SHADOW_EXTENT,
            SHADOW_EXTENT,
            -SHADOW_EXTENT,
            SHADOW_EXTENT,
            0.1,
            60.0,
        );
    proj * view
}

impl GlobalUboContent {
    pub fn from_scene(
        camera: &CameraUniform,
        scene: &Scene,
        light_view_proj: Matrix4<f32>,
        shadows_enabled: bool,
    ) -> Self {
        let resolved = scene.collect_point_lights();
        let mut lights = [GpuPointLight {
            position: [0.0; 3],
            intensity: 0.0,
            color: [0.0; 3],
            decay: 1.0,
            distance: 0.0,
            _pad: [0.0; 3],
        }; MAX_POINT_LIGHTS];

        let count = resolved.len().min(MAX_POINT_LIGHTS);
        for (slot, light) in lights.iter_mut().zip(resolved.iter()) {
            *slot = GpuPointLight {
                position: light.position.into(),
                intensity: light.light.intensity,
                color: light.light.color,
                decay: light.light.decay,
                distance: light.light.distance,
                _pad: [0.0; 3],
            };
        }

        Self {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            light_view_proj: light_view_proj.into(),
            ambient: [
                scene.ambient.color[0],
                scene.ambient.color[1],
                scene.ambient.color[2],
                scene.ambient.intensity,
            ],
            lights,
            light_count: [count as u32, 0, 0, 0],
            shadow_params: [if shadows_enabled { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        }
    }
}

pub struct GlobalBindings {
    pub ubo: UniformBuffer<GlobalUboContent>,
    pub layout: wgpu::BindGroupLayout,
    pub bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(
        device: &Device,
        shadow_view: &wgpu::TextureView,
        shadow_sampler: &wgpu::Sampler,
    ) -> Self {
        let ubo = UniformBuffer::new(device);
        let layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding::uniform())
            .next_binding_fragment(binding::texture_depth_2d())
            .next_binding_fragment(binding::sampler(wgpu::SamplerBindingType::Comparison))
            .create(device, "Global Bind Group Layout");
        let bind_group = BindGroupBuilder::new(&layout)
            .resource(ubo.binding_resource())
            .resource(wgpu::BindingResource::TextureView(shadow_view))
            .resource(wgpu::BindingResource::Sampler(shadow_sampler))
            .create(device, "Global Bind Group");
        Self {
            ubo,
            layout,
            bind_group,
        }
    }

    pub fn update(&mut self, queue: &wgpu::Queue, content: GlobalUboContent) {
        self.ubo.update_content(queue, content);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    const SHADER: &str = include_str!("../rendering/shader.wgsl");

    /// Field names of a struct declaration in WGSL source, in order
    fn wgsl_struct_fields(source: &str, name: &str) -> Vec<String> {
        let needle = format!("struct {name} {{");
        let start = source.find(&needle).expect("struct not found in shader");
        let body = &source[start + needle.len()..];
        let end = body.find('}').expect("unterminated struct");
        body[..end]
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with("//"))
            .filter_map(|line| line.split(':').next())
            .map(|field| field.trim().to_string())
            .collect()
    }

    #[test]
    fn light_struct_layout_matches_shader() {
        // 48 bytes on both sides: WGSL rounds the struct up to its
        // 16-byte alignment, the Rust mirror pads explicitly. A trailing
        // vec3 member in the WGSL struct would inflate the stride to 64
        // and shift every light after the first.
        assert_eq!(size_of::<GpuPointLight>(), 48);
        assert_eq!(offset_of!(GpuPointLight, position), 0);
        assert_eq!(offset_of!(GpuPointLight, intensity), 12);
        assert_eq!(offset_of!(GpuPointLight, color), 16);
        assert_eq!(offset_of!(GpuPointLight, decay), 28);
        assert_eq!(offset_of!(GpuPointLight, distance), 32);

        assert_eq!(
            wgsl_struct_fields(SHADER, "PointLight"),
            ["position", "intensity", "color", "decay", "distance"]
        );
    }

    #[test]
    fn globals_layout_matches_shader() {
        assert_eq!(size_of::<GlobalUboContent>(), 576);
        assert_eq!(offset_of!(GlobalUboContent, view_proj), 16);
        assert_eq!(offset_of!(GlobalUboContent, light_view_proj), 80);
        assert_eq!(offset_of!(GlobalUboContent, ambient), 144);
        assert_eq!(offset_of!(GlobalUboContent, lights), 160);
        assert_eq!(offset_of!(GlobalUboContent, light_count), 544);
        assert_eq!(offset_of!(GlobalUboContent, shadow_params), 560);

        assert_eq!(
            wgsl_struct_fields(SHADER, "Globals"),
            [
                "view_position",
                "view_proj",
                "light_view_proj",
                "ambient",
                "lights",
                "light_count",
                "shadow_params",
            ]
        );
    }

    #[test]
    fn light_array_is_capped() {
        use crate::gfx::scene::PointLight;
        use cgmath::SquareMatrix;

        let mut scene = Scene::default();
        for i in 0..12 {
            scene.add_light(
                &format!("lamp-{i}"),
                scene.root(),
                PointLight::new([1.0, 1.0, 1.0], 1.0, 25.0, 2.0),
            );
        }
        let camera = CameraUniform::default();
        let content =
            GlobalUboContent::from_scene(&camera, &scene, Matrix4::identity(), true);
        assert_eq!(content.light_count[0], MAX_POINT_LIGHTS as u32);
        assert_eq!(content.shadow_params[0], 1.0);
    }

    #[test]
    fn shadow_frustum_handles_degenerate_lights() {
        for position in [
            Vector3::new(0.0, 3.9, 3.25),
            // straight above the target, where unit_y up would collapse
            Vector3::new(0.0, 8.0, 0.0),
            // at the target itself
            Vector3::new(0.0, 0.0, 0.0),
        ] {
            let m = light_view_proj(position);
            let p = m * cgmath::Vector4::new(0.0, 0.0, 0.0, 1.0);
            assert!(p.x.is_finite() && p.y.is_finite() && p.z.is_finite());
            // target sits inside the frustum
            let ndc = cgmath::Vector3::new(p.x / p.w, p.y / p.w, p.z / p.w);
            assert!(ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0);
            assert!(ndc.z >= 0.0 && ndc.z <= 1.0);
        }
    }
}
