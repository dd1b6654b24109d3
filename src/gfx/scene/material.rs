//! Material system
//!
//! Materials are stored centrally in [`MaterialManager`] and referenced by
//! name. Several nodes sharing one material see every edit to it at once;
//! the bush cluster and the grave field rely on exactly that.

use std::collections::HashMap;
use wgpu::Device;

use crate::gfx::resources::texture::TextureManager;
use crate::wgpu_utils::{binding, BindGroupBuilder, BindGroupLayoutBuilder, UniformBuffer};

/// Material ID for referencing materials
pub type MaterialId = String;

/// Converts an `0xRRGGBB` color literal to linear-ish RGB floats
pub fn rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// GPU uniform data for materials
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    pub emissive: [f32; 3],
    pub emissive_intensity: f32,
    pub uv_repeat: [f32; 2],
    pub roughness: f32,
    pub unlit: f32,
}

type MaterialUbo = UniformBuffer<MaterialUniform>;

pub(crate) fn material_bind_group_layout(device: &Device) -> wgpu::BindGroupLayout {
    BindGroupLayoutBuilder::new()
        .next_binding_fragment(binding::uniform())
        .create(device, "Material Bind Group Layout")
}

pub(crate) fn texture_bind_group_layout(device: &Device) -> wgpu::BindGroupLayout {
    BindGroupLayoutBuilder::new()
        .next_binding_fragment(binding::texture_2d())
        .next_binding_fragment(binding::sampler(wgpu::SamplerBindingType::Filtering))
        .create(device, "Material Texture Bind Group Layout")
}

struct MaterialGpu {
    ubo: MaterialUbo,
    bind_group: wgpu::BindGroup,
    texture_bind_group: wgpu::BindGroup,
}

/// Material definition shared between objects by id
pub struct Material {
    pub name: String,
    pub base_color: [f32; 4],
    pub roughness: f32,
    pub emissive: [f32; 3],
    pub emissive_intensity: f32,
    /// Path of the color texture, resolved through the texture manager;
    /// a missing file falls back to plain base color
    pub texture: Option<String>,
    pub uv_repeat: [f32; 2],
    /// Skips lighting entirely (the bulb visuals, the grid)
    pub unlit: bool,
    /// Rendered with alpha blending after the opaque pass
    pub transparent: bool,

    gpu: Option<MaterialGpu>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            base_color: [0.8, 0.8, 0.8, 1.0],
            roughness: 0.5,
            emissive: [0.0, 0.0, 0.0],
            emissive_intensity: 0.0,
            texture: None,
            uv_repeat: [1.0, 1.0],
            unlit: false,
            transparent: false,
            gpu: None,
        }
    }
}

impl Material {
    pub fn new(name: &str, base_color: [f32; 4], roughness: f32) -> Self {
        Self {
            name: name.to_string(),
            base_color,
            roughness: roughness.clamp(0.0, 1.0),
            ..Default::default()
        }
    }

    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.base_color = [color[0], color[1], color[2], self.base_color[3]];
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.base_color[3] = alpha.clamp(0.0, 1.0);
        self
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    pub fn with_emission(mut self, color: [f32; 3], intensity: f32) -> Self {
        self.emissive = color;
        self.emissive_intensity = intensity;
        self
    }

    pub fn with_texture(mut self, path: &str) -> Self {
        self.texture = Some(path.to_string());
        self
    }

    pub fn with_uv_repeat(mut self, u: f32, v: f32) -> Self {
        self.uv_repeat = [u, v];
        self
    }

    pub fn with_unlit(mut self) -> Self {
        self.unlit = true;
        self
    }

    pub fn with_transparency(mut self) -> Self {
        self.transparent = true;
        self
    }

    fn uniform(&self) -> MaterialUniform {
        MaterialUniform {
            base_color: self.base_color,
            emissive: self.emissive,
            emissive_intensity: self.emissive_intensity,
            uv_repeat: self.uv_repeat,
            roughness: self.roughness,
            unlit: if self.unlit { 1.0 } else { 0.0 },
        }
    }

    /// Creates or refreshes the GPU resources for this material
    pub fn update_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        textures: &TextureManager,
    ) {
        if self.gpu.is_none() {
            let ubo = MaterialUbo::new_with_data(device, &self.uniform());

            let layout = material_bind_group_layout(device);
            let bind_group = BindGroupBuilder::new(&layout)
                .resource(ubo.binding_resource())
                .create(device, "Material Bind Group");

            let (view, sampler) = textures.view_and_sampler(self.texture.as_deref());
            let texture_layout = texture_bind_group_layout(device);
            let texture_bind_group = BindGroupBuilder::new(&texture_layout)
                .resource(wgpu::BindingResource::TextureView(view))
                .resource(wgpu::BindingResource::Sampler(sampler))
                .create(device, "Material Texture Bind Group");

            self.gpu = Some(MaterialGpu {
                ubo,
                bind_group,
                texture_bind_group,
            });
        }

        let uniform = self.uniform();
        if let Some(gpu) = &mut self.gpu {
            gpu.ubo.update_content(queue, uniform);
        }
    }

    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu.as_ref().map(|gpu| &gpu.bind_group)
    }

    pub fn texture_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu.as_ref().map(|gpu| &gpu.texture_bind_group)
    }
}

/// Central material storage
///
/// Objects reference materials by id rather than owning material data,
/// so one edit is visible through every referencing object.
pub struct MaterialManager {
    materials: HashMap<MaterialId, Material>,
    default_material_id: MaterialId,
}

impl MaterialManager {
    pub fn new() -> Self {
        let mut manager = Self {
            materials: HashMap::new(),
            default_material_id: "default".to_string(),
        };
        manager.materials.insert("default".to_string(), Material::default());
        manager
    }

    pub fn add_material(&mut self, material: Material) {
        self.materials.insert(material.name.clone(), material);
    }

    pub fn get_material(&self, id: &str) -> Option<&Material> {
        self.materials.get(id)
    }

    pub fn get_material_mut(&mut self, id: &str) -> Option<&mut Material> {
        self.materials.get_mut(id)
    }

    pub fn get_default_material(&self) -> &Material {
        self.materials.get(&self.default_material_id).unwrap()
    }

    /// Material lookup with fallback to the default material
    pub fn get_material_for_node(&self, material_id: Option<&MaterialId>) -> &Material {
        match material_id {
            Some(id) => self
                .get_material(id)
                .unwrap_or_else(|| self.get_default_material()),
            None => self.get_default_material(),
        }
    }

    pub fn list_materials(&self) -> Vec<&MaterialId> {
        self.materials.keys().collect()
    }

    /// Texture paths referenced by any material, for preloading
    pub fn texture_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .materials
            .values()
            .filter_map(|m| m.texture.clone())
            .collect();
        paths.sort();
        paths.dedup();
        paths
    }

    pub fn update_all_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        textures: &TextureManager,
    ) {
        for material in self.materials.values_mut() {
            material.update_gpu_resources(device, queue, textures);
        }
    }
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_unpacks_hex_colors() {
        assert_eq!(rgb(0xff0000), [1.0, 0.0, 0.0]);
        assert_eq!(rgb(0x00ff00), [0.0, 1.0, 0.0]);
        assert_eq!(rgb(0x0000ff), [0.0, 0.0, 1.0]);

        let c = rgb(0xb35f45);
        assert!((c[0] - 0xb3 as f32 / 255.0).abs() < 1e-6);
        assert!((c[1] - 0x5f as f32 / 255.0).abs() < 1e-6);
        assert!((c[2] - 0x45 as f32 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn roughness_is_clamped() {
        let material = Material::new("m", [1.0; 4], 3.0);
        assert_eq!(material.roughness, 1.0);
        let material = Material::new("m", [1.0; 4], -1.0);
        assert_eq!(material.roughness, 0.0);
    }

    #[test]
    fn manager_falls_back_to_default() {
        let manager = MaterialManager::new();
        let missing = "nope".to_string();
        assert_eq!(manager.get_material_for_node(Some(&missing)).name, "default");
        assert_eq!(manager.get_material_for_node(None).name, "default");
    }

    #[test]
    fn texture_paths_are_deduplicated() {
        let mut manager = MaterialManager::new();
        manager.add_material(Material::new("a", [1.0; 4], 0.5).with_texture("tex/bricks.jpg"));
        manager.add_material(Material::new("b", [1.0; 4], 0.5).with_texture("tex/bricks.jpg"));
        manager.add_material(Material::new("c", [1.0; 4], 0.5).with_texture("tex/floor.jpg"));

        let paths = manager.texture_paths();
        assert_eq!(paths, vec!["tex/bricks.jpg", "tex/floor.jpg"]);
    }
}
