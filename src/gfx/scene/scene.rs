//! Scene management
//!
//! The scene owns the node arena, registered geometry, the material
//! manager and the camera. Traversal is always parent-before-child so a
//! node's world matrix can be built from its parent's.

use cgmath::{Matrix4, Vector3};
use wgpu::util::DeviceExt;

use crate::gfx::camera::CameraManager;
use crate::gfx::geometry::{GeometryData, GeometryTopology};
use crate::gfx::scene::light::{AmbientLight, PointLight};
use crate::gfx::scene::material::MaterialManager;
use crate::gfx::scene::node::{GeometryId, Node, NodeGpuResources, NodeId, TransformUniform};
use crate::gfx::resources::texture::TextureManager;

pub(crate) struct MeshGpu {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub topology: GeometryTopology,
}

struct GeometryEntry {
    data: GeometryData,
    gpu: Option<MeshGpu>,
}

/// A point light resolved into world space, ready for the global uniform
#[derive(Copy, Clone, Debug)]
pub struct ResolvedLight {
    pub position: Vector3<f32>,
    pub light: PointLight,
}

/// Scene containing hierarchy, geometry, materials and the camera
pub struct Scene {
    pub camera_manager: CameraManager,
    pub material_manager: MaterialManager,
    pub ambient: AmbientLight,
    /// When false the shadow pass is skipped and the shader reads
    /// every fragment as lit
    pub shadows_enabled: bool,
    /// Node whose point light casts the shadow map
    pub shadow_light: Option<NodeId>,
    nodes: Vec<Node>,
    geometries: Vec<GeometryEntry>,
    root: NodeId,
}

impl Scene {
    pub fn new(camera_manager: CameraManager) -> Self {
        let mut nodes = Vec::new();
        nodes.push(Node::new("root"));
        Self {
            camera_manager,
            material_manager: MaterialManager::new(),
            ambient: AmbientLight::default(),
            shadows_enabled: true,
            shadow_light: None,
            nodes,
            geometries: Vec::new(),
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Registers geometry for reuse by any number of mesh nodes
    pub fn add_geometry(&mut self, data: GeometryData) -> GeometryId {
        self.geometries.push(GeometryEntry { data, gpu: None });
        GeometryId(self.geometries.len() - 1)
    }

    pub fn geometry(&self, id: GeometryId) -> &GeometryData {
        &self.geometries[id.0].data
    }

    fn add_node(&mut self, name: &str, parent: NodeId) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut node = Node::new(name);
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Adds an empty node used purely for hierarchical transforms
    pub fn add_group(&mut self, name: &str, parent: NodeId) -> NodeId {
        self.add_node(name, parent)
    }

    pub fn add_mesh(
        &mut self,
        name: &str,
        parent: NodeId,
        geometry: GeometryId,
        material: &str,
    ) -> NodeId {
        let id = self.add_node(name, parent);
        self.nodes[id.0].geometry = Some(geometry);
        self.nodes[id.0].material = Some(material.to_string());
        id
    }

    pub fn add_light(&mut self, name: &str, parent: NodeId, light: PointLight) -> NodeId {
        let id = self.add_node(name, parent);
        self.nodes[id.0].light = Some(light);
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Looks a child up by name, one level deep
    pub fn find_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .find(|&c| self.nodes[c.0].name == name)
    }

    /// Per-frame state refresh, currently the camera matrices
    pub fn update(&mut self) {
        self.camera_manager.camera.update_view_proj();
    }

    pub fn world_matrix(&self, id: NodeId) -> Matrix4<f32> {
        let node = &self.nodes[id.0];
        let local = node.transform.matrix();
        match node.parent {
            Some(parent) => self.world_matrix(parent) * local,
            None => local,
        }
    }

    pub fn world_position(&self, id: NodeId) -> Vector3<f32> {
        let m = self.world_matrix(id);
        Vector3::new(m.w.x, m.w.y, m.w.z)
    }

    /// True when the node and every ancestor up to the root are visible
    pub fn is_visible(&self, id: NodeId) -> bool {
        let node = &self.nodes[id.0];
        if !node.visible {
            return false;
        }
        match node.parent {
            Some(parent) => self.is_visible(parent),
            None => true,
        }
    }

    /// Point lights that currently contribute to shading, in world space.
    /// Lights under a hidden ancestor are excluded.
    pub fn collect_point_lights(&self) -> Vec<ResolvedLight> {
        let mut lights = Vec::new();
        for i in 0..self.nodes.len() {
            let id = NodeId(i);
            if let Some(light) = self.nodes[i].light {
                if self.is_visible(id) {
                    lights.push(ResolvedLight {
                        position: self.world_position(id),
                        light,
                    });
                }
            }
        }
        lights
    }

    /// Uploads geometry, material and per-node transform data to the GPU
    pub fn init_gpu_resources(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        textures: &TextureManager,
    ) {
        for entry in &mut self.geometries {
            if entry.gpu.is_some() {
                continue;
            }
            let vertices = entry.data.to_vertices();
            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertex Buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Index Buffer"),
                contents: bytemuck::cast_slice(&entry.data.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            entry.gpu = Some(MeshGpu {
                vertex_buffer,
                index_buffer,
                index_count: entry.data.indices.len() as u32,
                topology: entry.data.topology,
            });
        }

        self.material_manager
            .update_all_gpu_resources(device, queue, textures);

        for i in 0..self.nodes.len() {
            if self.nodes[i].geometry.is_some() && self.nodes[i].gpu.is_none() {
                let model = self.world_matrix(NodeId(i));
                self.nodes[i].gpu = Some(NodeGpuResources::new(device, model));
            }
        }
    }

    /// Re-uploads world matrices; unchanged nodes cost nothing because the
    /// uniform buffer skips identical contents
    pub fn update_transforms(&mut self, queue: &wgpu::Queue) {
        for i in 0..self.nodes.len() {
            if self.nodes[i].gpu.is_none() {
                continue;
            }
            let model: [[f32; 4]; 4] = self.world_matrix(NodeId(i)).into();
            if let Some(gpu) = &mut self.nodes[i].gpu {
                gpu.transform_ubo
                    .update_content(queue, TransformUniform { model });
            }
        }
    }

    pub fn update_materials(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        textures: &TextureManager,
    ) {
        self.material_manager
            .update_all_gpu_resources(device, queue, textures);
    }

    pub(crate) fn mesh_gpu(&self, id: GeometryId) -> Option<&MeshGpu> {
        self.geometries[id.0].gpu.as_ref()
    }

    /// Visible mesh nodes in draw order (arena order, parents first)
    pub(crate) fn drawable_nodes(&self) -> Vec<NodeId> {
        (0..self.nodes.len())
            .map(NodeId)
            .filter(|&id| self.nodes[id.0].geometry.is_some() && self.is_visible(id))
            .collect()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(CameraManager::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    fn scene() -> Scene {
        Scene::default()
    }

    #[test]
    fn hierarchy_composes_world_transforms() {
        let mut scene = scene();
        let group = scene.add_group("group", scene.root());
        scene.node_mut(group).set_position(10.0, 0.0, 0.0);
        let child = scene.add_group("child", group);
        scene.node_mut(child).set_position(0.0, 2.5, 0.0);

        let p = scene.world_position(child);
        assert_eq!(p, Vector3::new(10.0, 2.5, 0.0));
    }

    #[test]
    fn group_rotation_carries_children_around() {
        let mut scene = scene();
        let group = scene.add_group("group", scene.root());
        scene
            .node_mut(group)
            .set_rotation(0.0, std::f32::consts::FRAC_PI_2, 0.0);
        let child = scene.add_group("child", group);
        scene.node_mut(child).set_position(1.0, 0.0, 0.0);

        let p = scene.world_position(child);
        // +x rotates onto -z under a quarter turn about y
        assert!(p.x.abs() < 1e-6);
        assert!((p.z + 1.0).abs() < 1e-6);
    }

    #[test]
    fn children_keep_insertion_order() {
        let mut scene = scene();
        let group = scene.add_group("group", scene.root());
        let a = scene.add_group("a", group);
        let b = scene.add_group("b", group);
        let c = scene.add_group("c", group);
        assert_eq!(scene.children(group), &[a, b, c]);
    }

    #[test]
    fn find_child_matches_by_name() {
        let mut scene = scene();
        let group = scene.add_group("group", scene.root());
        let bulb = scene.add_group("bulb", group);
        assert_eq!(scene.find_child(group, "bulb"), Some(bulb));
        assert_eq!(scene.find_child(group, "missing"), None);
    }

    #[test]
    fn hidden_ancestor_excludes_lights() {
        let mut scene = scene();
        let group = scene.add_group("group", scene.root());
        scene.add_light("lamp", group, PointLight::new([1.0, 1.0, 1.0], 1.0, 25.0, 2.0));
        assert_eq!(scene.collect_point_lights().len(), 1);

        scene.node_mut(group).set_visible(false);
        assert!(scene.collect_point_lights().is_empty());
    }

    #[test]
    fn light_position_follows_parent_transform() {
        let mut scene = scene();
        let group = scene.add_group("group", scene.root());
        scene.node_mut(group).set_position(-10.0, 2.5, 10.0);
        let lamp = scene.add_light(
            "lamp",
            group,
            PointLight::new([0.0, 1.0, 1.0], 1.0, 25.0, 2.0),
        );
        scene.node_mut(lamp).set_position(0.0, 2.5, 0.0);

        let lights = scene.collect_point_lights();
        assert_eq!(lights.len(), 1);
        assert_eq!(lights[0].position, Vector3::new(-10.0, 5.0, 10.0));
    }

    #[test]
    fn shared_material_edit_is_seen_by_all_users() {
        use crate::gfx::scene::material::Material;

        let mut scene = scene();
        scene
            .material_manager
            .add_material(Material::new("bush", [0.5, 0.8, 0.3, 1.0], 0.7));
        let geo = scene.add_geometry(crate::gfx::geometry::primitives::generate_sphere(
            0.8, 6, 6,
        ));
        let a = scene.add_mesh("bush-a", scene.root(), geo, "bush");
        let b = scene.add_mesh("bush-b", scene.root(), geo, "bush");

        if let Some(m) = scene.material_manager.get_material_mut("bush") {
            m.roughness = 0.25;
        }
        for id in [a, b] {
            let mat_id = scene.node(id).material.clone();
            let m = scene.material_manager.get_material_for_node(mat_id.as_ref());
            assert_eq!(m.roughness, 0.25);
        }
    }
}
