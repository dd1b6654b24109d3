//! Scene graph nodes
//!
//! Nodes live in the scene's arena and point to each other through
//! [`NodeId`] handles. A node can carry a mesh, a point light, both, or
//! nothing at all (a plain group used for hierarchical transforms).

use cgmath::{Deg, Matrix4, Rad, Vector3};
use wgpu::Device;

use crate::gfx::scene::light::PointLight;
use crate::gfx::scene::material::MaterialId;
use crate::wgpu_utils::{binding, BindGroupBuilder, BindGroupLayoutBuilder, UniformBuffer};

/// Handle to a node inside the scene arena
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// Handle to geometry data registered with the scene
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GeometryId(pub(crate) usize);

/// Local TRS transform, rotation as XYZ Euler angles in radians
#[derive(Copy, Clone, Debug)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z))
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformUniform {
    pub model: [[f32; 4]; 4],
}

pub(crate) fn node_bind_group_layout(device: &Device) -> wgpu::BindGroupLayout {
    BindGroupLayoutBuilder::new()
        .next_binding_vertex(binding::uniform())
        .create(device, "Node Transform Bind Group Layout")
}

pub(crate) struct NodeGpuResources {
    pub transform_ubo: UniformBuffer<TransformUniform>,
    pub bind_group: wgpu::BindGroup,
}

impl NodeGpuResources {
    pub fn new(device: &Device, model: Matrix4<f32>) -> Self {
        let transform_ubo = UniformBuffer::new_with_data(
            device,
            &TransformUniform {
                model: model.into(),
            },
        );
        let layout = node_bind_group_layout(device);
        let bind_group = BindGroupBuilder::new(&layout)
            .resource(transform_ubo.binding_resource())
            .create(device, "Node Transform Bind Group");
        Self {
            transform_ubo,
            bind_group,
        }
    }
}

/// One entry in the scene graph
pub struct Node {
    pub name: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub transform: Transform,
    pub geometry: Option<GeometryId>,
    pub material: Option<MaterialId>,
    pub light: Option<PointLight>,
    /// Hidden nodes (and their subtrees) are skipped by rendering and
    /// by light collection
    pub visible: bool,
    pub(crate) gpu: Option<NodeGpuResources>,
}

impl Node {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            children: Vec::new(),
            transform: Transform::default(),
            geometry: None,
            material: None,
            light: None,
            visible: true,
            gpu: None,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn set_position(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.transform.position = Vector3::new(x, y, z);
        self
    }

    pub fn set_rotation(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.transform.rotation = Vector3::new(x, y, z);
        self
    }

    pub fn set_rotation_deg(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.transform.rotation = Vector3::new(
            Rad::from(Deg(x)).0,
            Rad::from(Deg(y)).0,
            Rad::from(Deg(z)).0,
        );
        self
    }

    pub fn set_scale(&mut self, scale: f32) -> &mut Self {
        self.transform.scale = Vector3::new(scale, scale, scale);
        self
    }

    pub fn set_scale_xyz(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.transform.scale = Vector3::new(x, y, z);
        self
    }

    pub fn set_visible(&mut self, visible: bool) -> &mut Self {
        self.visible = visible;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::SquareMatrix;

    #[test]
    fn default_transform_is_identity() {
        let t = Transform::default();
        assert_eq!(t.matrix(), Matrix4::identity());
    }

    #[test]
    fn translation_lands_in_last_column() {
        let mut t = Transform::default();
        t.position = Vector3::new(1.0, 2.0, 3.0);
        let m = t.matrix();
        assert_eq!(m.w.x, 1.0);
        assert_eq!(m.w.y, 2.0);
        assert_eq!(m.w.z, 3.0);
    }

    #[test]
    fn scale_applies_before_translation() {
        let mut t = Transform::default();
        t.position = Vector3::new(10.0, 0.0, 0.0);
        t.scale = Vector3::new(2.0, 2.0, 2.0);
        // Point at local x=1 ends up at 10 + 2*1
        let p = t.matrix() * cgmath::Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert!((p.x - 12.0).abs() < 1e-6);
    }
}
