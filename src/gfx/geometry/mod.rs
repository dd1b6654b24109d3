//! # Procedural Geometry Generation
//!
//! Every mesh in the diorama is generated here; there is no model-file
//! loading path. Shapes follow the Y-up convention of the scene: planes lie
//! in XY facing +Z (the floor is a rotated plane), cylinders and cones run
//! along Y.

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::vertex::Vertex3D;

/// How the index list of a [`GeometryData`] is to be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryTopology {
    TriangleList,
    LineList,
}

/// Generated geometry ready for GPU upload
#[derive(Debug, Clone)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Indices, interpreted per `topology`
    pub indices: Vec<u32>,
    pub topology: GeometryTopology,
}

impl GeometryData {
    pub fn new(topology: GeometryTopology) -> Self {
        Self {
            vertices: Vec::new(),
            normals: Vec::new(),
            tex_coords: Vec::new(),
            indices: Vec::new(),
            topology,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        match self.topology {
            GeometryTopology::TriangleList => self.indices.len() / 3,
            GeometryTopology::LineList => 0,
        }
    }

    /// Vertical extent of the geometry, 0.0 when empty
    pub fn height(&self) -> f32 {
        let mut min_y = f32::MAX;
        let mut max_y = f32::MIN;
        for v in &self.vertices {
            min_y = min_y.min(v[1]);
            max_y = max_y.max(v[1]);
        }
        if self.vertices.is_empty() {
            0.0
        } else {
            max_y - min_y
        }
    }

    /// Interleaves the attribute arrays into the renderer's vertex format
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        (0..self.vertices.len())
            .map(|i| Vertex3D {
                position: self.vertices[i],
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                uv: self.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect()
    }
}
