//! # Primitive Shape Generation
//!
//! Generators for the shapes the diorama is assembled from. All shapes are
//! produced with outward normals and UV coordinates.

use super::{GeometryData, GeometryTopology};
use std::f32::consts::PI;

/// Generate a plane in the XY plane facing +Z, centered at the origin
///
/// Vertical surfaces (the door) use it as-is; horizontal ones (the floor)
/// rotate the node by -PI/2 about X.
pub fn generate_plane(
    width: f32,
    height: f32,
    width_segments: u32,
    height_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new(GeometryTopology::TriangleList);

    let w_segs = width_segments.max(1);
    let h_segs = height_segments.max(1);

    for y in 0..=h_segs {
        let v = y as f32 / h_segs as f32;
        let pos_y = (v - 0.5) * height;

        for x in 0..=w_segs {
            let u = x as f32 / w_segs as f32;
            let pos_x = (u - 0.5) * width;

            data.vertices.push([pos_x, pos_y, 0.0]);
            data.normals.push([0.0, 0.0, 1.0]);
            data.tex_coords.push([u, v]);
        }
    }

    for y in 0..h_segs {
        for x in 0..w_segs {
            let i = y * (w_segs + 1) + x;
            let next_row = i + w_segs + 1;

            data.indices.push(i);
            data.indices.push(i + 1);
            data.indices.push(next_row);

            data.indices.push(next_row);
            data.indices.push(i + 1);
            data.indices.push(next_row + 1);
        }
    }

    data
}

/// Generate an axis-aligned box centered at the origin
pub fn generate_box(width: f32, height: f32, depth: f32) -> GeometryData {
    let mut data = GeometryData::new(GeometryTopology::TriangleList);

    let hw = width * 0.5;
    let hh = height * 0.5;
    let hd = depth * 0.5;

    // (normal, four corners counter-clockwise seen from outside)
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        (
            [0.0, 0.0, 1.0],
            [
                [-hw, -hh, hd],
                [hw, -hh, hd],
                [hw, hh, hd],
                [-hw, hh, hd],
            ],
        ),
        (
            [0.0, 0.0, -1.0],
            [
                [hw, -hh, -hd],
                [-hw, -hh, -hd],
                [-hw, hh, -hd],
                [hw, hh, -hd],
            ],
        ),
        (
            [-1.0, 0.0, 0.0],
            [
                [-hw, -hh, -hd],
                [-hw, -hh, hd],
                [-hw, hh, hd],
                [-hw, hh, -hd],
            ],
        ),
        (
            [1.0, 0.0, 0.0],
            [
                [hw, -hh, hd],
                [hw, -hh, -hd],
                [hw, hh, -hd],
                [hw, hh, hd],
            ],
        ),
        (
            [0.0, 1.0, 0.0],
            [
                [-hw, hh, hd],
                [hw, hh, hd],
                [hw, hh, -hd],
                [-hw, hh, -hd],
            ],
        ),
        (
            [0.0, -1.0, 0.0],
            [
                [-hw, -hh, -hd],
                [hw, -hh, -hd],
                [hw, -hh, hd],
                [-hw, -hh, hd],
            ],
        ),
    ];

    let uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    for (normal, corners) in faces.iter() {
        let base = data.vertices.len() as u32;
        for (corner, uv) in corners.iter().zip(uvs.iter()) {
            data.vertices.push(*corner);
            data.normals.push(*normal);
            data.tex_coords.push(*uv);
        }
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    data
}

/// Generate a UV sphere centered at the origin
///
/// # Arguments
/// * `radius` - Sphere radius
/// * `longitude_segments` - Number of vertical segments
/// * `latitude_segments` - Number of horizontal segments
pub fn generate_sphere(radius: f32, longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    let mut data = GeometryData::new(GeometryTopology::TriangleList);

    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32; // 0 to PI
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32;
            let sin_phi = phi.sin();
            let cos_phi = phi.cos();

            let x = sin_theta * cos_phi;
            let y = cos_theta;
            let z = sin_theta * sin_phi;

            data.vertices.push([x * radius, y * radius, z * radius]);
            data.normals.push([x, y, z]);
            data.tex_coords.push([
                long as f32 / long_segs as f32,
                lat as f32 / lat_segs as f32,
            ]);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices.push(first);
            data.indices.push(second);
            data.indices.push(first + 1);

            data.indices.push(second);
            data.indices.push(second + 1);
            data.indices.push(first + 1);
        }
    }

    data
}

/// Generate a cylinder or cone frustum along the Y axis
///
/// Runs from -height/2 to height/2. A `radius_top` of zero yields a cone
/// (the roof pyramid uses 4 segments, the street-light bulb a truncated
/// cone), and degenerate caps are skipped.
pub fn generate_cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new(GeometryTopology::TriangleList);

    let segs = segments.max(3);
    let half_height = height * 0.5;
    let slope = (radius_bottom - radius_top) / height;

    // Side wall
    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let cos_a = angle.cos();
        let sin_a = angle.sin();

        let normal = normalize([cos_a, slope, sin_a]);
        let u = i as f32 / segs as f32;

        data.vertices
            .push([radius_bottom * cos_a, -half_height, radius_bottom * sin_a]);
        data.normals.push(normal);
        data.tex_coords.push([u, 0.0]);

        data.vertices
            .push([radius_top * cos_a, half_height, radius_top * sin_a]);
        data.normals.push(normal);
        data.tex_coords.push([u, 1.0]);
    }

    for i in 0..segs {
        let bottom_current = i * 2;
        let top_current = bottom_current + 1;
        let bottom_next = (i + 1) * 2;
        let top_next = bottom_next + 1;

        data.indices.push(bottom_current);
        data.indices.push(top_current);
        data.indices.push(bottom_next);

        data.indices.push(top_current);
        data.indices.push(top_next);
        data.indices.push(bottom_next);
    }

    // Caps, skipped for degenerate radii
    for (radius, y, normal_y) in [
        (radius_bottom, -half_height, -1.0f32),
        (radius_top, half_height, 1.0f32),
    ] {
        if radius <= f32::EPSILON {
            continue;
        }

        let center = data.vertices.len() as u32;
        data.vertices.push([0.0, y, 0.0]);
        data.normals.push([0.0, normal_y, 0.0]);
        data.tex_coords.push([0.5, 0.5]);

        let ring_start = data.vertices.len() as u32;
        for i in 0..=segs {
            let angle = i as f32 * 2.0 * PI / segs as f32;
            data.vertices
                .push([radius * angle.cos(), y, radius * angle.sin()]);
            data.normals.push([0.0, normal_y, 0.0]);
            data.tex_coords
                .push([angle.cos() * 0.5 + 0.5, angle.sin() * 0.5 + 0.5]);
        }

        for i in 0..segs {
            if normal_y < 0.0 {
                data.indices.push(center);
                data.indices.push(ring_start + i);
                data.indices.push(ring_start + i + 1);
            } else {
                data.indices.push(center);
                data.indices.push(ring_start + i + 1);
                data.indices.push(ring_start + i);
            }
        }
    }

    data
}

/// Generate an upright cone; a cylinder with its top ring collapsed
pub fn generate_cone(radius: f32, height: f32, segments: u32) -> GeometryData {
    generate_cylinder(0.0, radius, height, segments)
}

/// Generate a square line grid on the XZ plane at y = 0
///
/// `size` is the edge length, `divisions` the number of cells per edge.
pub fn generate_grid(size: f32, divisions: u32) -> GeometryData {
    let mut data = GeometryData::new(GeometryTopology::LineList);

    let divs = divisions.max(1);
    let half = size * 0.5;
    let step = size / divs as f32;

    for i in 0..=divs {
        let offset = -half + i as f32 * step;

        // Line parallel to X
        for x in [-half, half] {
            data.vertices.push([x, 0.0, offset]);
            data.normals.push([0.0, 1.0, 0.0]);
            data.tex_coords.push([0.0, 0.0]);
        }

        // Line parallel to Z
        for z in [-half, half] {
            data.vertices.push([offset, 0.0, z]);
            data.normals.push([0.0, 1.0, 0.0]);
            data.tex_coords.push([0.0, 0.0]);
        }
    }

    data.indices = (0..data.vertices.len() as u32).collect();
    data
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len > 0.0 {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_generation() {
        let cube = generate_box(1.0, 1.0, 1.0);
        assert_eq!(cube.vertices.len(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(cube.triangle_count(), 12);
        assert!((cube.height() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(0.8, 6, 6);
        assert!(!sphere.vertices.is_empty());
        assert_eq!(sphere.vertices.len(), sphere.normals.len());
        assert_eq!(sphere.vertices.len(), sphere.tex_coords.len());

        for v in &sphere.vertices {
            let r = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            assert!((r - 0.8).abs() < 1e-4);
        }
    }

    #[test]
    fn test_plane_generation() {
        let plane = generate_plane(3.0, 3.0, 2, 2);
        assert_eq!(plane.vertices.len(), 9); // 3x3 grid
        assert_eq!(plane.indices.len(), 24); // 4 quads * 2 triangles * 3 indices

        // Faces +Z
        for n in &plane.normals {
            assert_eq!(*n, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_cylinder_spans_height() {
        let pole = generate_cylinder(0.07, 0.1, 5.0, 12);
        assert!((pole.height() - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_cone_has_no_top_cap() {
        let cone = generate_cylinder(0.0, 2.0, 1.0, 4);
        let capped = generate_cylinder(0.5, 2.0, 1.0, 4);
        assert!(cone.vertices.len() < capped.vertices.len());

        // Apex ring collapses onto the axis
        let apex_on_axis = cone
            .vertices
            .iter()
            .filter(|v| v[1] > 0.49)
            .all(|v| v[0].abs() < 1e-5 && v[2].abs() < 1e-5);
        assert!(apex_on_axis);
    }

    #[test]
    fn test_grid_is_line_list() {
        let grid = generate_grid(30.0, 50);
        assert_eq!(grid.topology, GeometryTopology::LineList);
        // 51 lines each way, 2 vertices per line
        assert_eq!(grid.vertices.len(), 51 * 4);
        assert_eq!(grid.indices.len() % 2, 0);
        assert_eq!(grid.triangle_count(), 0);
    }
}
