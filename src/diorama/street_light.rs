//! Street light factory
//!
//! Each lamp is a small subtree: a group positioned on the ground, a
//! pole reaching up to the fixture, an unlit bulb visual and the point
//! light that actually illuminates. The parts are exposed as named
//! handles so callers never rely on child positions.

use std::f32::consts::FRAC_PI_4;

use crate::gfx::geometry::primitives::generate_cylinder;
use crate::gfx::scene::{Material, NodeId, PointLight, Scene};

/// Shared fixture proportions; intensity, distance and decay feed the
/// point light directly
#[derive(Copy, Clone, Debug)]
pub struct StreetLightParams {
    pub height: f32,
    pub intensity: f32,
    pub distance: f32,
    pub decay: f32,
}

impl Default for StreetLightParams {
    fn default() -> Self {
        Self {
            height: 2.5,
            intensity: 1.0,
            distance: 25.0,
            decay: 2.0,
        }
    }
}

/// Handles into one assembled street light
#[derive(Copy, Clone, Debug)]
pub struct StreetLight {
    pub root: NodeId,
    pub pole: NodeId,
    pub bulb_visual: NodeId,
    pub bulb_light: NodeId,
}

/// Builds a street light at ground position (x, z)
///
/// The group origin sits at fixture height, so the pole spans from the
/// ground up past the origin and the bulb parts sit at local y equal to
/// the fixture height again, putting them at 2x height in world space.
pub fn create_street_light(
    scene: &mut Scene,
    x: f32,
    z: f32,
    color: [f32; 3],
    params: &StreetLightParams,
) -> StreetLight {
    let name = format!("street-light-{x:.0}-{z:.0}");

    let material_name = format!("{name}-bulb");
    scene.material_manager.add_material(
        Material::new(&material_name, [color[0], color[1], color[2], 1.0], 0.5)
            .with_emission(color, 1.0)
            .with_unlit(),
    );
    let pole_material = "street-light-pole";
    if scene.material_manager.get_material(pole_material).is_none() {
        scene
            .material_manager
            .add_material(Material::new(pole_material, [1.0, 1.0, 1.0, 1.0], 0.2));
    }

    let root = scene.add_group(&name, scene.root());
    scene.node_mut(root).set_position(x, params.height, z);

    // Pole reaches from the ground to the fixture, centered on the origin
    let pole_geometry = scene.add_geometry(generate_cylinder(0.07, 0.1, params.height * 2.0, 12));
    let pole = scene.add_mesh("pole", root, pole_geometry, pole_material);

    let bulb_geometry = scene.add_geometry(generate_cylinder(0.2, 0.5, 0.5, 10));
    let bulb_visual = scene.add_mesh("bulb", root, bulb_geometry, &material_name);
    scene
        .node_mut(bulb_visual)
        .set_position(0.0, params.height, 0.0)
        .set_rotation(0.0, FRAC_PI_4, 0.0);

    let bulb_light = scene.add_light(
        "light",
        root,
        PointLight::new(color, params.intensity, params.distance, params.decay),
    );
    scene
        .node_mut(bulb_light)
        .set_position(0.0, params.height, 0.0);

    StreetLight {
        root,
        pole,
        bulb_visual,
        bulb_light,
    }
}
