//! Haunted house diorama
//!
//! Assembles the full scene: floor, house, bushes, grave field, the four
//! colored street lights and the control bridge driving them. All
//! placement numbers are either derived in [`layout`] or scattered in
//! [`placement`].

pub mod bridge;
pub mod layout;
pub mod placement;
pub mod street_light;

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use rand::Rng;

use crate::gfx::geometry::primitives::{
    generate_box, generate_cone, generate_grid, generate_plane, generate_sphere,
};
use crate::gfx::scene::{rgb, Material, NodeId, PointLight, Scene};

use bridge::{Bridge, Control, Target};
use layout::HouseDimensions;
use placement::{scatter_graves, BUSHES, BUSH_BASE_HEIGHT, GRAVE_COUNT};
use street_light::{create_street_light, StreetLight, StreetLightParams};

/// Lamp ground positions and fixture colors, one per corner
pub const STREET_LIGHT_POSTS: [(f32, f32, u32); 4] = [
    (-10.0, 10.0, 0x00ffff),
    (10.0, 10.0, 0xff0000),
    (10.0, -10.0, 0x00ff00),
    (-10.0, -10.0, 0xff00ff),
];

const FLOOR_SIZE: f32 = 30.0;
const DOOR_LIGHT_POSITION: [f32; 3] = [0.0, 3.9, 3.25];

pub struct Diorama {
    pub bridge: Bridge,
    pub street_lights: [StreetLight; 4],
    pub grid: NodeId,
    pub door_bulb: NodeId,
    pub door_light: NodeId,
    pub house: NodeId,
}

impl Diorama {
    /// Builds the whole diorama into `scene`. The random source drives
    /// only the grave scatter, so a seeded generator reproduces the
    /// exact graveyard.
    pub fn build<R: Rng>(scene: &mut Scene, rng: &mut R) -> Diorama {
        let house_dims = HouseDimensions::default();
        let root = scene.root();

        scene.ambient.color = rgb(0xb9d5ff);
        scene.ambient.intensity = 0.4;

        register_materials(scene);

        // Grid helper, hidden until toggled from the panel
        let grid_geometry = scene.add_geometry(generate_grid(FLOOR_SIZE, 50));
        let grid = scene.add_mesh("grid", root, grid_geometry, "grid");
        scene.node_mut(grid).set_visible(false);

        let floor_geometry = scene.add_geometry(generate_plane(FLOOR_SIZE, FLOOR_SIZE, 1, 1));
        let floor = scene.add_mesh("floor", root, floor_geometry, "floor");
        scene
            .node_mut(floor)
            .set_position(0.0, -0.01, 0.0)
            .set_rotation(-FRAC_PI_2, 0.0, 0.0);

        let house = scene.add_group("house", root);

        let walls_geometry = scene.add_geometry(generate_box(
            house_dims.wall_width,
            house_dims.wall_height,
            house_dims.wall_depth,
        ));
        let walls = scene.add_mesh("walls", house, walls_geometry, "walls");
        scene
            .node_mut(walls)
            .set_position(0.0, house_dims.wall_center_y(), 0.0);

        let roof_geometry = scene.add_geometry(generate_cone(
            house_dims.roof_radius(),
            house_dims.roof_height(),
            4,
        ));
        let roof = scene.add_mesh("roof", house, roof_geometry, "roof");
        scene
            .node_mut(roof)
            .set_position(0.0, house_dims.roof_center_y(), 0.0)
            .set_rotation(0.0, FRAC_PI_4, 0.0);

        let door_geometry = scene.add_geometry(generate_plane(
            house_dims.door_size,
            house_dims.door_size,
            10,
            10,
        ));
        let door = scene.add_mesh("door", house, door_geometry, "door");
        scene.node_mut(door).set_position(
            0.0,
            house_dims.door_center_y(),
            house_dims.door_offset_z(),
        );

        let bulb_geometry = scene.add_geometry(generate_sphere(0.1, 10, 10));
        let door_bulb = scene.add_mesh("door-bulb", house, bulb_geometry, "door-bulb");
        scene.node_mut(door_bulb).set_position(
            DOOR_LIGHT_POSITION[0],
            DOOR_LIGHT_POSITION[1],
            DOOR_LIGHT_POSITION[2],
        );

        let door_light = scene.add_light(
            "door-light",
            house,
            PointLight::new([1.0, 1.0, 1.0], 1.0, 20.0, 2.0),
        );
        scene.node_mut(door_light).set_position(
            DOOR_LIGHT_POSITION[0],
            DOOR_LIGHT_POSITION[1],
            DOOR_LIGHT_POSITION[2],
        );
        scene.shadow_light = Some(door_light);

        // One sphere shared by all bushes; scale does the rest
        let bushes = scene.add_group("bushes", root);
        let bush_geometry = scene.add_geometry(generate_sphere(0.8, 6, 6));
        for (i, bush) in BUSHES.iter().enumerate() {
            let node = scene.add_mesh(&format!("bush-{i}"), bushes, bush_geometry, "bush");
            scene
                .node_mut(node)
                .set_position(bush.x, BUSH_BASE_HEIGHT * bush.scale, bush.z)
                .set_scale(bush.scale);
        }

        let graves = scene.add_group("graves", root);
        let grave_geometry = scene.add_geometry(generate_box(0.6, 0.8, 0.2));
        for (i, grave) in scatter_graves(rng, GRAVE_COUNT).iter().enumerate() {
            let node = scene.add_mesh(&format!("grave-{i}"), graves, grave_geometry, "grave");
            scene
                .node_mut(node)
                .set_position(grave.position.x, grave.position.y, grave.position.z)
                .set_rotation(0.0, grave.swing_y, grave.tilt_z);
        }

        let params = StreetLightParams::default();
        let street_lights = STREET_LIGHT_POSTS
            .map(|(x, z, color)| create_street_light(scene, x, z, rgb(color), &params));

        let bridge = build_bridge(grid, door_bulb, door_light, &street_lights, &params);

        Diorama {
            bridge,
            street_lights,
            grid,
            door_bulb,
            door_light,
            house,
        }
    }
}

fn register_materials(scene: &mut Scene) {
    let materials = &mut scene.material_manager;
    materials.add_material(
        Material::new("floor", [1.0, 1.0, 1.0, 1.0], 0.5)
            .with_color(rgb(0xa9c388))
            .with_texture("textures/floor/floor.jpg")
            .with_uv_repeat(4.0, 4.0),
    );
    materials.add_material(
        Material::new("walls", [1.0, 1.0, 1.0, 1.0], 0.33)
            .with_texture("textures/bricks/color.jpg"),
    );
    materials.add_material(
        Material::new("roof", [1.0, 1.0, 1.0, 1.0], 0.45)
            .with_color(rgb(0xb35f45))
            .with_texture("textures/bricks/color.jpg"),
    );
    materials.add_material(
        Material::new("door", [1.0, 1.0, 1.0, 1.0], 0.1)
            .with_texture("textures/door/color.jpg")
            .with_transparency(),
    );
    materials.add_material(
        Material::new("door-bulb", [1.0, 1.0, 1.0, 1.0], 1.0)
            .with_color(rgb(0xffffee))
            .with_emission(rgb(0xffffee), 1.0),
    );
    materials.add_material(Material::new("bush", [1.0, 1.0, 1.0, 1.0], 0.7).with_color(rgb(0x89c854)));
    materials.add_material(Material::new("grave", [1.0, 1.0, 1.0, 1.0], 0.8).with_color(rgb(0xb2b6b1)));
    materials.add_material(Material::new("grid", [0.35, 0.35, 0.35, 1.0], 1.0).with_unlit());
}

fn build_bridge(
    grid: NodeId,
    door_bulb: NodeId,
    door_light: NodeId,
    street_lights: &[StreetLight; 4],
    params: &StreetLightParams,
) -> Bridge {
    let lamp_lights: Vec<NodeId> = street_lights.iter().map(|l| l.bulb_light).collect();

    Bridge::new(vec![
        Control::checkbox("Grid Helper", false, vec![Target::NodeVisible(grid)]),
        Control::slider("Ambient Light", 0.0, 1.0, 0.4, vec![Target::AmbientIntensity]),
        Control::checkbox("Enable Shadow", true, vec![Target::ShadowsEnabled]),
        Control::slider(
            "Walls Roughness",
            0.0,
            1.0,
            0.33,
            vec![Target::MaterialRoughness("walls".to_string())],
        ),
        Control::slider(
            "Roof Roughness",
            0.0,
            1.0,
            0.45,
            vec![Target::MaterialRoughness("roof".to_string())],
        ),
        Control::slider(
            "Door Light Intensity",
            0.0,
            2.0,
            1.0,
            vec![Target::LightIntensity(door_light)],
        ),
        Control::slider(
            "Door Light Y",
            0.0,
            10.0,
            DOOR_LIGHT_POSITION[1],
            vec![
                Target::NodePositionY(door_light),
                Target::NodePositionY(door_bulb),
            ],
        ),
        Control::slider(
            "Door Light Z",
            0.0,
            10.0,
            DOOR_LIGHT_POSITION[2],
            vec![
                Target::NodePositionZ(door_light),
                Target::NodePositionZ(door_bulb),
            ],
        ),
        Control::slider(
            "Poll Light Intensity",
            0.1,
            2.0,
            params.intensity,
            lamp_lights.iter().map(|&id| Target::LightIntensity(id)).collect(),
        ),
        Control::slider(
            "Poll Light Decay",
            0.1,
            3.0,
            params.decay,
            lamp_lights.iter().map(|&id| Target::LightDecay(id)).collect(),
        ),
        Control::slider(
            "Poll Light Distance",
            0.1,
            50.0,
            params.distance,
            lamp_lights.iter().map(|&id| Target::LightDistance(id)).collect(),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn build() -> (Scene, Diorama) {
        let mut scene = Scene::default();
        let mut rng = StdRng::seed_from_u64(1);
        let diorama = Diorama::build(&mut scene, &mut rng);
        (scene, diorama)
    }

    #[test]
    fn graveyard_has_twenty_graves() {
        let (scene, _diorama) = build();
        let graves = scene
            .find_child(scene.root(), "graves")
            .expect("graves group");
        assert_eq!(scene.children(graves).len(), GRAVE_COUNT);
    }

    #[test]
    fn roof_rests_on_the_walls() {
        let (scene, diorama) = build();
        let roof = scene.find_child(diorama.house, "roof").expect("roof");
        let y = scene.node(roof).transform.position.y;
        assert!((y - 4.6).abs() < 1e-5);
    }

    #[test]
    fn door_sits_in_front_of_the_wall() {
        let (scene, diorama) = build();
        let door = scene.find_child(diorama.house, "door").expect("door");
        let p = scene.node(door).transform.position;
        assert!((p.z - 3.01).abs() < 1e-5);
        assert!((p.y - 1.5).abs() < 1e-5);
    }

    #[test]
    fn bushes_are_grouped_under_one_node() {
        let (mut scene, _diorama) = build();
        let bushes = scene
            .find_child(scene.root(), "bushes")
            .expect("bushes group");
        assert_eq!(scene.children(bushes).len(), BUSHES.len());

        // hiding the group hides every bush
        let first = scene.find_child(bushes, "bush-0").expect("bush");
        assert!(scene.is_visible(first));
        scene.node_mut(bushes).set_visible(false);
        assert!(!scene.is_visible(first));
    }

    #[test]
    fn scaled_bushes_sink_proportionally() {
        let (scene, _diorama) = build();
        let bushes = scene
            .find_child(scene.root(), "bushes")
            .expect("bushes group");
        let bush = scene.find_child(bushes, "bush-1").expect("bush");
        let node = scene.node(bush);
        assert_eq!(node.transform.scale.x, 0.4);
        assert!((node.transform.position.y - 0.4 * 0.4).abs() < 1e-6);
    }

    #[test]
    fn four_street_lights_plus_door_light_shine() {
        let (scene, _diorama) = build();
        // 4 lamp lights and the door light
        assert_eq!(scene.collect_point_lights().len(), 5);
    }

    #[test]
    fn grid_starts_hidden_and_survives_initial_sync() {
        let (mut scene, mut diorama) = build();
        assert!(!scene.node(diorama.grid).visible);
        diorama.bridge.sync(&mut scene);
        assert!(!scene.node(diorama.grid).visible);
    }

    #[test]
    fn bridge_initial_values_match_built_scene() {
        let (mut scene, mut diorama) = build();
        diorama.bridge.sync(&mut scene);

        assert_eq!(scene.ambient.intensity, 0.4);
        assert_eq!(
            scene.material_manager.get_material("walls").unwrap().roughness,
            0.33
        );
        for lamp in &diorama.street_lights {
            let light = scene.node(lamp.bulb_light).light.unwrap();
            assert_eq!(light.intensity, 1.0);
            assert_eq!(light.decay, 2.0);
            assert_eq!(light.distance, 25.0);
        }
    }

    #[test]
    fn door_light_casts_the_shadows() {
        let (mut scene, mut diorama) = build();
        assert_eq!(scene.shadow_light, Some(diorama.door_light));
        assert!(scene.shadows_enabled);

        diorama.bridge.set_value("Enable Shadow", 0.0);
        diorama.bridge.sync(&mut scene);
        assert!(!scene.shadows_enabled);
    }

    #[test]
    fn poll_sliders_drive_all_four_lamps() {
        let (mut scene, mut diorama) = build();
        diorama.bridge.set_value("Poll Light Distance", 40.0);
        diorama.bridge.sync(&mut scene);
        for lamp in &diorama.street_lights {
            assert_eq!(scene.node(lamp.bulb_light).light.unwrap().distance, 40.0);
        }
    }

    #[test]
    fn door_light_sliders_mirror_bulb_and_light() {
        let (mut scene, mut diorama) = build();
        diorama.bridge.set_value("Door Light Y", 7.5);
        diorama.bridge.set_value("Door Light Z", 5.0);
        diorama.bridge.sync(&mut scene);

        for id in [diorama.door_bulb, diorama.door_light] {
            let p = scene.node(id).transform.position;
            assert_eq!(p.y, 7.5);
            assert_eq!(p.z, 5.0);
        }
    }
}
