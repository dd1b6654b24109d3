//! Parameter bridge between the UI and the scene
//!
//! The panel edits plain floats; the bridge owns a declarative table
//! mapping each control to the scene values it drives. `sync` applies
//! only controls whose value changed since the last application, so an
//! untouched slider never stomps scene state, and one control may fan
//! out to several targets (the four lamp lights share three sliders).

use crate::gfx::scene::{NodeId, Scene};

/// A scene value a control can drive
#[derive(Clone, Debug)]
pub enum Target {
    AmbientIntensity,
    ShadowsEnabled,
    NodeVisible(NodeId),
    MaterialRoughness(String),
    LightIntensity(NodeId),
    LightDecay(NodeId),
    LightDistance(NodeId),
    NodePositionY(NodeId),
    NodePositionZ(NodeId),
}

#[derive(Copy, Clone, Debug)]
pub enum ControlKind {
    Slider { min: f32, max: f32 },
    Checkbox,
}

pub struct Control {
    pub label: &'static str,
    pub kind: ControlKind,
    pub value: f32,
    /// Last value pushed into the scene; None forces the first sync
    applied: Option<f32>,
    targets: Vec<Target>,
}

impl Control {
    pub fn slider(label: &'static str, min: f32, max: f32, value: f32, targets: Vec<Target>) -> Self {
        Self {
            label,
            kind: ControlKind::Slider { min, max },
            value,
            applied: None,
            targets,
        }
    }

    pub fn checkbox(label: &'static str, on: bool, targets: Vec<Target>) -> Self {
        Self {
            label,
            kind: ControlKind::Checkbox,
            value: if on { 1.0 } else { 0.0 },
            applied: None,
            targets,
        }
    }
}

pub struct Bridge {
    controls: Vec<Control>,
}

impl Bridge {
    pub fn new(controls: Vec<Control>) -> Self {
        Self { controls }
    }

    pub fn controls_mut(&mut self) -> impl Iterator<Item = &mut Control> {
        self.controls.iter_mut()
    }

    pub fn value(&self, label: &str) -> Option<f32> {
        self.controls
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.value)
    }

    /// Sets a control value, clamped to its slider range
    pub fn set_value(&mut self, label: &str, value: f32) {
        if let Some(control) = self.controls.iter_mut().find(|c| c.label == label) {
            control.value = match control.kind {
                ControlKind::Slider { min, max } => value.clamp(min, max),
                ControlKind::Checkbox => {
                    if value > 0.5 {
                        1.0
                    } else {
                        0.0
                    }
                }
            };
        }
    }

    /// Pushes changed control values into the scene
    pub fn sync(&mut self, scene: &mut Scene) {
        for control in &mut self.controls {
            if control.applied == Some(control.value) {
                continue;
            }
            for target in &control.targets {
                apply(scene, target, control.value);
            }
            control.applied = Some(control.value);
        }
    }
}

fn apply(scene: &mut Scene, target: &Target, value: f32) {
    match target {
        Target::AmbientIntensity => scene.ambient.intensity = value,
        Target::ShadowsEnabled => scene.shadows_enabled = value > 0.5,
        Target::NodeVisible(id) => {
            scene.node_mut(*id).visible = value > 0.5;
        }
        Target::MaterialRoughness(name) => {
            if let Some(material) = scene.material_manager.get_material_mut(name) {
                material.roughness = value;
            }
        }
        Target::LightIntensity(id) => {
            if let Some(light) = scene.node_mut(*id).light.as_mut() {
                light.intensity = value;
            }
        }
        Target::LightDecay(id) => {
            if let Some(light) = scene.node_mut(*id).light.as_mut() {
                light.decay = value;
            }
        }
        Target::LightDistance(id) => {
            if let Some(light) = scene.node_mut(*id).light.as_mut() {
                light.distance = value;
            }
        }
        Target::NodePositionY(id) => {
            scene.node_mut(*id).transform.position.y = value;
        }
        Target::NodePositionZ(id) => {
            scene.node_mut(*id).transform.position.z = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::PointLight;

    fn scene_with_lamps() -> (Scene, Vec<NodeId>) {
        let mut scene = Scene::default();
        let lamps: Vec<NodeId> = (0..4)
            .map(|i| {
                scene.add_light(
                    &format!("lamp-{i}"),
                    scene.root(),
                    PointLight::new([1.0, 1.0, 1.0], 1.0, 25.0, 2.0),
                )
            })
            .collect();
        (scene, lamps)
    }

    #[test]
    fn one_slider_broadcasts_to_all_lamps() {
        let (mut scene, lamps) = scene_with_lamps();
        let targets = lamps.iter().map(|&id| Target::LightIntensity(id)).collect();
        let mut bridge = Bridge::new(vec![Control::slider("Pole Light Intensity", 0.1, 2.0, 1.0, targets)]);

        bridge.set_value("Pole Light Intensity", 1.7);
        bridge.sync(&mut scene);

        for &id in &lamps {
            assert_eq!(scene.node(id).light.unwrap().intensity, 1.7);
        }
    }

    #[test]
    fn untouched_control_does_not_stomp_direct_edits() {
        let (mut scene, lamps) = scene_with_lamps();
        let mut bridge = Bridge::new(vec![Control::slider(
            "Pole Light Intensity",
            0.1,
            2.0,
            1.0,
            vec![Target::LightIntensity(lamps[0])],
        )]);
        bridge.sync(&mut scene);

        // a scene-side edit survives as long as the slider stays put
        if let Some(light) = scene.node_mut(lamps[0]).light.as_mut() {
            light.intensity = 0.3;
        }
        bridge.sync(&mut scene);
        assert_eq!(scene.node(lamps[0]).light.unwrap().intensity, 0.3);

        bridge.set_value("Pole Light Intensity", 1.5);
        bridge.sync(&mut scene);
        assert_eq!(scene.node(lamps[0]).light.unwrap().intensity, 1.5);
    }

    #[test]
    fn one_slider_mirrors_light_and_visual_height() {
        let mut scene = Scene::default();
        let bulb = scene.add_group("door-bulb", scene.root());
        let light = scene.add_light(
            "door-light",
            scene.root(),
            PointLight::new([1.0, 1.0, 1.0], 1.0, 20.0, 2.0),
        );
        let mut bridge = Bridge::new(vec![Control::slider(
            "Door Light Y",
            0.0,
            10.0,
            3.9,
            vec![Target::NodePositionY(bulb), Target::NodePositionY(light)],
        )]);

        bridge.set_value("Door Light Y", 6.0);
        bridge.sync(&mut scene);
        assert_eq!(scene.node(bulb).transform.position.y, 6.0);
        assert_eq!(scene.node(light).transform.position.y, 6.0);
    }

    #[test]
    fn slider_values_clamp_to_range() {
        let (mut scene, lamps) = scene_with_lamps();
        let mut bridge = Bridge::new(vec![Control::slider(
            "Pole Light Decay",
            0.1,
            3.0,
            2.0,
            vec![Target::LightDecay(lamps[0])],
        )]);
        bridge.set_value("Pole Light Decay", 99.0);
        bridge.sync(&mut scene);
        assert_eq!(scene.node(lamps[0]).light.unwrap().decay, 3.0);

        bridge.set_value("Pole Light Decay", -1.0);
        bridge.sync(&mut scene);
        assert_eq!(scene.node(lamps[0]).light.unwrap().decay, 0.1);
    }

    #[test]
    fn checkbox_toggles_node_visibility() {
        let mut scene = Scene::default();
        let grid = scene.add_group("grid", scene.root());
        scene.node_mut(grid).set_visible(false);

        let mut bridge = Bridge::new(vec![Control::checkbox(
            "Grid Helper",
            false,
            vec![Target::NodeVisible(grid)],
        )]);
        bridge.sync(&mut scene);
        assert!(!scene.node(grid).visible);

        bridge.set_value("Grid Helper", 1.0);
        bridge.sync(&mut scene);
        assert!(scene.node(grid).visible);
    }

    #[test]
    fn checkbox_toggles_shadowing() {
        let mut scene = Scene::default();
        assert!(scene.shadows_enabled);

        let mut bridge = Bridge::new(vec![Control::checkbox(
            "Enable Shadow",
            true,
            vec![Target::ShadowsEnabled],
        )]);
        bridge.sync(&mut scene);
        assert!(scene.shadows_enabled);

        bridge.set_value("Enable Shadow", 0.0);
        bridge.sync(&mut scene);
        assert!(!scene.shadows_enabled);

        bridge.set_value("Enable Shadow", 1.0);
        bridge.sync(&mut scene);
        assert!(scene.shadows_enabled);
    }

    #[test]
    fn roughness_edit_reaches_the_material() {
        let mut scene = Scene::default();
        scene.material_manager.add_material(
            crate::gfx::scene::Material::new("walls", [1.0; 4], 0.33),
        );
        let mut bridge = Bridge::new(vec![Control::slider(
            "Walls Roughness",
            0.0,
            1.0,
            0.33,
            vec![Target::MaterialRoughness("walls".to_string())],
        )]);
        bridge.set_value("Walls Roughness", 0.8);
        bridge.sync(&mut scene);
        assert_eq!(
            scene.material_manager.get_material("walls").unwrap().roughness,
            0.8
        );
    }
}
