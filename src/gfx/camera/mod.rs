pub mod controller;
pub mod orbit_camera;

pub use controller::CameraController;
pub use orbit_camera::{CameraUniform, OrbitCamera, OPENGL_TO_WGPU_MATRIX};

use winit::{event::DeviceEvent, window::Window};

/// Pairs the orbit camera with its input controller
pub struct CameraManager {
    pub camera: OrbitCamera,
    pub controller: CameraController,
}

impl CameraManager {
    pub fn new(camera: OrbitCamera, controller: CameraController) -> Self {
        Self { camera, controller }
    }

    pub fn process_event(&mut self, event: &DeviceEvent, window: &Window) {
        self.controller.process_events(event, window);
    }

    /// Advances the damped orbit motion by one tick
    pub fn update(&mut self, dt: f32) {
        self.controller.update(&mut self.camera, dt);
    }
}

impl Default for CameraManager {
    fn default() -> Self {
        Self::new(
            OrbitCamera::new(20.0, 0.25, 0.0, cgmath::Vector3::new(0.0, 0.0, 0.0), 1.0),
            CameraController::new(0.005, 0.4, 0.1),
        )
    }
}
