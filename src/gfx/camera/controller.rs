use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, MouseScrollDelta},
    window::Window,
};

use super::orbit_camera::OrbitCamera;

/// Pointer input to orbit motion, with exponential damping
///
/// Drag and wheel events feed velocities; [`CameraController::update`] is
/// called once per tick to integrate them into the camera and decay them,
/// giving the inertia-like motion of a damped orbit control.
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    /// Fraction of velocity removed per 60 Hz frame, in (0, 1]
    pub damping: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
    zoom_velocity: f32,
    is_mouse_pressed: bool,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32, damping: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            damping: damping.clamp(f32::EPSILON, 1.0),
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            zoom_velocity: 0.0,
            is_mouse_pressed: false,
        }
    }

    pub fn process_events(&mut self, event: &DeviceEvent, window: &Window) {
        match event {
            DeviceEvent::Button {
                button: 0, // left mouse button
                state,
            } => {
                self.is_mouse_pressed = *state == ElementState::Pressed;
            }
            DeviceEvent::MouseWheel { delta, .. } => {
                let scroll_amount = -match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => {
                        *scroll as f32
                    }
                };
                self.zoom_velocity += scroll_amount * self.zoom_speed;
                window.request_redraw();
            }
            DeviceEvent::MouseMotion { delta } => {
                if self.is_mouse_pressed {
                    self.yaw_velocity += -delta.0 as f32 * self.rotate_speed;
                    self.pitch_velocity += delta.1 as f32 * self.rotate_speed;
                    window.request_redraw();
                }
            }
            _ => (),
        }
    }

    /// Applies the current velocities to the camera and decays them
    pub fn update(&mut self, camera: &mut OrbitCamera, dt: f32) {
        if !self.is_moving() {
            return;
        }

        camera.add_yaw(self.yaw_velocity);
        camera.add_pitch(self.pitch_velocity);
        camera.add_distance(self.zoom_velocity);

        // Normalized so the decay rate is framerate independent
        let decay = (1.0 - self.damping).powf(dt * 60.0);
        self.yaw_velocity *= decay;
        self.pitch_velocity *= decay;
        self.zoom_velocity *= decay;

        const REST: f32 = 1e-5;
        if self.yaw_velocity.abs() < REST {
            self.yaw_velocity = 0.0;
        }
        if self.pitch_velocity.abs() < REST {
            self.pitch_velocity = 0.0;
        }
        if self.zoom_velocity.abs() < REST {
            self.zoom_velocity = 0.0;
        }
    }

    pub fn is_moving(&self) -> bool {
        self.yaw_velocity != 0.0 || self.pitch_velocity != 0.0 || self.zoom_velocity != 0.0
    }

    #[cfg(test)]
    fn push(&mut self, yaw: f32, pitch: f32, zoom: f32) {
        self.yaw_velocity += yaw;
        self.pitch_velocity += pitch;
        self.zoom_velocity += zoom;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Vector3, Zero};

    fn camera() -> OrbitCamera {
        OrbitCamera::new(20.0, 0.25, 0.0, Vector3::zero(), 1.0)
    }

    #[test]
    fn damping_decays_velocity_to_rest() {
        let mut controller = CameraController::new(0.005, 0.4, 0.1);
        let mut cam = camera();

        controller.push(0.1, 0.0, 0.0);
        assert!(controller.is_moving());

        for _ in 0..10_000 {
            controller.update(&mut cam, 1.0 / 60.0);
        }
        assert!(!controller.is_moving());
    }

    #[test]
    fn yaw_advances_while_damped() {
        let mut controller = CameraController::new(0.005, 0.4, 0.1);
        let mut cam = camera();
        let start_yaw = cam.yaw;

        controller.push(0.05, 0.0, 0.0);
        controller.update(&mut cam, 1.0 / 60.0);
        let after_one = cam.yaw;
        controller.update(&mut cam, 1.0 / 60.0);
        let after_two = cam.yaw;

        assert!(after_one > start_yaw);
        assert!(after_two > after_one);
        // Each step contributes less than the one before
        assert!((after_two - after_one) < (after_one - start_yaw));
    }

    #[test]
    fn idle_update_is_a_no_op() {
        let mut controller = CameraController::new(0.005, 0.4, 0.1);
        let mut cam = camera();
        let yaw = cam.yaw;
        let distance = cam.distance;

        controller.update(&mut cam, 1.0 / 60.0);

        assert_eq!(cam.yaw, yaw);
        assert_eq!(cam.distance, distance);
    }
}
