//! Application shell
//!
//! Owns the winit event loop and wires input, the parameter bridge, the
//! scene and the renderer together. The per-frame order matters: camera
//! first, then bridge fan-out, then scene matrices, then GPU uploads.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use cgmath::Vector3;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::diorama::Diorama;
use crate::gfx::camera::{CameraController, CameraManager, OrbitCamera};
use crate::gfx::rendering::RenderEngine;
use crate::gfx::scene::Scene;
use crate::performance::FrameStats;
use crate::ui::{diorama_panel, UiManager};

pub struct DioramaApp {
    event_loop: Option<EventLoop<()>>,
    state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    scene: Scene,
    diorama: Diorama,
    stats: FrameStats,
    last_tick: Instant,
}

impl DioramaApp {
    pub fn new() -> Result<Self> {
        let event_loop = EventLoop::new()?;

        // Matches a viewpoint at (0, 5, 20) looking at the origin
        let distance = (5.0f32 * 5.0 + 20.0 * 20.0).sqrt();
        let pitch = (5.0f32 / distance).asin();
        let camera = OrbitCamera::new(distance, pitch, 0.0, Vector3::new(0.0, 0.0, 0.0), 1.0);
        let controller = CameraController::new(0.005, 0.4, 0.1);

        let mut scene = Scene::new(CameraManager::new(camera, controller));
        let diorama = Diorama::build(&mut scene, &mut rand::rng());

        Ok(Self {
            event_loop: Some(event_loop),
            state: AppState {
                window: None,
                render_engine: None,
                ui_manager: None,
                scene,
                diorama,
                stats: FrameStats::new(),
                last_tick: Instant::now(),
            },
        })
    }

    pub fn run(mut self) -> Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .ok_or_else(|| anyhow::anyhow!("event loop already consumed"))?;
        event_loop.run_app(&mut self.state)?;
        Ok(())
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title("Haunted House")
            .with_inner_size(LogicalSize::new(1200, 800));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("window creation failed: {}", err);
                event_loop.exit();
                return;
            }
        };

        let (width, height) = window.inner_size().into();
        let window_clone = window.clone();
        let mut renderer = match pollster::block_on(RenderEngine::new(window_clone, width, height))
        {
            Ok(renderer) => renderer,
            Err(err) => {
                log::error!("renderer init failed: {:#}", err);
                event_loop.exit();
                return;
            }
        };

        self.scene
            .camera_manager
            .camera
            .resize_projection(width, height);
        renderer.prepare_scene(&mut self.scene);

        let ui_manager = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window,
        );

        self.window = Some(window);
        self.render_engine = Some(renderer);
        self.ui_manager = Some(ui_manager);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };
        let Some(window) = self.window.as_ref() else {
            return;
        };

        // UI gets first refusal on input
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let ui_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
                window_id,
                event: event.clone(),
            };
            if ui_manager.handle_input(window, &ui_event) {
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: winit::keyboard::PhysicalKey::Code(key_code),
                        ..
                    },
                ..
            } => {
                if matches!(key_code, winit::keyboard::KeyCode::Escape) {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.scene
                    .camera_manager
                    .camera
                    .resize_projection(width, height);
                render_engine.resize(width, height);
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.stats.begin_frame();

                let now = Instant::now();
                let dt = (now - self.last_tick).as_secs_f32().min(0.1);
                self.last_tick = now;

                self.scene.camera_manager.update(dt);
                self.diorama.bridge.sync(&mut self.scene);
                self.scene.update();
                self.scene.update_transforms(render_engine.queue());
                self.scene.update_materials(
                    render_engine.device(),
                    render_engine.queue(),
                    render_engine.textures(),
                );
                render_engine.update(&self.scene);

                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    let window_clone = window.clone();
                    let bridge = &mut self.diorama.bridge;
                    let stats = &self.stats;
                    let result = render_engine.render_frame_with_ui(
                        &self.scene,
                        |device, queue, encoder, color_attachment| {
                            ui_manager.draw(
                                device,
                                queue,
                                encoder,
                                &window_clone,
                                color_attachment,
                                |ui| {
                                    diorama_panel(ui, bridge);
                                    stats.render_overlay(ui);
                                },
                            );
                        },
                    );
                    if let Err(err) = result {
                        log::warn!("frame dropped: {:#}", err);
                    }
                }

                self.stats.end_frame();
            }
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: winit::event::DeviceEvent,
    ) {
        let Some(window) = self.window.as_ref() else {
            return;
        };

        if let Some(ui_manager) = self.ui_manager.as_ref() {
            if ui_manager.wants_input() {
                return;
            }
        }

        self.scene.camera_manager.process_event(&event, window);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
