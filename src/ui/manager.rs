//! ImGui integration
//!
//! Wraps the imgui context, winit platform glue and the wgpu renderer.
//! The overlay is drawn into the frame after the scene pass with
//! LoadOp::Load so the 3D content stays underneath.

use imgui::{Context, FontConfig, FontSource, MouseCursor};
use imgui_wgpu::{Renderer, RendererConfig};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use std::time::Instant;
use wgpu::{CommandEncoder, Device, Queue, TextureFormat, TextureView};
use winit::{
    event::{Event, WindowEvent},
    window::Window,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum InputKind {
    Pointer,
    Keyboard,
    Focus,
}

/// Classifies the window events imgui cares about
fn input_kind(event: &WindowEvent) -> Option<InputKind> {
    match event {
        WindowEvent::CursorMoved { .. }
        | WindowEvent::MouseInput { .. }
        | WindowEvent::MouseWheel { .. } => Some(InputKind::Pointer),
        WindowEvent::KeyboardInput { .. } => Some(InputKind::Keyboard),
        WindowEvent::Focused(_) => Some(InputKind::Focus),
        _ => None,
    }
}

/// Whether imgui keeps the event, based on the matching capture flag
fn captured(kind: InputKind, want_mouse: bool, want_keyboard: bool) -> bool {
    match kind {
        InputKind::Pointer => want_mouse,
        InputKind::Keyboard => want_keyboard,
        InputKind::Focus => want_mouse || want_keyboard,
    }
}

pub struct UiManager {
    pub context: Context,
    platform: WinitPlatform,
    renderer: Renderer,
    last_frame: Instant,
    last_cursor: Option<MouseCursor>,
}

impl UiManager {
    /// Sets up imgui with locked DPI so scaling stays predictable
    pub fn new(
        device: &Device,
        queue: &Queue,
        output_color_format: TextureFormat,
        window: &Window,
    ) -> Self {
        let mut context = Context::create();
        context.set_ini_filename(None);

        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(context.io_mut(), window, HiDpiMode::Locked(1.0));

        let font_size = 16.0;
        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: font_size,
                ..Default::default()
            }),
        }]);

        let renderer_config = RendererConfig {
            texture_format: output_color_format,
            ..Default::default()
        };
        let renderer = Renderer::new(&mut context, device, queue, renderer_config);

        Self {
            context,
            platform,
            renderer,
            last_frame: Instant::now(),
            last_cursor: None,
        }
    }

    /// Feeds an event to imgui; true means the UI captured it and it
    /// should not reach the camera controls. Keyboard events pass
    /// through unless imgui actually wants the keyboard, so hovering a
    /// panel never swallows key presses.
    pub fn handle_input<T>(&mut self, window: &Window, event: &Event<T>) -> bool {
        let kind = match event {
            Event::WindowEvent {
                event: window_event,
                ..
            } => match input_kind(window_event) {
                Some(kind) => kind,
                None => return false,
            },
            _ => return false,
        };

        self.platform
            .handle_event(self.context.io_mut(), window, event);

        let io = self.context.io();
        captured(kind, io.want_capture_mouse, io.want_capture_keyboard)
    }

    pub fn wants_input(&self) -> bool {
        let io = self.context.io();
        io.want_capture_mouse || io.want_capture_keyboard
    }

    /// Builds the UI for this frame and renders it over the scene
    pub fn draw<F>(
        &mut self,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        window: &Window,
        color_attachment: &TextureView,
        run_ui: F,
    ) where
        F: FnOnce(&imgui::Ui),
    {
        let now = Instant::now();
        self.context
            .io_mut()
            .update_delta_time(now - self.last_frame);
        self.last_frame = now;

        if self
            .platform
            .prepare_frame(self.context.io_mut(), window)
            .is_err()
        {
            return;
        }

        let ui = self.context.frame();
        run_ui(&ui);

        if self.last_cursor != ui.mouse_cursor() {
            self.last_cursor = ui.mouse_cursor();
            self.platform.prepare_render(&ui, window);
        }

        let draw_data = self.context.render();
        if draw_data.display_size[0] <= 0.0 || draw_data.display_size[1] <= 0.0 {
            return;
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("imgui_render_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_attachment,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if let Err(err) = self
            .renderer
            .render(draw_data, queue, device, &mut render_pass)
        {
            log::warn!("imgui render failed: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hovering_a_panel_does_not_swallow_keys() {
        // mouse over a window, no text field active
        assert!(!captured(InputKind::Keyboard, true, false));
        assert!(captured(InputKind::Pointer, true, false));
    }

    #[test]
    fn keyboard_is_captured_only_when_imgui_wants_it() {
        assert!(captured(InputKind::Keyboard, false, true));
        assert!(captured(InputKind::Keyboard, true, true));
        assert!(!captured(InputKind::Keyboard, false, false));
    }

    #[test]
    fn pointer_ignores_the_keyboard_flag() {
        assert!(!captured(InputKind::Pointer, false, true));
    }

    #[test]
    fn focus_clears_either_capture() {
        assert!(captured(InputKind::Focus, true, false));
        assert!(captured(InputKind::Focus, false, true));
        assert!(!captured(InputKind::Focus, false, false));
    }
}
