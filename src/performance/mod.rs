//! Frame timing statistics
//!
//! Keeps a short ring buffer of frame times and exposes a compact
//! imgui overlay in the corner of the window.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub struct FrameStats {
    frame_times: VecDeque<Duration>,
    max_samples: usize,
    frame_start: Option<Instant>,
    fps: f32,
    frame_time_ms: f32,
    last_update: Instant,
    update_interval: Duration,
}

impl FrameStats {
    pub fn new() -> Self {
        Self {
            // ~2 seconds of history at 60fps
            frame_times: VecDeque::with_capacity(120),
            max_samples: 120,
            frame_start: None,
            fps: 0.0,
            frame_time_ms: 0.0,
            last_update: Instant::now(),
            update_interval: Duration::from_millis(100),
        }
    }

    pub fn begin_frame(&mut self) {
        self.frame_start = Some(Instant::now());
    }

    pub fn end_frame(&mut self) {
        if let Some(start) = self.frame_start.take() {
            let frame_time = start.elapsed();
            if self.frame_times.len() >= self.max_samples {
                self.frame_times.pop_front();
            }
            self.frame_times.push_back(frame_time);

            // Recompute at a readable cadence rather than every frame
            if self.last_update.elapsed() >= self.update_interval {
                self.update_metrics();
                self.last_update = Instant::now();
            }
        }
    }

    fn update_metrics(&mut self) {
        if self.frame_times.is_empty() {
            return;
        }
        let total: Duration = self.frame_times.iter().sum();
        let avg = total / self.frame_times.len() as u32;
        self.frame_time_ms = avg.as_secs_f32() * 1000.0;
        self.fps = if self.frame_time_ms > 0.0 {
            1000.0 / self.frame_time_ms
        } else {
            0.0
        };
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn frame_time_ms(&self) -> f32 {
        self.frame_time_ms
    }

    /// Compact corner overlay with FPS and frame time
    pub fn render_overlay(&self, ui: &imgui::Ui) {
        let display_size = ui.io().display_size;
        ui.window("FPS")
            .size([120.0, 60.0], imgui::Condition::Always)
            .position([display_size[0] - 130.0, 10.0], imgui::Condition::Always)
            .no_decoration()
            .no_inputs()
            .bg_alpha(0.3)
            .build(|| {
                ui.text(format!("FPS: {:.0}", self.fps));
                ui.text(format!("{:.1}ms", self.frame_time_ms));
            });
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_buffer_is_bounded() {
        let mut stats = FrameStats::new();
        for _ in 0..500 {
            stats.begin_frame();
            stats.end_frame();
        }
        assert!(stats.frame_times.len() <= stats.max_samples);
    }
}
