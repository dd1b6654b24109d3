//! Gloaming, a haunted house diorama viewer
//!
//! A small wgpu scene with a procedurally scattered graveyard, four
//! colored street lights and an imgui control panel wired to the scene
//! through a declarative parameter bridge.

pub mod app;
pub mod diorama;
pub mod gfx;
pub mod performance;
pub mod ui;
pub mod wgpu_utils;

pub use app::DioramaApp;

/// Builds the full diorama application, ready to run
pub fn default() -> anyhow::Result<DioramaApp> {
    DioramaApp::new()
}
