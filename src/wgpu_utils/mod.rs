// src/wgpu_utils/mod.rs
//! WGPU utility functions and helpers
//!
//! Small wrappers for the uniform-buffer and bind-group boilerplate used
//! throughout the renderer.

pub mod binding;
pub mod uniform_buffer;

pub use binding::{BindGroupBuilder, BindGroupLayoutBuilder};
pub use uniform_buffer::UniformBuffer;
