pub mod global_bindings;
pub mod texture;

pub use global_bindings::{
    light_view_proj, GlobalBindings, GlobalUboContent, ShadowUniform, MAX_POINT_LIGHTS,
};
pub use texture::{TextureError, TextureManager, TextureResource};
