//! Light sources attachable to scene nodes

/// Point light with distance cutoff and physical-style decay
///
/// Matches the parameter set the panel tunes: `intensity` scales the
/// emitted energy, `distance` is a hard cutoff, `decay` the falloff
/// exponent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub distance: f32,
    pub decay: f32,
}

impl PointLight {
    pub fn new(color: [f32; 3], intensity: f32, distance: f32, decay: f32) -> Self {
        Self {
            color,
            intensity,
            distance,
            decay,
        }
    }
}

/// Non-directional fill light applied to every lit surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            intensity: 0.1,
        }
    }
}
