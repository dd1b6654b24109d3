//! House proportions
//!
//! Every placement around the house is derived from one set of wall
//! dimensions, so resizing the walls moves the roof and door with them.

/// Wall box dimensions plus the factors the roof and door derive from
#[derive(Copy, Clone, Debug)]
pub struct HouseDimensions {
    pub wall_width: f32,
    pub wall_height: f32,
    pub wall_depth: f32,
    pub roof_radius_factor: f32,
    pub roof_height_factor: f32,
    pub door_size: f32,
}

/// Gap keeping the door plane off the wall face to avoid z-fighting
pub const DOOR_CLEARANCE: f32 = 0.01;

impl Default for HouseDimensions {
    fn default() -> Self {
        Self {
            wall_width: 6.0,
            wall_height: 4.0,
            wall_depth: 6.0,
            roof_radius_factor: 0.85,
            roof_height_factor: 0.3,
            door_size: 3.0,
        }
    }
}

impl HouseDimensions {
    pub fn roof_radius(&self) -> f32 {
        self.wall_width * self.roof_radius_factor
    }

    pub fn roof_height(&self) -> f32 {
        self.wall_height * self.roof_height_factor
    }

    /// Wall box sits on the ground, so its center is at half height
    pub fn wall_center_y(&self) -> f32 {
        self.wall_height * 0.5
    }

    /// Cone center: on top of the walls, raised by half the cone height
    pub fn roof_center_y(&self) -> f32 {
        self.wall_height + self.roof_height() * 0.5
    }

    /// Door plane sits just in front of the +z wall face
    pub fn door_offset_z(&self) -> f32 {
        self.wall_width * 0.5 + DOOR_CLEARANCE
    }

    pub fn door_center_y(&self) -> f32 {
        self.door_size * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roof_sits_on_top_of_walls() {
        let house = HouseDimensions::default();
        assert!((house.roof_center_y() - (4.0 + 1.2 * 0.5)).abs() < 1e-6);

        let tall = HouseDimensions {
            wall_height: 10.0,
            ..Default::default()
        };
        // roof base must coincide with the wall top for any height
        assert!((tall.roof_center_y() - tall.roof_height() * 0.5 - 10.0).abs() < 1e-6);
    }

    #[test]
    fn roof_scales_with_wall_width() {
        let house = HouseDimensions::default();
        assert!((house.roof_radius() - 5.1).abs() < 1e-6);

        let wide = HouseDimensions {
            wall_width: 8.0,
            ..Default::default()
        };
        assert!((wide.roof_radius() - 6.8).abs() < 1e-6);
    }

    #[test]
    fn door_clears_the_wall_face() {
        let house = HouseDimensions::default();
        assert!(house.door_offset_z() > house.wall_width * 0.5);
        assert!((house.door_offset_z() - 3.01).abs() < 1e-6);

        let wide = HouseDimensions {
            wall_width: 9.0,
            ..Default::default()
        };
        assert!((wide.door_offset_z() - 4.51).abs() < 1e-6);
    }

    #[test]
    fn door_bottom_rests_on_ground() {
        let house = HouseDimensions::default();
        assert!((house.door_center_y() - house.door_size * 0.5).abs() < 1e-6);
    }
}
