use glam::Vec2;

// ── WorldConfig ───────────────────────────────────────────────────────────────

/// World configuration snapshot.
///
/// - **grid** dimensions are in whole cells; every placement coordinate must
///   fall inside `[0, cols) × [0, rows)`.
/// - **tile** dimensions are the pixel size of one grid diamond in screen
///   space (64 × 32 gives the classic 2:1 isometric look).
/// - The remaining fields are motion/camera tuning; all rates are expressed
///   per second except `camera_lag`, which is a per-frame fraction.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldConfig {
    /// Number of grid columns.
    pub cols: u32,
    /// Number of grid rows.
    pub rows: u32,
    /// Width of one tile diamond in pixels.
    pub tile_width: f32,
    /// Height of one tile diamond in pixels.
    pub tile_height: f32,
    /// World origin offset added to every projected screen point.
    pub origin: Vec2,
    /// Cell the avatar spawns on, as a (col, row) pair.
    pub avatar_start: Vec2,
    /// Avatar speed in tiles per second.
    pub avatar_speed: f32,
    /// Rate at which an idle avatar settles onto the nearest cell.
    pub snap_speed: f32,
    /// Follow interpolation fraction, applied once per frame.
    pub camera_lag: f32,
    /// Screen-space offset between the avatar and the camera focus.
    pub follow_offset: Vec2,
    /// Scale change contributed by one zoom step: `scale = 1 + level * zoom_step`.
    pub zoom_step: f32,
    /// Lowest zoom level (most zoomed out).
    pub zoom_min: i32,
    /// Highest zoom level (most zoomed in).
    pub zoom_max: i32,
    /// Largest accepted sprite footprint edge, in tiles.
    pub max_footprint: u32,
    /// Pixels of up-screen shift per elevation unit.
    pub elevation_unit_px: f32,
}

impl WorldConfig {
    /// Returns a `WorldConfig` tuned like the reference sandbox: a 30 × 30
    /// grid of 64 × 32 tiles with the avatar starting at (10, 10).
    pub fn default() -> Self {
        Self {
            cols: 30,
            rows: 30,
            tile_width:  64.0,
            tile_height: 32.0,
            origin: Vec2::ZERO,
            avatar_start: Vec2::new(10.0, 10.0),
            avatar_speed: 5.0,
            snap_speed:   10.0,
            camera_lag:   0.12,
            follow_offset: Vec2::new(0.0, -150.0),
            zoom_step: 0.25,
            zoom_min: -3,
            zoom_max:  3,
            max_footprint: 16,
            elevation_unit_px: 32.0,
        }
    }

    /// Half-extents of one tile diamond — the isometric basis lengths.
    pub fn half_tile(&self) -> Vec2 {
        Vec2::new(self.tile_width / 2.0, self.tile_height / 2.0)
    }

    /// Camera scale factor for a zoom level, before clamping.
    ///
    /// Kept here so the camera and any external renderer agree on the
    /// level → scale mapping.
    pub fn zoom_scale(&self, level: i32) -> f32 {
        1.0 + level as f32 * self.zoom_step
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_reference_sandbox() {
        let cfg = WorldConfig::default();
        assert_eq!(cfg.cols, 30);
        assert_eq!(cfg.rows, 30);
        assert_eq!(cfg.tile_width, 64.0);
        assert_eq!(cfg.tile_height, 32.0);
        assert_eq!(cfg.avatar_start, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn zoom_scale_is_linear_in_level() {
        let cfg = WorldConfig::default();
        assert_eq!(cfg.zoom_scale(0), 1.0);
        assert_eq!(cfg.zoom_scale(2), 1.5);
        assert_eq!(cfg.zoom_scale(-2), 0.5);
    }
}
