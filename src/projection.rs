// ── Isometric projection math ─────────────────────────────────────────────────
//
// Bidirectional mapping between grid coordinates (col, row — real-valued so
// the avatar can sit between cells) and world-space pixel coordinates, prior
// to any camera transform.  Uses the standard 2:1 diamond projection: grid
// axes map to the screen diagonals, so screen Y grows monotonically with
// `col + row`.  That monotonicity is what makes painter's-algorithm depth
// ordering work further up the stack.

use glam::Vec2;

// ── Projection ────────────────────────────────────────────────────────────────

/// Stateless grid ↔ screen projector for one tile size and origin.
///
/// The forward mapping is:
/// ```text
/// x = origin.x + (col - row) * tile_width  / 2
/// y = origin.y + (col + row) * tile_height / 2
/// ```
/// so increasing `col` moves right-and-down and increasing `row` moves
/// left-and-down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    /// Width of one tile diamond in pixels.
    pub tile_width: f32,
    /// Height of one tile diamond in pixels.
    pub tile_height: f32,
    /// Offset added to every projected point.
    pub origin: Vec2,
}

impl Projection {
    pub fn new(tile_width: f32, tile_height: f32, origin: Vec2) -> Self {
        Self { tile_width, tile_height, origin }
    }

    /// Project a grid coordinate to world-space pixels.
    ///
    /// Accepts real-valued coordinates — entity positions between cells
    /// project to points between the corresponding diamonds.
    pub fn tile_to_screen(&self, col: f32, row: f32) -> Vec2 {
        Vec2::new(
            self.origin.x + (col - row) * (self.tile_width / 2.0),
            self.origin.y + (col + row) * (self.tile_height / 2.0),
        )
    }

    /// Exact inverse of `tile_to_screen`, returning real-valued grid
    /// coordinates:
    /// ```text
    /// col = (dx / (tw/2) + dy / (th/2)) / 2
    /// row = (dy / (th/2) - dx / (tw/2)) / 2
    /// ```
    /// where `dx, dy` are the input relative to the origin.
    pub fn screen_to_tile(&self, x: f32, y: f32) -> Vec2 {
        let dx = (x - self.origin.x) / (self.tile_width / 2.0);
        let dy = (y - self.origin.y) / (self.tile_height / 2.0);
        Vec2::new((dx + dy) / 2.0, (dy - dx) / 2.0)
    }

    /// Floor `screen_to_tile` to an integer cell, or `None` when the cell
    /// falls outside `[0, cols) × [0, rows)`.
    ///
    /// The floor happens in grid space, after inversion.  Flooring pixel
    /// offsets before inverting gives a subtly different (wrong) cell near
    /// diamond edges.
    pub fn screen_to_cell(&self, x: f32, y: f32, cols: u32, rows: u32) -> Option<(i32, i32)> {
        let t = self.screen_to_tile(x, y);
        let col = t.x.floor() as i32;
        let row = t.y.floor() as i32;
        if col < 0 || row < 0 || col >= cols as i32 || row >= rows as i32 {
            return None;
        }
        Some((col, row))
    }

    /// Convert a cell-space delta to a pixel delta through the isometric
    /// basis vectors `(±tile_width/2, tile_height/2)`.
    ///
    /// Used for anchor corrections: shifting a sprite by `(dc, dr)` cells on
    /// screen must follow the same diagonals the grid itself does.
    pub fn cell_delta_to_px(&self, dc: f32, dr: f32) -> Vec2 {
        Vec2::new(
            (dc - dr) * (self.tile_width / 2.0),
            (dc + dr) * (self.tile_height / 2.0),
        )
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn proj() -> Projection {
        Projection::new(64.0, 32.0, Vec2::ZERO)
    }

    // ── forward mapping ───────────────────────────────────────────────────────

    #[test]
    fn origin_cell_projects_to_origin() {
        assert_eq!(proj().tile_to_screen(0.0, 0.0), Vec2::ZERO);
    }

    #[test]
    fn reference_cell_5_5() {
        // Equal col and row cancel horizontally; y = (5+5) * 16 = 160.
        assert_eq!(proj().tile_to_screen(5.0, 5.0), Vec2::new(0.0, 160.0));
    }

    #[test]
    fn col_moves_right_and_down_row_moves_left_and_down() {
        let p = proj();
        let base = p.tile_to_screen(3.0, 3.0);
        let c = p.tile_to_screen(4.0, 3.0);
        let r = p.tile_to_screen(3.0, 4.0);
        assert!(c.x > base.x && c.y > base.y);
        assert!(r.x < base.x && r.y > base.y);
    }

    #[test]
    fn screen_y_monotonic_in_col_plus_row() {
        let p = proj();
        let mut last = f32::NEG_INFINITY;
        for sum in 0..20 {
            let y = p.tile_to_screen(sum as f32, 0.0).y;
            assert!(y > last);
            last = y;
        }
    }

    #[test]
    fn origin_offset_translates_output() {
        let p = Projection::new(64.0, 32.0, Vec2::new(100.0, -40.0));
        assert_eq!(p.tile_to_screen(0.0, 0.0), Vec2::new(100.0, -40.0));
        assert_eq!(p.tile_to_screen(5.0, 5.0), Vec2::new(100.0, 120.0));
    }

    // ── inverse mapping ───────────────────────────────────────────────────────

    #[test]
    fn inverse_recovers_exact_real_coordinates() {
        let p = proj();
        for &(c, r) in &[(0.0, 0.0), (3.25, 7.5), (12.9, 0.1), (29.0, 29.0)] {
            let s = p.tile_to_screen(c, r);
            let t = p.screen_to_tile(s.x, s.y);
            assert!((t.x - c).abs() < 1e-4, "col {c} came back as {}", t.x);
            assert!((t.y - r).abs() < 1e-4, "row {r} came back as {}", t.y);
        }
    }

    #[test]
    fn round_trip_floors_to_containing_cell() {
        // The mandatory property: for any real in-bounds (c, r), projecting
        // and inverting must floor back to (floor c, floor r).
        let p = proj();
        let samples = [0.0, 0.01, 0.5, 0.99, 1.0, 2.75, 13.37, 29.5, 29.99];
        for &c in &samples {
            for &r in &samples {
                let s = p.tile_to_screen(c, r);
                let cell = p.screen_to_cell(s.x, s.y, 30, 30);
                assert_eq!(
                    cell,
                    Some((c.floor() as i32, r.floor() as i32)),
                    "round trip failed for ({c}, {r})"
                );
            }
        }
    }

    #[test]
    fn round_trip_with_nonzero_origin() {
        let p = Projection::new(64.0, 32.0, Vec2::new(512.0, 256.0));
        let s = p.tile_to_screen(7.3, 2.8);
        assert_eq!(p.screen_to_cell(s.x, s.y, 30, 30), Some((7, 2)));
    }

    #[test]
    fn out_of_bounds_cells_return_none() {
        let p = proj();
        // Left of column 0: the point one tile-width left of the origin.
        assert_eq!(p.screen_to_cell(-64.0, 0.0, 30, 30), None);
        // Below the last row.
        let s = p.tile_to_screen(5.0, 30.5);
        assert_eq!(p.screen_to_cell(s.x, s.y, 30, 30), None);
        // Inside a 30×30 grid but outside a smaller one.
        let s = p.tile_to_screen(12.0, 12.0);
        assert_eq!(p.screen_to_cell(s.x, s.y, 10, 10), None);
    }

    // ── basis deltas ─────────────────────────────────────────────────────────

    #[test]
    fn cell_delta_matches_projection_difference() {
        let p = proj();
        let a = p.tile_to_screen(4.0, 9.0);
        let b = p.tile_to_screen(6.0, 10.0);
        assert_eq!(b - a, p.cell_delta_to_px(2.0, 1.0));
    }
}
