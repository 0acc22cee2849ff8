// ── Depth keys and anchor corrections ─────────────────────────────────────────
//
// Pure painter's-algorithm math — no grid access, no I/O.  A depth key is a
// scalar; sprites draw in ascending key order, so a larger key means "nearer
// the viewer, painted later".  The rules:
//
// - Floors sort behind everything else, ordered among themselves by row and
//   then layer.
// - Everything else sorts by the *far corner* of its footprint: a multi-tile
//   object whose extent reaches further south-east must paint over objects
//   it visually stands in front of, no matter which cell anchors it.
// - Elevation is added so a risen sprite still sorts below sprites whose own
//   base sits further down-screen.

use glam::Vec2;

use crate::catalog::{Category, SpriteDef};
use crate::grid::Layer;
use crate::projection::Projection;

/// Keeps every floor key below every non-floor key.
pub const FLOOR_BASE: f32 = -1.0e6;
/// Weight of one row step for non-floor sprites.  Large enough that no
/// combination of column, layer and elevation terms can outweigh a row.
pub const ROW_WEIGHT: f32 = 1_000.0;
/// Key distance between adjacent layers in the same cell.
pub const LAYER_SPACING: f32 = 0.25;
/// Per-column fractional increment breaking ties between otherwise equal
/// keys, so same-row neighbours never z-fight.
pub const COL_TIEBREAK: f32 = 1.0 / 1024.0;

/// Draw-order key for a sprite placed at `(col, row)` on `layer`.
pub fn depth_key(def: &SpriteDef, col: i32, row: i32, layer: Layer) -> f32 {
    let layer_term = layer.index() as f32 * LAYER_SPACING;
    let tiebreak = col as f32 * COL_TIEBREAK;

    if def.category == Category::Floor {
        return FLOOR_BASE + row as f32 * 10.0 + layer_term + tiebreak;
    }

    // Signed offset from the anchor cell to the footprint's far corner:
    // the sprite sorts as if it occupied its farthest south-east cell.
    let d_col = (def.width - 1 - def.anchor.x) as f32;
    let d_row = (def.height - 1 - def.anchor.y) as f32;

    (row as f32 + d_row) * ROW_WEIGHT
        + (col as f32 + d_col)
        + layer_term
        + def.depth as f32
        + tiebreak
}

/// Pixel offset from `tile_to_screen(col, row)` to the point the sprite's
/// visual reference should land on.
///
/// Floor sprites pin their geometric-center cell to the tile and never rise;
/// everything else pins its far-corner "feet" to the tile and shifts
/// up-screen by `depth * elevation_unit_px`.  The cell delta converts to
/// pixels through the same isometric basis the grid uses, so a corrected
/// sprite stays aligned with the diamonds it overlaps.
pub fn anchor_offset(def: &SpriteDef, projection: &Projection, elevation_unit_px: f32) -> Vec2 {
    match def.category {
        Category::Floor => {
            let dc = (def.width / 2) as f32 - def.anchor.x as f32;
            let dr = (def.height / 2) as f32 - def.anchor.y as f32;
            projection.cell_delta_to_px(dc, dr)
        }
        _ => {
            let dc = (def.width - 1 - def.anchor.x) as f32;
            let dr = (def.height - 1 - def.anchor.y) as f32;
            let mut offset = projection.cell_delta_to_px(dc, dr);
            offset.y -= def.depth as f32 * elevation_unit_px;
            offset
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Anchor, parse_sprite_filename};

    fn sprite(file: &str, category: Category) -> SpriteDef {
        parse_sprite_filename(file, category, 16).unwrap()
    }

    fn proj() -> Projection {
        Projection::new(64.0, 32.0, Vec2::ZERO)
    }

    // ── ordering ─────────────────────────────────────────────────────────────

    #[test]
    fn southeast_object_draws_over_northwest_object() {
        let obj = sprite("crate_1x1.png", Category::Object);
        let near = depth_key(&obj, 3, 3, Layer::Object);
        let far = depth_key(&obj, 2, 2, Layer::Object);
        assert!(near > far);
    }

    #[test]
    fn floors_sort_behind_everything() {
        let floor = sprite("grass_1x1.png", Category::Floor);
        let obj = sprite("crate_1x1.png", Category::Object);
        // Even the last-row floor stays behind the first-cell object.
        let floor_key = depth_key(&floor, 29, 29, Layer::Floor);
        let obj_key = depth_key(&obj, 0, 0, Layer::Object);
        assert!(floor_key < obj_key);
    }

    #[test]
    fn floors_order_by_row_then_layer() {
        let floor = sprite("grass_1x1.png", Category::Floor);
        assert!(depth_key(&floor, 0, 5, Layer::Floor) > depth_key(&floor, 0, 4, Layer::Floor));
        assert!(depth_key(&floor, 0, 4, Layer::Wall) > depth_key(&floor, 0, 4, Layer::Floor));
    }

    #[test]
    fn multi_tile_object_sorts_by_far_corner() {
        // A 3×3 object anchored at its center cell spans one row further
        // south than a 1×1 on the same anchor row; it must draw over a 1×1
        // sitting on the row in between.
        let big = sprite("barn_3x3.png", Category::Object);
        assert_eq!(big.anchor, Anchor { x: 1, y: 1 });
        let small = sprite("crate_1x1.png", Category::Object);
        let big_key = depth_key(&big, 5, 5, Layer::Object);
        let between_key = depth_key(&small, 5, 6, Layer::Object);
        assert!(big_key > between_key);
    }

    #[test]
    fn elevation_raises_key_within_a_cell() {
        let low = sprite("slab_1x1_1.png", Category::Object);
        let high = sprite("pillar_1x1_4.png", Category::Object);
        assert!(
            depth_key(&high, 4, 4, Layer::Object) > depth_key(&low, 4, 4, Layer::Object)
        );
    }

    #[test]
    fn elevation_never_beats_a_full_row() {
        let tall = sprite("tower_1x1_8.png", Category::Object);
        let flat = sprite("crate_1x1.png", Category::Object);
        assert!(
            depth_key(&flat, 4, 5, Layer::Object) > depth_key(&tall, 4, 4, Layer::Object)
        );
    }

    #[test]
    fn same_row_neighbours_never_tie() {
        let floor = sprite("grass_1x1.png", Category::Floor);
        let a = depth_key(&floor, 3, 7, Layer::Floor);
        let b = depth_key(&floor, 4, 7, Layer::Floor);
        assert!(a != b);
    }

    // ── anchor offsets ───────────────────────────────────────────────────────

    #[test]
    fn centered_1x1_floor_needs_no_correction() {
        let floor = sprite("grass_1x1.png", Category::Floor);
        assert_eq!(anchor_offset(&floor, &proj(), 32.0), Vec2::ZERO);
    }

    #[test]
    fn off_center_floor_anchor_shifts_along_iso_basis() {
        // 3×1 floor anchored at cell 0; center cell is 1, so the sprite
        // shifts one column along the (+32, +16) basis vector.
        let strip = sprite("path_3x1_0x0.png", Category::Floor);
        assert_eq!(anchor_offset(&strip, &proj(), 32.0), Vec2::new(32.0, 16.0));
    }

    #[test]
    fn non_floor_shifts_to_far_corner_and_rises() {
        // 2×2 wall anchored at (1,1) — already the far corner, so the only
        // correction is the elevation rise.
        let wall = sprite("rampart_2x2_3_1x1.png", Category::Wall);
        assert_eq!(
            anchor_offset(&wall, &proj(), 32.0),
            Vec2::new(0.0, -3.0 * 32.0)
        );
        // Anchored at (0,0) the feet sit one cell south-east on both axes:
        // (dc,dr) = (1,1) → (0, 32) in pixels, minus the rise.
        let wall_nw = sprite("rampart_2x2_3_0x0.png", Category::Wall);
        assert_eq!(
            anchor_offset(&wall_nw, &proj(), 32.0),
            Vec2::new(0.0, 32.0 - 3.0 * 32.0)
        );
    }

    #[test]
    fn floor_ignores_elevation() {
        let raised = sprite("platform_1x1_5.png", Category::Floor);
        assert_eq!(anchor_offset(&raised, &proj(), 32.0), Vec2::ZERO);
    }
}
