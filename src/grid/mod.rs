pub mod depth;

use std::sync::Arc;

use glam::Vec2;
use thiserror::Error;

use crate::catalog::{Category, SpriteDef};
use crate::projection::Projection;

// ── Layer ─────────────────────────────────────────────────────────────────────

/// Number of independently addressable layers per cell.
pub const LAYER_COUNT: usize = 4;

/// Canonical placement layers, in paint-order-neutral index order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    Floor = 0,
    Wall = 1,
    Object = 2,
    Character = 3,
}

impl Layer {
    pub const ALL: [Layer; LAYER_COUNT] = [Layer::Floor, Layer::Wall, Layer::Object, Layer::Character];

    /// Validate a raw layer index from the command surface.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Floor),
            1 => Some(Self::Wall),
            2 => Some(Self::Object),
            3 => Some(Self::Character),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Floor => "floor",
            Self::Wall => "wall",
            Self::Object => "object",
            Self::Character => "character",
        }
    }

    /// The sprite category that conventionally lives on this layer.
    pub fn category(self) -> Category {
        match self {
            Self::Floor => Category::Floor,
            Self::Wall => Category::Wall,
            Self::Object => Category::Object,
            Self::Character => Category::Character,
        }
    }
}

impl From<Category> for Layer {
    /// The layer a sprite of this category lands on by default.
    fn from(category: Category) -> Self {
        match category {
            Category::Floor => Self::Floor,
            Category::Wall => Self::Wall,
            Category::Object => Self::Object,
            Category::Character => Self::Character,
        }
    }
}

// ── GridError ─────────────────────────────────────────────────────────────────

/// Placement/clear/query failures.  None of these mutate the grid.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("cell ({col}, {row}) is outside the {cols}x{rows} grid")]
    OutOfBounds { col: i32, row: i32, cols: u32, rows: u32 },

    #[error("layer index {0} is outside 0..4")]
    InvalidLayer(usize),
}

// ── PlacedSprite ──────────────────────────────────────────────────────────────

/// One sprite bound to a cell slot.
///
/// The screen position and depth key are computed at placement time and
/// cached here, so per-frame rendering reads them without re-deriving the
/// anchor math.  `pending` marks placements whose id was unresolved when
/// they were made (import before the asset existed); they keep their
/// last-known metadata but have no renderable image.
#[derive(Clone, Debug)]
pub struct PlacedSprite {
    pub def: Arc<SpriteDef>,
    /// Anchor-corrected world-space position, pre-camera.
    pub screen_pos: Vec2,
    /// Painter's-algorithm sort key; larger draws later.
    pub depth_key: f32,
    pub pending: bool,
}

// ── TileCell ──────────────────────────────────────────────────────────────────

/// Per-cell layer slots.  Every cell exists for the lifetime of the grid;
/// only its slots change.
#[derive(Clone, Debug, Default)]
pub struct TileCell {
    slots: [Option<PlacedSprite>; LAYER_COUNT],
}

impl TileCell {
    pub fn layer(&self, layer: Layer) -> Option<&PlacedSprite> {
        self.slots[layer.index()].as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Occupied slots in layer-index order.
    pub fn iter_occupied(&self) -> impl Iterator<Item = (Layer, &PlacedSprite)> {
        Layer::ALL
            .into_iter()
            .filter_map(|l| self.slots[l.index()].as_ref().map(|p| (l, p)))
    }
}

// ── Grid ──────────────────────────────────────────────────────────────────────

/// Dense `rows × cols` store of layered tile placements.
///
/// Occupancy is strictly single-cell: a multi-tile sprite occupies only the
/// cell it was placed on, and its footprint affects the cached screen
/// position and depth key, never neighbouring cells.
pub struct Grid {
    cols: u32,
    rows: u32,
    projection: Projection,
    elevation_unit_px: f32,
    cells: Vec<TileCell>,
}

impl Grid {
    pub fn new(cols: u32, rows: u32, projection: Projection, elevation_unit_px: f32) -> Self {
        let cells = vec![TileCell::default(); (cols * rows) as usize];
        Self { cols, rows, projection, elevation_unit_px, cells }
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn in_bounds(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && col < self.cols as i32 && row < self.rows as i32
    }

    fn cell_index(&self, col: i32, row: i32) -> Result<usize, GridError> {
        if !self.in_bounds(col, row) {
            return Err(GridError::OutOfBounds {
                col,
                row,
                cols: self.cols,
                rows: self.rows,
            });
        }
        Ok(row as usize * self.cols as usize + col as usize)
    }

    /// Place a sprite, overwriting any prior occupant of the slot.
    pub fn place(
        &mut self,
        col: i32,
        row: i32,
        layer: usize,
        def: Arc<SpriteDef>,
    ) -> Result<(), GridError> {
        self.place_inner(col, row, layer, def, false)
    }

    /// Place a pending (unresolved-id) sprite.  Identical to `place` except
    /// the stored entry is flagged for degraded rendering.
    pub fn place_pending(
        &mut self,
        col: i32,
        row: i32,
        layer: usize,
        def: Arc<SpriteDef>,
    ) -> Result<(), GridError> {
        self.place_inner(col, row, layer, def, true)
    }

    fn place_inner(
        &mut self,
        col: i32,
        row: i32,
        layer: usize,
        def: Arc<SpriteDef>,
        pending: bool,
    ) -> Result<(), GridError> {
        let layer = Layer::from_index(layer).ok_or(GridError::InvalidLayer(layer))?;
        let idx = self.cell_index(col, row)?;

        let base = self.projection.tile_to_screen(col as f32, row as f32);
        let offset = depth::anchor_offset(&def, &self.projection, self.elevation_unit_px);
        let key = depth::depth_key(&def, col, row, layer);

        self.cells[idx].slots[layer.index()] = Some(PlacedSprite {
            def,
            screen_pos: base + offset,
            depth_key: key,
            pending,
        });
        Ok(())
    }

    /// Empty one slot.  Clearing an already-empty slot is a success no-op.
    pub fn clear(&mut self, col: i32, row: i32, layer: usize) -> Result<(), GridError> {
        let layer = Layer::from_index(layer).ok_or(GridError::InvalidLayer(layer))?;
        let idx = self.cell_index(col, row)?;
        self.cells[idx].slots[layer.index()] = None;
        Ok(())
    }

    /// Empty every layer of a cell.
    pub fn clear_all(&mut self, col: i32, row: i32) -> Result<(), GridError> {
        let idx = self.cell_index(col, row)?;
        self.cells[idx] = TileCell::default();
        Ok(())
    }

    pub fn query(&self, col: i32, row: i32, layer: usize) -> Result<Option<&PlacedSprite>, GridError> {
        let layer = Layer::from_index(layer).ok_or(GridError::InvalidLayer(layer))?;
        let idx = self.cell_index(col, row)?;
        Ok(self.cells[idx].layer(layer))
    }

    /// All four layer slots of a cell.
    pub fn cell_layers(&self, col: i32, row: i32) -> Result<&TileCell, GridError> {
        let idx = self.cell_index(col, row)?;
        Ok(&self.cells[idx])
    }

    /// Floor the inverse projection to a cell, `None` outside the grid.
    pub fn screen_to_cell(&self, x: f32, y: f32) -> Option<(i32, i32)> {
        self.projection.screen_to_cell(x, y, self.cols, self.rows)
    }

    /// Every occupied slot, row-major then layer order.
    pub fn iter_placed(&self) -> impl Iterator<Item = (i32, i32, Layer, &PlacedSprite)> {
        self.cells.iter().enumerate().flat_map(move |(i, cell)| {
            let col = (i as u32 % self.cols) as i32;
            let row = (i as u32 / self.cols) as i32;
            cell.iter_occupied().map(move |(l, p)| (col, row, l, p))
        })
    }

    /// Occupied slots sorted by depth key — the paint order an external
    /// renderer should draw in.
    pub fn render_queue(&self) -> Vec<(i32, i32, Layer, &PlacedSprite)> {
        let mut queue: Vec<_> = self.iter_placed().collect();
        queue.sort_by(|a, b| a.3.depth_key.total_cmp(&b.3.depth_key));
        queue
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
