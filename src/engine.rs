use std::sync::Arc;

use glam::Vec2;

use crate::avatar::Avatar;
use crate::camera::Camera;
use crate::catalog::{Catalog, SpriteDef};
use crate::config::WorldConfig;
use crate::grid::{Grid, GridError, Layer, TileCell};
use crate::input::InputState;
use crate::projection::Projection;
use crate::save::{self, SaveError, WorldDocument};

// ── World ─────────────────────────────────────────────────────────────────────

/// The whole sandbox in one owned value: grid store, avatar, camera and the
/// shared sprite catalog.
///
/// The external shell drives it with commands and one `tick` per animation
/// frame, then reads the query surface to render.  Windowing and drawing
/// live entirely in the shell.
pub struct World {
    config: WorldConfig,
    catalog: Arc<Catalog>,
    grid: Grid,
    avatar: Avatar,
    camera: Camera,
}

impl World {
    pub fn new(config: WorldConfig, catalog: Arc<Catalog>) -> Self {
        let projection = Projection::new(config.tile_width, config.tile_height, config.origin);
        let grid = Grid::new(config.cols, config.rows, projection, config.elevation_unit_px);
        let avatar = Avatar::new(config.avatar_start, config.avatar_speed, config.snap_speed);
        let mut camera = Camera::new(&config);
        // Open centered on the avatar rather than easing in from (0, 0).
        camera.reset();

        Self { config, catalog, grid, avatar, camera }
    }

    /// Advance one frame: avatar motion first, then the camera chasing it.
    ///
    /// The order is fixed — the camera always sees this frame's avatar
    /// position, never last frame's.
    pub fn tick(&mut self, dt: f32, input: &InputState) {
        self.avatar
            .update(dt, input, self.grid.cols(), self.grid.rows());
        let focus = self
            .grid
            .projection()
            .tile_to_screen(self.avatar.position.x, self.avatar.position.y);
        self.camera.update(focus);
    }

    // ── world edit commands ──────────────────────────────────────────────────

    /// Place the sprite with `sprite_id` at a cell/layer.
    ///
    /// An id the catalog does not know soft-fails into a pending
    /// placeholder placement; the slot is still claimed.
    pub fn place_tile(
        &mut self,
        col: i32,
        row: i32,
        layer: usize,
        sprite_id: &str,
    ) -> Result<(), GridError> {
        match self.catalog.get(sprite_id) {
            Some(def) => self.grid.place(col, row, layer, def),
            None => {
                tracing::warn!(id = %sprite_id, "unknown sprite id; placing pending placeholder");
                let category = Layer::from_index(layer)
                    .ok_or(GridError::InvalidLayer(layer))?
                    .category();
                let def = Arc::new(SpriteDef::placeholder(sprite_id, category));
                self.grid.place_pending(col, row, layer, def)
            }
        }
    }

    pub fn clear_tile(&mut self, col: i32, row: i32, layer: usize) -> Result<(), GridError> {
        self.grid.clear(col, row, layer)
    }

    /// Empty every layer of a cell.
    pub fn clear_cell(&mut self, col: i32, row: i32) -> Result<(), GridError> {
        self.grid.clear_all(col, row)
    }

    // ── camera commands ──────────────────────────────────────────────────────

    pub fn camera_start_drag(&mut self, pointer: Vec2) {
        self.camera.start_drag(pointer);
    }

    pub fn camera_drag(&mut self, pointer: Vec2) {
        self.camera.drag(pointer);
    }

    pub fn camera_end_drag(&mut self) {
        self.camera.end_drag();
    }

    pub fn camera_zoom(&mut self, steps: i32) {
        self.camera.zoom(steps);
    }

    pub fn camera_lock_toggle(&mut self) {
        self.camera.toggle_lock();
    }

    pub fn camera_reset(&mut self) {
        self.camera.reset();
    }

    // ── query surface ────────────────────────────────────────────────────────

    pub fn tile_to_screen(&self, col: f32, row: f32) -> Vec2 {
        self.grid.projection().tile_to_screen(col, row)
    }

    /// The cell under a world-space point, `None` outside the grid.
    pub fn screen_to_tile(&self, point: Vec2) -> Option<(i32, i32)> {
        self.grid.screen_to_cell(point.x, point.y)
    }

    pub fn cell_layers(&self, col: i32, row: i32) -> Result<&TileCell, GridError> {
        self.grid.cell_layers(col, row)
    }

    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    // ── export / import ──────────────────────────────────────────────────────

    pub fn export_world(&self) -> WorldDocument {
        save::export(&self.grid)
    }

    pub fn export_json(&self) -> Result<String, SaveError> {
        self.export_world().to_json()
    }

    /// Replace the world contents from a document.
    ///
    /// The replacement grid is built completely before it is swapped in, so
    /// the previous world survives any degraded entries intact and nothing
    /// ever observes a half-imported store.
    pub fn import_world(&mut self, doc: &WorldDocument) {
        let cols = doc.cols.unwrap_or(self.grid.cols());
        let rows = doc.rows.unwrap_or(self.grid.rows());
        let projection = Projection::new(
            doc.tile_width.unwrap_or(self.grid.projection().tile_width),
            doc.tile_height.unwrap_or(self.grid.projection().tile_height),
            self.grid.projection().origin,
        );
        self.grid = save::rebuild_grid(
            doc,
            cols,
            rows,
            projection,
            self.config.elevation_unit_px,
            &self.catalog,
        );
    }

    /// Parse and import a JSON document.  A parse failure aborts the whole
    /// import and leaves the current world untouched.
    pub fn import_json(&mut self, json: &str) -> Result<(), SaveError> {
        let doc = WorldDocument::from_json(json)?;
        self.import_world(&doc);
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
