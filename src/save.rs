use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::catalog::{Anchor, Catalog, Category, SpriteDef};
use crate::grid::{Grid, Layer, PlacedSprite};
use crate::projection::Projection;

// ── SaveError ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SaveError {
    /// The document could not be parsed into the expected shape.  Import is
    /// aborted entirely; the previous world state is untouched.
    #[error("malformed world document: {0}")]
    MalformedDocument(#[from] serde_json::Error),
}

// ── Document shape ────────────────────────────────────────────────────────────

/// Serialised world: grid dimensions, tile metrics and a sparse list of
/// occupied cells.  Every field except `tiles` is optional on import and
/// falls back to the live grid's value.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WorldDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cols: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    #[serde(rename = "tileWidth", default, skip_serializing_if = "Option::is_none")]
    pub tile_width: Option<f32>,
    #[serde(rename = "tileHeight", default, skip_serializing_if = "Option::is_none")]
    pub tile_height: Option<f32>,
    #[serde(default)]
    pub tiles: Vec<TileEntry>,
}

/// One occupied cell.  Accepts the legacy `x`/`y` keys for coordinates.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TileEntry {
    #[serde(alias = "x")]
    pub col: i32,
    #[serde(alias = "y")]
    pub row: i32,
    #[serde(default)]
    pub layers: CellLayers,
}

/// Per-layer entries of one cell, keyed by layer name.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CellLayers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<LayerEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wall: Option<LayerEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<LayerEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<LayerEntry>,
}

impl CellLayers {
    pub fn is_empty(&self) -> bool {
        self.floor.is_none()
            && self.wall.is_none()
            && self.object.is_none()
            && self.character.is_none()
    }

    pub fn get(&self, layer: Layer) -> Option<&LayerEntry> {
        match layer {
            Layer::Floor => self.floor.as_ref(),
            Layer::Wall => self.wall.as_ref(),
            Layer::Object => self.object.as_ref(),
            Layer::Character => self.character.as_ref(),
        }
    }

    fn slot_mut(&mut self, layer: Layer) -> &mut Option<LayerEntry> {
        match layer {
            Layer::Floor => &mut self.floor,
            Layer::Wall => &mut self.wall,
            Layer::Object => &mut self.object,
            Layer::Character => &mut self.character,
        }
    }
}

/// One placed sprite in a document.  Only the id is required; the metadata
/// snapshot lets an import degrade gracefully when the id is no longer in
/// the catalog.  Accepts the legacy `path` key as the id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LayerEntry {
    #[serde(alias = "path")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl LayerEntry {
    fn snapshot(placed: &PlacedSprite) -> Self {
        let def = &placed.def;
        Self {
            id: def.id.clone(),
            name: Some(def.name.clone()),
            width: Some(def.width),
            height: Some(def.height),
            depth: Some(def.depth),
            category: Some(def.category),
        }
    }
}

impl WorldDocument {
    pub fn from_json(json: &str) -> Result<Self, SaveError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ── Export ────────────────────────────────────────────────────────────────────

/// Walk every cell and emit the occupied slots, row-major.  Empty cells are
/// omitted entirely, so the output stays proportional to what was built.
pub fn export(grid: &Grid) -> WorldDocument {
    let mut tiles: Vec<TileEntry> = Vec::new();

    for row in 0..grid.rows() as i32 {
        for col in 0..grid.cols() as i32 {
            let Ok(cell) = grid.cell_layers(col, row) else {
                continue;
            };
            if cell.is_empty() {
                continue;
            }
            let mut layers = CellLayers::default();
            for (layer, placed) in cell.iter_occupied() {
                *layers.slot_mut(layer) = Some(LayerEntry::snapshot(placed));
            }
            tiles.push(TileEntry { col, row, layers });
        }
    }

    WorldDocument {
        cols: Some(grid.cols()),
        rows: Some(grid.rows()),
        tile_width: Some(grid.projection().tile_width),
        tile_height: Some(grid.projection().tile_height),
        tiles,
    }
}

// ── Import ────────────────────────────────────────────────────────────────────

/// Build a complete replacement grid from a parsed document.
///
/// Each entry replays as a `place` call.  Ids resolve against the live
/// catalog; a miss degrades into a pending placeholder carrying the entry's
/// last-known metadata (warn-logged, never fatal).  Entries outside the
/// rebuilt grid are warn-logged and skipped.  The caller swaps the returned
/// grid in only after the whole rebuild succeeds, so a half-imported world
/// can never be observed.
pub fn rebuild_grid(
    doc: &WorldDocument,
    cols: u32,
    rows: u32,
    projection: Projection,
    elevation_unit_px: f32,
    catalog: &Catalog,
) -> Grid {
    let mut grid = Grid::new(cols, rows, projection, elevation_unit_px);

    for tile in &doc.tiles {
        for layer in Layer::ALL {
            let Some(entry) = tile.layers.get(layer) else {
                continue;
            };

            let result = match catalog.get(&entry.id) {
                Some(def) => grid.place(tile.col, tile.row, layer.index(), def),
                None => {
                    warn!(id = %entry.id, col = tile.col, row = tile.row,
                          "sprite id not in catalog; placing pending placeholder");
                    let def = placeholder_from_entry(entry, layer);
                    grid.place_pending(tile.col, tile.row, layer.index(), Arc::new(def))
                }
            };

            if let Err(err) = result {
                warn!(%err, "skipping document entry");
            }
        }
    }

    grid
}

/// A pending stand-in built from whatever metadata the document preserved.
fn placeholder_from_entry(entry: &LayerEntry, layer: Layer) -> SpriteDef {
    let category = entry.category.unwrap_or(layer.category());
    let mut def = SpriteDef::placeholder(&entry.id, category);
    if let Some(name) = &entry.name {
        def.name = name.clone();
    }
    if let Some(width) = entry.width {
        def.width = width.max(1);
    }
    if let Some(height) = entry.height {
        def.height = height.max(1);
    }
    if let Some(depth) = entry.depth {
        def.depth = depth;
    }
    def.anchor = Anchor::centered(def.width, def.height);
    def
}

// ── Tests ──────────────────────────────────────────────────────────────────────
