use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

// ── Category ──────────────────────────────────────────────────────────────────

/// Which kind of thing a sprite is.  The category decides both the default
/// placement layer and the anchor/z-order rules applied when the sprite is
/// placed on the grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Floor,
    Wall,
    Object,
    Character,
}

impl Category {
    /// Map a sprite-folder name (`floor/`, `wall/`, …) to a category.
    pub fn from_folder(name: &str) -> Option<Self> {
        match name {
            "floor" => Some(Self::Floor),
            "wall" => Some(Self::Wall),
            "object" => Some(Self::Object),
            "character" => Some(Self::Character),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Floor => "floor",
            Self::Wall => "wall",
            Self::Object => "object",
            Self::Character => "character",
        }
    }
}

// ── Anchor ────────────────────────────────────────────────────────────────────

/// Integer sub-coordinate inside a sprite's footprint naming the cell that
/// aligns with the placement coordinate.
///
/// Invariant: `x < width`, `y < height` of the owning footprint.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    pub x: u32,
    pub y: u32,
}

impl Anchor {
    /// The floored geometric-center cell of a footprint — the default when
    /// no anchor is given explicitly.
    pub fn centered(width: u32, height: u32) -> Self {
        Self { x: width / 2, y: height / 2 }
    }
}

// ── SpriteDef ─────────────────────────────────────────────────────────────────

/// Immutable catalog entry for one sprite asset.
///
/// `width`/`height` are the visual footprint in whole tiles; `depth` is the
/// elevation in height units (how far the sprite visually rises, independent
/// of its footprint).  Definitions are shared by `Arc` once loaded and never
/// mutate afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpriteDef {
    /// Catalog identifier — the asset's file stem, footprint suffix included.
    pub id: String,
    /// Display name (the stem with metadata suffixes stripped).
    pub name: String,
    pub category: Category,
    /// Source image reference for the external renderer.
    pub path: String,
    /// Footprint width in tiles.
    pub width: u32,
    /// Footprint height in tiles.
    pub height: u32,
    /// Elevation depth in height units.
    pub depth: u32,
    pub anchor: Anchor,
}

impl SpriteDef {
    /// Stand-in definition for a sprite id that could not be resolved
    /// against the catalog: a 1×1, elevation-1 entry with no renderable
    /// image.  Placements made from it are flagged pending so a renderer
    /// can show them degraded instead of dropping them.
    pub fn placeholder(id: &str, category: Category) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            category,
            path: String::new(),
            width: 1,
            height: 1,
            depth: 1,
            anchor: Anchor { x: 0, y: 0 },
        }
    }
}

// ── CatalogError ──────────────────────────────────────────────────────────────

/// Why a single asset filename was rejected.  Folder scans log these and
/// skip the file; nothing here aborts a scan.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// The filename does not match `name_WxH[_Z][_AxB].png`.
    #[error("`{0}` does not match the name_WxH[_Z][_AxB].png pattern")]
    InvalidFormat(String),

    /// A footprint dimension exceeds the configured maximum.
    #[error("`{name}` footprint {width}x{height} exceeds the {max}-tile maximum")]
    DimensionOutOfRange {
        name: String,
        width: u32,
        height: u32,
        max: u32,
    },

    /// The explicit anchor still falls outside the footprint after the
    /// size → size-1 correction.
    #[error("`{name}` anchor ({x},{y}) lies outside its {width}x{height} footprint")]
    AnchorOutOfBounds {
        name: String,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

// ── Filename parsing ──────────────────────────────────────────────────────────

/// Strict decimal parse — rejects signs, whitespace and empty strings, so a
/// name fragment like `+3` can never read as a count.
fn parse_count(token: &str) -> Option<u32> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Parse an `AxB` token into a pair of counts.
fn parse_pair(token: &str) -> Option<(u32, u32)> {
    let (a, b) = token.split_once('x')?;
    Some((parse_count(a)?, parse_count(b)?))
}

/// Parse one asset filename of the form `name_WxH[_Z][_AxB].png` into a
/// `SpriteDef`.
///
/// - `W`, `H`: footprint in tiles (positive; at most `max_footprint`).
/// - `Z`: optional elevation depth, defaulting to 1.
/// - `AxB`: optional explicit anchor; omitted anchors default to the
///   geometric-center cell `(W/2, H/2)`.  An anchor component equal to the
///   corresponding size — a common off-by-one in authored assets — is
///   corrected to `size - 1` before validation.
///
/// The `name` part may itself contain underscores; the first `WxH` token
/// terminates it.  Pure function: the caller supplies the category (derived
/// from the asset's folder) and decides what to do with errors.
pub fn parse_sprite_filename(
    file_name: &str,
    category: Category,
    max_footprint: u32,
) -> Result<SpriteDef, CatalogError> {
    let invalid = || CatalogError::InvalidFormat(file_name.to_string());

    let stem = file_name.strip_suffix(".png").ok_or_else(invalid)?;
    let parts: Vec<&str> = stem.split('_').collect();

    // The name is everything before the first WxH token.
    let footprint_at = parts
        .iter()
        .position(|p| parse_pair(p).is_some())
        .ok_or_else(invalid)?;
    if footprint_at == 0 {
        return Err(invalid());
    }
    let name = parts[..footprint_at].join("_");

    let (width, height) = parse_pair(parts[footprint_at]).ok_or_else(invalid)?;
    if width == 0 || height == 0 {
        return Err(invalid());
    }
    if width > max_footprint || height > max_footprint {
        return Err(CatalogError::DimensionOutOfRange {
            name,
            width,
            height,
            max: max_footprint,
        });
    }

    // What remains after the footprint is `[Z]`, `[AxB]`, `[Z, AxB]` or
    // nothing; anything else fails the pattern.
    let rest = &parts[footprint_at + 1..];
    let (depth, explicit_anchor) = match rest {
        [] => (1, None),
        [z] if parse_count(z).is_some() => (parse_count(z).unwrap_or(1), None),
        [a] if parse_pair(a).is_some() => (1, parse_pair(a)),
        [z, a] if parse_count(z).is_some() && parse_pair(a).is_some() => {
            (parse_count(z).unwrap_or(1), parse_pair(a))
        }
        _ => return Err(invalid()),
    };

    let anchor = match explicit_anchor {
        None => Anchor::centered(width, height),
        Some((ax, ay)) => {
            // Saturate an anchor that names the one-past-the-end cell.
            let x = if ax == width { width - 1 } else { ax };
            let y = if ay == height { height - 1 } else { ay };
            if x >= width || y >= height {
                return Err(CatalogError::AnchorOutOfBounds {
                    name,
                    x,
                    y,
                    width,
                    height,
                });
            }
            Anchor { x, y }
        }
    };

    Ok(SpriteDef {
        id: stem.to_string(),
        name,
        category,
        path: file_name.to_string(),
        width,
        height,
        depth,
        anchor,
    })
}

// ── Catalog ───────────────────────────────────────────────────────────────────

/// Indexed sprite catalog, keyed by id.
///
/// Built once at startup (folder scan or JSON file) and shared read-only
/// afterwards — entries come out as `Arc<SpriteDef>` clones.
#[derive(Default)]
pub struct Catalog {
    sprites: HashMap<String, Arc<SpriteDef>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a definition.  Duplicate ids keep the first occurrence, the
    /// same way duplicate stems behave in an atlas load.
    pub fn insert(&mut self, def: SpriteDef) -> bool {
        if self.sprites.contains_key(&def.id) {
            warn!(id = %def.id, "duplicate sprite id; keeping the first");
            return false;
        }
        self.sprites.insert(def.id.clone(), Arc::new(def));
        true
    }

    pub fn get(&self, id: &str) -> Option<Arc<SpriteDef>> {
        self.sprites.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<SpriteDef>> {
        self.sprites.values()
    }

    /// Scan `root` recursively for `.png` files and build a catalog.
    ///
    /// Each file's category comes from its first path component under
    /// `root` (`floor/`, `wall/`, `object/`, `character/`); files outside a
    /// category folder, unreadable entries and filenames that fail to parse
    /// are logged and skipped.  A missing or empty folder yields an empty
    /// catalog rather than an error.
    pub fn scan_folder(root: impl AsRef<Path>, max_footprint: u32) -> Self {
        let root = root.as_ref();
        let mut catalog = Self::new();

        for entry in walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("png") {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|s| s.to_str()) else {
                continue;
            };

            let relative = path.strip_prefix(root).unwrap_or(path);
            let category = relative
                .components()
                .next()
                .and_then(|c| c.as_os_str().to_str())
                .and_then(Category::from_folder);
            let Some(category) = category else {
                warn!(file = %relative.display(), "not inside a category folder; skipping");
                continue;
            };

            match parse_sprite_filename(file_name, category, max_footprint) {
                Ok(mut def) => {
                    def.path = relative.to_string_lossy().replace('\\', "/");
                    catalog.insert(def);
                }
                Err(err) => {
                    warn!(file = %relative.display(), %err, "skipping sprite");
                }
            }
        }

        catalog
    }

    /// Load a catalog from the JSON file format emitted by `to_json`.
    ///
    /// Entries with a missing depth default to 1 and a missing anchor to
    /// the geometric center; entries whose anchor is out of bounds are
    /// logged and dropped rather than failing the whole file.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        #[derive(Deserialize)]
        struct RawDef {
            id: String,
            name: String,
            category: Category,
            #[serde(default)]
            path: String,
            width: u32,
            height: u32,
            #[serde(default = "one")]
            depth: u32,
            #[serde(default)]
            anchor: Option<Anchor>,
        }
        fn one() -> u32 {
            1
        }

        let raw: Vec<RawDef> = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for r in raw {
            if r.width == 0 || r.height == 0 {
                warn!(id = %r.id, "zero-sized footprint; dropping entry");
                continue;
            }
            let anchor = r.anchor.unwrap_or_else(|| Anchor::centered(r.width, r.height));
            if anchor.x >= r.width || anchor.y >= r.height {
                warn!(id = %r.id, "anchor outside footprint; dropping entry");
                continue;
            }
            catalog.insert(SpriteDef {
                id: r.id,
                name: r.name,
                category: r.category,
                path: r.path,
                width: r.width,
                height: r.height,
                depth: r.depth,
                anchor,
            });
        }
        Ok(catalog)
    }

    /// Serialise the catalog to JSON, sorted by id for stable output.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut defs: Vec<&SpriteDef> = self.sprites.values().map(Arc::as_ref).collect();
        defs.sort_by(|a, b| a.id.cmp(&b.id));
        serde_json::to_string_pretty(&defs)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
